pub mod core;
pub mod data;
pub mod distributions;
pub mod error;
pub mod io;
pub mod metropolis_hastings;
pub mod model;
pub mod stats;
pub mod summary;
