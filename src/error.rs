use thiserror::Error;

/// Errors produced while building or running a sampler.
///
/// Invalid inputs (hyperparameters, shapes, initial states) surface as
/// [`Error::Config`] before any sampling happens. [`Error::Numerical`] marks
/// an undefined or overflowing density evaluation; during sampling the chain
/// absorbs it as a rejected proposal, at initialization it is fatal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("numerical failure: {0}")]
    Numerical(String),

    #[cfg(feature = "csv")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
