//! Tabular regression data: a feature matrix plus a target vector.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};

/**
An immutable regression dataset: one row per observation, one column per
feature, and a target value per row.

Construction validates shapes and finiteness once; afterwards every component
treats the data as read-only. Cleaning and scaling are the data provider's
concern, not this crate's.

# Examples

```rust
use mpg_mcmc::data::Dataset;
use ndarray::{arr1, arr2};

let x = arr2(&[[2130.0, 97.0], [3504.0, 307.0]]);
let y = arr1(&[33.0, 18.0]);
let data = Dataset::new(x, y)?.with_feature_names(&["weight", "displacement"])?;
assert_eq!(data.n_rows(), 2);
assert_eq!(data.n_features(), 2);
# Ok::<(), mpg_mcmc::error::Error>(())
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array1<f64>,
    feature_names: Vec<String>,
}

impl Dataset {
    /// Builds a dataset from a feature matrix and a target vector.
    ///
    /// Fails with [`Error::Config`] if the dataset is empty, the shapes
    /// disagree, or any value is non-finite. Features are named `x0`, `x1`,
    /// ... until [`Dataset::with_feature_names`] replaces them.
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(Error::Config("dataset has no rows".to_string()));
        }
        if x.ncols() == 0 {
            return Err(Error::Config("dataset has no features".to_string()));
        }
        if x.nrows() != y.len() {
            return Err(Error::Config(format!(
                "feature matrix has {} rows but target vector has {} entries",
                x.nrows(),
                y.len()
            )));
        }
        if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
            return Err(Error::Config(
                "dataset contains non-finite values".to_string(),
            ));
        }
        let feature_names = (0..x.ncols()).map(|i| format!("x{i}")).collect();
        Ok(Self {
            x,
            y,
            feature_names,
        })
    }

    /// Replaces the generated feature names, one per column.
    pub fn with_feature_names(mut self, names: &[&str]) -> Result<Self> {
        if names.len() != self.x.ncols() {
            return Err(Error::Config(format!(
                "got {} feature names for {} features",
                names.len(),
                self.x.ncols()
            )));
        }
        self.feature_names = names.iter().map(|s| s.to_string()).collect();
        Ok(self)
    }

    /**
    Generates a synthetic dataset from a known linear model with Gaussian
    noise.

    Each feature is drawn uniformly from its `(low, high)` range, and the
    target is `intercept + slopes . features + eps` with
    `eps ~ Normal(0, sqrt(sigma2))`. Useful for demos and recovery tests
    where the generating parameters must be known exactly.
    */
    pub fn synthetic(
        n_rows: usize,
        intercept: f64,
        slopes: &[f64],
        sigma2: f64,
        feature_ranges: &[(f64, f64)],
        seed: u64,
    ) -> Result<Self> {
        if slopes.len() != feature_ranges.len() {
            return Err(Error::Config(format!(
                "got {} slopes for {} feature ranges",
                slopes.len(),
                feature_ranges.len()
            )));
        }
        if !sigma2.is_finite() || sigma2 <= 0.0 {
            return Err(Error::Config(format!(
                "noise variance must be positive and finite, got {sigma2}"
            )));
        }
        if feature_ranges.iter().any(|&(low, high)| !(low < high)) {
            return Err(Error::Config(
                "feature ranges must satisfy low < high".to_string(),
            ));
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, sigma2.sqrt())
            .map_err(|e| Error::Config(format!("invalid noise distribution: {e}")))?;
        let mut x = Array2::zeros((n_rows, slopes.len()));
        let mut y = Array1::zeros(n_rows);
        for i in 0..n_rows {
            let mut mean = intercept;
            for (j, &(low, high)) in feature_ranges.iter().enumerate() {
                let v = rng.gen_range(low..high);
                x[[i, j]] = v;
                mean += slopes[j] * v;
            }
            y[i] = mean + noise.sample(&mut rng);
        }
        Self::new(x, y)
    }

    pub fn x(&self) -> ArrayView2<f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<f64> {
        self.y.view()
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}
