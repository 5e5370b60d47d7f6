/*!
The Bayesian linear regression model: a Gaussian likelihood over a
[`Dataset`](crate::data::Dataset) combined with one [`Prior`] per parameter.

A parameter vector is laid out as `[intercept, slopes.., sigma2]`, so a model
over `k` features has `k + 2` parameters. The model implements
[`Target`], which is all the sampler needs.

# Examples

```rust
use mpg_mcmc::data::Dataset;
use mpg_mcmc::distributions::{Prior, Target};
use mpg_mcmc::model::BayesianRegression;
use ndarray::{arr1, arr2};

let data = Dataset::new(arr2(&[[1.0, 2.0], [2.0, 1.0], [3.0, 3.0]]), arr1(&[1.0, 2.0, 3.0]))?;
let priors = vec![
    Prior::Normal { mean: 0.0, std: 10.0 },
    Prior::Normal { mean: 0.0, std: 10.0 },
    Prior::Normal { mean: 0.0, std: 10.0 },
    Prior::InverseGamma { shape: 3.0, scale: 2.0 },
];
let model = BayesianRegression::new(data, priors)?;
assert_eq!(model.dim(), 4);
assert!(model.log_posterior(&[0.5, 0.3, 0.2, 1.5])?.is_finite());
# Ok::<(), mpg_mcmc::error::Error>(())
```
*/

use ndarray::ArrayView1;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::data::Dataset;
use crate::distributions::{Prior, Target, LN_2PI};
use crate::error::{Error, Result};

/// Attempts per chain to find an initial state with finite posterior density.
const MAX_INIT_TRIES: usize = 100;

/**
Gaussian linear regression with independent priors on every parameter.

The parameter vector is `[intercept, slope_0, .., slope_{k-1}, sigma2]`;
priors are supplied in that order.
*/
#[derive(Debug, Clone)]
pub struct BayesianRegression {
    data: Dataset,
    priors: Vec<Prior>,
}

impl BayesianRegression {
    /// Builds a model, checking that there is exactly one valid prior per
    /// parameter.
    pub fn new(data: Dataset, priors: Vec<Prior>) -> Result<Self> {
        let expected = data.n_features() + 2;
        if priors.len() != expected {
            return Err(Error::Config(format!(
                "expected {} priors (intercept, {} slopes, sigma2), got {}",
                expected,
                data.n_features(),
                priors.len()
            )));
        }
        for prior in &priors {
            prior.validate()?;
        }
        Ok(Self { data, priors })
    }

    /// The dataset this model was built over.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Names for each entry of the parameter vector, in order.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.priors.len());
        names.push("intercept".to_string());
        names.extend(self.data.feature_names().iter().cloned());
        names.push("sigma2".to_string());
        names
    }

    /// Sum of prior log-densities at `theta`; negative infinity as soon as
    /// any parameter leaves its prior's support.
    pub fn log_prior(&self, theta: &[f64]) -> f64 {
        let mut total = 0.0;
        for (prior, &value) in self.priors.iter().zip(theta) {
            let ld = prior.log_density(value);
            if ld == f64::NEG_INFINITY {
                return f64::NEG_INFINITY;
            }
            total += ld;
        }
        total
    }

    /// Gaussian log-likelihood of the data at `theta`.
    ///
    /// Returns [`Error::Numerical`] if the result is not finite, which
    /// happens for instance when `sigma2` is zero.
    pub fn log_likelihood(&self, theta: &[f64]) -> Result<f64> {
        let k = self.data.n_features();
        let intercept = theta[0];
        let slopes = ArrayView1::from(&theta[1..1 + k]);
        let sigma2 = theta[k + 1];

        let mut ssr = 0.0;
        for (row, &y) in self.data.x().rows().into_iter().zip(self.data.y()) {
            let residual = y - intercept - row.dot(&slopes);
            ssr += residual * residual;
        }

        let n = self.data.n_rows() as f64;
        let ll = -0.5 * n * (LN_2PI + sigma2.ln()) - 0.5 * ssr / sigma2;
        if !ll.is_finite() {
            return Err(Error::Numerical(format!(
                "log-likelihood is {ll} at sigma2={sigma2}, ssr={ssr}"
            )));
        }
        Ok(ll)
    }

    /// Draws one starting state per chain from the priors, retrying until the
    /// posterior is finite there.
    ///
    /// Fails with [`Error::Config`] if no finite-density state turns up
    /// within a fixed number of tries, which indicates priors that are
    /// incompatible with the likelihood.
    pub fn draw_initial_states(&self, n_chains: usize, seed: u64) -> Result<Vec<Vec<f64>>> {
        let mut states = Vec::with_capacity(n_chains);
        for i in 0..n_chains {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            let mut found = None;
            for _ in 0..MAX_INIT_TRIES {
                let theta: Vec<f64> = self.priors.iter().map(|p| p.sample(&mut rng)).collect();
                if matches!(self.log_posterior(&theta), Ok(lp) if lp.is_finite()) {
                    found = Some(theta);
                    break;
                }
            }
            match found {
                Some(theta) => states.push(theta),
                None => {
                    return Err(Error::Config(format!(
                        "no finite-posterior initial state for chain {i} after {MAX_INIT_TRIES} prior draws"
                    )))
                }
            }
        }
        Ok(states)
    }
}

impl Target for BayesianRegression {
    fn dim(&self) -> usize {
        self.data.n_features() + 2
    }

    /// Unnormalized log-posterior. When `theta` falls outside the prior
    /// support this returns `Ok(NEG_INFINITY)` without touching the
    /// likelihood, so constraint violations never count as numerical
    /// failures.
    fn log_posterior(&self, theta: &[f64]) -> Result<f64> {
        let lp = self.log_prior(theta);
        if lp == f64::NEG_INFINITY {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(lp + self.log_likelihood(theta)?)
    }
}

/// Mean regression prediction `intercept + slopes . x_row` for one feature
/// row.
pub fn predict_mean(theta: &[f64], x_row: ArrayView1<f64>) -> f64 {
    let mut mean = theta[0];
    for (j, &x) in x_row.iter().enumerate() {
        mean += theta[1 + j] * x;
    }
    mean
}
