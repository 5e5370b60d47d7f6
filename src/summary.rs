/*!
Posterior summaries and the posterior predictive distribution.

[`summarize`] pools draws across chains and reports mean, standard deviation,
and an equal-tailed credible interval per parameter. [`posterior_predictive`]
resamples parameter vectors from the archive and simulates new observations
at query feature rows, noise included.

# Examples

```rust
use mpg_mcmc::summary::summarize;
use ndarray::Array3;

let mut samples = Array3::zeros((1, 100, 1));
for i in 0..100 {
    samples[[0, i, 0]] = (i + 1) as f64;
}
let names = vec!["intercept".to_string()];
let summaries = summarize(samples.view(), &names, 0.9)?;
assert_eq!(summaries[0].mean, 50.5);
assert_eq!((summaries[0].ci_low, summaries[0].ci_high), (6.0, 96.0));
# Ok::<(), mpg_mcmc::error::Error>(())
```
*/

use ndarray::{s, Array1, Array2, ArrayView2, ArrayView3, Axis};
use rand::rngs::SmallRng;
use rand::seq::index;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::fmt;

use crate::error::{Error, Result};
use crate::model::predict_mean;

/// Pooled posterior summary of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSummary {
    /// The parameter's name, e.g. `intercept` or `sigma2`.
    pub name: String,
    /// Posterior mean over all chains and iterations.
    pub mean: f64,
    /// Posterior standard deviation (with the `n - 1` correction).
    pub sd: f64,
    /// Lower end of the equal-tailed credible interval.
    pub ci_low: f64,
    /// Upper end of the equal-tailed credible interval.
    pub ci_high: f64,
}

impl fmt::Display for ParameterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<14} mean {:>10.4}  sd {:>9.4}  interval [{:>10.4}, {:>10.4}]",
            self.name, self.mean, self.sd, self.ci_low, self.ci_high
        )
    }
}

fn check_level(level: f64) -> Result<()> {
    if !(level > 0.0 && level < 1.0) {
        return Err(Error::Config(format!(
            "interval level must lie strictly between 0 and 1, got {level}"
        )));
    }
    Ok(())
}

/// Equal-tailed interval of pre-sorted draws by nearest rank.
fn equal_tailed(sorted: &[f64], level: f64) -> (f64, f64) {
    let n = sorted.len();
    let tail = (1.0 - level) / 2.0;
    let lo_idx = ((tail * n as f64) as usize).min(n - 1);
    let hi_idx = (((1.0 - tail) * n as f64) as usize).min(n - 1);
    (sorted[lo_idx], sorted[hi_idx])
}

/// Summarizes samples of shape `[n_chains, n_steps, dim]`, pooling every
/// chain's draws.
///
/// `names` labels the parameters in order and must have one entry per
/// parameter; `level` is the credible-interval mass, e.g. `0.95`. Callers
/// are expected to slice off warm-up iterations first.
pub fn summarize(
    samples: ArrayView3<f64>,
    names: &[String],
    level: f64,
) -> Result<Vec<ParameterSummary>> {
    let (m, n, dim) = samples.dim();
    if names.len() != dim {
        return Err(Error::Config(format!(
            "got {} names for {dim} parameters",
            names.len()
        )));
    }
    check_level(level)?;
    let total = m * n;
    if total < 2 {
        return Err(Error::Config(format!(
            "need at least two draws to summarize, got {total}"
        )));
    }

    let mut out = Vec::with_capacity(dim);
    for (d, name) in names.iter().enumerate() {
        let mut pooled: Vec<f64> = samples.slice(s![.., .., d]).iter().copied().collect();
        let mean = pooled.iter().sum::<f64>() / total as f64;
        let sd = (pooled.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (total as f64 - 1.0))
            .sqrt();
        pooled.sort_unstable_by(f64::total_cmp);
        let (ci_low, ci_high) = equal_tailed(&pooled, level);
        out.push(ParameterSummary {
            name: name.clone(),
            mean,
            sd,
            ci_low,
            ci_high,
        });
    }
    Ok(out)
}

/// Simulated future observations at a set of query feature rows.
///
/// Row `r` of [`draws`](PosteriorPredictive::draws) holds one simulated
/// observation per resampled parameter vector for query row `r`.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorPredictive {
    draws: Array2<f64>,
}

impl PosteriorPredictive {
    /// The raw simulated observations, shape `[n_query_rows, n_draws]`.
    pub fn draws(&self) -> ArrayView2<f64> {
        self.draws.view()
    }

    /// Predictive mean per query row.
    pub fn mean(&self) -> Array1<f64> {
        self.draws
            .mean_axis(Axis(1))
            .expect("Expected computing predictive means to succeed")
    }

    /// Equal-tailed predictive interval per query row.
    pub fn interval(&self, level: f64) -> Result<Vec<(f64, f64)>> {
        check_level(level)?;
        Ok(self
            .draws
            .rows()
            .into_iter()
            .map(|row| {
                let mut sorted = row.to_vec();
                sorted.sort_unstable_by(f64::total_cmp);
                equal_tailed(&sorted, level)
            })
            .collect())
    }
}

/// Draws from the posterior predictive distribution at each row of `query`.
///
/// Resamples `n_draws` parameter vectors from the archive without
/// replacement, then simulates one observation per vector and query row:
/// the regression mean plus Gaussian noise with that vector's `sigma2`.
/// Callers are expected to slice off warm-up iterations first.
pub fn posterior_predictive(
    samples: ArrayView3<f64>,
    query: ArrayView2<f64>,
    n_draws: usize,
    seed: u64,
) -> Result<PosteriorPredictive> {
    let (m, n, dim) = samples.dim();
    if dim < 3 {
        return Err(Error::Config(format!(
            "samples have {dim} parameters, need at least intercept, one slope, and sigma2"
        )));
    }
    if query.ncols() != dim - 2 {
        return Err(Error::Config(format!(
            "query rows have {} features, model has {}",
            query.ncols(),
            dim - 2
        )));
    }
    let total = m * n;
    if n_draws == 0 || n_draws > total {
        return Err(Error::Config(format!(
            "requested {n_draws} posterior draws, archive holds {total}"
        )));
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let normal =
        Normal::new(0.0, 1.0).expect("Expecting creation of normal distribution to succeed.");
    let picks = index::sample(&mut rng, total, n_draws);

    let mut draws = Array2::zeros((query.nrows(), n_draws));
    for (j, k) in picks.into_iter().enumerate() {
        let (chain, iter) = (k / n, k % n);
        let theta = samples.slice(s![chain, iter, ..]).to_vec();
        let sigma2 = theta[dim - 1];
        if !sigma2.is_finite() || sigma2 <= 0.0 {
            return Err(Error::Numerical(format!(
                "posterior draw has invalid noise variance {sigma2}"
            )));
        }
        let sigma = sigma2.sqrt();
        for (r, row) in query.rows().into_iter().enumerate() {
            let mean = predict_mean(&theta, row);
            draws[[r, j]] = mean + sigma * normal.sample(&mut rng);
        }
    }

    Ok(PosteriorPredictive { draws })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr2, Array3};

    fn ramp_archive() -> Array3<f64> {
        let mut samples = Array3::zeros((1, 100, 1));
        for i in 0..100 {
            samples[[0, i, 0]] = (i + 1) as f64;
        }
        samples
    }

    #[test]
    fn test_summarize_exact_values() {
        let samples = ramp_archive();
        let names = vec!["intercept".to_string()];
        let summary = &summarize(samples.view(), &names, 0.9).unwrap()[0];
        assert_abs_diff_eq!(summary.mean, 50.5, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.sd, 29.011491975882016, epsilon = 1e-12);
        assert_eq!((summary.ci_low, summary.ci_high), (6.0, 96.0));
    }

    #[test]
    fn test_summarize_pools_chains() {
        // Two chains covering 1..=50 and 51..=100 pool to the same summary
        // as the single ramp.
        let mut samples = Array3::zeros((2, 50, 1));
        for i in 0..50 {
            samples[[0, i, 0]] = (i + 1) as f64;
            samples[[1, i, 0]] = (i + 51) as f64;
        }
        let names = vec!["intercept".to_string()];
        let summary = &summarize(samples.view(), &names, 0.9).unwrap()[0];
        assert_abs_diff_eq!(summary.mean, 50.5, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.sd, 29.011491975882016, epsilon = 1e-12);
        assert_eq!((summary.ci_low, summary.ci_high), (6.0, 96.0));
    }

    #[test]
    fn test_summarize_rejects_bad_input() {
        let samples = ramp_archive();
        let names = vec!["a".to_string(), "b".to_string()];
        assert!(summarize(samples.view(), &names, 0.9).is_err());

        let names = vec!["a".to_string()];
        assert!(summarize(samples.view(), &names, 0.0).is_err());
        assert!(summarize(samples.view(), &names, 1.0).is_err());

        let tiny = Array3::<f64>::zeros((1, 1, 1));
        assert!(summarize(tiny.view(), &names, 0.9).is_err());
    }

    #[test]
    fn test_display_contains_name_and_interval() {
        let summary = ParameterSummary {
            name: "sigma2".to_string(),
            mean: 4.0,
            sd: 0.5,
            ci_low: 3.1,
            ci_high: 5.2,
        };
        let line = summary.to_string();
        assert!(line.contains("sigma2"));
        assert!(line.contains("interval"));
    }

    /// An archive frozen at one parameter vector makes the predictive
    /// distribution exactly `N(mean(theta, x), sigma2)`, so its moments are
    /// known.
    #[test]
    fn test_predictive_frozen_archive() {
        let theta = [1.0, 2.0, 0.25];
        let mut samples = Array3::zeros((1, 1000, 3));
        for i in 0..1000 {
            for (d, &v) in theta.iter().enumerate() {
                samples[[0, i, d]] = v;
            }
        }
        let query = arr2(&[[1.0], [2.0]]);
        let predictive = posterior_predictive(samples.view(), query.view(), 1000, 42).unwrap();

        assert_eq!(predictive.draws().dim(), (2, 1000));
        let means = predictive.mean();
        // True predictive means are 3.0 and 5.0 with noise sd 0.5.
        assert_abs_diff_eq!(means[0], 3.0, epsilon = 0.1);
        assert_abs_diff_eq!(means[1], 5.0, epsilon = 0.1);

        let intervals = predictive.interval(0.9).unwrap();
        for (r, &(lo, hi)) in intervals.iter().enumerate() {
            assert!(lo < means[r] && means[r] < hi);
            // The 90% interval of N(., 0.5^2) is about 1.645 wide.
            let width = hi - lo;
            assert!(width > 1.45 && width < 1.85, "width = {width}");
        }
    }

    #[test]
    fn test_predictive_deterministic() {
        let samples = {
            let mut s = Array3::zeros((1, 50, 3));
            for i in 0..50 {
                s[[0, i, 0]] = i as f64 * 0.01;
                s[[0, i, 1]] = 1.0;
                s[[0, i, 2]] = 1.0 + i as f64 * 0.001;
            }
            s
        };
        let query = arr2(&[[1.0]]);
        let a = posterior_predictive(samples.view(), query.view(), 20, 9).unwrap();
        let b = posterior_predictive(samples.view(), query.view(), 20, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_predictive_rejects_bad_input() {
        let samples = Array3::<f64>::ones((1, 10, 3));
        let query = arr2(&[[1.0]]);

        assert!(posterior_predictive(samples.view(), query.view(), 0, 1).is_err());
        assert!(posterior_predictive(samples.view(), query.view(), 11, 1).is_err());

        let wide_query = arr2(&[[1.0, 2.0]]);
        assert!(posterior_predictive(samples.view(), wide_query.view(), 5, 1).is_err());

        let ok = posterior_predictive(samples.view(), query.view(), 5, 1).unwrap();
        assert!(ok.interval(1.5).is_err());
    }

    #[test]
    fn test_predictive_rejects_invalid_sigma2() {
        let mut samples = Array3::<f64>::ones((1, 10, 3));
        samples[[0, 3, 2]] = -1.0;
        let query = arr2(&[[1.0]]);
        // Drawing all ten vectors must hit the broken one.
        assert!(matches!(
            posterior_predictive(samples.view(), query.view(), 10, 1),
            Err(Error::Numerical(_))
        ));
    }
}
