//! Chain diagnostics: acceptance tracking, effective sample size, and the
//! split-half potential scale reduction factor.

use ndarray::prelude::*;
use ndarray_stats::QuantileExt;
use rustfft::{num_complex::Complex, FftPlanner};
use std::fmt;

use crate::error::{Error, Result};

/// Trailing acceptance rate below which an adapting proposal shrinks its
/// steps.
pub const ACCEPT_RATE_LOW: f64 = 0.2;

/// Trailing acceptance rate above which an adapting proposal grows its steps.
pub const ACCEPT_RATE_HIGH: f64 = 0.5;

/// Split R-hat above this value warrants a convergence warning.
pub const RHAT_THRESHOLD: f64 = 1.05;

/// Effective sample size below this value warrants a convergence warning.
pub const ESS_FLOOR: f64 = 100.0;

/// Estimates a chain's acceptance rate from its sample matrix of shape
/// `[n_steps, dim]`: a rejected move duplicates the previous row, an accepted
/// move (with a continuous proposal) almost surely does not.
pub fn acceptance_rate(samples: ArrayView2<f64>) -> f64 {
    let n = samples.nrows();
    if n < 2 {
        return 0.0;
    }
    let moves = (1..n)
        .filter(|&i| samples.row(i) != samples.row(i - 1))
        .count();
    moves as f64 / (n - 1) as f64
}

/// Same as [`acceptance_rate`], restricted to the last `window` transitions.
pub fn trailing_acceptance_rate(samples: ArrayView2<f64>, window: usize) -> f64 {
    let n = samples.nrows();
    if n < 2 || window == 0 {
        return 0.0;
    }
    let first = (n - 1).saturating_sub(window);
    let moves = (first + 1..n)
        .filter(|&i| samples.row(i) != samples.row(i - 1))
        .count();
    moves as f64 / (n - 1 - first) as f64
}

/// Biased autocovariance (lags `0..n`) of one scalar chain, computed via FFT.
fn autocovariance(x: ArrayView1<f64>) -> Vec<f64> {
    let n = x.len();
    let mean = x.mean().unwrap_or(0.0);
    let padded_len = (2 * n).next_power_of_two();

    let mut buf: Vec<Complex<f64>> = Vec::with_capacity(padded_len);
    buf.extend(x.iter().map(|&v| Complex::new(v - mean, 0.0)));
    buf.resize(padded_len, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(padded_len).process(&mut buf);
    for v in buf.iter_mut() {
        *v = Complex::new(v.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(padded_len).process(&mut buf);

    // The inverse pass is unnormalized, hence the extra `padded_len` factor.
    let scale = (padded_len * n) as f64;
    buf[..n].iter().map(|v| v.re / scale).collect()
}

/// Estimates the effective sample size of each parameter from samples of
/// shape `[n_chains, n_steps, dim]`.
///
/// Combines the per-chain autocovariances into cross-chain autocorrelations,
/// then sums them with Geyer's initial-positive and initial-monotone rules:
/// consecutive lag pairs are accumulated while their sum stays positive, each
/// pair clamped to never exceed the previous one. A chain stuck at a single
/// value comes out near one, not near the number of draws; chains with fewer
/// than two draws give NaN.
pub fn effective_sample_size(samples: ArrayView3<f64>) -> Array1<f64> {
    let (m, n, dim) = samples.dim();
    let mut out = Array1::zeros(dim);
    if n < 2 {
        out.fill(f64::NAN);
        return out;
    }

    for d in 0..dim {
        let acovs: Vec<Vec<f64>> = (0..m)
            .map(|c| autocovariance(samples.slice(s![c, .., d])))
            .collect();
        let chain_vars: Vec<f64> = acovs
            .iter()
            .map(|a| a[0] * n as f64 / (n as f64 - 1.0))
            .collect();
        let w = chain_vars.iter().sum::<f64>() / m as f64;

        let means: Vec<f64> = (0..m)
            .map(|c| samples.slice(s![c, .., d]).mean().unwrap_or(0.0))
            .collect();
        let grand = means.iter().sum::<f64>() / m as f64;
        let b_over_n = if m > 1 {
            means.iter().map(|mu| (mu - grand).powi(2)).sum::<f64>() / (m as f64 - 1.0)
        } else {
            0.0
        };
        let var_plus = w * (n as f64 - 1.0) / n as f64 + b_over_n;
        if var_plus <= 0.0 {
            out[d] = 0.0;
            continue;
        }

        let mut tau = -1.0;
        let mut prev_pair = f64::INFINITY;
        let mut t = 0;
        while t + 1 < n {
            let mean_t = acovs.iter().map(|a| a[t]).sum::<f64>() / m as f64;
            let mean_t1 = acovs.iter().map(|a| a[t + 1]).sum::<f64>() / m as f64;
            let rho_t = 1.0 - (w - mean_t) / var_plus;
            let rho_t1 = 1.0 - (w - mean_t1) / var_plus;
            let mut pair = rho_t + rho_t1;
            if pair < 0.0 {
                break;
            }
            pair = pair.min(prev_pair);
            tau += 2.0 * pair;
            prev_pair = pair;
            t += 2;
        }

        out[d] = (m * n) as f64 / tau.max(1e-8);
    }

    out
}

/// Computes the split-half potential scale reduction factor (R-hat) of each
/// parameter from samples of shape `[n_chains, n_steps, dim]`.
///
/// Each chain is split into halves, so a single chain that drifts from one
/// region to another is flagged just like two chains that disagree. Values
/// near one indicate the chains have mixed; chains shorter than four draws
/// give NaN.
pub fn potential_scale_reduction(samples: ArrayView3<f64>) -> Array1<f64> {
    let (m, n, dim) = samples.dim();
    let half = n / 2;
    let mut out = Array1::zeros(dim);
    if half < 2 {
        out.fill(f64::NAN);
        return out;
    }

    for d in 0..dim {
        let mut halves: Vec<ArrayView1<f64>> = Vec::with_capacity(2 * m);
        for c in 0..m {
            halves.push(samples.slice(s![c, ..half, d]));
            halves.push(samples.slice(s![c, n - half.., d]));
        }

        let n_half = half as f64;
        let n_halves = halves.len() as f64;
        let means: Vec<f64> = halves.iter().map(|h| h.mean().unwrap_or(0.0)).collect();
        let vars: Vec<f64> = halves
            .iter()
            .zip(&means)
            .map(|(h, mu)| h.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / (n_half - 1.0))
            .collect();

        let grand = means.iter().sum::<f64>() / n_halves;
        let b = means.iter().map(|mu| (mu - grand).powi(2)).sum::<f64>() * n_half
            / (n_halves - 1.0);
        let w = vars.iter().sum::<f64>() / n_halves;
        let var_plus = w * (n_half - 1.0) / n_half + b / n_half;

        out[d] = (var_plus / w).sqrt();
    }

    out
}

/// The largest split R-hat across all parameters.
///
/// Fails if the per-parameter values cannot be ordered, e.g. when a
/// degenerate chain produced NaN.
pub fn max_rhat(samples: ArrayView3<f64>) -> Result<f64> {
    let rhats = potential_scale_reduction(samples);
    let max = rhats
        .max()
        .map_err(|e| Error::Numerical(format!("cannot reduce split R-hat values: {e}")))?;
    Ok(*max)
}

/// A diagnostic finding worth surfacing to whoever launched the run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvergenceWarning {
    /// The split R-hat of a parameter exceeds [`RHAT_THRESHOLD`].
    HighRhat { parameter: usize, rhat: f64 },
    /// The effective sample size of a parameter is below [`ESS_FLOOR`].
    LowEss { parameter: usize, ess: f64 },
    /// A chain's acceptance rate sits outside the advisory band
    /// [`ACCEPT_RATE_LOW`]..[`ACCEPT_RATE_HIGH`].
    AcceptanceOutOfRange { chain: usize, rate: f64 },
}

impl fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvergenceWarning::HighRhat { parameter, rhat } => write!(
                f,
                "parameter {parameter}: split R-hat {rhat:.3} exceeds {RHAT_THRESHOLD}"
            ),
            ConvergenceWarning::LowEss { parameter, ess } => write!(
                f,
                "parameter {parameter}: effective sample size {ess:.1} below {ESS_FLOOR}"
            ),
            ConvergenceWarning::AcceptanceOutOfRange { chain, rate } => write!(
                f,
                "chain {chain}: acceptance rate {rate:.2} outside [{ACCEPT_RATE_LOW}, {ACCEPT_RATE_HIGH}]"
            ),
        }
    }
}

/// Flags every chain whose overall acceptance rate falls outside the
/// advisory 20-50% band. Tuning guidance only; nothing acts on these
/// mid-run.
pub fn acceptance_warnings(samples: ArrayView3<f64>) -> Vec<ConvergenceWarning> {
    let m = samples.shape()[0];
    (0..m)
        .filter_map(|chain| {
            let rate = acceptance_rate(samples.slice(s![chain, .., ..]));
            if rate < ACCEPT_RATE_LOW || rate > ACCEPT_RATE_HIGH {
                Some(ConvergenceWarning::AcceptanceOutOfRange { chain, rate })
            } else {
                None
            }
        })
        .collect()
}

/// Runs both convergence diagnostics and reports every parameter that fails
/// one. An empty result means the run looks usable.
pub fn check_convergence(samples: ArrayView3<f64>) -> Vec<ConvergenceWarning> {
    let rhats = potential_scale_reduction(samples);
    let esses = effective_sample_size(samples);

    let mut warnings = Vec::new();
    for (parameter, (&rhat, &ess)) in rhats.iter().zip(esses.iter()).enumerate() {
        // A NaN R-hat from a degenerate chain should warn, not pass.
        if !(rhat <= RHAT_THRESHOLD) {
            warnings.push(ConvergenceWarning::HighRhat { parameter, rhat });
        }
        if ess < ESS_FLOOR {
            warnings.push(ConvergenceWarning::LowEss { parameter, ess });
        }
    }
    warnings
}
