/*!
Prior families for regression parameters, plus the target and proposal
traits the Metropolis-Hastings sampler is generic over.

Priors form the closed sum type [`Prior`]; each variant carries its own
hyperparameters and knows its log-density, its support, and how to draw from
itself. A parameter value outside a prior's support has log-density negative
infinity, which is how hard constraints (like a positive noise variance) are
enforced: the sampler rejects any such candidate outright.

# Examples

```rust
use mpg_mcmc::distributions::{Prior, Proposal, RandomWalkProposal};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let prior = Prior::Normal { mean: 0.0, std: 10.0 };
assert!(prior.log_density(1.5).is_finite());

let sigma2_prior = Prior::InverseGamma { shape: 3.0, scale: 10.0 };
assert_eq!(sigma2_prior.log_density(-1.0), f64::NEG_INFINITY);

let proposal = RandomWalkProposal::new(vec![0.5, 0.5])?;
let mut rng = SmallRng::seed_from_u64(42);
let candidate = proposal.propose(&[0.0, 0.0], &mut rng);
assert_eq!(candidate.len(), 2);
# Ok::<(), mpg_mcmc::error::Error>(())
```
*/

use rand::rngs::SmallRng;
use rand::Rng;
use rand_distr::{Cauchy, Distribution, Gamma, Normal};
use std::f64::consts::{LN_2, PI};

use crate::error::{Error, Result};
use crate::stats::{ACCEPT_RATE_HIGH, ACCEPT_RATE_LOW};

/// ln(2*pi), shared by the Normal prior and the Gaussian likelihood.
pub(crate) const LN_2PI: f64 = 1.8378770664093453;

/**
A prior distribution over a single regression parameter.

The set of families is closed on purpose: the model works with exactly these
four, and each carries its hyperparameters inline.

# Examples

```rust
use mpg_mcmc::distributions::Prior;

let prior = Prior::Uniform { low: -1.0, high: 3.0 };
assert!(prior.supports(0.0));
assert!(!prior.supports(5.0));
assert_eq!(prior.log_density(5.0), f64::NEG_INFINITY);
```
*/
#[derive(Debug, Clone, PartialEq)]
pub enum Prior {
    /// Gaussian with the given mean and standard deviation.
    Normal { mean: f64, std: f64 },
    /// Inverse-gamma with the given shape and scale; support is `x > 0`.
    InverseGamma { shape: f64, scale: f64 },
    /// Half-Cauchy with the given scale; support is `x >= 0`.
    HalfCauchy { scale: f64 },
    /// Uniform over the closed interval `[low, high]`.
    Uniform { low: f64, high: f64 },
}

impl Prior {
    /// Checks the hyperparameters, returning [`Error::Config`] on failure.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Prior::Normal { mean, std } => {
                if !mean.is_finite() || !std.is_finite() || std <= 0.0 {
                    return Err(Error::Config(format!(
                        "normal prior needs finite mean and std > 0, got mean={mean}, std={std}"
                    )));
                }
            }
            Prior::InverseGamma { shape, scale } => {
                if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
                    return Err(Error::Config(format!(
                        "inverse-gamma prior needs shape > 0 and scale > 0, got shape={shape}, scale={scale}"
                    )));
                }
            }
            Prior::HalfCauchy { scale } => {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(Error::Config(format!(
                        "half-cauchy prior needs scale > 0, got scale={scale}"
                    )));
                }
            }
            Prior::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(Error::Config(format!(
                        "uniform prior needs finite low < high, got low={low}, high={high}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether `x` lies inside this prior's support.
    pub fn supports(&self, x: f64) -> bool {
        if !x.is_finite() {
            return false;
        }
        match *self {
            Prior::Normal { .. } => true,
            Prior::InverseGamma { .. } => x > 0.0,
            Prior::HalfCauchy { .. } => x >= 0.0,
            Prior::Uniform { low, high } => low <= x && x <= high,
        }
    }

    /// Fully normalized log-density at `x`; negative infinity outside the
    /// support.
    pub fn log_density(&self, x: f64) -> f64 {
        if !self.supports(x) {
            return f64::NEG_INFINITY;
        }
        match *self {
            Prior::Normal { mean, std } => {
                let z = (x - mean) / std;
                -0.5 * LN_2PI - std.ln() - 0.5 * z * z
            }
            Prior::InverseGamma { shape, scale } => {
                shape * scale.ln() - ln_gamma(shape) - (shape + 1.0) * x.ln() - scale / x
            }
            Prior::HalfCauchy { scale } => {
                let z = x / scale;
                LN_2 - PI.ln() - scale.ln() - (1.0 + z * z).ln()
            }
            Prior::Uniform { low, high } => -(high - low).ln(),
        }
    }

    /// Draws one value from this prior.
    ///
    /// Assumes the hyperparameters have been validated.
    pub fn sample(&self, rng: &mut SmallRng) -> f64 {
        match *self {
            Prior::Normal { mean, std } => Normal::new(mean, std)
                .expect("Expecting creation of normal distribution to succeed.")
                .sample(rng),
            Prior::InverseGamma { shape, scale } => {
                // If X ~ Gamma(shape, 1/scale) then 1/X ~ InverseGamma(shape, scale).
                let gamma = Gamma::new(shape, 1.0 / scale)
                    .expect("Expecting creation of gamma distribution to succeed.");
                1.0 / gamma.sample(rng)
            }
            Prior::HalfCauchy { scale } => Cauchy::new(0.0, scale)
                .expect("Expecting creation of cauchy distribution to succeed.")
                .sample(rng)
                .abs(),
            Prior::Uniform { low, high } => rng.gen_range(low..high),
        }
    }
}

/// Log-gamma via Lanczos approximation (g=7, n=9 coefficients).
#[allow(clippy::excessive_precision)]
fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        PI.ln() - (PI * x).sin().abs().ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut series = COEFFS[0];
        for (i, &c) in COEFFS[1..].iter().enumerate() {
            series += c / (x + i as f64 + 1.0);
        }
        let t = x + 7.5;
        0.5 * LN_2PI + (x + 0.5) * t.ln() - t + series.ln()
    }
}

/// The distribution a sampler draws from, up to a normalizing constant.
///
/// `Ok(f64::NEG_INFINITY)` marks a state outside the support (zero posterior
/// density); an `Err` marks an evaluation that failed numerically. The
/// sampler rejects both kinds of candidate, but an `Err` at initialization
/// is fatal.
pub trait Target {
    /// The number of parameters in a state vector.
    fn dim(&self) -> usize;

    /// Evaluates the unnormalized log-posterior at `theta`.
    fn log_posterior(&self, theta: &[f64]) -> Result<f64>;
}

/// A transition kernel proposing candidate states for Metropolis-Hastings.
///
/// Proposals draw from the chain's own random number generator; they hold no
/// randomness of their own.
pub trait Proposal {
    /// The state dimension this proposal is built for, if it has one.
    ///
    /// The sampler refuses to pair a proposal with a target of a different
    /// dimension. `None` (the default) opts out of that check.
    fn dim(&self) -> Option<usize> {
        None
    }

    /// Draws a candidate state given the current one.
    fn propose(&self, current: &[f64], rng: &mut SmallRng) -> Vec<f64>;

    /// The Hastings term `log q(current | candidate) - log q(candidate | current)`.
    ///
    /// Symmetric proposals return `0.0`. The sampler always adds this term,
    /// so swapping in an asymmetric proposal keeps the acceptance rule exact.
    fn log_correction(&self, current: &[f64], candidate: &[f64]) -> f64;

    /// Step-size tuning hook, fed the trailing acceptance rate.
    ///
    /// Only invoked during a chain's burn-in phase; the default does nothing.
    fn adapt(&mut self, _accept_rate: f64) {}
}

/**
A symmetric random-walk proposal: independent Gaussian perturbations with a
separate step size per parameter.

# Examples

```rust
use mpg_mcmc::distributions::{Proposal, RandomWalkProposal};

let proposal = RandomWalkProposal::new(vec![0.25, 0.0002, 0.4])?;
assert_eq!(proposal.dim(), Some(3));
assert_eq!(proposal.log_correction(&[0.0; 3], &[1.0; 3]), 0.0);
# Ok::<(), mpg_mcmc::error::Error>(())
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct RandomWalkProposal {
    step_sizes: Vec<f64>,
}

impl RandomWalkProposal {
    /// Creates a proposal with one positive, finite step size per parameter.
    pub fn new(step_sizes: Vec<f64>) -> Result<Self> {
        if step_sizes.is_empty() {
            return Err(Error::Config("need at least one step size".to_string()));
        }
        if step_sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::Config(format!(
                "step sizes must be positive and finite, got {step_sizes:?}"
            )));
        }
        Ok(Self { step_sizes })
    }

    /// The current per-parameter step sizes.
    pub fn step_sizes(&self) -> &[f64] {
        &self.step_sizes
    }
}

impl Proposal for RandomWalkProposal {
    fn dim(&self) -> Option<usize> {
        Some(self.step_sizes.len())
    }

    fn propose(&self, current: &[f64], rng: &mut SmallRng) -> Vec<f64> {
        let normal = Normal::new(0.0, 1.0)
            .expect("Expecting creation of normal distribution to succeed.");
        current
            .iter()
            .zip(&self.step_sizes)
            .map(|(&x, &step)| x + step * normal.sample(rng))
            .collect()
    }

    fn log_correction(&self, _current: &[f64], _candidate: &[f64]) -> f64 {
        // Gaussian perturbations are symmetric.
        0.0
    }

    fn adapt(&mut self, accept_rate: f64) {
        let factor = if accept_rate < ACCEPT_RATE_LOW {
            0.9
        } else if accept_rate > ACCEPT_RATE_HIGH {
            1.1
        } else {
            return;
        };
        for step in &mut self.step_sizes {
            *step *= factor;
        }
    }
}
