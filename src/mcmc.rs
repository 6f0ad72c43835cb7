//! Random-walk Metropolis–Hastings on a one-dimensional normal target.
//!
//! Each run is a pure function of its [`McmcConfig`] and the random
//! source handed to [`MetropolisHastings::run`]:
//!
//! 1. start at `x = 0`
//! 2. propose `x' = x + U(−h, h)`
//! 3. accept with probability `min(1, π(x')/π(x))`, otherwise stay at `x`
//! 4. record `x` once the iteration index reaches `burn_in`
//!
//! π is the unnormalized N(μ, σ²) density; the ratio is evaluated as
//! `exp(ln π(x') − ln π(x))` so a chain started far in the tail never
//! computes 0/0.
//!
//! The chain is inherently sequential. Independent chains can run in
//! parallel, each with its own generator.

use log::debug;
use rand::Rng;

use crate::distributions::Normal;
use crate::error::{Result, StatsError};
use crate::random;

/// Lag cap for the autocorrelation sum in [`McmcTrace::effective_sample_size`].
const MAX_ESS_LAG: usize = 50;

/// Autocorrelations below this end the ESS sum.
const ESS_RHO_CUTOFF: f64 = 0.05;

/// Parameters of one sampler run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "McmcConfigParams")
)]
pub struct McmcConfig {
    iterations: usize,
    burn_in: usize,
    target: Normal,
    proposal_half_width: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct McmcConfigParams {
    iterations: usize,
    burn_in: usize,
    target: Normal,
    proposal_half_width: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<McmcConfigParams> for McmcConfig {
    type Error = StatsError;

    fn try_from(p: McmcConfigParams) -> Result<Self> {
        Self::new(p.iterations, p.burn_in, p.target.mean(), p.target.std_dev())?
            .with_proposal_half_width(p.proposal_half_width)
    }
}

impl Default for McmcConfig {
    /// 10 000 iterations, 1 000 burn-in, N(0, 1), U(−1, 1) proposals.
    fn default() -> Self {
        Self {
            iterations: 10_000,
            burn_in: 1_000,
            target: Normal::standard(),
            proposal_half_width: 1.0,
        }
    }
}

impl McmcConfig {
    /// # Errors
    /// [`StatsError::InvalidParameter`] unless the target mean is finite
    /// and the target standard deviation is finite and > 0.
    ///
    /// `burn_in` may exceed `iterations`; the run then records nothing.
    pub fn new(
        iterations: usize,
        burn_in: usize,
        target_mean: f64,
        target_std_dev: f64,
    ) -> Result<Self> {
        Ok(Self {
            iterations,
            burn_in,
            target: Normal::new(target_mean, target_std_dev)?,
            proposal_half_width: 1.0,
        })
    }

    pub fn with_iterations(self, iterations: usize) -> Self {
        Self { iterations, ..self }
    }

    pub fn with_burn_in(self, burn_in: usize) -> Self {
        Self { burn_in, ..self }
    }

    /// Half-width `h` of the `U(−h, h)` random-walk step.
    ///
    /// # Errors
    /// [`StatsError::InvalidParameter`] unless `h` is finite and > 0.
    pub fn with_proposal_half_width(self, proposal_half_width: f64) -> Result<Self> {
        if !proposal_half_width.is_finite() || proposal_half_width <= 0.0 {
            return Err(StatsError::InvalidParameter(format!(
                "proposal half-width must be > 0, got {proposal_half_width}"
            )));
        }
        Ok(Self {
            proposal_half_width,
            ..self
        })
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn burn_in(&self) -> usize {
        self.burn_in
    }

    pub fn target_mean(&self) -> f64 {
        self.target.mean()
    }

    pub fn target_std_dev(&self) -> f64 {
        self.target.std_dev()
    }

    pub fn proposal_half_width(&self) -> f64 {
        self.proposal_half_width
    }

    /// Number of states a run records, `iterations − burn_in` (or zero).
    pub fn kept(&self) -> usize {
        self.iterations.saturating_sub(self.burn_in)
    }
}

/// Post-burn-in states of one run plus acceptance bookkeeping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct McmcTrace {
    samples: Vec<f64>,
    accepted: usize,
    iterations: usize,
}

impl McmcTrace {
    /// Recorded states in chain order; a rejected proposal repeats the
    /// previous state.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Accepted proposals over the whole run, burn-in included.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// `accepted / iterations`; `None` for a zero-iteration run.
    pub fn acceptance_rate(&self) -> Option<f64> {
        (self.iterations > 0).then(|| self.accepted as f64 / self.iterations as f64)
    }

    /// Mean of the recorded states.
    pub fn mean(&self) -> Result<f64> {
        crate::stats::mean(&self.samples)
    }

    /// Effective sample size `N / (1 + 2 Σ ρ_k)`.
    ///
    /// The sum runs over lags 1..=min(50, N/2) and stops at the first
    /// autocorrelation below 0.05. A constant chain counts as independent.
    pub fn effective_sample_size(&self) -> f64 {
        let n = self.samples.len();
        if n < 2 {
            return n as f64;
        }
        let nf = n as f64;
        let mean = self.samples.iter().sum::<f64>() / nf;
        let var = self.samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / nf;
        if var < 1e-12 {
            return nf;
        }

        let mut sum_rho = 0.0;
        for k in 1..=MAX_ESS_LAG.min(n / 2) {
            let cov = self.samples[..n - k]
                .iter()
                .zip(&self.samples[k..])
                .map(|(a, b)| (a - mean) * (b - mean))
                .sum::<f64>()
                / (n - k) as f64;
            let rho = cov / var;
            if rho < ESS_RHO_CUTOFF {
                break;
            }
            sum_rho += rho;
        }
        nf / (1.0 + 2.0 * sum_rho)
    }
}

/// The sampler itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetropolisHastings {
    config: McmcConfig,
}

impl MetropolisHastings {
    pub fn new(config: McmcConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &McmcConfig {
        &self.config
    }

    /// Runs the chain, drawing two uniforms per iteration from `rng`
    /// (proposal, then acceptance).
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> McmcTrace {
        let cfg = &self.config;
        let mut samples = Vec::with_capacity(cfg.kept());
        let mut accepted = 0usize;
        let mut x = 0.0_f64;
        let mut log_px = cfg.target.log_kernel(x);

        for i in 0..cfg.iterations {
            let proposal = x + random::symmetric_uniform(rng, cfg.proposal_half_width);
            let log_pp = cfg.target.log_kernel(proposal);
            let acceptance = (log_pp - log_px).exp().min(1.0);
            let u: f64 = rng.random();
            if u < acceptance {
                x = proposal;
                log_px = log_pp;
                accepted += 1;
            }
            if i >= cfg.burn_in {
                samples.push(x);
            }
        }

        let trace = McmcTrace {
            samples,
            accepted,
            iterations: cfg.iterations,
        };
        debug!(
            "Metropolis-Hastings: {} iterations, {} kept, acceptance rate {:?}",
            cfg.iterations,
            trace.len(),
            trace.acceptance_rate()
        );
        trace
    }

    /// [`run`](Self::run) with a generator from [`random::create_rng`].
    pub fn run_seeded(&self, seed: u64) -> McmcTrace {
        self.run(&mut random::create_rng(seed))
    }
}

/// Convenience wrapper: build the sampler and run it once.
///
/// # Examples
/// ```
/// use u_statlab::mcmc::{sample, McmcConfig};
/// use u_statlab::random::create_rng;
/// let config = McmcConfig::new(2_000, 500, 3.0, 1.0).unwrap();
/// let trace = sample(&config, &mut create_rng(42));
/// assert_eq!(trace.len(), 1_500);
/// ```
pub fn sample<R: Rng + ?Sized>(config: &McmcConfig, rng: &mut R) -> McmcTrace {
    MetropolisHastings::new(*config).run(rng)
}
