//! Bayesian updating.
//!
//! Two forms are covered:
//!
//! - **Bayes' rule** for a binary hypothesis `A` and evidence `B`:
//!   `P(A|B) = P(B|A)·P(A) / P(B)` with the marginal
//!   `P(B) = P(B|A)·P(A) + P(B|¬A)·(1 − P(A))`.
//! - **Beta–Binomial conjugacy**: a Beta(α, β) prior updated with `s`
//!   successes and `f` failures is exactly Beta(α + s, β + f).

use log::trace;

use crate::distributions::{Beta, Curve, Grid};
use crate::error::{Result, StatsError};

/// Inputs to Bayes' rule, each a probability in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "EvidenceParams")
)]
pub struct BayesEvidence {
    prior: f64,
    likelihood_given_hypothesis: f64,
    likelihood_given_not_hypothesis: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EvidenceParams {
    prior: f64,
    likelihood_given_hypothesis: f64,
    likelihood_given_not_hypothesis: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<EvidenceParams> for BayesEvidence {
    type Error = StatsError;

    fn try_from(p: EvidenceParams) -> Result<Self> {
        Self::new(
            p.prior,
            p.likelihood_given_hypothesis,
            p.likelihood_given_not_hypothesis,
        )
    }
}

impl BayesEvidence {
    /// # Errors
    /// [`StatsError::InvalidParameter`] if any argument is outside `[0, 1]`.
    pub fn new(
        prior: f64,
        likelihood_given_hypothesis: f64,
        likelihood_given_not_hypothesis: f64,
    ) -> Result<Self> {
        check_probability("P(A)", prior)?;
        check_probability("P(B|A)", likelihood_given_hypothesis)?;
        check_probability("P(B|¬A)", likelihood_given_not_hypothesis)?;
        Ok(Self {
            prior,
            likelihood_given_hypothesis,
            likelihood_given_not_hypothesis,
        })
    }

    pub fn prior(&self) -> f64 {
        self.prior
    }

    pub fn likelihood_given_hypothesis(&self) -> f64 {
        self.likelihood_given_hypothesis
    }

    pub fn likelihood_given_not_hypothesis(&self) -> f64 {
        self.likelihood_given_not_hypothesis
    }

    /// Marginal probability of the evidence, `P(B)`.
    pub fn marginal(&self) -> f64 {
        self.likelihood_given_hypothesis * self.prior
            + self.likelihood_given_not_hypothesis * (1.0 - self.prior)
    }

    /// Every quantity the Bayes' theorem calculator displays.
    ///
    /// # Errors
    /// [`StatsError::DivisionByZero`] when `P(B) = 0`.
    pub fn breakdown(&self) -> Result<BayesBreakdown> {
        let marginal = self.marginal();
        if marginal == 0.0 {
            return Err(StatsError::DivisionByZero(
                "marginal likelihood P(B) is zero".into(),
            ));
        }
        let posterior = self.likelihood_given_hypothesis * self.prior / marginal;
        trace!("P(B) = {marginal}, P(A|B) = {posterior}");
        Ok(BayesBreakdown {
            prior: self.prior,
            prior_complement: 1.0 - self.prior,
            marginal,
            posterior,
        })
    }
}

/// Terms of one Bayes' rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BayesBreakdown {
    /// P(A)
    pub prior: f64,
    /// P(¬A)
    pub prior_complement: f64,
    /// P(B)
    pub marginal: f64,
    /// P(A|B)
    pub posterior: f64,
}

/// Posterior probability `P(A|B)`.
///
/// # Errors
/// [`StatsError::DivisionByZero`] when the evidence has zero marginal probability.
///
/// # Examples
/// ```
/// use u_statlab::bayes::{posterior, BayesEvidence};
/// // 1% prevalence, 95% sensitivity, 10% false-positive rate
/// let evidence = BayesEvidence::new(0.01, 0.95, 0.10).unwrap();
/// let p = posterior(&evidence).unwrap();
/// assert!((p - 0.0876).abs() < 1e-3);
/// ```
pub fn posterior(evidence: &BayesEvidence) -> Result<f64> {
    evidence.breakdown().map(|b| b.posterior)
}

/// Shape parameters of a Beta distribution produced by an update.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BetaParams {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaParams {
    /// Posterior mean α / (α + β).
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn distribution(&self) -> Result<Beta> {
        Beta::new(self.alpha, self.beta)
    }

    /// The unnormalized kernel over `[0, 1]` at `points` evenly spaced x values.
    pub fn kernel_curve(&self, points: usize) -> Result<Curve<Beta>> {
        let beta = self.distribution()?;
        Ok(Grid::with_points(0.0, 1.0, points)?.curve(beta))
    }
}

impl From<BetaParams> for (f64, f64) {
    fn from(p: BetaParams) -> Self {
        (p.alpha, p.beta)
    }
}

/// Conjugate Beta–Binomial update: `(α + successes, β + failures)`.
///
/// # Errors
/// [`StatsError::InvalidParameter`] unless both prior shapes are finite and > 0.
///
/// # Examples
/// ```
/// use u_statlab::bayes::beta_binomial_update;
/// let post = beta_binomial_update(2.0, 2.0, 7, 3).unwrap();
/// assert_eq!((post.alpha, post.beta), (9.0, 5.0));
/// ```
pub fn beta_binomial_update(
    prior_alpha: f64,
    prior_beta: f64,
    successes: u64,
    failures: u64,
) -> Result<BetaParams> {
    Beta::new(prior_alpha, prior_beta)?;
    Ok(BetaParams {
        alpha: prior_alpha + successes as f64,
        beta: prior_beta + failures as f64,
    })
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(StatsError::InvalidParameter(format!(
            "{name} must lie in [0, 1], got {p}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_medical_test_example() {
        let e = BayesEvidence::new(0.01, 0.95, 0.10).unwrap();
        let b = e.breakdown().unwrap();
        assert_abs_diff_eq!(b.marginal, 0.1085, epsilon = 1e-12);
        assert_abs_diff_eq!(b.posterior, 0.0095 / 0.1085, epsilon = 1e-12);
        assert_abs_diff_eq!(b.posterior, 0.0876, epsilon = 1e-3);
        assert_abs_diff_eq!(b.prior_complement, 0.99, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_marginal_is_reported() {
        let e = BayesEvidence::new(0.0, 0.9, 0.0).unwrap();
        assert!(matches!(posterior(&e), Err(StatsError::DivisionByZero(_))));
    }

    #[test]
    fn test_certain_prior() {
        let e = BayesEvidence::new(1.0, 0.3, 0.8).unwrap();
        assert_eq!(posterior(&e).unwrap(), 1.0);
    }

    #[test]
    fn test_evidence_validation() {
        assert!(BayesEvidence::new(-0.1, 0.5, 0.5).is_err());
        assert!(BayesEvidence::new(0.5, 1.1, 0.5).is_err());
        assert!(BayesEvidence::new(0.5, 0.5, f64::NAN).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_probabilities() {
        let ok = r#"{"prior": 0.01, "likelihood_given_hypothesis": 0.95, "likelihood_given_not_hypothesis": 0.1}"#;
        let e: BayesEvidence = serde_json::from_str(ok).unwrap();
        assert_eq!(e, BayesEvidence::new(0.01, 0.95, 0.10).unwrap());
        let bad = r#"{"prior": 1.5, "likelihood_given_hypothesis": 0.95, "likelihood_given_not_hypothesis": 0.1}"#;
        assert!(serde_json::from_str::<BayesEvidence>(bad).is_err());
    }

    #[test]
    fn test_beta_binomial_update() {
        let post = beta_binomial_update(2.0, 2.0, 7, 3).unwrap();
        assert_eq!(<(f64, f64)>::from(post), (9.0, 5.0));
        assert_abs_diff_eq!(post.mean(), 9.0 / 14.0, epsilon = 1e-15);
    }

    #[test]
    fn test_beta_binomial_no_data() {
        let post = beta_binomial_update(1.5, 4.0, 0, 0).unwrap();
        assert_eq!((post.alpha, post.beta), (1.5, 4.0));
    }

    #[test]
    fn test_beta_binomial_rejects_bad_prior() {
        assert!(beta_binomial_update(0.0, 1.0, 1, 1).is_err());
        assert!(beta_binomial_update(1.0, -1.0, 1, 1).is_err());
    }

    #[test]
    fn test_kernel_curve() {
        let post = beta_binomial_update(1.0, 1.0, 1, 1).unwrap();
        let curve: Vec<_> = post.kernel_curve(101).unwrap().collect();
        assert_eq!(curve.len(), 101);
        // Beta(2, 2) kernel peaks at 0.5
        let peak = curve
            .iter()
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap();
        assert_abs_diff_eq!(peak.x, 0.5, epsilon = 1e-12);
    }
}
