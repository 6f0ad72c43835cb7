//! Inferential statistics helpers: standard error, z-scores, confidence
//! intervals and a one-sample z-test.
//!
//! Critical values come from a fixed three-entry table
//! ([`ConfidenceLevel`]) rather than an inverse-CDF evaluation.
//!
//! # p-values
//!
//! [`PValueMethod::Simplified`] reproduces the classroom shortcut
//! `2·(1 − |z|)`. It is **not** a tail probability: it exceeds 1 near
//! `z = 0` and turns negative once `|z| > 1`. It stays the default so
//! worked answers keep matching. [`PValueMethod::NormalTail`] gives the
//! correct two-sided value `2·(1 − Φ(|z|))`.

use std::fmt;

use log::trace;

use crate::distributions::{Curve, Grid, Normal};
use crate::error::{Result, StatsError};
use crate::special;

/// Confidence levels with a tabulated two-sided critical value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfidenceLevel {
    Ninety,
    #[default]
    NinetyFive,
    NinetyNine,
}

impl ConfidenceLevel {
    /// z* for the level: 1.645, 1.96 or 2.576.
    pub fn critical_value(self) -> f64 {
        match self {
            Self::Ninety => 1.645,
            Self::NinetyFive => 1.96,
            Self::NinetyNine => 2.576,
        }
    }

    pub fn percent(self) -> u8 {
        match self {
            Self::Ninety => 90,
            Self::NinetyFive => 95,
            Self::NinetyNine => 99,
        }
    }
}

impl TryFrom<u8> for ConfidenceLevel {
    type Error = StatsError;

    fn try_from(percent: u8) -> Result<Self> {
        match percent {
            90 => Ok(Self::Ninety),
            95 => Ok(Self::NinetyFive),
            99 => Ok(Self::NinetyNine),
            other => Err(StatsError::InvalidParameter(format!(
                "no tabulated critical value for a {other}% confidence level (use 90, 95 or 99)"
            ))),
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Standard error of the mean, `σ / √n`.
///
/// # Errors
/// [`StatsError::InvalidParameter`] if `sample_size` is zero or `std_dev`
/// is negative or non-finite.
///
/// # Examples
/// ```
/// use u_statlab::inference::standard_error;
/// assert_eq!(standard_error(15.0, 25).unwrap(), 3.0);
/// ```
pub fn standard_error(std_dev: f64, sample_size: usize) -> Result<f64> {
    if sample_size == 0 {
        return Err(StatsError::InvalidParameter(
            "sample size must be at least 1".into(),
        ));
    }
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(StatsError::InvalidParameter(format!(
            "standard deviation must be finite and >= 0, got {std_dev}"
        )));
    }
    Ok(std_dev / (sample_size as f64).sqrt())
}

/// `(x̄ − μ₀) / se`.
///
/// # Errors
/// - [`StatsError::DivisionByZero`] if `standard_error == 0`
/// - [`StatsError::InvalidParameter`] if it is negative or non-finite
pub fn z_score(sample_mean: f64, population_mean: f64, standard_error: f64) -> Result<f64> {
    check_standard_error(standard_error)?;
    Ok((sample_mean - population_mean) / standard_error)
}

/// `critical_value · se`.
pub fn margin_of_error(standard_error: f64, critical_value: f64) -> f64 {
    critical_value * standard_error
}

/// A symmetric interval `center ± margin`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceInterval {
    center: f64,
    margin: f64,
}

impl ConfidenceInterval {
    pub fn lower(&self) -> f64 {
        self.center - self.margin
    }

    pub fn upper(&self) -> f64 {
        self.center + self.margin
    }

    /// The center the interval was built from, returned as stored.
    pub fn midpoint(&self) -> f64 {
        self.center
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn width(&self) -> f64 {
        2.0 * self.margin
    }

    /// Closed-interval membership.
    pub fn contains(&self, value: f64) -> bool {
        (self.lower()..=self.upper()).contains(&value)
    }
}

/// `mean ± critical_value · se`.
///
/// # Errors
/// [`StatsError::InvalidParameter`] if any argument is non-finite or
/// `standard_error` / `critical_value` is negative.
///
/// # Examples
/// ```
/// use u_statlab::inference::{confidence_interval, ConfidenceLevel};
/// let ci = confidence_interval(100.0, 3.0, ConfidenceLevel::NinetyFive.critical_value()).unwrap();
/// assert!((ci.lower() - 94.12).abs() < 1e-9);
/// assert!((ci.upper() - 105.88).abs() < 1e-9);
/// assert_eq!(ci.midpoint(), 100.0);
/// ```
pub fn confidence_interval(
    mean: f64,
    standard_error: f64,
    critical_value: f64,
) -> Result<ConfidenceInterval> {
    if !mean.is_finite() {
        return Err(StatsError::InvalidParameter(format!(
            "interval center must be finite, got {mean}"
        )));
    }
    for (name, v) in [("standard error", standard_error), ("critical value", critical_value)] {
        if !v.is_finite() || v < 0.0 {
            return Err(StatsError::InvalidParameter(format!(
                "{name} must be finite and >= 0, got {v}"
            )));
        }
    }
    Ok(ConfidenceInterval {
        center: mean,
        margin: margin_of_error(standard_error, critical_value),
    })
}

/// How [`p_value`] turns a z-score into a two-sided p-value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PValueMethod {
    /// `2·(1 − |z|)`; not a probability, see the module docs.
    #[default]
    Simplified,
    /// `2·(1 − Φ(|z|))`.
    NormalTail,
}

/// Two-sided p-value for `z` under `method`.
pub fn p_value(z: f64, method: PValueMethod) -> f64 {
    match method {
        PValueMethod::Simplified => 2.0 * (1.0 - z.abs()),
        PValueMethod::NormalTail => 2.0 * (1.0 - special::standard_normal_cdf(z.abs())),
    }
}

/// Inputs to a one-sample z-test with known population σ.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZTestInput {
    pub sample_mean: f64,
    pub population_mean: f64,
    pub population_std_dev: f64,
    pub sample_size: usize,
    /// α; the null is rejected when `p < α`.
    pub significance_level: f64,
}

impl Default for ZTestInput {
    fn default() -> Self {
        Self {
            sample_mean: 52.0,
            population_mean: 50.0,
            population_std_dev: 10.0,
            sample_size: 30,
            significance_level: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZTestOutcome {
    pub standard_error: f64,
    pub z_score: f64,
    pub p_value: f64,
    pub reject_null: bool,
}

impl ZTestOutcome {
    /// Whether `x` lies further from `population_mean` (in standard
    /// errors) than the observed statistic.
    pub fn in_rejection_region(&self, x: f64, population_mean: f64) -> bool {
        (x - population_mean).abs() / self.standard_error > self.z_score.abs()
    }
}

/// One-sample z-test.
///
/// # Errors
/// - [`StatsError::InvalidParameter`] for a zero sample size, a negative
///   σ, or α outside `(0, 1)`
/// - [`StatsError::DivisionByZero`] when σ is zero
pub fn z_test(input: &ZTestInput, method: PValueMethod) -> Result<ZTestOutcome> {
    let alpha = input.significance_level;
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(StatsError::InvalidParameter(format!(
            "significance level must lie in (0, 1), got {alpha}"
        )));
    }
    let se = standard_error(input.population_std_dev, input.sample_size)?;
    let z = z_score(input.sample_mean, input.population_mean, se)?;
    let p = p_value(z, method);
    trace!("z-test: se = {se}, z = {z}, p = {p} ({method:?})");
    Ok(ZTestOutcome {
        standard_error: se,
        z_score: z,
        p_value: p,
        reject_null: p < alpha,
    })
}

/// N(center, se²) sampled over `center ± 4·se` in steps of `se / 10`,
/// the curve drawn behind an interval or a test statistic.
///
/// # Errors
/// [`StatsError::InvalidParameter`] unless `center` is finite and
/// `standard_error` is finite and > 0.
pub fn sampling_distribution_curve(center: f64, standard_error: f64) -> Result<Curve<Normal>> {
    let normal = Normal::new(center, standard_error)?;
    let reach = 4.0 * standard_error;
    let grid = Grid::new(center - reach, center + reach, standard_error / 10.0)?;
    Ok(grid.curve(normal))
}

fn check_standard_error(se: f64) -> Result<()> {
    if se == 0.0 {
        return Err(StatsError::DivisionByZero("standard error is zero".into()));
    }
    if !se.is_finite() || se < 0.0 {
        return Err(StatsError::InvalidParameter(format!(
            "standard error must be finite and > 0, got {se}"
        )));
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn interval_midpoint_is_mean(
            mean in -1e6_f64..1e6,
            se in 0.0_f64..1e3,
            crit in 0.0_f64..5.0,
        ) {
            let ci = confidence_interval(mean, se, crit).unwrap();
            prop_assert_eq!(ci.midpoint(), mean);
            prop_assert!(ci.lower() <= ci.upper());
            prop_assert!(ci.contains(mean));
        }

        #[test]
        fn normal_tail_p_value_is_probability(z in -10.0_f64..10.0) {
            let p = p_value(z, PValueMethod::NormalTail);
            prop_assert!((0.0..=1.0 + 1e-9).contains(&p));
        }

        #[test]
        fn z_score_sign_follows_difference(
            x in -100.0_f64..100.0,
            mu in -100.0_f64..100.0,
            se in 0.01_f64..10.0,
        ) {
            let z = z_score(x, mu, se).unwrap();
            prop_assert_eq!(z >= 0.0, x >= mu);
        }
    }
}
