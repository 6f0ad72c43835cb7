//! Error taxonomy shared by every computation in the crate.
//!
//! Each function validates its inputs up front and returns a
//! [`StatsError`] instead of letting NaN or ±∞ leak to the caller.
//! Errors are scoped to a single call; nothing is retried.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Failure modes of the statistical routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The operation needs at least `required` observations.
    #[error("need at least {required} observation(s), got {actual}")]
    EmptyInput { required: usize, actual: usize },

    /// A parameter violates a domain constraint (σ ≤ 0, n = 0, p ∉ [0, 1], ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mathematically singular input, e.g. identical x values in a fit.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A denominator in a probability computation evaluated to zero.
    #[error("division by zero: {0}")]
    DivisionByZero(String),
}

impl StatsError {
    pub(crate) fn empty(required: usize, actual: usize) -> Self {
        StatsError::EmptyInput { required, actual }
    }
}

/// Rejects slices containing NaN or ±∞.
pub(crate) fn ensure_finite(data: &[f64], what: &str) -> Result<()> {
    match data.iter().position(|x| !x.is_finite()) {
        Some(i) => Err(StatsError::InvalidParameter(format!(
            "{what} must be finite, found {} at index {i}",
            data[i]
        ))),
        None => Ok(()),
    }
}
