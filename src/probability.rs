//! Elementary probability: conditional probabilities from a two-way
//! count table and a coin-flip tally driven by an injectable RNG.

use rand::Rng;

use crate::error::{Result, StatsError};
use crate::random;

/// Counts over a population for two events `A` and `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContingencyCounts {
    pub total: u64,
    /// Members with `A`.
    pub a: u64,
    /// Members with `B`.
    pub b: u64,
    /// Members with both `A` and `B`.
    pub both: u64,
}

/// Marginal, joint and conditional probabilities of `A` and `B`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalProbabilities {
    pub p_a: f64,
    pub p_b: f64,
    pub p_both: f64,
    /// P(A|B) = |A∩B| / |B|
    pub p_a_given_b: f64,
    /// P(B|A) = |A∩B| / |A|
    pub p_b_given_a: f64,
}

impl ContingencyCounts {
    /// # Errors
    /// - [`StatsError::DivisionByZero`] if `total`, `a` or `b` is zero
    /// - [`StatsError::InvalidParameter`] if the counts are inconsistent
    ///   (`a` or `b` above `total`, `both` above `a` or `b`)
    ///
    /// # Examples
    /// ```
    /// use u_statlab::probability::ContingencyCounts;
    /// let counts = ContingencyCounts { total: 100, a: 60, b: 50, both: 30 };
    /// let p = counts.conditional_probabilities().unwrap();
    /// assert_eq!(p.p_a_given_b, 0.6);
    /// assert_eq!(p.p_b_given_a, 0.5);
    /// ```
    pub fn conditional_probabilities(&self) -> Result<ConditionalProbabilities> {
        if self.a > self.total || self.b > self.total {
            return Err(StatsError::InvalidParameter(format!(
                "event counts ({}, {}) exceed the total {}",
                self.a, self.b, self.total
            )));
        }
        if self.both > self.a.min(self.b) {
            return Err(StatsError::InvalidParameter(format!(
                "joint count {} exceeds a marginal count ({}, {})",
                self.both, self.a, self.b
            )));
        }
        let ratio = |num: u64, den: u64, what: &str| {
            if den == 0 {
                Err(StatsError::DivisionByZero(format!("{what} has zero members")))
            } else {
                Ok(num as f64 / den as f64)
            }
        };
        Ok(ConditionalProbabilities {
            p_a: ratio(self.a, self.total, "population")?,
            p_b: ratio(self.b, self.total, "population")?,
            p_both: ratio(self.both, self.total, "population")?,
            p_a_given_b: ratio(self.both, self.b, "event B")?,
            p_b_given_a: ratio(self.both, self.a, "event A")?,
        })
    }
}

/// Running heads/tails counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoinTally {
    pub heads: u64,
    pub tails: u64,
}

impl CoinTally {
    pub fn flips(&self) -> u64 {
        self.heads + self.tails
    }

    /// Empirical P(heads); `None` before the first flip.
    pub fn heads_fraction(&self) -> Option<f64> {
        match self.flips() {
            0 => None,
            n => Some(self.heads as f64 / n as f64),
        }
    }

    /// Returns a new tally with one more flip recorded.
    pub fn record(self, heads: bool) -> Self {
        if heads {
            Self {
                heads: self.heads + 1,
                ..self
            }
        } else {
            Self {
                tails: self.tails + 1,
                ..self
            }
        }
    }
}

/// Flips a fair coin `flips` times.
pub fn flip_coins<R: Rng + ?Sized>(flips: u64, rng: &mut R) -> CoinTally {
    (0..flips).fold(CoinTally::default(), |tally, _| {
        tally.record(random::bernoulli(rng, 0.5))
    })
}
