//! # u-statlab
//!
//! Numerical core for an interactive statistics and machine-learning course.
//!
//! Every lesson widget hands its parameters to one function here and renders
//! the value that comes back. Nothing in this crate draws, stores state, or
//! performs I/O.
//!
//! ## Modules
//!
//! - [`stats`] — Descriptive statistics and histogram density binning
//! - [`distributions`] — Normal, Beta, Exponential and Uniform densities, density grids
//! - [`bayes`] — Bayes' rule and the Beta–Binomial conjugate update
//! - [`probability`] — Conditional probabilities from counts, coin-flip tallies
//! - [`regression`] — Simple and multiple least squares, the logistic curve
//! - [`mcmc`] — Random-walk Metropolis–Hastings on a normal target
//! - [`inference`] — Standard error, z-scores, confidence intervals, z-tests
//! - [`synthetic`] — Seeded demo datasets
//! - [`special`] — Normal CDF and inverse, ln Γ, ln B
//! - [`random`] — Seeded generator construction
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   Kahan summation for accumulation, log-space acceptance ratios
//! - **Fail fast**: invalid input yields a [`StatsError`], never NaN
//! - **Injectable randomness**: every stochastic routine takes `&mut impl Rng`
//! - **Property-based testing**: Mathematical invariants verified via proptest

pub mod bayes;
pub mod distributions;
pub mod error;
pub mod inference;
pub mod mcmc;
pub mod probability;
pub mod random;
pub mod regression;
pub mod special;
pub mod stats;
pub mod synthetic;

pub use error::{Result, StatsError};
