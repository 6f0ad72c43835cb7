//! Synthetic datasets for the interactive lessons.
//!
//! Every generator draws from the caller's [`Rng`], so a seeded
//! generator from [`crate::random::create_rng`] reproduces a dataset
//! exactly.

use log::trace;
use rand::Rng;

use crate::error::{Result, StatsError};
use crate::random;
use crate::regression::LogisticModel;

/// Upper bound of each predictor in [`multiple_dataset`].
const PREDICTOR_MAX: f64 = 10.0;

/// Logistic inputs are drawn from `U(−5, 5)`.
const LOGISTIC_HALF_WIDTH: f64 = 5.0;

/// Cluster centers fall in `[0, 100)²`.
const CLUSTER_FIELD: f64 = 100.0;

/// Cluster members scatter up to this far from their center on each axis.
const CLUSTER_SPREAD: f64 = 10.0;

/// `n` points with `x ~ U(0, x_max)` and
/// `y = slope·x + intercept + (U − 0.5)·noise`.
///
/// # Errors
/// [`StatsError::InvalidParameter`] unless `noise ≥ 0`, `x_max > 0` and
/// the line parameters are finite.
///
/// # Examples
/// ```
/// use u_statlab::random::create_rng;
/// use u_statlab::synthetic::linear_dataset;
/// let data = linear_dataset(50, 2.0, 1.0, 0.0, 10.0, &mut create_rng(1)).unwrap();
/// assert!(data.iter().all(|&(x, y)| (y - (2.0 * x + 1.0)).abs() < 1e-12));
/// ```
pub fn linear_dataset<R: Rng + ?Sized>(
    n: usize,
    slope: f64,
    intercept: f64,
    noise: f64,
    x_max: f64,
    rng: &mut R,
) -> Result<Vec<(f64, f64)>> {
    check_finite("slope", slope)?;
    check_finite("intercept", intercept)?;
    check_non_negative("noise", noise)?;
    if !x_max.is_finite() || x_max <= 0.0 {
        return Err(StatsError::InvalidParameter(format!(
            "x range must be finite and > 0, got {x_max}"
        )));
    }
    Ok((0..n)
        .map(|_| {
            let x = rng.random::<f64>() * x_max;
            let y = slope * x + intercept + jitter(rng, noise);
            (x, y)
        })
        .collect())
}

/// A binary observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabeledPoint {
    pub x: f64,
    pub label: bool,
}

/// `n` points with `x ~ U(−5, 5)` and `label ~ Bernoulli(model.probability(x))`.
pub fn logistic_dataset<R: Rng + ?Sized>(
    n: usize,
    model: &LogisticModel,
    rng: &mut R,
) -> Vec<LabeledPoint> {
    (0..n)
        .map(|_| {
            let x = random::symmetric_uniform(rng, LOGISTIC_HALF_WIDTH);
            let label = random::bernoulli(rng, model.probability(x));
            LabeledPoint { x, label }
        })
        .collect()
}

/// Design rows and targets, shaped for
/// [`multiple_least_squares`](crate::regression::multiple_least_squares).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultipleDataset {
    pub rows: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl MultipleDataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// `n` rows of `coefficients.len()` predictors, each `~ U(0, 10)`, with
/// `y = intercept + Σ bᵢxᵢ + (U − 0.5)·noise`.
///
/// # Errors
/// [`StatsError::InvalidParameter`] for an empty or non-finite coefficient
/// list, a non-finite intercept, or negative noise.
pub fn multiple_dataset<R: Rng + ?Sized>(
    n: usize,
    intercept: f64,
    coefficients: &[f64],
    noise: f64,
    rng: &mut R,
) -> Result<MultipleDataset> {
    if coefficients.is_empty() {
        return Err(StatsError::InvalidParameter(
            "at least one coefficient is required".into(),
        ));
    }
    crate::error::ensure_finite(coefficients, "coefficients")?;
    check_finite("intercept", intercept)?;
    check_non_negative("noise", noise)?;

    let mut rows = Vec::with_capacity(n);
    let mut targets = Vec::with_capacity(n);
    for _ in 0..n {
        let row: Vec<f64> = coefficients
            .iter()
            .map(|_| rng.random::<f64>() * PREDICTOR_MAX)
            .collect();
        let signal: f64 = row.iter().zip(coefficients).map(|(x, b)| x * b).sum();
        targets.push(intercept + signal + jitter(rng, noise));
        rows.push(row);
    }
    trace!("generated {n} rows of {} predictors", coefficients.len());
    Ok(MultipleDataset { rows, targets })
}

/// A 2-D point tagged with the cluster that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterPoint {
    pub x: f64,
    pub y: f64,
    pub cluster: usize,
}

/// `clusters` blobs of `per_cluster` points. Centers are uniform on
/// `[0, 100)²`; members sit within ±10 of their center on each axis.
/// Points are grouped by cluster, in cluster order.
pub fn clustered_points<R: Rng + ?Sized>(
    clusters: usize,
    per_cluster: usize,
    rng: &mut R,
) -> Vec<ClusterPoint> {
    let mut points = Vec::with_capacity(clusters * per_cluster);
    for cluster in 0..clusters {
        let cx = rng.random::<f64>() * CLUSTER_FIELD;
        let cy = rng.random::<f64>() * CLUSTER_FIELD;
        for _ in 0..per_cluster {
            points.push(ClusterPoint {
                x: cx + random::symmetric_uniform(rng, CLUSTER_SPREAD),
                y: cy + random::symmetric_uniform(rng, CLUSTER_SPREAD),
                cluster,
            });
        }
    }
    points
}

/// Means of `num_samples` samples of size `sample_size`.
///
/// Each population draw is `μ + σ·(U₁ + U₂ + U₃ − 1.5)`, a cheap
/// bell-shaped stand-in for a normal draw. Its spread is σ/2, not σ, so
/// the means have standard deviation `σ / (2√n)`.
///
/// # Errors
/// [`StatsError::InvalidParameter`] if `sample_size` is zero, σ is
/// negative, or either parameter is non-finite.
pub fn sample_means<R: Rng + ?Sized>(
    population_mean: f64,
    population_std_dev: f64,
    sample_size: usize,
    num_samples: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if sample_size == 0 {
        return Err(StatsError::InvalidParameter(
            "sample size must be at least 1".into(),
        ));
    }
    check_finite("population mean", population_mean)?;
    check_non_negative("population standard deviation", population_std_dev)?;

    let means = (0..num_samples)
        .map(|_| {
            let sum: f64 = (0..sample_size)
                .map(|_| {
                    let bell = rng.random::<f64>() + rng.random::<f64>() + rng.random::<f64>();
                    population_mean + population_std_dev * (bell - 1.5)
                })
                .sum();
            sum / sample_size as f64
        })
        .collect();
    Ok(means)
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, noise: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * noise
}

fn check_finite(name: &str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(StatsError::InvalidParameter(format!(
            "{name} must be finite, got {v}"
        )))
    }
}

fn check_non_negative(name: &str, v: f64) -> Result<()> {
    check_finite(name, v)?;
    if v < 0.0 {
        return Err(StatsError::InvalidParameter(format!(
            "{name} must be >= 0, got {v}"
        )));
    }
    Ok(())
}
