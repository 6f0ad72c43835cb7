//! Least-squares line fitting and the logistic curve.
//!
//! # Simple linear regression
//!
//! ```text
//! slope     = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)
//! intercept = (Σy − slope·Σx) / n
//! ```
//!
//! # Multiple regression
//!
//! With a leading intercept column in the design matrix `X`, the
//! coefficients solve the normal equations `(XᵀX)β = Xᵀy`. `XᵀX` is
//! symmetric positive definite exactly when the predictors are linearly
//! independent, so a failed Cholesky factorization is reported as a
//! singular design.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::distributions::{Curve, Grid};
use crate::error::{ensure_finite, Result, StatsError};

/// Slope and intercept of a fitted line.
///
/// Only [`ordinary_least_squares`] constructs this.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RegressionFit {
    slope: f64,
    intercept: f64,
}

impl RegressionFit {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// ŷ = intercept + slope·x
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Coefficient of determination on `data`.
    ///
    /// Returns 1.0 when every y is identical and perfectly predicted.
    pub fn r_squared(&self, data: &[(f64, f64)]) -> Result<f64> {
        if data.is_empty() {
            return Err(StatsError::empty(1, 0));
        }
        let n = data.len() as f64;
        let y_bar = data.iter().map(|&(_, y)| y).sum::<f64>() / n;
        let (ss_res, ss_tot) = data.iter().fold((0.0, 0.0), |(res, tot), &(x, y)| {
            let e = y - self.predict(x);
            (res + e * e, tot + (y - y_bar) * (y - y_bar))
        });
        if ss_tot == 0.0 {
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

/// Closed-form ordinary least squares for `y = intercept + slope·x`.
///
/// # Errors
/// - [`StatsError::DegenerateInput`] with fewer than two points or when
///   every x is identical
/// - [`StatsError::InvalidParameter`] for non-finite coordinates
///
/// # Examples
/// ```
/// use u_statlab::regression::ordinary_least_squares;
/// let fit = ordinary_least_squares(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
/// assert_eq!(fit.slope(), 2.0);
/// assert_eq!(fit.intercept(), 1.0);
/// ```
pub fn ordinary_least_squares(data: &[(f64, f64)]) -> Result<RegressionFit> {
    if data.len() < 2 {
        return Err(StatsError::DegenerateInput(format!(
            "a line needs at least two points, got {}",
            data.len()
        )));
    }
    if data.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(StatsError::InvalidParameter(
            "regression points must be finite".into(),
        ));
    }

    let n = data.len() as f64;
    let (sx, sy, sxy, sxx) = data.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), &(x, y)| (sx + x, sy + y, sxy + x * y, sxx + x * x),
    );

    let denom = n * sxx - sx * sx;
    if denom == 0.0 {
        return Err(StatsError::DegenerateInput(
            "all x values are identical".into(),
        ));
    }
    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;
    debug!("OLS fit on {} points: slope={slope}, intercept={intercept}", data.len());
    Ok(RegressionFit { slope, intercept })
}

/// Logistic function 1 / (1 + e^−(intercept + coefficient·x)).
///
/// Evaluated in the split form that never exponentiates a positive
/// argument, then clamped into the open interval (0, 1): finite input
/// never yields exactly 0 or 1.
///
/// # Examples
/// ```
/// use u_statlab::regression::sigmoid;
/// assert_eq!(sigmoid(0.0, 0.0, 1.0), 0.5);
/// assert!(sigmoid(100.0, 0.0, 1.0) < 1.0);
/// ```
pub fn sigmoid(x: f64, intercept: f64, coefficient: f64) -> f64 {
    logistic(intercept + coefficient * x)
}

/// Largest f64 below one.
const ONE_BELOW: f64 = 1.0 - f64::EPSILON / 2.0;

fn logistic(z: f64) -> f64 {
    let p = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    p.clamp(f64::MIN_POSITIVE, ONE_BELOW)
}

/// Single-predictor logistic model P(y = 1 | x) = σ(b₀ + b₁x).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficient: f64,
}

impl LogisticModel {
    pub fn new(intercept: f64, coefficient: f64) -> Self {
        Self {
            intercept,
            coefficient,
        }
    }

    pub fn probability(&self, x: f64) -> f64 {
        sigmoid(x, self.intercept, self.coefficient)
    }

    /// The x where the probability crosses 0.5, `−b₀/b₁`.
    ///
    /// `None` for a flat model (b₁ = 0).
    pub fn decision_boundary(&self) -> Option<f64> {
        (self.coefficient != 0.0).then(|| -self.intercept / self.coefficient)
    }

    /// The S-curve over `[start, end]`, as drawn by the logistic lesson.
    pub fn curve(&self, start: f64, end: f64, points: usize) -> Result<Curve<impl Fn(f64) -> f64>> {
        let model = *self;
        Ok(Grid::with_points(start, end, points)?.curve(move |x: f64| model.probability(x)))
    }
}

/// Intercept and slopes from [`multiple_least_squares`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MultipleFit {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl MultipleFit {
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// One slope per predictor, in column order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// ŷ for one row of predictors.
    ///
    /// # Errors
    /// [`StatsError::InvalidParameter`] if `row` has the wrong width.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(StatsError::InvalidParameter(format!(
                "expected {} predictors, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        Ok(self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, b)| x * b)
                .sum::<f64>())
    }
}

/// Squared Cholesky pivots below this fraction of the largest Gram
/// diagonal are treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

fn singular_design() -> StatsError {
    StatsError::DegenerateInput("singular design matrix (collinear or constant predictors)".into())
}

/// Ordinary least squares with `k` predictors plus an intercept.
///
/// `rows[i]` holds the predictors of observation `i`, `targets[i]` its
/// response.
///
/// # Errors
/// - [`StatsError::InvalidParameter`] for ragged rows, a length mismatch,
///   zero predictors, or non-finite values
/// - [`StatsError::DegenerateInput`] with fewer observations than
///   parameters or a singular design (collinear or constant predictors)
///
/// # Examples
/// ```
/// use u_statlab::regression::multiple_least_squares;
/// // y = 1 + 2·x₁ − 3·x₂
/// let rows = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 3.0]];
/// let y = [1.0, 3.0, -2.0, -4.0];
/// let fit = multiple_least_squares(&rows, &y).unwrap();
/// assert!((fit.intercept() - 1.0).abs() < 1e-9);
/// assert!((fit.coefficients()[0] - 2.0).abs() < 1e-9);
/// assert!((fit.coefficients()[1] + 3.0).abs() < 1e-9);
/// ```
pub fn multiple_least_squares(rows: &[Vec<f64>], targets: &[f64]) -> Result<MultipleFit> {
    if rows.len() != targets.len() {
        return Err(StatsError::InvalidParameter(format!(
            "{} predictor rows but {} targets",
            rows.len(),
            targets.len()
        )));
    }
    let k = rows.first().map_or(0, Vec::len);
    if k == 0 {
        return Err(StatsError::InvalidParameter(
            "need at least one predictor column".into(),
        ));
    }
    if let Some(i) = rows.iter().position(|r| r.len() != k) {
        return Err(StatsError::InvalidParameter(format!(
            "row {i} has {} predictors, expected {k}",
            rows[i].len()
        )));
    }
    let p = k + 1;
    if rows.len() < p {
        return Err(StatsError::DegenerateInput(format!(
            "{p} parameters need at least {p} observations, got {}",
            rows.len()
        )));
    }
    for row in rows {
        ensure_finite(row, "predictors")?;
    }
    ensure_finite(targets, "targets")?;

    let x = DMatrix::from_fn(rows.len(), p, |i, j| if j == 0 { 1.0 } else { rows[i][j - 1] });
    let y = DVector::from_column_slice(targets);
    let xt = x.transpose();
    let gram = &xt * &x;
    let rhs = &xt * &y;

    let scale = gram.diagonal().iter().fold(0.0_f64, |m, &d| m.max(d));
    let chol = gram.cholesky().ok_or_else(singular_design)?;
    let min_pivot = chol
        .l_dirty()
        .diagonal()
        .iter()
        .fold(f64::INFINITY, |m, &d| m.min(d));
    if min_pivot * min_pivot <= scale * PIVOT_TOLERANCE {
        return Err(singular_design());
    }
    let beta = chol.solve(&rhs);
    if beta.iter().any(|b| !b.is_finite()) {
        return Err(StatsError::DegenerateInput(
            "normal equations are numerically singular".into(),
        ));
    }

    debug!("multiple OLS on {} rows × {k} predictors", rows.len());
    Ok(MultipleFit {
        intercept: beta[0],
        coefficients: beta.iter().skip(1).copied().collect(),
    })
}
