//! Probability density functions and density curves.
//!
//! | Family | Parameters | Density |
//! |---|---|---|
//! | [`Normal`] | μ, σ > 0 | (1/(σ√(2π))) e^(−½((x−μ)/σ)²) |
//! | [`Beta`] | α > 0, β > 0 | kernel x^(α−1)(1−x)^(β−1) on [0, 1] |
//! | [`Exponential`] | λ > 0 | λe^(−λx) for x ≥ 0 |
//! | [`Uniform`] | min < max | 1/(max−min) on [min, max] |
//!
//! # Beta kernel vs. Beta density
//!
//! The Bayesian-inference lesson plots the **unnormalized** kernel, which
//! is what [`beta_kernel`] and [`Beta::kernel`] return and what
//! [`Density`] yields for [`Beta`]. The properly normalized density,
//! kernel / B(α, β), is available separately through [`Beta::pdf`].
//!
//! # Curves
//!
//! A [`Grid`] describes evenly spaced abscissae; [`Grid::curve`] pairs
//! them with any [`Density`] lazily. Both iterators are `Clone`, so a
//! curve can be replayed without recomputing its parameters.

use std::f64::consts::PI;

use crate::error::{Result, StatsError};
use crate::special;

/// Anything that can be evaluated pointwise to draw a curve.
pub trait Density {
    fn density(&self, x: f64) -> f64;
}

impl<F> Density for F
where
    F: Fn(f64) -> f64,
{
    fn density(&self, x: f64) -> f64 {
        self(x)
    }
}

// ============================================================================
// Normal
// ============================================================================

/// Normal distribution N(μ, σ²).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "NormalParams")
)]
pub struct Normal {
    mean: f64,
    std_dev: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct NormalParams {
    mean: f64,
    std_dev: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<NormalParams> for Normal {
    type Error = StatsError;

    fn try_from(p: NormalParams) -> Result<Self> {
        Self::new(p.mean, p.std_dev)
    }
}

impl Normal {
    /// # Errors
    /// [`StatsError::InvalidParameter`] unless μ is finite and σ is finite and > 0.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(StatsError::InvalidParameter(format!(
                "Normal requires finite μ and σ > 0, got μ={mean}, σ={std_dev}"
            )));
        }
        Ok(Self { mean, std_dev })
    }

    /// The standard normal N(0, 1).
    pub fn standard() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std_dev;
        (1.0 / (self.std_dev * (2.0 * PI).sqrt())) * (-0.5 * z * z).exp()
    }

    /// Unnormalized log density, −½((x−μ)/σ)².
    ///
    /// Ratios of densities only need this term; the sampler works with it
    /// so that far-out states never divide 0 by 0.
    pub fn log_kernel(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std_dev;
        -0.5 * z * z
    }

    pub fn cdf(&self, x: f64) -> f64 {
        special::standard_normal_cdf((x - self.mean) / self.std_dev)
    }

    /// Default plotting window, μ ± 4σ.
    pub fn plot_grid(&self, points: usize) -> Result<Grid> {
        let half = 4.0 * self.std_dev;
        Grid::with_points(self.mean - half, self.mean + half, points)
    }
}

impl Density for Normal {
    fn density(&self, x: f64) -> f64 {
        self.pdf(x)
    }
}

/// Normal density at `x`.
///
/// # Errors
/// [`StatsError::InvalidParameter`] if `std_dev ≤ 0` or a parameter is non-finite.
///
/// # Examples
/// ```
/// use u_statlab::distributions::normal_pdf;
/// let peak = normal_pdf(0.0, 0.0, 1.0).unwrap();
/// assert!((peak - 0.3989422804014327).abs() < 1e-15);
/// assert!(normal_pdf(0.0, 0.0, 0.0).is_err());
/// ```
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> Result<f64> {
    Ok(Normal::new(mean, std_dev)?.pdf(x))
}

// ============================================================================
// Beta
// ============================================================================

/// Beta(α, β) on [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BetaShapes")
)]
pub struct Beta {
    alpha: f64,
    beta: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BetaShapes {
    alpha: f64,
    beta: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<BetaShapes> for Beta {
    type Error = StatsError;

    fn try_from(p: BetaShapes) -> Result<Self> {
        Self::new(p.alpha, p.beta)
    }
}

impl Beta {
    /// # Errors
    /// [`StatsError::InvalidParameter`] unless both shapes are finite and > 0.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
            return Err(StatsError::InvalidParameter(format!(
                "Beta requires α > 0 and β > 0, got α={alpha}, β={beta}"
            )));
        }
        Ok(Self { alpha, beta })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// α / (α + β)
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// x^(α−1)(1−x)^(β−1) on [0, 1], zero outside.
    ///
    /// At the endpoints this follows `f64::powf`, so a shape below one
    /// gives +∞ there (0⁻ⁿ), exactly as the curve is drawn.
    pub fn kernel(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        x.powf(self.alpha - 1.0) * (1.0 - x).powf(self.beta - 1.0)
    }

    /// Normalized density, kernel / B(α, β).
    pub fn pdf(&self, x: f64) -> f64 {
        self.kernel(x) * (-special::ln_beta(self.alpha, self.beta)).exp()
    }
}

impl Density for Beta {
    fn density(&self, x: f64) -> f64 {
        self.kernel(x)
    }
}

/// Unnormalized Beta kernel x^(α−1)(1−x)^(β−1), zero outside `[0, 1]`.
///
/// The one density here that can return +∞ for valid parameters: with
/// α < 1 the value at `x = 0` is `+∞`, and likewise at `x = 1` for β < 1.
/// Plotting callers should clip or skip those endpoints.
///
/// # Errors
/// [`StatsError::InvalidParameter`] unless both shapes are finite and > 0.
///
/// # Examples
/// ```
/// use u_statlab::distributions::beta_kernel;
/// // Beta(2, 2): x(1 − x)
/// assert!((beta_kernel(0.5, 2.0, 2.0).unwrap() - 0.25).abs() < 1e-15);
/// assert!(beta_kernel(0.5, 0.0, 2.0).is_err());
/// // U-shaped Beta(0.5, 0.5) is unbounded at both ends
/// assert_eq!(beta_kernel(0.0, 0.5, 0.5).unwrap(), f64::INFINITY);
/// assert_eq!(beta_kernel(1.0, 0.5, 0.5).unwrap(), f64::INFINITY);
/// ```
pub fn beta_kernel(x: f64, alpha: f64, beta: f64) -> Result<f64> {
    Ok(Beta::new(alpha, beta)?.kernel(x))
}

// ============================================================================
// Exponential
// ============================================================================

/// Exponential distribution with rate λ.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ExponentialParams")
)]
pub struct Exponential {
    rate: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ExponentialParams {
    rate: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<ExponentialParams> for Exponential {
    type Error = StatsError;

    fn try_from(p: ExponentialParams) -> Result<Self> {
        Self::new(p.rate)
    }
}

impl Exponential {
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(StatsError::InvalidParameter(format!(
                "Exponential requires λ > 0, got λ={rate}"
            )));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn mean(&self) -> f64 {
        1.0 / self.rate
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }
}

impl Density for Exponential {
    fn density(&self, x: f64) -> f64 {
        self.pdf(x)
    }
}

/// λe^(−λx) for x ≥ 0, zero for x < 0.
pub fn exponential_pdf(x: f64, rate: f64) -> Result<f64> {
    Ok(Exponential::new(rate)?.pdf(x))
}

// ============================================================================
// Uniform
// ============================================================================

/// Continuous uniform distribution on `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "UniformParams")
)]
pub struct Uniform {
    min: f64,
    max: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UniformParams {
    min: f64,
    max: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<UniformParams> for Uniform {
    type Error = StatsError;

    fn try_from(p: UniformParams) -> Result<Self> {
        Self::new(p.min, p.max)
    }
}

impl Uniform {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(StatsError::InvalidParameter(format!(
                "Uniform requires min < max, got min={min}, max={max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if (self.min..=self.max).contains(&x) {
            1.0 / (self.max - self.min)
        } else {
            0.0
        }
    }
}

impl Density for Uniform {
    fn density(&self, x: f64) -> f64 {
        self.pdf(x)
    }
}

/// 1/(max − min) inside `[min, max]`, zero outside.
pub fn uniform_pdf(x: f64, min: f64, max: f64) -> Result<f64> {
    Ok(Uniform::new(min, max)?.pdf(x))
}

// ============================================================================
// Grids and curves
// ============================================================================

/// Evenly spaced abscissae `start, start + step, …` up to `end`.
///
/// Points are computed as `start + i · step`; the last point is kept when
/// it reaches `end` to within 1e-9 of a step, so `[0, 1]` with step 0.01
/// yields exactly 101 points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid {
    start: f64,
    step: f64,
    len: usize,
}

impl Grid {
    /// # Errors
    /// [`StatsError::InvalidParameter`] for non-finite bounds, `end < start`,
    /// or a non-positive step.
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || !step.is_finite() {
            return Err(StatsError::InvalidParameter(
                "grid bounds and step must be finite".into(),
            ));
        }
        if end < start || step <= 0.0 {
            return Err(StatsError::InvalidParameter(format!(
                "grid requires start ≤ end and step > 0, got [{start}, {end}] step {step}"
            )));
        }
        let intervals = ((end - start) / step + 1e-9).floor();
        if !intervals.is_finite() || intervals >= usize::MAX as f64 {
            return Err(StatsError::InvalidParameter(format!(
                "grid over [{start}, {end}] with step {step} has too many points"
            )));
        }
        Ok(Self {
            start,
            step,
            len: intervals as usize + 1,
        })
    }

    /// `points` values spread evenly over `[start, end]`, both ends included.
    pub fn with_points(start: f64, end: f64, points: usize) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(StatsError::InvalidParameter(format!(
                "grid requires finite start ≤ end, got [{start}, {end}]"
            )));
        }
        if !(end - start).is_finite() {
            return Err(StatsError::InvalidParameter(format!(
                "grid span [{start}, {end}] overflows f64"
            )));
        }
        match points {
            0 => Err(StatsError::InvalidParameter(
                "grid needs at least one point".into(),
            )),
            1 => Ok(Self {
                start,
                step: 0.0,
                len: 1,
            }),
            n => Ok(Self {
                start,
                step: (end - start) / (n - 1) as f64,
                len: n,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// The abscissae, lazily.
    pub fn points(&self) -> GridPoints {
        GridPoints {
            grid: *self,
            next: 0,
        }
    }

    /// Pairs every abscissa with `density(x)`, lazily.
    pub fn curve<D: Density>(&self, density: D) -> Curve<D> {
        Curve {
            points: self.points(),
            density,
        }
    }
}

/// Iterator over a [`Grid`]'s x values.
#[derive(Debug, Clone)]
pub struct GridPoints {
    grid: Grid,
    next: usize,
}

impl Iterator for GridPoints {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next >= self.grid.len {
            return None;
        }
        let x = self.grid.start + self.next as f64 * self.grid.step;
        self.next += 1;
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.grid.len - self.next;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for GridPoints {}

/// One point of a plotted curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

/// Iterator of [`DensityPoint`]s produced by [`Grid::curve`].
#[derive(Debug, Clone)]
pub struct Curve<D> {
    points: GridPoints,
    density: D,
}

impl<D: Density> Iterator for Curve<D> {
    type Item = DensityPoint;

    fn next(&mut self) -> Option<DensityPoint> {
        let x = self.points.next()?;
        Some(DensityPoint {
            x,
            y: self.density.density(x),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

impl<D: Density> ExactSizeIterator for Curve<D> {}
