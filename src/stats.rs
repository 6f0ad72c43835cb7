//! Descriptive statistics.
//!
//! Every function takes a borrowed sample and returns a [`Result`]; an
//! empty sample or a non-finite value is reported instead of producing
//! NaN.
//!
//! # Conventions
//!
//! - **Median** uses the upper-middle element `sorted[n / 2]` on
//!   even-length samples rather than averaging the two middle values, so
//!   answers match the worked examples shown next to the widgets.
//! - **Mode** breaks ties in favour of the smallest tied value.
//! - **Variance** comes in two forms selected by [`VarianceKind`]. The
//!   dispersion lesson and [`summarize`] use the population form; sample
//!   statistics (`s²`) use Bessel's correction.
//!
//! # Algorithms
//!
//! - Mean: Neumaier compensated summation.
//! - Variance: Welford's online update, which keeps every increment of
//!   the squared-deviation sum non-negative.
//!   Reference: Welford (1962), *Technometrics* 4(3).

use log::{trace, warn};

use crate::error::{ensure_finite, Result, StatsError};

/// Which denominator to use for variance and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VarianceKind {
    /// Σ(x − x̄)² / n, for describing the data at hand.
    #[default]
    Population,
    /// Σ(x − x̄)² / (n − 1), the unbiased estimator `s²`.
    Sample,
}

impl VarianceKind {
    /// Smallest sample size for which the variance is defined.
    pub fn min_len(self) -> usize {
        match self {
            VarianceKind::Population => 1,
            VarianceKind::Sample => 2,
        }
    }
}

/// Arithmetic mean.
///
/// # Errors
/// - [`StatsError::EmptyInput`] for an empty sample
/// - [`StatsError::InvalidParameter`] if any value is NaN or ±∞
///
/// # Examples
/// ```
/// use u_statlab::stats::mean;
/// let data = [4.0, 7.0, 2.0, 9.0, 3.0, 5.0, 8.0, 1.0, 6.0];
/// assert_eq!(mean(&data).unwrap(), 5.0);
/// ```
pub fn mean(data: &[f64]) -> Result<f64> {
    validate(data, 1)?;
    Ok(kahan_sum(data) / data.len() as f64)
}

/// Median with the upper-middle convention: `sorted[n / 2]`.
///
/// # Examples
/// ```
/// use u_statlab::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
/// // even length: upper of the two middle values
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 3.0);
/// ```
pub fn median(data: &[f64]) -> Result<f64> {
    validate(data, 1)?;
    let sorted = sorted_copy(data);
    Ok(sorted[sorted.len() / 2])
}

/// Most frequent value; ties go to the smallest tied value.
///
/// # Examples
/// ```
/// use u_statlab::stats::mode;
/// assert_eq!(mode(&[3.0, 1.0, 3.0, 2.0, 1.0]).unwrap(), 1.0);
/// ```
pub fn mode(data: &[f64]) -> Result<f64> {
    validate(data, 1)?;
    let sorted = sorted_copy(data);

    let mut best = sorted[0];
    let mut best_count = 0usize;
    let mut run_value = sorted[0];
    let mut run_count = 0usize;
    for &x in &sorted {
        if x == run_value {
            run_count += 1;
        } else {
            run_value = x;
            run_count = 1;
        }
        if run_count > best_count {
            best_count = run_count;
            best = run_value;
        }
    }
    Ok(best)
}

/// Variance with the chosen denominator.
///
/// # Errors
/// - [`StatsError::EmptyInput`] if `data.len() < kind.min_len()`
/// - [`StatsError::InvalidParameter`] for non-finite values
///
/// # Examples
/// ```
/// use u_statlab::stats::{variance, VarianceKind};
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v, VarianceKind::Population).unwrap() - 4.0).abs() < 1e-12);
/// assert!((variance(&v, VarianceKind::Sample).unwrap() - 32.0 / 7.0).abs() < 1e-12);
/// ```
pub fn variance(data: &[f64], kind: VarianceKind) -> Result<f64> {
    validate(data, kind.min_len())?;
    let mut acc = WelfordAccumulator::new();
    data.iter().for_each(|&x| acc.update(x));
    let var = match kind {
        VarianceKind::Population => acc.population_variance(),
        VarianceKind::Sample => acc.sample_variance(),
    };
    var.ok_or_else(|| StatsError::empty(kind.min_len(), data.len()))
}

/// Population variance, Σ(x − x̄)² / n.
pub fn population_variance(data: &[f64]) -> Result<f64> {
    variance(data, VarianceKind::Population)
}

/// Sample variance, Σ(x − x̄)² / (n − 1).
pub fn sample_variance(data: &[f64]) -> Result<f64> {
    variance(data, VarianceKind::Sample)
}

/// Standard deviation, `sqrt(variance(data, kind))`.
pub fn std_dev(data: &[f64], kind: VarianceKind) -> Result<f64> {
    variance(data, kind).map(f64::sqrt)
}

/// Smallest value.
pub fn min(data: &[f64]) -> Result<f64> {
    validate(data, 1)?;
    Ok(data.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Largest value.
pub fn max(data: &[f64]) -> Result<f64> {
    validate(data, 1)?;
    Ok(data.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Spread between the largest and smallest value.
///
/// # Examples
/// ```
/// use u_statlab::stats::range;
/// assert_eq!(range(&[4.0, 7.0, 2.0, 9.0]).unwrap(), 7.0);
/// ```
///
/// # Errors
/// [`StatsError::InvalidParameter`] when `max − min` overflows f64.
pub fn range(data: &[f64]) -> Result<f64> {
    let span = max(data)? - min(data)?;
    if !span.is_finite() {
        return Err(StatsError::InvalidParameter(format!(
            "range of {} values overflows f64",
            data.len()
        )));
    }
    Ok(span)
}

/// Neumaier compensated sum; error stays O(ε) regardless of length.
///
/// Reference: Neumaier (1974), *ZAMM* 54(1).
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// The figures shown by the central-tendency and dispersion lessons.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    /// Population variance.
    pub variance: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub range: f64,
}

/// Computes every [`Summary`] field in one call.
///
/// # Examples
/// ```
/// use u_statlab::stats::summarize;
/// let s = summarize(&[4.0, 7.0, 2.0, 9.0, 3.0, 5.0, 8.0, 1.0, 6.0]).unwrap();
/// assert_eq!(s.mean, 5.0);
/// assert_eq!(s.median, 5.0);
/// assert_eq!(s.range, 8.0);
/// ```
pub fn summarize(data: &[f64]) -> Result<Summary> {
    validate(data, 1)?;
    let variance = population_variance(data)?;
    let summary = Summary {
        count: data.len(),
        mean: mean(data)?,
        median: median(data)?,
        mode: mode(data)?,
        variance,
        std_dev: variance.sqrt(),
        range: range(data)?,
    };
    trace!("summarized {} values: {:?}", data.len(), summary);
    Ok(summary)
}

/// One bar of a density-scaled histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramBin {
    /// Midpoint of the bin.
    pub center: f64,
    pub count: usize,
    /// `count / (n · width)`, so the bars integrate to one.
    pub density: f64,
}

/// Bins `data` into `bins` equal-width buckets spanning `[min, max]`.
///
/// Values equal to `max` land in the last bin. When every value is equal
/// the span is zero; a single bin of width 1 centred on that value is
/// returned.
///
/// # Errors
/// - [`StatsError::InvalidParameter`] if `bins == 0`, data is non-finite,
///   or `max − min` overflows
/// - [`StatsError::EmptyInput`] for an empty sample
pub fn histogram_density(data: &[f64], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(StatsError::InvalidParameter(
            "histogram needs at least one bin".into(),
        ));
    }
    let lo = min(data)?;
    let hi = max(data)?;
    let n = data.len() as f64;

    if hi == lo {
        warn!("histogram over a zero-width range at {lo}; using a single unit-width bin");
        return Ok(vec![HistogramBin {
            center: lo,
            count: data.len(),
            density: 1.0,
        }]);
    }

    if !(hi - lo).is_finite() {
        return Err(StatsError::InvalidParameter(format!(
            "histogram span [{lo}, {hi}] overflows f64"
        )));
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &x in data {
        let idx = (((x - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            center: lo + (i as f64 + 0.5) * width,
            count,
            density: count as f64 / n / width,
        })
        .collect())
}

/// Streaming mean and variance accumulator (Welford's update).
///
/// # Examples
/// ```
/// use u_statlab::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert_eq!(acc.mean(), Some(5.0));
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one observation.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean_acc)
    }

    /// Σ(x − x̄)² / n, `None` before the first observation.
    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    /// Σ(x − x̄)² / (n − 1), `None` with fewer than two observations.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Combines two accumulators (Chan, Golub & LeVeque, 1979).
    pub fn merge(&mut self, other: &WelfordAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let n = na + nb;
        let delta = other.mean_acc - self.mean_acc;
        self.mean_acc += delta * nb / n;
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count += other.count;
    }
}

fn validate(data: &[f64], required: usize) -> Result<()> {
    if data.len() < required {
        return Err(StatsError::empty(required, data.len()));
    }
    ensure_finite(data, "sample")
}

/// Ascending copy; callers have already rejected NaN.
fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const LESSON: [f64; 9] = [4.0, 7.0, 2.0, 9.0, 3.0, 5.0, 8.0, 1.0, 6.0];

    #[test]
    fn test_mean_lesson_data() {
        assert_eq!(mean(&LESSON).unwrap(), 5.0);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), Err(StatsError::empty(1, 0)));
    }

    #[test]
    fn test_mean_rejects_nan() {
        assert!(matches!(
            mean(&[1.0, f64::NAN]),
            Err(StatsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&LESSON).unwrap(), 5.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 3.0);
        assert_eq!(median(&[42.0]).unwrap(), 42.0);
    }

    #[test]
    fn test_median_empty() {
        assert!(matches!(median(&[]), Err(StatsError::EmptyInput { .. })));
    }

    #[test]
    fn test_mode_unique_winner() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_mode_tie_goes_to_smallest() {
        assert_eq!(mode(&[5.0, 9.0, 9.0, 5.0, 7.0]).unwrap(), 5.0);
        // all distinct: every value ties at one
        assert_eq!(mode(&LESSON).unwrap(), 1.0);
    }

    #[test]
    fn test_population_variance_lesson() {
        // deviations² sum to 60
        assert_abs_diff_eq!(population_variance(&LESSON).unwrap(), 60.0 / 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sample_variance(&LESSON).unwrap(), 60.0 / 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_variance_needs_two() {
        assert_eq!(sample_variance(&[3.0]), Err(StatsError::empty(2, 1)));
        assert_eq!(population_variance(&[3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_std_dev_is_sqrt() {
        let sd = std_dev(&LESSON, VarianceKind::Population).unwrap();
        assert_abs_diff_eq!(sd, (60.0_f64 / 9.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_range_min_max() {
        assert_eq!(range(&LESSON).unwrap(), 8.0);
        assert_eq!(min(&LESSON).unwrap(), 1.0);
        assert_eq!(max(&LESSON).unwrap(), 9.0);
        assert!(range(&[]).is_err());
    }

    #[test]
    fn test_summarize() {
        let s = summarize(&LESSON).unwrap();
        assert_eq!(s.count, 9);
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.median, 5.0);
        assert_eq!(s.mode, 1.0);
        assert_abs_diff_eq!(s.variance, 60.0 / 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.std_dev * s.std_dev, s.variance, epsilon = 1e-12);
        assert_eq!(s.range, 8.0);
    }

    #[test]
    fn test_kahan_sum_precision() {
        let data = vec![0.1; 1_000_000];
        assert_abs_diff_eq!(kahan_sum(&data), 100_000.0, epsilon = 1e-8);
    }

    #[test]
    fn test_histogram_counts_and_density() {
        let data = [0.0, 1.0, 1.5, 2.0, 3.9, 4.0];
        let bins = histogram_density(&data, 4).unwrap();
        assert_eq!(bins.len(), 4);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 1, 2]);
        assert_abs_diff_eq!(bins[0].center, 0.5, epsilon = 1e-12);
        let area: f64 = bins.iter().map(|b| b.density * 1.0).sum();
        assert_abs_diff_eq!(area, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_histogram_zero_width() {
        let bins = histogram_density(&[2.0, 2.0, 2.0], 20).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].center, 2.0);
    }

    #[test]
    fn test_histogram_invalid() {
        assert!(histogram_density(&[1.0, 2.0], 0).is_err());
        assert!(histogram_density(&[], 5).is_err());
    }

    #[test]
    fn test_overflowing_span_is_rejected() {
        let wide = [-1e308, 0.0, 1e308];
        assert!(matches!(
            histogram_density(&wide, 2),
            Err(StatsError::InvalidParameter(_))
        ));
        assert!(matches!(range(&wide), Err(StatsError::InvalidParameter(_))));
        assert!(summarize(&wide).is_err());

        let bins = histogram_density(&[-1e307, 0.0, 1e307], 2).unwrap();
        assert!(bins.iter().all(|b| b.center.is_finite() && b.density.is_finite()));
    }

    #[test]
    fn test_welford_matches_batch() {
        let mut acc = WelfordAccumulator::new();
        LESSON.iter().for_each(|&x| acc.update(x));
        assert_eq!(acc.count(), 9);
        assert_abs_diff_eq!(acc.mean().unwrap(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(acc.sample_variance().unwrap(), 7.5, epsilon = 1e-12);
    }

    #[test]
    fn test_welford_empty() {
        let acc = WelfordAccumulator::new();
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.population_variance(), None);
        assert_eq!(acc.sample_variance(), None);
    }

    #[test]
    fn test_welford_merge() {
        let (left, right) = LESSON.split_at(4);
        let mut a = WelfordAccumulator::new();
        let mut b = WelfordAccumulator::new();
        left.iter().for_each(|&x| a.update(x));
        right.iter().for_each(|&x| b.update(x));
        a.merge(&b);
        assert_eq!(a.count(), 9);
        assert_abs_diff_eq!(a.mean().unwrap(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.population_variance().unwrap(), 60.0 / 9.0, epsilon = 1e-12);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn variance_non_negative(data in finite_vec(1, 100)) {
            prop_assert!(population_variance(&data).unwrap() >= 0.0);
            if data.len() > 1 {
                prop_assert!(sample_variance(&data).unwrap() >= 0.0);
            }
        }

        #[test]
        fn std_dev_is_sqrt_of_variance(data in finite_vec(2, 100)) {
            for kind in [VarianceKind::Population, VarianceKind::Sample] {
                let var = variance(&data, kind).unwrap();
                let sd = std_dev(&data, kind).unwrap();
                prop_assert_eq!(sd, var.sqrt());
            }
        }

        #[test]
        fn median_is_a_member(data in finite_vec(1, 60)) {
            let m = median(&data).unwrap();
            prop_assert!(data.contains(&m));
        }

        #[test]
        fn mode_is_a_member(data in proptest::collection::vec(0_i32..10, 1..40)) {
            let data: Vec<f64> = data.into_iter().map(f64::from).collect();
            let m = mode(&data).unwrap();
            prop_assert!(data.contains(&m));
        }

        #[test]
        fn mean_lies_between_extremes(data in finite_vec(1, 100)) {
            let m = mean(&data).unwrap();
            prop_assert!(m >= min(&data).unwrap() - 1e-9);
            prop_assert!(m <= max(&data).unwrap() + 1e-9);
        }

        #[test]
        fn histogram_preserves_count(data in finite_vec(1, 200), bins in 1_usize..30) {
            let hist = histogram_density(&data, bins).unwrap();
            let total: usize = hist.iter().map(|b| b.count).sum();
            prop_assert_eq!(total, data.len());
        }
    }
}
