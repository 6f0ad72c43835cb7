//! End-to-end walk through each lesson's computation, in the order a
//! student meets them: describe a sample, look at densities, update
//! beliefs, fit models, sample a posterior, and test a hypothesis.
//!
//! Fine-grained edge cases live in the unit tests of each module.

use approx::assert_abs_diff_eq;
use u_statlab::{
    bayes::{self, BayesEvidence},
    distributions::{Beta, Grid, Normal},
    inference::{self, ConfidenceLevel, PValueMethod, ZTestInput},
    mcmc::{McmcConfig, MetropolisHastings},
    probability::{self, ContingencyCounts},
    random::create_rng,
    regression::{self, LogisticModel},
    stats::{self, VarianceKind},
    synthetic, StatsError,
};

const LESSON_SAMPLE: [f64; 9] = [4.0, 7.0, 2.0, 9.0, 3.0, 5.0, 8.0, 1.0, 6.0];

#[test]
fn descriptive_statistics_lesson() {
    let s = stats::summarize(&LESSON_SAMPLE).unwrap();
    assert_eq!(s.count, 9);
    assert_eq!(s.mean, 5.0);
    assert_eq!(s.median, 5.0);
    assert_eq!(s.range, 8.0);
    assert_abs_diff_eq!(s.variance, 60.0 / 9.0, epsilon = 1e-12);
    assert_abs_diff_eq!(s.std_dev, s.variance.sqrt(), epsilon = 1e-15);

    let sample_var = stats::variance(&LESSON_SAMPLE, VarianceKind::Sample).unwrap();
    assert_abs_diff_eq!(sample_var, 7.5, epsilon = 1e-12);

    assert!(matches!(
        stats::mean(&[]),
        Err(StatsError::EmptyInput { .. })
    ));
}

#[test]
fn probability_lesson() {
    let counts = ContingencyCounts {
        total: 200,
        a: 80,
        b: 50,
        both: 20,
    };
    let p = counts.conditional_probabilities().unwrap();
    assert_abs_diff_eq!(p.p_a_given_b, 0.4, epsilon = 1e-12);
    assert_abs_diff_eq!(p.p_b_given_a, 0.25, epsilon = 1e-12);
    // P(A|B)·P(B) = P(B|A)·P(A)
    assert_abs_diff_eq!(p.p_a_given_b * p.p_b, p.p_b_given_a * p.p_a, epsilon = 1e-12);

    let tally = probability::flip_coins(1_000, &mut create_rng(21));
    assert_eq!(tally.flips(), 1_000);
}

#[test]
fn distributions_lesson() {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let grid = normal.plot_grid(161).unwrap();
    let curve: Vec<_> = grid.curve(normal).collect();
    assert_eq!(curve.len(), 161);
    // trapezoid area over ±4σ
    let step = grid.step();
    let area: f64 = curve.windows(2).map(|w| 0.5 * (w[0].y + w[1].y) * step).sum();
    assert_abs_diff_eq!(area, 1.0, epsilon = 1e-3);

    let unit = Grid::new(0.0, 1.0, 0.01).unwrap();
    assert_eq!(unit.len(), 101);
    let beta = Beta::new(2.0, 5.0).unwrap();
    let kernel: Vec<_> = unit.curve(beta).collect();
    assert_eq!(kernel.first().map(|p| p.y), Some(0.0));
    assert_eq!(kernel.last().map(|p| p.y), Some(0.0));
}

#[test]
fn bayesian_lesson() {
    let evidence = BayesEvidence::new(0.01, 0.95, 0.10).unwrap();
    let p = bayes::posterior(&evidence).unwrap();
    assert_abs_diff_eq!(p, 0.0876, epsilon = 1e-3);

    let post = bayes::beta_binomial_update(2.0, 2.0, 7, 3).unwrap();
    assert_eq!((post.alpha, post.beta), (9.0, 5.0));
    let curve = post.kernel_curve(101).unwrap();
    assert_eq!(curve.len(), 101);
}

#[test]
fn simple_regression_lesson() {
    let fit = regression::ordinary_least_squares(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
    assert_abs_diff_eq!(fit.slope(), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(fit.intercept(), 1.0, epsilon = 1e-12);

    let data = synthetic::linear_dataset(100, 0.5, 10.0, 20.0, 100.0, &mut create_rng(7)).unwrap();
    let fit = regression::ordinary_least_squares(&data).unwrap();
    assert!((fit.slope() - 0.5).abs() < 0.1);
    let r2 = fit.r_squared(&data).unwrap();
    assert!(r2 > 0.5 && r2 <= 1.0, "r² {r2}");

    assert!(matches!(
        regression::ordinary_least_squares(&[(1.0, 1.0), (1.0, 2.0)]),
        Err(StatsError::DegenerateInput(_))
    ));
}

#[test]
fn logistic_regression_lesson() {
    let model = LogisticModel::new(-1.0, 0.5);
    let boundary = model.decision_boundary().unwrap();
    assert_abs_diff_eq!(boundary, 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(model.probability(boundary), 0.5, epsilon = 1e-12);

    let labels = synthetic::logistic_dataset(200, &model, &mut create_rng(8));
    assert_eq!(labels.len(), 200);
    let curve: Vec<_> = model.curve(-5.0, 5.0, 50).unwrap().collect();
    assert!(curve.windows(2).all(|w| w[0].y <= w[1].y));
}

#[test]
fn multiple_regression_lesson() {
    let data = synthetic::multiple_dataset(100, 1.0, &[2.0, 3.0], 2.0, &mut create_rng(9)).unwrap();
    let fit = regression::multiple_least_squares(&data.rows, &data.targets).unwrap();
    assert_eq!(fit.coefficients().len(), 2);
    assert!((fit.coefficients()[0] - 2.0).abs() < 0.2);
    assert!((fit.coefficients()[1] - 3.0).abs() < 0.2);
    let y_hat = fit.predict(&[1.0, 1.0]).unwrap();
    assert!((y_hat - 6.0).abs() < 1.0);
}

#[test]
fn mcmc_lesson() {
    let sampler = MetropolisHastings::new(McmcConfig::default());
    let trace = sampler.run_seeded(42);
    assert_eq!(trace.len(), 9_000);
    assert_eq!(trace, sampler.run_seeded(42));
    assert!(trace.mean().unwrap().abs() < 0.2);
    let rate = trace.acceptance_rate().unwrap();
    assert!(rate > 0.5 && rate < 0.95, "acceptance {rate}");

    let bins = stats::histogram_density(trace.samples(), 30).unwrap();
    let total: usize = bins.iter().map(|b| b.count).sum();
    assert_eq!(total, trace.len());

    let empty = McmcConfig::default().with_burn_in(20_000);
    assert!(MetropolisHastings::new(empty).run_seeded(1).is_empty());
}

#[test]
fn sampling_distribution_lesson() {
    let means = synthetic::sample_means(100.0, 20.0, 30, 1_000, &mut create_rng(10)).unwrap();
    let bins = stats::histogram_density(&means, 20).unwrap();
    assert_eq!(bins.len(), 20);
    let width = bins[1].center - bins[0].center;
    let area: f64 = bins.iter().map(|b| b.density * width).sum();
    assert_abs_diff_eq!(area, 1.0, epsilon = 1e-9);
}

#[test]
fn confidence_interval_lesson() {
    let se = inference::standard_error(15.0, 25).unwrap();
    let level = ConfidenceLevel::try_from(95).unwrap();
    let ci = inference::confidence_interval(100.0, se, level.critical_value()).unwrap();
    assert_eq!(ci.midpoint(), 100.0);
    assert_abs_diff_eq!(ci.lower(), 94.12, epsilon = 1e-9);
    assert_abs_diff_eq!(ci.upper(), 105.88, epsilon = 1e-9);

    let wider = inference::confidence_interval(
        100.0,
        se,
        ConfidenceLevel::NinetyNine.critical_value(),
    )
    .unwrap();
    assert!(wider.width() > ci.width());
}

#[test]
fn hypothesis_testing_lesson() {
    let input = ZTestInput::default();
    let shortcut = inference::z_test(&input, PValueMethod::Simplified).unwrap();
    let exact = inference::z_test(&input, PValueMethod::NormalTail).unwrap();
    assert_eq!(shortcut.z_score, exact.z_score);
    // the shortcut rejects where the normal tail does not
    assert!(shortcut.reject_null);
    assert!(!exact.reject_null);

    let curve: Vec<_> =
        inference::sampling_distribution_curve(input.population_mean, exact.standard_error)
            .unwrap()
            .collect();
    let rejected = curve
        .iter()
        .filter(|p| exact.in_rejection_region(p.x, input.population_mean))
        .count();
    assert!(rejected > 0 && rejected < curve.len());
}
