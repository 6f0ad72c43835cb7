//! The injectable random source.
//!
//! Every routine that draws random numbers takes `&mut R where R: Rng`,
//! so callers decide between a seeded generator (tests, reproducible
//! demos) and an OS-seeded one. [`create_rng`] is the seeded default.
//!
//! # Reproducibility
//!
//! `SmallRng` is deterministic for a given seed on the same platform and
//! `rand` version; it is not a cryptographic generator.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_statlab::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let u: f64 = rng.random();
/// assert!((0.0..1.0).contains(&u));
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Draws from U(−h, h) with `h = |half_width|`.
///
/// The random-walk step of the sampler and the scatter of the synthetic
/// datasets. A zero or non-finite width has no range to draw from and
/// yields 0 without consuming the generator.
pub fn symmetric_uniform<R: Rng + ?Sized>(rng: &mut R, half_width: f64) -> f64 {
    let h = half_width.abs();
    if h == 0.0 || !h.is_finite() {
        return 0.0;
    }
    rng.random_range(-h..h)
}

/// Returns `true` with probability `p` (clamped to `[0, 1]`).
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    let u: f64 = rng.random();
    u < p.clamp(0.0, 1.0)
}
