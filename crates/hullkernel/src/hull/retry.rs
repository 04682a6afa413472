//! Jiggle-and-retry driver.
//!
//! One attempt runs on the caller's points. When it fails with a numeric
//! degeneracy, every coordinate is perturbed by an independent uniform offset
//! in `[-a, a]` (`a = tolerance * jiggle_factor`) and the construction runs
//! again, up to `retry_budget` more times. Perturbations are always drawn
//! fresh around the original points, so they never accumulate.

use nalgebra::SVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cfg::HullCfg;
use crate::error::HullError;

/// Run `attempt(coords, perturbation)` until it succeeds, fails for good, or
/// the budget runs out.
///
/// `perturbation` is 0 for the first call and the jiggle amplitude afterwards.
pub(crate) fn with_jiggle<const D: usize, T>(
    points: &[SVector<f64, D>],
    cfg: &HullCfg,
    mut attempt: impl FnMut(&[SVector<f64, D>], f64) -> Result<T, HullError>,
) -> Result<T, HullError> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let amplitude = cfg.jiggle_amplitude();
    let mut last = match attempt(points, 0.0) {
        Err(e) if e.is_retryable() => e,
        other => return other,
    };
    for retry in 1..=cfg.retry_budget {
        tracing::warn!(retry, amplitude, error = %last, "numeric degeneracy, jiggling input");
        let jiggled = jiggle(points, amplitude, &mut rng);
        last = match attempt(&jiggled, amplitude) {
            Err(e) if e.is_retryable() => e,
            other => return other,
        };
    }
    let reason = match last {
        HullError::NumericDegeneracy { reason, .. } => reason,
        other => other.to_string(),
    };
    Err(HullError::NumericDegeneracy {
        attempts: cfg.retry_budget + 1,
        reason,
    })
}

/// Copy of `points` with each coordinate moved by at most `amplitude`.
pub(crate) fn jiggle<const D: usize>(
    points: &[SVector<f64, D>],
    amplitude: f64,
    rng: &mut StdRng,
) -> Vec<SVector<f64, D>> {
    points
        .iter()
        .map(|p| p.map(|x| x + rng.gen_range(-amplitude..=amplitude)))
        .collect()
}
