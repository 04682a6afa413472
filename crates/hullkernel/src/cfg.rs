//! Tolerance defaults and construction knobs.
//!
//! Policy
//! - Defaults are fixed constants so call sites never juggle epsilons. Callers
//!   that need something else pass a `HullCfg` to the `*_with_cfg` entry points.
//! - Distances are absolute (same units as the input coordinates); `NORMAL_EPS`
//!   is relative (a generalized sine of the simplex).

/// Tolerance used when the caller passes NaN, a non-positive, or a non-finite value.
pub const BASE_TOLERANCE: f64 = 1e-10;
/// A simplex whose normal magnitude falls below `NORMAL_EPS * Π|edge|` is degenerate.
pub const NORMAL_EPS: f64 = 1e-12;
/// Jiggle amplitude in units of the tolerance.
pub const JIGGLE_FACTOR: f64 = 1e3;
/// Retries after the first attempt before giving up.
pub const RETRY_BUDGET: usize = 10;
/// Default seed for the jiggle RNG; fixed so failures replay.
pub const JIGGLE_SEED: u64 = 0x6a69_6767_6c65;
/// Lifted facets whose normal w-component is above `-LOWER_HULL_EPS` are not lower hull.
pub(crate) const LOWER_HULL_EPS: f64 = 1e-12;

/// Construction configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HullCfg {
    pub tolerance: f64,
    pub normal_eps: f64,
    pub jiggle_factor: f64,
    pub retry_budget: usize,
    pub seed: u64,
}

impl Default for HullCfg {
    fn default() -> Self {
        Self {
            tolerance: BASE_TOLERANCE,
            normal_eps: NORMAL_EPS,
            jiggle_factor: JIGGLE_FACTOR,
            retry_budget: RETRY_BUDGET,
            seed: JIGGLE_SEED,
        }
    }
}

impl HullCfg {
    /// Default config with `tolerance` (resolved through [`resolve_tolerance`]).
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: resolve_tolerance(tolerance),
            ..Self::default()
        }
    }

    /// Copy of `self` whose tolerance is guaranteed usable.
    pub(crate) fn resolved(self) -> Self {
        Self {
            tolerance: resolve_tolerance(self.tolerance),
            ..self
        }
    }

    /// Largest per-coordinate jiggle offset.
    #[inline]
    pub fn jiggle_amplitude(&self) -> f64 {
        self.tolerance * self.jiggle_factor
    }
}

/// Map unset (NaN), non-finite, or non-positive tolerances to `BASE_TOLERANCE`.
#[inline]
pub fn resolve_tolerance(tolerance: f64) -> f64 {
    if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        BASE_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_and_negative_fall_back_to_base() {
        assert_eq!(resolve_tolerance(f64::NAN), BASE_TOLERANCE);
        assert_eq!(resolve_tolerance(-1.0), BASE_TOLERANCE);
        assert_eq!(resolve_tolerance(0.0), BASE_TOLERANCE);
        assert_eq!(resolve_tolerance(f64::INFINITY), BASE_TOLERANCE);
        assert_eq!(resolve_tolerance(1e-6), 1e-6);
    }

    #[test]
    fn cfg_with_tolerance_keeps_other_defaults() {
        let cfg = HullCfg::with_tolerance(1e-7);
        assert_eq!(cfg.tolerance, 1e-7);
        assert_eq!(cfg.retry_budget, RETRY_BUDGET);
        assert!((cfg.jiggle_amplitude() - 1e-7 * JIGGLE_FACTOR).abs() < 1e-18);
        let cfg = HullCfg {
            tolerance: f64::NAN,
            ..HullCfg::default()
        }
        .resolved();
        assert_eq!(cfg.tolerance, BASE_TOLERANCE);
    }
}
