//! 4D convex hull: extrema pruning, double-sided seed, incremental loop.
//!
//! The seed is flat on purpose: two tetrahedral facets over the same four
//! extrema with opposite normals, sharing all four ridges. The first point off
//! that hyperplane splits one side into a cone and the hull becomes
//! full-dimensional from there.

use nalgebra::Vector4;

use super::engine::Engine;
use super::extrema::axis_extrema;
use super::retry::with_jiggle;
use super::types::{Hull4, HullVertex};
use crate::cfg::HullCfg;
use crate::error::HullError;
use crate::geom::util::{binomial, combinations};
use crate::geom::{compute_normal, raw_normal};

/// 4D hull with the default config and the given tolerance.
pub fn create_4d_hull(points: &[Vector4<f64>], tolerance: f64) -> Result<Hull4, HullError> {
    create_4d_hull_with_cfg(points, HullCfg::with_tolerance(tolerance))
}

/// 4D hull with explicit config.
pub fn create_4d_hull_with_cfg(points: &[Vector4<f64>], cfg: HullCfg) -> Result<Hull4, HullError> {
    let cfg = cfg.resolved();
    if points.is_empty() {
        return Err(HullError::degenerate_input("4D hull needs at least one point"));
    }
    if !points.iter().all(|p| p.iter().all(|x| x.is_finite())) {
        return Err(HullError::degenerate_input("non-finite input coordinates"));
    }
    tracing::debug!(points = points.len(), tolerance = cfg.tolerance, "building 4D hull");
    with_jiggle(points, &cfg, |coords, perturbation| {
        let extrema = axis_extrema(coords);
        match extrema.len() {
            1 => return Ok(single_point(points, extrema[0], cfg.tolerance, perturbation)),
            2 | 3 => {
                return Err(HullError::degenerate_input(format!(
                    "only {} distinct 4D extrema; lower-dimensional 4D input is not supported",
                    extrema.len()
                )))
            }
            _ => {}
        }
        let seed = prune_extrema(coords, &extrema);
        let mut engine = Engine::new(coords, cfg);
        seed_double_sided(&mut engine, seed)?;
        engine.run()?;
        if engine.mesh.live_facet_count() == 2 && coords.len() > 4 {
            return Err(HullError::numeric(
                "all points lie within tolerance of the seed hyperplane",
            ));
        }
        engine.finalize(points, perturbation)
    })
}

/// Hull of input whose extrema collapse to one point.
fn single_point(points: &[Vector4<f64>], index: usize, tolerance: f64, perturbation: f64) -> Hull4 {
    Hull4 {
        vertices: vec![HullVertex {
            index,
            position: points[index],
        }],
        facets: Vec::new(),
        ridges: Vec::new(),
        edges: Vec::new(),
        tolerance,
        perturbation,
    }
}

/// Reduce the extrema to the four spanning the largest tetrahedron.
///
/// The score is `|raw_normal|` (proportional to the tetrahedron's 3-volume).
/// With at most 8 extrema this is at most 70 candidates. Affine dependence of
/// the winner is caught later by the null-normal check of the seed.
pub(crate) fn prune_extrema(points: &[Vector4<f64>], extrema: &[usize]) -> [usize; 4] {
    let mut best = [extrema[0], extrema[1], extrema[2], extrema[3]];
    if extrema.len() == 4 {
        return best;
    }
    tracing::trace!(extrema = extrema.len(), candidates = binomial(extrema.len(), 4), "pruning 4D extrema");
    let mut best_score = f64::NEG_INFINITY;
    for c in combinations(extrema, 4) {
        let corners = [points[c[0]], points[c[1]], points[c[2]], points[c[3]]];
        let score = raw_normal(&corners).norm();
        if score > best_score {
            best_score = score;
            best = [c[0], c[1], c[2], c[3]];
        }
    }
    best
}

/// Insert the two opposite seed facets and distribute every other point.
///
/// Points within tolerance of the seed hyperplane cannot be classified yet;
/// they are parked in the interior list of the side holding the farther peak
/// so that they are reassigned when that side is split.
fn seed_double_sided(engine: &mut Engine<'_, 4>, seed: [usize; 4]) -> Result<(), HullError> {
    let points = engine.points();
    let corners = seed.map(|i| points[i]);
    let normal = compute_normal(&corners, engine.normal_eps())
        .ok_or_else(|| HullError::numeric(format!("seed extrema {seed:?} are affinely dependent")))?;
    let upper = engine.add_facet_with_normal(seed.to_vec(), normal)?;
    let lower = engine.add_facet_with_normal(seed.to_vec(), -normal)?;
    tracing::debug!(?seed, "4D double-sided seed");

    let mut parked = Vec::new();
    for p in 0..points.len() {
        if !seed.contains(&p) && !engine.assign(p, &[upper, lower]) {
            parked.push(p);
        }
    }
    let peak_of = |f| engine.mesh.facet(f).peak.map(|(_, d)| d);
    let host = match (peak_of(upper), peak_of(lower)) {
        (Some(a), Some(b)) => Some(if a >= b { upper } else { lower }),
        (Some(_), None) => Some(upper),
        (None, Some(_)) => Some(lower),
        (None, None) => None,
    };
    if let Some(host) = host {
        engine.mesh.facet_mut(host).interior.extend(parked);
    }
    engine.enqueue(upper);
    engine.enqueue(lower);
    Ok(())
}
