//! 3D convex hull: planar fallback, tetrahedron seed, incremental loop.

use nalgebra::{Vector2, Vector3};

use super::engine::Engine;
use super::extrema::axis_extrema;
use super::retry::with_jiggle;
use super::types::{Hull3, HullFacet, HullRidge, HullVertex};
use crate::cfg::HullCfg;
use crate::error::HullError;
use crate::geom::util::combinations;
use crate::geom::{convex_hull_2d, fit_plane, plane_basis, simplex_volume, PlaneFit};
use crate::mesh::FacetId;

/// 3D hull with the default config and the given tolerance.
pub fn create_3d_hull(points: &[Vector3<f64>], tolerance: f64) -> Result<Hull3, HullError> {
    create_3d_hull_with_cfg(points, HullCfg::with_tolerance(tolerance))
}

/// 3D hull with explicit config.
///
/// Coplanar input (best-fit plane residual within tolerance) yields the
/// two-sided polygon hull; everything else runs the incremental algorithm with
/// jiggle-retry.
pub fn create_3d_hull_with_cfg(points: &[Vector3<f64>], cfg: HullCfg) -> Result<Hull3, HullError> {
    let cfg = cfg.resolved();
    if points.is_empty() {
        return Err(HullError::degenerate_input("3D hull needs at least one point"));
    }
    let fit = fit_plane(points)
        .ok_or_else(|| HullError::degenerate_input("non-finite input coordinates"))?;
    if fit.residual <= cfg.tolerance {
        tracing::debug!(points = points.len(), residual = fit.residual, "coplanar input, planar hull");
        return planar_hull(points, &fit, cfg.tolerance);
    }
    tracing::debug!(points = points.len(), tolerance = cfg.tolerance, "building 3D hull");
    with_jiggle(points, &cfg, |coords, perturbation| {
        let mut engine = Engine::new(coords, cfg);
        seed(&mut engine)?;
        engine.run()?;
        engine.finalize(points, perturbation)
    })
}

/// Two opposite polygon facets over the 2D hull of the projected points.
///
/// Ridges are the polygon edges, each owned by the front facet and shared with
/// the back facet. Points that are not polygon corners become the front
/// facet's `interior_vertices`.
fn planar_hull(points: &[Vector3<f64>], fit: &PlaneFit, tolerance: f64) -> Result<Hull3, HullError> {
    let basis = plane_basis(&fit.normal);
    let flat: Vec<_> = points.iter().map(|p| fit.project(&basis, p)).collect();
    let ring = convex_hull_2d(&flat);
    if ring.len() < 3 || is_sliver(&flat, &ring, tolerance) {
        return Err(HullError::degenerate_input(format!(
            "{} distinct point(s) on a line do not bound a 3D hull",
            ring.len()
        )));
    }
    let k = ring.len();
    let normal = fit.normal;
    let front_offset = normal.dot(&points[ring[0]]);
    let mut back_ring = ring.clone();
    back_ring.reverse();
    // Back facet starts at the same corner so that its edge j is front edge k-1-j.
    back_ring.rotate_right(1);

    let ridges: Vec<HullRidge> = (0..k)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % k]);
            HullRidge {
                vertices: vec![a.min(b), a.max(b)],
                owned: 0,
                other: 1,
            }
        })
        .collect();
    let back_ridges: Vec<usize> = (0..k).map(|j| k - 1 - j).collect();

    let mut interior: Vec<usize> = (0..points.len()).filter(|i| !ring.contains(i)).collect();
    interior.sort_unstable();
    let front = HullFacet {
        vertices: ring.clone(),
        normal,
        offset: front_offset,
        ridges: (0..k).collect(),
        interior_vertices: interior,
    };
    let back = HullFacet {
        vertices: back_ring,
        normal: -normal,
        offset: -front_offset,
        ridges: back_ridges,
        interior_vertices: Vec::new(),
    };

    let mut corners = ring.clone();
    corners.sort_unstable();
    let mut edges: Vec<[usize; 2]> = ridges
        .iter()
        .map(|r| [r.vertices[0], r.vertices[1]])
        .collect();
    edges.sort_unstable();
    Ok(Hull3 {
        vertices: corners
            .into_iter()
            .map(|index| HullVertex {
                index,
                position: points[index],
            })
            .collect(),
        facets: vec![front, back],
        ridges,
        edges,
        tolerance,
        perturbation: 0.0,
    })
}

/// A ring whose area is below `tolerance × diameter` is a segment carrying
/// rounding noise, not a polygon.
fn is_sliver(flat: &[Vector2<f64>], ring: &[usize], tolerance: f64) -> bool {
    let anchor = flat[ring[0]];
    let twice_area: f64 = ring
        .windows(2)
        .skip(1)
        .map(|w| {
            let (a, b) = (flat[w[0]] - anchor, flat[w[1]] - anchor);
            a.x * b.y - a.y * b.x
        })
        .sum();
    let diameter = ring
        .iter()
        .map(|&i| (flat[i] - anchor).norm())
        .fold(0.0, f64::max);
    0.5 * twice_area.abs() <= tolerance * diameter
}

/// Insert the seed tetrahedron and distribute all other points.
fn seed(engine: &mut Engine<'_, 3>) -> Result<(), HullError> {
    let points = engine.points();
    let extrema = axis_extrema(points);
    let tet = best_extrema_tetrahedron(points, &extrema, engine.tolerance())
        .or_else(|| farthest_point_tetrahedron(points, &extrema, engine.tolerance()))
        .ok_or_else(|| HullError::numeric("no non-degenerate seed tetrahedron"))?;
    tracing::debug!(?tet, extrema = extrema.len(), "3D seed");

    let mut facets: Vec<FacetId> = Vec::with_capacity(4);
    for skip in 0..4 {
        let vertices: Vec<usize> = (0..4).filter(|&i| i != skip).map(|i| tet[i]).collect();
        facets.push(engine.add_facet(vertices, &[tet[skip]])?);
    }
    for p in 0..points.len() {
        if !tet.contains(&p) {
            engine.assign(p, &facets);
        }
    }
    for f in facets {
        engine.enqueue(f);
    }
    Ok(())
}

/// Height of `d` above the plane through `a, b, c`, or 0 if that triangle is degenerate.
fn tetra_height(p: &[Vector3<f64>], tet: &[usize]) -> f64 {
    let base = (p[tet[1]] - p[tet[0]]).cross(&(p[tet[2]] - p[tet[0]])).norm();
    if base <= 0.0 {
        return 0.0;
    }
    let corners = [p[tet[0]], p[tet[1]], p[tet[2]], p[tet[3]]];
    6.0 * simplex_volume(&corners).abs() / base
}

/// Largest-volume tetrahedron among 4-subsets of the extrema, if it is thick
/// enough to seed (every corner farther than tolerance from the opposite face).
fn best_extrema_tetrahedron(
    points: &[Vector3<f64>],
    extrema: &[usize],
    tolerance: f64,
) -> Option<[usize; 4]> {
    let mut best: Option<([usize; 4], f64)> = None;
    for c in combinations(extrema, 4) {
        let corners = [points[c[0]], points[c[1]], points[c[2]], points[c[3]]];
        let vol = simplex_volume(&corners).abs();
        if best.map_or(true, |(_, bv)| vol > bv) {
            best = Some(([c[0], c[1], c[2], c[3]], vol));
        }
    }
    let (tet, _) = best?;
    let thick = (0..4).all(|r| {
        let rolled = [tet[r], tet[(r + 1) % 4], tet[(r + 2) % 4], tet[(r + 3) % 4]];
        tetra_height(points, &rolled) > tolerance
    });
    thick.then_some(tet)
}

/// Classic construction over all points: farthest pair from the first
/// extremum, farthest from their line, farthest from their plane.
fn farthest_point_tetrahedron(
    points: &[Vector3<f64>],
    extrema: &[usize],
    tolerance: f64,
) -> Option<[usize; 4]> {
    let a = *extrema.first()?;
    let b = argmax(points.len(), |i| (points[i] - points[a]).norm())?;
    let ab = points[b] - points[a];
    let c = argmax(points.len(), |i| ab.cross(&(points[i] - points[a])).norm())?;
    let n = ab.cross(&(points[c] - points[a]));
    let norm = n.norm();
    if norm <= 0.0 {
        return None;
    }
    let n = n / norm;
    let d = argmax(points.len(), |i| n.dot(&(points[i] - points[a])).abs())?;
    let tet = [a, b, c, d];
    (n.dot(&(points[d] - points[a])).abs() > tolerance).then_some(tet)
}

fn argmax(n: usize, f: impl Fn(usize) -> f64) -> Option<usize> {
    (0..n).max_by(|&i, &j| f(i).total_cmp(&f(j)).then(j.cmp(&i)))
}
