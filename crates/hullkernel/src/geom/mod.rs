//! Geometric primitives shared by the 3D and 4D hull engines.
//!
//! Conventions
//! - Points are `nalgebra::SVector<f64, D>`; only `D ∈ {3, 4}` is exercised.
//! - A facet plane is `normal · x = offset` with a unit `normal`; the signed
//!   distance of `p` is `normal · p - offset` (positive = outside).
//! - Normals come from the generalized cross product (cofactor expansion of the
//!   `(D-1)×D` edge matrix): the cross product for `D = 3`, 3×3 minors for `D = 4`.

pub mod hull2;
pub mod plane;
pub(crate) mod util;

pub use hull2::convex_hull_2d;
pub use plane::{fit_plane, plane_basis, PlaneFit};

use nalgebra::{DMatrix, SVector};

/// Generalized cross product of the `D-1` edges `points[k] - points[0]`.
///
/// The result is orthogonal to every edge; its magnitude is `(D-1)!` times the
/// `(D-1)`-volume of the simplex. Not normalized, sign is unspecified.
pub fn raw_normal<const D: usize>(points: &[SVector<f64, D>]) -> SVector<f64, D> {
    debug_assert_eq!(points.len(), D, "a facet in R^D has D vertices");
    debug_assert!(D <= 4, "cofactor expansion is specialized to D <= 4");
    let mut rows = [[0.0_f64; 4]; 3];
    for (r, p) in points[1..].iter().enumerate() {
        let e = p - points[0];
        for c in 0..D {
            rows[r][c] = e[c];
        }
    }
    SVector::<f64, D>::from_fn(|j, _| {
        let det = minor_det(&rows, D - 1, j);
        if j % 2 == 0 {
            det
        } else {
            -det
        }
    })
}

/// Unit normal of the facet through `points`, or `None` (the null normal) when
/// the simplex is degenerate.
///
/// Degeneracy test: `|raw_normal| <= eps * Π|e_k|`. The ratio is the
/// generalized sine of the simplex, so collinear, coplanar, and duplicate
/// points all fail regardless of scale.
pub fn compute_normal<const D: usize>(
    points: &[SVector<f64, D>],
    eps: f64,
) -> Option<SVector<f64, D>> {
    let n = raw_normal(points);
    let norm = n.norm();
    let scale: f64 = points[1..].iter().map(|p| (p - points[0]).norm()).product();
    if !(norm.is_finite() && scale.is_finite()) || norm <= 0.0 || norm <= eps * scale {
        return None;
    }
    Some(n / norm)
}

/// Flip `normal` so that `under` lies on its negative side relative to `anchor`.
///
/// Returns the oriented normal and the (non-positive) signed distance of `under`.
#[inline]
pub fn orient_normal<const D: usize>(
    normal: SVector<f64, D>,
    anchor: &SVector<f64, D>,
    under: &SVector<f64, D>,
) -> (SVector<f64, D>, f64) {
    let d = normal.dot(&(under - anchor));
    if d > 0.0 {
        (-normal, -d)
    } else {
        (normal, d)
    }
}

/// Signed distance of `p` from the plane `normal · x = offset`.
#[inline]
pub fn signed_distance<const D: usize>(
    normal: &SVector<f64, D>,
    offset: f64,
    p: &SVector<f64, D>,
) -> f64 {
    normal.dot(p) - offset
}

/// Signed D-volume of the simplex on `D + 1` points.
///
/// Positive when the edges `points[k] - points[0]` form a right-handed frame.
pub fn simplex_volume<const D: usize>(points: &[SVector<f64, D>]) -> f64 {
    debug_assert_eq!(points.len(), D + 1);
    let m = DMatrix::<f64>::from_fn(D, D, |r, c| points[c + 1][r] - points[0][r]);
    let factorial: f64 = (1..=D).map(|k| k as f64).product();
    m.determinant() / factorial
}

/// Determinant of the `n×n` minor of `rows[..n]` with column `skip` removed.
fn minor_det(rows: &[[f64; 4]; 3], n: usize, skip: usize) -> f64 {
    let mut m = [[0.0_f64; 3]; 3];
    for r in 0..n {
        let mut c_out = 0;
        for c in 0..=n {
            if c == skip {
                continue;
            }
            m[r][c_out] = rows[r][c];
            c_out += 1;
        }
    }
    match n {
        1 => m[0][0],
        2 => m[0][0] * m[1][1] - m[0][1] * m[1][0],
        3 => det3(m),
        _ => 0.0,
    }
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests;
