//! Akl–Toussaint style extrema: the 2·D axis-extreme points.

use std::cmp::Ordering;

use nalgebra::SVector;

/// Indices of the points extreme along `+e_a` and `-e_a` for every axis `a`.
///
/// Ties on axis `a` are broken on axis `(a + 1) % D` in the same direction,
/// then by the lower index, so the result is reproducible. Duplicates (a point
/// extreme along several axes) are removed keeping first occurrence; the order
/// is `+x, -x, +y, -y, ...`.
pub(crate) fn axis_extrema<const D: usize>(points: &[SVector<f64, D>]) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::with_capacity(2 * D);
    if points.is_empty() {
        return out;
    }
    for axis in 0..D {
        let next = (axis + 1) % D;
        for sign in [1.0, -1.0] {
            let key = |i: usize| (sign * points[i][axis], sign * points[i][next]);
            let mut best = 0;
            for i in 1..points.len() {
                let (a, b) = (key(i), key(best));
                let better = match a.0.partial_cmp(&b.0) {
                    Some(Ordering::Greater) => true,
                    Some(Ordering::Equal) => a.1 > b.1,
                    _ => false,
                };
                if better {
                    best = i;
                }
            }
            if !out.contains(&best) {
                out.push(best);
            }
        }
    }
    out
}
