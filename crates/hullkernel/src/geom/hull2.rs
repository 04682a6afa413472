//! 2D convex hull on indices, used by the planar 3D fallback.

use std::cmp::Ordering;

use nalgebra::Vector2;

/// Andrew's monotone chain. Returns indices into `points` of the hull corners
/// in counterclockwise order.
///
/// Collinear boundary points and duplicates are not corners. Fewer than three
/// returned indices means the input is collinear (or a single point).
pub fn convex_hull_2d(points: &[Vector2<f64>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (points[a], points[b]);
        match pa.x.partial_cmp(&pb.x).unwrap_or(Ordering::Equal) {
            Ordering::Equal => pa
                .y
                .partial_cmp(&pb.y)
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b)),
            o => o,
        }
    });
    order.dedup_by(|a, b| (points[*a] - points[*b]).norm() < 1e-12);
    if order.len() < 3 {
        return order;
    }
    let mut lower: Vec<usize> = Vec::with_capacity(order.len());
    for &i in &order {
        while lower.len() >= 2
            && cross(
                points[lower[lower.len() - 2]],
                points[lower[lower.len() - 1]],
                points[i],
            ) <= 0.0
        {
            lower.pop();
        }
        lower.push(i);
    }
    let mut upper: Vec<usize> = Vec::with_capacity(order.len());
    for &i in order.iter().rev() {
        while upper.len() >= 2
            && cross(
                points[upper[upper.len() - 2]],
                points[upper[upper.len() - 1]],
                points[i],
            ) <= 0.0
        {
            upper.pop();
        }
        upper.push(i);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    hull
}

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}
