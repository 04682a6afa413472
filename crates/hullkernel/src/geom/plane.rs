//! Least-squares plane fit used to detect coplanar 3D input.

use nalgebra::{Matrix3, SymmetricEigen, Vector2, Vector3};

/// Best-fit plane through a point cloud.
#[derive(Clone, Copy, Debug)]
pub struct PlaneFit {
    pub centroid: Vector3<f64>,
    /// Unit normal (direction of least variance).
    pub normal: Vector3<f64>,
    /// Largest absolute perpendicular distance of any input point.
    pub residual: f64,
}

impl PlaneFit {
    /// Coordinates of `p` in the orthonormal in-plane basis from [`plane_basis`].
    #[inline]
    pub fn project(&self, basis: &(Vector3<f64>, Vector3<f64>), p: &Vector3<f64>) -> Vector2<f64> {
        let d = p - self.centroid;
        Vector2::new(basis.0.dot(&d), basis.1.dot(&d))
    }
}

/// Fit a plane through `points` (centroid + smallest covariance eigenvector).
///
/// Returns `None` for empty input or non-finite coordinates.
pub fn fit_plane(points: &[Vector3<f64>]) -> Option<PlaneFit> {
    if points.is_empty() {
        return None;
    }
    let centroid = points.iter().sum::<Vector3<f64>>() / points.len() as f64;
    let mut cov = Matrix3::zeros();
    for p in points {
        let d = p - centroid;
        cov += d * d.transpose();
    }
    if !cov.iter().all(|x| x.is_finite()) {
        return None;
    }
    let eig = SymmetricEigen::new(cov);
    let imin = eig.eigenvalues.imin();
    let mut normal: Vector3<f64> = eig.eigenvectors.column(imin).into_owned();
    let norm = normal.norm();
    if !(norm.is_finite() && norm > 0.0) {
        return None;
    }
    normal /= norm;
    let residual = points
        .iter()
        .map(|p| normal.dot(&(p - centroid)).abs())
        .fold(0.0, f64::max);
    Some(PlaneFit {
        centroid,
        normal,
        residual,
    })
}

/// Orthonormal `(u, v)` spanning the plane with unit `normal`, with `u × v = normal`.
///
/// Counterclockwise order in `(u, v)` coordinates therefore faces along `normal`.
pub fn plane_basis(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let axis = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
        Vector3::x()
    } else if normal.y.abs() <= normal.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = normal.cross(&axis).normalize();
    let v = normal.cross(&u);
    (u, v)
}
