use super::util::{binomial, combinations};
use super::*;
use nalgebra::{vector, Vector2, Vector3, Vector4};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn raw_normal_3d_is_cross_product() {
    let pts = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
    ];
    let n = raw_normal(&pts);
    assert!((n - vector![0.0, 0.0, 1.0]).norm() < 1e-15);

    let mut rng = StdRng::seed_from_u64(7);
    let p: Vec<Vector3<f64>> = (0..3)
        .map(|_| Vector3::from_fn(|_, _| rng.gen_range(-1.0..1.0)))
        .collect();
    let expected = (p[1] - p[0]).cross(&(p[2] - p[0]));
    assert!((raw_normal(&p) - expected).norm() < 1e-12);
}

#[test]
fn raw_normal_4d_is_orthogonal_to_edges() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let p: Vec<Vector4<f64>> = (0..4)
            .map(|_| Vector4::from_fn(|_, _| rng.gen_range(-2.0..2.0)))
            .collect();
        let n = raw_normal(&p);
        for k in 1..4 {
            assert!(n.dot(&(p[k] - p[0])).abs() < 1e-10);
        }
        assert!(n.norm() > 0.0);
    }
}

#[test]
fn compute_normal_flags_degenerate_simplices() {
    let eps = crate::cfg::NORMAL_EPS;
    // Collinear triangle.
    let line = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 1.0, 1.0],
        vector![2.0, 2.0, 2.0],
    ];
    assert!(compute_normal(&line, eps).is_none());
    // Duplicate vertex.
    let dup = [
        vector![0.0, 0.0, 0.0],
        vector![0.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
    ];
    assert!(compute_normal(&dup, eps).is_none());
    // Coplanar tetrahedron in R^4 (all in the w = 0, z = 0 plane).
    let flat = [
        vector![0.0, 0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0, 0.0],
        vector![1.0, 1.0, 0.0, 0.0],
    ];
    assert!(compute_normal(&flat, eps).is_none());
    // Regular case, tiny scale still fine (relative test).
    let tiny = [
        vector![0.0, 0.0, 0.0, 0.0],
        vector![1e-6, 0.0, 0.0, 0.0],
        vector![0.0, 1e-6, 0.0, 0.0],
        vector![0.0, 0.0, 1e-6, 0.0],
    ];
    let n = compute_normal(&tiny, eps).expect("well-shaped simplex");
    assert!((n.norm() - 1.0).abs() < 1e-12);
    assert!((n[3].abs() - 1.0).abs() < 1e-12);
}

#[test]
fn orient_normal_points_away_from_under() {
    let anchor = vector![0.0, 0.0, 0.0];
    let under = vector![0.0, 0.0, -1.0];
    let (n, d) = orient_normal(vector![0.0, 0.0, -1.0], &anchor, &under);
    assert_eq!(n, vector![0.0, 0.0, 1.0]);
    assert!((d + 1.0).abs() < 1e-15);
    let (n2, _) = orient_normal(vector![0.0, 0.0, 1.0], &anchor, &under);
    assert_eq!(n2, n);
}

#[test]
fn simplex_volume_signs_and_magnitudes() {
    let tet = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![0.0, 0.0, 1.0],
    ];
    assert!((simplex_volume(&tet) - 1.0 / 6.0).abs() < 1e-15);
    let flipped = [tet[0], tet[2], tet[1], tet[3]];
    assert!((simplex_volume(&flipped) + 1.0 / 6.0).abs() < 1e-15);
    let mut s4 = [Vector4::zeros(); 5];
    for k in 0..4 {
        s4[k + 1][k] = 1.0;
    }
    assert!((simplex_volume(&s4) - 1.0 / 24.0).abs() < 1e-15);
}

#[test]
fn plane_fit_detects_coplanar_and_tilted_sets() {
    let pts = vec![
        vector![0.0, 0.0, 1.0],
        vector![1.0, 0.0, 2.0],
        vector![0.0, 1.0, 1.0],
        vector![1.0, 1.0, 2.0],
        vector![0.5, 0.3, 1.5],
    ];
    let fit = fit_plane(&pts).unwrap();
    assert!(fit.residual < 1e-12);
    let expected = vector![1.0, 0.0, -1.0].normalize();
    assert!((fit.normal.dot(&expected).abs() - 1.0).abs() < 1e-12);

    let mut bumpy = pts.clone();
    bumpy.push(vector![0.5, 0.5, 3.0]);
    assert!(fit_plane(&bumpy).unwrap().residual > 0.1);
    assert!(fit_plane(&[]).is_none());
}

#[test]
fn plane_basis_is_right_handed() {
    for n in [
        vector![0.0, 0.0, 1.0],
        vector![1.0, 2.0, 3.0].normalize(),
        vector![-1.0, 0.0, 0.0],
    ] {
        let (u, v) = plane_basis(&n);
        assert!(u.dot(&n).abs() < 1e-12 && v.dot(&n).abs() < 1e-12);
        assert!((u.cross(&v) - n).norm() < 1e-12);
    }
}

#[test]
fn hull2_drops_interior_and_collinear_points() {
    let pts = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(2.0, 0.0),
        Vector2::new(1.0, 0.0), // on an edge
        Vector2::new(2.0, 2.0),
        Vector2::new(0.0, 2.0),
        Vector2::new(1.0, 1.0), // interior
        Vector2::new(0.0, 0.0), // duplicate
    ];
    let hull = convex_hull_2d(&pts);
    assert_eq!(hull, vec![0, 1, 3, 4]);

    let line = vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0), Vector2::new(2.0, 2.0)];
    assert_eq!(convex_hull_2d(&line).len(), 2);
}

#[test]
fn combinations_enumerate_every_subset() {
    let items = [10, 11, 12, 13, 14];
    let c = combinations(&items, 4);
    assert_eq!(c.len(), binomial(5, 4));
    assert_eq!(c.first().unwrap(), &vec![10, 11, 12, 13]);
    assert_eq!(c.last().unwrap(), &vec![11, 12, 13, 14]);
    assert_eq!(combinations(&items, 5).len(), 1);
    assert!(combinations(&items, 6).is_empty());
    assert_eq!(combinations(&[0, 1, 2, 3, 4, 5, 6, 7], 4).len(), 70);
}
