use super::build::{extrema_can_split, lift};
use super::*;
use crate::cfg::HullCfg;
use crate::error::HullError;
use crate::hull::create_3d_hull;
use nalgebra::{vector, Vector3};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeSet;

fn random_cloud(seed: u64, n: usize) -> Vec<Vector3<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Vector3::from_fn(|_, _| rng.gen_range(-1.0..1.0)))
        .collect()
}

#[test]
fn lift_appends_squared_distance_to_center() {
    let l = lift(&[vector![1.0, 2.0, -2.0]], &Vector3::zeros());
    assert_eq!(l[0], vector![1.0, 2.0, -2.0, 9.0]);
    let l = lift(&[vector![11.0, 2.0, -2.0]], &vector![10.0, 0.0, 0.0]);
    assert_eq!(l[0], vector![1.0, 2.0, -2.0, 9.0]);
}

#[test]
fn tied_extrema_are_told_apart_from_collapsed_ones() {
    let square = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![1.0, 1.0, 0.0],
    ];
    assert!(extrema_can_split(&lift(&square, &vector![0.5, 0.5, 0.0]), 1e-9));
    // Two opposite corners own every axis extremum; the third point is the w minimum.
    let diagonal = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 1.0, 1.0],
        vector![0.4, 0.5, 0.6],
        vector![0.2, 0.3, 0.35],
    ];
    assert!(!extrema_can_split(&lift(&diagonal, &Vector3::repeat(0.5)), 1e-9));
}

#[test]
fn four_points_give_one_tetrahedron() {
    let pts = vec![
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![0.0, 0.0, 1.0],
    ];
    let m = create_delaunay_3d(&pts, true).unwrap();
    assert_eq!(m.num_tetrahedra(), 1);
    assert_eq!(m.faces.len(), 4);
    assert_eq!(m.edges.len(), 6);
    assert_eq!(m.boundary_faces().count(), 4);
    assert!(m.edges.iter().all(|e| e.tetrahedra == vec![0]));
    assert!((m.volume() - 1.0 / 6.0).abs() < 1e-12);
    m.validate().unwrap();

    // Boundary faces face outward: the opposite corner is on the negative side.
    let t = &m.tetrahedra[0];
    for (i, &fi) in t.faces.iter().enumerate() {
        let f = &m.faces[fi];
        let p = |v: usize| m.vertices[v].position;
        let n = (p(f.vertices[1]) - p(f.vertices[0])).cross(&(p(f.vertices[2]) - p(f.vertices[0])));
        assert!(n.dot(&(p(t.vertices[i]) - p(f.vertices[0]))) < 0.0);
    }
}

#[test]
fn lifted_square_gives_two_tetrahedra_over_the_same_corners() {
    let pts = vec![
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![1.0, 1.0, 0.0],
    ];
    let m = create_delaunay_3d(&pts, true).unwrap();
    assert!(m.perturbation > 0.0);
    assert_eq!(m.num_tetrahedra(), 2);
    let a: BTreeSet<usize> = m.tetrahedra[0].vertices.into_iter().collect();
    let b: BTreeSet<usize> = m.tetrahedra[1].vertices.into_iter().collect();
    assert_eq!(a, b);
    assert_eq!(a.len(), 4);
    // Every face is interior: shared by both tetrahedra.
    assert_eq!(m.faces.len(), 4);
    assert_eq!(m.boundary_faces().count(), 0);
    assert!(m.faces.iter().all(|f| f.other.is_some()));
    assert!(m.volume().abs() < 1e-12);
    m.validate().unwrap();
}

#[test]
fn coplanar_kite_gives_two_flat_tetrahedra() {
    let pts = vec![
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![2.0, 2.0, 0.0],
    ];
    let m = create_delaunay_3d(&pts, true).unwrap();
    assert!(m.perturbation > 0.0);
    assert_eq!(m.num_tetrahedra(), 2);
    assert_eq!(m.volume(), 0.0);
    m.validate().unwrap();
}

#[test]
fn five_coplanar_points_give_flat_tetrahedra() {
    let pts = vec![
        vector![0.0, 0.0, 1.0],
        vector![2.0, 0.0, 1.0],
        vector![0.0, 2.0, 1.0],
        vector![2.0, 2.5, 1.0],
        vector![0.8, 0.9, 1.0],
    ];
    let m = create_delaunay_3d(&pts, false).unwrap();
    assert!(m.perturbation > 0.0);
    assert!(m.num_tetrahedra() >= 2);
    assert!(m.volume().abs() < 1e-12);
    m.validate().unwrap();
}

#[test]
fn point_extreme_on_every_axis_is_degenerate_input() {
    let mut rng = StdRng::seed_from_u64(12);
    let mut pts = vec![Vector3::zeros(), Vector3::repeat(1.0)];
    pts.extend((0..30).map(|_| Vector3::from_fn(|_, _| rng.gen_range(0.1..0.9))));
    // The 3D hull exists, but the lift has only three distinct axis extrema.
    assert!(create_3d_hull(&pts, 1e-10).is_ok());
    assert!(matches!(
        create_delaunay_3d(&pts, true),
        Err(HullError::DegenerateInput { .. })
    ));
}

#[test]
fn retry_budget_bounds_the_whole_construction() {
    let square = vec![
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![1.0, 1.0, 0.0],
    ];
    let cfg = HullCfg {
        retry_budget: 0,
        ..HullCfg::default()
    };
    let err = create_delaunay_3d_with_cfg(&square, true, cfg).unwrap_err();
    assert!(matches!(err, HullError::NumericDegeneracy { attempts: 1, .. }));
}

#[test]
fn translated_cloud_matches_its_hull() {
    let offset = vector![1e4, -1e4, 1e4];
    for seed in 0..10 {
        let pts: Vec<Vector3<f64>> = random_cloud(100 + seed, 40)
            .into_iter()
            .map(|p| p + offset)
            .collect();
        let m = create_delaunay_3d(&pts, true).unwrap();
        m.validate().unwrap();
        let hull = create_3d_hull(&pts, 1e-10).unwrap();
        assert!((m.volume() - hull.volume()).abs() < 1e-6);
    }
}

#[test]
fn random_cloud_tiles_its_convex_hull() {
    let pts = random_cloud(31, 60);
    let m = create_delaunay_3d(&pts, true).unwrap();
    m.validate().unwrap();
    let hull = create_3d_hull(&pts, 1e-10).unwrap();
    assert!((m.volume() - hull.volume()).abs() < 1e-9);

    // Boundary faces of the mesh cover the hull surface.
    let boundary_area: f64 = m
        .boundary_faces()
        .map(|f| {
            let p = |v: usize| m.vertices[v].position;
            0.5 * (p(f.vertices[1]) - p(f.vertices[0]))
                .cross(&(p(f.vertices[2]) - p(f.vertices[0])))
                .norm()
        })
        .sum();
    assert!((boundary_area - hull.surface_area()).abs() < 1e-9);

    // Empty circumsphere: no input point strictly inside any tetrahedron's.
    for t in &m.tetrahedra {
        let c = t.vertices.map(|v| m.vertices[v].position);
        let Some((center, r2)) = circumsphere(&c) else {
            continue;
        };
        // Boundary slivers have huge, badly conditioned circumspheres.
        if r2 > 1e4 {
            continue;
        }
        for p in &pts {
            assert!((p - center).norm_squared() >= r2 * (1.0 - 1e-9) - 1e-9);
        }
    }
}

fn circumsphere(c: &[Vector3<f64>; 4]) -> Option<(Vector3<f64>, f64)> {
    let a = nalgebra::Matrix3::from_rows(&[
        (c[1] - c[0]).transpose(),
        (c[2] - c[0]).transpose(),
        (c[3] - c[0]).transpose(),
    ]);
    let rhs = Vector3::new(
        0.5 * (c[1] - c[0]).norm_squared(),
        0.5 * (c[2] - c[0]).norm_squared(),
        0.5 * (c[3] - c[0]).norm_squared(),
    );
    let x = a.lu().solve(&rhs)?;
    Some((c[0] + x, x.norm_squared()))
}

#[test]
fn cube_corners_split_into_unit_volume() {
    let mut pts = Vec::new();
    for x in [0.0, 1.0] {
        for y in [0.0, 1.0] {
            for z in [0.0, 1.0] {
                pts.push(vector![x, y, z]);
            }
        }
    }
    let m = create_delaunay_3d(&pts, true).unwrap();
    m.validate().unwrap();
    assert!((m.volume() - 1.0).abs() < 1e-6);
}

#[test]
fn reuse_flag_controls_vertex_numbering() {
    let mut pts = random_cloud(8, 20);
    // A duplicate: exactly one of the twins ends up as a corner.
    pts.push(pts[3]);
    let dup = pts.len() - 1;

    let reused = create_delaunay_3d(&pts, true).unwrap();
    assert_eq!(reused.vertices.len(), pts.len());
    assert!(reused.vertices.iter().enumerate().all(|(i, v)| v.index == i));
    let unused: Vec<usize> = (0..pts.len())
        .filter(|i| reused.tetrahedra.iter().all(|t| !t.vertices.contains(i)))
        .collect();
    assert_eq!(unused.len(), 1);
    assert!(unused[0] == 3 || unused[0] == dup);

    let compact = create_delaunay_3d(&pts, false).unwrap();
    assert_eq!(compact.vertices.len(), pts.len() - 1);
    assert!(compact.vertices.iter().all(|v| v.index != unused[0]));
    assert!(compact.vertices.windows(2).all(|w| w[0].index < w[1].index));
    assert_eq!(compact.num_tetrahedra(), reused.num_tetrahedra());
    // Same tetrahedra, expressed in input indices.
    let as_input = |m: &DelaunayMesh3| -> BTreeSet<Vec<usize>> {
        m.tetrahedra
            .iter()
            .map(|t| {
                let mut v: Vec<usize> = t.vertices.iter().map(|&i| m.vertices[i].index).collect();
                v.sort_unstable();
                v
            })
            .collect()
    };
    assert_eq!(as_input(&compact), as_input(&reused));
    compact.validate().unwrap();
}

#[test]
fn too_few_or_collinear_points_are_rejected() {
    let three = random_cloud(1, 3);
    assert!(matches!(
        create_delaunay_3d(&three, true),
        Err(HullError::DegenerateInput { .. })
    ));
    let line: Vec<Vector3<f64>> = (0..6).map(|i| Vector3::repeat(i as f64)).collect();
    assert!(matches!(
        create_delaunay_3d(&line, false),
        Err(HullError::DegenerateInput { .. })
    ));
}

// ---------- properties ----------

fn cloud() -> impl Strategy<Value = Vec<Vector3<f64>>> {
    prop::collection::vec(prop::array::uniform3(-10.0..10.0f64), 5..30)
        .prop_map(|v| v.into_iter().map(Vector3::from).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_delaunay_is_valid_and_fills_the_hull(pts in cloud()) {
        let m = create_delaunay_3d(&pts, true);
        prop_assert!(m.is_ok(), "Delaunay failed: {:?}", m.err());
        let m = m.unwrap();
        prop_assert!(m.validate().is_ok());
        let hull = create_3d_hull(&pts, 1e-10).unwrap();
        let v = hull.volume();
        prop_assert!((m.volume() - v).abs() <= 1e-8 * (1.0 + v), "{} vs {}", m.volume(), v);
    }
}
