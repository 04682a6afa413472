//! Print hull and Delaunay counts for a few seeded point clouds.
//!
//! Usage:
//!   cargo run -p hullkernel --example hull_stats -- [points]
//!   cargo run -p hullkernel --example hull_stats -- 500 -v   # with debug events
//!
//! Prints, per cloud: 3D hull (V, E, F, volume), 4D hull of the lifted cloud
//! (V, ridges, F), and the Delaunay mesh (tetrahedra, faces, boundary faces).

use hullkernel::api::{create_3d_hull, create_4d_hull, create_delaunay_3d};
use nalgebra::{Vector3, Vector4};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

fn main() {
    let mut args = std::env::args().skip(1);
    let n: usize = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(200);
    let level = if args.next().as_deref() == Some("-v") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();

    for seed in [1u64, 2, 3] {
        let mut rng = StdRng::seed_from_u64(seed);
        let pts: Vec<Vector3<f64>> = (0..n)
            .map(|_| Vector3::from_fn(|_, _| rng.gen_range(-1.0..1.0)))
            .collect();

        match create_3d_hull(&pts, 1e-10) {
            Ok(h) => println!(
                "seed {seed}: hull3 V={} E={} F={} volume={:.6}",
                h.num_vertices(),
                h.num_edges(),
                h.num_facets(),
                h.volume()
            ),
            Err(e) => println!("seed {seed}: hull3 failed: {e}"),
        }

        let lifted: Vec<Vector4<f64>> = pts
            .iter()
            .map(|p| Vector4::new(p.x, p.y, p.z, p.norm_squared()))
            .collect();
        match create_4d_hull(&lifted, 1e-10) {
            Ok(h) => println!(
                "seed {seed}: hull4 V={} ridges={} F={}",
                h.num_vertices(),
                h.ridges.len(),
                h.num_facets()
            ),
            Err(e) => println!("seed {seed}: hull4 failed: {e}"),
        }

        match create_delaunay_3d(&pts, false) {
            Ok(m) => println!(
                "seed {seed}: delaunay T={} faces={} boundary={} volume={:.6}",
                m.num_tetrahedra(),
                m.faces.len(),
                m.boundary_faces().count(),
                m.volume()
            ),
            Err(e) => println!("seed {seed}: delaunay failed: {e}"),
        }
    }
}
