//! Convex hulls of finite point sets in R^3 and R^4.
//!
//! Entry points
//! - `create_3d_hull(points, tolerance)`: closed triangulated hull, or the
//!   two-sided polygon hull when the input is coplanar.
//! - `create_4d_hull(points, tolerance)`: closed hull with tetrahedral facets.
//! - `*_with_cfg` variants take a full `HullCfg` (jiggle amplitude, retry
//!   budget, RNG seed).
//!
//! Pipeline
//! - Axis extrema pick the seed simplex (3D: thickest extrema tetrahedron,
//!   4D: double-sided tetrahedron over the best four extrema).
//! - `engine::Engine` runs the conflict-list loop on the shared `mesh` arena.
//! - `retry::with_jiggle` repeats the attempt on perturbed copies when the
//!   attempt hits a numeric degeneracy.
//! - The result is plain data (`ConvexHull`) keyed by input indices and
//!   reported on the caller's coordinates.
//!
//! Tolerance
//! - A point counts as outside a facet only if its signed distance exceeds the
//!   tolerance. Non-positive or NaN tolerances resolve to `BASE_TOLERANCE`.

mod dim3;
mod dim4;
mod engine;
mod extrema;
pub(crate) mod retry;
mod types;

pub use dim3::{create_3d_hull, create_3d_hull_with_cfg};
pub use dim4::{create_4d_hull, create_4d_hull_with_cfg};
pub use types::{ConvexHull, Hull3, Hull4, HullFacet, HullRidge, HullVertex};
