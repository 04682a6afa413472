//! Convex hulls in R^3 and R^4 and 3D Delaunay tetrahedralization.
//!
//! Layout
//! - `geom`: normals, orientation, simplex volumes, plane fit, 2D hull.
//! - `mesh`: arena of facets and ridges used while a hull is under construction.
//! - `hull`: incremental conflict-list hull for D ∈ {3, 4}, with jiggle-retry.
//! - `delaunay`: tetrahedralization through the lower hull of the lifted points.
//! - `cfg`, `error`: tolerances and the error taxonomy.
//!
//! API Policy
//! - Results are plain data keyed by input indices; no construction state
//!   survives a call. A new point set always means a full rebuild.
//! - `api` holds the curated surface; module paths may move.
//!
//! Logging
//! - The crate emits `tracing` events (`debug` per construction, `warn` per
//!   jiggle, `trace` per cone rebuild) and installs no subscriber.

pub mod api;
pub mod cfg;
pub mod delaunay;
pub mod error;
pub mod geom;
pub mod hull;
pub mod mesh;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::HullCfg;
pub use error::HullError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::HullCfg;
    pub use crate::delaunay::{create_delaunay_3d, DelaunayMesh3};
    pub use crate::error::HullError;
    pub use crate::hull::{create_3d_hull, create_4d_hull, ConvexHull, Hull3, Hull4};
    pub use nalgebra::{Vector3 as Vec3, Vector4 as Vec4};
}
