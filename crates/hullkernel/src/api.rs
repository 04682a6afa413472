//! Curated API (UNSTABLE).
//!
//! Prefer these re-exports over deep module paths; internals may move.

// Hulls
pub use crate::hull::{
    create_3d_hull, create_3d_hull_with_cfg, create_4d_hull, create_4d_hull_with_cfg, ConvexHull,
    Hull3, Hull4, HullFacet, HullRidge, HullVertex,
};
// Delaunay
pub use crate::delaunay::{
    create_delaunay_3d, create_delaunay_3d_with_cfg, DelaunayMesh3, MeshVertex3, TetEdge, TetFace,
    Tetrahedron,
};
// Configuration and errors
pub use crate::cfg::{resolve_tolerance, HullCfg, BASE_TOLERANCE};
pub use crate::error::HullError;
// Geometric primitives
pub use crate::geom::{compute_normal, raw_normal, simplex_volume};
pub use crate::mesh::SimplexKey;
