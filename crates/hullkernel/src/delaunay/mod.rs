//! Delaunay tetrahedralization of 3D points via the paraboloid lift.
//!
//! Method
//! - Lift every point to `(p - c, |p - c|²)`, `c` the bounding-box center, and
//!   build the 4D convex hull. The retry budget covers the whole construction;
//!   the inner hull never retries on its own.
//! - Facets whose outward normal points down in `w` form the lower hull; their
//!   projections are the Delaunay tetrahedra.
//! - Faces and edges are deduplicated by `SimplexKey`. Each face records the
//!   tetrahedron that created it (`owned`) and, for interior faces, the second
//!   one (`other`).
//!
//! Coplanar input has no lower facet; it goes through the jiggle path and comes
//! back as zero-volume tetrahedra, classified with the jiggled normals. Four
//! coplanar points give two tetrahedra over the same four vertices.
//!
//! The lifted hull needs four distinct axis extrema. When they are only tied
//! (cocircular input) a jiggle separates them; when one point is extreme on
//! several axes the input is reported as `DegenerateInput`.

mod build;
mod types;

pub use build::{create_delaunay_3d, create_delaunay_3d_with_cfg};
pub use types::{DelaunayMesh3, MeshVertex3, TetEdge, TetFace, Tetrahedron, TET_EDGE_CORNERS};

#[cfg(test)]
mod tests;
