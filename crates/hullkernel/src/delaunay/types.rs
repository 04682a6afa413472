//! Tetrahedral mesh produced by the lifted-hull Delaunay construction.

use nalgebra::Vector3;

use crate::error::HullError;
use crate::geom::simplex_volume;

/// Relative slack for the sign of a zero-volume tetrahedron.
const FLAT_VOLUME_EPS: f64 = 1e-12;

/// Local corner pairs of a tetrahedron, in the order of `Tetrahedron::edges`.
pub const TET_EDGE_CORNERS: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Mesh vertex; `index` is the position in the caller's point array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex3 {
    pub index: usize,
    pub position: Vector3<f64>,
}

/// Tetrahedron over mesh vertex indices, oriented to non-negative volume.
///
/// `faces[i]` is the face opposite `vertices[i]`; `edges[k]` joins the corners
/// `TET_EDGE_CORNERS[k]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tetrahedron {
    pub vertices: [usize; 4],
    pub faces: [usize; 4],
    pub edges: [usize; 6],
}

/// Triangle shared by one tetrahedron (boundary) or two (interior).
///
/// Vertex order makes the owner's opposite corner lie on the negative side of
/// `(v1 - v0) × (v2 - v0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TetFace {
    pub vertices: [usize; 3],
    pub owned: usize,
    pub other: Option<usize>,
}

impl TetFace {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.other.is_none()
    }
}

/// Mesh edge with every incident tetrahedron.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TetEdge {
    pub vertices: [usize; 2],
    pub tetrahedra: Vec<usize>,
}

/// Delaunay tetrahedralization of a 3D point set.
///
/// Invariants:
/// - Every face is shared by at most two tetrahedra, and each listed
///   tetrahedron names the face in its `faces`.
/// - `vertices[i].index` is the input index of mesh vertex `i`; with
///   `reuse_input_vertices` that is `i` itself.
/// - `perturbation` is the jiggle the successful attempt used (0 if none).
#[derive(Clone, Debug, PartialEq)]
pub struct DelaunayMesh3 {
    pub vertices: Vec<MeshVertex3>,
    pub tetrahedra: Vec<Tetrahedron>,
    pub faces: Vec<TetFace>,
    pub edges: Vec<TetEdge>,
    pub perturbation: f64,
}

impl DelaunayMesh3 {
    #[inline]
    pub fn num_tetrahedra(&self) -> usize {
        self.tetrahedra.len()
    }

    /// Signed volume of tetrahedron `t`.
    pub fn tet_volume(&self, t: usize) -> f64 {
        let corners = self.tetrahedra[t].vertices.map(|v| self.vertices[v].position);
        simplex_volume(&corners)
    }

    /// Sum of all tetrahedron volumes.
    pub fn volume(&self) -> f64 {
        (0..self.tetrahedra.len()).map(|t| self.tet_volume(t)).sum()
    }

    /// Faces with a single tetrahedron.
    pub fn boundary_faces(&self) -> impl Iterator<Item = &TetFace> + '_ {
        self.faces.iter().filter(|f| f.is_boundary())
    }

    /// Check face multiplicity, face/edge back-references, and orientation.
    pub fn validate(&self) -> Result<(), HullError> {
        let mut claims = vec![0usize; self.faces.len()];
        for (ti, t) in self.tetrahedra.iter().enumerate() {
            if t.vertices.iter().any(|&v| v >= self.vertices.len()) {
                return Err(HullError::inconsistent(format!(
                    "tetrahedron {ti} references a missing vertex"
                )));
            }
            for (i, &fi) in t.faces.iter().enumerate() {
                let face = self.faces.get(fi).ok_or_else(|| {
                    HullError::inconsistent(format!("tetrahedron {ti} lists missing face {fi}"))
                })?;
                if face.owned != ti && face.other != Some(ti) {
                    return Err(HullError::inconsistent(format!(
                        "face {fi} does not reference tetrahedron {ti}"
                    )));
                }
                let mut expect: Vec<usize> =
                    (0..4).filter(|&k| k != i).map(|k| t.vertices[k]).collect();
                let mut got = face.vertices.to_vec();
                expect.sort_unstable();
                got.sort_unstable();
                if expect != got {
                    return Err(HullError::inconsistent(format!(
                        "face {fi} is not opposite corner {i} of tetrahedron {ti}"
                    )));
                }
                claims[fi] += 1;
            }
            for (k, &ei) in t.edges.iter().enumerate() {
                let edge = self.edges.get(ei).ok_or_else(|| {
                    HullError::inconsistent(format!("tetrahedron {ti} lists missing edge {ei}"))
                })?;
                let [a, b] = TET_EDGE_CORNERS[k].map(|c| t.vertices[c]);
                if edge.vertices != [a.min(b), a.max(b)] || !edge.tetrahedra.contains(&ti) {
                    return Err(HullError::inconsistent(format!(
                        "edge {ei} does not match tetrahedron {ti}"
                    )));
                }
            }
            let reach = TET_EDGE_CORNERS
                .iter()
                .map(|&[a, b]| {
                    let (p, q) = (t.vertices[a], t.vertices[b]);
                    (self.vertices[p].position - self.vertices[q].position).norm()
                })
                .fold(0.0, f64::max);
            if self.tet_volume(ti) < -FLAT_VOLUME_EPS * reach.powi(3) {
                return Err(HullError::inconsistent(format!(
                    "tetrahedron {ti} has negative volume"
                )));
            }
        }
        for (fi, f) in self.faces.iter().enumerate() {
            let expected = if f.is_boundary() { 1 } else { 2 };
            if f.other == Some(f.owned) || claims[fi] != expected {
                return Err(HullError::inconsistent(format!(
                    "face {fi} is claimed by {} tetrahedra",
                    claims[fi]
                )));
            }
        }
        Ok(())
    }
}
