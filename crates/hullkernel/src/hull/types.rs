//! Finalized hull: plain data with input-index identity.

use std::collections::HashSet;

use nalgebra::{SVector, Vector3};

use crate::error::HullError;
use crate::geom::signed_distance;

/// Hull corner; `index` is the position in the caller's point array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HullVertex<const D: usize> {
    pub index: usize,
    pub position: SVector<f64, D>,
}

/// Boundary facet.
///
/// `vertices` holds input indices. For simplicial facets (the general case)
/// there are D of them and `ridges[i]` is opposite `vertices[i]`. Facets from
/// the planar 3D fallback are polygons; there `ridges[i]` is the edge
/// `(vertices[i], vertices[i + 1])` and `interior_vertices` lists the input
/// points strictly inside the polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct HullFacet<const D: usize> {
    pub vertices: Vec<usize>,
    pub normal: SVector<f64, D>,
    pub offset: f64,
    pub ridges: Vec<usize>,
    pub interior_vertices: Vec<usize>,
}

impl<const D: usize> HullFacet<D> {
    /// Signed distance of `p`; positive outside.
    #[inline]
    pub fn distance(&self, p: &SVector<f64, D>) -> f64 {
        signed_distance(&self.normal, self.offset, p)
    }
}

/// Ridge shared by exactly two facets (`owned`, `other` index into `facets`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HullRidge {
    pub vertices: Vec<usize>,
    pub owned: usize,
    pub other: usize,
}

/// Closed convex hull in R^D.
///
/// Invariants:
/// - `vertices` are exactly the facet corners, sorted by `index`.
/// - Every ridge joins two distinct facets; every facet lists its ridges.
/// - `edges` is the sorted, deduplicated 1-skeleton as input-index pairs `a < b`.
/// - `perturbation` is the largest per-coordinate jiggle the successful attempt
///   used (0 when the first attempt succeeded). Geometry is always reported on
///   the caller's original coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexHull<const D: usize> {
    pub vertices: Vec<HullVertex<D>>,
    pub facets: Vec<HullFacet<D>>,
    pub ridges: Vec<HullRidge>,
    pub edges: Vec<[usize; 2]>,
    pub tolerance: f64,
    pub perturbation: f64,
}

pub type Hull3 = ConvexHull<3>;
pub type Hull4 = ConvexHull<4>;

impl<const D: usize> ConvexHull<D> {
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }
    #[inline]
    pub fn num_facets(&self) -> usize {
        self.facets.len()
    }
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Input indices of the hull corners, ascending.
    pub fn vertex_indices(&self) -> Vec<usize> {
        self.vertices.iter().map(|v| v.index).collect()
    }

    /// Corner with input index `index`, if it is one.
    pub fn vertex(&self, index: usize) -> Option<&HullVertex<D>> {
        self.vertices
            .binary_search_by_key(&index, |v| v.index)
            .ok()
            .map(|at| &self.vertices[at])
    }

    /// Slack used for containment checks: tolerance plus the worst-case
    /// displacement of a jiggled point.
    #[inline]
    pub fn containment_slack(&self) -> f64 {
        self.tolerance + 2.0 * (D as f64).sqrt() * self.perturbation
    }

    /// `p` lies inside or within the containment slack of every facet.
    ///
    /// A facet-free hull (single point) contains only points within the
    /// slack of its vertex.
    pub fn contains(&self, p: &SVector<f64, D>) -> bool {
        let slack = self.containment_slack();
        if self.facets.is_empty() {
            return self
                .vertices
                .iter()
                .any(|v| (v.position - p).norm() <= slack);
        }
        self.facets.iter().all(|f| f.distance(p) <= slack)
    }

    /// Check closure, vertex minimality, and containment of `points`.
    pub fn validate(&self, points: &[SVector<f64, D>]) -> Result<(), HullError> {
        for (ri, r) in self.ridges.iter().enumerate() {
            if r.owned == r.other {
                return Err(HullError::inconsistent(format!(
                    "ridge {ri} has the same facet on both sides"
                )));
            }
            for f in [r.owned, r.other] {
                let facet = self.facets.get(f).ok_or_else(|| {
                    HullError::inconsistent(format!("ridge {ri} points at missing facet {f}"))
                })?;
                if !facet.ridges.contains(&ri) {
                    return Err(HullError::inconsistent(format!(
                        "facet {f} does not list ridge {ri}"
                    )));
                }
            }
        }
        let mut corners = HashSet::new();
        for (fi, f) in self.facets.iter().enumerate() {
            for &ri in &f.ridges {
                let r = self.ridges.get(ri).ok_or_else(|| {
                    HullError::inconsistent(format!("facet {fi} lists missing ridge {ri}"))
                })?;
                if r.owned != fi && r.other != fi {
                    return Err(HullError::inconsistent(format!(
                        "ridge {ri} does not reference facet {fi}"
                    )));
                }
            }
            corners.extend(f.vertices.iter().copied());
        }
        let listed: HashSet<usize> = self.vertices.iter().map(|v| v.index).collect();
        if !self.facets.is_empty() && listed != corners {
            return Err(HullError::inconsistent(format!(
                "{} facet corners but {} hull vertices",
                corners.len(),
                listed.len()
            )));
        }
        if let Some((i, _)) = points.iter().enumerate().find(|(_, p)| !self.contains(p)) {
            return Err(HullError::inconsistent(format!(
                "input point {i} lies outside the hull"
            )));
        }
        Ok(())
    }
}

impl ConvexHull<3> {
    /// Total facet area (a flat hull counts both sides).
    pub fn surface_area(&self) -> f64 {
        self.facets.iter().map(|f| self.polygon_area(f)).sum()
    }

    /// Enclosed volume; zero for a flat hull.
    pub fn volume(&self) -> f64 {
        if self.vertices.is_empty() {
            return 0.0;
        }
        let center = self.vertices.iter().map(|v| v.position).sum::<Vector3<f64>>()
            / self.vertices.len() as f64;
        self.facets
            .iter()
            .map(|f| self.polygon_area(f) * (f.offset - f.normal.dot(&center)).max(0.0) / 3.0)
            .sum()
    }

    fn polygon_area(&self, f: &HullFacet<3>) -> f64 {
        let pos = |i: usize| self.vertex(i).map(|v| v.position).unwrap_or_else(Vector3::zeros);
        let anchor = pos(f.vertices[0]);
        f.vertices
            .windows(2)
            .skip(1)
            .map(|w| 0.5 * (pos(w[0]) - anchor).cross(&(pos(w[1]) - anchor)).norm())
            .sum()
    }
}
