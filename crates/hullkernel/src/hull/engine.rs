//! Incremental conflict-list engine shared by the 3D and 4D hulls.
//!
//! Algorithm (one attempt)
//! - A dimension-specific seed inserts the first facets and assigns every
//!   remaining point to the facet it is farthest outside of (or discards it).
//! - Loop: pop the facet with the globally farthest peak; search the facets
//!   visible from that apex breadth-first across ridges; delete them; build one
//!   new facet per horizon ridge; reassign the orphaned conflict points against
//!   the new facets only; enqueue the new facets that received a peak.
//! - Finalize against the caller's coordinates.
//!
//! Any numeric trouble (null normal, undecidable orientation, over-claimed
//! ridge) aborts the attempt with `HullError::NumericDegeneracy`; the retry
//! driver decides what happens next.

use std::collections::{BTreeSet, HashMap};

use nalgebra::SVector;

use super::types::{ConvexHull, HullFacet, HullRidge, HullVertex};
use crate::cfg::HullCfg;
use crate::error::HullError;
use crate::geom::{compute_normal, orient_normal};
use crate::mesh::{FacetId, IndexedHeap, Mesh, RidgeId};

/// Horizon ridge found by a visibility search, with the two vertices used to
/// orient the facet that will replace the visible side.
struct HorizonRidge {
    vertices: Vec<usize>,
    /// Vertex of the deleted facet opposite the ridge.
    under: usize,
    /// Vertex of the surviving neighbour opposite the ridge.
    beyond: usize,
}

pub(crate) struct Engine<'a, const D: usize> {
    points: &'a [SVector<f64, D>],
    cfg: HullCfg,
    pub(crate) mesh: Mesh<D>,
    heap: IndexedHeap,
    generation: u64,
}

impl<'a, const D: usize> Engine<'a, D> {
    pub(crate) fn new(points: &'a [SVector<f64, D>], cfg: HullCfg) -> Self {
        Self {
            points,
            cfg,
            mesh: Mesh::new(points.len()),
            heap: IndexedHeap::new(),
            generation: 0,
        }
    }

    #[inline]
    pub(crate) fn points(&self) -> &'a [SVector<f64, D>] {
        self.points
    }

    #[inline]
    pub(crate) fn tolerance(&self) -> f64 {
        self.cfg.tolerance
    }

    #[inline]
    pub(crate) fn normal_eps(&self) -> f64 {
        self.cfg.normal_eps
    }

    /// Insert a facet through `vertices`, oriented so that the reference
    /// vertices in `under` lie below it.
    ///
    /// The reference farthest from the new plane decides; if every reference is
    /// numerically on the plane the orientation is undecidable.
    pub(crate) fn add_facet(
        &mut self,
        vertices: Vec<usize>,
        under: &[usize],
    ) -> Result<FacetId, HullError> {
        let corners: Vec<SVector<f64, D>> = vertices.iter().map(|&v| self.points[v]).collect();
        let normal = compute_normal(&corners, self.cfg.normal_eps).ok_or_else(|| {
            HullError::numeric(format!("null normal for facet {vertices:?}"))
        })?;
        let anchor = corners[0];
        let reference = under
            .iter()
            .copied()
            .max_by(|&a, &b| {
                let da = normal.dot(&(self.points[a] - anchor)).abs();
                let db = normal.dot(&(self.points[b] - anchor)).abs();
                da.total_cmp(&db)
            })
            .ok_or_else(|| HullError::inconsistent("facet orientation needs a reference vertex"))?;
        let below = self.points[reference];
        let (normal, d) = orient_normal(normal, &anchor, &below);
        let reach = (below - anchor).norm();
        if d == 0.0 || -d <= self.cfg.normal_eps * reach {
            return Err(HullError::numeric(format!(
                "cannot orient facet {vertices:?}: reference {reference} is on its plane"
            )));
        }
        self.add_facet_with_normal(vertices, normal)
    }

    /// Insert a facet whose outward unit normal is already known.
    pub(crate) fn add_facet_with_normal(
        &mut self,
        vertices: Vec<usize>,
        normal: SVector<f64, D>,
    ) -> Result<FacetId, HullError> {
        let offset = normal.dot(&self.points[vertices[0]]);
        self.mesh.insert_facet(vertices, normal, offset)
    }

    /// Give `point` to the candidate it is farthest outside of.
    ///
    /// Returns false when no candidate sees it beyond tolerance; the point is
    /// then inside the hull and is dropped for good.
    pub(crate) fn assign(&mut self, point: usize, candidates: &[FacetId]) -> bool {
        let p = self.points[point];
        let mut best: Option<(FacetId, f64)> = None;
        for &f in candidates {
            let d = self.mesh.facet(f).distance(&p);
            if d > self.cfg.tolerance && best.map_or(true, |(_, bd)| d > bd) {
                best = Some((f, d));
            }
        }
        match best {
            Some((f, d)) => {
                self.mesh.facet_mut(f).assign(point, d);
                true
            }
            None => false,
        }
    }

    /// Queue `f` if it has a peak.
    pub(crate) fn enqueue(&mut self, f: FacetId) {
        if let Some((_, d)) = self.mesh.facet(f).peak {
            self.heap.push(f.0, d);
        }
    }

    /// Run cone rebuilds until no facet has an outside point.
    pub(crate) fn run(&mut self) -> Result<(), HullError> {
        let mut iterations = 0usize;
        while let Some((fid, _)) = self.heap.pop() {
            let fid = FacetId(fid);
            let Some((apex, _)) = self.mesh.facet(fid).peak else {
                continue;
            };
            iterations += 1;
            self.expand(fid, apex)?;
            tracing::trace!(
                iteration = iterations,
                apex,
                facets = self.mesh.live_facet_count(),
                queued = self.heap.len(),
                "cone rebuild"
            );
        }
        debug_assert!(self.heap.is_empty());
        tracing::debug!(iterations, facets = self.mesh.live_facet_count(), "hull converged");
        Ok(())
    }

    /// One cone rebuild around `apex`, the peak of `start`.
    fn expand(&mut self, start: FacetId, apex: usize) -> Result<(), HullError> {
        debug_assert!(!self.heap.contains(start.0), "expanded facet is still queued");
        let (visible, horizon) = self.horizon(start, apex)?;

        let mut orphans = Vec::new();
        for &f in &visible {
            self.heap.remove(f.0);
            orphans.extend(self.mesh.facet_mut(f).take_conflicts());
        }
        orphans.retain(|&p| p != apex);
        self.mesh.remove_facets(&visible);

        let mut cone = Vec::with_capacity(horizon.len());
        for h in horizon {
            let mut vertices = h.vertices;
            vertices.push(apex);
            cone.push(self.add_facet(vertices, &[h.under, h.beyond])?);
        }
        for p in orphans {
            self.assign(p, &cone);
        }
        for &f in &cone {
            self.enqueue(f);
        }
        Ok(())
    }

    /// Breadth-first search of the facets visible from `apex`, starting at `start`.
    ///
    /// Visibility is `(apex - v0) · n > 0`. Each crossing into a non-visible
    /// neighbour yields one horizon ridge. The generation stamp marks facets
    /// reached by this search only.
    fn horizon(
        &mut self,
        start: FacetId,
        apex: usize,
    ) -> Result<(Vec<FacetId>, Vec<HorizonRidge>), HullError> {
        self.generation += 1;
        let generation = self.generation;
        let apex_pt = self.points[apex];
        self.mesh.facet_mut(start).stamp = generation;
        let mut visible = vec![start];
        let mut horizon = Vec::new();
        let mut head = 0;
        while head < visible.len() {
            let f = visible[head];
            head += 1;
            for slot in 0..self.mesh.facet(f).ridges.len() {
                let rid: RidgeId = self.mesh.facet(f).ridges[slot];
                let g = self.mesh.neighbor(f, slot).ok_or_else(|| {
                    HullError::inconsistent(format!("ridge {rid:?} of a live facet is open"))
                })?;
                let neighbor = self.mesh.facet(g);
                if neighbor.stamp == generation {
                    continue;
                }
                if neighbor.distance(&apex_pt) > 0.0 {
                    self.mesh.facet_mut(g).stamp = generation;
                    visible.push(g);
                } else {
                    let gslot = neighbor.slot_of(rid).ok_or_else(|| {
                        HullError::inconsistent(format!("neighbour does not list ridge {rid:?}"))
                    })?;
                    horizon.push(HorizonRidge {
                        vertices: self.mesh.ridge(rid).vertices.clone(),
                        under: self.mesh.facet(f).vertices[slot],
                        beyond: neighbor.vertices[gslot],
                    });
                }
            }
        }
        Ok((visible, horizon))
    }

    /// Convert the live mesh into a `ConvexHull` reported on `coords`.
    ///
    /// `coords` are the caller's points; after a jiggle they differ slightly
    /// from the ones the mesh was built on. Normals are recomputed from
    /// `coords` when that simplex is well-shaped (sign kept from the build);
    /// otherwise the build normal is kept. Offsets always come from `coords`.
    pub(crate) fn finalize(
        &self,
        coords: &[SVector<f64, D>],
        perturbation: f64,
    ) -> Result<ConvexHull<D>, HullError> {
        let mut facet_pos: HashMap<FacetId, usize> = HashMap::new();
        for (i, f) in self.mesh.live_facets().enumerate() {
            facet_pos.insert(f, i);
        }
        let mut ridge_pos: HashMap<RidgeId, usize> = HashMap::new();
        let mut ridges = Vec::new();
        for rid in self.mesh.live_ridges() {
            let r = self.mesh.ridge(rid);
            if !r.is_closed() {
                return Err(HullError::inconsistent(format!(
                    "ridge {:?} has a single facet in a finished hull",
                    r.vertices
                )));
            }
            let lookup = |f: Option<FacetId>| f.and_then(|f| facet_pos.get(&f).copied());
            let (Some(owned), Some(other)) = (lookup(r.owned), lookup(r.other)) else {
                return Err(HullError::inconsistent(format!(
                    "ridge {:?} references a deleted facet",
                    r.vertices
                )));
            };
            ridge_pos.insert(rid, ridges.len());
            ridges.push(HullRidge {
                vertices: r.vertices.clone(),
                owned,
                other,
            });
        }

        let mut facets = Vec::with_capacity(facet_pos.len());
        let mut corners = BTreeSet::new();
        let mut edges = BTreeSet::new();
        for fid in self.mesh.live_facets() {
            let f = self.mesh.facet(fid);
            let pts: Vec<SVector<f64, D>> = f.vertices.iter().map(|&v| coords[v]).collect();
            let normal = match compute_normal(&pts, self.cfg.normal_eps) {
                Some(n) if n.dot(&f.normal) >= 0.0 => n,
                Some(n) => -n,
                None => f.normal,
            };
            let offset = normal.dot(&pts[0]);
            let ridge_idx = f
                .ridges
                .iter()
                .map(|r| {
                    ridge_pos.get(r).copied().ok_or_else(|| {
                        HullError::inconsistent(format!("facet ridge {r:?} is not live"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            for (i, &a) in f.vertices.iter().enumerate() {
                corners.insert(a);
                for &b in &f.vertices[i + 1..] {
                    edges.insert([a.min(b), a.max(b)]);
                }
            }
            facets.push(HullFacet {
                vertices: f.vertices.clone(),
                normal,
                offset,
                ridges: ridge_idx,
                interior_vertices: Vec::new(),
            });
        }

        Ok(ConvexHull {
            vertices: corners
                .into_iter()
                .map(|index| HullVertex {
                    index,
                    position: coords[index],
                })
                .collect(),
            facets,
            ridges,
            edges: edges.into_iter().collect(),
            tolerance: self.cfg.tolerance,
            perturbation,
        })
    }
}
