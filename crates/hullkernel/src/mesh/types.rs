use std::collections::HashMap;

use nalgebra::SVector;

use super::key::SimplexKey;
use crate::error::HullError;

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct FacetId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct RidgeId(pub usize);

/// Live hull facet: D vertices, outward unit normal, and its conflict list.
///
/// Invariants:
/// - `ridges[i]` is the ridge opposite `vertices[i]`.
/// - `peak` is the farthest known outside point; every other outside point
///   assigned here sits in `interior`.
/// - `stamp` equals the current search generation iff the facet was reached by
///   that horizon search.
#[derive(Clone, Debug)]
pub(crate) struct Facet<const D: usize> {
    pub vertices: Vec<usize>,
    pub ridges: Vec<RidgeId>,
    pub normal: SVector<f64, D>,
    pub offset: f64,
    pub peak: Option<(usize, f64)>,
    pub interior: Vec<usize>,
    pub stamp: u64,
    pub alive: bool,
}

impl<const D: usize> Facet<D> {
    #[inline]
    pub fn distance(&self, p: &SVector<f64, D>) -> f64 {
        self.normal.dot(p) - self.offset
    }

    /// Record an outside point; the farther of old and new peak stays peak.
    pub fn assign(&mut self, point: usize, distance: f64) {
        match self.peak {
            Some((old, old_d)) if distance > old_d => {
                self.interior.push(old);
                self.peak = Some((point, distance));
            }
            Some(_) => self.interior.push(point),
            None => self.peak = Some((point, distance)),
        }
    }

    /// Drain the conflict list (peak first).
    pub fn take_conflicts(&mut self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.interior.len() + 1);
        if let Some((p, _)) = self.peak.take() {
            out.push(p);
        }
        out.append(&mut self.interior);
        out
    }

    /// Slot of `ridge` in this facet.
    pub fn slot_of(&self, ridge: RidgeId) -> Option<usize> {
        self.ridges.iter().position(|&r| r == ridge)
    }
}

/// (D-1)-simplex between two facets. `owned` and `other` are written once each.
#[derive(Clone, Debug)]
pub(crate) struct Ridge {
    pub vertices: Vec<usize>,
    pub key: SimplexKey,
    pub owned: Option<FacetId>,
    pub other: Option<FacetId>,
    pub alive: bool,
}

impl Ridge {
    /// The facet across this ridge from `f`.
    #[inline]
    pub fn opposite(&self, f: FacetId) -> Option<FacetId> {
        if self.owned == Some(f) {
            self.other
        } else if self.other == Some(f) {
            self.owned
        } else {
            None
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.owned.is_some() && self.other.is_some()
    }
}

/// Facet/ridge arena plus the key index of live ridges.
#[derive(Clone, Debug)]
pub(crate) struct Mesh<const D: usize> {
    pub facets: Vec<Facet<D>>,
    pub ridges: Vec<Ridge>,
    index: HashMap<SimplexKey, RidgeId>,
    base: usize,
}

impl<const D: usize> Mesh<D> {
    /// Empty mesh for vertex indices below `base`.
    pub fn new(base: usize) -> Self {
        Self {
            facets: Vec::new(),
            ridges: Vec::new(),
            index: HashMap::new(),
            base,
        }
    }

    #[inline]
    pub fn facet(&self, f: FacetId) -> &Facet<D> {
        &self.facets[f.0]
    }

    #[inline]
    pub fn facet_mut(&mut self, f: FacetId) -> &mut Facet<D> {
        &mut self.facets[f.0]
    }

    #[inline]
    pub fn ridge(&self, r: RidgeId) -> &Ridge {
        &self.ridges[r.0]
    }

    pub fn live_facets(&self) -> impl Iterator<Item = FacetId> + '_ {
        self.facets
            .iter()
            .enumerate()
            .filter(|(_, f)| f.alive)
            .map(|(i, _)| FacetId(i))
    }

    pub fn live_facet_count(&self) -> usize {
        self.facets.iter().filter(|f| f.alive).count()
    }

    pub fn live_ridges(&self) -> impl Iterator<Item = RidgeId> + '_ {
        self.ridges
            .iter()
            .enumerate()
            .filter(|(_, r)| r.alive)
            .map(|(i, _)| RidgeId(i))
    }

    /// Facet across ridge slot `slot` of `f`.
    #[inline]
    pub fn neighbor(&self, f: FacetId, slot: usize) -> Option<FacetId> {
        let r = self.facet(f).ridges[slot];
        self.ridge(r).opposite(f)
    }

    /// Add a facet and stitch it to existing ridges through the key index.
    ///
    /// Fails with a numeric degeneracy if one of its ridges already has two
    /// facets (the new facet would be a third claimant); the mesh must then be
    /// discarded.
    pub fn insert_facet(
        &mut self,
        vertices: Vec<usize>,
        normal: SVector<f64, D>,
        offset: f64,
    ) -> Result<FacetId, HullError> {
        debug_assert_eq!(vertices.len(), D);
        let fid = FacetId(self.facets.len());
        let mut ridges = Vec::with_capacity(vertices.len());
        for skip in 0..vertices.len() {
            let rv: Vec<usize> = vertices
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &v)| v)
                .collect();
            ridges.push(self.claim_ridge(rv, fid)?);
        }
        self.facets.push(Facet {
            vertices,
            ridges,
            normal,
            offset,
            peak: None,
            interior: Vec::new(),
            stamp: 0,
            alive: true,
        });
        Ok(fid)
    }

    fn claim_ridge(&mut self, mut vertices: Vec<usize>, f: FacetId) -> Result<RidgeId, HullError> {
        vertices.sort_unstable();
        let key = SimplexKey::new(&vertices, self.base);
        if let Some(&rid) = self.index.get(&key) {
            let ridge = &mut self.ridges[rid.0];
            if ridge.other.is_some() {
                return Err(HullError::numeric(format!(
                    "ridge {:?} already joins two facets",
                    ridge.vertices
                )));
            }
            ridge.other = Some(f);
            return Ok(rid);
        }
        Ok(self.push_ridge(vertices, key, f))
    }

    fn push_ridge(&mut self, vertices: Vec<usize>, key: SimplexKey, owned: FacetId) -> RidgeId {
        let rid = RidgeId(self.ridges.len());
        self.ridges.push(Ridge {
            vertices,
            key,
            owned: Some(owned),
            other: None,
            alive: true,
        });
        self.index.insert(key, rid);
        rid
    }

    /// Delete a batch of facets.
    ///
    /// Every ridge they touch is retired. A live neighbour across a retired
    /// ridge receives a fresh ridge it owns alone, ready for the facet that
    /// replaces the deleted one.
    pub fn remove_facets(&mut self, doomed: &[FacetId]) {
        for &f in doomed {
            self.facets[f.0].alive = false;
        }
        for &f in doomed {
            for slot in 0..self.facets[f.0].ridges.len() {
                let rid = self.facets[f.0].ridges[slot];
                if !self.ridges[rid.0].alive {
                    continue;
                }
                let survivor = self.ridges[rid.0]
                    .opposite(f)
                    .filter(|g| self.facets[g.0].alive);
                let ridge = &mut self.ridges[rid.0];
                ridge.alive = false;
                let key = ridge.key;
                let vertices = ridge.vertices.clone();
                self.index.remove(&key);
                if let Some(g) = survivor {
                    let fresh = self.push_ridge(vertices, key, g);
                    if let Some(gslot) = self.facets[g.0].slot_of(rid) {
                        self.facets[g.0].ridges[gslot] = fresh;
                    }
                }
            }
        }
    }
}
