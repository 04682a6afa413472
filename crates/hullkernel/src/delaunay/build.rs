use std::collections::{BTreeSet, HashMap};

use nalgebra::{Vector3, Vector4};

use super::types::{DelaunayMesh3, MeshVertex3, TetEdge, TetFace, Tetrahedron, TET_EDGE_CORNERS};
use crate::cfg::{HullCfg, LOWER_HULL_EPS};
use crate::error::HullError;
use crate::geom::simplex_volume;
use crate::hull::{create_4d_hull_with_cfg, Hull4};
use crate::hull::retry::with_jiggle;
use crate::mesh::SimplexKey;

/// Delaunay tetrahedralization with the default config.
///
/// With `reuse_input_vertices` the mesh vertices are the input points in input
/// order; otherwise only points used by some tetrahedron are kept, renumbered
/// in input order.
pub fn create_delaunay_3d(
    points: &[Vector3<f64>],
    reuse_input_vertices: bool,
) -> Result<DelaunayMesh3, HullError> {
    create_delaunay_3d_with_cfg(points, reuse_input_vertices, HullCfg::default())
}

/// Delaunay tetrahedralization through the lower hull of the lifted points.
///
/// The points are lifted around their bounding-box center. Each attempt builds
/// the 4D hull of the lifted (possibly jiggled) points with no retries of its
/// own, so `cfg.retry_budget` bounds the total number of attempts, and picks
/// the lower facets with the normals of that same build. Coplanar input never
/// has a lower facet without a jiggle; it comes out as flat tetrahedra.
pub fn create_delaunay_3d_with_cfg(
    points: &[Vector3<f64>],
    reuse_input_vertices: bool,
    cfg: HullCfg,
) -> Result<DelaunayMesh3, HullError> {
    let cfg = cfg.resolved();
    if points.len() < 4 {
        return Err(HullError::degenerate_input(format!(
            "Delaunay tetrahedralization needs at least 4 points, got {}",
            points.len()
        )));
    }
    if !points.iter().all(|p| p.iter().all(|x| x.is_finite())) {
        return Err(HullError::degenerate_input("non-finite input coordinates"));
    }
    if !spans_a_plane(points, cfg.tolerance) {
        return Err(HullError::degenerate_input("collinear input has no tetrahedralization"));
    }
    tracing::debug!(points = points.len(), reuse_input_vertices, "building 3D Delaunay mesh");
    let center = bbox_center(points);
    let radius = points.iter().map(|p| (p - center).norm()).fold(0.0, f64::max);
    // Cocircular input lifts to tied axis extrema; only then can a jiggle
    // bring the count of distinct extrema up to four.
    let slack = 2.0 * cfg.jiggle_amplitude() * (1.0 + 4.0 * radius);
    let ties = extrema_can_split(&lift(points, &center), slack);
    let single = HullCfg {
        retry_budget: 0,
        ..cfg
    };
    let (cells, perturbation) = with_jiggle(points, &cfg, |coords, perturbation| {
        let hull = match create_4d_hull_with_cfg(&lift(coords, &center), single) {
            Err(HullError::DegenerateInput { reason }) if ties => {
                return Err(HullError::numeric(reason))
            }
            other => other?,
        };
        let cells = lower_facets(&hull, perturbation);
        if cells.is_empty() {
            return Err(HullError::numeric("lifted hull has no lower facets"));
        }
        Ok((cells, perturbation))
    })?;
    let mesh = assemble(points, &cells, perturbation, reuse_input_vertices)?;
    tracing::debug!(
        tetrahedra = mesh.tetrahedra.len(),
        faces = mesh.faces.len(),
        edges = mesh.edges.len(),
        perturbation = mesh.perturbation,
        "Delaunay mesh assembled"
    );
    Ok(mesh)
}

/// Some point is farther than `tolerance` from the line through the first
/// point and the point farthest from it.
fn spans_a_plane(points: &[Vector3<f64>], tolerance: f64) -> bool {
    let a = points[0];
    let Some(b) = points
        .iter()
        .max_by(|p, q| (*p - a).norm_squared().total_cmp(&(*q - a).norm_squared()))
    else {
        return false;
    };
    let ab = b - a;
    let len = ab.norm();
    len > tolerance
        && points
            .iter()
            .any(|p| ab.cross(&(p - a)).norm() > tolerance * len)
}

fn bbox_center(points: &[Vector3<f64>]) -> Vector3<f64> {
    let (lo, hi) = points.iter().fold(
        (Vector3::repeat(f64::INFINITY), Vector3::repeat(f64::NEG_INFINITY)),
        |(lo, hi), p| (lo.inf(p), hi.sup(p)),
    );
    (lo + hi) * 0.5
}

/// Paraboloid lift around `center`: `p -> (p - c, |p - c|²)`.
pub(crate) fn lift(points: &[Vector3<f64>], center: &Vector3<f64>) -> Vec<Vector4<f64>> {
    points
        .iter()
        .map(|p| {
            let q = p - center;
            Vector4::new(q.x, q.y, q.z, q.norm_squared())
        })
        .collect()
}

/// At least four points sit within `slack` of some axis minimum or maximum.
pub(crate) fn extrema_can_split(lifted: &[Vector4<f64>], slack: f64) -> bool {
    let mut near = BTreeSet::new();
    for axis in 0..4 {
        let (lo, hi) = lifted
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
        near.extend(
            lifted
                .iter()
                .enumerate()
                .filter(|(_, p)| p[axis] - lo <= slack || hi - p[axis] <= slack)
                .map(|(i, _)| i),
        );
        if near.len() >= 4 {
            return true;
        }
    }
    false
}

/// Hull facets that project to Delaunay tetrahedra.
///
/// Normally the lower hull (outward normal pointing down in `w`). A flat
/// two-facet hull that only exists thanks to a jiggle stands for coplanar
/// cocircular input and keeps both sides.
fn lower_facets(hull: &Hull4, perturbation: f64) -> Vec<[usize; 4]> {
    let flat = hull.facets.len() == 2 && perturbation > 0.0;
    hull.facets
        .iter()
        .filter(|f| flat || f.normal.w < -LOWER_HULL_EPS)
        .map(|f| [f.vertices[0], f.vertices[1], f.vertices[2], f.vertices[3]])
        .collect()
}

fn assemble(
    points: &[Vector3<f64>],
    cells: &[[usize; 4]],
    perturbation: f64,
    reuse_input_vertices: bool,
) -> Result<DelaunayMesh3, HullError> {
    // Input index -> mesh index.
    let (vertices, remap): (Vec<MeshVertex3>, Vec<Option<usize>>) = if reuse_input_vertices {
        let vertices = points
            .iter()
            .enumerate()
            .map(|(index, &position)| MeshVertex3 { index, position })
            .collect();
        (vertices, (0..points.len()).map(Some).collect())
    } else {
        let mut used = vec![false; points.len()];
        for c in cells {
            for &v in c {
                used[v] = true;
            }
        }
        let mut remap = vec![None; points.len()];
        let mut vertices = Vec::new();
        for (index, _) in used.iter().enumerate().filter(|&(_, &u)| u) {
            remap[index] = Some(vertices.len());
            vertices.push(MeshVertex3 {
                index,
                position: points[index],
            });
        }
        (vertices, remap)
    };

    let mut tetrahedra = Vec::with_capacity(cells.len());
    let mut faces: Vec<TetFace> = Vec::new();
    let mut edges: Vec<TetEdge> = Vec::new();
    let mut face_index: HashMap<SimplexKey, usize> = HashMap::new();
    let mut edge_index: HashMap<SimplexKey, usize> = HashMap::new();
    let base = vertices.len();

    for cell in cells {
        let mut tv = [0usize; 4];
        for (slot, &v) in cell.iter().enumerate() {
            tv[slot] = remap[v].ok_or_else(|| {
                HullError::inconsistent(format!("hull vertex {v} has no mesh vertex"))
            })?;
        }
        let pos = |v: usize| vertices[v].position;
        if simplex_volume(&tv.map(pos)) < 0.0 {
            tv.swap(0, 1);
        }
        let t = tetrahedra.len();

        let mut tf = [0usize; 4];
        for (i, slot) in tf.iter_mut().enumerate() {
            let mut fv = [0usize; 3];
            for (o, k) in (0..4).filter(|&k| k != i).enumerate() {
                fv[o] = tv[k];
            }
            let key = SimplexKey::new(&fv, base);
            *slot = match face_index.get(&key) {
                Some(&fi) => {
                    let face = &mut faces[fi];
                    if face.other.is_some() {
                        return Err(HullError::inconsistent(format!(
                            "face {fv:?} claimed by a third tetrahedron"
                        )));
                    }
                    face.other = Some(t);
                    fi
                }
                None => {
                    let (a, b, c) = (pos(fv[0]), pos(fv[1]), pos(fv[2]));
                    if (b - a).cross(&(c - a)).dot(&(pos(tv[i]) - a)) > 0.0 {
                        fv.swap(1, 2);
                    }
                    faces.push(TetFace {
                        vertices: fv,
                        owned: t,
                        other: None,
                    });
                    face_index.insert(key, faces.len() - 1);
                    faces.len() - 1
                }
            };
        }

        let mut te = [0usize; 6];
        for (k, slot) in te.iter_mut().enumerate() {
            let [a, b] = TET_EDGE_CORNERS[k].map(|c| tv[c]);
            let key = SimplexKey::new(&[a, b], base);
            let ei = *edge_index.entry(key).or_insert_with(|| {
                edges.push(TetEdge {
                    vertices: [a.min(b), a.max(b)],
                    tetrahedra: Vec::new(),
                });
                edges.len() - 1
            });
            edges[ei].tetrahedra.push(t);
            *slot = ei;
        }

        tetrahedra.push(Tetrahedron {
            vertices: tv,
            faces: tf,
            edges: te,
        });
    }

    Ok(DelaunayMesh3 {
        vertices,
        tetrahedra,
        faces,
        edges,
        perturbation,
    })
}
