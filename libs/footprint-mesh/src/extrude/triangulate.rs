//! # Cap Triangulation
//!
//! 2D Delaunay triangulation of a clean ring in the z = 0 plane.
//!
//! The triangulator works on coordinates, so its triangles are mapped back
//! onto ring vertex indices through an exact bit-pattern lookup. A triangle
//! corner that is not a ring vertex (the triangulator split an edge) makes
//! the cap unusable for a shared-vertex solid and fails the footprint.

use std::collections::HashMap;

use config::constants::TRIANGULATION_SNAP_RADIUS;
use geo::triangulate_spade::SpadeTriangulationConfig;
use geo::{Coord, LineString, Polygon, Triangle, TriangulateSpade};
use glam::DVec2;

use crate::error::{FootprintError, FootprintResult};
use crate::sanitize::CleanRing;

/// How the cap interior is triangulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapMode {
    /// Constrained Delaunay honoring the ring edges; concave footprints
    /// stay concave and holes stay open.
    #[default]
    Constrained,
    /// Unconstrained Delaunay of the exterior points, which fills
    /// concavities up to the convex hull.
    ConvexHull,
}

/// A triangulated cap: ring vertices and counter-clockwise triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Cap {
    /// Ring vertices, exterior first, then holes
    pub vertices: Vec<DVec2>,
    /// Counter-clockwise triangles indexing into `vertices`
    pub triangles: Vec<[u32; 3]>,
}

impl Cap {
    /// Directed edges that belong to exactly one triangle.
    ///
    /// With counter-clockwise triangles the interior lies to the left of
    /// every boundary edge.
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let directed: HashMap<(u32, u32), usize> = self
            .triangles
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
            .fold(HashMap::new(), |mut counts, edge| {
                *counts.entry(edge).or_insert(0) += 1;
                counts
            });

        // Sort for a deterministic wall order
        let mut edges: Vec<(u32, u32)> = directed
            .keys()
            .filter(|&&(a, b)| !directed.contains_key(&(b, a)))
            .copied()
            .collect();
        edges.sort_unstable();
        edges
    }
}

/// Triangulates the cap of a clean ring.
///
/// # Errors
///
/// [`FootprintError::Triangulation`] if the triangulator fails, returns no
/// triangles, or emits a corner that is not a ring vertex.
pub fn triangulate_cap(ring: &CleanRing, mode: CapMode) -> FootprintResult<Cap> {
    let vertices: Vec<DVec2> = match mode {
        CapMode::Constrained => ring.rings().flatten().map(|p| p.truncate()).collect(),
        CapMode::ConvexHull => ring.exterior.iter().map(|p| p.truncate()).collect(),
    };
    if vertices.len() > u32::MAX as usize {
        return Err(FootprintError::triangulation("too many vertices for u32 indices"));
    }

    let mut lookup = HashMap::with_capacity(vertices.len());
    for (index, vertex) in vertices.iter().enumerate() {
        lookup.entry(key(vertex.x, vertex.y)).or_insert(index as u32);
    }

    let triangles = match mode {
        CapMode::Constrained => {
            let polygon = Polygon::new(
                to_line_string(&ring.exterior),
                ring.holes.iter().map(|hole| to_line_string(hole)).collect(),
            );
            polygon.constrained_triangulation(SpadeTriangulationConfig {
                snap_radius: TRIANGULATION_SNAP_RADIUS,
            })
        }
        CapMode::ConvexHull => {
            Polygon::new(to_line_string(&ring.exterior), Vec::new()).unconstrained_triangulation()
        }
    }
    .map_err(|err| FootprintError::triangulation(format!("{err:?}")))?;

    let mut indexed = Vec::with_capacity(triangles.len());
    for triangle in &triangles {
        if let Some(face) = index_triangle(triangle, &lookup, &vertices)? {
            indexed.push(face);
        }
    }

    if indexed.is_empty() {
        return Err(FootprintError::triangulation("no triangles produced"));
    }

    Ok(Cap {
        vertices,
        triangles: indexed,
    })
}

/// Maps a triangle onto vertex indices in counter-clockwise order.
///
/// Zero-area triangles are dropped (`Ok(None)`).
fn index_triangle(
    triangle: &Triangle<f64>,
    lookup: &HashMap<(u64, u64), u32>,
    vertices: &[DVec2],
) -> FootprintResult<Option<[u32; 3]>> {
    let mut face = [0u32; 3];
    for (slot, corner) in face.iter_mut().zip(triangle.to_array()) {
        *slot = *lookup.get(&key(corner.x, corner.y)).ok_or_else(|| {
            FootprintError::triangulation(format!(
                "triangle corner ({}, {}) is not a ring vertex",
                corner.x, corner.y
            ))
        })?;
    }

    let [a, b, c] = face.map(|index| vertices[index as usize]);
    let cross = (b - a).perp_dot(c - a);
    if cross == 0.0 || face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
        return Ok(None);
    }
    if cross < 0.0 {
        face.swap(1, 2);
    }
    Ok(Some(face))
}

fn to_line_string(points: &[glam::DVec3]) -> LineString<f64> {
    points.iter().map(|p| Coord { x: p.x, y: p.y }).collect()
}

/// Exact lookup key; `+ 0.0` folds negative zero into positive zero.
fn key(x: f64, y: f64) -> (u64, u64) {
    ((x + 0.0).to_bits(), (y + 0.0).to_bits())
}
