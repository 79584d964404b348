//! # Solid Extrusion
//!
//! Extrudes a triangulated cap straight up along +Z.
//!
//! ## Layout
//!
//! ```text
//! vertices:  [bottom ring (z = 0)] [top ring (z = h)]
//! triangles: [bottom cap] [top cap] [walls]
//! ```
//!
//! Vertex `i` of the cap becomes bottom vertex `i` and top vertex `i + n`.
//! Walls follow the cap's boundary edges, so every edge of the solid is
//! shared by exactly two faces.

use glam::DVec3;

use super::triangulate::Cap;

/// An indexed triangle solid with f64 vertices.
///
/// # Example
///
/// ```rust
/// use footprint_mesh::extrude::SolidMesh;
/// use glam::DVec3;
///
/// let mut solid = SolidMesh::with_capacity(3, 1);
/// solid.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// solid.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// solid.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// solid.add_triangle(0, 1, 2);
/// assert!(solid.validate());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolidMesh {
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
}

impl SolidMesh {
    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Computes the axis-aligned bounding box as (min, max).
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some(first) = self.vertices.first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };
        self.vertices[1..]
            .iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Checks that every index references a vertex and no triangle repeats
    /// a corner.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;
        self.triangles.iter().all(|&[a, b, c]| {
            a < vertex_count && b < vertex_count && c < vertex_count && a != b && b != c && a != c
        })
    }

    /// Flattens into `[x, y, z, ...]` coordinates and `[i0, i1, i2, ...]`
    /// indices.
    pub fn into_buffers(self) -> (Vec<f64>, Vec<u32>) {
        let coordinates = self
            .vertices
            .iter()
            .flat_map(|v| [v.x, v.y, v.z])
            .collect();
        let indices = self.triangles.into_iter().flatten().collect();
        (coordinates, indices)
    }
}

/// Extrudes a cap from z = 0 to z = `height`.
///
/// Bottom faces point down, top faces up, walls outward. `height` is taken
/// as given; see [`super::check_height`] for the accepted range.
pub fn extrude(cap: &Cap, height: f64) -> SolidMesh {
    let n = cap.vertices.len() as u32;
    let boundary = cap.boundary_edges();
    let mut solid =
        SolidMesh::with_capacity(cap.vertices.len() * 2, cap.triangles.len() * 2 + boundary.len() * 2);

    // Bottom ring, then top ring
    for z in [0.0, height] {
        for v in &cap.vertices {
            solid.add_vertex(v.extend(z));
        }
    }

    // Bottom cap (reversed to face -Z)
    for &[a, b, c] in &cap.triangles {
        solid.add_triangle(a, c, b);
    }

    // Top cap (faces +Z)
    for &[a, b, c] in &cap.triangles {
        solid.add_triangle(a + n, b + n, c + n);
    }

    // Walls: the interior lies left of each boundary edge, so (a, b, b')
    // faces outward
    for (a, b) in boundary {
        solid.add_triangle(a, b, b + n);
        solid.add_triangle(a, b + n, a + n);
    }

    solid
}
