//! Output mesh: flat coordinate and index buffers with a dense id.

use serde::{Deserialize, Serialize};

use crate::extrude::SolidMesh;

/// A triangulated solid ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Dense, 0-based id; elements reference meshes by this value
    pub mesh_id: u32,
    /// Flattened `[x, y, z, ...]` vertex positions
    pub coordinates: Vec<f64>,
    /// Flattened `[i0, i1, i2, ...]` triangle indices
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Flattens a solid into an output mesh.
    pub fn from_solid(mesh_id: u32, solid: SolidMesh) -> Self {
        let (coordinates, indices) = solid.into_buffers();
        Self {
            mesh_id,
            coordinates,
            indices,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.coordinates.len() / 3
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks the buffer shapes and that every index references a vertex.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertex_count();
        self.coordinates.len() % 3 == 0
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&index| (index as usize) < vertex_count)
    }

    /// Returns vertex `index` as `[x, y, z]`.
    pub fn vertex(&self, index: usize) -> Option<[f64; 3]> {
        self.coordinates
            .get(index * 3..index * 3 + 3)
            .map(|xyz| [xyz[0], xyz[1], xyz[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn triangle() -> SolidMesh {
        let mut solid = SolidMesh::with_capacity(3, 1);
        solid.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        solid.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        solid.add_vertex(DVec3::new(0.0, 1.0, 2.0));
        solid.add_triangle(0, 1, 2);
        solid
    }

    #[test]
    fn test_from_solid() {
        let mesh = Mesh::from_solid(7, triangle());
        assert_eq!(mesh.mesh_id, 7);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex(2), Some([0.0, 1.0, 2.0]));
        assert_eq!(mesh.vertex(3), None);
        assert!(mesh.validate());
    }

    #[test]
    fn test_validate_catches_bad_buffers() {
        let mut mesh = Mesh::from_solid(0, triangle());
        mesh.indices.push(0);
        assert!(!mesh.validate());

        let mut mesh = Mesh::from_solid(0, triangle());
        mesh.indices[2] = 3;
        assert!(!mesh.validate());

        let mut mesh = Mesh::from_solid(0, triangle());
        mesh.coordinates.pop();
        assert!(!mesh.validate());
    }

    #[test]
    fn test_serializes_flat_buffers() {
        let json = serde_json::to_value(Mesh::from_solid(1, triangle())).unwrap();
        assert_eq!(json["mesh_id"], 1);
        assert_eq!(json["indices"], serde_json::json!([0, 1, 2]));
        assert_eq!(json["coordinates"].as_array().map(Vec::len), Some(9));
    }
}
