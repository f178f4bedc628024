//! Triangle meshes and the closed set of scene shapes.
//!
//! Meshes do not own vertex positions. Every face is an index triple into the
//! scene's vertex arena, so several meshes can share one vertex pool without
//! borrowing from each other.

use rtrace_math::Point3;
use serde::{Deserialize, Serialize};

/// A triangle mesh: a material key plus faces indexing the vertex arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Key into the scene's material map
    pub material_id: String,

    /// Zero-based vertex indices, one triple per triangle
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a new mesh.
    pub fn new(material_id: impl Into<String>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            material_id: material_id.into(),
            faces,
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Largest vertex index referenced by any face.
    pub fn max_index(&self) -> Option<u32> {
        self.faces.iter().flatten().copied().max()
    }

    /// Resolve faces to vertex positions.
    ///
    /// Faces with an index outside `vertices` are skipped; a validated scene
    /// never contains them.
    pub fn triangles<'a>(
        &'a self,
        vertices: &'a [Point3],
    ) -> impl Iterator<Item = [Point3; 3]> + 'a {
        self.faces.iter().filter_map(move |&[a, b, c]| {
            Some([
                *vertices.get(a as usize)?,
                *vertices.get(b as usize)?,
                *vertices.get(c as usize)?,
            ])
        })
    }
}

/// Geometry that can appear in a scene.
///
/// A closed set dispatched with `match`; new primitives become new variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Mesh(Mesh),
}

impl Shape {
    /// Material key of this shape.
    pub fn material_id(&self) -> &str {
        match self {
            Shape::Mesh(mesh) => &mesh.material_id,
        }
    }

    /// Number of triangles the shape contributes.
    pub fn triangle_count(&self) -> usize {
        match self {
            Shape::Mesh(mesh) => mesh.triangle_count(),
        }
    }
}

impl From<Mesh> for Shape {
    fn from(mesh: Mesh) -> Self {
        Shape::Mesh(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_vertices() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0), // v0
            Point3::new(1.0, 0.0, 0.0), // v1
            Point3::new(0.0, 1.0, 0.0), // v2
            Point3::new(1.0, 1.0, 0.0), // v3
        ]
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new("1", vec![[0, 1, 2], [1, 3, 2]]);

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.max_index(), Some(3));
        assert_eq!(mesh.material_id, "1");
    }

    #[test]
    fn test_triangles_resolve_positions() {
        let vertices = quad_vertices();
        let mesh = Mesh::new("1", vec![[0, 1, 2], [1, 3, 2]]);
        let triangles: Vec<_> = mesh.triangles(&vertices).collect();

        assert_eq!(triangles.len(), 2, "Should resolve 2 triangles");
        assert_eq!(triangles[0], [vertices[0], vertices[1], vertices[2]]);
        assert_eq!(triangles[1], [vertices[1], vertices[3], vertices[2]]);
    }

    #[test]
    fn test_triangles_skip_invalid_indices() {
        let vertices = quad_vertices();
        let mesh = Mesh::new("1", vec![[0, 1, 9], [0, 1, 2]]);

        assert_eq!(mesh.triangles(&vertices).count(), 1);
    }

    #[test]
    fn test_shared_vertex_arena() {
        let vertices = quad_vertices();
        let a = Mesh::new("a", vec![[0, 1, 2]]);
        let b = Mesh::new("b", vec![[1, 3, 2]]);

        // Both meshes read vertex 1 and 2 from the same pool
        let ta: Vec<_> = a.triangles(&vertices).collect();
        let tb: Vec<_> = b.triangles(&vertices).collect();
        assert_eq!(ta[0][1], tb[0][0]);
        assert_eq!(ta[0][2], tb[0][2]);
    }

    #[test]
    fn test_shape_json_is_tagged() {
        let shape = Shape::from(Mesh::new("gold", vec![[0, 1, 2]]));
        let json = serde_json::to_value(&shape).unwrap();

        assert_eq!(json["type"], "mesh");
        assert_eq!(json["material_id"], "gold");
        assert_eq!(shape.material_id(), "gold");
        assert_eq!(shape.triangle_count(), 1);
    }
}
