//! The scene aggregate handed to the renderer.
//!
//! A `Scene` is built once, validated, and then only read. The renderer
//! shares it by reference across all workers.

use std::collections::BTreeMap;

use rtrace_math::{Color, Point3};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{SceneError, SceneResult};
use crate::light::PointLight;
use crate::material::Material;
use crate::mesh::{Mesh, Shape};

/// A complete scene: camera, lighting, materials and geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Maximum number of mirror bounces
    pub max_depth: u32,

    /// Color returned by rays that hit nothing
    #[serde(default)]
    pub background: Color,

    pub camera: Camera,

    /// Ambient light color, multiplied with each material's ambient term
    #[serde(default)]
    pub ambient_light: Color,

    /// Materials keyed by identifier
    #[serde(default)]
    pub materials: BTreeMap<String, Material>,

    #[serde(default)]
    pub lights: Vec<PointLight>,

    /// Shared vertex arena indexed by mesh faces
    #[serde(default)]
    pub vertices: Vec<Point3>,

    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Create an empty scene viewed through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            max_depth: 0,
            background: Color::ZERO,
            camera,
            ambient_light: Color::ZERO,
            materials: BTreeMap::new(),
            lights: Vec::new(),
            vertices: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Add a material under `id`, replacing any previous one.
    pub fn add_material(&mut self, id: impl Into<String>, material: Material) {
        self.materials.insert(id.into(), material);
    }

    /// Get a material by ID.
    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Append vertices to the arena and return the index of the first one.
    pub fn add_vertices(&mut self, vertices: impl IntoIterator<Item = Point3>) -> u32 {
        let base = self.vertices.len() as u32;
        self.vertices.extend(vertices);
        base
    }

    /// Add a mesh and return its shape index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.shapes.push(Shape::Mesh(mesh));
        self.shapes.len() - 1
    }

    /// Get total triangle count across all shapes.
    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(Shape::triangle_count).sum()
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Check the invariants the renderer relies on.
    ///
    /// Every mesh must reference an existing material and only in-range
    /// vertices, every material channel must be finite and non-negative,
    /// all positions and colors must be finite, and the camera must be able
    /// to produce an image.
    pub fn validate(&self) -> SceneResult<()> {
        self.camera.validate()?;

        if !self.background.is_finite() {
            return Err(SceneError::NonFinite("background".to_string()));
        }
        if !self.ambient_light.is_finite() {
            return Err(SceneError::NonFinite("ambient light".to_string()));
        }

        for (id, material) in &self.materials {
            if !material.is_physical() {
                return Err(SceneError::NonPhysicalMaterial(id.clone()));
            }
        }

        for (index, light) in self.lights.iter().enumerate() {
            if !light.position.is_finite() || !light.intensity.is_finite() {
                return Err(SceneError::NonFinite(format!("point light {}", index)));
            }
        }

        if let Some(index) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(SceneError::NonFinite(format!("vertex {}", index)));
        }

        let count = self.vertices.len();
        for (index, shape) in self.shapes.iter().enumerate() {
            if !self.materials.contains_key(shape.material_id()) {
                return Err(SceneError::UnknownMaterial {
                    mesh: index,
                    material: shape.material_id().to_string(),
                });
            }

            match shape {
                Shape::Mesh(mesh) => {
                    if let Some(max) = mesh.max_index() {
                        if max as usize >= count {
                            return Err(SceneError::VertexOutOfRange {
                                mesh: index,
                                index: max as usize,
                                count,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
