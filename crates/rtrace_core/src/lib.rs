//! rtrace core - scene model and scene loading.
//!
//! This crate provides:
//!
//! - **Scene model**: `Scene`, `Camera`, `Material`, `PointLight`, `Mesh`, `Shape`
//! - **Scene loading**: XML and JSON scene files, validated on load
//!
//! The renderer only ever reads a `Scene`; nothing in it is mutated once
//! loading finishes.
//!
//! # Example
//!
//! ```ignore
//! use rtrace_core::load_scene;
//!
//! let scene = load_scene("scene.xml")?;
//! println!("Loaded {} triangles, {} lights",
//!     scene.triangle_count(),
//!     scene.light_count());
//! ```

pub mod camera;
pub mod error;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, NearPlane};
pub use error::{SceneError, SceneResult};
pub use light::PointLight;
pub use loader::{load_scene, parse_scene, SceneFormat};
pub use material::Material;
pub use mesh::{Mesh, Shape};
pub use scene::Scene;
