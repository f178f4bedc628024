//! Scene file loading.
//!
//! Two formats are understood:
//!
//! - XML (`.xml` and anything unrecognised): `<scene>` documents with
//!   camera, lights, materials, shared vertex data and meshes
//! - JSON (`.json`): the serde form of [`Scene`]
//!
//! Both paths end in [`Scene::validate`], so a loaded scene is always safe
//! to render.
//!
//! # Example
//!
//! ```ignore
//! use rtrace_core::load_scene;
//!
//! let scene = load_scene("scenes/simple.xml")?;
//! println!("{} triangles", scene.triangle_count());
//! ```

mod xml;
mod xml_scene;

use std::fs;
use std::path::Path;

use crate::error::SceneResult;
use crate::scene::Scene;

pub use xml::{parse_xml, XmlElement};
pub use xml_scene::scene_from_xml;

/// On-disk scene encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Xml,
    Json,
}

impl SceneFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SceneFormat::Json,
            _ => SceneFormat::Xml,
        }
    }
}

/// Parse and validate a scene held in memory.
pub fn parse_scene(content: &str, format: SceneFormat) -> SceneResult<Scene> {
    let scene = match format {
        SceneFormat::Xml => scene_from_xml(content)?,
        SceneFormat::Json => serde_json::from_str(content)?,
    };
    scene.validate()?;
    Ok(scene)
}

/// Load a scene file and return a validated [`Scene`].
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    let format = SceneFormat::from_path(path);
    log::debug!("Loading {:?} scene from {}", format, path.display());

    let content = fs::read_to_string(path)?;
    let scene = parse_scene(&content, format)?;

    log::info!(
        "Loaded {}: {}x{}, {} triangles, {} materials, {} lights, max depth {}",
        path.display(),
        scene.camera.nx,
        scene.camera.ny,
        scene.triangle_count(),
        scene.material_count(),
        scene.light_count(),
        scene.max_depth
    );

    Ok(scene)
}
