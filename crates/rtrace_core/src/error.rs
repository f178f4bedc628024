//! Errors raised while loading or validating a scene.

use thiserror::Error;

/// Errors that can occur while building a scene.
///
/// Every variant means the scene is unusable; the renderer never sees a
/// partially valid scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Missing required element <{0}>")]
    MissingField(String),

    #[error("Invalid number in <{field}>: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("<{field}> expects {expected} values, found {found}")]
    WrongArity {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Mesh {mesh} references unknown material {material:?}")]
    UnknownMaterial { mesh: usize, material: String },

    #[error("Mesh {mesh} references vertex {index}, but only {count} vertices exist")]
    VertexOutOfRange {
        mesh: usize,
        index: usize,
        count: usize,
    },

    #[error("Material {0:?} has negative or non-finite channels")]
    NonPhysicalMaterial(String),

    #[error("{0} is not finite")]
    NonFinite(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
