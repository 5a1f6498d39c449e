//! Error types for scene construction and rendering.

use std::path::PathBuf;

use lux_core::RendererKind;
use thiserror::Error;

/// Failures at render or query time, and while saving output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no lights in scene")]
    NoLights,

    #[error("scene has no camera")]
    NoCamera,

    #[error("BVH not built; call Scene::build_bvh after adding objects")]
    BvhNotBuilt,

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to create thread pool: {0}")]
    ThreadPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Failures while turning a render description into a scene graph.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("renderer {0:?} is not supported")]
    UnsupportedRenderer(RendererKind),

    #[error("degenerate camera: {0}")]
    DegenerateCamera(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("failed to load mesh {}: {source}", path.display())]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
}

/// Result type for scene construction.
pub type BuildResult<T> = Result<T, BuildError>;
