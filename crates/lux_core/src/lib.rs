//! Lux Core - scene description documents.
//!
//! This crate provides:
//!
//! - **Description types**: `RenderDescription` and everything it nests
//!   (camera, materials, objects), deserialized with serde
//! - **Loading**: JSON parsing from strings or files
//!
//! The renderer turns a `RenderDescription` into a live scene graph; this
//! crate stays independent of it.
//!
//! # Example
//!
//! ```ignore
//! use lux_core::load_description;
//!
//! let description = load_description("cornell.json")?;
//! println!("{}: {}x{}, {} objects",
//!     description.name,
//!     description.width,
//!     description.height,
//!     description.scene_data.objects.len());
//! ```

pub mod description;
pub mod loader;

// Re-export commonly used types
pub use description::{
    CameraDescription, CameraKind, IntegratorKind, MaterialDescription, MaterialKind,
    ObjectDescription, PrimitiveDescription, RenderDescription, RendererKind, SceneDescription,
};
pub use loader::{load_description, load_description_from_str, LoadError, LoadResult};
