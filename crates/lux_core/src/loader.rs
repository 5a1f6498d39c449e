//! Render document loading.
//!
//! Documents are JSON. Loading from a file records the file's directory so
//! relative mesh paths can be resolved later.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::description::RenderDescription;

/// Errors that can occur while loading a render document.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a render document from a JSON file.
///
/// # Example
///
/// ```ignore
/// use lux_core::load_description;
///
/// let description = load_description("demos/cornell.json")?;
/// println!("{} objects", description.scene_data.objects.len());
/// ```
pub fn load_description<P: AsRef<Path>>(path: P) -> LoadResult<RenderDescription> {
    let path = path.as_ref();
    log::info!("Loading render description: {}", path.display());

    let content = fs::read_to_string(path)?;
    let mut description = load_description_from_str(&content)?;
    description.base_dir = path.parent().map(Path::to_path_buf);

    Ok(description)
}

/// Parse a render document from a JSON string.
pub fn load_description_from_str(content: &str) -> LoadResult<RenderDescription> {
    let description: RenderDescription = serde_json::from_str(content)?;

    if description.scene_data.lights.is_empty() {
        log::warn!(
            "Render description '{}' declares no lights",
            description.name
        );
    }
    log::debug!(
        "Parsed '{}': {}x{}, {} spp, {} materials, {} primitives",
        description.name,
        description.width,
        description.height,
        description.spp,
        description.materials.len(),
        description.primitive_count()
    );

    Ok(description)
}
