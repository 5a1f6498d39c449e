//! Render document data model.
//!
//! These types mirror the JSON scene document one-to-one. Vectors are stored
//! as plain `[f64; 3]` arrays so this crate stays free of any math library;
//! the renderer converts them when it builds the scene graph.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which renderer the document asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RendererKind {
    #[default]
    RayTracing,
    Rasterization,
}

/// Which radiance estimator the ray tracer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegratorKind {
    /// Debug view: absolute value of the first-hit normal.
    Normal,
    #[default]
    MonteCarlo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    Diffuse,
    Reflect,
    Microfacet,
    Dielectric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraKind {
    #[default]
    Perspective,
    Orthographic,
}

/// Top-level render document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderDescription {
    /// Output name, used for the default image file name.
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_spp")]
    pub spp: u32,
    #[serde(default)]
    pub renderer: RendererKind,
    #[serde(default)]
    pub integrator: IntegratorKind,
    #[serde(default)]
    pub materials: Vec<MaterialDescription>,
    pub scene_data: SceneDescription,

    /// Directory of the file this document was read from.
    ///
    /// Relative mesh paths are resolved against it. `None` for documents
    /// parsed from strings.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl RenderDescription {
    /// Look up a material by name.
    pub fn material(&self, name: &str) -> Option<&MaterialDescription> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Number of objects plus lights.
    pub fn primitive_count(&self) -> usize {
        self.scene_data.objects.len() + self.scene_data.lights.len()
    }
}

/// A named material. Fields a material kind does not use are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    #[serde(default = "default_kd")]
    pub kd: [f64; 3],
    #[serde(default)]
    pub ks: [f64; 3],
    #[serde(default)]
    pub emission: [f64; 3],
    #[serde(default = "default_ior")]
    pub ior: f64,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    #[serde(default = "default_metallic")]
    pub metallic: f64,
}

impl MaterialDescription {
    /// A material of the given kind with every optional field at its default.
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            name: name.into(),
            kind,
            kd: default_kd(),
            ks: [0.0; 3],
            emission: [0.0; 3],
            ior: default_ior(),
            roughness: default_roughness(),
            metallic: default_metallic(),
        }
    }
}

/// Everything that ends up inside the renderer's scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    /// Emitters. Same shape as objects; added to the scene after them.
    #[serde(default)]
    pub lights: Vec<ObjectDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    #[serde(rename = "type", default)]
    pub kind: CameraKind,
    pub look_from: [f64; 3],
    pub look_at: [f64; 3],
    #[serde(default = "default_up")]
    pub up: [f64; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f64,
    /// Width over height. When absent the image aspect ratio is used.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub aperture: f64,
    #[serde(default = "default_focal_distance")]
    pub focal_distance: f64,
}

/// One primitive and the name of its material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    #[serde(flatten)]
    pub primitive: PrimitiveDescription,
    pub material: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "primitive")]
pub enum PrimitiveDescription {
    Sphere { center: [f64; 3], radius: f64 },
    Cuboid { min: [f64; 3], max: [f64; 3] },
    /// Finite one-sided parallelogram spanned by `e1` and `e2`.
    Plane {
        position: [f64; 3],
        e1: [f64; 3],
        e2: [f64; 3],
    },
    Triangle {
        v0: [f64; 3],
        v1: [f64; 3],
        v2: [f64; 3],
    },
    /// Wavefront OBJ file.
    Mesh { path: PathBuf },
}

impl PrimitiveDescription {
    pub fn kind_name(&self) -> &'static str {
        match self {
            PrimitiveDescription::Sphere { .. } => "Sphere",
            PrimitiveDescription::Cuboid { .. } => "Cuboid",
            PrimitiveDescription::Plane { .. } => "Plane",
            PrimitiveDescription::Triangle { .. } => "Triangle",
            PrimitiveDescription::Mesh { .. } => "Mesh",
        }
    }
}

fn default_spp() -> u32 {
    64
}

fn default_kd() -> [f64; 3] {
    [0.5; 3]
}

fn default_ior() -> f64 {
    1.5
}

fn default_roughness() -> f64 {
    0.6
}

fn default_metallic() -> f64 {
    1.0
}

fn default_up() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f64 {
    40.0
}

fn default_focal_distance() -> f64 {
    1.0
}
