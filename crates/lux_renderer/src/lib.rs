//! Lux renderer - CPU Monte Carlo path tracing
//!
//! A physically-based offline path tracer: SAH BVH acceleration, a path
//! integrator with next-event estimation and Russian roulette, and a
//! row-band parallel driver writing PPM images.

mod band;
mod bsdf;
mod bvh;
mod camera;
mod cuboid;
mod error;
mod factory;
mod integrator;
mod intersection;
mod material;
mod mesh;
mod microfacet;
mod object;
mod plane;
mod renderer;
mod scene;
mod sphere;
mod triangle;

pub mod sampling;

pub use band::{generate_bands, render_band, RowBand};
pub use bsdf::{cook_torrance, distribution_ggx, fresnel, fresnel_schlick, geometry_smith, reflect, refract};
pub use bvh::{Bvh, BvhNode};
pub use camera::{Camera, CameraSettings, OrthographicCamera, PerspectiveCamera};
pub use cuboid::Cuboid;
pub use error::{BuildError, BuildResult, RenderError, RenderResult};
pub use factory::{
    build_camera, build_material, build_materials, build_object, build_renderer, build_scene, render_config,
    MaterialTable,
};
pub use integrator::{russian_roulette, Integrator, NormalIntegrator, PathIntegrator};
pub use intersection::Intersection;
pub use material::{Attribute, Color, Dielectric, Diffuse, Material, Reflective};
pub use mesh::Mesh;
pub use microfacet::Microfacet;
pub use object::{Object, SurfaceSample};
pub use plane::Plane;
pub use renderer::{color_to_rgb8, ImageBuffer, RayTracer, RenderConfig};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math types used throughout the public API
pub use lux_math::{Aabb, DVec3, Ray, ShadingFrame};
