//! Build the renderer's scene graph from a render description.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lux_core::{
    CameraDescription, CameraKind, IntegratorKind, MaterialDescription, MaterialKind, ObjectDescription,
    PrimitiveDescription, RenderDescription, RendererKind,
};
use lux_math::DVec3;

use crate::camera::{Camera, CameraSettings, OrthographicCamera, PerspectiveCamera};
use crate::error::{BuildError, BuildResult};
use crate::integrator::{Integrator, NormalIntegrator, PathIntegrator};
use crate::mesh::Mesh;
use crate::object::Object;
use crate::renderer::{RayTracer, RenderConfig};
use crate::scene::Scene;
use crate::{Cuboid, Dielectric, Diffuse, Material, Microfacet, Plane, Reflective, Sphere, Triangle};

/// Materials by name, shared between the objects that use them.
pub type MaterialTable = HashMap<String, Arc<dyn Material>>;

fn vec3(v: [f64; 3]) -> DVec3 {
    DVec3::from_array(v)
}

/// Build a camera. `image_aspect` is used when the description has no aspect ratio.
pub fn build_camera(desc: &CameraDescription, image_aspect: f64) -> BuildResult<Box<dyn Camera>> {
    let settings = CameraSettings::default()
        .with_position(vec3(desc.look_from), vec3(desc.look_at), vec3(desc.up))
        .with_lens(desc.fov, desc.aperture, desc.focal_distance)
        .with_aspect_ratio(desc.aspect_ratio.unwrap_or(image_aspect));

    let camera: Box<dyn Camera> = match desc.kind {
        CameraKind::Perspective => Box::new(PerspectiveCamera::new(&settings)?),
        CameraKind::Orthographic => Box::new(OrthographicCamera::new(&settings)?),
    };
    Ok(camera)
}

pub fn build_material(desc: &MaterialDescription) -> Arc<dyn Material> {
    let kd = vec3(desc.kd);
    let emission = vec3(desc.emission);
    match desc.kind {
        MaterialKind::Diffuse => Arc::new(Diffuse::new(kd).with_emission(emission)),
        MaterialKind::Reflect => Arc::new(Reflective::new(kd, vec3(desc.ks), desc.ior).with_emission(emission)),
        MaterialKind::Dielectric => Arc::new(Dielectric::new(kd, desc.ior).with_emission(emission)),
        MaterialKind::Microfacet => {
            Arc::new(Microfacet::new(kd, desc.roughness, desc.metallic).with_emission(emission))
        }
    }
}

/// Build every material in the description, keyed by name. Later entries win.
pub fn build_materials(materials: &[MaterialDescription]) -> MaterialTable {
    materials
        .iter()
        .map(|m| (m.name.clone(), build_material(m)))
        .collect()
}

/// Build one object. Relative mesh paths resolve against `base_dir`.
pub fn build_object(
    desc: &ObjectDescription,
    materials: &MaterialTable,
    base_dir: Option<&Path>,
) -> BuildResult<Arc<dyn Object>> {
    let material = materials
        .get(&desc.material)
        .cloned()
        .ok_or_else(|| BuildError::UnknownMaterial(desc.material.clone()))?;

    let object: Arc<dyn Object> = match &desc.primitive {
        PrimitiveDescription::Sphere { center, radius } => Arc::new(Sphere::new(vec3(*center), *radius, material)?),
        PrimitiveDescription::Cuboid { min, max } => Arc::new(Cuboid::new(vec3(*min), vec3(*max), material)?),
        PrimitiveDescription::Plane { position, e1, e2 } => {
            Arc::new(Plane::new(vec3(*position), vec3(*e1), vec3(*e2), material)?)
        }
        PrimitiveDescription::Triangle { v0, v1, v2 } => {
            Arc::new(Triangle::new(vec3(*v0), vec3(*v1), vec3(*v2), material)?)
        }
        PrimitiveDescription::Mesh { path } => {
            let resolved = match base_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path.clone(),
            };
            Arc::new(Mesh::from_obj(resolved, material)?)
        }
    };
    Ok(object)
}

/// Build the scene: camera, objects, then lights, then the BVH.
pub fn build_scene(desc: &RenderDescription) -> BuildResult<Scene> {
    let materials = build_materials(&desc.materials);
    let base_dir = desc.base_dir.as_deref();
    let aspect = desc.width as f64 / desc.height.max(1) as f64;

    let mut scene = Scene::new();
    scene.set_camera(build_camera(&desc.scene_data.camera, aspect)?);

    for object in desc.scene_data.objects.iter().chain(&desc.scene_data.lights) {
        scene.add(build_object(object, &materials, base_dir)?);
    }
    scene.build_bvh();

    log::info!(
        "Built scene '{}': {} objects, {} lights, emitter area {:.3}",
        desc.name,
        scene.objects().len(),
        scene.lights().len(),
        scene.emit_area_sum()
    );
    Ok(scene)
}

/// Render settings taken from the description, everything else at its default.
pub fn render_config(desc: &RenderDescription) -> RenderConfig {
    RenderConfig {
        samples_per_pixel: desc.spp,
        ..Default::default()
    }
}

/// Build a ready-to-render tracer from a description.
pub fn build_renderer(desc: &RenderDescription, config: RenderConfig) -> BuildResult<RayTracer> {
    if desc.renderer != RendererKind::RayTracing {
        return Err(BuildError::UnsupportedRenderer(desc.renderer));
    }

    let integrator: Box<dyn Integrator> = match desc.integrator {
        IntegratorKind::Normal => Box::new(NormalIntegrator),
        IntegratorKind::MonteCarlo => Box::new(PathIntegrator::default()),
    };
    let scene = build_scene(desc)?;

    Ok(RayTracer::new(desc.width, desc.height, scene, integrator, config))
}
