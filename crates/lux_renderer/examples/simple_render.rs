//! Simple path tracer example.
//!
//! Builds a small Cornell-style box in code, renders it and saves a PPM.
//!
//! Run with: cargo run --release --example simple_render

use std::sync::Arc;

use lux_renderer::{
    BuildResult, CameraSettings, Color, Cuboid, DVec3, Dielectric, Diffuse, Material, Microfacet, Object, PathIntegrator,
    PerspectiveCamera, Plane, RayTracer, RenderConfig, RenderResult, Scene, Sphere,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Lux Path Tracer - Simple Example");
    println!("================================");

    // Build the scene
    let start = std::time::Instant::now();
    let scene = match build_scene() {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Failed to build scene: {}", e);
            std::process::exit(1);
        }
    };
    println!("Scene built in {:?}", start.elapsed());

    let config = RenderConfig {
        samples_per_pixel: 32,
        ..Default::default()
    };
    let tracer = RayTracer::new(256, 256, scene, Box::new(PathIntegrator::default()), config);

    if let Err(e) = render_and_save(&tracer, "output.ppm") {
        eprintln!("Render failed: {}", e);
        std::process::exit(1);
    }
    println!("Saved to output.ppm");
}

fn render_and_save(tracer: &RayTracer, filename: &str) -> RenderResult<()> {
    let start = std::time::Instant::now();
    let image = tracer.render()?;
    println!("Rendered in {:?}", start.elapsed());
    image.save_ppm(filename, tracer.config().gamma)
}

/// Inward-facing quad.
fn wall(position: DVec3, e1: DVec3, e2: DVec3, material: &Arc<dyn Material>) -> BuildResult<Arc<dyn Object>> {
    Ok(Arc::new(Plane::new(position, e1, e2, Arc::clone(material))?) as Arc<dyn Object>)
}

fn build_scene() -> BuildResult<Scene> {
    let white: Arc<dyn Material> = Arc::new(Diffuse::new(Color::splat(0.73)));
    let red: Arc<dyn Material> = Arc::new(Diffuse::new(Color::new(0.65, 0.05, 0.05)));
    let green: Arc<dyn Material> = Arc::new(Diffuse::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(Diffuse::new(Color::ZERO).with_emission(Color::splat(15.0)));

    let mut scene = Scene::new();

    // Box [-1, 1]³, open towards +Z where the camera sits
    scene.add(wall(DVec3::new(-1.0, -1.0, -1.0), DVec3::new(0.0, 0.0, 2.0), DVec3::new(2.0, 0.0, 0.0), &white)?);
    scene.add(wall(DVec3::new(-1.0, 1.0, -1.0), DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 2.0), &white)?);
    scene.add(wall(DVec3::new(-1.0, -1.0, -1.0), DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 2.0, 0.0), &white)?);
    scene.add(wall(DVec3::new(-1.0, -1.0, -1.0), DVec3::new(0.0, 2.0, 0.0), DVec3::new(0.0, 0.0, 2.0), &red)?);
    scene.add(wall(DVec3::new(1.0, -1.0, -1.0), DVec3::new(0.0, 0.0, 2.0), DVec3::new(0.0, 2.0, 0.0), &green)?);

    scene.add(Arc::new(Cuboid::centered(
        DVec3::new(-0.35, -0.4, -0.3),
        0.6,
        1.2,
        0.6,
        Arc::clone(&white),
    )?));
    scene.add(Arc::new(Sphere::new(
        DVec3::new(0.45, -0.65, 0.3),
        0.35,
        Arc::new(Dielectric::new(Color::ONE, 1.5)),
    )?));
    scene.add(Arc::new(Sphere::new(
        DVec3::new(0.5, -0.8, -0.5),
        0.2,
        Arc::new(Microfacet::new(Color::new(1.0, 0.78, 0.34), 0.3, 1.0)),
    )?));

    // Ceiling light, facing down just below the ceiling
    scene.add(wall(
        DVec3::new(-0.25, 0.999, -0.25),
        DVec3::new(0.5, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 0.5),
        &light,
    )?);

    let settings = CameraSettings::default()
        .with_position(DVec3::new(0.0, 0.0, 3.4), DVec3::ZERO, DVec3::Y)
        .with_lens(40.0, 0.0, 1.0);
    scene.set_camera(Box::new(PerspectiveCamera::new(&settings)?));

    scene.build_bvh();
    println!("Created {} objects ({} lights)", scene.objects().len(), scene.lights().len());
    Ok(scene)
}
