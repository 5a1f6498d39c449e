//! Example: Load and inspect a render document.
//!
//! Run with: cargo run --example describe_scene -- demos/cornell.json

use std::env;

use lux_core::{load_description, PrimitiveDescription};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: describe_scene <path-to-json>");
        println!("\nExample:");
        println!("  cargo run --example describe_scene -- demos/cornell.json");
        return;
    }

    let path = &args[1];
    println!("Loading render document: {}", path);

    match load_description(path) {
        Ok(description) => {
            println!("\n=== {} ===", description.name);
            println!("Resolution: {}x{}", description.width, description.height);
            println!("Samples per pixel: {}", description.spp);
            println!("Renderer: {:?}", description.renderer);
            println!("Integrator: {:?}", description.integrator);

            println!("\n--- Materials ---");
            for material in &description.materials {
                println!(
                    "  {} ({:?}) kd={:?} emission={:?}",
                    material.name, material.kind, material.kd, material.emission
                );
            }

            let camera = &description.scene_data.camera;
            println!("\n--- Camera ({:?}) ---", camera.kind);
            println!("  From {:?} looking at {:?}, fov {}", camera.look_from, camera.look_at, camera.fov);

            println!("\n--- Primitives ---");
            let objects = description.scene_data.objects.iter().map(|o| ("object", o));
            let lights = description.scene_data.lights.iter().map(|o| ("light", o));
            for (role, object) in objects.chain(lights) {
                match &object.primitive {
                    PrimitiveDescription::Mesh { path } => {
                        println!("  [{}] Mesh {} ({})", role, path.display(), object.material)
                    }
                    primitive => println!("  [{}] {} ({})", role, primitive.kind_name(), object.material),
                }
            }
        }
        Err(e) => {
            eprintln!("Error loading render document: {}", e);
            std::process::exit(1);
        }
    }
}
