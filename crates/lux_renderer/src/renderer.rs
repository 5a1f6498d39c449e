//! Parallel render driver and image output.
//!
//! Implements the full frame loop:
//! - Row-band partitioning of the frame buffer across a rayon pool
//! - Jittered multi-sampling per pixel
//! - Gamma-encoded 8-bit PPM output

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ImageEncoder};
use rand::RngCore;
use rayon::prelude::*;

use crate::band::{generate_bands, render_band};
use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::integrator::Integrator;
use crate::sampling::gen_f64;
use crate::scene::Scene;
use crate::Color;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Worker threads; `None` uses every core
    pub threads: Option<usize>,
    /// Base seed for the per-band random streams
    pub seed: u64,
    /// Exponent applied to each channel before 8-bit quantization
    pub gamma: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 64,
            threads: None,
            seed: 0,
            gamma: 0.7,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig("samples_per_pixel must be at least 1".to_string()));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig("threads must be at least 1".to_string()));
        }
        if self.gamma <= 0.0 || !self.gamma.is_finite() {
            return Err(RenderError::InvalidConfig(format!("gamma must be positive, got {}", self.gamma)));
        }
        Ok(())
    }
}

/// Convert a linear color to 8-bit RGB: `255 · clamp(c, 0, 1)^gamma`, truncated.
pub fn color_to_rgb8(color: Color, gamma: f64) -> [u8; 3] {
    let encode = |c: f64| (255.0 * c.clamp(0.0, 1.0).powf(gamma)) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major, top row first
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to packed RGB bytes.
    pub fn to_rgb8(&self, gamma: f64) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&c| color_to_rgb8(c, gamma))
            .collect()
    }

    /// Mean of all pixels.
    pub fn average(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().sum::<Color>() / self.pixels.len() as f64
    }

    /// Write a binary PPM (P6) file.
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P, gamma: f64) -> RenderResult<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        let encoder = PnmEncoder::new(writer).with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary));
        encoder.write_image(&self.to_rgb8(gamma), self.width, self.height, ColorType::Rgb8)?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Monte Carlo ray tracer: a scene, an integrator and the frame settings.
pub struct RayTracer {
    width: u32,
    height: u32,
    scene: Scene,
    integrator: Box<dyn Integrator>,
    config: RenderConfig,
}

impl RayTracer {
    pub fn new(width: u32, height: u32, scene: Scene, integrator: Box<dyn Integrator>, config: RenderConfig) -> Self {
        Self {
            width,
            height,
            scene,
            integrator,
            config,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Average of `samples_per_pixel` jittered estimates for pixel (x, y).
    pub fn render_pixel(&self, camera: &dyn Camera, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
        let du = (self.width.max(2) - 1) as f64;
        let dv = (self.height.max(2) - 1) as f64;

        let mut pixel_color = Color::ZERO;
        for _ in 0..self.config.samples_per_pixel {
            let u = (x as f64 + gen_f64(rng)) / du;
            let v = (y as f64 + gen_f64(rng)) / dv;
            let ray = camera.generate_ray(u, v, rng);
            pixel_color += self.integrator.li(&ray, &self.scene, rng);
        }

        // Average the samples
        pixel_color / self.config.samples_per_pixel as f64
    }

    /// Render the full frame.
    ///
    /// Each worker owns one disjoint row band of the frame buffer, so no
    /// synchronization is needed while rendering.
    pub fn render(&self) -> RenderResult<ImageBuffer> {
        self.config.validate()?;
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let camera = self.scene.camera().ok_or(RenderError::NoCamera)?;
        if !self.scene.is_built() {
            return Err(RenderError::BvhNotBuilt);
        }
        if self.scene.lights().is_empty() {
            log::warn!("Scene has no emitters; direct lighting is disabled");
        }

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build().map_err(|e| RenderError::ThreadPool(e.to_string()))?;

        let bands = generate_bands(self.height, pool.current_num_threads());
        log::info!(
            "Rendering {}x{} @ {} spp on {} threads ({} bands)",
            self.width,
            self.height,
            self.config.samples_per_pixel,
            pool.current_num_threads(),
            bands.len()
        );

        let mut image = ImageBuffer::new(self.width, self.height);

        // Hand each band its own slice of the frame buffer
        let mut work = Vec::with_capacity(bands.len());
        let mut rest: &mut [Color] = &mut image.pixels;
        for band in &bands {
            let (slice, tail) = std::mem::take(&mut rest).split_at_mut(band.pixel_count(self.width));
            work.push((band, slice));
            rest = tail;
        }

        let start = std::time::Instant::now();
        pool.install(|| {
            work.into_par_iter()
                .for_each(|(band, pixels)| render_band(band, pixels, self, camera));
        });
        log::info!("Rendered in {:?}", start.elapsed());

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraSettings, Diffuse, NormalIntegrator, Object, PathIntegrator, PerspectiveCamera, Sphere};
    use lux_math::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let grey = Arc::new(Diffuse::new(Color::splat(0.5)));
        let light = Arc::new(Diffuse::new(Color::ZERO).with_emission(Color::splat(4.0)));
        scene.add(Arc::new(Sphere::new(DVec3::new(0.0, 0.0, -3.0), 1.0, grey).unwrap()) as Arc<dyn Object>);
        scene.add(Arc::new(Sphere::new(DVec3::new(0.0, 3.0, 0.0), 0.5, light).unwrap()));
        let settings = CameraSettings::default()
            .with_position(DVec3::ZERO, DVec3::new(0.0, 0.0, -3.0), DVec3::Y)
            .with_lens(60.0, 0.0, 1.0);
        scene.set_camera(Box::new(PerspectiveCamera::new(&settings).unwrap()));
        scene.build_bvh();
        scene
    }

    fn config(threads: usize) -> RenderConfig {
        RenderConfig {
            samples_per_pixel: 4,
            threads: Some(threads),
            seed: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::ZERO, 0.7), [0, 0, 0]);
        assert_eq!(color_to_rgb8(Color::ONE, 0.7), [255, 255, 255]);
        // Out of range values clamp before encoding
        assert_eq!(color_to_rgb8(Color::new(-1.0, 2.0, 0.5), 1.0), [0, 255, 127]);
        assert_eq!(color_to_rgb8(Color::splat(0.25), 0.5), [127, 127, 127]);
    }

    #[test]
    fn test_image_buffer() {
        let mut image = ImageBuffer::new(4, 3);
        assert_eq!(image.pixels.len(), 12);
        image.set(3, 2, Color::ONE);
        assert_eq!(image.get(3, 2), Color::ONE);
        assert_eq!(image.pixels[11], Color::ONE);
        assert_eq!(image.to_rgb8(1.0).len(), 36);
        assert!((image.average().x - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_save_ppm() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(1, 0, Color::ONE);
        let path = std::env::temp_dir().join("lux_renderer_test.ppm");
        image.save_ppm(&path, 0.7).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        // Header, then 2 pixels of 3 bytes
        assert_eq!(&bytes[bytes.len() - 6..], &[0, 0, 0, 255, 255, 255]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_render_pixel() {
        let tracer = RayTracer::new(10, 10, sphere_scene(), Box::new(PathIntegrator::default()), config(1));
        let camera = tracer.scene().camera().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        // Center pixel looks at the lit sphere
        let color = tracer.render_pixel(camera, 5, 5, &mut rng);
        assert!(color.length() > 0.0);
        assert!(color.max_element() <= 1.0);
    }

    #[test]
    fn test_render_is_deterministic_per_seed() {
        let tracer = RayTracer::new(16, 12, sphere_scene(), Box::new(PathIntegrator::default()), config(3));
        let a = tracer.render().unwrap();
        let b = tracer.render().unwrap();
        assert_eq!(a.pixels, b.pixels);
        assert_eq!((a.width, a.height), (16, 12));
        assert!(a.average().length() > 0.0);
    }

    #[test]
    fn test_normal_render_thread_counts() {
        let single = RayTracer::new(9, 7, sphere_scene(), Box::new(NormalIntegrator), config(1));
        let many = RayTracer::new(9, 7, sphere_scene(), Box::new(NormalIntegrator), config(4));
        let a = single.render().unwrap();
        let b = many.render().unwrap();
        assert_eq!(a.pixels.len(), b.pixels.len());
        // Corners see the background, the middle sees the sphere
        assert_eq!(a.get(0, 0), Color::ZERO);
        assert!(a.get(4, 3).length() > 0.0);
        assert!(b.get(4, 3).length() > 0.0);
    }

    #[test]
    fn test_render_preconditions() {
        let mut scene = sphere_scene();
        scene.add(Arc::new(Sphere::new(DVec3::new(5.0, 0.0, -3.0), 1.0, Arc::new(Diffuse::new(Color::ONE))).unwrap()));
        let tracer = RayTracer::new(4, 4, scene, Box::new(NormalIntegrator), config(1));
        assert!(matches!(tracer.render(), Err(RenderError::BvhNotBuilt)));

        let no_camera = RayTracer::new(4, 4, Scene::new(), Box::new(NormalIntegrator), config(1));
        assert!(matches!(no_camera.render(), Err(RenderError::NoCamera)));

        let mut bad = RayTracer::new(4, 4, sphere_scene(), Box::new(NormalIntegrator), config(1));
        bad.config_mut().samples_per_pixel = 0;
        assert!(matches!(bad.render(), Err(RenderError::InvalidConfig(_))));

        let empty = RayTracer::new(0, 4, sphere_scene(), Box::new(NormalIntegrator), config(1));
        assert!(matches!(empty.render(), Err(RenderError::InvalidConfig(_))));
    }
}
