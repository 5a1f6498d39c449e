//! Scene: owns the objects, the emitter list, the camera and the BVH.

use std::sync::Arc;

use lux_math::Ray;
use rand::RngCore;

use crate::bvh::Bvh;
use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::object::{Object, SurfaceSample};
use crate::sampling::gen_f64;
use crate::Intersection;

/// A collection of objects with an acceleration structure.
///
/// Objects are added first, then [`Scene::build_bvh`] freezes them into a
/// BVH. Adding an object afterwards drops the BVH until it is rebuilt.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Arc<dyn Object>>,
    lights: Vec<Arc<dyn Object>>,
    emit_area_sum: f64,
    camera: Option<Box<dyn Camera>>,
    bvh: Option<Bvh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object. Emissive objects are also registered as lights.
    pub fn add(&mut self, object: Arc<dyn Object>) {
        if object.has_emission() {
            self.emit_area_sum += object.surface_area();
            self.lights.push(Arc::clone(&object));
        }
        self.objects.push(object);
        self.bvh = None;
    }

    /// Build the BVH over the current objects.
    pub fn build_bvh(&mut self) {
        self.bvh = Some(Bvh::new(&self.objects));
    }

    /// True once a BVH covers every added object.
    pub fn is_built(&self) -> bool {
        self.bvh.is_some()
    }

    /// Closest hit along `ray`. Reports no hits until the BVH is built.
    pub fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool {
        match &self.bvh {
            Some(bvh) => bvh.intersect(ray, rec),
            None => false,
        }
    }

    /// Convenience wrapper around [`Scene::intersect`].
    pub fn hit(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let mut rec = Intersection::default();
        self.intersect(ray, &mut rec).then_some(rec)
    }

    /// Pick a light uniformly by index and sample a point on it.
    ///
    /// The returned pdf is per unit area and includes the 1/K chance of
    /// choosing that light among K.
    pub fn sample_light(&self, rng: &mut dyn RngCore) -> RenderResult<SurfaceSample<'_>> {
        if self.lights.is_empty() {
            return Err(RenderError::NoLights);
        }
        let count = self.lights.len();
        let index = ((gen_f64(rng) * count as f64) as usize).min(count - 1);
        let mut sample = self.lights[index].sample(rng);
        sample.pdf /= count as f64;
        Ok(sample)
    }

    pub fn objects(&self) -> &[Arc<dyn Object>] {
        &self.objects
    }

    pub fn lights(&self) -> &[Arc<dyn Object>] {
        &self.lights
    }

    /// Total surface area of all emissive objects.
    pub fn emit_area_sum(&self) -> f64 {
        self.emit_area_sum
    }

    pub fn set_camera(&mut self, camera: Box<dyn Camera>) {
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<&dyn Camera> {
        self.camera.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Diffuse, Material, Sphere};
    use lux_math::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(x: f64, radius: f64, material: Arc<dyn Material>) -> Arc<dyn Object> {
        Arc::new(Sphere::new(DVec3::new(x, 0.0, -5.0), radius, material).unwrap())
    }

    #[test]
    fn test_add_bookkeeping() {
        let grey: Arc<dyn Material> = Arc::new(Diffuse::new(Color::splat(0.5)));
        let light: Arc<dyn Material> = Arc::new(Diffuse::new(Color::ONE).with_emission(Color::splat(5.0)));

        let mut scene = Scene::new();
        let mut expected_area = 0.0;
        for i in 0..3 {
            let s = sphere(i as f64 * 3.0, 0.5 + i as f64, light.clone());
            expected_area += s.surface_area();
            scene.add(s);
        }
        for i in 0..4 {
            scene.add(sphere(20.0 + i as f64 * 3.0, 1.0, grey.clone()));
        }

        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.objects().len(), 7);
        assert!((scene.emit_area_sum() - expected_area).abs() < 1e-9);
    }

    #[test]
    fn test_intersect_requires_bvh() {
        let mut scene = Scene::new();
        scene.add(sphere(0.0, 1.0, Arc::new(Diffuse::new(Color::ONE))));
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);

        assert!(!scene.is_built());
        assert!(scene.hit(&ray).is_none());

        scene.build_bvh();
        assert!(scene.is_built());
        let hit = scene.hit(&ray).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-9);

        // Adding invalidates the tree
        scene.add(sphere(5.0, 1.0, Arc::new(Diffuse::new(Color::ONE))));
        assert!(!scene.is_built());
    }

    #[test]
    fn test_sample_light_without_lights() {
        let mut scene = Scene::new();
        scene.add(sphere(0.0, 1.0, Arc::new(Diffuse::new(Color::ONE))));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(scene.sample_light(&mut rng), Err(RenderError::NoLights)));
    }

    #[test]
    fn test_sample_light_pdf() {
        let light: Arc<dyn Material> = Arc::new(Diffuse::new(Color::ONE).with_emission(Color::ONE));
        let mut scene = Scene::new();
        scene.add(sphere(0.0, 1.0, light.clone()));
        scene.add(sphere(10.0, 2.0, light));

        let mut rng = StdRng::seed_from_u64(3);
        let mut picked_small = 0;
        let n = 2000;
        for _ in 0..n {
            let s = scene.sample_light(&mut rng).unwrap();
            let p = s.intersection.coordinate;
            assert!(s.intersection.has_emission());
            if p.x < 5.0 {
                picked_small += 1;
                let area = 4.0 * std::f64::consts::PI;
                assert!((s.pdf - 0.5 / area).abs() < 1e-12);
            } else {
                let area = 16.0 * std::f64::consts::PI;
                assert!((s.pdf - 0.5 / area).abs() < 1e-12);
            }
        }
        // Uniform over light count, not area
        assert!((picked_small as f64 / n as f64 - 0.5).abs() < 0.05);
    }
}
