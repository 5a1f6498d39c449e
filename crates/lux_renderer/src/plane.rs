//! Finite one-sided parallelogram.

use std::sync::Arc;

use lux_math::{Aabb, DVec3, Ray, EPSILON, HIT_EPSILON};
use rand::RngCore;

use crate::error::{BuildError, BuildResult};
use crate::object::{Object, SurfaceSample};
use crate::sampling::gen_f64;
use crate::{Intersection, Material};

/// Parallelogram `position + u·e1 + v·e2` for `u, v` in [0, 1].
///
/// The normal is `normalize(e1 × e2)`. Rays travelling along the normal
/// (arriving from the back) pass through.
pub struct Plane {
    position: DVec3,
    e1: DVec3,
    e2: DVec3,
    normal: DVec3,
    /// Unnormalized `e1 × e2`
    cross: DVec3,
    area: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Plane {
    pub fn new(position: DVec3, e1: DVec3, e2: DVec3, material: Arc<dyn Material>) -> BuildResult<Self> {
        let cross = e1.cross(e2);
        let normal = cross.try_normalize().ok_or_else(|| {
            BuildError::DegenerateGeometry(format!("plane edges {:?} and {:?} are parallel", e1, e2))
        })?;

        let bbox = Aabb::from_points([position, position + e1, position + e2, position + e1 + e2])
            .unwrap_or_default()
            .padded(HIT_EPSILON);

        Ok(Self {
            position,
            e1,
            e2,
            normal,
            cross,
            area: cross.length(),
            material,
            bbox,
        })
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }
}

impl Object for Plane {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool {
        let denom = ray.direction().dot(self.normal);
        // One-sided, and parallel rays never hit
        if denom > -EPSILON {
            return false;
        }

        let t = (self.position - ray.origin()).dot(self.normal) / denom;
        if t < HIT_EPSILON || t >= rec.distance {
            return false;
        }

        let p = ray.at(t);
        let local = p - self.position;
        let inv = 1.0 / self.cross.length_squared();
        let u = local.cross(self.e2).dot(self.cross) * inv;
        let v = self.e1.cross(local).dot(self.cross) * inv;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return false;
        }

        rec.record(t, p, self.normal, self.material.as_ref());
        true
    }

    fn bounds(&self) -> Aabb {
        self.bbox
    }

    fn surface_area(&self) -> f64 {
        self.area
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> SurfaceSample<'a> {
        let p = self.position + gen_f64(rng) * self.e1 + gen_f64(rng) * self.e2;
        let mut intersection = Intersection::default();
        intersection.record(0.0, p, self.normal, self.material.as_ref());
        SurfaceSample {
            intersection,
            pdf: 1.0 / self.area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Diffuse};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn floor() -> Plane {
        // Normal = Z × X = +Y, facing up
        Plane::new(
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(0.0, 0.0, 2.0),
            DVec3::new(2.0, 0.0, 0.0),
            Arc::new(Diffuse::new(Color::splat(0.5))),
        )
        .unwrap()
    }

    #[test]
    fn test_normal_from_edges() {
        assert!((floor().normal() - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_hit_from_front() {
        let plane = floor();
        let ray = Ray::new(DVec3::new(0.5, 3.0, 0.5), DVec3::NEG_Y);
        let mut rec = Intersection::default();
        assert!(plane.intersect(&ray, &mut rec));
        assert!((rec.distance - 3.0).abs() < 1e-12);
        assert_eq!(rec.normal, plane.normal());
    }

    #[test]
    fn test_back_face_and_parallel_miss() {
        let plane = floor();
        let mut rec = Intersection::default();
        assert!(!plane.intersect(&Ray::new(DVec3::new(0.0, -3.0, 0.0), DVec3::Y), &mut rec));
        assert!(!plane.intersect(&Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::X), &mut rec));
    }

    #[test]
    fn test_outside_extent_misses() {
        let plane = floor();
        let mut rec = Intersection::default();
        let ray = Ray::new(DVec3::new(1.5, 3.0, 0.0), DVec3::NEG_Y);
        assert!(!plane.intersect(&ray, &mut rec));
    }

    #[test]
    fn test_skewed_parallelogram() {
        let plane = Plane::new(
            DVec3::ZERO,
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            Arc::new(Diffuse::new(Color::ONE)),
        )
        .unwrap();
        // (2.8, 0.9) is inside the sheared shape, (0.2, 0.9) left of it
        let mut rec = Intersection::default();
        let ray = Ray::new(DVec3::new(2.8, 0.9, 1.0), DVec3::NEG_Z);
        assert!(plane.intersect(&ray, &mut rec));

        let mut rec = Intersection::default();
        let ray = Ray::new(DVec3::new(0.2, 0.9, 1.0), DVec3::NEG_Z);
        assert!(!plane.intersect(&ray, &mut rec));
        assert!((plane.surface_area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_bounds_are_padded() {
        let b = floor().bounds();
        assert!(b.max.y - b.min.y >= HIT_EPSILON * 0.999);
        assert!(b.hit(&Ray::new(DVec3::new(0.0, 2.0, 0.0), DVec3::NEG_Y)));
    }

    #[test]
    fn test_parallel_edges_rejected() {
        let result = Plane::new(DVec3::ZERO, DVec3::X, DVec3::X * 2.0, Arc::new(Diffuse::new(Color::ONE)));
        assert!(matches!(result, Err(BuildError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_sample() {
        let plane = floor();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let s = plane.sample(&mut rng);
            let p = s.intersection.coordinate;
            assert_eq!(p.y, 0.0);
            assert!(p.x >= -1.0 && p.x <= 1.0 && p.z >= -1.0 && p.z <= 1.0);
            assert!((s.pdf - 0.25).abs() < 1e-12);
        }
    }
}
