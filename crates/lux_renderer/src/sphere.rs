//! Sphere primitive for ray tracing.

use std::f64::consts::PI;
use std::sync::Arc;

use lux_math::{solve_quadratic, Aabb, DVec3, Ray, HIT_EPSILON};
use rand::RngCore;

use crate::error::{BuildError, BuildResult};
use crate::object::{Object, SurfaceSample};
use crate::sampling::{gen_f64, uniform_sphere};
use crate::{Intersection, Material};

/// A sphere primitive. Normals point outward.
pub struct Sphere {
    center: DVec3,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive.
    pub fn new(center: DVec3, radius: f64, material: Arc<dyn Material>) -> BuildResult<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(BuildError::DegenerateGeometry(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }

        let rvec = DVec3::splat(radius);
        Ok(Self {
            center,
            radius,
            material,
            bbox: Aabb::new(center - rvec, center + rvec),
        })
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Object for Sphere {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool {
        let l = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = 2.0 * ray.direction().dot(l);
        let c = l.length_squared() - self.radius * self.radius;

        let Some((t0, t1)) = solve_quadratic(a, b, c) else {
            return false;
        };

        // Nearest root in front of the origin
        let t = if t0 >= HIT_EPSILON { t0 } else { t1 };
        if t < HIT_EPSILON || t >= rec.distance {
            return false;
        }

        let p = ray.at(t);
        let normal = (p - self.center) / self.radius;
        rec.record(t, p, normal, self.material.as_ref());
        true
    }

    fn bounds(&self) -> Aabb {
        self.bbox
    }

    fn surface_area(&self) -> f64 {
        4.0 * PI * self.radius * self.radius
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> SurfaceSample<'a> {
        let dir = uniform_sphere(gen_f64(rng), gen_f64(rng));
        let mut intersection = Intersection::default();
        intersection.record(0.0, self.center + self.radius * dir, dir, self.material.as_ref());
        SurfaceSample {
            intersection,
            pdf: 1.0 / self.surface_area(),
        }
    }
}
