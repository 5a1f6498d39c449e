//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection, with
//! back faces culled.

use std::sync::Arc;

use lux_math::{Aabb, DVec3, Ray, HIT_EPSILON};
use rand::RngCore;

use crate::error::{BuildError, BuildResult};
use crate::object::{Object, SurfaceSample};
use crate::sampling::{gen_f64, uniform_triangle};
use crate::{Intersection, Material};

/// Determinant below which a ray counts as parallel to the triangle.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A triangle primitive. Counter-clockwise vertices face the viewer.
pub struct Triangle {
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
    /// Edges from v0
    e1: DVec3,
    e2: DVec3,
    /// Pre-computed face normal (unit length)
    normal: DVec3,
    area: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3, material: Arc<dyn Material>) -> BuildResult<Self> {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let cross = e1.cross(e2);
        let normal = cross.try_normalize().ok_or_else(|| {
            BuildError::DegenerateGeometry(format!("triangle {:?} {:?} {:?} has no area", v0, v1, v2))
        })?;

        // Pad thin dimensions to avoid degenerate AABBs
        let bbox = Aabb::new(v0.min(v1).min(v2), v0.max(v1).max(v2)).padded(HIT_EPSILON);

        Ok(Self {
            v0,
            v1,
            v2,
            e1,
            e2,
            normal,
            area: 0.5 * cross.length(),
            material,
            bbox,
        })
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    pub fn vertices(&self) -> [DVec3; 3] {
        [self.v0, self.v1, self.v2]
    }
}

impl Object for Triangle {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool {
        if self.normal.dot(ray.direction()) > 0.0 {
            return false;
        }

        let pvec = ray.direction().cross(self.e2);
        let det = self.e1.dot(pvec);
        if det.abs() < PARALLEL_EPSILON {
            return false;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin() - self.v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let qvec = tvec.cross(self.e1);
        let v = ray.direction().dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = self.e2.dot(qvec) * inv_det;
        if t < HIT_EPSILON || t >= rec.distance {
            return false;
        }

        rec.record(t, ray.at(t), self.normal, self.material.as_ref());
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
        let (b0, b1, b2) = uniform_triangle(gen_f64(rng), gen_f64(rng));
        let p = b0 * self.v0 + b1 * self.v1 + b2 * self.v2;
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

    fn test_triangle() -> Triangle {
        Triangle::new(
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            Arc::new(Diffuse::new(Color::splat(0.5))),
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_hit() {
        let tri = test_triangle();

        // Ray pointing at the center of the triangle
        let ray = Ray::new(DVec3::new(0.0, 0.0, 1.0), DVec3::new(0.0, 0.0, -1.0));
        let mut rec = Intersection::default();

        assert!(tri.intersect(&ray, &mut rec));
        assert!((rec.distance - 1.0).abs() < 1e-9);
        assert!((rec.normal - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = test_triangle();

        // Ray pointing away from triangle
        let ray = Ray::new(DVec3::new(5.0, 5.0, 1.0), DVec3::new(0.0, 0.0, -1.0));
        let mut rec = Intersection::default();
        assert!(!tri.intersect(&ray, &mut rec));
    }

    #[test]
    fn test_back_face_culled() {
        let tri = test_triangle();
        let ray = Ray::new(DVec3::new(0.0, 0.0, -1.0), DVec3::Z);
        let mut rec = Intersection::default();
        assert!(!tri.intersect(&ray, &mut rec));
    }

    #[test]
    fn test_area_and_bounds() {
        let tri = test_triangle();
        assert!((tri.surface_area() - 2.0).abs() < 1e-12);
        let b = tri.bounds();
        assert!(b.max.z - b.min.z > 0.0);
        assert!(b.min.x <= -1.0 && b.max.y >= 1.0);
    }

    #[test]
    fn test_degenerate_rejected() {
        let result = Triangle::new(
            DVec3::ZERO,
            DVec3::X,
            DVec3::X * 3.0,
            Arc::new(Diffuse::new(Color::ONE)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_inside() {
        let tri = test_triangle();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let s = tri.sample(&mut rng);
            let p = s.intersection.coordinate;
            assert!(p.z.abs() < 1e-12);
            assert!(p.y >= -1.0 - 1e-9 && p.y <= 1.0 + 1e-9);
            // Half-width of the triangle at height y
            assert!(p.x.abs() <= 0.5 * (1.0 - p.y) + 1e-9);
            assert!((s.pdf - 0.5).abs() < 1e-12);
        }
    }
}
