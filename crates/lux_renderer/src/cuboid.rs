//! Axis-aligned box primitive.

use std::sync::Arc;

use lux_math::{Aabb, DVec3, Ray, HIT_EPSILON};
use rand::RngCore;

use crate::error::{BuildError, BuildResult};
use crate::object::{Object, SurfaceSample};
use crate::sampling::gen_f64;
use crate::{Intersection, Material};

/// An axis-aligned box. Face normals point outward.
pub struct Cuboid {
    bounds: Aabb,
    material: Arc<dyn Material>,
}

impl Cuboid {
    /// Create a box from two opposite corners, in any order.
    ///
    /// Every extent must be positive.
    pub fn new(a: DVec3, b: DVec3, material: Arc<dyn Material>) -> BuildResult<Self> {
        let bounds = Aabb::new(a, b);
        let d = bounds.diagonal();
        if !(d.min_element() > 0.0 && d.is_finite()) {
            return Err(BuildError::DegenerateGeometry(format!(
                "cuboid extents must be positive, got {:?}",
                d
            )));
        }
        Ok(Self { bounds, material })
    }

    /// Create a box from its center and full width, height and depth.
    pub fn centered(center: DVec3, width: f64, height: f64, depth: f64, material: Arc<dyn Material>) -> BuildResult<Self> {
        let half = 0.5 * DVec3::new(width, height, depth);
        Self::new(center - half, center + half, material)
    }

    /// Outward normal of the face closest to `p`.
    fn face_normal(&self, p: DVec3) -> DVec3 {
        let to_min = (p - self.bounds.min).abs();
        let to_max = (self.bounds.max - p).abs();

        let mut best = f64::INFINITY;
        let mut normal = DVec3::X;
        for axis in 0..3 {
            if to_min[axis] < best {
                best = to_min[axis];
                normal = DVec3::ZERO;
                normal[axis] = -1.0;
            }
            if to_max[axis] < best {
                best = to_max[axis];
                normal = DVec3::ZERO;
                normal[axis] = 1.0;
            }
        }
        normal
    }

    /// Area of one face perpendicular to `axis`.
    fn face_area(&self, axis: usize) -> f64 {
        let d = self.bounds.diagonal();
        d[(axis + 1) % 3] * d[(axis + 2) % 3]
    }
}

impl Object for Cuboid {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool {
        let t_min = (self.bounds.min - ray.origin()) * ray.direction_inv();
        let t_max = (self.bounds.max - ray.origin()) * ray.direction_inv();

        let t_enter = t_min.min(t_max).max_element();
        let t_exit = t_min.max(t_max).min_element();
        if t_enter > t_exit {
            return false;
        }

        // From inside the box the exit face is the hit
        let t = if t_enter >= HIT_EPSILON { t_enter } else { t_exit };
        if t < HIT_EPSILON || t >= rec.distance {
            return false;
        }

        let p = ray.at(t);
        rec.record(t, p, self.face_normal(p), self.material.as_ref());
        true
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn surface_area(&self) -> f64 {
        self.bounds.surface_area()
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> SurfaceSample<'a> {
        // Pick one of the six faces proportionally to its area
        let total = self.surface_area();
        let mut target = gen_f64(rng) * total;
        let mut face = (2, true);
        'pick: for axis in 0..3 {
            for positive in [false, true] {
                let area = self.face_area(axis);
                if target < area {
                    face = (axis, positive);
                    break 'pick;
                }
                target -= area;
            }
        }

        let (axis, positive) = face;
        let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);
        let mut p = self.bounds.min;
        p[axis] = if positive { self.bounds.max[axis] } else { self.bounds.min[axis] };
        p[u_axis] += gen_f64(rng) * (self.bounds.max[u_axis] - self.bounds.min[u_axis]);
        p[v_axis] += gen_f64(rng) * (self.bounds.max[v_axis] - self.bounds.min[v_axis]);

        let mut normal = DVec3::ZERO;
        normal[axis] = if positive { 1.0 } else { -1.0 };

        let mut intersection = Intersection::default();
        intersection.record(0.0, p, normal, self.material.as_ref());
        SurfaceSample {
            intersection,
            pdf: 1.0 / total,
        }
    }
}
