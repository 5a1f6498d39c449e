//! Object trait: the capability set every surface primitive provides.

use lux_math::{Aabb, Ray};
use rand::RngCore;

use crate::{Intersection, Material};

/// A point drawn on an object's surface.
pub struct SurfaceSample<'a> {
    /// Coordinate, normal and material of the sampled point
    pub intersection: Intersection<'a>,
    /// Density of the point with respect to surface area
    pub pdf: f64,
}

/// Trait for surfaces that can be hit by rays and sampled as lights.
pub trait Object: Send + Sync {
    /// Intersect `ray` with this object.
    ///
    /// Returns true and overwrites `rec` only if the hit is closer than
    /// `rec.distance`. Hits closer than [`lux_math::HIT_EPSILON`] are ignored.
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool;

    /// Get the axis-aligned bounding box of this object.
    fn bounds(&self) -> Aabb;

    fn surface_area(&self) -> f64;

    fn material(&self) -> &dyn Material;

    fn has_emission(&self) -> bool {
        self.material().has_emission()
    }

    /// Draw a uniformly distributed point on the surface.
    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> SurfaceSample<'a>;
}
