use crate::DVec3;

/// A ray in 3D space with origin and direction.
///
/// The componentwise reciprocal of the direction is cached at construction
/// for the slab test in [`crate::Aabb::hit`]. Rays are immutable once built,
/// so the cache can never go stale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: DVec3,
    direction: DVec3,
    direction_inv: DVec3,
}

impl Ray {
    /// Create a new ray. The direction is not normalized.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            direction_inv: direction.recip(),
        }
    }

    /// Create a ray leaving a surface point.
    ///
    /// The origin is nudged along `normal` towards the side `direction` points to,
    /// so the ray does not immediately re-hit the surface it starts on.
    pub fn spawn(point: DVec3, normal: DVec3, direction: DVec3, offset: f64) -> Self {
        let side = if direction.dot(normal) >= 0.0 { 1.0 } else { -1.0 };
        Self::new(point + normal * (offset * side), direction)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Componentwise reciprocal of the direction.
    #[inline]
    pub fn direction_inv(&self) -> DVec3 {
        self.direction_inv
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}
