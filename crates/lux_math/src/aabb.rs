use crate::{DVec3, Ray};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// For a non-degenerate box `min <= max` componentwise. The default box has
/// both corners at the origin.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create an AABB from two corner points, in any order.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A zero-volume box around a single point.
    pub fn from_point(p: DVec3) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing all the given points, or `None` for no points.
    pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Option<Self> {
        points
            .into_iter()
            .map(Self::from_point)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Componentwise min of mins and max of maxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True iff the interiors overlap on all three axes.
    ///
    /// Boxes that only share a boundary do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.max.x > other.min.x && self.min.x < other.max.x)
            && (self.max.y > other.min.y && self.min.y < other.max.y)
            && (self.max.z > other.min.z && self.min.z < other.max.z)
    }

    /// True iff `p` lies strictly inside the box.
    pub fn inside(&self, p: DVec3) -> bool {
        p.cmpgt(self.min).all() && p.cmplt(self.max).all()
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> DVec3 {
        0.5 * self.min + 0.5 * self.max
    }

    /// Vector from `min` to `max`.
    pub fn diagonal(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn surface_area(&self) -> f64 {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn max_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Position of `p` relative to the box, normalized to [0,1] per axis.
    ///
    /// Axes with zero extent are left un-normalized.
    pub fn offset(&self, p: DVec3) -> DVec3 {
        let mut o = p - self.min;
        for axis in 0..3 {
            if self.max[axis] > self.min[axis] {
                o[axis] /= self.max[axis] - self.min[axis];
            }
        }
        o
    }

    /// Grow every axis thinner than `delta` to exactly `delta`, centered on the original extent.
    ///
    /// Flat primitives (planes, triangles) need this so the strict slab test can still hit them.
    pub fn padded(&self, delta: f64) -> Aabb {
        let mut padded = *self;
        for axis in 0..3 {
            if padded.max[axis] - padded.min[axis] < delta {
                let mid = 0.5 * (padded.min[axis] + padded.max[axis]);
                padded.min[axis] = mid - 0.5 * delta;
                padded.max[axis] = mid + 0.5 * delta;
            }
        }
        padded
    }

    /// Test if a ray intersects this AABB in front of its origin.
    ///
    /// Slab method. Existence test only: the BVH uses it to prune, never to report a hit.
    pub fn hit(&self, ray: &Ray) -> bool {
        let t_min = (self.min - ray.origin()) * ray.direction_inv();
        let t_max = (self.max - ray.origin()) * ray.direction_inv();

        let t0 = t_min.min(t_max);
        let t1 = t_min.max(t_max);

        let t_enter = t0.max_element();
        let t_exit = t1.min_element();

        t_enter < t_exit && t_exit > 0.0
    }
}
