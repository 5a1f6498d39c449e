//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree built top-down with a binned surface area heuristic. Every
//! leaf holds exactly one object; traversal prunes children whose bounds
//! the ray misses and keeps the closest hit.

use std::sync::Arc;

use lux_math::{Aabb, DVec3, Ray};

use crate::object::Object;
use crate::Intersection;

/// Number of equal-width centroid buckets per axis.
const BUCKET_COUNT: usize = 12;

/// BVH node - either a branch with two children or a leaf with one object.
pub enum BvhNode {
    /// Leaf node wrapping a single object.
    Leaf {
        object: Arc<dyn Object>,
        bbox: Aabb,
        area: f64,
    },
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
}

/// Per-bucket accumulator used while evaluating SAH splits.
#[derive(Clone, Copy, Default)]
struct Bucket {
    count: usize,
    bounds: Option<Aabb>,
}

impl Bucket {
    fn add(&mut self, b: &Aabb) {
        self.count += 1;
        self.bounds = Some(match self.bounds {
            Some(acc) => acc.union(b),
            None => *b,
        });
    }

    fn merge(&self, other: &Bucket) -> Bucket {
        let bounds = match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        };
        Bucket {
            count: self.count + other.count,
            bounds,
        }
    }

    fn area(&self) -> f64 {
        self.bounds.map_or(0.0, |b| b.surface_area())
    }
}

/// Bucket index of `centroid` along `axis` within `centroid_bounds`.
fn bucket_index(centroid_bounds: &Aabb, centroid: DVec3, axis: usize) -> usize {
    let offset = centroid_bounds.offset(centroid)[axis];
    ((BUCKET_COUNT as f64 * offset) as usize).min(BUCKET_COUNT - 1)
}

/// A primitive's bounds and centroid, computed once before building.
struct BuildItem {
    object: Arc<dyn Object>,
    bbox: Aabb,
    centroid: DVec3,
}

impl BvhNode {
    fn leaf(item: BuildItem) -> Self {
        let area = item.object.surface_area();
        BvhNode::Leaf {
            object: item.object,
            bbox: item.bbox,
            area,
        }
    }

    /// Recursive BVH construction. `items` is never empty.
    fn build(mut items: Vec<BuildItem>) -> Self {
        let n = items.len();
        if n == 1 {
            if let Some(item) = items.pop() {
                return Self::leaf(item);
            }
        }

        if n == 2 {
            let right = items.pop();
            let left = items.pop();
            if let (Some(l), Some(r)) = (left, right) {
                let bbox = l.bbox.union(&r.bbox);
                return BvhNode::Branch {
                    left: Box::new(Self::leaf(l)),
                    right: Box::new(Self::leaf(r)),
                    bbox,
                };
            }
        }

        let centroid_bounds = items
            .iter()
            .map(|item| Aabb::from_point(item.centroid))
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();
        let (left_items, right_items) = match Self::sah_split(&items, &centroid_bounds) {
            Some((axis, split)) => {
                let (left, right): (Vec<_>, Vec<_>) = items
                    .into_iter()
                    .partition(|item| bucket_index(&centroid_bounds, item.centroid, axis) < split);
                if left.is_empty() || right.is_empty() {
                    let mut all = left;
                    all.extend(right);
                    Self::median_split(all, &centroid_bounds)
                } else {
                    (left, right)
                }
            }
            None => Self::median_split(items, &centroid_bounds),
        };

        let left = Self::build(left_items);
        let right = Self::build(right_items);
        let bbox = left.bounds().union(&right.bounds());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Find the cheapest (axis, split bucket) pair.
    ///
    /// Objects in buckets `< split` go left. Splits that leave a side empty
    /// are never chosen; `None` means no axis had a usable split.
    fn sah_split(items: &[BuildItem], centroid_bounds: &Aabb) -> Option<(usize, usize)> {
        let total_area = centroid_bounds.surface_area();
        let mut best: Option<(usize, usize)> = None;
        let mut min_cost = f64::INFINITY;

        for axis in 0..3 {
            let mut buckets = [Bucket::default(); BUCKET_COUNT];
            for item in items {
                buckets[bucket_index(centroid_bounds, item.centroid, axis)].add(&item.bbox);
            }

            for split in 1..BUCKET_COUNT {
                let left = buckets[..split]
                    .iter()
                    .fold(Bucket::default(), |acc, b| acc.merge(b));
                let right = buckets[split..]
                    .iter()
                    .fold(Bucket::default(), |acc, b| acc.merge(b));
                if left.count == 0 || right.count == 0 {
                    continue;
                }

                let mut cost = left.count as f64 * left.area() + right.count as f64 * right.area();
                if total_area > 0.0 {
                    cost /= total_area;
                }
                // NaN never compares less, so it never wins
                if cost < min_cost {
                    min_cost = cost;
                    best = Some((axis, split));
                }
            }
        }
        best
    }

    /// Sort by centroid along the widest centroid axis and split in half.
    fn median_split(mut items: Vec<BuildItem>, centroid_bounds: &Aabb) -> (Vec<BuildItem>, Vec<BuildItem>) {
        let axis = centroid_bounds.max_extent();
        items.sort_unstable_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let right = items.split_off(items.len() / 2);
        (items, right)
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Closest hit below this node. Overwrites `rec` only with closer hits.
    pub fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool {
        match self {
            BvhNode::Leaf { object, .. } => object.intersect(ray, rec),
            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.bounds().hit(ray) && left.intersect(ray, rec);
                // rec.distance now bounds the right subtree
                let hit_right = right.bounds().hit(ray) && right.intersect(ray, rec);
                hit_left || hit_right
            }
        }
    }

    fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_area_sum(&self) -> f64 {
        match self {
            BvhNode::Leaf { area, .. } => *area,
            BvhNode::Branch { left, right, .. } => left.leaf_area_sum() + right.leaf_area_sum(),
        }
    }
}

/// Immutable BVH over a set of objects. An empty BVH reports no hits.
pub struct Bvh {
    root: Option<BvhNode>,
    primitive_count: usize,
}

impl Bvh {
    /// Build a BVH over `objects`.
    pub fn new(objects: &[Arc<dyn Object>]) -> Self {
        let items: Vec<BuildItem> = objects
            .iter()
            .map(|object| {
                let bbox = object.bounds();
                BuildItem {
                    object: Arc::clone(object),
                    bbox,
                    centroid: bbox.centroid(),
                }
            })
            .collect();

        let primitive_count = items.len();
        let root = if items.is_empty() {
            None
        } else {
            Some(BvhNode::build(items))
        };

        let bvh = Self { root, primitive_count };
        log::debug!(
            "Built BVH: {} primitives, {} nodes, depth {}",
            bvh.primitive_count,
            bvh.node_count(),
            bvh.depth()
        );
        bvh
    }

    /// Closest hit along `ray`, written into `rec`.
    pub fn intersect<'a>(&'a self, ray: &Ray, rec: &mut Intersection<'a>) -> bool {
        match &self.root {
            Some(root) => root.bounds().hit(ray) && root.intersect(ray, rec),
            None => false,
        }
    }

    /// Bounds of everything in the tree; the default box when empty.
    pub fn bounds(&self) -> Aabb {
        self.root.as_ref().map(BvhNode::bounds).unwrap_or_default()
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::node_count)
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::depth)
    }

    /// Sum of the surface areas recorded in the leaves.
    pub fn leaf_area_sum(&self) -> f64 {
        self.root.as_ref().map_or(0.0, BvhNode::leaf_area_sum)
    }
}
