//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree of bounding boxes over shared hittables. Built once by median
//! split along the longest axis of each span, immutable afterwards.

use std::cmp::Ordering;
use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray};

use crate::hittable::{closest_hit, HitRecord, Hittable, HittableList};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 2;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with at most [`LEAF_MAX_SIZE`] primitives.
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
    /// No primitives; never hit.
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let count = objects.len();
        let root = Self::build(objects);
        log::debug!(
            "Built BVH: {} primitives, {} nodes, depth {}",
            count,
            root.node_count(),
            root.depth()
        );
        root
    }

    /// Build over the members of an existing list. The list keeps its objects.
    pub fn from_list(list: &HittableList) -> Self {
        Self::new(list.objects().to_vec())
    }

    /// Recursive construction: sort the span by bounding-box minimum on its
    /// longest axis and split at the median.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if objects.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf { objects, bbox };
        }

        let axis = bbox.longest_axis();
        objects.sort_unstable_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

        let mid = objects.len() / 2;
        let right_objects = objects.split_off(mid);

        BvhNode::Branch {
            left: Box::new(Self::build(objects)),
            right: Box::new(Self::build(right_objects)),
            bbox,
        }
    }

    /// Total number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                closest_hit(objects, ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, ray_t.with_max(right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MaterialLibrary, Quad, Sphere};
    use ember_math::{Color, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn window() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert!(bvh.hit(&Ray::default(), Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_bvh_single_sphere() {
        let mat = MaterialLibrary::new().lambertian(Color::splat(0.5));
        let bvh = BvhNode::new(vec![Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, mat))]);

        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        assert!(bvh.hit(&ray, window()).is_some());
    }

    #[test]
    fn test_bvh_leaves_hold_at_most_two() {
        fn check(node: &BvhNode) {
            match node {
                BvhNode::Leaf { objects, .. } => assert!(!objects.is_empty() && objects.len() <= 2),
                BvhNode::Branch { left, right, .. } => {
                    check(left);
                    check(right);
                }
                BvhNode::Empty => panic!("empty node inside a non-empty tree"),
            }
        }

        let mat = MaterialLibrary::new().lambertian(Color::ONE);
        let spheres: Vec<Arc<dyn Hittable>> = (0..37)
            .map(|i| {
                Arc::new(Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.4, mat)) as Arc<dyn Hittable>
            })
            .collect();
        let bvh = BvhNode::new(spheres);

        check(&bvh);
        assert!(bvh.depth() <= 7);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let mat = MaterialLibrary::new().lambertian(Color::splat(0.5));
        let mut list = HittableList::new();
        for i in 0..10 {
            list.add(Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, mat));
        }
        let bvh = BvhNode::from_list(&list);
        assert_eq!(list.len(), 10);

        let ray = Ray::new_simple(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        let rec = bvh.hit(&ray, window()).unwrap();

        assert!((rec.p.z - (-4.5)).abs() < 0.01);
        assert_eq!(bvh.bounding_box(), list.bounding_box());
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut lib = MaterialLibrary::new();
        let materials: Vec<_> = (0..8)
            .map(|i| lib.lambertian(Color::splat(i as f32 / 8.0)))
            .collect();
        let mut rng = StdRng::seed_from_u64(2024);

        let mut list = HittableList::new();
        for i in 0..120 {
            let mat = materials[i % materials.len()];
            let center = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            if i % 3 == 0 {
                list.add(Quad::new(
                    center,
                    Vec3::new(rng.gen_range(0.2..2.0), 0.0, rng.gen_range(-1.0..1.0)),
                    Vec3::new(0.0, rng.gen_range(0.2..2.0), rng.gen_range(-1.0..1.0)),
                    mat,
                ));
            } else {
                list.add(Sphere::new(center, rng.gen_range(0.1..1.5), mat));
            }
        }
        let bvh = BvhNode::from_list(&list);

        let mut hits = 0;
        for _ in 0..3000 {
            let origin = Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            );
            let target = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let ray = Ray::new(origin, target - origin, rng.gen());

            let linear = list.hit(&ray, window());
            let accelerated = bvh.hit(&ray, window());

            match (linear, accelerated) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    hits += 1;
                    assert_eq!(a.t, b.t);
                    assert_eq!(a.normal, b.normal);
                    assert_eq!(a.material, b.material);
                    assert_eq!(a.front_face, b.front_face);
                }
                (a, b) => panic!("linear {:?} vs bvh {:?}", a.map(|r| r.t), b.map(|r| r.t)),
            }
        }
        assert!(hits > 100, "too few hits to be meaningful: {hits}");
    }
}
