//! A renderable scene: geometry plus the materials it refers to.

use std::sync::Arc;

use ember_math::{Interval, Ray};

use crate::bvh::BvhNode;
use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::MaterialLibrary;

/// Hits closer than this are treated as self-intersections.
pub const SHADOW_EPSILON: f32 = 0.001;

/// Read-only world handed to the renderer.
pub struct Scene {
    world: Arc<dyn Hittable>,
    materials: MaterialLibrary,
}

impl Scene {
    pub fn new(world: Arc<dyn Hittable>, materials: MaterialLibrary) -> Self {
        Self { world, materials }
    }

    /// Wrap the objects of `list` in a BVH.
    pub fn with_bvh(list: &HittableList, materials: MaterialLibrary) -> Self {
        Self::new(Arc::new(BvhNode::from_list(list)), materials)
    }

    pub fn world(&self) -> &dyn Hittable {
        self.world.as_ref()
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    /// Closest hit in front of the ray origin.
    pub fn hit(&self, ray: &Ray) -> Option<HitRecord> {
        self.world.hit(ray, Interval::new(SHADOW_EPSILON, f32::INFINITY))
    }
}
