//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::material::MaterialId;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: MaterialId,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the ray hit the outward-facing side of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Record for a hit at `t`, with the normal oriented against `ray`.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        material: MaterialId,
        u: f32,
        v: f32,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Orient the stored normal against the ray and remember which side was hit.
    ///
    /// `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Axis-aligned bounding box, fixed at construction.
    fn bounding_box(&self) -> Aabb;
}

/// Unordered collection of hittables, scanned linearly.
#[derive(Clone)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Hittable + 'static) {
        self.add_shared(Arc::new(object));
    }

    /// Add an object that is already shared elsewhere.
    pub fn add_shared(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

/// Closest hit over a slice, shrinking the window after every hit.
pub(crate) fn closest_hit(
    objects: &[Arc<dyn Hittable>],
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord> {
    let mut closest: Option<HitRecord> = None;

    for object in objects {
        let window = ray_t.with_max(closest.map_or(ray_t.max, |rec| rec.t));
        if let Some(rec) = object.hit(ray, window) {
            closest = Some(rec);
        }
    }

    closest
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        closest_hit(&self.objects, ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
