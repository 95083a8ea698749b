//! Transformed instances of another hittable.
//!
//! Rays are moved into the child's local space, intersected there, and the
//! resulting point and normal moved back. Directions are never renormalized
//! so the hit parameter `t` means the same thing in both spaces.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};

/// Child offset by a fixed vector.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&offset_ray, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Child rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    to_world: Mat4,
    to_local: Mat4,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate by `angle` degrees, counter-clockwise looking down -Y.
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let to_world = Mat4::from_rotation_y(angle.to_radians());
        let to_local = to_world.inverse();
        let bbox = to_world.transform_aabb(&object.bounding_box());

        Self {
            object,
            to_world,
            to_local,
            bbox,
        }
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let local_ray = Ray::new(
            self.to_local.transform_point3(ray.origin()),
            self.to_local.transform_vector3(ray.direction()),
            ray.time(),
        );

        // The local record's front_face stays valid: rotation preserves the
        // sign of direction·normal.
        let mut rec = self.object.hit(&local_ray, ray_t)?;
        rec.p = self.to_world.transform_point3(rec.p);
        rec.normal = self.to_world.transform_vector3(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
