// Bounding-box transforms for instanced geometry.
//
// glam::Mat4 already provides transform_point3, transform_vector3 and inverse.

use crate::Aabb;
use glam::Mat4;

/// Extension trait for Mat4.
pub trait Mat4Ext {
    /// Bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners().map(|corner| self.transform_point3(corner));

        let (min, max) = corners[1..]
            .iter()
            .fold((corners[0], corners[0]), |(lo, hi), &c| (lo.min(c), hi.max(c)));

        Aabb::from_points(min, max)
    }
}
