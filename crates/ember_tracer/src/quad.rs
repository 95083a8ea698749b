//! Planar parallelogram primitive and the six-sided box built from it.

use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::MaterialId;

/// Rays closer to parallel than this are treated as missing the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Parallelogram spanned by `u` and `v` from corner `q`.
///
/// The outward normal follows `u × v`; texture coordinates are the affine
/// coordinates of the hit point in the (u, v) basis.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    normal: Vec3,
    d: f32,
    material: MaterialId,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: MaterialId) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
        }
    }

    /// Whether planar coordinates (alpha, beta) fall inside the unit square.
    fn is_interior(alpha: f32, beta: f32) -> bool {
        Interval::UNIT.contains(alpha) && Interval::UNIT.contains(beta)
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let denom = self.normal.dot(ray.direction());

        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let planar_hitpt_vector = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hitpt_vector.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt_vector));

        if !Self::is_interior(alpha, beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, self.material, alpha, beta))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Closed box with opposite corners `a` and `b`, as six outward-facing quads.
pub fn make_box(a: Vec3, b: Vec3, material: MaterialId) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    sides.add(Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material)); // front
    sides.add(Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material)); // right
    sides.add(Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material)); // back
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material)); // left
    sides.add(Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material)); // top
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material)); // bottom

    sides
}
