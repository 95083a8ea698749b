//! Sphere primitive, optionally moving for motion blur.

use std::f32::consts::PI;

use ember_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::MaterialId;

/// A sphere whose center moves linearly from `center.at(0)` to `center.at(1)`
/// over the shutter interval. Static spheres have a zero motion vector.
pub struct Sphere {
    center: Ray,
    radius: f32,
    material: MaterialId,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        Self {
            center: Ray::new_simple(center, Vec3::ZERO),
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    /// Create a sphere moving from `center0` (time 0) to `center1` (time 1).
    pub fn moving(center0: Vec3, center1: Vec3, radius: f32, material: MaterialId) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: Ray::new_simple(center0, center1 - center0),
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// UV coordinates for a point on the unit sphere centered at the origin.
    ///
    /// u: angle around the Y axis from X = -1, v: angle from Y = -1 to Y = +1.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - current_center) / self.radius;
        let (u, v) = Self::get_sphere_uv(outward_normal);

        Some(HitRecord::new(ray, root, outward_normal, self.material, u, v))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MaterialLibrary;
    use ember_math::Color;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn material() -> MaterialId {
        MaterialLibrary::new().lambertian(Color::splat(0.5))
    }

    fn window() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, material());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        let rec = sphere.hit(&ray, window()).unwrap();
        assert!((rec.t - 0.5).abs() < 0.001);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, material());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);

        assert!(sphere.hit(&ray, window()).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, material());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.5));

        let rec = sphere.hit(&ray, window()).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!(!rec.front_face);
        // Stored normal faces the ray, i.e. inward
        assert!(rec.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_sphere_respects_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, material());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        assert!(sphere.hit(&ray, Interval::new(0.001, 3.9)).is_none());
        // Near root excluded, far root still valid
        let rec = sphere.hit(&ray, Interval::new(4.5, 10.0)).unwrap();
        assert!((rec.t - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_random_rays_match_analytic_roots() {
        let center = Vec3::new(0.3, -0.2, -3.0);
        let radius = 1.1;
        let sphere = Sphere::new(center, radius, material());
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..2000 {
            let origin = Vec3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0), 2.0);
            let target = Vec3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0), -3.0);
            let ray = Ray::new_simple(origin, (target - origin) * rng.gen_range(0.5..3.0));

            // Distance from center to the ray's line decides whether it can hit.
            let d = ray.direction().normalize();
            let to_center = center - origin;
            let closest = to_center - to_center.dot(d) * d;
            let hits_line = closest.length() < radius;

            match sphere.hit(&ray, window()) {
                Some(rec) => {
                    assert!(hits_line || (closest.length() - radius).abs() < 1e-3);
                    assert!(window().contains(rec.t));
                    assert!(((rec.p - center).length() - radius).abs() < 1e-3);
                    assert!((rec.normal.length() - 1.0).abs() < 1e-4);
                    // Outward normal recovered from the front-face flag
                    let outward = if rec.front_face { rec.normal } else { -rec.normal };
                    assert!(outward.dot(rec.p - center) > 0.0);
                }
                None => assert!(!hits_line || (closest.length() - radius).abs() < 1e-3),
            }
        }
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::moving(
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(4.0, 0.0, -2.0),
            0.5,
            material(),
        );

        let at_start = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);
        let at_end = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 1.0);
        let shifted_end = Ray::new(Vec3::new(4.0, 0.0, 0.0), Vec3::NEG_Z, 1.0);

        assert!(sphere.hit(&at_start, window()).is_some());
        assert!(sphere.hit(&at_end, window()).is_none());
        assert!(sphere.hit(&shifted_end, window()).is_some());

        let bbox = sphere.bounding_box();
        assert_eq!(bbox.x, Interval::new(-0.5, 4.5));
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = Sphere::get_sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5 && (v - 0.5).abs() < 1e-5);

        let (_, v_top) = Sphere::get_sphere_uv(Vec3::Y);
        assert!((v_top - 1.0).abs() < 1e-5);

        let (u_neg_z, _) = Sphere::get_sphere_uv(Vec3::NEG_Z);
        assert!((u_neg_z - 0.75).abs() < 1e-5);
    }
}
