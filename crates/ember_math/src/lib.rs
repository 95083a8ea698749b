//! Ember math types.
//!
//! Thin layer over `glam` with the handful of types the path tracer needs:
//! rays, scalar intervals and axis-aligned bounding boxes.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Linear RGB color. Components are unbounded until tone mapping.
pub type Color = Vec3;
