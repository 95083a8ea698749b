//! Ember path tracer core.
//!
//! A Monte Carlo path tracer for offline rendering: spheres, quads and
//! instanced transforms under a BVH, a material arena shared by all
//! geometry, and a bucketed renderer that fans out over rayon.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod instance;
mod material;
mod output;
mod quad;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use camera::{Camera, DEFAULT_BUCKET_SIZE};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{RotateY, Translate};
pub use material::{
    Material, MaterialId, MaterialLibrary, MixWeight, ScatterResult, DEPTH_FAR, DEPTH_NEAR,
};
pub use output::{color_to_rgb, write_png, ImageBuffer, OutputError, ToneMap};
pub use quad::{make_box, Quad};
pub use renderer::{ray_color, render, render_pixel, render_sequential, Background};
pub use scene::{Scene, SHADOW_EPSILON};
pub use sphere::Sphere;
pub use texture::{Texture, TextureError, TextureId, TextureImage, TextureResult};

/// Re-export the math types from ember_math
pub use ember_math::{Aabb, Color, Interval, Ray, Vec3};
