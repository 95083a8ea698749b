//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation bounded by `max_depth`
//! - Stratified multi-sampling per pixel
//! - Bucketed parallel rendering over rayon

use std::time::Instant;

use ember_math::{Color, Ray};
use indicatif::{ProgressBar, ProgressStyle};
use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
use crate::camera::Camera;
use crate::output::ImageBuffer;
use crate::scene::Scene;

/// Radiance returned by rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Constant color in every direction.
    Solid(Color),
    /// Vertical blend: `bottom` looking straight down, `top` straight up.
    Gradient { bottom: Color, top: Color },
}

impl Background {
    /// White-to-blue daylight gradient.
    pub fn sky() -> Self {
        Background::Gradient {
            bottom: Color::ONE,
            top: Color::new(0.5, 0.7, 1.0),
        }
    }

    pub fn value(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Gradient { bottom, top } => {
                let unit_direction = ray.direction().normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                *bottom * (1.0 - a) + *top * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Compute the radiance carried back along `ray`.
///
/// Each level adds the hit material's emission to the attenuated radiance of
/// the scattered ray. Recursion stops at `depth == 0`, on a miss, or when the
/// material absorbs the ray.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.hit(ray) else {
        return background.value(ray);
    };

    let library = scene.materials();
    let material = library.get(rec.material);
    let emission = material.emitted(library, &rec);

    match material.scatter(library, ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, scene, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Average of `samples_per_pixel` radiance estimates through pixel (x, y).
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for sample in 0..camera.samples_per_pixel.max(1) {
        let ray = camera.get_ray(x, y, sample, rng);
        pixel_color += ray_color(&ray, scene, camera.max_depth, &camera.background, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Render the scene in parallel, one bucket per task.
///
/// The camera must already be initialized. Each bucket draws from its own
/// random stream seeded from `camera.seed`, so the image is the same for any
/// thread count.
pub fn render(camera: &Camera, scene: &Scene) -> ImageBuffer {
    let buckets = generate_buckets(camera.image_width, camera.image_height(), camera.bucket_size);
    let progress = bucket_progress_bar(buckets.len() as u64);
    let image = render_buckets(camera, scene, &buckets, &progress);
    progress.finish();
    image
}

/// Bar counting finished buckets.
fn bucket_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{bar:40} {pos}/{len} buckets ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

fn render_buckets(
    camera: &Camera,
    scene: &Scene,
    buckets: &[Bucket],
    progress: &ProgressBar,
) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height();
    let total = buckets.len();

    log::info!(
        "Rendering {}x{} at {} spp, max depth {} ({} buckets, {} threads)",
        width,
        height,
        camera.samples_per_pixel,
        camera.max_depth,
        total,
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = bucket.rng(camera.seed);
            let pixels = render_bucket(bucket, camera, scene, &mut rng);
            progress.inc(1);
            log::debug!("Bucket {} done ({}/{})", bucket.index, progress.position(), total);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

/// Single-threaded scanline render drawing from one caller-owned stream.
pub fn render_sequential(camera: &Camera, scene: &Scene, rng: &mut dyn RngCore) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height());

    for y in 0..image.height {
        for x in 0..image.width {
            let color = render_pixel(camera, scene, x, y, rng);
            image.set(x, y, color);
        }
    }

    image
}
