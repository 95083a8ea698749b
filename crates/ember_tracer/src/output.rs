//! Render output: linear color buffer, tone mapping and PNG encoding.

use std::path::Path;

use ember_math::{Color, Interval};
use thiserror::Error;

use crate::bucket::BucketResult;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Cannot encode an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
}

/// Display transform applied before 8-bit quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMap {
    /// Clamp and quantize linear values directly.
    #[default]
    Linear,
    /// Gamma 2.0 (square root) before quantizing.
    Gamma2,
}

impl ToneMap {
    #[inline]
    pub fn apply(self, linear: f32) -> f32 {
        match self {
            ToneMap::Linear => linear,
            ToneMap::Gamma2 => {
                if linear > 0.0 {
                    linear.sqrt()
                } else {
                    0.0
                }
            }
        }
    }
}

/// Map one channel to a byte: clamp to [0, 1], then floor(255.999 * v).
/// NaN maps to 0.
#[inline]
pub fn channel_to_byte(value: f32, tone_map: ToneMap) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (255.999 * Interval::UNIT.clamp(tone_map.apply(value))) as u8
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color, tone_map: ToneMap) -> [u8; 3] {
    [
        channel_to_byte(color.x, tone_map),
        channel_to_byte(color.y, tone_map),
        channel_to_byte(color.z, tone_map),
    ]
}

/// Row-major buffer of linear pixel colors.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Copy a finished bucket into place. Buckets never overlap.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (local_y, row) in result.pixels.chunks_exact(bucket.width as usize).enumerate() {
            let start = self.index(bucket.x, bucket.y + local_y as u32);
            self.pixels[start..start + row.len()].copy_from_slice(row);
        }
    }

    /// Tightly packed RGB bytes, stride `width * 3`.
    pub fn to_rgb8(&self, tone_map: ToneMap) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&color| color_to_rgb(color, tone_map))
            .collect()
    }
}

/// Encode the image as an 8-bit RGB PNG at `path`.
pub fn write_png(
    path: impl AsRef<Path>,
    image: &ImageBuffer,
    tone_map: ToneMap,
) -> Result<(), OutputError> {
    if image.width == 0 || image.height == 0 {
        return Err(OutputError::EmptyImage {
            width: image.width,
            height: image.height,
        });
    }

    let path = path.as_ref();
    let bytes = image.to_rgb8(tone_map);
    image::save_buffer(path, &bytes, image.width, image.height, image::ColorType::Rgb8)?;

    log::info!("Wrote {}x{} PNG to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::Bucket;

    #[test]
    fn test_channel_quantization() {
        assert_eq!(channel_to_byte(0.0, ToneMap::Linear), 0);
        assert_eq!(channel_to_byte(1.0, ToneMap::Linear), 255);
        assert_eq!(channel_to_byte(0.5, ToneMap::Linear), 127);
        assert_eq!(channel_to_byte(7.0, ToneMap::Linear), 255);
        assert_eq!(channel_to_byte(-1.0, ToneMap::Linear), 0);
        assert_eq!(channel_to_byte(f32::NAN, ToneMap::Gamma2), 0);
    }

    #[test]
    fn test_gamma2() {
        assert_eq!(ToneMap::Gamma2.apply(0.0), 0.0);
        assert!((ToneMap::Gamma2.apply(0.25) - 0.5).abs() < 1e-6);
        assert_eq!(channel_to_byte(0.25, ToneMap::Gamma2), 127);
        assert_eq!(channel_to_byte(0.25, ToneMap::Linear), 63);
    }

    #[test]
    fn test_to_rgb8_layout() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(1, 0, Color::new(1.0, 0.0, 0.0));
        image.set(0, 1, Color::new(0.0, 0.0, 1.0));

        let bytes = image.to_rgb8(ToneMap::Linear);
        assert_eq!(bytes.len(), 2 * 2 * 3);
        assert_eq!(&bytes[3..6], &[255, 0, 0]);
        assert_eq!(&bytes[6..9], &[0, 0, 255]);
    }

    #[test]
    fn test_write_bucket_places_rows() {
        let mut image = ImageBuffer::new(4, 3);
        let bucket = Bucket::new(1, 1, 2, 2, 0);
        let pixels = vec![
            Color::splat(1.0),
            Color::splat(2.0),
            Color::splat(3.0),
            Color::splat(4.0),
        ];
        image.write_bucket(&BucketResult::new(bucket, pixels));

        assert_eq!(image.get(1, 1), Color::splat(1.0));
        assert_eq!(image.get(2, 1), Color::splat(2.0));
        assert_eq!(image.get(1, 2), Color::splat(3.0));
        assert_eq!(image.get(2, 2), Color::splat(4.0));
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.get(3, 2), Color::ZERO);
    }

    #[test]
    fn test_write_png_round_trip() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::new(0.0, 1.0, 0.0));

        let path =
            std::env::temp_dir().join(format!("ember_output_test_{}.png", std::process::id()));
        write_png(&path, &image, ToneMap::Linear).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [0, 255, 0]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_write_png_rejects_empty() {
        let image = ImageBuffer::new(0, 5);
        let err = write_png(std::env::temp_dir().join("ember_empty.png"), &image, ToneMap::Linear);
        assert!(matches!(err, Err(OutputError::EmptyImage { width: 0, height: 5 })));
    }
}
