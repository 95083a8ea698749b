//! Color fields evaluated at a surface point.
//!
//! Textures are pure functions of `(u, v, p)`. Image textures store decoded
//! pixels as linear RGBA floats.

use std::path::Path;

use ember_math::{Color, Interval, Vec3};
use thiserror::Error;

/// Errors that can occur while building an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported channel count: {0} (expected 1-4)")]
    UnsupportedChannels(u32),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Handle to a texture stored in a [`MaterialLibrary`](crate::MaterialLibrary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) u32);

/// Texture variants.
#[derive(Debug, Clone)]
pub enum Texture {
    SolidColor(Color),
    /// 3D checker pattern in world space.
    Checker {
        inv_scale: f32,
        even: Color,
        odd: Color,
    },
    Image(TextureImage),
}

impl Texture {
    /// Checker with cells `scale` units wide.
    pub fn checker(scale: f32, even: Color, odd: Color) -> Self {
        Texture::Checker {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Color at texture coordinates (u, v) and surface point p.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::SolidColor(color) => *color,
            Texture::Checker {
                inv_scale,
                even,
                odd,
            } => {
                let cell = (*inv_scale * p).floor();
                let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);
                if parity == 0 {
                    *even
                } else {
                    *odd
                }
            }
            Texture::Image(image) => {
                let [r, g, b, _] = image.sample(u, v);
                Color::new(r, g, b)
            }
        }
    }

    /// Opacity at (u, v). Only image textures carry alpha; the rest are opaque.
    pub fn alpha(&self, u: f32, v: f32) -> f32 {
        match self {
            Texture::Image(image) => image.sample(u, v)[3],
            _ => 1.0,
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::SolidColor(color)
    }
}

/// Returned for images without pixels so the mistake is visible in renders.
const MISSING_PIXEL: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

/// Decoded bitmap backing an image texture.
#[derive(Clone, Debug)]
pub struct TextureImage {
    width: u32,
    height: u32,
    /// Linear RGBA, row-major, top row first.
    pixels: Vec<[f32; 4]>,
}

impl TextureImage {
    /// Load and decode an image file.
    pub fn from_file(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        let image = Self::from_raw(width, height, 4, rgba.as_raw())?;
        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            image.size_bytes() as f32 / 1024.0
        );
        Ok(image)
    }

    /// Build from already-decoded 8-bit pixel data.
    ///
    /// `channels` is 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA). Color
    /// channels are treated as sRGB and converted to linear; alpha is linear.
    pub fn from_raw(width: u32, height: u32, channels: u32, bytes: &[u8]) -> TextureResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(TextureError::UnsupportedChannels(channels));
        }

        let expected = width as usize * height as usize * channels as usize;
        if bytes.len() != expected {
            return Err(TextureError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }

        let pixels: Vec<[f32; 4]> = bytes
            .chunks_exact(channels as usize)
            .map(|px| match *px {
                [l] => {
                    let l = srgb_to_linear(l);
                    [l, l, l, 1.0]
                }
                [l, a] => {
                    let l = srgb_to_linear(l);
                    [l, l, l, a as f32 / 255.0]
                }
                [r, g, b] => [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), 1.0],
                [r, g, b, a] => [
                    srgb_to_linear(r),
                    srgb_to_linear(g),
                    srgb_to_linear(b),
                    a as f32 / 255.0,
                ],
                _ => MISSING_PIXEL,
            })
            .collect();

        if pixels.is_empty() {
            log::warn!("Texture image has no pixels; sampling will return cyan");
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Nearest-pixel lookup. Coordinates are clamped to [0, 1] and v is
    /// flipped so v = 1 is the top row.
    pub fn sample(&self, u: f32, v: f32) -> [f32; 4] {
        if self.pixels.is_empty() {
            return MISSING_PIXEL;
        }

        let u = Interval::UNIT.clamp(u);
        let v = 1.0 - Interval::UNIT.clamp(v);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        self.pixels[(j * self.width + i) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
