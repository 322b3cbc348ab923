//! Albedo textures for Lambertian surfaces.

use std::path::Path;
use std::sync::Arc;

use crate::error::{TextureError, TextureResult};
use crate::Color;
use rtw_math::Vec3;

/// A color lookup over surface coordinates.
pub trait Texture: Send + Sync {
    /// Sample at surface UV `(u, v)` and world position `p`.
    fn sample(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Constant color everywhere.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn sample(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern driven by the world position of the hit.
///
/// The sign of `sin(kx) * sin(ky) * sin(kz)` picks between the two textures.
pub struct Checker {
    odd: Arc<dyn Texture>,
    even: Arc<dyn Texture>,
}

impl Checker {
    /// `k` above.
    pub const FREQUENCY: f32 = 10.0;

    pub fn new(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> Self {
        Self { odd, even }
    }

    /// Checker between two solid colors.
    pub fn from_colors(odd: Color, even: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(odd)), Arc::new(SolidColor::new(even)))
    }
}

impl Texture for Checker {
    fn sample(&self, u: f32, v: f32, p: Vec3) -> Color {
        let k = Self::FREQUENCY;
        let sines = (k * p.x).sin() * (k * p.y).sin() * (k * p.z).sin();
        if sines < 0.0 {
            self.odd.sample(u, v, p)
        } else {
            self.even.sample(u, v, p)
        }
    }
}

/// Bitmap texture stored as linear RGB, sampled bilinearly with wrapping UVs.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Create a texture from linear pixels in row-major order, top row first.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Load an 8-bit image file and convert it to linear color.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels = rgb
            .pixels()
            .map(|p| Color::new(srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])))
            .collect();

        let texture = Self::from_pixels(width, height, pixels)?;
        log::debug!("loaded texture {} ({}x{})", path.display(), width, height);
        Ok(texture)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }
}

impl Texture for ImageTexture {
    /// UV (0, 0) is the bottom-left corner of the image.
    fn sample(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0);

        let x0 = (x.floor() as u32).min(self.width - 1);
        let y0 = (y.floor() as u32).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x.fract();
        let fy = y.fract();

        let top = self.get_pixel(x0, y0).lerp(self.get_pixel(x1, y0), fx);
        let bottom = self.get_pixel(x0, y1).lerp(self.get_pixel(x1, y1), fx);
        top.lerp(bottom, fy)
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
