//! Linear output buffer and the conversions a writer needs.
//!
//! The renderer stores raw linear radiance, NaNs included. Call
//! [`ImageBuffer::to_rgba8`] (or [`color_to_rgba`] per pixel) to sanitize and
//! gamma correct for display.

use crate::Color;

/// Image buffer for storing rendered pixels.
///
/// Row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new black image buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Set a pixel color.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Get a pixel color.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn row(&self, y: u32) -> &[Color] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [Color] {
        let start = self.index(0, y);
        let width = self.width as usize;
        &mut self.pixels[start..start + width]
    }

    /// Flat `[r, g, b, r, g, b, ...]` view of the linear pixels.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Sanitized, gamma corrected 8-bit image.
    pub fn to_rgba8(&self) -> image::RgbaImage {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(color));
        }
        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }
}

/// Replace NaN components with 0.
#[inline]
pub fn sanitize(color: Color) -> Color {
    Color::new(
        if color.x.is_nan() { 0.0 } else { color.x },
        if color.y.is_nan() { 0.0 } else { color.y },
        if color.z.is_nan() { 0.0 } else { color.z },
    )
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = sanitize(color);
    let to_byte = |v: f32| (255.0 * linear_to_gamma(v).clamp(0.0, 1.0)) as u8;
    [to_byte(c.x), to_byte(c.y), to_byte(c.z), 255]
}
