//! Off-screen drawing surface

use resvg::tiny_skia::{Color, Pixmap, Transform};

use crate::rendering::decode::DecodedImage;
use crate::{Error, RasterConfig, Result, Rgba};

/// Upper bounds on surface allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLimits {
    pub max_dimension: u32,
    pub max_pixels: u64,
}

impl From<&RasterConfig> for SurfaceLimits {
    fn from(cfg: &RasterConfig) -> Self {
        Self {
            max_dimension: cfg.max_dimension,
            max_pixels: cfg.max_pixels,
        }
    }
}

/// Surface size for an image of `width`x`height` oversampled by `scale`.
pub fn scaled_size(width: u32, height: u32, scale: u32) -> Result<(u32, u32)> {
    let overflow = || Error::SurfaceError(format!("{}x{} scaled by {} overflows", width, height, scale));
    let w = width.checked_mul(scale).ok_or_else(overflow)?;
    let h = height.checked_mul(scale).ok_or_else(overflow)?;
    Ok((w, h))
}

/// A premultiplied RGBA pixel buffer owned by a single conversion.
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Allocate a transparent surface, refusing sizes beyond `limits`.
    pub fn allocate(width: u32, height: u32, limits: SurfaceLimits) -> Result<Self> {
        if width > limits.max_dimension || height > limits.max_dimension {
            return Err(Error::SurfaceError(format!(
                "{}x{} exceeds the maximum side of {}",
                width, height, limits.max_dimension
            )));
        }
        let area = width as u64 * height as u64;
        if area > limits.max_pixels {
            return Err(Error::SurfaceError(format!(
                "{}x{} exceeds the maximum area of {} pixels",
                width, height, limits.max_pixels
            )));
        }
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::SurfaceError(format!("cannot allocate {}x{}", width, height)))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Paint every pixel with `color`, replacing what was there.
    pub fn fill(&mut self, color: Rgba) {
        self.pixmap.fill(Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    /// Draw `image` source-over, stretched to cover the whole surface.
    pub fn composite(&mut self, image: &DecodedImage) {
        let natural = image.natural_size();
        let sx = self.width() as f32 / natural.width();
        let sy = self.height() as f32 / natural.height();
        resvg::render(image.tree(), Transform::from_scale(sx, sy), &mut self.pixmap.as_mut());
    }

    /// Straight-alpha color at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        // Pixmap::pixel only checks the flat index, so x must be checked here
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba {
            r: c.red(),
            g: c.green(),
            b: c.blue(),
            a: c.alpha(),
        })
    }

    /// All pixels as straight-alpha RGBA bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }
}
