//! svg2png
//!
//! Rasterizes SVG markup into an opaque PNG bitmap. The image is rendered at a
//! fixed oversampling factor over its intrinsic size, flattened onto a solid
//! background and encoded as 8-bit RGBA PNG.
//!
//! # Example
//!
//! ```no_run
//! use svg2png::{RasterConfig, Rasterizer, SourceAsset};
//!
//! # async fn run() -> svg2png::Result<()> {
//! let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
//!     <rect width="100" height="100" fill="red"/>
//! </svg>"#;
//!
//! let rasterizer = Rasterizer::new(RasterConfig::default())?;
//! let result = rasterizer
//!     .rasterize(SourceAsset::new(svg.to_vec(), "image/svg+xml"))
//!     .await?;
//! assert_eq!((result.width, result.height), (200, 200));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod rasterizer;
pub use rasterizer::{rasterize, Rasterizer};

pub mod rendering;
pub use rendering::RasterResult;

pub mod shell;

pub mod source;
pub use source::SourceAsset;

/// Oversampling factor applied to the intrinsic size of the image.
pub const DEFAULT_SCALE: u32 = 2;

/// Opaque fill painted under the image before compositing.
pub const DEFAULT_BACKGROUND: Rgba = Rgba::WHITE;

/// Largest accepted surface side, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 32_767;

/// Largest accepted surface area, in pixels.
pub const DEFAULT_MAX_PIXELS: u64 = 268_435_456;

/// Configuration for a [`Rasterizer`]
///
/// The defaults reproduce the stock conversion: 2x oversampling onto an opaque
/// white background, a five second decode deadline and the system fonts for
/// `<text>` elements.
///
/// # Examples
///
/// ```
/// let cfg = svg2png::RasterConfig::default();
/// assert_eq!(cfg.scale, 2);
/// assert_eq!(cfg.background, svg2png::Rgba::WHITE);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Integer multiplier applied to the intrinsic width and height
    pub scale: u32,
    /// Opaque fill painted over the whole surface before the image is drawn
    pub background: Rgba,
    /// Deadline for the decode step in milliseconds
    pub decode_timeout_ms: u64,
    /// Maximum width or height of the drawing surface
    pub max_dimension: u32,
    /// Maximum number of pixels of the drawing surface
    pub max_pixels: u64,
    /// Reject input whose leading bytes do not look like SVG before decoding
    pub sniff_markup: bool,
    /// Load the system fonts so `<text>` elements render
    pub load_system_fonts: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            background: DEFAULT_BACKGROUND,
            decode_timeout_ms: 5000,
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_pixels: DEFAULT_MAX_PIXELS,
            sniff_markup: false,
            load_system_fonts: true,
        }
    }
}

impl RasterConfig {
    /// Check that every limit is usable.
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(Error::ConfigError("scale must be at least 1".into()));
        }
        if self.decode_timeout_ms == 0 {
            return Err(Error::ConfigError("decode_timeout_ms must be positive".into()));
        }
        if !self.background.is_opaque() {
            return Err(Error::ConfigError(format!(
                "background {} must be opaque",
                self.background
            )));
        }
        if self.max_dimension == 0 || self.max_pixels == 0 {
            return Err(Error::ConfigError("surface limits must be positive".into()));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let cfg: RasterConfig = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// A straight-alpha 8-bit color, written as `#rgb`, `#rrggbb` or `#rrggbbaa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::ConfigError(format!("invalid color '{}'", s));
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in hex.chars().enumerate() {
                    let v = channel(&ch.to_string())?;
                    c[i] = v * 17;
                }
                Ok(Rgba::opaque(c[0], c[1], c[2]))
            }
            6 | 8 => {
                let r = channel(&hex[0..2])?;
                let g = channel(&hex[2..4])?;
                let b = channel(&hex[4..6])?;
                let a = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
                Ok(Rgba { r, g, b, a })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}
