//! The conversion routine: decode, allocate, flatten, composite, encode.

use std::sync::Arc;
use std::time::Duration;

use resvg::usvg::fontdb;

use crate::rendering::decode::{self, DecodedImage};
use crate::rendering::encode::encode_png;
use crate::rendering::surface::{scaled_size, Surface, SurfaceLimits};
use crate::source::{looks_like_svg, SourceAsset};
use crate::{Error, RasterConfig, RasterResult, Result};

/// Converts SVG sources into PNG payloads.
///
/// A `Rasterizer` holds only its configuration and an immutable font
/// database, so one instance may serve any number of concurrent calls; every
/// call decodes into and draws onto buffers of its own.
#[derive(Clone)]
pub struct Rasterizer {
    config: RasterConfig,
    fontdb: Arc<fontdb::Database>,
}

impl Rasterizer {
    /// Validate `config` and load the fonts it asks for.
    pub fn new(config: RasterConfig) -> Result<Self> {
        config.validate()?;
        let mut fontdb = fontdb::Database::new();
        if config.load_system_fonts {
            fontdb.load_system_fonts();
        }
        Ok(Self {
            config,
            fontdb: Arc::new(fontdb),
        })
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Rasterize `source` into a PNG.
    ///
    /// The declared media type is not checked here; see
    /// [`SourceAsset::from_upload`] for the caller-side guard. Fails with
    /// [`Error::DecodeError`] when the bytes do not decode (or decoding misses
    /// the deadline) and with [`Error::SurfaceError`] when the surface cannot
    /// be allocated.
    pub async fn rasterize(&self, source: SourceAsset) -> Result<RasterResult> {
        if self.config.sniff_markup && !looks_like_svg(&source.bytes) {
            return Err(Error::DecodeError("content does not look like SVG markup".into()));
        }

        let timeout = Duration::from_millis(self.config.decode_timeout_ms);
        let image = decode::decode_with_deadline(source.bytes, self.fontdb.clone(), timeout).await?;

        render(&image, &self.config)
    }
}

/// Draw an already decoded image and encode the result. Runs to completion
/// without yielding.
pub fn render(image: &DecodedImage, config: &RasterConfig) -> Result<RasterResult> {
    let (width, height) = scaled_size(image.width, image.height, config.scale)?;
    let mut surface = Surface::allocate(width, height, SurfaceLimits::from(config))?;

    surface.fill(config.background);
    surface.composite(image);

    let payload = encode_png(width, height, &surface.to_rgba())?;
    Ok(RasterResult {
        width,
        height,
        payload,
    })
}

/// Rasterize with the default configuration.
///
/// Each call builds a fresh [`Rasterizer`] and so rescans the system fonts.
/// Callers converting more than one image should create a `Rasterizer` once
/// and reuse it.
pub async fn rasterize(bytes: impl Into<Vec<u8>>, media_type: &str) -> Result<RasterResult> {
    let rasterizer = Rasterizer::new(RasterConfig::default())?;
    rasterizer.rasterize(SourceAsset::new(bytes, media_type)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgba;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect x="2" y="2" width="6" height="6" fill="#0000ff"/>
    </svg>"##;

    fn rasterizer(config: RasterConfig) -> Rasterizer {
        Rasterizer::new(RasterConfig {
            load_system_fonts: false,
            ..config
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let res = Rasterizer::new(RasterConfig { scale: 0, ..Default::default() });
        assert!(matches!(res, Err(Error::ConfigError(_))));
    }

    #[test]
    fn translucent_background_rejected() {
        let res = Rasterizer::new(RasterConfig {
            background: Rgba { r: 255, g: 255, b: 255, a: 0 },
            load_system_fonts: false,
            ..Default::default()
        });
        assert!(matches!(res, Err(Error::ConfigError(_))));
    }

    #[tokio::test]
    async fn renders_at_scale() {
        let r = rasterizer(RasterConfig { scale: 3, ..Default::default() });
        let out = r
            .rasterize(SourceAsset::new(SQUARE, "image/svg+xml"))
            .await
            .unwrap();
        assert_eq!((out.width, out.height), (30, 30));
        let bitmap = out.decode().unwrap();
        assert_eq!(bitmap.pixel(15, 15), Some([0, 0, 255, 255]));
        assert_eq!(bitmap.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn custom_background() {
        let r = rasterizer(RasterConfig {
            background: Rgba::opaque(0, 128, 0),
            ..Default::default()
        });
        let out = r
            .rasterize(SourceAsset::new(SQUARE, "image/svg+xml"))
            .await
            .unwrap();
        assert_eq!(out.decode().unwrap().pixel(1, 1), Some([0, 128, 0, 255]));
    }

    #[tokio::test]
    async fn sniffing_rejects_before_decode() {
        let r = rasterizer(RasterConfig { sniff_markup: true, ..Default::default() });
        let err = r
            .rasterize(SourceAsset::new(&b"just text"[..], "image/svg+xml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DecodeError(m) if m.contains("does not look like")));
    }

    #[tokio::test]
    async fn oversized_surface_rejected() {
        let r = rasterizer(RasterConfig { max_dimension: 15, ..Default::default() });
        let err = r
            .rasterize(SourceAsset::new(SQUARE, "image/svg+xml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SurfaceError(_)));
    }
}
