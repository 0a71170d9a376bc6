//! Source assets and the caller-side input guards

use std::path::Path;

use crate::{Error, Result};

/// Media type accepted for vector input.
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// How many leading bytes [`looks_like_svg`] inspects.
const SNIFF_WINDOW: usize = 4096;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Raw SVG bytes together with the media type the caller declared for them.
///
/// A `SourceAsset` is consumed by the rasterizer; nothing keeps it alive past
/// the decode step.
#[derive(Debug, Clone)]
pub struct SourceAsset {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl SourceAsset {
    /// Wrap bytes without checking the media type. The rasterizer only cares
    /// whether the bytes decode.
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }

    /// Caller-side guard: accept the upload only if its declared type is SVG.
    pub fn from_upload(bytes: impl Into<Vec<u8>>, media_type: &str) -> Result<Self> {
        if !is_vector_media_type(media_type) {
            return Err(Error::InputTypeError(media_type.to_string()));
        }
        Ok(Self::new(bytes, media_type))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// True when the declared type denotes SVG markup (parameters such as
/// `;charset=utf-8` are allowed).
pub fn is_vector_media_type(media_type: &str) -> bool {
    media_type.trim_start().starts_with(SVG_MEDIA_TYPE)
}

/// Guess the media type of a file from its extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("svg") | Some("svgz") => SVG_MEDIA_TYPE,
        _ => "application/octet-stream",
    }
}

/// Cheap structural check run before decoding when sniffing is enabled:
/// gzip-compressed input (svgz) or an `<svg` tag near the start of the text.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    if bytes.starts_with(&GZIP_MAGIC) {
        return true;
    }
    let window = &bytes[..bytes.len().min(SNIFF_WINDOW)];
    let text = String::from_utf8_lossy(window);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with('<') && text.contains("<svg")
}
