//! Rendering pipeline: SVG decoding, the drawing surface and PNG encoding

pub mod decode;
pub mod encode;
pub mod surface;

use base64::Engine as Base64Engine;
use sha2::{Digest, Sha256};

use crate::Result;

/// A rasterized image: the PNG payload plus its pixel dimensions.
///
/// Produced once by the rasterizer and handed over to the caller; it is never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterResult {
    pub width: u32,
    pub height: u32,
    pub payload: Vec<u8>,
}

impl RasterResult {
    /// `data:` URL suitable for an inline `<img src=...>` preview.
    pub fn data_url(&self) -> String {
        let b64 = Base64Engine::encode(&base64::engine::general_purpose::STANDARD, &self.payload);
        format!("data:image/png;base64,{}", b64)
    }

    /// Hex SHA-256 of the payload.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.payload))
    }

    /// Decode the payload back into straight-alpha RGBA pixels.
    pub fn decode(&self) -> Result<encode::Bitmap> {
        encode::decode_png(&self.payload)
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RasterResult {
        let rgba = [255u8, 0, 0, 255].repeat(4);
        let payload = encode::encode_png(2, 2, &rgba).unwrap();
        RasterResult { width: 2, height: 2, payload }
    }

    #[test]
    fn data_url_has_png_prefix() {
        let url = sample().data_url();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn digest_is_stable_hex() {
        let a = sample();
        let b = sample();
        assert_eq!(a.digest().len(), 64);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn decode_returns_pixels() {
        let bitmap = sample().decode().unwrap();
        assert_eq!((bitmap.width, bitmap.height), (2, 2));
        assert_eq!(bitmap.pixel(1, 1), Some([255, 0, 0, 255]));
    }
}
