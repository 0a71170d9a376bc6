//! PNG serialization of surface pixels
//!
//! Output is always 8-bit RGBA with straight alpha and default deflate
//! compression, so encoding the same pixels twice yields the same bytes.

use crate::{Error, Result};

/// Straight-alpha RGBA pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Bitmap {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode these pixels with [`encode_png`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_png(self.width, self.height, &self.rgba)
    }
}

/// Encode RGBA pixels as a PNG payload.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(Error::EncodeError(format!(
            "expected {} bytes of RGBA for {}x{}, got {}",
            expected,
            width,
            height,
            rgba.len()
        )));
    }

    let mut payload = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut payload, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Default);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
        writer.finish()?;
    }
    Ok(payload)
}

/// Decode a PNG payload into RGBA pixels. Only 8-bit RGB and RGBA images
/// are accepted.
pub fn decode_png(payload: &[u8]) -> Result<Bitmap> {
    let decoder = png::Decoder::new(payload);
    let mut reader = decoder
        .read_info()
        .map_err(|e| Error::DecodeError(format!("invalid PNG: {}", e)))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| Error::DecodeError(format!("invalid PNG frame: {}", e)))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(Error::DecodeError(format!("unsupported bit depth {:?}", info.bit_depth)));
    }
    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        other => {
            return Err(Error::DecodeError(format!("unsupported color type {:?}", other)));
        }
    };

    Ok(Bitmap {
        width: info.width,
        height: info.height,
        rgba,
    })
}
