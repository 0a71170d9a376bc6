//! Caller shell: the glue between files on disk and the rasterizer
//!
//! This is where the input guard runs, where output files are named and
//! written, and where failures are logged and turned into a message for the
//! user.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::source::{is_vector_media_type, media_type_for_path, SourceAsset};
use crate::{Error, RasterResult, Rasterizer, Result};

/// Shown when the input is not an SVG file.
pub const WRONG_TYPE_MESSAGE: &str = "Please upload an SVG file";

/// Shown for every other failure.
pub const CONVERSION_FAILED_MESSAGE: &str = "Error converting image. Please try again.";

/// Name of the PNG produced from `source`: the extension is replaced by
/// `.png`, or appended when there is none.
pub fn output_file_name(source: &Path) -> PathBuf {
    let name = source.file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("image"));
    name.with_extension("png")
}

/// One generic message per failure kind, for display to the user.
pub fn user_message(err: &Error) -> &'static str {
    match err {
        Error::InputTypeError(_) => WRONG_TYPE_MESSAGE,
        _ => CONVERSION_FAILED_MESSAGE,
    }
}

/// Convert the SVG at `input` and write the PNG into `output_dir`, or next to
/// the input when no directory is given. Returns the written path.
pub async fn convert_file(
    rasterizer: &Rasterizer,
    input: &Path,
    output_dir: Option<&Path>,
) -> Result<(PathBuf, RasterResult)> {
    let media_type = media_type_for_path(input);
    if !is_vector_media_type(media_type) {
        let err = Error::InputTypeError(media_type.to_string());
        warn!("Rejected {}: {}", input.display(), err);
        return Err(err);
    }
    let source = SourceAsset::from_upload(tokio::fs::read(input).await?, media_type)?;

    info!("Converting {} ({} bytes)", input.display(), source.bytes.len());
    let result = rasterizer.rasterize(source).await.map_err(|e| {
        warn!("Conversion of {} failed: {}", input.display(), e);
        e
    })?;

    let dir = match output_dir {
        Some(d) => d.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let out_path = dir.join(output_file_name(input));
    tokio::fs::write(&out_path, &result.payload).await?;
    info!(
        "Wrote {} ({}x{}, {} bytes)",
        out_path.display(),
        result.width,
        result.height,
        result.payload.len()
    );

    Ok((out_path, result))
}
