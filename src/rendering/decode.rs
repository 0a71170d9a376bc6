//! SVG decoding
//!
//! Parsing happens on the blocking pool and is the single suspension point of
//! a conversion. The caller's deadline bounds how long it may take.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use resvg::usvg::{fontdb, ImageRendering, Options, ShapeRendering, Size, Tree};

use crate::{Error, Result};

/// A parsed SVG document with its intrinsic pixel size.
pub struct DecodedImage {
    tree: Tree,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Unrounded size of the document in user units.
    pub fn natural_size(&self) -> Size {
        self.tree.size()
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Parser options: quality-first rendering hints, and no loading of images
/// referenced by path or URL. Inline `data:` images still decode.
pub fn decode_options(fontdb: Arc<fontdb::Database>) -> Options<'static> {
    let mut options = Options {
        fontdb,
        shape_rendering: ShapeRendering::GeometricPrecision,
        image_rendering: ImageRendering::OptimizeQuality,
        ..Options::default()
    };
    options.image_href_resolver.resolve_string = Box::new(|_: &str, _: &Options| None);
    options
}

/// Parse SVG (or gzip-compressed SVGZ) bytes.
///
/// The intrinsic size comes from the `width`/`height` attributes, or from the
/// `viewBox` when those are absent, rounded up to whole pixels.
pub fn decode_svg(bytes: &[u8], options: &Options) -> Result<DecodedImage> {
    if bytes.is_empty() {
        return Err(Error::DecodeError("input is empty".into()));
    }
    let tree = Tree::from_data(bytes, options).map_err(|e| Error::DecodeError(e.to_string()))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    if width == 0 || height == 0 {
        return Err(Error::DecodeError(format!(
            "image has no displayable size ({}x{})",
            size.width(),
            size.height()
        )));
    }

    Ok(DecodedImage { tree, width, height })
}

/// Decode on the blocking pool, giving up once `timeout` has elapsed.
///
/// An expired deadline does not stop the parse: the blocking task runs to
/// completion and its result is dropped. Inputs that keep stalling therefore
/// keep occupying blocking-pool threads until they finish.
pub async fn decode_with_deadline(
    bytes: Vec<u8>,
    fontdb: Arc<fontdb::Database>,
    timeout: Duration,
) -> Result<DecodedImage> {
    let task = tokio::task::spawn_blocking(move || {
        let options = decode_options(fontdb);
        decode_svg(&bytes, &options)
    });

    with_deadline(task, timeout)
        .await?
        .map_err(|e| Error::DecodeError(format!("decoder task failed: {}", e)))?
}

/// Await `fut`, turning an expired deadline into a `DecodeError`.
pub async fn with_deadline<F: Future>(fut: F, timeout: Duration) -> Result<F::Output> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        Error::DecodeError(format!("decode timed out after {}ms", timeout.as_millis()))
    })
}
