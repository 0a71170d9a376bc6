//! Error types for the rasterizer and its caller shell

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting an SVG into a PNG
#[derive(Error, Debug)]
pub enum Error {
    /// The declared media type is not SVG (caller-side guard)
    #[error("Unsupported input type: {0}")]
    InputTypeError(String),

    /// The bytes could not be turned into a displayable image
    #[error("Failed to decode SVG: {0}")]
    DecodeError(String),

    /// The drawing surface could not be allocated
    #[error("Failed to allocate drawing surface: {0}")]
    SurfaceError(String),

    /// The surface could not be serialized as PNG
    #[error("Failed to encode PNG: {0}")]
    EncodeError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// File access in the caller shell
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::EncodeError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
