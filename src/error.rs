//! Error type shared by every stage of identicon rendering.

use thiserror::Error;

/// Errors returned while configuring, drawing or encoding an identicon.
#[derive(Debug, Error)]
pub enum IdenticonError {
    /// The hash does not carry enough hex digits for the configuration.
    #[error("hash too short: {required} hex digits required, got {actual}")]
    InsufficientHashLength { required: usize, actual: usize },

    /// A character the decoder would consume is not a hex digit.
    #[error("invalid hex digit {found:?} at position {position}")]
    InvalidHashDigit { position: usize, found: char },

    /// The configuration cannot describe a drawable icon.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A pattern catalog is empty or malformed.
    #[error("invalid pattern catalog: {0}")]
    InvalidCatalog(String),

    /// A canvas was used before it was allocated (or after it was freed).
    #[error("{0} is not allocated")]
    NotAllocated(&'static str),

    /// The raster backend could not complete a primitive.
    #[error("raster backend error: {0}")]
    Raster(String),

    /// Image encoding failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O failure while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or catalog (de)serialization failure.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IdenticonError>;
