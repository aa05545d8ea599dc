//! Error types for image import

use thiserror::Error;

/// Error when an import job cannot start.
///
/// Once a job is running, palette overflow, capacity overflow and unmapped
/// colors are reported in the [`ImportReport`](super::ImportReport) instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The image file could not be read or decoded
    #[error("Failed to open image: {0}")]
    Decode(#[from] image::ImageError),
    /// I/O failure outside the decoder
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Pixel count doesn't match the stated dimensions
    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch { len: usize, width: usize, height: usize },
    /// The sprite chip has a zero tile dimension
    #[error("invalid sprite size {width}x{height}, both dimensions must be positive")]
    InvalidTileSize { width: usize, height: usize },
}
