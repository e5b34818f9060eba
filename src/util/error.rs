//! Error types for rotozoom.

use thiserror::Error;

/// Result alias for rotozoom operations.
pub type RotozoomResult<T> = std::result::Result<T, RotozoomError>;

/// Errors that can occur while sizing, reading, resampling or writing images.
#[derive(Debug, Error)]
pub enum RotozoomError {
    /// A transform parameter was rejected before any I/O happened.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
    /// The source stream is not an image this crate can decode.
    #[error("unsupported source format: {reason}")]
    SourceFormat { reason: String },
    /// Image dimensions are zero or overflow addressable memory.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride: width {width}, stride {stride}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the requested layout.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region does not fit inside the image it was taken from.
    #[error(
        "roi out of bounds: x={x}, y={y}, width={width}, height={height}, image={img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Read, seek or write failure on an underlying stream.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Decoding or encoding through the `image` crate failed.
    #[error("image i/o error: {reason}")]
    ImageIo { reason: String },
}

impl RotozoomError {
    pub(crate) fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    pub(crate) fn source_format(reason: impl Into<String>) -> Self {
        Self::SourceFormat {
            reason: reason.into(),
        }
    }
}
