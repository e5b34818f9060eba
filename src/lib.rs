//! Rotozoom rotates and zooms RGB raster images onto a canvas sized to hold
//! the whole transformed image.
//!
//! The crate provides four resampling kernels (nearest neighbour, bilinear,
//! bicubic and Lanczos-3) and two execution strategies: an in-memory pipeline
//! that loads the full source, and a tiled pipeline with bounded memory that
//! reads one padded source window per output tile. Both strategies produce
//! identical output. Pixel I/O goes through the [`ImageSource`] and
//! [`ImageSink`] traits; an uncompressed 24-bit BMP codec is included, and the
//! `image-io` feature adds conversions to and from the `image` crate.

pub mod codec;
pub mod geometry;
pub mod image;
pub mod lowlevel;
pub mod resample;
mod trace;
pub mod transform;
pub mod util;

pub use codec::{BmpReader, BmpWriter, ImageSink, ImageSource, MemorySink, MemorySource};
pub use geometry::{compute_canvas, AffineTransform, Canvas};
pub use crate::image::{ImageView, Pixel, PixelBuffer};
pub use resample::{InterpolationMode, Resampler};
pub use transform::{
    transform, Strategy, TransformConfig, TransformReport, DEFAULT_PADDING, DEFAULT_TILE_SIDE,
};
pub use util::{RotozoomError, RotozoomResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
