//! Conversions to and from the `image` crate.
//!
//! Available when the `image-io` feature is enabled. These helpers hold the
//! whole image in memory; streaming, bounded-memory I/O goes through
//! [`crate::codec::bmp`] instead.

use crate::image::{Pixel, PixelBuffer};
use crate::util::{RotozoomError, RotozoomResult};
use std::path::Path;

/// Copies an RGB image into an owned pixel buffer.
pub fn buffer_from_rgb_image(img: &image::RgbImage) -> RotozoomResult<PixelBuffer> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.pixels().map(|p| Pixel::from_channels(p.0)).collect();
    PixelBuffer::from_vec(data, width, height)
}

/// Copies a pixel buffer into an RGB image.
pub fn rgb_image_from_buffer(buf: &PixelBuffer) -> RotozoomResult<image::RgbImage> {
    let width = u32::try_from(buf.width()).map_err(|_| RotozoomError::InvalidDimensions {
        width: buf.width(),
        height: buf.height(),
    })?;
    let height = u32::try_from(buf.height()).map_err(|_| RotozoomError::InvalidDimensions {
        width: buf.width(),
        height: buf.height(),
    })?;
    let raw: Vec<u8> = buf.data().iter().flat_map(|p| p.channels()).collect();
    image::RgbImage::from_raw(width, height, raw).ok_or(RotozoomError::BufferTooSmall {
        needed: buf.width() * buf.height() * 3,
        got: buf.data().len() * 3,
    })
}

/// Loads an image from disk (any format the `image` crate was built with) and
/// converts it to RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> RotozoomResult<PixelBuffer> {
    let img = image::open(path).map_err(|err| RotozoomError::ImageIo {
        reason: err.to_string(),
    })?;
    buffer_from_rgb_image(&img.to_rgb8())
}

/// Saves a pixel buffer; the format is chosen from the path extension.
pub fn save_rgb_image<P: AsRef<Path>>(buf: &PixelBuffer, path: P) -> RotozoomResult<()> {
    let img = rgb_image_from_buffer(buf)?;
    img.save(path).map_err(|err| RotozoomError::ImageIo {
        reason: err.to_string(),
    })
}
