//! Pixel I/O seams between the transform engine and image containers.
//!
//! The engine never parses file headers itself: it reads source pixels through
//! [`ImageSource`] and emits output pixels through [`ImageSink`]. Row indices
//! count from the top of the image regardless of how a container stores rows.
//! `read_region`/`write_region` are random access, which is what lets the
//! tiled strategy work on images that do not fit in memory.

use crate::geometry::InputWindow;
use crate::image::{ImageView, Pixel, PixelBuffer};
use crate::util::{RotozoomError, RotozoomResult};

pub mod bmp;

pub use bmp::{BmpReader, BmpWriter};

/// Random-access source of RGB pixels.
pub trait ImageSource {
    /// Returns `(width, height)` of the source.
    fn dimensions(&self) -> (u32, u32);

    /// Reads full row `row` into `out` (`out.len() == width`).
    fn read_row(&mut self, row: u32, out: &mut [Pixel]) -> RotozoomResult<()>;

    /// Reads the pixels of `window` into `out`, whose dimensions must equal
    /// the window's.
    fn read_region(&mut self, window: &InputWindow, out: &mut PixelBuffer) -> RotozoomResult<()>;
}

/// Random-access destination for RGB pixels.
pub trait ImageSink {
    /// Declares the output size. Must be called once, before any pixel write.
    fn write_header(&mut self, width: u32, height: u32) -> RotozoomResult<()>;

    /// Writes full output row `row`.
    fn write_row(&mut self, row: u32, pixels: &[Pixel]) -> RotozoomResult<()>;

    /// Writes `block` with its top-left pixel at `(origin_x, origin_y)`.
    fn write_region(
        &mut self,
        origin_x: u32,
        origin_y: u32,
        block: ImageView<'_, Pixel>,
    ) -> RotozoomResult<()>;
}

pub(crate) fn check_region(
    window: &InputWindow,
    out: &PixelBuffer,
    width: usize,
    height: usize,
) -> RotozoomResult<()> {
    let fits = window.origin_x + window.width <= width && window.origin_y + window.height <= height;
    if window.width == 0 || window.height == 0 || !fits {
        return Err(RotozoomError::RoiOutOfBounds {
            x: window.origin_x,
            y: window.origin_y,
            width: window.width,
            height: window.height,
            img_width: width,
            img_height: height,
        });
    }
    if out.width() != window.width || out.height() != window.height {
        return Err(RotozoomError::BufferTooSmall {
            needed: window.width * window.height,
            got: out.width() * out.height(),
        });
    }
    Ok(())
}

pub(crate) fn check_block(
    origin_x: usize,
    origin_y: usize,
    block: &ImageView<'_, Pixel>,
    width: usize,
    height: usize,
) -> RotozoomResult<()> {
    if origin_x + block.width() > width || origin_y + block.height() > height {
        return Err(RotozoomError::RoiOutOfBounds {
            x: origin_x,
            y: origin_y,
            width: block.width(),
            height: block.height(),
            img_width: width,
            img_height: height,
        });
    }
    Ok(())
}

fn to_u32(width: usize, height: usize) -> RotozoomResult<(u32, u32)> {
    let w = u32::try_from(width).map_err(|_| RotozoomError::InvalidDimensions { width, height })?;
    let h = u32::try_from(height).map_err(|_| RotozoomError::InvalidDimensions { width, height })?;
    Ok((w, h))
}

/// Source backed by a resident [`PixelBuffer`].
#[derive(Clone, Debug)]
pub struct MemorySource {
    buffer: PixelBuffer,
    width: u32,
    height: u32,
}

impl MemorySource {
    pub fn new(buffer: PixelBuffer) -> RotozoomResult<Self> {
        let (width, height) = to_u32(buffer.width(), buffer.height())?;
        Ok(Self {
            buffer,
            width,
            height,
        })
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }
}

impl ImageSource for MemorySource {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_row(&mut self, row: u32, out: &mut [Pixel]) -> RotozoomResult<()> {
        let src = self
            .buffer
            .row(row as usize)
            .ok_or(RotozoomError::RoiOutOfBounds {
                x: 0,
                y: row as usize,
                width: out.len(),
                height: 1,
                img_width: self.buffer.width(),
                img_height: self.buffer.height(),
            })?;
        if src.len() != out.len() {
            return Err(RotozoomError::BufferTooSmall {
                needed: src.len(),
                got: out.len(),
            });
        }
        out.copy_from_slice(src);
        Ok(())
    }

    fn read_region(&mut self, window: &InputWindow, out: &mut PixelBuffer) -> RotozoomResult<()> {
        check_region(window, out, self.buffer.width(), self.buffer.height())?;
        let view = self.buffer.view().roi(
            window.origin_x,
            window.origin_y,
            window.width,
            window.height,
        )?;
        for y in 0..window.height {
            if let (Some(src), Some(dst)) = (view.row(y), out.row_mut(y)) {
                dst.copy_from_slice(src);
            }
        }
        Ok(())
    }
}

/// Sink that assembles the output in a [`PixelBuffer`].
///
/// Pixels that are never written stay black.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    buffer: Option<PixelBuffer>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the output, or `None` before [`ImageSink::write_header`].
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    pub fn into_buffer(self) -> Option<PixelBuffer> {
        self.buffer
    }

    fn buffer_mut(&mut self) -> RotozoomResult<&mut PixelBuffer> {
        self.buffer
            .as_mut()
            .ok_or_else(|| RotozoomError::invalid_parameter("output written before its header"))
    }
}

impl ImageSink for MemorySink {
    fn write_header(&mut self, width: u32, height: u32) -> RotozoomResult<()> {
        self.buffer = Some(PixelBuffer::filled(
            width as usize,
            height as usize,
            Pixel::BLACK,
        )?);
        Ok(())
    }

    fn write_row(&mut self, row: u32, pixels: &[Pixel]) -> RotozoomResult<()> {
        let buffer = self.buffer_mut()?;
        let (width, height) = (buffer.width(), buffer.height());
        let dst = buffer
            .row_mut(row as usize)
            .ok_or(RotozoomError::RoiOutOfBounds {
                x: 0,
                y: row as usize,
                width: pixels.len(),
                height: 1,
                img_width: width,
                img_height: height,
            })?;
        if dst.len() != pixels.len() {
            return Err(RotozoomError::BufferTooSmall {
                needed: dst.len(),
                got: pixels.len(),
            });
        }
        dst.copy_from_slice(pixels);
        Ok(())
    }

    fn write_region(
        &mut self,
        origin_x: u32,
        origin_y: u32,
        block: ImageView<'_, Pixel>,
    ) -> RotozoomResult<()> {
        let buffer = self.buffer_mut()?;
        let (ox, oy) = (origin_x as usize, origin_y as usize);
        check_block(ox, oy, &block, buffer.width(), buffer.height())?;
        for y in 0..block.height() {
            if let (Some(src), Some(dst)) = (block.row(y), buffer.row_mut(oy + y)) {
                dst[ox..ox + src.len()].copy_from_slice(src);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageSink, ImageSource, MemorySink, MemorySource};
    use crate::geometry::InputWindow;
    use crate::image::{Pixel, PixelBuffer};
    use crate::util::RotozoomError;

    fn numbered(width: usize, height: usize) -> PixelBuffer {
        let data = (0..width * height)
            .map(|i| Pixel::new(i as u8, 0, 0))
            .collect();
        PixelBuffer::from_vec(data, width, height).unwrap()
    }

    #[test]
    fn memory_source_reads_regions() {
        let mut src = MemorySource::new(numbered(4, 3)).unwrap();
        assert_eq!(src.dimensions(), (4, 3));

        let window = InputWindow {
            origin_x: 1,
            origin_y: 1,
            width: 3,
            height: 2,
        };
        let mut out = PixelBuffer::filled(3, 2, Pixel::WHITE).unwrap();
        src.read_region(&window, &mut out).unwrap();
        let reds: Vec<u8> = out.data().iter().map(|p| p.red).collect();
        assert_eq!(reds, vec![5, 6, 7, 9, 10, 11]);

        let too_wide = InputWindow {
            width: 4,
            ..window
        };
        let mut out = PixelBuffer::filled(4, 2, Pixel::WHITE).unwrap();
        assert!(matches!(
            src.read_region(&too_wide, &mut out),
            Err(RotozoomError::RoiOutOfBounds { .. })
        ));
    }

    #[test]
    fn memory_sink_requires_header_and_places_blocks() {
        let mut sink = MemorySink::new();
        assert!(sink.write_row(0, &[Pixel::WHITE]).is_err());

        sink.write_header(3, 3).unwrap();
        let block = numbered(2, 2);
        sink.write_region(1, 1, block.view()).unwrap();
        let out = sink.buffer().unwrap();
        assert_eq!(out.get(0, 0), Some(Pixel::BLACK));
        assert_eq!(out.get(1, 1), Some(Pixel::new(0, 0, 0)));
        assert_eq!(out.get(2, 2), Some(Pixel::new(3, 0, 0)));
        assert!(sink.write_region(2, 2, block.view()).is_err());
    }
}
