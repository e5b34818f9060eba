//! Uncompressed 24-bit BMP over seekable streams.
//!
//! Pixel rows are stored bottom-up (positive height) or top-down (negative
//! height), each padded to a multiple of four bytes, channels in BGR order.
//! Every read and write seeks to the absolute byte offset
//! `pixel_offset + file_row * stride + col * 3`, so any rectangle can be
//! accessed without touching the rest of the file.

use crate::codec::{check_block, check_region, ImageSink, ImageSource};
use crate::geometry::InputWindow;
use crate::image::{ImageView, Pixel, PixelBuffer};
use crate::util::{RotozoomError, RotozoomResult};
use std::io::{self, Read, Seek, SeekFrom, Write};

const SIGNATURE: u16 = 0x4d42;
const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const BYTES_PER_PIXEL: u64 = 3;
const BITS_PER_PIXEL: u16 = 24;
const BI_RGB: u32 = 0;
/// 72 DPI.
const PIXELS_PER_METER: i32 = 2835;

/// Bytes per stored row, including padding to a four-byte boundary.
pub fn row_stride(width: u32) -> u64 {
    (u64::from(width) * BYTES_PER_PIXEL + 3) & !3
}

fn u16_at(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn u32_at(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn i32_at(buf: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn truncated_header(err: io::Error) -> RotozoomError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        RotozoomError::source_format("file too short for a bitmap header")
    } else {
        RotozoomError::Io(err)
    }
}

fn decode_bgr(bytes: &[u8], out: &mut [Pixel]) {
    for (px, bgr) in out.iter_mut().zip(bytes.chunks_exact(3)) {
        *px = Pixel::new(bgr[2], bgr[1], bgr[0]);
    }
}

fn encode_bgr(pixels: &[Pixel], bytes: &mut Vec<u8>) {
    bytes.clear();
    bytes.extend(pixels.iter().flat_map(|p| [p.blue, p.green, p.red]));
}

/// Streaming reader for 24-bit BMP files.
#[derive(Debug)]
pub struct BmpReader<R> {
    inner: R,
    width: u32,
    height: u32,
    top_down: bool,
    pixel_offset: u64,
    stride: u64,
    scratch: Vec<u8>,
}

impl<R: Read + Seek> BmpReader<R> {
    /// Parses and validates the headers; pixel data is read on demand.
    pub fn new(mut inner: R) -> RotozoomResult<Self> {
        inner.seek(SeekFrom::Start(0))?;
        let mut file_header = [0u8; FILE_HEADER_LEN as usize];
        inner.read_exact(&mut file_header).map_err(truncated_header)?;
        if u16_at(&file_header, 0) != SIGNATURE {
            return Err(RotozoomError::source_format("missing `BM` signature"));
        }
        let pixel_offset = u64::from(u32_at(&file_header, 10));

        let mut info = [0u8; INFO_HEADER_LEN as usize];
        inner.read_exact(&mut info).map_err(truncated_header)?;
        let info_len = u32_at(&info, 0);
        if info_len < INFO_HEADER_LEN {
            return Err(RotozoomError::source_format(format!(
                "unsupported info header of {info_len} bytes"
            )));
        }
        let raw_width = i32_at(&info, 4);
        let raw_height = i32_at(&info, 8);
        let bit_count = u16_at(&info, 14);
        let compression = u32_at(&info, 16);

        if bit_count != BITS_PER_PIXEL {
            return Err(RotozoomError::source_format(format!(
                "{bit_count}-bit pixels, only 24-bit is supported"
            )));
        }
        if compression != BI_RGB {
            return Err(RotozoomError::source_format(format!(
                "compression method {compression}, only uncompressed is supported"
            )));
        }
        if raw_width <= 0 || raw_height == 0 || raw_height == i32::MIN {
            return Err(RotozoomError::source_format(format!(
                "invalid dimensions {raw_width}x{raw_height}"
            )));
        }

        let width = raw_width.unsigned_abs();
        let height = raw_height.unsigned_abs();
        Ok(Self {
            inner,
            width,
            height,
            top_down: raw_height < 0,
            pixel_offset,
            stride: row_stride(width),
            scratch: Vec::new(),
        })
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn file_row(&self, row: u32) -> u64 {
        if self.top_down {
            u64::from(row)
        } else {
            u64::from(self.height - 1 - row)
        }
    }

    fn read_span(&mut self, row: u32, col: u32, out: &mut [Pixel]) -> RotozoomResult<()> {
        let offset =
            self.pixel_offset + self.file_row(row) * self.stride + u64::from(col) * BYTES_PER_PIXEL;
        self.scratch.resize(out.len() * BYTES_PER_PIXEL as usize, 0);
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(&mut self.scratch)?;
        decode_bgr(&self.scratch, out);
        Ok(())
    }
}

impl<R: Read + Seek> ImageSource for BmpReader<R> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_row(&mut self, row: u32, out: &mut [Pixel]) -> RotozoomResult<()> {
        if row >= self.height || out.len() != self.width as usize {
            return Err(RotozoomError::RoiOutOfBounds {
                x: 0,
                y: row as usize,
                width: out.len(),
                height: 1,
                img_width: self.width as usize,
                img_height: self.height as usize,
            });
        }
        self.read_span(row, 0, out)
    }

    fn read_region(&mut self, window: &InputWindow, out: &mut PixelBuffer) -> RotozoomResult<()> {
        check_region(window, out, self.width as usize, self.height as usize)?;
        for y in 0..window.height {
            let row = (window.origin_y + y) as u32;
            let dst = out.row_mut(y).ok_or(RotozoomError::InvalidDimensions {
                width: window.width,
                height: window.height,
            })?;
            self.read_span(row, window.origin_x as u32, dst)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct Layout {
    width: u32,
    height: u32,
    stride: u64,
}

/// Writer for 24-bit bottom-up BMP files with random-access pixel writes.
#[derive(Debug)]
pub struct BmpWriter<W> {
    inner: W,
    layout: Option<Layout>,
    scratch: Vec<u8>,
}

impl<W: Write + Seek> BmpWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            layout: None,
            scratch: Vec::new(),
        }
    }

    /// Flushes and returns the underlying stream.
    pub fn into_inner(mut self) -> RotozoomResult<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn layout(&self) -> RotozoomResult<Layout> {
        self.layout
            .ok_or_else(|| RotozoomError::invalid_parameter("output written before its header"))
    }

    fn write_span(
        &mut self,
        layout: Layout,
        row: u32,
        col: u32,
        pixels: &[Pixel],
    ) -> RotozoomResult<()> {
        let file_row = u64::from(layout.height - 1 - row);
        let offset = u64::from(FILE_HEADER_LEN + INFO_HEADER_LEN)
            + file_row * layout.stride
            + u64::from(col) * BYTES_PER_PIXEL;
        encode_bgr(pixels, &mut self.scratch);
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.write_all(&self.scratch)?;
        Ok(())
    }
}

impl<W: Write + Seek> ImageSink for BmpWriter<W> {
    /// Writes both headers and zero-fills the pixel array so that later writes
    /// can seek anywhere inside it.
    fn write_header(&mut self, width: u32, height: u32) -> RotozoomResult<()> {
        let (Ok(signed_width), Ok(signed_height)) = (i32::try_from(width), i32::try_from(height))
        else {
            return Err(RotozoomError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        };
        if width == 0 || height == 0 {
            return Err(RotozoomError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        let stride = row_stride(width);
        let image_size = stride * u64::from(height);
        let header_len = FILE_HEADER_LEN + INFO_HEADER_LEN;
        let file_size = u32::try_from(u64::from(header_len) + image_size).map_err(|_| {
            RotozoomError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            }
        })?;

        let mut header = Vec::with_capacity(header_len as usize);
        header.extend_from_slice(&SIGNATURE.to_le_bytes());
        header.extend_from_slice(&file_size.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&header_len.to_le_bytes());
        header.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
        header.extend_from_slice(&signed_width.to_le_bytes());
        header.extend_from_slice(&signed_height.to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes());
        header.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
        header.extend_from_slice(&BI_RGB.to_le_bytes());
        header.extend_from_slice(&(image_size as u32).to_le_bytes());
        header.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
        header.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());

        self.inner.seek(SeekFrom::Start(0))?;
        self.inner.write_all(&header)?;
        let zero_row = vec![0u8; stride as usize];
        for _ in 0..height {
            self.inner.write_all(&zero_row)?;
        }

        self.layout = Some(Layout {
            width,
            height,
            stride,
        });
        Ok(())
    }

    fn write_row(&mut self, row: u32, pixels: &[Pixel]) -> RotozoomResult<()> {
        let layout = self.layout()?;
        if row >= layout.height || pixels.len() != layout.width as usize {
            return Err(RotozoomError::RoiOutOfBounds {
                x: 0,
                y: row as usize,
                width: pixels.len(),
                height: 1,
                img_width: layout.width as usize,
                img_height: layout.height as usize,
            });
        }
        self.write_span(layout, row, 0, pixels)
    }

    fn write_region(
        &mut self,
        origin_x: u32,
        origin_y: u32,
        block: ImageView<'_, Pixel>,
    ) -> RotozoomResult<()> {
        let layout = self.layout()?;
        check_block(
            origin_x as usize,
            origin_y as usize,
            &block,
            layout.width as usize,
            layout.height as usize,
        )?;
        for y in 0..block.height() {
            let pixels = block.row(y).ok_or(RotozoomError::InvalidDimensions {
                width: block.width(),
                height: block.height(),
            })?;
            self.write_span(layout, origin_y + y as u32, origin_x, pixels)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{row_stride, BmpReader, BmpWriter};
    use crate::codec::{ImageSink, ImageSource};
    use crate::image::Pixel;
    use std::io::Cursor;

    #[test]
    fn stride_pads_to_four_bytes() {
        assert_eq!(row_stride(1), 4);
        assert_eq!(row_stride(4), 12);
        assert_eq!(row_stride(5), 16);
    }

    #[test]
    fn header_and_rows_are_bottom_up_bgr() {
        let mut writer = BmpWriter::new(Cursor::new(Vec::new()));
        writer.write_header(2, 2).unwrap();
        writer
            .write_row(0, &[Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)])
            .unwrap();
        writer
            .write_row(1, &[Pixel::new(7, 8, 9), Pixel::new(10, 11, 12)])
            .unwrap();
        let bytes = writer.into_inner().unwrap().into_inner();

        assert_eq!(bytes.len(), 54 + 2 * 8);
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]), 70);
        // Last image row is stored first.
        assert_eq!(&bytes[54..62], &[9, 8, 7, 12, 11, 10, 0, 0]);
        assert_eq!(&bytes[62..70], &[3, 2, 1, 6, 5, 4, 0, 0]);

        let mut reader = BmpReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.dimensions(), (2, 2));
        let mut row = [Pixel::BLACK; 2];
        reader.read_row(0, &mut row).unwrap();
        assert_eq!(row, [Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)]);
    }
}
