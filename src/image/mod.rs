//! Pixels, owned pixel buffers and borrowed views.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents a view cut out of a wider buffer.
//! ROI slices are zero-copy views into the same backing slice and retain the
//! parent stride; the tiled transformer uses them to drop the part of a tile
//! that hangs over the canvas edge.

use crate::util::{RotozoomError, RotozoomResult};

pub mod border;
#[cfg(feature = "image-io")]
pub mod io;

/// An RGB pixel with 8-bit channels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    /// Largest value a channel can hold.
    pub const MAX_CHANNEL: u8 = u8::MAX;

    /// Fill used for output pixels whose source point lies outside the image.
    pub const WHITE: Pixel = Pixel::new(Self::MAX_CHANNEL, Self::MAX_CHANNEL, Self::MAX_CHANNEL);

    pub const BLACK: Pixel = Pixel::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the channels as `[red, green, blue]`.
    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    #[inline]
    pub fn from_channels([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> RotozoomResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> RotozoomResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(RotozoomError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> RotozoomResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(RotozoomError::InvalidDimensions { width, height });
        }
        let out_of_bounds = RotozoomError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let fits = x
            .checked_add(width)
            .zip(y.checked_add(height))
            .is_some_and(|(end_x, end_y)| end_x <= self.width && end_y <= self.height);
        if !fits {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(RotozoomError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(RotozoomError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> RotozoomResult<usize> {
    if width == 0 || height == 0 {
        return Err(RotozoomError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(RotozoomError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(RotozoomError::InvalidDimensions { width, height })
}

/// Owned, contiguous, row-major pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Allocates a `width x height` buffer with every pixel set to `fill`.
    pub fn filled(width: usize, height: usize, fill: Pixel) -> RotozoomResult<Self> {
        let len = checked_area(width, height)?;
        Ok(Self {
            data: vec![fill; len],
            width,
            height,
        })
    }

    /// Wraps an existing row-major pixel vector.
    pub fn from_vec(data: Vec<Pixel>, width: usize, height: usize) -> RotozoomResult<Self> {
        let needed = checked_area(width, height)?;
        if data.len() < needed {
            return Err(RotozoomError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(RotozoomError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixels in row-major order.
    pub fn data(&self) -> &[Pixel] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.width + x)
    }

    pub fn row(&self, y: usize) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    pub fn row_mut(&mut self, y: usize) -> Option<&mut [Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get_mut(start..start + self.width)
    }

    /// Sets every pixel to `fill`, keeping the dimensions.
    pub fn fill(&mut self, fill: Pixel) {
        self.data.fill(fill);
    }

    /// Returns a borrowed view of the whole buffer.
    pub fn view(&self) -> ImageView<'_, Pixel> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

fn checked_area(width: usize, height: usize) -> RotozoomResult<usize> {
    if width == 0 || height == 0 {
        return Err(RotozoomError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(RotozoomError::InvalidDimensions { width, height })
}
