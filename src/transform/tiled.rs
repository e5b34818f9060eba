//! Bounded-memory strategy: one output tile and one source window at a time.
//!
//! Tiles are processed in raster order. For each tile the padded source window
//! is derived from the inverse-mapped tile corners, loaded with a random-access
//! read, resampled, and the visible part of the tile is written back at its
//! absolute position. Resident memory is one `side x side` tile plus one
//! window, independent of the image size; pixels in the overlap of adjacent
//! windows are read more than once.

use crate::codec::{ImageSink, ImageSource};
use crate::geometry::{Canvas, InputWindow, Tile, TileGrid};
use crate::image::border::mirror_index;
use crate::image::{Pixel, PixelBuffer};
use crate::resample::{PixelAccess, Resampler};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{RotozoomError, RotozoomResult};

/// Mirrored access to a loaded source window.
///
/// Coordinates are mirrored against the full source extent first and only then
/// translated into the window, so the window resolves exactly the pixels a
/// fully resident source would.
///
/// Every tap lands inside a window built by [`InputWindow::for_tile`] with
/// padding of at least [`crate::geometry::MIN_PADDING`]. A sample at `u`
/// reads columns `floor(u - 0.5) - 2 ..= floor(u - 0.5) + 3` at most, which
/// stay within `floor(min u) - 3 .. ceil(max u) + 3` because `u` lies strictly
/// inside the tile's inverse-mapped box. The window spans
/// `floor(min u) - padding .. ceil(max u) + padding` before clipping, and a
/// tap mirrored back from beyond a source edge lands between that edge and
/// the taps on the inner side of the sample. Rows work the same way. A tap
/// outside the window therefore means a broken window and panics.
#[derive(Clone, Copy, Debug)]
pub struct WindowAccess<'a> {
    window: &'a InputWindow,
    pixels: &'a PixelBuffer,
    src_width: usize,
    src_height: usize,
}

impl<'a> WindowAccess<'a> {
    pub fn new(
        window: &'a InputWindow,
        pixels: &'a PixelBuffer,
        src_width: usize,
        src_height: usize,
    ) -> Self {
        Self {
            window,
            pixels,
            src_width,
            src_height,
        }
    }
}

impl PixelAccess for WindowAccess<'_> {
    fn extent(&self) -> (usize, usize) {
        (self.src_width, self.src_height)
    }

    #[inline]
    fn pixel(&self, col: i64, row: i64) -> Pixel {
        let (Some(x), Some(y)) = (
            mirror_index(col, self.src_width),
            mirror_index(row, self.src_height),
        ) else {
            return Pixel::WHITE;
        };
        assert!(
            self.window.contains(x, y),
            "tap ({x}, {y}) outside window {:?}",
            self.window
        );
        self.pixels
            .get(x - self.window.origin_x, y - self.window.origin_y)
            .unwrap_or(Pixel::WHITE)
    }
}

/// Transformer that streams the canvas tile by tile.
#[derive(Clone, Copy, Debug)]
pub struct TiledTransformer<'a> {
    canvas: &'a Canvas,
    resampler: &'a Resampler,
    tile_side: usize,
    padding: usize,
}

impl<'a> TiledTransformer<'a> {
    /// `tile_side` must be non-zero and `padding` at least
    /// [`crate::geometry::MIN_PADDING`]; [`crate::TransformConfig::validate`]
    /// checks both.
    pub fn new(
        canvas: &'a Canvas,
        resampler: &'a Resampler,
        tile_side: usize,
        padding: usize,
    ) -> Self {
        Self {
            canvas,
            resampler,
            tile_side,
            padding,
        }
    }

    pub fn tile_grid(&self) -> TileGrid {
        TileGrid::new(self.canvas.width(), self.canvas.height(), self.tile_side)
    }

    /// Writes the output header, then every tile. Returns the number of tiles.
    ///
    /// The first failing read or write aborts the run; tiles already written
    /// remain in `sink`.
    pub fn run<S, K>(&self, source: &mut S, sink: &mut K) -> RotozoomResult<usize>
    where
        S: ImageSource + ?Sized,
        K: ImageSink + ?Sized,
    {
        let (src_width, src_height) = source.dimensions();
        let (src_width, src_height) = (src_width as usize, src_height as usize);
        let (width, height) = self.canvas.sink_dimensions()?;
        sink.write_header(width, height)?;

        let grid = self.tile_grid();
        trace_event!(
            "tiling",
            tiles = grid.len(),
            cols = grid.cols(),
            rows = grid.rows(),
            side = self.tile_side,
            padding = self.padding
        );

        let mut block = PixelBuffer::filled(self.tile_side, self.tile_side, Pixel::WHITE)?;
        for tile in grid.iter() {
            self.process_tile(&tile, source, sink, &mut block, src_width, src_height)?;
        }
        Ok(grid.len())
    }

    fn process_tile<S, K>(
        &self,
        tile: &Tile,
        source: &mut S,
        sink: &mut K,
        block: &mut PixelBuffer,
        src_width: usize,
        src_height: usize,
    ) -> RotozoomResult<()>
    where
        S: ImageSource + ?Sized,
        K: ImageSink + ?Sized,
    {
        let _span = trace_span!("tile", x = tile.origin_x, y = tile.origin_y).entered();
        let visible_width = tile.visible_width(self.canvas);
        let visible_height = tile.visible_height(self.canvas);

        match InputWindow::for_tile(tile, self.canvas, src_width, src_height, self.padding) {
            None => block.fill(Pixel::WHITE),
            Some(window) => {
                trace_debug!(
                    "tile_window",
                    origin_x = window.origin_x,
                    origin_y = window.origin_y,
                    width = window.width,
                    height = window.height
                );
                let mut pixels = PixelBuffer::filled(window.width, window.height, Pixel::WHITE)?;
                source.read_region(&window, &mut pixels)?;
                let access = WindowAccess::new(&window, &pixels, src_width, src_height);
                for ty in 0..visible_height {
                    let row = tile.origin_y + ty;
                    for tx in 0..visible_width {
                        let (u, v) = self.canvas.source_point(tile.origin_x + tx, row);
                        if let Some(out) = block.get_mut(tx, ty) {
                            *out = self.resampler.sample(&access, u, v);
                        }
                    }
                }
            }
        }

        let origin = (u32::try_from(tile.origin_x), u32::try_from(tile.origin_y));
        let (origin_x, origin_y) = match origin {
            (Ok(x), Ok(y)) => (x, y),
            _ => {
                return Err(RotozoomError::InvalidDimensions {
                    width: self.canvas.width(),
                    height: self.canvas.height(),
                })
            }
        };
        let visible = block.view().roi(0, 0, visible_width, visible_height)?;
        sink.write_region(origin_x, origin_y, visible)
    }
}
