//! Output tiling and per-tile input windows.
//!
//! The output canvas is cut into `side x side` tiles in raster order. For each
//! tile the source region its pixels can read is the bounding box of the
//! inverse-mapped tile corners, widened by a safety padding and clipped to the
//! source. With padding of at least [`MIN_PADDING`], every kernel tap of every
//! pixel in the tile, after boundary mirroring, lands inside that window.

use crate::geometry::Canvas;
use crate::resample::MAX_KERNEL_REACH;

/// Smallest padding that keeps all kernel footprints inside the window.
pub const MIN_PADDING: usize = MAX_KERNEL_REACH;

/// Square block of the output canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub origin_x: usize,
    pub origin_y: usize,
    pub side: usize,
}

impl Tile {
    /// Width of the tile after dropping columns past the canvas edge.
    pub fn visible_width(&self, canvas: &Canvas) -> usize {
        canvas
            .width()
            .saturating_sub(self.origin_x)
            .min(self.side)
    }

    /// Height of the tile after dropping rows past the canvas edge.
    pub fn visible_height(&self, canvas: &Canvas) -> usize {
        canvas
            .height()
            .saturating_sub(self.origin_y)
            .min(self.side)
    }
}

/// Raster-order tiling of a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    side: usize,
    cols: usize,
    rows: usize,
}

impl TileGrid {
    /// Tiles a `width x height` canvas with `side`-pixel tiles. `side` must be
    /// non-zero.
    pub fn new(width: usize, height: usize, side: usize) -> Self {
        debug_assert!(side > 0, "tile side must be positive");
        Self {
            side,
            cols: width.div_ceil(side),
            rows: height.div_ceil(side),
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of tile columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of tile rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.len()).map(move |i| Tile {
            origin_x: (i % self.cols) * self.side,
            origin_y: (i / self.cols) * self.side,
            side: self.side,
        })
    }
}

/// Source region loaded for one tile, in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputWindow {
    pub origin_x: usize,
    pub origin_y: usize,
    pub width: usize,
    pub height: usize,
}

impl InputWindow {
    /// Derives the padded, clipped source window of `tile`.
    ///
    /// Returns `None` when the padded box misses the source entirely; every
    /// pixel of such a tile maps outside the source.
    pub fn for_tile(
        tile: &Tile,
        canvas: &Canvas,
        src_width: usize,
        src_height: usize,
        padding: usize,
    ) -> Option<Self> {
        let x0 = tile.origin_x as f64;
        let y0 = tile.origin_y as f64;
        let x1 = (tile.origin_x + tile.side) as f64;
        let y1 = (tile.origin_y + tile.side) as f64;
        let transform = canvas.transform();
        let corners = [
            transform.inverse(x0, y0),
            transform.inverse(x1, y0),
            transform.inverse(x0, y1),
            transform.inverse(x1, y1),
        ];

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return None;
        }

        let pad = padding as f64;
        let (col_start, col_end) = clip_span(min_x.floor() - pad, max_x.ceil() + pad, src_width)?;
        let (row_start, row_end) = clip_span(min_y.floor() - pad, max_y.ceil() + pad, src_height)?;
        Some(Self {
            origin_x: col_start,
            origin_y: row_start,
            width: col_end - col_start,
            height: row_end - row_start,
        })
    }

    /// Returns `true` if absolute source pixel `(col, row)` was loaded.
    pub fn contains(&self, col: usize, row: usize) -> bool {
        col >= self.origin_x
            && row >= self.origin_y
            && col - self.origin_x < self.width
            && row - self.origin_y < self.height
    }
}

/// Clips the half-open span `[start, end)` to `[0, limit)`.
fn clip_span(start: f64, end: f64, limit: usize) -> Option<(usize, usize)> {
    let limit_f = limit as f64;
    let start = start.clamp(0.0, limit_f);
    let end = end.clamp(0.0, limit_f);
    if end <= start {
        return None;
    }
    Some((start as usize, end as usize))
}
