//! Rotate-and-zoom pipelines.
//!
//! [`transform`] validates the configuration, sizes the output canvas from the
//! source extent, builds the [`Resampler`] once and hands everything to the
//! selected strategy:
//!
//! - [`Strategy::InMemory`] keeps the whole source resident and emits the
//!   output row by row;
//! - [`Strategy::Tiled`] keeps only one padded source window and one output
//!   tile resident at a time, using random-access reads and writes.
//!
//! Both strategies evaluate each output pixel with the same absolute inverse
//! mapping and the same boundary policy, so their outputs are identical.

use crate::codec::{ImageSink, ImageSource};
use crate::geometry::{compute_canvas, Canvas, MIN_PADDING};
use crate::resample::{InterpolationMode, Resampler};
use crate::trace::{trace_event, trace_span};
use crate::util::{RotozoomError, RotozoomResult};
use std::fmt;
use std::str::FromStr;

pub mod in_memory;
pub mod tiled;

pub use in_memory::InMemoryTransformer;
pub use tiled::TiledTransformer;

/// Default output tile side, in pixels.
pub const DEFAULT_TILE_SIDE: usize = 100;
/// Default safety padding around each tile's input window.
pub const DEFAULT_PADDING: usize = 5;

/// Execution strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    #[default]
    InMemory,
    Tiled,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::InMemory => "in-memory",
            Strategy::Tiled => "tiled",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = RotozoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-memory" | "in_memory" | "inmemory" | "memory" => Ok(Strategy::InMemory),
            "tiled" | "tile" => Ok(Strategy::Tiled),
            _ => Err(RotozoomError::invalid_parameter(format!(
                "unknown strategy `{s}`"
            ))),
        }
    }
}

/// Parameters of one transform run.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformConfig {
    /// Rotation angle in degrees; positive turns the image counter-clockwise.
    pub angle_deg: f64,
    /// Uniform scale factor, strictly positive.
    pub zoom: f64,
    pub mode: InterpolationMode,
    pub strategy: Strategy,
    /// Side of the square output tiles (tiled strategy only).
    pub tile_side: usize,
    /// Extra source pixels loaded around each tile's window (tiled strategy
    /// only). At least [`MIN_PADDING`].
    pub padding: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            zoom: 1.0,
            mode: InterpolationMode::default(),
            strategy: Strategy::default(),
            tile_side: DEFAULT_TILE_SIDE,
            padding: DEFAULT_PADDING,
        }
    }
}

impl TransformConfig {
    /// Rejects parameters the engine cannot honour. Runs before any I/O.
    pub fn validate(&self) -> RotozoomResult<()> {
        if !self.angle_deg.is_finite() {
            return Err(RotozoomError::invalid_parameter(format!(
                "angle must be finite, got {}",
                self.angle_deg
            )));
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(RotozoomError::invalid_parameter(format!(
                "zoom must be > 0, got {}",
                self.zoom
            )));
        }
        if self.tile_side == 0 {
            return Err(RotozoomError::invalid_parameter("tile side must be at least 1"));
        }
        if self.padding < MIN_PADDING {
            return Err(RotozoomError::invalid_parameter(format!(
                "padding must be at least {MIN_PADDING}, got {}",
                self.padding
            )));
        }
        Ok(())
    }

    /// Sizes the output canvas for a `width x height` source.
    pub fn canvas_for(&self, width: usize, height: usize) -> Canvas {
        compute_canvas(width, height, self.angle_deg.to_radians(), self.zoom)
    }
}

/// Summary of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformReport {
    pub source_width: usize,
    pub source_height: usize,
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Tiles processed; zero for the in-memory strategy.
    pub tiles: usize,
}

/// Rotates and zooms `source` into `sink`.
///
/// Parameter errors surface before any I/O. Any later read or write failure
/// aborts the run; with the tiled strategy, tiles written before the failure
/// stay in the sink.
pub fn transform<S, K>(
    source: &mut S,
    sink: &mut K,
    config: &TransformConfig,
) -> RotozoomResult<TransformReport>
where
    S: ImageSource + ?Sized,
    K: ImageSink + ?Sized,
{
    config.validate()?;
    let _span = trace_span!(
        "transform",
        angle_deg = config.angle_deg,
        zoom = config.zoom,
        mode = config.mode.as_str(),
        strategy = config.strategy.as_str()
    )
    .entered();

    let (width, height) = source.dimensions();
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Err(RotozoomError::source_format(format!(
            "empty source image {width}x{height}"
        )));
    }

    let canvas = config.canvas_for(width, height);
    canvas.sink_dimensions()?;
    trace_event!(
        "canvas",
        source_width = width,
        source_height = height,
        canvas_width = canvas.width(),
        canvas_height = canvas.height()
    );

    let resampler = Resampler::new(config.mode);
    let tiles = match config.strategy {
        Strategy::InMemory => {
            InMemoryTransformer::new(&canvas, &resampler).run(source, sink)?;
            0
        }
        Strategy::Tiled => {
            TiledTransformer::new(&canvas, &resampler, config.tile_side, config.padding)
                .run(source, sink)?
        }
    };

    Ok(TransformReport {
        source_width: width,
        source_height: height,
        canvas_width: canvas.width(),
        canvas_height: canvas.height(),
        tiles,
    })
}
