//! Affine geometry for rotation with zoom.
//!
//! Coordinates are continuous, with the y axis pointing down the image rows.
//! The forward mapping takes a source point to the output canvas:
//!
//! ```text
//! x' =  z*cos(t)*x + z*sin(t)*y + tx
//! y' = -z*sin(t)*x + z*cos(t)*y + ty
//! ```
//!
//! The inverse mapping undoes it exactly for the same `(tx, ty)`. Only
//! [`canvas::Canvas`] hands out transforms with a non-zero translation, so the
//! transformers cannot pair an inverse with a mismatched translation.

pub mod canvas;
pub mod tile;

pub use canvas::{compute_canvas, Canvas, SNAP_EPS};
pub use tile::{InputWindow, Tile, TileGrid, MIN_PADDING};

/// Rotation by `angle` radians, uniform zoom, then translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    angle: f64,
    zoom: f64,
    sin: f64,
    cos: f64,
    translate_x: f64,
    translate_y: f64,
}

impl AffineTransform {
    /// Creates a transform without translation.
    ///
    /// `zoom` must be positive and finite; callers validate it
    /// (see [`crate::transform::TransformConfig::validate`]).
    pub fn new(angle: f64, zoom: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            angle,
            zoom,
            sin,
            cos,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    /// Creates a transform from an angle in degrees.
    pub fn from_degrees(angle_deg: f64, zoom: f64) -> Self {
        Self::new(angle_deg.to_radians(), zoom)
    }

    pub(crate) fn with_translation(self, translate_x: f64, translate_y: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            ..self
        }
    }

    /// Rotation angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Returns `(translate_x, translate_y)`.
    pub fn translation(&self) -> (f64, f64) {
        (self.translate_x, self.translate_y)
    }

    /// Maps a source point to the output canvas.
    #[inline]
    pub fn forward(&self, x: f64, y: f64) -> (f64, f64) {
        let zc = self.zoom * self.cos;
        let zs = self.zoom * self.sin;
        (
            zc * x + zs * y + self.translate_x,
            -zs * x + zc * y + self.translate_y,
        )
    }

    /// Maps an output canvas point back to the source.
    #[inline]
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.translate_x;
        let dy = y - self.translate_y;
        (
            (self.cos * dx - self.sin * dy) / self.zoom,
            (self.sin * dx + self.cos * dy) / self.zoom,
        )
    }
}
