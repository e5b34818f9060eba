//! Output canvas sizing.

use crate::geometry::AffineTransform;
use crate::util::math::snap_ceil;
use crate::util::{RotozoomError, RotozoomResult};

pub use crate::util::math::SNAP_EPS;

/// Output canvas: its size and the transform that maps the source onto it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    transform: AffineTransform,
}

impl Canvas {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The forward/inverse mapping with the canvas translation baked in.
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    /// Returns `(width, height)` in the `u32` range image sinks address.
    ///
    /// Fails with [`RotozoomError::InvalidDimensions`] when either side does
    /// not fit, so oversized canvases are rejected before any header is
    /// written.
    pub fn sink_dimensions(&self) -> RotozoomResult<(u32, u32)> {
        match (u32::try_from(self.width), u32::try_from(self.height)) {
            (Ok(width), Ok(height)) => Ok((width, height)),
            _ => Err(RotozoomError::InvalidDimensions {
                width: self.width,
                height: self.height,
            }),
        }
    }

    /// Inverse-maps the center of output pixel `(col, row)` into continuous
    /// source coordinates, where source pixel `i` covers `[i, i + 1)`.
    #[inline]
    pub fn source_point(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.inverse(col as f64 + 0.5, row as f64 + 0.5)
    }
}

/// Computes the smallest axis-aligned canvas containing a `src_width x
/// src_height` source rotated by `angle` radians and scaled by `zoom`.
///
/// The four source corners are forward-mapped without translation; the canvas
/// is the ceiling of their bounding-box extent and the translation moves the
/// box minimum to the origin. Extents within a nanopixel of an integer snap to
/// it, so exact quarter turns keep their size. A non-empty source always gets
/// at least a 1x1 canvas.
///
/// Because of that snapping, forward-mapped source corners lie in
/// `[0, width] x [0, height]` only up to [`SNAP_EPS`]: an extent of
/// `10 + 1e-10` yields a width of 10 with one corner at `10 + 1e-10`.
pub fn compute_canvas(src_width: usize, src_height: usize, angle: f64, zoom: f64) -> Canvas {
    let base = AffineTransform::new(angle, zoom);
    let w = src_width as f64;
    let h = src_height as f64;
    let corners = [
        base.forward(0.0, 0.0),
        base.forward(0.0, h),
        base.forward(w, 0.0),
        base.forward(w, h),
    ];

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (x, y) in corners {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let min_side = usize::from(src_width > 0 && src_height > 0);
    let width = (snap_ceil(max_x - min_x) as usize).max(min_side);
    let height = (snap_ceil(max_y - min_y) as usize).max(min_side);

    Canvas {
        width,
        height,
        transform: base.with_translation(-min_x, -min_y),
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_canvas, SNAP_EPS};
    use crate::util::RotozoomError;

    #[test]
    fn identity_keeps_size_and_has_no_translation() {
        let canvas = compute_canvas(120, 80, 0.0, 1.0);
        assert_eq!((canvas.width(), canvas.height()), (120, 80));
        let (tx, ty) = canvas.transform().translation();
        assert_eq!(tx, 0.0);
        assert_eq!(ty, 0.0);
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let canvas = compute_canvas(100, 50, 90f64.to_radians(), 1.0);
        assert_eq!((canvas.width(), canvas.height()), (50, 100));
    }

    #[test]
    fn zoom_scales_extent() {
        let canvas = compute_canvas(10, 20, 0.0, 2.5);
        assert_eq!((canvas.width(), canvas.height()), (25, 50));
    }

    #[test]
    fn near_integer_extent_snaps_within_tolerance() {
        let zoom = 1.0 + 1e-11;
        let canvas = compute_canvas(10, 10, 0.0, zoom);
        assert_eq!((canvas.width(), canvas.height()), (10, 10));
        let (x, y) = canvas.transform().forward(10.0, 10.0);
        assert!(x > 10.0 && x - 10.0 <= SNAP_EPS, "{x}");
        assert!(y > 10.0 && y - 10.0 <= SNAP_EPS, "{y}");
    }

    #[test]
    fn sink_dimensions_reject_oversized_canvas() {
        let canvas = compute_canvas(u32::MAX as usize, 1, 0.0, 2.0);
        assert_eq!(canvas.width(), 2 * u32::MAX as usize);
        assert!(matches!(
            canvas.sink_dimensions(),
            Err(RotozoomError::InvalidDimensions { height: 2, .. })
        ));
        assert_eq!(compute_canvas(7, 3, 0.0, 1.0).sink_dimensions().unwrap(), (7, 3));
    }

    #[test]
    fn diagonal_rotation_grows_canvas() {
        let canvas = compute_canvas(100, 100, 45f64.to_radians(), 1.0);
        assert_eq!((canvas.width(), canvas.height()), (142, 142));
    }
}
