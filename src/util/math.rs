//! Small numeric helpers shared by the geometry and resampling code.

/// Tolerance used when snapping floating-point extents to whole pixels.
pub const SNAP_EPS: f64 = 1e-9;

/// Rounds `value` up to the next integer, treating values within
/// [`SNAP_EPS`] of an integer as that integer.
pub(crate) fn snap_ceil(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() <= SNAP_EPS {
        nearest
    } else {
        value.ceil()
    }
}

/// Rounds a channel estimate to the nearest integer and clamps it into
/// `[0, max]`.
#[inline]
pub(crate) fn round_clamp(value: f64, max: u8) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(max)) as u8
}

#[cfg(test)]
mod tests {
    use super::{round_clamp, snap_ceil};

    #[test]
    fn snap_ceil_absorbs_round_off() {
        assert_eq!(snap_ceil(4.000_000_000_01), 4.0);
        assert_eq!(snap_ceil(3.999_999_999_99), 4.0);
        assert_eq!(snap_ceil(4.2), 5.0);
        assert_eq!(snap_ceil(0.0), 0.0);
    }

    #[test]
    fn round_clamp_saturates() {
        assert_eq!(round_clamp(-12.0, 255), 0);
        assert_eq!(round_clamp(300.0, 255), 255);
        assert_eq!(round_clamp(127.5, 255), 128);
        assert_eq!(round_clamp(f64::NAN, 255), 0);
    }
}
