//! Scalar interpolation kernels.
//!
//! Every kernel takes kernel-grid coordinates `(x, y)` (pixel `i` sits at `i`)
//! and reads its neighbourhood through [`PixelAccess`], which resolves
//! out-of-range taps with the boundary policy.

use crate::image::Pixel;
use crate::resample::weights::WeightCache;
use crate::resample::PixelAccess;
use crate::util::math::round_clamp;

/// Catmull-Rom family parameter of the cubic convolution kernel.
pub const BICUBIC_A: f64 = -0.5;

/// Cubic convolution weight for offset `t` with parameter `a`.
#[inline]
pub fn cubic_weight(t: f64, a: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        (a + 2.0) * t * t * t - (a + 3.0) * t * t + 1.0
    } else if t < 2.0 {
        a * t * t * t - 5.0 * a * t * t + 8.0 * a * t - 4.0 * a
    } else {
        0.0
    }
}

#[inline]
fn accumulate(acc: &mut [f64; 3], pixel: Pixel, weight: f64) {
    acc[0] += weight * f64::from(pixel.red);
    acc[1] += weight * f64::from(pixel.green);
    acc[2] += weight * f64::from(pixel.blue);
}

#[inline]
fn finish(acc: [f64; 3]) -> Pixel {
    Pixel::new(
        round_clamp(acc[0], Pixel::MAX_CHANNEL),
        round_clamp(acc[1], Pixel::MAX_CHANNEL),
        round_clamp(acc[2], Pixel::MAX_CHANNEL),
    )
}

/// Returns the pixel containing the continuous point `(u, v)`.
#[inline]
pub fn sample_nearest<A: PixelAccess>(src: &A, u: f64, v: f64) -> Pixel {
    src.pixel(u.floor() as i64, v.floor() as i64)
}

/// Blends the 2x2 neighbourhood `(floor, ceil)` in each axis.
pub fn sample_bilinear<A: PixelAccess>(src: &A, x: f64, y: f64) -> Pixel {
    let x0 = x.floor();
    let y0 = y.floor();
    let dx = x - x0;
    let dy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);
    let (x1, y1) = (x.ceil() as i64, y.ceil() as i64);

    let mut acc = [0.0f64; 3];
    accumulate(&mut acc, src.pixel(x0, y0), (1.0 - dx) * (1.0 - dy));
    accumulate(&mut acc, src.pixel(x1, y0), dx * (1.0 - dy));
    accumulate(&mut acc, src.pixel(x0, y1), (1.0 - dx) * dy);
    accumulate(&mut acc, src.pixel(x1, y1), dx * dy);
    finish(acc)
}

/// Separable cubic convolution over the 4x4 neighbourhood
/// `floor - 1 ..= floor + 2`.
pub fn sample_bicubic<A: PixelAccess>(src: &A, x: f64, y: f64) -> Pixel {
    let x0 = x.floor();
    let y0 = y.floor();
    let dx = x - x0;
    let dy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let wx: [f64; 4] = std::array::from_fn(|i| cubic_weight(dx - (i as f64 - 1.0), BICUBIC_A));
    let wy: [f64; 4] = std::array::from_fn(|j| cubic_weight(dy - (j as f64 - 1.0), BICUBIC_A));

    let mut acc = [0.0f64; 3];
    for (j, &weight_y) in wy.iter().enumerate() {
        let row = y0 + j as i64 - 1;
        let mut row_acc = [0.0f64; 3];
        for (i, &weight_x) in wx.iter().enumerate() {
            accumulate(&mut row_acc, src.pixel(x0 + i as i64 - 1, row), weight_x);
        }
        for c in 0..3 {
            acc[c] += weight_y * row_acc[c];
        }
    }
    finish(acc)
}

/// Lanczos-3 over the 6x6 neighbourhood `floor - 2 ..= floor + 3`,
/// normalized by the sum of the weights used.
pub fn sample_lanczos3<A: PixelAccess>(src: &A, weights: &WeightCache, x: f64, y: f64) -> Pixel {
    let x0 = x.floor();
    let y0 = y.floor();
    let dx = x - x0;
    let dy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let wx: [f64; 6] = std::array::from_fn(|i| weights.weight(dx - (i as f64 - 2.0)));
    let wy: [f64; 6] = std::array::from_fn(|j| weights.weight(dy - (j as f64 - 2.0)));

    let mut acc = [0.0f64; 3];
    let mut weight_sum = 0.0;
    for (j, &weight_y) in wy.iter().enumerate() {
        let row = y0 + j as i64 - 2;
        for (i, &weight_x) in wx.iter().enumerate() {
            let weight = weight_x * weight_y;
            accumulate(&mut acc, src.pixel(x0 + i as i64 - 2, row), weight);
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return src.pixel(x0, y0);
    }
    finish(acc.map(|v| v / weight_sum))
}
