//! Quantized Lanczos-3 weight table.

use std::f64::consts::PI;

/// Lanczos window radius.
pub const LANCZOS_RADIUS: usize = 3;

/// Number of table entries covering `[-3, 3)`.
pub const WEIGHT_CACHE_SIZE: usize = 600;

/// Normalized sinc, `sin(pi x) / (pi x)`.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let pi_x = PI * x;
    pi_x.sin() / pi_x
}

/// Lanczos-3 kernel `sinc(x) * sinc(x / 3)` on `|x| < 3`, zero elsewhere.
#[inline]
pub fn lanczos3(x: f64) -> f64 {
    let radius = LANCZOS_RADIUS as f64;
    if x.abs() >= radius {
        return 0.0;
    }
    sinc(x) * sinc(x / radius)
}

/// Precomputed Lanczos-3 weights sampled every `6 / WEIGHT_CACHE_SIZE` pixels.
///
/// The table is built once, up front, and only read afterwards; share it by
/// reference between every resampling call of a run.
#[derive(Clone, Debug)]
pub struct WeightCache {
    table: Box<[f64]>,
}

impl WeightCache {
    pub fn lanczos3() -> Self {
        let radius = LANCZOS_RADIUS as f64;
        let span = 2.0 * radius;
        let table = (0..WEIGHT_CACHE_SIZE)
            .map(|i| lanczos3(i as f64 * span / WEIGHT_CACHE_SIZE as f64 - radius))
            .collect();
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Looks up the weight for offset `t`, quantized to the nearest table
    /// entry. Offsets outside `(-3, 3)` weigh zero.
    #[inline]
    pub fn weight(&self, t: f64) -> f64 {
        let radius = LANCZOS_RADIUS as f64;
        if !(t > -radius && t < radius) {
            return 0.0;
        }
        let step = 2.0 * radius / self.table.len() as f64;
        let idx = ((t + radius) / step).round() as usize;
        self.table[idx.min(self.table.len() - 1)]
    }
}

impl Default for WeightCache {
    fn default() -> Self {
        Self::lanczos3()
    }
}
