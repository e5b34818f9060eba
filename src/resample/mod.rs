//! Resampling: interpolation mode selection and per-pixel dispatch.
//!
//! A [`Resampler`] is configured once per run. It owns the Lanczos
//! [`WeightCache`] and evaluates one output pixel from a continuous source
//! point `(u, v)`, where source pixel `i` covers `[i, i + 1)`:
//!
//! - if `floor(u)` or `floor(v)` falls outside the source, the result is
//!   [`Pixel::WHITE`];
//! - otherwise the selected kernel runs at kernel-grid position
//!   `(u - 0.5, v - 0.5)` and reads neighbours through [`PixelAccess`].

use crate::image::border::mirror_index;
use crate::image::{ImageView, Pixel};
use crate::util::RotozoomError;
use std::fmt;
use std::str::FromStr;

pub mod scalar;
pub mod weights;

pub use weights::WeightCache;

/// Largest distance, in pixels, a kernel tap can reach from the sampled
/// position (Lanczos-3 reads `floor - 2 ..= floor + 3`).
pub const MAX_KERNEL_REACH: usize = weights::LANCZOS_RADIUS;

/// Source pixel lookup with the boundary policy applied.
///
/// `col`/`row` are absolute source coordinates and may lie outside the source;
/// implementations mirror them back inside.
pub trait PixelAccess {
    /// Full source extent `(width, height)`.
    fn extent(&self) -> (usize, usize);

    fn pixel(&self, col: i64, row: i64) -> Pixel;
}

/// Mirrored access to a fully resident source image.
#[derive(Clone, Copy, Debug)]
pub struct MirroredView<'a> {
    view: ImageView<'a, Pixel>,
}

impl<'a> MirroredView<'a> {
    pub fn new(view: ImageView<'a, Pixel>) -> Self {
        Self { view }
    }
}

impl PixelAccess for MirroredView<'_> {
    fn extent(&self) -> (usize, usize) {
        (self.view.width(), self.view.height())
    }

    #[inline]
    fn pixel(&self, col: i64, row: i64) -> Pixel {
        let x = mirror_index(col, self.view.width());
        let y = mirror_index(row, self.view.height());
        x.zip(y)
            .and_then(|(x, y)| self.view.get(x, y).copied())
            .unwrap_or(Pixel::WHITE)
    }
}

/// Interpolation kernel used to estimate a pixel at a fractional position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InterpolationMode {
    NearestNeighbour,
    Bilinear,
    #[default]
    Bicubic,
    Lanczos3,
}

impl InterpolationMode {
    pub const ALL: [InterpolationMode; 4] = [
        InterpolationMode::NearestNeighbour,
        InterpolationMode::Bilinear,
        InterpolationMode::Bicubic,
        InterpolationMode::Lanczos3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InterpolationMode::NearestNeighbour => "nearest",
            InterpolationMode::Bilinear => "bilinear",
            InterpolationMode::Bicubic => "bicubic",
            InterpolationMode::Lanczos3 => "lanczos3",
        }
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterpolationMode {
    type Err = RotozoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches("--").to_ascii_lowercase();
        match name.as_str() {
            "nearest" | "nearestneighbour" | "nearest-neighbour" | "nearestneighbor"
            | "nearest-neighbor" => Ok(InterpolationMode::NearestNeighbour),
            "bilinear" => Ok(InterpolationMode::Bilinear),
            "bicubic" => Ok(InterpolationMode::Bicubic),
            "lanczos3" | "lanczos" => Ok(InterpolationMode::Lanczos3),
            _ => Err(RotozoomError::invalid_parameter(format!(
                "unknown interpolation mode `{s}`"
            ))),
        }
    }
}

/// Interpolation strategy selected at configuration time.
#[derive(Clone, Debug)]
pub struct Resampler {
    mode: InterpolationMode,
    weights: WeightCache,
}

impl Resampler {
    pub fn new(mode: InterpolationMode) -> Self {
        Self {
            mode,
            weights: WeightCache::lanczos3(),
        }
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    pub fn weights(&self) -> &WeightCache {
        &self.weights
    }

    /// Evaluates one output pixel at continuous source point `(u, v)`.
    #[inline]
    pub fn sample<A: PixelAccess>(&self, src: &A, u: f64, v: f64) -> Pixel {
        let (width, height) = src.extent();
        if !inside_source(u, width) || !inside_source(v, height) {
            return Pixel::WHITE;
        }

        let x = u - 0.5;
        let y = v - 0.5;
        match self.mode {
            InterpolationMode::NearestNeighbour => scalar::sample_nearest(src, u, v),
            InterpolationMode::Bilinear => scalar::sample_bilinear(src, x, y),
            InterpolationMode::Bicubic => scalar::sample_bicubic(src, x, y),
            InterpolationMode::Lanczos3 => scalar::sample_lanczos3(src, &self.weights, x, y),
        }
    }
}

#[inline]
fn inside_source(coord: f64, limit: usize) -> bool {
    coord.is_finite() && coord >= 0.0 && coord.floor() < limit as f64
}

#[cfg(test)]
mod tests {
    use super::{InterpolationMode, MirroredView, PixelAccess, Resampler};
    use crate::image::{Pixel, PixelBuffer};

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| Pixel::new((x * 40) as u8, (y * 40) as u8, 7)))
            .collect();
        PixelBuffer::from_vec(data, width, height).unwrap()
    }

    #[test]
    fn mode_names_parse_and_print() {
        for mode in InterpolationMode::ALL {
            assert_eq!(mode.to_string().parse::<InterpolationMode>().unwrap(), mode);
        }
        assert_eq!(
            "--nearestNeighbour".parse::<InterpolationMode>().unwrap(),
            InterpolationMode::NearestNeighbour
        );
        assert!("bogus".parse::<InterpolationMode>().is_err());
    }

    #[test]
    fn mirrored_view_reflects_both_axes() {
        let buf = gradient(3, 2);
        let access = MirroredView::new(buf.view());
        assert_eq!(access.pixel(-1, 0), buf.get(0, 0).unwrap());
        assert_eq!(access.pixel(3, 0), buf.get(2, 0).unwrap());
        assert_eq!(access.pixel(1, -2), buf.get(1, 1).unwrap());
        assert_eq!(access.pixel(1, 2), buf.get(1, 1).unwrap());
    }

    #[test]
    fn points_outside_source_get_default_fill() {
        let buf = gradient(4, 4);
        let access = MirroredView::new(buf.view());
        for mode in InterpolationMode::ALL {
            let resampler = Resampler::new(mode);
            assert_eq!(resampler.sample(&access, -0.01, 1.0), Pixel::WHITE);
            assert_eq!(resampler.sample(&access, 1.0, 4.0), Pixel::WHITE);
            assert_eq!(resampler.sample(&access, f64::NAN, 1.0), Pixel::WHITE);
        }
    }

    #[test]
    fn pixel_centers_reproduce_source_for_every_mode() {
        let buf = gradient(5, 4);
        let access = MirroredView::new(buf.view());
        for mode in InterpolationMode::ALL {
            let resampler = Resampler::new(mode);
            for y in 0..4 {
                for x in 0..5 {
                    let got = resampler.sample(&access, x as f64 + 0.5, y as f64 + 0.5);
                    assert_eq!(got, buf.get(x, y).unwrap(), "{mode} at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn bilinear_midpoint_averages_neighbours() {
        let data = vec![Pixel::new(0, 0, 0), Pixel::new(200, 100, 50)];
        let buf = PixelBuffer::from_vec(data, 2, 1).unwrap();
        let access = MirroredView::new(buf.view());
        let resampler = Resampler::new(InterpolationMode::Bilinear);
        assert_eq!(resampler.sample(&access, 1.0, 0.5), Pixel::new(100, 50, 25));
    }
}
