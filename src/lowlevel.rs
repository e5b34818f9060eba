//! Low-level building blocks for custom rotate/zoom pipelines.
//!
//! These expose the boundary policy, kernel weights, per-sample kernels and
//! tile geometry used by the built-in strategies. Most users should prefer
//! the top-level [`crate::transform`] entry point.

pub use crate::geometry::{InputWindow, Tile, TileGrid, MIN_PADDING};
pub use crate::image::border::mirror_index;
pub use crate::resample::scalar::{
    cubic_weight, sample_bicubic, sample_bilinear, sample_lanczos3, sample_nearest, BICUBIC_A,
};
pub use crate::resample::weights::{lanczos3, sinc, LANCZOS_RADIUS, WEIGHT_CACHE_SIZE};
pub use crate::resample::{MirroredView, PixelAccess, WeightCache, MAX_KERNEL_REACH};
pub use crate::transform::in_memory::{load_source, InMemoryTransformer};
pub use crate::transform::tiled::{TiledTransformer, WindowAccess};
