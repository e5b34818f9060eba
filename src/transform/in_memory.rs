//! Whole-image strategy: load everything, then emit the output row by row.

use crate::codec::{ImageSink, ImageSource};
use crate::geometry::Canvas;
use crate::image::{Pixel, PixelBuffer};
use crate::resample::{MirroredView, Resampler};
use crate::trace::{trace_event, trace_span};
use crate::util::RotozoomResult;

/// Transformer that keeps the full source resident.
#[derive(Clone, Copy, Debug)]
pub struct InMemoryTransformer<'a> {
    canvas: &'a Canvas,
    resampler: &'a Resampler,
}

impl<'a> InMemoryTransformer<'a> {
    pub fn new(canvas: &'a Canvas, resampler: &'a Resampler) -> Self {
        Self { canvas, resampler }
    }

    /// Loads `source` completely, then writes every output row to `sink`.
    ///
    /// Nothing is written if loading fails.
    pub fn run<S, K>(&self, source: &mut S, sink: &mut K) -> RotozoomResult<()>
    where
        S: ImageSource + ?Sized,
        K: ImageSink + ?Sized,
    {
        self.canvas.sink_dimensions()?;
        let image = load_source(source)?;
        self.write_output(&image, sink)
    }

    /// Resamples `image` onto the canvas and streams the rows into `sink`.
    pub fn write_output<K>(&self, image: &PixelBuffer, sink: &mut K) -> RotozoomResult<()>
    where
        K: ImageSink + ?Sized,
    {
        let (width, height) = self.canvas.sink_dimensions()?;
        let _span = trace_span!("resample_rows", rows = height).entered();
        let access = MirroredView::new(image.view());
        sink.write_header(width, height)?;

        let mut row_pixels = vec![Pixel::WHITE; self.canvas.width()];
        for row in 0..height {
            for (col, out) in row_pixels.iter_mut().enumerate() {
                let (u, v) = self.canvas.source_point(col, row as usize);
                *out = self.resampler.sample(&access, u, v);
            }
            sink.write_row(row, &row_pixels)?;
        }
        Ok(())
    }
}

/// Reads every row of `source` into a new buffer.
pub fn load_source<S>(source: &mut S) -> RotozoomResult<PixelBuffer>
where
    S: ImageSource + ?Sized,
{
    let (width, height) = source.dimensions();
    let _span = trace_span!("load_source", width = width, height = height).entered();
    let mut image = PixelBuffer::filled(width as usize, height as usize, Pixel::WHITE)?;
    for row in 0..height {
        if let Some(dst) = image.row_mut(row as usize) {
            source.read_row(row, dst)?;
        }
    }
    trace_event!("source_loaded", pixels = image.data().len());
    Ok(image)
}
