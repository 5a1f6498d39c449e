//! Row-band partitioning for parallel rendering.
//!
//! The image is cut into contiguous horizontal bands, one per worker. Bands
//! are disjoint and cover every row, so each worker can own its slice of the
//! frame buffer outright.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::renderer::RayTracer;
use crate::Color;

/// A contiguous range of image rows `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// Index of this band, top to bottom
    pub index: usize,
    /// First row
    pub start: u32,
    /// One past the last row
    pub end: u32,
}

impl RowBand {
    pub fn new(index: usize, start: u32, end: u32) -> Self {
        Self { index, start, end }
    }

    pub fn row_count(&self) -> u32 {
        self.end - self.start
    }

    /// Number of pixels in this band for an image `width` wide.
    pub fn pixel_count(&self, width: u32) -> usize {
        self.row_count() as usize * width as usize
    }

    /// Random stream for this band, independent of which thread runs it.
    pub fn rng(&self, seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed.rotate_left(32) ^ self.index as u64)
    }
}

/// Split `height` rows into `count` bands.
///
/// Band `i` starts at row `i * height / count`. The count is clamped to
/// `[1, height]` so no band is empty.
pub fn generate_bands(height: u32, count: usize) -> Vec<RowBand> {
    if height == 0 {
        return Vec::new();
    }
    let count = count.clamp(1, height as usize) as u64;
    let height = height as u64;

    (0..count)
        .map(|i| {
            let start = (i * height / count) as u32;
            let end = ((i + 1) * height / count) as u32;
            RowBand::new(i as usize, start, end)
        })
        .collect()
}

/// Render one band into `pixels`, its rows in row-major order.
pub fn render_band(band: &RowBand, pixels: &mut [Color], tracer: &RayTracer, camera: &dyn Camera) {
    let width = tracer.width();
    let mut rng = band.rng(tracer.config().seed);

    for (local_y, row) in pixels.chunks_mut(width as usize).enumerate() {
        let y = band.start + local_y as u32;
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = tracer.render_pixel(camera, x as u32, y, &mut rng);
        }
    }

    log::debug!("Band {} done (rows {}..{})", band.index, band.start, band.end);
}
