//! Photometric pre-processing applied to frames before stitching.
//!
//! Median windows are `(2r + 1) × (2r + 1)` with clamp-to-edge sampling, so
//! border samples see replicated edge values rather than a shrunken window.


use common::Buffer2;
use common::parallel::{ParRowsMutAuto, ParRowsZip};
use rayon::prelude::*;

use crate::math::statistics::median_f32_mut;
use crate::progress::{ProgressCallback, ProgressCounter, StitchStage};

/// Thresholded median filter parameters.
///
/// Samples with `lower < v <= upper` are trusted; all others are replaced by
/// their neighbourhood median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianConfig {
    /// Window half-size in samples.
    pub radius: usize,
    /// Exclusive lower bound of trusted values.
    pub lower: f32,
    /// Inclusive upper bound of trusted values.
    pub upper: f32,
    /// Number of passes.
    pub iterations: usize,
}

impl Default for MedianConfig {
    fn default() -> Self {
        Self {
            radius: 3,
            lower: 0.0,
            upper: 1.0,
            iterations: 1,
        }
    }
}

impl MedianConfig {
    /// Trusted interval `(lower, upper]`.
    pub fn with_thresholds(mut self, lower: f32, upper: f32) -> Self {
        assert!(lower < upper, "lower threshold must be below upper");
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        assert!(radius > 0, "radius must be at least 1");
        self.radius = radius;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        assert!(iterations > 0, "iterations must be at least 1");
        self.iterations = iterations;
        self
    }

    #[inline]
    fn trusts(&self, v: f32) -> bool {
        self.lower < v && v <= self.upper
    }
}

/// `-ln(v)` per sample. Non-positive samples map to 0.
///
/// Converts transmitted intensity into line integrals.
pub fn neg_log_checked(image: &Buffer2<f32>, progress: &ProgressCallback) -> Buffer2<f32> {
    let width = image.width();
    let counter = ProgressCounter::new(progress, image.height(), StitchStage::Filtering);
    let mut out = Buffer2::new_default(width, image.height());
    out.pixels_mut()
        .par_rows_zip(image.pixels(), width)
        .for_each(|(_, dst, src)| {
            for (d, &v) in dst.iter_mut().zip(src) {
                *d = if v > 0.0 { -v.ln() } else { 0.0 };
            }
            counter.advance(dst.len() / width);
        });
    out
}

/// Replace every untrusted sample with its neighbourhood median, repeated
/// `config.iterations` times. Each pass reads only the previous pass.
pub fn thresholded_median(
    image: &Buffer2<f32>,
    config: &MedianConfig,
    progress: &ProgressCallback,
) -> Buffer2<f32> {
    let mut current = image.clone();
    for iteration in 0..config.iterations {
        let counter = ProgressCounter::new(progress, image.height(), StitchStage::Filtering);
        current = filter_rows(&current, config.radius, &counter, |src, x, y| {
            !config.trusts(src[(x, y)])
        });
        tracing::debug!(iteration, radius = config.radius, "Thresholded median pass");
    }
    current
}

/// 1 where a sample lies outside `(lower, upper]`, else 0.
pub fn threshold_mask(
    image: &Buffer2<f32>,
    lower: f32,
    upper: f32,
    progress: &ProgressCallback,
) -> Buffer2<u8> {
    let width = image.width();
    let counter = ProgressCounter::new(progress, image.height(), StitchStage::Filtering);
    let mut mask = Buffer2::new_default(width, image.height());
    mask.pixels_mut()
        .par_rows_zip(image.pixels(), width)
        .for_each(|(_, dst, src)| {
            for (m, &v) in dst.iter_mut().zip(src) {
                *m = u8::from(!(lower < v && v <= upper));
            }
            counter.advance(dst.len() / width);
        });
    mask
}

/// Median replacement of the samples where `mask` is non-zero.
///
/// # Panics
/// If `mask` and `image` differ in size.
pub fn masked_median(
    image: &Buffer2<f32>,
    mask: &Buffer2<u8>,
    radius: usize,
    progress: &ProgressCallback,
) -> Buffer2<f32> {
    assert_eq!(
        (mask.width(), mask.height()),
        (image.width(), image.height()),
        "mask must match image size"
    );
    let counter = ProgressCounter::new(progress, image.height(), StitchStage::Filtering);
    filter_rows(image, radius, &counter, |_, x, y| mask[(x, y)] != 0)
}

/// Copy `src`, replacing samples selected by `replace` with their window median.
fn filter_rows<F>(
    src: &Buffer2<f32>,
    radius: usize,
    counter: &ProgressCounter<'_>,
    replace: F,
) -> Buffer2<f32>
where
    F: Fn(&Buffer2<f32>, usize, usize) -> bool + Sync,
{
    let width = src.width();
    let side = 2 * radius + 1;
    let mut out = src.clone();

    out.pixels_mut()
        .par_rows_mut_auto(width)
        .for_each(|(start_row, chunk)| {
            let mut window = Vec::with_capacity(side * side);
            for (local_y, row) in chunk.chunks_mut(width).enumerate() {
                let y = start_row + local_y;
                for (x, v) in row.iter_mut().enumerate() {
                    if replace(src, x, y) {
                        *v = window_median(src, x, y, radius, &mut window);
                    }
                }
            }
            counter.advance(chunk.len() / width);
        });

    out
}

/// Median of the clamp-to-edge window around `(x, y)`.
fn window_median(
    src: &Buffer2<f32>,
    x: usize,
    y: usize,
    radius: usize,
    window: &mut Vec<f32>,
) -> f32 {
    let max_x = src.width() - 1;
    let max_y = src.height() - 1;
    let r = radius as isize;

    window.clear();
    for dy in -r..=r {
        let ny = (y as isize + dy).clamp(0, max_y as isize) as usize;
        let row = src.row(ny);
        for dx in -r..=r {
            let nx = (x as isize + dx).clamp(0, max_x as isize) as usize;
            window.push(row[nx]);
        }
    }
    median_f32_mut(window)
}
