//! N-ary spatial blending.
//!
//! Every output sample is the mean of the sources that are valid at its
//! physical position. A value is valid when the source contains the point,
//! produces a finite value, and (for image-backed sources) the value lies in
//! that source's global intensity range. Out-of-range values are dropped,
//! never clamped. Samples no source can evaluate keep the fill value.

mod range;
mod source;


use common::Buffer2;
use common::parallel::ParRowsMutAuto;
use glam::DVec2;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::progress::{ProgressCallback, ProgressCounter, StitchStage};
use crate::tile::{PhysicalBounds, Tile};

pub use range::{IntensityRange, RangeTable};
pub use source::{BlendSource, ImageSource, SpatialSource};

/// Slack when converting a physical extent to a sample count, so an extent
/// that is a whole number of samples up to rounding does not gain a sample.
const EXTENT_EPSILON: f64 = 1e-9;

/// Output sampling grid. Sample `(x, y)` sits at `origin + (x, y) * spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendGrid {
    pub width: usize,
    pub height: usize,
    pub spacing: DVec2,
    pub origin: DVec2,
}

impl BlendGrid {
    /// Grid with `spacing` covering the union of all source bounds.
    pub fn covering(sources: &[BlendSource], spacing: DVec2) -> Result<Self> {
        if !(spacing.is_finite() && spacing.x > 0.0 && spacing.y > 0.0) {
            return Err(Error::InvalidSpacing { spacing });
        }
        let bounds = sources
            .iter()
            .map(|s| s.as_source().bounds())
            .reduce(|a, b| a.union(&b))
            .ok_or(Error::NoTiles)?;

        let samples = (bounds.extent() / spacing - EXTENT_EPSILON).ceil().max(DVec2::ZERO);
        if !samples.is_finite() {
            return Err(Error::EmptyGrid {
                width: 0,
                height: 0,
            });
        }
        Ok(Self {
            width: samples.x as usize,
            height: samples.y as usize,
            spacing,
            origin: bounds.min + spacing * 0.5,
        })
    }

    #[inline]
    pub fn point(&self, x: usize, y: usize) -> DVec2 {
        self.origin + DVec2::new(x as f64, y as f64) * self.spacing
    }

    pub fn bounds(&self) -> PhysicalBounds {
        let half = self.spacing * 0.5;
        let size = DVec2::new(self.width as f64, self.height as f64);
        PhysicalBounds {
            min: self.origin - half,
            max: self.origin + size * self.spacing - half,
        }
    }
}

/// Blend `sources` onto `grid`. Uncovered samples get `fill_value`.
///
/// Ranges are computed for every image source before any output sample is
/// evaluated. Rows are evaluated in parallel; each sample visits sources in
/// order, so reruns are bit-identical.
pub fn blend_sources(
    sources: &[BlendSource],
    grid: &BlendGrid,
    fill_value: f32,
    progress: &ProgressCallback,
) -> Result<Tile> {
    if sources.is_empty() {
        return Err(Error::NoTiles);
    }
    if grid.width == 0 || grid.height == 0 {
        return Err(Error::EmptyGrid {
            width: grid.width,
            height: grid.height,
        });
    }

    let ranges = RangeTable::compute(sources);

    let mut data = Buffer2::new_filled(grid.width, grid.height, fill_value);
    let counter = ProgressCounter::new(progress, grid.height, StitchStage::Blending);
    let width = grid.width;

    data.pixels_mut()
        .par_rows_mut_auto(width)
        .for_each(|(start_row, chunk)| {
            let rows = chunk.len() / width;
            for (local_y, row) in chunk.chunks_mut(width).enumerate() {
                let y = start_row + local_y;
                for (x, out) in row.iter_mut().enumerate() {
                    if let Some(v) = blend_at(sources, &ranges, grid.point(x, y)) {
                        *out = v as f32;
                    }
                }
            }
            counter.advance(rows);
        });

    tracing::debug!(
        sources = sources.len(),
        width = grid.width,
        height = grid.height,
        "Blended sources"
    );

    Ok(Tile::new(data, grid.spacing, grid.origin))
}

/// Mean of the valid source values at `p`, or `None` if there are none.
pub fn blend_at(sources: &[BlendSource], ranges: &RangeTable, p: DVec2) -> Option<f64> {
    if !sources.iter().any(|s| s.as_source().is_evaluable_at(p)) {
        return None;
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for (index, source) in sources.iter().enumerate() {
        let s = source.as_source();
        if !s.is_inside(p) {
            continue;
        }
        let Some(v) = s.value_at(p) else {
            continue;
        };
        if !v.is_finite() {
            continue;
        }
        if let BlendSource::Image(_) = source
            && !ranges.get(index).is_some_and(|r| r.contains(v))
        {
            continue;
        }
        sum += v;
        count += 1;
    }

    match count {
        0 => None,
        1 => Some(sum),
        n => Some(sum / n as f64),
    }
}
