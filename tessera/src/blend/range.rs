//! Global intensity ranges of image-backed sources.

use rayon::prelude::*;

use super::source::BlendSource;
use crate::math::statistics::min_max_finite;

/// Inclusive `[min, max]` intensity range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityRange {
    pub min: f64,
    pub max: f64,
}

impl IntensityRange {
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Ranges keyed by source index. Computed once before blending and read-only after.
///
/// Generic sources and image sources without a finite sample have no entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeTable {
    ranges: Vec<Option<IntensityRange>>,
}

impl RangeTable {
    /// One pass over each image-backed source's samples. Non-finite samples are ignored.
    pub fn compute(sources: &[BlendSource]) -> Self {
        let ranges = sources
            .par_iter()
            .map(|source| match source {
                BlendSource::Image(image) => {
                    min_max_finite(image.tile().data.pixels()).map(|(min, max)| IntensityRange {
                        min: min as f64,
                        max: max as f64,
                    })
                }
                BlendSource::Generic(_) => None,
            })
            .collect();
        Self { ranges }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<IntensityRange> {
        self.ranges.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
