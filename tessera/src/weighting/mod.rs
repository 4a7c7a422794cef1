//! Photometric blend weights for vertically overlapping tiles.
//!
//! For each adjacent pair (tile `i` lower, tile `i + 1` placed `shift` rows
//! further along), the overlap band is rows `[shift, height)` of tile `i` and
//! rows `[0, overlap)` of tile `i + 1`. Every column gets a reference level
//! `N` from the tiles' exclusive rows, and every overlap row gets a pair of
//! scale factors that make the rescaled sum of the two samples equal `N`.

use std::ops::Range;

use common::Buffer2;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::math::statistics::column_means;
use crate::progress::{ProgressCallback, ProgressCounter, StitchStage};
use crate::tile::{Tile, check_uniform};


/// Weight applied where no credible overlap signal exists.
pub const NEUTRAL_WEIGHT: f32 = 1.0;

/// `lo` values this close to 1 use the closed-form limit of the general expression.
const UNIT_RATIO_TOLERANCE: f64 = 1e-9;

/// Scale factors for one overlapping sample pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendCoefficients {
    /// Applied to the lower tile's sample (alpha).
    pub lower: f64,
    /// Applied to the upper tile's sample (beta).
    pub upper: f64,
}

/// Derive blend coefficients for samples `v1` (lower tile) and `v2` (upper
/// tile) against the column reference `n`.
///
/// Returns `None` when the pair carries no credible overlap signal: `n`, `v1`
/// or `v2` non-positive, or `v1 + v2 <= n`. NaN inputs also yield `None`.
///
/// With `hi = max(v1, v2) / n` and `lo = min(v1, v2) / n`:
///
/// ```text
/// B     = (1 - sqrt((hi + lo - 1) / (hi * lo))) / (1 - lo) * hi    (lo != 1)
/// B     = (1 - hi) / 2                                             (lo == 1)
/// alpha = 1 / (hi + B * lo)
/// beta  = B * alpha
/// ```
///
/// `alpha` goes to the larger sample. The rescaled sum
/// `lower * v1 + upper * v2` equals `n`.
pub fn blend_coefficients(v1: f64, v2: f64, n: f64) -> Option<BlendCoefficients> {
    if !(n > 0.0 && v1 > 0.0 && v2 > 0.0 && v1 + v2 > n) {
        return None;
    }

    let hi = v1.max(v2) / n;
    let lo = v1.min(v2) / n;

    let b = if (lo - 1.0).abs() < UNIT_RATIO_TOLERANCE {
        (1.0 - hi) * 0.5
    } else {
        (1.0 - ((hi + lo - 1.0) / (hi * lo)).sqrt()) / (1.0 - lo) * hi
    };
    let alpha = 1.0 / (hi + b * lo);
    let beta = b * alpha;

    if !(alpha.is_finite() && beta.is_finite()) {
        return None;
    }

    Some(if v1 > v2 {
        BlendCoefficients {
            lower: alpha,
            upper: beta,
        }
    } else {
        BlendCoefficients {
            lower: beta,
            upper: alpha,
        }
    })
}

/// Rows of tile `index` (of `count`) that lie in no overlap band.
///
/// Falls back to the whole tile when the bands cover every row.
pub fn exclusive_rows(
    index: usize,
    count: usize,
    height: usize,
    shift_pixels: usize,
) -> Range<usize> {
    let overlap = height.saturating_sub(shift_pixels);
    let start = if index > 0 { overlap } else { 0 };
    let end = if index + 1 < count { shift_pixels.min(height) } else { height };
    if start < end { start..end } else { 0..height }
}

/// Per-column reference level `N = 0.5 * (mean_lower + mean_upper)`.
pub fn column_reference(lower_means: &[f64], upper_means: &[f64]) -> Vec<f64> {
    assert_eq!(
        lower_means.len(),
        upper_means.len(),
        "column mean projections must have equal length"
    );
    lower_means
        .iter()
        .zip(upper_means)
        .map(|(a, b)| 0.5 * (a + b))
        .collect()
}

/// Alpha and beta for one adjacent pair, `width × overlap` each.
///
/// Row `r` of the maps corresponds to row `shift + r` of the lower tile and
/// row `r` of the upper tile.
#[derive(Debug, Clone, PartialEq)]
pub struct PairWeights {
    pub alpha: Buffer2<f32>,
    pub beta: Buffer2<f32>,
}

impl PairWeights {
    pub fn neutral(width: usize, overlap: usize) -> Self {
        Self {
            alpha: Buffer2::new_filled(width, overlap, NEUTRAL_WEIGHT),
            beta: Buffer2::new_filled(width, overlap, NEUTRAL_WEIGHT),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.alpha
            .iter()
            .chain(self.beta.iter())
            .all(|&w| w == NEUTRAL_WEIGHT)
    }
}

/// Blend weights for every adjacent pair of a tile stack.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightMap {
    width: usize,
    overlap: usize,
    pairs: Vec<PairWeights>,
}

impl WeightMap {
    /// Map with no pairs, as for a single tile.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Overlap band height in rows.
    #[inline]
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    #[inline]
    pub fn pair(&self, index: usize) -> &PairWeights {
        &self.pairs[index]
    }

    pub fn pairs(&self) -> &[PairWeights] {
        &self.pairs
    }
}

/// Validate a stack for vertical stitching and return `(width, height)`.
pub(crate) fn check_stack(tiles: &[Tile], shift_pixels: usize) -> Result<(usize, usize)> {
    let (width, height) = check_uniform(tiles)?;
    check_shift(tiles.len(), height, shift_pixels)?;
    Ok((width, height))
}

/// Check that `tile_count` tiles of `height` rows overlap when stacked
/// `shift_pixels` apart. A single tile accepts any shift.
pub(crate) fn check_shift(tile_count: usize, height: usize, shift_pixels: usize) -> Result<()> {
    if tile_count < 2 {
        return Ok(());
    }
    if shift_pixels == 0 {
        return Err(Error::ZeroShift { tile_count });
    }
    if shift_pixels >= height {
        return Err(Error::ShiftExceedsTile {
            shift_pixels,
            height,
        });
    }
    Ok(())
}

/// Compute the weight map for tiles stacked `shift_pixels` rows apart.
///
/// A single tile yields an empty map. Pairs are evaluated in parallel; the
/// returned map is complete.
pub fn compute_weight_map(
    tiles: &[Tile],
    shift_pixels: usize,
    progress: &ProgressCallback,
) -> Result<WeightMap> {
    let (width, height) = check_stack(tiles, shift_pixels)?;
    if tiles.len() == 1 {
        return Ok(WeightMap::empty());
    }
    let count = tiles.len();
    let overlap = height - shift_pixels;

    let means: Vec<Vec<f64>> = tiles
        .par_iter()
        .enumerate()
        .map(|(i, t)| column_means(&t.data, exclusive_rows(i, count, height, shift_pixels)))
        .collect();

    let counter = ProgressCounter::new(progress, count - 1, StitchStage::Weighting);
    let pairs: Vec<PairWeights> = (0..count - 1)
        .into_par_iter()
        .map(|i| {
            let reference = column_reference(&means[i], &means[i + 1]);
            let weights = pair_weights(&tiles[i], &tiles[i + 1], &reference, shift_pixels);
            counter.advance(1);
            weights
        })
        .collect();

    let neutral_pairs = pairs.iter().filter(|p| p.is_neutral()).count();
    tracing::debug!(
        pairs = pairs.len(),
        neutral_pairs,
        width,
        overlap,
        "Computed overlap weight map"
    );

    Ok(WeightMap {
        width,
        overlap,
        pairs,
    })
}

fn pair_weights(lower: &Tile, upper: &Tile, reference: &[f64], shift_pixels: usize) -> PairWeights {
    let width = lower.width();
    let overlap = lower.height() - shift_pixels;
    let mut weights = PairWeights::neutral(width, overlap);

    for (x, &n) in reference.iter().enumerate() {
        if !(n > 0.0) {
            continue;
        }
        for r in 0..overlap {
            let v1 = lower.data[(x, shift_pixels + r)] as f64;
            let v2 = upper.data[(x, r)] as f64;
            if let Some(c) = blend_coefficients(v1, v2, n) {
                weights.alpha[(x, r)] = c.lower as f32;
                weights.beta[(x, r)] = c.upper as f32;
            }
        }
    }

    weights
}
