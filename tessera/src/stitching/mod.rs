//! Mosaic stitching pipelines.
//!
//! - [`stitch_vertical`]: trim, weight overlap bands, accumulate along rows.
//! - [`stitch_blended`]: place tiles at translated offsets and average them
//!   with the spatial blend evaluator.

pub mod compositor;


use glam::DVec2;

use crate::blend::{BlendGrid, BlendSource, blend_sources};
use crate::error::{Error, Result};
use crate::progress::ProgressCallback;
use crate::tile::{Region, Tile, TrimBounds, check_uniform};
use crate::trim::{compute_trim_region, copy_region};
use crate::weighting::{check_shift, compute_weight_map};

pub use compositor::{accumulate, apply_weights, mosaic_height};

/// Configuration for vertical overlap stitching.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalStitchConfig {
    /// Physical crop applied to every tile before stitching.
    pub trim: TrimBounds,
    /// Rescale overlap bands with photometric blend weights. When off,
    /// overlapping samples are summed unweighted.
    pub compute_weighting: bool,
    /// Reserved. Carried through but not read by the pipeline.
    pub rescale: bool,
}

impl Default for VerticalStitchConfig {
    fn default() -> Self {
        Self {
            trim: TrimBounds::none(),
            compute_weighting: true,
            rescale: true,
        }
    }
}

impl VerticalStitchConfig {
    /// Preset: plain additive accumulation without overlap weighting.
    pub fn unweighted() -> Self {
        Self {
            compute_weighting: false,
            ..Default::default()
        }
    }

    /// Set physical trim bounds.
    pub fn with_trim(mut self, min: DVec2, max: DVec2) -> Self {
        assert!(
            min.is_finite() && max.is_finite(),
            "trim bounds must be finite"
        );
        self.trim = TrimBounds::new(min, max);
        self
    }

    /// Enable or disable overlap weighting.
    pub fn with_weighting(mut self, compute_weighting: bool) -> Self {
        self.compute_weighting = compute_weighting;
        self
    }
}

/// Configuration for translated-tile blend stitching.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendStitchConfig {
    /// Physical crop applied to every tile before placement.
    pub trim: TrimBounds,
    /// Value for output samples no tile covers.
    pub fill_value: f32,
}

impl Default for BlendStitchConfig {
    fn default() -> Self {
        Self {
            trim: TrimBounds::none(),
            fill_value: 0.0,
        }
    }
}

impl BlendStitchConfig {
    pub fn with_trim(mut self, min: DVec2, max: DVec2) -> Self {
        assert!(
            min.is_finite() && max.is_finite(),
            "trim bounds must be finite"
        );
        self.trim = TrimBounds::new(min, max);
        self
    }

    pub fn with_fill_value(mut self, fill_value: f32) -> Self {
        self.fill_value = fill_value;
        self
    }
}

/// Stitch tiles stacked along the row axis, each `shift` physical units
/// below the previous one.
///
/// See [`stitch_vertical_with_progress`].
pub fn stitch_vertical(tiles: &[Tile], shift: f64, config: &VerticalStitchConfig) -> Result<Tile> {
    stitch_vertical_with_progress(tiles, shift, config, ProgressCallback::default())
}

/// Stitch tiles stacked along the row axis with progress reporting.
///
/// The shift is converted to rows with the first tile's row spacing and
/// validated against the trimmed height before any tile is copied. Overlap
/// bands are then rescaled (unless disabled) and all tiles are summed at
/// offsets `k * shift_pixels`. The mosaic keeps the first trimmed tile's
/// spacing and origin. A single tile is returned trimmed.
pub fn stitch_vertical_with_progress(
    tiles: &[Tile],
    shift: f64,
    config: &VerticalStitchConfig,
    progress: ProgressCallback,
) -> Result<Tile> {
    let (plan, shift_pixels) = plan_vertical(tiles, shift, &config.trim)?;
    let mut trimmed = plan.copy(tiles);

    if trimmed.len() == 1 {
        tracing::debug!("Single tile, returning trimmed copy");
        return Ok(trimmed.remove(0));
    }

    let spacing = trimmed[0].spacing;
    let (width, height) = plan.uniform_size()?;

    tracing::info!(
        tiles = trimmed.len(),
        width,
        height,
        shift_pixels,
        overlap = height - shift_pixels,
        weighting = config.compute_weighting,
        "Stitching vertical mosaic"
    );

    if config.compute_weighting {
        let weights = compute_weight_map(&trimmed, shift_pixels, &progress)?;
        apply_weights(&mut trimmed, &weights, shift_pixels);
    }

    let data = accumulate(&trimmed, shift_pixels, &progress);
    tracing::info!(
        width = data.width(),
        height = data.height(),
        "Vertical mosaic complete"
    );

    Ok(Tile::new(data, spacing, trimmed[0].origin))
}

/// Stitch tiles where tile `k` is displaced by `k * shift` (physical units)
/// from its own placement, averaging wherever tiles overlap.
///
/// See [`stitch_blended_with_progress`].
pub fn stitch_blended(tiles: &[Tile], shift: DVec2, config: &BlendStitchConfig) -> Result<Tile> {
    stitch_blended_with_progress(tiles, shift, config, ProgressCallback::default())
}

/// Blend stitching with progress reporting. The output grid covers every
/// placed tile with the first tile's spacing. A single tile is returned
/// trimmed.
pub fn stitch_blended_with_progress(
    tiles: &[Tile],
    shift: DVec2,
    config: &BlendStitchConfig,
    progress: ProgressCallback,
) -> Result<Tile> {
    check_uniform(tiles)?;
    if !shift.is_finite() {
        return Err(Error::InvalidShift {
            shift: shift.length(),
        });
    }
    let mut trimmed = TrimPlan::new(tiles, &config.trim)?.copy(tiles);

    if trimmed.len() == 1 {
        return Ok(trimmed.remove(0));
    }

    let spacing = trimmed[0].spacing;
    let sources: Vec<BlendSource> = trimmed
        .into_iter()
        .enumerate()
        .map(|(k, mut tile)| {
            tile.origin += shift * k as f64;
            BlendSource::image(tile)
        })
        .collect();

    let grid = BlendGrid::covering(&sources, spacing)?;
    tracing::info!(
        tiles = sources.len(),
        width = grid.width,
        height = grid.height,
        "Stitching blended mosaic"
    );

    blend_sources(&sources, &grid, config.fill_value, &progress)
}

/// Trim regions for a stack of tiles, resolved without copying any samples.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrimPlan {
    pub(crate) regions: Vec<Region>,
}

impl TrimPlan {
    pub(crate) fn new(tiles: &[Tile], bounds: &TrimBounds) -> Result<Self> {
        check_uniform(tiles)?;
        let regions = tiles
            .iter()
            .map(|t| compute_trim_region(t, bounds))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { regions })
    }

    /// Common `(width, height)` of the regions.
    ///
    /// Tiles placed at different origins can round to regions of different
    /// size.
    pub(crate) fn uniform_size(&self) -> Result<(usize, usize)> {
        let first = self.regions.first().ok_or(Error::NoTiles)?;
        let expected = (first.width, first.height);
        for (index, region) in self.regions.iter().enumerate().skip(1) {
            let actual = (region.width, region.height);
            if actual != expected {
                return Err(Error::DimensionMismatch {
                    index,
                    expected,
                    actual,
                });
            }
        }
        Ok(expected)
    }

    /// Copy every region out of its tile.
    pub(crate) fn copy(&self, tiles: &[Tile]) -> Vec<Tile> {
        tiles
            .iter()
            .zip(&self.regions)
            .map(|(tile, region)| copy_region(tile, region))
            .collect()
    }
}

/// Resolve trim regions and the row shift of a vertical stack, failing on
/// every configuration error before any samples are copied.
///
/// A single tile ignores the shift and reports zero rows.
pub(crate) fn plan_vertical(
    tiles: &[Tile],
    shift: f64,
    bounds: &TrimBounds,
) -> Result<(TrimPlan, usize)> {
    let plan = TrimPlan::new(tiles, bounds)?;
    if tiles.len() == 1 {
        return Ok((plan, 0));
    }
    let (_, height) = plan.uniform_size()?;
    let shift_pixels = shift_to_pixels(shift, tiles[0].spacing.y)?;
    check_shift(tiles.len(), height, shift_pixels)?;
    Ok((plan, shift_pixels))
}

/// Round a physical shift to whole rows of `spacing`.
fn shift_to_pixels(shift: f64, spacing: f64) -> Result<usize> {
    let pixels = (shift / spacing).round();
    if !pixels.is_finite() || pixels < 0.0 {
        return Err(Error::InvalidShift { shift });
    }
    Ok(pixels as usize)
}
