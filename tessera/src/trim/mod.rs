//! Physical trim bounds to index-space crop regions.

use glam::DVec2;

use crate::error::{Error, Result};
use crate::tile::{Region, Tile, TrimBounds};


/// Convert physical trim bounds into an index-space region of `tile`.
///
/// Each corner is converted with the tile's own spacing and origin and
/// rounded to the nearest index. Degenerate bounds select the whole tile.
/// A region that is non-finite, inverted, or not contained in the tile is an
/// error rather than being clamped.
pub fn compute_trim_region(tile: &Tile, bounds: &TrimBounds) -> Result<Region> {
    if bounds.is_degenerate() {
        return Ok(Region::full(tile));
    }
    tile.validate_spacing()?;

    let start = tile.continuous_index(bounds.min).round();
    let end = tile.continuous_index(bounds.max).round();
    let size = end - start;

    let invalid = || Error::InvalidTrimRegion {
        start,
        end,
        width: tile.width(),
        height: tile.height(),
    };

    if !start.is_finite() || !end.is_finite() {
        return Err(invalid());
    }
    if start.min_element() < 0.0 || size.min_element() < 0.0 {
        return Err(invalid());
    }
    let limit = DVec2::new(tile.width() as f64, tile.height() as f64);
    if end.x > limit.x || end.y > limit.y {
        return Err(invalid());
    }

    Ok(Region::new(
        start.x as usize,
        start.y as usize,
        size.x as usize,
        size.y as usize,
    ))
}

/// Copy `region` of `tile` into a new tile whose index (0, 0) is the
/// region's first sample. Physical placement is preserved.
///
/// # Panics
/// If `region` does not fit inside `tile`.
pub fn copy_region(tile: &Tile, region: &Region) -> Tile {
    assert!(
        region.fits(tile),
        "region {region:?} exceeds tile {}x{}",
        tile.width(),
        tile.height()
    );
    Tile {
        data: tile
            .data
            .crop(region.x, region.y, region.width, region.height),
        spacing: tile.spacing,
        origin: tile.index_to_physical(region.x, region.y),
    }
}

/// Trim a tile to physical bounds.
pub fn trim_tile(tile: &Tile, bounds: &TrimBounds) -> Result<Tile> {
    let region = compute_trim_region(tile, bounds)?;
    Ok(copy_region(tile, &region))
}
