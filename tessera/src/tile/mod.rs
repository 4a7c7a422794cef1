//! Tile geometry: sample buffer plus physical placement.
//!
//! Index `(x, y)` sits at physical point `origin + (x, y) * spacing`. Each
//! sample covers half a spacing on either side of that point.

use common::Buffer2;
use glam::DVec2;

use crate::error::{Error, Result};

#[cfg(test)]
mod tests;

/// A 2-D detector frame placed in physical space by a pure translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub data: Buffer2<f32>,
    /// Physical size of one index step per axis.
    pub spacing: DVec2,
    /// Physical position of index (0, 0).
    pub origin: DVec2,
}

impl Tile {
    pub fn new(data: Buffer2<f32>, spacing: DVec2, origin: DVec2) -> Self {
        Self {
            data,
            spacing,
            origin,
        }
    }

    /// Tile with unit spacing at the physical origin.
    pub fn from_buffer(data: Buffer2<f32>) -> Self {
        Self::new(data, DVec2::ONE, DVec2::ZERO)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Continuous index of a physical point. Integer results land on sample centres.
    #[inline]
    pub fn continuous_index(&self, p: DVec2) -> DVec2 {
        (p - self.origin) / self.spacing
    }

    #[inline]
    pub fn index_to_physical(&self, x: usize, y: usize) -> DVec2 {
        self.origin + DVec2::new(x as f64, y as f64) * self.spacing
    }

    /// Nearest sample index to `p`, or `None` if `p` falls outside the sample footprints.
    pub fn nearest_index(&self, p: DVec2) -> Option<(usize, usize)> {
        let c = self.continuous_index(p);
        let (w, h) = (self.width() as f64, self.height() as f64);
        // Footprint of sample i is [i - 0.5, i + 0.5).
        if !(c.x >= -0.5 && c.x < w - 0.5 && c.y >= -0.5 && c.y < h - 0.5) {
            return None;
        }
        let x = ((c.x + 0.5).floor() as usize).min(self.width() - 1);
        let y = ((c.y + 0.5).floor() as usize).min(self.height() - 1);
        Some((x, y))
    }

    /// Physical extent covered by the sample footprints.
    pub fn bounds(&self) -> PhysicalBounds {
        let half = self.spacing * 0.5;
        let size = DVec2::new(self.width() as f64, self.height() as f64);
        PhysicalBounds {
            min: self.origin - half,
            max: self.origin + size * self.spacing - half,
        }
    }

    pub fn validate_spacing(&self) -> Result<()> {
        let s = self.spacing;
        if s.is_finite() && s.x > 0.0 && s.y > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidSpacing { spacing: s })
        }
    }
}

/// Check that tiles are non-empty in count and share one shape and spacing.
///
/// Returns the common `(width, height)`.
pub(crate) fn check_uniform(tiles: &[Tile]) -> Result<(usize, usize)> {
    let first = tiles.first().ok_or(Error::NoTiles)?;
    first.validate_spacing()?;
    let expected = first.dimensions();

    for (index, tile) in tiles.iter().enumerate().skip(1) {
        if tile.dimensions() != expected {
            return Err(Error::DimensionMismatch {
                index,
                expected,
                actual: tile.dimensions(),
            });
        }
        if tile.spacing != first.spacing {
            return Err(Error::SpacingMismatch {
                index,
                expected: first.spacing,
                actual: tile.spacing,
            });
        }
    }

    Ok(expected)
}

/// Axis-aligned physical box, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl PhysicalBounds {
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    pub fn union(&self, other: &PhysicalBounds) -> PhysicalBounds {
        PhysicalBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    pub fn extent(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Index-space box: first sample and size per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole tile.
    pub fn full(tile: &Tile) -> Self {
        Self::new(0, 0, tile.width(), tile.height())
    }

    pub fn fits(&self, tile: &Tile) -> bool {
        self.x + self.width <= tile.width() && self.y + self.height <= tile.height()
    }
}

/// Physical crop box. Coinciding corners disable trimming.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrimBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl TrimBounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Bounds that leave tiles untouched.
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.min.distance(self.max) == 0.0
    }
}
