//! Error types for stitching operations.

use glam::DVec2;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors. All are raised before any output is allocated.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No images provided")]
    NoTiles,

    #[error("Dimension mismatch for tile {index}: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Spacing mismatch for tile {index}: expected {expected}, got {actual}")]
    SpacingMismatch {
        index: usize,
        expected: DVec2,
        actual: DVec2,
    },

    #[error("Invalid spacing {spacing}: every component must be finite and positive")]
    InvalidSpacing { spacing: DVec2 },

    #[error("Invalid stitch shift {shift}: must be finite and non-negative")]
    InvalidShift { shift: f64 },

    #[error("Stitch shift rounds to zero pixels with {tile_count} tiles")]
    ZeroShift { tile_count: usize },

    #[error("Shift of {shift_pixels} rows leaves no overlap with tile height {height}")]
    ShiftExceedsTile { shift_pixels: usize, height: usize },

    #[error(
        "Invalid trim region: index start {start}, end {end} does not fit tile {width}x{height}"
    )]
    InvalidTrimRegion {
        start: DVec2,
        end: DVec2,
        width: usize,
        height: usize,
    },

    #[error("Output grid is empty: {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
}
