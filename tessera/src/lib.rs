//! Tessera - overlapping tile mosaic stitching.
//!
//! Assembles separately acquired, overlapping detector frames into one
//! seamless mosaic:
//! - Physical trim bounds to index-space crop regions
//! - Photometric alpha/beta weighting of vertical overlap bands
//! - Additive compositing of shifted tiles
//! - N-ary spatial blending with validity and range filtering
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tessera::{Tile, VerticalStitchConfig, stitch_vertical};
//!
//! let mosaic = stitch_vertical(&tiles, 50.0, &VerticalStitchConfig::default())?;
//! println!("{}x{}", mosaic.width(), mosaic.height());
//! ```

pub mod blend;
mod error;
pub mod filters;
pub mod math;
mod progress;
pub mod stitching;
mod tile;
pub mod trim;
pub mod weighting;

#[cfg(test)]
pub(crate) mod testing;

pub use common::Buffer2;

// ============================================================================
// Core types
// ============================================================================

pub use error::{Error, Result};
pub use tile::{PhysicalBounds, Region, Tile, TrimBounds};

// ============================================================================
// Progress reporting
// ============================================================================

pub use progress::{ProgressCallback, StitchProgress, StitchStage};

// ============================================================================
// Stitching
// ============================================================================

pub use blend::{BlendGrid, BlendSource, ImageSource, IntensityRange, RangeTable, SpatialSource};
pub use filters::MedianConfig;
pub use stitching::{
    BlendStitchConfig, VerticalStitchConfig, stitch_blended, stitch_blended_with_progress,
    stitch_vertical, stitch_vertical_with_progress,
};
pub use weighting::{BlendCoefficients, WeightMap};
