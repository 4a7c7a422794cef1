//! Spatial sources that can be sampled at physical points.

use glam::DVec2;

use crate::tile::{PhysicalBounds, Tile};

/// Something that has a value at (some) physical points.
pub trait SpatialSource: Send + Sync {
    /// Physical region the source may cover.
    fn bounds(&self) -> PhysicalBounds;

    /// Whether `p` lies inside the source.
    fn is_inside(&self, p: DVec2) -> bool;

    /// Whether the source can be evaluated at `p`.
    fn is_evaluable_at(&self, p: DVec2) -> bool {
        self.is_inside(p)
    }

    /// Value at `p`, or `None` if the source cannot produce one.
    fn value_at(&self, p: DVec2) -> Option<f64>;
}

/// Tile-backed source with nearest-sample lookup.
#[derive(Debug, Clone)]
pub struct ImageSource {
    tile: Tile,
}

impl ImageSource {
    pub fn new(tile: Tile) -> Self {
        Self { tile }
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn into_tile(self) -> Tile {
        self.tile
    }
}

impl SpatialSource for ImageSource {
    fn bounds(&self) -> PhysicalBounds {
        self.tile.bounds()
    }

    fn is_inside(&self, p: DVec2) -> bool {
        self.tile.nearest_index(p).is_some()
    }

    fn value_at(&self, p: DVec2) -> Option<f64> {
        self.tile
            .nearest_index(p)
            .map(|(x, y)| self.tile.data[(x, y)] as f64)
    }
}

/// A blend input. Image-backed sources take part in global range filtering;
/// generic sources do not.
pub enum BlendSource {
    Image(ImageSource),
    Generic(Box<dyn SpatialSource>),
}

impl BlendSource {
    pub fn image(tile: Tile) -> Self {
        BlendSource::Image(ImageSource::new(tile))
    }

    pub fn generic(source: impl SpatialSource + 'static) -> Self {
        BlendSource::Generic(Box::new(source))
    }

    #[inline]
    pub fn as_source(&self) -> &dyn SpatialSource {
        match self {
            BlendSource::Image(image) => image,
            BlendSource::Generic(source) => source.as_ref(),
        }
    }
}

impl std::fmt::Debug for BlendSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlendSource::Image(image) => f.debug_tuple("Image").field(image).finish(),
            BlendSource::Generic(_) => write!(f, "Generic(..)"),
        }
    }
}
