//! Testing utilities for tessera.

#![allow(dead_code)]

use common::Buffer2;
use rand::prelude::*;

use crate::Tile;

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Unit-spacing tile at the origin filled with `value`.
pub fn uniform_tile(width: usize, height: usize, value: f32) -> Tile {
    Tile::from_buffer(Buffer2::new_filled(width, height, value))
}

/// Tile whose sample at `(x, y)` is `x + 1000 * y`, so every sample is distinct.
pub fn ramp_tile(width: usize, height: usize) -> Tile {
    Tile::from_buffer(Buffer2::from_fn(width, height, |x, y| (x + 1000 * y) as f32))
}

/// Tile of uniform noise in `[lo, hi)` from a seeded generator.
pub fn noise_tile(width: usize, height: usize, lo: f32, hi: f32, seed: u64) -> Tile {
    let mut rng = StdRng::seed_from_u64(seed);
    Tile::from_buffer(Buffer2::from_fn(width, height, |_, _| rng.random_range(lo..hi)))
}

/// Cut `count` overlapping tiles of `height` rows, `shift` rows apart, out of `scene`.
///
/// Tile `k` covers scene rows `[k * shift, k * shift + height)`. Every tile
/// keeps a zero origin, as the instrument delivers them.
pub fn cut_vertical(scene: &Buffer2<f32>, count: usize, height: usize, shift: usize) -> Vec<Tile> {
    assert!(shift * (count - 1) + height <= scene.height(), "scene too short");
    (0..count)
        .map(|k| Tile::from_buffer(scene.crop(0, k * shift, scene.width(), height)))
        .collect()
}
