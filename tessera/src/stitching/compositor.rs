//! Weight application and additive accumulation of shifted tiles.

use common::Buffer2;
use common::parallel::{ParRowsMutAuto, ParRowsZip};
use rayon::prelude::*;

use crate::progress::{ProgressCallback, ProgressCounter, StitchStage};
use crate::tile::Tile;
use crate::weighting::WeightMap;

/// Rows of a mosaic of `count` tiles of `height` rows placed `shift_pixels` apart.
///
/// Equals `height * count - overlap * (count - 1)` with `overlap = height - shift_pixels`.
#[inline]
pub fn mosaic_height(height: usize, shift_pixels: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    shift_pixels * (count - 1) + height
}

/// Scale overlap bands in place: tile `i` rows `[shift, height)` by alpha,
/// tile `i + 1` rows `[0, overlap)` by beta.
///
/// # Panics
/// If the weight map does not match the tiles.
pub fn apply_weights(tiles: &mut [Tile], weights: &WeightMap, shift_pixels: usize) {
    if weights.is_empty() {
        assert!(tiles.len() <= 1, "empty weight map for {} tiles", tiles.len());
        return;
    }
    assert_eq!(
        weights.pair_count() + 1,
        tiles.len(),
        "weight map pair count does not match tile count"
    );

    for (i, pair) in weights.pairs().iter().enumerate() {
        let width = tiles[i].width();
        let height = tiles[i].height();
        assert_eq!(
            (pair.alpha.width(), pair.alpha.height()),
            (width, height - shift_pixels),
            "weight map shape does not match overlap band"
        );

        scale_rows(&mut tiles[i].data, shift_pixels..height, &pair.alpha);
        scale_rows(&mut tiles[i + 1].data, 0..height - shift_pixels, &pair.beta);
    }
}

fn scale_rows(data: &mut Buffer2<f32>, rows: std::ops::Range<usize>, factors: &Buffer2<f32>) {
    let width = data.width();
    data.rows_mut(rows)
        .par_rows_zip(factors.pixels(), width)
        .for_each(|(_, samples, weights)| {
            for (s, &w) in samples.iter_mut().zip(weights) {
                *s *= w;
            }
        });
}

/// Sum `tiles` into a zero-filled canvas, tile `k` starting at row `k * shift_pixels`.
///
/// # Panics
/// If tiles differ in size.
pub fn accumulate(
    tiles: &[Tile],
    shift_pixels: usize,
    progress: &ProgressCallback,
) -> Buffer2<f32> {
    let Some(first) = tiles.first() else {
        return Buffer2::new_default(0, 0);
    };
    let (width, height) = first.dimensions();
    assert!(
        tiles.iter().all(|t| t.dimensions() == (width, height)),
        "all tiles must share one size"
    );

    let out_height = mosaic_height(height, shift_pixels, tiles.len());
    let mut canvas = Buffer2::new_default(width, out_height);
    let counter = ProgressCounter::new(progress, out_height, StitchStage::Compositing);

    canvas
        .pixels_mut()
        .par_rows_mut_auto(width)
        .for_each(|(start_row, chunk)| {
            for (local_y, row) in chunk.chunks_mut(width).enumerate() {
                let y = start_row + local_y;
                for (k, tile) in tiles.iter().enumerate() {
                    let offset = k * shift_pixels;
                    if y < offset || y - offset >= height {
                        continue;
                    }
                    for (dst, &src) in row.iter_mut().zip(tile.data.row(y - offset)) {
                        *dst += src;
                    }
                }
            }
            counter.advance(chunk.len() / width);
        });

    canvas
}
