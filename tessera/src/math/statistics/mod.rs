//! Statistics primitives: projections, finite range, median.

use std::ops::Range;

use common::Buffer2;
use common::parallel::{ParRowsMutAuto, ParRowsZip};
use rayon::prelude::*;

use crate::error::{Error, Result};

#[cfg(test)]
mod tests;

/// Mean of every column over `rows`, accumulated in `f64`.
///
/// An empty row range yields zeros.
///
/// # Panics
/// If `rows` extends past the buffer height.
pub fn column_means(buffer: &Buffer2<f32>, rows: Range<usize>) -> Vec<f64> {
    assert!(
        rows.end <= buffer.height(),
        "row range {rows:?} exceeds height {}",
        buffer.height()
    );
    let mut sums = vec![0.0f64; buffer.width()];
    if rows.is_empty() {
        return sums;
    }

    let count = rows.len() as f64;
    for y in rows {
        for (sum, &v) in sums.iter_mut().zip(buffer.row(y)) {
            *sum += v as f64;
        }
    }
    sums.iter_mut().for_each(|s| *s /= count);
    sums
}

/// Per-sample mean over a stack of equally sized frames.
pub fn mean_projection(frames: &[Buffer2<f32>]) -> Result<Buffer2<f32>> {
    let first = frames.first().ok_or(Error::NoTiles)?;
    let (width, height) = (first.width(), first.height());
    for (index, frame) in frames.iter().enumerate().skip(1) {
        if frame.width() != width || frame.height() != height {
            return Err(Error::DimensionMismatch {
                index,
                expected: (width, height),
                actual: (frame.width(), frame.height()),
            });
        }
    }

    let mut sums = vec![0.0f64; width * height];
    for frame in frames {
        sums.par_rows_zip(frame.pixels(), width)
            .for_each(|(_, acc, src)| {
                for (a, &v) in acc.iter_mut().zip(src) {
                    *a += v as f64;
                }
            });
    }

    let inv = 1.0 / frames.len() as f64;
    let mut out = Buffer2::new_default(width, height);
    out.pixels_mut()
        .par_rows_mut_auto(width)
        .for_each(|(start_row, chunk)| {
            let offset = start_row * width;
            for (i, v) in chunk.iter_mut().enumerate() {
                *v = (sums[offset + i] * inv) as f32;
            }
        });
    Ok(out)
}

/// Minimum and maximum over the finite values, or `None` if there are none.
pub fn min_max_finite(values: &[f32]) -> Option<(f32, f32)> {
    values
        .par_chunks(4096)
        .filter_map(|chunk| {
            chunk
                .iter()
                .filter(|v| v.is_finite())
                .fold(None, |acc: Option<(f32, f32)>, &v| match acc {
                    None => Some((v, v)),
                    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                })
        })
        .reduce_with(|(a_lo, a_hi), (b_lo, b_hi)| (a_lo.min(b_lo), a_hi.max(b_hi)))
}

/// Median of `data`, reordering it in place (quickselect).
///
/// Even lengths average the two middle values.
#[inline]
pub fn median_f32_mut(data: &mut [f32]) -> f32 {
    debug_assert!(!data.is_empty());

    let len = data.len();
    let mid = len / 2;

    let (left_part, median, _) = data.select_nth_unstable_by(mid, f32::total_cmp);
    let right = *median;
    if len & 1 == 1 {
        right
    } else {
        let left = left_part.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (left + right) * 0.5
    }
}
