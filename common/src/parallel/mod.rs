//! Row-aligned parallel iteration over flat row-major buffers.

use rayon::prelude::*;

#[cfg(test)]
mod tests;

/// Chunks per rayon thread. Oversubscribing keeps threads busy when rows
/// finish at different speeds.
const CHUNKS_PER_THREAD: usize = 3;

/// Rows per chunk for a buffer of `height` rows.
#[inline]
pub fn rows_per_chunk(height: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (height / num_chunks).max(1)
}

/// Extension trait splitting a row-major slice into row-aligned parallel chunks.
pub trait ParRowsMutAuto<T: Send> {
    /// Yields `(chunk_start_row, chunk)` where `chunk` holds whole rows of `width` samples.
    ///
    /// A zero `width` yields nothing.
    fn par_rows_mut_auto<'a>(
        &'a mut self,
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])>
    where
        T: 'a;
}

impl<T: Send> ParRowsMutAuto<T> for [T] {
    fn par_rows_mut_auto<'a>(
        &'a mut self,
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T])>
    where
        T: 'a,
    {
        let height = if width == 0 { 0 } else { self.len() / width };
        let chunk_rows = rows_per_chunk(height);
        let data = if width == 0 { &mut self[..0] } else { self };
        data.par_chunks_mut((width * chunk_rows).max(1))
            .enumerate()
            .map(move |(idx, chunk)| (idx * chunk_rows, chunk))
    }
}

/// Extension trait pairing a mutable row-major slice with a read-only one of the same shape.
pub trait ParRowsZip<T: Send, U: Sync> {
    /// Yields `(chunk_start_row, dst_chunk, src_chunk)` with both chunks covering the same rows.
    fn par_rows_zip<'a>(
        &'a mut self,
        other: &'a [U],
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T], &'a [U])>
    where
        T: 'a,
        U: 'a;
}

impl<T: Send, U: Sync> ParRowsZip<T, U> for [T] {
    fn par_rows_zip<'a>(
        &'a mut self,
        other: &'a [U],
        width: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &'a mut [T], &'a [U])>
    where
        T: 'a,
        U: 'a,
    {
        assert_eq!(
            self.len(),
            other.len(),
            "Zipped slices must have equal length"
        );
        let height = if width == 0 { 0 } else { self.len() / width };
        let chunk_rows = rows_per_chunk(height);
        let chunk_len = (width * chunk_rows).max(1);
        let (dst, src) = if width == 0 {
            (&mut self[..0], &other[..0])
        } else {
            (self, other)
        };
        dst.par_chunks_mut(chunk_len)
            .zip(src.par_chunks(chunk_len))
            .enumerate()
            .map(move |(idx, (d, s))| (idx * chunk_rows, d, s))
    }
}
