use super::*;

#[test]
fn test_par_rows_mut_auto_offsets() {
    let width = 10;
    let height = 20;
    let mut data: Vec<usize> = vec![0; width * height];

    data.par_rows_mut_auto(width)
        .for_each(|(chunk_start_row, chunk)| {
            let rows_in_chunk = chunk.len() / width;
            for local_y in 0..rows_in_chunk {
                let y = chunk_start_row + local_y;
                for x in 0..width {
                    chunk[local_y * width + x] = y * width + x;
                }
            }
        });

    for (i, &v) in data.iter().enumerate() {
        assert_eq!(v, i);
    }
}

#[test]
fn test_par_rows_mut_auto_row_alignment() {
    let width = 7;
    let height = 13;
    let mut data: Vec<u32> = vec![0; width * height];

    data.par_rows_mut_auto(width)
        .for_each(|(chunk_start_row, chunk)| {
            assert_eq!(chunk.len() % width, 0, "Chunk not row-aligned");
            for (local_y, row) in chunk.chunks_mut(width).enumerate() {
                row.fill((chunk_start_row + local_y) as u32);
            }
        });

    for y in 0..height {
        for x in 0..width {
            assert_eq!(data[y * width + x], y as u32);
        }
    }
}

#[test]
fn test_par_rows_mut_auto_zero_width_is_empty() {
    let mut data: Vec<f32> = vec![1.0; 4];
    assert_eq!(data.par_rows_mut_auto(0).count(), 0);
    assert!(data.iter().all(|&v| v == 1.0));
}

#[test]
fn test_par_rows_mut_auto_single_row() {
    let mut data: Vec<u8> = vec![0; 5];
    data.par_rows_mut_auto(5).for_each(|(start, chunk)| {
        assert_eq!(start, 0);
        chunk.fill(9);
    });
    assert!(data.iter().all(|&v| v == 9));
}

#[test]
fn test_par_rows_zip_reads_matching_rows() {
    let width = 6;
    let height = 11;
    let src: Vec<f64> = (0..width * height).map(|i| i as f64).collect();
    let mut dst: Vec<f64> = vec![0.0; width * height];

    dst.par_rows_zip(&src, width)
        .for_each(|(chunk_start_row, d, s)| {
            assert_eq!(d.len(), s.len());
            for (i, (dv, sv)) in d.iter_mut().zip(s).enumerate() {
                let y = chunk_start_row + i / width;
                *dv = sv * 2.0 + y as f64;
            }
        });

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            assert_eq!(dst[idx], idx as f64 * 2.0 + y as f64);
        }
    }
}

#[test]
#[should_panic(expected = "Zipped slices must have equal length")]
fn test_par_rows_zip_length_mismatch_panics() {
    let src = vec![0u8; 3];
    let mut dst = vec![0u8; 4];
    let _ = dst.par_rows_zip(&src, 2).count();
}
