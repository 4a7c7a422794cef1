use common::Buffer2;
use rand::prelude::*;

use super::*;

#[test]
fn test_column_means_over_row_range() {
    // Column x, row y holds x + 10 * y.
    let buf = Buffer2::from_fn(3, 6, |x, y| (x + 10 * y) as f32);
    let means = column_means(&buf, 2..5);
    assert_eq!(means, vec![30.0, 31.0, 32.0]);
}

#[test]
fn test_column_means_empty_range_is_zero() {
    let buf = Buffer2::new_filled(4, 4, 7.0f32);
    assert_eq!(column_means(&buf, 3..3), vec![0.0; 4]);
}

#[test]
#[should_panic(expected = "exceeds height")]
fn test_column_means_range_past_end_panics() {
    let buf = Buffer2::new_filled(2, 2, 1.0f32);
    column_means(&buf, 0..3);
}

#[test]
fn test_mean_projection_averages_frames() {
    let frames = vec![
        Buffer2::new_filled(5, 4, 1.0f32),
        Buffer2::new_filled(5, 4, 2.0f32),
        Buffer2::from_fn(5, 4, |x, y| (x + y) as f32),
    ];
    let mean = mean_projection(&frames).unwrap();
    assert_eq!(mean.width(), 5);
    assert_eq!(mean.height(), 4);
    for y in 0..4 {
        for x in 0..5 {
            let expected = (3.0 + (x + y) as f32) / 3.0;
            assert!((mean[(x, y)] - expected).abs() < 1e-6);
        }
    }
}

#[test]
fn test_mean_projection_single_frame_is_identity() {
    let frame = Buffer2::from_fn(7, 3, |x, y| (x * y) as f32 - 2.5);
    let mean = mean_projection(std::slice::from_ref(&frame)).unwrap();
    assert_eq!(mean, frame);
}

#[test]
fn test_mean_projection_rejects_mismatched_frames() {
    let frames = vec![Buffer2::new_filled(4, 4, 0.0f32), Buffer2::new_filled(4, 5, 0.0f32)];
    assert!(matches!(
        mean_projection(&frames),
        Err(Error::DimensionMismatch { index: 1, .. })
    ));
    assert!(matches!(mean_projection(&[]), Err(Error::NoTiles)));
}

#[test]
fn test_min_max_finite_skips_non_finite() {
    let values = [3.0, f32::NAN, -2.0, f32::INFINITY, 8.5, f32::NEG_INFINITY];
    assert_eq!(min_max_finite(&values), Some((-2.0, 8.5)));
}

#[test]
fn test_min_max_finite_none_when_nothing_finite() {
    assert_eq!(min_max_finite(&[]), None);
    assert_eq!(min_max_finite(&[f32::NAN, f32::INFINITY]), None);
}

#[test]
fn test_min_max_finite_matches_sequential_on_large_input() {
    let mut rng = StdRng::seed_from_u64(42);
    let values: Vec<f32> = (0..50_000).map(|_| rng.random_range(-1e4..1e4)).collect();
    let lo = values.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    assert_eq!(min_max_finite(&values), Some((lo, hi)));
}

#[test]
fn test_median_odd_and_even() {
    let mut odd = [5.0, 1.0, 3.0];
    assert_eq!(median_f32_mut(&mut odd), 3.0);

    let mut even = [4.0, 1.0, 3.0, 2.0];
    assert_eq!(median_f32_mut(&mut even), 2.5);

    let mut single = [9.0];
    assert_eq!(median_f32_mut(&mut single), 9.0);
}

#[test]
fn test_median_matches_sort() {
    let mut rng = StdRng::seed_from_u64(7);
    for len in [1usize, 2, 9, 49, 50] {
        let values: Vec<f32> = (0..len).map(|_| rng.random_range(0.0..100.0)).collect();
        let mut sorted = values.clone();
        sorted.sort_by(f32::total_cmp);
        let expected = if len % 2 == 1 {
            sorted[len / 2]
        } else {
            (sorted[len / 2 - 1] + sorted[len / 2]) * 0.5
        };
        let mut data = values.clone();
        assert_eq!(median_f32_mut(&mut data), expected);
    }
}
