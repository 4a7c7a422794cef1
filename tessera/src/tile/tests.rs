use super::*;

fn tile(width: usize, height: usize) -> Tile {
    Tile::from_buffer(Buffer2::from_fn(width, height, |x, y| (y * width + x) as f32))
}

#[test]
fn test_index_physical_roundtrip_with_spacing() {
    let t = Tile::new(
        Buffer2::new_default(4, 3),
        DVec2::new(0.5, 2.0),
        DVec2::new(10.0, -4.0),
    );
    let p = t.index_to_physical(3, 2);
    assert_eq!(p, DVec2::new(11.5, 0.0));
    assert_eq!(t.continuous_index(p), DVec2::new(3.0, 2.0));
}

#[test]
fn test_nearest_index_rounds_to_closest_sample() {
    let t = tile(4, 3);
    assert_eq!(t.nearest_index(DVec2::new(0.49, 1.51)), Some((0, 2)));
    assert_eq!(t.nearest_index(DVec2::new(-0.5, -0.5)), Some((0, 0)));
    assert_eq!(t.nearest_index(DVec2::new(3.49, 2.49)), Some((3, 2)));
}

#[test]
fn test_nearest_index_outside_footprint() {
    let t = tile(4, 3);
    assert_eq!(t.nearest_index(DVec2::new(3.5, 0.0)), None);
    assert_eq!(t.nearest_index(DVec2::new(0.0, -0.51)), None);
    assert_eq!(t.nearest_index(DVec2::new(f64::NAN, 0.0)), None);
}

#[test]
fn test_bounds_cover_sample_footprints() {
    let t = Tile::new(
        Buffer2::new_default(10, 4),
        DVec2::new(2.0, 0.5),
        DVec2::new(1.0, 1.0),
    );
    let b = t.bounds();
    assert_eq!(b.min, DVec2::new(0.0, 0.75));
    assert_eq!(b.max, DVec2::new(20.0, 2.75));
    assert!(b.contains(DVec2::new(0.0, 0.75)));
    assert!(!b.contains(DVec2::new(20.0, 1.0)));
}

#[test]
fn test_bounds_union() {
    let a = PhysicalBounds {
        min: DVec2::new(0.0, 0.0),
        max: DVec2::new(4.0, 4.0),
    };
    let b = PhysicalBounds {
        min: DVec2::new(-1.0, 2.0),
        max: DVec2::new(3.0, 9.0),
    };
    let u = a.union(&b);
    assert_eq!(u.min, DVec2::new(-1.0, 0.0));
    assert_eq!(u.max, DVec2::new(4.0, 9.0));
    assert_eq!(u.extent(), DVec2::new(5.0, 9.0));
}

#[test]
fn test_validate_spacing() {
    let mut t = tile(2, 2);
    assert!(t.validate_spacing().is_ok());
    t.spacing = DVec2::new(1.0, 0.0);
    assert!(matches!(
        t.validate_spacing(),
        Err(Error::InvalidSpacing { .. })
    ));
    t.spacing = DVec2::new(f64::INFINITY, 1.0);
    assert!(t.validate_spacing().is_err());
}

#[test]
fn test_check_uniform_reports_first_mismatch() {
    let tiles = vec![tile(4, 4), tile(4, 4), tile(4, 3)];
    match check_uniform(&tiles) {
        Err(Error::DimensionMismatch {
            index,
            expected,
            actual,
        }) => {
            assert_eq!(index, 2);
            assert_eq!(expected, (4, 4));
            assert_eq!(actual, (4, 3));
        }
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn test_check_uniform_spacing_mismatch() {
    let mut other = tile(4, 4);
    other.spacing = DVec2::new(1.0, 2.0);
    let tiles = vec![tile(4, 4), other];
    assert!(matches!(
        check_uniform(&tiles),
        Err(Error::SpacingMismatch { index: 1, .. })
    ));
}

#[test]
fn test_check_uniform_empty() {
    assert!(matches!(check_uniform(&[]), Err(Error::NoTiles)));
}

#[test]
fn test_region_full_and_fits() {
    let t = tile(5, 7);
    let r = Region::full(&t);
    assert_eq!(r, Region::new(0, 0, 5, 7));
    assert!(r.fits(&t));
    assert!(!Region::new(1, 0, 5, 7).fits(&t));
}

#[test]
fn test_trim_bounds_degenerate() {
    assert!(TrimBounds::none().is_degenerate());
    let p = DVec2::new(3.0, 4.0);
    assert!(TrimBounds::new(p, p).is_degenerate());
    assert!(!TrimBounds::new(p, p + DVec2::new(0.0, 1e-6)).is_degenerate());
}
