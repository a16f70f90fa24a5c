use super::*;
use crate::error::Error;
use crate::testing::{mask_from_ascii, random_mask, rect_mask};

fn is_subset(a: &Mask, b: &Mask) -> bool {
    a.iter_ones().all(|(x, y)| b.get_xy(x, y))
}

#[test]
fn test_disk_shapes() {
    assert_eq!(StructuringElement::disk(1).unwrap().len(), 5);
    assert_eq!(StructuringElement::disk(2).unwrap().len(), 13);
    assert_eq!(StructuringElement::disk(3).unwrap().len(), 29);

    let disk = StructuringElement::disk(3).unwrap();
    assert_eq!(disk.radius(), 3);
    assert!(disk.offsets().contains(&(0, 0)));
    assert!(disk.offsets().contains(&(3, 0)));
    assert!(disk.offsets().contains(&(2, 2)));
    assert!(!disk.offsets().contains(&(3, 1)));
}

#[test]
fn test_disk_is_symmetric() {
    let disk = StructuringElement::disk(4).unwrap();
    for &(dx, dy) in disk.offsets() {
        assert!(disk.offsets().contains(&(-dx, -dy)));
        assert!(disk.offsets().contains(&(dy, dx)));
    }
}

#[test]
fn test_rejects_zero_radius() {
    assert!(matches!(
        StructuringElement::disk(0),
        Err(Error::InvalidConfiguration {
            parameter: "structuring_radius",
            ..
        })
    ));
    assert!(open_then_close(&Mask::new_default(4, 4), 0).is_err());
}

#[test]
fn test_erode_and_dilate_single_pixel() {
    let element = StructuringElement::disk(1).unwrap();
    let mask = mask_from_ascii(&[".....", ".....", "..#..", ".....", "....."]);

    assert_eq!(erode(&mask, &element).count_ones(), 0);

    let dilated = dilate(&mask, &element);
    let expected = mask_from_ascii(&[".....", "..#..", ".###.", "..#..", "....."]);
    assert_eq!(dilated, expected);
}

#[test]
fn test_thin_line_is_opened_away() {
    let mut mask = Mask::new_default(40, 40);
    for x in 5..35 {
        mask.set_xy(x, 20, true);
    }
    let cleaned = open_then_close(&mask, 3).unwrap();
    assert_eq!(cleaned.count_ones(), 0);
}

#[test]
fn test_large_block_survives_cleanup() {
    let mask = rect_mask(60, 60, 10, 10, 30, 30);
    let cleaned = open_then_close(&mask, 3).unwrap();
    // Corners round off under opening; the interior is untouched.
    assert!(is_subset(&cleaned, &mask));
    assert!(cleaned.get_xy(25, 25));
    assert!(cleaned.get_xy(10, 25));
    assert!(cleaned.count_ones() > 850);
}

#[test]
fn test_full_mask_is_fixed_point() {
    let mask = Mask::new_filled(17, 9, true);
    let element = StructuringElement::disk(3).unwrap();
    assert_eq!(erode(&mask, &element), mask);
    assert_eq!(opening(&mask, &element), mask);
    assert_eq!(closing(&mask, &element), mask);
}

#[test]
fn test_closing_fills_narrow_gap() {
    let mut mask = rect_mask(30, 12, 2, 2, 26, 8);
    for y in 0..12 {
        mask.set_xy(15, y, false);
    }
    let element = StructuringElement::disk(2).unwrap();
    let closed = closing(&mask, &element);
    assert!(closed.get_xy(15, 5));
    assert!(is_subset(&mask, &closed));
}

#[test]
fn test_opening_is_idempotent_and_anti_extensive() {
    for seed in 0..6 {
        let mask = random_mask(48, 40, 0.55, seed);
        for radius in [1, 2, 3] {
            let element = StructuringElement::disk(radius).unwrap();
            let once = opening(&mask, &element);
            let twice = opening(&once, &element);
            assert_eq!(once, twice, "seed {seed} radius {radius}");
            assert!(is_subset(&once, &mask));
        }
    }
}

#[test]
fn test_closing_is_idempotent_and_extensive() {
    for seed in 10..14 {
        let mask = random_mask(48, 40, 0.3, seed);
        let element = StructuringElement::disk(2).unwrap();
        let once = closing(&mask, &element);
        assert_eq!(closing(&once, &element), once);
        assert!(is_subset(&mask, &once));
    }
}

#[test]
fn test_preserves_dimensions() {
    let mask = random_mask(23, 71, 0.5, 3);
    let cleaned = open_then_close(&mask, 2).unwrap();
    assert_eq!(cleaned.dimensions(), (23, 71));
}
