use edge_accel::kernels::{MATRIX_SIDE, MATRIX_SIZE};
use edge_accel::{extract_window, GrayPlane, SizeCode};

mod utils;

/// Plane without zero samples, so every zero in a window is padding.
fn non_zero_plane() -> GrayPlane {
    utils::plane_from_fn(8, 6, |x, y| (1 + x + y * 8) as u8)
}

#[test]
fn two_by_two_window_occupies_top_left_corner() {
    let plane = non_zero_plane();
    for (cx, cy) in [(0, 0), (3, 2), (6, 4), (7, 5), (-1, -1), (100, 100)] {
        let window = extract_window(&plane, cx, cy, SizeCode::TwoByTwo);
        for (i, &sample) in window.samples().iter().enumerate() {
            if ![0, 1, 5, 6].contains(&i) {
                assert_eq!(sample, 0, "center ({cx}, {cy}), cell {i}");
            }
        }
    }

    let window = extract_window(&plane, 3, 2, SizeCode::TwoByTwo);
    assert_eq!(window.get(0, 0), plane.get(3, 2));
    assert_eq!(window.get(0, 1), plane.get(4, 2));
    assert_eq!(window.get(1, 0), plane.get(3, 3));
    assert_eq!(window.get(1, 1), plane.get(4, 3));
}

#[test]
fn two_by_two_window_at_right_bottom_corner() {
    let plane = non_zero_plane();
    let window = extract_window(&plane, 7, 5, SizeCode::TwoByTwo);
    assert_eq!(window.get(0, 0), plane.get(7, 5));
    assert_eq!(utils::count_non_zero(window.samples()), 1);
}

#[test]
fn bigger_windows_are_centered() {
    let plane = non_zero_plane();
    for size in [SizeCode::ThreeByThree, SizeCode::FiveByFive] {
        let window = extract_window(&plane, 3, 2, size);
        assert_eq!(window.samples()[12], plane.get(3, 2));
        assert_eq!(window.get(2, 2), plane.get(3, 2));

        let half = (size.extent() / 2) as i64;
        for row in 0..MATRIX_SIDE {
            for col in 0..MATRIX_SIDE {
                let dy = row as i64 - 2;
                let dx = col as i64 - 2;
                let sample = window.get(row, col);
                if dx.abs() > half || dy.abs() > half {
                    assert_eq!(sample, 0, "{:?} [{row}, {col}]", size);
                } else {
                    let x = (3 + dx) as u32;
                    let y = (2 + dy) as u32;
                    assert_eq!(sample, plane.get(x, y), "{:?} [{row}, {col}]", size);
                }
            }
        }
    }
}

#[test]
fn interior_windows_have_no_padding() {
    let plane = non_zero_plane();
    let window = extract_window(&plane, 3, 2, SizeCode::ThreeByThree);
    assert_eq!(utils::count_non_zero(window.samples()), 9);
    let window = extract_window(&plane, 3, 2, SizeCode::FiveByFive);
    assert_eq!(utils::count_non_zero(window.samples()), MATRIX_SIZE);
}

#[test]
fn border_samples_are_zero_padded() {
    let plane = non_zero_plane();

    let window = extract_window(&plane, 0, 0, SizeCode::FiveByFive);
    for row in 0..MATRIX_SIDE {
        for col in 0..MATRIX_SIDE {
            let sample = window.get(row, col);
            if row < 2 || col < 2 {
                assert_eq!(sample, 0, "[{row}, {col}]");
            } else {
                assert_ne!(sample, 0, "[{row}, {col}]");
            }
        }
    }
    assert_eq!(utils::count_non_zero(window.samples()), 9);

    let window = extract_window(&plane, 0, 0, SizeCode::ThreeByThree);
    assert_eq!(utils::count_non_zero(window.samples()), 4);

    let window = extract_window(&plane, 7, 5, SizeCode::ThreeByThree);
    assert_eq!(window.get(1, 1), plane.get(6, 4));
    assert_eq!(window.get(3, 3), 0);
    assert_eq!(utils::count_non_zero(window.samples()), 4);
}

#[test]
fn far_away_coordinates_give_empty_window() {
    let plane = non_zero_plane();
    for size in [SizeCode::TwoByTwo, SizeCode::ThreeByThree, SizeCode::FiveByFive] {
        let window = extract_window(&plane, -10, 50, size);
        assert_eq!(window.samples(), &[0; MATRIX_SIZE]);
        for (x, y) in [(i64::MAX, i64::MIN), (i64::MIN, i64::MAX), (i64::MAX, i64::MAX)] {
            let window = extract_window(&plane, x, y, size);
            assert_eq!(window.samples(), &[0; MATRIX_SIZE], "({x}, {y}) {:?}", size);
        }
    }
}

#[test]
fn empty_plane() {
    let plane = GrayPlane::new(0, 0);
    let window = extract_window(&plane, 0, 0, SizeCode::FiveByFive);
    assert_eq!(window.samples(), &[0; MATRIX_SIZE]);
}
