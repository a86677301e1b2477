use super::*;
use crate::foundation::core::Rgba8;
use crate::test_support::solid;

fn gradient(w: u32, h: u32) -> Bitmap {
    Bitmap::from_fn(w, h, |x, y| image::Rgba([(x * 40) as u8, (y * 40) as u8, 7, 255]))
}

#[test]
fn zero_full_turn_and_out_of_range_pass_through() {
    let src = gradient(5, 3);
    for deg in [0, 360, 361, 720, -45, -90] {
        assert!(!rotation_applies(deg), "{deg}");
        assert_eq!(rotate(src.clone(), deg), src, "{deg}");
    }
}

#[test]
fn forty_five_degrees_grows_to_bounding_box_with_transparent_corners() {
    let red = Rgba8::new(255, 0, 0, 255);
    let out = rotate(solid(10, 10, red), 45);

    // 10 * sqrt(2) = 14.14.. rounded up.
    assert_eq!(out.dimensions(), (15, 15));
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
    assert_eq!(out.get_pixel(14, 0).0[3], 0);
    assert_eq!(out.get_pixel(0, 14).0[3], 0);
    assert_eq!(out.get_pixel(14, 14).0[3], 0);
    assert_eq!(out.get_pixel(7, 7).0, red.to_array());
}

#[test]
fn rotated_edges_keep_source_color_under_partial_alpha() {
    let out = rotate(solid(10, 10, Rgba8::new(0, 0, 255, 255)), 30);
    for px in out.pixels() {
        if px.0[3] > 0 {
            assert_eq!(&px.0[..3], &[0, 0, 255]);
        }
    }
}

#[test]
fn quarter_turn_is_counter_clockwise_and_exact() {
    let src = gradient(4, 2);
    let out = rotate(src.clone(), 90);
    assert_eq!(out.dimensions(), (2, 4));
    // The source's top-right corner ends up top-left.
    assert_eq!(out.get_pixel(0, 0), src.get_pixel(3, 0));
    assert_eq!(out.get_pixel(1, 3), src.get_pixel(0, 1));
}

#[test]
fn half_turn_flips_both_axes() {
    let src = gradient(3, 2);
    let out = rotate(src.clone(), 180);
    assert_eq!(out.dimensions(), (3, 2));
    assert_eq!(out.get_pixel(0, 0), src.get_pixel(2, 1));
}
