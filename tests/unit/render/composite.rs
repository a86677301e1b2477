use super::*;
use crate::foundation::core::Rgba8;
use crate::test_support::solid;

#[test]
fn transparent_source_leaves_destination_unchanged() {
    for dst in [[0, 0, 0, 0], [10, 20, 30, 40], [255, 255, 255, 255]] {
        assert_eq!(blend(dst, [200, 100, 50, 0]), dst);
    }
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(blend([1, 2, 3, 4], [200, 100, 50, 255]), [200, 100, 50, 255]);
}

#[test]
fn half_alpha_red_over_green_interpolates_every_channel() {
    // alpha = 128/255; each channel is round(src * alpha + dst * (1 - alpha)).
    let alpha = 128.0f64 / 255.0;
    let beta = 1.0 - alpha;
    let expect = |s: f64, d: f64| (s * alpha + d * beta).round() as u8;

    let out = blend([0, 255, 0, 255], [255, 0, 0, 128]);
    assert_eq!(
        out,
        [
            expect(255.0, 0.0),
            expect(0.0, 255.0),
            expect(0.0, 0.0),
            expect(128.0, 255.0),
        ]
    );
    assert_eq!(out, [128, 127, 0, 191]);
}

#[test]
fn canvas_keeps_background_dimensions() {
    let mut canvas = Canvas::from_background(solid(8, 6, Rgba8::WHITE));
    canvas.apply(&solid(20, 20, Rgba8::BLACK), 0, 0);
    assert_eq!((canvas.width(), canvas.height()), (8, 6));
}

#[test]
fn overlay_past_right_and_bottom_edges_is_clipped() {
    let mut canvas = Canvas::from_background(solid(4, 4, Rgba8::WHITE));
    canvas.apply(&solid(3, 3, Rgba8::BLACK), 2, 2);

    let px = canvas.pixels();
    for y in 0..4 {
        for x in 0..4 {
            let expected = if x >= 2 && y >= 2 {
                Rgba8::BLACK
            } else {
                Rgba8::WHITE
            };
            assert_eq!(px.get_pixel(x, y).0, expected.to_array(), "pixel ({x},{y})");
        }
    }
}

#[test]
fn negative_offsets_clip_on_left_and_top_edges() {
    let mut canvas = Canvas::from_background(solid(4, 4, Rgba8::WHITE));
    canvas.apply(&solid(3, 3, Rgba8::BLACK), -2, -1);

    let px = canvas.pixels();
    assert_eq!(px.get_pixel(0, 0).0, Rgba8::BLACK.to_array());
    assert_eq!(px.get_pixel(0, 1).0, Rgba8::BLACK.to_array());
    assert_eq!(px.get_pixel(1, 0).0, Rgba8::WHITE.to_array());
    assert_eq!(px.get_pixel(0, 2).0, Rgba8::WHITE.to_array());
}

#[test]
fn overlay_entirely_off_canvas_is_a_noop() {
    let bg = solid(4, 4, Rgba8::WHITE);
    let mut canvas = Canvas::from_background(bg.clone());
    canvas.apply(&solid(3, 3, Rgba8::BLACK), 10, 0);
    canvas.apply(&solid(3, 3, Rgba8::BLACK), -3, -3);
    assert_eq!(canvas.into_pixels(), bg);
}

#[test]
fn later_overlays_win_in_the_overlap() {
    let red = Rgba8::new(255, 0, 0, 255);
    let blue = Rgba8::new(0, 0, 255, 255);
    let mut canvas = Canvas::from_background(solid(6, 6, Rgba8::WHITE));
    canvas.apply(&solid(4, 4, red), 0, 0);
    canvas.apply(&solid(4, 4, blue), 2, 2);

    let px = canvas.pixels();
    assert_eq!(px.get_pixel(3, 3).0, blue.to_array());
    assert_eq!(px.get_pixel(1, 1).0, red.to_array());
    assert_eq!(px.get_pixel(5, 5).0, blue.to_array());
}

#[test]
fn blending_accumulates_on_earlier_results() {
    let half_black = Rgba8::new(0, 0, 0, 128);
    let mut canvas = Canvas::from_background(solid(1, 1, Rgba8::WHITE));
    canvas.apply(&solid(1, 1, half_black), 0, 0);
    let once = canvas.pixels().get_pixel(0, 0).0;
    canvas.apply(&solid(1, 1, half_black), 0, 0);
    let twice = canvas.pixels().get_pixel(0, 0).0;

    assert_eq!(once, blend(Rgba8::WHITE.to_array(), half_black.to_array()));
    assert_eq!(twice, blend(once, half_black.to_array()));
    assert!(twice[0] < once[0]);
}

#[test]
fn over_keeps_source_coverage_on_transparent_destination() {
    let ink = [10, 20, 30, 77];
    assert_eq!(over([0, 0, 0, 0], ink), ink);
    assert_eq!(over([0, 0, 0, 0], [0, 0, 0, 0]), [0, 0, 0, 0]);
}

#[test]
fn over_opaque_destination_stays_opaque() {
    let out = over([255, 255, 0, 255], [0, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert_eq!(out, [127, 127, 0, 255]);
}
