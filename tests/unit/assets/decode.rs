use std::io::Cursor;

use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.dimensions(), (1, 1));
    assert_eq!(decoded.as_raw().as_slice(), &[100, 50, 200, 128]);
}

#[test]
fn garbage_bytes_are_asset_errors() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, LayerpressError::Asset(_)));
}

#[test]
fn missing_file_is_asset_error_naming_the_path() {
    let err = load_image(Path::new("no/such/overlay.png")).unwrap_err();
    assert!(matches!(err, LayerpressError::Asset(_)));
    assert!(err.to_string().contains("no/such/overlay.png"));
}

#[test]
fn svg_sources_rasterize_at_intrinsic_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badge.svg");
    std::fs::write(
        &path,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="12" height="8">
  <rect x="0" y="0" width="12" height="8" fill="#ff0000"/>
</svg>"##,
    )
    .unwrap();

    let bmp = load_image(&path).unwrap();
    assert_eq!(bmp.dimensions(), (12, 8));
    assert_eq!(bmp.get_pixel(6, 4).0, [255, 0, 0, 255]);
}

#[test]
fn unpremultiply_restores_straight_channels() {
    let mut px = [64u8, 0, 0, 128];
    crate::assets::svg_raster::unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [128, 0, 0, 128]);
}
