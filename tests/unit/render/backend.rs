use super::*;
use crate::foundation::core::{Placement, Rgba8};
use crate::test_support::solid;

#[test]
fn native_rejects_cmyk_for_every_format() {
    for format in [OutputFormat::Png, OutputFormat::Jpeg] {
        let err = check_output_support(&BackendKind::Native, format, ColorSpace::Cmyk).unwrap_err();
        assert!(matches!(err, LayerpressError::Config(_)), "{format}: {err}");
    }
}

#[test]
fn native_accepts_rgb_and_rgba() {
    for format in [OutputFormat::Png, OutputFormat::Jpeg] {
        for cs in [ColorSpace::Rgb, ColorSpace::Rgba] {
            check_output_support(&BackendKind::Native, format, cs).unwrap();
        }
    }
}

#[test]
fn magick_accepts_cmyk() {
    let kind = BackendKind::from_bin_dir(Some(PathBuf::from("/usr/bin")));
    check_output_support(&kind, OutputFormat::Jpeg, ColorSpace::Cmyk).unwrap();
}

#[test]
fn bin_dir_selects_backend() {
    assert_eq!(BackendKind::from_bin_dir(None), BackendKind::Native);
    assert_eq!(create_backend(&BackendKind::Native).name(), "native");
    let magick = BackendKind::from_bin_dir(Some(PathBuf::from("/opt/im")));
    assert_eq!(create_backend(&magick).name(), "magick");
}

#[test]
fn native_backend_composites_and_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let bg = dir.path().join("bg.png");
    solid(6, 4, Rgba8::WHITE).save(&bg).unwrap();

    let target = JobTarget {
        background: bg,
        output: dir.path().join("out").join("0000_x.png"),
        format: OutputFormat::Png,
        color_space: ColorSpace::Rgba,
    };
    let mut backend = create_backend(&BackendKind::Native);
    backend.begin(&target).unwrap();
    backend
        .apply(Rendered {
            bitmap: solid(2, 2, Rgba8::BLACK),
            placement: Placement::at(4, 2),
        })
        .unwrap();
    let written = backend.finish().unwrap();
    assert_eq!(written, target.output);

    let out = image::open(&written).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (6, 4));
    assert_eq!(out.get_pixel(5, 3).0, Rgba8::BLACK.to_array());
    assert_eq!(out.get_pixel(3, 3).0, Rgba8::WHITE.to_array());
}

#[test]
fn native_backend_applies_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let bg = dir.path().join("bg.png");
    solid(4, 4, Rgba8::WHITE).save(&bg).unwrap();

    let target = JobTarget {
        background: bg,
        output: dir.path().join("r.png"),
        format: OutputFormat::Png,
        color_space: ColorSpace::Rgba,
    };
    // A 3x1 bar rotated a quarter turn becomes 1x3.
    let mut backend = create_backend(&BackendKind::Native);
    backend.begin(&target).unwrap();
    backend
        .apply(Rendered {
            bitmap: solid(3, 1, Rgba8::BLACK),
            placement: Placement::new(90, 0, 0),
        })
        .unwrap();
    let out = image::open(backend.finish().unwrap()).unwrap().to_rgba8();
    for y in 0..3 {
        assert_eq!(out.get_pixel(0, y).0, Rgba8::BLACK.to_array());
    }
    assert_eq!(out.get_pixel(1, 0).0, Rgba8::WHITE.to_array());
}

#[test]
fn missing_background_is_an_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    let target = JobTarget {
        background: dir.path().join("missing.png"),
        output: dir.path().join("o.png"),
        format: OutputFormat::Png,
        color_space: ColorSpace::Rgba,
    };
    let err = create_backend(&BackendKind::Native).begin(&target).unwrap_err();
    assert!(matches!(err, LayerpressError::Asset(_)), "{err}");
}
