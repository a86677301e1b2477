use crate::foundation::core::Bitmap;
use crate::foundation::error::{LayerpressError, LayerpressResult};

// Avoid pathological allocations from hostile or mistaken viewBox sizes.
const MAX_DIM: u32 = 16_384;

pub fn parse_svg(bytes: &[u8]) -> LayerpressResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| LayerpressError::asset(format!("parse svg tree: {e}")))
}

/// Rasterize an SVG tree at its intrinsic size into straight RGBA8.
pub fn rasterize_svg(tree: &usvg::Tree) -> LayerpressResult<Bitmap> {
    fn to_px(v: f32) -> LayerpressResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(LayerpressError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(LayerpressError::asset(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| LayerpressError::asset("failed to allocate svg pixmap"))?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    let mut rgba = pixmap.take();
    unpremultiply_rgba8_in_place(&mut rgba);
    Bitmap::from_raw(width, height, rgba)
        .ok_or_else(|| LayerpressError::asset("svg pixmap size mismatch"))
}

/// Convert straight-alpha RGBA8 bytes to premultiplied alpha.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * a + 127) / 255) as u8;
        }
    }
}

/// Convert premultiplied RGBA8 bytes to straight alpha.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
