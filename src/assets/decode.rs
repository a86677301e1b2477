use std::path::Path;

use crate::assets::svg_raster::{parse_svg, rasterize_svg};
use crate::foundation::core::Bitmap;
use crate::foundation::error::{LayerpressError, LayerpressResult};

/// Decode raster bytes (any format the `image` crate recognizes) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> LayerpressResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LayerpressError::asset(format!("decode image: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Read and decode an image file. `.svg` sources are rasterized at their intrinsic size.
pub fn load_image(path: &Path) -> LayerpressResult<Bitmap> {
    let bytes = std::fs::read(path).map_err(|e| {
        LayerpressError::asset(format!("failed to read image '{}': {e}", path.display()))
    })?;

    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    let decoded = if is_svg {
        parse_svg(&bytes).and_then(|tree| rasterize_svg(&tree))
    } else {
        decode_image(&bytes)
    };
    decoded.map_err(|e| e.context(format!("'{}'", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
