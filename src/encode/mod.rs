//! Canvas serialization.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::foundation::core::{Bitmap, ColorSpace, OutputFormat};
use crate::foundation::error::{LayerpressError, LayerpressResult};

/// JPEG quality used for every lossy output.
pub const JPEG_QUALITY: u8 = 75;

/// Serialize straight RGBA8 pixels into `format`.
///
/// PNG keeps the alpha channel for [`ColorSpace::Rgba`] and drops it for
/// [`ColorSpace::Rgb`]; JPEG is always RGB. CMYK is not encodable here.
pub fn encode(
    pixels: &Bitmap,
    format: OutputFormat,
    color_space: ColorSpace,
) -> LayerpressResult<Vec<u8>> {
    if color_space == ColorSpace::Cmyk {
        return Err(LayerpressError::config(
            "cmyk output requires the external image tool backend",
        ));
    }

    let (w, h) = pixels.dimensions();
    let mut out = Vec::new();
    let cursor = Cursor::new(&mut out);
    let result = match (format, color_space) {
        (OutputFormat::Png, ColorSpace::Rgba) => {
            PngEncoder::new(cursor).write_image(pixels.as_raw(), w, h, ExtendedColorType::Rgba8)
        }
        (OutputFormat::Png, _) => {
            let rgb = drop_alpha(pixels);
            PngEncoder::new(cursor).write_image(&rgb, w, h, ExtendedColorType::Rgb8)
        }
        (OutputFormat::Jpeg, _) => {
            let rgb = drop_alpha(pixels);
            JpegEncoder::new_with_quality(cursor, JPEG_QUALITY).write_image(
                &rgb,
                w,
                h,
                ExtendedColorType::Rgb8,
            )
        }
    };
    result.map_err(|e| LayerpressError::encode(format!("{format} encode failed: {e}")))?;
    Ok(out)
}

/// Encode and write to `path`, creating parent directories as needed.
pub fn write_image(
    path: &Path,
    pixels: &Bitmap,
    format: OutputFormat,
    color_space: ColorSpace,
) -> LayerpressResult<()> {
    let bytes = encode(pixels, format, color_space)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes).map_err(|e| {
        LayerpressError::io(format!("unable to write '{}': {e}", path.display()))
    })
}

pub fn ensure_parent_dir(path: &Path) -> LayerpressResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            LayerpressError::io(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

fn drop_alpha(pixels: &Bitmap) -> Vec<u8> {
    pixels
        .as_raw()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encode.rs"]
mod tests;
