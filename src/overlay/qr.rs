use image::imageops::FilterType;
use qrcode::{Color, EcLevel, QrCode};

use crate::assets::svg_raster::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::foundation::core::{Bitmap, Placement, Rgba8};
use crate::foundation::error::{LayerpressError, LayerpressResult};

/// QR code symbol scaled to a square of `width` pixels, without a quiet zone.
#[derive(Clone, Debug)]
pub struct QrOverlay {
    pub payload: String,
    pub width: u32,
    pub foreground: Rgba8,
    pub background: Rgba8,
    pub placement: Placement,
}

impl QrOverlay {
    pub fn new(
        payload: impl Into<String>,
        width: u32,
        foreground: Rgba8,
        background: Rgba8,
        placement: Placement,
    ) -> Self {
        Self {
            payload: payload.into(),
            width,
            foreground,
            background,
            placement,
        }
    }

    pub(crate) fn render(&self) -> LayerpressResult<Bitmap> {
        if self.width == 0 {
            return Err(LayerpressError::render("qr width must be > 0"));
        }

        let code = QrCode::with_error_correction_level(self.payload.as_bytes(), EcLevel::H)
            .map_err(|e| {
                LayerpressError::render(format!(
                    "unable to encode {} byte payload as qr: {e}",
                    self.payload.len()
                ))
            })?;

        let modules = code.width() as u32;
        let (fg, bg) = (self.foreground.to_pixel(), self.background.to_pixel());
        let mut symbol = Bitmap::from_fn(modules, modules, |x, y| {
            match code[(x as usize, y as usize)] {
                Color::Dark => fg,
                Color::Light => bg,
            }
        });

        if modules == self.width {
            return Ok(symbol);
        }

        // Resample premultiplied so edge pixels never pick up the color of transparent modules.
        premultiply_rgba8_in_place(&mut symbol);
        let mut scaled =
            image::imageops::resize(&symbol, self.width, self.width, FilterType::Lanczos3);
        unpremultiply_rgba8_in_place(&mut scaled);
        Ok(scaled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/qr.rs"]
mod tests;
