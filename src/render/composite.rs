use crate::foundation::core::Bitmap;

/// Straight-alpha RGBA8 pixel.
pub type StraightRgba8 = [u8; 4];

/// Blend `src` over `dst` by linear interpolation on the source alpha.
///
/// Every channel, alpha included, becomes `round(src * a + dst * (1 - a))` with
/// `a = src.alpha / 255`. A transparent source leaves `dst` untouched and an opaque
/// source replaces it exactly.
pub fn blend(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    match src[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let alpha = f64::from(src[3]) / 255.0;
    let beta = 1.0 - alpha;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = f64::from(src[i]) * alpha + f64::from(dst[i]) * beta;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Porter-Duff source-over in straight alpha.
///
/// Used when building an overlay bitmap from layers (glyphs over a text background), where
/// the result must keep the source's coverage instead of interpolating the alpha channel.
pub fn over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let sa = f64::from(src[3]) / 255.0;
    let da = f64::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let v = (f64::from(src[i]) * sa + f64::from(dst[i]) * da * (1.0 - sa)) / out_a;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

/// Mutable working image for one job, seeded from the decoded background.
///
/// Dimensions are fixed at creation.
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: Bitmap,
}

impl Canvas {
    /// Take ownership of the background pixels as the initial canvas.
    pub fn from_background(background: Bitmap) -> Self {
        Self { pixels: background }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &Bitmap {
        &self.pixels
    }

    pub fn into_pixels(self) -> Bitmap {
        self.pixels
    }

    /// Blend `bitmap` onto the canvas with its top-left corner at `(x_offset, y_offset)`.
    ///
    /// Pixels landing outside the canvas on any edge are dropped.
    pub fn apply(&mut self, bitmap: &Bitmap, x_offset: i32, y_offset: i32) {
        let cw = i64::from(self.width());
        let ch = i64::from(self.height());
        let (x_off, y_off) = (i64::from(x_offset), i64::from(y_offset));

        // Visible source window, clipped against both canvas edges.
        let x0 = (-x_off).clamp(0, i64::from(bitmap.width()));
        let y0 = (-y_off).clamp(0, i64::from(bitmap.height()));
        let x1 = (cw - x_off).clamp(x0, i64::from(bitmap.width()));
        let y1 = (ch - y_off).clamp(y0, i64::from(bitmap.height()));

        for sy in y0..y1 {
            for sx in x0..x1 {
                let src = bitmap.get_pixel(sx as u32, sy as u32).0;
                let dst = self
                    .pixels
                    .get_pixel_mut((sx + x_off) as u32, (sy + y_off) as u32);
                dst.0 = blend(dst.0, src);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
