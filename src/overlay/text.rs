use std::sync::Arc;

use crate::assets::fonts::{LoadedFont, TextBrushRgba8, TextLayoutEngine};
use crate::assets::svg_raster::unpremultiply_rgba8_in_place;
use crate::foundation::core::{Bitmap, Placement, Rgba8};
use crate::foundation::error::{LayerpressError, LayerpressResult};
use crate::render::composite::over;

/// Transparent border kept around the inked pixels after cropping.
const INK_MARGIN_PX: u32 = 2;

/// A single line of text rasterized with the overlay's font.
#[derive(Clone, Debug)]
pub struct TextOverlay {
    pub text: String,
    /// Font size in points.
    pub size_pt: u32,
    pub dpi: u32,
    pub font: Arc<LoadedFont>,
    pub foreground: Rgba8,
    pub background: Rgba8,
    pub placement: Placement,
}

impl TextOverlay {
    pub fn new(
        text: impl Into<String>,
        size_pt: u32,
        dpi: u32,
        font: Arc<LoadedFont>,
        foreground: Rgba8,
        background: Rgba8,
        placement: Placement,
    ) -> Self {
        Self {
            text: text.into(),
            size_pt,
            dpi,
            font,
            foreground,
            background,
            placement,
        }
    }

    /// Font size in pixels at the configured DPI.
    pub fn size_px(&self) -> f32 {
        self.size_pt as f32 * self.dpi as f32 / 72.0
    }

    pub(crate) fn render(&self) -> LayerpressResult<Bitmap> {
        let size_px = self.size_px();
        let fg = self.foreground;
        let mut engine = TextLayoutEngine::new();
        let layout = engine.layout_line(
            &self.text,
            &self.font.layout_data,
            size_px,
            TextBrushRgba8 {
                r: fg.r,
                g: fg.g,
                b: fg.b,
                a: fg.a,
            },
        )?;

        // Room for glyph ink that overhangs the layout box (italics, swashes).
        let pad = INK_MARGIN_PX.max((size_px * 0.25).ceil() as u32);
        let layout_w = layout.width().max(0.0).ceil() as u32;
        let layout_h = layout.height().max(0.0).ceil() as u32;
        let (w, h) = (layout_w + 2 * pad, layout_h + 2 * pad);
        let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
            return Err(LayerpressError::render(format!(
                "text raster {w}x{h} exceeds {}x{} pixels",
                u16::MAX,
                u16::MAX
            )));
        };

        let font = &self.font.glyph_data;
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            f64::from(pad),
            f64::from(pad),
        )));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        let mut ink = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut ink);
        let ink = Bitmap::from_raw(w, h, ink)
            .ok_or_else(|| LayerpressError::render("glyph raster size mismatch"))?;

        let Some((x0, y0, x1, y1)) = ink_bounds(&ink) else {
            tracing::debug!("text {:?} produced no ink", self.text);
            return Ok(Bitmap::from_pixel(
                layout_w.max(1),
                layout_h.max(1),
                self.background.to_pixel(),
            ));
        };

        let x0 = x0.saturating_sub(INK_MARGIN_PX);
        let y0 = y0.saturating_sub(INK_MARGIN_PX);
        let x1 = (x1 + INK_MARGIN_PX).min(w - 1);
        let y1 = (y1 + INK_MARGIN_PX).min(h - 1);

        let bg = self.background.to_array();
        Ok(Bitmap::from_fn(x1 - x0 + 1, y1 - y0 + 1, |x, y| {
            image::Rgba(over(bg, ink.get_pixel(x0 + x, y0 + y).0))
        }))
    }
}

/// Inclusive bounding box of pixels with non-zero alpha.
fn ink_bounds(bitmap: &Bitmap) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in bitmap.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/text.rs"]
mod tests;
