use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{LayerpressError, LayerpressResult};

/// A parsed font file, held in the forms layout and glyph rendering consume.
///
/// Both blobs are reference counted, so laying out and drawing text never copies the file.
#[derive(Clone)]
pub struct LoadedFont {
    /// Where the bytes were read from.
    pub path: PathBuf,
    /// Family name reported by the font itself.
    pub family: String,
    pub(crate) layout_data: parley::fontique::Blob<u8>,
    pub(crate) glyph_data: vello_cpu::peniko::FontData,
}

impl LoadedFont {
    /// Read and validate a font file.
    pub fn load(path: &Path) -> LayerpressResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            LayerpressError::render(format!("unable to read font file '{}': {e}", path.display()))
        })?;
        Self::from_bytes(path, bytes)
    }

    /// Validate in-memory font bytes, registering them in a scratch collection.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> LayerpressResult<Self> {
        let path = path.into();
        let glyph_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0);
        let layout_data = parley::fontique::Blob::from(bytes);
        let mut engine = TextLayoutEngine::new();
        let family = engine.register(&layout_data).map_err(|e| {
            e.context(format!("unable to parse font file '{}'", path.display()))
        })?;
        Ok(Self {
            path,
            family,
            layout_data,
            glyph_data,
        })
    }
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("path", &self.path)
            .field("family", &self.family)
            .field("bytes", &self.layout_data.len())
            .finish()
    }
}

/// Run-wide, immutable set of fonts: the default font plus per-overlay overrides.
///
/// Built once before any job renders and shared by reference with every text producer.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    default: Option<Arc<LoadedFont>>,
    by_path: BTreeMap<PathBuf, Arc<LoadedFont>>,
}

impl FontBook {
    /// An empty book; text overlays cannot resolve a font from it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the default font (if any) and every override path, each file once.
    pub fn load<'a>(
        default: Option<&Path>,
        overrides: impl IntoIterator<Item = &'a Path>,
    ) -> LayerpressResult<Self> {
        let mut book = Self::empty();
        if let Some(path) = default {
            book.default = Some(book.intern(path)?);
        }
        for path in overrides {
            book.intern(path)?;
        }
        Ok(book)
    }

    fn intern(&mut self, path: &Path) -> LayerpressResult<Arc<LoadedFont>> {
        if let Some(f) = self.by_path.get(path) {
            return Ok(f.clone());
        }
        tracing::debug!("loading font '{}'", path.display());
        let font = Arc::new(LoadedFont::load(path)?);
        self.by_path.insert(path.to_path_buf(), font.clone());
        Ok(font)
    }

    /// Resolve the font for an overlay: its override when given, else the run default.
    pub fn resolve(&self, override_path: Option<&Path>) -> LayerpressResult<Arc<LoadedFont>> {
        match override_path {
            Some(p) => self.by_path.get(p).cloned().ok_or_else(|| {
                LayerpressError::config(format!("font '{}' was not loaded for this run", p.display()))
            }),
            None => self.default.clone().ok_or_else(|| {
                LayerpressError::config("text overlay needs a font, but no fontpath is configured")
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register a font blob and return the family name of the first face.
    pub(crate) fn register(
        &mut self,
        font: &parley::fontique::Blob<u8>,
    ) -> LayerpressResult<String> {
        let families = self.font_ctx.collection.register_fonts(font.clone(), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| LayerpressError::render("no font families registered from font bytes"))?;

        Ok(self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LayerpressError::render("registered font family has no name"))?
            .to_string())
    }

    /// Shape and lay out a single unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &parley::fontique::Blob<u8>,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> LayerpressResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LayerpressError::render(
                "text size must be finite and > 0",
            ));
        }

        let family_name = self.register(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
