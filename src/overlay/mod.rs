//! Overlay producers: each turns its input into a bitmap plus placement.

mod qr;
mod raster;
mod text;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Bitmap, Placement};
use crate::foundation::error::LayerpressResult;

pub use self::qr::QrOverlay;
pub use self::raster::ImageOverlay;
pub use self::text::TextOverlay;

/// Overlay variant tag, as written in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    /// Raster (or SVG) file loaded from disk.
    Image,
    /// Rasterized text run.
    Text,
    /// QR code symbol.
    Qr,
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Qr => "qr",
        })
    }
}

/// Output of a producer: the pixels and where to put them.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub bitmap: Bitmap,
    pub placement: Placement,
}

/// A resolved overlay, ready to render. Immutable after construction.
#[derive(Clone, Debug)]
pub enum Overlay {
    Image(ImageOverlay),
    Text(TextOverlay),
    Qr(QrOverlay),
}

impl Overlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::Image(_) => OverlayKind::Image,
            Self::Text(_) => OverlayKind::Text,
            Self::Qr(_) => OverlayKind::Qr,
        }
    }

    pub fn placement(&self) -> Placement {
        match self {
            Self::Image(o) => o.placement,
            Self::Text(o) => o.placement,
            Self::Qr(o) => o.placement,
        }
    }

    /// Produce the overlay's bitmap. Rotation is not applied here; see [`crate::render::rotate`].
    pub fn render(&self) -> LayerpressResult<Rendered> {
        let bitmap = match self {
            Self::Image(o) => o.render()?,
            Self::Text(o) => o.render()?,
            Self::Qr(o) => o.render()?,
        };
        Ok(Rendered {
            bitmap,
            placement: self.placement(),
        })
    }
}

impl From<ImageOverlay> for Overlay {
    fn from(o: ImageOverlay) -> Self {
        Self::Image(o)
    }
}

impl From<TextOverlay> for Overlay {
    fn from(o: TextOverlay) -> Self {
        Self::Text(o)
    }
}

impl From<QrOverlay> for Overlay {
    fn from(o: QrOverlay) -> Self {
        Self::Qr(o)
    }
}
