use std::path::PathBuf;

use crate::assets::decode::load_image;
use crate::foundation::core::{Bitmap, Placement};
use crate::foundation::error::LayerpressResult;

/// Image file composited as-is.
#[derive(Clone, Debug)]
pub struct ImageOverlay {
    pub source: PathBuf,
    pub placement: Placement,
}

impl ImageOverlay {
    pub fn new(source: impl Into<PathBuf>, placement: Placement) -> Self {
        Self {
            source: source.into(),
            placement,
        }
    }

    pub(crate) fn render(&self) -> LayerpressResult<Bitmap> {
        load_image(&self.source)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/raster.rs"]
mod tests;
