use std::path::PathBuf;

use crate::foundation::core::{ColorSpace, OutputFormat};
use crate::foundation::error::{LayerpressError, LayerpressResult};
use crate::overlay::Rendered;

/// Inputs and outputs of one compositing job, as seen by a backend.
#[derive(Clone, Debug)]
pub struct JobTarget {
    /// Background image the canvas is seeded from.
    pub background: PathBuf,
    /// Final image path.
    pub output: PathBuf,
    pub format: OutputFormat,
    pub color_space: ColorSpace,
}

/// Compositing strategy contract.
///
/// Ordering contract: `begin` once, then `apply` for each overlay in z-order (bottom first),
/// then `finish` once. Backends consume identical [`Rendered`] layers, so overlay producers
/// never know which backend is active.
pub trait CompositeBackend {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
    /// Seed the output from the job's background.
    fn begin(&mut self, target: &JobTarget) -> LayerpressResult<()>;
    /// Rotate (if requested) and blend one layer on top of everything applied so far.
    fn apply(&mut self, layer: Rendered) -> LayerpressResult<()>;
    /// Flush the result to `target.output` and return its path.
    fn finish(&mut self) -> LayerpressResult<PathBuf>;
}

/// Available backend kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process blending; RGB/RGBA output only.
    #[default]
    Native,
    /// Delegates blending to ImageMagick's `convert`/`composite` found in `bin_dir`.
    Magick {
        /// Directory holding the ImageMagick binaries.
        bin_dir: PathBuf,
    },
}

impl BackendKind {
    /// External backend when a tool directory is configured, native otherwise.
    pub fn from_bin_dir(bin_dir: Option<PathBuf>) -> Self {
        match bin_dir {
            Some(bin_dir) => Self::Magick { bin_dir },
            None => Self::Native,
        }
    }
}

/// Reject format/color-space combinations a backend cannot produce.
///
/// Called for every job before any asset is opened.
pub fn check_output_support(
    kind: &BackendKind,
    format: OutputFormat,
    color_space: ColorSpace,
) -> LayerpressResult<()> {
    match (kind, color_space) {
        (BackendKind::Native, ColorSpace::Cmyk) => {
            let why = if format.is_lossy_rgb_only() {
                format!("{format} output is rgb-only")
            } else {
                format!("the native {format} encoder cannot write cmyk")
            };
            Err(LayerpressError::config(format!(
                "cmyk colorspace requires an external image tool directory ({why})"
            )))
        }
        _ => Ok(()),
    }
}

/// Create a fresh backend for one job.
pub fn create_backend(kind: &BackendKind) -> Box<dyn CompositeBackend> {
    match kind {
        BackendKind::Native => Box::new(crate::render::native::NativeBackend::new()),
        BackendKind::Magick { bin_dir } => {
            Box::new(crate::render::magick::MagickBackend::new(bin_dir.clone()))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
