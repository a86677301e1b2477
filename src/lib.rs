//! Layerpress composites decorative overlays onto background images.
//!
//! A run is described by a configuration document: a set of outputs (background plus an
//! ordered overlay stack) crossed with a list of items (template variables). Every
//! output/item pair becomes one job that produces one image.
//!
//! - Overlay producers ([`Overlay`]) turn text, QR payloads or image files into bitmaps.
//! - The compositor ([`Canvas`]) blends them, in order, onto the decoded background.
//! - A [`CompositeBackend`] does the blending: in-process, or through ImageMagick for CMYK.
//! - [`plan`] validates a run up front and [`run`] executes it, collecting per-job failures.
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod encode;
mod foundation;
pub mod overlay;
pub mod pipeline;
pub mod render;

pub use crate::foundation::core::{
    Affine, Bitmap, ColorSpace, OutputFormat, Placement, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{LayerpressError, LayerpressResult};

pub use crate::assets::color::resolve_color;
pub use crate::assets::fonts::{FontBook, LoadedFont};
pub use crate::config::model::{Context, OutputSpec, OverlaySpec, RunConfig};
pub use crate::config::template::Templater;
pub use crate::encode::{encode, write_image};
pub use crate::overlay::{ImageOverlay, Overlay, OverlayKind, QrOverlay, Rendered, TextOverlay};
pub use crate::pipeline::{
    JobFailure, JobSpec, RunOptions, RunPlan, RunReport, plan, run, run_config_file,
};
pub use crate::render::backend::{
    BackendKind, CompositeBackend, JobTarget, check_output_support, create_backend,
};
pub use crate::render::composite::{Canvas, blend};
pub use crate::render::rotate::rotate;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
