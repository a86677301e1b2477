use std::path::PathBuf;

use crate::assets::decode::load_image;
use crate::encode::write_image;
use crate::foundation::error::{LayerpressError, LayerpressResult};
use crate::overlay::Rendered;
use crate::render::backend::{CompositeBackend, JobTarget};
use crate::render::composite::Canvas;
use crate::render::rotate::rotate;

/// In-process backend: decodes the background into a [`Canvas`] and blends every layer on it.
#[derive(Debug, Default)]
pub struct NativeBackend {
    state: Option<(JobTarget, Canvas)>,
}

impl NativeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canvas of the job in progress, if any.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.state.as_ref().map(|(_, c)| c)
    }

    fn state_mut(&mut self) -> LayerpressResult<&mut (JobTarget, Canvas)> {
        self.state.as_mut().ok_or_else(|| {
            LayerpressError::Other(anyhow::anyhow!("native backend used before begin"))
        })
    }
}

impl CompositeBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn begin(&mut self, target: &JobTarget) -> LayerpressResult<()> {
        let background = load_image(&target.background).map_err(|e| e.context("background"))?;
        self.state = Some((target.clone(), Canvas::from_background(background)));
        Ok(())
    }

    fn apply(&mut self, layer: Rendered) -> LayerpressResult<()> {
        let (_, canvas) = self.state_mut()?;
        let p = layer.placement;
        let bitmap = rotate(layer.bitmap, p.rotation_degrees);
        canvas.apply(&bitmap, p.x_offset, p.y_offset);
        Ok(())
    }

    fn finish(&mut self) -> LayerpressResult<PathBuf> {
        let (target, canvas) = self.state.take().ok_or_else(|| {
            LayerpressError::Other(anyhow::anyhow!("native backend finished before begin"))
        })?;
        write_image(
            &target.output,
            canvas.pixels(),
            target.format,
            target.color_space,
        )?;
        Ok(target.output)
    }
}
