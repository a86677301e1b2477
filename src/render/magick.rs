use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

use crate::encode::{ensure_parent_dir, write_image};
use crate::foundation::core::{ColorSpace, OutputFormat};
use crate::foundation::error::{LayerpressError, LayerpressResult};
use crate::overlay::Rendered;
use crate::render::backend::{CompositeBackend, JobTarget};
use crate::render::rotate::rotate;

const CONVERT: &str = "convert";
const COMPOSITE: &str = "composite";

/// Backend that shells out to ImageMagick.
///
/// `begin` copies the background into the output file with `convert`; each `apply` writes the
/// layer to a job-private temporary PNG and composites it onto the output in place with
/// `composite -compose atop`. The temporary directory lives as long as the job, so it is
/// removed on success and on every error path.
pub struct MagickBackend {
    bin_dir: PathBuf,
    job: Option<MagickJob>,
}

struct MagickJob {
    target: JobTarget,
    scratch: TempDir,
    layers: usize,
}

impl MagickBackend {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            job: None,
        }
    }

    /// Scratch directory of the job in progress.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.job.as_ref().map(|j| j.scratch.path())
    }

    fn tool(&self, name: &str) -> PathBuf {
        self.bin_dir.join(name)
    }
}

impl CompositeBackend for MagickBackend {
    fn name(&self) -> &'static str {
        "magick"
    }

    fn begin(&mut self, target: &JobTarget) -> LayerpressResult<()> {
        let convert = self.tool(CONVERT);
        if !is_tool_available(&convert) {
            return Err(LayerpressError::subprocess(format!(
                "'{}' is not runnable (check the image tool directory)",
                convert.display()
            )));
        }

        let scratch = tempfile::Builder::new()
            .prefix("layerpress-")
            .tempdir()
            .map_err(|e| LayerpressError::io(format!("failed to create scratch dir: {e}")))?;

        ensure_parent_dir(&target.output)?;
        run_tool(
            &convert,
            &copy_background_args(&target.background, &target.output),
        )?;

        self.job = Some(MagickJob {
            target: target.clone(),
            scratch,
            layers: 0,
        });
        Ok(())
    }

    fn apply(&mut self, layer: Rendered) -> LayerpressResult<()> {
        let composite = self.tool(COMPOSITE);
        let job = self
            .job
            .as_mut()
            .ok_or_else(|| LayerpressError::subprocess("magick backend not started"))?;

        let p = layer.placement;
        let bitmap = rotate(layer.bitmap, p.rotation_degrees);
        let layer_path = job.scratch.path().join(format!("layer-{:03}.png", job.layers));
        job.layers += 1;
        write_image(&layer_path, &bitmap, OutputFormat::Png, ColorSpace::Rgba)?;

        run_tool(
            &composite,
            &composite_args(
                job.target.color_space,
                p.x_offset,
                p.y_offset,
                &layer_path,
                &job.target.output,
            ),
        )
    }

    fn finish(&mut self) -> LayerpressResult<PathBuf> {
        let job = self
            .job
            .take()
            .ok_or_else(|| LayerpressError::subprocess("magick backend not started"))?;
        let out = job.target.output.clone();
        job.scratch
            .close()
            .map_err(|e| LayerpressError::io(format!("failed to remove scratch dir: {e}")))?;
        Ok(out)
    }
}

/// `convert <bg> ( +clone ) -composite <out>`
pub(crate) fn copy_background_args(background: &Path, output: &Path) -> Vec<OsString> {
    vec![
        background.into(),
        "(".into(),
        "+clone".into(),
        ")".into(),
        "-composite".into(),
        output.into(),
    ]
}

/// `composite -colorspace <cs> -compose atop -geometry +X+Y <layer> <out> <out>`
pub(crate) fn composite_args(
    color_space: ColorSpace,
    x: i32,
    y: i32,
    layer: &Path,
    output: &Path,
) -> Vec<OsString> {
    vec![
        "-colorspace".into(),
        color_space.magick_name().into(),
        "-compose".into(),
        "atop".into(),
        "-geometry".into(),
        geometry(x, y).into(),
        layer.into(),
        output.into(),
        output.into(),
    ]
}

/// ImageMagick offset geometry; both components always carry a sign.
pub(crate) fn geometry(x: i32, y: i32) -> String {
    format!("{x:+}{y:+}")
}

fn run_tool(program: &Path, args: &[OsString]) -> LayerpressResult<()> {
    tracing::debug!(program = %program.display(), ?args, "running image tool");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            LayerpressError::subprocess(format!(
                "failed to spawn '{}': {e}",
                program.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LayerpressError::subprocess(format!(
            "'{}' exited with status {}: {}",
            program.display(),
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Return `true` when `program -version` runs successfully.
pub fn is_tool_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/render/magick.rs"]
mod tests;
