use std::fmt;
use std::path::{Path, PathBuf};

use crate::assets::color::resolve_color;
use crate::assets::fonts::FontBook;
use crate::config::model::{Context, OverlaySpec, RunConfig, resolve_relative};
use crate::config::template::Templater;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{LayerpressError, LayerpressResult};
use crate::overlay::{ImageOverlay, Overlay, OverlayKind, QrOverlay, TextOverlay};
use crate::render::backend::{BackendKind, JobTarget, check_output_support, create_backend};

/// Run-level knobs that are not part of the configuration document.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Directory output images are written to.
    pub out_dir: PathBuf,
    pub backend: BackendKind,
    /// Stop at the first failed job instead of collecting failures.
    pub fail_fast: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("output"),
            backend: BackendKind::Native,
            fail_fast: false,
        }
    }
}

/// One output image to produce.
#[derive(Clone, Debug)]
pub struct JobSpec {
    /// Output file stem, e.g. `0003_front`.
    pub name: String,
    pub output_index: usize,
    pub item_index: usize,
    pub target: JobTarget,
    pub overlays: Vec<OverlaySpec>,
    /// Run context merged with this job's item.
    pub context: Context,
}

/// A validated run: every job plus the run-wide resources they share.
#[derive(Debug)]
pub struct RunPlan {
    pub jobs: Vec<JobSpec>,
    pub fonts: FontBook,
    pub backend: BackendKind,
    base_dir: PathBuf,
}

/// A job that did not produce its output.
#[derive(Debug)]
pub struct JobFailure {
    pub job: String,
    pub error: LayerpressError,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job '{}': {}", self.job, self.error)
    }
}

/// Outcome of [`run`].
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<JobFailure>,
    /// Jobs never attempted because the run stopped early.
    pub skipped: usize,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped == 0
    }
}

/// `<item:04>_<prefix>.<ext>`
pub fn output_file_name(item_index: usize, prefix: &str, ext: &str) -> String {
    format!("{item_index:04}_{prefix}.{ext}")
}

/// Validate the whole run and expand it into jobs, outputs-major.
///
/// Every error returned here is run-fatal: bad formats or color spaces, negative offsets,
/// CMYK on the native backend, and fonts that fail to load.
pub fn plan(cfg: &RunConfig, options: &RunOptions) -> LayerpressResult<RunPlan> {
    cfg.validate()?;
    let default_format = cfg.default_format()?;
    let default_cs = cfg.default_color_space()?;

    // Output support is checked before any font or image file is opened.
    let mut targets = Vec::with_capacity(cfg.outputs.len());
    for output in &cfg.outputs {
        let format = output.format(default_format)?;
        let color_space = output.color_space(default_cs)?;
        check_output_support(&options.backend, format, color_space)
            .map_err(|e| e.context(format!("output '{}'", output.prefix)))?;
        targets.push((format, color_space));
    }

    let default_font = cfg.fontpath.as_deref().map(|p| cfg.resolve_path(p));
    let override_fonts: Vec<PathBuf> = cfg
        .outputs
        .iter()
        .flat_map(|o| &o.overlays)
        .filter(|o| o.kind == OverlayKind::Text)
        .filter_map(|o| o.font.as_deref())
        .map(|p| cfg.resolve_path(p))
        .collect();
    let fonts = if cfg.uses_text() {
        FontBook::load(
            default_font.as_deref(),
            override_fonts.iter().map(PathBuf::as_path),
        )?
    } else {
        FontBook::empty()
    };

    if cfg.items.is_empty() && !cfg.outputs.is_empty() {
        tracing::warn!("configuration has no items; no images will be produced");
    }

    let mut jobs = Vec::with_capacity(cfg.outputs.len() * cfg.items.len());
    for (output_index, (output, &(format, color_space))) in
        cfg.outputs.iter().zip(&targets).enumerate()
    {
        for overlay in output.overlays.iter().filter(|o| o.kind == OverlayKind::Text) {
            let font = overlay.font.as_deref().map(|p| cfg.resolve_path(p));
            fonts
                .resolve(font.as_deref())
                .map_err(|e| e.context(format!("output '{}'", output.prefix)))?;
        }

        let background = cfg.resolve_path(&output.background);
        for item_index in 0..cfg.items.len() {
            let file_name = output_file_name(item_index, &output.prefix, format.as_str());
            let name = file_name
                .rsplit_once('.')
                .map_or(file_name.as_str(), |(stem, _)| stem)
                .to_string();
            jobs.push(JobSpec {
                name,
                output_index,
                item_index,
                target: JobTarget {
                    background: background.clone(),
                    output: options.out_dir.join(&file_name),
                    format,
                    color_space,
                },
                overlays: output.overlays.clone(),
                context: cfg.item_context(item_index),
            });
        }
    }

    tracing::info!(jobs = jobs.len(), backend = ?options.backend, "run planned");
    Ok(RunPlan {
        jobs,
        fonts,
        backend: options.backend.clone(),
        base_dir: cfg.base_dir.clone(),
    })
}

/// Execute every job in order.
///
/// A failed job is recorded and the run moves on, unless `options.fail_fast` is set or the
/// error is run-fatal; in both cases the remaining jobs are counted as skipped.
pub fn run(plan: &RunPlan, options: &RunOptions) -> RunReport {
    let templater = Templater::new();
    let mut report = RunReport::default();

    for (i, job) in plan.jobs.iter().enumerate() {
        match execute_job(plan, &templater, job) {
            Ok(path) => {
                tracing::info!("generated '{}'", path.display());
                report.written.push(path);
            }
            Err(error) => {
                tracing::error!(job = %job.name, "{error}");
                let stop = options.fail_fast || error.is_run_fatal();
                report.failures.push(JobFailure {
                    job: job.name.clone(),
                    error,
                });
                if stop {
                    report.skipped = plan.jobs.len() - i - 1;
                    break;
                }
            }
        }
    }
    report
}

/// Load, plan and run a configuration file.
pub fn run_config_file(path: &Path, options: &RunOptions) -> LayerpressResult<RunReport> {
    let cfg = RunConfig::from_path(path)?;
    let plan = plan(&cfg, options)?;
    Ok(run(&plan, options))
}

#[tracing::instrument(skip(plan, templater, job), fields(job = %job.name))]
fn execute_job(
    plan: &RunPlan,
    templater: &Templater,
    job: &JobSpec,
) -> LayerpressResult<PathBuf> {
    let overlays = job
        .overlays
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            resolve_overlay(plan, templater, spec, &job.context)
                .map_err(|e| e.context(overlay_label(i, spec.kind)))
        })
        .collect::<LayerpressResult<Vec<_>>>()?;

    let mut backend = create_backend(&plan.backend);
    tracing::debug!(backend = backend.name(), "begin");
    backend.begin(&job.target)?;
    for (i, overlay) in overlays.iter().enumerate() {
        tracing::debug!("adding {} overlay #{}", overlay.kind(), i + 1);
        let rendered = overlay
            .render()
            .map_err(|e| e.context(overlay_label(i, overlay.kind())))?;
        backend
            .apply(rendered)
            .map_err(|e| e.context(overlay_label(i, overlay.kind())))?;
    }
    backend.finish()
}

fn resolve_overlay(
    plan: &RunPlan,
    templater: &Templater,
    spec: &OverlaySpec,
    ctx: &Context,
) -> LayerpressResult<Overlay> {
    let value = templater.render(&spec.template, ctx)?;
    let placement = spec.placement();
    let foreground = resolve_color(&spec.foreground, Rgba8::BLACK);
    let background = resolve_color(&spec.background, Rgba8::TRANSPARENT);

    let overlay = match spec.kind {
        OverlayKind::Image => {
            let source = resolve_relative(&plan.base_dir, Path::new(value.trim()));
            ImageOverlay::new(source, placement).into()
        }
        OverlayKind::Text => {
            let font_path = spec.font.as_deref().map(|p| resolve_relative(&plan.base_dir, p));
            let font = plan.fonts.resolve(font_path.as_deref())?;
            TextOverlay::new(
                value,
                spec.size_or_default(),
                spec.dpi_or_default(),
                font,
                foreground,
                background,
                placement,
            )
            .into()
        }
        OverlayKind::Qr => QrOverlay::new(
            value,
            spec.size_or_default(),
            foreground,
            background,
            placement,
        )
        .into(),
    };
    Ok(overlay)
}

fn overlay_label(index: usize, kind: OverlayKind) -> String {
    format!("overlay #{} ({kind})", index + 1)
}
