use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Composite text, QR codes and images onto backgrounds, one image per output and item.
#[derive(Parser, Debug)]
#[command(name = "layerpress", version)]
struct Cli {
    /// Run configuration (YAML, or JSON with a `.json` extension).
    #[arg(short = 'i', long = "in", alias = "infile")]
    in_path: PathBuf,

    /// Directory generated images are written to.
    #[arg(short = 'o', long = "out-dir", alias = "outdir", default_value = "output")]
    out_dir: PathBuf,

    /// Directory containing ImageMagick's `convert` and `composite`.
    ///
    /// Enables the external backend, which is required for cmyk output.
    #[arg(long)]
    magick_bin: Option<PathBuf>,

    /// Stop at the first failed job.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    /// Log per-overlay progress (`RUST_LOG` takes precedence).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir '{}'", cli.out_dir.display()))?;

    let options = layerpress::RunOptions {
        out_dir: cli.out_dir.clone(),
        backend: layerpress::BackendKind::from_bin_dir(cli.magick_bin),
        fail_fast: cli.fail_fast,
    };

    let cfg = layerpress::RunConfig::from_path(&cli.in_path)?;
    let plan = layerpress::plan(&cfg, &options)?;
    let report = layerpress::run(&plan, &options);

    for failure in &report.failures {
        eprintln!("{failure}");
    }
    if report.skipped > 0 {
        eprintln!("{} job(s) skipped", report.skipped);
    }
    eprintln!(
        "wrote {} image(s) to {}",
        report.written.len(),
        cli.out_dir.display()
    );

    if !report.is_success() {
        anyhow::bail!("{} of {} job(s) failed", report.failures.len(), plan.jobs.len());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "layerpress=debug" } else { "layerpress=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
