mod app;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use phase_lattice::FieldConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// TOML file overriding any field setting
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible field
    #[arg(long)]
    seed: Option<u64>,

    /// Pin progress instead of following the scroll position
    #[arg(long)]
    progress: Option<f32>,

    #[arg(long)]
    reduced_motion: bool,

    #[arg(short, long)]
    verbose: bool,
}

/// `--verbose` wins, then `RUST_LOG`, then warnings only.
fn log_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn init_tracing(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = FieldConfig::load(args.config.as_deref())?;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([320.0, 240.0]),
        ..Default::default()
    };

    let launch = app::Launch {
        config,
        seed: args.seed,
        pinned_progress: args.progress,
        reduced_motion: args.reduced_motion,
    };

    eframe::run_native(
        "phase-lattice",
        options,
        Box::new(move |cc| Ok(Box::new(app::FieldApp::new(cc, launch)))),
    )
    .map_err(|error| anyhow!("window failed: {error}"))
}
