//! fluid-keys - play the keyboard, watch the waveform
//!
//! Run with: cargo run -- [--config instrument.json]

mod app;
mod input;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fluid_keys::{engine::AudioEngine, InstrumentConfig};

#[derive(Parser, Debug)]
#[command(name = "fluid-keys", version, about = "Terminal keyboard instrument with a live scope")]
struct Args {
    /// JSON instrument config (keymap, envelope, visuals)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs here (filtered by RUST_LOG). The terminal belongs to the
    /// UI, so nothing is logged without a file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Override the configured frame rate
    #[arg(long)]
    fps: Option<f32>,

    /// Without key-release events, treat a key as lifted after this long
    /// without a repeat
    #[arg(long, default_value_t = 600)]
    hold_ms: u64,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    init_logging(&args)?;

    let mut config = match &args.config {
        Some(path) => InstrumentConfig::from_json_file(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => InstrumentConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.visuals.frame_rate = fps;
        config.validate().wrap_err("invalid --fps")?;
    }

    // Without an output device there is nothing to play; fail before
    // taking over the terminal
    let (engine, tap) = AudioEngine::start(&config).wrap_err("failed to start audio output")?;
    info!(
        sample_rate = engine.sample_rate(),
        keys = config.keymap.len(),
        "instrument ready"
    );

    let terminal = ratatui::init();
    let result = app::run(terminal, engine, tap, &config, Duration::from_millis(args.hold_ms));
    ratatui::restore();
    result
}

fn init_logging(args: &Args) -> EyreResult<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
