//! Attention-deviation report generator for recorded proctoring sessions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use proctor_signal::config::Config;
use proctor_signal::pipeline::AttentionPipeline;
use proctor_signal::signal::read_measurements;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines file of per-frame measurements from the landmark provider
    #[arg(short, long)]
    signals: PathBuf,

    /// Frame width in pixels, used for the camera model
    #[arg(long, default_value = "960")]
    frame_width: f64,

    /// Frame height in pixels, used for the camera model
    #[arg(long, default_value = "540")]
    frame_height: f64,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    config.validate().context("invalid configuration")?;

    let measurements = read_measurements(&args.signals)
        .with_context(|| format!("failed to read signals from {}", args.signals.display()))?;
    info!("Loaded {} frame measurements", measurements.len());

    let mut pipeline = AttentionPipeline::new(&config, args.frame_width, args.frame_height);
    for measurement in &measurements {
        pipeline.process(measurement);
    }
    let report = pipeline.finalize();

    for group in &report.gestures {
        info!("{}: {} occurrence(s)", group.name, group.occurrence.len());
    }
    info!(
        "Processed {} frames covering {}s",
        report.processing_metadata.frames_processed, report.processing_metadata.video_duration_sec
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
