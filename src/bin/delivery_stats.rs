//! Delivery Stats Binary - windowed average delivery time
//!
//! Reads a newline-delimited JSON log of translation events and writes, for
//! every minute between the first and last event, the average delivery
//! duration of the deliveries seen in the trailing window.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin delivery_stats -- --input_file events.json --window_size 10
//! ```
//!
//! ## Environment Variables
//!
//! - RUST_LOG - Logging level (optional, default: info)

use anyhow::{Context, Result};
use clap::Parser;
use delivery_stats::aggregator_core::{AggregateSink, AggregatorWriter};
use delivery_stats::pipeline::{
    OutputTarget, PipelineConfig, PipelineEngine, DEFAULT_FREQUENCY_MINUTES, DEFAULT_OUTPUT_PATH,
};
use std::path::PathBuf;

/// Average translation delivery time over a trailing window
#[derive(Parser, Debug)]
#[command(name = "delivery_stats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Newline-delimited JSON file of translation events
    #[arg(short = 'i', long = "input_file")]
    input_file: PathBuf,

    /// Trailing window size in minutes
    #[arg(short = 'w', long = "window_size")]
    window_size: u32,

    /// Minutes between two output points
    #[arg(
        short = 'f',
        long,
        default_value_t = DEFAULT_FREQUENCY_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    frequency: u32,

    /// Output file, or `-` for stdout
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_PATH)]
    output: String,

    /// Skip records that are not valid deliveries instead of aborting
    #[arg(long = "skip-invalid")]
    skip_invalid: bool,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.input_file, self.window_size);
        config.frequency_minutes = self.frequency;
        config.output = OutputTarget::parse(&self.output);
        config.skip_invalid = self.skip_invalid;
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = cli.into_config();

    log::info!("🚀 Starting delivery stats");
    log::info!("   Input: {}", config.input_path.display());
    log::info!("   Window size: {}m", config.window_size_minutes);
    log::info!("   Frequency: {}m", config.frequency_minutes);
    log::info!("   Skip invalid: {}", config.skip_invalid);

    let mut writer = AggregatorWriter::new(&config.output);
    log::info!("📊 Backend: {}", writer.backend_type());

    let engine = PipelineEngine::new(config).context("invalid configuration")?;
    let summary = engine
        .run(&mut writer)
        .with_context(|| format!("failed to process {}", engine.config().input_path.display()))?;

    log::info!(
        "✅ Done: {} records read, {} skipped, {} points written",
        summary.records_read,
        summary.records_skipped,
        summary.points_written
    );

    Ok(())
}
