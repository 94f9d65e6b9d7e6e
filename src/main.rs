use std::path::Path;

use anyhow::Context;
use bench::BenchmarkHarness;
use config::{BenchConfig, GENERATED_DIR, IMAGE_FILE, TIMING_FILE};
use log::info;
use output::FileSink;

pub mod bench;
pub mod colors;
pub mod config;
pub mod error;
pub mod fractals;
pub mod output;
pub mod pixel_buffer;
pub mod tiles;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = BenchConfig::default();
    let mut harness =
        BenchmarkHarness::new(config).context("Failed to set up the grain-size benchmark")?;

    let mut sink = FileSink::new(Path::new(GENERATED_DIR), IMAGE_FILE, TIMING_FILE);
    let series = harness
        .run_into(&mut sink)
        .context("Grain-size benchmark failed")?;

    info!("Benchmarked {} grain sizes", series.len());
    Ok(())
}
