//! Runs the fluid simulation on a small in-memory world.

use std::{env, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use brine_core::FluidSimulation;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

mod config;
mod demo;

use config::BrineConfig;

fn init_logging(fallback: &str) -> Result<()> {
    LogTracer::init().context("failed to bridge log records")?;
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")?;
    Ok(())
}

fn main() -> Result<()> {
    let path = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("brine_config.json5"), PathBuf::from);
    let config = BrineConfig::load_or_create(&path)?;
    init_logging(&config.log_level)?;
    log::info!("Loaded config from {}", path.display());

    let mut sim = FluidSimulation::new(config.fluid.clone())?;
    let mut grid = demo::build(&mut sim, &config.demo)?;

    let start = Instant::now();
    let ticks = demo::run(&mut sim, &mut grid, &config.demo)?;
    log::info!("Ran {ticks} ticks in {:?}", start.elapsed());

    demo::summarize(&sim, &grid);
    Ok(())
}
