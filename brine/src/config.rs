use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use brine_core::FluidConfig;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../package-content/brine_config.json5");

/// Everything read from `brine_config.json5`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrineConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    pub fluid: FluidConfig,
    pub demo: DemoConfig,
}

/// Shape of the world the executable builds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub basin_size: i32,
    pub basin_height: i32,
    pub water_column: i32,
    pub lava_pool: i32,
    pub max_ticks: u64,
    pub report_interval: u64,
}

impl Default for BrineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fluid: FluidConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            basin_size: 24,
            basin_height: 6,
            water_column: 5,
            lava_pool: 3,
            max_ticks: 4000,
            report_interval: 200,
        }
    }
}

impl BrineConfig {
    /// Reads the config at `path`, writing the default one first if it is missing.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let config_str = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json5::from_str(&config_str)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG)
                .with_context(|| format!("failed to write {}", path.display()))?;
            serde_json5::from_str(DEFAULT_CONFIG)?
        };
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.fluid.validate()?;
        let demo = &self.demo;
        if !(1..=256).contains(&demo.basin_size) {
            return Err(anyhow!("basin_size must be in range 1..=256"));
        }
        if !(1..=64).contains(&demo.basin_height) {
            return Err(anyhow!("basin_height must be in range 1..=64"));
        }
        if demo.water_column < 0 || demo.water_column > demo.basin_height {
            return Err(anyhow!("water_column must be in range 0..=basin_height"));
        }
        if demo.lava_pool < 0 || demo.lava_pool > demo.basin_size / 2 {
            return Err(anyhow!("lava_pool must be at most half of basin_size"));
        }
        Ok(())
    }
}
