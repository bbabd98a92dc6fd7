//! Simulation parameters.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest accepted `max_fluid`; below this the derived viscosities reach zero.
pub const MIN_MAX_FLUID: i32 = 64;
/// Largest accepted `max_fluid`.
pub const MAX_MAX_FLUID: i32 = 1 << 24;

/// Tunable parameters shared by every fluid kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Level of a full cell.
    pub max_fluid: i32,
    /// Base scheduling period in ticks.
    pub global_rate: u32,
    /// Water updates every `global_rate * water_flow_rate` ticks.
    pub water_flow_rate: u32,
    /// Lava updates every `global_rate * lava_flow_rate` ticks.
    pub lava_flow_rate: u32,
    /// Seed of the rotation random source.
    pub seed: u64,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            max_fluid: 2048,
            global_rate: 5,
            water_flow_rate: 1,
            lava_flow_rate: 4,
            seed: 0,
        }
    }
}

impl FluidConfig {
    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_MAX_FLUID..=MAX_MAX_FLUID).contains(&self.max_fluid) {
            return Err(ConfigError::Invalid("max_fluid must be in range 64..=16777216"));
        }
        if self.global_rate == 0 {
            return Err(ConfigError::Invalid("global_rate must be positive"));
        }
        if self.water_flow_rate == 0 || self.lava_flow_rate == 0 {
            return Err(ConfigError::Invalid("flow rates must be positive"));
        }
        Ok(())
    }
}
