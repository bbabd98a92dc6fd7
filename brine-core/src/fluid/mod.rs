//! Fluid behavior system.
//!
//! Fluids are plain [`FluidType`] descriptors; all behavior lives in free
//! functions that take the descriptor of the fluid being updated.

pub mod codec;
pub mod displace;
pub mod flow;
pub mod flow_vector;
pub mod interaction;
pub mod level_store;
pub mod passability;
pub mod resolver;
pub mod scheduler;

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::config::FluidConfig;
use crate::grid::Occupant;

/// The simulated fluids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidKind {
    /// Fast and runny.
    Water,
    /// Slow and thick.
    Lava,
}

impl FluidKind {
    /// Every kind, in index order.
    pub const ALL: [Self; 2] = [Self::Water, Self::Lava];

    /// Dense index for per-kind tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Higher runniness means a lower viscosity.
    const fn runniness(self) -> u32 {
        match self {
            Self::Water => 4,
            Self::Lava => 3,
        }
    }
}

impl Display for FluidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Water => "water",
            Self::Lava => "lava",
        })
    }
}

/// Immutable flow parameters of one fluid kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluidType {
    /// Which fluid this describes.
    pub kind: FluidKind,
    /// Level of a full cell.
    pub max_fluid: i32,
    /// Smallest amount worth spreading sideways.
    pub viscosity: i32,
    /// Updates happen every `flow_rate` scheduling periods.
    pub flow_rate: u32,
    /// Ticks between two updates of a slow store.
    pub period: u64,
    /// Extra pressure per cell of fluid column above.
    pub pressure_gain: i32,
    /// Pressure lost per cell travelled.
    pub pressure_loss: i32,
    /// Level above which sideways flow washes away decorations.
    pub break_threshold: i32,
}

impl FluidType {
    /// Derives the parameters of `kind` from the configured maximum and rates.
    #[must_use]
    pub fn new(kind: FluidKind, config: &FluidConfig) -> Self {
        let max = config.max_fluid;
        let flow_rate = match kind {
            FluidKind::Water => config.water_flow_rate,
            FluidKind::Lava => config.lava_flow_rate,
        };
        Self {
            kind,
            max_fluid: max,
            viscosity: max >> kind.runniness(),
            flow_rate,
            period: u64::from(config.global_rate) * u64::from(flow_rate),
            pressure_gain: (max >> 5).max(1),
            pressure_loss: (max >> 16).max(1),
            break_threshold: max >> 3,
        }
    }

    /// The viscosity that applies to a cell resting on `below`.
    ///
    /// Fluid sitting on more of itself spreads almost freely.
    #[must_use]
    pub fn effective_viscosity(&self, below: Occupant, below_level: i32) -> i32 {
        if below.holds(self.kind) && below_level > 0 {
            (self.viscosity >> 15).max(1)
        } else {
            self.viscosity
        }
    }

    /// The level that makes reactions yield the strong product.
    #[must_use]
    pub const fn reaction_threshold(&self) -> i32 {
        self.max_fluid - self.max_fluid / 3
    }
}

/// The descriptors of every fluid kind.
#[derive(Debug, Clone)]
pub struct Fluids {
    types: [FluidType; 2],
}

impl Fluids {
    /// Builds all descriptors from `config`.
    #[must_use]
    pub fn new(config: &FluidConfig) -> Self {
        Self {
            types: FluidKind::ALL.map(|kind| FluidType::new(kind, config)),
        }
    }

    /// The descriptor of `kind`.
    #[must_use]
    pub const fn get(&self, kind: FluidKind) -> &FluidType {
        &self.types[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let fluids = Fluids::new(&FluidConfig::default());
        let water = fluids.get(FluidKind::Water);
        assert_eq!(water.viscosity, 128);
        assert_eq!(water.pressure_gain, 64);
        assert_eq!(water.pressure_loss, 1);
        assert_eq!(water.break_threshold, 256);
        assert_eq!(water.period, 5);

        let lava = fluids.get(FluidKind::Lava);
        assert_eq!(lava.viscosity, 256);
        assert_eq!(lava.period, 20);
        assert_eq!(lava.reaction_threshold(), 2048 - 682);
    }

    #[test]
    fn test_effective_viscosity_on_same_fluid() {
        let water = *Fluids::new(&FluidConfig::default()).get(FluidKind::Water);
        let below = Occupant::Fluid(FluidKind::Water);
        assert_eq!(water.effective_viscosity(below, 100), 1);
        assert_eq!(water.effective_viscosity(below, 0), 128);
        assert_eq!(water.effective_viscosity(Occupant::Air, 0), 128);
        assert_eq!(
            water.effective_viscosity(Occupant::Fluid(FluidKind::Lava), 2048),
            128
        );
    }
}
