//! The host world as seen by the fluid engine.

mod memory;

pub use memory::MemoryGrid;

use brine_utils::{BlockPos, ChunkPos};
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::fluid::FluidKind;

/// Solid blocks, including the ones produced by fluid reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rock {
    /// Lava flowing onto water.
    Stone,
    /// Water reaching thin lava.
    Cobblestone,
    /// Water reaching thick lava.
    Obsidian,
    /// Terrain the engine never changes.
    Bedrock,
}

/// Non-solid blocks that interact with flowing fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Plants, torches and similar. Washed away by strong or falling flow.
    Decoration,
    /// Lets fluid through along straight paths.
    Fence,
    /// Lets fluid through along straight paths.
    IronBars,
    /// Holds fluid back.
    Door,
    /// Holds fluid back.
    Sign,
    /// Holds fluid back.
    Ladder,
    /// Holds fluid back.
    Reeds,
    /// Holds fluid back.
    Portal,
}

impl ObstacleKind {
    /// Whether fluid can pass through on a non-diagonal path.
    #[must_use]
    pub const fn is_permeable(self) -> bool {
        matches!(self, Self::Fence | Self::IronBars)
    }

    /// Whether fluid can destroy this obstacle.
    #[must_use]
    pub const fn is_breakable(self) -> bool {
        matches!(self, Self::Decoration)
    }
}

/// What occupies a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupant {
    /// Empty.
    Air,
    /// A fluid cell; its level lives in the engine's stores.
    Fluid(FluidKind),
    /// A non-solid block.
    Obstacle(ObstacleKind),
    /// A solid block.
    Solid(Rock),
}

impl Occupant {
    /// Whether the cell is empty.
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Whether the cell holds fluid of `kind`.
    #[must_use]
    pub fn holds(self, kind: FluidKind) -> bool {
        self == Self::Fluid(kind)
    }

    /// Whether entities are stopped by this occupant.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        match self {
            Self::Air | Self::Fluid(_) => false,
            Self::Obstacle(kind) => !matches!(
                kind,
                ObstacleKind::Decoration | ObstacleKind::Reeds | ObstacleKind::Portal
            ),
            Self::Solid(_) => true,
        }
    }
}

/// Block storage the fluid engine reads and writes.
///
/// Implementations own occupant and metadata storage; the engine owns fluid
/// levels and only mirrors them into the grid through [`Grid::set_occupant`].
pub trait Grid {
    /// Lowest valid y.
    fn min_y(&self) -> i32;

    /// One past the highest valid y.
    fn max_y(&self) -> i32;

    /// Whether `y` is inside the vertical range.
    fn is_in_height(&self, y: i32) -> bool {
        y >= self.min_y() && y < self.max_y()
    }

    /// Makes `chunk` accessible, loading or generating it if needed.
    fn load_chunk(&mut self, chunk: ChunkPos) -> Result<(), GridError>;

    /// The occupant at `pos`. Cells outside the world read as solid.
    fn occupant(&self, pos: BlockPos) -> Occupant;

    /// The per-cell metadata at `pos`; for fluids this is the display state.
    fn metadata(&self, pos: BlockPos) -> u8;

    /// Replaces the occupant and metadata at `pos`.
    fn set_occupant(&mut self, pos: BlockPos, occupant: Occupant, metadata: u8);

    /// Removes whatever is at `pos`, leaving air, and optionally drops it as an item.
    fn destroy(&mut self, pos: BlockPos, drop_item: bool);
}
