//! Water/lava reactions and obstacles washed away by flow.

use brine_utils::BlockPos;

use super::{FluidKind, FluidType, resolver::LevelAccess};
use crate::error::FluidError;
use crate::grid::{Grid, ObstacleKind, Occupant, Rock};

/// The block a reaction leaves behind, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    /// The cell turned solid.
    pub pos: BlockPos,
    /// What it turned into.
    pub product: Rock,
}

/// Decides the product of water at `water` touching lava at `lava`.
///
/// Lava falling onto water hardens the water cell into stone; any other
/// contact hardens the lava cell into cobblestone. A lava level above
/// `threshold` yields obsidian instead.
#[must_use]
pub fn reaction(water: BlockPos, lava: BlockPos, lava_level: i32, threshold: i32) -> Reaction {
    let strong = lava_level > threshold;
    if lava.y() > water.y() {
        Reaction {
            pos: water,
            product: if strong { Rock::Obsidian } else { Rock::Stone },
        }
    } else {
        Reaction {
            pos: lava,
            product: if strong { Rock::Obsidian } else { Rock::Cobblestone },
        }
    }
}

/// Resolves contact between the updating `source` cell and the other fluid at `target`.
///
/// Both cells lose all their fluid; the product of [`reaction`] takes one of them.
pub fn react<G: Grid>(
    access: &mut LevelAccess<'_, G>,
    source: &FluidType,
    source_pos: BlockPos,
    source_level: i32,
    target: BlockPos,
) -> Result<Reaction, FluidError> {
    let (water_pos, lava_pos, lava_level) = match source.kind {
        FluidKind::Water => (source_pos, target, access.level(FluidKind::Lava, target)?),
        FluidKind::Lava => (target, source_pos, source_level.min(source.max_fluid)),
    };
    let outcome = reaction(water_pos, lava_pos, lava_level, source.reaction_threshold());

    access.set_level(FluidKind::Water, water_pos, 0, true)?;
    access.set_level(FluidKind::Lava, lava_pos, 0, true)?;
    access
        .grid_mut()
        .set_occupant(outcome.pos, Occupant::Solid(outcome.product), 0);
    log::trace!(
        "{} at {source_pos} reacted, {:?} formed at {}",
        source.kind,
        outcome.product,
        outcome.pos
    );
    Ok(outcome)
}

/// Tries to destroy `obstacle` at `pos` in the path of a flow.
///
/// Only breakable obstacles give way, and only to downward flow or to a
/// source above the fluid's break threshold. Returns whether the cell is now free.
pub fn wash_away<G: Grid>(
    access: &mut LevelAccess<'_, G>,
    fluid: &FluidType,
    pos: BlockPos,
    obstacle: ObstacleKind,
    downward: bool,
    source_level: i32,
) -> bool {
    if !obstacle.is_breakable() || !(downward || source_level > fluid.break_threshold) {
        return false;
    }
    access.grid_mut().destroy(pos, true);
    log::trace!("{} washed away {obstacle:?} at {pos}", fluid.kind);
    true
}
