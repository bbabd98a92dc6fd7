//! Whether fluid can move from one cell into a neighbour.

use brine_utils::BlockPos;

use super::{FluidType, interaction, resolver::LevelAccess};
use crate::error::FluidError;
use crate::grid::{Grid, Occupant};

/// The outcome of [`check_flow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    /// Nothing moves.
    Blocked,
    /// Fluid moves into the cell this many steps away; 1 is the neighbour
    /// itself, larger values skip over a permeable obstruction.
    Open(i32),
    /// The source reacted with another fluid and no longer exists.
    Consumed,
}

/// Tests the step `(dx, dy, dz)` from `from`, whose neighbour holds `occupant`.
///
/// May change the world: decorations in the way get washed away, and a
/// different fluid reacts with the source.
pub fn check_flow<G: Grid>(
    access: &mut LevelAccess<'_, G>,
    fluid: &FluidType,
    from: BlockPos,
    (dx, dy, dz): (i32, i32, i32),
    occupant: Occupant,
    level: i32,
) -> Result<Passage, FluidError> {
    let to = from.offset(dx, dy, dz);
    let passage = match occupant {
        Occupant::Air => Passage::Open(1),
        Occupant::Fluid(kind) if kind == fluid.kind => Passage::Open(1),
        Occupant::Fluid(_) => {
            interaction::react(access, fluid, from, level, to)?;
            Passage::Consumed
        }
        Occupant::Obstacle(obstacle) if obstacle.is_permeable() && (dx == 0 || dz == 0) => {
            let beyond = to.offset(dx, dy, dz);
            let behind = access.occupant(beyond)?;
            if behind.is_air() || behind.holds(fluid.kind) {
                access.mark_dirty_as(fluid.kind, from)?;
                Passage::Open(2)
            } else {
                Passage::Blocked
            }
        }
        Occupant::Obstacle(obstacle) => {
            if interaction::wash_away(access, fluid, to, obstacle, dy < 0, level) {
                Passage::Open(1)
            } else {
                Passage::Blocked
            }
        }
        Occupant::Solid(_) => Passage::Blocked,
    };
    Ok(passage)
}
