//! Pushing fluid out of a cell the host filled with something solid.

use brine_utils::{BlockPos, direction::Horizontal, random::Random};

use super::{FluidType, codec, resolver::LevelAccess};
use crate::error::FluidError;
use crate::grid::Grid;

/// How far up a column displaced fluid searches for room.
pub const MAX_DISPLACE_HEIGHT: i32 = 32;

/// Moves the fluid that occupied `pos` into nearby cells.
///
/// The host has already replaced the cell, so its previous `metadata` is used
/// when no level is stored. Without the same fluid above, the volume goes
/// sideways first (all of it into the first empty neighbour, half of what is
/// left into each same-fluid neighbour with room) and then into an empty cell
/// above. With the same fluid above, it rises through the column until it
/// finds room. The stored level of `pos` ends up 0; the returned volume is
/// whatever found no room.
pub fn displace<G: Grid, R: Random>(
    access: &mut LevelAccess<'_, G>,
    fluid: &FluidType,
    pos: BlockPos,
    metadata: u8,
    rng: &mut R,
) -> Result<i32, FluidError> {
    let kind = fluid.kind;
    let max = fluid.max_fluid;
    let mut volume = match access.stored_level(kind, pos)? {
        0 => codec::level_for_state(metadata, max),
        level => level,
    };
    access.set_level(kind, pos, 0, false)?;

    let above = pos.above();
    let above_occupant = access.occupant(above)?;
    if above_occupant.holds(kind) {
        volume = rise(access, fluid, pos, volume)?;
    } else {
        let skew = rng.next_i32_bounded(4);
        for dir in Horizontal::rotated_cardinal(skew) {
            if volume <= 0 {
                break;
            }
            let neighbor = dir.relative(pos, 1);
            let occupant = access.occupant(neighbor)?;
            if occupant.is_air() {
                access.set_level(kind, neighbor, volume, true)?;
                volume = 0;
            } else if occupant.holds(kind) {
                let level = access.level(kind, neighbor)?;
                let accepted = (volume >> 1).min(max - level);
                if accepted > 0 {
                    access.set_level(kind, neighbor, level + accepted, true)?;
                    volume -= accepted;
                }
            }
        }
        if volume > 0 && above_occupant.is_air() {
            access.set_level(kind, above, volume, true)?;
            volume = 0;
        }
    }

    if volume > 0 {
        log::debug!("{kind} displaced at {pos} lost {volume} for lack of room");
    }
    Ok(volume)
}

/// Carries `volume` up the fluid column above `pos`.
fn rise<G: Grid>(
    access: &mut LevelAccess<'_, G>,
    fluid: &FluidType,
    pos: BlockPos,
    mut volume: i32,
) -> Result<i32, FluidError> {
    for dy in 1..MAX_DISPLACE_HEIGHT {
        if volume <= 0 {
            break;
        }
        let cell = pos.offset(0, dy, 0);
        if !access.in_height(cell.y()) {
            break;
        }
        let occupant = access.occupant(cell)?;
        if occupant.is_air() {
            access.set_level(fluid.kind, cell, volume, true)?;
            volume = 0;
        } else if occupant.holds(fluid.kind) {
            let level = access.level(fluid.kind, cell)?;
            let accepted = volume.min(fluid.max_fluid - level);
            if accepted > 0 {
                access.set_level(fluid.kind, cell, level + accepted, true)?;
                volume -= accepted;
            }
        } else {
            break;
        }
    }
    Ok(volume)
}
