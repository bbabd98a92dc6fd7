//! The per-cell transition function.
//!
//! One call to [`update`] moves fluid out of (or into) a single cell: first
//! down, then sideways, then up, and finally through a short greedy walk that
//! equalizes pressure with cells further away. Every path ends in exactly one
//! commit of the cell's own level, including error paths. A neighbour is
//! always written before the working level gives up the amount it received,
//! so a write that fails leaves the volume where it was.

use brine_utils::{
    BlockPos,
    direction::{Face, Horizontal},
    random::Random,
};
use smallvec::SmallVec;

use super::{
    FluidType,
    passability::{Passage, check_flow},
    resolver::LevelAccess,
};
use crate::error::FluidError;
use crate::grid::{Grid, Occupant};

/// Maximum number of hops of the pressure walk.
pub const MAX_WALK_HOPS: usize = 20;

/// Evaluates the cell at `pos` holding `fluid`.
pub fn update<G: Grid, R: Random>(
    access: &mut LevelAccess<'_, G>,
    fluid: &FluidType,
    pos: BlockPos,
    rng: &mut R,
) -> Result<(), FluidError> {
    let initial = access.level(fluid.kind, pos)?;
    let mut transition = Transition {
        fluid,
        origin: pos,
        initial,
        level: initial,
        pressure: initial,
        consumed: false,
    };
    let status = transition.run(access, rng);
    let committed = transition.commit(access);
    status.and(committed)
}

/// Where a pressure walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkEnd {
    /// The last cell reached.
    pub pos: BlockPos,
    /// Its level when it was reached.
    pub level: i32,
    /// Number of steps taken, at least 1.
    pub hops: usize,
}

/// Walks from `origin` towards higher pressure.
///
/// Each hop moves to the same-fluid face neighbour with the best score
/// `level + dy * pressure_gain - pressure_loss`, provided the score beats
/// `target` and the level itself is not below it. Vertical hops are only
/// taken when `pull` is set. Cells are never visited twice. Returns `None`
/// if the walk could not leave `origin`.
pub fn relaxation_walk<G: Grid>(
    access: &mut LevelAccess<'_, G>,
    fluid: &FluidType,
    origin: BlockPos,
    target: i32,
    pull: bool,
) -> Result<Option<WalkEnd>, FluidError> {
    let mut visited: SmallVec<[BlockPos; MAX_WALK_HOPS + 1]> = SmallVec::new();
    visited.push(origin);
    let mut node = origin;
    let mut node_level = 0;

    for _ in 0..MAX_WALK_HOPS {
        let mut best: Option<(i32, BlockPos, i32)> = None;
        for face in Face::ALL {
            let dy = face.dy();
            if dy != 0 && !pull {
                continue;
            }
            let next = face.relative(node);
            if !access.in_height(next.y()) || visited.contains(&next) {
                continue;
            }
            if !access.occupant(next)?.holds(fluid.kind) {
                continue;
            }
            let level = access.level(fluid.kind, next)?;
            let score = level + dy * fluid.pressure_gain - fluid.pressure_loss;
            if score > target && best.is_none_or(|(best_score, ..)| score > best_score) {
                best = Some((score, next, level));
            }
        }

        let Some((_, next, level)) = best else {
            break;
        };
        if level < target {
            break;
        }
        node = next;
        node_level = level;
        visited.push(next);
    }

    Ok((node != origin).then_some(WalkEnd {
        pos: node,
        level: node_level,
        hops: visited.len() - 1,
    }))
}

/// The pending result of one cell update.
struct Transition<'f> {
    fluid: &'f FluidType,
    origin: BlockPos,
    /// Level read at entry.
    initial: i32,
    /// Working level; may exceed `max_fluid` until commit.
    level: i32,
    /// The pressure estimate taken before any flow.
    pressure: i32,
    /// Set when a reaction removed the cell.
    consumed: bool,
}

impl Transition<'_> {
    fn run<G: Grid, R: Random>(
        &mut self,
        access: &mut LevelAccess<'_, G>,
        rng: &mut R,
    ) -> Result<(), FluidError> {
        let below = self.origin.below();
        if !access.in_height(below.y()) {
            self.level = 0;
            return Ok(());
        }
        let below_occupant = access.occupant(below)?;
        let below_level = access.level(self.fluid.kind, below)?;

        if self.level >= self.fluid.max_fluid {
            self.estimate_pressure(access, below_level)?;
        }
        self.pressure = self.level;

        let target_level = self.flow_down(access, below_occupant, below_level)?;
        if self.consumed {
            return Ok(());
        }

        let viscosity = self.fluid.effective_viscosity(below_occupant, target_level);
        if self.spread(access, rng, viscosity)? {
            return Ok(());
        }

        self.flow_up(access)?;

        let pull = self.pressure >= self.fluid.max_fluid;
        if pull || self.level < self.fluid.max_fluid {
            self.relax(access, pull)?;
        }
        Ok(())
    }

    /// Raises the working level to what the surrounding column implies.
    fn estimate_pressure<G: Grid>(
        &mut self,
        access: &mut LevelAccess<'_, G>,
        below_level: i32,
    ) -> Result<(), FluidError> {
        let fluid = self.fluid;
        self.level = self
            .level
            .max(below_level - fluid.pressure_gain - fluid.pressure_loss);

        let above = self.origin.above();
        if access.in_height(above.y()) {
            let above_level = access.level(fluid.kind, above)?;
            self.level = self
                .level
                .max(above_level + fluid.pressure_gain - fluid.pressure_loss);

            // Updates run bottom-up, so push pressure into a full cell above now.
            // With clamped storage this only re-marks it.
            let pushed = self.level - fluid.pressure_gain - fluid.pressure_loss;
            if above_level >= fluid.max_fluid && pushed > above_level {
                access.set_level(fluid.kind, above, pushed, false)?;
                access.mark_dirty_as(fluid.kind, above)?;
            }
        }

        for dir in Horizontal::rotated(0) {
            let level = access.level(fluid.kind, dir.relative(self.origin, 1))?;
            let candidate = if dir.is_diagonal() {
                5 * (level - fluid.pressure_loss) / 7
            } else {
                level - fluid.pressure_loss
            };
            self.level = self.level.max(candidate);
        }
        Ok(())
    }

    /// Returns the level of the cell flowed into (or the one below).
    fn flow_down<G: Grid>(
        &mut self,
        access: &mut LevelAccess<'_, G>,
        below_occupant: Occupant,
        below_level: i32,
    ) -> Result<i32, FluidError> {
        let fluid = self.fluid;
        let distance = match check_flow(
            access,
            fluid,
            self.origin,
            (0, -1, 0),
            below_occupant,
            self.level,
        )? {
            Passage::Open(distance) => distance,
            Passage::Blocked => return Ok(below_level),
            Passage::Consumed => {
                self.consumed = true;
                return Ok(below_level);
            }
        };

        let target = self.origin.offset(0, -distance, 0);
        let target_level = if distance > 1 {
            access.level(fluid.kind, target)?
        } else {
            below_level
        };
        if target_level < fluid.max_fluid {
            let remaining =
                (self.level.min(fluid.max_fluid) + target_level - fluid.max_fluid).max(0);
            access.set_level(fluid.kind, target, self.initial + target_level, true)?;
            self.level = remaining;
        }
        Ok(target_level)
    }

    /// Sideways flow. Returns `true` when the update is over.
    fn spread<G: Grid, R: Random>(
        &mut self,
        access: &mut LevelAccess<'_, G>,
        rng: &mut R,
        viscosity: i32,
    ) -> Result<bool, FluidError> {
        let fluid = self.fluid;
        // Too little left to split; only a whole-cell spill over a ledge is allowed.
        let ledge = self.level < viscosity << 1;
        let skew = rng.next_i32_bounded(8);

        for dir in Horizontal::rotated(skew) {
            let (dx, dz) = dir.offset();
            let neighbor = dir.relative(self.origin, 1);
            let occupant = access.occupant(neighbor)?;
            let distance =
                match check_flow(access, fluid, self.origin, (dx, 0, dz), occupant, self.level)? {
                    Passage::Open(distance) => distance,
                    Passage::Blocked => continue,
                    Passage::Consumed => {
                        self.consumed = true;
                        return Ok(true);
                    }
                };

            if ledge {
                if distance == 1 && self.spill_over(access, neighbor)? {
                    return Ok(true);
                }
                continue;
            }

            let target = dir.relative(self.origin, distance);
            let target_level = access.level(fluid.kind, target)?;
            if self.level <= target_level {
                continue;
            }
            self.level = self.level.min(fluid.max_fluid);
            let mut flow = (self.level - target_level) / 2;
            if dir.is_diagonal() {
                flow -= flow / 3;
            }
            if flow >= 4 && self.level - flow >= viscosity && target_level + flow >= viscosity {
                access.set_level(fluid.kind, target, target_level + flow, true)?;
                self.level -= flow;
                if self.level < viscosity >> 2 {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Moves the whole remaining level over an edge into `neighbor`.
    fn spill_over<G: Grid>(
        &mut self,
        access: &mut LevelAccess<'_, G>,
        neighbor: BlockPos,
    ) -> Result<bool, FluidError> {
        let fluid = self.fluid;
        if self.level <= 0 || access.level(fluid.kind, self.origin.below())? != 0 {
            return Ok(false);
        }
        let occupant = access.occupant(neighbor)?;
        let neighbor_level = access.level(fluid.kind, neighbor)?;
        let has_room = occupant.is_air()
            || (occupant.holds(fluid.kind) && neighbor_level + self.level < fluid.max_fluid);
        let under = access.occupant(neighbor.below())?;
        if !has_room || !(under.is_air() || under.holds(fluid.kind)) {
            return Ok(false);
        }

        access.set_level(fluid.kind, neighbor, neighbor_level + self.level, true)?;
        self.level = 0;
        access.mark_ring(neighbor);
        Ok(true)
    }

    /// Pushes excess pressure into the cell above.
    ///
    /// Stored levels are clamped to `max_fluid`, so the pressure estimate
    /// peaks at `max_fluid + gain - loss` and this never fires; a full column
    /// is evened out by the pull in [`Transition::relax`] instead.
    fn flow_up<G: Grid>(&mut self, access: &mut LevelAccess<'_, G>) -> Result<(), FluidError> {
        let fluid = self.fluid;
        if self.level <= fluid.max_fluid + fluid.pressure_gain + fluid.pressure_loss {
            return Ok(());
        }
        let above = self.origin.above();
        let occupant = access.occupant(above)?;
        let above_level = access.level(fluid.kind, above)?;
        if occupant.is_air() || (occupant.holds(fluid.kind) && above_level < fluid.max_fluid) {
            access.set_level(fluid.kind, above, self.level.min(fluid.max_fluid), true)?;
            self.level = above_level;
        }
        Ok(())
    }

    /// Draws fluid from the end of a pressure walk.
    fn relax<G: Grid>(&mut self, access: &mut LevelAccess<'_, G>, pull: bool) -> Result<(), FluidError> {
        let max = self.fluid.max_fluid;
        let target = if pull { max } else { self.level };
        let Some(end) = relaxation_walk(access, self.fluid, self.origin, target, pull)? else {
            return Ok(());
        };

        let available = end.level.min(max);
        let room = max - self.level;
        let amount = if pull {
            available.min(room)
        } else {
            ((available - self.level) / 2).min(room)
        };
        if amount <= 0 {
            return Ok(());
        }

        access.set_level(self.fluid.kind, end.pos, available - amount, true)?;
        self.level += amount;
        if self.level >= max {
            self.level = self.level.max(self.pressure);
        }
        Ok(())
    }

    /// Persists the working level. A changed cell is re-marked by `set_level`.
    fn commit<G: Grid>(&self, access: &mut LevelAccess<'_, G>) -> Result<(), FluidError> {
        if self.consumed {
            return Ok(());
        }
        let level = self.level.clamp(0, self.fluid.max_fluid);
        if level == self.initial {
            return Ok(());
        }
        access.set_level(self.fluid.kind, self.origin, level, true)
    }
}
