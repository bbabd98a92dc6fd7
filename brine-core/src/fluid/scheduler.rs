//! Tick scheduling of dirty fluid cells.
//!
//! Every [`ChunkLevelStore`](super::level_store::ChunkLevelStore) keeps its own
//! dirty set. Fast fluids (`flow_rate == 1`) are evaluated every tick; slower
//! ones only on the ticks where `tick % period` equals the store's offset, so
//! the work of a slow fluid is spread over its whole period. Cells of a store
//! that is not due simply stay dirty.

use brine_utils::{BlockPos, ChunkPos, LocalPos, random::Random};

use super::{
    FluidKind, FluidType, Fluids, flow, level_store::FluidLevels, resolver::LevelAccess,
};
use crate::error::FluidError;
use crate::grid::Grid;

/// The global tick counter.
#[derive(Debug, Default, Clone)]
pub struct UpdateScheduler {
    tick: u64,
}

impl UpdateScheduler {
    /// Creates a scheduler at tick 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// The tick the next call to [`UpdateScheduler::advance`] returns.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Returns the tick to run and moves the counter forward.
    pub const fn advance(&mut self) -> u64 {
        let tick = self.tick;
        self.tick += 1;
        tick
    }
}

/// Whether a store of `fluid` with the given `offset` runs on `tick`.
///
/// A fluid with `flow_rate == 1` runs every tick whatever `global_rate` is;
/// the period only spreads out slower fluids.
#[must_use]
pub const fn is_due(tick: u64, fluid: &FluidType, offset: u64) -> bool {
    fluid.flow_rate == 1 || fluid.period == 0 || tick % fluid.period == offset
}

/// Dirty cells drained from one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueCells {
    /// Fluid of the store.
    pub kind: FluidKind,
    /// Chunk of the store.
    pub chunk: ChunkPos,
    /// Cells in evaluation order.
    pub cells: Vec<LocalPos>,
}

/// Drains the dirty sets of every store due on `tick`.
///
/// Batches come out ordered by chunk then fluid; cells inside a batch are
/// ordered bottom-up.
pub fn drain_due(levels: &mut FluidLevels, fluids: &Fluids, tick: u64) -> Vec<DueCells> {
    let mut due = Vec::new();
    for handle in levels.handles() {
        let store = levels.store_mut(handle);
        if store.dirty_count() == 0 || !is_due(tick, fluids.get(store.kind()), store.offset()) {
            continue;
        }
        due.push(DueCells {
            kind: store.kind(),
            chunk: store.chunk(),
            cells: store.take_dirty(),
        });
    }
    due
}

/// Evaluates drained batches in order and returns how many cells ran.
///
/// A cell that fails goes back into its dirty set and the remaining cells
/// still run, so one unreachable chunk cannot hold up the rest of the world.
/// The first failure is returned once every batch has been processed.
pub fn run_due<G: Grid, R: Random>(
    access: &mut LevelAccess<'_, G>,
    batches: &[DueCells],
    rng: &mut R,
) -> Result<usize, FluidError> {
    let mut evaluated = 0;
    let mut first_error = None;
    for batch in batches {
        let fluid = access.fluid(batch.kind);
        for &cell in &batch.cells {
            let pos = cell.to_block(batch.chunk);
            match evaluate(access, fluid, pos, rng) {
                Ok(true) => evaluated += 1,
                Ok(false) => {}
                Err(err) => {
                    access.requeue(batch.kind, batch.chunk, &[cell]);
                    log::warn!("{} update at {pos} deferred: {err}", batch.kind);
                    first_error.get_or_insert(err);
                }
            }
        }
    }
    first_error.map_or(Ok(evaluated), Err)
}

/// Runs one cell if it still holds `fluid`. Returns whether the engine ran.
fn evaluate<G: Grid, R: Random>(
    access: &mut LevelAccess<'_, G>,
    fluid: &FluidType,
    pos: BlockPos,
    rng: &mut R,
) -> Result<bool, FluidError> {
    access.begin_update();
    if !access.occupant(pos)?.holds(fluid.kind) {
        // Removed by the host; forget whatever level was left.
        access.set_level(fluid.kind, pos, 0, false)?;
        return Ok(false);
    }
    if access.level(fluid.kind, pos)? <= 0 {
        return Ok(false);
    }
    flow::update(access, fluid, pos, rng)?;
    Ok(true)
}
