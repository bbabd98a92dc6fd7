//! World-coordinate access to fluid levels for the duration of one update.

use brine_utils::{
    BlockPos, ChunkPos, LocalPos,
    direction::{Face, Horizontal},
};

use super::{
    FluidKind, FluidType, Fluids, codec,
    level_store::{ChunkLevelStore, FluidLevels, StoreHandle},
};
use crate::error::FluidError;
use crate::grid::{Grid, Occupant, Rock};

/// Borrows the grid and every level store while cells are evaluated.
///
/// Chunk lookups are cached per fluid kind; [`LevelAccess::begin_update`]
/// drops the cache between two cell updates.
pub struct LevelAccess<'a, G: Grid> {
    grid: &'a mut G,
    levels: &'a mut FluidLevels,
    fluids: &'a Fluids,
    stores: [Option<(ChunkPos, StoreHandle)>; 2],
    loaded: Option<ChunkPos>,
}

impl<'a, G: Grid> LevelAccess<'a, G> {
    /// Wraps the grid and stores.
    pub fn new(grid: &'a mut G, levels: &'a mut FluidLevels, fluids: &'a Fluids) -> Self {
        Self {
            grid,
            levels,
            fluids,
            stores: [None; 2],
            loaded: None,
        }
    }

    /// Forgets cached chunk handles.
    pub fn begin_update(&mut self) {
        self.stores = [None; 2];
        self.loaded = None;
    }

    /// The wrapped grid.
    #[must_use]
    pub fn grid(&self) -> &G {
        &*self.grid
    }

    /// Mutable access to the wrapped grid.
    pub fn grid_mut(&mut self) -> &mut G {
        &mut *self.grid
    }

    /// The descriptor of `kind`.
    #[must_use]
    pub fn fluid(&self, kind: FluidKind) -> &'a FluidType {
        self.fluids.get(kind)
    }

    /// Whether `y` is inside the grid's vertical range.
    #[must_use]
    pub fn in_height(&self, y: i32) -> bool {
        self.grid.is_in_height(y)
    }

    fn ensure_loaded(&mut self, chunk: ChunkPos) -> Result<(), FluidError> {
        if self.loaded != Some(chunk) {
            self.grid.load_chunk(chunk)?;
            self.loaded = Some(chunk);
        }
        Ok(())
    }

    /// The store of `kind` for `chunk`, loading the chunk if needed.
    pub fn resolve(&mut self, kind: FluidKind, chunk: ChunkPos) -> Result<StoreHandle, FluidError> {
        if let Some((cached, handle)) = self.stores[kind.index()]
            && cached == chunk
        {
            return Ok(handle);
        }
        self.ensure_loaded(chunk)?;
        let handle = self
            .levels
            .get_or_create(chunk, kind, self.fluids.get(kind).period);
        self.stores[kind.index()] = Some((chunk, handle));
        Ok(handle)
    }

    fn store_mut(&mut self, kind: FluidKind, pos: BlockPos) -> Result<&mut ChunkLevelStore, FluidError> {
        let handle = self.resolve(kind, pos.chunk_pos())?;
        Ok(self.levels.store_mut(handle))
    }

    /// The occupant at `pos`. Cells outside the vertical range read as bedrock.
    pub fn occupant(&mut self, pos: BlockPos) -> Result<Occupant, FluidError> {
        if !self.in_height(pos.y()) {
            return Ok(Occupant::Solid(Rock::Bedrock));
        }
        self.ensure_loaded(pos.chunk_pos())?;
        Ok(self.grid.occupant(pos))
    }

    /// The level stored for `pos`, without looking at the grid.
    pub fn stored_level(&mut self, kind: FluidKind, pos: BlockPos) -> Result<i32, FluidError> {
        if !self.in_height(pos.y()) {
            return Ok(0);
        }
        Ok(self.store_mut(kind, pos)?.get(pos.local()))
    }

    /// The level of `kind` at `pos`.
    ///
    /// A cell that holds the fluid in the grid but has no stored level (its
    /// chunk was unloaded, or the host placed it directly) adopts the level
    /// its display state stands for.
    pub fn level(&mut self, kind: FluidKind, pos: BlockPos) -> Result<i32, FluidError> {
        let stored = self.stored_level(kind, pos)?;
        if stored > 0 || !self.in_height(pos.y()) || !self.grid.occupant(pos).holds(kind) {
            return Ok(stored);
        }
        let max = self.fluids.get(kind).max_fluid;
        let level = match codec::level_for_state(self.grid.metadata(pos), max) {
            0 => max,
            level => level,
        };
        self.store_mut(kind, pos)?.set(pos.local(), level);
        Ok(level)
    }

    /// Stores `level` (clamped) and optionally mirrors it into the grid.
    ///
    /// With `update_occupant`, a positive level makes the cell hold `kind`
    /// with the matching display state; zero empties the cell if it still
    /// holds `kind`. A changed level marks the cell and its face neighbours
    /// dirty. Writes outside the vertical range are ignored.
    ///
    /// Only resolving the store of `pos` can fail, and nothing has changed
    /// when it does.
    pub fn set_level(
        &mut self,
        kind: FluidKind,
        pos: BlockPos,
        level: i32,
        update_occupant: bool,
    ) -> Result<(), FluidError> {
        if !self.in_height(pos.y()) {
            return Ok(());
        }
        let max = self.fluids.get(kind).max_fluid;
        let level = level.clamp(0, max);
        let previous = self.store_mut(kind, pos)?.set(pos.local(), level);

        if update_occupant {
            if level > 0 {
                self.grid.set_occupant(
                    pos,
                    Occupant::Fluid(kind),
                    codec::display_state(level, max),
                );
            } else if self.grid.occupant(pos).holds(kind) {
                self.grid.set_occupant(pos, Occupant::Air, 0);
            }
        }

        if previous != level {
            if level > 0 {
                self.mark_dirty_as(kind, pos)?;
            }
            self.mark_neighbors(pos);
        }
        Ok(())
    }

    /// Queues `pos` for evaluation as `kind`, whatever it currently holds.
    pub fn mark_dirty_as(&mut self, kind: FluidKind, pos: BlockPos) -> Result<(), FluidError> {
        if self.in_height(pos.y()) {
            self.store_mut(kind, pos)?.mark_dirty(pos.local());
        }
        Ok(())
    }

    /// Queues `pos` for evaluation if it holds a fluid.
    pub fn mark_dirty(&mut self, pos: BlockPos) -> Result<(), FluidError> {
        if let Occupant::Fluid(kind) = self.occupant(pos)? {
            self.mark_dirty_as(kind, pos)?;
        }
        Ok(())
    }

    /// Marks `pos` unless its chunk cannot be loaded.
    ///
    /// Fluid in such a chunk is out of the engine's reach until the grid can
    /// provide it again, at which point its own updates pick up the change.
    fn mark_reachable(&mut self, pos: BlockPos) {
        if let Err(err) = self.mark_dirty(pos) {
            log::trace!("not marking {pos}: {err}");
        }
    }

    /// Marks the six face neighbours of `pos`.
    pub fn mark_neighbors(&mut self, pos: BlockPos) {
        for face in Face::ALL {
            self.mark_reachable(face.relative(pos));
        }
    }

    /// Marks the eight horizontal neighbours of `pos` and the cells above and below.
    pub fn mark_ring(&mut self, pos: BlockPos) {
        for dir in Horizontal::rotated(0) {
            self.mark_reachable(dir.relative(pos, 1));
        }
        self.mark_reachable(pos.above());
        self.mark_reachable(pos.below());
    }

    /// Puts cells back into their store's dirty set without any checks.
    pub fn requeue(&mut self, kind: FluidKind, chunk: ChunkPos, cells: &[LocalPos]) {
        if let Some(handle) = self.levels.find(chunk, kind) {
            let store = self.levels.store_mut(handle);
            for &cell in cells {
                store.mark_dirty(cell);
            }
        }
    }
}
