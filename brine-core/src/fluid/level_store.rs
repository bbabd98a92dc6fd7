//! Per-chunk fluid level storage.

use std::mem;

use brine_utils::{ChunkPos, LocalPos};
use rustc_hash::{FxHashMap, FxHashSet};

use super::FluidKind;

/// Levels and dirty cells of one fluid kind inside one chunk.
///
/// Absent entries read as 0 and writing 0 removes the entry, so the map only
/// ever holds cells that actually contain fluid.
#[derive(Debug, Clone)]
pub struct ChunkLevelStore {
    chunk: ChunkPos,
    kind: FluidKind,
    /// Tick phase at which this store is due, in `[0, period)`.
    offset: u64,
    levels: FxHashMap<LocalPos, i32>,
    dirty: FxHashSet<LocalPos>,
}

impl ChunkLevelStore {
    /// Creates an empty store scheduled with the given `period`.
    #[must_use]
    pub fn new(chunk: ChunkPos, kind: FluidKind, period: u64) -> Self {
        Self {
            chunk,
            kind,
            offset: schedule_offset(chunk, kind, period),
            levels: FxHashMap::default(),
            dirty: FxHashSet::default(),
        }
    }

    /// The chunk this store covers.
    #[must_use]
    pub const fn chunk(&self) -> ChunkPos {
        self.chunk
    }

    /// The fluid this store holds.
    #[must_use]
    pub const fn kind(&self) -> FluidKind {
        self.kind
    }

    /// The tick phase this store is evaluated on.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Level at `pos`, 0 when never written.
    #[must_use]
    pub fn get(&self, pos: LocalPos) -> i32 {
        self.levels.get(&pos).copied().unwrap_or(0)
    }

    /// Stores `level`, returning the previous value. The caller clamps.
    pub fn set(&mut self, pos: LocalPos, level: i32) -> i32 {
        if level > 0 {
            self.levels.insert(pos, level).unwrap_or(0)
        } else {
            self.levels.remove(&pos).unwrap_or(0)
        }
    }

    /// Marks `pos` for evaluation. Returns `false` if it already was.
    pub fn mark_dirty(&mut self, pos: LocalPos) -> bool {
        self.dirty.insert(pos)
    }

    /// Whether `pos` waits for evaluation.
    #[must_use]
    pub fn is_dirty(&self, pos: LocalPos) -> bool {
        self.dirty.contains(&pos)
    }

    /// Number of cells waiting for evaluation.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Empties the dirty set, returning its cells bottom-up.
    pub fn take_dirty(&mut self) -> Vec<LocalPos> {
        let mut cells: Vec<_> = mem::take(&mut self.dirty).into_iter().collect();
        cells.sort_unstable();
        cells
    }

    /// Sum of all stored levels.
    #[must_use]
    pub fn total_volume(&self) -> i64 {
        self.levels.values().map(|&level| i64::from(level)).sum()
    }

    /// Number of cells holding fluid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if no cell holds fluid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterates the non-empty cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalPos, i32)> + '_ {
        self.levels.iter().map(|(&pos, &level)| (pos, level))
    }
}

/// Spreads stores over the ticks of a period so slow fluids don't all update at once.
fn schedule_offset(chunk: ChunkPos, kind: FluidKind, period: u64) -> u64 {
    if period <= 1 {
        return 0;
    }
    let seed = i64::from(chunk.x())
        .wrapping_mul(341_873_128_712)
        .wrapping_add(i64::from(chunk.z()).wrapping_mul(132_897_987_541))
        .wrapping_add(kind.index() as i64);
    seed.rem_euclid(period as i64) as u64
}

/// Index of a store inside [`FluidLevels`].
///
/// Handles stay valid until their chunk is unloaded; callers only keep them
/// for the duration of one cell update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreHandle(usize);

/// Every level store, keyed by chunk and fluid kind.
#[derive(Debug, Default)]
pub struct FluidLevels {
    stores: Vec<Option<ChunkLevelStore>>,
    index: FxHashMap<(ChunkPos, FluidKind), StoreHandle>,
    free: Vec<usize>,
}

impl FluidLevels {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle of an existing store.
    #[must_use]
    pub fn find(&self, chunk: ChunkPos, kind: FluidKind) -> Option<StoreHandle> {
        self.index.get(&(chunk, kind)).copied()
    }

    /// The handle of the store for `(chunk, kind)`, creating it if needed.
    pub fn get_or_create(&mut self, chunk: ChunkPos, kind: FluidKind, period: u64) -> StoreHandle {
        if let Some(handle) = self.find(chunk, kind) {
            return handle;
        }
        let store = ChunkLevelStore::new(chunk, kind, period);
        let handle = if let Some(slot) = self.free.pop() {
            self.stores[slot] = Some(store);
            StoreHandle(slot)
        } else {
            self.stores.push(Some(store));
            StoreHandle(self.stores.len() - 1)
        };
        self.index.insert((chunk, kind), handle);
        handle
    }

    /// The store behind `handle`.
    ///
    /// # Panics
    /// Panics if the store was removed after the handle was issued.
    #[must_use]
    pub fn store(&self, handle: StoreHandle) -> &ChunkLevelStore {
        match &self.stores[handle.0] {
            Some(store) => store,
            None => panic!("stale store handle {}", handle.0),
        }
    }

    /// Mutable access to the store behind `handle`.
    ///
    /// # Panics
    /// Panics if the store was removed after the handle was issued.
    pub fn store_mut(&mut self, handle: StoreHandle) -> &mut ChunkLevelStore {
        match &mut self.stores[handle.0] {
            Some(store) => store,
            None => panic!("stale store handle {}", handle.0),
        }
    }

    /// Drops every store of `chunk`, returning how many were removed.
    pub fn remove_chunk(&mut self, chunk: ChunkPos) -> usize {
        let mut removed = 0;
        for kind in FluidKind::ALL {
            if let Some(handle) = self.index.remove(&(chunk, kind)) {
                self.stores[handle.0] = None;
                self.free.push(handle.0);
                removed += 1;
            }
        }
        removed
    }

    /// Handles of all live stores, ordered by chunk then kind.
    #[must_use]
    pub fn handles(&self) -> Vec<StoreHandle> {
        let mut keys: Vec<_> = self.index.iter().map(|(&key, &handle)| (key, handle)).collect();
        keys.sort_unstable_by_key(|&(key, _)| key);
        keys.into_iter().map(|(_, handle)| handle).collect()
    }

    /// Iterates all live stores.
    pub fn iter(&self) -> impl Iterator<Item = &ChunkLevelStore> {
        self.stores.iter().flatten()
    }

    /// Sum of all levels of `kind`.
    #[must_use]
    pub fn total_volume(&self, kind: FluidKind) -> i64 {
        self.iter()
            .filter(|store| store.kind() == kind)
            .map(ChunkLevelStore::total_volume)
            .sum()
    }

    /// Number of cells waiting for evaluation across all stores.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.iter().map(ChunkLevelStore::dirty_count).sum()
    }

    /// Number of live stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if there are no stores.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
