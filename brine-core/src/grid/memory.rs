//! A self-contained [`Grid`] backed by hash-mapped chunk columns.

use brine_utils::{BlockPos, ChunkPos, types::CHUNK_WIDTH};
use rustc_hash::FxHashMap;

use super::{Grid, ObstacleKind, Occupant, Rock};
use crate::error::GridError;

#[derive(Debug, Clone, Copy)]
struct Cell {
    occupant: Occupant,
    metadata: u8,
}

const EMPTY: Cell = Cell {
    occupant: Occupant::Air,
    metadata: 0,
};

/// One full-height chunk column.
#[derive(Debug, Clone)]
struct Column {
    cells: Box<[Cell]>,
}

impl Column {
    fn new(height: usize) -> Self {
        Self {
            cells: vec![EMPTY; height * (CHUNK_WIDTH * CHUNK_WIDTH) as usize].into_boxed_slice(),
        }
    }
}

/// An in-memory grid. Chunks are created empty the first time they are
/// loaded or written.
#[derive(Debug, Clone)]
pub struct MemoryGrid {
    min_y: i32,
    max_y: i32,
    /// Chunks with `|x|` or `|z|` above this radius fail to load.
    border: Option<i32>,
    chunks: FxHashMap<ChunkPos, Column>,
    drops: Vec<(BlockPos, ObstacleKind)>,
}

impl MemoryGrid {
    /// Creates an unbounded grid spanning `min_y..max_y`.
    #[must_use]
    pub fn new(min_y: i32, max_y: i32) -> Self {
        debug_assert!(min_y < max_y);
        Self {
            min_y,
            max_y,
            border: None,
            chunks: FxHashMap::default(),
            drops: Vec::new(),
        }
    }

    /// Limits the grid to chunks within `radius` of the origin chunk.
    #[must_use]
    pub const fn with_border(mut self, radius: i32) -> Self {
        self.border = Some(radius);
        self
    }

    /// Number of chunks currently held.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Items dropped by [`Grid::destroy`], oldest first.
    #[must_use]
    pub fn drops(&self) -> &[(BlockPos, ObstacleKind)] {
        &self.drops
    }

    /// Sets every cell in the inclusive box `from..=to`.
    pub fn fill(&mut self, from: BlockPos, to: BlockPos, occupant: Occupant) {
        for y in from.y().min(to.y())..=from.y().max(to.y()) {
            for z in from.z().min(to.z())..=from.z().max(to.z()) {
                for x in from.x().min(to.x())..=from.x().max(to.x()) {
                    self.set_occupant(BlockPos::new(x, y, z), occupant, 0);
                }
            }
        }
    }

    /// Drops a chunk, forgetting its contents.
    pub fn unload(&mut self, chunk: ChunkPos) -> bool {
        self.chunks.remove(&chunk).is_some()
    }

    /// Counts the cells holding `occupant` across all chunks.
    #[must_use]
    pub fn count(&self, occupant: Occupant) -> usize {
        self.chunks
            .values()
            .flat_map(|column| column.cells.iter())
            .filter(|cell| cell.occupant == occupant)
            .count()
    }

    fn inside_border(&self, chunk: ChunkPos) -> bool {
        self.border
            .is_none_or(|radius| chunk.x().abs() <= radius && chunk.z().abs() <= radius)
    }

    fn height(&self) -> usize {
        (self.max_y - self.min_y) as usize
    }

    fn index(&self, pos: BlockPos) -> Option<usize> {
        if !self.is_in_height(pos.y()) {
            return None;
        }
        let local = pos.local();
        let y = (pos.y() - self.min_y) as usize;
        Some((y * CHUNK_WIDTH as usize + local.z as usize) * CHUNK_WIDTH as usize + local.x as usize)
    }

    fn cell(&self, pos: BlockPos) -> Option<Cell> {
        let index = self.index(pos)?;
        match self.chunks.get(&pos.chunk_pos()) {
            Some(column) => Some(column.cells[index]),
            None if self.inside_border(pos.chunk_pos()) => Some(EMPTY),
            None => None,
        }
    }

    fn cell_mut(&mut self, pos: BlockPos) -> Option<&mut Cell> {
        let index = self.index(pos)?;
        let chunk = pos.chunk_pos();
        if !self.inside_border(chunk) {
            return None;
        }
        let height = self.height();
        let column = self
            .chunks
            .entry(chunk)
            .or_insert_with(|| Column::new(height));
        Some(&mut column.cells[index])
    }
}

impl Grid for MemoryGrid {
    fn min_y(&self) -> i32 {
        self.min_y
    }

    fn max_y(&self) -> i32 {
        self.max_y
    }

    fn load_chunk(&mut self, chunk: ChunkPos) -> Result<(), GridError> {
        if !self.inside_border(chunk) {
            return Err(GridError::OutOfBounds(chunk));
        }
        let height = self.height();
        self.chunks
            .entry(chunk)
            .or_insert_with(|| Column::new(height));
        Ok(())
    }

    fn occupant(&self, pos: BlockPos) -> Occupant {
        self.cell(pos)
            .map_or(Occupant::Solid(Rock::Bedrock), |cell| cell.occupant)
    }

    fn metadata(&self, pos: BlockPos) -> u8 {
        self.cell(pos).map_or(0, |cell| cell.metadata)
    }

    fn set_occupant(&mut self, pos: BlockPos, occupant: Occupant, metadata: u8) {
        if let Some(cell) = self.cell_mut(pos) {
            *cell = Cell { occupant, metadata };
        }
    }

    fn destroy(&mut self, pos: BlockPos, drop_item: bool) {
        let Some(cell) = self.cell_mut(pos) else {
            return;
        };
        let previous = cell.occupant;
        *cell = EMPTY;
        if drop_item && let Occupant::Obstacle(kind) = previous {
            self.drops.push((pos, kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluid::FluidKind;

    #[test]
    fn test_out_of_height_reads_solid() {
        let grid = MemoryGrid::new(0, 16);
        assert_eq!(grid.occupant(BlockPos::new(0, -1, 0)), Occupant::Solid(Rock::Bedrock));
        assert_eq!(grid.occupant(BlockPos::new(0, 16, 0)), Occupant::Solid(Rock::Bedrock));
        assert_eq!(grid.occupant(BlockPos::new(0, 15, 0)), Occupant::Air);
    }

    #[test]
    fn test_border_rejects_far_chunks() {
        let mut grid = MemoryGrid::new(0, 16).with_border(1);
        assert!(grid.load_chunk(ChunkPos::new(1, -1)).is_ok());
        assert!(matches!(
            grid.load_chunk(ChunkPos::new(2, 0)),
            Err(GridError::OutOfBounds(_))
        ));

        let far = BlockPos::new(40, 3, 0);
        grid.set_occupant(far, Occupant::Fluid(FluidKind::Water), 1);
        assert_eq!(grid.occupant(far), Occupant::Solid(Rock::Bedrock));
    }

    #[test]
    fn test_set_and_destroy() {
        let mut grid = MemoryGrid::new(-8, 8);
        let pos = BlockPos::new(-3, -8, 20);
        grid.set_occupant(pos, Occupant::Obstacle(ObstacleKind::Decoration), 0);
        assert_eq!(grid.chunk_count(), 1);

        grid.destroy(pos, true);
        assert_eq!(grid.occupant(pos), Occupant::Air);
        assert_eq!(grid.drops(), &[(pos, ObstacleKind::Decoration)]);

        grid.set_occupant(pos, Occupant::Fluid(FluidKind::Lava), 3);
        assert_eq!(grid.metadata(pos), 3);
        grid.destroy(pos, true);
        assert_eq!(grid.drops().len(), 1);
    }

    #[test]
    fn test_fill_counts() {
        let mut grid = MemoryGrid::new(0, 8);
        grid.fill(
            BlockPos::new(-1, 0, -1),
            BlockPos::new(1, 0, 1),
            Occupant::Solid(Rock::Stone),
        );
        assert_eq!(grid.count(Occupant::Solid(Rock::Stone)), 9);
        assert_eq!(grid.chunk_count(), 4);
    }
}
