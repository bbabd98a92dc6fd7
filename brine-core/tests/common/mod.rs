#![allow(dead_code)]

use brine_core::fluid::codec;
use brine_core::{FluidConfig, FluidKind, FluidSimulation, Grid, MemoryGrid, Occupant, Rock};
use brine_utils::BlockPos;

pub const MAX: i32 = 2048;

pub fn simulation() -> FluidSimulation {
    FluidSimulation::new(FluidConfig::default()).expect("default config is valid")
}

/// A closed stone basin: floor at y = 0, walls from y = 1 to `height`,
/// interior spanning `0..size` on x and z.
pub fn basin(size: i32, height: i32) -> MemoryGrid {
    let mut grid = MemoryGrid::new(0, height + 4);
    let stone = Occupant::Solid(Rock::Stone);
    grid.fill(BlockPos::new(-1, 0, -1), BlockPos::new(size, height, size), stone);
    grid.fill(
        BlockPos::new(0, 1, 0),
        BlockPos::new(size - 1, height, size - 1),
        Occupant::Air,
    );
    grid
}

/// Every stored level is in range and mirrored by the grid, and every fluid
/// cell in the grid has a stored level.
pub fn assert_consistent(sim: &FluidSimulation, grid: &MemoryGrid) {
    for kind in FluidKind::ALL {
        let mut cells = 0;
        for store in sim.levels().iter().filter(|store| store.kind() == kind) {
            for (local, level) in store.iter() {
                let pos = local.to_block(store.chunk());
                assert!(
                    (1..=MAX).contains(&level),
                    "{kind} level {level} at {pos} out of range"
                );
                assert_eq!(grid.occupant(pos), Occupant::Fluid(kind), "{kind} at {pos}");
                assert_eq!(grid.metadata(pos), codec::display_state(level, MAX), "state at {pos}");
                cells += 1;
            }
        }
        assert_eq!(cells, grid.count(Occupant::Fluid(kind)), "{kind} cell count");
    }
}
