mod common;

use brine_core::{FluidKind, Grid, MemoryGrid, Occupant, Rock};
use brine_utils::BlockPos;
use common::{MAX, assert_consistent, basin, simulation};

const WATER: FluidKind = FluidKind::Water;
const STONE: Occupant = Occupant::Solid(Rock::Stone);

/// A floor at y = 3 ending at x = 14, with a one-cell gap east of
/// `(14, 4, 8)` where water can drop off the edge.
fn ledge(grid: MemoryGrid) -> (MemoryGrid, BlockPos) {
    let mut grid = grid;
    grid.fill(BlockPos::new(0, 3, 0), BlockPos::new(14, 3, 15), STONE);
    grid.set_occupant(BlockPos::new(15, 4, 7), STONE, 0);
    grid.set_occupant(BlockPos::new(15, 4, 9), STONE, 0);
    (grid, BlockPos::new(14, 4, 8))
}

/// A one-cell wide corridor along x from 0 to `length - 1` at y = 1.
fn corridor(length: i32) -> MemoryGrid {
    let mut grid = MemoryGrid::new(0, 8);
    grid.fill(BlockPos::new(-1, 0, -1), BlockPos::new(length, 2, 1), STONE);
    grid.fill(BlockPos::new(0, 1, 0), BlockPos::new(length - 1, 1, 0), Occupant::Air);
    grid
}

#[test]
fn thin_film_spills_whole_over_ledge() {
    let mut sim = simulation();
    let (mut grid, origin) = ledge(MemoryGrid::new(0, 8));
    sim.set_level(&mut grid, WATER, origin, 100).expect("set");

    sim.update_cell(&mut grid, WATER, origin).expect("update");
    let east = BlockPos::new(15, 4, 8);
    assert_eq!(sim.level(&mut grid, WATER, origin).expect("level"), 0);
    assert_eq!(sim.level(&mut grid, WATER, east).expect("level"), 100);
    assert_eq!(grid.occupant(origin), Occupant::Air);
    assert_eq!(sim.total_volume(WATER), 100);
    assert_consistent(&sim, &grid);
}

#[test]
fn ledge_spill_beside_unloadable_chunk_keeps_volume() {
    let mut sim = simulation();
    let (mut grid, origin) = ledge(MemoryGrid::new(0, 8).with_border(0));
    sim.set_level(&mut grid, WATER, origin, 100).expect("set");

    sim.update_cell(&mut grid, WATER, origin).expect("update");
    assert_eq!(sim.level(&mut grid, WATER, BlockPos::new(15, 4, 8)).expect("level"), 100);
    assert_eq!(sim.total_volume(WATER), 100);
    assert_consistent(&sim, &grid);
}

#[test]
fn thin_film_on_flat_floor_stays_put() {
    let mut sim = simulation();
    let mut grid = basin(3, 2);
    let pos = BlockPos::new(1, 1, 1);
    sim.set_level(&mut grid, WATER, pos, 200).expect("set");

    sim.update_cell(&mut grid, WATER, pos).expect("update");
    assert_eq!(sim.level(&mut grid, WATER, pos).expect("level"), 200);
    assert_eq!(grid.count(Occupant::Fluid(WATER)), 1);
}

#[test]
fn thin_film_on_own_fluid_spreads() {
    let mut sim = simulation();
    let mut grid = basin(3, 2);
    for x in 0..3 {
        for z in 0..3 {
            sim.set_level(&mut grid, WATER, BlockPos::new(x, 1, z), MAX)
                .expect("set");
        }
    }
    let pos = BlockPos::new(1, 2, 1);
    sim.set_level(&mut grid, WATER, pos, 200).expect("set");
    let initial = sim.total_volume(WATER);

    sim.update_cell(&mut grid, WATER, pos).expect("update");
    assert!(sim.level(&mut grid, WATER, pos).expect("level") < 200);
    assert!(grid.count(Occupant::Fluid(WATER)) > 10);
    assert_eq!(sim.total_volume(WATER), initial);
    assert_consistent(&sim, &grid);
}

#[test]
fn relaxation_takes_half_the_difference() {
    let mut sim = simulation();
    let mut grid = corridor(3);
    let cells = [500, 1500, 1600];
    for (x, level) in (0..).zip(cells) {
        sim.set_level(&mut grid, WATER, BlockPos::new(x, 1, 0), level)
            .expect("set");
    }

    sim.update_cell(&mut grid, WATER, BlockPos::new(0, 1, 0))
        .expect("update");
    let levels: Vec<i32> = (0..3)
        .map(|x| sim.level(&mut grid, WATER, BlockPos::new(x, 1, 0)).expect("level"))
        .collect();
    assert_eq!(levels, [1050, 1500, 1050]);
    assert_eq!(sim.total_volume(WATER), 3600);
}

#[test]
fn pressure_from_above_pulls_column_down() {
    let mut sim = simulation();
    let mut grid = MemoryGrid::new(0, 10);
    grid.fill(BlockPos::new(-1, 0, -1), BlockPos::new(1, 6, 1), STONE);
    grid.fill(BlockPos::new(0, 1, 0), BlockPos::new(0, 5, 0), Occupant::Air);
    let at = |y| BlockPos::new(0, y, 0);
    for y in 2..=4 {
        sim.set_level(&mut grid, WATER, at(y), MAX).expect("set");
    }

    sim.update_cell(&mut grid, WATER, at(2)).expect("update");
    for y in 1..=3 {
        assert_eq!(sim.level(&mut grid, WATER, at(y)).expect("level"), MAX, "y = {y}");
    }
    assert_eq!(sim.level(&mut grid, WATER, at(4)).expect("level"), 0);
    assert_eq!(grid.occupant(at(4)), Occupant::Air);
    assert_eq!(sim.total_volume(WATER), 3 * i64::from(MAX));
    assert_consistent(&sim, &grid);
}
