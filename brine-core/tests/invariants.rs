mod common;

use brine_core::{FluidKind, Grid, Occupant, Rock};
use brine_utils::BlockPos;
use common::{MAX, assert_consistent, basin, simulation};

const WATER: FluidKind = FluidKind::Water;

#[test]
fn closed_basin_conserves_volume_and_stays_consistent() {
    let mut sim = simulation();
    let mut grid = basin(6, 4);
    for y in 1..=3 {
        sim.place(&mut grid, WATER, BlockPos::new(2, y, 2)).expect("place");
    }
    sim.place(&mut grid, WATER, BlockPos::new(5, 1, 0)).expect("place");
    let initial = sim.total_volume(WATER);
    assert_eq!(initial, 4 * i64::from(MAX));

    for _ in 0..200 {
        let before = sim.total_volume(WATER);
        sim.tick(&mut grid).expect("tick");
        let after = sim.total_volume(WATER);
        assert!(after <= before, "volume grew from {before} to {after}");
        assert_consistent(&sim, &grid);
    }
    assert_eq!(sim.total_volume(WATER), initial);
}

#[test]
fn column_collapses_into_basin() {
    let mut sim = simulation();
    let mut grid = basin(5, 4);
    for y in 1..=3 {
        sim.place(&mut grid, WATER, BlockPos::new(2, y, 2)).expect("place");
    }

    sim.run_until_settled(&mut grid, 500).expect("ticks");
    for x in 0..5 {
        for z in 0..5 {
            let top = BlockPos::new(x, 3, z);
            assert_eq!(sim.level(&mut grid, WATER, top).expect("level"), 0, "{top}");
        }
    }
    assert_eq!(sim.total_volume(WATER), 3 * i64::from(MAX));
    assert_consistent(&sim, &grid);
}

#[test]
fn equal_neighbors_do_not_exchange() {
    let mut sim = simulation();
    let mut grid = basin(2, 2);
    grid.fill(
        BlockPos::new(0, 1, 1),
        BlockPos::new(1, 1, 1),
        Occupant::Solid(Rock::Stone),
    );
    let left = BlockPos::new(0, 1, 0);
    let right = BlockPos::new(1, 1, 0);
    sim.set_level(&mut grid, WATER, left, 1000).expect("set");
    sim.set_level(&mut grid, WATER, right, 1000).expect("set");

    sim.update_cell(&mut grid, WATER, left).expect("update");
    sim.update_cell(&mut grid, WATER, right).expect("update");
    assert_eq!(sim.level(&mut grid, WATER, left).expect("level"), 1000);
    assert_eq!(sim.level(&mut grid, WATER, right).expect("level"), 1000);
}

#[test]
fn downward_flow_preempts_lateral() {
    let mut sim = simulation();
    let mut grid = basin(4, 4);
    let source = BlockPos::new(1, 2, 1);
    let lateral = BlockPos::new(2, 2, 1);
    sim.place(&mut grid, WATER, source).expect("place");

    sim.update_cell(&mut grid, WATER, source).expect("update");
    assert!(sim.level(&mut grid, WATER, source.below()).expect("level") > 0);
    assert_eq!(sim.level(&mut grid, WATER, lateral).expect("level"), 0);
    assert_eq!(grid.occupant(lateral), Occupant::Air);
}

#[test]
fn levels_are_clamped_on_write() {
    let mut sim = simulation();
    let mut grid = basin(3, 3);
    let pos = BlockPos::new(1, 1, 1);

    sim.set_level(&mut grid, WATER, pos, 3 * MAX).expect("set");
    assert_eq!(sim.level(&mut grid, WATER, pos).expect("level"), MAX);
    sim.set_level(&mut grid, WATER, pos, -20).expect("set");
    assert_eq!(sim.level(&mut grid, WATER, pos).expect("level"), 0);
    assert_eq!(grid.occupant(pos), Occupant::Air);
    assert_consistent(&sim, &grid);
}

#[test]
fn displaced_fluid_keeps_its_volume() {
    let mut sim = simulation();
    let mut grid = basin(5, 3);
    let pos = BlockPos::new(2, 1, 2);
    sim.place(&mut grid, WATER, pos).expect("place");

    let previous = grid.occupant(pos);
    let metadata = grid.metadata(pos);
    grid.set_occupant(pos, Occupant::Solid(Rock::Stone), 0);
    let lost = sim.displace(&mut grid, pos, previous, metadata).expect("displace");

    assert_eq!(lost, 0);
    assert_eq!(sim.total_volume(WATER), i64::from(MAX));
    assert_consistent(&sim, &grid);
}
