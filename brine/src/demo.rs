use anyhow::Result;
use brine_core::{FluidKind, FluidSimulation, MemoryGrid, Occupant, Rock};
use brine_utils::BlockPos;

use crate::config::DemoConfig;

/// Builds a stone basin with a water column in the middle and a lava pool
/// tucked into one corner.
pub fn build(sim: &mut FluidSimulation, demo: &DemoConfig) -> Result<MemoryGrid> {
    let size = demo.basin_size;
    let height = demo.basin_height;
    let mut grid = MemoryGrid::new(0, height + 8);

    grid.fill(
        BlockPos::new(-1, 0, -1),
        BlockPos::new(size, height, size),
        Occupant::Solid(Rock::Stone),
    );
    grid.fill(
        BlockPos::new(0, 1, 0),
        BlockPos::new(size - 1, height, size - 1),
        Occupant::Air,
    );

    let center = size / 2;
    for y in 1..=demo.water_column {
        sim.place(&mut grid, FluidKind::Water, BlockPos::new(center, y, center))?;
    }

    for x in 0..demo.lava_pool {
        for z in 0..demo.lava_pool {
            sim.place(&mut grid, FluidKind::Lava, BlockPos::new(x, 1, z))?;
        }
    }

    log::info!(
        "Built a {size}x{size} basin: {} water, {} lava",
        sim.total_volume(FluidKind::Water),
        sim.total_volume(FluidKind::Lava)
    );
    Ok(grid)
}

/// Ticks until the basin settles or the tick limit runs out.
pub fn run(sim: &mut FluidSimulation, grid: &mut MemoryGrid, demo: &DemoConfig) -> Result<u64> {
    let interval = demo.report_interval.max(1);
    for _ in 0..demo.max_ticks {
        let report = sim.tick(grid)?;
        if report.tick % interval == 0 {
            log::info!(
                "Tick {}: water {}, lava {}, {} cells pending",
                report.tick,
                sim.total_volume(FluidKind::Water),
                sim.total_volume(FluidKind::Lava),
                report.pending
            );
        }
        if report.pending == 0 {
            return Ok(report.tick + 1);
        }
    }
    log::warn!("Still flowing after {} ticks", demo.max_ticks);
    Ok(demo.max_ticks)
}

/// Logs what the world ended up as.
pub fn summarize(sim: &FluidSimulation, grid: &MemoryGrid) {
    for kind in FluidKind::ALL {
        log::info!(
            "{kind}: volume {} in {} cells",
            sim.total_volume(kind),
            grid.count(Occupant::Fluid(kind))
        );
    }
    for rock in [Rock::Obsidian, Rock::Cobblestone] {
        let count = grid.count(Occupant::Solid(rock));
        if count > 0 {
            log::info!("{rock:?}: {count} cells formed");
        }
    }
}
