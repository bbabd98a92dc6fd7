//! The entry point a host world drives once per tick.

use brine_utils::{BlockPos, ChunkPos, math::Vector3, random::legacy_random::LegacyRandom};

use crate::config::FluidConfig;
use crate::error::{ConfigError, FluidError};
use crate::fluid::{
    FluidKind, FluidType, Fluids, displace, flow, flow_vector,
    level_store::FluidLevels,
    resolver::LevelAccess,
    scheduler::{self, UpdateScheduler},
};
use crate::grid::{Grid, Occupant};

/// What one call to [`FluidSimulation::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// The tick that ran.
    pub tick: u64,
    /// Cells the flow engine evaluated.
    pub evaluated: usize,
    /// Cells still waiting afterwards, including ones marked during the tick.
    pub pending: usize,
}

/// Owns every fluid level plus the state the flow engine needs between ticks.
pub struct FluidSimulation {
    config: FluidConfig,
    fluids: Fluids,
    levels: FluidLevels,
    scheduler: UpdateScheduler,
    random: LegacyRandom,
}

impl FluidSimulation {
    /// Creates an empty simulation.
    pub fn new(config: FluidConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            fluids: Fluids::new(&config),
            levels: FluidLevels::new(),
            scheduler: UpdateScheduler::new(),
            random: LegacyRandom::from_seed(config.seed),
            config,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &FluidConfig {
        &self.config
    }

    /// The descriptor of `kind`.
    #[must_use]
    pub const fn fluid(&self, kind: FluidKind) -> &FluidType {
        self.fluids.get(kind)
    }

    /// The next tick to run.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.scheduler.current_tick()
    }

    /// The level stores.
    #[must_use]
    pub const fn levels(&self) -> &FluidLevels {
        &self.levels
    }

    /// Fills `pos` with a full cell of `kind`.
    ///
    /// Returns `false` without changing anything when `pos` is outside the
    /// grid's height or holds something other than air or `kind`.
    pub fn place<G: Grid>(
        &mut self,
        grid: &mut G,
        kind: FluidKind,
        pos: BlockPos,
    ) -> Result<bool, FluidError> {
        let max = self.fluids.get(kind).max_fluid;
        let mut access = LevelAccess::new(grid, &mut self.levels, &self.fluids);
        let occupant = access.occupant(pos)?;
        if !access.in_height(pos.y()) || !(occupant.is_air() || occupant.holds(kind)) {
            return Ok(false);
        }
        access.set_level(kind, pos, max, true)?;
        access.mark_dirty_as(kind, pos)?;
        Ok(true)
    }

    /// The level of `kind` at `pos`.
    pub fn level<G: Grid>(
        &mut self,
        grid: &mut G,
        kind: FluidKind,
        pos: BlockPos,
    ) -> Result<i32, FluidError> {
        LevelAccess::new(grid, &mut self.levels, &self.fluids).level(kind, pos)
    }

    /// Sets the level of `kind` at `pos` (clamped) and mirrors it into the grid.
    pub fn set_level<G: Grid>(
        &mut self,
        grid: &mut G,
        kind: FluidKind,
        pos: BlockPos,
        level: i32,
    ) -> Result<(), FluidError> {
        let mut access = LevelAccess::new(grid, &mut self.levels, &self.fluids);
        access.set_level(kind, pos, level, true)?;
        if level > 0 {
            access.mark_dirty_as(kind, pos)?;
        }
        Ok(())
    }

    /// Queues `pos` for evaluation if it holds a fluid.
    pub fn mark_dirty<G: Grid>(&mut self, grid: &mut G, pos: BlockPos) -> Result<(), FluidError> {
        LevelAccess::new(grid, &mut self.levels, &self.fluids).mark_dirty(pos)
    }

    /// Called by the host when a block next to `pos` changed.
    pub fn notify_neighbor_changed<G: Grid>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
    ) -> Result<(), FluidError> {
        self.mark_dirty(grid, pos)
    }

    /// Forgets the fluid at `pos` after the host replaced it.
    ///
    /// The occupant is left alone; neighbours are queued so they can flow in.
    pub fn clear<G: Grid>(&mut self, grid: &mut G, pos: BlockPos) -> Result<(), FluidError> {
        let mut access = LevelAccess::new(grid, &mut self.levels, &self.fluids);
        for kind in FluidKind::ALL {
            access.set_level(kind, pos, 0, false)?;
        }
        access.mark_neighbors(pos);
        Ok(())
    }

    /// Pushes the fluid of a cell the host just filled (falling block, piston
    /// head) into the cells around it.
    ///
    /// `previous` and `metadata` describe what the cell held before. Returns
    /// the volume that found no room.
    pub fn displace<G: Grid>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        previous: Occupant,
        metadata: u8,
    ) -> Result<i32, FluidError> {
        let Occupant::Fluid(kind) = previous else {
            return self.clear(grid, pos).map(|()| 0);
        };
        let fluid = *self.fluids.get(kind);
        let mut access = LevelAccess::new(grid, &mut self.levels, &self.fluids);
        let lost = displace::displace(&mut access, &fluid, pos, metadata, &mut self.random)?;
        access.mark_neighbors(pos);
        Ok(lost)
    }

    /// Drops the level stores of an unloaded chunk.
    ///
    /// Levels come back from the grid's display states when the chunk is
    /// used again.
    pub fn unload_chunk(&mut self, chunk: ChunkPos) -> usize {
        self.levels.remove_chunk(chunk)
    }

    /// Sum of all stored levels of `kind`.
    #[must_use]
    pub fn total_volume(&self, kind: FluidKind) -> i64 {
        self.levels.total_volume(kind)
    }

    /// Number of cells waiting for evaluation.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.levels.dirty_count()
    }

    /// Runs the flow engine on a single cell immediately.
    pub fn update_cell<G: Grid>(
        &mut self,
        grid: &mut G,
        kind: FluidKind,
        pos: BlockPos,
    ) -> Result<(), FluidError> {
        let fluid = *self.fluids.get(kind);
        let mut access = LevelAccess::new(grid, &mut self.levels, &self.fluids);
        flow::update(&mut access, &fluid, pos, &mut self.random)
    }

    /// The flow direction at `pos`, for pushing entities.
    #[must_use]
    pub fn flow_vector<G: Grid>(&self, grid: &G, kind: FluidKind, pos: BlockPos) -> Vector3<f64> {
        flow_vector::flow_vector(grid, kind, pos)
    }

    /// The push an entity inside the fluid at `pos` receives.
    #[must_use]
    pub fn entity_push<G: Grid>(&self, grid: &G, kind: FluidKind, pos: BlockPos) -> Vector3<f64> {
        flow_vector::entity_push(grid, kind, pos)
    }

    /// Advances the simulation by one tick.
    ///
    /// Every store due this tick has its dirty cells evaluated bottom-up.
    /// A cell whose neighbouring chunk cannot be loaded stays queued for the
    /// next tick while the others run; the first such error is returned.
    #[tracing::instrument(level = "trace", skip_all, fields(tick = self.scheduler.current_tick()))]
    pub fn tick<G: Grid>(&mut self, grid: &mut G) -> Result<TickReport, FluidError> {
        let tick = self.scheduler.advance();
        let due = scheduler::drain_due(&mut self.levels, &self.fluids, tick);

        let mut access = LevelAccess::new(grid, &mut self.levels, &self.fluids);
        let evaluated = scheduler::run_due(&mut access, &due, &mut self.random)?;

        let report = TickReport {
            tick,
            evaluated,
            pending: self.levels.dirty_count(),
        };
        if report.evaluated > 0 {
            log::trace!(
                "tick {}: evaluated {} cells, {} pending",
                report.tick,
                report.evaluated,
                report.pending
            );
        }
        Ok(report)
    }

    /// Ticks until nothing is pending or `max_ticks` ran. Returns the ticks used.
    pub fn run_until_settled<G: Grid>(
        &mut self,
        grid: &mut G,
        max_ticks: u64,
    ) -> Result<u64, FluidError> {
        for ticks in 0..max_ticks {
            if self.pending() == 0 {
                return Ok(ticks);
            }
            self.tick(grid)?;
        }
        Ok(max_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{MemoryGrid, Rock};

    const WATER: FluidKind = FluidKind::Water;

    fn simulation() -> FluidSimulation {
        FluidSimulation::new(FluidConfig::default()).expect("valid config")
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = FluidConfig {
            global_rate: 0,
            ..FluidConfig::default()
        };
        assert!(FluidSimulation::new(config).is_err());
    }

    #[test]
    fn test_place_rules() {
        let mut sim = simulation();
        let mut grid = MemoryGrid::new(0, 8);
        let pos = BlockPos::new(1, 1, 1);

        assert!(sim.place(&mut grid, WATER, pos).expect("place"));
        assert_eq!(sim.level(&mut grid, WATER, pos).expect("level"), 2048);
        assert_eq!(sim.pending(), 1);

        assert!(!sim.place(&mut grid, FluidKind::Lava, pos).expect("place"));
        assert!(!sim.place(&mut grid, WATER, BlockPos::new(0, 8, 0)).expect("place"));
        grid.set_occupant(BlockPos::new(2, 1, 1), Occupant::Solid(Rock::Stone), 0);
        assert!(!sim.place(&mut grid, WATER, BlockPos::new(2, 1, 1)).expect("place"));
    }

    #[test]
    fn test_clear_keeps_occupant() {
        let mut sim = simulation();
        let mut grid = MemoryGrid::new(0, 8);
        let pos = BlockPos::new(1, 1, 1);
        sim.place(&mut grid, WATER, pos).expect("place");
        grid.set_occupant(pos, Occupant::Solid(Rock::Stone), 0);

        sim.clear(&mut grid, pos).expect("clear");
        assert_eq!(sim.total_volume(WATER), 0);
        assert_eq!(grid.occupant(pos), Occupant::Solid(Rock::Stone));
    }

    #[test]
    fn test_unload_and_adopt() {
        let mut sim = simulation();
        let mut grid = MemoryGrid::new(0, 8);
        let pos = BlockPos::new(20, 1, 20);
        grid.set_occupant(pos.below(), Occupant::Solid(Rock::Stone), 0);
        sim.place(&mut grid, WATER, pos).expect("place");

        assert_eq!(sim.unload_chunk(pos.chunk_pos()), 1);
        assert_eq!(sim.total_volume(WATER), 0);
        assert_eq!(sim.level(&mut grid, WATER, pos).expect("level"), 2048);
        assert_eq!(sim.total_volume(WATER), 2048);
    }

    #[test]
    fn test_tick_settles_single_cell() {
        let mut sim = simulation();
        let mut grid = MemoryGrid::new(0, 8);
        grid.fill(
            BlockPos::new(-3, 0, -3),
            BlockPos::new(3, 0, 3),
            Occupant::Solid(Rock::Stone),
        );
        sim.place(&mut grid, WATER, BlockPos::new(0, 1, 0)).expect("place");

        let report = sim.tick(&mut grid).expect("tick");
        assert_eq!(report.tick, 0);
        assert_eq!(report.evaluated, 1);
        assert!(report.pending > 0);
        assert_eq!(sim.total_volume(WATER), 2048);
    }
}
