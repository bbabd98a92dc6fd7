//! Finite-volume fluid simulation over a chunked voxel grid.
//!
//! Every fluid cell stores an integer level in `[0, max_fluid]`. Cells whose
//! level changed are marked dirty and re-evaluated on later ticks by the flow
//! engine in [`fluid::flow`]; the host world is reached only through the
//! [`grid::Grid`] trait.
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata,
    clippy::module_name_repetitions
)]

pub mod config;
pub mod error;
pub mod fluid;
pub mod grid;
pub mod simulation;

pub use config::FluidConfig;
pub use error::{ConfigError, FluidError, GridError};
pub use fluid::{FluidKind, FluidType, Fluids};
pub use grid::{Grid, MemoryGrid, ObstacleKind, Occupant, Rock};
pub use simulation::{FluidSimulation, TickReport};
