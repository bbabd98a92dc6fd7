//! Shared position, direction and random helpers for the Brine fluid engine.
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
    clippy::cargo_common_metadata
)]

pub mod direction;
pub mod math;
pub mod random;
pub mod types;

pub use types::{BlockPos, ChunkPos, LocalPos};
