//! Error types for the fluid engine.

use brine_utils::ChunkPos;
use thiserror::Error;

/// Failures reported by a [`Grid`](crate::grid::Grid) implementation.
#[derive(Debug, Error)]
pub enum GridError {
    /// The chunk lies outside the area the grid can provide.
    #[error("chunk {0} is outside the world border")]
    OutOfBounds(ChunkPos),
    /// The chunk exists but could not be brought into memory.
    #[error("chunk {chunk} could not be loaded: {reason}")]
    Unavailable {
        /// The chunk that failed to load.
        chunk: ChunkPos,
        /// Grid-specific description.
        reason: String,
    },
}

/// Errors raised while evaluating fluid cells.
#[derive(Debug, Error)]
pub enum FluidError {
    /// A neighbouring chunk could not be resolved.
    #[error("grid access failed: {0}")]
    Grid(#[from] GridError),
}

/// A configuration value outside its accepted range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Rejected by validation.
    #[error("invalid fluid config: {0}")]
    Invalid(&'static str),
}
