//! Deterministic random sources.
//!
//! The fluid engine never reaches for a global generator: every update takes
//! a `&mut impl Random`, so the direction rotation it draws is owned by the
//! caller.

pub mod legacy_random;

pub use legacy_random::LegacyRandom;

/// A source of pseudo random numbers.
pub trait Random {
    /// A uniformly distributed value in `0..bound`. `bound` must be positive.
    fn next_i32_bounded(&mut self, bound: i32) -> i32;
}
