//! A two component vector.

use serde::{Deserialize, Serialize};

/// A two component vector, used for chunk coordinates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Vector2<T> {
    /// The x component.
    pub x: T,
    /// The y component (the z axis when used for chunk columns).
    pub y: T,
}

impl<T> Vector2<T> {
    /// Creates a new vector.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}
