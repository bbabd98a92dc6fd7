// Wrapper types making it harder to accidentaly mix world, chunk and local coordinates.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::math::{Vector2, Vector3};

/// Width of a chunk column along x and z.
pub const CHUNK_WIDTH: i32 = 16;

/// A chunk position (x, z stored as `Vector2::x` and `Vector2::y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos(pub Vector2<i32>);

/// A block position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos(pub Vector3<i32>);

/// A block position relative to its chunk.
///
/// Field order makes the derived ordering sort bottom-up, then by z, then by x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPos {
    /// World y (chunks span the whole height).
    pub y: i32,
    /// Local z in `0..16`.
    pub z: u8,
    /// Local x in `0..16`.
    pub x: u8,
}

impl ChunkPos {
    /// Creates a chunk position from chunk coordinates.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Vector2::new(x, z))
    }

    /// Chunk x coordinate.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// Chunk z coordinate.
    #[must_use]
    pub const fn z(self) -> i32 {
        self.0.y
    }

    /// The chunk owning the given world column.
    #[must_use]
    pub const fn containing(x: i32, z: i32) -> Self {
        Self::new(x >> 4, z >> 4)
    }
}

impl Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x(), self.z())
    }
}

impl BlockPos {
    /// Creates a block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// World x.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// World y.
    #[must_use]
    pub const fn y(self) -> i32 {
        self.0.y
    }

    /// World z.
    #[must_use]
    pub const fn z(self) -> i32 {
        self.0.z
    }

    /// Returns this position moved by the given deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dy, self.0.z + dz)
    }

    /// The position directly above.
    #[must_use]
    pub const fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The position directly below.
    #[must_use]
    pub const fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The chunk owning this position.
    #[must_use]
    pub const fn chunk_pos(self) -> ChunkPos {
        ChunkPos::containing(self.0.x, self.0.z)
    }

    /// This position relative to its owning chunk.
    #[must_use]
    pub const fn local(self) -> LocalPos {
        LocalPos {
            y: self.0.y,
            z: (self.0.z & 0xF) as u8,
            x: (self.0.x & 0xF) as u8,
        }
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

impl LocalPos {
    /// Converts back to world coordinates inside `chunk`.
    #[must_use]
    pub const fn to_block(self, chunk: ChunkPos) -> BlockPos {
        BlockPos::new(
            chunk.x() * CHUNK_WIDTH + self.x as i32,
            self.y,
            chunk.z() * CHUNK_WIDTH + self.z as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_coordinates_round_trip() {
        let pos = BlockPos::new(-1, 12, -17);
        let chunk = pos.chunk_pos();
        assert_eq!(chunk, ChunkPos::new(-1, -2));

        let local = pos.local();
        assert_eq!((local.x, local.z), (15, 15));
        assert_eq!(local.to_block(chunk), pos);
    }

    #[test]
    fn test_local_order_is_bottom_up() {
        let mut cells = vec![
            BlockPos::new(3, 5, 0).local(),
            BlockPos::new(0, 2, 9).local(),
            BlockPos::new(1, 2, 0).local(),
        ];
        cells.sort();
        assert_eq!(cells[0].y, 2);
        assert_eq!(cells[0].x, 1);
        assert_eq!(cells[2].y, 5);
    }
}
