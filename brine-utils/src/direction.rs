//! Direction tables for fluid propagation.
//!
//! Two sets are used: the eight horizontal directions fluids spread along
//! (four cardinal followed by four diagonal), and the six block faces the
//! pressure walk moves across.

use crate::BlockPos;

/// The eight horizontal `(dx, dz)` offsets.
///
/// Indices `0..4` are cardinal, `4..8` are diagonal. Index arithmetic wraps
/// with `& 7`, so a rotation is just an added offset.
pub const HORIZONTAL: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
];

/// A horizontal direction, stored as an index into [`HORIZONTAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Horizontal(u8);

impl Horizontal {
    /// The direction at `index`, wrapping into `0..8`.
    #[must_use]
    pub const fn from_index(index: i32) -> Self {
        Self((index & 0x7) as u8)
    }

    /// The cardinal direction at `index`, wrapping into `0..4`.
    #[must_use]
    pub const fn cardinal(index: i32) -> Self {
        Self((index & 0x3) as u8)
    }

    /// Iterates all eight directions starting at `skew`.
    pub fn rotated(skew: i32) -> impl Iterator<Item = Self> {
        (0..8).map(move |i| Self::from_index(i + skew))
    }

    /// Iterates the four cardinal directions starting at `skew`.
    pub fn rotated_cardinal(skew: i32) -> impl Iterator<Item = Self> {
        (0..4).map(move |i| Self::cardinal(i + skew))
    }

    /// The `(dx, dz)` offset.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        HORIZONTAL[self.0 as usize]
    }

    /// Whether both axes move.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        self.0 >= 4
    }

    /// Returns `pos` moved `distance` steps in this direction.
    #[must_use]
    pub const fn relative(self, pos: BlockPos, distance: i32) -> BlockPos {
        let (dx, dz) = self.offset();
        pos.offset(dx * distance, 0, dz * distance)
    }
}

/// The six block faces.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// Downward (-Y direction)
    Down = 0,
    /// Upward (+Y direction)
    Up = 1,
    /// North (-Z direction)
    North = 2,
    /// South (+Z direction)
    South = 3,
    /// West (-X direction)
    West = 4,
    /// East (+X direction)
    East = 5,
}

impl Face {
    /// All six faces in array form for iteration.
    pub const ALL: [Face; 6] = [
        Face::Down,
        Face::Up,
        Face::North,
        Face::South,
        Face::West,
        Face::East,
    ];

    /// Returns the opposite face.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Gets the offset in the given direction.
    ///
    /// Returns (dx, dy, dz) for this face.
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// The vertical component of the offset.
    #[must_use]
    pub const fn dy(self) -> i32 {
        self.offset().1
    }

    /// Returns a new `BlockPos` relative to the given position in this direction.
    #[must_use]
    pub const fn relative(self, pos: BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.offset();
        pos.offset(dx, dy, dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_visits_every_direction_once() {
        for skew in 0..16 {
            let mut seen = [false; 8];
            for dir in Horizontal::rotated(skew) {
                seen[dir.0 as usize] = true;
            }
            assert!(seen.iter().all(|s| *s), "skew {skew} missed a direction");
        }
    }

    #[test]
    fn test_diagonals() {
        let diagonals = Horizontal::rotated(0).filter(|d| d.is_diagonal()).count();
        assert_eq!(diagonals, 4);
        for dir in Horizontal::rotated(0) {
            let (dx, dz) = dir.offset();
            assert_eq!(dir.is_diagonal(), dx != 0 && dz != 0);
        }
    }

    #[test]
    fn test_opposite_faces_cancel() {
        for face in Face::ALL {
            let pos = BlockPos::new(4, 10, -3);
            assert_eq!(face.opposite().relative(face.relative(pos)), pos);
        }
    }
}
