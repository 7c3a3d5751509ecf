//! Cardinal directions with modular quarter-turn arithmetic.

use nalgebra::Vector2;

/// Signed number of quarter turns; positive is counterclockwise (left).
pub type Turn = i32;

/// Cardinal direction, numbered counterclockwise from east.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dir {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::East, Dir::North, Dir::West, Dir::South];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    /// Rotate counterclockwise by `quarter_turns` (negative turns rotate clockwise).
    #[inline]
    pub fn rotate(self, quarter_turns: Turn) -> Self {
        Self::ALL[(self as i32 + quarter_turns).rem_euclid(4) as usize]
    }

    #[inline]
    pub fn opposite(self) -> Self {
        self.rotate(2)
    }

    /// Quarter turns `r` in `0..4` with `from.rotate(r) == self`.
    #[inline]
    pub fn turns_from(self, from: Dir) -> Turn {
        (self as i32 - from as i32).rem_euclid(4)
    }

    /// Unit step on the integer grid (x to the east, y to the north).
    pub fn unit(self) -> Vector2<i64> {
        match self {
            Dir::East => Vector2::new(1, 0),
            Dir::North => Vector2::new(0, 1),
            Dir::West => Vector2::new(-1, 0),
            Dir::South => Vector2::new(0, -1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::East => "east",
            Dir::North => "north",
            Dir::West => "west",
            Dir::South => "south",
        }
    }
}
