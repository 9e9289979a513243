use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four edges of a tile.
///
/// Sides form a cyclic group of order four, so a side doubles as a
/// rotation amount: `North` is the identity, `East` a quarter turn
/// clockwise, and so on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

impl Side {
    /// All sides in canonical order.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    pub(crate) fn from_index(idx: u8) -> Side {
        Self::ALL[usize::from(idx % 4)]
    }

    /// Rotates `self` clockwise by `by`.
    pub fn rotate(self, by: Side) -> Side {
        Side::from_index(self as u8 + by as u8)
    }

    /// The inverse of [`Self::rotate()`] for a fixed `by`.
    pub fn unrotate(self, by: Side) -> Side {
        Side::from_index(self as u8 + 4 - by as u8)
    }

    pub fn opposite(self) -> Side {
        self.rotate(Side::South)
    }

    /// Do the two sides share a corner of the tile?
    pub fn is_adjacent_to(self, other: Side) -> bool {
        other == self.rotate(Side::East) || self == other.rotate(Side::East)
    }

    /// The `(row, col)` step from a cell to its neighbour on this side.
    ///
    /// Rows grow southwards and columns grow eastwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::North => (-1, 0),
            Side::East => (0, 1),
            Side::South => (1, 0),
            Side::West => (0, -1),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Side::North => 'N',
            Side::East => 'E',
            Side::South => 'S',
            Side::West => 'W',
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The error type for the [`FromStr`] instance of [`Side`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideFromStrErr(pub String);

impl std::error::Error for SideFromStrErr {}

impl std::fmt::Display for SideFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a side, expected one of N, E, S, W", self.0)
    }
}

impl FromStr for Side {
    type Err = SideFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Side::North),
            "e" | "east" => Ok(Side::East),
            "s" | "south" => Ok(Side::South),
            "w" | "west" => Ok(Side::West),
            _ => Err(SideFromStrErr(s.to_owned())),
        }
    }
}
