//! The tiles of the base game and how many copies of each are in the draw pile.

use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{Side, Tile};

use Side::{East as E, North as N, South as S, West as W};

/// The letter naming one of the 24 tile shapes of the base game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileId {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
}

/// The tile that is on the board before the first move.
pub const STARTING_TILE: TileId = TileId::D;

/// Number of tiles in [`default_draw_pile()`].
pub const DRAW_PILE_SIZE: usize = 71;

static DEFAULT_TILES: Lazy<[Tile; 24]> = Lazy::new(|| {
    [
        // A: cloister with a road leaving south
        Tile::builder().cloister().road(S).build(),
        // B: cloister
        Tile::builder().cloister().build(),
        // C: city on all sides, with shield
        Tile::builder().pendant_city(&[N, E, S, W]).build(),
        // D: straight road with a city to the east
        Tile::builder().through_road(N, S).city(&[E]).build(),
        // E: city north
        Tile::builder().city(&[N]).build(),
        // F: city east-west, with shield
        Tile::builder().pendant_city(&[E, W]).build(),
        // G: city north-south
        Tile::builder().city(&[N, S]).build(),
        // H: separate cities east and west
        Tile::builder().city(&[E]).city(&[W]).build(),
        // I: separate cities east and south
        Tile::builder().city(&[E]).city(&[S]).build(),
        // J: city north, curved road east-south
        Tile::builder().city(&[N]).through_road(E, S).build(),
        // K: city east, curved road north-west
        Tile::builder().city(&[E]).through_road(N, W).build(),
        // L: city east, three roads ending in a junction
        Tile::builder().city(&[E]).road(N).road(S).road(W).build(),
        // M: corner city north-west, with shield
        Tile::builder().pendant_city(&[N, W]).build(),
        // N: corner city north-west
        Tile::builder().city(&[N, W]).build(),
        // O: corner city with shield, curved road east-south
        Tile::builder().pendant_city(&[N, W]).through_road(E, S).build(),
        // P: corner city, curved road east-south
        Tile::builder().city(&[N, W]).through_road(E, S).build(),
        // Q: three-sided city, with shield
        Tile::builder().pendant_city(&[N, E, W]).build(),
        // R: three-sided city
        Tile::builder().city(&[N, E, W]).build(),
        // S: three-sided city with shield, road south
        Tile::builder().pendant_city(&[N, E, W]).road(S).build(),
        // T: three-sided city, road south
        Tile::builder().city(&[N, E, W]).road(S).build(),
        // U: straight road north-south
        Tile::builder().through_road(N, S).build(),
        // V: curved road south-west
        Tile::builder().through_road(S, W).build(),
        // W: three-way junction
        Tile::builder().road(E).road(S).road(W).build(),
        // X: crossroads
        Tile::builder().road(N).road(E).road(S).road(W).build(),
    ]
});

impl TileId {
    pub const ALL: [TileId; 24] = [
        TileId::A,
        TileId::B,
        TileId::C,
        TileId::D,
        TileId::E,
        TileId::F,
        TileId::G,
        TileId::H,
        TileId::I,
        TileId::J,
        TileId::K,
        TileId::L,
        TileId::M,
        TileId::N,
        TileId::O,
        TileId::P,
        TileId::Q,
        TileId::R,
        TileId::S,
        TileId::T,
        TileId::U,
        TileId::V,
        TileId::W,
        TileId::X,
    ];

    /// The catalog tile with this letter.
    ///
    /// Every call returns the same tile, so clones of it compare equal
    /// with [`Tile::ptr_eq()`].
    pub fn tile(self) -> &'static Tile {
        &DEFAULT_TILES[self as usize]
    }

    /// How many copies of this tile are in the draw pile.
    ///
    /// The starting tile is not included.
    pub fn copies(self) -> usize {
        match self {
            TileId::A => 2,
            TileId::B => 4,
            TileId::C => 1,
            TileId::D => 3,
            TileId::E => 5,
            TileId::F => 2,
            TileId::G => 1,
            TileId::H => 3,
            TileId::I => 2,
            TileId::J => 3,
            TileId::K => 3,
            TileId::L => 3,
            TileId::M => 2,
            TileId::N => 3,
            TileId::O => 2,
            TileId::P => 3,
            TileId::Q => 1,
            TileId::R => 3,
            TileId::S => 2,
            TileId::T => 1,
            TileId::U => 8,
            TileId::V => 9,
            TileId::W => 4,
            TileId::X => 1,
        }
    }

    pub fn letter(self) -> char {
        char::from(b'A' + self as u8)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The error type for the [`FromStr`] instance of [`TileId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileIdFromStrErr {
    Empty,
    MoreThanOneChar,
    UnknownLetter(char),
}

impl std::error::Error for TileIdFromStrErr {}

impl std::fmt::Display for TileIdFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileIdFromStrErr::Empty => write!(f, "No tile letter given"),
            TileIdFromStrErr::MoreThanOneChar => write!(f, "A tile is named by a single letter"),
            TileIdFromStrErr::UnknownLetter(c) => {
                write!(f, "There is no tile '{}', expected A to X", c)
            }
        }
    }
}

impl FromStr for TileId {
    type Err = TileIdFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(TileIdFromStrErr::Empty)?;
        if chars.next().is_some() {
            return Err(TileIdFromStrErr::MoreThanOneChar);
        }
        TileId::ALL
            .into_iter()
            .find(|id| id.letter() == letter.to_ascii_uppercase())
            .ok_or(TileIdFromStrErr::UnknownLetter(letter))
    }
}

/// Shorthand for getting a catalog [`Tile`] by its letter.
///
/// ```
/// # use obidos::{Side, TileSide, TileView};
/// let road = obidos::tile!("U");
/// assert_eq!(road.side(Side::North), TileSide::Road);
/// ```
#[macro_export]
macro_rules! tile {
    ($letter:literal) => {
        <$crate::TileId as std::str::FromStr>::from_str($letter)
            .expect("Invalid tile letter given to tile! macro")
            .tile()
            .clone()
    };
}
// The import is for using the macro in other modules, see https://stackoverflow.com/a/31749071/1726797
#[allow(unused_imports)]
pub(crate) use tile;

/// Every tile of the draw pile, unshuffled, grouped by letter.
pub fn default_draw_pile() -> Vec<TileId> {
    TileId::ALL
        .into_iter()
        .flat_map(|id| std::iter::repeat(id).take(id.copies()))
        .collect()
}
