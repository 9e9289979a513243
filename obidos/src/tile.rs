mod rotated;
mod side;
mod side_set;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use rotated::*;
pub use side::*;
pub use side_set::*;

/// A city on a tile, spanning one or more of its sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCity {
    pub walls: SideSet,
    /// Whether the city carries a shield.
    pub pendant: bool,
}

impl TileCity {
    #[must_use]
    pub fn rotate(self, by: Side) -> Self {
        Self {
            walls: self.walls.rotate(by),
            ..self
        }
    }
}

/// A road on a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TileRoad {
    /// A road crossing the tile, connecting two distinct sides.
    Through { source: Side, destination: Side },
    /// A road ending in the middle of the tile.
    End { source: Side },
}

impl TileRoad {
    pub fn source(self) -> Side {
        match self {
            TileRoad::Through { source, .. } | TileRoad::End { source } => source,
        }
    }

    /// The one or two sides this road touches.
    pub fn sides(self) -> SideSet {
        match self {
            TileRoad::Through {
                source,
                destination,
            } => SideSet::from_iter([source, destination]),
            TileRoad::End { source } => SideSet::new().insert(source),
        }
    }

    /// Is this a through road between opposite sides?
    pub fn is_straight(self) -> bool {
        match self {
            TileRoad::Through {
                source,
                destination,
            } => !source.is_adjacent_to(destination),
            TileRoad::End { .. } => false,
        }
    }

    #[must_use]
    pub fn rotate(self, by: Side) -> Self {
        match self {
            TileRoad::Through {
                source,
                destination,
            } => TileRoad::Through {
                source: source.rotate(by),
                destination: destination.rotate(by),
            },
            TileRoad::End { source } => TileRoad::End {
                source: source.rotate(by),
            },
        }
    }
}

/// What a tile shows along one of its edges.
///
/// Two tiles may only touch along edges of the same kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileSide {
    Road,
    City,
    Field,
}

/// Read-only queries shared by [`Tile`] and [`RotatedTile`].
pub trait TileView {
    fn cities(&self) -> &[TileCity];

    fn roads(&self) -> &[TileRoad];

    fn cloister(&self) -> bool;

    /// Classifies one edge of the tile.
    fn side(&self, side: Side) -> TileSide;
}

/// An immutable tile definition.
///
/// Build one with [`Tile::builder()`]:
/// ```
/// use obidos::{Side, Tile, TileSide, TileView};
/// let tile = Tile::builder()
///     .city(&[Side::North, Side::East])
///     .through_road(Side::South, Side::West)
///     .build();
/// assert_eq!(tile.side(Side::East), TileSide::City);
/// assert_eq!(tile.side(Side::West), TileSide::Road);
/// ```
///
/// Cloning is cheap, the cities and roads are shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    cities: Arc<[TileCity]>,
    roads: Arc<[TileRoad]>,
    cloister: bool,
}

impl Tile {
    pub fn builder() -> TileBuilder {
        TileBuilder::default()
    }

    /// Are both values backed by the same built tile?
    pub fn ptr_eq(&self, other: &Tile) -> bool {
        Arc::ptr_eq(&self.cities, &other.cities) && Arc::ptr_eq(&self.roads, &other.roads)
    }
}

impl TileView for Tile {
    fn cities(&self) -> &[TileCity] {
        &self.cities
    }

    fn roads(&self) -> &[TileRoad] {
        &self.roads
    }

    fn cloister(&self) -> bool {
        self.cloister
    }

    // Roads are checked before cities. The builder guarantees that no side
    // carries both, so the order does not change the outcome.
    fn side(&self, side: Side) -> TileSide {
        if self.roads.iter().any(|road| road.sides().contains(side)) {
            TileSide::Road
        } else if self.cities.iter().any(|city| city.walls.contains(side)) {
            TileSide::City
        } else {
            TileSide::Field
        }
    }
}

/// Collects the features of a [`Tile`].
///
/// Every method consumes and returns the builder, and [`Self::build()`]
/// consumes it for good, so a built tile can never be modified.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct TileBuilder {
    cities: Vec<TileCity>,
    roads: Vec<TileRoad>,
    cloister: bool,
}

impl TileBuilder {
    pub fn city(mut self, walls: &[Side]) -> Self {
        self.cities.push(TileCity {
            walls: SideSet::from_iter(walls.iter().copied()),
            pendant: false,
        });
        self
    }

    pub fn pendant_city(mut self, walls: &[Side]) -> Self {
        self.cities.push(TileCity {
            walls: SideSet::from_iter(walls.iter().copied()),
            pendant: true,
        });
        self
    }

    pub fn through_road(mut self, source: Side, destination: Side) -> Self {
        self.roads.push(TileRoad::Through {
            source,
            destination,
        });
        self
    }

    /// A road from `source` that ends on this tile.
    pub fn road(mut self, source: Side) -> Self {
        self.roads.push(TileRoad::End { source });
        self
    }

    pub fn cloister(mut self) -> Self {
        self.cloister = true;
        self
    }

    /// Freezes the tile.
    ///
    /// Panics if a city has no walls, a through road joins a side with
    /// itself, or a side is claimed by two cities or by a city and a road.
    pub fn build(self) -> Tile {
        let mut claimed_by_cities = SideSet::new();
        for city in &self.cities {
            assert!(!city.walls.is_empty(), "City without walls");
            assert!(
                (claimed_by_cities & city.walls).is_empty(),
                "Two cities share a side: {:?}",
                claimed_by_cities & city.walls
            );
            claimed_by_cities |= city.walls;
        }
        for road in &self.roads {
            if let TileRoad::Through {
                source,
                destination,
            } = *road
            {
                assert_ne!(source, destination, "Through road must join two sides");
            }
            assert!(
                (claimed_by_cities & road.sides()).is_empty(),
                "Road on a city side: {:?}",
                road
            );
        }
        Tile {
            cities: self.cities.into(),
            roads: self.roads.into(),
            cloister: self.cloister,
        }
    }
}
