use once_cell::sync::OnceCell;

use crate::{Side, Tile, TileCity, TileRoad, TileSide, TileView};

/// A [`Tile`] turned clockwise by `orientation`.
///
/// All edge, road and city queries are remapped through the rotation. The
/// rotated roads and cities are computed on first access and then kept for
/// the lifetime of the value, which is safe because the orientation can
/// never change.
#[derive(Clone, Debug)]
pub struct RotatedTile {
    tile: Tile,
    orientation: Side,
    roads: OnceCell<Vec<TileRoad>>,
    cities: OnceCell<Vec<TileCity>>,
}

impl RotatedTile {
    pub fn new(tile: Tile, orientation: Side) -> Self {
        Self {
            tile,
            orientation,
            roads: OnceCell::new(),
            cities: OnceCell::new(),
        }
    }

    /// Rotates further by `by`.
    ///
    /// The result wraps the same base tile, with the two orientations
    /// composed, so rotated tiles never nest.
    pub fn rotated(&self, by: Side) -> Self {
        Self::new(self.tile.clone(), self.orientation.rotate(by))
    }

    /// The unrotated tile.
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn orientation(&self) -> Side {
        self.orientation
    }
}

impl From<Tile> for RotatedTile {
    fn from(tile: Tile) -> Self {
        Self::new(tile, Side::North)
    }
}

impl PartialEq for RotatedTile {
    fn eq(&self, other: &Self) -> bool {
        self.tile == other.tile && self.orientation == other.orientation
    }
}

impl Eq for RotatedTile {}

impl TileView for RotatedTile {
    fn cities(&self) -> &[TileCity] {
        self.cities.get_or_init(|| {
            self.tile
                .cities()
                .iter()
                .map(|city| city.rotate(self.orientation))
                .collect()
        })
    }

    fn roads(&self) -> &[TileRoad] {
        self.roads.get_or_init(|| {
            self.tile
                .roads()
                .iter()
                .map(|road| road.rotate(self.orientation))
                .collect()
        })
    }

    fn cloister(&self) -> bool {
        self.tile.cloister()
    }

    fn side(&self, side: Side) -> TileSide {
        self.tile.side(side.unrotate(self.orientation))
    }
}
