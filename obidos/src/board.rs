mod bbox;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub use bbox::*;

use crate::{RotatedTile, Side, SideSet, Tile, TileSide, TileView};

/// A `(row, col)` coordinate on the board.
pub type Position = (i32, i32);

/// A free location together with the orientations at which a particular
/// tile could be placed there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionWithSides {
    pub row: i32,
    pub col: i32,
    /// Never empty.
    pub sides: SideSet,
}

/// Why a tile cannot be placed at some location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementError {
    Occupied,
    NoNeighbour,
    EdgeMismatch {
        /// The side of the placed tile
        side: Side,
        ours: TileSide,
        theirs: TileSide,
    },
}

impl std::error::Error for PlacementError {}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::Occupied => write!(f, "There is a tile at this location already"),
            PlacementError::NoNeighbour => write!(f, "The location is not next to any tile"),
            PlacementError::EdgeMismatch { side, ours, theirs } => write!(
                f,
                "The tile shows {:?} on its {:?} side, but the neighbour there shows {:?}",
                ours, side, theirs
            ),
        }
    }
}

/// The tiles of one board row, keyed by column.
type Row = BTreeMap<i32, RotatedTile>;

/// An unbounded grid of placed tiles.
///
/// The board starts with a single tile at `(0, 0)` and only ever grows.
/// Every tile touches an earlier one, and neighbouring tiles always show
/// the same kind of edge to each other.
#[derive(Clone, Debug)]
pub struct Board {
    rows: BTreeMap<i32, Row>,
    /// The smallest area that contains all tiles.
    bbox: BoundingBox,
    num_tiles: usize,
    /// Incremented on every successful [`Board::add()`].
    move_number: u64,
    free_locations: RefCell<Option<FreeLocations>>,
}

/// The free locations as of one move number.
#[derive(Clone, Debug)]
struct FreeLocations {
    computed_at: u64,
    positions: Rc<[Position]>,
}

impl Board {
    /// Creates a board with `initial` at `(0, 0)`, unrotated.
    pub fn new(initial: Tile) -> Self {
        let mut rows = BTreeMap::new();
        rows.insert(0, Row::from([(0, RotatedTile::from(initial))]));
        Self {
            rows,
            bbox: BoundingBox::singleton(0, 0),
            num_tiles: 1,
            move_number: 0,
            free_locations: RefCell::new(None),
        }
    }

    pub fn get(&self, row: i32, col: i32) -> Option<&RotatedTile> {
        self.rows.get(&row)?.get(&col)
    }

    /// The number of tiles on the board.
    pub fn len(&self) -> usize {
        self.num_tiles
    }

    pub fn move_number(&self) -> u64 {
        self.move_number
    }

    /// The smallest area enclosing the tiles currently on the board.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// The first row with a tile on it.
    pub fn min_row(&self) -> i32 {
        self.bbox.row_min
    }

    /// One past the last row with a tile on it.
    pub fn max_row(&self) -> i32 {
        self.bbox.row_max + 1
    }

    /// The first column with a tile on it.
    pub fn min_col(&self) -> i32 {
        self.bbox.col_min
    }

    /// One past the last column with a tile on it.
    pub fn max_col(&self) -> i32 {
        self.bbox.col_max + 1
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32, &RotatedTile)> + '_ {
        self.rows
            .iter()
            .flat_map(|(&row, tiles)| tiles.iter().map(move |(&col, tile)| (row, col, tile)))
    }

    /// Does `tile` match every tile next to `(row, col)`?
    ///
    /// Sides without a neighbour always match. Whether the location itself is
    /// free is not checked.
    pub fn piece_fits(&self, row: i32, col: i32, tile: &RotatedTile) -> bool {
        Side::ALL.into_iter().all(|side| {
            let (d_row, d_col) = side.offset();
            match self.get(row + d_row, col + d_col) {
                Some(neighbour) => neighbour.side(side.opposite()) == tile.side(side),
                None => true,
            }
        })
    }

    /// Checks whether `tile` may be placed at `(row, col)`.
    pub fn check_placement(
        &self,
        row: i32,
        col: i32,
        tile: &RotatedTile,
    ) -> Result<(), PlacementError> {
        if self.get(row, col).is_some() {
            return Err(PlacementError::Occupied);
        }
        if self.free_locations().binary_search(&(row, col)).is_err() {
            return Err(PlacementError::NoNeighbour);
        }
        for side in Side::ALL {
            let (d_row, d_col) = side.offset();
            if let Some(neighbour) = self.get(row + d_row, col + d_col) {
                let (ours, theirs) = (tile.side(side), neighbour.side(side.opposite()));
                if ours != theirs {
                    return Err(PlacementError::EdgeMismatch {
                        side,
                        ours,
                        theirs,
                    });
                }
            }
        }
        Ok(())
    }

    /// Places a tile, returning it on success.
    ///
    /// Fails and leaves the board untouched if the location holds a tile
    /// already, is not next to any tile, or the tile does not fit there.
    pub fn try_add(
        &mut self,
        row: i32,
        col: i32,
        tile: RotatedTile,
    ) -> Result<&RotatedTile, PlacementError> {
        self.check_placement(row, col, &tile)?;

        self.bbox.update(row, col);
        self.num_tiles += 1;
        self.move_number += 1;
        Ok(self.rows.entry(row).or_default().entry(col).or_insert(tile))
    }

    /// Like [`Self::try_add()`], but returns `None` on failure.
    pub fn add(&mut self, row: i32, col: i32, tile: RotatedTile) -> Option<&RotatedTile> {
        match self.try_add(row, col, tile) {
            Ok(placed) => Some(placed),
            Err(err) => {
                debug!(row, col, %err, "Rejected placement");
                None
            }
        }
    }

    /// All empty cells sharing an edge with at least one tile, in row-major order.
    ///
    /// The result is computed at most once per move number.
    pub fn free_locations(&self) -> Rc<[Position]> {
        let mut cache = self.free_locations.borrow_mut();
        if let Some(cached) = cache
            .as_ref()
            .filter(|cached| cached.computed_at == self.move_number)
        {
            return Rc::clone(&cached.positions);
        }

        trace!(move_number = self.move_number, "Computing free locations");
        let positions: Rc<[Position]> = self.scan_free_locations().into();
        *cache = Some(FreeLocations {
            computed_at: self.move_number,
            positions: Rc::clone(&positions),
        });
        positions
    }

    /// The free locations where `tile` fits in at least one orientation.
    pub fn free_locations_for_tile(
        &self,
        tile: &Tile,
    ) -> impl Iterator<Item = PositionWithSides> + '_ {
        let locations = self.free_locations();
        let rotations = Side::ALL.map(|orientation| RotatedTile::new(tile.clone(), orientation));
        (0..locations.len()).filter_map(move |idx| {
            let (row, col) = locations[idx];
            let sides: SideSet = rotations
                .iter()
                .filter(|rotated| self.piece_fits(row, col, rotated))
                .map(RotatedTile::orientation)
                .collect();
            (!sides.is_empty()).then_some(PositionWithSides { row, col, sides })
        })
    }

    // Slides a window of three rows over the board. A cell in the middle row
    // is free if it is empty and the rows above/below or the cells left/right
    // of it hold a tile.
    fn scan_free_locations(&self) -> Vec<Position> {
        let occupied = |tiles: Option<&Row>, col: i32| tiles.is_some_and(|t| t.contains_key(&col));

        let mut free = Vec::new();
        for row in self.bbox.row_min - 1..=self.bbox.row_max + 1 {
            let prev = self.rows.get(&(row - 1));
            let curr = self.rows.get(&row);
            let next = self.rows.get(&(row + 1));

            let Some((col_min, col_max)) = [
                prev.and_then(extent),
                curr.and_then(extent).map(|(min, max)| (min - 1, max + 1)),
                next.and_then(extent),
            ]
            .into_iter()
            .flatten()
            .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b))) else {
                continue;
            };

            for col in col_min..=col_max {
                if occupied(curr, col) {
                    continue;
                }
                let vertical = occupied(prev, col) || occupied(next, col);
                let horizontal = occupied(curr, col - 1) || occupied(curr, col + 1);
                if vertical || horizontal {
                    free.push((row, col));
                }
            }
        }
        free
    }
}

/// The first and last occupied column of a row.
fn extent(tiles: &Row) -> Option<(i32, i32)> {
    Some((*tiles.keys().next()?, *tiles.keys().next_back()?))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::PlacementAttempts;
    use crate::{tile, TileId};

    fn blank_tile() -> Tile {
        Tile::builder().build()
    }

    fn crossroads_tile() -> Tile {
        tile!("X")
    }

    fn west_city_tile() -> Tile {
        Tile::builder().city(&[Side::West]).build()
    }

    fn horizontal_road_tile() -> Tile {
        Tile::builder().through_road(Side::East, Side::West).build()
    }

    fn unrotated(tile: Tile) -> RotatedTile {
        RotatedTile::from(tile)
    }

    // Brute force version of the free location scan
    fn expected_free_locations(board: &Board) -> Vec<Position> {
        let bbox = board.bbox();
        let mut free = Vec::new();
        for row in bbox.row_min - 1..=bbox.row_max + 1 {
            for col in bbox.col_min - 1..=bbox.col_max + 1 {
                let has_neighbour = Side::ALL.into_iter().any(|side| {
                    let (d_row, d_col) = side.offset();
                    board.get(row + d_row, col + d_col).is_some()
                });
                if board.get(row, col).is_none() && has_neighbour {
                    free.push((row, col));
                }
            }
        }
        free
    }

    fn is_connected(board: &Board) -> bool {
        let mut seen = BTreeSet::from([(0, 0)]);
        let mut queue = VecDeque::from([(0, 0)]);
        while let Some((row, col)) = queue.pop_front() {
            for side in Side::ALL {
                let (d_row, d_col) = side.offset();
                let neighbour = (row + d_row, col + d_col);
                if board.get(neighbour.0, neighbour.1).is_some() && seen.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        seen.len() == board.len()
    }

    quickcheck! {
        fn placements_keep_the_board_consistent(attempts: PlacementAttempts) -> bool {
            let mut board = Board::new(attempts.initial.tile().clone());
            for (row, col, id, orientation) in attempts.attempts {
                let offered = board
                    .free_locations_for_tile(id.tile())
                    .any(|p| (p.row, p.col) == (row, col) && p.sides.contains(orientation));
                let previous = board.get(row, col).cloned();
                let moves_before = board.move_number();
                let placed = board
                    .add(row, col, RotatedTile::new(id.tile().clone(), orientation))
                    .is_some();
                if placed != offered {
                    return false;
                }
                if !placed && (board.get(row, col).cloned() != previous || board.move_number() != moves_before) {
                    return false;
                }
            }
            board.tiles().all(|(row, col, tile)| board.piece_fits(row, col, tile))
                && board.tiles().all(|(row, col, _)| board.bbox().contains(row, col))
                && board.tiles().count() == board.len()
                && *board.free_locations() == *expected_free_locations(&board)
                && is_connected(&board)
        }
    }

    #[test]
    fn initial_free_locations() {
        let board = Board::new(blank_tile());
        assert_eq!(*board.free_locations(), [(-1, 0), (0, -1), (0, 1), (1, 0)]);
    }

    #[test]
    fn free_locations_after_adding_tiles() {
        let mut board = Board::new(blank_tile());
        assert!(board.add(1, 0, unrotated(blank_tile())).is_some());
        assert!(board.add(1, 1, unrotated(blank_tile())).is_some());
        assert!(board.add(0, -1, unrotated(blank_tile())).is_some());

        assert_eq!(
            *board.free_locations(),
            [
                (-1, -1),
                (-1, 0),
                (0, -2),
                (0, 1),
                (1, -1),
                (1, 2),
                (2, 0),
                (2, 1),
            ]
        );
    }

    #[test]
    fn free_locations_for_a_tile() {
        let mut board = Board::new(blank_tile());
        board.add(1, 0, unrotated(blank_tile()));
        board.add(1, 1, unrotated(blank_tile()));

        let locations: Vec<_> = board
            .free_locations_for_tile(&horizontal_road_tile())
            .collect();
        let vertical = SideSet::from_iter([Side::North, Side::South]);
        let horizontal = SideSet::from_iter([Side::East, Side::West]);
        assert_eq!(
            locations,
            [
                PositionWithSides { row: -1, col: 0, sides: vertical },
                PositionWithSides { row: 0, col: -1, sides: horizontal },
                PositionWithSides { row: 1, col: -1, sides: horizontal },
                PositionWithSides { row: 1, col: 2, sides: horizontal },
                PositionWithSides { row: 2, col: 0, sides: vertical },
                PositionWithSides { row: 2, col: 1, sides: vertical },
            ]
        );
    }

    #[test]
    fn free_locations_are_cached_per_move() {
        let mut board = Board::new(blank_tile());
        let first = board.free_locations();
        assert!(Rc::ptr_eq(&first, &board.free_locations()));

        // A rejected placement does not invalidate the cache
        assert!(board.add(5, 5, unrotated(blank_tile())).is_none());
        assert!(Rc::ptr_eq(&first, &board.free_locations()));

        board.add(0, 1, unrotated(blank_tile()));
        assert_eq!(board.move_number(), 1);
        let second = board.free_locations();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 6);
    }

    #[test]
    fn bounds() {
        let mut board = Board::new(blank_tile());
        for (row, col) in [(1, 0), (1, 1), (1, 2), (-1, 0), (-2, 0), (-2, -1)] {
            assert!(board.add(row, col, unrotated(blank_tile())).is_some());
        }

        assert_eq!(board.min_col(), -1);
        assert_eq!(board.max_col(), 3);
        assert_eq!(board.min_row(), -2);
        assert_eq!(board.max_row(), 2);
        assert_eq!(board.len(), 7);
    }

    #[test]
    fn retrieves_pieces() {
        let mut board = Board::new(blank_tile());
        let piece: *const RotatedTile = board.add(1, 0, unrotated(blank_tile())).unwrap();
        assert!(std::ptr::eq(board.get(1, 0).unwrap(), piece));
        assert!(board.get(2, 2).is_none());
    }

    #[test]
    fn places_matching_pieces_next_to_each_other() {
        let mut board = Board::new(tile!("U"));
        let tile = RotatedTile::new(tile!("V"), Side::West);
        assert_eq!(board.add(-1, 0, tile.clone()), Some(&tile));
        assert_eq!(board.get(-1, 0), Some(&tile));
    }

    #[test]
    fn blocks_mismatching_neighbours() {
        let mut board = Board::new(blank_tile());

        assert!(board.add(1, 0, unrotated(crossroads_tile())).is_none());
        assert!(board.get(1, 0).is_none());

        assert!(board.add(0, 1, unrotated(west_city_tile())).is_none());
        assert!(board.get(0, 1).is_none());
        assert_eq!(board.move_number(), 0);
    }

    #[test]
    fn explains_rejected_placements() {
        let mut board = Board::new(blank_tile());
        assert_eq!(
            board.check_placement(0, 0, &unrotated(blank_tile())),
            Err(PlacementError::Occupied)
        );
        assert_eq!(
            board.check_placement(0, 2, &unrotated(blank_tile())),
            Err(PlacementError::NoNeighbour)
        );
        assert_eq!(
            board.try_add(0, 1, unrotated(west_city_tile())),
            Err(PlacementError::EdgeMismatch {
                side: Side::West,
                ours: TileSide::City,
                theirs: TileSide::Field,
            })
        );
        assert_eq!(board.len(), 1);
        assert!(board.try_add(0, 1, unrotated(blank_tile())).is_ok());
    }

    #[test]
    fn blocks_discontiguous_pieces() {
        let mut board = Board::new(blank_tile());
        assert!(board.add(2, 0, unrotated(blank_tile())).is_none());
        assert!(board.get(2, 0).is_none());
    }

    #[test]
    fn blocks_replacing_pieces() {
        let mut board = Board::new(blank_tile());
        let original = board.get(0, 0).cloned();
        assert!(board.add(0, 0, unrotated(blank_tile())).is_none());
        assert!(board.add(0, 0, unrotated(crossroads_tile())).is_none());
        assert_eq!(board.get(0, 0).cloned(), original);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn starting_tile_is_unrotated() {
        let board = Board::new(TileId::D.tile().clone());
        let start = board.get(0, 0).unwrap();
        assert_eq!(start.orientation(), Side::North);
        assert!(start.tile().ptr_eq(TileId::D.tile()));
    }
}
