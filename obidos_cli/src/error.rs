use obidos::{PlacementError, Side};

use crate::Placement;

#[derive(Debug)]
/// Error type for a placement chosen by a player.
pub enum IllegalMove {
    PositionNotOffered {
        row: i32,
        col: i32,
    },
    OrientationNotOffered {
        row: i32,
        col: i32,
        orientation: Side,
    },
    PlacementRejected {
        placement: Placement,
        err: PlacementError,
    },
}

impl std::error::Error for IllegalMove {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalMove::PlacementRejected { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::PositionNotOffered { row, col } => {
                write!(f, "Tried to place the tile at ({}, {}), which was not offered", row, col)
            }
            IllegalMove::OrientationNotOffered {
                row,
                col,
                orientation,
            } => write!(
                f,
                "Tried to place the tile at ({}, {}) facing {:?}, which was not offered",
                row, col, orientation
            ),
            IllegalMove::PlacementRejected { placement, err: _ } => write!(
                f,
                "The board rejected the tile at ({}, {}) facing {:?}",
                placement.row, placement.col, placement.orientation
            ),
        }
    }
}
