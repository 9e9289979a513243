use quickcheck::Arbitrary;

use crate::{Side, SideSet, TileId};

/// A starting tile and a sequence of placements, most of which are rejected.
#[derive(Clone, Debug)]
pub struct PlacementAttempts {
    pub initial: TileId,
    pub attempts: Vec<(i32, i32, TileId, Side)>,
}

impl Arbitrary for PlacementAttempts {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let num_attempts = usize::arbitrary(g) % 60;
        let attempts = (0..num_attempts)
            .map(|_| {
                // Stay close to the origin so that many attempts touch the board
                let row = (u8::arbitrary(g) % 7) as i32 - 3;
                let col = (u8::arbitrary(g) % 7) as i32 - 3;
                (row, col, TileId::arbitrary(g), Side::arbitrary(g))
            })
            .collect();
        PlacementAttempts {
            initial: TileId::arbitrary(g),
            attempts,
        }
    }
}

impl Arbitrary for Side {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&Side::ALL).unwrap()
    }
}

impl Arbitrary for SideSet {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Side::ALL
            .into_iter()
            .filter(|_| bool::arbitrary(g))
            .collect()
    }
}

impl Arbitrary for TileId {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&TileId::ALL).unwrap()
    }
}
