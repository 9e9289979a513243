use anyhow::anyhow;
use obidos::{Board, PositionWithSides, Tile};
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::SeedableRng;

use crate::player::{Placement, Player};

/// Places each tile at a uniformly random valid position and orientation.
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn make_move(
        &mut self,
        _board: &Board,
        _tile: &Tile,
        valid_moves: &[PositionWithSides],
    ) -> anyhow::Result<Placement> {
        let mv = valid_moves
            .choose(&mut self.rng)
            .ok_or_else(|| anyhow!("No valid moves to choose from"))?;
        let orientation = mv
            .sides
            .into_iter()
            .choose(&mut self.rng)
            .ok_or_else(|| anyhow!("No orientation offered at ({}, {})", mv.row, mv.col))?;
        Ok(Placement {
            row: mv.row,
            col: mv.col,
            orientation,
        })
    }
}
