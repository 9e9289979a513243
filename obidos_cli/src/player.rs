use obidos::{Board, PositionWithSides, RotatedTile, Side, Tile};
use serde::{Deserialize, Serialize};

/// Where and how a player wants to put the drawn tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub row: i32,
    pub col: i32,
    pub orientation: Side,
}

/// A tile that was just placed, as seen by every player.
#[derive(Clone, Copy, Debug)]
pub struct MoveView<'a> {
    pub board: &'a Board,
    pub player_idx: usize,
    pub player_name: &'a str,
    pub row: i32,
    pub col: i32,
    pub tile: &'a RotatedTile,
}

/// A participant in a game.
pub trait Player {
    fn name(&self) -> &str;

    /// Picks one of `valid_moves` for `tile`.
    ///
    /// `valid_moves` is never empty. Returning a placement that is not among
    /// them loses the game; returning an error aborts it.
    fn make_move(
        &mut self,
        board: &Board,
        tile: &Tile,
        valid_moves: &[PositionWithSides],
    ) -> anyhow::Result<Placement>;

    /// Called after every placement, including the player's own.
    fn on_move(&mut self, _mv: &MoveView<'_>) {}
}
