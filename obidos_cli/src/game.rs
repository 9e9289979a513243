use obidos::{default_draw_pile, Board, PositionWithSides, RotatedTile, TileId, STARTING_TILE};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, trace};

use crate::error::IllegalMove;
use crate::player::{MoveView, Placement, Player};

pub enum GameResult {
    /// The draw pile ran out.
    Finished(GameSummary),
    IllegalMoveByPlayer { player_idx: usize, err: IllegalMove },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameSummary {
    pub tiles_placed: usize,
    /// Tiles that could not be placed anywhere when they were drawn.
    pub tiles_discarded: usize,
    pub turns: usize,
}

/// A game on one board, with the players taking turns in order.
pub struct Game {
    board: Board,
    draw_pile: Vec<TileId>,
    players: Vec<Box<dyn Player>>,
}

impl Game {
    /// Sets up the board with the starting tile and shuffles the draw pile.
    pub fn new(players: Vec<Box<dyn Player>>, rng: &mut StdRng) -> Self {
        let mut draw_pile = default_draw_pile();
        draw_pile.shuffle(rng);
        debug!(tiles = draw_pile.len(), "Shuffled the draw pile");
        Self {
            board: Board::new(STARTING_TILE.tile().clone()),
            draw_pile,
            players,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The number of tiles left in the draw pile.
    pub fn tiles_left(&self) -> usize {
        self.draw_pile.len()
    }

    /// Plays until the draw pile is empty.
    ///
    /// Returns an error only when a player fails to answer, not when an
    /// illegal move is played.
    pub fn play(&mut self) -> anyhow::Result<GameResult> {
        if self.players.is_empty() {
            anyhow::bail!("A game needs at least one player");
        }

        let mut summary = GameSummary::default();
        loop {
            for player_idx in 0..self.players.len() {
                let Some((tile_id, valid_moves)) = self.draw_playable_tile(&mut summary) else {
                    info!(?summary, "The draw pile is empty");
                    return Ok(GameResult::Finished(summary));
                };
                let tile = tile_id.tile();
                summary.turns += 1;

                let player_name = self.players[player_idx].name().to_owned();
                trace!(
                    player = &player_name,
                    tile = %tile_id,
                    moves = valid_moves.len(),
                    "Asking for a move"
                );
                let placement =
                    self.players[player_idx].make_move(&self.board, tile, &valid_moves)?;

                if let Err(err) = check_offered(&valid_moves, placement) {
                    return Ok(GameResult::IllegalMoveByPlayer { player_idx, err });
                }
                let rotated = RotatedTile::new(tile.clone(), placement.orientation);
                if let Err(err) = self.board.try_add(placement.row, placement.col, rotated) {
                    return Ok(GameResult::IllegalMoveByPlayer {
                        player_idx,
                        err: IllegalMove::PlacementRejected { placement, err },
                    });
                }
                let Some(placed) = self.board.get(placement.row, placement.col) else {
                    unreachable!("Placed tile missing from the board");
                };
                summary.tiles_placed += 1;
                debug!(
                    player = &player_name,
                    tile = %tile_id,
                    row = placement.row,
                    col = placement.col,
                    orientation = %placement.orientation,
                    "Placed tile"
                );

                let mv = MoveView {
                    board: &self.board,
                    player_idx,
                    player_name: &player_name,
                    row: placement.row,
                    col: placement.col,
                    tile: placed,
                };
                for player in self.players.iter_mut() {
                    player.on_move(&mv);
                }
            }
        }
    }

    /// Draws until a tile fits somewhere, discarding the others.
    fn draw_playable_tile(
        &mut self,
        summary: &mut GameSummary,
    ) -> Option<(TileId, Vec<PositionWithSides>)> {
        loop {
            let tile_id = self.draw_pile.pop()?;
            let valid_moves: Vec<PositionWithSides> =
                self.board.free_locations_for_tile(tile_id.tile()).collect();
            if !valid_moves.is_empty() {
                return Some((tile_id, valid_moves));
            }
            debug!(tile = %tile_id, "Discarding tile that fits nowhere");
            summary.tiles_discarded += 1;
        }
    }
}

fn check_offered(
    valid_moves: &[PositionWithSides],
    placement: Placement,
) -> Result<(), IllegalMove> {
    let Placement {
        row,
        col,
        orientation,
    } = placement;
    let offered = valid_moves
        .iter()
        .find(|mv| (mv.row, mv.col) == (row, col))
        .ok_or(IllegalMove::PositionNotOffered { row, col })?;
    if !offered.sides.contains(orientation) {
        return Err(IllegalMove::OrientationNotOffered {
            row,
            col,
            orientation,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use obidos::{Side, SideSet, Tile, DRAW_PILE_SIZE};
    use rand::SeedableRng;

    use super::*;
    use crate::RandomPlayer;

    fn random_players(seeds: &[u64]) -> Vec<Box<dyn Player>> {
        seeds
            .iter()
            .enumerate()
            .map(|(idx, &seed)| {
                Box::new(RandomPlayer::new(format!("Random {}", idx + 1), seed)) as Box<dyn Player>
            })
            .collect()
    }

    fn play_seeded(seed: u64) -> (GameSummary, Board) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new(random_players(&[seed, seed + 1]), &mut rng);
        match game.play().unwrap() {
            GameResult::Finished(summary) => (summary, game.board().clone()),
            GameResult::IllegalMoveByPlayer { err, .. } => panic!("Random player erred: {}", err),
        }
    }

    /// Always answers with the same placement.
    struct Stubborn(Placement);

    impl Player for Stubborn {
        fn name(&self) -> &str {
            "Stubborn"
        }

        fn make_move(
            &mut self,
            _board: &Board,
            _tile: &Tile,
            _valid_moves: &[PositionWithSides],
        ) -> anyhow::Result<Placement> {
            Ok(self.0)
        }
    }

    /// Delegates to a random player and records every notification.
    struct Observer {
        inner: RandomPlayer,
        seen: Rc<RefCell<Vec<(usize, i32, i32)>>>,
    }

    impl Player for Observer {
        fn name(&self) -> &str {
            self.inner.name()
        }

        fn make_move(
            &mut self,
            board: &Board,
            tile: &Tile,
            valid_moves: &[PositionWithSides],
        ) -> anyhow::Result<Placement> {
            self.inner.make_move(board, tile, valid_moves)
        }

        fn on_move(&mut self, mv: &MoveView<'_>) {
            // The notification shows the tile as it lies on the board
            let on_board = mv.board.get(mv.row, mv.col).unwrap();
            assert!(std::ptr::eq(on_board, mv.tile));
            self.seen.borrow_mut().push((mv.player_idx, mv.row, mv.col));
        }
    }

    #[test]
    fn random_game_uses_the_whole_pile() {
        for seed in 0..5 {
            let (summary, board) = play_seeded(seed);
            assert_eq!(summary.tiles_placed + summary.tiles_discarded, DRAW_PILE_SIZE);
            assert_eq!(summary.turns, summary.tiles_placed);
            assert_eq!(board.len(), summary.tiles_placed + 1);
            assert!(board
                .tiles()
                .all(|(row, col, tile)| board.get(row, col) == Some(tile)));
        }
    }

    #[test]
    fn same_seed_same_game() {
        let (summary_a, board_a) = play_seeded(42);
        let (summary_b, board_b) = play_seeded(42);
        assert_eq!(summary_a, summary_b);
        assert!(board_a.tiles().eq(board_b.tiles()));
    }

    #[test]
    fn board_starts_with_the_starting_tile() {
        let mut rng = StdRng::seed_from_u64(0);
        let game = Game::new(random_players(&[0]), &mut rng);
        assert_eq!(game.tiles_left(), DRAW_PILE_SIZE);
        assert_eq!(game.board().len(), 1);
        assert!(game.board().get(0, 0).unwrap().tile().ptr_eq(STARTING_TILE.tile()));
    }

    #[test]
    fn unoffered_position_is_illegal() {
        let mut rng = StdRng::seed_from_u64(7);
        let stubborn = Placement {
            row: 5,
            col: 5,
            orientation: Side::North,
        };
        let mut game = Game::new(vec![Box::new(Stubborn(stubborn))], &mut rng);
        match game.play().unwrap() {
            GameResult::IllegalMoveByPlayer {
                player_idx: 0,
                err: IllegalMove::PositionNotOffered { row: 5, col: 5 },
            } => {}
            _ => panic!("Expected an illegal move"),
        }
        assert_eq!(game.board().len(), 1);
    }

    #[test]
    fn unoffered_orientation_is_illegal() {
        let valid_moves = [PositionWithSides {
            row: 0,
            col: 1,
            sides: SideSet::new().insert(Side::East),
        }];
        let placement = Placement {
            row: 0,
            col: 1,
            orientation: Side::North,
        };
        assert!(matches!(
            check_offered(&valid_moves, placement),
            Err(IllegalMove::OrientationNotOffered { row: 0, col: 1, .. })
        ));
        let placement = Placement {
            orientation: Side::East,
            ..placement
        };
        assert!(check_offered(&valid_moves, placement).is_ok());
    }

    #[test]
    fn players_are_notified_of_every_move() {
        let mut rng = StdRng::seed_from_u64(3);
        let seen = [Rc::default(), Rc::default()];
        let players: Vec<Box<dyn Player>> = seen
            .iter()
            .enumerate()
            .map(|(idx, seen)| {
                Box::new(Observer {
                    inner: RandomPlayer::new(format!("Observer {}", idx + 1), idx as u64),
                    seen: Rc::clone(seen),
                }) as Box<dyn Player>
            })
            .collect();
        let mut game = Game::new(players, &mut rng);
        let GameResult::Finished(summary) = game.play().unwrap() else {
            panic!("Random player made an illegal move");
        };

        let [first, second] = seen.map(|seen| seen.take());
        assert_eq!(first, second);
        assert_eq!(first.len(), summary.tiles_placed);
        // Turns alternate between the players
        assert!(first
            .iter()
            .enumerate()
            .all(|(turn, &(player_idx, _, _))| player_idx == turn % 2));
        assert!(first
            .iter()
            .all(|&(_, row, col)| game.board().get(row, col).is_some()));
    }

    #[test]
    fn no_players_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Game::new(Vec::new(), &mut rng).play().is_err());
    }
}
