//! A player which makes purely random moves

use board::{Board, Square};
use mailbox::GameState;

use rand::{rngs::SmallRng, seq::IteratorRandom, SeedableRng};

/// A player which makes purely random moves
///
/// Named for the chess slang for a hopelessly weak player.
#[derive(Debug)]
pub struct Woodpusher {
    /// The state of the board
    board: GameState,
    /// How we decide what to do
    rng: SmallRng,
}

impl Woodpusher {
    /// Create a new player with the initial board state.
    pub fn new() -> Self {
        Self {
            board: GameState::new_game(),
            rng: SmallRng::from_entropy(),
        }
    }
}

impl players::Player for Woodpusher {
    fn position(&mut self, moves: &[(Square, Square)]) {
        self.board = GameState::from_move_sequence(moves.iter().copied())
            .expect("Failed to make move");
    }

    fn react_to_move(&mut self, opponent_move: (Square, Square)) {
        self.board
            .try_move(opponent_move.0, opponent_move.1)
            .expect("Failed to make move");
    }

    fn make_move(&mut self) -> Option<(Square, Square)> {
        let mv = self
            .board
            .legal_moves()
            .into_iter()
            .choose(&mut self.rng)?;
        self.board.make_move(mv);
        Some((mv.from, mv.to))
    }
}

impl Default for Woodpusher {
    fn default() -> Self {
        Self::new()
    }
}
