//! Traits for an arbitrary player

use board::Square;

/// A player in a game
///
/// This trait is generic over how the player decides what to do, so GUI and AI players can both
/// implement this. Moves cross the trait boundary as plain origin and destination squares; each
/// player resolves them against its own copy of the game.
pub trait Player {
    /// Reset this player to the position reached by playing `moves` from the starting position
    fn position(&mut self, moves: &[(Square, Square)]);

    /// Decide on a move to make
    ///
    /// This function should both return the move and update `self` to reflect the move being
    /// made. Returns `None` when the player has no legal move, which ends the game.
    fn make_move(&mut self) -> Option<(Square, Square)>;

    /// React to the opponent making the given move
    fn react_to_move(&mut self, opponent_move: (Square, Square));
}
