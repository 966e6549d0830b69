use core::fmt;

use board::{Piece, Square};

use crate::Grid;

/// One ply, resolved against the board it was constructed from
///
/// A move records the piece it displaces and the piece it captures so it can
/// be taken back without any other context. Two moves are equal exactly when
/// all four fields match; since the piece fields are functions of the board
/// at construction time, that is the same as the origin and destination
/// matching.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece_moved: Piece,
    pub piece_captured: Option<Piece>,
}

impl Move {
    /// Resolve a move against the current board contents
    ///
    /// # Panics
    /// Panics if `from` is empty; the input layer is responsible for only
    /// constructing moves from occupied origin squares.
    pub fn new(from: Square, to: Square, grid: &Grid) -> Self {
        let piece_moved = grid.get(from).expect("no piece on the origin square");
        Self {
            from,
            to,
            piece_moved,
            piece_captured: grid.get(to),
        }
    }

    /// A single integer identifying this move's origin and destination
    ///
    /// Useful as a hash key or for fast equality against a previously stored
    /// move; distinct (origin, destination) pairs get distinct ids.
    pub const fn id(self) -> u16 {
        (self.from.0 as u16) << 8 | self.to.0 as u16
    }

    /// Whether this move takes an enemy piece
    pub const fn is_capture(self) -> bool {
        self.piece_captured.is_some()
    }
}

/// Long coordinate notation: origin square then destination square
///
/// ```
/// use board::Square;
/// use mailbox::{Grid, Move};
///
/// // The double pawn push in front of the White king
/// let mv = Move::new(Square::E2, Square::E4, &Grid::INITIAL);
/// assert_eq!(mv.to_string(), "e2e4");
/// ```
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Move")
            .field("notated", &format_args!("{self}"))
            .field("piece_moved", &self.piece_moved)
            .field("piece_captured", &self.piece_captured)
            .finish()
    }
}
