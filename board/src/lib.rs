use core::{fmt, str::FromStr};
use std::error;

/// The types of pieces there are
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// The capitalized letter conventionally used for this piece
    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Whether this piece moves along rays that other pieces can block
    pub const fn is_slider(self) -> bool {
        match self {
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => true,
            PieceKind::Pawn | PieceKind::Knight | PieceKind::King => false,
        }
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The row this color's pawns start on
    pub const fn pawn_home_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// The direction this color's pawns advance in, as a row delta
    ///
    /// Row 0 is Black's back rank, so White pawns move toward smaller rows.
    pub const fn pawn_advance(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

/// A piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}
impl Piece {
    /// The letter for this piece: uppercase for White, lowercase for Black
    pub const fn letter(self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }

    /// Parse a piece from its letter, the inverse of [`Self::letter`]
    pub const fn from_letter(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        Some(Self { kind, color })
    }
}

/// Where a game stands after the last call to legal move generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// The side to move has at least one legal move
    InProgress,
    /// The side to move is in check with no legal moves
    Checkmate {
        /// The side that delivered the mate
        winner: Color,
    },
    /// The side to move is not in check but has no legal moves
    Stalemate,
}

/// Functionality belonging to all boards that can be made
///
/// The move type is left to the implementation because a move records what it
/// captured, and only the representation knows how to look that up.
pub trait Board: Sized {
    /// The resolved move type produced by [`Self::legal_moves`]
    type Move: Copy + fmt::Debug;

    /// An error type that can be returned
    type Err: fmt::Debug;

    /// Get the state at the start of a chess game
    fn initial_state() -> Self;

    /// Compute every legal move for the side to move
    ///
    /// This is the one entry point a caller uses each turn; it also refreshes
    /// whatever check and terminal bookkeeping the implementation caches.
    fn legal_moves(&mut self) -> Vec<Self::Move>;

    /// Make the given move, in place, without checking legality
    ///
    /// The move must come from the most recent [`Self::legal_moves`] result
    /// (or be structurally valid for test setup); a stale move corrupts the
    /// board.
    fn make_move(&mut self, mv: Self::Move);

    /// Take back the last move made, restoring the prior position exactly
    ///
    /// Returns the move taken back, or `None` if no moves have been made.
    fn undo_move(&mut self) -> Option<Self::Move>;

    /// Make the move from `from` to `to` if it is legal right now
    fn try_move(&mut self, from: Square, to: Square) -> Result<Self::Move, Self::Err>;

    /// Recompute legal moves and report how the game stands
    fn outcome(&mut self) -> GameStatus;

    /// Make the board after the given sequence of origin/destination pairs
    fn from_move_sequence(
        moves: impl IntoIterator<Item = (Square, Square)>,
    ) -> Result<Self, Self::Err> {
        let mut state = Self::initial_state();
        for (from, to) in moves {
            state.try_move(from, to)?;
        }
        Ok(state)
    }
}

/// An index on the board
///
/// Stored in 0x88 method:
/// ```text
/// 0b12345678
///        +-+ Column
///    +-+ Row
///   +   + Must be zero, invalid position if 1
/// ```
///
/// Row 0 is Black's back rank (the side furthest from White), row 7 is
/// White's, so the square named "e2" has row 6. Each square fits in one byte,
/// and this format makes offset arithmetic and bounds checking cheap.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(pub u8);
impl Square {
    /// An invalid square
    ///
    /// Please use this instead of making your own so it's obvious if a
    /// deliberately-invalid square appeared.
    pub const INVALID: Self = Self(0xee);

    pub const A1: Self = Self(0x70);
    pub const B1: Self = Self(0x71);
    pub const C1: Self = Self(0x72);
    pub const D1: Self = Self(0x73);
    pub const E1: Self = Self(0x74);
    pub const F1: Self = Self(0x75);
    pub const G1: Self = Self(0x76);
    pub const H1: Self = Self(0x77);
    pub const A2: Self = Self(0x60);
    pub const B2: Self = Self(0x61);
    pub const C2: Self = Self(0x62);
    pub const D2: Self = Self(0x63);
    pub const E2: Self = Self(0x64);
    pub const F2: Self = Self(0x65);
    pub const G2: Self = Self(0x66);
    pub const H2: Self = Self(0x67);
    pub const A3: Self = Self(0x50);
    pub const B3: Self = Self(0x51);
    pub const C3: Self = Self(0x52);
    pub const D3: Self = Self(0x53);
    pub const E3: Self = Self(0x54);
    pub const F3: Self = Self(0x55);
    pub const G3: Self = Self(0x56);
    pub const H3: Self = Self(0x57);
    pub const A4: Self = Self(0x40);
    pub const B4: Self = Self(0x41);
    pub const C4: Self = Self(0x42);
    pub const D4: Self = Self(0x43);
    pub const E4: Self = Self(0x44);
    pub const F4: Self = Self(0x45);
    pub const G4: Self = Self(0x46);
    pub const H4: Self = Self(0x47);
    pub const A5: Self = Self(0x30);
    pub const B5: Self = Self(0x31);
    pub const C5: Self = Self(0x32);
    pub const D5: Self = Self(0x33);
    pub const E5: Self = Self(0x34);
    pub const F5: Self = Self(0x35);
    pub const G5: Self = Self(0x36);
    pub const H5: Self = Self(0x37);
    pub const A6: Self = Self(0x20);
    pub const B6: Self = Self(0x21);
    pub const C6: Self = Self(0x22);
    pub const D6: Self = Self(0x23);
    pub const E6: Self = Self(0x24);
    pub const F6: Self = Self(0x25);
    pub const G6: Self = Self(0x26);
    pub const H6: Self = Self(0x27);
    pub const A7: Self = Self(0x10);
    pub const B7: Self = Self(0x11);
    pub const C7: Self = Self(0x12);
    pub const D7: Self = Self(0x13);
    pub const E7: Self = Self(0x14);
    pub const F7: Self = Self(0x15);
    pub const G7: Self = Self(0x16);
    pub const H7: Self = Self(0x17);
    pub const A8: Self = Self(0x00);
    pub const B8: Self = Self(0x01);
    pub const C8: Self = Self(0x02);
    pub const D8: Self = Self(0x03);
    pub const E8: Self = Self(0x04);
    pub const F8: Self = Self(0x05);
    pub const G8: Self = Self(0x06);
    pub const H8: Self = Self(0x07);

    /// Returns if this square is valid
    ///
    /// ```
    /// # use board::Square;
    /// assert!(!Square::INVALID.is_valid());
    /// assert!(Square::E4.is_valid());
    /// ```
    pub const fn is_valid(self) -> bool {
        self.0 & 0x88 == 0
    }

    /// Produce a square from the row and column, returning [`Self::INVALID`]
    /// if the pair is not on the board.
    pub const fn from_row_col(row: u8, col: u8) -> Self {
        if row < 8 && col < 8 {
            Self(row << 4 | col)
        } else {
            Self::INVALID
        }
    }

    /// Returns the `(row, col)` tuple if this position is valid
    pub const fn to_row_col(self) -> Option<(u8, u8)> {
        if self.is_valid() {
            Some((self.0 >> 4, self.0 & 0x07))
        } else {
            None
        }
    }

    /// Converts self to its file-rank name, if legal
    pub const fn as_str_legal(self) -> Option<&'static str> {
        /// Names indexed by `row * 8 + col`, row 0 being rank 8
        const NAMES: [&str; 64] = [
            "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8", //
            "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7", //
            "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6", //
            "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5", //
            "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4", //
            "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3", //
            "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2", //
            "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1", //
        ];
        match self.to_row_col() {
            Some((row, col)) => Some(NAMES[(row * 8 + col) as usize]),
            None => None,
        }
    }

    /// Converts self to the name for this position, or `"XX"` if illegal
    pub const fn as_str(self) -> &'static str {
        match self.as_str_legal() {
            Some(s) => s,
            None => "XX",
        }
    }

    /// Offset the given number of rows and columns.
    ///
    /// Positive row moves toward White's side of the board, positive column
    /// moves from the a-file toward the h-file.
    ///
    /// ```rust
    /// use board::Square;
    /// assert_eq!(Square::E4, Square::E2.offset(-2, 0));
    /// assert_eq!(Square::E2, Square::E4.offset(2, 0));
    /// assert_eq!(Square::F7, Square::F7.offset(0, 0));
    /// assert!(!Square::D1.offset(1, 0).is_valid());
    /// assert!(!Square::D8.offset(-1, 0).is_valid());
    /// assert!(!Square::A4.offset(0, -1).is_valid());
    /// assert!(!Square::H4.offset(0, 1).is_valid());
    /// ```
    pub const fn offset(self, rows: i8, cols: i8) -> Self {
        SquareOffset::from_rows_cols(rows, cols).offset(self)
    }

    /// An iterator over all valid squares on the board, row by row from
    /// Black's back rank
    ///
    /// ```
    /// assert_eq!(board::Square::all_squares().count(), 64);
    /// ```
    pub fn all_squares() -> impl Iterator<Item = Self> {
        (0..64).map(|idx| {
            let col = idx & 0x07;
            let row = (idx >> 3) & 0x07;
            Self(col | (row << 4))
        })
    }
}
impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Square")
            .field("repr", &format_args!("{:X}", self.0))
            .field("readable", &self.as_str_legal().unwrap_or("illegal"))
            .finish()
    }
}
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
#[derive(Debug)]
pub struct SquareFromStrErr;
impl fmt::Display for SquareFromStrErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("board position string was invalid")
    }
}
impl error::Error for SquareFromStrErr {}
impl FromStr for Square {
    type Err = SquareFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.as_bytes();
        if s.len() != 2 {
            return Err(SquareFromStrErr);
        }
        let col = match s[0] {
            c @ b'a'..=b'h' => c - b'a',
            _ => return Err(SquareFromStrErr),
        };
        // Rank 8 is row 0
        let row = match s[1] {
            c @ b'1'..=b'8' => b'8' - c,
            _ => return Err(SquareFromStrErr),
        };
        Ok(Self(row << 4 | col))
    }
}

/// An offset on a board
///
/// This struct stores any possible offset in both row and column between any
/// two squares, using only one byte of space.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SquareOffset(u8);
impl SquareOffset {
    /// The zero offset
    ///
    /// Used as the recorded direction of a knight check, which has no ray.
    pub const NONE: Self = Self::from_rows_cols(0, 0);

    /// The offsets corresponding to all possible knight moves
    pub const KNIGHT_JUMPS: [SquareOffset; 8] = [
        Self::from_rows_cols(2, 1),
        Self::from_rows_cols(2, -1),
        Self::from_rows_cols(-2, 1),
        Self::from_rows_cols(-2, -1),
        Self::from_rows_cols(1, 2),
        Self::from_rows_cols(1, -2),
        Self::from_rows_cols(-1, 2),
        Self::from_rows_cols(-1, -2),
    ];

    /// The offsets corresponding to all possible king moves
    pub const KING_STEPS: [SquareOffset; 8] = [
        Self::from_rows_cols(1, 1),
        Self::from_rows_cols(1, 0),
        Self::from_rows_cols(1, -1),
        Self::from_rows_cols(0, 1),
        Self::from_rows_cols(0, -1),
        Self::from_rows_cols(-1, 1),
        Self::from_rows_cols(-1, 0),
        Self::from_rows_cols(-1, -1),
    ];

    /// The four rook directions
    pub const ORTHOGONALS: [SquareOffset; 4] = [
        Self::from_rows_cols(1, 0),
        Self::from_rows_cols(-1, 0),
        Self::from_rows_cols(0, 1),
        Self::from_rows_cols(0, -1),
    ];

    /// The four bishop directions
    pub const DIAGONALS: [SquareOffset; 4] = [
        Self::from_rows_cols(1, 1),
        Self::from_rows_cols(1, -1),
        Self::from_rows_cols(-1, 1),
        Self::from_rows_cols(-1, -1),
    ];

    /// The offsets by which a pawn of the given color attacks
    pub const fn pawn_attacks(color: Color) -> [SquareOffset; 2] {
        let advance = color.pawn_advance();
        [
            Self::from_rows_cols(advance, 1),
            Self::from_rows_cols(advance, -1),
        ]
    }

    /// Produce a new offset from the given row and column amounts
    ///
    /// In debug mode, we assert that the row and column are both on the
    /// interval [-7,7] (which are the only possible offsets). In release
    /// mode, we wrap modulo 16 and allow for -8, which invalidates any
    /// square.
    pub const fn from_rows_cols(rows: i8, cols: i8) -> Self {
        debug_assert!(-8 < rows && rows < 8);
        debug_assert!(-8 < cols && cols < 8);
        Self(((rows as u8) << 4) & 0xF0 | (cols as u8) & 0x0F)
    }

    /// Offset the given square
    ///
    /// If the square is already invalid, then the same square is returned
    /// unchanged.
    pub const fn offset(self, square: Square) -> Square {
        if square.is_valid() {
            Square(((self.0 & 0x77) + square.0) ^ (self.0 & 0x88))
        } else {
            square
        }
    }

    /// Gets the signed number of rows associated with this offset
    pub const fn rows(self) -> i8 {
        (self.0 as i8) >> 4
    }

    /// Gets the signed number of columns associated with this offset
    pub const fn cols(self) -> i8 {
        (self.0 as i8) << 4 >> 4
    }

    /// Whether this offset moves in both a row and a column direction
    pub const fn is_diagonal(self) -> bool {
        self.rows() != 0 && self.cols() != 0
    }
}
impl fmt::Debug for SquareOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SquareOffset")
            .field("rows", &self.rows())
            .field("cols", &self.cols())
            .finish()
    }
}
