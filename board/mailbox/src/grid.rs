use core::fmt;

use board::{Color, Piece, PieceKind, Square};

/// The 8x8 grid of squares, each empty or holding one piece
///
/// This is a plain data container: row 0 is Black's back rank, and an empty
/// square is an explicit `None` rather than a sentinel value. All rule
/// knowledge lives in the move generator and [`crate::GameState`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Grid([[Option<Piece>; 8]; 8]);

impl Grid {
    /// A grid with no pieces on it
    pub const EMPTY: Self = Self([[None; 8]; 8]);

    /// The standard chess starting position
    pub const INITIAL: Self = {
        const fn piece(color: Color, kind: PieceKind) -> Option<Piece> {
            Some(Piece { kind, color })
        }
        const fn back_row(color: Color) -> [Option<Piece>; 8] {
            [
                piece(color, PieceKind::Rook),
                piece(color, PieceKind::Knight),
                piece(color, PieceKind::Bishop),
                piece(color, PieceKind::Queen),
                piece(color, PieceKind::King),
                piece(color, PieceKind::Bishop),
                piece(color, PieceKind::Knight),
                piece(color, PieceKind::Rook),
            ]
        }
        const fn pawn_row(color: Color) -> [Option<Piece>; 8] {
            [piece(color, PieceKind::Pawn); 8]
        }
        Self([
            back_row(Color::Black),
            pawn_row(Color::Black),
            [None; 8],
            [None; 8],
            [None; 8],
            [None; 8],
            pawn_row(Color::White),
            back_row(Color::White),
        ])
    };

    /// Find the piece, if any, at the given square
    ///
    /// Returns `None` for an empty square and for an invalid square.
    pub const fn get(&self, square: Square) -> Option<Piece> {
        match square.to_row_col() {
            Some((row, col)) => self.0[row as usize][col as usize],
            None => None,
        }
    }

    /// Put `piece` on the given square, replacing whatever was there
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        let (row, col) = square
            .to_row_col()
            .expect("tried to write to an invalid square");
        self.0[row as usize][col as usize] = piece;
    }

    /// Whether the given square is on the board and has no piece on it
    pub const fn is_empty_square(&self, square: Square) -> bool {
        square.is_valid() && self.get(square).is_none()
    }

    /// Iterate over every occupied square and the piece on it, row by row
    /// from Black's back rank
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all_squares().filter_map(|square| Some((square, self.get(square)?)))
    }

    /// Find the square the given color's king stands on
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|&(_, piece)| piece.kind == PieceKind::King && piece.color == color)
            .map(|(square, _)| square)
    }

    /// Build a grid from eight row strings, row 0 (Black's back rank) first
    ///
    /// Each string is eight characters: a piece letter as in
    /// [`Piece::from_letter`], or `'.'` for an empty square. This is the
    /// position-setup hook used by tests and analysis tooling.
    ///
    /// # Panics
    /// Panics if a row is not eight characters or a character is not a piece
    /// letter or `'.'`.
    ///
    /// ```
    /// use mailbox::Grid;
    ///
    /// let initial = Grid::from_rows([
    ///     "rnbqkbnr",
    ///     "pppppppp",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "PPPPPPPP",
    ///     "RNBQKBNR",
    /// ]);
    /// assert_eq!(initial, Grid::INITIAL);
    /// ```
    pub fn from_rows(rows: [&str; 8]) -> Self {
        let mut grid = Self::EMPTY;
        for (row_idx, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), 8, "board row must be eight characters");
            for (col_idx, c) in row.chars().enumerate() {
                if c == '.' {
                    continue;
                }
                let piece = Piece::from_letter(c).expect("invalid piece letter");
                grid.0[row_idx][col_idx] = Some(piece);
            }
        }
        grid
    }
}

/// Display as a TUI grid of piece letters, `.` for empty squares
///
/// ```
/// use mailbox::Grid;
///
/// assert_eq!(
///     Grid::INITIAL.to_string(),
///     "rnbqkbnr\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nRNBQKBNR\n",
/// );
/// ```
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for row in &self.0 {
            for square in row {
                f.write_char(match square {
                    Some(piece) => piece.letter(),
                    None => '.',
                })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid(\n{self})")
    }
}
