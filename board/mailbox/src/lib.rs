//! A mailbox chess rules engine
//!
//! [`GameState`] owns an 8x8 [`Grid`] of squares plus the move log and
//! per-turn attack bookkeeping. Legality is decided without trying moves
//! out: one ray-casting pass from the king per turn finds every pin and
//! check, and [`GameState::legal_moves`] filters the pseudo-legal move set
//! against that geometry.

use board::{Board, Color, GameStatus, PieceKind, Square, SquareOffset};

mod attacks;
mod chess_move;
mod grid;
mod pseudo;

pub use crate::attacks::{Check, Pin};
pub use crate::chess_move::Move;
pub use crate::grid::Grid;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("no piece on {0}")]
    NoPieceAtSource(Square),
    #[error("the piece on {0} does not belong to the side to move")]
    NotSideToMove(Square),
    #[error("{from}{to} is not legal in the current position")]
    IllegalMove { from: Square, to: Square },
    #[error("{0:?} must have exactly one king")]
    BadKingCount(Color),
}

/// The authoritative state of one chess game
///
/// All mutation goes through [`Self::make_move`] and [`Self::undo_move`];
/// the cached check, pin, and terminal fields are refreshed only by
/// [`Self::legal_moves`] and are stale between a mutation and the next call
/// to it. One instance belongs to one logical thread of execution; parallel
/// exploration should clone the state instead of sharing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    grid: Grid,
    side_to_move: Color,
    move_log: Vec<Move>,
    white_king: Square,
    black_king: Square,
    in_check: bool,
    pins: Vec<Pin>,
    checks: Vec<Check>,
    checkmate: bool,
    stalemate: bool,
}

impl GameState {
    /// The state at the start of a chess game
    pub const INITIAL_STATE: Self = Self {
        grid: Grid::INITIAL,
        side_to_move: Color::White,
        move_log: Vec::new(),
        white_king: Square::E1,
        black_king: Square::E8,
        in_check: false,
        pins: Vec::new(),
        checks: Vec::new(),
        checkmate: false,
        stalemate: false,
    };

    /// Start a fresh game from the standard position, White to move
    pub fn new_game() -> Self {
        Self::INITIAL_STATE
    }

    /// Build a game from an arbitrary position
    ///
    /// This is the setup hook for tests and analysis tooling. Each side must
    /// have exactly one king. The cached check and terminal fields start
    /// blank; call [`Self::legal_moves`] to populate them.
    pub fn with_position(grid: Grid, side_to_move: Color) -> Result<Self> {
        let mut kings = [Square::INVALID; 2];
        for color in [Color::White, Color::Black] {
            let count = grid
                .pieces()
                .filter(|&(_, piece)| piece.kind == PieceKind::King && piece.color == color)
                .count();
            if count != 1 {
                return Err(Error::BadKingCount(color));
            }
            kings[color as usize] = grid.king_square(color).unwrap_or(Square::INVALID);
        }
        Ok(Self {
            grid,
            side_to_move,
            move_log: Vec::new(),
            white_king: kings[Color::White as usize],
            black_king: kings[Color::Black as usize],
            in_check: false,
            pins: Vec::new(),
            checks: Vec::new(),
            checkmate: false,
            stalemate: false,
        })
    }

    /// The current board contents
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Whose turn it is
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Every move made so far, oldest first
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    /// The square the given color's king stands on
    pub const fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    /// Whether the side to move was in check at the last legal-move
    /// computation
    pub const fn in_check(&self) -> bool {
        self.in_check
    }

    /// The checks found by the last legal-move computation
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// The pins found by the last legal-move computation
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// How the game stood at the last legal-move computation
    pub const fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate {
                winner: self.side_to_move.other(),
            }
        } else if self.stalemate {
            GameStatus::Stalemate
        } else {
            GameStatus::InProgress
        }
    }

    /// Make the given move, in place, without checking legality
    ///
    /// The move must have been produced against the current board, normally
    /// by the most recent [`Self::legal_moves`] call; a stale move corrupts
    /// the board. See [`Self::try_move`] for the checked entry point.
    pub fn make_move(&mut self, mv: Move) {
        self.grid.set(mv.from, None);
        self.grid.set(mv.to, Some(mv.piece_moved));
        self.move_log.push(mv);
        self.side_to_move = self.side_to_move.other();
        if mv.piece_moved.kind == PieceKind::King {
            match mv.piece_moved.color {
                Color::White => self.white_king = mv.to,
                Color::Black => self.black_king = mv.to,
            }
        }
    }

    /// Take back the last move made, restoring the prior position exactly
    ///
    /// Returns the move taken back; with an empty log this is a no-op
    /// returning `None`.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.move_log.pop()?;
        self.grid.set(mv.from, Some(mv.piece_moved));
        self.grid.set(mv.to, mv.piece_captured);
        self.side_to_move = self.side_to_move.other();
        if mv.piece_moved.kind == PieceKind::King {
            match mv.piece_moved.color {
                Color::White => self.white_king = mv.from,
                Color::Black => self.black_king = mv.from,
            }
        }
        Some(mv)
    }

    /// Make the move from `from` to `to` if it is legal right now
    ///
    /// Looks the pair up in the current legal move set and applies it,
    /// returning the resolved move. The error says why the request was
    /// rejected.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<Move> {
        let legal = self.legal_moves();
        match legal.into_iter().find(|mv| mv.from == from && mv.to == to) {
            Some(mv) => {
                self.make_move(mv);
                Ok(mv)
            }
            None => match self.grid.get(from) {
                None => Err(Error::NoPieceAtSource(from)),
                Some(piece) if piece.color != self.side_to_move => {
                    Err(Error::NotSideToMove(from))
                }
                Some(_) => Err(Error::IllegalMove { from, to }),
            },
        }
    }

    /// Compute every legal move for the side to move
    ///
    /// Also refreshes the cached check, pin, and terminal fields. An empty
    /// result means checkmate if the king is in check and stalemate if not.
    ///
    /// The filter works from the attack geometry instead of trying each move
    /// out: under double check only king moves survive; under single check a
    /// non-king move must capture the checker or land between it and the
    /// king; and a pinned piece never leaves its pin line, even while a
    /// check is being resolved. King moves are probed with the origin square
    /// vacated so a king cannot retreat along the ray that checks it.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let color = self.side_to_move;
        let king = self.king_square(color);
        let report = attacks::pins_and_checks(&self.grid, king, color);
        self.in_check = report.in_check;
        self.pins = report.pins;
        self.checks = report.checks;

        let pseudo = pseudo::pseudo_legal(&self.grid, color);
        let mut legal = Vec::with_capacity(pseudo.len());
        match self.checks.len() {
            0 => {
                for mv in pseudo {
                    if mv.piece_moved.kind == PieceKind::King {
                        if attacks::king_safe_on(&self.grid, color, mv.from, mv.to) {
                            legal.push(mv);
                        }
                    } else if match self.pin_on(mv.from) {
                        Some(pin) => on_ray(king, pin.direction, mv.to),
                        None => true,
                    } {
                        legal.push(mv);
                    }
                }
            }
            1 => {
                let check = self.checks[0];
                // A non-king move must land on the checker or, for a slider
                // check, between the checker and the king. Knight and pawn
                // checks have no squares in between.
                let mut targets = Vec::with_capacity(8);
                let slider = self
                    .grid
                    .get(check.square)
                    .map_or(false, |piece| piece.kind.is_slider());
                if slider {
                    let mut square = check.direction.offset(king);
                    while square != check.square {
                        targets.push(square);
                        square = check.direction.offset(square);
                    }
                }
                targets.push(check.square);
                for mv in pseudo {
                    if mv.piece_moved.kind == PieceKind::King {
                        if attacks::king_safe_on(&self.grid, color, mv.from, mv.to) {
                            legal.push(mv);
                        }
                    } else if self.pin_on(mv.from).is_none() && targets.contains(&mv.to) {
                        legal.push(mv);
                    }
                }
            }
            // Two attackers cannot both be answered; only the king may move
            _ => {
                for mv in pseudo {
                    if mv.piece_moved.kind == PieceKind::King
                        && attacks::king_safe_on(&self.grid, color, mv.from, mv.to)
                    {
                        legal.push(mv);
                    }
                }
            }
        }

        self.checkmate = legal.is_empty() && self.in_check;
        self.stalemate = legal.is_empty() && !self.in_check;
        legal
    }

    fn pin_on(&self, square: Square) -> Option<Pin> {
        self.pins.iter().copied().find(|pin| pin.square == square)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

impl Board for GameState {
    type Move = Move;
    type Err = Error;

    fn initial_state() -> Self {
        Self::INITIAL_STATE
    }

    fn legal_moves(&mut self) -> Vec<Move> {
        GameState::legal_moves(self)
    }

    fn make_move(&mut self, mv: Move) {
        GameState::make_move(self, mv);
    }

    fn undo_move(&mut self) -> Option<Move> {
        GameState::undo_move(self)
    }

    fn try_move(&mut self, from: Square, to: Square) -> Result<Move> {
        GameState::try_move(self, from, to)
    }

    fn outcome(&mut self) -> GameStatus {
        self.legal_moves();
        self.status()
    }
}

/// Whether `to` lies on the ray cast from `king` in `direction`
fn on_ray(king: Square, direction: SquareOffset, to: Square) -> bool {
    let mut square = direction.offset(king);
    while square.is_valid() {
        if square == to {
            return true;
        }
        square = direction.offset(square);
    }
    false
}

/// Count the leaf nodes of the legal move tree to the given depth
///
/// The standard movegen shakedown: any mistake in generation, filtering, or
/// make/undo shows up as a wrong count within a few plies.
pub fn perft(state: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for mv in state.legal_moves() {
        state.make_move(mv);
        nodes += perft(state, depth - 1);
        state.undo_move();
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck::quickcheck;

    fn position(rows: [&str; 8], side_to_move: Color) -> GameState {
        GameState::with_position(Grid::from_rows(rows), side_to_move).unwrap()
    }

    #[test]
    fn twenty_legal_moves_at_the_start() {
        let mut state = GameState::new_game();
        assert_eq!(state.legal_moves().len(), 20);
        assert!(!state.in_check());
        assert_eq!(state.status(), GameStatus::InProgress);
    }

    #[test]
    fn twenty_replies_to_the_kings_pawn() {
        let mut state = GameState::new_game();
        state.try_move(Square::E2, Square::E4).unwrap();
        assert_eq!(state.side_to_move(), Color::Black);
        assert_eq!(state.legal_moves().len(), 20);
    }

    #[test]
    fn make_then_undo_restores_everything() {
        let mut state = GameState::new_game();
        state.legal_moves();
        let before = state.clone();
        let mv = Move::new(Square::G1, Square::F3, state.grid());
        state.make_move(mv);
        assert_eq!(state.undo_move(), Some(mv));
        assert_eq!(state, before);
    }

    #[test]
    fn undo_with_empty_log_is_a_noop() {
        let mut state = GameState::new_game();
        let before = state.clone();
        assert_eq!(state.undo_move(), None);
        assert_eq!(state, before);
    }

    #[test]
    fn king_moves_track_the_king_square() {
        let mut state = GameState::new_game();
        for (from, to) in [
            (Square::E2, Square::E4),
            (Square::E7, Square::E5),
            (Square::E1, Square::E2),
        ] {
            state.try_move(from, to).unwrap();
        }
        assert_eq!(state.king_square(Color::White), Square::E2);
        state.undo_move();
        assert_eq!(state.king_square(Color::White), Square::E1);
    }

    #[test]
    fn move_log_reads_back_in_order() {
        let mut state = GameState::new_game();
        state.try_move(Square::E2, Square::E4).unwrap();
        state.try_move(Square::C7, Square::C5).unwrap();
        let log: Vec<String> = state.move_log().iter().map(Move::to_string).collect();
        assert_eq!(log, ["e2e4", "c7c5"]);
    }

    #[test]
    fn try_move_rejections() {
        let mut state = GameState::new_game();
        assert!(matches!(
            state.try_move(Square::E3, Square::E4),
            Err(Error::NoPieceAtSource(Square::E3)),
        ));
        assert!(matches!(
            state.try_move(Square::E7, Square::E5),
            Err(Error::NotSideToMove(Square::E7)),
        ));
        assert!(matches!(
            state.try_move(Square::E2, Square::E5),
            Err(Error::IllegalMove { .. }),
        ));
        // The board is untouched by the rejections
        assert_eq!(state.grid(), GameState::new_game().grid());
    }

    #[test]
    fn rook_on_an_open_rank_gives_check() {
        let mut state = position(
            [
                "R...k...", //
                "........", //
                "........", //
                "........", //
                "........", //
                "........", //
                "........", //
                ".......K", //
            ],
            Color::Black,
        );
        state.legal_moves();
        assert!(state.in_check());
        assert_eq!(
            state.checks(),
            [Check {
                square: Square::A8,
                direction: SquareOffset::from_rows_cols(0, -1),
            }],
        );
    }

    #[test]
    fn pinned_bishop_cannot_leave_its_file() {
        let mut state = position(
            [
                "k...r...", //
                "........", //
                "........", //
                "........", //
                "....B...", //
                "........", //
                "........", //
                "....K...", //
            ],
            Color::White,
        );
        let legal = state.legal_moves();
        assert_eq!(
            state.pins(),
            [Pin {
                square: Square::E4,
                direction: SquareOffset::from_rows_cols(-1, 0),
            }],
        );
        // A bishop has no move along a file, so the pin freezes it entirely
        assert!(legal.iter().all(|mv| mv.from != Square::E4));
        assert!(!legal.is_empty());
    }

    #[test]
    fn pinned_queen_may_slide_along_the_pin_line() {
        let mut state = position(
            [
                "k...r...", //
                "........", //
                "........", //
                "........", //
                "....Q...", //
                "........", //
                "........", //
                "....K...", //
            ],
            Color::White,
        );
        let legal = state.legal_moves();
        let mut queen_targets: Vec<Square> = legal
            .iter()
            .filter(|mv| mv.from == Square::E4)
            .map(|mv| mv.to)
            .collect();
        queen_targets.sort_by_key(|square| square.0);
        assert_eq!(
            queen_targets,
            [
                Square::E8,
                Square::E7,
                Square::E6,
                Square::E5,
                Square::E3,
                Square::E2,
            ],
        );
        // Capturing the pinner is among them
        assert!(legal
            .iter()
            .any(|mv| mv.from == Square::E4 && mv.to == Square::E8 && mv.is_capture()));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut state = GameState::new_game();
        for (from, to) in [
            (Square::F2, Square::F3),
            (Square::E7, Square::E5),
            (Square::G2, Square::G4),
            (Square::D8, Square::H4),
        ] {
            state.try_move(from, to).unwrap();
        }
        assert!(state.legal_moves().is_empty());
        assert!(state.in_check());
        assert_eq!(
            state.status(),
            GameStatus::Checkmate {
                winner: Color::Black,
            },
        );
    }

    #[test]
    fn cornered_king_with_no_moves_is_stalemate() {
        let mut state = position(
            [
                "k.......", //
                "..Q.....", //
                "........", //
                "........", //
                "........", //
                "........", //
                "........", //
                "....K...", //
            ],
            Color::Black,
        );
        assert!(state.legal_moves().is_empty());
        assert!(!state.in_check());
        assert_eq!(state.status(), GameStatus::Stalemate);
    }

    #[test]
    fn double_check_admits_only_king_moves() {
        let mut state = position(
            [
                "....k...", //
                "........", //
                "r....N..", //
                "........", //
                "....R...", //
                "........", //
                "........", //
                "K.......", //
            ],
            Color::Black,
        );
        let legal = state.legal_moves();
        assert_eq!(state.checks().len(), 2);
        assert!(!legal.is_empty());
        // The a6 rook could block the e-file check, but not both at once
        assert!(legal
            .iter()
            .all(|mv| mv.piece_moved.kind == PieceKind::King));
    }

    #[test]
    fn pinned_piece_may_not_block_a_check() {
        let mut state = position(
            [
                "R...k...", //
                "....q...", //
                "........", //
                "........", //
                "........", //
                "........", //
                "........", //
                "....R..K", //
            ],
            Color::Black,
        );
        let legal = state.legal_moves();
        assert_eq!(state.checks().len(), 1);
        assert_eq!(state.pins().len(), 1);
        // Qd8 would block the rank check but abandons the e-file pin
        let mut pairs: Vec<(Square, Square)> =
            legal.iter().map(|mv| (mv.from, mv.to)).collect();
        pairs.sort_by_key(|(from, to)| (from.0, to.0));
        assert_eq!(pairs, [(Square::E8, Square::D7), (Square::E8, Square::F7)]);
    }

    #[test]
    fn knight_check_can_only_be_captured_or_escaped() {
        let mut state = position(
            [
                "....kr..", //
                "........", //
                ".....N..", //
                "........", //
                "........", //
                "........", //
                "........", //
                "K.......", //
            ],
            Color::Black,
        );
        let legal = state.legal_moves();
        assert_eq!(
            state.checks(),
            [Check {
                square: Square::F6,
                direction: SquareOffset::NONE,
            }],
        );
        // The f8 rook cannot interpose against a knight, only capture it
        assert!(legal
            .iter()
            .all(|mv| mv.piece_moved.kind == PieceKind::King || mv.to == Square::F6));
        assert!(legal
            .iter()
            .any(|mv| mv.from == Square::F8 && mv.to == Square::F6 && mv.is_capture()));
    }

    #[test]
    fn pawn_check_cannot_be_blocked() {
        let mut state = position(
            [
                "...rk...", //
                "...P....", //
                "........", //
                "........", //
                "........", //
                "........", //
                "........", //
                "....K...", //
            ],
            Color::Black,
        );
        let legal = state.legal_moves();
        assert_eq!(state.checks().len(), 1);
        // Like a knight, a pawn checks from next to the king: nothing can
        // land between them
        assert!(legal
            .iter()
            .all(|mv| mv.piece_moved.kind == PieceKind::King || mv.to == Square::D7));
        assert!(legal
            .iter()
            .any(|mv| mv.from == Square::D8 && mv.to == Square::D7 && mv.is_capture()));
    }

    #[test]
    fn legal_move_computation_is_idempotent() {
        let mut state = GameState::new_game();
        state.try_move(Square::D2, Square::D4).unwrap();
        let first = state.legal_moves();
        let second = state.legal_moves();
        assert_eq!(first, second);
    }

    #[test]
    fn from_move_sequence_replays_a_game() {
        let mut replayed =
            GameState::from_move_sequence([(Square::E2, Square::E4), (Square::E7, Square::E5)])
                .unwrap();
        let mut stepped = GameState::new_game();
        stepped.try_move(Square::E2, Square::E4).unwrap();
        stepped.try_move(Square::E7, Square::E5).unwrap();
        assert_eq!(replayed.grid(), stepped.grid());
        assert_eq!(replayed.side_to_move(), Color::White);
        assert_eq!(replayed.legal_moves(), stepped.legal_moves());
    }

    #[test]
    fn from_move_sequence_stops_at_an_illegal_pair() {
        assert!(matches!(
            GameState::from_move_sequence([(Square::E2, Square::E5)]),
            Err(Error::IllegalMove { .. }),
        ));
    }

    #[test]
    fn with_position_requires_one_king_per_side() {
        let no_black_king = Grid::from_rows([
            "........", //
            "........", //
            "........", //
            "........", //
            "........", //
            "........", //
            "........", //
            "....K...", //
        ]);
        assert!(matches!(
            GameState::with_position(no_black_king, Color::White),
            Err(Error::BadKingCount(Color::Black)),
        ));
    }

    #[test]
    fn perft_matches_known_counts() {
        // Castling, en passant, and promotions first diverge at depth 5
        let mut state = GameState::new_game();
        assert_eq!(perft(&mut state, 1), 20);
        assert_eq!(perft(&mut state, 2), 400);
        assert_eq!(perft(&mut state, 3), 8_902);
        assert_eq!(perft(&mut state, 4), 197_281);
    }

    quickcheck! {
        /// Any random legal walk unwinds back to the starting state
        fn random_walk_round_trips(choices: Vec<u8>) -> bool {
            let mut state = GameState::new_game();
            let fresh = state.clone();
            let mut made = 0;
            for choice in choices {
                let moves = state.legal_moves();
                if moves.is_empty() {
                    break;
                }
                state.make_move(moves[choice as usize % moves.len()]);
                made += 1;
            }
            for _ in 0..made {
                state.undo_move();
            }
            // The attack caches are allowed to be stale here; the durable
            // state must match exactly
            state.grid() == fresh.grid()
                && state.side_to_move() == fresh.side_to_move()
                && state.king_square(Color::White) == fresh.king_square(Color::White)
                && state.king_square(Color::Black) == fresh.king_square(Color::Black)
                && state.move_log().is_empty()
        }

        /// The legal move set never exposes the mover's own king
        fn no_legal_move_leaves_king_attacked(choices: Vec<u8>) -> bool {
            let mut state = GameState::new_game();
            for choice in choices {
                let moves = state.legal_moves();
                if moves.is_empty() {
                    break;
                }
                let color = state.side_to_move();
                for mv in &moves {
                    state.make_move(*mv);
                    let king = state.king_square(color);
                    let report = attacks::pins_and_checks(state.grid(), king, color);
                    state.undo_move();
                    if report.in_check {
                        return false;
                    }
                }
                state.make_move(moves[choice as usize % moves.len()]);
            }
            true
        }
    }
}
