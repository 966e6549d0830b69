//! Ray-casting from the king to classify pins and checks
//!
//! Attack geometry is computed once per turn from the side-to-move's king:
//! each of the eight rays is walked outward and classified as clear, pinning
//! the first allied piece on it, or checking the king, and the knight squares
//! are scanned separately. The legal move filter in [`crate::GameState`] then
//! applies a constant-time test per candidate move instead of re-generating
//! the opponent's moves.

use board::{Color, PieceKind, Square, SquareOffset};

use crate::Grid;

/// An allied piece that cannot leave its line without exposing the king
///
/// `direction` is the ray direction from the king through the pinned piece
/// toward the attacker; every legal destination for the piece lies on that
/// ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    pub direction: SquareOffset,
}

/// An enemy piece currently attacking the king
///
/// `direction` is the ray direction from the king toward the attacker, or
/// [`SquareOffset::NONE`] for a knight check, which has no ray and can only
/// be answered by capturing the knight or moving the king.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Check {
    pub square: Square,
    pub direction: SquareOffset,
}

/// Everything the legal move filter needs to know about the king's safety
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttackReport {
    pub in_check: bool,
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}

/// Classify every ray from `king` and scan the knight squares
///
/// `color` is the side owning the king. The first allied piece on a ray is a
/// pin candidate; a second allied piece before any enemy piece kills the ray.
/// The first enemy piece either attacks along the ray (recording a check, or
/// a pin if a candidate was passed first) or blocks it for good.
pub(crate) fn pins_and_checks(grid: &Grid, king: Square, color: Color) -> AttackReport {
    let mut report = AttackReport::default();
    let rays = SquareOffset::ORTHOGONALS
        .into_iter()
        .chain(SquareOffset::DIAGONALS);
    for direction in rays {
        let mut candidate_pin: Option<Square> = None;
        let mut square = direction.offset(king);
        let mut step = 1u8;
        while square.is_valid() {
            match grid.get(square) {
                Some(piece) if piece.color == color => {
                    if candidate_pin.is_some() {
                        // Two allied pieces shield the king on this ray
                        break;
                    }
                    candidate_pin = Some(square);
                }
                Some(piece) => {
                    if attacks_along_ray(piece.kind, piece.color, direction, step) {
                        match candidate_pin {
                            None => {
                                report.in_check = true;
                                report.checks.push(Check { square, direction });
                            }
                            Some(pinned) => report.pins.push(Pin {
                                square: pinned,
                                direction,
                            }),
                        }
                    }
                    // The first enemy piece ends the ray either way
                    break;
                }
                None => {}
            }
            square = direction.offset(square);
            step += 1;
        }
    }
    for jump in SquareOffset::KNIGHT_JUMPS {
        let square = jump.offset(king);
        if let Some(piece) = grid.get(square) {
            if piece.color != color && piece.kind == PieceKind::Knight {
                report.in_check = true;
                report.checks.push(Check {
                    square,
                    direction: SquareOffset::NONE,
                });
            }
        }
    }
    report
}

/// Whether a piece of the given kind, `step` squares out on `direction` from
/// the king, attacks the king along that ray
fn attacks_along_ray(kind: PieceKind, color: Color, direction: SquareOffset, step: u8) -> bool {
    let diagonal = direction.is_diagonal();
    match kind {
        PieceKind::Rook => !diagonal,
        PieceKind::Bishop => diagonal,
        PieceKind::Queen => true,
        // Forbids the kings from standing next to each other
        PieceKind::King => step == 1,
        // A pawn only checks from one square away, on the diagonals it
        // captures toward: the ray from the king must run against the pawn's
        // direction of advance.
        PieceKind::Pawn => step == 1 && diagonal && direction.rows() == -color.pawn_advance(),
        PieceKind::Knight => false,
    }
}

/// Whether the king of `color` would be attacked standing on `to` after
/// moving there from `from`
///
/// The origin square is vacated before probing, so a king stepping away along
/// a checking ray is still seen by the attacker behind it.
pub(crate) fn king_safe_on(grid: &Grid, color: Color, from: Square, to: Square) -> bool {
    let mut probe = *grid;
    let king = probe.get(from);
    probe.set(from, None);
    probe.set(to, king);
    !pins_and_checks(&probe, to, color).in_check
}
