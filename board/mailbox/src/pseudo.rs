//! Per-piece-kind pseudo-legal move generation
//!
//! Everything here is pure geometry: moves are generated without asking
//! whether they leave the mover's own king in check. The pin/check filter in
//! [`crate::GameState::legal_moves`] turns this set into the legal one.

use board::{Color, PieceKind, Square, SquareOffset};

use crate::{Grid, Move};

/// Generate every pseudo-legal move for `color` on the current board
///
/// Moves come out in a deterministic order: origin squares row by row from
/// Black's back rank, destinations in the fixed offset order per piece kind.
pub(crate) fn pseudo_legal(grid: &Grid, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    for (square, piece) in grid.pieces() {
        if piece.color != color {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => pawn_moves(grid, square, color, &mut moves),
            PieceKind::Knight => step_moves(grid, square, color, SquareOffset::KNIGHT_JUMPS, &mut moves),
            PieceKind::Bishop => ray_moves(grid, square, color, SquareOffset::DIAGONALS, &mut moves),
            PieceKind::Rook => ray_moves(grid, square, color, SquareOffset::ORTHOGONALS, &mut moves),
            PieceKind::Queen => {
                ray_moves(grid, square, color, SquareOffset::ORTHOGONALS, &mut moves);
                ray_moves(grid, square, color, SquareOffset::DIAGONALS, &mut moves);
            }
            PieceKind::King => step_moves(grid, square, color, SquareOffset::KING_STEPS, &mut moves),
        }
    }
    moves
}

/// Pawn pushes and captures
///
/// No en passant, and a push onto the last rank comes out as a plain move;
/// promotion-piece selection is left to the caller.
fn pawn_moves(grid: &Grid, square: Square, color: Color, moves: &mut Vec<Move>) {
    let advance = color.pawn_advance();
    let one = square.offset(advance, 0);
    if grid.is_empty_square(one) {
        moves.push(Move::new(square, one, grid));
        // The double push needs both intervening squares empty and the pawn
        // still on its home row
        let two = one.offset(advance, 0);
        if square.to_row_col().map(|(row, _)| row) == Some(color.pawn_home_row())
            && grid.is_empty_square(two)
        {
            moves.push(Move::new(square, two, grid));
        }
    }
    for attack in SquareOffset::pawn_attacks(color) {
        let target = attack.offset(square);
        if let Some(victim) = grid.get(target) {
            if victim.color != color {
                moves.push(Move::new(square, target, grid));
            }
        }
    }
}

/// Fixed-offset movers: knight jumps and single king steps
fn step_moves(
    grid: &Grid,
    square: Square,
    color: Color,
    offsets: [SquareOffset; 8],
    moves: &mut Vec<Move>,
) {
    for offset in offsets {
        let target = offset.offset(square);
        if !target.is_valid() {
            continue;
        }
        match grid.get(target) {
            Some(piece) if piece.color == color => {}
            _ => moves.push(Move::new(square, target, grid)),
        }
    }
}

/// Sliding movers: walk each ray to the edge, an allied piece (stop,
/// exclude), or an enemy piece (stop, include as capture)
fn ray_moves(
    grid: &Grid,
    square: Square,
    color: Color,
    directions: [SquareOffset; 4],
    moves: &mut Vec<Move>,
) {
    for direction in directions {
        let mut target = direction.offset(square);
        while target.is_valid() {
            match grid.get(target) {
                None => moves.push(Move::new(square, target, grid)),
                Some(piece) => {
                    if piece.color != color {
                        moves.push(Move::new(square, target, grid));
                    }
                    break;
                }
            }
            target = direction.offset(target);
        }
    }
}
