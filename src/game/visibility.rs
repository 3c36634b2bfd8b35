//! Fog-of-War Visibility Engine
//!
//! Computes the observer-relative board view: a player always sees their
//! own pieces in full, sees enemy pieces only on squares some friendly
//! piece can reach, and sees every other occupied square as an anonymous
//! "unknown occupant" of the hiding side. Presence leaks, identity does
//! not.
//!
//! Views are recomputed fresh on every read from the canonical board. The
//! board stores ground truth only; caching per-observer copies would let
//! view and state diverge.
//!
//! Sight is the piece's movement range:
//! - pawns: the push square (two from the start rank, blocked by
//!   occupancy) plus both capture diagonals
//! - knights: their eight jump squares; kings: the eight adjacent squares
//! - bishops, rooks, queens: their movement rays, stopping at and
//!   including the first occupied square

use crate::core::square::{Square, BOARD_SQUARES};
use crate::game::board::{Board, Color, Piece, PieceKind, EMPTY};

/// Sentinel for a hidden white piece in black's view.
pub const UNKNOWN_WHITE: u8 = 13;

/// Sentinel for a hidden black piece in white's view.
pub const UNKNOWN_BLACK: u8 = 14;

/// Sentinel code for a hidden piece of the given color.
#[inline]
pub fn unknown_code(color: Color) -> u8 {
    match color {
        Color::White => UNKNOWN_WHITE,
        Color::Black => UNKNOWN_BLACK,
    }
}

/// Diagonal ray directions.
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Orthogonal ray directions.
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Knight jump offsets.
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];

/// King step offsets.
const KING_STEPS: [(i8, i8); 8] = [
    (1, -1), (1, 0), (1, 1),
    (0, -1), (0, 1),
    (-1, -1), (-1, 0), (-1, 1),
];

/// Render the board as seen by one side.
///
/// Each entry is the true piece code (own piece, or enemy piece in sight),
/// 0 for an empty square, or the unknown-occupant sentinel for an enemy
/// piece outside every friendly piece's sight.
pub fn render_view(board: &Board, observer: Color) -> [u8; BOARD_SQUARES] {
    let seen = sight_mask(board, observer);
    let mut view = [EMPTY; BOARD_SQUARES];

    for (i, view_code) in view.iter_mut().enumerate() {
        let sq = match Square::new(i as u8) {
            Some(sq) => sq,
            None => continue,
        };
        let code = board.code_at(sq);

        *view_code = match Piece::from_code(code) {
            None => EMPTY,
            Some(piece) if piece.color == observer || seen[i] => code,
            Some(piece) => unknown_code(piece.color),
        };
    }

    view
}

/// Union of every friendly piece's sight.
pub fn sight_mask(board: &Board, observer: Color) -> [bool; BOARD_SQUARES] {
    let mut mask = [false; BOARD_SQUARES];

    for (sq, piece) in board.pieces() {
        if piece.color == observer {
            mark_piece_sight(board, piece, sq, &mut mask);
        }
    }

    mask
}

/// Mark every square one piece can see.
fn mark_piece_sight(board: &Board, piece: Piece, from: Square, mask: &mut [bool; BOARD_SQUARES]) {
    match piece.kind {
        PieceKind::Pawn => mark_pawn_sight(board, piece.color, from, mask),
        PieceKind::Knight => mark_jumps(&KNIGHT_JUMPS, from, mask),
        PieceKind::King => mark_jumps(&KING_STEPS, from, mask),
        PieceKind::Bishop => mark_rays(board, &BISHOP_DIRS, from, mask),
        PieceKind::Rook => mark_rays(board, &ROOK_DIRS, from, mask),
        PieceKind::Queen => {
            mark_rays(board, &BISHOP_DIRS, from, mask);
            mark_rays(board, &ROOK_DIRS, from, mask);
        }
    }
}

/// Pawn sight: push squares plus both capture diagonals.
fn mark_pawn_sight(board: &Board, color: Color, from: Square, mask: &mut [bool; BOARD_SQUARES]) {
    let dir = color.forward();

    if let Some(one) = from.offset(dir, 0) {
        mask[one.index()] = true;

        // Double push only from the start rank, and not through a blocker
        if from.is_pawn_start_rank(color) && !board.is_occupied(one) {
            if let Some(two) = from.offset(2 * dir, 0) {
                mask[two.index()] = true;
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(diag) = from.offset(dir, dc) {
            mask[diag.index()] = true;
        }
    }
}

/// Fixed-offset sight (knight jumps, king steps).
fn mark_jumps(offsets: &[(i8, i8)], from: Square, mask: &mut [bool; BOARD_SQUARES]) {
    for (dr, dc) in offsets {
        if let Some(sq) = from.offset(*dr, *dc) {
            mask[sq.index()] = true;
        }
    }
}

/// Ray sight: walk each direction until the first occupied square,
/// inclusive.
fn mark_rays(board: &Board, dirs: &[(i8, i8)], from: Square, mask: &mut [bool; BOARD_SQUARES]) {
    for (dr, dc) in dirs {
        let mut cursor = from;
        while let Some(next) = cursor.offset(*dr, *dc) {
            mask[next.index()] = true;
            if board.is_occupied(next) {
                break;
            }
            cursor = next;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(i: u8) -> Square {
        Square::new(i).unwrap()
    }

    #[test]
    fn test_start_position_own_side_fully_visible() {
        let board = Board::initial();
        let view = render_view(&board, Color::White);

        for i in 0..16u8 {
            assert_eq!(view[i as usize], board.code_at(sq(i)), "square {}", i);
        }
    }

    #[test]
    fn test_start_position_armies_mutually_invisible() {
        let board = Board::initial();

        // Every black piece hides behind the sentinel in white's view
        let white_view = render_view(&board, Color::White);
        for i in 48..64 {
            assert_eq!(white_view[i], UNKNOWN_BLACK, "square {}", i);
        }

        // And symmetrically for black
        let black_view = render_view(&board, Color::Black);
        for i in 0..16 {
            assert_eq!(black_view[i], UNKNOWN_WHITE, "square {}", i);
        }
    }

    #[test]
    fn test_empty_squares_render_empty() {
        let board = Board::initial();
        let view = render_view(&board, Color::White);

        // Whole middle of the board, in or out of sight
        for i in 16..48 {
            assert_eq!(view[i], EMPTY, "square {}", i);
        }
    }

    #[test]
    fn test_pawn_sees_two_ahead_only_from_start_rank() {
        let board = Board::initial();
        let mask = sight_mask(&board, Color::White);

        // e2 pawn: e3 and e4 in sight
        assert!(mask[20]);
        assert!(mask[28]);
        // e5 is beyond pawn sight
        assert!(!mask[36]);

        // Advanced pawn loses the double-push square
        let mut board = Board::empty();
        board.set(sq(28), Some(Piece::new(PieceKind::Pawn, Color::White)));
        let mask = sight_mask(&board, Color::White);
        assert!(mask[36]);
        assert!(!mask[44]);
    }

    #[test]
    fn test_pawn_capture_diagonals_respect_files() {
        // Black pawn on a-file: sight is forward plus the single on-board
        // diagonal, never wrapping to the h-file
        let mut board = Board::empty();
        board.set(sq(40), Some(Piece::new(PieceKind::Pawn, Color::Black)));

        let mask = sight_mask(&board, Color::Black);
        assert!(mask[32]); // forward
        assert!(mask[33]); // diagonal toward the b-file
        assert!(!mask[31]); // h4 — off the pawn's file edge
    }

    #[test]
    fn test_enemy_in_pawn_sight_shows_true_code() {
        // White pawn e4, black pawn d5: the capture diagonal reveals it
        let mut board = Board::empty();
        board.set(sq(28), Some(Piece::new(PieceKind::Pawn, Color::White)));
        board.set(sq(35), Some(Piece::new(PieceKind::Pawn, Color::Black)));

        let view = render_view(&board, Color::White);
        assert_eq!(view[35], 7);
    }

    #[test]
    fn test_enemy_outside_sight_shows_sentinel() {
        let mut board = Board::empty();
        board.set(sq(28), Some(Piece::new(PieceKind::Pawn, Color::White)));
        board.set(sq(56), Some(Piece::new(PieceKind::Queen, Color::Black)));

        let view = render_view(&board, Color::White);
        assert_eq!(view[56], UNKNOWN_BLACK);

        // The hidden queen sees the pawn just fine from her own side
        let view = render_view(&board, Color::Black);
        assert_eq!(view[28], 1);
    }

    #[test]
    fn test_rays_stop_at_first_occupied_square() {
        // White rook a1, black rook a5, black queen a8: the first blocker
        // is revealed, anything behind it stays hidden
        let mut board = Board::empty();
        board.set(sq(0), Some(Piece::new(PieceKind::Rook, Color::White)));
        board.set(sq(32), Some(Piece::new(PieceKind::Rook, Color::Black)));
        board.set(sq(56), Some(Piece::new(PieceKind::Queen, Color::Black)));

        let view = render_view(&board, Color::White);
        assert_eq!(view[32], 10);
        assert_eq!(view[56], UNKNOWN_BLACK);
    }

    #[test]
    fn test_knight_sight_is_jump_squares() {
        let mut board = Board::empty();
        board.set(sq(1), Some(Piece::new(PieceKind::Knight, Color::White)));
        board.set(sq(18), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        board.set(sq(17), Some(Piece::new(PieceKind::Pawn, Color::Black)));

        let view = render_view(&board, Color::White);
        assert_eq!(view[18], 7); // c3 is a jump square of b1
        assert_eq!(view[17], UNKNOWN_BLACK); // b3 is not
    }

    #[test]
    fn test_view_is_pure_and_repeatable() {
        let board = Board::initial();
        assert_eq!(render_view(&board, Color::White), render_view(&board, Color::White));
        // Rendering never mutates ground truth
        assert_eq!(board, Board::initial());
    }
}
