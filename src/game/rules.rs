//! Pluggable Move Legality
//!
//! The commit-reveal protocol validates turn order, commitment integrity,
//! and promotion policy itself; everything else about move legality sits
//! behind the [`RuleSet`] trait. The default [`CommitRules`] enforces only
//! ownership of the moved piece — full chess legality (movement geometry,
//! check, castling, en passant) is a separate rules module that plugs in
//! here.

use thiserror::Error;

use crate::core::square::Square;
use crate::game::board::{Board, Color};

/// A move rejected by a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// Source square holds no piece.
    #[error("no piece on source square")]
    EmptySource,

    /// Source square holds the opponent's piece.
    #[error("not your piece")]
    NotYourPiece,

    /// Source and destination are the same square.
    #[error("null move")]
    NullMove,
}

/// Legality check applied to a revealed move before it touches the board.
pub trait RuleSet: Send + Sync {
    /// Validate a move for `mover` on the current board.
    fn validate_move(
        &self,
        board: &Board,
        mover: Color,
        from: Square,
        to: Square,
    ) -> Result<(), RuleViolation>;
}

/// Default rules: the mover must own the piece on the source square.
///
/// Deliberately does not constrain movement geometry; the protocol layer
/// stays agnostic about which chess variant runs on top of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitRules;

impl RuleSet for CommitRules {
    fn validate_move(
        &self,
        board: &Board,
        mover: Color,
        from: Square,
        to: Square,
    ) -> Result<(), RuleViolation> {
        if from == to {
            return Err(RuleViolation::NullMove);
        }

        let piece = board.piece_at(from).ok_or(RuleViolation::EmptySource)?;
        if piece.color != mover {
            return Err(RuleViolation::NotYourPiece);
        }

        Ok(())
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
    fn test_own_piece_moves() {
        let board = Board::initial();
        let rules = CommitRules;

        assert!(rules.validate_move(&board, Color::White, sq(12), sq(28)).is_ok());
        assert!(rules.validate_move(&board, Color::Black, sq(52), sq(36)).is_ok());
    }

    #[test]
    fn test_empty_source_rejected() {
        let board = Board::initial();
        let rules = CommitRules;

        assert_eq!(
            rules.validate_move(&board, Color::White, sq(28), sq(36)),
            Err(RuleViolation::EmptySource)
        );
    }

    #[test]
    fn test_opponent_piece_rejected() {
        let board = Board::initial();
        let rules = CommitRules;

        assert_eq!(
            rules.validate_move(&board, Color::White, sq(52), sq(36)),
            Err(RuleViolation::NotYourPiece)
        );
    }

    #[test]
    fn test_null_move_rejected() {
        let board = Board::initial();
        let rules = CommitRules;

        assert_eq!(
            rules.validate_move(&board, Color::White, sq(12), sq(12)),
            Err(RuleViolation::NullMove)
        );
    }

    #[test]
    fn test_geometry_is_not_checked() {
        // The protocol layer accepts geometrically absurd moves; a chess
        // rules module plugs in behind RuleSet to reject them.
        let board = Board::initial();
        let rules = CommitRules;

        assert!(rules.validate_move(&board, Color::White, sq(12), sq(44)).is_ok());
    }
}
