//! Game Events
//!
//! Events generated by successful transitions, drained by the registry and
//! fanned out to subscribers. Mirrors what polling front-ends need to react
//! to without re-deriving it from state diffs.

use serde::{Serialize, Deserialize};

use crate::core::square::Square;
use crate::game::board::Color;
use crate::game::state::{GameId, PlayerId, TerminationReason};

/// Event emitted by a game transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A game was created and is waiting for an opponent.
    Created {
        /// New game identifier.
        game_id: GameId,
        /// Creator, playing white.
        white: PlayerId,
    },

    /// The second player joined; the game is now active.
    Joined {
        /// Game identifier.
        game_id: GameId,
        /// Second player, playing black.
        black: PlayerId,
    },

    /// A side stored a move commitment.
    MoveCommitted {
        /// Game identifier.
        game_id: GameId,
        /// Committing side.
        by: Color,
    },

    /// A committed move was revealed and applied.
    MoveRevealed {
        /// Game identifier.
        game_id: GameId,
        /// Revealing side.
        by: Color,
        /// Source square.
        from: Square,
        /// Destination square.
        to: Square,
    },

    /// The game terminated.
    GameEnded {
        /// Game identifier.
        game_id: GameId,
        /// Winning player.
        winner: PlayerId,
        /// Why the game ended; serializes to its stable string form,
        /// e.g. `"timeout"`.
        reason: TerminationReason,
    },
}
