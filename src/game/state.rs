//! Game State Definitions
//!
//! The per-game record: players, board ground truth, turn ownership, the
//! commit-reveal side states, deadlines, and the append-only set of every
//! commitment hash the game has seen.
//!
//! The store enforces no business rules; all mutation goes through the
//! transition functions in `game::turn` so that every state change is
//! atomic and validated up front.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::core::hash::CommitHash;
use crate::game::board::{Board, Color};
use crate::game::events::GameEvent;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique game identifier.
///
/// Allocated sequentially by the registry starting at 0; never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(u64);

impl GameId {
    /// Create from a raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque player identity (UUID as bytes), supplied by the host's
/// wallet/identity layer on every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// =============================================================================
// TURN PHASE
// =============================================================================

/// What a side must do next, once it holds the turn.
///
/// A side in `PendingReveal` structurally carries the hash it must match,
/// so "Reveal phase without a stored commitment" cannot be represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideTurn {
    /// Must submit a commitment before revealing.
    PendingCommit,
    /// Holds a commitment awaiting its reveal.
    PendingReveal(CommitHash),
}

impl SideTurn {
    /// The externally visible phase this side state maps to.
    pub fn phase(&self) -> Phase {
        match self {
            SideTurn::PendingCommit => Phase::Commit,
            SideTurn::PendingReveal(_) => Phase::Reveal,
        }
    }
}

/// Externally visible turn phase, as polled by front-ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Side to move must submit a commitment hash.
    Commit,
    /// Side to move must reveal the committed move.
    Reveal,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Why a game terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminationReason {
    /// The side to move let the reveal deadline lapse.
    Timeout,
}

impl TerminationReason {
    /// Stable string form, surfaced in events.
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::Timeout => "timeout",
        }
    }
}

/// Game lifecycle stage.
///
/// Games are never deleted; termination is a flag, not removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStage {
    /// Created by white, waiting for a second player.
    AwaitingJoin,
    /// Both players present, commit-reveal cycle running.
    Active,
    /// Over. The record remains readable.
    Terminated {
        /// Who won.
        winner: PlayerId,
        /// Why the game ended.
        reason: TerminationReason,
    },
}

// =============================================================================
// GAME RECORD
// =============================================================================

/// Complete state of one game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    /// Game identifier.
    pub id: GameId,

    /// Creator, playing white.
    pub white: PlayerId,

    /// Second player, playing black. Unset until join.
    pub black: Option<PlayerId>,

    /// Canonical board (ground truth; filter through `game::visibility`
    /// before showing to a player).
    pub board: Board,

    /// Side to move.
    pub turn: Color,

    /// White's commit-reveal state.
    pub white_turn_state: SideTurn,

    /// Black's commit-reveal state.
    pub black_turn_state: SideTurn,

    /// Lifecycle stage.
    pub stage: GameStage,

    /// Block height of the last accepted transition; anchors the reveal
    /// deadline.
    pub last_action_block: u64,

    /// Every commitment hash this game has ever stored, opening hashes
    /// included. Append-only; a hash in here is never accepted again.
    pub used_hashes: BTreeSet<CommitHash>,

    /// Events generated by transitions, drained by the registry.
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl Game {
    /// Side state for a color.
    pub fn side_state(&self, color: Color) -> SideTurn {
        match color {
            Color::White => self.white_turn_state,
            Color::Black => self.black_turn_state,
        }
    }

    /// Mutable side state for a color.
    pub fn side_state_mut(&mut self, color: Color) -> &mut SideTurn {
        match color {
            Color::White => &mut self.white_turn_state,
            Color::Black => &mut self.black_turn_state,
        }
    }

    /// Current phase: the side to move's pending action.
    pub fn phase(&self) -> Phase {
        self.side_state(self.turn).phase()
    }

    /// Color a player controls, if they are in this game.
    pub fn color_of(&self, player: &PlayerId) -> Option<Color> {
        if *player == self.white {
            Some(Color::White)
        } else if self.black.as_ref() == Some(player) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Identity controlling a color; `None` for black before join.
    pub fn player_of(&self, color: Color) -> Option<PlayerId> {
        match color {
            Color::White => Some(self.white),
            Color::Black => self.black,
        }
    }

    /// Whether the game is over.
    pub fn is_terminated(&self) -> bool {
        matches!(self.stage, GameStage::Terminated { .. })
    }

    /// Status snapshot for polling front-ends.
    ///
    /// `deadline` is the block height at which the side to move becomes
    /// timeout-claimable.
    pub fn status(&self, reveal_deadline_blocks: u64) -> GameStatus {
        GameStatus {
            phase: self.phase(),
            turn_white: self.turn == Color::White,
            white: self.white,
            black: self.black,
            deadline: self.last_action_block + reveal_deadline_blocks,
            terminated: self.is_terminated(),
        }
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

/// Snapshot returned by the status accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    /// Current turn phase.
    pub phase: Phase,
    /// Whether white is the side to move.
    pub turn_white: bool,
    /// White player identity.
    pub white: PlayerId,
    /// Black player identity, unset until join.
    pub black: Option<PlayerId>,
    /// Block height at which the side to move becomes timeout-claimable.
    pub deadline: u64,
    /// Whether the game has terminated.
    pub terminated: bool,
}

// =============================================================================
// TESTS
// =============================================================================
