//! Game Logic Module
//!
//! All deterministic game logic. No I/O, no clocks, no task scheduling:
//! identity and block heights arrive from the host in a `TxContext`, and
//! every transition is a synchronous, all-or-nothing function.
//!
//! ## Module Structure
//!
//! - `board`: piece codes, standard setup, move application
//! - `commitment`: move commitment codec (hash binding move + salt)
//! - `state`: per-game record, side states, lifecycle, status accessor
//! - `turn`: create/join/commit/reveal/claim-timeout transitions
//! - `rules`: pluggable move-legality seam
//! - `visibility`: fog-of-war board views, computed per observer on read
//! - `events`: events emitted by transitions

pub mod board;
pub mod commitment;
pub mod state;
pub mod turn;
pub mod rules;
pub mod visibility;
pub mod events;

// Re-export key types
pub use board::{Board, Color, Piece, PieceKind};
pub use commitment::MoveCommitment;
pub use state::{Game, GameId, GameStage, GameStatus, Phase, PlayerId, SideTurn};
pub use turn::{EngineConfig, GameError, PromotionError, TxContext};
pub use rules::{CommitRules, RuleSet, RuleViolation};
pub use visibility::{render_view, UNKNOWN_BLACK, UNKNOWN_WHITE};
pub use events::GameEvent;
