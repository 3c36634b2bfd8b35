//! # BattleChess Engine
//!
//! Two-player, turn-based chess engine built around a commit-reveal move
//! protocol with fog-of-war state visibility. A player first publishes the
//! hash of their move plus a secret salt, then reveals the plaintext; the
//! opponent never gets to react to a move before it is bound. Each side
//! sees the full board for their own pieces and only movement-range sight
//! of the opponent's.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BATTLECHESS ENGINE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── square.rs     - 0-63 row-major square indexing          │
//! │  ├── hash.rs       - Domain-separated commitment hashing     │
//! │  └── rng.rs        - Xorshift128+ PRNG for opening hashes    │
//! │                                                              │
//! │  game/             - Game logic (deterministic)              │
//! │  ├── board.rs      - Piece codes 0-12, canonical board       │
//! │  ├── commitment.rs - Move commitment codec                   │
//! │  ├── state.rs      - Per-game record, side states, status    │
//! │  ├── turn.rs       - Create/join/commit/reveal/timeout       │
//! │  ├── rules.rs      - Pluggable move-legality seam            │
//! │  ├── visibility.rs - Fog-of-war views, computed on read      │
//! │  └── events.rs     - Transition events                       │
//! │                                                              │
//! │  registry.rs       - Async registry (non-deterministic)      │
//! │                      id allocation, per-game locking,        │
//! │                      caller-relative reads, event fan-out    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**: every
//! transition validates completely before its first mutation, so a failed
//! call is observationally a no-op. The registry serializes transitions
//! per game behind a write lock — a timeout claim racing a late reveal is
//! decided by lock order and the loser fails cleanly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod registry;

// Re-export commonly used types
pub use crate::core::hash::CommitHash;
pub use crate::core::square::{Square, BOARD_SQUARES};
pub use game::{
    Board, Color, CommitRules, EngineConfig, Game, GameError, GameEvent, GameId, GameStatus,
    MoveCommitment, Phase, Piece, PieceKind, PlayerId, RuleSet, TxContext,
};
pub use registry::GameRegistry;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Blocks of inactivity after which the side to move forfeits to a
/// timeout claim.
pub const REVEAL_DEADLINE_BLOCKS: u64 = 300;
