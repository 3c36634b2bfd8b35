//! Core deterministic primitives.
//!
//! Square indexing, commitment hashing, and the PRNG used for
//! engine-derived opening hashes. Everything in this module is
//! deterministic and host-independent.

pub mod square;
pub mod hash;
pub mod rng;

// Re-export core types
pub use square::{Square, BOARD_SQUARES};
pub use hash::{CommitHash, CommitmentHasher};
pub use rng::DeterministicRng;
