//! Move Commitment Protocol
//!
//! A player commits to a move by publishing the hash of its fields plus a
//! secret salt, and later reveals the plaintext fields. The engine
//! recomputes the hash at reveal time and accepts the move only on an
//! exact match, so neither side can react to foreknowledge of the other's
//! pending move.
//!
//! The preimage is a fixed, order-preserving concatenation
//! `domain || from || to || promo || salt` — not a generic structured
//! encoding — so both the committer and the engine reproduce the hash
//! byte-for-byte, and reordering fields changes the digest.

use serde::{Serialize, Deserialize};

use crate::core::hash::{CommitHash, CommitmentHasher};
use crate::core::rng::{derive_opening_seed, DeterministicRng};
use crate::core::square::Square;
use crate::game::state::{GameId, PlayerId};

/// Size of the secret salt in bytes.
pub const SALT_LEN: usize = 32;

/// Pre-image of a move commitment (kept secret until reveal).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCommitment {
    /// Source square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Promotion piece code, 0 when not promoting.
    pub promo: u8,
    /// 32 bytes of committer-chosen randomness.
    pub salt: [u8; SALT_LEN],
}

impl MoveCommitment {
    /// Create a commitment preimage.
    pub fn new(from: Square, to: Square, promo: u8, salt: [u8; SALT_LEN]) -> Self {
        Self { from, to, promo, salt }
    }

    /// Compute the commitment hash.
    ///
    /// Field order is fixed: from, to, promo, salt.
    pub fn hash(&self) -> CommitHash {
        let mut hasher = CommitmentHasher::for_move();
        hasher.update_u8(self.from.as_u8());
        hasher.update_u8(self.to.as_u8());
        hasher.update_u8(self.promo);
        hasher.update_bytes(&self.salt);
        hasher.finalize()
    }

    /// Whether this preimage reproduces a previously stored hash.
    pub fn matches(&self, stored: &CommitHash) -> bool {
        self.hash() == *stored
    }
}

/// Derive an opening commitment for a game created with the random-hash
/// flag.
///
/// The creator skips supplying a real first-move hash; the engine stores
/// this derived value instead. It has no known preimage, so it can never
/// be revealed — the flag exists for flows where the fairness of the
/// opening is randomized by the engine rather than pre-committed.
pub fn random_opening_hash(game_id: GameId, creator: &PlayerId, block: u64) -> CommitHash {
    let seed = derive_opening_seed(game_id, creator, block);
    let mut rng = DeterministicRng::new(seed);
    let mut hash = [0u8; 32];
    rng.fill_bytes(&mut hash);
    hash
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::RngCore;

    fn sq(i: u8) -> Square {
        Square::new(i).unwrap()
    }

    fn random_salt() -> [u8; SALT_LEN] {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        salt
    }

    #[test]
    fn test_commitment_determinism() {
        let salt = random_salt();
        let c1 = MoveCommitment::new(sq(12), sq(28), 0, salt);
        let c2 = MoveCommitment::new(sq(12), sq(28), 0, salt);

        assert_eq!(c1.hash(), c2.hash());
        assert!(c1.matches(&c2.hash()));
    }

    #[test]
    fn test_any_field_change_breaks_match() {
        let salt = random_salt();
        let base = MoveCommitment::new(sq(12), sq(28), 0, salt);
        let stored = base.hash();

        assert!(!MoveCommitment::new(sq(13), sq(28), 0, salt).matches(&stored));
        assert!(!MoveCommitment::new(sq(12), sq(29), 0, salt).matches(&stored));
        assert!(!MoveCommitment::new(sq(12), sq(28), 5, salt).matches(&stored));

        let mut other_salt = salt;
        other_salt[0] ^= 1;
        assert!(!MoveCommitment::new(sq(12), sq(28), 0, other_salt).matches(&stored));
    }

    #[test]
    fn test_field_order_is_not_malleable() {
        // Swapping from/to must give a different hash
        let salt = [9u8; SALT_LEN];
        let forward = MoveCommitment::new(sq(12), sq(28), 0, salt);
        let backward = MoveCommitment::new(sq(28), sq(12), 0, salt);

        assert_ne!(forward.hash(), backward.hash());
    }

    #[test]
    fn test_random_opening_hash_varies_per_game() {
        let alice = PlayerId::new([1; 16]);
        let charlie = PlayerId::new([3; 16]);

        let h1 = random_opening_hash(GameId::new(0), &alice, 10);
        let h2 = random_opening_hash(GameId::new(1), &charlie, 11);
        assert_ne!(h1, h2);

        // Re-derivable from the same creation parameters
        assert_eq!(h1, random_opening_hash(GameId::new(0), &alice, 10));
    }

    proptest! {
        // Reveal must reproduce (from, to, promo) exactly across the full
        // protocol domain: squares 0-63, promo codes 0-12.
        #[test]
        fn prop_commitment_round_trip(
            from in 0u8..64,
            to in 0u8..64,
            promo in 0u8..=12,
            salt in prop::array::uniform32(any::<u8>()),
        ) {
            let commit = MoveCommitment::new(sq(from), sq(to), promo, salt);
            let stored = commit.hash();

            let reveal = MoveCommitment::new(sq(from), sq(to), promo, salt);
            prop_assert!(reveal.matches(&stored));
            prop_assert_eq!(
                (reveal.from.as_u8(), reveal.to.as_u8(), reveal.promo),
                (from, to, promo)
            );
        }
    }
}
