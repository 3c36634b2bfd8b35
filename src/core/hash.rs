//! Commitment Hashing
//!
//! Deterministic SHA-256 hashing for the commit-reveal protocol:
//! - Move commitments (binding a move and secret salt before reveal)
//! - Opening-hash derivation for engine-randomized first moves
//!
//! All hashing is domain-separated so a hash produced for one purpose can
//! never collide with a hash produced for another.

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes).
pub type CommitHash = [u8; 32];

/// Domain separator for move commitments.
pub const MOVE_COMMIT_DOMAIN: &[u8] = b"BATTLECHESS_MOVE_V1";

/// Domain separator for engine-derived opening hashes.
pub const OPENING_DOMAIN: &[u8] = b"BATTLECHESS_OPENING_V1";

/// Deterministic hasher for protocol data.
///
/// Wraps SHA-256 with fixed-width update helpers.
/// Order of updates is the wire order and is critical: the commitment
/// scheme relies on a fixed, order-preserving field concatenation.
pub struct CommitmentHasher {
    hasher: Sha256,
}

impl CommitmentHasher {
    /// Create a new hasher seeded with a domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for move commitments.
    pub fn for_move() -> Self {
        Self::new(MOVE_COMMIT_DOMAIN)
    }

    /// Create hasher for opening-hash derivation.
    pub fn for_opening() -> Self {
        Self::new(OPENING_DOMAIN)
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> CommitHash {
        self.hasher.finalize().into()
    }
}

/// Compute a plain hash of arbitrary data.
pub fn hash_bytes(data: &[u8]) -> CommitHash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute hash with a domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> CommitHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_determinism() {
        let make_hash = || {
            let mut hasher = CommitmentHasher::for_move();
            hasher.update_u8(12);
            hasher.update_u8(28);
            hasher.update_u8(0);
            hasher.update_bytes(&[7u8; 32]);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = CommitmentHasher::new(b"test");
            h.update_u8(1);
            h.update_u8(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = CommitmentHasher::new(b"test");
            h.update_u8(2);
            h.update_u8(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let data = [1u8, 2, 3, 4];

        let hash1 = hash_with_domain(MOVE_COMMIT_DOMAIN, &data);
        let hash2 = hash_with_domain(OPENING_DOMAIN, &data);

        assert_ne!(hash1, hash2);
        assert_ne!(hash1, hash_bytes(&data));
    }
}
