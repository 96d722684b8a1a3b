//! Blake2b hashing for states, transactions, and request ids.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use opal_types::{PublicKey, RequestId, StateHash};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash a canonically encoded token state to produce its `StateHash`.
pub fn hash_state_bytes(state_bytes: &[u8]) -> StateHash {
    StateHash::new(blake2b_256(state_bytes))
}

/// Derive the network lookup key for a `(owner, state)` pair.
///
/// `request_id = Blake2b-256(owner public key || state hash)`. Deterministic:
/// the same owner and state always produce the same request id, so a client
/// can ask the network about a specific state without a stateful session.
pub fn derive_request_id(owner: &PublicKey, state_hash: &StateHash) -> RequestId {
    RequestId::new(blake2b_256_multi(&[
        owner.as_bytes(),
        state_hash.as_bytes(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello opal");
        let h2 = blake2b_256(b"hello opal");
        assert_eq!(h1, h2);
    }

    #[test]
    fn blake2b_different_inputs() {
        assert_ne!(blake2b_256(b"hello"), blake2b_256(b"world"));
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn request_id_deterministic() {
        let owner = PublicKey([3u8; 32]);
        let state = StateHash::new([4u8; 32]);
        assert_eq!(
            derive_request_id(&owner, &state),
            derive_request_id(&owner, &state)
        );
    }

    #[test]
    fn request_id_depends_on_both_inputs() {
        let owner_a = PublicKey([1u8; 32]);
        let owner_b = PublicKey([2u8; 32]);
        let state_a = StateHash::new([3u8; 32]);
        let state_b = StateHash::new([4u8; 32]);

        let base = derive_request_id(&owner_a, &state_a);
        assert_ne!(base, derive_request_id(&owner_b, &state_a));
        assert_ne!(base, derive_request_id(&owner_a, &state_b));
    }

    #[test]
    fn hash_state_not_zero() {
        assert!(!hash_state_bytes(b"state bytes").is_zero());
    }
}
