//! Token state — the `(predicate, data)` pair a transfer spends.

use opal_crypto::blake2b_256_multi;
use opal_predicates::{encode_predicate, Predicate};
use opal_types::StateHash;
use serde::{Deserialize, Serialize};

/// Domain separation tag for state hashes.
const STATE_TAG: &[u8] = b"opal.state.v1";

/// The current ownership state of a token.
///
/// `data` is an opaque byte blob (often UTF-8 JSON) carried verbatim from
/// genesis through every transfer; it never participates in addressing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub predicate: Predicate,
    pub data: Vec<u8>,
}

impl TokenState {
    pub fn new(predicate: Predicate, data: Vec<u8>) -> Self {
        Self { predicate, data }
    }

    /// Hash of this state: Blake2b-256 over a tag, the predicate's binary
    /// encoding, and the data bytes. This is the value transfers reference
    /// as `previous_state_hash` and request ids are derived from.
    pub fn state_hash(&self) -> StateHash {
        StateHash::new(blake2b_256_multi(&[
            STATE_TAG,
            &encode_predicate(&self.predicate),
            &self.data,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_crypto::keypair_from_seed;

    #[test]
    fn state_hash_deterministic() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let state = TokenState::new(Predicate::unmasked(&kp.private), b"{\"name\":\"Test\"}".to_vec());
        assert_eq!(state.state_hash(), state.state_hash());
    }

    #[test]
    fn state_hash_depends_on_data() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let a = TokenState::new(Predicate::unmasked(&kp.private), b"a".to_vec());
        let b = TokenState::new(Predicate::unmasked(&kp.private), b"b".to_vec());
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn state_hash_depends_on_predicate() {
        let kp1 = keypair_from_seed(&[1u8; 32]);
        let kp2 = keypair_from_seed(&[2u8; 32]);
        let a = TokenState::new(Predicate::unmasked(&kp1.private), b"same".to_vec());
        let b = TokenState::new(Predicate::unmasked(&kp2.private), b"same".to_vec());
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
