//! One link in a token's ownership chain.

use opal_crypto::blake2b_256_multi;
use opal_predicates::Predicate;
use opal_proofs::InclusionProof;
use opal_types::{Address, StateHash, TxHash};
use serde::{Deserialize, Serialize};

/// Domain separation tag for transaction payload hashes.
const TX_TAG: &[u8] = b"opal.tx.v1";

/// A confirmed transfer: the previous state it spent, the recipient
/// predicate it handed ownership to, and the inclusion proof that the
/// network recorded it.
///
/// Transactions are ordered and append-only; the chain is never rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub previous_state_hash: StateHash,
    pub recipient_predicate: Predicate,
    pub salt: [u8; 32],
    pub message: Option<Vec<u8>>,
    pub inclusion_proof: InclusionProof,
}

impl Transaction {
    /// The recipient address this transaction's commitment was bound to.
    pub fn recipient_address(&self) -> Address {
        self.recipient_predicate.address()
    }

    /// The payload hash the sender signed, recomputed from this
    /// transaction's fields. Must equal the inclusion proof's transaction
    /// hash for the chain link to be valid.
    pub fn payload_hash(&self) -> TxHash {
        transaction_payload_hash(
            &self.previous_state_hash,
            &self.recipient_address(),
            &self.salt,
            self.message.as_deref(),
        )
    }
}

/// Hash of a transfer payload: Blake2b-256 over the previous state hash,
/// the recipient address, the salt, and the optional message.
///
/// The sender's authenticator signs exactly this value, so changing any of
/// the four fields after signing invalidates the signature — a captured
/// commitment cannot be redirected to a different recipient.
pub fn transaction_payload_hash(
    previous_state_hash: &StateHash,
    recipient: &Address,
    salt: &[u8; 32],
    message: Option<&[u8]>,
) -> TxHash {
    let scheme = [recipient.scheme() as u8];
    let mut parts: Vec<&[u8]> = vec![
        TX_TAG,
        previous_state_hash.as_bytes(),
        &scheme,
        recipient.digest(),
        salt,
    ];
    if let Some(message) = message {
        parts.push(message);
    }
    TxHash::new(blake2b_256_multi(&parts))
}
