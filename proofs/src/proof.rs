//! Inclusion proof structure.

use crate::certificate::Certificate;
use crate::error::ProofError;
use opal_crypto::blake2b_256_multi;
use opal_types::{PublicKey, RequestId, Signature, StateHash, TxHash};
use serde::{Deserialize, Serialize};

/// Domain separation tag for merkle leaf hashes.
const LEAF_TAG: &[u8] = b"opal.leaf.v1";

/// Sender's attestation over the transaction hash.
///
/// `state_hash` is the hash of the state being spent; together with
/// `public_key` it re-derives the request id this proof must be filed under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticator {
    pub public_key: PublicKey,
    pub signature: Signature,
    pub state_hash: StateHash,
}

/// One sibling on the path from a leaf to the certified root.
///
/// `right` means the sibling sits to the right of the running hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub sibling: [u8; 32],
    pub right: bool,
}

/// The sibling walk from a request-id leaf up to the certified root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    pub steps: Vec<PathStep>,
}

impl MerklePath {
    /// Recompute the root implied by this path for the given leaf slot.
    ///
    /// `transaction_hash: None` computes the exclusion leaf (an empty slot
    /// for the request id); `Some` computes the inclusion leaf.
    pub fn compute_root(&self, request_id: &RequestId, transaction_hash: Option<&TxHash>) -> [u8; 32] {
        let leaf_payload: &[u8; 32] = match transaction_hash {
            Some(tx) => tx.as_bytes(),
            None => &[0u8; 32],
        };
        let mut node = blake2b_256_multi(&[LEAF_TAG, request_id.as_bytes(), leaf_payload]);
        for step in &self.steps {
            node = if step.right {
                blake2b_256_multi(&[&node, &step.sibling])
            } else {
                blake2b_256_multi(&[&step.sibling, &node])
            };
        }
        node
    }
}

/// A portable attestation that `request_id` was (or was not) recorded.
///
/// `transaction_hash` and `authenticator` are present exactly when this is
/// an inclusion proof; an exclusion proof certifies an empty slot and has
/// nothing to authenticate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    pub request_id: RequestId,
    pub transaction_hash: Option<TxHash>,
    pub authenticator: Option<Authenticator>,
    pub merkle_path: MerklePath,
    pub certificate: Certificate,
}

impl InclusionProof {
    /// Whether this proof claims the request id was recorded.
    pub fn is_inclusion(&self) -> bool {
        self.transaction_hash.is_some()
    }

    /// Structural validation: inclusion proofs carry a transaction hash and
    /// an authenticator; exclusion proofs carry neither.
    pub fn validate_shape(&self) -> Result<(), ProofError> {
        match (&self.transaction_hash, &self.authenticator) {
            (Some(_), Some(_)) | (None, None) => Ok(()),
            (Some(_), None) => Err(ProofError::MalformedProof(
                "inclusion proof missing authenticator".into(),
            )),
            (None, Some(_)) => Err(ProofError::MalformedProof(
                "exclusion proof carries an authenticator".into(),
            )),
        }
    }
}
