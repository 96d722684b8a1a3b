//! Network certificates over merkle roots.

use opal_types::{PublicKey, Signature};
use serde::{Deserialize, Serialize};

/// The round output a certificate attests to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// The merkle root recorded for this round.
    pub root_hash: [u8; 32],
    /// Monotonic round number.
    pub round: u64,
}

impl InputRecord {
    /// Canonical byte encoding signed by validators.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(32 + 8);
        out.extend_from_slice(&self.root_hash);
        out.extend_from_slice(&self.round.to_be_bytes());
        out
    }
}

/// One validator's signature over an input record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSignature {
    pub validator: PublicKey,
    pub signature: Signature,
}

/// A quorum certificate: the input record plus validator signatures.
///
/// Verified against a [`crate::TrustBase`]; the certificate alone proves
/// nothing without the trusted validator set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub input_record: InputRecord,
    pub signatures: Vec<ValidatorSignature>,
}
