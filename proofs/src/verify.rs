//! The offline proof verifier.

use crate::proof::InclusionProof;
use crate::trust_base::TrustBase;
use opal_crypto::verify_signature;
use opal_types::RequestId;
use serde::{Deserialize, Serialize};

/// Outcome of verifying an inclusion proof.
///
/// The three failure variants are cryptographic errors: they are reported
/// verbatim to the caller and never downgraded to warnings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationResult {
    /// The request id is recorded under the proof's transaction hash.
    Included,
    /// The request id is certified absent — the state is not spent.
    ExcludedNotSpent,
    /// The sender's signature over the transaction hash does not check out.
    InvalidAuthenticator,
    /// The merkle path does not reproduce the certified root, or the proof
    /// is not about the expected request id.
    InvalidPath,
    /// The certificate does not reach quorum against the trust base.
    Unverifiable,
}

impl VerificationResult {
    /// Whether verification concluded without a cryptographic failure.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Included | Self::ExcludedNotSpent)
    }
}

/// Verify a proof against a trust base, offline.
///
/// Check order: merkle path against the certified root, then the
/// certificate against the trust base, then (inclusion only) the
/// authenticator signature over the transaction hash. Exclusion paths have
/// nothing to authenticate and return [`VerificationResult::ExcludedNotSpent`].
pub fn verify(
    proof: &InclusionProof,
    trust_base: &TrustBase,
    expected_request_id: &RequestId,
) -> VerificationResult {
    if proof.request_id != *expected_request_id {
        return VerificationResult::InvalidPath;
    }

    let root = proof
        .merkle_path
        .compute_root(&proof.request_id, proof.transaction_hash.as_ref());
    if root != proof.certificate.input_record.root_hash {
        return VerificationResult::InvalidPath;
    }

    if !trust_base.verify_certificate(&proof.certificate) {
        return VerificationResult::Unverifiable;
    }

    match (&proof.transaction_hash, &proof.authenticator) {
        (Some(transaction_hash), Some(authenticator)) => {
            if verify_signature(
                transaction_hash.as_bytes(),
                &authenticator.signature,
                &authenticator.public_key,
            ) {
                VerificationResult::Included
            } else {
                VerificationResult::InvalidAuthenticator
            }
        }
        (Some(_), None) => VerificationResult::InvalidAuthenticator,
        (None, _) => VerificationResult::ExcludedNotSpent,
    }
}
