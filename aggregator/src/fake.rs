//! In-memory aggregator — records commitments without a network.
//!
//! Faithful to the real service's contract: at most one commitment per
//! request id, ever; idempotent proof retrieval; proofs carry certificates
//! signed by the fake's own validator set. Used by resolver and submission
//! tests.

use crate::client::{AggregatorClient, SubmitAck};
use crate::error::AggregatorError;
use async_trait::async_trait;
use opal_crypto::{generate_keypair, sign_message};
use opal_proofs::{
    Authenticator, Certificate, InclusionProof, InputRecord, MerklePath, TrustBase,
    ValidatorSignature,
};
use opal_types::{KeyPair, RequestId, TxHash};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

struct Recorded {
    transaction_hash: TxHash,
    authenticator: Authenticator,
}

/// A test aggregator keeping its ledger in a `HashMap`.
pub struct InMemoryAggregator {
    records: Mutex<HashMap<RequestId, Recorded>>,
    validators: Vec<KeyPair>,
    round: AtomicU64,
    offline: AtomicBool,
}

impl InMemoryAggregator {
    /// A fake with three freshly generated validators.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            validators: (0..3).map(|_| generate_keypair()).collect(),
            round: AtomicU64::new(1),
            offline: AtomicBool::new(false),
        }
    }

    /// The trust base matching this fake's validator set (majority quorum).
    pub fn trust_base(&self) -> TrustBase {
        TrustBase::majority(self.validators.iter().map(|kp| kp.public.clone()).collect())
    }

    /// Simulate an outage: all calls fail with `ServiceUnavailable` until
    /// switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), AggregatorError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AggregatorError::ServiceUnavailable(
                "aggregator offline".into(),
            ));
        }
        Ok(())
    }

    fn certify(&self, root: [u8; 32]) -> Certificate {
        let input_record = InputRecord {
            root_hash: root,
            round: self.round.fetch_add(1, Ordering::SeqCst),
        };
        let message = input_record.canonical_bytes();
        Certificate {
            signatures: self
                .validators
                .iter()
                .map(|kp| ValidatorSignature {
                    validator: kp.public.clone(),
                    signature: sign_message(&message, &kp.private),
                })
                .collect(),
            input_record,
        }
    }
}

impl Default for InMemoryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AggregatorClient for InMemoryAggregator {
    async fn submit_commitment(
        &self,
        request_id: &RequestId,
        authenticator: &Authenticator,
        transaction_hash: &TxHash,
    ) -> Result<SubmitAck, AggregatorError> {
        self.check_online()?;
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());

        match records.get(request_id) {
            Some(existing) if existing.transaction_hash == *transaction_hash => {
                Ok(SubmitAck::Duplicate)
            }
            // First writer wins; a colliding commitment is definitively lost.
            Some(_) => Err(AggregatorError::AlreadySpent),
            None => {
                records.insert(
                    *request_id,
                    Recorded {
                        transaction_hash: *transaction_hash,
                        authenticator: authenticator.clone(),
                    },
                );
                Ok(SubmitAck::Accepted)
            }
        }
    }

    async fn get_inclusion_proof(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<InclusionProof>, AggregatorError> {
        self.check_online()?;
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let merkle_path = MerklePath { steps: Vec::new() };

        let proof = match records.get(request_id) {
            Some(recorded) => {
                let root = merkle_path.compute_root(request_id, Some(&recorded.transaction_hash));
                InclusionProof {
                    request_id: *request_id,
                    transaction_hash: Some(recorded.transaction_hash),
                    authenticator: Some(recorded.authenticator.clone()),
                    merkle_path,
                    certificate: self.certify(root),
                }
            }
            None => {
                let root = merkle_path.compute_root(request_id, None);
                InclusionProof {
                    request_id: *request_id,
                    transaction_hash: None,
                    authenticator: None,
                    merkle_path,
                    certificate: self.certify(root),
                }
            }
        };

        Ok(Some(proof))
    }
}
