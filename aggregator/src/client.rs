//! The injected aggregator interface.

use crate::error::AggregatorError;
use async_trait::async_trait;
use opal_proofs::{Authenticator, InclusionProof};
use opal_types::{RequestId, TxHash};
use serde::{Deserialize, Serialize};

/// Outcome of a successful submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitAck {
    /// The commitment was recorded.
    Accepted,
    /// The identical commitment was already recorded earlier — benign, the
    /// proof can be fetched immediately.
    Duplicate,
}

/// The two-operation aggregator service.
///
/// The network records at most one commitment per request id, ever; it is
/// the sole arbiter of races between concurrent transfer attempts on the
/// same state. A submission that collides with a different recorded
/// transaction hash fails with [`AggregatorError::AlreadySpent`], which is
/// definitive and must not be retried.
#[async_trait]
pub trait AggregatorClient: Send + Sync {
    /// Submit a commitment under `request_id`.
    async fn submit_commitment(
        &self,
        request_id: &RequestId,
        authenticator: &Authenticator,
        transaction_hash: &TxHash,
    ) -> Result<SubmitAck, AggregatorError>;

    /// Fetch the proof for `request_id`: an inclusion proof if recorded, an
    /// exclusion proof if attested absent, `None` if the aggregator has no
    /// attestation. Idempotent — repeated queries return the same answer.
    async fn get_inclusion_proof(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<InclusionProof>, AggregatorError>;
}
