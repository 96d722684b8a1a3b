//! Submission with bounded proof polling.

use crate::client::AggregatorClient;
use crate::config::AggregatorConfig;
use crate::error::AggregatorError;
use opal_proofs::{verify, InclusionProof, TrustBase, VerificationResult};
use opal_token::TransferCommitment;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Submit a commitment and wait for its inclusion proof.
///
/// Submission is not idempotent, so recorded status is checked first: if the
/// request id is already included under our transaction hash the proof is
/// returned without resubmitting; under a different hash the transfer is
/// definitively lost ([`AggregatorError::AlreadySpent`]).
///
/// After submission the proof is polled at `config.poll_interval` until
/// `config.poll_ceiling` elapses — a bounded loop, not a blocking wait, so
/// callers can cancel. Transient errors during polling are retried within
/// the same ceiling. Every returned proof is verified against `trust_base`
/// before being handed to the caller.
pub async fn submit_and_wait<C: AggregatorClient + ?Sized>(
    client: &C,
    commitment: &TransferCommitment,
    trust_base: &TrustBase,
    config: &AggregatorConfig,
) -> Result<InclusionProof, AggregatorError> {
    // Status check before submitting.
    if let Some(proof) = client.get_inclusion_proof(&commitment.request_id).await? {
        if proof.is_inclusion() {
            return accept_inclusion(proof, commitment, trust_base);
        }
    }

    let ack = client
        .submit_commitment(
            &commitment.request_id,
            &commitment.authenticator,
            &commitment.transaction_hash,
        )
        .await?;
    info!(request_id = %commitment.request_id, ?ack, "commitment submitted");

    let deadline = Instant::now() + config.poll_ceiling;
    loop {
        match client.get_inclusion_proof(&commitment.request_id).await {
            Ok(Some(proof)) if proof.is_inclusion() => {
                return accept_inclusion(proof, commitment, trust_base);
            }
            Ok(_) => {
                debug!(request_id = %commitment.request_id, "not yet included");
            }
            Err(e) if e.is_transient() => {
                warn!(request_id = %commitment.request_id, error = %e, "transient poll failure");
            }
            Err(e) => return Err(e),
        }

        if Instant::now() + config.poll_interval > deadline {
            return Err(AggregatorError::Timeout);
        }
        sleep(config.poll_interval).await;
    }
}

fn accept_inclusion(
    proof: InclusionProof,
    commitment: &TransferCommitment,
    trust_base: &TrustBase,
) -> Result<InclusionProof, AggregatorError> {
    if proof.transaction_hash != Some(commitment.transaction_hash) {
        return Err(AggregatorError::AlreadySpent);
    }
    match verify(&proof, trust_base, &commitment.request_id) {
        VerificationResult::Included => Ok(proof),
        other => Err(AggregatorError::ProofRejected(other)),
    }
}
