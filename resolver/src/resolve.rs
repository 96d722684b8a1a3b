//! The resolution algorithm.

use crate::error::ResolverError;
use opal_aggregator::AggregatorClient;
use opal_crypto::derive_request_id;
use opal_proofs::{verify, InclusionProof, TrustBase, VerificationResult};
use opal_token::Token;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Bounded retry for transient failures: attempts and initial backoff.
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// How the local file relates to the network's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnershipScenario {
    /// Not spent on-chain, but a local package is still in flight.
    Pending,
    /// Not spent on-chain and nothing in flight — the file is authoritative.
    Current,
    /// Spent on-chain and the local file has the matching transfer — the
    /// transfer this file initiated completed.
    Confirmed,
    /// Spent on-chain with no matching local record: the state was
    /// transferred elsewhere and this file must not be used for further
    /// spends.
    Outdated,
}

/// The network's answer about the current state's request id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnChainStatus {
    Unspent,
    Spent,
    /// The aggregator could not be reached; explicitly not the same thing
    /// as unspent.
    Unknown,
}

/// Result of resolving a token against the network.
///
/// `scenario` is `None` exactly when `on_chain` is [`OnChainStatus::Unknown`]:
/// without a network answer no scenario can be claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipStatus {
    pub scenario: Option<OwnershipScenario>,
    pub on_chain: OnChainStatus,
}

/// Resolve a token's ownership status against the aggregator.
///
/// Derives the request id from the current state, fetches and verifies the
/// proof, and folds the result with the local package state:
///
/// | on-chain          | open package | matching transfer | scenario    |
/// |-------------------|--------------|-------------------|-------------|
/// | excluded          | yes          | —                 | `Pending`   |
/// | excluded          | no           | —                 | `Current`   |
/// | included          | —            | yes               | `Confirmed` |
/// | included          | —            | no                | `Outdated`  |
///
/// Transient network failures are retried a bounded number of times, then
/// surface as `on_chain: Unknown` — never coerced to unspent. A proof that
/// fails cryptographic verification is returned as an error verbatim.
pub async fn resolve<C: AggregatorClient + ?Sized>(
    token: &Token,
    client: &C,
    trust_base: &TrustBase,
) -> Result<OwnershipStatus, ResolverError> {
    let state_hash = token.state.state_hash();
    let request_id = derive_request_id(token.state.predicate.public_key(), &state_hash);
    debug!(%request_id, "resolving ownership status");

    let proof = match fetch_with_retry(client, &request_id).await {
        Ok(proof) => proof,
        Err(e) if e.is_transient() => {
            warn!(%request_id, error = %e, "aggregator unreachable, status unknown");
            return Ok(OwnershipStatus {
                scenario: None,
                on_chain: OnChainStatus::Unknown,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let Some(proof) = proof else {
        // No attestation at all: treat as unspent, without a certificate.
        return Ok(unspent_status(token));
    };

    match verify(&proof, trust_base, &request_id) {
        VerificationResult::ExcludedNotSpent => Ok(unspent_status(token)),
        VerificationResult::Included => {
            let scenario = if has_matching_transfer(token, &proof) {
                OwnershipScenario::Confirmed
            } else {
                OwnershipScenario::Outdated
            };
            Ok(OwnershipStatus {
                scenario: Some(scenario),
                on_chain: OnChainStatus::Spent,
            })
        }
        other => Err(ResolverError::ProofRejected(other)),
    }
}

async fn fetch_with_retry<C: AggregatorClient + ?Sized>(
    client: &C,
    request_id: &opal_types::RequestId,
) -> Result<Option<InclusionProof>, opal_aggregator::AggregatorError> {
    let mut backoff = RETRY_BACKOFF;
    let mut last_error = None;
    for attempt in 0..RETRY_ATTEMPTS {
        match client.get_inclusion_proof(request_id).await {
            Ok(proof) => return Ok(proof),
            Err(e) if e.is_transient() => {
                debug!(%request_id, attempt, error = %e, "transient fetch failure");
                last_error = Some(e);
                if attempt + 1 < RETRY_ATTEMPTS {
                    sleep(backoff).await;
                    backoff *= 2;
                }
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_error.unwrap_or(opal_aggregator::AggregatorError::Timeout))
}

fn unspent_status(token: &Token) -> OwnershipStatus {
    let in_flight = token
        .offline_transfer
        .as_ref()
        .is_some_and(|pkg| pkg.status.is_open());
    let scenario = if in_flight {
        OwnershipScenario::Pending
    } else {
        OwnershipScenario::Current
    };
    OwnershipStatus {
        scenario: Some(scenario),
        on_chain: OnChainStatus::Unspent,
    }
}

/// Whether the local file carries the transfer the chain recorded: a
/// package whose commitment hash equals the on-chain transaction hash.
fn has_matching_transfer(token: &Token, proof: &InclusionProof) -> bool {
    token
        .offline_transfer
        .as_ref()
        .is_some_and(|pkg| Some(pkg.commitment.transaction_hash) == proof.transaction_hash)
}
