use opal_aggregator::AggregatorError;
use opal_proofs::VerificationResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("on-chain proof failed verification: {0:?}")]
    ProofRejected(VerificationResult),

    #[error(transparent)]
    Aggregator(#[from] AggregatorError),
}
