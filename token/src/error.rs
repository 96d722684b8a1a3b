use opal_predicates::PredicateError;
use opal_proofs::VerificationResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("chain integrity violation: {reason}")]
    ChainIntegrityViolation { reason: String },

    #[error("inclusion proof rejected: {0:?}")]
    ProofRejected(VerificationResult),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Predicate(#[from] PredicateError),
}
