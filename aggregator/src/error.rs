use opal_proofs::VerificationResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("request timed out")]
    Timeout,

    #[error("aggregator unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("invalid JSON from aggregator: {0}")]
    InvalidJson(String),

    #[error("state already spent under a different transaction")]
    AlreadySpent,

    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("returned proof failed verification: {0:?}")]
    ProofRejected(VerificationResult),
}

impl AggregatorError {
    /// Whether a bounded retry with backoff is appropriate. Everything else
    /// is definitive and must surface to the caller unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::ServiceUnavailable(_))
    }
}
