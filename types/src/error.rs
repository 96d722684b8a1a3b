//! Top-level error type shared across crates.
//!
//! Errors fall into four classes with different handling policies:
//! structural and cryptographic failures are fatal and never retried,
//! protocol-state violations are fatal, and transient network failures are
//! eligible for bounded retry at the submission/resolution layer only.

use thiserror::Error;

/// Common error type for the OPAL protocol.
#[derive(Debug, Error)]
pub enum OpalError {
    // Structural — local parse failures, fatal to the current operation.
    #[error("malformed predicate: {0}")]
    MalformedPredicate(String),

    #[error("malformed proof: {0}")]
    MalformedProof(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    // Cryptographic — a proof or signature does not check out, fatal.
    #[error("invalid authenticator signature")]
    InvalidAuthenticator,

    #[error("merkle path does not reproduce certified root")]
    InvalidPath,

    #[error("certificate not verifiable against trust base")]
    Unverifiable,

    // Protocol-state — structurally valid data violating a protocol invariant.
    #[error("chain integrity violation: {0}")]
    ChainIntegrityViolation(String),

    #[error("package recipient does not match caller's predicate")]
    RecipientMismatch,

    #[error("state already spent under a different transaction")]
    AlreadySpent,

    // Transient-network — retryable with backoff, surfaced as unknown status.
    #[error("request timed out")]
    Timeout,

    #[error("aggregator unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Other(String),
}

impl OpalError {
    /// Whether this error is a transient network failure that a submission
    /// or resolution loop may retry with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::ServiceUnavailable(_))
    }
}
