//! Portable, offline-verifiable inclusion proofs.
//!
//! An inclusion proof attests that a request id was (or was not) recorded by
//! the aggregator network. Verification needs only the proof and a cached
//! [`TrustBase`] — no network access — which is what makes proofs portable
//! between the parties of an offline transfer.

pub mod certificate;
pub mod error;
pub mod proof;
pub mod trust_base;
pub mod verify;

pub use certificate::{Certificate, InputRecord, ValidatorSignature};
pub use error::ProofError;
pub use proof::{Authenticator, InclusionProof, MerklePath, PathStep};
pub use trust_base::TrustBase;
pub use verify::{verify, VerificationResult};
