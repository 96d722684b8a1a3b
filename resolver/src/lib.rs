//! Ownership status resolution.
//!
//! A token file on disk can fall behind the network: the state it claims to
//! own may have been spent from another device, or an offline transfer may
//! still be in flight. The resolver reconciles the local view with the
//! aggregator's authoritative spent/unspent answer into one of four
//! scenarios.

pub mod error;
pub mod resolve;

pub use error::ResolverError;
pub use resolve::{resolve, OnChainStatus, OwnershipScenario, OwnershipStatus};
