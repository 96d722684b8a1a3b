//! Transfer operations: building signed commitments and moving them through
//! the offline package lifecycle.
//!
//! A transfer starts with [`build_transfer_commitment`] on the sender side.
//! The commitment either goes straight to the aggregator or is wrapped by
//! [`package`] into a portable file handed to the recipient out of band; the
//! recipient submits it and then [`absorb`]s the resulting proof into a
//! confirmed transaction.

pub mod commitment;
pub mod error;
pub mod packager;

pub use commitment::build_transfer_commitment;
pub use error::TransferError;
pub use packager::{absorb, package};
