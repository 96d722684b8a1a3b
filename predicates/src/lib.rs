//! Ownership predicates for OPAL tokens.
//!
//! A predicate is the cryptographic ownership condition bound into a token's
//! state. Two variants exist:
//! - **Unmasked**: the address depends only on the public key, so it is
//!   reusable across tokens.
//! - **Masked**: the address additionally depends on a nonce, yielding a
//!   single-use address that cannot be linked to the key before spend.
//!
//! Address derivation is a pure function of the predicate's fields; the same
//! fields always yield the same address.

pub mod codec;
pub mod error;
pub mod predicate;

pub use codec::{
    decode_predicate, decode_txf_predicate, encode_predicate, encode_txf_predicate, TxfPredicate,
};
pub use error::PredicateError;
pub use predicate::{masked_nonce, Predicate, SignatureAlgorithm};
