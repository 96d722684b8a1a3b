//! Cryptographic primitives for the OPAL protocol.
//!
//! Ed25519 for predicate ownership and validator certificates, Blake2b-256
//! for every protocol hash (state hashes, transaction hashes, request ids,
//! addresses, merkle nodes).

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi, derive_request_id, hash_state_bytes};
pub use keys::{
    generate_keypair, keypair_from_private, keypair_from_seed, public_from_private,
    validate_public_key,
};
pub use sign::{sign_message, verify_signature};
