//! Fundamental types for the OPAL token protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: token identifiers, hashes, keys, addresses, network ids, and
//! the shared error taxonomy.

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod token_id;

pub use address::{Address, AddressScheme};
pub use error::OpalError;
pub use hash::{RequestId, StateHash, TxHash};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use token_id::{TokenId, TokenType};
