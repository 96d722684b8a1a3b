//! The OPAL token aggregate and its persisted form.
//!
//! A token is `{genesis, current state, transaction chain}`. The current
//! state is always reachable by replaying the chain from genesis, and the
//! predicate in the current state matches the recipient of the last
//! transaction (or the genesis recipient while the chain is empty).
//!
//! The [`txf`] module implements the persisted JSON token file format.

pub mod error;
pub mod genesis;
pub mod package;
pub mod state;
pub mod token;
pub mod transaction;
pub mod txf;

pub use error::TokenError;
pub use genesis::Genesis;
pub use package::{OfflineTransferPackage, PackageStatus, TransferCommitment};
pub use state::TokenState;
pub use token::Token;
pub use transaction::{transaction_payload_hash, Transaction};
pub use txf::{read_token, write_token, TXF_VERSION};
