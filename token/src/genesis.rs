//! The immutable origin record of a token.

use opal_proofs::InclusionProof;
use opal_types::{Address, TokenId, TokenType};
use serde::{Deserialize, Serialize};

/// A token's origin: created exactly once at mint time, never mutated.
///
/// `recipient` is the address of the initial owner predicate; the mint
/// inclusion proof attests that the network recorded the mint under the
/// genesis request id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub token_id: TokenId,
    pub token_type: TokenType,
    pub recipient: Address,
    pub data: Vec<u8>,
    pub inclusion_proof: InclusionProof,
}

impl Genesis {
    pub fn new(
        token_id: TokenId,
        token_type: TokenType,
        recipient: Address,
        data: Vec<u8>,
        inclusion_proof: InclusionProof,
    ) -> Self {
        Self {
            token_id,
            token_type,
            recipient,
            data,
            inclusion_proof,
        }
    }
}
