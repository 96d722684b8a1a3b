//! The token aggregate and its state machine.

use crate::error::TokenError;
use crate::genesis::Genesis;
use crate::package::OfflineTransferPackage;
use crate::state::TokenState;
use crate::transaction::Transaction;
use opal_crypto::derive_request_id;
use opal_predicates::Predicate;
use opal_proofs::{verify, TrustBase, VerificationResult};
use opal_types::{TokenId, TokenType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A token: origin record, current state, and the transaction chain that
/// connects them.
///
/// Exclusively owned by whichever process holds the secret for the current
/// predicate's public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub genesis: Genesis,
    pub state: TokenState,
    pub transactions: Vec<Transaction>,
    pub nametags: Vec<String>,
    pub offline_transfer: Option<OfflineTransferPackage>,
}

impl Token {
    /// Mint a token: bind the initial owner predicate to the genesis record.
    ///
    /// The predicate's address must match the genesis recipient; the genesis
    /// data becomes the initial state data.
    pub fn mint(genesis: Genesis, predicate: Predicate) -> Result<Self, TokenError> {
        if predicate.address() != genesis.recipient {
            return Err(TokenError::ChainIntegrityViolation {
                reason: "predicate address does not match genesis recipient".into(),
            });
        }
        let state = TokenState::new(predicate, genesis.data.clone());
        Ok(Self {
            genesis,
            state,
            transactions: Vec::new(),
            nametags: Vec::new(),
            offline_transfer: None,
        })
    }

    pub fn token_id(&self) -> &TokenId {
        &self.genesis.token_id
    }

    pub fn token_type(&self) -> &TokenType {
        &self.genesis.token_type
    }

    /// Append a confirmed transaction, advancing the current state.
    ///
    /// Preconditions, all fatal on violation:
    /// - `tx.previous_state_hash` equals the current state hash;
    /// - the authenticator belongs to the current owner and attests the
    ///   same state;
    /// - the payload hash recomputed from the transaction's fields equals
    ///   the proof's transaction hash;
    /// - the proof verifies `Included` for the request id derived from the
    ///   current owner and state.
    ///
    /// On success the recipient predicate becomes the current predicate and
    /// the state data is carried forward unchanged.
    pub fn apply_transaction(
        &mut self,
        tx: Transaction,
        trust_base: &TrustBase,
    ) -> Result<(), TokenError> {
        let current_hash = self.state.state_hash();
        if tx.previous_state_hash != current_hash {
            return Err(TokenError::ChainIntegrityViolation {
                reason: format!(
                    "transaction spends state {} but current state is {}",
                    tx.previous_state_hash, current_hash
                ),
            });
        }

        tx.inclusion_proof
            .validate_shape()
            .map_err(|e| TokenError::ChainIntegrityViolation {
                reason: e.to_string(),
            })?;
        let Some(authenticator) = tx.inclusion_proof.authenticator.as_ref() else {
            return Err(TokenError::ChainIntegrityViolation {
                reason: "transaction proof is not an inclusion proof".into(),
            });
        };

        if authenticator.public_key != *self.state.predicate.public_key() {
            return Err(TokenError::ChainIntegrityViolation {
                reason: "authenticator key is not the current owner".into(),
            });
        }
        if authenticator.state_hash != current_hash {
            return Err(TokenError::ChainIntegrityViolation {
                reason: "authenticator attests a different state".into(),
            });
        }

        if tx.inclusion_proof.transaction_hash != Some(tx.payload_hash()) {
            return Err(TokenError::ChainIntegrityViolation {
                reason: "proof transaction hash does not match transaction payload".into(),
            });
        }

        let request_id = derive_request_id(&authenticator.public_key, &current_hash);
        match verify(&tx.inclusion_proof, trust_base, &request_id) {
            VerificationResult::Included => {}
            other => return Err(TokenError::ProofRejected(other)),
        }

        debug!(
            token_id = %self.genesis.token_id,
            recipient = %tx.recipient_address(),
            chain_len = self.transactions.len() + 1,
            "applying confirmed transaction"
        );

        self.state = TokenState::new(tx.recipient_predicate.clone(), self.state.data.clone());
        self.transactions.push(tx);
        self.offline_transfer = None;
        Ok(())
    }

    /// Re-verify the recorded chain.
    ///
    /// Checks, for every link: proof shape and `Included` verification under
    /// the recorded authenticator, payload-hash agreement, and that each
    /// transaction spends the state produced by its predecessor. The final
    /// recipient predicate must be the current predicate, and state data
    /// must equal the genesis data it was carried forward from.
    pub fn verify_chain(&self, trust_base: &TrustBase) -> Result<(), TokenError> {
        if self.transactions.is_empty() {
            if self.state.predicate.address() != self.genesis.recipient {
                return Err(TokenError::ChainIntegrityViolation {
                    reason: "current predicate does not match genesis recipient".into(),
                });
            }
        } else {
            for (i, tx) in self.transactions.iter().enumerate() {
                tx.inclusion_proof
                    .validate_shape()
                    .map_err(|e| TokenError::ChainIntegrityViolation {
                        reason: format!("transaction {i}: {e}"),
                    })?;
                let Some(authenticator) = tx.inclusion_proof.authenticator.as_ref() else {
                    return Err(TokenError::ChainIntegrityViolation {
                        reason: format!("transaction {i} has no authenticator"),
                    });
                };

                if authenticator.state_hash != tx.previous_state_hash {
                    return Err(TokenError::ChainIntegrityViolation {
                        reason: format!("transaction {i} authenticator attests a different state"),
                    });
                }
                if tx.inclusion_proof.transaction_hash != Some(tx.payload_hash()) {
                    return Err(TokenError::ChainIntegrityViolation {
                        reason: format!("transaction {i} payload hash mismatch"),
                    });
                }

                let request_id =
                    derive_request_id(&authenticator.public_key, &tx.previous_state_hash);
                match verify(&tx.inclusion_proof, trust_base, &request_id) {
                    VerificationResult::Included => {}
                    other => return Err(TokenError::ProofRejected(other)),
                }

                // Each transaction must spend the state its predecessor
                // produced: (predecessor's recipient predicate, genesis data).
                if i > 0 {
                    let prev_state = TokenState::new(
                        self.transactions[i - 1].recipient_predicate.clone(),
                        self.genesis.data.clone(),
                    );
                    if tx.previous_state_hash != prev_state.state_hash() {
                        return Err(TokenError::ChainIntegrityViolation {
                            reason: format!("transaction {i} does not chain to its predecessor"),
                        });
                    }
                    if authenticator.public_key
                        != *self.transactions[i - 1].recipient_predicate.public_key()
                    {
                        return Err(TokenError::ChainIntegrityViolation {
                            reason: format!("transaction {i} signed by a non-owner"),
                        });
                    }
                }
            }

            if let Some(last) = self.transactions.last() {
                if last.recipient_predicate != self.state.predicate {
                    return Err(TokenError::ChainIntegrityViolation {
                        reason: "current predicate does not match last transaction recipient"
                            .into(),
                    });
                }
            }
        }

        if self.state.data != self.genesis.data {
            return Err(TokenError::ChainIntegrityViolation {
                reason: "state data diverged from genesis data".into(),
            });
        }

        Ok(())
    }
}
