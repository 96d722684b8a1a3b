//! Building signed transfer commitments.

use crate::error::TransferError;
use opal_crypto::{derive_request_id, sign_message};
use opal_proofs::Authenticator;
use opal_token::{transaction_payload_hash, Token, TransferCommitment};
use opal_types::{Address, KeyPair};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

/// Build a signed transfer request binding the token's current state to a
/// new owner.
///
/// Fails with [`TransferError::NotOwner`] when `sender` does not control the
/// current predicate — signing with a wrong key would succeed locally but be
/// rejected by the network, so the mismatch is caught here with a clear
/// local error instead of a round-trip failure.
///
/// A fresh 32-byte random salt goes into every commitment. The salt, not
/// the message, is what makes the transaction hash unique per attempt even
/// when the same state is retried.
pub fn build_transfer_commitment(
    token: &Token,
    sender: &KeyPair,
    recipient: Address,
    message: Option<Vec<u8>>,
) -> Result<TransferCommitment, TransferError> {
    if !token.state.predicate.verify_ownership(&sender.private) {
        return Err(TransferError::NotOwner);
    }

    let state_hash = token.state.state_hash();

    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);

    let transaction_hash =
        transaction_payload_hash(&state_hash, &recipient, &salt, message.as_deref());
    let signature = sign_message(transaction_hash.as_bytes(), &sender.private);
    let request_id = derive_request_id(&sender.public, &state_hash);

    debug!(%request_id, %recipient, "built transfer commitment");

    Ok(TransferCommitment {
        request_id,
        transaction_hash,
        authenticator: Authenticator {
            public_key: sender.public.clone(),
            signature,
            state_hash,
        },
        salt,
        recipient,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_crypto::{keypair_from_seed, verify_signature};
    use opal_predicates::Predicate;
    use opal_proofs::{Certificate, InclusionProof, InputRecord, MerklePath};
    use opal_token::{Genesis, Token};
    use opal_types::{RequestId, TokenId, TokenType};

    fn minted_token(owner: &KeyPair) -> Token {
        let predicate = Predicate::unmasked(&owner.private);
        let genesis = Genesis::new(
            TokenId::new([1u8; 32]),
            TokenType::new([2u8; 32]),
            predicate.address(),
            b"data".to_vec(),
            InclusionProof {
                request_id: RequestId::ZERO,
                transaction_hash: None,
                authenticator: None,
                merkle_path: MerklePath { steps: Vec::new() },
                certificate: Certificate {
                    input_record: InputRecord { root_hash: [0u8; 32], round: 0 },
                    signatures: Vec::new(),
                },
            },
        );
        Token::mint(genesis, predicate).unwrap()
    }

    fn recipient_address(seed: u8) -> Address {
        let kp = keypair_from_seed(&[seed; 32]);
        Predicate::unmasked(&kp.private).address()
    }

    #[test]
    fn commitment_binds_all_fields() {
        let sender = keypair_from_seed(&[1u8; 32]);
        let token = minted_token(&sender);
        let commitment =
            build_transfer_commitment(&token, &sender, recipient_address(2), Some(b"hi".to_vec()))
                .unwrap();

        assert_eq!(
            commitment.transaction_hash,
            transaction_payload_hash(
                &token.state.state_hash(),
                &commitment.recipient,
                &commitment.salt,
                Some(b"hi"),
            )
        );
        assert!(verify_signature(
            commitment.transaction_hash.as_bytes(),
            &commitment.authenticator.signature,
            &sender.public,
        ));
        assert_eq!(
            commitment.request_id,
            derive_request_id(&sender.public, &token.state.state_hash())
        );
    }

    #[test]
    fn request_id_stable_across_attempts() {
        // Retrying the same state yields the same request id but a fresh
        // salt, so the transaction hash differs.
        let sender = keypair_from_seed(&[1u8; 32]);
        let token = minted_token(&sender);
        let c1 = build_transfer_commitment(&token, &sender, recipient_address(2), None).unwrap();
        let c2 = build_transfer_commitment(&token, &sender, recipient_address(2), None).unwrap();

        assert_eq!(c1.request_id, c2.request_id);
        assert_ne!(c1.salt, c2.salt);
        assert_ne!(c1.transaction_hash, c2.transaction_hash);
    }

    #[test]
    fn non_owner_rejected_locally() {
        let owner = keypair_from_seed(&[1u8; 32]);
        let stranger = keypair_from_seed(&[9u8; 32]);
        let token = minted_token(&owner);
        assert!(matches!(
            build_transfer_commitment(&token, &stranger, recipient_address(2), None),
            Err(TransferError::NotOwner)
        ));
    }
}
