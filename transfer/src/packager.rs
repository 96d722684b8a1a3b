//! The offline transfer packager.

use crate::error::TransferError;
use opal_predicates::Predicate;
use opal_proofs::InclusionProof;
use opal_token::{OfflineTransferPackage, PackageStatus, Token, Transaction, TransferCommitment};
use opal_types::{Address, KeyPair, NetworkId};
use tracing::debug;

/// Wrap a commitment into a portable offline package (status `Pending`).
///
/// `sender` is the address of the predicate the commitment spends; the
/// recipient and message are taken from the commitment itself. The
/// commitment's canonical bytes are preserved so the recipient submits
/// exactly what the sender signed.
pub fn package(
    commitment: TransferCommitment,
    sender: Address,
    network: NetworkId,
) -> Result<OfflineTransferPackage, TransferError> {
    let serialized_commitment =
        bincode::serialize(&commitment).map_err(|e| TransferError::Packaging(e.to_string()))?;

    Ok(OfflineTransferPackage {
        sender,
        recipient: commitment.recipient,
        message: commitment.message.clone(),
        serialized_commitment,
        commitment,
        network,
        status: PackageStatus::Pending,
    })
}

/// Turn a confirmed package into the final transaction.
///
/// The caller proves it controls the package's bound recipient address:
/// `recipient_predicate` must derive that exact address and the caller's
/// secret must control the predicate — anything else is
/// [`TransferError::RecipientMismatch`] (wrong secret or tampered package).
///
/// Absorbing a package whose committed state the token has already moved
/// past is rejected with [`TransferError::AlreadyAbsorbed`]; repeating a
/// valid call yields the identical transaction, never a second one.
pub fn absorb(
    token: &Token,
    pkg: &OfflineTransferPackage,
    proof: InclusionProof,
    recipient: &KeyPair,
    recipient_predicate: Predicate,
) -> Result<Transaction, TransferError> {
    if recipient_predicate.address() != pkg.recipient {
        return Err(TransferError::RecipientMismatch);
    }
    if !recipient_predicate.verify_ownership(&recipient.private) {
        return Err(TransferError::RecipientMismatch);
    }

    let committed_state = pkg.commitment.authenticator.state_hash;
    if token.state.state_hash() != committed_state {
        return Err(TransferError::AlreadyAbsorbed);
    }

    if proof.request_id != pkg.commitment.request_id {
        return Err(TransferError::ProofMismatch(
            "proof is for a different request id".into(),
        ));
    }
    if proof.transaction_hash != Some(pkg.commitment.transaction_hash) {
        return Err(TransferError::ProofMismatch(
            "proof records a different transaction hash".into(),
        ));
    }

    debug!(request_id = %proof.request_id, "absorbing confirmed package");

    Ok(Transaction {
        previous_state_hash: committed_state,
        recipient_predicate,
        salt: pkg.commitment.salt,
        message: pkg.commitment.message.clone(),
        inclusion_proof: proof,
    })
}
