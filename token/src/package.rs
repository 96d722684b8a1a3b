//! The offline transfer package and its status lifecycle.

use opal_proofs::Authenticator;
use opal_types::{Address, NetworkId, RequestId, TxHash};
use serde::{Deserialize, Serialize};

/// A signed transfer request binding one token state to a new owner.
///
/// Built by `opal_transfer::build_transfer_commitment`. The salt, not the
/// message, is what makes the transaction hash unique per transfer attempt
/// even when the same state is retried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCommitment {
    pub request_id: RequestId,
    pub transaction_hash: TxHash,
    pub authenticator: Authenticator,
    pub salt: [u8; 32],
    pub recipient: Address,
    pub message: Option<Vec<u8>>,
}

/// Where an offline package is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageStatus {
    /// Created by the sender, not yet handed to the network.
    Pending,
    /// Submitted by the recipient, awaiting an inclusion proof.
    Submitted,
    /// The network confirmed the commitment.
    Confirmed,
    /// Absorbed into a confirmed transaction on the recipient side.
    Transferred,
    /// Terminally rejected.
    Failed,
}

impl PackageStatus {
    /// The TXF string form (uppercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::Confirmed => "CONFIRMED",
            Self::Transferred => "TRANSFERRED",
            Self::Failed => "FAILED",
        }
    }

    /// Parse from the TXF string form.
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "SUBMITTED" => Some(Self::Submitted),
            "CONFIRMED" => Some(Self::Confirmed),
            "TRANSFERRED" => Some(Self::Transferred),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether the lifecycle permits moving to `next`.
    pub fn can_transition_to(&self, next: PackageStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Submitted)
                | (Self::Pending, Self::Failed)
                | (Self::Submitted, Self::Confirmed)
                | (Self::Submitted, Self::Failed)
                | (Self::Confirmed, Self::Transferred)
        )
    }

    /// Whether this package still counts as an in-flight transfer.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Submitted)
    }
}

/// The portable, file-based transfer request handed from sender to
/// recipient out of band.
///
/// Owned transiently: by the sender until handoff, then by the recipient
/// until submission completes. Removed from the token entirely once
/// absorbed into a confirmed [`crate::Transaction`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineTransferPackage {
    pub sender: Address,
    pub recipient: Address,
    pub commitment: TransferCommitment,
    /// Canonical bytes of `commitment`, preserved so the recipient submits
    /// exactly what the sender signed.
    pub serialized_commitment: Vec<u8>,
    pub message: Option<Vec<u8>>,
    pub network: NetworkId,
    pub status: PackageStatus,
}

impl OfflineTransferPackage {
    /// Move to `next`, returning whether the transition was legal.
    pub fn transition(&mut self, next: PackageStatus) -> bool {
        if self.status.can_transition_to(next) {
            self.status = next;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tag_roundtrip() {
        for status in [
            PackageStatus::Pending,
            PackageStatus::Submitted,
            PackageStatus::Confirmed,
            PackageStatus::Transferred,
            PackageStatus::Failed,
        ] {
            assert_eq!(PackageStatus::from_str_tag(status.as_str()), Some(status));
        }
        assert_eq!(PackageStatus::from_str_tag("DONE"), None);
    }

    #[test]
    fn happy_path_transitions() {
        assert!(PackageStatus::Pending.can_transition_to(PackageStatus::Submitted));
        assert!(PackageStatus::Submitted.can_transition_to(PackageStatus::Confirmed));
        assert!(PackageStatus::Confirmed.can_transition_to(PackageStatus::Transferred));
    }

    #[test]
    fn illegal_transitions_rejected() {
        assert!(!PackageStatus::Pending.can_transition_to(PackageStatus::Confirmed));
        assert!(!PackageStatus::Transferred.can_transition_to(PackageStatus::Pending));
        assert!(!PackageStatus::Failed.can_transition_to(PackageStatus::Submitted));
        assert!(!PackageStatus::Confirmed.can_transition_to(PackageStatus::Failed));
    }

    #[test]
    fn open_statuses() {
        assert!(PackageStatus::Pending.is_open());
        assert!(PackageStatus::Submitted.is_open());
        assert!(!PackageStatus::Confirmed.is_open());
        assert!(!PackageStatus::Transferred.is_open());
        assert!(!PackageStatus::Failed.is_open());
    }
}
