//! The trusted validator set certificates are checked against.

use crate::certificate::Certificate;
use opal_crypto::verify_signature;
use opal_types::PublicKey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The known validator keys and the quorum a certificate must reach.
///
/// Cached locally by clients; this is the only trust anchor proof
/// verification needs, so verification works fully offline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrustBase {
    validators: Vec<PublicKey>,
    quorum: usize,
}

impl TrustBase {
    /// A trust base requiring `quorum` distinct validator signatures.
    pub fn new(validators: Vec<PublicKey>, quorum: usize) -> Self {
        Self { validators, quorum }
    }

    /// Simple-majority trust base: quorum = floor(n/2) + 1.
    pub fn majority(validators: Vec<PublicKey>) -> Self {
        let quorum = validators.len() / 2 + 1;
        Self { validators, quorum }
    }

    pub fn validators(&self) -> &[PublicKey] {
        &self.validators
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Check a certificate: at least `quorum` distinct known validators must
    /// have valid signatures over the input record's canonical bytes.
    pub fn verify_certificate(&self, certificate: &Certificate) -> bool {
        // A zero quorum would certify anything.
        if self.quorum == 0 {
            return false;
        }

        let known: HashSet<&PublicKey> = self.validators.iter().collect();
        let message = certificate.input_record.canonical_bytes();

        let mut counted: HashSet<&PublicKey> = HashSet::new();
        for entry in &certificate.signatures {
            if !known.contains(&entry.validator) || counted.contains(&entry.validator) {
                continue;
            }
            if verify_signature(&message, &entry.signature, &entry.validator) {
                counted.insert(&entry.validator);
            }
        }

        counted.len() >= self.quorum
    }
}
