//! The predicate sum type and address derivation.

use opal_crypto::{blake2b_256_multi, public_from_private};
use opal_types::{Address, AddressScheme, KeyPair, PrivateKey, PublicKey, TokenId, TokenType};
use serde::{Deserialize, Serialize};

/// Domain separation tags for address derivation, one per variant.
const TAG_UNMASKED: &[u8] = b"opal.predicate.unmasked.v1";
const TAG_MASKED: &[u8] = b"opal.predicate.masked.v1";

/// The signature scheme a predicate's key belongs to.
///
/// Only Ed25519 exists today; the tag byte is carried in every encoding so
/// new schemes can be added without a format change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    Ed25519,
}

impl SignatureAlgorithm {
    pub fn tag(&self) -> u8 {
        match self {
            Self::Ed25519 => 0,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Ed25519),
            _ => None,
        }
    }
}

/// An ownership predicate — who may spend the token state it is bound to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Reusable predicate: the address is a function of the key alone.
    Unmasked {
        algorithm: SignatureAlgorithm,
        public_key: PublicKey,
    },
    /// Single-use predicate: a fresh nonce makes the address unlinkable to
    /// the key until spend time.
    ///
    /// Nonce uniqueness is the caller's responsibility; reusing a nonce
    /// across two mints makes their addresses collide. Use [`masked_nonce`]
    /// to derive a per-token nonce.
    Masked {
        algorithm: SignatureAlgorithm,
        public_key: PublicKey,
        nonce: [u8; 32],
    },
}

impl Predicate {
    /// Build an unmasked predicate owned by `secret`.
    pub fn unmasked(secret: &PrivateKey) -> Self {
        Self::Unmasked {
            algorithm: SignatureAlgorithm::Ed25519,
            public_key: public_from_private(secret),
        }
    }

    /// Build a masked predicate owned by `secret` with the given nonce.
    pub fn masked(secret: &PrivateKey, nonce: [u8; 32]) -> Self {
        Self::Masked {
            algorithm: SignatureAlgorithm::Ed25519,
            public_key: public_from_private(secret),
            nonce,
        }
    }

    /// The public key this predicate requires a signature from.
    pub fn public_key(&self) -> &PublicKey {
        match self {
            Self::Unmasked { public_key, .. } => public_key,
            Self::Masked { public_key, .. } => public_key,
        }
    }

    /// Derive this predicate's address. Pure and deterministic: the digest
    /// is a Blake2b-256 over a variant tag, the algorithm tag, the public
    /// key, and (masked only) the nonce.
    pub fn address(&self) -> Address {
        let digest = match self {
            Self::Unmasked {
                algorithm,
                public_key,
            } => blake2b_256_multi(&[TAG_UNMASKED, &[algorithm.tag()], public_key.as_bytes()]),
            Self::Masked {
                algorithm,
                public_key,
                nonce,
            } => blake2b_256_multi(&[
                TAG_MASKED,
                &[algorithm.tag()],
                public_key.as_bytes(),
                nonce,
            ]),
        };
        Address::new(AddressScheme::Direct, digest)
    }

    /// Local-only ownership check: re-derive the public key from
    /// `candidate` and compare against the stored key.
    ///
    /// This is what a wallet runs before attempting a transfer, so a wrong
    /// key fails here with a clear local error instead of a network
    /// round-trip failure. Network verification is separate.
    pub fn verify_ownership(&self, candidate: &PrivateKey) -> bool {
        public_from_private(candidate) == *self.public_key()
    }
}

/// Derive a single-use nonce for a masked predicate bound to one token.
///
/// `Blake2b-256(secret || token id || token type || seed)` — deterministic
/// for a given token and seed, distinct across tokens, so the path of least
/// resistance produces unique nonces. Callers that bypass this helper own
/// the uniqueness requirement themselves.
pub fn masked_nonce(
    owner: &KeyPair,
    token_id: &TokenId,
    token_type: &TokenType,
    seed: &[u8; 32],
) -> [u8; 32] {
    blake2b_256_multi(&[
        &owner.private.0,
        token_id.as_bytes(),
        token_type.as_bytes(),
        seed,
    ])
}
