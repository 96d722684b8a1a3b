//! Predicate-derived addresses and their text encoding.
//!
//! Text format: `DIRECT://<hex>`, `PK://<hex>`, `PKH://<hex>` — a scheme tag
//! followed by the 64-hex-char address digest. `Address::parse` is the single
//! factory entry point for all three schemes.

use crate::error::OpalError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an address digest was derived from its predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressScheme {
    /// Digest over the full predicate (the default scheme).
    Direct,
    /// Digest over a bare public key.
    Pk,
    /// Digest over a hashed public key.
    Pkh,
}

impl AddressScheme {
    /// The text prefix for this scheme, without the `://` separator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "DIRECT",
            Self::Pk => "PK",
            Self::Pkh => "PKH",
        }
    }
}

/// A 32-byte predicate-derived address plus its derivation scheme.
///
/// Deriving an address from a predicate is a pure function of the predicate's
/// fields; see `opal_predicates::Predicate::address`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    scheme: AddressScheme,
    digest: [u8; 32],
}

impl Address {
    pub fn new(scheme: AddressScheme, digest: [u8; 32]) -> Self {
        Self { scheme, digest }
    }

    pub fn scheme(&self) -> AddressScheme {
        self.scheme
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Parse an address from its text form.
    ///
    /// Accepts `DIRECT://<hex>`, `PK://<hex>`, and `PKH://<hex>` with exactly
    /// 64 lowercase or uppercase hex characters after the separator.
    pub fn parse(text: &str) -> Result<Self, OpalError> {
        let (prefix, hex_part) = text
            .split_once("://")
            .ok_or_else(|| OpalError::InvalidAddress(format!("missing scheme: {text}")))?;

        let scheme = match prefix {
            "DIRECT" => AddressScheme::Direct,
            "PK" => AddressScheme::Pk,
            "PKH" => AddressScheme::Pkh,
            other => {
                return Err(OpalError::InvalidAddress(format!(
                    "unknown address scheme: {other}"
                )))
            }
        };

        if hex_part.len() != 64 {
            return Err(OpalError::InvalidAddress(format!(
                "expected 64 hex chars, got {}",
                hex_part.len()
            )));
        }

        let mut digest = [0u8; 32];
        for (i, chunk) in hex_part.as_bytes().chunks(2).enumerate() {
            let hi = hex_val(chunk[0])
                .ok_or_else(|| OpalError::InvalidAddress(format!("invalid hex: {text}")))?;
            let lo = hex_val(chunk[1])
                .ok_or_else(|| OpalError::InvalidAddress(format!("invalid hex: {text}")))?;
            digest[i] = (hi << 4) | lo;
        }

        Ok(Self { scheme, digest })
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme.as_str())?;
        for b in &self.digest {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}
