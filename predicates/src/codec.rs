//! Predicate wire and TXF encodings.
//!
//! Binary layout: variant tag byte, algorithm tag byte, 32-byte public key,
//! then (masked only) a 32-byte nonce. Total length 34 or 66 bytes.
//!
//! TXF layout: the 3-element array `[engine_id, template, params]` where
//! `engine_id` is 1 (the Ed25519 predicate engine), `template` names the
//! variant, and `params` is the hex of the binary encoding.

use crate::error::PredicateError;
use crate::predicate::{Predicate, SignatureAlgorithm};
use opal_crypto::validate_public_key;
use opal_types::PublicKey;
use serde::{Deserialize, Serialize};

const VARIANT_UNMASKED: u8 = 0;
const VARIANT_MASKED: u8 = 1;

const UNMASKED_LEN: usize = 2 + 32;
const MASKED_LEN: usize = 2 + 32 + 32;

/// The predicate engine id used in the TXF array form.
pub const ENGINE_ID: u16 = 1;

/// Encode a predicate to its binary form.
pub fn encode_predicate(predicate: &Predicate) -> Vec<u8> {
    match predicate {
        Predicate::Unmasked {
            algorithm,
            public_key,
        } => {
            let mut out = Vec::with_capacity(UNMASKED_LEN);
            out.push(VARIANT_UNMASKED);
            out.push(algorithm.tag());
            out.extend_from_slice(public_key.as_bytes());
            out
        }
        Predicate::Masked {
            algorithm,
            public_key,
            nonce,
        } => {
            let mut out = Vec::with_capacity(MASKED_LEN);
            out.push(VARIANT_MASKED);
            out.push(algorithm.tag());
            out.extend_from_slice(public_key.as_bytes());
            out.extend_from_slice(nonce);
            out
        }
    }
}

/// Decode a predicate from its binary form.
///
/// Rejects unknown variant or algorithm tags, wrong lengths, and public key
/// bytes that are not a valid curve point.
pub fn decode_predicate(bytes: &[u8]) -> Result<Predicate, PredicateError> {
    if bytes.len() < 2 {
        return Err(PredicateError::Malformed(format!(
            "predicate too short: {} bytes",
            bytes.len()
        )));
    }

    let variant = bytes[0];
    let algorithm = SignatureAlgorithm::from_tag(bytes[1]).ok_or(
        PredicateError::UnknownAlgorithm(bytes[1]),
    )?;

    match variant {
        VARIANT_UNMASKED => {
            if bytes.len() != UNMASKED_LEN {
                return Err(PredicateError::Malformed(format!(
                    "unmasked predicate must be {UNMASKED_LEN} bytes, got {}",
                    bytes.len()
                )));
            }
            let public_key = decode_key(&bytes[2..34])?;
            Ok(Predicate::Unmasked {
                algorithm,
                public_key,
            })
        }
        VARIANT_MASKED => {
            if bytes.len() != MASKED_LEN {
                return Err(PredicateError::Malformed(format!(
                    "masked predicate must be {MASKED_LEN} bytes, got {}",
                    bytes.len()
                )));
            }
            let public_key = decode_key(&bytes[2..34])?;
            let mut nonce = [0u8; 32];
            nonce.copy_from_slice(&bytes[34..66]);
            Ok(Predicate::Masked {
                algorithm,
                public_key,
                nonce,
            })
        }
        other => Err(PredicateError::UnknownVariant(other)),
    }
}

fn decode_key(bytes: &[u8]) -> Result<PublicKey, PredicateError> {
    let mut key = [0u8; 32];
    key.copy_from_slice(bytes);
    let public_key = PublicKey(key);
    if !validate_public_key(&public_key) {
        return Err(PredicateError::Malformed(
            "public key is not a valid curve point".into(),
        ));
    }
    Ok(public_key)
}

/// The TXF file representation of a predicate: `[engine_id, template, params]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxfPredicate(pub u16, pub String, pub String);

/// Encode a predicate into the TXF 3-element array form.
pub fn encode_txf_predicate(predicate: &Predicate) -> TxfPredicate {
    let template = match predicate {
        Predicate::Unmasked { .. } => "unmasked",
        Predicate::Masked { .. } => "masked",
    };
    TxfPredicate(
        ENGINE_ID,
        template.to_string(),
        hex::encode(encode_predicate(predicate)),
    )
}

/// Decode a predicate from the TXF array form.
///
/// The template name must agree with the variant tag inside `params`.
pub fn decode_txf_predicate(txf: &TxfPredicate) -> Result<Predicate, PredicateError> {
    if txf.0 != ENGINE_ID {
        return Err(PredicateError::Malformed(format!(
            "unknown predicate engine id {}",
            txf.0
        )));
    }

    let bytes = hex::decode(&txf.2)
        .map_err(|e| PredicateError::Malformed(format!("params is not hex: {e}")))?;
    let predicate = decode_predicate(&bytes)?;

    let expected_template = match predicate {
        Predicate::Unmasked { .. } => "unmasked",
        Predicate::Masked { .. } => "masked",
    };
    if txf.1 != expected_template {
        return Err(PredicateError::Malformed(format!(
            "template {:?} does not match encoded variant {:?}",
            txf.1, expected_template
        )));
    }

    Ok(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_crypto::keypair_from_seed;

    fn unmasked() -> Predicate {
        let kp = keypair_from_seed(&[21u8; 32]);
        Predicate::unmasked(&kp.private)
    }

    fn masked() -> Predicate {
        let kp = keypair_from_seed(&[22u8; 32]);
        Predicate::masked(&kp.private, [0xEE; 32])
    }

    #[test]
    fn binary_roundtrip_unmasked() {
        let p = unmasked();
        assert_eq!(decode_predicate(&encode_predicate(&p)).unwrap(), p);
    }

    #[test]
    fn binary_roundtrip_masked() {
        let p = masked();
        assert_eq!(decode_predicate(&encode_predicate(&p)).unwrap(), p);
    }

    #[test]
    fn binary_roundtrip_zero_nonce() {
        let kp = keypair_from_seed(&[23u8; 32]);
        let p = Predicate::masked(&kp.private, [0u8; 32]);
        assert_eq!(decode_predicate(&encode_predicate(&p)).unwrap(), p);
    }

    #[test]
    fn unknown_variant_rejected() {
        let mut bytes = encode_predicate(&unmasked());
        bytes[0] = 9;
        assert!(matches!(
            decode_predicate(&bytes),
            Err(PredicateError::UnknownVariant(9))
        ));
    }

    #[test]
    fn unknown_algorithm_rejected() {
        let mut bytes = encode_predicate(&unmasked());
        bytes[1] = 7;
        assert!(matches!(
            decode_predicate(&bytes),
            Err(PredicateError::UnknownAlgorithm(7))
        ));
    }

    #[test]
    fn wrong_length_rejected() {
        let mut bytes = encode_predicate(&masked());
        bytes.pop();
        assert!(matches!(
            decode_predicate(&bytes),
            Err(PredicateError::Malformed(_))
        ));
        assert!(decode_predicate(&[]).is_err());
    }

    #[test]
    fn invalid_curve_point_rejected() {
        let mut bytes = encode_predicate(&unmasked());
        for b in bytes[2..34].iter_mut() {
            *b = 0xFF;
        }
        assert!(matches!(
            decode_predicate(&bytes),
            Err(PredicateError::Malformed(_))
        ));
    }

    #[test]
    fn txf_roundtrip() {
        for p in [unmasked(), masked()] {
            let txf = encode_txf_predicate(&p);
            assert_eq!(decode_txf_predicate(&txf).unwrap(), p);
        }
    }

    #[test]
    fn txf_serializes_as_array() {
        let txf = encode_txf_predicate(&unmasked());
        let json = serde_json::to_string(&txf).unwrap();
        assert!(json.starts_with("[1,\"unmasked\","));
    }

    #[test]
    fn txf_template_mismatch_rejected() {
        let mut txf = encode_txf_predicate(&masked());
        txf.1 = "unmasked".into();
        assert!(decode_txf_predicate(&txf).is_err());
    }

    #[test]
    fn txf_wrong_engine_rejected() {
        let mut txf = encode_txf_predicate(&unmasked());
        txf.0 = 2;
        assert!(decode_txf_predicate(&txf).is_err());
    }
}
