//! TXF — the persisted JSON token file format (version 2.0).
//!
//! The file is a JSON object with hex-encoded byte fields:
//!
//! ```json
//! {
//!   "version": "2.0",
//!   "state": { "predicate": [1, "unmasked", "<hex>"], "data": "<hex>" },
//!   "genesis": { "data": "<hex of genesis record JSON>", "inclusionProof": { ... } },
//!   "transactions": [ ... ],
//!   "nametags": [],
//!   "offlineTransfer": { ... },
//!   "status": "PENDING"
//! }
//! ```
//!
//! Round-tripping a token through this format must not perturb addressable
//! state: the request id recomputed from a re-parsed file equals the one
//! computed before writing.

use crate::error::TokenError;
use crate::genesis::Genesis;
use crate::package::{OfflineTransferPackage, PackageStatus, TransferCommitment};
use crate::state::TokenState;
use crate::token::Token;
use crate::transaction::Transaction;
use opal_predicates::{decode_txf_predicate, encode_txf_predicate, TxfPredicate};
use opal_proofs::{
    Authenticator, Certificate, InclusionProof, InputRecord, MerklePath, PathStep,
    ValidatorSignature,
};
use opal_types::{
    Address, NetworkId, PublicKey, RequestId, Signature, StateHash, TokenId, TokenType, TxHash,
};
use serde::{Deserialize, Serialize};

/// The TXF format version this crate reads and writes.
pub const TXF_VERSION: &str = "2.0";

/// Parse a token from TXF JSON text.
pub fn read_token(text: &str) -> Result<Token, TokenError> {
    let file: TxfFile =
        serde_json::from_str(text).map_err(|e| TokenError::InvalidJson(e.to_string()))?;
    if file.version != TXF_VERSION {
        return Err(TokenError::InvalidJson(format!(
            "unsupported TXF version {:?}",
            file.version
        )));
    }
    decode_file(&file)
}

/// Serialize a token to TXF JSON text.
pub fn write_token(token: &Token) -> Result<String, TokenError> {
    let file = encode_file(token);
    serde_json::to_string_pretty(&file).map_err(|e| TokenError::InvalidJson(e.to_string()))
}

// --- file mirror structs -------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfFile {
    version: String,
    state: TxfState,
    genesis: TxfGenesis,
    transactions: Vec<TxfTransaction>,
    nametags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offline_transfer: Option<TxfPackage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfState {
    predicate: TxfPredicate,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfGenesis {
    /// Hex of the serialized genesis record JSON.
    data: String,
    inclusion_proof: TxfProof,
}

/// The genesis record embedded (hex-encoded) in `TxfGenesis::data`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfGenesisRecord {
    token_id: String,
    token_type: String,
    recipient: String,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfTransaction {
    previous_state_hash: String,
    recipient_predicate: TxfPredicate,
    salt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    inclusion_proof: TxfProof,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfProof {
    request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authenticator: Option<TxfAuthenticator>,
    merkle_path: TxfMerklePath,
    certificate: TxfCertificate,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfAuthenticator {
    public_key: String,
    signature: String,
    state_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfMerklePath {
    steps: Vec<TxfPathStep>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfPathStep {
    sibling: String,
    right: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfCertificate {
    input_record: TxfInputRecord,
    signatures: Vec<TxfValidatorSignature>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfInputRecord {
    root_hash: String,
    round: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfValidatorSignature {
    validator: String,
    signature: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfPackage {
    sender: String,
    recipient: String,
    commitment: TxfCommitment,
    serialized_commitment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    network: String,
    status: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxfCommitment {
    request_id: String,
    transaction_hash: String,
    authenticator: TxfAuthenticator,
    salt: String,
    recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

// --- encoding ------------------------------------------------------------

fn encode_file(token: &Token) -> TxfFile {
    TxfFile {
        version: TXF_VERSION.to_string(),
        state: TxfState {
            predicate: encode_txf_predicate(&token.state.predicate),
            data: hex::encode(&token.state.data),
        },
        genesis: encode_genesis(&token.genesis),
        transactions: token.transactions.iter().map(encode_transaction).collect(),
        nametags: token.nametags.clone(),
        offline_transfer: token.offline_transfer.as_ref().map(encode_package),
        status: token
            .offline_transfer
            .as_ref()
            .map(|p| p.status.as_str().to_string()),
    }
}

fn encode_genesis(genesis: &Genesis) -> TxfGenesis {
    let record = TxfGenesisRecord {
        token_id: genesis.token_id.to_string(),
        token_type: genesis.token_type.to_string(),
        recipient: genesis.recipient.to_string(),
        data: hex::encode(&genesis.data),
    };
    // The record is valid JSON by construction.
    let record_json = serde_json::to_vec(&record).unwrap_or_default();
    TxfGenesis {
        data: hex::encode(record_json),
        inclusion_proof: encode_proof(&genesis.inclusion_proof),
    }
}

fn encode_transaction(tx: &Transaction) -> TxfTransaction {
    TxfTransaction {
        previous_state_hash: tx.previous_state_hash.to_string(),
        recipient_predicate: encode_txf_predicate(&tx.recipient_predicate),
        salt: hex::encode(tx.salt),
        message: tx.message.as_ref().map(hex::encode),
        inclusion_proof: encode_proof(&tx.inclusion_proof),
    }
}

fn encode_proof(proof: &InclusionProof) -> TxfProof {
    TxfProof {
        request_id: proof.request_id.to_string(),
        transaction_hash: proof.transaction_hash.map(|h| h.to_string()),
        authenticator: proof.authenticator.as_ref().map(encode_authenticator),
        merkle_path: TxfMerklePath {
            steps: proof
                .merkle_path
                .steps
                .iter()
                .map(|s| TxfPathStep {
                    sibling: hex::encode(s.sibling),
                    right: s.right,
                })
                .collect(),
        },
        certificate: TxfCertificate {
            input_record: TxfInputRecord {
                root_hash: hex::encode(proof.certificate.input_record.root_hash),
                round: proof.certificate.input_record.round,
            },
            signatures: proof
                .certificate
                .signatures
                .iter()
                .map(|s| TxfValidatorSignature {
                    validator: hex::encode(s.validator.as_bytes()),
                    signature: hex::encode(s.signature.as_bytes()),
                })
                .collect(),
        },
    }
}

fn encode_authenticator(auth: &Authenticator) -> TxfAuthenticator {
    TxfAuthenticator {
        public_key: hex::encode(auth.public_key.as_bytes()),
        signature: hex::encode(auth.signature.as_bytes()),
        state_hash: auth.state_hash.to_string(),
    }
}

fn encode_package(package: &OfflineTransferPackage) -> TxfPackage {
    TxfPackage {
        sender: package.sender.to_string(),
        recipient: package.recipient.to_string(),
        commitment: encode_commitment(&package.commitment),
        serialized_commitment: hex::encode(&package.serialized_commitment),
        message: package.message.as_ref().map(hex::encode),
        network: package.network.as_str().to_string(),
        status: package.status.as_str().to_string(),
    }
}

fn encode_commitment(commitment: &TransferCommitment) -> TxfCommitment {
    TxfCommitment {
        request_id: commitment.request_id.to_string(),
        transaction_hash: commitment.transaction_hash.to_string(),
        authenticator: encode_authenticator(&commitment.authenticator),
        salt: hex::encode(commitment.salt),
        recipient: commitment.recipient.to_string(),
        message: commitment.message.as_ref().map(hex::encode),
    }
}

// --- decoding ------------------------------------------------------------

fn decode_file(file: &TxfFile) -> Result<Token, TokenError> {
    Ok(Token {
        genesis: decode_genesis(&file.genesis)?,
        state: TokenState {
            predicate: decode_txf_predicate(&file.state.predicate)?,
            data: bytes_field(&file.state.data, "state.data")?,
        },
        transactions: file
            .transactions
            .iter()
            .map(decode_transaction)
            .collect::<Result<_, _>>()?,
        nametags: file.nametags.clone(),
        offline_transfer: file
            .offline_transfer
            .as_ref()
            .map(decode_package)
            .transpose()?,
    })
}

fn decode_genesis(genesis: &TxfGenesis) -> Result<Genesis, TokenError> {
    let record_json = bytes_field(&genesis.data, "genesis.data")?;
    let record: TxfGenesisRecord = serde_json::from_slice(&record_json)
        .map_err(|e| TokenError::InvalidJson(format!("genesis record: {e}")))?;
    Ok(Genesis {
        token_id: TokenId::new(array32(&record.token_id, "genesis.tokenId")?),
        token_type: TokenType::new(array32(&record.token_type, "genesis.tokenType")?),
        recipient: address_field(&record.recipient)?,
        data: bytes_field(&record.data, "genesis record data")?,
        inclusion_proof: decode_proof(&genesis.inclusion_proof)?,
    })
}

fn decode_transaction(tx: &TxfTransaction) -> Result<Transaction, TokenError> {
    Ok(Transaction {
        previous_state_hash: StateHash::new(array32(
            &tx.previous_state_hash,
            "transaction.previousStateHash",
        )?),
        recipient_predicate: decode_txf_predicate(&tx.recipient_predicate)?,
        salt: array32(&tx.salt, "transaction.salt")?,
        message: tx
            .message
            .as_ref()
            .map(|m| bytes_field(m, "transaction.message"))
            .transpose()?,
        inclusion_proof: decode_proof(&tx.inclusion_proof)?,
    })
}

fn decode_proof(proof: &TxfProof) -> Result<InclusionProof, TokenError> {
    Ok(InclusionProof {
        request_id: RequestId::new(array32(&proof.request_id, "proof.requestId")?),
        transaction_hash: proof
            .transaction_hash
            .as_ref()
            .map(|h| Ok::<_, TokenError>(TxHash::new(array32(h, "proof.transactionHash")?)))
            .transpose()?,
        authenticator: proof
            .authenticator
            .as_ref()
            .map(decode_authenticator)
            .transpose()?,
        merkle_path: MerklePath {
            steps: proof
                .merkle_path
                .steps
                .iter()
                .map(|s| {
                    Ok(PathStep {
                        sibling: array32(&s.sibling, "path step sibling")?,
                        right: s.right,
                    })
                })
                .collect::<Result<_, TokenError>>()?,
        },
        certificate: Certificate {
            input_record: InputRecord {
                root_hash: array32(&proof.certificate.input_record.root_hash, "rootHash")?,
                round: proof.certificate.input_record.round,
            },
            signatures: proof
                .certificate
                .signatures
                .iter()
                .map(|s| {
                    Ok(ValidatorSignature {
                        validator: PublicKey(array32(&s.validator, "validator key")?),
                        signature: Signature(array64(&s.signature, "validator signature")?),
                    })
                })
                .collect::<Result<_, TokenError>>()?,
        },
    })
}

fn decode_authenticator(auth: &TxfAuthenticator) -> Result<Authenticator, TokenError> {
    Ok(Authenticator {
        public_key: PublicKey(array32(&auth.public_key, "authenticator.publicKey")?),
        signature: Signature(array64(&auth.signature, "authenticator.signature")?),
        state_hash: StateHash::new(array32(&auth.state_hash, "authenticator.stateHash")?),
    })
}

fn decode_package(package: &TxfPackage) -> Result<OfflineTransferPackage, TokenError> {
    let status = PackageStatus::from_str_tag(&package.status)
        .ok_or_else(|| TokenError::InvalidJson(format!("unknown status {:?}", package.status)))?;
    let network = NetworkId::from_str_tag(&package.network)
        .ok_or_else(|| TokenError::InvalidJson(format!("unknown network {:?}", package.network)))?;
    Ok(OfflineTransferPackage {
        sender: address_field(&package.sender)?,
        recipient: address_field(&package.recipient)?,
        commitment: decode_commitment(&package.commitment)?,
        serialized_commitment: bytes_field(
            &package.serialized_commitment,
            "serializedCommitment",
        )?,
        message: package
            .message
            .as_ref()
            .map(|m| bytes_field(m, "package.message"))
            .transpose()?,
        network,
        status,
    })
}

fn decode_commitment(commitment: &TxfCommitment) -> Result<TransferCommitment, TokenError> {
    Ok(TransferCommitment {
        request_id: RequestId::new(array32(&commitment.request_id, "commitment.requestId")?),
        transaction_hash: TxHash::new(array32(
            &commitment.transaction_hash,
            "commitment.transactionHash",
        )?),
        authenticator: decode_authenticator(&commitment.authenticator)?,
        salt: array32(&commitment.salt, "commitment.salt")?,
        recipient: address_field(&commitment.recipient)?,
        message: commitment
            .message
            .as_ref()
            .map(|m| bytes_field(m, "commitment.message"))
            .transpose()?,
    })
}

// --- hex field helpers ---------------------------------------------------

fn bytes_field(s: &str, field: &str) -> Result<Vec<u8>, TokenError> {
    hex::decode(s).map_err(|e| TokenError::InvalidJson(format!("{field}: {e}")))
}

fn array32(s: &str, field: &str) -> Result<[u8; 32], TokenError> {
    let bytes = bytes_field(s, field)?;
    bytes
        .try_into()
        .map_err(|_| TokenError::InvalidJson(format!("{field}: expected 32 bytes")))
}

fn array64(s: &str, field: &str) -> Result<[u8; 64], TokenError> {
    let bytes = bytes_field(s, field)?;
    bytes
        .try_into()
        .map_err(|_| TokenError::InvalidJson(format!("{field}: expected 64 bytes")))
}

fn address_field(s: &str) -> Result<Address, TokenError> {
    Address::parse(s).map_err(|e| TokenError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::transaction_payload_hash;
    use opal_crypto::{derive_request_id, keypair_from_seed, sign_message};
    use opal_predicates::Predicate;
    use opal_types::KeyPair;

    fn validators() -> Vec<KeyPair> {
        (0..3).map(|i| keypair_from_seed(&[80 + i; 32])).collect()
    }

    fn certify(validators: &[KeyPair], root: [u8; 32]) -> Certificate {
        let input_record = InputRecord { root_hash: root, round: 3 };
        let message = input_record.canonical_bytes();
        Certificate {
            signatures: validators
                .iter()
                .map(|kp| ValidatorSignature {
                    validator: kp.public.clone(),
                    signature: sign_message(&message, &kp.private),
                })
                .collect(),
            input_record,
        }
    }

    fn exclusion_proof(validators: &[KeyPair], request_id: RequestId) -> InclusionProof {
        let merkle_path = MerklePath { steps: Vec::new() };
        let root = merkle_path.compute_root(&request_id, None);
        InclusionProof {
            request_id,
            transaction_hash: None,
            authenticator: None,
            merkle_path,
            certificate: certify(validators, root),
        }
    }

    fn minted_token(owner: &KeyPair) -> Token {
        let vs = validators();
        let predicate = Predicate::unmasked(&owner.private);
        let data = br#"{"name":"Test"}"#.to_vec();
        let state_hash = TokenState::new(predicate.clone(), data.clone()).state_hash();
        let request_id = derive_request_id(&owner.public, &state_hash);
        let genesis = Genesis::new(
            TokenId::new([0x11; 32]),
            TokenType::new([0x22; 32]),
            predicate.address(),
            data,
            exclusion_proof(&vs, request_id),
        );
        Token::mint(genesis, predicate).unwrap()
    }

    fn token_with_transfer(owner: &KeyPair, recipient: &KeyPair) -> Token {
        let vs = validators();
        let mut token = minted_token(owner);
        let recipient_predicate = Predicate::unmasked(&recipient.private);
        let previous_state_hash = token.state.state_hash();
        let salt = [0x33; 32];
        let tx_hash = transaction_payload_hash(
            &previous_state_hash,
            &recipient_predicate.address(),
            &salt,
            Some(b"thanks"),
        );
        let request_id = derive_request_id(&owner.public, &previous_state_hash);
        let merkle_path = MerklePath {
            steps: vec![PathStep { sibling: [0x44; 32], right: false }],
        };
        let root = merkle_path.compute_root(&request_id, Some(&tx_hash));
        let proof = InclusionProof {
            request_id,
            transaction_hash: Some(tx_hash),
            authenticator: Some(Authenticator {
                public_key: owner.public.clone(),
                signature: sign_message(tx_hash.as_bytes(), &owner.private),
                state_hash: previous_state_hash,
            }),
            merkle_path,
            certificate: certify(&vs, root),
        };
        token.transactions.push(Transaction {
            previous_state_hash,
            recipient_predicate: recipient_predicate.clone(),
            salt,
            message: Some(b"thanks".to_vec()),
            inclusion_proof: proof.clone(),
        });
        token.state = TokenState::new(recipient_predicate, token.state.data.clone());

        // Sender's copy also carries the package that produced the transfer.
        let commitment = TransferCommitment {
            request_id,
            transaction_hash: tx_hash,
            authenticator: proof.authenticator.clone().unwrap(),
            salt,
            recipient: token.state.predicate.address(),
            message: Some(b"thanks".to_vec()),
        };
        token.offline_transfer = Some(OfflineTransferPackage {
            sender: Predicate::unmasked(&owner.private).address(),
            recipient: commitment.recipient,
            serialized_commitment: bincode::serialize(&commitment).unwrap(),
            commitment,
            message: Some(b"thanks".to_vec()),
            network: NetworkId::Dev,
            status: PackageStatus::Confirmed,
        });
        token
    }

    #[test]
    fn minted_token_roundtrip() {
        let owner = keypair_from_seed(&[1u8; 32]);
        let token = minted_token(&owner);
        let text = write_token(&token).unwrap();
        let back = read_token(&text).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn full_token_roundtrip() {
        let owner = keypair_from_seed(&[1u8; 32]);
        let recipient = keypair_from_seed(&[2u8; 32]);
        let token = token_with_transfer(&owner, &recipient);
        let text = write_token(&token).unwrap();
        let back = read_token(&text).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn reparse_does_not_perturb_request_id() {
        let owner = keypair_from_seed(&[1u8; 32]);
        let token = minted_token(&owner);
        let before = derive_request_id(&owner.public, &token.state.state_hash());

        let text = write_token(&token).unwrap();
        let back = read_token(&text).unwrap();
        let after = derive_request_id(&owner.public, &back.state.state_hash());
        assert_eq!(before, after);
    }

    #[test]
    fn status_field_mirrors_package() {
        let owner = keypair_from_seed(&[1u8; 32]);
        let recipient = keypair_from_seed(&[2u8; 32]);
        let token = token_with_transfer(&owner, &recipient);
        let text = write_token(&token).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "CONFIRMED");
        assert_eq!(value["version"], "2.0");
        assert_eq!(value["state"]["predicate"][0], 1);
    }

    #[test]
    fn unsupported_version_rejected() {
        let owner = keypair_from_seed(&[1u8; 32]);
        let text = write_token(&minted_token(&owner)).unwrap();
        let text = text.replace("\"2.0\"", "\"3.0\"");
        assert!(matches!(read_token(&text), Err(TokenError::InvalidJson(_))));
    }

    #[test]
    fn garbage_rejected() {
        assert!(matches!(
            read_token("not json at all"),
            Err(TokenError::InvalidJson(_))
        ));
        assert!(matches!(read_token("{}"), Err(TokenError::InvalidJson(_))));
    }

    #[test]
    fn corrupted_hex_rejected() {
        let owner = keypair_from_seed(&[1u8; 32]);
        let token = minted_token(&owner);
        let mut value: serde_json::Value =
            serde_json::from_str(&write_token(&token).unwrap()).unwrap();
        value["state"]["data"] = serde_json::Value::String("zz".into());
        let text = value.to_string();
        assert!(matches!(read_token(&text), Err(TokenError::InvalidJson(_))));
    }

    #[test]
    fn roundtrip_through_disk() {
        let owner = keypair_from_seed(&[1u8; 32]);
        let token = minted_token(&owner);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.txf");

        std::fs::write(&path, write_token(&token).unwrap()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read_token(&text).unwrap(), token);
    }
}
