use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProofError {
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}
