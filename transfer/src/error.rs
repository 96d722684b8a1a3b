use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("sender secret does not control the current predicate")]
    NotOwner,

    #[error("package recipient does not match caller's predicate")]
    RecipientMismatch,

    #[error("package was already absorbed: token state has moved past the committed state")]
    AlreadyAbsorbed,

    #[error("proof does not match the packaged commitment: {0}")]
    ProofMismatch(String),

    #[error("packaging error: {0}")]
    Packaging(String),
}
