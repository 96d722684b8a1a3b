use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredicateError {
    #[error("malformed predicate: {0}")]
    Malformed(String),

    #[error("unknown predicate variant tag {0}")]
    UnknownVariant(u8),

    #[error("unknown signature algorithm tag {0}")]
    UnknownAlgorithm(u8),
}
