use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("decision invariant violated: {0}")]
    InvariantViolation(String),
}
