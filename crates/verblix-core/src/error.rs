use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bad Request: No message provided.")]
    MissingMessage,

    #[error("Bad Request: Invalid history format.")]
    InvalidHistory,
}
