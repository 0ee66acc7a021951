use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// The provider failed to start or continue producing the reply.
    #[error("{0}")]
    Upstream(String),

    #[error("invalid conversation: {0}")]
    InvalidHistory(String),
}
