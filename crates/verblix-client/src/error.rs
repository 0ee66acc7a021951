use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server refused the request and said why.
    #[error("{0}")]
    Rejected(String),

    #[error("unexpected response status {0}")]
    Status(u16),

    #[error("invalid server url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no conversation with id {0}")]
    UnknownConversation(String),

    #[error("turn content is empty")]
    EmptyTurn,
}
