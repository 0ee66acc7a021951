use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {key:?}")]
    InvalidKey { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read {key}: {source}")]
    Read { key: String, source: io::Error },

    #[error("failed to write {key}: {source}")]
    Write { key: String, source: io::Error },

    #[error("failed to delete {key}: {source}")]
    Delete { key: String, source: io::Error },
}
