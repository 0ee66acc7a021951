//! In-memory user registry.
//!
//! Accounts live for the lifetime of the process. Passwords are stored as
//! salted SHA-256 digests.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("username already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid credentials")]
    InvalidCredentials,
}

struct UserRecord {
    salt: String,
    password_hash: String,
}

#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl UserStore {
    pub async fn register(&self, username: &str, password: &str) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(UserError::AlreadyExists(username.to_string()));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let password_hash = hash_password(&salt, password);
        users.insert(
            username.to_string(),
            UserRecord {
                salt,
                password_hash,
            },
        );
        tracing::info!(username, "user registered");
        Ok(())
    }

    pub async fn verify(&self, username: &str, password: &str) -> Result<(), UserError> {
        let users = self.users.read().await;
        let record = users.get(username).ok_or(UserError::InvalidCredentials)?;
        if hash_password(&record.salt, password) == record.password_hash {
            Ok(())
        } else {
            Err(UserError::InvalidCredentials)
        }
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
