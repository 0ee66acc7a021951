//! verblix-storage
//!
//! Durable client-local key/value storage. Values are whole documents
//! (the client stores one JSON registry per key), written atomically.

pub mod error;
pub mod objects;
pub mod state;
