//! verblix-core
//!
//! Pure domain types, the relay wire protocol, and local storage key
//! conventions. No HTTP or provider dependency; this is the shared
//! vocabulary of the server and the client.

pub mod error;
pub mod models;
pub mod storage_keys;
