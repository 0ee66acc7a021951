//! verblix-model
//!
//! Model Stream Adapter: turns a prompt plus prior turns into a lazy,
//! ordered sequence of reply fragments from the upstream provider.

pub mod bedrock;
pub mod error;
pub mod history;
pub mod prompt;
pub mod stream;
