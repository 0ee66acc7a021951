//! verblix-client
//!
//! The chat side of Verblix: keeps conversations in local storage, sends
//! messages to the relay and renders streamed replies as they arrive.

pub mod api;
pub mod app;
pub mod commands;
pub mod config;
pub mod decoder;
pub mod error;
pub mod markup;
pub mod response;
pub mod store;
pub mod terminal;
pub mod view;
