//! Local storage key conventions.
//!
//! Pure string functions. These define the canonical keys and identifiers
//! the client writes to durable local storage.

/// Key holding the serialized conversation registry.
pub const CHATS: &str = "aiChatbotSessions";

pub const CONVERSATION_ID_PREFIX: &str = "chat_";

pub const DEFAULT_TITLE_PREFIX: &str = "Chat ";

pub fn conversation_id(created_millis: i64) -> String {
    format!("{CONVERSATION_ID_PREFIX}{created_millis}")
}

pub fn default_title(number: usize) -> String {
    format!("{DEFAULT_TITLE_PREFIX}{number}")
}
