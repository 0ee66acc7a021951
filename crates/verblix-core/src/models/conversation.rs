use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::turn::Turn;
use crate::storage_keys;

/// Maximum number of characters kept when deriving a title from a message.
pub const TITLE_MAX_CHARS: usize = 30;

/// The persisted registry: conversation id → conversation.
pub type Registry = BTreeMap<ConversationId, Conversation>;

/// Opaque conversation identifier of the form `chat_<unix-millis>`.
///
/// Ordered by the embedded creation timestamp, so the greatest id is the
/// most recently created conversation. Ids that don't carry a timestamp
/// sort first, then lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_millis(created_millis: i64) -> Self {
        Self(storage_keys::conversation_id(created_millis))
    }

    /// Creation timestamp encoded in the id, or 0 when the id has none.
    pub fn created_millis(&self) -> i64 {
        self.0
            .strip_prefix(storage_keys::CONVERSATION_ID_PREFIX)
            .and_then(|rest| rest.parse().ok())
            .unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for ConversationId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.created_millis()
            .cmp(&other.created_millis())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ConversationId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, independently persisted sequence of turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub history: Vec<Turn>,
    pub title: String,
    /// Set once the title has been derived from the first user message.
    /// Older registries don't carry it; see [`Conversation::settle_title_flag`].
    #[serde(rename = "titleFixed", default)]
    pub title_fixed: bool,
}

impl Conversation {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            history: Vec::new(),
            title: title.into(),
            title_fixed: false,
        }
    }

    /// Infer the title flag for conversations loaded from data that predates it.
    pub fn settle_title_flag(&mut self) {
        if !self.title_fixed
            && (!self.history.is_empty()
                || !self.title.starts_with(storage_keys::DEFAULT_TITLE_PREFIX))
        {
            self.title_fixed = true;
        }
    }
}

/// Derive a conversation title from the first user message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters and marks truncation
/// with a trailing `...`.
pub fn derive_title(message: &str) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
