//! Chat Session Store: the conversation registry and its persistence.

use verblix_core::models::conversation::{Conversation, ConversationId, Registry, derive_title};
use verblix_core::models::turn::{Role, Turn};
use verblix_core::storage_keys;
use verblix_storage::objects::KeyValueStore;
use verblix_storage::state::{load_state, save_state};

use crate::error::StoreError;

/// Row of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub turns: usize,
}

/// Owns every conversation and which one is active.
///
/// The registry is never empty and `active` always keys an existing
/// conversation. Every mutation is written to storage before it returns;
/// storage failures are logged and otherwise ignored.
pub struct ChatSessionStore<S: KeyValueStore> {
    storage: S,
    registry: Registry,
    active: ConversationId,
    last_created_millis: i64,
}

impl<S: KeyValueStore> ChatSessionStore<S> {
    /// Load the persisted registry, or start with one fresh conversation
    /// when it is absent, empty or unreadable.
    pub fn load(storage: S) -> Self {
        let registry = match load_state::<Registry>(&storage, storage_keys::CHATS) {
            Ok(Some(registry)) => registry,
            Ok(None) => Registry::new(),
            Err(e) => {
                tracing::warn!(error = %e, "stored conversations unreadable, starting fresh");
                Registry::new()
            }
        };

        let mut registry = registry;
        for conversation in registry.values_mut() {
            conversation.settle_title_flag();
        }

        let last_created_millis = registry
            .keys()
            .map(ConversationId::created_millis)
            .max()
            .unwrap_or(0);

        match registry.keys().next_back().cloned() {
            Some(newest) => {
                tracing::info!(conversations = registry.len(), active = %newest, "loaded conversations");
                Self {
                    storage,
                    registry,
                    active: newest,
                    last_created_millis,
                }
            }
            None => {
                let mut store = Self {
                    storage,
                    registry,
                    active: ConversationId::new(""),
                    last_created_millis,
                };
                store.create_conversation();
                store
            }
        }
    }

    /// Create an empty conversation, make it active and return its id.
    pub fn create_conversation(&mut self) -> ConversationId {
        let millis = jiff::Timestamp::now()
            .as_millisecond()
            .max(self.last_created_millis + 1);
        self.last_created_millis = millis;

        let id = ConversationId::from_millis(millis);
        let title = storage_keys::default_title(self.registry.len() + 1);
        self.registry.insert(id.clone(), Conversation::new(title));
        self.active = id.clone();
        self.persist();

        tracing::debug!(%id, "created conversation");
        id
    }

    /// Make `id` active. Returns false when it already is or doesn't exist.
    pub fn switch_active(&mut self, id: &ConversationId) -> bool {
        if *id == self.active || !self.registry.contains_key(id) {
            return false;
        }
        self.active = id.clone();
        true
    }

    /// Remove a conversation. If it was active, the newest remaining one
    /// becomes active, or a fresh one is created when none remain.
    ///
    /// The caller is responsible for asking the user first.
    pub fn delete_conversation(&mut self, id: &ConversationId) -> bool {
        if self.registry.remove(id).is_none() {
            return false;
        }

        if *id == self.active {
            match self.registry.keys().next_back().cloned() {
                Some(newest) => self.active = newest,
                None => {
                    // Persists.
                    self.create_conversation();
                    return true;
                }
            }
        }
        self.persist();
        true
    }

    /// Remove every conversation and its storage, then start a fresh one.
    pub fn delete_all(&mut self) {
        self.registry.clear();
        if let Err(e) = self.storage.remove(storage_keys::CHATS) {
            tracing::warn!(error = %e, "failed to remove stored conversations");
        }
        self.create_conversation();
    }

    /// Empty a conversation's turns. Its title stays.
    pub fn clear_history(&mut self, id: &ConversationId) -> bool {
        let Some(conversation) = self.registry.get_mut(id) else {
            return false;
        };
        conversation.history.clear();
        self.persist();
        true
    }

    /// Append a turn. The first user turn of a conversation names it.
    pub fn append_turn(&mut self, id: &ConversationId, turn: Turn) -> Result<(), StoreError> {
        if turn.content.is_empty() {
            return Err(StoreError::EmptyTurn);
        }
        let conversation = self
            .registry
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownConversation(id.to_string()))?;

        if turn.role == Role::User && conversation.history.is_empty() && !conversation.title_fixed {
            conversation.title = derive_title(&turn.content);
            conversation.title_fixed = true;
        }
        conversation.history.push(turn);
        self.persist();
        Ok(())
    }

    pub fn active(&self) -> &ConversationId {
        &self.active
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.registry.get(&self.active)
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.registry.get(id)
    }

    pub fn contains(&self, id: &ConversationId) -> bool {
        self.registry.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Conversations, newest first.
    pub fn conversations(&self) -> Vec<ConversationSummary> {
        self.registry
            .iter()
            .rev()
            .map(|(id, conversation)| ConversationSummary {
                id: id.clone(),
                title: conversation.title.clone(),
                turns: conversation.history.len(),
            })
            .collect()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        if let Err(e) = save_state(&mut self.storage, storage_keys::CHATS, &self.registry) {
            tracing::warn!(error = %e, "failed to persist conversations");
        }
    }
}
