//! Conversation history preparation.
//!
//! The client sends the whole conversation, ending with the user turn that
//! carries the new prompt. The prompt goes upstream separately, so that
//! turn must not also appear in the context or the provider sees it twice.
//! Providers also require strictly alternating turns that start with the
//! user and end with the model.

use verblix_core::models::turn::{Role, Turn};

/// Build the prior-context turns to send alongside the prompt.
///
/// - blank turns are dropped
/// - leading model turns are dropped
/// - consecutive turns with the same role are merged
/// - trailing user turns are dropped; the last of these is the current
///   prompt, and any before it never got an answer
pub fn prepare_history(history: &[Turn]) -> Vec<Turn> {
    let mut prepared: Vec<Turn> = Vec::with_capacity(history.len());

    for turn in history {
        if turn.content.trim().is_empty() {
            continue;
        }
        if prepared.is_empty() && turn.role == Role::Model {
            continue;
        }
        match prepared.last_mut() {
            Some(previous) if previous.role == turn.role => {
                previous.content.push_str("\n\n");
                previous.content.push_str(&turn.content);
            }
            _ => prepared.push(turn.clone()),
        }
    }

    if prepared.last().is_some_and(|t| t.role == Role::User) {
        prepared.pop();
    }

    prepared
}
