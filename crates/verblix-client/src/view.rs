//! What the chat needs from whatever displays it.

use verblix_core::models::conversation::ConversationId;
use verblix_core::models::turn::Turn;

use crate::markup::Rendered;
use crate::store::ConversationSummary;

/// Receives a single response as it streams in.
pub trait RenderTarget {
    /// A new response bubble starts.
    fn begin_response(&mut self);

    /// Show raw fragment text immediately.
    fn append_fragment(&mut self, text: &str);

    /// Show an in-stream error notice inside the response.
    fn append_error(&mut self, text: &str);

    /// The response is complete; replace the raw text with its markup.
    fn finalize(&mut self, rendered: &Rendered);
}

/// The whole chat surface.
pub trait ChatView: RenderTarget {
    fn show_conversations(&mut self, conversations: &[ConversationSummary], active: &ConversationId);

    fn show_title(&mut self, title: &str);

    /// Redraw a conversation from its first turn. Model turns are shown as
    /// finalized markup.
    fn reload(&mut self, turns: &[Turn]);

    fn show_user_turn(&mut self, text: &str);

    /// Inline warning outside any response.
    fn show_notice(&mut self, text: &str);

    /// Plain output: help, copied text.
    fn show_info(&mut self, text: &str);

    /// Ask the user to confirm a destructive action.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// The server no longer recognizes the session; the user must log in.
    fn session_expired(&mut self);

    fn show_identity(&mut self, username: Option<&str>);
}
