#![allow(dead_code)]

use std::collections::VecDeque;

use verblix_client::markup::Rendered;
use verblix_client::store::ConversationSummary;
use verblix_client::view::{ChatView, RenderTarget};
use verblix_core::models::conversation::ConversationId;
use verblix_core::models::turn::Turn;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin,
    Fragment(String),
    Error(String),
    Finalized(Rendered),
    Conversations(Vec<ConversationSummary>, ConversationId),
    Title(String),
    Reload(Vec<Turn>),
    UserTurn(String),
    Notice(String),
    Info(String),
    Confirm(String),
    SessionExpired,
    Identity(Option<String>),
}

/// Records everything shown; answers confirmations from a queue
/// (default yes).
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<Event>,
    pub answers: VecDeque<bool>,
}

impl RecordingView {
    pub fn fragments(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Fragment(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn finalized(&self) -> Vec<&Rendered> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Finalized(rendered) => Some(rendered),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Notice(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn saw(&self, wanted: &Event) -> bool {
        self.events.contains(wanted)
    }
}

impl RenderTarget for RecordingView {
    fn begin_response(&mut self) {
        self.events.push(Event::Begin);
    }

    fn append_fragment(&mut self, text: &str) {
        self.events.push(Event::Fragment(text.to_string()));
    }

    fn append_error(&mut self, text: &str) {
        self.events.push(Event::Error(text.to_string()));
    }

    fn finalize(&mut self, rendered: &Rendered) {
        self.events.push(Event::Finalized(rendered.clone()));
    }
}

impl ChatView for RecordingView {
    fn show_conversations(&mut self, conversations: &[ConversationSummary], active: &ConversationId) {
        self.events
            .push(Event::Conversations(conversations.to_vec(), active.clone()));
    }

    fn show_title(&mut self, title: &str) {
        self.events.push(Event::Title(title.to_string()));
    }

    fn reload(&mut self, turns: &[Turn]) {
        self.events.push(Event::Reload(turns.to_vec()));
    }

    fn show_user_turn(&mut self, text: &str) {
        self.events.push(Event::UserTurn(text.to_string()));
    }

    fn show_notice(&mut self, text: &str) {
        self.events.push(Event::Notice(text.to_string()));
    }

    fn show_info(&mut self, text: &str) {
        self.events.push(Event::Info(text.to_string()));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.events.push(Event::Confirm(prompt.to_string()));
        self.answers.pop_front().unwrap_or(true)
    }

    fn session_expired(&mut self) {
        self.events.push(Event::SessionExpired);
    }

    fn show_identity(&mut self, username: Option<&str>) {
        self.events.push(Event::Identity(username.map(str::to_string)));
    }
}
