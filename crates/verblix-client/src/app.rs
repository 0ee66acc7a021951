//! The chat controller: user actions, the in-flight stream and the store.

use bytes::Bytes;
use futures::StreamExt;

use verblix_core::models::auth::{Credentials, UserInfo};
use verblix_core::models::conversation::ConversationId;
use verblix_core::models::request::ChatStreamRequest;
use verblix_core::models::turn::{Role, Turn};
use verblix_storage::objects::KeyValueStore;

use crate::api::{ByteStream, Opened, RelayClient};
use crate::commands::{self, Command};
use crate::decoder::FrameDecoder;
use crate::error::ClientError;
use crate::markup::{Affordance, Rendered};
use crate::response::{Progress, ResponseAssembler};
use crate::store::ChatSessionStore;
use crate::view::ChatView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A response being received for one conversation.
struct InFlight {
    conversation: ConversationId,
    body: ByteStream,
    decoder: FrameDecoder,
    assembler: ResponseAssembler,
}

/// Drives one chat session. All state changes happen on the caller's
/// event loop; at most one response streams at a time.
pub struct ChatApp<S: KeyValueStore, V: ChatView> {
    store: ChatSessionStore<S>,
    view: V,
    client: RelayClient,
    user: Option<String>,
    in_flight: Option<InFlight>,
    last_response: Option<Rendered>,
}

impl<S: KeyValueStore, V: ChatView> ChatApp<S, V> {
    pub fn new(store: ChatSessionStore<S>, view: V, client: RelayClient) -> Self {
        Self {
            store,
            view,
            client,
            user: None,
            in_flight: None,
            last_response: None,
        }
    }

    pub fn store(&self) -> &ChatSessionStore<S> {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_streaming(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Ask the server who we are.
    pub async fn refresh_identity(&mut self) {
        match self.client.status().await {
            Ok(status) => self.user = status.user.map(|user| user.username),
            Err(e) => self
                .view
                .show_notice(&format!("Could not reach {}: {e}", self.client.base_url())),
        }
        self.view.show_identity(self.user.as_deref());
    }

    /// Redraw the conversation list and the active conversation.
    pub fn render_all(&mut self) {
        self.view
            .show_conversations(&self.store.conversations(), self.store.active());
        let Some(conversation) = self.store.active_conversation() else {
            return;
        };
        self.view.show_title(&conversation.title);
        self.view.reload(&conversation.history);
        self.last_response = conversation
            .history
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Model)
            .map(|turn| Rendered::parse(&turn.content));
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Some(command) => self.handle(command).await,
            None => Flow::Continue,
        }
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Send(text) => self.send(&text).await,
            Command::New => {
                self.store.create_conversation();
                self.detach_if_stale();
                self.render_all();
            }
            Command::List => {
                self.view
                    .show_conversations(&self.store.conversations(), self.store.active());
            }
            Command::Switch(n) => match self.nth_conversation(n) {
                Some(id) => self.switch(&id),
                None => self.view.show_notice(&format!("There is no conversation {n}.")),
            },
            Command::Delete(n) => {
                let target = match n {
                    Some(n) => self.nth_conversation(n),
                    None => Some(self.store.active().clone()),
                };
                match target {
                    Some(id) => self.delete(&id),
                    None => self.view.show_notice("There is no such conversation."),
                }
            }
            Command::Clear => self.clear_active(),
            Command::DeleteAll => self.delete_all(),
            Command::Stop => self.stop(),
            Command::Copy(n) => self.copy(n),
            Command::Register { username, password } => {
                let credentials = Credentials { username, password };
                let result = self.client.register(&credentials).await;
                self.signed_in(result);
            }
            Command::Login { username, password } => {
                let credentials = Credentials { username, password };
                let result = self.client.login(&credentials).await;
                self.signed_in(result);
            }
            Command::Logout => self.logout().await,
            Command::WhoAmI => self.view.show_identity(self.user.as_deref()),
            Command::Help => self.view.show_info(commands::HELP),
            Command::Quit => return Flow::Quit,
            Command::Invalid(reason) => self.view.show_notice(&reason),
        }
        Flow::Continue
    }

    /// Send a message from the active conversation and start streaming the
    /// reply.
    pub async fn send(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if self.user.is_none() {
            self.view
                .show_notice("Please log in first: /login USER PASS or /register USER PASS.");
            return;
        }
        if self.in_flight.is_some() {
            self.view
                .show_notice("A response is still streaming. Wait for it or /stop it.");
            return;
        }

        let id = self.store.active().clone();
        if let Err(e) = self.store.append_turn(&id, Turn::user(text)) {
            self.view.show_notice(&e.to_string());
            return;
        }
        self.view.show_user_turn(text);
        let Some(conversation) = self.store.get(&id) else {
            return;
        };
        self.view.show_title(&conversation.title);
        let request = ChatStreamRequest {
            message: text.to_string(),
            history: conversation.history.clone(),
        };
        self.view
            .show_conversations(&self.store.conversations(), self.store.active());

        match self.client.open_stream(&request).await {
            Ok(Opened::Stream(body)) => self.begin_stream(body),
            Ok(Opened::SessionExpired) => self.session_expired(),
            Err(ClientError::Rejected(reason)) => self.view.show_notice(&reason),
            Err(e) => {
                tracing::warn!(error = %e, "relay request failed");
                self.view.show_notice(&format!("Error: {e}"));
            }
        }
    }

    /// Attach a response body to the active conversation.
    pub fn begin_stream(&mut self, body: ByteStream) {
        self.view.begin_response();
        self.in_flight = Some(InFlight {
            conversation: self.store.active().clone(),
            body,
            decoder: FrameDecoder::new(),
            assembler: ResponseAssembler::new(),
        });
    }

    /// Wait for the next body chunk of the in-flight response. Never
    /// resolves when nothing is streaming.
    pub async fn next_chunk(&mut self) -> Option<Result<Bytes, ClientError>> {
        match self.in_flight.as_mut() {
            Some(flight) => flight.body.next().await,
            None => std::future::pending().await,
        }
    }

    /// Feed a result of [`next_chunk`](Self::next_chunk); `None` means the
    /// body closed.
    pub fn on_chunk(&mut self, chunk: Option<Result<Bytes, ClientError>>) {
        let Some(flight) = self.in_flight.as_mut() else {
            return;
        };

        let (frames, closed, lost) = match chunk {
            Some(Ok(bytes)) => (flight.decoder.push(&bytes), false, None),
            Some(Err(e)) => (flight.decoder.finish(), true, Some(e)),
            None => (flight.decoder.finish(), true, None),
        };

        let mut ended = closed;
        for frame in frames {
            if flight.assembler.apply(frame, &mut self.view) == Progress::Ended {
                ended = true;
                break;
            }
        }

        if ended {
            self.complete();
        }
        if let Some(e) = lost {
            tracing::warn!(error = %e, "response stream broke off");
            self.view.show_notice(&format!("Connection lost: {e}"));
        }
    }

    /// Drive the in-flight response to completion.
    pub async fn pump(&mut self) {
        while self.is_streaming() {
            let chunk = self.next_chunk().await;
            self.on_chunk(chunk);
        }
    }

    /// Finalize the in-flight response with whatever arrived so far.
    pub fn stop(&mut self) {
        if self.in_flight.is_none() {
            self.view.show_notice("Nothing is streaming.");
            return;
        }
        tracing::info!("response stopped by user");
        self.complete();
    }

    pub fn switch(&mut self, id: &ConversationId) {
        if self.store.switch_active(id) {
            self.detach_if_stale();
            self.render_all();
        }
    }

    /// Delete a conversation after the user confirms.
    pub fn delete(&mut self, id: &ConversationId) {
        let Some(conversation) = self.store.get(id) else {
            return;
        };
        let prompt = format!("Are you sure you want to delete \"{}\"?", conversation.title);
        if !self.view.confirm(&prompt) {
            return;
        }
        self.store.delete_conversation(id);
        self.detach_if_stale();
        self.render_all();
    }

    /// Clear the active conversation's history after the user confirms.
    pub fn clear_active(&mut self) {
        let id = self.store.active().clone();
        let Some(conversation) = self.store.get(&id) else {
            return;
        };
        let prompt = format!("Clear history for \"{}\"?", conversation.title);
        if !self.view.confirm(&prompt) {
            return;
        }
        self.store.clear_history(&id);
        if self
            .in_flight
            .as_ref()
            .is_some_and(|flight| flight.conversation == id)
        {
            self.detach();
        }
        self.render_all();
    }

    pub fn delete_all(&mut self) {
        if !self.view.confirm("Are you sure you want to delete ALL chats?") {
            return;
        }
        self.store.delete_all();
        self.detach_if_stale();
        self.render_all();
    }

    fn copy(&mut self, n: Option<usize>) {
        let affordance = match n {
            Some(n) => Affordance::CopyCode(n),
            None => Affordance::CopyAll,
        };
        let text = self
            .last_response
            .as_ref()
            .and_then(|rendered| rendered.copy_text(affordance));
        match (text, n) {
            (Some(text), _) => self.view.show_info(text),
            (None, Some(n)) => self.view.show_notice(&format!("The last response has no code block {n}.")),
            (None, None) => self.view.show_notice("There is no response to copy yet."),
        }
    }

    fn signed_in(&mut self, result: Result<UserInfo, ClientError>) {
        match result {
            Ok(user) => {
                tracing::info!(username = %user.username, "signed in");
                self.user = Some(user.username);
                self.view.show_identity(self.user.as_deref());
            }
            Err(e) => self.view.show_notice(&e.to_string()),
        }
    }

    async fn logout(&mut self) {
        if let Err(e) = self.client.logout().await {
            tracing::warn!(error = %e, "logout request failed");
        }
        self.forget_session();
        self.view.show_identity(None);
    }

    /// The relay answered 401: drop the session and make the user log in
    /// again.
    fn session_expired(&mut self) {
        self.forget_session();
        self.view.session_expired();
    }

    fn forget_session(&mut self) {
        self.user = None;
        self.detach();
        if let Err(e) = self.client.reset_session() {
            tracing::warn!(error = %e, "failed to reset http client");
        }
    }

    fn nth_conversation(&self, n: usize) -> Option<ConversationId> {
        self.store
            .conversations()
            .into_iter()
            .nth(n.checked_sub(1)?)
            .map(|summary| summary.id)
    }

    /// Drop the in-flight response if its conversation is no longer the
    /// active one.
    fn detach_if_stale(&mut self) {
        let stale = self.in_flight.as_ref().is_some_and(|flight| {
            flight.conversation != *self.store.active() || !self.store.contains(&flight.conversation)
        });
        if stale {
            self.detach();
        }
    }

    fn detach(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            tracing::info!(conversation = %flight.conversation, "detached in-flight response");
        }
    }

    /// Finalize the in-flight response and persist it if its conversation
    /// is still there and still active.
    fn complete(&mut self) {
        let Some(flight) = self.in_flight.take() else {
            return;
        };
        let assembled = flight.assembler.finalize(&mut self.view);
        self.last_response = Some(assembled.rendered);

        let Some(text) = assembled.turn_text else {
            return;
        };
        let id = flight.conversation;
        if *self.store.active() != id || !self.store.contains(&id) {
            tracing::info!(conversation = %id, "discarding response for inactive conversation");
            return;
        }
        if let Err(e) = self.store.append_turn(&id, Turn::model(text)) {
            tracing::warn!(error = %e, "failed to record response");
        }
    }
}
