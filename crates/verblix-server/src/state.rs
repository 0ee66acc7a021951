use std::sync::Arc;

use jiff::SignedDuration;
use verblix_model::stream::ModelStream;

use crate::sessions::SessionStore;
use crate::users::UserStore;

/// Shared application state, injected into all route handlers via Axum state.
///
/// The model client is read-only; users and sessions are the only mutable
/// state shared between requests.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ModelStream>,
    pub users: UserStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(model: Arc<dyn ModelStream>, session_ttl: SignedDuration, secure_cookies: bool) -> Self {
        Self {
            model,
            users: UserStore::default(),
            sessions: SessionStore::new(session_ttl, secure_cookies),
        }
    }
}
