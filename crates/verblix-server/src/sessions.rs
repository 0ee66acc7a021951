//! In-memory session registry and the session cookie.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use jiff::{SignedDuration, Timestamp};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "verblix.sid";

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: Timestamp,
}

/// Server-side sessions keyed by an opaque random id.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: SignedDuration,
    secure_cookies: bool,
}

impl SessionStore {
    pub fn new(ttl: SignedDuration, secure_cookies: bool) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            secure_cookies,
        }
    }

    /// Start a session for `username` and return its id. Expired sessions
    /// are swept first, so abandoned cookies don't pile up.
    pub async fn start(&self, username: &str) -> String {
        let now = Timestamp::now();
        let id = Uuid::new_v4().simple().to_string();
        let session = Session {
            username: username.to_string(),
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "swept expired sessions");
        }
        sessions.insert(id.clone(), session);
        id
    }

    /// Number of sessions held, live or not yet swept.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Username for a live session. Expired sessions are evicted.
    pub async fn resolve(&self, id: &str) -> Option<String> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(session) if session.expires_at > Timestamp::now() => {
                    return Some(session.username.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(id);
        tracing::info!("evicted expired session");
        None
    }

    /// End a session, returning the username it belonged to.
    pub async fn end(&self, id: &str) -> Option<String> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|session| session.username)
    }

    /// `Set-Cookie` value carrying a session id.
    pub fn cookie(&self, id: &str) -> String {
        let max_age = self.ttl.as_secs();
        self.with_attributes(format!("{SESSION_COOKIE}={id}; Max-Age={max_age}"))
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn expired_cookie(&self) -> String {
        self.with_attributes(format!("{SESSION_COOKIE}=; Max-Age=0"))
    }

    fn with_attributes(&self, cookie: String) -> String {
        let mut cookie = format!("{cookie}; Path=/; HttpOnly; SameSite=Lax");
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Extract the session id from the request's `Cookie` headers.
pub fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
}
