//! verblix-server
//!
//! The chat relay: validates a chat request, answers canned intents
//! directly, and otherwise streams the model's reply back as framed
//! server-sent events. Also hosts the session endpoints that gate it.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};

pub mod canned;
pub mod config;
pub mod error;
pub mod middleware;
pub mod relay;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod users;

use state::AppState;

/// Build the application router. CORS is layered on by the binary.
pub fn router(state: AppState) -> Router {
    // Session gate applies to the relay only.
    let relay = Router::new()
        .route("/chat-stream", post(routes::chat::chat_stream))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", get(routes::auth::logout))
        .route("/auth/status", get(routes::auth::status))
        .merge(relay)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .with_state(state)
}
