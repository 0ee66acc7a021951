use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::sessions;
use crate::state::AppState;

/// Session gate for the relay.
///
/// Resolves the session cookie to a username and inserts [`AuthUser`] into
/// request extensions. Requests without a live session are answered with a
/// 401 JSON error and never reach the handler.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session_id = sessions::session_id(req.headers())
        .map(str::to_string)
        .ok_or(ApiError::Unauthorized)?;

    let username = state
        .sessions
        .resolve(&session_id)
        .await
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser { username });

    Ok(next.run(req).await)
}

/// Authenticated user resolved from the session cookie.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}
