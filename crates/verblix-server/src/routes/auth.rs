use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;

use verblix_core::models::auth::{AuthResponse, Credentials, MessageBody, SessionStatus, UserInfo};

use crate::error::AuthApiError;
use crate::sessions;
use crate::state::AppState;
use crate::users::UserError;

fn require_fields(credentials: &Credentials) -> Result<(), AuthApiError> {
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return Err(AuthApiError::BadRequest(
            "Username and password are required.".to_string(),
        ));
    }
    Ok(())
}

async fn start_session(
    state: &AppState,
    status: StatusCode,
    message: &str,
    username: String,
) -> Response {
    let session_id = state.sessions.start(&username).await;
    let body = AuthResponse {
        message: message.to_string(),
        user: UserInfo { username },
    };
    (
        status,
        AppendHeaders([(SET_COOKIE, state.sessions.cookie(&session_id))]),
        Json(body),
    )
        .into_response()
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, AuthApiError> {
    let Json(credentials) = body?;
    require_fields(&credentials)?;

    state
        .users
        .register(&credentials.username, &credentials.password)
        .await
        .map_err(|e| match e {
            UserError::AlreadyExists(_) => {
                AuthApiError::Conflict("Username already exists.".to_string())
            }
            other => AuthApiError::Internal(other.to_string()),
        })?;

    Ok(start_session(
        &state,
        StatusCode::CREATED,
        "Registration successful.",
        credentials.username,
    )
    .await)
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, AuthApiError> {
    let Json(credentials) = body?;
    require_fields(&credentials)?;

    if let Err(e) = state
        .users
        .verify(&credentials.username, &credentials.password)
        .await
    {
        tracing::info!(username = %credentials.username, error = %e, "login rejected");
        return Err(AuthApiError::InvalidCredentials);
    }

    tracing::info!(username = %credentials.username, "user logged in");
    Ok(start_session(&state, StatusCode::OK, "Login successful.", credentials.username).await)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = sessions::session_id(&headers) {
        if let Some(username) = state.sessions.end(id).await {
            tracing::info!(username, "user logged out");
        }
    }

    (
        StatusCode::OK,
        AppendHeaders([(SET_COOKIE, state.sessions.expired_cookie())]),
        Json(MessageBody {
            message: "Logout successful.".to_string(),
        }),
    )
        .into_response()
}

pub async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionStatus> {
    let user = match sessions::session_id(&headers) {
        Some(id) => state.sessions.resolve(id).await,
        None => None,
    };

    Json(SessionStatus {
        logged_in: user.is_some(),
        user: user.map(|username| UserInfo { username }),
    })
}
