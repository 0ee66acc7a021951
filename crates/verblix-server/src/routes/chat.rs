use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::response::Response;
use axum::Json;
use serde_json::Value;

use verblix_core::models::request::ChatStreamRequest;

use crate::canned;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::relay;
use crate::state::AppState;

/// `POST /chat-stream`: answer a message as a framed event stream.
pub async fn chat_stream(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let request = ChatStreamRequest::from_value(body)?;

    tracing::info!(
        username = %user.username,
        message_len = request.message.len(),
        history_len = request.history.len(),
        "chat stream request"
    );

    if let Some(reply) = canned::respond(&request.message) {
        tracing::info!(kind = ?reply.kind, "answering with canned reply");
        return Ok(relay::into_response(relay::canned_frames(reply)));
    }

    let upstream = state.model.stream_reply(request.message, request.history);
    Ok(relay::into_response(relay::model_frames(upstream)))
}
