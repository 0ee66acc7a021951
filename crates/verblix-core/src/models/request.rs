use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::frame::ResponseKind;
use super::turn::Turn;
use crate::error::CoreError;

/// Body of a relay request: the new message plus the conversation so far.
///
/// `history` includes the just-added user turn; the model adapter trims it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStreamRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Turn>,
}

impl ChatStreamRequest {
    /// Validate an untyped request body.
    ///
    /// `message` must be a string with non-whitespace content. `history` may
    /// be absent or null; otherwise it must be an array of well-formed turns.
    pub fn from_value(mut body: Value) -> Result<Self, CoreError> {
        let message = match body.get("message") {
            Some(Value::String(m)) if !m.trim().is_empty() => m.clone(),
            _ => return Err(CoreError::MissingMessage),
        };

        let history = match body.get_mut("history").map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(value @ Value::Array(_)) => {
                serde_json::from_value(value).map_err(|_| CoreError::InvalidHistory)?
            }
            Some(_) => return Err(CoreError::InvalidHistory),
        };

        Ok(Self { message, history })
    }
}

/// JSON body of non-stream relay failures (400, 401).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub text: String,
}

impl ErrorBody {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Error,
            text: text.into(),
        }
    }
}
