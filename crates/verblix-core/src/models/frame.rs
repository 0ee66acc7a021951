//! Relay wire protocol.
//!
//! The relay response body is a sequence of frames, each written as an
//! `event:` line and a `data:` line followed by a blank line:
//!
//! ```text
//! event: message
//! data: {"type":"ai","text":"Hel"}
//!
//! event: end
//! data: {}
//!
//! ```
//!
//! Failures use `event: error` with `{"type":"error","text":"..."}`.

use serde::{Deserialize, Serialize};

pub const EVENT_MESSAGE: &str = "message";
pub const EVENT_ERROR: &str = "error";
pub const EVENT_END: &str = "end";

/// Separator between two frames on the wire.
pub const FRAME_DELIMITER: &str = "\n\n";

/// What produced a fragment: the model, or one of the canned responders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Ai,
    Greeting,
    Calculation,
    Fact,
    Joke,
    Quote,
    Riddle,
    Help,
    Default,
    Error,
    /// Any kind this build doesn't know about.
    #[serde(other)]
    Other,
}

/// JSON carried on a frame's `data:` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePayload {
    #[serde(rename = "type", default = "other_kind")]
    pub kind: ResponseKind,
    pub text: String,
}

fn other_kind() -> ResponseKind {
    ResponseKind::Other
}

/// One discrete unit of the relay protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Fragment { kind: ResponseKind, text: String },
    Error { text: String },
    End,
}

impl StreamFrame {
    pub fn fragment(kind: ResponseKind, text: impl Into<String>) -> Self {
        Self::Fragment {
            kind,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { text: text.into() }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Fragment { .. } => EVENT_MESSAGE,
            Self::Error { .. } => EVENT_ERROR,
            Self::End => EVENT_END,
        }
    }

    /// The JSON written on the `data:` line.
    pub fn data(&self) -> String {
        let payload = match self {
            Self::Fragment { kind, text } => FramePayload {
                kind: *kind,
                text: text.clone(),
            },
            Self::Error { text } => FramePayload {
                kind: ResponseKind::Error,
                text: text.clone(),
            },
            Self::End => return "{}".to_string(),
        };
        // A struct of an enum and a string always serializes.
        serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string())
    }

    /// Full wire encoding, including the trailing blank line.
    pub fn encode(&self) -> String {
        format!("event: {}\ndata: {}{FRAME_DELIMITER}", self.event_name(), self.data())
    }

    /// Parse one frame-delimited unit (without the trailing blank line).
    ///
    /// Returns `None` for anything that isn't a recognizable frame: comment
    /// lines, unknown event names, or undecodable data. Callers discard
    /// those, which keeps older clients working when the protocol grows.
    pub fn parse(unit: &str) -> Option<Self> {
        let mut event: Option<&str> = None;
        let mut data_lines: Vec<&str> = Vec::new();

        for line in unit.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => event = Some(value),
                "data" => data_lines.push(value),
                _ => {}
            }
        }

        let event = event.unwrap_or(EVENT_MESSAGE);
        if event == EVENT_END {
            return Some(Self::End);
        }
        if data_lines.is_empty() {
            return None;
        }

        let data = data_lines.join("\n");
        let payload: FramePayload = serde_json::from_str(&data).ok()?;
        match event {
            EVENT_ERROR => Some(Self::Error { text: payload.text }),
            EVENT_MESSAGE if payload.kind == ResponseKind::Error => {
                Some(Self::Error { text: payload.text })
            }
            EVENT_MESSAGE => Some(Self::Fragment {
                kind: payload.kind,
                text: payload.text,
            }),
            _ => None,
        }
    }

    /// Only `end` closes a stream; an `error` frame may still be followed by
    /// more frames.
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}
