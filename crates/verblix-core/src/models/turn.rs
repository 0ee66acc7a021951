use serde::{Deserialize, Serialize};

/// Who produced a turn. Uses the provider-neutral `model` naming on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

/// One message within a conversation.
///
/// Serialized as `{"role": "user", "parts": [{"text": "..."}]}`, the shape
/// both the relay request and the local registry use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireTurn", into = "WireTurn")]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireTurn {
    role: Role,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Serialize, Deserialize)]
struct WirePart {
    #[serde(default)]
    text: String,
}

impl From<WireTurn> for Turn {
    fn from(wire: WireTurn) -> Self {
        let content = wire.parts.into_iter().map(|p| p.text).collect::<String>();
        Self {
            role: wire.role,
            content,
        }
    }
}

impl From<Turn> for WireTurn {
    fn from(turn: Turn) -> Self {
        Self {
            role: turn.role,
            parts: vec![WirePart { text: turn.content }],
        }
    }
}
