//! Bedrock `ConverseStream` adapter.
//!
//! The upstream call is deferred until the returned stream is first
//! polled. Each non-empty text delta becomes exactly one fragment, in the
//! order Bedrock delivers them. Any failure, whether sending the request
//! or reading the event stream, is yielded once as
//! [`ModelError::Upstream`] and ends the stream.

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::operation::converse_stream::ConverseStreamOutput as ConverseStreamResponse;
use aws_sdk_bedrockruntime::operation::converse_stream::builders::ConverseStreamFluentBuilder;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ContentBlockDelta, ConversationRole, ConverseStreamOutput, Message,
    SystemContentBlock,
};
use aws_smithy_types::error::display::DisplayErrorContext;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use verblix_core::models::turn::{Role, Turn};

use crate::error::ModelError;
use crate::history::prepare_history;
use crate::stream::{FragmentStream, ModelStream};

/// Default Bedrock inference profile.
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

/// Load AWS SDK config for a region from the default credential chain.
pub async fn build_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

/// Streams replies from a Bedrock chat model.
#[derive(Clone)]
pub struct BedrockModel {
    client: Client,
    model_id: String,
    system_prompt: String,
}

impl BedrockModel {
    pub fn new(
        config: &aws_config::SdkConfig,
        model_id: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(config),
            model_id: model_id.into(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

enum Upstream {
    Pending(ConverseStreamFluentBuilder),
    Receiving {
        response: ConverseStreamResponse,
        fragments: usize,
    },
}

impl ModelStream for BedrockModel {
    fn stream_reply(&self, prompt: String, history: Vec<Turn>) -> FragmentStream {
        let messages = match build_messages(&prompt, &history) {
            Ok(messages) => messages,
            Err(e) => return stream::once(async move { Err(e) }).boxed(),
        };

        info!(
            model = %self.model_id,
            context_turns = messages.len() - 1,
            "starting model stream"
        );

        let request = self
            .client
            .converse_stream()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(self.system_prompt.clone()))
            .set_messages(Some(messages));

        stream::try_unfold(Upstream::Pending(request), next_fragment).boxed()
    }
}

/// Advance the upstream call to the next text fragment.
async fn next_fragment(state: Upstream) -> Result<Option<(String, Upstream)>, ModelError> {
    let (mut response, mut fragments) = match state {
        Upstream::Pending(request) => {
            let response = request
                .send()
                .await
                .map_err(|e| ModelError::Upstream(DisplayErrorContext(&e).to_string()))?;
            (response, 0)
        }
        Upstream::Receiving {
            response,
            fragments,
        } => (response, fragments),
    };

    loop {
        let event = response
            .stream
            .recv()
            .await
            .map_err(|e| ModelError::Upstream(DisplayErrorContext(&e).to_string()))?;

        match event {
            Some(ConverseStreamOutput::ContentBlockDelta(delta)) => {
                if let Some(ContentBlockDelta::Text(text)) = delta.delta()
                    && !text.is_empty()
                {
                    fragments += 1;
                    return Ok(Some((
                        text.clone(),
                        Upstream::Receiving {
                            response,
                            fragments,
                        },
                    )));
                }
            }
            Some(ConverseStreamOutput::MessageStop(stop)) => {
                debug!(stop_reason = %stop.stop_reason().as_str(), "model message stopped");
            }
            Some(_) => {}
            None => {
                info!(fragments, "model stream complete");
                return Ok(None);
            }
        }
    }
}

/// Convert the prepared context plus the new prompt into Converse messages.
fn build_messages(prompt: &str, history: &[Turn]) -> Result<Vec<Message>, ModelError> {
    let mut messages = Vec::with_capacity(history.len() + 1);

    for turn in prepare_history(history) {
        messages.push(to_message(turn.role, turn.content)?);
    }
    messages.push(to_message(Role::User, prompt.to_string())?);

    Ok(messages)
}

fn to_message(role: Role, content: String) -> Result<Message, ModelError> {
    let role = match role {
        Role::User => ConversationRole::User,
        Role::Model => ConversationRole::Assistant,
    };
    Message::builder()
        .role(role)
        .content(ContentBlock::Text(content))
        .build()
        .map_err(|e| ModelError::InvalidHistory(e.to_string()))
}
