//! Model invocation.
//!
//! [`PaletteModel`] sits between the generate flow and whatever produces
//! completions. Payloads are raw JSON values; [`crate::normalize`] turns
//! them into palettes.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message, SystemContentBlock};
use serde_json::Value;
use tracing::info;

use crate::error::BedrockError;
use crate::prompt::{PromptMessage, PromptRole};

/// Something that turns a message list into a completion payload.
#[async_trait]
pub trait PaletteModel: Send + Sync {
    /// Run one completion. `Ok(None)` means the backend answered without
    /// any output.
    async fn complete(&self, messages: &[PromptMessage]) -> Result<Option<Value>, BedrockError>;
}

/// A Claude model behind the Bedrock Converse API.
///
/// System messages become the request's system blocks; the rest are sent as
/// the conversation. The completion is returned as a JSON string holding the
/// concatenated text blocks of the reply.
#[derive(Clone)]
pub struct BedrockPaletteModel {
    client: Client,
    model_id: String,
}

impl BedrockPaletteModel {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn from_config(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self::new(Client::new(config), model_id)
    }
}

#[async_trait]
impl PaletteModel for BedrockPaletteModel {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<Option<Value>, BedrockError> {
        let mut system = Vec::new();
        let mut conversation = Vec::new();

        for msg in messages {
            let role = match msg.role {
                PromptRole::System => {
                    system.push(SystemContentBlock::Text(msg.content.clone()));
                    continue;
                }
                PromptRole::User => ConversationRole::User,
                PromptRole::Assistant => ConversationRole::Assistant,
            };
            let message = Message::builder()
                .role(role)
                .content(ContentBlock::Text(msg.content.clone()))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))?;
            conversation.push(message);
        }

        info!(model_id = %self.model_id, messages = conversation.len(), "invoking model");

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .set_system(Some(system))
            .set_messages(Some(conversation))
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        if let Some(usage) = response.usage() {
            info!(
                model_id = %self.model_id,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "model invocation complete"
            );
        }

        let Some(output_message) = response.output().and_then(|o| o.as_message().ok()) else {
            return Ok(None);
        };

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(Some(Value::String(text)))
    }
}
