//! Provider request/response shapes and response normalization.
//!
//! The two backend families return differently shaped JSON: the
//! chat-completions family wraps the reply in a choices array of messages,
//! the messages family in an array of typed content blocks. Each shape gets
//! one extraction path; everything downstream sees plain text.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Message role on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a scripted exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A normalized outbound completion request. Clients serialize this into
/// their backend's native body; `temperature` and `n` are omitted from the
/// wire when unset.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    pub n: Option<u32>,
}

// --- chat-completions shape (choices array of messages) ---

#[derive(Debug, Deserialize)]
pub struct ChatCompletionsResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Extract the reply text from a chat-completions body.
pub fn extract_chat_completions(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatCompletionsResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or(ProviderError::EmptyReply)
}

// --- messages shape (typed content blocks) ---

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Extract the first text block from a messages body.
pub fn extract_messages(body: &str) -> Result<String, ProviderError> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
    parsed
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } if !text.is_empty() => Some(text),
            _ => None,
        })
        .ok_or(ProviderError::EmptyReply)
}
