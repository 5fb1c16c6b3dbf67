//! HTTP clients for the remote AI backends.
//!
//! Two client families cover all three backends: `ChatCompletionsClient`
//! speaks the bearer-auth choices-array API (used by both the selectable
//! provider and the fixed provider), `MessagesClient` speaks the
//! content-blocks API used by the reviewer. No retry, no fallback; a
//! failure travels back to the caller as-is. Timeouts are whatever reqwest
//! defaults to.

use async_trait::async_trait;
use serde::Serialize;

use triad_common::provider::{extract_chat_completions, extract_messages, ChatMessage};
use triad_common::{ChatBackend, ChatRequest, ProviderError};

/// Backend speaking the chat-completions API (`POST {base}/chat/completions`
/// with bearer auth).
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatCompletionsBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
}

impl ChatCompletionsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for ChatCompletionsClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionsBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            n: request.n,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_chat_completions(&text)
    }
}

/// Backend speaking the messages API (`POST {base}/v1/messages` with
/// `x-api-key` auth and a pinned API version).
pub struct MessagesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl MessagesClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for MessagesClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesBody {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_messages(&text)
    }
}
