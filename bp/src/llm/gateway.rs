//! Completion gateway client
//!
//! Implements the CompletionClient trait against the completion gateway: a
//! single POST carrying the assembled message list, answering
//! `{ "content": ... }` on success and `{ "error": ... }` with a non-2xx
//! status on failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionClient, CompletionError, ConversationTurn, Role};
use crate::config::LlmConfig;

/// Generic fallback when the provider fails without a message of its own
const GENERIC_PROVIDER_ERROR: &str = "Failed to generate response";

/// Completion gateway client
pub struct GatewayClient {
    endpoint: String,
    api_key: Option<String>,
    api_key_env: String,
    http: Client,
}

impl GatewayClient {
    /// Create a new client from configuration
    ///
    /// The credential is read from the configured environment variable once,
    /// here. A missing credential is reported by `complete` as a typed
    /// `Configuration` error before any network I/O - never a panic.
    pub fn from_config(config: &LlmConfig) -> Result<Self, CompletionError> {
        debug!(endpoint = %config.completion_endpoint(), "from_config: called");
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            warn!(env = %config.api_key_env, "from_config: credential env var is not set");
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            endpoint: config.completion_endpoint(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            http,
        })
    }

    /// Build the request body for the gateway
    ///
    /// Only role and content go on the wire; ids and timestamps stay local.
    fn build_request_body(&self, messages: &[ConversationTurn]) -> serde_json::Value {
        debug!(message_count = %messages.len(), "build_request_body: called");
        let wire: Vec<WireMessage<'_>> = messages
            .iter()
            .map(|turn| WireMessage {
                role: turn.role,
                content: &turn.content,
            })
            .collect();

        serde_json::json!({ "messages": wire })
    }
}

#[async_trait]
impl CompletionClient for GatewayClient {
    async fn complete(&self, messages: &[ConversationTurn]) -> Result<String, CompletionError> {
        debug!(message_count = %messages.len(), "complete: called");
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| CompletionError::Configuration(self.api_key_env.clone()))?;

        let body = self.build_request_body(messages);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "complete: provider error");
            return Err(provider_error(status.as_u16(), &text));
        }

        let text = response.text().await?;
        let content = parse_success_envelope(&text)?;
        debug!(content_len = content.len(), "complete: success");
        Ok(content)
    }
}

/// Build a Provider error from a non-success response body
///
/// Carries the provider's own message text when the body holds one,
/// otherwise a generic fallback.
fn provider_error(status: u16, body: &str) -> CompletionError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_else(|| GENERIC_PROVIDER_ERROR.to_string());

    CompletionError::Provider { status, message }
}

/// Extract the content field from a success response body
///
/// An empty string is a valid result; a missing field is not.
fn parse_success_envelope(body: &str) -> Result<String, CompletionError> {
    let envelope: SuccessEnvelope = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(format!("response body is not valid JSON: {e}")))?;

    envelope
        .content
        .ok_or_else(|| CompletionError::MalformedResponse("response envelope has no content field".to_string()))
}

// Gateway wire types

#[derive(Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct SuccessEnvelope {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}
