//! Completion client module
//!
//! Provides the conversation message model, the completion client trait,
//! the gateway implementation, and the completion error taxonomy.

use std::sync::Arc;

use eyre::Result;
use tracing::debug;

pub mod client;
mod error;
mod gateway;
mod types;

pub use client::CompletionClient;
pub use error::CompletionError;
pub use gateway::GatewayClient;
pub use types::{ConversationTurn, Role};

use crate::config::LlmConfig;

/// Create a completion client based on the provider specified in config
///
/// Only the gateway protocol is implemented; unknown provider names are a
/// configuration mistake and fail fast here.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn CompletionClient>> {
    debug!(provider = %config.provider, "create_client: called");
    match config.provider.as_str() {
        "gateway" => {
            debug!("create_client: creating gateway client");
            Ok(Arc::new(GatewayClient::from_config(config)?))
        }
        other => Err(eyre::eyre!("Unknown completion provider: '{}'. Supported: gateway", other)),
    }
}
