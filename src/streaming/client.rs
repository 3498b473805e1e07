//! Ollama chat streaming client
//!
//! Sends the whole conversation to `POST /api/chat` with `stream: true` and
//! hands the newline-delimited response body to the reply consumer.
//! The timeout bounds the whole exchange, body included.

use crate::errors::{ChatError, Result};
use crate::streaming::reply::{consume_stream, Reply};
use crate::telemetry::ExchangeStats;
use crate::types::Turn;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Default chat endpoint
pub const DEFAULT_CHAT_URL: &str = "https://vspace.store/ollama/api/chat";

/// Default model
pub const DEFAULT_MODEL: &str = "qwen2:1.5b";

/// Whole-exchange timeout (5 minutes)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Anything that can turn a conversation into an assistant reply
///
/// Implementations never fail: every error is folded into `Reply::Failed`.
/// The sink receives each delta as it arrives.
#[async_trait(?Send)]
pub trait ChatBackend {
    async fn exchange(&self, turns: &[Turn], sink: &mut dyn for<'s> FnMut(&'s str)) -> Reply;
}

/// Ollama streaming client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create Ollama client with custom configuration
    pub fn with_config(url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            model: model.to_string(),
            timeout,
        })
    }

    /// Run one exchange, surfacing failures as errors
    pub async fn stream_chat(
        &self,
        turns: &[Turn],
        sink: &mut dyn FnMut(&str),
    ) -> Result<(String, ExchangeStats)> {
        let request = ChatRequest {
            model: &self.model,
            messages: turns,
            stream: true,
        };

        info!(model = %self.model, turns = turns.len(), "starting exchange");

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status,
                body: body.trim().to_string(),
            });
        }

        consume_stream(response.bytes_stream(), sink).await
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get chat endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait(?Send)]
impl ChatBackend for OllamaClient {
    async fn exchange(&self, turns: &[Turn], sink: &mut dyn for<'s> FnMut(&'s str)) -> Reply {
        let reply = Reply::from(self.stream_chat(turns, sink).await);
        if let Some(error) = reply.error() {
            warn!(error = %error, "exchange failed");
        }
        reply
    }
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    stream: bool,
}
