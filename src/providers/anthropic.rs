use super::http_client::build_provider_client;
use super::scrub::{api_error, transport_error};
use super::traits::{ChatMessage, ModelClient};
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;
/// The Messages API requires a non-empty system prompt.
const FALLBACK_SYSTEM: &str = "You are a helpful assistant.";

/// Anthropic Messages API. Sampling seeds are not supported and are ignored.
pub struct AnthropicClient {
    model: String,
    api_key: String,
    messages_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

impl AnthropicClient {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(model, api_key, None)
    }

    pub fn with_base_url(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<&str>,
    ) -> Self {
        let base = base_url.map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'));
        Self {
            model: model.into(),
            api_key: api_key.into(),
            messages_url: format!("{base}/v1/messages"),
            client: build_provider_client(),
        }
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        system: &'a str,
        temperature: f64,
    ) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: if system.is_empty() {
                FALLBACK_SYSTEM
            } else {
                system
            },
            messages,
            temperature,
        }
    }

    /// First text block, or empty when the model returned none.
    fn extract_text(response: MessagesResponse) -> String {
        response
            .content
            .into_iter()
            .find_map(|block| match block {
                ResponseBlock::Text { text } => Some(text),
                ResponseBlock::Unsupported => None,
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        system: &str,
        seed: Option<u64>,
        temperature: f64,
    ) -> Result<String, LlmError> {
        if seed.is_some() {
            tracing::trace!("anthropic ignores sampling seeds");
        }
        let request = self.build_request(messages, system, temperature);
        tracing::debug!(model = %self.model, messages = messages.len(), "anthropic call");

        let response = self
            .client
            .post(&self.messages_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("anthropic", &e))?;

        if !response.status().is_success() {
            return Err(api_error("anthropic", response).await);
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| transport_error("anthropic", &e))?;
        let text = Self::extract_text(body);
        tracing::debug!(chars = text.len(), "anthropic response");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "anthropic"
    }
}
