use super::http_client::build_provider_client;
use super::scrub::{api_error, transport_error};
use super::traits::{ChatMessage, ModelClient, Role};
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI Chat Completions. The system prompt travels as the first message
/// and seeds are forwarded.
pub struct OpenAiClient {
    model: String,
    /// Pre-computed `"Bearer <key>"`.
    auth_header: String,
    completions_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(model: impl Into<String>, api_key: &str) -> Self {
        Self::with_base_url(model, api_key, None)
    }

    pub fn with_base_url(model: impl Into<String>, api_key: &str, base_url: Option<&str>) -> Self {
        let base = base_url.map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'));
        Self {
            model: model.into(),
            auth_header: format!("Bearer {api_key}"),
            completions_url: format!("{base}/v1/chat/completions"),
            client: build_provider_client(),
        }
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        system: &'a str,
        seed: Option<u64>,
        temperature: f64,
    ) -> CompletionRequest<'a> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        if !system.is_empty() {
            wire.push(WireMessage {
                role: "system",
                content: system,
            });
        }
        wire.extend(messages.iter().map(|m| WireMessage {
            role: match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: &m.content,
        }));
        CompletionRequest {
            model: &self.model,
            messages: wire,
            temperature,
            seed,
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        system: &str,
        seed: Option<u64>,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let request = self.build_request(messages, system, seed, temperature);
        tracing::debug!(model = %self.model, messages = request.messages.len(), "openai call");

        let response = self
            .client
            .post(&self.completions_url)
            .header("Authorization", &self.auth_header)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("openai", &e))?;

        if !response.status().is_success() {
            return Err(api_error("openai", response).await);
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| transport_error("openai", &e))?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::EmptyResponse {
                provider: "openai".into(),
            })?;
        let text = choice.message.content.unwrap_or_default();
        tracing::debug!(chars = text.len(), "openai response");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "openai"
    }
}
