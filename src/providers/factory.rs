use super::anthropic::AnthropicClient;
use super::mock::MockClient;
use super::openai::OpenAiClient;
use super::traits::ModelClient;
use crate::error::LlmError;
use std::sync::Arc;

const ANTHROPIC_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
const ANTHROPIC_BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";
const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Non-empty, trimmed value of an environment variable.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_key(provider: &str, env_var: &'static str) -> Result<String, LlmError> {
    env_value(env_var).ok_or_else(|| LlmError::MissingCredential {
        provider: provider.to_string(),
        env_var,
    })
}

/// Split `provider/model`. The provider is case-insensitive; the model keeps
/// everything after the first slash.
pub fn parse_model_string(model_string: &str) -> Result<(String, &str), LlmError> {
    let (provider, model) = model_string
        .split_once('/')
        .filter(|(p, m)| !p.trim().is_empty() && !m.trim().is_empty())
        .ok_or_else(|| LlmError::InvalidModelString(model_string.to_string()))?;
    Ok((provider.trim().to_lowercase(), model.trim()))
}

/// Build a client for a `provider/model` tag. Credentials are checked here,
/// before any call is made.
pub fn create_client(model_string: &str) -> Result<Arc<dyn ModelClient>, LlmError> {
    let (provider, model) = parse_model_string(model_string)?;
    let client: Arc<dyn ModelClient> = match provider.as_str() {
        "anthropic" => {
            let key = require_key("anthropic", ANTHROPIC_KEY_ENV)?;
            let base = env_value(ANTHROPIC_BASE_URL_ENV);
            Arc::new(AnthropicClient::with_base_url(model, key, base.as_deref()))
        }
        "openai" => {
            let key = require_key("openai", OPENAI_KEY_ENV)?;
            let base = env_value(OPENAI_BASE_URL_ENV);
            Arc::new(OpenAiClient::with_base_url(model, &key, base.as_deref()))
        }
        "mock" => Arc::new(MockClient::new(model)),
        _ => return Err(LlmError::UnknownProvider(provider)),
    };
    tracing::debug!(client = %client.identifier(), "model client created");
    Ok(client)
}
