use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A chat model that the rollout drives, either as persona or interlocutor.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// One completion for `messages` under `system`. Backends that cannot
    /// honor `seed` ignore it.
    async fn generate(
        &self,
        messages: &[ChatMessage],
        system: &str,
        seed: Option<u64>,
        temperature: f64,
    ) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;

    fn provider(&self) -> &str;

    /// `provider/model`, as recorded in transcripts.
    fn identifier(&self) -> String {
        format!("{}/{}", self.provider(), self.model_name())
    }
}
