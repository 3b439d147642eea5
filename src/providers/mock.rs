use super::traits::{ChatMessage, ModelClient};
use crate::error::LlmError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic offline model.
///
/// Cycles through canned responses when given any, echoes the last message
/// in echo mode, and otherwise answers `[Mock response N]`.
pub struct MockClient {
    model: String,
    responses: Vec<String>,
    echo: bool,
    calls: AtomicUsize,
}

impl MockClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            responses: Vec::new(),
            echo: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_responses<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    pub fn echo(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for MockClient {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        _system: &str,
        _seed: Option<u64>,
        _temperature: f64,
    ) -> Result<String, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.echo {
            return Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default());
        }
        if !self.responses.is_empty() {
            return Ok(self.responses[(n - 1) % self.responses.len()].clone());
        }
        Ok(format!("[Mock response {n}]"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "mock"
    }
}
