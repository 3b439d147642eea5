#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use persona_loom::config::ScenarioConfig;
use persona_loom::error::LlmError;
use persona_loom::providers::{ChatMessage, ModelClient};

pub fn scenario_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file)
}

pub fn load_scenario(file: &str) -> Arc<ScenarioConfig> {
    Arc::new(ScenarioConfig::load(&scenario_path(file)).expect("bundled scenario loads"))
}

/// One `generate` call as the client saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub seed: Option<u64>,
    pub last_message: String,
    pub message_count: usize,
}

/// Scripted client that remembers every request and can be told to fail.
pub struct ScriptedClient {
    model: String,
    responses: Vec<String>,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            responses: Vec::new(),
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Cycle through `responses`.
    pub fn replying<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    /// The `n`th call (1-based) returns a request error.
    pub fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seeds(&self) -> Vec<Option<u64>> {
        self.calls().into_iter().map(|c| c.seed).collect()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        system: &str,
        seed: Option<u64>,
        _temperature: f64,
    ) -> Result<String, LlmError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                system: system.to_string(),
                seed,
                last_message: messages.last().map(|m| m.content.clone()).unwrap_or_default(),
                message_count: messages.len(),
            });
            calls.len()
        };

        if self.fail_on_call == Some(n) {
            return Err(LlmError::Request {
                provider: "scripted".into(),
                message: "API error (503): upstream unavailable".into(),
            });
        }
        if self.responses.is_empty() {
            return Ok(format!("{} reply {n}", self.model));
        }
        Ok(self.responses[(n - 1) % self.responses.len()].clone())
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "scripted"
    }
}
