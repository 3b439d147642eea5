//! Runtime checks on generated persona output.
//!
//! Monitors are stateful per rollout and must never be shared between
//! concurrent rollouts; [`Monitor::check`] takes `&mut self` so the borrow
//! checker enforces one owner.

mod repetition;
pub mod similarity;
mod stagnation;

pub use repetition::{REPETITION_MONITOR, RepetitionMonitor};
pub use stagnation::{STAGNATION_MONITOR, StagnationMonitor};

use crate::config::ScenarioConfig;
use crate::rollout::Utterance;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Source of the next disclosure topic for stagnation recovery text.
pub trait DisclosureSource {
    fn next_unused_topic(&self) -> &str;
}

impl DisclosureSource for &str {
    fn next_unused_topic(&self) -> &str {
        self
    }
}

/// What the orchestrator should do about a generated response.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MonitorAction {
    Ok,
    EmergencyInjection,
    RePrompt,
    LogOnly,
}

/// Outcome of one check. Same payload shape for every action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorResult {
    pub action: MonitorAction,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injection_text: Option<String>,
    pub details: Map<String, Value>,
}

impl MonitorResult {
    pub fn ok() -> Self {
        Self {
            action: MonitorAction::Ok,
            reason: String::new(),
            injection_text: None,
            details: Map::new(),
        }
    }

    pub fn new(action: MonitorAction, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
            injection_text: None,
            details: Map::new(),
        }
    }

    pub fn with_injection(mut self, text: impl Into<String>) -> Self {
        self.injection_text = Some(text.into());
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn is_ok(&self) -> bool {
        self.action == MonitorAction::Ok
    }
}

/// Everything a monitor may look at for one persona response.
pub struct MonitorInput<'a> {
    pub turn: u32,
    pub response: &'a str,
    /// Conversation so far, excluding `response`.
    pub history: &'a [Utterance],
    pub disclosures: &'a dyn DisclosureSource,
}

pub trait Monitor: Send {
    fn name(&self) -> &'static str;

    /// Never fails: empty history or an empty response yield a neutral result.
    fn check(&mut self, input: &MonitorInput<'_>) -> MonitorResult;
}

/// Fresh monitors for one rollout, in evaluation order (stagnation first).
/// Disabled monitors are not created.
pub fn create_monitors(config: &ScenarioConfig) -> Vec<Box<dyn Monitor>> {
    let interaction = &config.interaction;
    let mut monitors: Vec<Box<dyn Monitor>> = Vec::new();
    if interaction.stagnation_detection.enabled {
        monitors.push(Box::new(StagnationMonitor::new(
            interaction.stagnation_detection.clone(),
            config.persona_name(),
        )));
    }
    if interaction.repetition_detection.enabled {
        monitors.push(Box::new(RepetitionMonitor::new(
            interaction.repetition_detection.clone(),
        )));
    }
    monitors
}
