use super::history::Speaker;
use crate::assembler::{InjectionType, IntensitySnapshot};
use crate::config::SCHEMA_VERSION;
use crate::error::TranscriptError;
use crate::monitors::{MonitorAction, MonitorResult};
use crate::prompt::TEMPLATE_VERSION;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use uuid::Uuid;

/// Rollout-level facts written ahead of the turns.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptMetadata {
    pub rollout_id: Uuid,
    pub schema_version: String,
    pub template_version: String,
    pub config_hash: String,
    pub persona_model: String,
    pub target_model: String,
    /// Zero when the run was unseeded.
    pub seed: u64,
    pub n_turns: u32,
    pub actual_turns: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted_at_turn: Option<u32>,
}

/// A monitor finding that was acted on (or logged).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorEvent {
    pub turn: u32,
    pub monitor: String,
    pub reason: String,
    pub action: MonitorAction,
    pub details: Map<String, Value>,
}

impl MonitorEvent {
    pub fn from_result(turn: u32, monitor: &str, result: &MonitorResult) -> Self {
        Self {
            turn,
            monitor: monitor.to_string(),
            reason: result.reason.clone(),
            action: result.action,
            details: result.details.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub role: Speaker,
    pub content: String,
    pub phase: String,
    pub intensities: IntensitySnapshot,
    pub injection_type: InjectionType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub monitor_events: Vec<MonitorEvent>,
    #[serde(skip_serializing_if = "is_zero")]
    pub retries: u32,
    /// Stamped by [`Transcript::add_turn`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// Everything recorded for one rollout. Owned by exactly one execution.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub metadata: TranscriptMetadata,
    pub turns: Vec<TurnRecord>,
    pub monitor_events: Vec<MonitorEvent>,
}

impl Transcript {
    pub fn new(
        config_hash: impl Into<String>,
        persona_model: impl Into<String>,
        target_model: impl Into<String>,
        seed: Option<u64>,
        n_turns: u32,
    ) -> Self {
        Self {
            metadata: TranscriptMetadata {
                rollout_id: Uuid::new_v4(),
                schema_version: SCHEMA_VERSION.to_string(),
                template_version: TEMPLATE_VERSION.to_string(),
                config_hash: config_hash.into(),
                persona_model: persona_model.into(),
                target_model: target_model.into(),
                seed: seed.unwrap_or(0),
                n_turns,
                actual_turns: 0,
                started_at: Utc::now(),
                finished_at: None,
                aborted_at_turn: None,
            },
            turns: Vec::new(),
            monitor_events: Vec::new(),
        }
    }

    pub fn add_turn(&mut self, mut record: TurnRecord) {
        record.timestamp = Some(Utc::now());
        self.turns.push(record);
    }

    pub fn add_monitor_event(&mut self, event: MonitorEvent) {
        self.monitor_events.push(event);
    }

    /// Stamp the finish time and the recorded entry count.
    pub fn seal(&mut self) {
        self.metadata.actual_turns = self.turns.len();
        self.metadata.finished_at = Some(Utc::now());
    }

    /// Seal as aborted at `turn`.
    pub fn seal_aborted(&mut self, turn: u32) {
        self.metadata.aborted_at_turn = Some(turn);
        self.seal();
    }

    pub fn is_sealed(&self) -> bool {
        self.metadata.finished_at.is_some()
    }

    pub fn to_json(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to `path`, creating parent directories.
    pub async fn write_to(&self, path: &Path) -> Result<(), TranscriptError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.to_json()?).await?;
        tracing::debug!(path = %path.display(), turns = self.turns.len(), "transcript written");
        Ok(())
    }
}
