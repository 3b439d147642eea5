use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Controls when the scaffolding prompt is re-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionConfig {
    /// Full re-injection every N turns.
    pub frequency: u32,
    /// Reminder every N turns, excluding full-injection turns.
    pub reminder_frequency: u32,
    pub reminder_template: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResistanceLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redirect {
    pub trigger: String,
    pub replacement: String,
}

/// Rules that keep the persona from simply agreeing with the interlocutor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AntiCapitulationConfig {
    #[serde(default)]
    pub resistance_level: ResistanceLevel,
    #[serde(default)]
    pub redirects: Vec<Redirect>,
    #[serde(default)]
    pub forbidden_phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseLengthConfig {
    pub default: String,
    /// Phase name → length guidance.
    #[serde(default)]
    pub by_phase: BTreeMap<String, String>,
}

impl ResponseLengthConfig {
    pub fn for_phase(&self, phase: &str) -> &str {
        self.by_phase.get(phase).unwrap_or(&self.default)
    }
}

/// Agreement-loop detection over lexical similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagnationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_window")]
    pub window: u32,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,
    #[serde(default = "default_min_turn")]
    pub min_turn: u32,
    /// `{name}` and `{next_unused_revelation}` are substituted.
    #[serde(default = "default_intervention_template")]
    pub intervention_template: String,
}

fn default_true() -> bool {
    true
}

fn default_window() -> u32 {
    6
}

fn default_similarity_threshold() -> f64 {
    0.80
}

fn default_convergence_threshold() -> f64 {
    0.75
}

fn default_min_turn() -> u32 {
    10
}

fn default_intervention_template() -> String {
    "[DIRECTOR NOTE: {name}, the conversation is going in circles. \
     Break the loop: bring up {next_unused_revelation}, or react to something new.]"
        .into()
}

impl Default for StagnationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: default_window(),
            similarity_threshold: default_similarity_threshold(),
            convergence_threshold: default_convergence_threshold(),
            min_turn: default_min_turn(),
            intervention_template: default_intervention_template(),
        }
    }
}

/// Named turn-level formula detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StructuralPattern {
    EndsWithQuestionToInterlocutor,
    GratitudeLoop,
}

/// Formulaic-output detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Case-insensitive substrings that force a re-prompt.
    #[serde(default)]
    pub banned_patterns: Vec<String>,
    #[serde(default = "default_structural_patterns")]
    pub structural_patterns: Vec<StructuralPattern>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_structural_patterns() -> Vec<StructuralPattern> {
    vec![
        StructuralPattern::EndsWithQuestionToInterlocutor,
        StructuralPattern::GratitudeLoop,
    ]
}

fn default_max_retries() -> u32 {
    2
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            banned_patterns: Vec::new(),
            structural_patterns: default_structural_patterns(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub injection: InjectionConfig,
    #[serde(default)]
    pub anti_capitulation: AntiCapitulationConfig,
    pub response_length: ResponseLengthConfig,
    #[serde(default)]
    pub stagnation_detection: StagnationConfig,
    #[serde(default)]
    pub repetition_detection: RepetitionConfig,
    /// Sent as the first user message when the persona speaks first.
    #[serde(default = "default_opening_message")]
    pub opening_message: String,
    /// Framing system prompt for the interlocutor model.
    #[serde(default = "default_interlocutor_system_prompt")]
    pub interlocutor_system_prompt: String,
}

pub fn default_opening_message() -> String {
    "Hi there. How are you doing today?".into()
}

pub fn default_interlocutor_system_prompt() -> String {
    "You are having a conversation with someone who has come to talk to you. \
     Respond naturally and helpfully. Keep your responses concise."
        .into()
}
