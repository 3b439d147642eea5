use crate::rollout::Transcript;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Loom.
///
/// Each subsystem defines its own error enum. Library callers can match on
/// these to decide recovery strategy; the binary edges continue to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum LoomError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    // ── Transcript output ───────────────────────────────────────────────
    #[error("transcript: {0}")]
    Transcript(#[from] TranscriptError),

    // ── Rollout ─────────────────────────────────────────────────────────
    #[error("rollout: {0}")]
    Rollout(#[from] RolloutError),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("unsupported config extension: {0} (expected .toml)")]
    UnsupportedExtension(String),

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// Multi-line report listing every offending field.
    #[error("{0}")]
    Validation(String),

    #[error("missing setting: {0}")]
    MissingSetting(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} credentials not set; export {env_var}")]
    MissingCredential {
        provider: String,
        env_var: &'static str,
    },

    #[error("invalid model string '{0}' (expected provider/model)")]
    InvalidModelString(String),

    #[error("unknown provider '{0}' (supported: anthropic, openai, mock)")]
    UnknownProvider(String),

    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned an empty response")]
    EmptyResponse { provider: String },
}

impl LlmError {
    /// Credential and model-string problems are configuration mistakes, not
    /// transient call failures.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. } | Self::InvalidModelString(_) | Self::UnknownProvider(_)
        )
    }
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to render template {template}: {message}")]
    Render { template: String, message: String },
}

// ─── Transcript errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ─── Rollout errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RolloutError {
    /// A model call failed. The transcript recorded so far travels with the
    /// error so the caller can persist it.
    #[error("rollout aborted at turn {turn}: {source}")]
    Aborted {
        turn: u32,
        #[source]
        source: LlmError,
        partial: Box<Transcript>,
    },

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, LoomError>;
