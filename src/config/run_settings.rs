use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Per-invocation execution settings for `loom run`.
///
/// Priority: CLI flag > `LOOM_*` environment variable > built-in default.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// `provider/model` for the persona side.
    pub persona_model: Option<String>,
    /// `provider/model` for the interlocutor under evaluation.
    pub target_model: Option<String>,
    /// Overrides `trajectory.expected_turns`.
    pub turns: Option<u32>,
    pub rollouts: u32,
    pub seed: Option<u64>,
    pub temperature: Option<f64>,
    pub output_dir: PathBuf,
    /// Maximum rollouts in flight at once.
    pub concurrency: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            persona_model: None,
            target_model: None,
            turns: None,
            rollouts: 1,
            seed: None,
            temperature: None,
            output_dir: PathBuf::from("transcripts"),
            concurrency: 1,
        }
    }
}

impl RunSettings {
    /// Fill settings the command line left unset from the environment.
    pub fn apply_env_overrides(&mut self) {
        if self.persona_model.is_none()
            && let Ok(model) = std::env::var("LOOM_PERSONA_MODEL")
            && !model.trim().is_empty()
        {
            self.persona_model = Some(model.trim().to_string());
        }

        if self.target_model.is_none()
            && let Ok(model) = std::env::var("LOOM_TARGET_MODEL")
            && !model.trim().is_empty()
        {
            self.target_model = Some(model.trim().to_string());
        }

        if self.seed.is_none()
            && let Ok(seed_str) = std::env::var("LOOM_SEED")
            && let Ok(seed) = seed_str.trim().parse::<u64>()
        {
            self.seed = Some(seed);
        }

        if self.temperature.is_none()
            && let Ok(temp_str) = std::env::var("LOOM_TEMPERATURE")
            && let Ok(temp) = temp_str.trim().parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.temperature = Some(temp);
        }
    }

    pub fn persona_model(&self) -> Result<&str, ConfigError> {
        self.persona_model.as_deref().ok_or_else(|| {
            ConfigError::MissingSetting(
                "persona model (pass --persona-model or set LOOM_PERSONA_MODEL)".into(),
            )
        })
    }

    pub fn target_model(&self) -> Result<&str, ConfigError> {
        self.target_model.as_deref().ok_or_else(|| {
            ConfigError::MissingSetting(
                "target model (pass --target or set LOOM_TARGET_MODEL)".into(),
            )
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Rollout `index` runs with the base seed offset by its index.
    pub fn rollout_seed(&self, index: u32) -> u64 {
        self.seed.unwrap_or(0).wrapping_add(u64::from(index))
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}
