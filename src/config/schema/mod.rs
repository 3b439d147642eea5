mod interaction;
mod persona;
mod safety;
mod trajectory;

pub use interaction::{
    AntiCapitulationConfig, InjectionConfig, InteractionConfig, Redirect, RepetitionConfig,
    ResistanceLevel, ResponseLengthConfig, StagnationConfig, StructuralPattern,
    default_interlocutor_system_prompt, default_opening_message,
};
pub use persona::{CapabilityBounds, IdentityConfig, PersonaConfig};
pub use safety::{DEFAULT_INTENSITY_CEILING, SafetyConfig};
pub use trajectory::{
    CurveConfig, DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE, DimensionConfig, DisclosureLevel,
    LevelConfig, PhaseConfig, RevelationConfig, TrajectoryConfig, TrajectoryMode,
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Current scenario format version. Bump on breaking changes.
pub const SCHEMA_VERSION: &str = "0.1.0";
pub const SUPPORTED_SCHEMA_VERSIONS: &[&str] = &["0.1.0"];

/// Length of the hex content hash recorded in transcripts.
const CONTENT_HASH_LEN: usize = 12;

/// Root of a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub schema_version: String,
    pub persona: PersonaConfig,
    pub trajectory: TrajectoryConfig,
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
}

impl ScenarioConfig {
    pub fn persona_name(&self) -> &str {
        &self.persona.identity.name
    }

    pub fn expected_turns(&self) -> u32 {
        self.trajectory.expected_turns
    }

    /// Short SHA-256 of the canonical JSON form, for transcript provenance.
    pub fn content_hash(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        let mut encoded = hex::encode(digest);
        encoded.truncate(CONTENT_HASH_LEN);
        encoded
    }
}
