use serde::{Deserialize, Serialize};

pub const DEFAULT_INTENSITY_CEILING: f64 = 0.9;

/// Safety boundaries for persona simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Hard upper bound applied to every dimension after its own clamp.
    #[serde(default = "default_intensity_ceiling")]
    pub intensity_ceiling: f64,
    #[serde(default)]
    pub forbidden_simulation_content: Vec<String>,
    #[serde(default)]
    pub escalation_policy: String,
    #[serde(default)]
    pub persona_safety_note: String,
}

fn default_intensity_ceiling() -> f64 {
    DEFAULT_INTENSITY_CEILING
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            intensity_ceiling: DEFAULT_INTENSITY_CEILING,
            forbidden_simulation_content: Vec::new(),
            escalation_policy: String::new(),
            persona_safety_note: String::new(),
        }
    }
}
