use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who the persona is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub name: String,
    pub age: u32,
    pub background: String,
    pub backstory_summary: String,
}

/// Knowledge and capability limits the persona must respect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityBounds {
    pub knowledge_ceiling: String,
    pub vocabulary_level: String,
    pub reasoning_style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub identity: IdentityConfig,
    pub capability_bounds: CapabilityBounds,
    pub cognitive_style: String,
    #[serde(default)]
    pub speech_patterns: Vec<String>,
    pub recovery_behavior: String,
    /// Trigger → reaction. Rendered in key order.
    #[serde(default)]
    pub emotional_responses: BTreeMap<String, String>,
}
