use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_VALUE: f64 = 0.0;
pub const DEFAULT_MAX_VALUE: f64 = 0.9;

/// How the conversation length is determined. Only fixed-length arcs are
/// supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrajectoryMode {
    #[default]
    FixedLength,
}

/// Progress → [0, 1] shaping curve for one dimension.
///
/// ```toml
/// curve = { type = "sigmoid", midpoint_pct = 0.6 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveConfig {
    Linear,
    Sigmoid { midpoint_pct: f64 },
    DelayedRamp { delay_pct: f64 },
    Step { step_thresholds: Vec<f64> },
}

/// A named behavioral level, ordered low → high within its dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub description: String,
}

/// A single trajectory dimension (e.g. distress, openness).
///
/// `start_value`/`end_value` are the curve endpoints; `min_value`/`max_value`
/// clamp the interpolated value at every turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub levels: Vec<LevelConfig>,
    pub curve: CurveConfig,
    pub start_value: f64,
    pub end_value: f64,
    #[serde(default = "default_min_value")]
    pub min_value: f64,
    #[serde(default = "default_max_value")]
    pub max_value: f64,
}

fn default_min_value() -> f64 {
    DEFAULT_MIN_VALUE
}

fn default_max_value() -> f64 {
    DEFAULT_MAX_VALUE
}

/// Ordered disclosure intensity label.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DisclosureLevel {
    Subtle,
    Moderate,
    Direct,
}

impl DisclosureLevel {
    /// Low → high.
    pub const ALL: [Self; 3] = [Self::Subtle, Self::Moderate, Self::Direct];

    pub fn from_intensity(value: f64) -> Self {
        if value < 0.33 {
            Self::Subtle
        } else if value < 0.66 {
            Self::Moderate
        } else {
            Self::Direct
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Subtle => 0,
            Self::Moderate => 1,
            Self::Direct => 2,
        }
    }
}

/// A backstory topic the persona can disclose, with per-level wording.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevelationConfig {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct: Option<String>,
}

impl RevelationConfig {
    pub fn variant(&self, level: DisclosureLevel) -> Option<&str> {
        match level {
            DisclosureLevel::Subtle => self.subtle.as_deref(),
            DisclosureLevel::Moderate => self.moderate.as_deref(),
            DisclosureLevel::Direct => self.direct.as_deref(),
        }
    }
}

/// A named span of progress with its own requirements and disclosures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub name: String,
    /// Fraction of the conversation at which this phase ends (inclusive).
    pub end_pct: f64,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub forbidden: Vec<String>,
    #[serde(default)]
    pub revelations: Vec<RevelationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    #[serde(default)]
    pub mode: TrajectoryMode,
    pub expected_turns: u32,
    /// Dimension whose value picks disclosure wording. Defaults to the first
    /// declared dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revelation_dimension: Option<String>,
    pub dimensions: Vec<DimensionConfig>,
    pub phases: Vec<PhaseConfig>,
}

impl TrajectoryConfig {
    pub fn dimension(&self, name: &str) -> Option<&DimensionConfig> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn phase(&self, name: &str) -> Option<&PhaseConfig> {
        self.phases.iter().find(|p| p.name == name)
    }

    pub fn revelation_dimension(&self) -> Option<&str> {
        self.revelation_dimension
            .as_deref()
            .or_else(|| self.dimensions.first().map(|d| d.name.as_str()))
    }
}
