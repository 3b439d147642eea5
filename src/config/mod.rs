mod loader;
mod run_settings;
pub mod schema;
#[cfg(test)]
pub(crate) mod test_env;
mod validate;

pub use run_settings::{DEFAULT_TEMPERATURE, RunSettings};
pub use schema::{
    AntiCapitulationConfig, CapabilityBounds, CurveConfig, DimensionConfig, DisclosureLevel,
    IdentityConfig, InjectionConfig, InteractionConfig, LevelConfig, PersonaConfig, PhaseConfig,
    Redirect, RepetitionConfig, ResistanceLevel, ResponseLengthConfig, RevelationConfig,
    SCHEMA_VERSION, SafetyConfig, ScenarioConfig, StagnationConfig, StructuralPattern,
    TrajectoryConfig, TrajectoryMode,
};
pub use validate::{ValidationIssue, format_report, validate};
