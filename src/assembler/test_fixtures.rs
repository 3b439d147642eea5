use crate::config::ScenarioConfig;

pub(crate) const STUDENT_SCENARIO: &str = include_str!("../../scenarios/student_persona.toml");

/// Three phases, two dimensions, 50 turns.
pub(crate) fn scenario() -> ScenarioConfig {
    ScenarioConfig::from_toml_str(STUDENT_SCENARIO, "student_persona.toml")
        .expect("bundled scenario is valid")
}
