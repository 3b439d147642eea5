use persona_loom::config::{ScenarioConfig, StructuralPattern, TrajectoryMode};
use persona_loom::error::ConfigError;

use super::rollout_harness::scenario_path;

#[test]
fn bundled_scenarios_load() {
    let student = ScenarioConfig::load(&scenario_path("student_persona.toml")).unwrap();
    assert_eq!(student.persona_name(), "Sam");
    assert_eq!(student.expected_turns(), 50);
    assert_eq!(student.trajectory.mode, TrajectoryMode::FixedLength);
    assert_eq!(student.trajectory.dimensions.len(), 2);
    assert_eq!(student.trajectory.phases.len(), 3);
    assert_eq!(
        student.interaction.repetition_detection.structural_patterns,
        [
            StructuralPattern::EndsWithQuestionToInterlocutor,
            StructuralPattern::GratitudeLoop
        ]
    );

    let minimal = ScenarioConfig::load(&scenario_path("minimal.toml")).unwrap();
    assert_eq!(minimal.persona_name(), "Test Person");
    assert!(minimal.interaction.stagnation_detection.enabled);
    assert!(minimal.interaction.repetition_detection.banned_patterns.is_empty());
    assert!(minimal.safety.forbidden_simulation_content.is_empty());
}

#[test]
fn content_hash_is_stable_and_sensitive() {
    let path = scenario_path("minimal.toml");
    let a = ScenarioConfig::load(&path).unwrap();
    let b = ScenarioConfig::load(&path).unwrap();
    assert_eq!(a.content_hash(), b.content_hash());

    let mut changed = b.clone();
    changed.trajectory.expected_turns = 21;
    assert_ne!(a.content_hash(), changed.content_hash());
}

#[test]
fn every_violation_is_reported_at_once() {
    let raw = std::fs::read_to_string(scenario_path("minimal.toml"))
        .unwrap()
        .replace("schema_version = \"0.1.0\"", "schema_version = \"9.9.9\"")
        .replace("expected_turns = 20", "expected_turns = 0")
        .replace("end_value = 0.8", "end_value = 1.4");

    let err = ScenarioConfig::from_toml_str(&raw, "broken.toml").unwrap_err();
    let ConfigError::Validation(report) = &err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(report.starts_with("Validation errors in broken.toml:"));
    assert!(report.contains("schema_version"));
    assert!(report.contains("trajectory.expected_turns"));
    assert!(report.contains("trajectory.dimensions[0].end_value"));
}

#[test]
fn malformed_toml_names_the_file() {
    let err = ScenarioConfig::from_toml_str("schema_version = ", "typo.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "typo.toml"));
}

#[test]
fn unknown_structural_pattern_is_rejected() {
    let raw = std::fs::read_to_string(scenario_path("minimal.toml")).unwrap()
        + "\n[interaction.repetition_detection]\nstructural_patterns = [\"sign_off\"]\n";
    let err = ScenarioConfig::from_toml_str(&raw, "patterns.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_file_and_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        ScenarioConfig::load(&missing),
        Err(ConfigError::NotFound(_))
    ));

    let yaml = dir.path().join("scenario.yaml");
    std::fs::write(&yaml, "schema_version: 0.1.0\n").unwrap();
    let err = ScenarioConfig::load(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedExtension(_)));
    assert!(err.to_string().contains("expected .toml"));
}
