use std::sync::Arc;

use persona_loom::app::batch::{RolloutOutcome, run_batch};
use persona_loom::config::RunSettings;
use persona_loom::error::{LlmError, RolloutError};
use persona_loom::providers::ModelClient;
use persona_loom::rollout::{RolloutRunner, Speaker};

use super::rollout_harness::{ScriptedClient, load_scenario};

fn runner_with_failing_target(fail_on_call: usize) -> RolloutRunner {
    RolloutRunner::new(
        load_scenario("student_persona.toml"),
        Arc::new(ScriptedClient::new("persona")) as Arc<dyn ModelClient>,
        Arc::new(ScriptedClient::new("target").failing_on_call(fail_on_call)) as Arc<dyn ModelClient>,
    )
}

#[tokio::test]
async fn failed_call_returns_sealed_partial_transcript() {
    let err = runner_with_failing_target(3)
        .execute(Some(5), Some(1))
        .await
        .unwrap_err();

    let RolloutError::Aborted {
        turn,
        source,
        partial,
    } = err
    else {
        panic!("expected an aborted rollout");
    };
    assert_eq!(turn, 2);
    assert!(matches!(source, LlmError::Request { .. }));

    assert_eq!(partial.turns.len(), 5);
    assert_eq!(partial.turns.last().unwrap().role, Speaker::Persona);
    assert_eq!(partial.metadata.aborted_at_turn, Some(2));
    assert_eq!(partial.metadata.actual_turns, 5);
    assert!(partial.is_sealed());
}

#[tokio::test]
async fn batch_writes_partial_file_and_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    let settings = RunSettings {
        turns: Some(4),
        rollouts: 2,
        seed: Some(100),
        output_dir: dir.path().join("out"),
        ..RunSettings::default()
    };

    // The shared target fails once, during the first rollout.
    let outcomes = run_batch(&runner_with_failing_target(3), &settings)
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 2);

    let RolloutOutcome::Aborted { index, turn, path, .. } = &outcomes[0] else {
        panic!("first rollout should abort");
    };
    assert_eq!((*index, *turn), (0, 2));
    assert!(path.ends_with("rollout_000.partial.json"));

    let raw = std::fs::read_to_string(path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["metadata"]["aborted_at_turn"], 2);
    assert_eq!(json["metadata"]["seed"], 100);
    assert_eq!(json["turns"].as_array().unwrap().len(), 5);

    let RolloutOutcome::Completed { seed, path, .. } = &outcomes[1] else {
        panic!("second rollout should complete");
    };
    assert_eq!(*seed, 101);
    assert!(path.ends_with("rollout_001.json"));
    assert!(!dir.path().join("out/rollout_000.json").exists());
}
