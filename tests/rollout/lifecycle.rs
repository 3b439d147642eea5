use std::sync::Arc;

use persona_loom::assembler::InjectionType;
use persona_loom::providers::{MockClient, ModelClient};
use persona_loom::rollout::{RolloutRunner, Speaker};

use super::rollout_harness::{ScriptedClient, load_scenario};

fn mock_runner(file: &str) -> RolloutRunner {
    RolloutRunner::new(
        load_scenario(file),
        Arc::new(MockClient::new("persona")) as Arc<dyn ModelClient>,
        Arc::new(MockClient::new("target")) as Arc<dyn ModelClient>,
    )
}

#[tokio::test]
async fn full_arc_alternates_speakers_and_visits_phases_in_order() {
    let transcript = mock_runner("student_persona.toml")
        .execute(None, Some(42))
        .await
        .expect("mock rollout completes");

    assert_eq!(transcript.turns.len(), 100);
    assert_eq!(transcript.metadata.n_turns, 50);
    assert_eq!(transcript.metadata.actual_turns, 100);
    assert!(transcript.is_sealed());
    assert!(transcript.metadata.aborted_at_turn.is_none());

    for (i, record) in transcript.turns.iter().enumerate() {
        let expected = if i % 2 == 0 {
            Speaker::Persona
        } else {
            Speaker::Interlocutor
        };
        assert_eq!(record.role, expected, "entry {i}");
        assert_eq!(record.turn as usize, i / 2);
    }

    let mut phases: Vec<&str> = transcript.turns.iter().map(|r| r.phase.as_str()).collect();
    phases.dedup();
    assert_eq!(phases, ["guarded", "cracking", "engaging"]);

    let phase_at = |turn: u32| {
        transcript
            .turns
            .iter()
            .find(|r| r.turn == turn)
            .map(|r| r.phase.clone())
            .unwrap()
    };
    assert_eq!(phase_at(14), "guarded");
    assert_eq!(phase_at(15), "cracking");
    assert_eq!(phase_at(34), "cracking");
    assert_eq!(phase_at(35), "engaging");
}

#[tokio::test]
async fn persona_entries_carry_the_injection_schedule() {
    let transcript = mock_runner("student_persona.toml")
        .execute(Some(10), None)
        .await
        .unwrap();

    let persona_kinds: Vec<InjectionType> = transcript
        .turns
        .iter()
        .filter(|r| r.role == Speaker::Persona)
        .map(|r| r.injection_type)
        .collect();
    assert_eq!(
        persona_kinds,
        [
            InjectionType::Full,
            InjectionType::None,
            InjectionType::Reminder,
            InjectionType::None,
            InjectionType::Reminder,
            InjectionType::Full,
            InjectionType::Reminder,
            InjectionType::None,
            InjectionType::Reminder,
            InjectionType::None,
        ]
    );
    assert!(
        transcript
            .turns
            .iter()
            .filter(|r| r.role == Speaker::Interlocutor)
            .all(|r| r.injection_type == InjectionType::None)
    );
}

#[tokio::test]
async fn schedules_are_reproducible_across_rollouts() {
    let runner = mock_runner("student_persona.toml");
    let a = runner.execute(Some(20), Some(1)).await.unwrap();
    let b = runner.execute(Some(20), Some(2)).await.unwrap();

    assert_ne!(a.metadata.rollout_id, b.metadata.rollout_id);
    assert_eq!(a.metadata.config_hash, b.metadata.config_hash);
    for (x, y) in a.turns.iter().zip(&b.turns) {
        assert_eq!(x.phase, y.phase);
        assert_eq!(x.intensities, y.intensities);
        assert_eq!(x.injection_type, y.injection_type);
    }
}

#[tokio::test]
async fn first_persona_call_gets_opening_message_and_full_prompt() {
    let persona = Arc::new(ScriptedClient::new("persona"));
    let runner = RolloutRunner::new(
        load_scenario("student_persona.toml"),
        Arc::clone(&persona) as Arc<dyn ModelClient>,
        Arc::new(ScriptedClient::new("target")) as Arc<dyn ModelClient>,
    );
    runner.execute(Some(3), Some(9)).await.unwrap();

    let calls = persona.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].message_count, 1);
    assert_eq!(
        calls[0].last_message,
        "Hey, thanks for coming by. How's the semester going?"
    );
    assert!(calls[0].system.contains("Sam"));
    assert!(calls.iter().all(|c| c.seed == Some(9)));

    // Turn 1 carries the turn-0 system prompt; turn 2 gets a reminder.
    assert_eq!(calls[1].system, calls[0].system);
    assert!(calls[2].last_message.starts_with("target reply 2"));
    assert!(calls[2].last_message.contains("\n\n[Stay in character. Phase: guarded."));
}

#[tokio::test]
async fn metadata_names_both_models() {
    let transcript = mock_runner("minimal.toml").execute(Some(2), Some(3)).await.unwrap();
    assert_eq!(transcript.metadata.persona_model, "mock/persona");
    assert_eq!(transcript.metadata.target_model, "mock/target");
    assert_eq!(transcript.metadata.seed, 3);
    assert_eq!(transcript.metadata.config_hash.len(), 12);
}
