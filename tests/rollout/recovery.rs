use std::sync::Arc;

use persona_loom::monitors::MonitorAction;
use persona_loom::providers::ModelClient;
use persona_loom::rollout::{RolloutRunner, Speaker, VARY_DIRECTIVE};

use super::rollout_harness::{ScriptedClient, load_scenario};

fn runner(persona: &Arc<ScriptedClient>) -> RolloutRunner {
    RolloutRunner::new(
        load_scenario("student_persona.toml"),
        Arc::clone(persona) as Arc<dyn ModelClient>,
        Arc::new(ScriptedClient::new("target")) as Arc<dyn ModelClient>,
    )
}

#[tokio::test]
async fn looping_persona_gets_emergency_injection_after_min_turn() {
    let persona =
        Arc::new(ScriptedClient::new("persona").replying(["I'll log everything and get back to you."]));
    let transcript = runner(&persona).execute(Some(12), Some(7)).await.unwrap();

    // Ten quiet turns, then an extra regeneration on turns 10 and 11.
    let calls = persona.calls();
    assert_eq!(calls.len(), 14);
    assert_eq!(calls[10].seed, Some(7));
    assert_eq!(calls[11].seed, Some(1017));
    assert_eq!(calls[13].seed, Some(1018));

    let injected = &calls[11].system;
    assert!(injected.starts_with("[DIRECTOR NOTE: Sam is repeating themselves. Move on: bring up "));
    assert!(injected.ends_with(&format!("\n\n{}", calls[10].system)));

    assert_eq!(transcript.monitor_events.len(), 2);
    for (event, turn) in transcript.monitor_events.iter().zip([10, 11]) {
        assert_eq!(event.turn, turn);
        assert_eq!(event.monitor, "stagnation");
        assert_eq!(event.action, MonitorAction::EmergencyInjection);
        assert_eq!(event.details["self_similarity"], 1.0);
    }

    let turn_ten = transcript
        .turns
        .iter()
        .find(|r| r.turn == 10 && r.role == Speaker::Persona)
        .unwrap();
    assert_eq!(turn_ten.retries, 1);
    assert_eq!(turn_ten.monitor_events.len(), 1);
}

#[tokio::test]
async fn banned_phrase_exhausts_reprompts_with_offset_seeds() {
    let persona = Arc::new(ScriptedClient::new("persona").replying(["As an AI, I can't really say."]));
    let transcript = runner(&persona).execute(Some(2), Some(5)).await.unwrap();

    assert_eq!(
        persona.seeds(),
        [Some(5), Some(2005), Some(2006), Some(5), Some(2015), Some(2016)]
    );

    let calls = persona.calls();
    assert_eq!(calls[1].last_message, VARY_DIRECTIVE);
    assert_eq!(calls[1].message_count, calls[0].message_count + 1);

    assert_eq!(transcript.monitor_events.len(), 2);
    assert!(
        transcript
            .monitor_events
            .iter()
            .all(|e| e.action == MonitorAction::RePrompt && e.monitor == "repetition")
    );
    let persona_turns: Vec<_> = transcript
        .turns
        .iter()
        .filter(|r| r.role == Speaker::Persona)
        .collect();
    assert!(persona_turns.iter().all(|r| r.retries == 2));
    assert_eq!(persona_turns[0].content, "As an AI, I can't really say.");
}

#[tokio::test]
async fn reprompt_stops_once_the_response_is_clean() {
    let persona = Arc::new(
        ScriptedClient::new("persona").replying(["As an AI, I can't really say.", "honestly it's fine."]),
    );
    let transcript = runner(&persona).execute(Some(2), Some(5)).await.unwrap();

    assert_eq!(persona.seeds(), [Some(5), Some(2005), Some(5), Some(2015)]);
    let persona_turns: Vec<_> = transcript
        .turns
        .iter()
        .filter(|r| r.role == Speaker::Persona)
        .collect();
    for record in persona_turns {
        assert_eq!(record.retries, 1);
        assert_eq!(record.content, "honestly it's fine.");
    }
}

#[tokio::test]
async fn unseeded_rollouts_send_no_seed_even_on_retry() {
    let persona = Arc::new(ScriptedClient::new("persona").replying(["As an AI, I can't really say."]));
    runner(&persona).execute(Some(1), None).await.unwrap();
    assert_eq!(persona.seeds(), [None, None, None]);
}

#[tokio::test]
async fn first_failing_monitor_ends_the_checks_and_reprompts_recheck_only_it() {
    let persona =
        Arc::new(ScriptedClient::new("persona").replying(["so what do you think I should do?"]));
    let transcript = runner(&persona).execute(Some(12), Some(1)).await.unwrap();

    // Turns 0-2 pass, 3-9 exhaust both re-prompts, 10-11 regenerate once.
    let seeds = persona.seeds();
    assert_eq!(seeds.len(), 3 + 7 * 3 + 2 * 2);
    assert_eq!(seeds[3..6], [Some(1), Some(2031), Some(2032)]);
    assert_eq!(seeds[24..], [Some(1), Some(1011), Some(1), Some(1012)]);

    let events: Vec<_> = transcript
        .monitor_events
        .iter()
        .map(|e| (e.turn, e.monitor.as_str(), e.action))
        .collect();
    let mut expected: Vec<_> = (3..=9)
        .map(|turn| (turn, "repetition", MonitorAction::RePrompt))
        .collect();
    expected.push((10, "stagnation", MonitorAction::EmergencyInjection));
    expected.push((11, "stagnation", MonitorAction::EmergencyInjection));
    assert_eq!(events, expected);

    let persona_turns: Vec<_> = transcript
        .turns
        .iter()
        .filter(|r| r.role == Speaker::Persona)
        .collect();
    assert_eq!(persona_turns[5].retries, 2);
    assert_eq!(persona_turns[5].monitor_events[0].details["pattern"], "ends_with_question");
    assert_eq!(persona_turns[10].retries, 1);
    assert_eq!(persona_turns[10].monitor_events.len(), 1);
}
