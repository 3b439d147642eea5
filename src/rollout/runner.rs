use super::history::{self, Speaker, Utterance};
use super::transcript::{MonitorEvent, Transcript, TurnRecord};
use crate::assembler::{InjectionType, PromptAssembler, TurnState};
use crate::config::{DEFAULT_TEMPERATURE, ScenarioConfig};
use crate::error::{LlmError, PromptError, RolloutError};
use crate::monitors::{Monitor, MonitorAction, MonitorInput, MonitorResult, create_monitors};
use crate::providers::{ChatMessage, ModelClient, Role};
use std::sync::Arc;

/// Appended as a user message on every re-prompt attempt.
pub const VARY_DIRECTIVE: &str = "[SYSTEM: Your previous response was too formulaic. \
     Vary your language and structure. Do not repeat patterns.]";

const EMERGENCY_SEED_OFFSET: u64 = 1000;
const REPROMPT_SEED_OFFSET: u64 = 2000;
const PREVIEW_CHARS: usize = 80;

/// Drives persona/interlocutor conversations for one scenario.
///
/// The runner itself is immutable; every [`execute`](Self::execute) call
/// builds its own assembler, monitors and transcript, so one runner can
/// serve concurrent rollouts.
pub struct RolloutRunner {
    config: Arc<ScenarioConfig>,
    persona: Arc<dyn ModelClient>,
    interlocutor: Arc<dyn ModelClient>,
    seed: Option<u64>,
    temperature: f64,
}

/// Per-rollout mutable state.
struct Session {
    assembler: PromptAssembler,
    monitors: Vec<Box<dyn Monitor>>,
    transcript: Transcript,
    history: Vec<Utterance>,
    /// Carries over between full injections.
    system_prompt: String,
    seed: Option<u64>,
}

enum TurnError {
    Llm(LlmError),
    Prompt(PromptError),
}

impl From<LlmError> for TurnError {
    fn from(err: LlmError) -> Self {
        Self::Llm(err)
    }
}

impl From<PromptError> for TurnError {
    fn from(err: PromptError) -> Self {
        Self::Prompt(err)
    }
}

impl RolloutRunner {
    pub fn new(
        config: Arc<ScenarioConfig>,
        persona: Arc<dyn ModelClient>,
        interlocutor: Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            config,
            persona,
            interlocutor,
            seed: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Run one rollout of `n_turns` (default: the scenario's expected turns).
    ///
    /// A failed model call aborts the rollout; the transcript recorded so far
    /// is sealed and returned inside [`RolloutError::Aborted`].
    pub async fn execute(
        &self,
        n_turns: Option<u32>,
        seed: Option<u64>,
    ) -> Result<Transcript, RolloutError> {
        let seed = seed.or(self.seed);
        let n_turns = n_turns
            .filter(|&n| n > 0)
            .unwrap_or_else(|| self.config.expected_turns());

        let mut session = Session {
            assembler: PromptAssembler::new(Arc::clone(&self.config))?,
            monitors: create_monitors(&self.config),
            transcript: Transcript::new(
                self.config.content_hash(),
                self.persona.identifier(),
                self.interlocutor.identifier(),
                seed,
                n_turns,
            ),
            history: Vec::new(),
            system_prompt: String::new(),
            seed,
        };
        tracing::info!(
            rollout_id = %session.transcript.metadata.rollout_id,
            persona = %self.persona.identifier(),
            target = %self.interlocutor.identifier(),
            n_turns,
            seed = ?seed,
            "rollout started"
        );

        for turn in 0..n_turns {
            match self.run_turn(&mut session, turn, n_turns).await {
                Ok(()) => {}
                Err(TurnError::Prompt(err)) => return Err(err.into()),
                Err(TurnError::Llm(source)) => {
                    tracing::warn!(turn, error = %source, "model call failed; aborting rollout");
                    session.transcript.seal_aborted(turn);
                    return Err(RolloutError::Aborted {
                        turn,
                        source,
                        partial: Box::new(session.transcript),
                    });
                }
            }
        }

        session.transcript.seal();
        tracing::info!(
            rollout_id = %session.transcript.metadata.rollout_id,
            entries = session.transcript.turns.len(),
            events = session.transcript.monitor_events.len(),
            "rollout finished"
        );
        Ok(session.transcript)
    }

    async fn run_turn(&self, s: &mut Session, turn: u32, n_turns: u32) -> Result<(), TurnError> {
        let (blocks, state) = s.assembler.build(turn)?;
        tracing::info!(
            turn,
            n_turns,
            phase = %state.phase,
            injection = %state.injection_type,
            "turn"
        );

        let mut messages = history::for_persona(&s.history);
        match state.injection_type {
            InjectionType::Full => s.system_prompt = blocks.full_system_prompt(),
            InjectionType::Reminder => append_reminder(&mut messages, s.assembler.reminder(&state)),
            InjectionType::None => {}
        }
        if messages.is_empty() {
            messages.push(ChatMessage::user(&self.config.interaction.opening_message));
        }

        let mut response = self
            .persona
            .generate(&messages, &s.system_prompt, s.seed, self.temperature)
            .await?;
        tracing::debug!(turn, persona = %preview(&response), "persona replied");

        let mut events = Vec::new();
        let mut retries = 0u32;
        for monitor in &mut s.monitors {
            let result = monitor.check(&MonitorInput {
                turn,
                response: &response,
                history: &s.history,
                disclosures: &s.assembler,
            });
            if result.is_ok() {
                continue;
            }

            tracing::info!(
                turn,
                monitor = monitor.name(),
                action = %result.action,
                "{}",
                result.reason
            );
            let event = MonitorEvent::from_result(turn, monitor.name(), &result);
            s.transcript.add_monitor_event(event.clone());
            events.push(event);

            match result.action {
                MonitorAction::EmergencyInjection => {
                    let system = emergency_system_prompt(&result, &s.system_prompt);
                    let seed = offset_seed(s.seed, EMERGENCY_SEED_OFFSET + u64::from(turn));
                    response = self
                        .persona
                        .generate(&messages, &system, seed, self.temperature)
                        .await?;
                    retries += 1;
                    tracing::debug!(turn, persona = %preview(&response), "regenerated after injection");
                }
                MonitorAction::RePrompt => {
                    let max_retries = self.config.interaction.repetition_detection.max_retries;
                    let mut varied = messages.clone();
                    varied.push(ChatMessage::user(VARY_DIRECTIVE));

                    for attempt in 0..max_retries {
                        let seed = offset_seed(
                            s.seed,
                            REPROMPT_SEED_OFFSET + 10 * u64::from(turn) + u64::from(attempt),
                        );
                        response = self
                            .persona
                            .generate(&varied, &s.system_prompt, seed, self.temperature)
                            .await?;
                        retries += 1;

                        let recheck = monitor.check(&MonitorInput {
                            turn,
                            response: &response,
                            history: &s.history,
                            disclosures: &s.assembler,
                        });
                        if recheck.is_ok() {
                            tracing::debug!(turn, attempt = attempt + 1, "re-prompt cleared");
                            break;
                        }
                        if attempt + 1 == max_retries {
                            tracing::warn!(
                                turn,
                                monitor = monitor.name(),
                                "re-prompt budget exhausted; keeping last response"
                            );
                        }
                    }
                }
                MonitorAction::LogOnly | MonitorAction::Ok => {}
            }
            // First non-ok monitor ends the checks for this turn.
            break;
        }

        record(s, &state, Speaker::Persona, &response, state.injection_type, events, retries);
        s.history.push(Utterance::persona(response));

        let reply = self
            .interlocutor
            .generate(
                &history::for_interlocutor(&s.history),
                &self.config.interaction.interlocutor_system_prompt,
                s.seed,
                self.temperature,
            )
            .await?;
        tracing::debug!(turn, interlocutor = %preview(&reply), "interlocutor replied");

        record(s, &state, Speaker::Interlocutor, &reply, InjectionType::None, Vec::new(), 0);
        s.history.push(Utterance::interlocutor(reply));
        Ok(())
    }
}

fn record(
    s: &mut Session,
    state: &TurnState,
    role: Speaker,
    content: &str,
    injection_type: InjectionType,
    monitor_events: Vec<MonitorEvent>,
    retries: u32,
) {
    s.transcript.add_turn(TurnRecord {
        turn: state.turn,
        role,
        content: content.to_string(),
        phase: state.phase.clone(),
        intensities: state.intensities.clone(),
        injection_type,
        monitor_events,
        retries,
        timestamp: None,
    });
}

/// Reminder rides on the latest user message, or becomes its own message.
fn append_reminder(messages: &mut Vec<ChatMessage>, reminder: String) {
    match messages.last_mut() {
        Some(last) if last.role == Role::User => {
            last.content.push_str("\n\n");
            last.content.push_str(&reminder);
        }
        _ => messages.push(ChatMessage::user(reminder)),
    }
}

fn emergency_system_prompt(result: &MonitorResult, current: &str) -> String {
    let injection = result.injection_text.as_deref().unwrap_or_default();
    format!("{injection}\n\n{current}")
}

fn offset_seed(seed: Option<u64>, offset: u64) -> Option<u64> {
    seed.map(|s| s.wrapping_add(offset))
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
