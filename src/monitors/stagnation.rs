use super::similarity::{TermFrequency, average_cross, average_pairwise, term_frequency};
use super::{Monitor, MonitorAction, MonitorInput, MonitorResult};
use crate::config::StagnationConfig;
use crate::rollout::Speaker;

pub const STAGNATION_MONITOR: &str = "stagnation";

/// Detects the persona looping on itself or mirroring the interlocutor.
///
/// Keeps no rolling state: every check recomputes from the history it is
/// handed.
pub struct StagnationMonitor {
    config: StagnationConfig,
    persona_name: String,
}

impl StagnationMonitor {
    pub fn new(config: StagnationConfig, persona_name: impl Into<String>) -> Self {
        Self {
            config,
            persona_name: persona_name.into(),
        }
    }

    fn injection_text(&self, next_topic: &str) -> String {
        self.config
            .intervention_template
            .replace("{name}", &self.persona_name)
            .replace("{next_unused_revelation}", next_topic)
    }

    fn trigger(&self, input: &MonitorInput<'_>, reason: String, key: &str, score: f64) -> MonitorResult {
        tracing::info!(turn = input.turn, score, "{reason}");
        MonitorResult::new(MonitorAction::EmergencyInjection, reason)
            .with_injection(self.injection_text(input.disclosures.next_unused_topic()))
            .with_detail(key, round3(score))
    }
}

impl Monitor for StagnationMonitor {
    fn name(&self) -> &'static str {
        STAGNATION_MONITOR
    }

    fn check(&mut self, input: &MonitorInput<'_>) -> MonitorResult {
        if !self.config.enabled || input.turn < self.config.min_turn {
            return MonitorResult::ok();
        }
        let window = self.config.window as usize;

        let persona: Vec<&str> = messages_from(input, Speaker::Persona);
        let prior = persona.len().saturating_sub(window.saturating_sub(1));
        let persona_vectors: Vec<TermFrequency> = persona[prior..]
            .iter()
            .copied()
            .chain(std::iter::once(input.response))
            .map(term_frequency)
            .collect();
        if persona_vectors.len() < 2 {
            return MonitorResult::ok();
        }

        let self_similarity = average_pairwise(&persona_vectors);
        if self_similarity >= self.config.similarity_threshold {
            let reason = format!(
                "Persona self-similarity {self_similarity:.2} >= {}",
                self.config.similarity_threshold
            );
            return self.trigger(input, reason, "self_similarity", self_similarity);
        }

        let interlocutor = messages_from(input, Speaker::Interlocutor);
        if !interlocutor.is_empty() {
            let start = interlocutor.len().saturating_sub(window);
            let interlocutor_vectors: Vec<TermFrequency> =
                interlocutor[start..].iter().copied().map(term_frequency).collect();
            let convergence = average_cross(&persona_vectors, &interlocutor_vectors);
            if convergence >= self.config.convergence_threshold {
                let reason = format!(
                    "Persona-interlocutor convergence {convergence:.2} >= {}",
                    self.config.convergence_threshold
                );
                return self.trigger(input, reason, "convergence_similarity", convergence);
            }
        }

        MonitorResult::ok()
    }
}

fn messages_from<'a>(input: &MonitorInput<'a>, speaker: Speaker) -> Vec<&'a str> {
    input
        .history
        .iter()
        .filter(|u| u.speaker == speaker)
        .map(|u| u.content.as_str())
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
