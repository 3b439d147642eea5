use super::{Monitor, MonitorAction, MonitorInput, MonitorResult};
use crate::config::{RepetitionConfig, StructuralPattern};
use regex::Regex;
use std::collections::VecDeque;
use std::sync::LazyLock;

pub const REPETITION_MONITOR: &str = "repetition";

/// Rolling window length kept per structural detector.
const WINDOW: usize = 5;
const QUESTION_STREAK: usize = 4;
const GRATITUDE_STREAK: usize = 3;

static GRATITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(thank\s+you|thanks|i\s+appreciate|grateful)\b").expect("static regex")
});

/// Last `WINDOW` pass/fail flags for one detector.
#[derive(Debug, Default)]
struct Streak {
    flags: VecDeque<bool>,
}

impl Streak {
    fn push(&mut self, flag: bool) {
        if self.flags.len() == WINDOW {
            self.flags.pop_front();
        }
        self.flags.push_back(flag);
    }

    /// True when the most recent `n` flags are all set.
    fn trailing(&self, n: usize) -> bool {
        self.flags.len() >= n && self.flags.iter().rev().take(n).all(|&f| f)
    }
}

/// Catches banned phrases and formulaic turn shapes.
pub struct RepetitionMonitor {
    config: RepetitionConfig,
    banned_lower: Vec<String>,
    questions: Streak,
    gratitude: Streak,
}

impl RepetitionMonitor {
    pub fn new(config: RepetitionConfig) -> Self {
        let banned_lower = config
            .banned_patterns
            .iter()
            .map(|p| p.to_lowercase())
            .collect();
        Self {
            config,
            banned_lower,
            questions: Streak::default(),
            gratitude: Streak::default(),
        }
    }

    fn banned_hit(&self, response: &str) -> Option<&str> {
        let lower = response.to_lowercase();
        self.config
            .banned_patterns
            .iter()
            .zip(&self.banned_lower)
            .find(|(_, needle)| lower.contains(needle.as_str()))
            .map(|(original, _)| original.as_str())
    }

    fn structural(pattern: StructuralPattern, streak: usize, reason: &str) -> MonitorResult {
        MonitorResult::new(
            MonitorAction::RePrompt,
            format!("Structural pattern: {streak}+ consecutive responses {reason}"),
        )
        .with_detail("type", "structural")
        .with_detail("pattern", detail_name(pattern))
    }
}

/// Name reported in `details.pattern`; the question detector keeps its short form.
fn detail_name(pattern: StructuralPattern) -> &'static str {
    match pattern {
        StructuralPattern::EndsWithQuestionToInterlocutor => "ends_with_question",
        StructuralPattern::GratitudeLoop => "gratitude_loop",
    }
}

impl Monitor for RepetitionMonitor {
    fn name(&self) -> &'static str {
        REPETITION_MONITOR
    }

    fn check(&mut self, input: &MonitorInput<'_>) -> MonitorResult {
        if !self.config.enabled {
            return MonitorResult::ok();
        }

        if let Some(pattern) = self.banned_hit(input.response) {
            tracing::debug!(turn = input.turn, pattern, "banned pattern matched");
            return MonitorResult::new(
                MonitorAction::RePrompt,
                format!("Banned pattern detected: '{pattern}'"),
            )
            .with_detail("pattern", pattern)
            .with_detail("type", "banned");
        }

        // Both windows advance on every checked response, whichever detector fires.
        self.questions.push(input.response.trim().ends_with('?'));
        self.gratitude.push(GRATITUDE.is_match(input.response));

        for &pattern in &self.config.structural_patterns {
            let hit = match pattern {
                StructuralPattern::EndsWithQuestionToInterlocutor => self
                    .questions
                    .trailing(QUESTION_STREAK)
                    .then(|| Self::structural(pattern, QUESTION_STREAK, "ending with a question")),
                StructuralPattern::GratitudeLoop => self.gratitude.trailing(GRATITUDE_STREAK).then(
                    || Self::structural(pattern, GRATITUDE_STREAK, "with gratitude expressions"),
                ),
            };
            if let Some(result) = hit {
                return result;
            }
        }

        MonitorResult::ok()
    }
}
