use crate::assembler::{InjectionType, IntensitySnapshot, PromptAssembler};
use crate::config::ScenarioConfig;
use crate::error::PromptError;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

const RULE_WIDTH: usize = 72;

/// What the persona would receive on one turn, without any model call.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunTurn {
    pub turn: u32,
    pub phase: String,
    pub intensities: IntensitySnapshot,
    pub injection_type: InjectionType,
    pub directives: String,
    pub style: String,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
}

/// Simulate `min(turns, expected_turns)` turns with a fresh assembler.
pub fn simulate(config: Arc<ScenarioConfig>, turns: u32) -> Result<Vec<DryRunTurn>, PromptError> {
    let count = turns.min(config.expected_turns());
    let mut assembler = PromptAssembler::new(config)?;
    (0..count)
        .map(|turn| {
            let (blocks, state) = assembler.build(turn)?;
            let reminder = (state.injection_type == InjectionType::Reminder)
                .then(|| assembler.reminder(&state));
            Ok::<_, PromptError>(DryRunTurn {
                turn,
                phase: state.phase,
                intensities: state.intensities,
                injection_type: state.injection_type,
                directives: blocks.directives,
                style: blocks.style,
                context: blocks.context,
                reminder,
            })
        })
        .collect()
}

/// Human-readable schedule, one ruled header per turn.
pub fn render_text(turns: &[DryRunTurn]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    for t in turns {
        let intensities = t
            .intensities
            .iter()
            .map(|(name, value)| format!("{name}={value:.2}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(
            out,
            "TURN {}  |  Phase: {}  |  Injection: {}",
            t.turn, t.phase, t.injection_type
        );
        let _ = writeln!(out, "Intensities: {intensities}");
        let _ = writeln!(out, "{rule}");

        match t.injection_type {
            InjectionType::Full => {
                let _ = writeln!(out, "\n--- DIRECTIVES ---\n{}", t.directives);
                let _ = writeln!(out, "\n--- STYLE ---\n{}", t.style);
                let _ = writeln!(out, "\n--- CONTEXT ---\n{}", t.context);
            }
            InjectionType::Reminder => {
                let _ = writeln!(out, "\n--- REMINDER (appended to user message) ---");
                let _ = writeln!(out, "{}", t.reminder.as_deref().unwrap_or_default());
            }
            InjectionType::None => {
                let _ = writeln!(out, "(no injection this turn)");
            }
        }
    }
    let _ = writeln!(out, "\nDry-run complete: {} turns simulated.", turns.len());
    out
}

pub fn render_json(turns: &[DryRunTurn]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(turns)
}
