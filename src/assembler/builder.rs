use super::injection::{InjectionScheduler, InjectionType};
use super::intensity::{IntensityResolver, IntensitySnapshot};
use super::reminder::render_reminder;
use super::revelation::RevelationSelector;
use crate::config::{DisclosureLevel, LevelConfig, ScenarioConfig};
use crate::error::PromptError;
use crate::monitors::DisclosureSource;
use crate::prompt::{ContextView, DirectivesView, PromptRenderer, StyleView};
use serde::Serialize;
use std::sync::Arc;

const MAX_LEVEL_DESCRIPTION_CHARS: usize = 200;

/// The three rendered prompt sections for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptBlocks {
    /// Requirements, prohibitions, anti-capitulation and intensity guidance.
    pub directives: String,
    /// Speech, length and recovery guidance.
    pub style: String,
    /// Identity, backstory, bounds and available disclosures.
    pub context: String,
}

impl PromptBlocks {
    pub fn full_system_prompt(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.directives, self.style, self.context)
    }
}

/// Scheduling facts for one turn. Pure function of turn index and config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnState {
    pub turn: u32,
    pub phase: String,
    pub intensities: IntensitySnapshot,
    pub injection_type: InjectionType,
}

/// Builds per-turn prompt sections for one rollout.
///
/// Holds the only mutable assembly state (which disclosures have been
/// offered), so each rollout needs its own instance.
pub struct PromptAssembler {
    config: Arc<ScenarioConfig>,
    intensity: IntensityResolver,
    scheduler: InjectionScheduler,
    revelations: RevelationSelector,
    renderer: PromptRenderer,
}

impl PromptAssembler {
    pub fn new(config: Arc<ScenarioConfig>) -> Result<Self, PromptError> {
        Ok(Self {
            intensity: IntensityResolver::new(Arc::clone(&config)),
            scheduler: InjectionScheduler::from_config(&config.interaction.injection),
            revelations: RevelationSelector::new(Arc::clone(&config)),
            renderer: PromptRenderer::new()?,
            config,
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Phase, intensities and injection type without rendering anything.
    pub fn turn_state(&self, turn: u32) -> TurnState {
        TurnState {
            turn,
            phase: self.intensity.resolve_phase(turn).to_string(),
            intensities: self.intensity.resolve(turn),
            injection_type: self.scheduler.injection_type(turn),
        }
    }

    /// Assemble all three sections for `turn`. Disclosures offered here are
    /// marked used.
    pub fn build(&mut self, turn: u32) -> Result<(PromptBlocks, TurnState), PromptError> {
        let state = self.turn_state(turn);

        let target = self
            .config
            .trajectory
            .revelation_dimension()
            .and_then(|name| state.intensities.get(name))
            .map_or(DisclosureLevel::Moderate, DisclosureLevel::from_intensity);
        let revelations = self.revelations.select(&state.phase, target);

        let cfg = &*self.config;
        let persona = &cfg.persona;
        let interaction = &cfg.interaction;
        let anti_cap = &interaction.anti_capitulation;
        let phase = cfg.trajectory.phase(&state.phase);
        let (requirements, forbidden) = phase.map_or((&[][..], &[][..]), |p| {
            (p.requirements.as_slice(), p.forbidden.as_slice())
        });

        let directives = self.renderer.directives(&DirectivesView {
            name: &persona.identity.name,
            turn,
            phase: &state.phase,
            intensity_lines: state
                .intensities
                .iter()
                .map(|(name, value)| format!("{name}: {value:.2}"))
                .collect(),
            requirements,
            forbidden,
            anti_capitulation: !anti_cap.forbidden_phrases.is_empty()
                || !anti_cap.redirects.is_empty(),
            resistance_level: anti_cap.resistance_level.to_string(),
            forbidden_phrases: anti_cap
                .forbidden_phrases
                .iter()
                .map(|p| format!("\"{p}\""))
                .collect::<Vec<_>>()
                .join(", "),
            redirects: &anti_cap.redirects,
            safety_note: cfg.safety.persona_safety_note.trim(),
            safety_forbidden: &cfg.safety.forbidden_simulation_content,
            level_descriptions: self.level_descriptions(&state.intensities),
        })?;

        let style = self.renderer.style(&StyleView {
            speech_patterns: &persona.speech_patterns,
            cognitive_style: persona.cognitive_style.trim(),
            response_length: interaction.response_length.for_phase(&state.phase),
            recovery_behavior: persona.recovery_behavior.trim(),
        })?;

        let identity = &persona.identity;
        let bounds = &persona.capability_bounds;
        let context = self.renderer.context(&ContextView {
            name: &identity.name,
            age: identity.age,
            background: identity.background.trim(),
            backstory: identity.backstory_summary.trim(),
            knowledge_ceiling: &bounds.knowledge_ceiling,
            vocabulary_level: &bounds.vocabulary_level,
            reasoning_style: &bounds.reasoning_style,
            revelations: &revelations,
            emotional_responses: &persona.emotional_responses,
        })?;

        Ok((
            PromptBlocks {
                directives,
                style,
                context,
            },
            state,
        ))
    }

    /// Reminder text for a reminder turn.
    pub fn reminder(&self, state: &TurnState) -> String {
        render_reminder(
            &self.config.interaction.injection.reminder_template,
            &state.phase,
            state.turn,
            &state.intensities,
        )
    }

    pub fn next_unused_revelation(&self) -> &str {
        self.revelations.next_unused_topic()
    }

    /// `dimension (level): description` for each dimension with levels.
    fn level_descriptions(&self, intensities: &IntensitySnapshot) -> Vec<String> {
        intensities
            .iter()
            .filter_map(|(name, value)| {
                let dim = self.config.trajectory.dimension(name)?;
                let level = level_for(&dim.levels, value)?;
                Some(format!(
                    "{name} ({}): {}",
                    level.name,
                    truncate_description(level.description.trim())
                ))
            })
            .collect()
    }
}

impl DisclosureSource for PromptAssembler {
    fn next_unused_topic(&self) -> &str {
        self.next_unused_revelation()
    }
}

/// `levels[min(floor(value * n), n - 1)]`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn level_for(levels: &[LevelConfig], value: f64) -> Option<&LevelConfig> {
    let last = levels.len().checked_sub(1)?;
    let idx = ((value.max(0.0) * levels.len() as f64) as usize).min(last);
    levels.get(idx)
}

fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_LEVEL_DESCRIPTION_CHARS {
        return description.to_string();
    }
    let kept: String = description
        .chars()
        .take(MAX_LEVEL_DESCRIPTION_CHARS - 3)
        .collect();
    format!("{kept}...")
}
