use crate::config::{DisclosureLevel, RevelationConfig, ScenarioConfig};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Returned when every disclosure has already surfaced.
pub const NO_UNUSED_REVELATIONS: &str = "(no unused revelations available)";

/// One disclosure chosen for the context section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedRevelation {
    pub topic: String,
    pub text: String,
}

/// Nearest populated variant to `target`, searching outward and trying the
/// lower label first at each distance.
pub fn pick_variant(revelation: &RevelationConfig, target: DisclosureLevel) -> Option<&str> {
    let levels = DisclosureLevel::ALL;
    let origin = target.index();
    (0..levels.len()).find_map(|offset| {
        let below = origin.checked_sub(offset).and_then(|i| levels.get(i));
        let above = levels.get(origin + offset);
        below
            .and_then(|level| revelation.variant(*level))
            .or_else(|| above.and_then(|level| revelation.variant(*level)))
    })
}

/// Picks disclosure wording per turn and remembers which topics have been
/// offered. One instance per rollout.
pub struct RevelationSelector {
    config: Arc<ScenarioConfig>,
    used: HashSet<String>,
}

impl RevelationSelector {
    pub fn new(config: Arc<ScenarioConfig>) -> Self {
        Self {
            config,
            used: HashSet::new(),
        }
    }

    /// Select one variant per disclosure of `phase` and mark each selected
    /// topic used. Disclosures with no variants are skipped.
    pub fn select(&mut self, phase: &str, target: DisclosureLevel) -> Vec<SelectedRevelation> {
        let config = Arc::clone(&self.config);
        let Some(phase) = config.trajectory.phase(phase) else {
            return Vec::new();
        };

        let mut selected = Vec::with_capacity(phase.revelations.len());
        for revelation in &phase.revelations {
            if let Some(text) = pick_variant(revelation, target) {
                self.mark_used(&revelation.topic);
                selected.push(SelectedRevelation {
                    topic: revelation.topic.clone(),
                    text: text.to_string(),
                });
            }
        }
        selected
    }

    fn mark_used(&mut self, topic: &str) {
        self.used.insert(topic.to_string());
    }

    #[cfg(test)]
    fn is_used(&self, topic: &str) -> bool {
        self.used.contains(topic)
    }

    /// First unused topic in phase order, then declared order.
    pub fn next_unused_topic(&self) -> &str {
        self.config
            .trajectory
            .phases
            .iter()
            .flat_map(|phase| &phase.revelations)
            .map(|rev| rev.topic.as_str())
            .find(|topic| !self.used.contains(*topic))
            .unwrap_or(NO_UNUSED_REVELATIONS)
    }
}
