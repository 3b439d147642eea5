use super::curve;
use crate::config::ScenarioConfig;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// Per-dimension intensity values for one turn, in declared dimension order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntensitySnapshot {
    values: Vec<(String, f64)>,
}

impl IntensitySnapshot {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for IntensitySnapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for IntensitySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Turn index → dimension values and active phase.
pub struct IntensityResolver {
    config: Arc<ScenarioConfig>,
}

impl IntensityResolver {
    pub fn new(config: Arc<ScenarioConfig>) -> Self {
        Self { config }
    }

    /// `turn / (expected_turns - 1)` clamped to [0, 1]. Single-turn arcs are
    /// always complete.
    pub fn progress(&self, turn: u32) -> f64 {
        let expected = self.config.expected_turns();
        if expected <= 1 {
            return 1.0;
        }
        (f64::from(turn) / f64::from(expected - 1)).clamp(0.0, 1.0)
    }

    pub fn resolve(&self, turn: u32) -> IntensitySnapshot {
        let progress = self.progress(turn);
        let ceiling = self.config.safety.intensity_ceiling;

        self.config
            .trajectory
            .dimensions
            .iter()
            .map(|dim| {
                let shaped = curve::transform(&dim.curve, progress);
                let raw = dim.start_value + shaped * (dim.end_value - dim.start_value);
                let clamped = raw.max(dim.min_value).min(dim.max_value).min(ceiling);
                (dim.name.clone(), round4(clamped))
            })
            .collect()
    }

    /// First phase whose `end_pct` is not exceeded by progress. A turn that
    /// lands exactly on a boundary belongs to the phase ending there.
    pub fn resolve_phase(&self, turn: u32) -> &str {
        let progress = self.progress(turn);
        let phases = &self.config.trajectory.phases;

        phases
            .iter()
            .find(|phase| progress <= phase.end_pct)
            .or_else(|| phases.last())
            .map_or("", |phase| phase.name.as_str())
    }
}
