use crate::config::InjectionConfig;
use serde::Serialize;

/// What scaffolding the persona receives on a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InjectionType {
    /// System prompt rebuilt from all three sections.
    Full,
    /// Short reminder appended to the latest user message.
    Reminder,
    None,
}

/// Turn index → injection type. Full takes priority when both periods
/// divide the turn.
#[derive(Debug, Clone, Copy)]
pub struct InjectionScheduler {
    frequency: u32,
    reminder_frequency: u32,
}

impl InjectionScheduler {
    pub fn new(frequency: u32, reminder_frequency: u32) -> Self {
        Self {
            frequency,
            reminder_frequency,
        }
    }

    pub fn from_config(config: &InjectionConfig) -> Self {
        Self::new(config.frequency, config.reminder_frequency)
    }

    pub fn injection_type(&self, turn: u32) -> InjectionType {
        // A zero period never fires.
        if turn.checked_rem(self.frequency) == Some(0) {
            InjectionType::Full
        } else if turn.checked_rem(self.reminder_frequency) == Some(0) {
            InjectionType::Reminder
        } else {
            InjectionType::None
        }
    }
}
