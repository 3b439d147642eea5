//! Turn-indexed prompt scheduling: curves, intensities, injection cadence,
//! disclosure selection and section assembly.

mod builder;
pub mod curve;
mod injection;
mod intensity;
mod reminder;
mod revelation;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use builder::{PromptAssembler, PromptBlocks, TurnState};
pub use injection::{InjectionScheduler, InjectionType};
pub use intensity::{IntensityResolver, IntensitySnapshot};
pub use reminder::render_reminder;
pub use revelation::{NO_UNUSED_REVELATIONS, RevelationSelector, SelectedRevelation, pick_variant};
