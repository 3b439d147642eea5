#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod app;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod monitors;
pub mod prompt;
pub mod providers;
pub mod rollout;

pub use assembler::{InjectionType, PromptAssembler};
pub use config::{RunSettings, ScenarioConfig};
pub use error::{LoomError, Result};
pub use providers::{ChatMessage, ModelClient, create_client};
pub use rollout::{RolloutRunner, Transcript};
