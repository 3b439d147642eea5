pub mod history;
mod runner;
mod transcript;

pub use history::{Speaker, Utterance, for_interlocutor, for_persona};
pub use runner::{RolloutRunner, VARY_DIRECTIVE};
pub use transcript::{MonitorEvent, Transcript, TranscriptMetadata, TurnRecord};
