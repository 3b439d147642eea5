pub mod engine;
pub mod templates;

pub use engine::TeraEngine;
pub use templates::{ContextView, DirectivesView, PromptRenderer, StyleView, TEMPLATE_VERSION};
