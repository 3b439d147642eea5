use crate::error::PromptError;
use std::error::Error as _;
use tera::{Context, Tera};

/// Tera-backed template engine for the persona prompt sections.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates only (no filesystem).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| render_error(name, &e))
    }

    /// Render a named template with the given context.
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, PromptError> {
        self.tera
            .render(template_name, context)
            .map_err(|e| render_error(template_name, &e))
    }
}

/// Tera nests the useful message in its source chain.
fn render_error(template: &str, err: &tera::Error) -> PromptError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    PromptError::Render {
        template: template.to_string(),
        message,
    }
}
