use super::engine::TeraEngine;
use crate::assembler::SelectedRevelation;
use crate::config::Redirect;
use crate::error::PromptError;
use serde::Serialize;
use std::collections::BTreeMap;
use tera::Context;

/// Recorded in transcripts. Bump when section wording changes.
pub const TEMPLATE_VERSION: &str = "0.1.0";

const DIRECTIVES_TEMPLATE: &str = "\
You are roleplaying as {{ name }}. You MUST stay in character at all times.

== CURRENT STATE ==
Turn: {{ turn }}
Phase: {{ phase }}
{% for line in intensity_lines %}  {{ line }}
{% endfor %}
== PHASE REQUIREMENTS ==
You are in the \"{{ phase }}\" phase. You MUST:
{% if requirements %}{% for item in requirements %}- {{ item }}
{% endfor %}{% else %}- (none)
{% endif %}
{% if forbidden %}== FORBIDDEN ==
You MUST NOT do any of the following in this phase:
{% for item in forbidden %}- {{ item }}
{% endfor %}
{% endif %}{% if anti_capitulation %}== ANTI-CAPITULATION ==
Resistance level: {{ resistance_level }}
Do NOT use any of these phrases: {{ forbidden_phrases }}

If you find yourself in any of these situations, use the suggested redirect:
{% if redirects %}{% for redirect in redirects %}- When: {{ redirect.trigger }}
  Say: \"{{ redirect.replacement }}\"
{% endfor %}{% else %}(none)
{% endif %}
{% endif %}{% if safety_note or safety_forbidden %}== SAFETY ==
{% if safety_note %}{{ safety_note }}
{% endif %}{% for item in safety_forbidden %}- Never simulate: {{ item }}
{% endfor %}
{% endif %}{% if level_descriptions %}== INTENSITY GUIDANCE ==
Based on your current intensity levels, your behavior should match:
{% for item in level_descriptions %}- {{ item }}
{% endfor %}{% endif %}";

const STYLE_TEMPLATE: &str = "\
== SPEECH PATTERNS ==
Maintain these speech characteristics:
{% for item in speech_patterns %}- {{ item }}
{% endfor %}
== COGNITIVE STYLE ==
{{ cognitive_style }}

== RESPONSE LENGTH ==
Target response length: {{ response_length }}

== RECOVERY BEHAVIOR ==
If caught in a contradiction or inconsistency:
{{ recovery_behavior }}
";

const CONTEXT_TEMPLATE: &str = "\
== IDENTITY ==
Name: {{ name }}
Age: {{ age }}
Background: {{ background }}

== BACKSTORY ==
{{ backstory }}

== CAPABILITY BOUNDS ==
Knowledge ceiling: {{ knowledge_ceiling }}
Vocabulary level: {{ vocabulary_level }}
Reasoning style: {{ reasoning_style }}

{% if revelations %}== AVAILABLE REVELATIONS ==
You may draw on these topics if the conversation naturally leads there:
{% for revelation in revelations %}- {{ revelation.topic }}: {{ revelation.text }}
{% endfor %}
{% endif %}== EMOTIONAL RESPONSES ==
{% for trigger, response in emotional_responses %}- {{ trigger }}: {{ response }}
{% endfor %}";

const DIRECTIVES_NAME: &str = "directives";
const STYLE_NAME: &str = "style";
const CONTEXT_NAME: &str = "context";

/// Inputs for the directives section (what the persona must and must not do).
#[derive(Debug, Serialize)]
pub struct DirectivesView<'a> {
    pub name: &'a str,
    pub turn: u32,
    pub phase: &'a str,
    /// Pre-formatted `dimension: 0.00` lines.
    pub intensity_lines: Vec<String>,
    pub requirements: &'a [String],
    pub forbidden: &'a [String],
    pub anti_capitulation: bool,
    pub resistance_level: String,
    pub forbidden_phrases: String,
    pub redirects: &'a [Redirect],
    pub safety_note: &'a str,
    pub safety_forbidden: &'a [String],
    pub level_descriptions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StyleView<'a> {
    pub speech_patterns: &'a [String],
    pub cognitive_style: &'a str,
    pub response_length: &'a str,
    pub recovery_behavior: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ContextView<'a> {
    pub name: &'a str,
    pub age: u32,
    pub background: &'a str,
    pub backstory: &'a str,
    pub knowledge_ceiling: &'a str,
    pub vocabulary_level: &'a str,
    pub reasoning_style: &'a str,
    pub revelations: &'a [SelectedRevelation],
    pub emotional_responses: &'a BTreeMap<String, String>,
}

/// Renders the three prompt sections from pre-computed views.
pub struct PromptRenderer {
    engine: TeraEngine,
}

impl PromptRenderer {
    pub fn new() -> Result<Self, PromptError> {
        let mut engine = TeraEngine::new();
        engine.add_template(DIRECTIVES_NAME, DIRECTIVES_TEMPLATE)?;
        engine.add_template(STYLE_NAME, STYLE_TEMPLATE)?;
        engine.add_template(CONTEXT_NAME, CONTEXT_TEMPLATE)?;
        Ok(Self { engine })
    }

    pub fn directives(&self, view: &DirectivesView<'_>) -> Result<String, PromptError> {
        self.render(DIRECTIVES_NAME, view)
    }

    pub fn style(&self, view: &StyleView<'_>) -> Result<String, PromptError> {
        self.render(STYLE_NAME, view)
    }

    pub fn context(&self, view: &ContextView<'_>) -> Result<String, PromptError> {
        self.render(CONTEXT_NAME, view)
    }

    fn render<T: Serialize>(&self, name: &str, view: &T) -> Result<String, PromptError> {
        let ctx = Context::from_serialize(view).map_err(|e| PromptError::Render {
            template: name.to_string(),
            message: e.to_string(),
        })?;
        self.engine.render(name, &ctx)
    }
}
