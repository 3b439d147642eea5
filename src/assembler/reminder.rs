//! Reminder placeholder substitution.
//!
//! Templates use `{name}` or `{name:.Nf}` placeholders with `{{` / `}}` as
//! literal braces. Variables are `current_phase`, `turn` and each dimension
//! name. If any placeholder cannot be resolved the template is returned
//! unchanged, never partially filled.

use super::intensity::IntensitySnapshot;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy)]
enum Value<'a> {
    Text(&'a str),
    Integer(u32),
    Number(f64),
}

/// Fill a reminder template, or return it verbatim on any unresolved or
/// malformed placeholder.
pub fn render_reminder(
    template: &str,
    phase: &str,
    turn: u32,
    intensities: &IntensitySnapshot,
) -> String {
    let lookup = |name: &str| match name {
        "current_phase" => Some(Value::Text(phase)),
        "turn" => Some(Value::Integer(turn)),
        other => intensities.get(other).map(Value::Number),
    };

    substitute(template, lookup).unwrap_or_else(|| {
        tracing::debug!(template, "reminder placeholder unresolved; using template as-is");
        template.to_string()
    })
}

/// Escaped braces, `{name}` / `{name:.Nf}` fields, or a lone brace.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)(?::\.(\d+)f)?\}|[{}]")
        .expect("static regex")
});

fn substitute<'a>(template: &str, lookup: impl Fn(&str) -> Option<Value<'a>>) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0)?;
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        match (whole.as_str(), caps.get(1)) {
            ("{{", _) => out.push('{'),
            ("}}", _) => out.push('}'),
            (_, Some(name)) => {
                let precision = match caps.get(2) {
                    Some(digits) => Some(digits.as_str().parse().ok()?),
                    None => None,
                };
                out.push_str(&format_value(lookup(name.as_str())?, precision)?);
            }
            _ => return None,
        }
    }
    out.push_str(&template[last..]);
    Some(out)
}

fn format_value(value: Value<'_>, precision: Option<usize>) -> Option<String> {
    match (value, precision) {
        (Value::Text(text), None) => Some(text.to_string()),
        (Value::Integer(n), None) => Some(n.to_string()),
        (Value::Number(v), None) => Some(plain_number(v)),
        (Value::Integer(n), Some(p)) => Some(format!("{:.p$}", f64::from(n))),
        (Value::Number(v), Some(p)) => Some(format!("{v:.p$}")),
        (Value::Text(_), Some(_)) => None,
    }
}

/// Shortest round-trip form, keeping one decimal on whole numbers.
fn plain_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
