use super::schema::{CurveConfig, SUPPORTED_SCHEMA_VERSIONS, ScenarioConfig};
use std::collections::HashSet;
use std::fmt;

/// One offending field in a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Render issues as the multi-line report shown to users.
pub fn format_report(origin: &str, issues: &[ValidationIssue]) -> String {
    let mut lines = Vec::with_capacity(issues.len() + 1);
    lines.push(format!("Validation errors in {origin}:"));
    lines.extend(issues.iter().map(|issue| format!("  {issue}")));
    lines.join("\n")
}

/// Check every invariant the rollout engine relies on. Returns all
/// violations rather than stopping at the first.
pub fn validate(config: &ScenarioConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !SUPPORTED_SCHEMA_VERSIONS.contains(&config.schema_version.as_str()) {
        issues.push(ValidationIssue::new(
            "schema_version",
            format!(
                "unsupported version '{}' (supported: {})",
                config.schema_version,
                SUPPORTED_SCHEMA_VERSIONS.join(", ")
            ),
        ));
    }

    check_trajectory(config, &mut issues);
    check_interaction(config, &mut issues);
    check_safety(config, &mut issues);

    issues
}

fn check_trajectory(config: &ScenarioConfig, issues: &mut Vec<ValidationIssue>) {
    let trajectory = &config.trajectory;
    let ceiling = config.safety.intensity_ceiling;

    if trajectory.expected_turns == 0 {
        issues.push(ValidationIssue::new(
            "trajectory.expected_turns",
            "must be positive",
        ));
    }

    if trajectory.dimensions.is_empty() {
        issues.push(ValidationIssue::new(
            "trajectory.dimensions",
            "at least one dimension is required",
        ));
    }

    let mut seen = HashSet::new();
    for (i, dim) in trajectory.dimensions.iter().enumerate() {
        let path = format!("trajectory.dimensions[{i}]");
        if dim.name.trim().is_empty() {
            issues.push(ValidationIssue::new(format!("{path}.name"), "must not be empty"));
        } else if !seen.insert(dim.name.as_str()) {
            issues.push(ValidationIssue::new(
                format!("{path}.name"),
                format!("duplicate dimension '{}'", dim.name),
            ));
        }

        for (field, value) in [
            ("start_value", dim.start_value),
            ("end_value", dim.end_value),
            ("min_value", dim.min_value),
            ("max_value", dim.max_value),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ValidationIssue::new(
                    format!("{path}.{field}"),
                    format!("{value} is outside [0, 1]"),
                ));
            }
        }

        if dim.min_value >= dim.max_value {
            issues.push(ValidationIssue::new(
                format!("{path}.min_value"),
                format!(
                    "min_value ({}) must be less than max_value ({})",
                    dim.min_value, dim.max_value
                ),
            ));
        }
        for (field, value) in [("start_value", dim.start_value), ("end_value", dim.end_value)] {
            if value < dim.min_value || value > dim.max_value {
                issues.push(ValidationIssue::new(
                    format!("{path}.{field}"),
                    format!(
                        "{value} must be between min_value ({}) and max_value ({})",
                        dim.min_value, dim.max_value
                    ),
                ));
            }
        }
        if dim.max_value > ceiling {
            issues.push(ValidationIssue::new(
                format!("{path}.max_value"),
                format!(
                    "dimension '{}' max_value ({}) exceeds safety intensity_ceiling ({ceiling})",
                    dim.name, dim.max_value
                ),
            ));
        }

        check_curve(&format!("{path}.curve"), &dim.curve, issues);
    }

    if let Some(name) = trajectory.revelation_dimension.as_deref()
        && trajectory.dimension(name).is_none()
    {
        issues.push(ValidationIssue::new(
            "trajectory.revelation_dimension",
            format!("unknown dimension '{name}'"),
        ));
    }

    if trajectory.phases.is_empty() {
        issues.push(ValidationIssue::new(
            "trajectory.phases",
            "at least one phase is required",
        ));
        return;
    }

    let mut seen = HashSet::new();
    let mut previous = 0.0;
    for (i, phase) in trajectory.phases.iter().enumerate() {
        let path = format!("trajectory.phases[{i}]");
        if phase.name.trim().is_empty() {
            issues.push(ValidationIssue::new(format!("{path}.name"), "must not be empty"));
        } else if !seen.insert(phase.name.as_str()) {
            issues.push(ValidationIssue::new(
                format!("{path}.name"),
                format!("duplicate phase '{}'", phase.name),
            ));
        }
        if phase.end_pct <= previous {
            issues.push(ValidationIssue::new(
                format!("{path}.end_pct"),
                format!(
                    "phase '{}' end_pct ({}) must be greater than previous ({previous})",
                    phase.name, phase.end_pct
                ),
            ));
        }
        previous = phase.end_pct;
    }

    if let Some(last) = trajectory.phases.last()
        && (last.end_pct - 1.0).abs() > f64::EPSILON
    {
        issues.push(ValidationIssue::new(
            format!("trajectory.phases[{}].end_pct", trajectory.phases.len() - 1),
            format!("last phase '{}' must end at 1.0, got {}", last.name, last.end_pct),
        ));
    }
}

fn check_curve(path: &str, curve: &CurveConfig, issues: &mut Vec<ValidationIssue>) {
    match curve {
        CurveConfig::Linear => {}
        CurveConfig::Sigmoid { midpoint_pct } => {
            if !(0.0..=1.0).contains(midpoint_pct) {
                issues.push(ValidationIssue::new(
                    format!("{path}.midpoint_pct"),
                    format!("{midpoint_pct} is outside [0, 1]"),
                ));
            }
        }
        CurveConfig::DelayedRamp { delay_pct } => {
            if !(0.0..1.0).contains(delay_pct) {
                issues.push(ValidationIssue::new(
                    format!("{path}.delay_pct"),
                    format!("{delay_pct} is outside [0, 1)"),
                ));
            }
        }
        CurveConfig::Step { step_thresholds } => {
            if step_thresholds.is_empty() {
                issues.push(ValidationIssue::new(
                    format!("{path}.step_thresholds"),
                    "step curve requires at least one threshold",
                ));
            }
            if step_thresholds.iter().any(|t| !(0.0..=1.0).contains(t)) {
                issues.push(ValidationIssue::new(
                    format!("{path}.step_thresholds"),
                    "thresholds must lie in [0, 1]",
                ));
            }
            if step_thresholds.windows(2).any(|w| w[1] <= w[0]) {
                issues.push(ValidationIssue::new(
                    format!("{path}.step_thresholds"),
                    "thresholds must be strictly ascending",
                ));
            }
        }
    }
}

fn check_interaction(config: &ScenarioConfig, issues: &mut Vec<ValidationIssue>) {
    let interaction = &config.interaction;

    if interaction.injection.frequency == 0 {
        issues.push(ValidationIssue::new(
            "interaction.injection.frequency",
            "must be positive",
        ));
    }
    if interaction.injection.reminder_frequency == 0 {
        issues.push(ValidationIssue::new(
            "interaction.injection.reminder_frequency",
            "must be positive",
        ));
    }

    for phase in interaction.response_length.by_phase.keys() {
        if config.trajectory.phase(phase).is_none() {
            let known: Vec<&str> = config
                .trajectory
                .phases
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            issues.push(ValidationIssue::new(
                format!("interaction.response_length.by_phase.{phase}"),
                format!("unknown phase '{phase}' (known: {})", known.join(", ")),
            ));
        }
    }

    let stagnation = &interaction.stagnation_detection;
    if stagnation.window == 0 {
        issues.push(ValidationIssue::new(
            "interaction.stagnation_detection.window",
            "must be positive",
        ));
    }
    for (field, value) in [
        ("similarity_threshold", stagnation.similarity_threshold),
        ("convergence_threshold", stagnation.convergence_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            issues.push(ValidationIssue::new(
                format!("interaction.stagnation_detection.{field}"),
                format!("{value} is outside [0, 1]"),
            ));
        }
    }

    for (i, pattern) in interaction
        .repetition_detection
        .banned_patterns
        .iter()
        .enumerate()
    {
        if pattern.trim().is_empty() {
            issues.push(ValidationIssue::new(
                format!("interaction.repetition_detection.banned_patterns[{i}]"),
                "must not be empty",
            ));
        }
    }
}

fn check_safety(config: &ScenarioConfig, issues: &mut Vec<ValidationIssue>) {
    let ceiling = config.safety.intensity_ceiling;
    if ceiling <= 0.0 || ceiling > 1.0 {
        issues.push(ValidationIssue::new(
            "safety.intensity_ceiling",
            format!("{ceiling} is outside (0, 1]"),
        ));
    }
}
