use crate::config::CurveConfig;

/// Logistic steepness. Covers most of the range within the conversation.
pub const SIGMOID_STEEPNESS: f64 = 12.0;

/// Map progress in [0, 1] to a shaped value in [0, 1].
///
/// The caller clamps `progress`.
pub fn transform(curve: &CurveConfig, progress: f64) -> f64 {
    match curve {
        CurveConfig::Linear => progress,
        CurveConfig::Sigmoid { midpoint_pct } => sigmoid(progress, *midpoint_pct),
        CurveConfig::DelayedRamp { delay_pct } => delayed_ramp(progress, *delay_pct),
        CurveConfig::Step { step_thresholds } => step(progress, step_thresholds),
    }
}

fn logistic(x: f64, midpoint: f64) -> f64 {
    1.0 / (1.0 + (-SIGMOID_STEEPNESS * (x - midpoint)).exp())
}

/// Logistic curve rescaled so 0 → 0 and 1 → 1.
fn sigmoid(progress: f64, midpoint: f64) -> f64 {
    let at_start = logistic(0.0, midpoint);
    let at_end = logistic(1.0, midpoint);
    let span = at_end - at_start;
    if span == 0.0 {
        return progress;
    }
    (logistic(progress, midpoint) - at_start) / span
}

fn delayed_ramp(progress: f64, delay: f64) -> f64 {
    if progress <= delay {
        return 0.0;
    }
    (progress - delay) / (1.0 - delay)
}

/// Fraction of thresholds already reached (inclusive).
#[allow(clippy::cast_precision_loss)]
fn step(progress: f64, thresholds: &[f64]) -> f64 {
    if thresholds.is_empty() {
        return progress;
    }
    let passed = thresholds.iter().filter(|&&t| progress >= t).count();
    passed as f64 / thresholds.len() as f64
}
