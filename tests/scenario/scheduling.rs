use std::collections::BTreeSet;
use std::sync::Arc;

use persona_loom::app::dry_run;
use persona_loom::assembler::curve::transform;
use persona_loom::assembler::{InjectionType, IntensityResolver, PromptAssembler};
use persona_loom::config::CurveConfig;

use super::rollout_harness::load_scenario;

#[test]
fn fifty_turn_injection_schedule() {
    let assembler = PromptAssembler::new(load_scenario("student_persona.toml")).unwrap();
    let of_kind = |kind: InjectionType| -> BTreeSet<u32> {
        (0..50)
            .filter(|&t| assembler.turn_state(t).injection_type == kind)
            .collect()
    };

    let full: BTreeSet<u32> = (0..50).step_by(5).collect();
    let reminder: BTreeSet<u32> = (0..50).filter(|t| t % 2 == 0 && t % 5 != 0).collect();
    assert_eq!(of_kind(InjectionType::Full), full);
    assert_eq!(of_kind(InjectionType::Reminder), reminder);
    assert_eq!(of_kind(InjectionType::None).len(), 50 - full.len() - reminder.len());
}

#[test]
fn intensities_respect_bounds_and_ceiling_on_every_turn() {
    let config = load_scenario("student_persona.toml");
    let resolver = IntensityResolver::new(Arc::clone(&config));
    let ceiling = config.safety.intensity_ceiling;

    for turn in 0..60 {
        let snapshot = resolver.resolve(turn);
        assert_eq!(snapshot.len(), config.trajectory.dimensions.len());
        for dim in &config.trajectory.dimensions {
            let value = snapshot.get(&dim.name).unwrap();
            assert!(
                value >= dim.min_value && value <= dim.max_value && value <= ceiling,
                "{} = {value} at turn {turn}",
                dim.name
            );
        }
    }

    let start = resolver.resolve(0);
    let end = resolver.resolve(49);
    assert!((start.get("confidence").unwrap() - 0.8).abs() < 1e-9);
    assert!((end.get("confidence").unwrap() - 0.2).abs() < 1e-9);
    assert!((start.get("openness").unwrap() - 0.1).abs() < 1e-9);
    // Past the arc the values hold at their end points.
    assert_eq!(resolver.resolve(49), resolver.resolve(59));
}

#[test]
fn delayed_ramp_holds_until_delay() {
    let resolver = IntensityResolver::new(load_scenario("student_persona.toml"));
    // openness ramps only after 20% of the arc (turn 9.8).
    for turn in 0..=9 {
        assert!((resolver.resolve(turn).get("openness").unwrap() - 0.1).abs() < 1e-9);
    }
    assert!(resolver.resolve(10).get("openness").unwrap() > 0.1);
}

#[test]
fn curve_shapes() {
    let step = CurveConfig::Step {
        step_thresholds: vec![0.25, 0.5, 0.75],
    };
    assert!(transform(&step, 0.0).abs() < 1e-12);
    assert!((transform(&step, 0.25) - 1.0 / 3.0).abs() < 1e-12);
    assert!((transform(&step, 0.74) - 2.0 / 3.0).abs() < 1e-12);
    assert!((transform(&step, 1.0) - 1.0).abs() < 1e-12);

    let sigmoid = CurveConfig::Sigmoid { midpoint_pct: 0.5 };
    assert!(transform(&sigmoid, 0.0).abs() < 1e-12);
    assert!((transform(&sigmoid, 1.0) - 1.0).abs() < 1e-12);
    assert!((transform(&sigmoid, 0.5) - 0.5).abs() < 1e-9);

    let mut previous = f64::NEG_INFINITY;
    for i in 0..=100 {
        let value = transform(&sigmoid, f64::from(i) / 100.0);
        assert!(value >= previous);
        previous = value;
    }
}

#[test]
fn dry_run_matches_assembler_schedule() {
    let config = load_scenario("student_persona.toml");
    let turns = dry_run::simulate(Arc::clone(&config), 50).unwrap();
    assert_eq!(turns.len(), 50);

    let assembler = PromptAssembler::new(config).unwrap();
    for t in &turns {
        let state = assembler.turn_state(t.turn);
        assert_eq!(t.phase, state.phase);
        assert_eq!(t.injection_type, state.injection_type);
        assert_eq!(t.reminder.is_some(), state.injection_type == InjectionType::Reminder);
    }

    let text = dry_run::render_text(&turns);
    assert_eq!(text.matches("\nTURN ").count(), 50);
    assert!(text.ends_with("Dry-run complete: 50 turns simulated.\n"));
}
