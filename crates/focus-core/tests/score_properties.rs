use proptest::prelude::*;

use focusflow_focus_core::classifier::{Classifier, ScoreSignal};
use focusflow_focus_core::geometry::compute_metrics;
use focusflow_focus_core::integrator::{
    AbsencePolicy, IntegratorConfig, ScoreIntegrator, DEFAULT_ABSENCE_DECAY,
    DEFAULT_PENALTY_DAMPENING,
};
use focusflow_face_model::keypoint::LandmarkSet;
use focusflow_face_model::mesh::REFINED_FACE_MESH_POINTS;
use focusflow_face_model::state::{CalibrationData, FocusState};
use focusflow_face_model::synthetic::SyntheticFace;

fn signal_strategy() -> impl Strategy<Value = ScoreSignal> {
    prop_oneof![
        (-1000.0f64..1000.0).prop_map(ScoreSignal::Delta),
        Just(ScoreSignal::Absent),
        Just(ScoreSignal::Delta(f64::NAN)),
        Just(ScoreSignal::Delta(f64::INFINITY)),
    ]
}

proptest! {
    #[test]
    fn score_stays_in_unit_interval(
        start in 0.0f64..=1.0,
        signals in prop::collection::vec(signal_strategy(), 0..200),
    ) {
        let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), start);
        for signal in signals {
            let score = integrator.apply(signal);
            prop_assert!((0.0..=1.0).contains(&score), "score escaped: {}", score);
        }
    }

    #[test]
    fn zero_delta_leaves_score_unchanged(start in 0.0f64..=1.0) {
        let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), start);
        prop_assert_eq!(integrator.apply(ScoreSignal::Delta(0.0)), start);
    }

    #[test]
    fn penalty_is_dampened_relative_to_reward(magnitude in 0.001f64..0.2) {
        let mut rewarded = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.5);
        let mut penalized = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.5);

        let gain = rewarded.apply(ScoreSignal::Delta(magnitude)) - 0.5;
        let loss = 0.5 - penalized.apply(ScoreSignal::Delta(-magnitude));

        prop_assert!(loss < gain);
        prop_assert!((loss / gain - DEFAULT_PENALTY_DAMPENING).abs() < 1e-9);
    }

    #[test]
    fn absence_never_raises_score(
        start in 0.0f64..=1.0,
        ticks in 1usize..500,
    ) {
        let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), start);
        let mut previous = start;
        for _ in 0..ticks {
            let score = integrator.apply(ScoreSignal::Absent);
            prop_assert!(score <= previous);
            previous = score;
        }
    }
}

#[test]
fn absence_decay_is_slower_than_dampened_penalty() {
    let dampened_penalty = 0.05 * DEFAULT_PENALTY_DAMPENING;
    assert!(DEFAULT_ABSENCE_DECAY < dampened_penalty);

    let config = IntegratorConfig::default();
    assert_eq!(
        config.absence,
        AbsencePolicy::SlowDecay {
            per_tick: DEFAULT_ABSENCE_DECAY
        }
    );
}

#[test]
fn drowsy_example_goes_from_one_to_point_nine_nine() {
    let face = SyntheticFace::attentive().with_ear(0.10).refined_landmarks();
    let set = LandmarkSet::new(&face, REFINED_FACE_MESH_POINTS).unwrap();
    let metrics = compute_metrics(Some(&set)).unwrap();

    let classification =
        Classifier::default().classify(Some(&metrics), &CalibrationData::default());
    assert_eq!(classification.state, FocusState::Drowsy);
    assert_eq!(classification.signal, ScoreSignal::Delta(-0.05));

    let mut integrator = ScoreIntegrator::new(IntegratorConfig::default());
    assert!((integrator.dampened(-0.05) + 0.01).abs() < 1e-12);
    let score = integrator.apply(classification.signal);
    assert!((score - 0.99).abs() < 1e-12);
}

#[test]
fn ten_absent_ticks_from_half_reach_point_four_eight() {
    let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.5);
    for _ in 0..10 {
        integrator.apply(ScoreSignal::Absent);
    }
    assert!((integrator.score() - 0.48).abs() < 1e-12);
}

#[test]
fn instant_penalty_policy_drops_faster() {
    let config = IntegratorConfig {
        absence: AbsencePolicy::InstantPenalty { per_tick: 0.01 },
        ..IntegratorConfig::default()
    };
    let mut instant = ScoreIntegrator::with_score(config, 0.5);
    let mut slow = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.5);
    instant.apply(ScoreSignal::Absent);
    slow.apply(ScoreSignal::Absent);
    assert!((instant.score() - 0.49).abs() < 1e-12);
    assert!(instant.score() < slow.score());
}
