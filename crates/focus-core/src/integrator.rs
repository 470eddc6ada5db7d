//! Focus score integration.
//!
//! A single score in `[0, 1]` updated once per tick. Penalties are
//! dampened so focus loss registers more slowly than recovery, and an
//! absent face applies its own, gentler policy. The integrator is purely
//! reactive: it runs only when a tick is fed to it.

use focusflow_common::config::{AbsencePolicyKind, DetectionDefaults};

use crate::classifier::ScoreSignal;

/// Score at process start and after a reset.
pub const INITIAL_SCORE: f64 = 1.0;
pub const DEFAULT_PENALTY_DAMPENING: f64 = 0.2;
pub const DEFAULT_ABSENCE_DECAY: f64 = 0.002;
pub const DEFAULT_ABSENCE_PENALTY: f64 = 0.01;

/// Score behavior for ticks without a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbsencePolicy {
    /// Decay slowly; a missing face may just be occlusion.
    SlowDecay { per_tick: f64 },
    /// Fixed penalty per absent tick.
    InstantPenalty { per_tick: f64 },
}

impl Default for AbsencePolicy {
    fn default() -> Self {
        Self::SlowDecay {
            per_tick: DEFAULT_ABSENCE_DECAY,
        }
    }
}

impl AbsencePolicy {
    /// Amount removed from the score per absent tick.
    pub fn per_tick(&self) -> f64 {
        match *self {
            Self::SlowDecay { per_tick } | Self::InstantPenalty { per_tick } => per_tick,
        }
    }
}

/// Integrator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    /// Multiplier for negative deltas.
    pub penalty_dampening: f64,
    pub absence: AbsencePolicy,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            penalty_dampening: DEFAULT_PENALTY_DAMPENING,
            absence: AbsencePolicy::default(),
        }
    }
}

impl From<&DetectionDefaults> for IntegratorConfig {
    fn from(defaults: &DetectionDefaults) -> Self {
        let absence = match defaults.absence_policy {
            AbsencePolicyKind::SlowDecay => AbsencePolicy::SlowDecay {
                per_tick: defaults.absence_decay,
            },
            AbsencePolicyKind::InstantPenalty => AbsencePolicy::InstantPenalty {
                per_tick: defaults.absence_penalty,
            },
        };
        Self {
            penalty_dampening: defaults.penalty_dampening,
            absence,
        }
    }
}

/// Owns the focus score.
#[derive(Debug, Clone)]
pub struct ScoreIntegrator {
    score: f64,
    config: IntegratorConfig,
}

impl Default for ScoreIntegrator {
    fn default() -> Self {
        Self::new(IntegratorConfig::default())
    }
}

impl ScoreIntegrator {
    pub fn new(config: IntegratorConfig) -> Self {
        Self {
            score: INITIAL_SCORE,
            config,
        }
    }

    /// Start from a specific score (clamped).
    pub fn with_score(config: IntegratorConfig, score: f64) -> Self {
        let mut integrator = Self::new(config);
        integrator.score = clamp_score(score);
        integrator
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// The delta actually added for a raw face-present delta.
    pub fn dampened(&self, raw_delta: f64) -> f64 {
        if raw_delta < 0.0 {
            raw_delta * self.config.penalty_dampening
        } else {
            raw_delta
        }
    }

    /// Apply one tick and return the new score.
    pub fn apply(&mut self, signal: ScoreSignal) -> f64 {
        let delta = match signal {
            ScoreSignal::Delta(raw) if !raw.is_finite() => {
                tracing::warn!(raw, "Ignoring non-finite score delta");
                0.0
            }
            ScoreSignal::Delta(raw) => self.dampened(raw),
            ScoreSignal::Absent => -self.config.absence.per_tick(),
        };
        self.score = clamp_score(self.score + delta);
        self.score
    }

    /// Return to the initial fully-focused score.
    pub fn reset(&mut self) {
        self.score = INITIAL_SCORE;
    }
}

/// Clamp into `[0, 1]`; NaN collapses to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drowsy_tick_from_full_focus() {
        let mut integrator = ScoreIntegrator::default();
        let score = integrator.apply(ScoreSignal::Delta(-0.05));
        assert!((score - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_reward_passes_through() {
        let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.5);
        assert!((integrator.apply(ScoreSignal::Delta(0.01)) - 0.51).abs() < 1e-12);
    }

    #[test]
    fn test_ten_absent_ticks_decay_slowly() {
        let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.5);
        for _ in 0..10 {
            integrator.apply(ScoreSignal::Absent);
        }
        assert!((integrator.score() - 0.48).abs() < 1e-9);
    }

    #[test]
    fn test_instant_penalty_policy() {
        let config = IntegratorConfig {
            absence: AbsencePolicy::InstantPenalty { per_tick: 0.01 },
            ..Default::default()
        };
        let mut integrator = ScoreIntegrator::with_score(config, 0.5);
        integrator.apply(ScoreSignal::Absent);
        assert!((integrator.score() - 0.49).abs() < 1e-12);
    }

    #[test]
    fn test_absence_clamps_at_zero() {
        let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.001);
        assert_eq!(integrator.apply(ScoreSignal::Absent), 0.0);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.7);
        integrator.apply(ScoreSignal::Delta(f64::NAN));
        integrator.apply(ScoreSignal::Delta(f64::NEG_INFINITY));
        assert_eq!(integrator.score(), 0.7);
    }

    #[test]
    fn test_reset_restores_initial_score() {
        let mut integrator = ScoreIntegrator::with_score(IntegratorConfig::default(), 0.1);
        integrator.reset();
        assert_eq!(integrator.score(), INITIAL_SCORE);
    }

    #[test]
    fn test_config_from_defaults() {
        let mut defaults = DetectionDefaults::default();
        assert_eq!(IntegratorConfig::from(&defaults), IntegratorConfig::default());

        defaults.absence_policy = AbsencePolicyKind::InstantPenalty;
        let config = IntegratorConfig::from(&defaults);
        assert_eq!(
            config.absence,
            AbsencePolicy::InstantPenalty { per_tick: 0.01 }
        );
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(1.5), 1.0);
        assert_eq!(clamp_score(-0.5), 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(0.42), 0.42);
    }
}
