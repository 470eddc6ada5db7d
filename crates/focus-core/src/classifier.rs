//! Discrete focus and emotion classification.
//!
//! Thresholds are passed in explicitly together with the current
//! calibration on every call; nothing is captured between ticks.

use serde::{Deserialize, Serialize};

use focusflow_common::config::DetectionDefaults;
use focusflow_face_model::state::{
    CalibrationData, EmotionState, FocusState, DEFAULT_BASELINE_EAR,
};

use crate::geometry::Metrics;

pub const DEFAULT_EAR_THRESHOLD: f64 = 0.25;
pub const DEFAULT_YAW_THRESHOLD: f64 = 0.2;
pub const DEFAULT_MAR_THRESHOLD: f64 = 0.5;
pub const DEFAULT_SMILE_THRESHOLD: f64 = 0.02;

/// Raw score delta for closed eyes.
pub const DROWSY_DELTA: f64 = -0.05;
/// Raw score delta for a turned head.
pub const DISTRACTED_DELTA: f64 = -0.02;
/// Raw score delta for an attentive face.
pub const FOCUSED_DELTA: f64 = 0.01;

/// Classifier thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// EAR below this reads as drowsy (for the default baseline EAR).
    pub ear: f64,
    /// Absolute yaw above this reads as distracted.
    pub yaw: f64,
    /// MAR above this reads as surprised.
    pub mar: f64,
    /// Smile or frown magnitude above this reads as happy or sad.
    pub smile: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ear: DEFAULT_EAR_THRESHOLD,
            yaw: DEFAULT_YAW_THRESHOLD,
            mar: DEFAULT_MAR_THRESHOLD,
            smile: DEFAULT_SMILE_THRESHOLD,
        }
    }
}

impl From<&DetectionDefaults> for Thresholds {
    fn from(defaults: &DetectionDefaults) -> Self {
        Self {
            ear: defaults.ear_threshold,
            yaw: defaults.yaw_threshold,
            mar: defaults.mar_threshold,
            smile: defaults.smile_threshold,
        }
    }
}

impl Thresholds {
    /// EAR threshold scaled by the user's baseline EAR.
    ///
    /// The configured threshold is defined for [`DEFAULT_BASELINE_EAR`];
    /// a baseline of 0.36 raises it by 20%. Unusable baselines fall back
    /// to the configured value.
    pub fn effective_ear(&self, calibration: &CalibrationData) -> f64 {
        let baseline = calibration.baseline_ear;
        if !baseline.is_finite() || baseline <= 0.0 {
            return self.ear;
        }
        self.ear * (baseline / DEFAULT_BASELINE_EAR)
    }
}

/// How the score should move this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreSignal {
    /// A face was measured; apply this raw delta.
    Delta(f64),
    /// No face this tick; the integrator applies its absence policy.
    Absent,
}

/// Result of classifying one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub state: FocusState,
    pub signal: ScoreSignal,
    /// `None` when no face was seen: keep the previous emotion.
    pub emotion: Option<EmotionState>,
}

/// Maps metrics to focus state, score signal, and emotion.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classify one tick. First matching focus rule wins.
    pub fn classify(
        &self,
        metrics: Option<&Metrics>,
        calibration: &CalibrationData,
    ) -> Classification {
        let Some(metrics) = metrics else {
            return Classification {
                state: FocusState::Distracted,
                signal: ScoreSignal::Absent,
                emotion: None,
            };
        };

        let center_yaw = calibration
            .center_head_pose
            .map(|pose| pose.yaw)
            .unwrap_or(0.0);

        let (state, delta) = if metrics.ear < self.thresholds.effective_ear(calibration) {
            (FocusState::Drowsy, DROWSY_DELTA)
        } else if (metrics.yaw - center_yaw).abs() > self.thresholds.yaw {
            (FocusState::Distracted, DISTRACTED_DELTA)
        } else {
            (FocusState::Focused, FOCUSED_DELTA)
        };

        Classification {
            state,
            signal: ScoreSignal::Delta(delta),
            emotion: Some(self.emotion(metrics)),
        }
    }

    /// Emotion from mouth shape, independent of the focus rules.
    pub fn emotion(&self, metrics: &Metrics) -> EmotionState {
        if metrics.mar > self.thresholds.mar {
            EmotionState::Surprised
        } else if metrics.smile > self.thresholds.smile {
            EmotionState::Happy
        } else if metrics.frown() > self.thresholds.smile {
            EmotionState::Sad
        } else {
            EmotionState::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focusflow_face_model::state::HeadPose;

    fn attentive() -> Metrics {
        Metrics {
            ear: 0.30,
            yaw: 0.0,
            pitch: 1.6,
            mar: 0.1,
            smile: 0.0,
        }
    }

    #[test]
    fn test_closed_eyes_are_drowsy() {
        let c = Classifier::default().classify(
            Some(&Metrics {
                ear: 0.10,
                ..attentive()
            }),
            &CalibrationData::default(),
        );
        assert_eq!(c.state, FocusState::Drowsy);
        assert_eq!(c.signal, ScoreSignal::Delta(-0.05));
    }

    #[test]
    fn test_drowsy_wins_over_distracted() {
        let c = Classifier::default().classify(
            Some(&Metrics {
                ear: 0.10,
                yaw: 0.6,
                ..attentive()
            }),
            &CalibrationData::default(),
        );
        assert_eq!(c.state, FocusState::Drowsy);
    }

    #[test]
    fn test_turned_head_is_distracted_either_side() {
        let classifier = Classifier::default();
        for yaw in [0.35, -0.35] {
            let c = classifier.classify(
                Some(&Metrics { yaw, ..attentive() }),
                &CalibrationData::default(),
            );
            assert_eq!(c.state, FocusState::Distracted);
            assert_eq!(c.signal, ScoreSignal::Delta(-0.02));
        }
    }

    #[test]
    fn test_attentive_face_is_focused() {
        let c = Classifier::default().classify(Some(&attentive()), &CalibrationData::default());
        assert_eq!(c.state, FocusState::Focused);
        assert_eq!(c.signal, ScoreSignal::Delta(0.01));
        assert_eq!(c.emotion, Some(EmotionState::Neutral));
    }

    #[test]
    fn test_no_face_is_absent_and_keeps_emotion() {
        let c = Classifier::default().classify(None, &CalibrationData::default());
        assert_eq!(c.state, FocusState::Distracted);
        assert_eq!(c.signal, ScoreSignal::Absent);
        assert_eq!(c.emotion, None);
    }

    #[test]
    fn test_emotion_order() {
        let classifier = Classifier::default();
        let surprised_and_smiling = Metrics {
            mar: 0.7,
            smile: 0.05,
            ..attentive()
        };
        assert_eq!(
            classifier.emotion(&surprised_and_smiling),
            EmotionState::Surprised
        );
        assert_eq!(
            classifier.emotion(&Metrics {
                smile: 0.03,
                ..attentive()
            }),
            EmotionState::Happy
        );
        assert_eq!(
            classifier.emotion(&Metrics {
                smile: -0.03,
                ..attentive()
            }),
            EmotionState::Sad
        );
        assert_eq!(
            classifier.emotion(&Metrics {
                smile: 0.01,
                ..attentive()
            }),
            EmotionState::Neutral
        );
    }

    #[test]
    fn test_baseline_ear_shifts_threshold() {
        let classifier = Classifier::default();
        let metrics = Metrics {
            ear: 0.27,
            ..attentive()
        };

        let default = classifier.classify(Some(&metrics), &CalibrationData::default());
        assert_eq!(default.state, FocusState::Focused);

        // Wide-eyed user: 0.25 * 0.36 / 0.3 = 0.30 > 0.27
        let wide = CalibrationData {
            baseline_ear: 0.36,
            ..Default::default()
        };
        assert_eq!(
            classifier.classify(Some(&metrics), &wide).state,
            FocusState::Drowsy
        );
    }

    #[test]
    fn test_invalid_baseline_uses_default_threshold() {
        let thresholds = Thresholds::default();
        for baseline_ear in [0.0, -1.0, f64::NAN] {
            let calibration = CalibrationData {
                baseline_ear,
                ..Default::default()
            };
            assert_eq!(thresholds.effective_ear(&calibration), DEFAULT_EAR_THRESHOLD);
        }
        assert_eq!(
            thresholds.effective_ear(&CalibrationData::default()),
            DEFAULT_EAR_THRESHOLD
        );
    }

    #[test]
    fn test_center_pose_offsets_yaw() {
        let classifier = Classifier::default();
        let calibration = CalibrationData {
            center_head_pose: Some(HeadPose {
                yaw: 0.25,
                pitch: 1.6,
                roll: 0.0,
            }),
            ..Default::default()
        };
        let metrics = Metrics {
            yaw: 0.3,
            ..attentive()
        };
        assert_eq!(
            classifier.classify(Some(&metrics), &calibration).state,
            FocusState::Focused
        );
    }
}
