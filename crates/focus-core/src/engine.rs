//! Per-tick focus inference.
//!
//! [`FocusEngine`] turns one settled landmark result into one state
//! publish: validate the landmark set, compute metrics, classify, integrate
//! the score, and write the result to the shared store. It also notices
//! resets made through a [`FocusHandle`] and, when configured, runs the
//! calibration phase that follows them.

use focusflow_common::config::DetectionDefaults;
use focusflow_face_model::keypoint::{Keypoint, LandmarkSet};
use focusflow_face_model::mesh::REFINED_FACE_MESH_POINTS;
use focusflow_face_model::state::{EmotionState, FocusState};

use crate::calibration::CalibrationSampler;
use crate::classifier::{Classifier, Thresholds};
use crate::geometry::{compute_metrics, Metrics};
use crate::integrator::{IntegratorConfig, ScoreIntegrator};
use crate::store::{FocusHandle, FocusWriter, TickUpdate};

/// Engine parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Landmark count a result must have to count as a face.
    pub expected_landmarks: usize,
    pub thresholds: Thresholds,
    pub integrator: IntegratorConfig,
    /// Face ticks sampled after each reset (0 disables calibration).
    pub calibration_frames: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expected_landmarks: REFINED_FACE_MESH_POINTS,
            thresholds: Thresholds::default(),
            integrator: IntegratorConfig::default(),
            calibration_frames: 0,
        }
    }
}

impl From<&DetectionDefaults> for EngineConfig {
    fn from(defaults: &DetectionDefaults) -> Self {
        Self {
            expected_landmarks: defaults.expected_landmarks,
            thresholds: Thresholds::from(defaults),
            integrator: IntegratorConfig::from(defaults),
            calibration_frames: defaults.calibration_frames,
        }
    }
}

/// What one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub score: f64,
    pub focus_state: FocusState,
    pub emotion: Option<EmotionState>,
    /// `None` when no valid face was present.
    pub metrics: Option<Metrics>,
    /// False when the publish was dropped because a reset raced it.
    pub published: bool,
}

impl TickOutcome {
    pub fn face_present(&self) -> bool {
        self.metrics.is_some()
    }
}

/// Owns the score and is the only writer of the shared focus state.
#[derive(Debug)]
pub struct FocusEngine {
    config: EngineConfig,
    classifier: Classifier,
    integrator: ScoreIntegrator,
    writer: FocusWriter,
    generation: u64,
    calibration: Option<CalibrationSampler>,
}

impl FocusEngine {
    pub fn new(config: EngineConfig, writer: FocusWriter) -> Self {
        let generation = writer.generation();
        Self {
            classifier: Classifier::new(config.thresholds),
            integrator: ScoreIntegrator::new(config.integrator),
            writer,
            generation,
            calibration: None,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A read/reset handle onto the state this engine writes.
    pub fn handle(&self) -> FocusHandle {
        self.writer.handle()
    }

    pub fn score(&self) -> f64 {
        self.integrator.score()
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibration.is_some()
    }

    /// Mark the engine as consuming (or no longer consuming) frames.
    pub fn set_active(&self, active: bool) {
        self.writer.set_active(active);
    }

    /// Process one settled inference result.
    ///
    /// `None`, or a landmark list of the wrong length, is treated as "no
    /// face this tick".
    pub fn on_frame_result(&mut self, landmarks: Option<&[Keypoint]>) -> TickOutcome {
        self.sync_generation();

        let set = landmarks.and_then(|points| {
            let set = LandmarkSet::new(points, self.config.expected_landmarks);
            if set.is_none() {
                tracing::debug!(
                    got = points.len(),
                    expected = self.config.expected_landmarks,
                    "Unexpected landmark count, treating as no face"
                );
            }
            set
        });
        let metrics = compute_metrics(set.as_ref());

        if self.calibration.is_some() {
            return self.calibration_tick(metrics);
        }

        let calibration = self.writer.calibration();
        let classification = self.classifier.classify(metrics.as_ref(), &calibration);
        let score = self.integrator.apply(classification.signal);

        let published = self.writer.publish(
            TickUpdate {
                score,
                focus_state: classification.state,
                emotion: classification.emotion,
            },
            self.generation,
        );
        if !published {
            tracing::debug!(generation = self.generation, "Dropped tick from before reset");
        }

        TickOutcome {
            score,
            focus_state: classification.state,
            emotion: classification.emotion,
            metrics,
            published,
        }
    }

    /// Score stays frozen and the state reads Calibrating until enough face
    /// ticks have been sampled.
    fn calibration_tick(&mut self, metrics: Option<Metrics>) -> TickOutcome {
        let score = self.integrator.score();
        let finished = match (self.calibration.as_mut(), metrics.as_ref()) {
            (Some(sampler), Some(m)) => sampler.add(m),
            _ => None,
        };

        if let Some(update) = finished {
            tracing::info!(
                baseline_ear = update.baseline_ear.unwrap_or_default(),
                "Calibration complete"
            );
            self.writer.publish_calibration(update, self.generation);
            self.calibration = None;
        }

        let published = self.writer.publish(
            TickUpdate {
                score,
                focus_state: FocusState::Calibrating,
                emotion: None,
            },
            self.generation,
        );

        TickOutcome {
            score,
            focus_state: FocusState::Calibrating,
            emotion: None,
            metrics,
            published,
        }
    }

    fn sync_generation(&mut self) {
        let current = self.writer.generation();
        if current == self.generation {
            return;
        }
        self.generation = current;
        self.integrator.reset();
        self.calibration = (self.config.calibration_frames > 0)
            .then(|| CalibrationSampler::new(self.config.calibration_frames));
        tracing::info!(
            generation = current,
            calibrating = self.calibration.is_some(),
            "Engine picked up focus reset"
        );
    }
}
