//! Calibration capture.
//!
//! After a reset, the pipeline can sample a number of face frames while
//! the user looks at the screen normally and derive a personal baseline
//! EAR and neutral head pose from their medians.

use focusflow_face_model::state::{CalibrationUpdate, HeadPose};

use crate::geometry::Metrics;

/// Accumulates metrics until enough frames were seen.
#[derive(Debug, Clone)]
pub struct CalibrationSampler {
    target_frames: usize,
    ears: Vec<f64>,
    yaws: Vec<f64>,
    pitches: Vec<f64>,
}

impl CalibrationSampler {
    pub fn new(target_frames: usize) -> Self {
        Self {
            target_frames: target_frames.max(1),
            ears: Vec::with_capacity(target_frames),
            yaws: Vec::with_capacity(target_frames),
            pitches: Vec::with_capacity(target_frames),
        }
    }

    /// Record one face frame. Returns the calibration once the target
    /// frame count is reached.
    pub fn add(&mut self, metrics: &Metrics) -> Option<CalibrationUpdate> {
        self.ears.push(metrics.ear);
        self.yaws.push(metrics.yaw);
        self.pitches.push(metrics.pitch);

        if self.ears.len() < self.target_frames {
            return None;
        }
        Some(self.finish())
    }

    pub fn samples(&self) -> usize {
        self.ears.len()
    }

    pub fn target_frames(&self) -> usize {
        self.target_frames
    }

    fn finish(&self) -> CalibrationUpdate {
        let pose = HeadPose {
            yaw: median(&self.yaws),
            pitch: median(&self.pitches),
            roll: 0.0,
        };
        CalibrationUpdate {
            baseline_ear: Some(median(&self.ears)),
            ..CalibrationUpdate::center_head_pose(pose)
        }
    }
}

/// Median of a slice; averages the middle pair for even lengths.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let len = sorted.len();
    if len % 2 == 1 {
        sorted[len / 2]
    } else {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    }
}
