//! Geometry metrics derived from a face landmark set.
//!
//! Every function here is pure. Degenerate geometry (a zero denominator)
//! yields `0.0` instead of NaN or infinity; other out-of-range values pass
//! through untouched and are left to the classifier's thresholds.

use serde::{Deserialize, Serialize};

use focusflow_face_model::keypoint::{Keypoint, LandmarkSet};
use focusflow_face_model::mesh;

/// Per-tick scalar signals measured from one face.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean eye-aspect-ratio of both eyes. Low values mean closed eyes.
    pub ear: f64,
    /// Left/right head turn ratio, roughly `[-1, 1]`, `0` facing the camera.
    pub yaw: f64,
    /// Nose-to-chin over eyes-to-nose vertical ratio.
    pub pitch: f64,
    /// Mouth opening height over mouth width.
    pub mar: f64,
    /// Mouth-corner lift above the mouth center. Positive reads as a smile,
    /// negative as a frown.
    pub smile: f64,
}

impl Metrics {
    /// Frown magnitude; the mirror of [`Metrics::smile`].
    pub fn frown(&self) -> f64 {
        -self.smile
    }
}

/// Compute all metrics for a frame, or `None` when no face was detected.
pub fn compute_metrics(landmarks: Option<&LandmarkSet<'_>>) -> Option<Metrics> {
    let set = landmarks?;
    let left = eye_aspect_ratio(&set.eye(&mesh::LEFT_EYE));
    let right = eye_aspect_ratio(&set.eye(&mesh::RIGHT_EYE));

    Some(Metrics {
        ear: (left + right) / 2.0,
        yaw: yaw_ratio(set),
        pitch: pitch_ratio(set),
        mar: mouth_aspect_ratio(set),
        smile: smile_delta(set),
    })
}

/// EAR for the eight ordered points of one eye.
///
/// `(|topB - bottomB| + |topA - bottomA|) / (2 * |cornerA - cornerB|)`.
pub fn eye_aspect_ratio(eye: &[Keypoint; 8]) -> f64 {
    let v1 = eye[mesh::EYE_TOP_B].distance(&eye[mesh::EYE_BOTTOM_B]);
    let v2 = eye[mesh::EYE_TOP_A].distance(&eye[mesh::EYE_BOTTOM_A]);
    let h = eye[mesh::EYE_CORNER_A].distance(&eye[mesh::EYE_CORNER_B]);
    safe_ratio(v1 + v2, 2.0 * h)
}

/// Yaw from nose-to-ear asymmetry: `(dRight - dLeft) / (dRight + dLeft)`.
pub fn yaw_ratio(set: &LandmarkSet<'_>) -> f64 {
    let nose = set.point(mesh::NOSE_TIP);
    let d_left = nose.distance(&set.point(mesh::LEFT_EAR));
    let d_right = nose.distance(&set.point(mesh::RIGHT_EAR));
    safe_ratio(d_right - d_left, d_right + d_left)
}

/// Rough pitch heuristic without a pose solver.
pub fn pitch_ratio(set: &LandmarkSet<'_>) -> f64 {
    let nose_y = set.point(mesh::NOSE_TIP).y;
    let chin_y = set.point(mesh::CHIN).y;
    let eyes_mid_y =
        (set.point(mesh::LEFT_EYE_OUTER).y + set.point(mesh::RIGHT_EYE_OUTER).y) / 2.0;
    safe_ratio(chin_y - nose_y, nose_y - eyes_mid_y)
}

/// MAR: inner-lip distance over mouth-corner distance.
pub fn mouth_aspect_ratio(set: &LandmarkSet<'_>) -> f64 {
    let vertical = set.point(mesh::UPPER_LIP).distance(&set.point(mesh::LOWER_LIP));
    let horizontal = set
        .point(mesh::MOUTH_LEFT)
        .distance(&set.point(mesh::MOUTH_RIGHT));
    safe_ratio(vertical, horizontal)
}

/// Mouth-center y minus mean corner y. Smaller y is higher on screen, so
/// raised corners give a positive value.
pub fn smile_delta(set: &LandmarkSet<'_>) -> f64 {
    let corners_y = (set.point(mesh::MOUTH_LEFT).y + set.point(mesh::MOUTH_RIGHT).y) / 2.0;
    let center_y = (set.point(mesh::UPPER_LIP).y + set.point(mesh::LOWER_LIP).y) / 2.0;
    center_y - corners_y
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}
