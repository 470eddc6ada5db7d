//! Synthetic faces with controllable metrics.
//!
//! Produces full face-mesh landmark sets whose eye, head, and mouth
//! geometry yields chosen EAR, yaw, MAR, and smile values. Used by tests
//! and by the CLI simulator in place of a camera and landmark engine.

use crate::keypoint::Keypoint;
use crate::mesh;

const EYE_WIDTH: f64 = 0.06;
const EYE_Y: f64 = 0.40;
const LEFT_EYE_X: f64 = 0.40;
const RIGHT_EYE_X: f64 = 0.60;
const NOSE_Y: f64 = 0.55;
const EAR_HALF_SPAN: f64 = 0.20;
const CHIN_Y: f64 = 0.80;
const MOUTH_Y: f64 = 0.70;
const MOUTH_WIDTH: f64 = 0.10;

/// Target metrics for a generated face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticFace {
    /// Eye-aspect-ratio of both eyes.
    pub ear: f64,
    /// Head yaw ratio in `(-1, 1)`.
    pub yaw: f64,
    /// Mouth-aspect-ratio.
    pub mar: f64,
    /// Mouth corners above (positive) or below (negative) the mouth center.
    pub smile: f64,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self::attentive()
    }
}

impl SyntheticFace {
    /// Eyes open, facing the camera, relaxed mouth.
    pub fn attentive() -> Self {
        Self {
            ear: 0.30,
            yaw: 0.0,
            mar: 0.10,
            smile: 0.0,
        }
    }

    /// Eyes nearly closed.
    pub fn drowsy() -> Self {
        Self {
            ear: 0.10,
            ..Self::attentive()
        }
    }

    /// Head turned well past the default yaw threshold.
    pub fn looking_away() -> Self {
        Self {
            yaw: 0.45,
            ..Self::attentive()
        }
    }

    pub fn with_ear(mut self, ear: f64) -> Self {
        self.ear = ear;
        self
    }

    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_mar(mut self, mar: f64) -> Self {
        self.mar = mar;
        self
    }

    pub fn with_smile(mut self, smile: f64) -> Self {
        self.smile = smile;
        self
    }

    /// Generate a landmark set with `count` keypoints.
    ///
    /// Points not read by any metric sit at the frame center. `count` must
    /// exceed [`mesh::MAX_REQUIRED_INDEX`] for the face to be measurable;
    /// shorter sets are still produced so callers can exercise the
    /// undersized path.
    pub fn landmarks(&self, count: usize) -> Vec<Keypoint> {
        let mut points = vec![Keypoint::planar(0.5, 0.5); count];
        let mut set = |index: usize, point: Keypoint| {
            if let Some(slot) = points.get_mut(index) {
                *slot = point;
            }
        };

        let eye_height = self.ear * EYE_WIDTH;
        for (indices, center_x) in [(mesh::LEFT_EYE, LEFT_EYE_X), (mesh::RIGHT_EYE, RIGHT_EYE_X)] {
            let left = center_x - EYE_WIDTH / 2.0;
            let right = center_x + EYE_WIDTH / 2.0;
            let top = EYE_Y - eye_height / 2.0;
            let bottom = EYE_Y + eye_height / 2.0;
            let quarter = EYE_WIDTH / 4.0;

            set(indices[0], Keypoint::planar(left, EYE_Y));
            set(indices[1], Keypoint::planar(right, EYE_Y));
            set(indices[2], Keypoint::planar(center_x - quarter, top));
            set(indices[3], Keypoint::planar(center_x, top));
            set(indices[4], Keypoint::planar(center_x + quarter, top));
            set(indices[5], Keypoint::planar(center_x - quarter, bottom));
            set(indices[6], Keypoint::planar(center_x, bottom));
            set(indices[7], Keypoint::planar(center_x + quarter, bottom));
        }

        // yaw = (dRight - dLeft) / (dRight + dLeft); with the nose shifted
        // by s between ears at +/-e this is -s/e.
        let nose_shift = -self.yaw * EAR_HALF_SPAN;
        set(mesh::NOSE_TIP, Keypoint::planar(0.5 + nose_shift, NOSE_Y));
        set(mesh::LEFT_EAR, Keypoint::planar(0.5 - EAR_HALF_SPAN, NOSE_Y));
        set(mesh::RIGHT_EAR, Keypoint::planar(0.5 + EAR_HALF_SPAN, NOSE_Y));
        set(mesh::CHIN, Keypoint::planar(0.5, CHIN_Y));

        let mouth_height = self.mar * MOUTH_WIDTH;
        let corner_y = MOUTH_Y - self.smile;
        set(mesh::MOUTH_LEFT, Keypoint::planar(0.5 - MOUTH_WIDTH / 2.0, corner_y));
        set(mesh::MOUTH_RIGHT, Keypoint::planar(0.5 + MOUTH_WIDTH / 2.0, corner_y));
        set(mesh::UPPER_LIP, Keypoint::planar(0.5, MOUTH_Y - mouth_height / 2.0));
        set(mesh::LOWER_LIP, Keypoint::planar(0.5, MOUTH_Y + mouth_height / 2.0));

        points
    }

    /// Generate a refined (478-point) face mesh.
    pub fn refined_landmarks(&self) -> Vec<Keypoint> {
        self.landmarks(mesh::REFINED_FACE_MESH_POINTS)
    }
}
