//! Focus and emotion classifications and per-user calibration data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Eye-aspect-ratio assumed for an uncalibrated user with open eyes.
pub const DEFAULT_BASELINE_EAR: f64 = 0.3;

/// Instantaneous attention classification for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FocusState {
    #[default]
    Focused,
    Distracted,
    Drowsy,
    Calibrating,
}

/// Expression read from mouth geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmotionState {
    #[default]
    Neutral,
    Happy,
    Sad,
    Surprised,
}

impl FocusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focused => "FOCUSED",
            Self::Distracted => "DISTRACTED",
            Self::Drowsy => "DROWSY",
            Self::Calibrating => "CALIBRATING",
        }
    }
}

impl EmotionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "NEUTRAL",
            Self::Happy => "HAPPY",
            Self::Sad => "SAD",
            Self::Surprised => "SURPRISED",
        }
    }
}

impl fmt::Display for FocusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EmotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Neutral head orientation captured during calibration.
///
/// `yaw` uses the same nose-to-ear ratio units as the live yaw metric and
/// `pitch` the same nose/chin ratio, so offsets apply directly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadPose {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Per-user personalization that shifts classifier thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationData {
    /// EAR measured with eyes comfortably open.
    pub baseline_ear: f64,

    /// Pose the user holds when looking at the screen.
    pub center_head_pose: Option<HeadPose>,
}

impl Default for CalibrationData {
    fn default() -> Self {
        Self {
            baseline_ear: DEFAULT_BASELINE_EAR,
            center_head_pose: None,
        }
    }
}

/// Partial calibration update. `None` fields keep their current value.
///
/// `center_head_pose: Some(None)` clears a previously captured pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationUpdate {
    #[serde(default)]
    pub baseline_ear: Option<f64>,
    #[serde(default)]
    pub center_head_pose: Option<Option<HeadPose>>,
}

impl CalibrationData {
    /// Merge a partial update into this calibration.
    pub fn merge(&mut self, update: CalibrationUpdate) {
        if let Some(baseline_ear) = update.baseline_ear {
            self.baseline_ear = baseline_ear;
        }
        if let Some(pose) = update.center_head_pose {
            self.center_head_pose = pose;
        }
    }
}

impl CalibrationUpdate {
    pub fn baseline_ear(value: f64) -> Self {
        Self {
            baseline_ear: Some(value),
            ..Default::default()
        }
    }

    pub fn center_head_pose(pose: HeadPose) -> Self {
        Self {
            center_head_pose: Some(Some(pose)),
            ..Default::default()
        }
    }
}
