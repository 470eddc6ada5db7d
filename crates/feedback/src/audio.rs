//! Audio feedback targets.
//!
//! Two strategies are supported. `dual-track` switches between two looped
//! ambience tracks by score band; `drone` scales one drone's gain and
//! lowpass cutoff with distraction. Either way the output is a set of
//! targets, and the audio layer ramps towards them (see [`crate::ramp`]).

use serde::Serialize;

pub use focusflow_common::config::AudioModeKind as AudioMode;
use focusflow_common::config::FeedbackDefaults;

use crate::visual::clamp_unit;

/// Time constant for gain ramps (seconds).
pub const DEFAULT_RAMP_SECONDS: f64 = 0.5;

/// At or below this score the dual-track background plays.
pub const BACKGROUND_TRACK_CEILING: f64 = 0.6;

/// Drone gain at zero focus.
pub const DRONE_MAX_GAIN: f64 = 0.4;
/// Drone lowpass cutoff at full focus (Hz).
pub const DRONE_BASE_FILTER_HZ: f64 = 100.0;
/// Cutoff added at zero focus (Hz).
pub const DRONE_FILTER_SPAN_HZ: f64 = 200.0;

/// Index of the background track in dual-track gains.
pub const TRACK_BACKGROUND: usize = 0;
/// Index of the zero-focus track in dual-track gains.
pub const TRACK_ALERT: usize = 1;

/// What the audio layer should ramp towards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTargets {
    /// One gain per track, in track order.
    pub target_gains: Vec<f64>,
    /// Lowpass cutoff, for modes that filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_filter_hz: Option<f64>,
    pub ramp_seconds: f64,
}

/// Maps scores to [`AudioTargets`] for a configured mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioMapper {
    mode: AudioMode,
    ramp_seconds: f64,
}

impl AudioMapper {
    pub fn new(mode: AudioMode) -> Self {
        Self {
            mode,
            ramp_seconds: DEFAULT_RAMP_SECONDS,
        }
    }

    pub fn with_ramp_seconds(mut self, ramp_seconds: f64) -> Self {
        self.ramp_seconds = ramp_seconds;
        self
    }

    pub fn mode(&self) -> AudioMode {
        self.mode
    }

    pub fn targets(&self, score: f64) -> AudioTargets {
        let score = clamp_unit(score);
        match self.mode {
            AudioMode::DualTrack => AudioTargets {
                target_gains: dual_track_gains(score).to_vec(),
                target_filter_hz: None,
                ramp_seconds: self.ramp_seconds,
            },
            AudioMode::Drone => {
                let (gain, filter_hz) = drone_targets(score);
                AudioTargets {
                    target_gains: vec![gain],
                    target_filter_hz: Some(filter_hz),
                    ramp_seconds: self.ramp_seconds,
                }
            }
        }
    }
}

impl Default for AudioMapper {
    fn default() -> Self {
        Self::new(AudioMode::default())
    }
}

impl From<&FeedbackDefaults> for AudioMapper {
    fn from(defaults: &FeedbackDefaults) -> Self {
        Self::new(defaults.audio_mode).with_ramp_seconds(defaults.ramp_seconds)
    }
}

/// `[background, alert]` gains. The alert track plays only at exactly zero.
pub fn dual_track_gains(score: f64) -> [f64; 2] {
    if score <= 0.0 {
        [0.0, 1.0]
    } else if score <= BACKGROUND_TRACK_CEILING {
        [1.0, 0.0]
    } else {
        [0.0, 0.0]
    }
}

/// `(gain, lowpass_hz)` for the drone.
pub fn drone_targets(score: f64) -> (f64, f64) {
    let distraction = 1.0 - clamp_unit(score);
    (
        distraction.min(1.0) * DRONE_MAX_GAIN,
        DRONE_BASE_FILTER_HZ + distraction * DRONE_FILTER_SPAN_HZ,
    )
}
