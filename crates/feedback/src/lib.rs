//! FocusFlow Feedback
//!
//! Turns the focus score into feedback the user can feel:
//! - **Visual:** Blur, grayscale, and contrast that degrade as focus drops
//! - **Transitions:** Slow fade-in of degradation, fast recovery
//! - **Audio:** Gain and filter targets for the dual-track or drone strategy
//! - **Ramps:** Exponential approach to audio targets
//! - **HUD:** Score percentage, band, state, and emotion
//!
//! Everything here is a pure mapping from score to parameters; the host
//! owns the actual stylesheet and audio graph.

pub mod audio;
pub mod hud;
pub mod ramp;
pub mod visual;

use serde::Serialize;

use focusflow_common::config::FeedbackDefaults;

pub use audio::{AudioMapper, AudioMode, AudioTargets};
pub use hud::{HudSummary, ScoreBand};
pub use ramp::GainRamp;
pub use visual::{TransitionHysteresis, TransitionTiming, VisualParams, VisualSnapshot};

/// Visual and audio output for one score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackFrame {
    pub visual: VisualSnapshot,
    pub audio: AudioTargets,
}

/// Stateful mapper combining transition hysteresis with audio targets.
#[derive(Debug, Clone)]
pub struct FeedbackMapper {
    hysteresis: TransitionHysteresis,
    audio: AudioMapper,
}

impl FeedbackMapper {
    pub fn new(timing: TransitionTiming, audio: AudioMapper) -> Self {
        Self {
            hysteresis: TransitionHysteresis::new(timing),
            audio,
        }
    }

    pub fn audio_mode(&self) -> AudioMode {
        self.audio.mode()
    }

    /// Map the next score in a stream.
    pub fn update(&mut self, score: f64) -> FeedbackFrame {
        FeedbackFrame {
            visual: self.hysteresis.update(score),
            audio: self.audio.targets(score),
        }
    }
}

impl Default for FeedbackMapper {
    fn default() -> Self {
        Self::from(&FeedbackDefaults::default())
    }
}

impl From<&FeedbackDefaults> for FeedbackMapper {
    fn from(defaults: &FeedbackDefaults) -> Self {
        Self::new(TransitionTiming::from(defaults), AudioMapper::from(defaults))
    }
}
