//! Visual degradation.
//!
//! The page is blurred, desaturated, and flattened as focus drops. Values
//! are exposed as plain numbers plus CSS helpers; applying them is up to
//! the rendering layer.

use serde::Serialize;

use focusflow_common::config::FeedbackDefaults;

/// Blur at zero focus (px).
pub const MAX_BLUR_PX: f64 = 8.0;
/// Grayscale at zero focus (%).
pub const MAX_GRAYSCALE_PCT: f64 = 80.0;
/// Contrast lost at zero focus (percentage points below 100).
pub const MAX_CONTRAST_LOSS_PCT: f64 = 30.0;

pub const DEFAULT_SLOW_TRANSITION_MS: u32 = 2000;
pub const DEFAULT_FAST_TRANSITION_MS: u32 = 800;

/// Filter parameters for one score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualParams {
    pub blur_px: f64,
    pub grayscale_pct: f64,
    pub contrast_pct: f64,
}

impl VisualParams {
    /// Map a score to filter parameters. Out-of-range scores are clamped.
    pub fn from_score(score: f64) -> Self {
        let distraction = 1.0 - clamp_unit(score);
        Self {
            blur_px: distraction * MAX_BLUR_PX,
            grayscale_pct: distraction * MAX_GRAYSCALE_PCT,
            contrast_pct: 100.0 - distraction * MAX_CONTRAST_LOSS_PCT,
        }
    }

    pub fn css_filter(&self) -> String {
        format!(
            "blur({:.2}px) grayscale({:.1}%) contrast({:.1}%)",
            self.blur_px, self.grayscale_pct, self.contrast_pct
        )
    }

    /// Custom properties for a stylesheet that composes its own filter.
    pub fn css_properties(&self) -> [(&'static str, String); 3] {
        [
            ("--focus-blur", format!("{}px", self.blur_px)),
            ("--focus-grayscale", format!("{}%", self.grayscale_pct)),
            ("--focus-contrast", format!("{}%", self.contrast_pct)),
        ]
    }
}

/// Transition durations for worsening and recovering focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionTiming {
    pub slow_ms: u32,
    pub fast_ms: u32,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            slow_ms: DEFAULT_SLOW_TRANSITION_MS,
            fast_ms: DEFAULT_FAST_TRANSITION_MS,
        }
    }
}

impl From<&FeedbackDefaults> for TransitionTiming {
    fn from(defaults: &FeedbackDefaults) -> Self {
        Self {
            slow_ms: defaults.slow_transition_ms,
            fast_ms: defaults.fast_transition_ms,
        }
    }
}

impl TransitionTiming {
    /// Degradation fades in slowly; recovery snaps back quickly.
    pub fn duration_ms(&self, current: f64, previous: f64) -> u32 {
        if current < previous {
            self.slow_ms
        } else {
            self.fast_ms
        }
    }
}

/// Pull-based snapshot for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualSnapshot {
    pub blur: f64,
    pub grayscale: f64,
    pub contrast: f64,
    pub transition_duration_ms: u32,
}

impl VisualSnapshot {
    pub fn params(&self) -> VisualParams {
        VisualParams {
            blur_px: self.blur,
            grayscale_pct: self.grayscale,
            contrast_pct: self.contrast,
        }
    }

    /// `transition: filter <duration>ms ease-out`
    pub fn css_transition(&self) -> String {
        format!("filter {}ms ease-out", self.transition_duration_ms)
    }
}

/// Keeps the previous score so each new score gets the right transition.
#[derive(Debug, Clone)]
pub struct TransitionHysteresis {
    timing: TransitionTiming,
    previous: Option<f64>,
}

impl TransitionHysteresis {
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            timing,
            previous: None,
        }
    }

    pub fn previous(&self) -> Option<f64> {
        self.previous
    }

    /// Map a score and remember it. The first score has nothing to compare
    /// against and uses the fast transition.
    pub fn update(&mut self, score: f64) -> VisualSnapshot {
        let score = clamp_unit(score);
        let previous = self.previous.replace(score).unwrap_or(score);
        visual_snapshot(score, previous, &self.timing)
    }
}

impl Default for TransitionHysteresis {
    fn default() -> Self {
        Self::new(TransitionTiming::default())
    }
}

/// Snapshot for a score given the score one tick back.
pub fn visual_snapshot(score: f64, previous: f64, timing: &TransitionTiming) -> VisualSnapshot {
    let params = VisualParams::from_score(score);
    VisualSnapshot {
        blur: params.blur_px,
        grayscale: params.grayscale_pct,
        contrast: params.contrast_pct,
        transition_duration_ms: timing.duration_ms(clamp_unit(score), clamp_unit(previous)),
    }
}

pub(crate) fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
