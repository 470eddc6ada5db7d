//! Heads-up display summary.

use std::fmt;

use serde::Serialize;

use focusflow_face_model::state::{EmotionState, FocusState};

use crate::visual::clamp_unit;

/// Coarse score band used to color the score ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            Self::High
        } else if score > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// What the HUD shows for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSummary {
    /// Score as a whole percentage.
    pub percent: u8,
    pub band: ScoreBand,
    pub focus_state: FocusState,
    /// Hidden while neutral.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionState>,
}

impl HudSummary {
    pub fn new(score: f64, focus_state: FocusState, emotion: EmotionState) -> Self {
        let score = clamp_unit(score);
        Self {
            percent: (score * 100.0).round() as u8,
            band: ScoreBand::from_score(score),
            focus_state,
            emotion: (emotion != EmotionState::Neutral).then_some(emotion),
        }
    }
}

impl fmt::Display for HudSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3}% [{}] {}", self.percent, self.band.as_str(), self.focus_state)?;
        if let Some(emotion) = self.emotion {
            write!(f, " ({emotion})")?;
        }
        Ok(())
    }
}
