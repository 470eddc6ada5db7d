//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FocusError, FocusResult};

/// Smallest landmark set that still covers every mesh index the metrics
/// read (the right ear tragion, index 454).
pub const MIN_EXPECTED_LANDMARKS: usize = 455;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Focus detection tuning.
    pub detection: DetectionDefaults,

    /// Visual and audio feedback tuning.
    pub feedback: FeedbackDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default detection and scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionDefaults {
    /// Number of keypoints a valid landmark set must contain.
    pub expected_landmarks: usize,

    /// Eye-aspect-ratio below which the user is considered drowsy.
    pub ear_threshold: f64,

    /// Absolute yaw ratio above which the user is considered to look away.
    pub yaw_threshold: f64,

    /// Mouth-aspect-ratio above which the expression reads as surprised.
    pub mar_threshold: f64,

    /// Mouth-corner offset needed to read a smile or a frown.
    pub smile_threshold: f64,

    /// Multiplier applied to negative score deltas.
    pub penalty_dampening: f64,

    /// What happens to the score while no face is visible.
    pub absence_policy: AbsencePolicyKind,

    /// Per-tick decay for [`AbsencePolicyKind::SlowDecay`].
    pub absence_decay: f64,

    /// Per-tick penalty for [`AbsencePolicyKind::InstantPenalty`].
    pub absence_penalty: f64,

    /// Face frames sampled after a reset to rebuild calibration (0 = off).
    pub calibration_frames: usize,

    /// Optional upper bound on applied ticks per second.
    pub max_tick_hz: Option<u32>,
}

/// Score behavior while the face is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbsencePolicyKind {
    /// Slow fixed decay: occlusion is not necessarily distraction.
    #[default]
    SlowDecay,
    /// Earlier behavior: a fixed penalty per absent tick.
    InstantPenalty,
}

/// Audio feedback strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioModeKind {
    /// Two competing ambience tracks.
    #[default]
    DualTrack,
    /// One drone routed through a low-pass filter.
    Drone,
}

/// Default feedback parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackDefaults {
    /// Which audio strategy is deployed.
    pub audio_mode: AudioModeKind,

    /// Exponential ramp time constant for gain changes (seconds).
    pub ramp_seconds: f64,

    /// Transition used while focus is worsening (ms).
    pub slow_transition_ms: u32,

    /// Transition used while focus holds or recovers (ms).
    pub fast_transition_ms: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "focusflow_focus_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for DetectionDefaults {
    fn default() -> Self {
        Self {
            expected_landmarks: 478,
            ear_threshold: 0.25,
            yaw_threshold: 0.2,
            mar_threshold: 0.5,
            smile_threshold: 0.02,
            penalty_dampening: 0.2,
            absence_policy: AbsencePolicyKind::SlowDecay,
            absence_decay: 0.002,
            absence_penalty: 0.01,
            calibration_frames: 0,
            max_tick_hz: None,
        }
    }
}

impl Default for FeedbackDefaults {
    fn default() -> Self {
        Self {
            audio_mode: AudioModeKind::DualTrack,
            ramp_seconds: 0.5,
            slow_transition_ms: 2000,
            fast_transition_ms: 800,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> FocusResult<Self> {
        if !path.exists() {
            return Err(FocusError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> FocusResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> FocusResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values that would break the score or feedback invariants.
    pub fn validate(&self) -> FocusResult<()> {
        let d = &self.detection;
        if d.expected_landmarks < MIN_EXPECTED_LANDMARKS {
            return Err(FocusError::config(format!(
                "expected_landmarks must be at least {MIN_EXPECTED_LANDMARKS}, got {}",
                d.expected_landmarks
            )));
        }
        if !(d.penalty_dampening.is_finite() && (0.0..=1.0).contains(&d.penalty_dampening)) {
            return Err(FocusError::config(format!(
                "penalty_dampening must be in [0, 1], got {}",
                d.penalty_dampening
            )));
        }
        for (name, value) in [
            ("ear_threshold", d.ear_threshold),
            ("yaw_threshold", d.yaw_threshold),
            ("mar_threshold", d.mar_threshold),
            ("smile_threshold", d.smile_threshold),
            ("absence_decay", d.absence_decay),
            ("absence_penalty", d.absence_penalty),
            ("ramp_seconds", self.feedback.ramp_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FocusError::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if d.max_tick_hz == Some(0) {
            return Err(FocusError::config("max_tick_hz must be positive when set"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("focusflow").join("config.json")
}
