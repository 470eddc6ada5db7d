//! Shared focus state.
//!
//! The latest score, focus state, emotion, activity flag, and calibration
//! live in a `tokio::sync::watch` channel: every publish replaces the whole
//! snapshot and readers always see the latest complete value without
//! blocking the writer.
//!
//! There is exactly one [`FocusWriter`] (the pipeline). Everything else
//! gets a [`FocusHandle`], which can read and subscribe but can only
//! change state through the two external operations: merging calibration
//! data and resetting focus.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use focusflow_face_model::state::{CalibrationData, CalibrationUpdate, EmotionState, FocusState};

use crate::integrator::INITIAL_SCORE;

/// A complete, consistent view of the shared focus state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusSnapshot {
    pub score: f64,
    pub focus_state: FocusState,
    pub emotion: EmotionState,
    /// Whether a pipeline is currently consuming frames.
    pub is_active: bool,
    pub calibration: CalibrationData,
    /// Bumped by every reset. Publishes computed against an older
    /// generation are dropped.
    pub generation: u64,
    /// Number of applied ticks since process start.
    pub tick: u64,
}

impl Default for FocusSnapshot {
    fn default() -> Self {
        Self {
            score: INITIAL_SCORE,
            focus_state: FocusState::Focused,
            emotion: EmotionState::Neutral,
            is_active: false,
            calibration: CalibrationData::default(),
            generation: 0,
            tick: 0,
        }
    }
}

/// Result of one tick, as published by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickUpdate {
    pub score: f64,
    pub focus_state: FocusState,
    /// `None` keeps the current emotion.
    pub emotion: Option<EmotionState>,
}

/// Create the shared state with its single writer.
pub fn focus_store() -> (FocusWriter, FocusHandle) {
    let (tx, _rx) = watch::channel(FocusSnapshot::default());
    let tx = Arc::new(tx);
    (FocusWriter { tx: tx.clone() }, FocusHandle { tx })
}

/// The pipeline's write access. Not `Clone`.
#[derive(Debug)]
pub struct FocusWriter {
    tx: Arc<watch::Sender<FocusSnapshot>>,
}

impl FocusWriter {
    pub fn snapshot(&self) -> FocusSnapshot {
        self.tx.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        self.tx.borrow().generation
    }

    pub fn calibration(&self) -> CalibrationData {
        self.tx.borrow().calibration
    }

    /// A read/control handle onto the same state.
    pub fn handle(&self) -> FocusHandle {
        FocusHandle {
            tx: self.tx.clone(),
        }
    }

    /// Publish a tick computed against `generation`.
    ///
    /// Returns `false` and leaves the state untouched if a reset happened
    /// since the tick started.
    pub fn publish(&self, update: TickUpdate, generation: u64) -> bool {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            snapshot.score = update.score;
            snapshot.focus_state = update.focus_state;
            if let Some(emotion) = update.emotion {
                snapshot.emotion = emotion;
            }
            snapshot.tick += 1;
            true
        })
    }

    /// Merge calibration measured by the pipeline itself, unless a reset
    /// made the measurement stale.
    pub fn publish_calibration(&self, update: CalibrationUpdate, generation: u64) -> bool {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            snapshot.calibration.merge(update);
            true
        })
    }

    pub fn set_active(&self, active: bool) {
        self.tx.send_if_modified(|snapshot| {
            let changed = snapshot.is_active != active;
            snapshot.is_active = active;
            changed
        });
    }
}

/// Read access plus the external calibration/reset operations.
#[derive(Debug, Clone)]
pub struct FocusHandle {
    tx: Arc<watch::Sender<FocusSnapshot>>,
}

impl FocusHandle {
    /// The latest complete snapshot.
    pub fn snapshot(&self) -> FocusSnapshot {
        self.tx.borrow().clone()
    }

    /// A receiver that is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<FocusSnapshot> {
        self.tx.subscribe()
    }

    /// Merge a partial calibration update; unspecified fields are kept.
    pub fn set_calibration_data(&self, update: CalibrationUpdate) {
        self.tx.send_modify(|snapshot| snapshot.calibration.merge(update));
    }

    /// Reinitialize the score to fully focused and enter calibration.
    pub fn reset_focus(&self) {
        self.tx.send_modify(|snapshot| {
            snapshot.score = INITIAL_SCORE;
            snapshot.focus_state = FocusState::Calibrating;
            snapshot.generation += 1;
        });
        tracing::info!("Focus reset requested");
    }
}
