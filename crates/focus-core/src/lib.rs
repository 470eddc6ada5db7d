//! FocusFlow Focus Core
//!
//! Turns a stream of facial landmark results into a continuously updated
//! focus score:
//! - **Geometry:** Eye openness, head yaw and pitch, mouth opening, and smile
//! - **Classifier:** Per-tick focus state, score delta, and emotion
//! - **Integrator:** The asymmetric score accumulator and absence policy
//! - **Store:** Single-writer shared state readable from anywhere
//! - **Pipeline:** The frame-driven loop tying a landmark source to the engine
//!
//! Everything except [`pipeline`] is synchronous computation; the pipeline
//! needs a tokio runtime.

pub mod calibration;
pub mod classifier;
pub mod engine;
pub mod geometry;
pub mod integrator;
pub mod pipeline;
pub mod source;
pub mod store;

pub use classifier::{Classifier, Thresholds};
pub use engine::{EngineConfig, FocusEngine, TickOutcome};
pub use geometry::{compute_metrics, Metrics};
pub use integrator::{AbsencePolicy, IntegratorConfig, ScoreIntegrator};
pub use pipeline::{FocusPipeline, PipelineStats, StopFlag};
pub use source::{ChannelSource, LandmarkSource, ReplaySource, SourcePoll};
pub use store::{focus_store, FocusHandle, FocusSnapshot, FocusWriter};
