//! The frame-driven focus pipeline.
//!
//! One loop, one in-flight result: check the stop flag, submit a frame to
//! the source, check the stop flag again, then hand the settled result to
//! the engine. A result that settles after stop is discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use focusflow_common::clock::{RateController, SessionClock};
use focusflow_common::error::{FocusError, FocusResult};

use crate::engine::{FocusEngine, TickOutcome};
use crate::source::{LandmarkSource, SourcePoll};

/// Sleep between polls while the source has nothing for us.
const IDLE_BACKOFF: Duration = Duration::from_millis(1);

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lifecycle of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    /// Created, not yet run.
    Idle,
    /// Consuming frames.
    Running,
    /// Ran to completion or was stopped.
    Stopped,
    /// Engine initialization failed; the pipeline never ticks again.
    Failed,
}

/// Counters collected over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub started_at: Option<DateTime<Utc>>,
    /// Wall time spent in the loop.
    pub duration_ms: u64,
    /// Results handed to the engine.
    pub ticks: u64,
    pub face_ticks: u64,
    pub absent_ticks: u64,
    /// Results dropped by the tick-rate limit.
    pub skipped: u64,
    /// Results that settled after stop.
    pub discarded: u64,
    /// Per-tick source errors.
    pub errors: u64,
}

impl PipelineStats {
    fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        if outcome.face_present() {
            self.face_ticks += 1;
        } else {
            self.absent_ticks += 1;
        }
    }
}

/// Drives a [`FocusEngine`] from a [`LandmarkSource`].
pub struct FocusPipeline<S: LandmarkSource> {
    source: S,
    engine: FocusEngine,
    stop_flag: StopFlag,
    rate: Option<RateController>,
    tick_sink: Option<UnboundedSender<TickOutcome>>,
    state: PipelineState,
    stats: PipelineStats,
}

impl<S: LandmarkSource> FocusPipeline<S> {
    pub fn new(source: S, engine: FocusEngine) -> Self {
        Self {
            source,
            engine,
            stop_flag: StopFlag::new(),
            rate: None,
            tick_sink: None,
            state: PipelineState::Idle,
            stats: PipelineStats::default(),
        }
    }

    /// Limit how many results per second reach the engine.
    pub fn with_max_tick_hz(mut self, hz: Option<u32>) -> Self {
        self.rate = hz.map(RateController::new);
        self
    }

    /// Forward every tick outcome, in order, to `sink`. The shared state
    /// only keeps the latest value; consumers that need each tick read
    /// them here. The sink closes when the pipeline is dropped.
    pub fn with_tick_sink(mut self, sink: UnboundedSender<TickOutcome>) -> Self {
        self.tick_sink = Some(sink);
        self
    }

    /// Use an externally owned stop flag.
    pub fn with_stop_flag(mut self, stop_flag: StopFlag) -> Self {
        self.stop_flag = stop_flag;
        self
    }

    pub fn stop_flag(&self) -> StopFlag {
        self.stop_flag.clone()
    }

    pub fn stop(&self) {
        self.stop_flag.stop();
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn engine(&self) -> &FocusEngine {
        &self.engine
    }

    /// Run until the stop flag is set or the source closes.
    ///
    /// Fails only when the source cannot initialize; per-tick errors are
    /// logged and skipped.
    pub async fn run(&mut self) -> FocusResult<PipelineStats> {
        if self.state == PipelineState::Failed {
            return Err(FocusError::engine_init(
                "landmark engine failed to initialize earlier",
            ));
        }

        tracing::info!(source = %self.source.name(), "Initializing landmark source");
        if let Err(e) = self.source.initialize() {
            tracing::error!(
                source = %self.source.name(),
                error = %e,
                "Landmark engine failed to initialize"
            );
            self.state = PipelineState::Failed;
            return Err(match e {
                err @ FocusError::EngineInit { .. } => err,
                other => FocusError::engine_init(other.to_string()),
            });
        }

        self.state = PipelineState::Running;
        self.engine.set_active(true);
        tracing::info!(source = %self.source.name(), "Focus pipeline started");

        let clock = SessionClock::start();
        self.stats.started_at = Some(clock.started_at());
        let result = self.pump(&clock).await;
        self.stats.duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.engine.set_active(false);
        self.state = PipelineState::Stopped;
        tracing::info!(
            ticks = self.stats.ticks,
            absent = self.stats.absent_ticks,
            discarded = self.stats.discarded,
            errors = self.stats.errors,
            "Focus pipeline stopped"
        );

        result.map(|()| self.stats)
    }

    async fn pump(&mut self, clock: &SessionClock) -> FocusResult<()> {
        while !self.stop_flag.is_stopped() {
            if !self.source.frame_ready() {
                tokio::time::sleep(IDLE_BACKOFF).await;
                continue;
            }

            let polled = self.source.poll();

            if self.stop_flag.is_stopped() {
                if matches!(polled, Ok(SourcePoll::Frame(_))) {
                    self.stats.discarded += 1;
                    tracing::debug!("Discarding result that settled after stop");
                }
                break;
            }

            match polled {
                Ok(SourcePoll::Frame(landmarks)) => {
                    if let Some(rate) = self.rate.as_mut() {
                        // Recorded streams are paced by capture time.
                        let now_ns = self
                            .source
                            .last_timestamp_ns()
                            .unwrap_or_else(|| clock.elapsed_ns());
                        if !rate.should_tick(now_ns) {
                            self.stats.skipped += 1;
                            continue;
                        }
                    }
                    let outcome = self.engine.on_frame_result(landmarks.as_deref());
                    self.stats.record(&outcome);
                    if let Some(sink) = &self.tick_sink {
                        if sink.send(outcome).is_err() {
                            tracing::debug!("Tick receiver dropped, no longer forwarding");
                            self.tick_sink = None;
                        }
                    }
                    tokio::task::yield_now().await;
                }
                Ok(SourcePoll::Pending) => {
                    tokio::time::sleep(IDLE_BACKOFF).await;
                }
                Ok(SourcePoll::Closed) => {
                    tracing::info!(source = %self.source.name(), "Landmark source closed");
                    break;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.stats.errors += 1;
                    tracing::debug!(error = %e, "Skipping tick after source error");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::source::ReplaySource;
    use crate::store::focus_store;
    use focusflow_face_model::frame::FrameRecord;
    use focusflow_face_model::synthetic::SyntheticFace;

    fn pipeline(frames: Vec<FrameRecord>) -> FocusPipeline<ReplaySource> {
        let (writer, _handle) = focus_store();
        let engine = FocusEngine::new(EngineConfig::default(), writer);
        FocusPipeline::new(ReplaySource::new(frames), engine)
    }

    #[tokio::test]
    async fn test_replay_runs_to_completion() {
        let face = SyntheticFace::drowsy().refined_landmarks();
        let frames = vec![
            FrameRecord::face(0, face.clone()),
            FrameRecord::no_face(33_000_000),
            FrameRecord::face(66_000_000, face),
        ];
        let mut pipeline = pipeline(frames);
        let handle = pipeline.engine().handle();

        let stats = pipeline.run().await.unwrap();
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.face_ticks, 2);
        assert_eq!(stats.absent_ticks, 1);
        assert_eq!(pipeline.state(), PipelineState::Stopped);

        let snapshot = handle.snapshot();
        assert!(!snapshot.is_active);
        assert!((snapshot.score - (1.0 - 0.01 - 0.002 - 0.01)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_preset_stop_never_ticks() {
        let frames = vec![FrameRecord::no_face(0)];
        let mut pipeline = pipeline(frames);
        pipeline.stop();

        let stats = pipeline.run().await.unwrap();
        assert_eq!(stats.ticks, 0);
        assert_eq!(pipeline.engine().score(), 1.0);
    }

    #[tokio::test]
    async fn test_rate_limit_skips_early_frames() {
        let frames = (0..5).map(|i| FrameRecord::no_face(i * 1_000)).collect();
        let mut pipeline = pipeline(frames).with_max_tick_hz(Some(1));

        let stats = pipeline.run().await.unwrap();
        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.skipped, 4);
        assert!(stats.started_at.is_some());
    }

    #[tokio::test]
    async fn test_rate_limit_uses_recorded_time() {
        let frames = (0..5)
            .map(|i| FrameRecord::no_face(i * 1_000_000_000))
            .collect();
        let mut pipeline = pipeline(frames).with_max_tick_hz(Some(2));

        let stats = pipeline.run().await.unwrap();
        assert_eq!(stats.ticks, 5);
        assert_eq!(stats.skipped, 0);
    }

    #[tokio::test]
    async fn test_rate_limit_paces_dense_recording() {
        // 10 frames at 100ms, limited to 2Hz: 0ms and 500ms pass.
        let frames = (0..10)
            .map(|i| FrameRecord::no_face(i * 100_000_000))
            .collect();
        let mut pipeline = pipeline(frames).with_max_tick_hz(Some(2));

        let stats = pipeline.run().await.unwrap();
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.skipped, 8);
    }

    #[tokio::test]
    async fn test_tick_sink_receives_every_outcome() {
        let frames = (0..50)
            .map(|i| FrameRecord::no_face(i * 33_000_000))
            .collect();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut pipeline = pipeline(frames).with_tick_sink(tx);

        let stats = pipeline.run().await.unwrap();
        drop(pipeline);

        let mut scores = Vec::new();
        while let Some(outcome) = rx.recv().await {
            assert!(!outcome.face_present());
            scores.push(outcome.score);
        }
        assert_eq!(scores.len() as u64, stats.ticks);
        assert_eq!(scores.len(), 50);
        assert!(scores.windows(2).all(|pair| pair[1] < pair[0]));
    }

    #[test]
    fn test_stop_flag_is_shared() {
        let flag = StopFlag::new();
        let other = flag.clone();
        assert!(!other.is_stopped());
        flag.stop();
        assert!(other.is_stopped());
    }
}
