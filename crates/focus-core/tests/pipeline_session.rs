use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use focusflow_common::error::{FocusError, FocusResult};
use focusflow_face_model::frame::{serialize_frames, FrameRecord, FrameStreamHeader};
use focusflow_face_model::keypoint::Keypoint;
use focusflow_face_model::state::{EmotionState, FocusState};
use focusflow_face_model::synthetic::SyntheticFace;
use focusflow_focus_core::engine::{EngineConfig, FocusEngine};
use focusflow_focus_core::pipeline::{FocusPipeline, PipelineState, StopFlag};
use focusflow_focus_core::source::{ChannelSource, LandmarkSource, ReplaySource, SourcePoll};
use focusflow_focus_core::store::{focus_store, FocusHandle};

fn engine() -> (FocusEngine, FocusHandle) {
    let (writer, handle) = focus_store();
    (FocusEngine::new(EngineConfig::default(), writer), handle)
}

/// Simulates a detector whose result settles after the host was torn down.
struct LateSource {
    stop_flag: StopFlag,
    face: Vec<Keypoint>,
}

impl LandmarkSource for LateSource {
    fn name(&self) -> &str {
        "late"
    }

    fn poll(&mut self) -> FocusResult<SourcePoll> {
        self.stop_flag.stop();
        Ok(SourcePoll::Frame(Some(self.face.clone())))
    }
}

struct BrokenSource {
    polls: Arc<AtomicUsize>,
}

impl LandmarkSource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    fn initialize(&mut self) -> FocusResult<()> {
        Err(FocusError::source("model weights unavailable"))
    }

    fn poll(&mut self) -> FocusResult<SourcePoll> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Ok(SourcePoll::Frame(None))
    }
}

/// Fails every other submission, as a detector does before the first
/// frame is decodable.
struct FlakySource {
    remaining: usize,
    fail_next: bool,
}

impl LandmarkSource for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    fn poll(&mut self) -> FocusResult<SourcePoll> {
        if self.remaining == 0 {
            return Ok(SourcePoll::Closed);
        }
        self.fail_next = !self.fail_next;
        if !self.fail_next {
            return Err(FocusError::source("frame not decodable yet"));
        }
        self.remaining -= 1;
        Ok(SourcePoll::Frame(None))
    }
}

#[tokio::test]
async fn result_settling_after_stop_is_discarded() {
    let (engine, handle) = engine();
    let stop_flag = StopFlag::new();
    let source = LateSource {
        stop_flag: stop_flag.clone(),
        face: SyntheticFace::drowsy().refined_landmarks(),
    };

    let mut pipeline = FocusPipeline::new(source, engine).with_stop_flag(stop_flag);
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.ticks, 0);
    assert_eq!(stats.discarded, 1);
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.score, 1.0);
    assert_eq!(snapshot.tick, 0);
    assert!(!snapshot.is_active);
}

#[tokio::test]
async fn init_failure_leaves_pipeline_inert() {
    let (engine, handle) = engine();
    let polls = Arc::new(AtomicUsize::new(0));
    let mut pipeline = FocusPipeline::new(
        BrokenSource {
            polls: polls.clone(),
        },
        engine,
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, FocusError::EngineInit { .. }));
    assert!(err.is_fatal());
    assert_eq!(pipeline.state(), PipelineState::Failed);

    // A second attempt does not touch the source again.
    assert!(pipeline.run().await.is_err());
    assert_eq!(polls.load(Ordering::SeqCst), 0);

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.score, 1.0);
    assert!(!snapshot.is_active);
}

#[tokio::test]
async fn per_tick_errors_are_skipped() {
    let (engine, handle) = engine();
    let mut pipeline = FocusPipeline::new(
        FlakySource {
            remaining: 5,
            fail_next: false,
        },
        engine,
    );

    let stats = pipeline.run().await.unwrap();
    assert_eq!(stats.ticks, 5);
    assert_eq!(stats.errors, 4);
    assert!((handle.snapshot().score - (1.0 - 5.0 * 0.002)).abs() < 1e-9);
}

#[tokio::test]
async fn channel_source_feeds_subscribers() {
    let (engine, handle) = engine();
    let mut updates = handle.subscribe();
    let (tx, rx) = mpsc::channel();

    let producer = std::thread::spawn(move || {
        let happy = SyntheticFace::attentive().with_smile(0.05).refined_landmarks();
        let away = SyntheticFace::looking_away().refined_landmarks();
        tx.send(Some(happy)).unwrap();
        tx.send(None).unwrap();
        tx.send(Some(away)).unwrap();
    });
    producer.join().unwrap();

    let mut pipeline = FocusPipeline::new(ChannelSource::new(rx), engine);
    let stats = pipeline.run().await.unwrap();
    assert_eq!(stats.ticks, 3);
    assert_eq!(stats.face_ticks, 2);

    assert!(updates.has_changed().unwrap());
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.focus_state, FocusState::Distracted);
    assert_eq!(snapshot.emotion, EmotionState::Neutral);
    assert_eq!(snapshot.tick, 3);
    assert!((snapshot.score - (1.0 - 0.002 - 0.004)).abs() < 1e-9);
}

#[tokio::test]
async fn stop_ends_a_live_session() {
    let (engine, handle) = engine();
    let (tx, rx) = mpsc::channel::<Option<Vec<Keypoint>>>();
    let mut pipeline = FocusPipeline::new(ChannelSource::new(rx), engine);
    let stop_flag = pipeline.stop_flag();

    let task = tokio::spawn(async move { pipeline.run().await });

    tx.send(None).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.snapshot().is_active);

    stop_flag.stop();
    let stats = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("pipeline should stop promptly")
        .unwrap()
        .unwrap();

    assert_eq!(stats.ticks, 1);
    assert!(!handle.snapshot().is_active);
    drop(tx);
}

#[tokio::test]
async fn replay_file_round_trips_through_pipeline() {
    let header = FrameStreamHeader {
        schema_version: "1.0".to_string(),
        landmark_count: 478,
        frame_rate_hz: 30,
        source: Some("synthetic".to_string()),
    };
    let drowsy = SyntheticFace::drowsy().refined_landmarks();
    let frames: Vec<FrameRecord> = (0..4)
        .map(|i| FrameRecord::face(i * 33_333_333, drowsy.clone()))
        .collect();
    let jsonl = serialize_frames(&header, &frames).unwrap();

    let path = std::env::temp_dir().join(format!(
        "focusflow-replay-{}.jsonl",
        std::process::id()
    ));
    std::fs::write(&path, jsonl).unwrap();

    let source = ReplaySource::from_path(&path).unwrap();
    assert_eq!(source.header(), Some(&header));

    let (engine, handle) = engine();
    let mut pipeline = FocusPipeline::new(source, engine);
    pipeline.run().await.unwrap();
    std::fs::remove_file(&path).ok();

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.focus_state, FocusState::Drowsy);
    assert!((snapshot.score - 0.96).abs() < 1e-9);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["focus_state"], "DROWSY");
}
