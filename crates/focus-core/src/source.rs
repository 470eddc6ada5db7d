//! Landmark sources.
//!
//! A source stands in for the external landmark engine: it yields, at most
//! once per video frame, either a keypoint list or an explicit "no face".
//! Sources are consumed by exactly one pipeline, one result at a time.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

use focusflow_common::error::{FocusError, FocusResult};
use focusflow_face_model::frame::{parse_frames, parse_header, FrameRecord, FrameStreamHeader};
use focusflow_face_model::keypoint::Keypoint;

/// Outcome of asking a source for its next result.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePoll {
    /// A settled inference result; `None` means no face was detected.
    Frame(Option<Vec<Keypoint>>),
    /// Nothing available yet.
    Pending,
    /// The source will never produce another result.
    Closed,
}

/// Trait for landmark sources.
pub trait LandmarkSource: Send {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Bring the underlying engine up. An error here is fatal for the
    /// session.
    fn initialize(&mut self) -> FocusResult<()> {
        Ok(())
    }

    /// Whether a video frame is available to submit right now.
    fn frame_ready(&self) -> bool {
        true
    }

    /// Submit the current frame and return the settled result.
    ///
    /// Errors are per-tick failures (e.g. a frame that is not decodable
    /// yet); the pipeline skips them.
    fn poll(&mut self) -> FocusResult<SourcePoll>;

    /// Capture time of the result last returned by [`poll`](Self::poll),
    /// when the source carries one. Live sources return `None` and are
    /// timed by the wall clock.
    fn last_timestamp_ns(&self) -> Option<u64> {
        None
    }
}

/// A source fed through a single-consumer channel.
///
/// The sending side is typically a capture thread running the landmark
/// engine. Dropping every sender closes the source.
pub struct ChannelSource {
    rx: Receiver<Option<Vec<Keypoint>>>,
    ready: Option<Arc<AtomicBool>>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<Option<Vec<Keypoint>>>) -> Self {
        Self { rx, ready: None }
    }

    /// Gate submissions on an external "video frame available" flag.
    pub fn with_readiness(mut self, ready: Arc<AtomicBool>) -> Self {
        self.ready = Some(ready);
        self
    }
}

impl LandmarkSource for ChannelSource {
    fn name(&self) -> &str {
        "channel"
    }

    fn frame_ready(&self) -> bool {
        self.ready
            .as_ref()
            .map(|flag| flag.load(Ordering::Acquire))
            .unwrap_or(true)
    }

    fn poll(&mut self) -> FocusResult<SourcePoll> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(SourcePoll::Frame(frame)),
            Err(TryRecvError::Empty) => Ok(SourcePoll::Pending),
            Err(TryRecvError::Disconnected) => Ok(SourcePoll::Closed),
        }
    }
}

/// Replays a recorded JSONL landmark stream.
pub struct ReplaySource {
    header: Option<FrameStreamHeader>,
    frames: VecDeque<FrameRecord>,
    last_timestamp_ns: Option<u64>,
}

impl ReplaySource {
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self {
            header: None,
            frames: frames.into(),
            last_timestamp_ns: None,
        }
    }

    /// Parse a stream from JSONL content.
    pub fn from_jsonl(content: &str) -> FocusResult<Self> {
        let frames = parse_frames(content)
            .map_err(|e| FocusError::replay(format!("Failed to parse frames: {e}")))?;
        Ok(Self {
            header: parse_header(content),
            frames: frames.into(),
            last_timestamp_ns: None,
        })
    }

    /// Load a stream from a file.
    pub fn from_path(path: &Path) -> FocusResult<Self> {
        if !path.exists() {
            return Err(FocusError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_jsonl(&content)
    }

    pub fn header(&self) -> Option<&FrameStreamHeader> {
        self.header.as_ref()
    }

    /// Frames not yet replayed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Recorded time between the first and last remaining frame.
    pub fn span_secs(&self) -> f64 {
        match (self.frames.front(), self.frames.back()) {
            (Some(first), Some(last)) => (last.timestamp_secs() - first.timestamp_secs()).max(0.0),
            _ => 0.0,
        }
    }
}

impl LandmarkSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn poll(&mut self) -> FocusResult<SourcePoll> {
        Ok(match self.frames.pop_front() {
            Some(record) => {
                self.last_timestamp_ns = Some(record.timestamp_ns);
                SourcePoll::Frame(record.landmarks)
            }
            None => SourcePoll::Closed,
        })
    }

    fn last_timestamp_ns(&self) -> Option<u64> {
        self.last_timestamp_ns
    }
}
