//! Recorded landmark streams.
//!
//! Streams are stored as JSONL, one frame result per line. A frame either
//! carries the full keypoint list or `null` when the engine found no face.
//! Lines starting with `#` are comments; the first one may hold a
//! [`FrameStreamHeader`].

use serde::{Deserialize, Serialize};

use crate::keypoint::Keypoint;

/// Monotonic timestamp in nanoseconds since stream start.
pub type TimestampNs = u64;

/// One landmark engine result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// `None` means the engine reported no face for this frame.
    pub landmarks: Option<Vec<Keypoint>>,
}

/// Metadata describing a recorded stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Keypoints per face the engine produced.
    pub landmark_count: usize,

    /// Nominal frame rate of the recording (Hz).
    pub frame_rate_hz: u32,

    /// Engine or tool that produced the stream.
    #[serde(default)]
    pub source: Option<String>,
}

impl FrameRecord {
    pub fn face(timestamp_ns: TimestampNs, landmarks: Vec<Keypoint>) -> Self {
        Self {
            timestamp_ns,
            landmarks: Some(landmarks),
        }
    }

    pub fn no_face(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            landmarks: None,
        }
    }

    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}

/// Parse frame records from JSONL content, skipping blanks and `#` lines.
pub fn parse_frames(jsonl: &str) -> Result<Vec<FrameRecord>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Read the header from the first comment line, if there is one.
pub fn parse_header(jsonl: &str) -> Option<FrameStreamHeader> {
    let first = jsonl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let body = first.strip_prefix('#')?;
    serde_json::from_str(body.trim()).ok()
}

/// Serialize a stream to JSONL with its header as the first comment line.
pub fn serialize_frames(
    header: &FrameStreamHeader,
    frames: &[FrameRecord],
) -> Result<String, serde_json::Error> {
    let mut output = format!("# {}\n", serde_json::to_string(header)?);
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
