//! FocusFlow Face Model
//!
//! Defines the data contracts shared by the focus pipeline:
//! - **Keypoints:** Normalized facial landmark positions and validated landmark sets
//! - **Mesh:** Semantically fixed face-mesh indices (eyes, nose, ears, mouth)
//! - **State:** Focus and emotion classifications plus calibration data
//! - **Frames:** The JSONL format used to record and replay landmark streams
//! - **Synthetic:** A face generator producing landmark sets with chosen metrics
//!
//! All coordinates are normalized to the camera frame, `(0, 0)` top-left,
//! so a smaller `y` is higher on screen.

pub mod frame;
pub mod keypoint;
pub mod mesh;
pub mod state;
pub mod synthetic;

pub use frame::*;
pub use keypoint::*;
pub use state::*;
pub use synthetic::SyntheticFace;
