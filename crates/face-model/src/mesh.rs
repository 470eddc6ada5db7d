//! Face-mesh landmark indices.
//!
//! Indices follow the MediaPipe face mesh topology. With refined landmarks
//! (iris points) the mesh has 478 keypoints, without it 468.

/// Keypoints in a plain face mesh.
pub const FACE_MESH_POINTS: usize = 468;

/// Keypoints in a face mesh with refined iris landmarks.
pub const REFINED_FACE_MESH_POINTS: usize = 478;

/// Eight ordered eye points:
/// `[corner A, corner B, top A, top B, top C, bottom A, bottom B, bottom C]`.
///
/// The corners span the eye horizontally; top and bottom points are
/// paired by letter (top A sits above bottom A).
pub type EyeIndices = [usize; 8];

pub const LEFT_EYE: EyeIndices = [33, 133, 160, 159, 158, 144, 145, 153];
pub const RIGHT_EYE: EyeIndices = [362, 263, 387, 386, 385, 373, 374, 380];

pub const NOSE_TIP: usize = 1;
pub const CHIN: usize = 152;
pub const LEFT_EAR: usize = 234;
pub const RIGHT_EAR: usize = 454;

pub const MOUTH_LEFT: usize = 61;
pub const MOUTH_RIGHT: usize = 291;
pub const UPPER_LIP: usize = 13;
pub const LOWER_LIP: usize = 14;

pub const LEFT_EYE_OUTER: usize = 33;
pub const RIGHT_EYE_OUTER: usize = 263;

/// Highest index any metric reads. A landmark set shorter than this + 1
/// can never be measured.
pub const MAX_REQUIRED_INDEX: usize = RIGHT_EAR;

// Positions inside an `EyeIndices` array.
pub const EYE_CORNER_A: usize = 0;
pub const EYE_CORNER_B: usize = 1;
pub const EYE_TOP_A: usize = 2;
pub const EYE_TOP_B: usize = 3;
pub const EYE_BOTTOM_A: usize = 5;
pub const EYE_BOTTOM_B: usize = 6;
