//! Keypoints and validated landmark sets.

use serde::{Deserialize, Serialize};

use crate::mesh;

/// A single normalized facial landmark.
///
/// `z` is optional on the wire and defaults to `0.0`, so 2D-only engines
/// and 3D engines share the same geometry code.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A keypoint from an engine that reports no depth.
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// 3D Euclidean distance to another keypoint.
    pub fn distance(&self, other: &Keypoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A frame's landmark set whose length has been checked.
///
/// Either a face is present and the set has exactly the expected number of
/// keypoints, or there is no set at all. Construction is the only place
/// that check happens, so indexing by a mesh constant cannot go out of
/// bounds afterwards.
#[derive(Debug, Clone, Copy)]
pub struct LandmarkSet<'a> {
    points: &'a [Keypoint],
}

impl<'a> LandmarkSet<'a> {
    /// Validate a raw keypoint slice. Returns `None` (treated as "no face")
    /// if the length differs from `expected_len` or cannot hold every
    /// index the metrics read.
    pub fn new(points: &'a [Keypoint], expected_len: usize) -> Option<Self> {
        if points.len() != expected_len || points.len() <= mesh::MAX_REQUIRED_INDEX {
            return None;
        }
        Some(Self { points })
    }

    /// Keypoint at a mesh index.
    pub fn point(&self, index: usize) -> Keypoint {
        self.points[index]
    }

    /// The eight ordered points of one eye.
    pub fn eye(&self, indices: &mesh::EyeIndices) -> [Keypoint; 8] {
        indices.map(|i| self.points[i])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &'a [Keypoint] {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_three_dimensional() {
        let a = Keypoint::new(0.0, 0.0, 0.0);
        let b = Keypoint::new(1.0, 2.0, 2.0);
        assert!((a.distance(&b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_z_defaults_to_zero() {
        let kp: Keypoint = serde_json::from_str(r#"{"x":0.25,"y":0.75}"#).unwrap();
        assert_eq!(kp, Keypoint::planar(0.25, 0.75));
    }

    #[test]
    fn test_landmark_set_requires_exact_length() {
        let points = vec![Keypoint::default(); mesh::REFINED_FACE_MESH_POINTS];
        assert!(LandmarkSet::new(&points, mesh::REFINED_FACE_MESH_POINTS).is_some());
        assert!(LandmarkSet::new(&points, mesh::FACE_MESH_POINTS).is_none());
        assert!(LandmarkSet::new(&points[..100], 100).is_none());
        assert!(LandmarkSet::new(&[], 0).is_none());
    }

    #[test]
    fn test_eye_extraction_preserves_order() {
        let points: Vec<Keypoint> = (0..mesh::FACE_MESH_POINTS)
            .map(|i| Keypoint::planar(i as f64, 0.0))
            .collect();
        let set = LandmarkSet::new(&points, mesh::FACE_MESH_POINTS).unwrap();
        let eye = set.eye(&mesh::LEFT_EYE);
        let xs: Vec<usize> = eye.iter().map(|k| k.x as usize).collect();
        assert_eq!(xs, mesh::LEFT_EYE.to_vec());
    }
}
