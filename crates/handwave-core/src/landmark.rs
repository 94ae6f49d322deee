//! Hand landmark representation
//!
//! The upstream hand-pose model reports exactly 21 keypoints per detected hand,
//! in normalized image space and in a fixed order. A partial set is never a
//! valid hand.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::HandwaveError;

/// Number of keypoints in one detected hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// Fingertips of index, middle, ring and pinky.
pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Second-joint (PIP) points matching [`FINGER_TIPS`].
pub const FINGER_PIPS: [usize; 4] = [INDEX_PIP, MIDDLE_PIP, RING_PIP, PINKY_PIP];

/// A single keypoint in normalized image space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    /// Create a new landmark
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance in the image plane, ignoring depth.
    ///
    /// The model's `z` is relative and noisy; every geometric test in the
    /// recognizer works on `(x, y)` only.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Move toward `target` by `alpha` of the remaining gap on every axis
    pub fn approach(&self, target: &Landmark, alpha: f32) -> Self {
        Self {
            x: self.x + alpha * (target.x - self.x),
            y: self.y + alpha * (target.y - self.y),
            z: self.z + alpha * (target.z - self.z),
        }
    }
}

/// One complete detected hand: always 21 points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks([Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.0
    }

    pub fn wrist(&self) -> Landmark {
        self.0[WRIST]
    }

    pub fn index_tip(&self) -> Landmark {
        self.0[INDEX_TIP]
    }

    pub fn thumb_tip(&self) -> Landmark {
        self.0[THUMB_TIP]
    }

    /// Apparent hand size: wrist to middle-finger base knuckle.
    ///
    /// Grows as the hand approaches the camera.
    pub fn scale(&self) -> f32 {
        self.0[WRIST].planar_distance(&self.0[MIDDLE_MCP])
    }

    /// Thumb tip to index tip distance.
    pub fn pinch_distance(&self) -> f32 {
        self.thumb_tip().planar_distance(&self.index_tip())
    }

    /// Accept a landmark slice only if it is a whole hand.
    ///
    /// An empty slice means "no hand" and yields `Ok(None)`.
    pub fn from_slice(points: &[Landmark]) -> Result<Option<Self>, HandwaveError> {
        if points.is_empty() {
            return Ok(None);
        }
        let array: [Landmark; LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|_| HandwaveError::MalformedLandmarks {
                    expected: LANDMARK_COUNT,
                    found: points.len(),
                })?;
        Ok(Some(Self(array)))
    }
}

impl Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<[Landmark; LANDMARK_COUNT]> for HandLandmarks {
    fn from(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self(points)
    }
}

/// Handedness label reported by the upstream model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse the model's category name; anything unrecognized is unknown.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Left" | "left" => Some(Handedness::Left),
            "Right" | "right" => Some(Handedness::Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 9.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_approach() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(1.0, -1.0, 0.5);
        let c = a.approach(&b, 0.2);
        assert!((c.x - 0.2).abs() < 1e-6);
        assert!((c.y + 0.2).abs() < 1e-6);
        assert!((c.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_from_slice() {
        assert!(HandLandmarks::from_slice(&[]).unwrap().is_none());

        let full = vec![Landmark::default(); LANDMARK_COUNT];
        assert!(HandLandmarks::from_slice(&full).unwrap().is_some());

        let partial = vec![Landmark::default(); 5];
        match HandLandmarks::from_slice(&partial) {
            Err(HandwaveError::MalformedLandmarks { expected, found }) => {
                assert_eq!(expected, 21);
                assert_eq!(found, 5);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_scale_and_pinch() {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[WRIST] = Landmark::new(0.5, 0.8, 0.0);
        points[MIDDLE_MCP] = Landmark::new(0.5, 0.6, 0.0);
        points[THUMB_TIP] = Landmark::new(0.4, 0.5, 0.0);
        points[INDEX_TIP] = Landmark::new(0.43, 0.54, 0.0);
        let hand = HandLandmarks::new(points);
        assert!((hand.scale() - 0.2).abs() < 1e-6);
        assert!((hand.pinch_distance() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_handedness_label() {
        assert_eq!(Handedness::from_label("Right"), Some(Handedness::Right));
        assert_eq!(Handedness::from_label("left"), Some(Handedness::Left));
        assert_eq!(Handedness::from_label("Unknown"), None);
    }
}
