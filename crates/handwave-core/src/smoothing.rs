//! Exponential landmark smoothing
//!
//! A first-order feedback filter applied independently to every axis of
//! every keypoint. Lower `alpha` is smoother but lags more.

use crate::landmark::{HandLandmarks, Landmark};

/// Default smoothing factor: favors steadiness over latency.
pub const DEFAULT_ALPHA: f32 = 0.2;

/// Per-point exponential smoother for a landmark stream
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    alpha: f32,
    /// Previous smoothed output; `None` until the first frame
    prev: Option<Vec<Landmark>>,
}

impl LandmarkSmoother {
    /// Create a smoother with the given factor.
    ///
    /// `alpha` is clamped into `(0, 1]`; 1.0 passes input straight through.
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(f32::EPSILON, 1.0),
            prev: None,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Smooth one frame of landmarks.
    ///
    /// The first frame, or a frame whose point count differs from the stored
    /// state, is stored and returned unchanged. An empty frame returns empty
    /// and leaves the state alone.
    pub fn smooth(&mut self, landmarks: &[Landmark]) -> Vec<Landmark> {
        if landmarks.is_empty() {
            return Vec::new();
        }

        let next = match &self.prev {
            Some(prev) if prev.len() == landmarks.len() => prev
                .iter()
                .zip(landmarks)
                .map(|(p, cur)| p.approach(cur, self.alpha))
                .collect(),
            _ => landmarks.to_vec(),
        };

        self.prev = Some(next.clone());
        next
    }

    /// Smooth a complete hand.
    pub fn smooth_hand(&mut self, hand: &HandLandmarks) -> HandLandmarks {
        let smoothed = self.smooth(hand.points());
        match HandLandmarks::from_slice(&smoothed) {
            Ok(Some(h)) => h,
            // Same length in, same length out
            _ => *hand,
        }
    }
}

impl Default for LandmarkSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::LANDMARK_COUNT;

    fn frame(x: f32, y: f32) -> Vec<Landmark> {
        vec![Landmark::new(x, y, 0.0); LANDMARK_COUNT]
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut s = LandmarkSmoother::default();
        let input = frame(0.3, 0.7);
        assert_eq!(s.smooth(&input), input);
    }

    #[test]
    fn test_second_frame_is_blended() {
        let mut s = LandmarkSmoother::new(0.2);
        s.smooth(&frame(0.0, 0.0));
        let out = s.smooth(&frame(1.0, 0.5));
        assert!((out[0].x - 0.2).abs() < 1e-6);
        assert!((out[20].y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_feedback_uses_smoothed_state() {
        let mut s = LandmarkSmoother::new(0.5);
        s.smooth(&frame(0.0, 0.0));
        s.smooth(&frame(1.0, 0.0));
        let out = s.smooth(&frame(1.0, 0.0));
        // 0 -> 0.5 -> 0.75
        assert!((out[0].x - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_converges_to_constant_input() {
        let mut s = LandmarkSmoother::default();
        s.smooth(&frame(0.0, 0.0));
        let target = frame(0.6, 0.4);
        let mut out = Vec::new();
        for _ in 0..200 {
            out = s.smooth(&target);
        }
        for (a, b) in out.iter().zip(&target) {
            assert!((a.x - b.x).abs() < 1e-4);
            assert!((a.y - b.y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_point_count_change_rebootstraps() {
        let mut s = LandmarkSmoother::default();
        s.smooth(&frame(0.0, 0.0));
        let short = vec![Landmark::new(0.9, 0.9, 0.0); 3];
        assert_eq!(s.smooth(&short), short);
    }

    #[test]
    fn test_empty_input() {
        let mut s = LandmarkSmoother::default();
        assert!(s.smooth(&[]).is_empty());
        let input = frame(0.1, 0.1);
        // Still bootstraps afterwards
        assert_eq!(s.smooth(&input), input);
    }
}
