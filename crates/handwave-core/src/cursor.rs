//! Fingertip to screen-space projection

use serde::{Deserialize, Serialize};

use crate::config::CursorConfig;
use crate::landmark::Handedness;
use crate::recognizer::NormalizedCursor;

/// Host viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// A point in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Maps a normalized fingertip into screen pixels.
///
/// Output is not clipped; consumers clamp at the viewport edges.
#[derive(Debug, Clone, Default)]
pub struct CursorProjector {
    config: CursorConfig,
}

impl CursorProjector {
    pub fn new(config: CursorConfig) -> Self {
        Self { config }
    }

    /// Lateral correction for the reported hand
    pub fn hand_offset(&self, handedness: Option<Handedness>) -> f32 {
        match handedness {
            Some(Handedness::Right) => self.config.hand_offset,
            Some(Handedness::Left) => -self.config.hand_offset,
            None => 0.0,
        }
    }

    /// Project into normalized screen space (0..1 nominal range)
    pub fn project_normalized(
        &self,
        cursor: NormalizedCursor,
        handedness: Option<Handedness>,
    ) -> (f32, f32) {
        let x = if self.config.mirror { 1.0 - cursor.x } else { cursor.x };
        let cx = x + self.hand_offset(handedness) - 0.5;
        let cy = cursor.y - self.config.vertical_bias;
        (
            cx * self.config.gain + 0.5,
            cy * self.config.gain + 0.5,
        )
    }

    pub fn project(
        &self,
        cursor: NormalizedCursor,
        handedness: Option<Handedness>,
        viewport: Viewport,
    ) -> ScreenPoint {
        let (nx, ny) = self.project_normalized(cursor, handedness);
        ScreenPoint::new(nx * viewport.width, ny * viewport.height)
    }
}
