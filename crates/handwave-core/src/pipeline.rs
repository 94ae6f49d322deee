//! Per-frame pipeline: smoothing, recognition, projection, dispatch
//!
//! One pipeline owns one input stream. Frames must be fed in order, one at a
//! time; nothing here blocks or suspends.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::action::{ActionLayer, Intent};
use crate::config::HandwaveConfig;
use crate::cursor::{CursorProjector, ScreenPoint, Viewport};
use crate::dispatch::GestureDispatcher;
use crate::error::{HandwaveError, Result};
use crate::hit_test::HitTest;
use crate::landmark::{HandLandmarks, Handedness, Landmark};
use crate::recognizer::{Gesture, GestureRecognizer, GestureResult};
use crate::smoothing::LandmarkSmoother;

/// One frame from the upstream hand-pose model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandFrame {
    /// Monotonic frame time in milliseconds
    pub timestamp_ms: f64,
    /// Empty when no hand was detected
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl HandFrame {
    pub fn empty(timestamp_ms: f64) -> Self {
        Self {
            timestamp_ms,
            ..Self::default()
        }
    }

    pub fn with_hand(timestamp_ms: f64, hand: &HandLandmarks) -> Self {
        Self {
            timestamp_ms,
            landmarks: hand.points().to_vec(),
            ..Self::default()
        }
    }

    pub fn handedness(mut self, handedness: Option<Handedness>) -> Self {
        self.handedness = handedness;
        self
    }
}

/// Read newline-delimited JSON frames; blank lines are skipped
pub fn read_frames<R: BufRead>(reader: R) -> Result<Vec<HandFrame>> {
    let mut frames = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| HandwaveError::Io {
            path: "<frames>".into(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let frame = serde_json::from_str(trimmed)
            .map_err(|source| HandwaveError::Frame { line: i + 1, source })?;
        frames.push(frame);
    }
    Ok(frames)
}

/// What one frame produced
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FrameOutcome {
    /// `None` when no hand was present
    pub result: Option<GestureResult>,
    /// Screen-space cursor; `None` clears the on-screen cursor
    pub cursor: Option<ScreenPoint>,
    pub intent: Option<Intent>,
}

impl FrameOutcome {
    pub fn gesture(&self) -> Option<Gesture> {
        self.result.and_then(|r| r.gesture)
    }
}

/// Smoother, recognizer, projector and dispatcher for one session
#[derive(Debug)]
pub struct GesturePipeline {
    config: HandwaveConfig,
    smoother: LandmarkSmoother,
    recognizer: GestureRecognizer,
    projector: CursorProjector,
    dispatcher: GestureDispatcher,
    actions: ActionLayer,
    viewport: Viewport,
}

impl GesturePipeline {
    pub fn new(config: HandwaveConfig, viewport: Viewport) -> Self {
        Self {
            smoother: LandmarkSmoother::new(config.smoothing.alpha),
            recognizer: GestureRecognizer::new(config.recognizer.clone()),
            projector: CursorProjector::new(config.cursor.clone()),
            dispatcher: GestureDispatcher::new(config.dispatch.clone()),
            actions: ActionLayer::new(),
            viewport,
            config,
        }
    }

    pub fn config(&self) -> &HandwaveConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn actions(&self) -> &ActionLayer {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionLayer {
        &mut self.actions
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Run one frame through the whole pipeline
    pub fn process_frame(
        &mut self,
        frame: &HandFrame,
        hit_test: Option<&dyn HitTest>,
    ) -> FrameOutcome {
        let hand = match HandLandmarks::from_slice(&frame.landmarks) {
            Ok(hand) => hand,
            Err(e) => {
                tracing::warn!("Frame at {:.1}ms treated as empty: {}", frame.timestamp_ms, e);
                None
            }
        };

        let smoothed = hand.map(|h| self.smoother.smooth_hand(&h));
        let Some(result) = self.recognizer.process(smoothed.as_ref(), frame.timestamp_ms) else {
            return FrameOutcome::default();
        };

        let cursor = self
            .projector
            .project(result.cursor, frame.handedness, self.viewport);
        if let Some(tester) = hit_test {
            self.dispatcher.sync_focus(cursor, tester, &mut self.actions);
        }

        let intent = result
            .gesture
            .map(|g| self.dispatcher.dispatch(g, Some(cursor), hit_test, &mut self.actions));
        if let Some(intent) = &intent {
            tracing::trace!("{:.1}ms -> {:?}", frame.timestamp_ms, intent);
        }

        FrameOutcome {
            result: Some(result),
            cursor: Some(cursor),
            intent,
        }
    }

    /// Feed a gesture from an alternate producer such as the keyboard
    pub fn inject(&mut self, gesture: Gesture) -> Intent {
        tracing::debug!("Injected {}", gesture);
        self.dispatcher.dispatch(gesture, None, None, &mut self.actions)
    }

    /// Start a fresh session: asleep, unsmoothed, interaction off.
    /// Trigger counters keep counting.
    pub fn reset(&mut self) {
        self.smoother = LandmarkSmoother::new(self.config.smoothing.alpha);
        self.recognizer.reset();
        self.actions.deactivate();
    }
}
