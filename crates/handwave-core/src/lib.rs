//! handwave-core: webcam hand-gesture recognition and interaction dispatch
//!
//! The crate turns a noisy stream of 21-point hand landmarks into a debounced
//! vocabulary of discrete gestures and then into application intents:
//! - Exponential landmark smoothing
//! - Per-frame gesture state machine (wake, confirm, scroll, summon, dismiss)
//! - Fingertip to screen-space cursor projection
//! - Edge-triggered action layer with focus tracking and hit-testing
//! - Keyboard fallback producing the same gesture vocabulary
//!
//! Data flow per frame:
//!
//! ```text
//! landmarks -> LandmarkSmoother -> GestureRecognizer -> CursorProjector
//!                                          |                  |
//!                                          v                  v
//!                                   GestureDispatcher <--- HitTest
//!                                          |
//!                                          v
//!                                     ActionLayer
//! ```

pub mod action;
pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod keyboard;
pub mod landmark;
pub mod pipeline;
pub mod pose;
pub mod recognizer;
pub mod smoothing;
pub mod synthetic;

// Re-export commonly used types
pub use action::{ActionLayer, FocusTarget, Intent, ScrollSignal, Trigger, TriggerWatch};
pub use config::{HandwaveConfig, Profile, RecognizerConfig, ScrollMapping};
pub use cursor::{CursorProjector, ScreenPoint, Viewport};
pub use dispatch::GestureDispatcher;
pub use error::{HandwaveError, Result};
pub use hit_test::{FocusTree, HitTest, HitTestPolicy, Rect};
pub use landmark::{HandLandmarks, Handedness, Landmark, LANDMARK_COUNT};
pub use pipeline::{FrameOutcome, GesturePipeline, HandFrame};
pub use pose::HandPose;
pub use recognizer::{AwakeState, Gesture, GestureRecognizer, GestureResult};
pub use smoothing::LandmarkSmoother;
