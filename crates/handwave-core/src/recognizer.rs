//! Per-frame gesture state machine
//!
//! Turns a stream of hand landmarks into a small vocabulary of discrete
//! gestures. Each frame is evaluated in a fixed priority order and the first
//! gesture found wins:
//!
//! 1. no hand: clear transient state, return `None`
//! 2. asleep: only WAKE (steady open palm held for `wake_hold_ms`)
//! 3. CONFIRM: pinch held for `pinch_hold_ms`, latched until released
//! 4. SCROLL_LEFT / SCROLL_RIGHT: open hand with the fingertip in an edge band
//! 5. SUMMON / DISMISS: hand scale swing, gated by a cooldown
//!
//! Timestamps are caller-supplied milliseconds and must not go backwards
//! within a session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RecognizerConfig;
use crate::history::{HistoryBuffer, HistorySample};
use crate::landmark::{HandLandmarks, Landmark};
use crate::pose::{classify_pose, HandPose};

/// Discrete gestures the recognizer can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    Wake,
    Confirm,
    ScrollLeft,
    ScrollRight,
    Summon,
    Dismiss,
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Wake => "WAKE",
            Gesture::Confirm => "CONFIRM",
            Gesture::ScrollLeft => "SCROLL_LEFT",
            Gesture::ScrollRight => "SCROLL_RIGHT",
            Gesture::Summon => "SUMMON",
            Gesture::Dismiss => "DISMISS",
        }
    }

    /// Scroll gestures repeat every frame; the rest are one-shot events.
    pub fn is_scroll(&self) -> bool {
        matches!(self, Gesture::ScrollLeft | Gesture::ScrollRight)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recognition mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AwakeState {
    #[default]
    Asleep,
    Awake,
}

/// Normalized cursor position (index fingertip, unmirrored)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedCursor {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureDebug {
    pub pose: HandPose,
    /// Scale change over the trailing scale window
    pub z_delta: f32,
}

/// Output of one frame with a hand present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureResult {
    pub gesture: Option<Gesture>,
    pub cursor: NormalizedCursor,
    pub state: AwakeState,
    /// Progress of an unfinished pinch hold, in [0, 1)
    pub pinch_progress: f32,
    pub debug: GestureDebug,
}

/// Mutable state carried between frames
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognizerState {
    pub is_awake: bool,
    /// Time of the last CONFIRM/SUMMON/DISMISS
    pub last_gesture_time: Option<f64>,
    pub last_hand_pose: HandPose,
    pub is_pinching: bool,
    /// When the current pose began
    pub pose_start_time: Option<f64>,
    /// When the current steady open palm began, while asleep
    pub presence_start_time: Option<f64>,
    /// When the current unlatched pinch began
    pub pinch_start_time: Option<f64>,
}

/// Stateful gesture classifier for one input stream
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: RecognizerConfig,
    state: RecognizerState,
    history: HistoryBuffer,
}

impl GestureRecognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        let history = HistoryBuffer::new(config.history_window_ms as f64);
        Self {
            config,
            state: RecognizerState::default(),
            history,
        }
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn state(&self) -> &RecognizerState {
        &self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn is_awake(&self) -> bool {
        self.state.is_awake
    }

    /// Return to the initial asleep state, dropping all history.
    ///
    /// The recognizer never goes back to sleep on its own; hosts that want
    /// to re-arm the wake gesture call this.
    pub fn reset(&mut self) {
        self.state = RecognizerState::default();
        self.history.clear();
        tracing::debug!("Gesture recognizer reset");
    }

    /// Process a raw landmark slice.
    ///
    /// Anything other than exactly 21 points is treated as "no hand".
    pub fn process_points(
        &mut self,
        points: &[Landmark],
        timestamp: f64,
    ) -> Option<GestureResult> {
        match HandLandmarks::from_slice(points) {
            Ok(hand) => self.process(hand.as_ref(), timestamp),
            Err(e) => {
                tracing::warn!("Dropping malformed frame at {:.1}ms: {}", timestamp, e);
                self.process(None, timestamp)
            }
        }
    }

    /// Process one frame.
    ///
    /// Returns `None` only when no hand is present.
    pub fn process(
        &mut self,
        hand: Option<&HandLandmarks>,
        timestamp: f64,
    ) -> Option<GestureResult> {
        let Some(hand) = hand else {
            self.lose_hand();
            return None;
        };

        let pose = classify_pose(hand, self.config.pose_slack());
        let wrist = hand.wrist();
        self.history.push(HistorySample {
            x: wrist.x,
            y: wrist.y,
            z: wrist.z,
            scale: hand.scale(),
            time: timestamp,
            pose,
        });

        let index_tip = hand.index_tip();
        let mut result = GestureResult {
            gesture: None,
            cursor: NormalizedCursor {
                x: index_tip.x,
                y: index_tip.y,
            },
            state: self.awake_state(),
            pinch_progress: 0.0,
            debug: GestureDebug {
                pose,
                z_delta: self.scale_delta(timestamp),
            },
        };

        if pose != self.state.last_hand_pose {
            tracing::debug!("Pose {} -> {}", self.state.last_hand_pose, pose);
            self.state.last_hand_pose = pose;
            self.state.pose_start_time = Some(timestamp);
        }

        if !self.state.is_awake {
            if self.check_wake(pose, timestamp) {
                result.gesture = Some(Gesture::Wake);
                result.state = AwakeState::Awake;
            }
            return Some(result);
        }

        if self.check_pinch(hand.pinch_distance(), timestamp, &mut result) {
            result.gesture = Some(Gesture::Confirm);
            return Some(result);
        }

        if pose == HandPose::Open {
            if let Some(scroll) = self.detect_scroll(1.0 - index_tip.x) {
                result.gesture = Some(scroll);
                return Some(result);
            }
        }

        if self.cooled_down(timestamp) {
            if let Some(gesture) = self.detect_scale_gesture(timestamp, pose) {
                tracing::info!("{} (scale delta {:.3})", gesture, result.debug.z_delta);
                self.state.last_gesture_time = Some(timestamp);
                self.history.clear();
                result.gesture = Some(gesture);
                return Some(result);
            }
        }

        Some(result)
    }

    fn awake_state(&self) -> AwakeState {
        if self.state.is_awake {
            AwakeState::Awake
        } else {
            AwakeState::Asleep
        }
    }

    fn lose_hand(&mut self) {
        if !self.history.is_empty() {
            tracing::debug!("Hand lost; clearing {} history samples", self.history.len());
        }
        self.history.clear();
        self.state.presence_start_time = None;
        self.state.last_hand_pose = HandPose::Unknown;
    }

    /// Steady open palm held without a break. Any failing frame restarts
    /// the hold.
    fn check_wake(&mut self, pose: HandPose, timestamp: f64) -> bool {
        let steady = self
            .history
            .is_steady(self.config.steady_samples, self.config.steady_radius);
        if pose != HandPose::Open || !steady {
            self.state.presence_start_time = None;
            return false;
        }

        let start = *self.state.presence_start_time.get_or_insert(timestamp);
        if timestamp - start >= self.config.wake_hold_ms as f64 {
            self.state.is_awake = true;
            self.state.presence_start_time = None;
            tracing::info!("WAKE at {:.1}ms", timestamp);
            return true;
        }
        false
    }

    /// Pinch micro-machine with hysteresis. Returns true when CONFIRM fires.
    fn check_pinch(&mut self, distance: f32, timestamp: f64, result: &mut GestureResult) -> bool {
        if self.state.is_pinching {
            if distance > self.config.pinch_release {
                tracing::debug!("Pinch released ({:.3})", distance);
                self.state.is_pinching = false;
                self.state.pinch_start_time = None;
            }
            return false;
        }

        if distance >= self.config.pinch_engage {
            self.state.pinch_start_time = None;
            result.pinch_progress = 0.0;
            return false;
        }

        let start = *self.state.pinch_start_time.get_or_insert(timestamp);
        let elapsed = timestamp - start;
        let hold = self.config.pinch_hold_ms as f64;
        if elapsed >= hold {
            tracing::info!("CONFIRM after {:.0}ms pinch", elapsed);
            self.state.is_pinching = true;
            self.state.last_gesture_time = Some(timestamp);
            return true;
        }

        result.pinch_progress = if hold > 0.0 { (elapsed / hold) as f32 } else { 0.0 };
        false
    }

    /// `cursor_x` is the mirrored fingertip x, as an on-screen cursor shows it.
    fn detect_scroll(&self, cursor_x: f32) -> Option<Gesture> {
        let band = self.config.scroll_band;
        if cursor_x < band {
            Some(Gesture::ScrollLeft)
        } else if cursor_x > 1.0 - band {
            Some(Gesture::ScrollRight)
        } else {
            None
        }
    }

    fn cooled_down(&self, timestamp: f64) -> bool {
        match self.state.last_gesture_time {
            Some(last) => timestamp - last >= self.config.cooldown_ms as f64,
            None => true,
        }
    }

    fn scale_delta(&self, timestamp: f64) -> f32 {
        self.history.scale_delta(
            timestamp,
            self.config.scale_window_ms as f64,
            self.config.scale_min_samples,
        )
    }

    /// Closed hand pulled away: SUMMON. Open hand pushed toward the camera:
    /// DISMISS.
    fn detect_scale_gesture(&self, timestamp: f64, pose: HandPose) -> Option<Gesture> {
        let delta = self.scale_delta(timestamp);
        let threshold = self.config.scale_threshold;
        if delta < -threshold && pose == HandPose::Closed {
            Some(Gesture::Summon)
        } else if delta > threshold && pose == HandPose::Open {
            Some(Gesture::Dismiss)
        } else {
            None
        }
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::HandBuilder;

    const FRAME_MS: f64 = 33.0;

    fn hand(cx: f32, scale: f32, open: bool, pinch: f32) -> HandLandmarks {
        HandBuilder {
            center_x: cx,
            scale,
            open,
            pinch,
            ..HandBuilder::default()
        }
        .build()
    }

    fn open_hand(cx: f32) -> HandLandmarks {
        hand(cx, 0.2, true, 0.3)
    }

    fn awake_recognizer() -> (GestureRecognizer, f64) {
        let mut r = GestureRecognizer::default();
        let h = open_hand(0.5);
        let mut t = 0.0;
        for _ in 0..40 {
            t += FRAME_MS;
            if let Some(res) = r.process(Some(&h), t) {
                if res.gesture == Some(Gesture::Wake) {
                    return (r, t);
                }
            }
        }
        panic!("never woke");
    }

    #[test]
    fn test_no_hand_returns_none() {
        let mut r = GestureRecognizer::default();
        r.process(Some(&open_hand(0.5)), 0.0);
        assert!(r.process(None, 10.0).is_none());
        assert!(r.history().is_empty());
        assert_eq!(r.state().last_hand_pose, HandPose::Unknown);
    }

    #[test]
    fn test_malformed_points_count_as_no_hand() {
        let mut r = GestureRecognizer::default();
        r.process(Some(&open_hand(0.5)), 0.0);
        let partial = vec![Landmark::default(); 7];
        assert!(r.process_points(&partial, 10.0).is_none());
        assert!(r.history().is_empty());
    }

    #[test]
    fn test_fixture_poses() {
        let slack = RecognizerConfig::default().pose_slack();
        assert_eq!(classify_pose(&open_hand(0.5), slack), HandPose::Open);
        assert_eq!(classify_pose(&hand(0.5, 0.2, false, 0.3), slack), HandPose::Closed);
    }

    #[test]
    fn test_wake_fires_once() {
        let mut r = GestureRecognizer::default();
        let h = open_hand(0.5);
        let mut wakes = 0;
        let mut t = 0.0;
        while t < 1500.0 {
            let res = r.process(Some(&h), t).unwrap();
            if res.gesture == Some(Gesture::Wake) {
                wakes += 1;
                assert_eq!(res.state, AwakeState::Awake);
            }
            t += FRAME_MS;
        }
        assert_eq!(wakes, 1);
        assert!(r.is_awake());
    }

    #[test]
    fn test_wake_requires_unbroken_hold() {
        let mut r = GestureRecognizer::default();
        let h = open_hand(0.5);
        let fist = hand(0.5, 0.2, false, 0.3);
        let mut t = 0.0;
        for i in 0..30 {
            // A closed frame every 10th frame keeps resetting the hold
            let frame = if i % 10 == 9 { &fist } else { &h };
            let res = r.process(Some(frame), t).unwrap();
            assert_ne!(res.gesture, Some(Gesture::Wake));
            t += FRAME_MS;
        }
        assert!(!r.is_awake());
    }

    #[test]
    fn test_no_active_gestures_while_asleep() {
        let mut r = GestureRecognizer::default();
        let mut t = 0.0;
        for _ in 0..30 {
            // Pinching at the far edge, fingers curled: would be CONFIRM or
            // SCROLL if awake, but never steady-open
            let res = r.process(Some(&hand(0.05, 0.2, false, 0.01)), t).unwrap();
            assert!(res.gesture.is_none());
            assert_eq!(res.state, AwakeState::Asleep);
            t += FRAME_MS;
        }
    }

    #[test]
    fn test_pinch_confirm_and_latch() {
        let (mut r, mut t) = awake_recognizer();
        let pinch = hand(0.5, 0.2, false, 0.05);
        let mut confirms = 0;
        let mut last_progress = 0.0;
        let start = t + FRAME_MS;
        while t < start + 600.0 {
            t += FRAME_MS;
            let res = r.process(Some(&pinch), t).unwrap();
            if res.gesture == Some(Gesture::Confirm) {
                confirms += 1;
                assert!(t - start >= 400.0);
            } else if confirms == 0 {
                assert!(res.pinch_progress >= last_progress);
                assert!(res.pinch_progress < 1.0);
                last_progress = res.pinch_progress;
            }
        }
        assert_eq!(confirms, 1);
        assert!(last_progress > 0.5);
        assert!(r.state().is_pinching);

        // Inside the hysteresis band: still latched
        t += FRAME_MS;
        r.process(Some(&hand(0.5, 0.2, false, 0.12)), t);
        assert!(r.state().is_pinching);

        // Past release
        t += FRAME_MS;
        r.process(Some(&hand(0.5, 0.2, false, 0.2)), t);
        assert!(!r.state().is_pinching);

        // A fresh full hold confirms again
        let restart = t + FRAME_MS;
        while t < restart + 450.0 {
            t += FRAME_MS;
            let res = r.process(Some(&pinch), t).unwrap();
            if res.gesture == Some(Gesture::Confirm) {
                confirms += 1;
                assert!(t - restart >= 400.0);
            }
        }
        assert_eq!(confirms, 2);
        assert!(r.state().is_pinching);
    }

    #[test]
    fn test_pinch_cancel_resets_progress() {
        let (mut r, mut t) = awake_recognizer();
        let pinch = hand(0.5, 0.2, false, 0.05);
        for _ in 0..5 {
            t += FRAME_MS;
            r.process(Some(&pinch), t);
        }
        t += FRAME_MS;
        let res = r.process(Some(&hand(0.5, 0.2, false, 0.11)), t).unwrap();
        assert_eq!(res.pinch_progress, 0.0);
        assert!(r.state().pinch_start_time.is_none());
    }

    #[test]
    fn test_scroll_bands() {
        let (mut r, mut t) = awake_recognizer();
        // Mirrored cursor x = 1 - 0.9 = 0.1
        for _ in 0..5 {
            t += FRAME_MS;
            let res = r.process(Some(&open_hand(0.9)), t).unwrap();
            assert_eq!(res.gesture, Some(Gesture::ScrollLeft));
        }
        t += FRAME_MS;
        let res = r.process(Some(&open_hand(0.1)), t).unwrap();
        assert_eq!(res.gesture, Some(Gesture::ScrollRight));

        t += FRAME_MS;
        let res = r.process(Some(&open_hand(0.5)), t).unwrap();
        assert_eq!(res.gesture, None);
    }

    #[test]
    fn test_scroll_needs_open_hand() {
        let (mut r, mut t) = awake_recognizer();
        t += FRAME_MS;
        let res = r.process(Some(&hand(0.9, 0.2, false, 0.3)), t).unwrap();
        assert_ne!(res.gesture, Some(Gesture::ScrollLeft));
    }

    #[test]
    fn test_summon_clears_history_and_cools_down() {
        let (mut r, mut t) = awake_recognizer();
        t += 1000.0;
        let mut scale = 0.25;
        let mut summons = Vec::new();
        for _ in 0..40 {
            t += FRAME_MS;
            scale -= 0.005;
            let res = r.process(Some(&hand(0.5, scale, false, 0.3)), t).unwrap();
            if res.gesture == Some(Gesture::Summon) {
                assert!(r.history().is_empty());
                summons.push(t);
            }
        }
        assert!(!summons.is_empty());
        for pair in summons.windows(2) {
            assert!(pair[1] - pair[0] >= 800.0);
        }
    }

    #[test]
    fn test_dismiss_on_push() {
        let (mut r, mut t) = awake_recognizer();
        t += 1000.0;
        let mut scale = 0.15;
        let mut dismissed = false;
        for _ in 0..20 {
            t += FRAME_MS;
            scale += 0.005;
            let res = r.process(Some(&hand(0.5, scale, true, 0.3)), t).unwrap();
            if res.gesture == Some(Gesture::Dismiss) {
                dismissed = true;
                break;
            }
        }
        assert!(dismissed);
    }

    #[test]
    fn test_reset_rearms_wake() {
        let (mut r, t) = awake_recognizer();
        r.reset();
        assert!(!r.is_awake());
        assert!(r.history().is_empty());
        let res = r.process(Some(&open_hand(0.5)), t + FRAME_MS).unwrap();
        assert_eq!(res.state, AwakeState::Asleep);
    }
}
