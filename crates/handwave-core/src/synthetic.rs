//! Synthetic hands and scripted gesture streams
//!
//! Used by the CLI's `scenario` command and by tests to drive the pipeline
//! without a camera.

use std::fmt;
use std::str::FromStr;

use crate::error::HandwaveError;
use crate::landmark::{
    HandLandmarks, Landmark, FINGER_PIPS, FINGER_TIPS, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP,
    THUMB_TIP, WRIST,
};
use crate::pipeline::HandFrame;

/// Parametric hand shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandBuilder {
    /// Wrist x in normalized image space
    pub center_x: f32,
    pub wrist_y: f32,
    /// Wrist to middle knuckle distance
    pub scale: f32,
    /// Fingers extended (open palm) or curled (fist)
    pub open: bool,
    /// Thumb tip to index tip distance
    pub pinch: f32,
}

impl Default for HandBuilder {
    fn default() -> Self {
        Self {
            center_x: 0.5,
            wrist_y: 0.8,
            scale: 0.2,
            open: true,
            pinch: 0.3,
        }
    }
}

impl HandBuilder {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn closed() -> Self {
        Self {
            open: false,
            ..Self::default()
        }
    }

    pub fn at(mut self, center_x: f32) -> Self {
        self.center_x = center_x;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn pinch(mut self, pinch: f32) -> Self {
        self.pinch = pinch;
        self
    }

    pub fn build(&self) -> HandLandmarks {
        let (cx, wy, s) = (self.center_x, self.wrist_y, self.scale);
        let mut p = [Landmark::new(cx, wy, 0.0); LANDMARK_COUNT];
        p[WRIST] = Landmark::new(cx, wy, 0.0);
        p[MIDDLE_MCP] = Landmark::new(cx, wy - s, 0.0);

        let reach = if self.open { 2.0 } else { 0.9 };
        for (i, (tip, pip)) in FINGER_TIPS.iter().zip(FINGER_PIPS.iter()).enumerate() {
            let x = cx - 0.03 + 0.02 * i as f32;
            p[*pip] = Landmark::new(x, wy - s * 1.3, 0.0);
            p[*tip] = Landmark::new(x, wy - s * reach, 0.0);
        }
        p[THUMB_TIP] = Landmark::new(p[INDEX_TIP].x - self.pinch, p[INDEX_TIP].y, 0.0);
        HandLandmarks::new(p)
    }
}

/// Scripted gesture demonstrations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Wake,
    Pinch,
    Scroll,
    Summon,
    Dismiss,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Wake,
        Scenario::Pinch,
        Scenario::Scroll,
        Scenario::Summon,
        Scenario::Dismiss,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Wake => "wake",
            Scenario::Pinch => "pinch",
            Scenario::Scroll => "scroll",
            Scenario::Summon => "summon",
            Scenario::Dismiss => "dismiss",
        }
    }

    /// Frames for this scenario at a fixed frame interval.
    ///
    /// Every scenario opens with a steady open palm long enough to wake. The
    /// active ones then settle into the starting shape at constant scale
    /// before performing the gesture.
    pub fn frames(&self, frame_ms: f64) -> Vec<HandFrame> {
        let mut script = Script::new(frame_ms);
        script.hold(HandBuilder::open(), 1000.0);
        match self {
            Scenario::Wake => {}
            Scenario::Pinch => {
                script.hold(HandBuilder::closed().pinch(0.05), 800.0);
                script.hold(HandBuilder::open(), 300.0);
            }
            Scenario::Scroll => {
                script.ramp(HandBuilder::open(), HandBuilder::open().at(0.85), 10);
                script.hold(HandBuilder::open().at(0.85), 400.0);
                script.ramp(HandBuilder::open().at(0.85), HandBuilder::open(), 10);
            }
            Scenario::Summon => {
                script.hold(HandBuilder::closed(), 1000.0);
                script.ramp(HandBuilder::closed(), HandBuilder::closed().scale(0.08), 24);
            }
            Scenario::Dismiss => {
                script.hold(HandBuilder::open(), 500.0);
                script.ramp(HandBuilder::open(), HandBuilder::open().scale(0.32), 24);
            }
        }
        script.lose_hand(3);
        script.frames
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = HandwaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .iter()
            .copied()
            .find(|sc| sc.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| HandwaveError::UnknownScenario(s.to_string()))
    }
}

struct Script {
    frame_ms: f64,
    t: f64,
    frames: Vec<HandFrame>,
}

impl Script {
    fn new(frame_ms: f64) -> Self {
        Self {
            frame_ms,
            t: 0.0,
            frames: Vec::new(),
        }
    }

    fn push(&mut self, frame: HandFrame) {
        self.frames.push(frame);
        self.t += self.frame_ms;
    }

    fn hold(&mut self, hand: HandBuilder, duration_ms: f64) {
        let built = hand.build();
        let end = self.t + duration_ms;
        while self.t < end {
            self.push(HandFrame::with_hand(self.t, &built));
        }
    }

    /// Linear interpolation of every parameter over `steps` frames
    fn ramp(&mut self, from: HandBuilder, to: HandBuilder, steps: usize) {
        for i in 1..=steps {
            let k = i as f32 / steps as f32;
            let lerp = |a: f32, b: f32| a + (b - a) * k;
            let hand = HandBuilder {
                center_x: lerp(from.center_x, to.center_x),
                wrist_y: lerp(from.wrist_y, to.wrist_y),
                scale: lerp(from.scale, to.scale),
                open: if k < 0.5 { from.open } else { to.open },
                pinch: lerp(from.pinch, to.pinch),
            };
            self.push(HandFrame::with_hand(self.t, &hand.build()));
        }
    }

    fn lose_hand(&mut self, count: usize) {
        for _ in 0..count {
            self.push(HandFrame::empty(self.t));
        }
    }
}
