//! Coarse hand pose classification

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::landmark::{HandLandmarks, FINGER_PIPS, FINGER_TIPS, WRIST};

/// Open/closed/neutral classification of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandPose {
    Open,
    Closed,
    Neutral,
    /// No hand present
    #[default]
    Unknown,
}

impl HandPose {
    pub fn label(&self) -> &'static str {
        match self {
            HandPose::Open => "OPEN",
            HandPose::Closed => "CLOSED",
            HandPose::Neutral => "NEUTRAL",
            HandPose::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for HandPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Slack factors applied to the PIP distance when counting fingers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSlack {
    /// Tip farther than `pip * extended` counts as extended
    pub extended: f32,
    /// Tip closer than `pip * curled` counts as curled
    pub curled: f32,
}

impl Default for PoseSlack {
    fn default() -> Self {
        Self {
            extended: 1.1,
            curled: 1.2,
        }
    }
}

/// Classify a hand from its landmark geometry.
///
/// OPEN is checked first, so it wins if both counts are high.
pub fn classify_pose(hand: &HandLandmarks, slack: PoseSlack) -> HandPose {
    let wrist = hand[WRIST];

    let mut extended = 0;
    let mut curled = 0;
    for (tip, pip) in FINGER_TIPS.iter().zip(FINGER_PIPS.iter()) {
        let tip_dist = hand[*tip].planar_distance(&wrist);
        let pip_dist = hand[*pip].planar_distance(&wrist);
        if tip_dist > pip_dist * slack.extended {
            extended += 1;
        }
        if tip_dist < pip_dist * slack.curled {
            curled += 1;
        }
    }

    if extended >= 3 {
        HandPose::Open
    } else if curled >= 3 {
        HandPose::Closed
    } else if extended <= 1 {
        HandPose::Closed
    } else {
        HandPose::Neutral
    }
}
