//! Configuration for the recognition pipeline
//!
//! Every tunable threshold lives here rather than in the recognizer, so hosts
//! and tests can run the same code at different sensitivity profiles. Files
//! are TOML; any key left out keeps its default.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{HandwaveError, Result};
use crate::pose::PoseSlack;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandwaveConfig {
    pub smoothing: SmoothingConfig,
    pub recognizer: RecognizerConfig,
    pub cursor: CursorConfig,
    pub dispatch: DispatchConfig,
    pub hit_test: HitTestConfig,
}

/// Landmark smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Exponential smoothing factor in (0, 1]
    pub alpha: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { alpha: 0.2 }
    }
}

/// Gesture recognizer thresholds and timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Steady open palm must be held this long to wake
    pub wake_hold_ms: u64,
    /// Thumb-index distance below which a pinch starts
    pub pinch_engage: f32,
    /// Distance above which a latched pinch releases
    pub pinch_release: f32,
    /// Pinch must be held this long to confirm
    pub pinch_hold_ms: u64,
    /// Width of each edge-scroll band as a fraction of the frame
    pub scroll_band: f32,
    /// Minimum scale change for summon/dismiss
    pub scale_threshold: f32,
    /// Trailing window for the scale change
    pub scale_window_ms: u64,
    /// Buffered samples needed before a scale change is measured
    pub scale_min_samples: usize,
    /// Minimum gap between discrete gestures for summon/dismiss
    pub cooldown_ms: u64,
    /// How much wrist history to keep
    pub history_window_ms: u64,
    /// Samples compared by the steadiness test
    pub steady_samples: usize,
    /// Maximum wrist drift that still counts as steady
    pub steady_radius: f32,
    pub extended_slack: f32,
    pub curled_slack: f32,
}

impl RecognizerConfig {
    /// Canonical thresholds
    pub fn standard() -> Self {
        Self {
            wake_hold_ms: 500,
            pinch_engage: 0.10,
            pinch_release: 0.15,
            pinch_hold_ms: 400,
            scroll_band: 0.33,
            scale_threshold: 0.04,
            scale_window_ms: 900,
            scale_min_samples: 5,
            cooldown_ms: 800,
            history_window_ms: 1000,
            steady_samples: 5,
            steady_radius: 0.05,
            extended_slack: 1.1,
            curled_slack: 1.2,
        }
    }

    /// Twitchier push/pull detection: smaller swing, shorter window and cooldown
    pub fn sensitive() -> Self {
        Self {
            scale_threshold: 0.02,
            scale_window_ms: 600,
            cooldown_ms: 500,
            ..Self::standard()
        }
    }

    pub fn pose_slack(&self) -> PoseSlack {
        PoseSlack {
            extended: self.extended_slack,
            curled: self.curled_slack,
        }
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Fingertip to screen projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Flip x to match a selfie-view feed
    pub mirror: bool,
    /// Lateral correction per handedness, added for right hands and
    /// subtracted for left hands
    pub hand_offset: f32,
    /// Motion gain around the frame center
    pub gain: f32,
    /// Subtracted from y before the gain so a comfortable hand height maps
    /// near screen center
    pub vertical_bias: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            mirror: true,
            hand_offset: 0.04,
            gain: 1.12,
            vertical_bias: 0.2,
        }
    }
}

/// Which way the scroll gestures move content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMapping {
    /// SCROLL_LEFT scrolls by a negative delta
    #[default]
    Natural,
    /// SCROLL_LEFT scrolls by a positive delta
    Inverted,
}

/// Gesture to intent translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub scroll_mapping: ScrollMapping,
    /// Magnitude of one scroll intent
    pub scroll_step: f32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            scroll_mapping: ScrollMapping::Natural,
            scroll_step: 1.0,
        }
    }
}

/// Hit-testing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestConfig {
    /// Top fraction of the viewport where world targets are ignored
    pub header_fraction: f32,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            header_fraction: 0.35,
        }
    }
}

/// Named recognizer presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Standard,
    Sensitive,
}

impl Profile {
    pub fn name(&self) -> &'static str {
        match self {
            Profile::Standard => "standard",
            Profile::Sensitive => "sensitive",
        }
    }

    pub fn recognizer(&self) -> RecognizerConfig {
        match self {
            Profile::Standard => RecognizerConfig::standard(),
            Profile::Sensitive => RecognizerConfig::sensitive(),
        }
    }
}

impl FromStr for Profile {
    type Err = HandwaveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "default" => Ok(Profile::Standard),
            "sensitive" => Ok(Profile::Sensitive),
            other => Err(HandwaveError::UnknownProfile(other.to_string())),
        }
    }
}

impl HandwaveConfig {
    /// Default configuration with the recognizer replaced by a profile
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            recognizer: profile.recognizer(),
            ..Self::default()
        }
    }

    /// `<config dir>/handwave/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "handwave").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| HandwaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| HandwaveError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load an explicit path, else the default path when it exists, else
    /// built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let alpha = self.smoothing.alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(HandwaveError::invalid(format!(
                "smoothing.alpha must be in (0, 1], got {}",
                alpha
            )));
        }

        let r = &self.recognizer;
        if r.pinch_engage <= 0.0 {
            return Err(HandwaveError::invalid("recognizer.pinch_engage must be positive"));
        }
        if r.pinch_release <= r.pinch_engage {
            return Err(HandwaveError::invalid(format!(
                "recognizer.pinch_release ({}) must exceed pinch_engage ({})",
                r.pinch_release, r.pinch_engage
            )));
        }
        if !(r.scroll_band > 0.0 && r.scroll_band < 0.5) {
            return Err(HandwaveError::invalid(format!(
                "recognizer.scroll_band must be in (0, 0.5), got {}",
                r.scroll_band
            )));
        }
        if r.scale_threshold <= 0.0 {
            return Err(HandwaveError::invalid("recognizer.scale_threshold must be positive"));
        }
        if r.steady_samples < 2 {
            return Err(HandwaveError::invalid("recognizer.steady_samples must be at least 2"));
        }
        if r.scale_window_ms > r.history_window_ms {
            return Err(HandwaveError::invalid(
                "recognizer.scale_window_ms cannot exceed history_window_ms",
            ));
        }

        if self.cursor.gain <= 0.0 {
            return Err(HandwaveError::invalid("cursor.gain must be positive"));
        }
        if self.dispatch.scroll_step <= 0.0 {
            return Err(HandwaveError::invalid("dispatch.scroll_step must be positive"));
        }
        if !(0.0..=1.0).contains(&self.hit_test.header_fraction) {
            return Err(HandwaveError::invalid("hit_test.header_fraction must be in [0, 1]"));
        }
        Ok(())
    }
}
