//! Replay of frame streams through a fresh pipeline

use std::path::Path;

use anyhow::{Context, Result};
use handwave_core::cursor::ScreenPoint;
use handwave_core::pipeline::read_frames;
use handwave_core::{Gesture, GesturePipeline, HandFrame, HandwaveConfig, Intent, Viewport};
use tokio::sync::broadcast::error::TryRecvError;

/// A frame that produced a gesture
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayEvent {
    pub timestamp_ms: f64,
    pub gesture: Gesture,
    pub cursor: Option<ScreenPoint>,
}

#[derive(Debug, Default)]
pub struct ReplayReport {
    pub frames: usize,
    pub hand_frames: usize,
    pub events: Vec<ReplayEvent>,
    /// Everything the action layer emitted, in order
    pub intents: Vec<Intent>,
}

impl ReplayReport {
    pub fn count(&self, gesture: Gesture) -> usize {
        self.events.iter().filter(|e| e.gesture == gesture).count()
    }
}

pub async fn read_frames_file(path: &Path) -> Result<Vec<HandFrame>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let frames = read_frames(content.as_bytes())
        .with_context(|| format!("Invalid frame file {}", path.display()))?;
    tracing::info!("Loaded {} frames from {}", frames.len(), path.display());
    Ok(frames)
}

pub fn replay(config: HandwaveConfig, viewport: Viewport, frames: &[HandFrame]) -> ReplayReport {
    let mut pipeline = GesturePipeline::new(config, viewport);
    let mut intents = pipeline.actions().subscribe();
    let mut report = ReplayReport::default();

    for frame in frames {
        let outcome = pipeline.process_frame(frame, None);
        report.frames += 1;
        if outcome.result.is_some() {
            report.hand_frames += 1;
        }
        if let Some(gesture) = outcome.gesture() {
            report.events.push(ReplayEvent {
                timestamp_ms: frame.timestamp_ms,
                gesture,
                cursor: outcome.cursor,
            });
        }

        loop {
            match intents.try_recv() {
                Ok(intent) => report.intents.push(intent),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Intent stream lagged, {} intents dropped", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use handwave_core::synthetic::Scenario;
    use std::io::Write;

    #[test]
    fn test_replay_scenario() {
        let frames = Scenario::Dismiss.frames(33.0);
        let report = replay(HandwaveConfig::default(), Viewport::default(), &frames);
        assert_eq!(report.frames, frames.len());
        assert_eq!(report.hand_frames, frames.len() - 3);
        assert_eq!(report.count(Gesture::Wake), 1);
        assert_eq!(report.count(Gesture::Dismiss), 1);
        assert_eq!(
            report.intents,
            vec![Intent::Activate, Intent::Dismiss { id: 1 }]
        );
    }

    #[tokio::test]
    async fn test_read_frames_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for frame in Scenario::Wake.frames(33.0) {
            writeln!(file, "{}", serde_json::to_string(&frame).unwrap()).unwrap();
        }
        let frames = read_frames_file(file.path()).await.unwrap();
        assert_eq!(frames, Scenario::Wake.frames(33.0));
    }

    #[tokio::test]
    async fn test_read_frames_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_frames_file(&dir.path().join("absent.jsonl"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("absent.jsonl"));
    }
}
