//! Time-windowed wrist history used for steadiness and push/pull detection

use std::collections::VecDeque;

use crate::pose::HandPose;

/// One buffered frame: wrist position, hand scale and pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub scale: f32,
    /// Caller-supplied frame timestamp in milliseconds
    pub time: f64,
    pub pose: HandPose,
}

/// Recent samples, oldest first, spanning at most `window_ms`
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<HistorySample>,
    window_ms: f64,
}

impl HistoryBuffer {
    pub fn new(window_ms: f64) -> Self {
        Self {
            // ~1 second at 60fps
            samples: VecDeque::with_capacity(64),
            window_ms,
        }
    }

    /// Append a sample and drop everything that fell out of the window
    /// relative to the new sample's timestamp.
    pub fn push(&mut self, sample: HistorySample) {
        let now = sample.time;
        self.samples.push_back(sample);
        while let Some(front) = self.samples.front() {
            if now - front.time < self.window_ms {
                break;
            }
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    /// Whether the wrist has stayed put over the last `count` samples.
    ///
    /// Compares only the oldest and newest of those samples. Fewer than
    /// `count` buffered samples is never steady.
    pub fn is_steady(&self, count: usize, radius: f32) -> bool {
        let count = count.max(2);
        if self.samples.len() < count {
            return false;
        }
        let first = &self.samples[self.samples.len() - count];
        let last = &self.samples[self.samples.len() - 1];
        let dx = last.x - first.x;
        let dy = last.y - first.y;
        (dx * dx + dy * dy).sqrt() < radius
    }

    /// Change in hand scale across the samples younger than `window_ms`.
    ///
    /// Returns 0 when fewer than `min_samples` are buffered overall or fewer
    /// than two fall inside the window.
    pub fn scale_delta(&self, now: f64, window_ms: f64, min_samples: usize) -> f32 {
        if self.samples.len() < min_samples {
            return 0.0;
        }
        let mut in_window = self.samples.iter().filter(|s| now - s.time < window_ms);
        let Some(first) = in_window.next() else {
            return 0.0;
        };
        match in_window.last() {
            Some(last) => last.scale - first.scale,
            None => 0.0,
        }
    }
}
