//! Time utilities for the frame loop

use std::time::{Duration, Instant};

/// Default local frame rate
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Duration of one frame at the given rate
pub fn frame_period(frame_rate: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(frame_rate.max(1)))
}

/// Seconds between two instants, as used for `dt`
pub fn delta_secs(from: Instant, to: Instant) -> f32 {
    to.saturating_duration_since(from).as_secs_f32()
}

/// A simple timer for measuring durations
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
