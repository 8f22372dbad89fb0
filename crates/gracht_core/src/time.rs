//! Frame clock
//!
//! Variable-rate delta time with a stall cap. Timestamps are durations since
//! mount so the clock can be driven by a real `Instant` or by tests.

use std::time::Duration;

/// Upper bound on a single frame's delta (seconds).
pub const MAX_FRAME_DELTA: f32 = 0.1;

pub struct FrameClock {
    last: Option<Duration>,
    elapsed: f32,
    max_delta: f32,
    frame_count: u64,
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            last: None,
            elapsed: 0.0,
            max_delta,
            frame_count: 0,
        }
    }

    /// Advance to `now` and return the capped delta. The first tick yields 0.
    pub fn tick(&mut self, now: Duration) -> f32 {
        let raw = match self.last {
            Some(last) => now.saturating_sub(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        let dt = raw.min(self.max_delta);
        self.elapsed += dt;
        self.frame_count += 1;
        dt
    }

    /// Resynchronise to `now` without advancing elapsed time, so a paused
    /// stretch is not replayed as one long frame on resume.
    pub fn hold(&mut self, now: Duration) {
        self.last = Some(now);
    }

    /// Scene time in seconds (paused stretches excluded).
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA)
    }
}
