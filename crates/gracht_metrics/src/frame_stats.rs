//! Rolling frame-time and resolution statistics

use super::ring_buffer::RingBuffer;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSummary {
    pub fps: f32,
    pub frame_ms: f32,
    pub worst_ms: f32,
    pub pixel_ratio: f32,
    pub rendered: u64,
    pub paused: u64,
}

pub struct FrameStats {
    frame_times: RingBuffer<f32>,
    pixel_ratios: RingBuffer<f32>,
    rendered: u64,
    paused: u64,
}

impl FrameStats {
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_times: RingBuffer::new(capacity),
            pixel_ratios: RingBuffer::new(capacity),
            rendered: 0,
            paused: 0,
        }
    }

    pub fn record_frame(&mut self, dt: f32, pixel_ratio: f32) {
        self.frame_times.push(dt);
        self.pixel_ratios.push(pixel_ratio);
        self.rendered += 1;
    }

    pub fn record_pause(&mut self) {
        self.paused += 1;
    }

    pub fn fps(&self) -> f32 {
        let avg = self.frame_times.average();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratios.last().unwrap_or(0.0)
    }

    /// True every `every` rendered frames.
    pub fn is_due(&self, every: u64) -> bool {
        every > 0 && self.rendered > 0 && self.rendered % every == 0
    }

    pub fn summary(&self) -> FrameSummary {
        let (_, worst) = self.frame_times.min_max();
        FrameSummary {
            fps: self.fps(),
            frame_ms: self.frame_times.average() * 1000.0,
            worst_ms: worst * 1000.0,
            pixel_ratio: self.pixel_ratio(),
            rendered: self.rendered,
            paused: self.paused,
        }
    }
}
