//! Gracht Metrics - frame statistics for the scene loop
//!
//! Collection is compiled in only with the `metrics` feature. Without it the
//! same API exists as no-op stubs, so call sites need no `cfg` of their own.
//!
//! ```ignore
//! use gracht_metrics::FrameStats;
//!
//! let mut stats = FrameStats::new(120);
//! stats.record_frame(dt, pixel_ratio);
//! println!("{:.1} fps at {:.2}x", stats.fps(), stats.pixel_ratio());
//! ```

#[cfg(feature = "metrics")]
mod frame_stats;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use frame_stats::{FrameStats, FrameSummary};
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSummary {
    pub fps: f32,
    pub frame_ms: f32,
    pub worst_ms: f32,
    pub pixel_ratio: f32,
    pub rendered: u64,
    pub paused: u64,
}

#[cfg(not(feature = "metrics"))]
pub struct FrameStats;

#[cfg(not(feature = "metrics"))]
impl FrameStats {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn record_frame(&mut self, _dt: f32, _pixel_ratio: f32) {}
    pub fn record_pause(&mut self) {}
    pub fn fps(&self) -> f32 { 0.0 }
    pub fn pixel_ratio(&self) -> f32 { 0.0 }
    pub fn summary(&self) -> FrameSummary { FrameSummary::default() }
    pub fn is_due(&self, _every: u64) -> bool { false }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn average(&self) -> f32 { 0.0 }
}

#[cfg(test)]
mod tests {
    #[test]
    fn stubs_or_collectors_share_one_api() {
        let mut stats = super::FrameStats::new(60);
        stats.record_frame(0.016, 1.0);
        stats.record_pause();
        let _ = stats.summary();
        let mut buffer = super::RingBuffer::<f32>::new(10);
        buffer.push(1.0);
        let _ = buffer.average();
    }
}
