use super::QualityController;
use crate::scene::{FrameView, SceneState};
use crate::settings::SceneSettings;
use crate::time::FrameClock;
use std::time::Duration;

/// Drives one scene frame per host callback.
///
/// While the surface is hidden the scheduler does no work at all; the clock
/// is held so that the first visible frame sees an ordinary delta rather
/// than the whole hidden stretch.
pub struct FrameScheduler {
    clock: FrameClock,
    quality: QualityController,
    paused: bool,
}

impl FrameScheduler {
    pub fn new(settings: &SceneSettings, device_ratio: f32) -> Self {
        Self {
            clock: FrameClock::new(settings.max_frame_delta),
            quality: QualityController::new(settings.quality.clone(), device_ratio),
            paused: false,
        }
    }

    /// Run one frame at host time `now`. Returns `None` when the frame was
    /// skipped because the surface is not visible.
    pub fn tick(
        &mut self,
        now: Duration,
        visible: bool,
        scroll: f32,
        state: &mut SceneState,
    ) -> Option<FrameView> {
        if !visible {
            if !self.paused {
                tracing::debug!(elapsed = self.clock.elapsed(), "frame loop paused");
                self.paused = true;
            }
            self.clock.hold(now);
            return None;
        }
        if self.paused {
            tracing::debug!("frame loop resumed");
            self.paused = false;
        }

        let dt = self.clock.tick(now);
        state.advance(dt, scroll);
        let ratio = self.quality.adjust(dt);
        Some(state.frame_view(self.clock.elapsed(), ratio))
    }

    pub fn quality(&self) -> &QualityController {
        &self.quality
    }

    pub fn quality_mut(&mut self) -> &mut QualityController {
        &mut self.quality
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
