use crate::settings::QualitySettings;

/// Adaptive render resolution, expressed as a pixel ratio (physical pixels
/// per logical pixel).
///
/// Slow frames shrink the ratio geometrically toward the floor; fast frames
/// win it back linearly up to `min(device ratio, max_ratio)`. Frames between
/// the two thresholds leave it untouched.
#[derive(Debug, Clone)]
pub struct QualityController {
    ratio: f32,
    ceiling: f32,
    settings: QualitySettings,
}

impl QualityController {
    pub fn new(settings: QualitySettings, device_ratio: f32) -> Self {
        let ceiling = Self::ceiling_for(&settings, device_ratio);
        Self {
            ratio: ceiling,
            ceiling,
            settings,
        }
    }

    fn ceiling_for(settings: &QualitySettings, device_ratio: f32) -> f32 {
        device_ratio.min(settings.max_ratio).max(settings.floor)
    }

    /// Feed one frame's delta; returns the ratio to render the next frame at.
    pub fn adjust(&mut self, dt: f32) -> f32 {
        let s = &self.settings;
        if dt > s.slow_frame {
            if self.ratio > s.floor {
                self.ratio = (self.ratio * s.decay).max(s.floor);
            }
        } else if dt < s.fast_frame && self.ratio < self.ceiling {
            self.ratio = (self.ratio + s.recovery).min(self.ceiling);
        }
        self.ratio
    }

    /// The window moved to a display with a different pixel density.
    pub fn set_device_ratio(&mut self, device_ratio: f32) {
        self.ceiling = Self::ceiling_for(&self.settings, device_ratio);
        self.ratio = self.ratio.clamp(self.settings.floor, self.ceiling);
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    pub fn floor(&self) -> f32 {
        self.settings.floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(device_ratio: f32) -> QualityController {
        QualityController::new(QualitySettings::default(), device_ratio)
    }

    #[test]
    fn ceiling_is_capped_by_device_and_max() {
        assert_eq!(controller(2.0).ceiling(), 1.25);
        assert_eq!(controller(1.0).ceiling(), 1.0);
        assert_eq!(controller(2.0).ratio(), 1.25);
    }

    #[test]
    fn slow_frames_decay_to_the_floor_and_stop() {
        let mut q = controller(2.0);
        let first = q.adjust(0.05);
        assert!((first - 1.25 * 0.99).abs() < 1e-6);
        for _ in 0..1000 {
            q.adjust(0.05);
        }
        assert_eq!(q.ratio(), 0.75);
    }

    #[test]
    fn fast_frames_recover_to_the_ceiling() {
        let mut q = controller(1.0);
        for _ in 0..1000 {
            q.adjust(0.05);
        }
        let low = q.ratio();
        assert!((q.adjust(0.016) - (low + 0.001)).abs() < 1e-6);
        for _ in 0..1000 {
            q.adjust(0.016);
        }
        assert_eq!(q.ratio(), 1.0);
    }

    #[test]
    fn middling_frames_hold_steady() {
        let mut q = controller(1.0);
        q.adjust(0.05);
        let held = q.ratio();
        for _ in 0..100 {
            q.adjust(0.03);
        }
        assert_eq!(q.ratio(), held);
    }

    #[test]
    fn moving_to_a_denser_display_raises_only_the_ceiling() {
        let mut q = controller(1.0);
        q.set_device_ratio(2.0);
        assert_eq!(q.ceiling(), 1.25);
        assert_eq!(q.ratio(), 1.0);
        q.set_device_ratio(0.5);
        assert_eq!(q.ceiling(), 0.75);
        assert_eq!(q.ratio(), 0.75);
    }
}
