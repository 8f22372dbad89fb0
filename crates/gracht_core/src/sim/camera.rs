use crate::math::{approach, Vec3};
use crate::settings::CameraSettings;

/// Camera trailing the boat with exponential smoothing.
#[derive(Debug, Clone)]
pub struct ChaseCamera {
    position: Vec3,
    look_target: Vec3,
    settings: CameraSettings,
}

impl ChaseCamera {
    /// Start already settled behind `vehicle` so the first frame does not swoop.
    pub fn new(vehicle: Vec3, settings: CameraSettings) -> Self {
        let mut camera = Self {
            position: vehicle + settings.offset,
            look_target: Vec3::ZERO,
            settings,
        };
        camera.look_target = camera.look_target_for(vehicle);
        camera
    }

    /// Ease toward the chase offset and aim ahead of the boat.
    pub fn follow(&mut self, vehicle: Vec3, dt: f32) {
        let target = vehicle + self.settings.offset;
        let rate = self.settings.lerp;
        self.position = Vec3::new(
            approach(self.position.x, target.x, rate, dt),
            approach(self.position.y, target.y, rate, dt),
            approach(self.position.z, target.z, rate, dt),
        );
        self.look_target = self.look_target_for(vehicle);
    }

    /// Shift along the travel axis after the boat wraps, keeping the
    /// relative offset so the jump is invisible.
    pub fn rebase(&mut self, dz: f32) {
        self.position.z += dz;
        self.look_target.z += dz;
    }

    fn look_target_for(&self, vehicle: Vec3) -> Vec3 {
        Vec3::new(
            vehicle.x,
            self.settings.look_height,
            vehicle.z - self.settings.look_ahead,
        )
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }
}
