use crate::math::{Transform, Vec3};
use crate::settings::VehicleSettings;
use crate::world::WorldSpan;

/// Result of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// The boat crossed the loop point and was moved forward by `L`.
    pub wrapped: bool,
}

/// The cruising boat: longitudinal position and damped speed.
#[derive(Debug, Clone)]
pub struct Vehicle {
    position: f32,
    speed: f32,
    target_speed: f32,
    span: WorldSpan,
    params: VehicleSettings,
}

impl Vehicle {
    pub fn new(span: WorldSpan, params: VehicleSettings) -> Self {
        Self {
            position: params.start_position,
            speed: 0.0,
            target_speed: 0.0,
            span,
            params,
        }
    }

    /// Advance by `dt` seconds with the latest scroll progress as throttle.
    pub fn step(&mut self, dt: f32, scroll: f32) -> StepOutcome {
        let p = &self.params;
        let throttle = scroll.max(0.0);
        self.target_speed = throttle * p.max_speed;

        self.speed += (self.target_speed - self.speed) * (p.accel_factor * dt).min(1.0);
        // Only a decaying speed snaps to rest.
        if self.target_speed < p.speed_epsilon && self.speed < p.speed_epsilon {
            self.speed = 0.0;
        }

        self.position -= self.speed * p.distance_scale * dt;
        let wrapped = self.position < -self.span.length();
        if wrapped {
            self.position += self.span.length();
            tracing::trace!(position = self.position, "vehicle wrapped");
        }
        StepOutcome { wrapped }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    /// Hull origin in world space.
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.position)
    }

    /// Body transform with a gentle pitch and roll; pitch grows with speed.
    pub fn body_transform(&self, time: f32) -> Transform {
        let pitch = time.sin() * 0.002 + self.speed * 0.005;
        let roll = (time * 0.8).sin() * 0.003;
        Transform::at(self.world_position()).with_rotation(Vec3::new(pitch, 0.0, roll))
    }
}
