//! Scene state
//!
//! Everything a mounted scene owns: generated instances, static bodies, the
//! boat and the camera. Built once per mount and dropped on unmount.

use crate::instance::InstanceBuffers;
use crate::math::{Mat4, Vec3};
use crate::settings::SceneSettings;
use crate::sim::{ChaseCamera, StepOutcome, Vehicle, VehicleModel};
use crate::world::{self, GenerationReport, StaticEnvironment, WorldSpan};
use rand::rngs::StdRng;

pub struct SceneState {
    span: WorldSpan,
    buffers: InstanceBuffers,
    environment: StaticEnvironment,
    vehicle: Vehicle,
    camera: ChaseCamera,
    model: VehicleModel,
    report: GenerationReport,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    /// Scene time in seconds, paused stretches excluded.
    pub time: f32,
    pub camera_position: Vec3,
    pub look_target: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Boat body transform, sway included.
    pub vehicle: Mat4,
    pub speed: f32,
    /// Render resolution in physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl FrameView {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera_position, self.look_target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

impl SceneState {
    /// Build the static bodies, run both generators and place the boat.
    pub fn build(settings: &SceneSettings, rng: &mut StdRng) -> Self {
        let span = WorldSpan::new(settings.world.span);
        let mut buffers = InstanceBuffers::new(|class| settings.capacity(class));
        let environment = StaticEnvironment::build(span, settings.world.canal_width);
        let report = world::generate(&mut buffers, settings, rng);
        let vehicle = Vehicle::new(span, settings.vehicle.clone());
        let camera = ChaseCamera::new(vehicle.world_position(), settings.camera.clone());

        Self {
            span,
            buffers,
            environment,
            vehicle,
            camera,
            model: VehicleModel::tour_boat(),
            report,
        }
    }

    /// One simulation step: boat first, then the camera chasing it.
    pub fn advance(&mut self, dt: f32, scroll: f32) -> StepOutcome {
        let outcome = self.vehicle.step(dt, scroll);
        if outcome.wrapped {
            self.camera.rebase(self.span.length());
        }
        self.camera.follow(self.vehicle.world_position(), dt);
        outcome
    }

    pub fn frame_view(&self, time: f32, pixel_ratio: f32) -> FrameView {
        let lens = self.camera.settings();
        FrameView {
            time,
            camera_position: self.camera.position(),
            look_target: self.camera.look_target(),
            fov_y: lens.fov_degrees.to_radians(),
            near: lens.near,
            far: lens.far,
            vehicle: self.vehicle.body_transform(time).matrix(),
            speed: self.vehicle.speed(),
            pixel_ratio,
        }
    }

    pub fn span(&self) -> WorldSpan {
        self.span
    }

    pub fn buffers(&self) -> &InstanceBuffers {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut InstanceBuffers {
        &mut self.buffers
    }

    pub fn environment(&self) -> &StaticEnvironment {
        &self.environment
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn camera(&self) -> &ChaseCamera {
        &self.camera
    }

    pub fn model(&self) -> &VehicleModel {
        &self.model
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ElementClass;
    use crate::rng::create_rng;

    fn scene() -> SceneState {
        SceneState::build(&SceneSettings::default(), &mut create_rng(11))
    }

    #[test]
    fn build_generates_and_marks_everything_dirty() {
        let mut state = scene();
        assert!(state.report().left.buildings > 0);
        assert!(state.buffers().len(ElementClass::Tree) > 0);
        let dirty = state.buffers_mut().take_dirty();
        assert_eq!(dirty.len(), ElementClass::ALL.len());
        assert!(state.buffers_mut().take_dirty().is_empty());
    }

    #[test]
    fn wrap_moves_camera_with_the_boat() {
        let mut state = scene();
        let mut wrapped = false;
        for _ in 0..(60 * 120) {
            let before = state.camera().position().z - state.vehicle().position();
            if state.advance(1.0 / 60.0, 1.0).wrapped {
                let after = state.camera().position().z - state.vehicle().position();
                assert!((after - before).abs() < 1.0);
                wrapped = true;
                break;
            }
        }
        assert!(wrapped);
    }

    #[test]
    fn frame_view_carries_lens_and_ratio() {
        let state = scene();
        let view = state.frame_view(0.0, 0.9);
        assert_eq!(view.pixel_ratio, 0.9);
        assert!((view.fov_y - 50f32.to_radians()).abs() < 1e-6);
        assert_eq!(view.camera_position, Vec3::new(0.0, 2.4, 32.0));
        let clip = view.view_projection(16.0 / 9.0) * view.look_target.extend(1.0);
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-4);
    }
}
