//! Scroll-driven cruising over the tiled span.

use gracht_core::lifecycle::TickOutcome;
use gracht_core::rng::create_rng;
use gracht_core::settings::VehicleSettings;
use gracht_core::sim::Vehicle;
use gracht_core::{
    DirtyUpload, FrameView, MountedScene, RenderTarget, SceneSettings, SceneState, Signal,
    SurfaceSize, WorldSpan,
};
use std::convert::Infallible;
use std::time::Duration;

const DT: f32 = 1.0 / 60.0;
const L: f32 = 600.0;

fn boat() -> Vehicle {
    Vehicle::new(WorldSpan::new(L), VehicleSettings::default())
}

/// Draws nothing; the cruise is read back from the scene state.
struct Blank;

impl RenderTarget for Blank {
    type Error = Infallible;

    fn upload(&mut self, _scene: &SceneState, _dirty: &[DirtyUpload]) {}

    fn resize(&mut self, _size: SurfaceSize) {}

    fn render(&mut self, _frame: &FrameView) -> Result<(), Infallible> {
        Ok(())
    }

    fn release(self) {}
}

#[test]
fn half_scroll_cruises_at_half_speed() {
    let scroll = Signal::new(0.0);
    let visible = Signal::new(true);
    let settings = SceneSettings {
        seed: Some(4),
        ..SceneSettings::default()
    };
    assert_eq!(settings.world.span, L);
    let mut scene = MountedScene::mount(
        Some(SurfaceSize::new(1280, 720, 1.0)),
        &settings,
        &scroll,
        &visible,
        |_| Ok::<_, Infallible>(Blank),
    )
    .unwrap()
    .expect("surface is drawable");

    scroll.set(0.5);
    for n in 0..=600u64 {
        let outcome = scene.tick(Duration::from_micros(n * 16_667)).unwrap();
        assert_eq!(outcome, TickOutcome::Rendered);
    }

    let boat = scene.state().vehicle();
    assert!((boat.target_speed() - 1.0).abs() < 1e-6);
    assert!((boat.speed() - 1.0).abs() <= 0.01, "speed {}", boat.speed());
    assert!(boat.position() < 25.0 - 40.0, "only reached {}", boat.position());
    assert!(boat.position() >= -L);
    scene.unmount();
    assert_eq!(scroll.observer_count(), 0);
}

#[test]
fn full_scroll_wraps_by_exactly_the_span() {
    let mut v = boat();
    let mut wraps = 0;
    for _ in 0..(60 * 200) {
        let before = v.position();
        let outcome = v.step(DT, 1.0);
        let travelled = v.speed() * 5.0 * DT;
        if outcome.wrapped {
            wraps += 1;
            assert!((v.position() - (before - travelled + L)).abs() < 1e-3);
        } else {
            assert!(v.position() <= before);
        }
        assert!(v.position() >= -L);
    }
    assert!(wraps >= 3);
    assert!((v.speed() - 2.0).abs() < 1e-3);
}

#[test]
fn releasing_the_scroll_coasts_to_a_stop() {
    let mut v = boat();
    for _ in 0..300 {
        v.step(DT, 1.0);
    }
    for _ in 0..(60 * 10) {
        v.step(DT, 0.0);
    }
    assert_eq!(v.speed(), 0.0);
    let parked = v.position();
    v.step(DT, 0.0);
    assert_eq!(v.position(), parked);
}

#[test]
fn camera_keeps_its_distance_across_the_seam() {
    let settings = SceneSettings::default();
    let mut state = SceneState::build(&settings, &mut create_rng(21));
    let mut previous = state.camera().position().z - state.vehicle().position();
    let mut wraps = 0;
    for _ in 0..(60 * 120) {
        if state.advance(DT, 1.0).wrapped {
            wraps += 1;
        }
        let gap = state.camera().position().z - state.vehicle().position();
        // Offset of 7 plus at most the smoothing lag at top speed.
        assert!((7.0..9.5).contains(&gap), "camera drifted to {gap}");
        assert!((gap - previous).abs() < 0.1, "camera jumped at the seam");
        previous = gap;
    }
    assert!(wraps >= 1);
}
