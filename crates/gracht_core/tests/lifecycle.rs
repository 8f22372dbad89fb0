//! Mount, hide, resume and tear down against a recording render target.

use gracht_core::lifecycle::TickOutcome;
use gracht_core::{
    DirtyUpload, FrameView, MountedScene, RenderTarget, SceneSettings, SceneState, Signal,
    SurfaceSize,
};
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
struct Log {
    uploaded_classes: usize,
    frames: Vec<FrameView>,
    releases: usize,
}

struct Recorder(Rc<RefCell<Log>>);

impl RenderTarget for Recorder {
    type Error = Infallible;

    fn upload(&mut self, _scene: &SceneState, dirty: &[DirtyUpload]) {
        self.0.borrow_mut().uploaded_classes += dirty.len();
    }

    fn resize(&mut self, _size: SurfaceSize) {}

    fn render(&mut self, frame: &FrameView) -> Result<(), Infallible> {
        self.0.borrow_mut().frames.push(*frame);
        Ok(())
    }

    fn release(self) {
        self.0.borrow_mut().releases += 1;
    }
}

struct Host {
    scroll: Signal<f32>,
    visible: Signal<bool>,
    log: Rc<RefCell<Log>>,
    scene: MountedScene<Recorder>,
}

fn mount() -> Host {
    let scroll = Signal::new(0.0);
    let visible = Signal::new(true);
    let log = Rc::new(RefCell::new(Log::default()));
    let settings = SceneSettings {
        seed: Some(1),
        ..SceneSettings::default()
    };
    let sink = Rc::clone(&log);
    let scene = MountedScene::mount(
        Some(SurfaceSize::new(1280, 720, 2.0)),
        &settings,
        &scroll,
        &visible,
        move |_| Ok::<_, Infallible>(Recorder(sink)),
    )
    .unwrap()
    .expect("surface is drawable");
    Host {
        scroll,
        visible,
        log,
        scene,
    }
}

fn frame(n: u64) -> Duration {
    Duration::from_micros(n * 16_667)
}

#[test]
fn hidden_scene_freezes_and_resumes_where_it_left_off() {
    let mut host = mount();
    host.scroll.set(1.0);
    for n in 0..120 {
        host.scene.tick(frame(n)).unwrap();
    }
    let position = host.scene.state().vehicle().position();
    let speed = host.scene.state().vehicle().speed();
    let ratio = host.scene.scheduler().quality().ratio();
    let frames = host.log.borrow().frames.len();

    host.visible.set(false);
    for n in 120..600 {
        assert_eq!(host.scene.tick(frame(n)).unwrap(), TickOutcome::Paused);
    }
    assert_eq!(host.scene.state().vehicle().position(), position);
    assert_eq!(host.scene.state().vehicle().speed(), speed);
    assert_eq!(host.scene.scheduler().quality().ratio(), ratio);
    assert_eq!(host.log.borrow().frames.len(), frames);

    host.visible.set(true);
    assert_eq!(host.scene.tick(frame(600)).unwrap(), TickOutcome::Rendered);
    let moved = position - host.scene.state().vehicle().position();
    assert!(moved > 0.0 && moved < 0.5, "resumed with a jump of {moved}");
}

#[test]
fn scroll_pushes_reach_the_next_frame() {
    let mut host = mount();
    host.scene.tick(frame(0)).unwrap();
    host.scroll.set(0.8);
    host.scene.tick(frame(1)).unwrap();
    assert!((host.scene.state().vehicle().target_speed() - 1.6).abs() < 1e-6);
}

#[test]
fn water_clock_pauses_with_the_scene() {
    let mut host = mount();
    for n in 0..60 {
        host.scene.tick(frame(n)).unwrap();
    }
    host.visible.set(false);
    host.scene.tick(frame(1_000)).unwrap();
    host.visible.set(true);
    host.scene.tick(frame(1_001)).unwrap();

    let log = host.log.borrow();
    let times: Vec<f32> = log.frames.iter().map(|f| f.time).collect();
    let last = times[times.len() - 1];
    let prior = times[times.len() - 2];
    assert!(last - prior < 0.02);
}

#[test]
fn teardown_releases_once_and_ignores_later_pushes() {
    let host = mount();
    assert_eq!(host.log.borrow().uploaded_classes, 21);
    host.scene.unmount();
    assert_eq!(host.log.borrow().releases, 1);
    assert_eq!(host.scroll.observer_count(), 0);
    assert_eq!(host.visible.observer_count(), 0);
    host.scroll.set(0.3);
    host.visible.set(false);
}
