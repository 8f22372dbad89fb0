//! Mount / unmount lifecycle
//!
//! A [`MountedScene`] owns the scene state, the frame scheduler, the render
//! target and the signal subscriptions feeding it. Mounting without a usable
//! surface is a no-op; unmounting consumes the scene, so teardown happens
//! exactly once and nothing can tick afterwards.

use crate::frame::FrameScheduler;
use crate::instance::DirtyUpload;
use crate::rng::{clock_seed, create_rng};
use crate::scene::{FrameView, SceneState};
use crate::settings::SceneSettings;
use crate::signal::{Signal, Subscription};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Drawable surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub scale_factor: f32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, scale_factor: f32) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn logical(&self) -> (f32, f32) {
        let scale = self.scale_factor.max(f32::EPSILON);
        (self.width as f32 / scale, self.height as f32 / scale)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Whatever draws the scene: a GPU renderer in the app, a recorder in tests.
pub trait RenderTarget {
    type Error: std::error::Error + 'static;

    /// Send freshly generated data. `dirty` names the instance classes whose
    /// records changed since the last upload.
    fn upload(&mut self, scene: &SceneState, dirty: &[DirtyUpload]);

    fn resize(&mut self, size: SurfaceSize);

    fn render(&mut self, frame: &FrameView) -> Result<(), Self::Error>;

    /// Free every resource the target holds.
    fn release(self);
}

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered,
    /// Hidden; keep polling but nothing was drawn.
    Paused,
    /// The loop was stopped; do not schedule another tick.
    Stopped,
}

impl TickOutcome {
    pub fn reschedule(self) -> bool {
        !matches!(self, TickOutcome::Stopped)
    }
}

pub struct MountedScene<R: RenderTarget> {
    state: SceneState,
    scheduler: FrameScheduler,
    target: R,
    scroll: Rc<Cell<f32>>,
    visible: Rc<Cell<bool>>,
    subscriptions: Vec<Subscription>,
    running: bool,
}

impl<R: RenderTarget> MountedScene<R> {
    /// Generate the world, create the render target and start listening to
    /// the host signals. Returns `Ok(None)` when there is no surface to
    /// draw into.
    pub fn mount<E>(
        surface: Option<SurfaceSize>,
        settings: &SceneSettings,
        scroll: &Signal<f32>,
        visibility: &Signal<bool>,
        create_target: impl FnOnce(SurfaceSize) -> Result<R, E>,
    ) -> Result<Option<Self>, E> {
        let Some(surface) = surface.filter(|s| !s.is_empty()) else {
            tracing::debug!("no drawable surface; scene not mounted");
            return Ok(None);
        };

        let seed = settings.seed.unwrap_or_else(clock_seed);
        let mut rng = create_rng(seed);
        let mut state = SceneState::build(settings, &mut rng);

        let mut target = create_target(surface)?;
        let dirty = state.buffers_mut().take_dirty();
        target.upload(&state, &dirty);

        let latest_scroll = Rc::new(Cell::new(scroll.get()));
        let latest_visible = Rc::new(Cell::new(visibility.get()));
        let subscriptions = vec![
            {
                let cell = Rc::clone(&latest_scroll);
                scroll.subscribe(move |v| cell.set(v))
            },
            {
                let cell = Rc::clone(&latest_visible);
                visibility.subscribe(move |v| cell.set(v))
            },
        ];

        tracing::info!(
            seed,
            width = surface.width,
            height = surface.height,
            records = state.buffers().total_len(),
            "scene mounted"
        );

        Ok(Some(Self {
            state,
            scheduler: FrameScheduler::new(settings, surface.scale_factor),
            target,
            scroll: latest_scroll,
            visible: latest_visible,
            subscriptions,
            running: true,
        }))
    }

    /// One host frame at time `now` (since mount).
    pub fn tick(&mut self, now: Duration) -> Result<TickOutcome, R::Error> {
        if !self.running {
            return Ok(TickOutcome::Stopped);
        }
        let frame = self.scheduler.tick(
            now,
            self.visible.get(),
            self.scroll.get(),
            &mut self.state,
        );
        match frame {
            Some(view) => {
                self.target.render(&view)?;
                Ok(TickOutcome::Rendered)
            }
            None => Ok(TickOutcome::Paused),
        }
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.scheduler.quality_mut().set_device_ratio(size.scale_factor);
        self.target.resize(size);
    }

    /// Stop ticking without tearing down; later ticks report `Stopped`.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Detach from the host signals and release the render target.
    pub fn unmount(self) {
        let Self {
            target,
            subscriptions,
            state,
            ..
        } = self;
        for subscription in subscriptions {
            subscription.unsubscribe();
        }
        target.release();
        tracing::info!(records = state.buffers().total_len(), "scene unmounted");
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn target(&self) -> &R {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Recorder {
        uploads: Vec<usize>,
        frames: usize,
        sizes: Vec<SurfaceSize>,
        released: Rc<Cell<usize>>,
    }

    impl RenderTarget for Recorder {
        type Error = Infallible;

        fn upload(&mut self, _scene: &SceneState, dirty: &[DirtyUpload]) {
            self.uploads.push(dirty.len());
        }

        fn resize(&mut self, size: SurfaceSize) {
            self.sizes.push(size);
        }

        fn render(&mut self, _frame: &FrameView) -> Result<(), Infallible> {
            self.frames += 1;
            Ok(())
        }

        fn release(self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn settings() -> SceneSettings {
        SceneSettings {
            seed: Some(9),
            ..SceneSettings::default()
        }
    }

    fn mount(
        surface: Option<SurfaceSize>,
        scroll: &Signal<f32>,
        visible: &Signal<bool>,
    ) -> Option<MountedScene<Recorder>> {
        MountedScene::mount(surface, &settings(), scroll, visible, |_| {
            Ok::<_, Infallible>(Recorder::default())
        })
        .unwrap()
    }

    #[test]
    fn missing_surface_is_a_no_op() {
        let scroll = Signal::new(0.0);
        let visible = Signal::new(true);
        assert!(mount(None, &scroll, &visible).is_none());
        assert!(mount(Some(SurfaceSize::new(0, 600, 1.0)), &scroll, &visible).is_none());
        assert_eq!(scroll.observer_count(), 0);
    }

    #[test]
    fn mount_uploads_once_and_subscribes() {
        let scroll = Signal::new(0.0);
        let visible = Signal::new(true);
        let scene = mount(Some(SurfaceSize::new(800, 600, 1.0)), &scroll, &visible).unwrap();
        assert_eq!(scene.target().uploads, vec![21]);
        assert_eq!(scroll.observer_count(), 1);
        assert_eq!(visible.observer_count(), 1);
    }

    #[test]
    fn ticks_follow_visibility_and_stop() {
        let scroll = Signal::new(0.5);
        let visible = Signal::new(true);
        let mut scene = mount(Some(SurfaceSize::new(800, 600, 1.0)), &scroll, &visible).unwrap();

        assert_eq!(scene.tick(Duration::ZERO).unwrap(), TickOutcome::Rendered);
        visible.set(false);
        assert_eq!(scene.tick(Duration::from_millis(16)).unwrap(), TickOutcome::Paused);
        visible.set(true);
        assert_eq!(scene.tick(Duration::from_millis(32)).unwrap(), TickOutcome::Rendered);
        assert_eq!(scene.target().frames, 2);

        scene.stop();
        let outcome = scene.tick(Duration::from_millis(48)).unwrap();
        assert!(!outcome.reschedule());
        assert_eq!(scene.target().frames, 2);
    }

    #[test]
    fn resize_ignores_empty_surfaces() {
        let scroll = Signal::new(0.0);
        let visible = Signal::new(true);
        let mut scene = mount(Some(SurfaceSize::new(800, 600, 2.0)), &scroll, &visible).unwrap();
        scene.resize(SurfaceSize::new(0, 0, 2.0));
        scene.resize(SurfaceSize::new(1024, 768, 1.0));
        assert_eq!(scene.target().sizes, vec![SurfaceSize::new(1024, 768, 1.0)]);
        assert_eq!(scene.scheduler().quality().ceiling(), 1.0);
    }

    #[test]
    fn unmount_releases_once_and_detaches() {
        let scroll = Signal::new(0.0);
        let visible = Signal::new(true);
        let released = Rc::new(Cell::new(0));
        let counter = Rc::clone(&released);
        let scene = MountedScene::mount(
            Some(SurfaceSize::new(640, 480, 1.0)),
            &settings(),
            &scroll,
            &visible,
            move |_| {
                Ok::<_, Infallible>(Recorder {
                    released: counter,
                    ..Recorder::default()
                })
            },
        )
        .unwrap()
        .unwrap();

        scene.unmount();
        assert_eq!(released.get(), 1);
        assert_eq!(scroll.observer_count(), 0);
        assert_eq!(visible.observer_count(), 0);
        scroll.set(1.0);
    }
}
