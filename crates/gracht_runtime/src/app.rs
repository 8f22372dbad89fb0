//! Winit application: one window hosting one mounted scene.

use crate::config::Config;
use crate::host::VirtualPage;
use gracht_core::{MountedScene, Signal, SurfaceSize, TickOutcome};
use gracht_metrics::FrameStats;
use gracht_render::{surface_size, window_attributes, wgpu, RenderError, SceneRenderer};
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Rendered frames between statistics log lines.
const STATS_EVERY: u64 = 240;

pub struct App {
    config: Config,
    window: Option<Arc<Window>>,
    scene: Option<MountedScene<SceneRenderer>>,
    page: Option<VirtualPage>,
    scroll: Signal<f32>,
    visibility: Signal<bool>,
    occluded: bool,
    minimized: bool,
    mounted_at: Instant,
    last_frame: Option<Instant>,
    stats: FrameStats,
    /// First fatal error; reported by `main` after the loop exits.
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            window: None,
            scene: None,
            page: None,
            scroll: Signal::new(0.0),
            visibility: Signal::new(true),
            occluded: false,
            minimized: false,
            mounted_at: Instant::now(),
            last_frame: None,
            stats: FrameStats::new(120),
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error.get_or_insert(error);
        self.teardown();
        event_loop.exit();
    }

    fn teardown(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.unmount();
        }
    }

    /// Mount once the window has a drawable size; no-op while it has none.
    fn try_mount(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if self.scene.is_some() {
            return;
        }
        let size = surface_size(&window);
        let mounted = MountedScene::mount(
            Some(size),
            &self.config.scene,
            &self.scroll,
            &self.visibility,
            |size| pollster::block_on(SceneRenderer::new(window.clone(), size)),
        );
        match mounted {
            Ok(scene) => {
                if scene.is_some() {
                    self.mounted_at = Instant::now();
                    self.last_frame = None;
                }
                self.scene = scene;
            }
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("failed to mount")),
        }
    }

    /// Push the host page state into the scene's signals.
    fn publish(&self) {
        let Some(page) = &self.page else {
            return;
        };
        self.scroll.set(page.progress());
        self.visibility
            .set(!self.occluded && !self.minimized && page.section_in_view());
    }

    fn scroll_page(&mut self, apply: impl FnOnce(&mut VirtualPage)) {
        if let Some(page) = &mut self.page {
            apply(page);
            tracing::trace!(offset = page.offset(), progress = page.progress(), "page scrolled");
        }
        self.publish();
    }

    fn handle_resize(&mut self, event_loop: &ActiveEventLoop, size: SurfaceSize) {
        self.minimized = size.is_empty();
        if !self.minimized {
            if let Some(page) = &mut self.page {
                page.set_viewport(size.logical().1);
            }
            tracing::info!(
                width = size.width,
                height = size.height,
                scale = size.scale_factor,
                "resized"
            );
        }
        self.publish();
        match &mut self.scene {
            Some(scene) => scene.resize(size),
            None => self.try_mount(event_loop),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: &Key) {
        match key {
            Key::Named(NamedKey::PageDown | NamedKey::Space) => {
                self.scroll_page(|p| p.scroll_pages(1.0))
            }
            Key::Named(NamedKey::PageUp) => self.scroll_page(|p| p.scroll_pages(-1.0)),
            Key::Named(NamedKey::ArrowDown) => self.scroll_page(|p| p.scroll_lines(1.0)),
            Key::Named(NamedKey::ArrowUp) => self.scroll_page(|p| p.scroll_lines(-1.0)),
            Key::Named(NamedKey::Home) => self.scroll_page(|p| p.scroll_by(-p.page_length())),
            Key::Named(NamedKey::End) => self.scroll_page(|p| p.scroll_by(p.page_length())),
            Key::Named(NamedKey::Escape) => {
                self.teardown();
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        let now = Instant::now();
        match scene.tick(now - self.mounted_at) {
            Ok(TickOutcome::Rendered) => {
                if let Some(last) = self.last_frame {
                    let dt = (now - last).as_secs_f32();
                    self.stats
                        .record_frame(dt, scene.scheduler().quality().ratio());
                }
                self.last_frame = Some(now);
                if self.stats.is_due(STATS_EVERY) {
                    let s = self.stats.summary();
                    tracing::debug!(
                        fps = s.fps,
                        frame_ms = s.frame_ms,
                        worst_ms = s.worst_ms,
                        pixel_ratio = s.pixel_ratio,
                        rendered = s.rendered,
                        paused = s.paused,
                        speed = scene.state().vehicle().speed(),
                        "frame stats"
                    );
                }
            }
            Ok(TickOutcome::Paused) => {
                self.stats.record_pause();
                self.last_frame = None;
            }
            Ok(TickOutcome::Stopped) => {}
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                self.fail(
                    event_loop,
                    anyhow::anyhow!("graphics device ran out of memory"),
                );
            }
            Err(e) => tracing::warn!("frame skipped: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = window_attributes(&self.config.runtime.window);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("failed to open window"));
                return;
            }
        };
        let size = surface_size(&window);
        self.page = Some(VirtualPage::new(
            self.config.runtime.host.clone(),
            size.logical().1,
        ));
        self.minimized = size.is_empty();
        self.window = Some(window);
        self.publish();
        self.try_mount(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let scale = self
                    .window
                    .as_ref()
                    .map_or(1.0, |w| w.scale_factor() as f32);
                self.handle_resize(
                    event_loop,
                    SurfaceSize::new(size.width, size.height, scale),
                );
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = self.window.clone() {
                    self.handle_resize(event_loop, surface_size(&window));
                }
            }
            WindowEvent::Occluded(occluded) => {
                self.occluded = occluded;
                self.publish();
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.scroll_page(|p| p.scroll_lines(-y)),
                MouseScrollDelta::PixelDelta(pos) => {
                    let scale = self
                        .window
                        .as_ref()
                        .map_or(1.0, |w| w.scale_factor());
                    let dy = (pos.y / scale) as f32;
                    self.scroll_page(|p| p.scroll_by(-dy));
                }
            },
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.handle_key(event_loop, &event.logical_key);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let running = self.scene.as_ref().is_some_and(|s| s.is_running());
        if let (true, Some(window)) = (running, &self.window) {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
