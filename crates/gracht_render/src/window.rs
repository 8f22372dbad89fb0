//! Window management
//!
//! Window attributes for the scene's host window (winit 0.30+ API: the
//! window itself is created inside `ApplicationHandler::resumed`).

use gracht_core::SurfaceSize;
use serde::{Deserialize, Serialize};
use winit::window::Window;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gracht".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> winit::window::WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}

/// Current drawable size of `window`.
pub fn surface_size(window: &Window) -> SurfaceSize {
    let size = window.inner_size();
    SurfaceSize::new(size.width, size.height, window.scale_factor() as f32)
}
