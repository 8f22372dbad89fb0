//! Gracht Render
//!
//! wgpu renderer for the canal scene: per-class instanced meshes, the static
//! quays and water, the boat, and resolution-scaled presentation.

pub mod error;
pub mod geometry;
pub mod instances;
pub mod materials;
pub mod renderer;
pub mod target;
pub mod window;

pub use error::RenderError;
pub use renderer::SceneRenderer;
pub use window::{surface_size, window_attributes, WindowConfig};

pub use wgpu;
pub use winit;
