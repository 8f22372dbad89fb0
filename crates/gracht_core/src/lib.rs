//! Gracht Core
//!
//! Engine-independent heart of the canal scene:
//! - Fixed-capacity instance buffers per element class
//! - Periodic (tiled) world generation: façades and street furniture
//! - Throttle-to-speed vehicle simulation with a chase camera
//! - Frame scheduling, visibility pausing and resolution scaling
//! - Mount/unmount lifecycle over a pluggable render target

pub mod frame;
pub mod instance;
pub mod lifecycle;
pub mod math;
pub mod rng;
pub mod scene;
pub mod settings;
pub mod signal;
pub mod sim;
pub mod time;
pub mod world;

pub use glam;

pub use instance::{DirtyUpload, ElementClass, InstanceBuffers, InstanceError, InstanceRecord};
pub use lifecycle::{MountedScene, RenderTarget, SurfaceSize, TickOutcome};
pub use scene::{FrameView, SceneState};
pub use settings::{SceneSettings, SettingsError};
pub use signal::{Signal, Subscription};
pub use world::WorldSpan;

/// Scene version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
