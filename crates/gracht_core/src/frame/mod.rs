//! Frame scheduling
//!
//! Per-frame orchestration: delta time, the visibility gate, the simulation
//! step and adaptive render resolution.

mod quality;
mod scheduler;

pub use quality::QualityController;
pub use scheduler::FrameScheduler;
