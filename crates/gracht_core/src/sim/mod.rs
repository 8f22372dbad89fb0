//! Vehicle & camera simulation
//!
//! Continuous, state-machine-free: each frame the scroll-derived throttle
//! pulls the boat's speed toward a target, the boat advances and wraps at the
//! loop point, and a smoothed camera trails it.

mod camera;
mod model;
mod vehicle;

pub use camera::ChaseCamera;
pub use model::{PartShape, VehicleModel, VehiclePart};
pub use vehicle::{StepOutcome, Vehicle};
