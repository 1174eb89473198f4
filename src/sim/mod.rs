//! Pure physics/math primitives for FVD simulation.
//!
//! Nothing here depends on the function or section layers.

mod curvature;
mod forces;
mod frame;
mod math;
mod node;
mod params;

pub mod physics;

pub use curvature::Curvature;
pub use forces::Forces;
pub use frame::Frame;
pub use math::{Float3, Quaternion};
pub use node::Node;
pub use params::TrackParams;
pub use physics::{smoothstep, wrap_angle, EPSILON, G, HZ, MAX_ITERATIONS, MIN_VELOCITY};
