use std::f32::consts::{PI, TAU};

/// Standard gravity in m/s².
pub const G: f32 = 9.80665;
/// Simulation ticks per second; one node is generated per tick.
pub const HZ: f32 = 1000.0;
pub const EPSILON: f32 = f32::EPSILON;
/// Below this speed (m/s) integration stops.
pub const MIN_VELOCITY: f32 = 0.1;
pub const MAX_ITERATIONS: usize = 10_000_000;

/// Folds an angle difference in radians into `[-PI, PI]`.
pub fn wrap_angle(rad: f32) -> f32 {
    if (-PI..=PI).contains(&rad) {
        rad
    } else {
        (rad + PI).rem_euclid(TAU) - PI
    }
}

/// Cubic ease `3t² - 2t³`, shared by cubic transitions and lead-in/lead-out blending.
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 + t * -2.0)
}

/// Total energy per unit mass of a train at `velocity`.
///
/// Friction is folded in as a potential term proportional to the travelled
/// spine length, so energy stays constant on a frictionless, drag-free track.
///
/// # Arguments
/// * `velocity` - Train velocity in m/s
/// * `height` - Height of the center of mass
/// * `travelled` - Spine arc length from the track start
/// * `friction` - Friction coefficient
pub fn energy(velocity: f32, height: f32, travelled: f32, friction: f32) -> f32 {
    0.5 * velocity * velocity + G * (height + travelled * friction)
}

/// Energy lost to air resistance over one tick.
pub fn resistance_loss(velocity: f32, resistance: f32) -> f32 {
    velocity * velocity * velocity / HZ * resistance
}

/// Back out velocity from total energy, or `None` when the kinetic part is
/// negative (the train cannot reach this height).
pub fn velocity_from_energy(energy: f32, height: f32, travelled: f32, friction: f32) -> Option<f32> {
    let kinetic = 2.0 * (energy - G * (height + travelled * friction));
    if kinetic >= 0.0 {
        Some(kinetic.sqrt())
    } else {
        None
    }
}
