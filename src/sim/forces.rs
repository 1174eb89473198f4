use super::curvature::Curvature;
use super::frame::Frame;
use super::math::Float3;
use super::physics;

/// Normal and lateral g-forces felt on the heartline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Forces {
    pub normal: f32,
    pub lateral: f32,
}

impl Forces {
    pub const ONE_G: Self = Self::new(1.0, 0.0);

    pub const fn new(normal: f32, lateral: f32) -> Self {
        Self { normal, lateral }
    }

    /// Forces after one tick of `curvature`.
    ///
    /// Pitch and yaw changes are rotated into the rolled frame, scaled into
    /// lateral and normal accelerations, and added to the `(0, 1, 0)` gravity
    /// baseline before projecting onto the node axes.
    pub fn compute(curvature: Curvature, frame: Frame, velocity: f32, heart_advance: f32) -> Self {
        let force_vec = if curvature.is_straight() {
            Float3::UP
        } else {
            let roll = frame.roll();
            let (sin_roll, cos_roll) = roll.sin_cos();
            let pitch = curvature.pitch_from_last;
            let yaw = curvature.yaw_scale * curvature.yaw_from_last;

            let normal_angle = (-pitch * cos_roll - yaw * sin_roll).to_radians();
            let lateral_angle = (pitch * sin_roll - yaw * cos_roll).to_radians();

            Float3::UP
                + frame.lateral * (lateral_angle * velocity * physics::HZ / physics::G)
                + frame.normal
                    * (normal_angle * heart_advance * physics::HZ * physics::HZ / physics::G)
        };

        Self::new(
            -force_vec.dot(frame.normal.normalize()),
            -force_vec.dot(frame.lateral.normalize()),
        )
    }
}

impl Default for Forces {
    fn default() -> Self {
        Self::ONE_G
    }
}
