use super::frame::Frame;
use super::physics;

/// Direction change between two consecutive nodes, in degrees.
///
/// `yaw_scale` is `cos(|pitch|)` of the current node: a heading change
/// bends the track less the closer it runs to vertical.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Curvature {
    pub pitch_from_last: f32,
    pub yaw_from_last: f32,
    pub yaw_scale: f32,
    pub angle_from_last: f32,
}

impl Curvature {
    pub const ZERO: Self = Self::new(0.0, 0.0, 1.0, 0.0);

    pub const fn new(
        pitch_from_last: f32,
        yaw_from_last: f32,
        yaw_scale: f32,
        angle_from_last: f32,
    ) -> Self {
        Self {
            pitch_from_last,
            yaw_from_last,
            yaw_scale,
            angle_from_last,
        }
    }

    pub fn between(prev: Frame, curr: Frame) -> Self {
        let yaw_scale = curr.pitch().abs().cos();
        if (curr.direction - prev.direction).magnitude() < physics::EPSILON {
            return Self::new(0.0, 0.0, yaw_scale, 0.0);
        }

        let pitch = physics::wrap_angle(curr.pitch() - prev.pitch()).to_degrees();
        let yaw = physics::wrap_angle(curr.yaw() - prev.yaw()).to_degrees();
        let angle = (yaw_scale * yaw_scale * yaw * yaw + pitch * pitch).sqrt();

        Self::new(pitch, yaw, yaw_scale, angle)
    }

    pub fn is_straight(&self) -> bool {
        self.angle_from_last.abs() < physics::EPSILON
    }
}

impl Default for Curvature {
    fn default() -> Self {
        Self::ZERO
    }
}
