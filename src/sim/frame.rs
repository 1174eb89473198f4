use super::math::{Float3, Quaternion};

/// Orientation of the track at one node.
///
/// `normal` points from the heartline toward the rails, so it is down on
/// level track and always equals `direction x lateral`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub direction: Float3,
    pub normal: Float3,
    pub lateral: Float3,
}

impl Frame {
    /// Level, unrolled, heading along `-z`.
    pub const DEFAULT: Self = Self::new(Float3::BACK, Float3::DOWN, Float3::RIGHT);

    pub const fn new(direction: Float3, normal: Float3, lateral: Float3) -> Self {
        Self {
            direction,
            normal,
            lateral,
        }
    }

    /// Turns all three axes by `angle` radians around `axis`.
    pub fn rotate_around(self, axis: Float3, angle: f32) -> Self {
        let q = Quaternion::from_axis_angle(axis, angle);
        Self::new(
            q.rotate(self.direction).normalize(),
            q.rotate(self.normal).normalize(),
            q.rotate(self.lateral).normalize(),
        )
    }

    /// Banks the frame about its own direction by `delta` radians; positive
    /// lifts the lateral axis.
    pub fn rolled(self, delta: f32) -> Self {
        let lateral = Quaternion::from_axis_angle(self.direction, -delta).rotate(self.lateral);
        Self::new(self.direction, self.direction.cross(lateral), lateral)
    }

    /// Bank angle in radians.
    pub fn roll(self) -> f32 {
        self.lateral.y.atan2(-self.normal.y)
    }

    pub fn pitch(self) -> f32 {
        let d = self.direction;
        d.y.atan2(d.x.hypot(d.z))
    }

    pub fn yaw(self) -> f32 {
        (-self.direction.x).atan2(-self.direction.z)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::DEFAULT
    }
}
