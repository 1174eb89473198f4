use super::curvature::Curvature;
use super::forces::Forces;
use super::frame::Frame;
use super::math::Float3;
use super::params::TrackParams;
use super::physics;

/// One simulation tick of track.
///
/// Angles (`roll`, `*_from_last`) are stored in degrees and `roll_speed` in
/// degrees per second, the units transition functions are authored in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Node {
    pub heart_position: Float3,
    pub direction: Float3,
    pub normal: Float3,
    pub lateral: Float3,
    pub roll: f32,
    pub roll_speed: f32,
    pub velocity: f32,
    pub energy: f32,
    pub spine_arc: f32,
    pub heart_arc: f32,
    pub spine_advance: f32,
    pub heart_advance: f32,
    pub pitch_from_last: f32,
    pub yaw_from_last: f32,
    pub angle_from_last: f32,
    pub normal_force: f32,
    pub lateral_force: f32,
}

impl Node {
    pub const DEFAULT: Self = Self {
        heart_position: Float3::new(0.0, 3.0, 0.0),
        direction: Float3::BACK,
        normal: Float3::DOWN,
        lateral: Float3::RIGHT,
        roll: 0.0,
        roll_speed: 0.0,
        velocity: 10.0,
        energy: 0.5 * 10.0 * 10.0 + physics::G * (3.0 - 0.9 * 1.1),
        spine_arc: 0.0,
        heart_arc: 0.0,
        spine_advance: 0.0,
        heart_advance: 0.0,
        pitch_from_last: 0.0,
        yaw_from_last: 0.0,
        angle_from_last: 0.0,
        normal_force: 1.0,
        lateral_force: 0.0,
    };

    /// Level, unrolled start node facing `yaw` degrees, carrying the energy
    /// that matches `velocity` under `params`.
    pub fn anchor(heart_position: Float3, yaw: f32, velocity: f32, params: &TrackParams) -> Self {
        let frame = Frame::DEFAULT.rotate_around(Float3::UP, yaw.to_radians());
        let mut node = Self {
            heart_position,
            direction: frame.direction,
            normal: frame.normal,
            lateral: frame.lateral,
            velocity,
            ..Self::DEFAULT
        };
        node.energy = physics::energy(
            velocity,
            node.spine_position(params.heart_offset * 0.9).y,
            node.spine_arc,
            params.friction,
        );
        node
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.direction, self.normal, self.lateral)
    }

    /// Point at `offset` along the normal, the rails for `offset == heart_offset`.
    pub fn spine_position(&self, offset: f32) -> Float3 {
        self.heart_position + self.normal * offset
    }

    /// Recomputes the normal from direction and lateral.
    pub fn update_norm(&mut self) {
        self.normal = self.direction.cross(self.lateral);
    }

    /// Recomputes `roll` (degrees) from the orientation vectors.
    pub fn update_roll(&mut self) {
        self.roll = self.frame().roll().to_degrees();
    }

    /// Rolls the node about its direction by `delta_roll` degrees.
    pub fn set_roll(&mut self, delta_roll: f32) {
        let frame = self.frame().rolled(delta_roll.to_radians());
        self.lateral = frame.lateral;
        self.normal = frame.normal;
    }

    /// Pitch in degrees.
    pub fn pitch(&self) -> f32 {
        self.frame().pitch().to_degrees()
    }

    /// Heading in degrees.
    pub fn yaw(&self) -> f32 {
        self.frame().yaw().to_degrees()
    }

    /// Yaw rate in degrees per second.
    pub fn yaw_change(&self) -> f32 {
        self.yaw_from_last * physics::HZ
    }

    /// Fills the `*_from_last` fields from the direction change since `prev`.
    pub fn update_deltas(&mut self, prev: &Node) -> Curvature {
        let curvature = Curvature::between(prev.frame(), self.frame());
        self.pitch_from_last = curvature.pitch_from_last;
        self.yaw_from_last = curvature.yaw_from_last;
        self.angle_from_last = curvature.angle_from_last;
        curvature
    }

    /// Recomputes g-forces for this node from the curvature since the previous node.
    pub fn update_forces(&mut self, curvature: Curvature) {
        let forces = Forces::compute(curvature, self.frame(), self.velocity, self.heart_advance);
        self.normal_force = forces.normal;
        self.lateral_force = forces.lateral;
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::DEFAULT
    }
}
