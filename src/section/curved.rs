use std::f32::consts::PI;

use super::view::TrackView;
use super::{ArgumentKind, Orientation, Section, SectionKind, UpdateContext};
use crate::function::{EvalContext, FuncType, Function, Subfunction};
use crate::persistence::{ByteReader, ByteWriter, PersistenceError};
use crate::sim::{physics, Float3, Node, Quaternion};

pub const CURVED_MAGIC: &[u8; 3] = b"CUR";

/// Constant-radius bend with a roll-rate function over the ridden angle.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvedSection {
    pub name: String,
    /// Cruise speed used when not speed controlled.
    pub velocity: f32,
    /// Degrees over which the bend rate ramps up from zero.
    pub lead_in: f32,
    /// Degrees over which the bend rate ramps back down.
    pub lead_out: f32,
    pub speed_controlled: bool,
    pub orientation: Orientation,
    pub argument: ArgumentKind,
    angle: f32,
    radius: f32,
    direction: f32,
    roll_func: Function,
    angles: Vec<f32>,
    length: f32,
}

impl CurvedSection {
    pub fn new(angle: f32, radius: f32) -> Self {
        let lead = (angle / 3.0).min(10.0);
        let mut roll_func = Function::new(0.0, 10.0, 0.0, 0.0, FuncType::Roll);
        roll_func.set_max_argument(angle);

        Self {
            name: String::new(),
            velocity: 10.0,
            lead_in: lead,
            lead_out: lead,
            speed_controlled: false,
            orientation: Orientation::Quaternion,
            argument: ArgumentKind::Time,
            angle,
            radius,
            direction: 90.0,
            roll_func,
            angles: vec![0.0],
            length: 0.0,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Bend direction in degrees around the track; 90 turns flat, 0 and 180 pitch.
    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn roll_func(&self) -> &Function {
        &self.roll_func
    }

    pub fn roll_func_mut(&mut self) -> &mut Function {
        &mut self.roll_func
    }

    /// Ridden angle at every generated node.
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    /// Changes the bend geometry and stretches the roll function over the new
    /// angle. Nodes are stale until the next update.
    pub fn change_curve(&mut self, angle: f32, radius: f32, direction: f32) {
        self.angle = angle;
        self.radius = radius;
        self.direction = direction;
        self.length = 0.0;
        self.roll_func.set_max_argument(angle);
    }

    fn write_body(&self, writer: &mut ByteWriter) {
        writer.write_bool(self.speed_controlled);
        writer.write_i32(self.name.len() as i32);
        writer.write_raw(self.name.as_bytes());
        writer.write_f32(self.velocity);
        writer.write_f32(self.angle);
        writer.write_f32(self.radius);
        writer.write_f32(self.direction);
        writer.write_f32(self.lead_in);
        writer.write_f32(self.lead_out);
        writer.write_bool(self.orientation.is_euler());
        self.roll_func.save(writer);
    }

    fn read_body(&mut self, reader: &mut ByteReader) -> Result<(), PersistenceError> {
        let speed_controlled = reader.read_bool()?;
        let name_length = reader.read_i32()?;
        let name_length = usize::try_from(name_length).map_err(|_| PersistenceError::InvalidCount(name_length))?;
        let name = reader.read_string(name_length)?;
        let velocity = reader.read_f32()?;
        let angle = reader.read_f32()?;
        let radius = reader.read_f32()?;
        let direction = reader.read_f32()?;
        let lead_in = reader.read_f32()?;
        let lead_out = reader.read_f32()?;
        let orientation = Orientation::from_bool(reader.read_bool()?);
        let roll_func = Function::read(reader, FuncType::Roll)?;

        *self = Self {
            name,
            velocity,
            lead_in,
            lead_out,
            speed_controlled,
            orientation,
            argument: self.argument,
            angle,
            radius,
            direction,
            roll_func,
            angles: vec![0.0],
            length: 0.0,
        };
        Ok(())
    }
}

impl Section for CurvedSection {
    fn kind(&self) -> SectionKind {
        SectionKind::Curved
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn max_argument(&self) -> f32 {
        self.roll_func.max_argument()
    }

    fn length(&self) -> f32 {
        self.length
    }

    fn update_section(&mut self, nodes: &mut Vec<Node>, ctx: &UpdateContext) {
        self.length = 0.0;
        self.angle = self.roll_func.max_argument();
        self.angles.clear();
        self.angles.push(0.0);

        if nodes.is_empty() {
            log::warn!("curved section updated without a start node");
            return;
        }
        nodes.truncate(1);
        nodes[0].update_norm();

        let mut start_rate = nodes[0].roll_speed;
        if self.orientation.is_euler() {
            start_rate += nodes[0].direction.dot(Float3::UP) * nodes[0].yaw_change();
        }
        self.roll_func.translate_start(start_rate);

        let heart = ctx.params.heart_offset;
        let friction = ctx.params.friction;
        let first_arc = nodes[0].spine_arc;

        let mut ridden = 0.0f32;
        let mut artificial_roll = 0.0f32;
        let mut lead_out_arc: Option<f32> = None;
        let mut lead_out_span = 0.0f32;
        let mut iterations = 0;

        while ridden < self.angle - physics::EPSILON {
            iterations += 1;
            if iterations > physics::MAX_ITERATIONS {
                log::warn!("curved section stopped after {} iterations", physics::MAX_ITERATIONS);
                break;
            }

            let prev = nodes[nodes.len() - 1];
            let mut delta = prev.velocity / self.radius / physics::HZ * 180.0 / PI;

            if self.lead_in > 0.0 {
                let trans = (prev.spine_arc - first_arc)
                    / (1.997 / physics::HZ * prev.velocity / delta * self.lead_in);
                if trans <= 1.0 {
                    delta *= physics::smoothstep(trans);
                }
            }

            if lead_out_arc.is_none() && ridden > self.angle - self.lead_out {
                lead_out_arc = Some(prev.spine_arc);
                lead_out_span = self.angle - ridden;
            }
            if let Some(start_arc) = lead_out_arc {
                if self.lead_out > 0.0 {
                    let trans = 1.0
                        - (prev.spine_arc - start_arc)
                            / (1.997 / physics::HZ * prev.velocity / delta * lead_out_span);
                    if trans >= 0.0 {
                        delta *= physics::smoothstep(trans);
                    } else {
                        break;
                    }
                }
            }

            if prev.velocity < physics::MIN_VELOCITY {
                log::warn!("train goes very slowly");
                break;
            }

            let mut cur = prev;
            ridden += delta;
            self.angles.push(ridden);
            cur.update_norm();

            let pure_direction = (-(self.direction - artificial_roll)).to_radians();
            let axis = prev.lateral * pure_direction.cos() + prev.normal * pure_direction.sin();
            let bend = Quaternion::from_axis_angle(axis, delta.to_radians());
            cur.direction = bend.rotate(prev.direction).normalize();
            cur.lateral = bend.rotate(prev.lateral).normalize();
            cur.update_norm();

            let half_step = cur.velocity / (2.0 * physics::HZ);
            cur.heart_position = cur.heart_position
                + cur.direction * half_step
                + prev.direction * half_step
                + (prev.spine_position(heart) - cur.spine_position(heart));

            nodes.push(cur);
            let roll_rate = {
                let view = TrackView::new(ctx.preceding, &nodes[..], self.orientation);
                let eval = EvalContext::new(self.angle).with_track(&view);
                self.roll_func.get_value(ridden, &eval)
            };
            let last = nodes.len() - 1;
            let cur = &mut nodes[last];

            cur.set_roll(roll_rate / physics::HZ);
            cur.roll_speed = roll_rate;
            artificial_roll += roll_rate / physics::HZ;

            if self.orientation.is_euler() {
                cur.update_deltas(&prev);
                let yaw_roll = cur.direction.dot(Float3::DOWN) * cur.yaw_from_last;
                cur.set_roll(yaw_roll);
                artificial_roll += yaw_roll;
                cur.roll_speed += yaw_roll * physics::HZ;
            }

            cur.update_norm();

            let center_height = cur.spine_position(heart * 0.9).y;
            if self.speed_controlled {
                cur.energy -= physics::resistance_loss(cur.velocity, ctx.params.resistance);
                match physics::velocity_from_energy(cur.energy, center_height, cur.spine_arc, friction) {
                    Some(velocity) => cur.velocity = velocity,
                    None => {
                        log::warn!("train cannot reach ridden angle {ridden}");
                        nodes.pop();
                        self.angles.pop();
                        break;
                    }
                }
            } else {
                cur.velocity = self.velocity;
                cur.energy = physics::energy(self.velocity, center_height, cur.spine_arc, friction);
            }

            cur.update_roll();

            cur.spine_advance = cur.spine_position(heart).distance(prev.spine_position(heart));
            cur.spine_arc += cur.spine_advance;
            cur.heart_advance = cur.heart_position.distance(prev.heart_position);
            cur.heart_arc += cur.heart_advance;

            let curvature = cur.update_deltas(&prev);
            cur.update_forces(curvature);
        }

        if self.lead_out > 0.0001 && nodes.len() > 1 {
            if let Some(last) = nodes.last_mut() {
                last.angle_from_last = 0.0;
                last.pitch_from_last = 0.0;
                last.yaw_from_last = 0.0;
            }
        }

        if let (Some(first), Some(last)) = (nodes.first(), nodes.last()) {
            self.length = last.spine_arc - first.spine_arc;
        }
    }

    fn save(&self, writer: &mut ByteWriter) {
        writer.write_raw(CURVED_MAGIC);
        self.write_body(writer);
    }

    fn load(&mut self, reader: &mut ByteReader) -> Result<(), PersistenceError> {
        reader.expect_magic(CURVED_MAGIC)?;
        self.read_body(reader)
    }

    fn legacy_load(&mut self, reader: &mut ByteReader) -> Result<(), PersistenceError> {
        reader.expect_magic(CURVED_MAGIC)?;
        self.read_body(reader)
    }

    fn is_lockable(&self, _func_type: FuncType) -> bool {
        false
    }

    fn is_in_function(&self, node_index: usize, sub: &Subfunction) -> bool {
        self.angles
            .get(node_index)
            .is_some_and(|angle| *angle >= sub.x_start() && *angle <= sub.x_end())
    }
}
