use std::f32::consts::PI;

use super::context::EvalContext;
use super::degree::{quintic_peak, ControlPoint, Degree, DegreeKind, Freeform};
use crate::sim::{physics, Float3, Node};

/// One segment of a piecewise transition function.
///
/// Maps `[x_start, x_end]` onto the unit interval, warps it with the center
/// and tension parameters, then evaluates the degree's curve between
/// `y_start` and `y_start + sym_arg`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subfunction {
    pub(super) x_start: f32,
    pub(super) x_end: f32,
    pub(super) y_start: f32,
    pub(super) sym_arg: f32,
    pub(super) center: f32,
    pub(super) tension: f32,
    pub(super) degree: Degree,
    pub(super) locked: bool,
}

impl Subfunction {
    pub(super) fn new(x_start: f32, x_end: f32, y_start: f32, sym_arg: f32, kind: DegreeKind) -> Self {
        let mut sub = Self {
            x_start,
            x_end,
            y_start,
            sym_arg,
            center: 0.0,
            tension: 0.0,
            degree: Degree::Linear,
            locked: false,
        };
        sub.change_degree(kind);
        sub
    }

    pub fn x_start(&self) -> f32 {
        self.x_start
    }

    pub fn x_end(&self) -> f32 {
        self.x_end
    }

    pub fn length(&self) -> f32 {
        self.x_end - self.x_start
    }

    pub fn y_start(&self) -> f32 {
        self.y_start
    }

    pub fn sym_arg(&self) -> f32 {
        self.sym_arg
    }

    pub fn center(&self) -> f32 {
        self.center
    }

    pub fn tension(&self) -> f32 {
        self.tension
    }

    pub fn degree(&self) -> &Degree {
        &self.degree
    }

    pub fn kind(&self) -> DegreeKind {
        self.degree.kind()
    }

    pub fn arg1(&self) -> f32 {
        self.degree.arg1()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Index of the first track node an edit of this segment affects.
    pub fn node_index(&self) -> i32 {
        (self.x_start * physics::HZ - 1.5) as i32
    }

    pub fn is_symmetric(&self) -> bool {
        self.degree.is_symmetric()
    }

    /// Value handed to the next segment as its start value.
    pub fn end_value(&self) -> f32 {
        if self.is_symmetric() {
            self.y_start
        } else {
            self.y_start + self.sym_arg
        }
    }

    pub fn translate_values(&mut self, new_start: f32) {
        self.y_start = new_start;
        if let Degree::ToZero { .. } = self.degree {
            self.sym_arg = -self.y_start;
        }
    }

    pub(super) fn change_degree(&mut self, kind: DegreeKind) {
        self.degree = Degree::with_defaults(kind, self.degree.arg1());
        if kind == DegreeKind::ToZero {
            self.center = 0.0;
            self.tension = 0.0;
            self.sym_arg = -self.y_start;
        }
    }

    pub(super) fn set_bounds(&mut self, x_start: f32, x_end: f32, sym_arg: f32) {
        self.x_start = x_start;
        self.x_end = x_end;
        self.sym_arg = sym_arg;
    }

    pub(super) fn set_control_points(&mut self, points: [ControlPoint; 2]) -> bool {
        match &mut self.degree {
            Degree::Freeform(freeform) => {
                *freeform = Freeform::new(points);
                true
            }
            _ => false,
        }
    }

    /// Evaluates the segment at `x`.
    ///
    /// Arguments outside the domain are clamped; unlocked segments warn about
    /// it. A tozero segment also refreshes its roll slope from the track.
    pub fn get_value(&mut self, x: f32, ctx: &EvalContext) -> f32 {
        let x = if x > self.x_end {
            if !self.locked {
                log::warn!("Function got parameter out of bounds: x = {x}");
            }
            self.x_end
        } else if x < self.x_start {
            if !self.locked {
                log::warn!("Function got parameter out of bounds: x = {x}");
            }
            self.x_start
        } else {
            x
        };

        if self.length().abs() < physics::EPSILON {
            log::debug!("degenerate subfunction domain at x = {}", self.x_start);
            return self.y_start;
        }

        let t = (x - self.x_start) / (self.x_end - self.x_start);
        let t = self.apply_tension(self.apply_center(t));

        if let Degree::ToZero { .. } = self.degree {
            return self.to_zero_value(t, ctx);
        }

        let s = self.sym_arg;
        let y = self.y_start;
        match &self.degree {
            Degree::Linear => s * t + y,
            Degree::Quadratic { arg1 } => {
                if self.degree.is_symmetric() {
                    let u = 2.0 * t - 1.0;
                    s * (1.0 - u * u) + y
                } else if *arg1 < 0.0 {
                    s * (1.0 - (1.0 - t) * (1.0 - t)) + y
                } else {
                    s * t * t + y
                }
            }
            Degree::Cubic => s * t * t * (3.0 + t * -2.0) + y,
            Degree::Quartic { arg1 } => {
                if self.degree.is_symmetric() {
                    s * t * t * (16.0 + t * (-32.0 + t * 16.0)) + y
                } else {
                    let a = *arg1;
                    let k = 1.0 - 2.0 * a;
                    t * t * (-(6.0 * s * a) / k + t * (s * (4.0 * a + 4.0) / k + t * (-3.0 * s / k))) + y
                }
            }
            Degree::Quintic { arg1 } => {
                let a = *arg1;
                if f64::from(a.abs()) < 0.005 {
                    s * t * t * t * (10.0 + t * (-15.0 + t * 6.0)) + y
                } else {
                    let bump = t * t * (t - 1.0) * (t - 1.0);
                    let skew = if a < 0.0 { t + a / 10.0 } else { t - a / 10.0 };
                    s / quintic_peak(a) * bump * skew + y
                }
            }
            Degree::Sinusoidal => 0.5 * s * (1.0 - (PI * t).cos()) + y,
            Degree::Plateau { arg1 } => {
                let ramp = (1.0 - (2.0 * t - 1.0).abs()).powi(3);
                s * (1.0 - (-arg1 * 15.0 * ramp).exp()) + y
            }
            Degree::Freeform(freeform) => freeform.sample(t, s, y),
            Degree::ToZero { .. } => y,
        }
    }

    /// Quartic blend from the current roll rate toward zero roll at the
    /// segment end, seeded from the two nodes preceding the segment start.
    fn to_zero_value(&mut self, t: f32, ctx: &EvalContext) -> f32 {
        let Some(track) = ctx.track else {
            log::warn!("tozero subfunction evaluated without track access");
            return -1.0;
        };

        let base = track.section_offset() as f32 + self.x_start * physics::HZ;
        let cur = track.node((base - 0.5) as i32);
        let prev = track.node((base - 1.5) as i32).or(cur);

        let yaw_roll = |node: &Node| node.direction.dot(Float3::DOWN) * node.yaw_from_last;

        let (d, yaw_term, roll) = match (cur, prev) {
            (Some(cur), Some(prev)) => (
                (cur.roll_speed + yaw_roll(&cur) - prev.roll_speed - yaw_roll(&prev)) * physics::HZ,
                yaw_roll(&cur),
                cur.roll,
            ),
            _ => {
                log::warn!("tozero subfunction has no node at x = {}", self.x_start);
                (0.0, 0.0, 0.0)
            }
        };
        let e = if track.orientation().is_euler() {
            self.y_start
        } else {
            -yaw_term * physics::HZ + self.y_start
        };

        let arg1 = -roll / (self.x_end - self.x_start);
        self.degree.set_arg1(arg1);

        let a = -2.5 * (d + 6.0 * (e - 2.0 * arg1));
        let b = 6.0 * d + 32.0 * e - 60.0 * arg1;
        let c = -d * 4.5 - 18.0 * e + 30.0 * arg1;
        t * (d + t * (c + t * (b + t * a))) + e
    }

    fn apply_center(&self, x: f32) -> f32 {
        if self.center > 0.0 {
            x.powf(2.0f32.powf(self.center / 2.0))
        } else if self.center < 0.0 {
            1.0 - (1.0 - x).powf(2.0f32.powf(-self.center / 2.0))
        } else {
            x
        }
    }

    fn apply_tension(&self, x: f32) -> f32 {
        let tension = self.tension;
        if f64::from(tension.abs()) < 0.0005 {
            x
        } else if tension > 0.0 {
            let x = 2.0 * tension * (x - 0.5);
            let x = x.sinh() / tension.sinh();
            0.5 * (x + 1.0)
        } else {
            let x = 2.0 * tension.sinh() * (x - 0.5);
            let x = x.asinh() / tension;
            0.5 * (x + 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::context::{Orientation, TrackQuery};
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-4;

    fn ctx() -> EvalContext<'static> {
        EvalContext::new(10.0)
    }

    fn segment(kind: DegreeKind) -> Subfunction {
        Subfunction::new(2.0, 6.0, 1.5, 4.0, kind)
    }

    fn with_arg1(kind: DegreeKind, arg1: f32) -> Subfunction {
        let mut sub = segment(kind);
        sub.degree.set_arg1(arg1);
        sub
    }

    fn every_shape() -> Vec<Subfunction> {
        vec![
            segment(DegreeKind::Linear),
            with_arg1(DegreeKind::Quadratic, 0.0),
            with_arg1(DegreeKind::Quadratic, 1.0),
            with_arg1(DegreeKind::Quadratic, -1.0),
            segment(DegreeKind::Cubic),
            with_arg1(DegreeKind::Quartic, -10.0),
            with_arg1(DegreeKind::Quartic, 0.2),
            with_arg1(DegreeKind::Quintic, 0.0),
            with_arg1(DegreeKind::Quintic, 2.0),
            with_arg1(DegreeKind::Quintic, -2.0),
            segment(DegreeKind::Sinusoidal),
            with_arg1(DegreeKind::Plateau, 1.0),
        ]
    }

    #[test]
    fn starts_at_y_start_and_ends_at_end_value() {
        for mut sub in every_shape() {
            let start = sub.get_value(sub.x_start(), &ctx());
            let end = sub.get_value(sub.x_end(), &ctx());
            assert_relative_eq!(start, sub.y_start(), epsilon = TOLERANCE);
            assert_relative_eq!(end, sub.end_value(), epsilon = TOLERANCE);
        }
    }

    #[test]
    fn warps_keep_endpoints() {
        for mut sub in every_shape() {
            sub.center = -1.5;
            sub.tension = 2.0;
            let start = sub.get_value(sub.x_start(), &ctx());
            let end = sub.get_value(sub.x_end(), &ctx());
            assert_relative_eq!(start, sub.y_start(), epsilon = TOLERANCE);
            assert_relative_eq!(end, sub.end_value(), epsilon = TOLERANCE);
        }
    }

    #[test]
    fn negative_tension_keeps_endpoints() {
        let mut sub = segment(DegreeKind::Linear);
        sub.tension = -1.0;
        assert_relative_eq!(sub.get_value(2.0, &ctx()), 1.5, epsilon = TOLERANCE);
        assert_relative_eq!(sub.get_value(6.0, &ctx()), 5.5, epsilon = TOLERANCE);
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 3.5, epsilon = TOLERANCE);
    }

    #[test]
    fn cubic_midpoint_is_exact() {
        let mut sub = Subfunction::new(0.0, 2.0, 1.0, 4.0, DegreeKind::Cubic);
        assert_eq!(sub.get_value(1.0, &ctx()), 3.0);
    }

    #[test]
    fn linear_is_proportional() {
        let mut sub = segment(DegreeKind::Linear);
        assert_relative_eq!(sub.get_value(3.0, &ctx()), 2.5, epsilon = TOLERANCE);
    }

    #[test]
    fn quadratic_lead_in_is_non_decreasing() {
        let mut sub = with_arg1(DegreeKind::Quadratic, 1.0);
        let mut last = f32::MIN;
        for i in 0..=100 {
            let value = sub.get_value(2.0 + 4.0 * i as f32 / 100.0, &ctx());
            assert!(value >= last);
            last = value;
        }
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 1.5 + 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn quadratic_lead_out_is_non_decreasing_and_front_loaded() {
        let mut sub = with_arg1(DegreeKind::Quadratic, -1.0);
        let mut last = f32::MIN;
        for i in 0..=100 {
            let value = sub.get_value(2.0 + 4.0 * i as f32 / 100.0, &ctx());
            assert!(value >= last);
            last = value;
        }
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 1.5 + 3.0, epsilon = TOLERANCE);
    }

    #[test]
    fn quadratic_bump_peaks_in_the_middle() {
        let mut sub = with_arg1(DegreeKind::Quadratic, 0.0);
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 5.5, epsilon = TOLERANCE);
        assert_relative_eq!(sub.get_value(3.0, &ctx()), 1.5 + 3.0, epsilon = TOLERANCE);
    }

    #[test]
    fn quartic_bump_peaks_at_sym_arg() {
        let mut sub = with_arg1(DegreeKind::Quartic, -10.0);
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 5.5, epsilon = TOLERANCE);
    }

    #[test]
    fn quartic_near_zero_bias_is_smooth_transition() {
        let mut sub = with_arg1(DegreeKind::Quartic, 0.0);
        assert!(!sub.is_symmetric());
        assert_relative_eq!(sub.get_value(6.0, &ctx()), 5.5, epsilon = TOLERANCE);
        // 4t³ - 3t⁴
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 1.5 + 1.25, epsilon = TOLERANCE);
    }

    #[test]
    fn quartic_approaching_half_bias_stays_finite() {
        let mut sub = with_arg1(DegreeKind::Quartic, 0.49);
        for i in 0..=10 {
            assert!(sub.get_value(2.0 + 0.4 * i as f32, &ctx()).is_finite());
        }
        assert_relative_eq!(sub.get_value(6.0, &ctx()), 5.5, epsilon = 1e-2);
    }

    #[test]
    fn quintic_boundary_skew_stays_on_smooth_branch() {
        let mut sub = with_arg1(DegreeKind::Quintic, 0.005);
        assert!(!sub.is_symmetric());
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 1.5 + 2.0, epsilon = TOLERANCE);
        assert_relative_eq!(sub.get_value(6.0, &ctx()), 5.5, epsilon = TOLERANCE);
    }

    #[test]
    fn quintic_just_past_boundary_returns_to_start() {
        let mut sub = with_arg1(DegreeKind::Quintic, 0.006);
        assert!(sub.is_symmetric());
        assert_relative_eq!(sub.get_value(6.0, &ctx()), 1.5, epsilon = TOLERANCE);
    }

    #[test]
    fn positive_quintic_skew_peaks_at_sym_arg() {
        let mut sub = with_arg1(DegreeKind::Quintic, 1.0);
        let peak = (0..=1000)
            .map(|i| sub.get_value(2.0 + 4.0 * i as f32 / 1000.0, &ctx()))
            .fold(f32::MIN, |a, b| a.max((b - 1.5).abs()));
        assert_relative_eq!(peak, 4.0, epsilon = 1e-2);
    }

    #[test]
    fn sinusoidal_is_half_way_at_midpoint() {
        let mut sub = segment(DegreeKind::Sinusoidal);
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 3.5, epsilon = TOLERANCE);
    }

    #[test]
    fn plateau_sharpness_flattens_top() {
        let mut soft = with_arg1(DegreeKind::Plateau, 0.2);
        let mut sharp = with_arg1(DegreeKind::Plateau, 3.0);
        assert!(sharp.get_value(3.0, &ctx()) > soft.get_value(3.0, &ctx()));
    }

    #[test]
    fn freeform_ends_close_to_end_value() {
        let mut sub = segment(DegreeKind::Freeform);
        assert_relative_eq!(sub.get_value(2.0, &ctx()), 1.5, epsilon = TOLERANCE);
        assert_relative_eq!(sub.get_value(6.0, &ctx()), 5.5, epsilon = 2e-3);
        assert_relative_eq!(sub.get_value(4.0, &ctx()), 1.5 + 4.0 * 0.49286, epsilon = 1e-3);
    }

    #[test]
    fn control_points_only_apply_to_freeform() {
        let straight = [ControlPoint::new(1.0 / 3.0, 1.0 / 3.0), ControlPoint::new(2.0 / 3.0, 2.0 / 3.0)];
        let mut cubic = segment(DegreeKind::Cubic);
        assert!(!cubic.set_control_points(straight));

        let mut sub = segment(DegreeKind::Freeform);
        assert!(sub.set_control_points(straight));
        // the table is indexed over its first 99 steps
        assert_relative_eq!(sub.get_value(3.0, &ctx()), 1.5 + 4.0 * 0.2475, epsilon = 1e-3);
    }

    #[test]
    fn out_of_range_argument_is_clamped() {
        let mut sub = segment(DegreeKind::Cubic);
        assert_relative_eq!(sub.get_value(100.0, &ctx()), 5.5, epsilon = TOLERANCE);
        assert_relative_eq!(sub.get_value(-100.0, &ctx()), 1.5, epsilon = TOLERANCE);
    }

    #[test]
    fn degenerate_domain_returns_start() {
        let mut sub = Subfunction::new(3.0, 3.0, 0.7, 2.0, DegreeKind::Cubic);
        assert_eq!(sub.get_value(3.0, &ctx()), 0.7);
    }

    #[test]
    fn translate_values_tracks_zero_for_tozero() {
        let mut sub = segment(DegreeKind::ToZero);
        assert_eq!(sub.sym_arg(), -1.5);
        sub.translate_values(8.0);
        assert_eq!(sub.y_start(), 8.0);
        assert_eq!(sub.sym_arg(), -8.0);
        assert_eq!(sub.end_value(), 0.0);

        let mut cubic = segment(DegreeKind::Cubic);
        cubic.translate_values(8.0);
        assert_eq!(cubic.sym_arg(), 4.0);
    }

    #[test]
    fn change_degree_to_tozero_resets_warps() {
        let mut sub = segment(DegreeKind::Cubic);
        sub.center = 1.0;
        sub.tension = 1.0;
        sub.change_degree(DegreeKind::ToZero);
        assert_eq!(sub.center(), 0.0);
        assert_eq!(sub.tension(), 0.0);
        assert_eq!(sub.sym_arg(), -1.5);
    }

    #[test]
    fn change_degree_to_quadratic_keeps_shape() {
        let mut sub = segment(DegreeKind::Plateau);
        sub.change_degree(DegreeKind::Quadratic);
        assert_eq!(sub.degree(), &Degree::Quadratic { arg1: 1.0 });
    }

    #[test]
    fn node_index_precedes_start() {
        let sub = Subfunction::new(0.5, 1.0, 0.0, 0.0, DegreeKind::Linear);
        assert_eq!(sub.node_index(), 498);
    }

    struct FixedNodes {
        nodes: Vec<Node>,
        orientation: Orientation,
    }

    impl TrackQuery for FixedNodes {
        fn node(&self, index: i32) -> Option<Node> {
            usize::try_from(index).ok().and_then(|i| self.nodes.get(i).copied())
        }

        fn section_offset(&self) -> i32 {
            0
        }

        fn orientation(&self) -> Orientation {
            self.orientation
        }
    }

    #[test]
    fn tozero_without_track_returns_sentinel() {
        let mut sub = segment(DegreeKind::ToZero);
        assert_eq!(sub.get_value(3.0, &ctx()), -1.0);
    }

    #[test]
    fn tozero_at_track_start_reuses_the_first_node() {
        let mut start = Node::DEFAULT;
        start.roll = 6.0;
        start.roll_speed = 10.0;
        let track = FixedNodes {
            nodes: vec![start],
            orientation: Orientation::Quaternion,
        };
        let mut sub = Subfunction::new(0.0, 1.0, 10.0, 0.0, DegreeKind::ToZero);
        let ctx = EvalContext::new(1.0).with_track(&track);

        assert_relative_eq!(sub.get_value(0.0, &ctx), 10.0, epsilon = TOLERANCE);
        assert_relative_eq!(sub.arg1(), -6.0, epsilon = TOLERANCE);
        assert_relative_eq!(sub.get_value(1.0, &ctx), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn tozero_past_generated_nodes_still_reaches_zero() {
        let track = FixedNodes {
            nodes: Vec::new(),
            orientation: Orientation::Quaternion,
        };
        let mut sub = Subfunction::new(0.5, 1.0, 4.0, 0.0, DegreeKind::ToZero);
        let ctx = EvalContext::new(1.0).with_track(&track);

        assert_relative_eq!(sub.get_value(0.5, &ctx), 4.0, epsilon = TOLERANCE);
        assert_eq!(sub.arg1(), 0.0);
        assert_relative_eq!(sub.get_value(1.0, &ctx), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn tozero_blends_roll_rate_down() {
        let mut nodes = vec![Node::DEFAULT; 20];
        for node in &mut nodes {
            node.roll_speed = 30.0;
            node.roll = 12.0;
        }
        let track = FixedNodes {
            nodes,
            orientation: Orientation::Euler,
        };
        let mut sub = Subfunction::new(0.01, 0.51, 30.0, 0.0, DegreeKind::ToZero);
        let ctx = EvalContext::new(1.0).with_track(&track);

        assert_relative_eq!(sub.get_value(0.01, &ctx), 30.0, epsilon = TOLERANCE);
        assert_relative_eq!(sub.arg1(), -24.0, epsilon = TOLERANCE);
        assert_relative_eq!(sub.get_value(0.51, &ctx), 0.0, epsilon = 1e-2);
    }
}
