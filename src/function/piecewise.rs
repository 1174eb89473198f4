use super::context::{ArgumentKind, EvalContext};
use super::degree::{ControlPoint, DegreeKind};
use super::subfunction::Subfunction;
use crate::sim::physics;

/// Physical quantity a function describes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FuncType {
    Roll,
    Pitch,
    Yaw,
    Normal,
    Lateral,
}

impl FuncType {
    /// Degree given to freshly created segments.
    pub fn initial_degree(self) -> DegreeKind {
        match self {
            FuncType::Normal => DegreeKind::Cubic,
            _ => DegreeKind::Quartic,
        }
    }

    /// Display unit of the function's values.
    pub fn value_unit(self, argument: ArgumentKind) -> &'static str {
        match (self, argument) {
            (FuncType::Normal | FuncType::Lateral, _) => "g",
            (_, ArgumentKind::Time) => "°/s",
            (_, ArgumentKind::Distance) => "°/m",
        }
    }
}

/// Ordered, gapless sequence of subfunctions covering `[0, max_argument]`.
///
/// Every structural edit re-tiles the segments so that each one starts where
/// its predecessor ends, and re-chains start values so that each one starts at
/// its predecessor's end value.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    segments: Vec<Subfunction>,
    func_type: FuncType,
}

impl Function {
    pub fn new(min: f32, max: f32, start: f32, end: f32, func_type: FuncType) -> Self {
        Self {
            segments: vec![Subfunction::new(min, max, start, end - start, func_type.initial_degree())],
            func_type,
        }
    }

    /// Rebuilds a function from decoded segments. Empty input is rejected by the caller.
    pub(super) fn from_segments(segments: Vec<Subfunction>, func_type: FuncType) -> Self {
        assert!(!segments.is_empty(), "function needs at least one subfunction");
        Self { segments, func_type }
    }

    pub fn func_type(&self) -> FuncType {
        self.func_type
    }

    pub fn segments(&self) -> &[Subfunction] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn subfunction(&self, index: usize) -> &Subfunction {
        &self.segments[index]
    }

    pub fn min_argument(&self) -> f32 {
        self.first().x_start
    }

    pub fn max_argument(&self) -> f32 {
        self.last().x_end
    }

    fn first(&self) -> &Subfunction {
        self.segments.first().expect("function has no subfunctions")
    }

    fn last(&self) -> &Subfunction {
        self.segments.last().expect("function has no subfunctions")
    }

    /// Index of the first segment whose end is at or beyond `x`, or the last segment.
    pub fn index_at(&self, x: f32) -> usize {
        assert!(!self.segments.is_empty(), "function has no subfunctions");
        self.segments
            .iter()
            .position(|sub| sub.x_end >= x)
            .unwrap_or(self.segments.len() - 1)
    }

    pub fn subfunction_at(&self, x: f32) -> &Subfunction {
        &self.segments[self.index_at(x)]
    }

    /// Position of `sub` in this function, compared by identity.
    ///
    /// # Panics
    /// If `sub` does not belong to this function.
    pub fn subfunction_index(&self, sub: &Subfunction) -> usize {
        self.segments
            .iter()
            .position(|candidate| std::ptr::eq(candidate, sub))
            .unwrap_or_else(|| panic!("invalid subfunction"))
    }

    /// Evaluates the function at `x`. A locked segment is first stretched so
    /// that it ends at `ctx.max_argument`.
    pub fn get_value(&mut self, x: f32, ctx: &EvalContext) -> f32 {
        let index = self.index_at(x);
        if self.segments[index].locked {
            let length = ctx.max_argument - self.segments[index].x_start;
            log::debug!("locked subfunction {index} resized to {length}");
            self.change_length(length, index, ctx.max_argument);
        }
        self.segments[index].get_value(x, ctx)
    }

    /// Sets bounds and `sym_arg` of segment `index`, then re-chains its successors.
    pub fn update(&mut self, index: usize, x_start: f32, x_end: f32, sym_arg: f32) {
        self.segments[index].set_bounds(x_start, x_end, sym_arg);
        self.translate_values(index);
    }

    /// Re-chains the start values of every segment after `from`.
    pub fn translate_values(&mut self, from: usize) {
        for i in from + 1..self.segments.len() {
            let start = self.segments[i - 1].end_value();
            self.segments[i].translate_values(start);
        }
    }

    /// Moves the start value of the whole function, keeping every segment's
    /// own rise.
    pub fn translate_start(&mut self, value: f32) {
        self.segments[0].translate_values(value);
        self.translate_values(0);
    }

    /// Inserts a flat segment of `length` after `after`, or at the front when
    /// `after` is `None`, and shifts every later segment to stay contiguous.
    pub fn append_subfunction(&mut self, length: f32, after: Option<usize>) {
        let kind = self.func_type.initial_degree();
        match after {
            None => {
                let start = self.first().y_start;
                self.segments.insert(0, Subfunction::new(0.0, length, start, 0.0, kind));
            }
            Some(index) => {
                let pred = &self.segments[index];
                let sub = Subfunction::new(pred.x_end, pred.x_end + length, pred.end_value(), 0.0, kind);
                self.segments.insert(index + 1, sub);
            }
        }

        for i in 1..self.segments.len() {
            let prev_end = self.segments[i - 1].x_end;
            let cur = &self.segments[i];
            let (len, sym) = (cur.length(), cur.sym_arg);
            self.update(i, prev_end, prev_end + len, sym);
        }
    }

    /// Deletes segment `index` and closes the gap.
    ///
    /// # Panics
    /// If it is the only segment.
    pub fn remove_subfunction(&mut self, index: usize) {
        assert!(self.segments.len() > 1, "cannot remove the last subfunction");
        self.segments.remove(index);

        let mut i = index;
        if i == 0 {
            let cur = &self.segments[0];
            let (len, sym) = (cur.length(), cur.sym_arg);
            self.update(0, 0.0, len, sym);
            i = 1;
        }
        for i in i..self.segments.len() {
            self.translate_values(i - 1);
            let prev_end = self.segments[i - 1].x_end;
            let cur = &self.segments[i];
            let (len, sym) = (cur.length(), cur.sym_arg);
            self.update(i, prev_end, prev_end + len, sym);
        }
    }

    /// Rescales every segment so the function ends at `new_max`.
    pub fn set_max_argument(&mut self, new_max: f32) {
        let current = self.max_argument();
        if current.abs() <= physics::EPSILON {
            log::debug!("rescaling zero-length function to {new_max}");
            let step = new_max / self.segments.len() as f32;
            for (i, sub) in self.segments.iter_mut().enumerate() {
                let sym = sub.sym_arg;
                sub.set_bounds(step * i as f32, step * (i + 1) as f32, sym);
            }
        } else {
            let scale = new_max / current;
            for sub in &mut self.segments {
                let (start, end, sym) = (sub.x_start * scale, sub.x_end * scale, sub.sym_arg);
                sub.set_bounds(start, end, sym);
            }
        }
        self.translate_values(0);
    }

    /// Resizes segment `index` to `new_length` and shifts its successors. A
    /// locked successor is stretched to end at `section_max` instead.
    /// Returns the new maximum argument.
    pub fn change_length(&mut self, new_length: f32, index: usize, section_max: f32) -> f32 {
        let cur = &self.segments[index];
        let (start, sym) = (cur.x_start, cur.sym_arg);
        self.update(index, start, start + new_length, sym);

        for i in index + 1..self.segments.len() {
            let prev_end = self.segments[i - 1].x_end;
            let cur = &self.segments[i];
            let sym = cur.sym_arg;
            let end = if cur.locked {
                section_max
            } else {
                prev_end + cur.length()
            };
            self.update(i, prev_end, end, sym);
        }
        self.max_argument()
    }

    /// # Panics
    /// If any segment is already locked.
    pub fn lock(&mut self, index: usize) {
        assert!(!self.segments[index].locked, "subfunction {index} is already locked");
        if let Some(other) = self.locked_index() {
            panic!("subfunction {other} is already locked");
        }
        self.segments[index].locked = true;
    }

    /// # Panics
    /// If segment `index` is not locked.
    pub fn unlock(&mut self, index: usize) {
        assert!(self.segments[index].locked, "subfunction {index} is not locked");
        self.segments[index].locked = false;
    }

    pub fn locked_index(&self) -> Option<usize> {
        self.segments.iter().position(|sub| sub.locked)
    }

    pub fn set_sym_arg(&mut self, index: usize, sym_arg: f32) {
        self.segments[index].sym_arg = sym_arg;
        self.translate_values(index);
    }

    /// Sets the shape parameter of segment `index`. Families without one ignore it.
    pub fn set_shape(&mut self, index: usize, arg1: f32) {
        if !self.segments[index].degree.set_arg1(arg1) {
            log::debug!("subfunction {index} has no shape parameter");
        }
        self.translate_values(index);
    }

    pub fn set_center(&mut self, index: usize, center: f32) {
        self.segments[index].center = center;
    }

    pub fn set_tension(&mut self, index: usize, tension: f32) {
        self.segments[index].tension = tension;
    }

    pub fn change_degree(&mut self, index: usize, kind: DegreeKind) {
        self.segments[index].change_degree(kind);
        self.translate_values(index);
    }

    /// Replaces the Bezier control points of a freeform segment.
    pub fn set_control_points(&mut self, index: usize, points: [ControlPoint; 2]) {
        if !self.segments[index].set_control_points(points) {
            log::warn!("subfunction {index} is not freeform");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Degree;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-5;

    fn assert_contiguous(func: &Function) {
        assert_eq!(func.segments()[0].x_start(), 0.0);
        for pair in func.segments().windows(2) {
            assert_eq!(pair[1].x_start(), pair[0].x_end());
            assert_relative_eq!(pair[1].y_start(), pair[0].end_value(), epsilon = TOLERANCE);
        }
    }

    fn roll(max: f32) -> Function {
        Function::new(0.0, max, 0.0, 0.0, FuncType::Roll)
    }

    #[test]
    fn new_function_has_one_segment() {
        let func = Function::new(0.0, 5.0, 1.0, 3.0, FuncType::Normal);
        assert_eq!(func.len(), 1);
        assert_eq!(func.max_argument(), 5.0);
        assert_eq!(func.subfunction(0).kind(), DegreeKind::Cubic);
        assert_eq!(func.subfunction(0).sym_arg(), 2.0);

        let func = roll(5.0);
        assert_eq!(func.subfunction(0).kind(), DegreeKind::Quartic);
    }

    #[test]
    fn value_units() {
        assert_eq!(FuncType::Normal.value_unit(ArgumentKind::Time), "g");
        assert_eq!(FuncType::Lateral.value_unit(ArgumentKind::Distance), "g");
        assert_eq!(FuncType::Roll.value_unit(ArgumentKind::Time), "°/s");
        assert_eq!(FuncType::Pitch.value_unit(ArgumentKind::Distance), "°/m");
    }

    #[test]
    fn append_after_extends_domain() {
        let mut func = roll(4.0);
        func.append_subfunction(2.0, Some(0));
        func.append_subfunction(1.0, Some(1));

        assert_eq!(func.len(), 3);
        assert_eq!(func.max_argument(), 7.0);
        assert_contiguous(&func);
    }

    #[test]
    fn prepend_shifts_existing_segments() {
        let mut func = roll(4.0);
        func.append_subfunction(1.5, None);

        assert_eq!(func.len(), 2);
        assert_eq!(func.subfunction(0).x_end(), 1.5);
        assert_eq!(func.subfunction(1).x_start(), 1.5);
        assert_eq!(func.subfunction(1).x_end(), 5.5);
        assert_contiguous(&func);
    }

    #[test]
    fn inserted_segment_starts_at_predecessor_end_value() {
        let mut func = Function::new(0.0, 2.0, 1.0, 4.0, FuncType::Normal);
        func.append_subfunction(1.0, Some(0));

        assert_eq!(func.subfunction(1).y_start(), 4.0);
        assert_eq!(func.subfunction(1).sym_arg(), 0.0);
    }

    #[test]
    fn remove_closes_gap() {
        let mut func = roll(1.0);
        func.append_subfunction(2.0, Some(0));
        func.append_subfunction(3.0, Some(1));

        func.remove_subfunction(1);
        assert_eq!(func.len(), 2);
        assert_eq!(func.max_argument(), 4.0);
        assert_contiguous(&func);

        func.remove_subfunction(0);
        assert_eq!(func.len(), 1);
        assert_eq!(func.subfunction(0).x_start(), 0.0);
        assert_eq!(func.max_argument(), 3.0);
    }

    #[test]
    #[should_panic(expected = "last subfunction")]
    fn removing_only_segment_panics() {
        roll(1.0).remove_subfunction(0);
    }

    #[test]
    fn edits_keep_domain_contiguous() {
        let mut func = roll(2.0);
        func.append_subfunction(1.0, Some(0));
        func.append_subfunction(0.5, None);
        func.append_subfunction(2.5, Some(1));
        func.change_length(4.0, 2, 100.0);
        func.remove_subfunction(3);
        func.append_subfunction(0.25, Some(2));
        func.change_length(0.75, 0, 100.0);

        assert_contiguous(&func);
    }

    #[test]
    fn set_max_argument_scales_uniformly() {
        let mut func = roll(2.0);
        func.append_subfunction(2.0, Some(0));
        func.set_max_argument(8.0);

        assert_relative_eq!(func.subfunction(0).x_end(), 4.0, epsilon = TOLERANCE);
        assert_relative_eq!(func.max_argument(), 8.0, epsilon = TOLERANCE);
        assert_contiguous(&func);
    }

    #[test]
    fn set_max_argument_from_zero_spreads_evenly() {
        let mut func = roll(0.0);
        func.append_subfunction(0.0, Some(0));
        func.set_max_argument(6.0);

        assert_relative_eq!(func.subfunction(0).x_end(), 3.0, epsilon = TOLERANCE);
        assert_relative_eq!(func.max_argument(), 6.0, epsilon = TOLERANCE);
    }

    #[test]
    fn change_length_returns_new_max() {
        let mut func = roll(2.0);
        func.append_subfunction(3.0, Some(0));
        let max = func.change_length(1.0, 0, 10.0);

        assert_eq!(max, 4.0);
        assert_eq!(func.subfunction(1).x_start(), 1.0);
        assert_eq!(func.subfunction(1).length(), 3.0);
    }

    #[test]
    fn change_length_stretches_locked_successor() {
        let mut func = roll(2.0);
        func.append_subfunction(3.0, Some(0));
        func.lock(1);
        let max = func.change_length(1.0, 0, 9.0);

        assert_eq!(max, 9.0);
        assert_eq!(func.subfunction(1).x_start(), 1.0);
    }

    #[test]
    fn locked_segment_fills_section() {
        let mut func = roll(2.0);
        func.append_subfunction(3.0, Some(0));
        func.lock(1);

        func.get_value(3.0, &EvalContext::new(12.0));
        assert_eq!(func.subfunction(1).x_end(), 12.0);

        func.unlock(1);
        func.get_value(3.0, &EvalContext::new(20.0));
        assert_eq!(func.subfunction(1).x_end(), 12.0);
    }

    #[test]
    fn locking_is_exclusive() {
        let mut func = roll(2.0);
        func.append_subfunction(3.0, Some(0));
        assert_eq!(func.locked_index(), None);
        func.lock(0);
        assert_eq!(func.locked_index(), Some(0));
        func.unlock(0);
        func.lock(1);
        assert_eq!(func.locked_index(), Some(1));
    }

    #[test]
    #[should_panic(expected = "already locked")]
    fn double_lock_panics() {
        let mut func = roll(2.0);
        func.lock(0);
        func.lock(0);
    }

    #[test]
    #[should_panic(expected = "already locked")]
    fn locking_second_segment_panics() {
        let mut func = roll(2.0);
        func.append_subfunction(1.0, Some(0));
        func.lock(0);
        func.lock(1);
    }

    #[test]
    #[should_panic(expected = "not locked")]
    fn unlocking_unlocked_panics() {
        roll(2.0).unlock(0);
    }

    #[test]
    fn get_value_picks_containing_segment() {
        let mut func = Function::new(0.0, 1.0, 0.0, 2.0, FuncType::Normal);
        func.append_subfunction(1.0, Some(0));
        func.set_sym_arg(1, 3.0);
        let ctx = EvalContext::new(2.0);

        assert_relative_eq!(func.get_value(0.5, &ctx), 1.0, epsilon = TOLERANCE);
        assert_relative_eq!(func.get_value(1.0, &ctx), 2.0, epsilon = TOLERANCE);
        assert_relative_eq!(func.get_value(1.5, &ctx), 3.5, epsilon = TOLERANCE);
        assert_relative_eq!(func.get_value(2.0, &ctx), 5.0, epsilon = TOLERANCE);
    }

    #[test]
    fn get_value_past_end_uses_last_segment() {
        let mut func = Function::new(0.0, 1.0, 0.0, 2.0, FuncType::Normal);
        assert_relative_eq!(func.get_value(3.0, &EvalContext::new(1.0)), 2.0, epsilon = TOLERANCE);
        assert_eq!(func.index_at(3.0), 0);
    }

    #[test]
    fn sym_arg_edit_rechains_successors() {
        let mut func = Function::new(0.0, 1.0, 0.0, 0.0, FuncType::Normal);
        func.append_subfunction(1.0, Some(0));
        func.append_subfunction(1.0, Some(1));
        func.set_sym_arg(0, 1.5);

        assert_eq!(func.subfunction(1).y_start(), 1.5);
        assert_eq!(func.subfunction(2).y_start(), 1.5);
    }

    #[test]
    fn degree_change_to_symmetric_rechains() {
        let mut func = Function::new(0.0, 1.0, 0.0, 2.0, FuncType::Normal);
        func.append_subfunction(1.0, Some(0));
        assert_eq!(func.subfunction(1).y_start(), 2.0);

        func.change_degree(0, DegreeKind::Plateau);
        assert_eq!(func.subfunction(1).y_start(), 0.0);

        func.set_shape(0, 3.0);
        assert_eq!(func.subfunction(0).degree(), &Degree::Plateau { arg1: 3.0 });
    }

    #[test]
    fn translate_start_shifts_the_chain() {
        let mut func = Function::new(0.0, 1.0, 0.0, 2.0, FuncType::Normal);
        func.append_subfunction(1.0, Some(0));
        func.translate_start(1.0);

        assert_eq!(func.subfunction(0).y_start(), 1.0);
        assert_eq!(func.subfunction(0).end_value(), 3.0);
        assert_eq!(func.subfunction(1).y_start(), 3.0);
    }

    #[test]
    fn subfunction_index_by_identity() {
        let mut func = roll(1.0);
        func.append_subfunction(1.0, Some(0));
        let second = func.subfunction(1);
        assert_eq!(func.subfunction_index(second), 1);
        assert!(std::ptr::eq(func.subfunction_at(1.5), second));
    }

    #[test]
    #[should_panic(expected = "invalid subfunction")]
    fn foreign_subfunction_panics() {
        let func = roll(1.0);
        let other = roll(1.0);
        func.subfunction_index(other.subfunction(0));
    }

    #[test]
    fn node_index_follows_segment_start() {
        let mut func = roll(1.0);
        func.append_subfunction(1.0, Some(0));
        assert_eq!(func.subfunction(1).node_index(), 998);
    }
}
