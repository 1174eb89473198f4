use crate::sim::Node;

/// How a section composes roll with heading changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Quaternion,
    Euler,
}

impl Orientation {
    pub fn from_bool(euler: bool) -> Self {
        if euler {
            Orientation::Euler
        } else {
            Orientation::Quaternion
        }
    }

    pub fn is_euler(self) -> bool {
        self == Orientation::Euler
    }
}

/// Unit of a section's function argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ArgumentKind {
    #[default]
    Time,
    Distance,
}

/// Read access to already generated track nodes, addressed by global node
/// index (consecutive sections share their boundary node).
pub trait TrackQuery {
    fn node(&self, index: i32) -> Option<Node>;

    /// Global index of the first node of the section being evaluated.
    fn section_offset(&self) -> i32;

    fn orientation(&self) -> Orientation;
}

/// Everything a function evaluation may consult beyond its own segments.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// Current maximum argument of the owning section; locked segments stretch to it.
    pub max_argument: f32,
    pub track: Option<&'a dyn TrackQuery>,
}

impl<'a> EvalContext<'a> {
    pub fn new(max_argument: f32) -> Self {
        Self {
            max_argument,
            track: None,
        }
    }

    pub fn with_track(mut self, track: &'a dyn TrackQuery) -> Self {
        self.track = Some(track);
        self
    }
}
