/// Track-wide physical parameters shared by every section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackParams {
    /// Distance from the heartline to the rails along the node normal.
    pub heart_offset: f32,
    /// Rolling friction coefficient.
    pub friction: f32,
    /// Air resistance coefficient.
    pub resistance: f32,
}

impl TrackParams {
    pub fn new(heart_offset: f32, friction: f32, resistance: f32) -> Self {
        Self {
            heart_offset,
            friction,
            resistance,
        }
    }
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            heart_offset: 1.1,
            friction: 0.0,
            resistance: 0.0,
        }
    }
}
