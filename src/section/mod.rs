//! Track sections: the shared contract and the curved-section integrator.

mod curved;
mod view;

pub use curved::{CurvedSection, CURVED_MAGIC};
pub use view::TrackView;

pub use crate::function::{ArgumentKind, Orientation};

use crate::function::{FuncType, Subfunction};
use crate::persistence::{ByteReader, ByteWriter, PersistenceError};
use crate::sim::{Node, TrackParams};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Straight,
    Curved,
    Forced,
    Geometric,
    Bezier,
    NlCsv,
}

/// What a section sees of the rest of the track while it regenerates.
pub struct UpdateContext<'a> {
    pub params: &'a TrackParams,
    /// Node lists of every section before this one, in track order.
    pub preceding: &'a [Vec<Node>],
}

pub trait Section {
    fn kind(&self) -> SectionKind;

    fn name(&self) -> &str;

    /// Upper bound of the section's function argument.
    fn max_argument(&self) -> f32;

    /// Spine length generated by the last update.
    fn length(&self) -> f32;

    /// Regenerates the section's nodes. `nodes[0]` is the start node and is
    /// kept; everything after it is replaced.
    fn update_section(&mut self, nodes: &mut Vec<Node>, ctx: &UpdateContext);

    fn save(&self, writer: &mut ByteWriter);

    fn load(&mut self, reader: &mut ByteReader) -> Result<(), PersistenceError>;

    fn legacy_load(&mut self, reader: &mut ByteReader) -> Result<(), PersistenceError>;

    /// Whether segments of the function of `func_type` may be locked.
    fn is_lockable(&self, func_type: FuncType) -> bool;

    /// Whether the node at `node_index` (section local) was generated inside `sub`.
    fn is_in_function(&self, node_index: usize, sub: &Subfunction) -> bool;
}
