use crate::function::{Orientation, TrackQuery};
use crate::sim::Node;

/// Global node addressing over finished sections plus the one being built.
///
/// Each finished list contributes all but its last node, which is repeated as
/// the first node of the next list.
pub struct TrackView<'a> {
    preceding: &'a [Vec<Node>],
    current: &'a [Node],
    orientation: Orientation,
}

impl<'a> TrackView<'a> {
    pub fn new(preceding: &'a [Vec<Node>], current: &'a [Node], orientation: Orientation) -> Self {
        Self {
            preceding,
            current,
            orientation,
        }
    }
}

impl TrackQuery for TrackView<'_> {
    fn node(&self, index: i32) -> Option<Node> {
        let mut index = usize::try_from(index).ok()?;
        for list in self.preceding {
            let span = list.len().saturating_sub(1);
            if index < span {
                return list.get(index).copied();
            }
            index -= span;
        }
        self.current.get(index).copied()
    }

    fn section_offset(&self) -> i32 {
        self.preceding
            .iter()
            .map(|list| list.len().saturating_sub(1))
            .sum::<usize>() as i32
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }
}
