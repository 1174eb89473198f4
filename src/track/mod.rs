//! Ordered sections and the node lists they generate.
//!
//! Section `i + 1` starts from a copy of the last node of section `i`, so a
//! boundary node appears in both lists but only once in global numbering.

use crate::section::{Section, UpdateContext};
use crate::sim::{Node, TrackParams};

pub struct Track {
    anchor: Node,
    params: TrackParams,
    sections: Vec<Box<dyn Section>>,
    nodes: Vec<Vec<Node>>,
}

impl Track {
    pub fn new(anchor: Node, params: TrackParams) -> Self {
        Self {
            anchor,
            params,
            sections: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn params(&self) -> &TrackParams {
        &self.params
    }

    pub fn set_params(&mut self, params: TrackParams) {
        self.params = params;
        self.update_track(0);
    }

    pub fn anchor(&self) -> &Node {
        &self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Node) {
        self.anchor = anchor;
        self.update_track(0);
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, index: usize) -> &dyn Section {
        self.sections[index].as_ref()
    }

    /// Mutable access for edits. Call [`Track::update_track`] from `index`
    /// afterwards to regenerate.
    pub fn section_mut(&mut self, index: usize) -> &mut dyn Section {
        self.sections[index].as_mut()
    }

    pub fn section_nodes(&self, index: usize) -> &[Node] {
        &self.nodes[index]
    }

    /// Appends a section, generates it and returns its index.
    pub fn push_section(&mut self, section: Box<dyn Section>) -> usize {
        let index = self.sections.len();
        self.insert_section(index, section);
        index
    }

    pub fn insert_section(&mut self, index: usize, section: Box<dyn Section>) {
        self.sections.insert(index, section);
        self.nodes.insert(index, Vec::new());
        self.update_track(index);
    }

    pub fn remove_section(&mut self, index: usize) -> Box<dyn Section> {
        let section = self.sections.remove(index);
        self.nodes.remove(index);
        self.update_track(index);
        section
    }

    /// Regenerates every section from `from` to the end of the track.
    pub fn update_track(&mut self, from: usize) {
        for index in from..self.sections.len() {
            let start = match index.checked_sub(1) {
                Some(prev) => self.nodes[prev].last().copied().unwrap_or(self.anchor),
                None => self.anchor,
            };

            let (preceding, rest) = self.nodes.split_at_mut(index);
            let list = &mut rest[0];
            list.clear();
            list.push(start);

            let ctx = UpdateContext {
                params: &self.params,
                preceding,
            };
            self.sections[index].update_section(list, &ctx);
            log::debug!(
                "section {index} ({:?}) generated {} nodes over {}",
                self.sections[index].kind(),
                list.len(),
                self.sections[index].length()
            );
        }
    }

    /// Maps a global node index to `(section, local index)`.
    pub fn locate(&self, mut index: usize) -> Option<(usize, usize)> {
        let last = self.nodes.len().checked_sub(1)?;
        for (section, list) in self.nodes.iter().enumerate() {
            let span = if section == last {
                list.len()
            } else {
                list.len().saturating_sub(1)
            };
            if index < span {
                return Some((section, index));
            }
            index -= span;
        }
        None
    }

    pub fn get_point(&self, index: usize) -> Option<&Node> {
        let (section, local) = self.locate(index)?;
        self.nodes[section].get(local)
    }

    /// Number of distinct nodes up to and including section `until`, or on
    /// the whole track.
    pub fn num_points(&self, until: Option<usize>) -> usize {
        let end = until.map_or(self.nodes.len(), |until| (until + 1).min(self.nodes.len()));
        let Some(last) = end.checked_sub(1) else {
            return 0;
        };
        let shared: usize = self.nodes[..last]
            .iter()
            .map(|list| list.len().saturating_sub(1))
            .sum();
        shared + self.nodes[last].len()
    }
}
