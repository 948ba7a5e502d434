use tracing::warn;

use crate::error::{ChartError, ChartResult};
use crate::render::NodeId;

use super::ContentKey;

/// Ordered Gantt rows kept as three index-aligned sequences.
///
/// Invariant: `keys`, `controllers` and `nodes` always have the same length
/// and entry `i` of each describes the same row. Only `insert` and `remove`
/// mutate them, and both touch all three sequences together.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackCollection<C> {
    keys: Vec<ContentKey>,
    controllers: Vec<C>,
    nodes: Vec<NodeId>,
}

impl<C> Default for TrackCollection<C> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            controllers: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

impl<C> TrackCollection<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn keys(&self) -> &[ContentKey] {
        &self.keys
    }

    #[must_use]
    pub fn controllers(&self) -> &[C] {
        &self.controllers
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[must_use]
    pub fn position(&self, key: &ContentKey) -> Option<usize> {
        self.keys.iter().position(|candidate| candidate == key)
    }

    #[must_use]
    pub fn contains(&self, key: &ContentKey) -> bool {
        self.position(key).is_some()
    }

    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.keys.len() == self.controllers.len() && self.keys.len() == self.nodes.len()
    }

    /// Inserts one row at `index`, clamped to the current length.
    ///
    /// Returns the index actually used.
    pub fn insert(&mut self, index: usize, key: ContentKey, controller: C, node: NodeId) -> usize {
        let index = index.min(self.len());
        self.keys.insert(index, key);
        self.controllers.insert(index, controller);
        self.nodes.insert(index, node);
        debug_assert!(self.is_aligned());
        index
    }

    /// Removes the row for `key` from all three sequences.
    ///
    /// A missing key fails with `InvalidObjectProvided` and leaves the
    /// collection untouched.
    pub fn remove(&mut self, key: &ContentKey) -> ChartResult<(usize, C, NodeId)> {
        let index = self
            .position(key)
            .ok_or_else(|| ChartError::InvalidObjectProvided {
                key: key.to_string(),
            })?;
        self.keys.remove(index);
        let controller = self.controllers.remove(index);
        let node = self.nodes.remove(index);
        debug_assert!(self.is_aligned());
        Ok((index, controller, node))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContentKey, &C, NodeId)> {
        self.keys
            .iter()
            .zip(&self.controllers)
            .zip(self.nodes.iter().copied())
            .map(|((key, controller), node)| (key, controller, node))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ContentKey, &mut C, NodeId)> {
        self.keys
            .iter()
            .zip(self.controllers.iter_mut())
            .zip(self.nodes.iter().copied())
            .map(|((key, controller), node)| (key, controller, node))
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.controllers.clear();
        self.nodes.clear();
    }
}

/// Insertion index for a new row: the explicit position when given
/// (clamped to the row count), otherwise append.
#[must_use]
pub fn prepare_load_at_index(track_count: usize, load_at_index: Option<usize>) -> usize {
    match load_at_index {
        Some(index) if index > track_count => {
            warn!(index, track_count, "load index past the last track, appending");
            track_count
        }
        Some(index) => index,
        None => track_count,
    }
}
