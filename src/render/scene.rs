use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// Handle of a scene node: an arena slot plus the generation it was
/// allocated in. A freed slot bumps its generation, so stale handles
/// never resolve to the node that reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    fn slot(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Outer wrapper appended to the host container.
    Container,
    /// Root `<svg>` element.
    Canvas { width: f64, height: f64 },
    Group,
    ClipPath {
        id: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Text(TextPrimitive),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub class: String,
    pub translate: (f64, f64),
    pub clip_path: Option<String>,
    pub visible: bool,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl SceneNode {
    fn new(kind: NodeKind, class: &str, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            class: class.to_owned(),
            translate: (0.0, 0.0),
            clip_path: None,
            visible: true,
            parent,
            children: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Retained vector scene owned by one chart instance.
///
/// Nodes live in an arena. Removal frees the whole subtree and puts the
/// slots on a free list; new nodes reuse freed slots under a new
/// generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    live: usize,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Arena slots allocated so far, live or free.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.slot())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> ChartResult<&mut SceneNode> {
        self.slots
            .get_mut(id.slot())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| missing_node(id))
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[][..], SceneNode::children)
    }

    pub fn append_root(&mut self, kind: NodeKind, class: &str) -> ChartResult<NodeId> {
        let id = self.allocate(SceneNode::new(kind, class, None))?;
        self.roots.push(id);
        Ok(id)
    }

    pub fn append(&mut self, parent: NodeId, kind: NodeKind, class: &str) -> ChartResult<NodeId> {
        let position = self.children(parent).len();
        self.insert(parent, position, kind, class)
    }

    /// Inserts a child at `position` among its siblings (clamped to the end).
    pub fn insert(
        &mut self,
        parent: NodeId,
        position: usize,
        kind: NodeKind,
        class: &str,
    ) -> ChartResult<NodeId> {
        if !self.contains(parent) {
            return Err(missing_node(parent));
        }
        let id = self.allocate(SceneNode::new(kind, class, Some(parent)))?;
        let parent_node = self.node_mut(parent)?;
        let position = position.min(parent_node.children.len());
        parent_node.children.insert(position, id);
        Ok(id)
    }

    /// Overwrites the child at `position` in place, keeping its id, its
    /// own children and its transform. Appends when the parent has no
    /// child there yet.
    pub fn set_child(
        &mut self,
        parent: NodeId,
        position: usize,
        kind: NodeKind,
        class: &str,
    ) -> ChartResult<NodeId> {
        let existing = self.children(parent).get(position).copied();
        let Some(id) = existing else {
            return self.append(parent, kind, class);
        };
        let node = self.node_mut(id)?;
        node.kind = kind;
        if node.class != class {
            node.class = class.to_owned();
        }
        Ok(id)
    }

    /// Removes a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> ChartResult<()> {
        let parent = self.node(id).ok_or_else(|| missing_node(id))?.parent;
        match parent {
            Some(parent) => {
                let parent_node = self.node_mut(parent)?;
                parent_node.children.retain(|child| *child != id);
            }
            None => self.roots.retain(|root| *root != id),
        }
        self.free_subtree(id);
        Ok(())
    }

    pub fn clear_children(&mut self, id: NodeId) -> ChartResult<()> {
        self.truncate_children(id, 0)
    }

    /// Drops every child of `id` past the first `len`, with their subtrees.
    pub fn truncate_children(&mut self, id: NodeId, len: usize) -> ChartResult<()> {
        let node = self.node_mut(id)?;
        if node.children.len() <= len {
            return Ok(());
        }
        let dropped: SmallVec<[NodeId; 4]> = node.children.drain(len..).collect();
        for child in dropped {
            self.free_subtree(child);
        }
        Ok(())
    }

    pub fn set_translate(&mut self, id: NodeId, x: f64, y: f64) -> ChartResult<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ChartError::InvalidData(
                "translation must be finite".to_owned(),
            ));
        }
        self.node_mut(id)?.translate = (x, y);
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> ChartResult<()> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    /// Ids of live nodes carrying `class`, in depth-first document order.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.node(id) {
                if node.class == class {
                    found.push(id);
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    /// Frees every node. Slots stay allocated so ids handed out before the
    /// clear stay stale.
    pub fn clear(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        for root in roots {
            self.free_subtree(root);
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for node in self.slots.iter().filter_map(|slot| slot.node.as_ref()) {
            match &node.kind {
                NodeKind::Line(line) => line.validate()?,
                NodeKind::Rect(rect) => rect.validate()?,
                NodeKind::Circle(circle) => circle.validate()?,
                NodeKind::Text(text) => text.validate()?,
                NodeKind::Canvas { width, height } => {
                    if !width.is_finite() || !height.is_finite() || *width < 0.0 || *height < 0.0 {
                        return Err(ChartError::InvalidData(
                            "canvas size must be finite and >= 0".to_owned(),
                        ));
                    }
                }
                NodeKind::Container | NodeKind::Group | NodeKind::ClipPath { .. } => {}
            }
        }
        Ok(())
    }

    fn allocate(&mut self, node: SceneNode) -> ChartResult<NodeId> {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                let generation = slot.generation;
                slot.node = Some(node);
                self.live += 1;
                return Ok(NodeId { index, generation });
            }
        }
        let index = u32::try_from(self.slots.len())
            .map_err(|_| ChartError::InvalidData("scene node arena is exhausted".to_owned()))?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        self.live += 1;
        Ok(NodeId {
            index,
            generation: 0,
        })
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.slot())
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                self.live -= 1;
                stack.extend(node.children);
            }
        }
    }
}

fn missing_node(id: NodeId) -> ChartError {
    ChartError::InvalidData(format!(
        "scene node {}v{} does not exist",
        id.index(),
        id.generation()
    ))
}

#[cfg(test)]
mod tests {
    use super::{NodeKind, Scene};

    #[test]
    fn insert_places_child_at_requested_position() {
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").unwrap();
        let a = scene.append(root, NodeKind::Group, "a").unwrap();
        let b = scene.append(root, NodeKind::Group, "b").unwrap();
        let c = scene.insert(root, 1, NodeKind::Group, "c").unwrap();
        assert_eq!(scene.children(root), &[a, c, b]);
        let d = scene.insert(root, 99, NodeKind::Group, "d").unwrap();
        assert_eq!(scene.children(root), &[a, c, b, d]);
    }

    #[test]
    fn remove_frees_entire_subtree() {
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").unwrap();
        let group = scene.append(root, NodeKind::Group, "track").unwrap();
        let leaf = scene.append(group, NodeKind::Group, "leaf").unwrap();
        assert_eq!(scene.len(), 3);

        scene.remove(group).unwrap();
        assert_eq!(scene.len(), 1);
        assert!(!scene.contains(leaf));
        assert!(scene.children(root).is_empty());
        assert!(scene.remove(group).is_err());
    }

    #[test]
    fn find_by_class_walks_in_document_order() {
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").unwrap();
        let first = scene.append(root, NodeKind::Group, "tick").unwrap();
        let nested = scene.append(first, NodeKind::Group, "tick").unwrap();
        let second = scene.append(root, NodeKind::Group, "tick").unwrap();
        assert_eq!(scene.find_by_class("tick"), vec![first, nested, second]);
    }

    #[test]
    fn freed_slots_are_reused_under_a_new_generation() {
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").unwrap();
        let old = scene.append(root, NodeKind::Group, "old").unwrap();
        scene.remove(old).unwrap();

        let new = scene.append(root, NodeKind::Group, "new").unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert!(!scene.contains(old));
        assert!(scene.node_mut(old).is_err());
        assert_eq!(scene.node(new).unwrap().class, "new");
        assert_eq!(scene.slot_count(), 2);
    }

    #[test]
    fn rebuilding_children_keeps_the_arena_flat() {
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").unwrap();
        for _ in 0..100 {
            scene.clear_children(root).unwrap();
            for _ in 0..5 {
                scene.append(root, NodeKind::Group, "tick").unwrap();
            }
        }
        assert_eq!(scene.len(), 6);
        assert_eq!(scene.slot_count(), 6);
    }

    #[test]
    fn set_child_updates_in_place_and_appends_past_the_end() {
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").unwrap();
        let first = scene.set_child(root, 0, NodeKind::Group, "a").unwrap();
        let leaf = scene.append(first, NodeKind::Group, "leaf").unwrap();
        scene.set_translate(first, 3.0, 4.0).unwrap();

        let same = scene.set_child(root, 0, NodeKind::Group, "b").unwrap();
        assert_eq!(same, first);
        let node = scene.node(first).unwrap();
        assert_eq!(node.class, "b");
        assert_eq!(node.translate, (3.0, 4.0));
        assert_eq!(node.children(), &[leaf]);

        let second = scene.set_child(root, 1, NodeKind::Group, "c").unwrap();
        assert_eq!(scene.children(root), &[first, second]);
    }

    #[test]
    fn truncate_children_frees_only_the_tail() {
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").unwrap();
        let kept = scene.append(root, NodeKind::Group, "kept").unwrap();
        let dropped = scene.append(root, NodeKind::Group, "dropped").unwrap();
        scene.append(dropped, NodeKind::Group, "nested").unwrap();

        scene.truncate_children(root, 1).unwrap();
        assert_eq!(scene.children(root), &[kept]);
        assert!(!scene.contains(dropped));
        assert_eq!(scene.len(), 2);
        scene.truncate_children(root, 5).unwrap();
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn clear_leaves_old_ids_stale() {
        let mut scene = Scene::new();
        let root = scene.append_root(NodeKind::Group, "root").unwrap();
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.roots().is_empty());
        let fresh = scene.append_root(NodeKind::Group, "fresh").unwrap();
        assert!(!scene.contains(root));
        assert!(scene.contains(fresh));
    }
}
