use super::geometry::Vec2;
use super::input::InputSnapshot;
use super::rendering::Surface;
use super::shape::Shape;

/// Generational handle into a [`SceneGraph`]. A handle whose node has been
/// removed stops resolving even if the slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Per-frame data handed to every `update` hook.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub dt: f32,
    pub input: &'a InputSnapshot,
}

/// Per-kind hooks for a scene node. Implemented by a closed enum of node
/// kinds; traversal itself lives on [`SceneGraph`] and is written once.
///
/// While a hook runs, the node's own kind is moved out of the graph, so
/// `graph.kind(id)` returns `None` for the running node.
pub trait NodeBehavior: Sized {
    fn update(&mut self, _id: NodeId, _graph: &mut SceneGraph<Self>, _frame: &FrameContext<'_>) {
    }

    fn draw(&self, _id: NodeId, _graph: &SceneGraph<Self>, _surface: &mut dyn Surface) {}

    fn shape(&self) -> Option<&Shape> {
        None
    }

    fn shape_mut(&mut self) -> Option<&mut Shape> {
        None
    }

    fn debug_title(&self, _graph: &SceneGraph<Self>) -> Option<String> {
        None
    }
}

#[derive(Debug)]
pub struct SceneNode<B> {
    pub position: Vec2,
    pub enabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: Option<B>,
}

impl<B> SceneNode<B> {
    pub fn new(position: Vec2, kind: B) -> Self {
        Self {
            position,
            enabled: true,
            parent: None,
            children: Vec::new(),
            kind: Some(kind),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn kind(&self) -> Option<&B> {
        self.kind.as_ref()
    }

    pub fn kind_mut(&mut self) -> Option<&mut B> {
        self.kind.as_mut()
    }
}

/// Arena that owns every node of one scene tree.
///
/// Ownership is the child list: a node belongs to exactly one parent and is
/// freed together with its subtree. Parent links are plain handles used for
/// position resolution only.
#[derive(Debug)]
pub struct SceneGraph<B> {
    slots: Vec<Option<SceneNode<B>>>,
    generations: Vec<u32>,
    free_indices: Vec<usize>,
}

impl<B> Default for SceneGraph<B> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_indices: Vec::new(),
        }
    }
}

impl<B> SceneGraph<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a detached node. It becomes part of a tree once attached.
    pub fn insert(&mut self, mut node: SceneNode<B>) -> NodeId {
        node.parent = None;
        node.children.clear();
        if let Some(index) = self.free_indices.pop() {
            self.slots[index] = Some(node);
            return NodeId {
                index: index as u32,
                generation: self.generations[index],
            };
        }

        let index = self.slots.len();
        self.slots.push(Some(node));
        self.generations.push(0);
        NodeId {
            index: index as u32,
            generation: 0,
        }
    }

    pub fn add_child(&mut self, parent: NodeId, node: SceneNode<B>) -> NodeId {
        let child = self.insert(node);
        self.attach(parent, child);
        child
    }

    /// Appends `child` to `parent`'s children and points it back at `parent`.
    ///
    /// Attaching a node that already has an owner, attaching to a missing
    /// parent, or creating a cycle is a programmer error: it asserts in debug
    /// builds and is ignored in release builds.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        let child_is_free = self.get(child).is_some_and(|node| node.parent.is_none());
        let valid =
            child_is_free && self.contains(parent) && !self.is_ancestor_or_self(child, parent);
        debug_assert!(valid, "attach rejected: parent={parent:?} child={child:?}");
        if !valid {
            return;
        }

        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Detaches `id` from its parent and frees it together with every
    /// descendant. Removing a missing node asserts in debug builds.
    pub fn remove_subtree(&mut self, id: NodeId) {
        debug_assert!(self.contains(id), "remove of missing node {id:?}");
        let Some(parent) = self.get(id).map(|node| node.parent) else {
            return;
        };
        if let Some(parent_node) = parent.and_then(|parent| self.get_mut(parent)) {
            parent_node.children.retain(|child| *child != id);
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.free_slot(next) {
                pending.extend(node.children);
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode<B>> {
        let index = id.index as usize;
        if self.generations.get(index) != Some(&id.generation) {
            return None;
        }
        self.slots[index].as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode<B>> {
        let index = id.index as usize;
        if self.generations.get(index) != Some(&id.generation) {
            return None;
        }
        self.slots[index].as_mut()
    }

    pub fn kind(&self, id: NodeId) -> Option<&B> {
        self.get(id).and_then(SceneNode::kind)
    }

    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut B> {
        self.get_mut(id).and_then(SceneNode::kind_mut)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(SceneNode::children).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Local position plus every ancestor's local position.
    pub fn abs_pos(&self, id: NodeId) -> Option<Vec2> {
        let mut node = self.get(id)?;
        let mut position = node.position;
        while let Some(parent) = node.parent.and_then(|parent| self.get(parent)) {
            position = position + parent.position;
            node = parent;
        }
        Some(position)
    }

    /// Sets `enabled` on direct children only.
    pub fn set_enable_children(&mut self, id: NodeId, enabled: bool) {
        let children = self.children(id).to_vec();
        for child in children {
            if let Some(node) = self.get_mut(child) {
                node.enabled = enabled;
            }
        }
    }

    pub fn first_child_where(
        &self,
        id: NodeId,
        mut predicate: impl FnMut(&B) -> bool,
    ) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.kind(*child).is_some_and(&mut predicate))
    }

    /// Moves the node's kind out of the arena for the duration of `f`, so the
    /// kind and the rest of the graph can be mutated together.
    pub fn with_kind_mut<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut B, &mut SceneGraph<B>) -> R,
    ) -> Option<R> {
        let mut kind = self.get_mut(id)?.kind.take()?;
        let result = f(&mut kind, self);
        if let Some(node) = self.get_mut(id) {
            node.kind = Some(kind);
        }
        Some(result)
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.get(current).and_then(|node| node.parent);
        }
        false
    }

    fn free_slot(&mut self, id: NodeId) -> Option<SceneNode<B>> {
        if !self.contains(id) {
            return None;
        }
        let index = id.index as usize;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_indices.push(index);
        self.slots[index].take()
    }
}

impl<B: NodeBehavior> SceneGraph<B> {
    /// Runs `update` on `id` and then on its children in insertion order.
    /// A disabled node skips its whole subtree.
    pub fn update_all(&mut self, id: NodeId, frame: &FrameContext<'_>) {
        if !self.get(id).is_some_and(|node| node.enabled) {
            return;
        }
        self.with_kind_mut(id, |kind, graph| kind.update(id, graph, frame));

        // Children removed by an earlier sibling no longer resolve and are skipped.
        let children = self.children(id).to_vec();
        for child in children {
            self.update_all(child, frame);
        }
    }

    /// Draws `id` and then its children. Disabled nodes still draw.
    pub fn draw_all(&self, id: NodeId, surface: &mut dyn Surface) {
        let Some(node) = self.get(id) else {
            return;
        };
        if let Some(kind) = node.kind() {
            kind.draw(id, self, surface);
        }
        for child in node.children() {
            self.draw_all(*child, surface);
        }
    }

    /// Recomputes a shaped node's bounding box from its absolute position.
    pub fn refresh_bounds(&mut self, id: NodeId) {
        let Some(position) = self.abs_pos(id) else {
            return;
        };
        if let Some(shape) = self.kind_mut(id).and_then(NodeBehavior::shape_mut) {
            shape.refresh_bounds(position);
        }
    }

    pub fn shape(&self, id: NodeId) -> Option<&Shape> {
        self.kind(id).and_then(NodeBehavior::shape)
    }

    /// First title offered by a node, depth-first from `id`.
    pub fn debug_title(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        node.kind()
            .and_then(|kind| kind.debug_title(self))
            .or_else(|| {
                node.children()
                    .iter()
                    .find_map(|child| self.debug_title(*child))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::geometry::{Rect, Rgba};
    use crate::app::rendering::Bitmap;

    #[derive(Debug, Default)]
    struct Probe {
        updates: u32,
        label: &'static str,
    }

    impl NodeBehavior for Probe {
        fn update(
            &mut self,
            _id: NodeId,
            _graph: &mut SceneGraph<Self>,
            _frame: &FrameContext<'_>,
        ) {
            self.updates += 1;
        }

        fn draw(&self, _id: NodeId, _graph: &SceneGraph<Self>, surface: &mut dyn Surface) {
            surface.draw_text(Vec2::ZERO, self.label, [0, 0, 0, 255]);
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        labels: Vec<String>,
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (0, 0)
        }
        fn fill(&mut self, _color: Rgba) {}
        fn fill_rect(&mut self, _rect: Rect, _color: Rgba) {}
        fn blit(&mut self, _bitmap: &Bitmap, _dest: Rect) {}
        fn draw_line(&mut self, _from: Vec2, _to: Vec2, _color: Rgba) {}
        fn draw_text(&mut self, _origin: Vec2, text: &str, _color: Rgba) {
            self.labels.push(text.to_string());
        }
    }

    fn probe(label: &'static str) -> Probe {
        Probe { updates: 0, label }
    }

    fn frame(input: &InputSnapshot) -> FrameContext<'_> {
        FrameContext { dt: 0.016, input }
    }

    fn updates(graph: &SceneGraph<Probe>, id: NodeId) -> u32 {
        graph.kind(id).expect("probe").updates
    }

    #[test]
    fn abs_pos_accumulates_through_ownership_chain() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(SceneNode::new(Vec2::new(10.0, 20.0), probe("root")));
        let mid = graph.add_child(root, SceneNode::new(Vec2::new(5.0, -3.0), probe("mid")));
        let leaf = graph.add_child(mid, SceneNode::new(Vec2::new(1.5, 2.5), probe("leaf")));

        assert_eq!(graph.abs_pos(root), Some(Vec2::new(10.0, 20.0)));
        assert_eq!(graph.abs_pos(mid), Some(Vec2::new(15.0, 17.0)));
        assert_eq!(graph.abs_pos(leaf), Some(Vec2::new(16.5, 19.5)));
        assert_eq!(graph.get(leaf).and_then(SceneNode::parent), Some(mid));
    }

    #[test]
    fn disabled_subtree_skips_update_but_still_draws() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(SceneNode::new(Vec2::ZERO, probe("root")));
        let frozen = graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("frozen")));
        let grandchild = graph.add_child(frozen, SceneNode::new(Vec2::ZERO, probe("grandchild")));
        let live = graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("live")));
        graph.get_mut(frozen).expect("frozen").enabled = false;

        let input = InputSnapshot::empty();
        graph.update_all(root, &frame(&input));
        graph.update_all(root, &frame(&input));

        assert_eq!(updates(&graph, root), 2);
        assert_eq!(updates(&graph, frozen), 0);
        assert_eq!(updates(&graph, grandchild), 0);
        assert_eq!(updates(&graph, live), 2);

        let mut surface = RecordingSurface::default();
        graph.draw_all(root, &mut surface);
        assert_eq!(surface.labels, ["root", "frozen", "grandchild", "live"]);
    }

    #[test]
    fn set_enable_children_touches_one_level_only() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(SceneNode::new(Vec2::ZERO, probe("root")));
        let child = graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("child")));
        let grandchild = graph.add_child(child, SceneNode::new(Vec2::ZERO, probe("grandchild")));

        graph.set_enable_children(root, false);
        assert!(graph.get(root).expect("root").enabled);
        assert!(!graph.get(child).expect("child").enabled);
        assert!(graph.get(grandchild).expect("grandchild").enabled);

        graph.set_enable_children(root, true);
        assert!(graph.get(child).expect("child").enabled);
    }

    #[test]
    fn remove_subtree_frees_descendants_and_invalidates_handles() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(SceneNode::new(Vec2::ZERO, probe("root")));
        let branch = graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("branch")));
        let leaf = graph.add_child(branch, SceneNode::new(Vec2::ZERO, probe("leaf")));
        let sibling = graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("sibling")));

        graph.remove_subtree(branch);
        assert!(!graph.contains(branch));
        assert!(!graph.contains(leaf));
        assert_eq!(graph.children(root), &[sibling]);
        assert_eq!(graph.len(), 2);

        let reused = graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("reused")));
        assert_ne!(reused, branch);
        assert!(graph.get(branch).is_none());
    }

    #[test]
    fn first_child_where_returns_first_match_in_insertion_order() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(SceneNode::new(Vec2::ZERO, probe("root")));
        graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("a")));
        let first_b = graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("b")));
        graph.add_child(root, SceneNode::new(Vec2::ZERO, probe("b")));

        assert_eq!(graph.first_child_where(root, |kind| kind.label == "b"), Some(first_b));
        assert_eq!(graph.first_child_where(root, |kind| kind.label == "z"), None);
    }

    #[test]
    fn with_kind_mut_restores_kind_after_callback() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(SceneNode::new(Vec2::ZERO, probe("root")));
        let seen_inside = graph.with_kind_mut(root, |kind, graph| {
            kind.updates = 7;
            graph.kind(root).is_none()
        });
        assert_eq!(seen_inside, Some(true));
        assert_eq!(updates(&graph, root), 7);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "attach rejected"))]
    fn attaching_owned_node_is_rejected() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(SceneNode::new(Vec2::ZERO, probe("a")));
        let b = graph.insert(SceneNode::new(Vec2::ZERO, probe("b")));
        let child = graph.add_child(a, SceneNode::new(Vec2::ZERO, probe("child")));
        graph.attach(b, child);
        assert_eq!(graph.children(b), &[] as &[NodeId]);
        assert_eq!(graph.children(a), &[child]);
    }
}
