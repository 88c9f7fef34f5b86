use lanescroll::{
    Curve, ItemSource, LayoutConstraint, LayoutTree, NodeId, OffsetF, ScrollAlign, ScrollResult,
    SizeF,
};

use crate::{FrameScheduler, ScrollAnchor, apply_anchor, capture_first_visible_anchor};

/// A framework-neutral controller that owns a `lanescroll::LayoutTree` and runs the common
/// adapter workflows (gestures, frame ticks, animated scrolling, anchoring).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `layout(viewport)` when the viewport size changes
/// - `on_drag_*` when gesture events occur
/// - `tick(now_ms)` each frame while [`Self::is_animating`] is true
///
/// Every call leaves the tree laid out and the scroll bars synced, so the adapter can
/// render straight from the node frames and list placements afterwards.
#[derive(Debug, Default)]
pub struct Controller {
    tree: LayoutTree,
    root: Option<NodeId>,
    viewport: Option<SizeF>,
    frames: FrameScheduler,
}

impl Controller {
    pub fn new(tree: LayoutTree, root: NodeId) -> Self {
        Self {
            tree,
            root: Some(root),
            viewport: None,
            frames: FrameScheduler::new(),
        }
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Grants mutable access to the tree.
    ///
    /// Call [`Self::refresh`] afterwards if anything moved.
    pub fn tree_mut(&mut self) -> &mut LayoutTree {
        &mut self.tree
    }

    pub fn into_tree(self) -> LayoutTree {
        self.tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
        if let Some(viewport) = self.viewport {
            self.layout(viewport);
        }
    }

    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    pub fn is_animating(&self) -> bool {
        self.frames.has_pending()
    }

    /// Measures the root into `viewport` and lays the tree out.
    pub fn layout(&mut self, viewport: SizeF) -> SizeF {
        self.viewport = Some(viewport);
        let Some(root) = self.root else {
            return SizeF::ZERO;
        };
        adebug!(width = viewport.width, height = viewport.height, "Controller::layout");
        let size = self.tree.measure(root, &LayoutConstraint::tight(viewport));
        self.refresh();
        size
    }

    /// Syncs scroll bars and re-places every node after offsets changed.
    pub fn refresh(&mut self) {
        self.tree.sync_scroll_bar_proxies();
        if let Some(root) = self.root {
            self.tree.layout(root, OffsetF::default());
        }
    }

    pub fn on_drag_start(&mut self, id: NodeId) {
        self.tree.on_drag_start(id);
        self.reschedule();
        self.refresh();
    }

    pub fn on_drag_update(&mut self, id: NodeId, delta: f32) -> ScrollResult {
        let result = self.tree.on_drag_update(id, delta);
        self.refresh();
        result
    }

    /// Ends a drag with `velocity` in offset units per second.
    pub fn on_drag_end(&mut self, id: NodeId, velocity: f32) {
        self.tree.on_drag_end(id, velocity);
        self.reschedule();
        self.refresh();
    }

    /// Drags the thumb of scroll bar `bar`. Returns the content offset it maps to.
    pub fn on_thumb_drag(&mut self, bar: NodeId, delta: f32) -> Option<f32> {
        let offset = self.tree.scroll_bar_mut(bar)?.on_thumb_drag(delta);
        self.refresh();
        offset
    }

    /// Jumps to `position` (no animation). Returns whether anything moved.
    pub fn scroll_to(&mut self, id: NodeId, position: f32) -> bool {
        let moved = self.tree.scroll_to(id, position);
        self.reschedule();
        self.refresh();
        moved
    }

    /// Starts an animated scroll; drive it with [`Self::tick`].
    pub fn animate_to(
        &mut self,
        id: NodeId,
        position: f32,
        duration_ms: u64,
        curve: Curve,
        now_ms: u64,
    ) {
        self.tree.animate_to(id, position, duration_ms, curve, now_ms);
        self.reschedule();
        self.refresh();
    }

    pub fn jump_to_index(&mut self, id: NodeId, index: usize, align: ScrollAlign) {
        self.tree.jump_to_index(id, index, align);
        self.reschedule();
        self.refresh();
    }

    /// Runs one frame: advances every node that asked for it, then relays out and syncs
    /// scroll bars. Returns whether another frame is needed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let frame = self.frames.begin_frame(now_ms);
        if frame.nodes.is_empty() {
            return false;
        }
        for &id in &frame.nodes {
            self.tree.tick_node(id, now_ms);
        }
        self.reschedule();
        self.refresh();
        atrace!(
            now_ms,
            elapsed_ms = ?frame.elapsed_ms,
            pending = self.frames.has_pending(),
            "Controller::tick"
        );
        self.frames.has_pending()
    }

    /// Stops every motion in the tree.
    pub fn stop(&mut self) {
        let pending: Vec<NodeId> = self.frames.pending().collect();
        for id in pending {
            if let Some(m) = self.tree.motion_mut(id) {
                m.stop_scrollable();
            }
            self.frames.cancel_frame(id);
        }
        self.refresh();
    }

    pub fn capture_first_visible_anchor<K>(
        &self,
        list: NodeId,
        key_for: impl FnOnce(usize) -> K,
    ) -> Option<ScrollAnchor<K>> {
        capture_first_visible_anchor(self.tree.list(list)?, key_for)
    }

    /// Re-places a previously captured anchor, stopping any motion of the list first.
    pub fn apply_anchor<K>(
        &mut self,
        list: NodeId,
        anchor: &ScrollAnchor<K>,
        key_to_index: impl FnOnce(&K) -> Option<usize>,
    ) -> bool {
        if let Some(m) = self.tree.motion_mut(list) {
            m.abort_scroll_animator();
        }
        let Some(lane_list) = self.tree.list_mut(list) else {
            return false;
        };
        let applied = apply_anchor(lane_list, anchor, key_to_index);
        self.tree.with_motion(list, |m, s| m.sync_from(s));
        self.reschedule();
        self.refresh();
        applied
    }

    /// Swaps the items of `list` and keeps the first visible item in place by key.
    ///
    /// `key_for` identifies items of the old data set, `key_to_index` finds them in the new
    /// one. Returns whether the anchor could be re-applied.
    pub fn set_items_anchored<K>(
        &mut self,
        list: NodeId,
        items: impl ItemSource + 'static,
        key_for: impl FnOnce(usize) -> K,
        key_to_index: impl FnOnce(&K) -> Option<usize>,
    ) -> bool {
        let anchor = self.capture_first_visible_anchor(list, key_for);
        let Some(lane_list) = self.tree.list_mut(list) else {
            return false;
        };
        lane_list.set_items(items);
        match anchor {
            Some(anchor) => self.apply_anchor(list, &anchor, key_to_index),
            None => {
                self.tree.with_motion(list, |m, s| m.sync_from(s));
                self.refresh();
                false
            }
        }
    }

    /// Requests frames for every moving node and withdraws the rest.
    fn reschedule(&mut self) {
        let moving = self.tree.animating_nodes();
        let stale: Vec<NodeId> = self
            .frames
            .pending()
            .filter(|id| !moving.contains(id))
            .collect();
        for id in stale {
            self.frames.cancel_frame(id);
        }
        for id in moving {
            if self.frames.request_frame(id) {
                atrace!(node = id.index(), "frame requested");
            }
        }
    }
}
