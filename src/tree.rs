use crate::geometry::near_zero;
use crate::nested::{Handoff, route_remainder};
use crate::{
    Axis, Curve, LaneList, LayoutConstraint, OffsetF, ProxyEvent, ScrollAlign, ScrollBarProxy,
    ScrollBarSynchronizer, ScrollBox, ScrollPhase, ScrollResult, ScrollSource, Scrollable,
    ScrollableMotionController, SizeF,
};

/// Stable handle of a node in a [`LayoutTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A non-scrolling box that stacks its children along `axis`, or takes an explicit size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenericBox {
    pub axis: Axis,
    pub size: Option<SizeF>,
}

impl GenericBox {
    pub fn new(axis: Axis) -> Self {
        Self { axis, size: None }
    }

    pub fn fixed(size: SizeF) -> Self {
        Self {
            axis: Axis::Vertical,
            size: Some(size),
        }
    }
}

/// The closed set of layout strategies a node can carry.
#[derive(Debug)]
pub enum Layoutable {
    List(LaneList),
    Scroll(ScrollBox),
    ScrollBar(ScrollBarSynchronizer),
    Generic(GenericBox),
}

impl Layoutable {
    pub fn as_scrollable(&self) -> Option<&dyn Scrollable> {
        match self {
            Self::List(list) => Some(list),
            Self::Scroll(b) => Some(b),
            Self::ScrollBar(_) | Self::Generic(_) => None,
        }
    }

    pub fn as_scrollable_mut(&mut self) -> Option<&mut dyn Scrollable> {
        match self {
            Self::List(list) => Some(list),
            Self::Scroll(b) => Some(b),
            Self::ScrollBar(_) | Self::Generic(_) => None,
        }
    }
}

/// Where a node landed in its parent after layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    /// Offset relative to the parent's origin.
    pub offset: OffsetF,
    pub size: SizeF,
}

#[derive(Debug)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    layoutable: Layoutable,
    motion: Option<ScrollableMotionController>,
    frame: Frame,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn layoutable(&self) -> &Layoutable {
        &self.layoutable
    }

    pub fn motion(&self) -> Option<&ScrollableMotionController> {
        self.motion.as_ref()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }
}

/// An arena of layout nodes.
///
/// Nodes own their child ids and keep a plain id back to their parent. Measure and layout
/// run synchronously from a root; scroll input and frame ticks are routed through the
/// nested scroll protocol along the parent chain.
#[derive(Debug, Default)]
pub struct LayoutTree {
    nodes: Vec<Node>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_node(&mut self, layoutable: Layoutable) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            layoutable,
            motion: None,
            frame: Frame::default(),
        });
        id
    }

    pub fn add_child(&mut self, parent: NodeId, layoutable: Layoutable) -> NodeId {
        let id = self.add_node(layoutable);
        self.append_child(parent, id);
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(parent.0 < self.nodes.len() && child.0 < self.nodes.len());
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() || parent == child {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Unlinks `id` from its parent. The node stays addressable.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(Node::parent) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        self.nodes[id.0].parent = None;
    }

    /// Makes `id` a scrollable driven by `motion`.
    pub fn set_motion(&mut self, id: NodeId, motion: ScrollableMotionController) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            debug_assert!(false, "set_motion: unknown node {id:?}");
            return;
        };
        debug_assert!(
            node.layoutable.as_scrollable().is_some(),
            "set_motion: node {id:?} cannot scroll"
        );
        let mut motion = motion;
        if let Some(s) = node.layoutable.as_scrollable() {
            motion.sync_from(s);
        }
        node.motion = Some(motion);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn frame(&self, id: NodeId) -> Option<Frame> {
        self.node(id).map(|n| n.frame)
    }

    pub fn layoutable_mut(&mut self, id: NodeId) -> Option<&mut Layoutable> {
        self.nodes.get_mut(id.0).map(|n| &mut n.layoutable)
    }

    pub fn list(&self, id: NodeId) -> Option<&LaneList> {
        match &self.node(id)?.layoutable {
            Layoutable::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, id: NodeId) -> Option<&mut LaneList> {
        match self.layoutable_mut(id)? {
            Layoutable::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn scroll_bar(&self, id: NodeId) -> Option<&ScrollBarSynchronizer> {
        match &self.node(id)?.layoutable {
            Layoutable::ScrollBar(bar) => Some(bar),
            _ => None,
        }
    }

    pub fn scroll_bar_mut(&mut self, id: NodeId) -> Option<&mut ScrollBarSynchronizer> {
        match self.layoutable_mut(id)? {
            Layoutable::ScrollBar(bar) => Some(bar),
            _ => None,
        }
    }

    pub fn motion(&self, id: NodeId) -> Option<&ScrollableMotionController> {
        self.node(id)?.motion.as_ref()
    }

    pub fn motion_mut(&mut self, id: NodeId) -> Option<&mut ScrollableMotionController> {
        self.nodes.get_mut(id.0)?.motion.as_mut()
    }

    pub fn scrollable(&self, id: NodeId) -> Option<&dyn Scrollable> {
        self.node(id)?.layoutable.as_scrollable()
    }

    /// Runs `f` with the motion controller of `id` and the scrollable it drives.
    pub fn with_motion<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut ScrollableMotionController, &mut dyn Scrollable) -> R,
    ) -> Option<R> {
        let node = self.nodes.get_mut(id.0)?;
        let motion = node.motion.as_mut()?;
        let s = node.layoutable.as_scrollable_mut()?;
        Some(f(motion, s))
    }

    /// Nearest ancestor of `id` carrying a motion controller.
    pub fn parent_scrollable(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if self.motion(p).is_some() {
                return Some(p);
            }
            cur = self.parent(p);
        }
        None
    }

    fn scrollable_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.parent_scrollable(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent_scrollable(p);
        }
        out
    }

    /// Measures `id` and its subtree under `constraint` and returns its size.
    pub fn measure(&mut self, id: NodeId, constraint: &LayoutConstraint) -> SizeF {
        let Some(node) = self.nodes.get(id.0) else {
            debug_assert!(false, "measure: unknown node {id:?}");
            return SizeF::ZERO;
        };
        let children = node.children.clone();

        let size = match &node.layoutable {
            Layoutable::List(_) => {
                let Layoutable::List(list) = &mut self.nodes[id.0].layoutable else {
                    return SizeF::ZERO;
                };
                list.measure(constraint)
            }
            Layoutable::Scroll(b) => {
                let axis = b.axis();
                let child_constraint = b.child_constraint(constraint);
                let mut content = SizeF::ZERO;
                for &child in &children {
                    let size = self.measure(child, &child_constraint);
                    content.set_main(axis, content.main(axis).max(size.main(axis)));
                    content.set_cross(axis, content.cross(axis).max(size.cross(axis)));
                }
                let Layoutable::Scroll(b) = &mut self.nodes[id.0].layoutable else {
                    return SizeF::ZERO;
                };
                b.measure(constraint, content)
            }
            Layoutable::ScrollBar(bar) => {
                let child_constraint = bar.child_constraint(constraint);
                let child_size = match children.first() {
                    Some(&child) => self.measure(child, &child_constraint),
                    None => SizeF::ZERO,
                };
                let Layoutable::ScrollBar(bar) = &mut self.nodes[id.0].layoutable else {
                    return SizeF::ZERO;
                };
                bar.measure(constraint, child_size)
            }
            Layoutable::Generic(generic) => {
                let generic = *generic;
                self.measure_generic(generic, &children, constraint)
            }
        };

        let node = &mut self.nodes[id.0];
        node.frame.size = size;
        if let (Some(motion), Some(s)) = (node.motion.as_mut(), node.layoutable.as_scrollable()) {
            motion.sync_from(s);
        }
        size
    }

    fn measure_generic(
        &mut self,
        generic: GenericBox,
        children: &[NodeId],
        constraint: &LayoutConstraint,
    ) -> SizeF {
        let axis = generic.axis;
        let max = generic.size.unwrap_or(constraint.max_size);
        // Each child may take what its earlier siblings left along the stacking axis.
        let mut remaining = max.main(axis);
        let mut stacked = SizeF::ZERO;
        for &child in children {
            let mut child_constraint = LayoutConstraint::loose(max);
            child_constraint.max_size.set_main(axis, remaining.max(0.0));
            let size = self.measure(child, &child_constraint);
            remaining -= size.main(axis);
            stacked.set_main(axis, stacked.main(axis) + size.main(axis));
            stacked.set_cross(axis, stacked.cross(axis).max(size.cross(axis)));
        }
        generic
            .size
            .unwrap_or(stacked)
            .constrain(constraint.min_size, constraint.max_size)
    }

    /// Places `id` at `offset` inside its parent and lays out its subtree.
    pub fn layout(&mut self, id: NodeId, offset: OffsetF) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            debug_assert!(false, "layout: unknown node {id:?}");
            return;
        };
        node.frame.offset = offset;
        let children = node.children.clone();

        match &mut node.layoutable {
            Layoutable::List(list) => {
                list.layout();
            }
            Layoutable::Scroll(b) => {
                let axis = b.axis();
                let main = -b.current_offset();
                for child in children {
                    self.layout(child, OffsetF::from_main_cross(axis, main, 0.0));
                }
            }
            Layoutable::ScrollBar(bar) => {
                let thumb = bar.layout();
                if let Some(&child) = children.first() {
                    self.layout(child, thumb);
                }
            }
            Layoutable::Generic(generic) => {
                let axis = generic.axis;
                let mut main = 0.0;
                for child in children {
                    self.layout(child, OffsetF::from_main_cross(axis, main, 0.0));
                    main += self.frame(child).map_or(0.0, |f| f.size.main(axis));
                }
            }
        }
    }

    /// Routes `delta` into `id` through the nested scroll protocol.
    ///
    /// The scrollable first takes the in-range part. The rest goes to the scrollable itself
    /// (as overscroll or clamped away) or to the nearest scrollable ancestor, depending on
    /// the nested mode for the delta's direction. `consumed + forwarded == delta` always
    /// holds.
    pub fn handle_scroll(&mut self, id: NodeId, delta: f32, source: ScrollSource) -> ScrollResult {
        if !delta.is_finite() || delta == 0.0 {
            return ScrollResult::default();
        }
        let parent = self.parent_scrollable(id);
        let enabled = self.motion(id).is_some_and(|m| m.options().scroll_enabled);
        if !enabled {
            return match parent {
                Some(p) => {
                    self.handle_scroll(p, delta, source);
                    ScrollResult {
                        consumed: 0.0,
                        forwarded: delta,
                    }
                }
                // Nobody to hand it to: refused here, nothing moves.
                None => ScrollResult {
                    consumed: delta,
                    forwarded: 0.0,
                },
            };
        }

        let step = self.with_motion(id, |m, s| {
            let in_range = m.consume_in_range(s, delta, source);
            let rest = delta - in_range;
            (in_range, rest, m.nested_mode(rest), m.can_over_scroll(source, s))
        });
        let Some((in_range, rest, mode, self_can_overscroll)) = step else {
            return ScrollResult {
                consumed: delta,
                forwarded: 0.0,
            };
        };
        if near_zero(rest) {
            return ScrollResult {
                consumed: delta,
                forwarded: 0.0,
            };
        }

        let parent_can_consume = parent.map(|p| {
            self.with_motion(p, |m, s| {
                m.sync_from(s);
                m.can_consume(s, rest, source)
            })
            .unwrap_or(false)
        });
        let handoff = route_remainder(mode, self_can_overscroll, parent_can_consume);
        ltrace!(
            node = id.0,
            delta,
            in_range,
            rest,
            ?mode,
            ?handoff,
            "handle_scroll"
        );
        match (handoff, parent) {
            (Handoff::Forward, Some(p)) => {
                self.handle_scroll(p, rest, source);
                ScrollResult {
                    consumed: in_range,
                    forwarded: rest,
                }
            }
            _ => {
                self.with_motion(id, |m, s| m.handle_edge_effect(s, rest, source));
                ScrollResult {
                    consumed: delta,
                    forwarded: 0.0,
                }
            }
        }
    }

    /// Starts a drag on `id`; scrollable ancestors join the gesture.
    pub fn on_drag_start(&mut self, id: NodeId) {
        let mut chain = vec![id];
        chain.extend(self.scrollable_ancestors(id));
        for node in chain {
            self.with_motion(node, |m, s| m.on_drag_start(s));
        }
    }

    pub fn on_drag_update(&mut self, id: NodeId, delta: f32) -> ScrollResult {
        if self.motion(id).is_some_and(|m| m.phase() != ScrollPhase::Dragging) {
            self.on_drag_start(id);
        }
        self.handle_scroll(id, delta, ScrollSource::Drag)
    }

    /// Ends a drag on `id`: the dragged scrollable may fling, ancestors left out of bounds
    /// spring back.
    pub fn on_drag_end(&mut self, id: NodeId, velocity: f32) {
        self.with_motion(id, |m, s| m.on_drag_end(s, velocity));
        for ancestor in self.scrollable_ancestors(id) {
            self.with_motion(ancestor, |m, s| m.on_drag_end(s, 0.0));
        }
    }

    pub fn scroll_to(&mut self, id: NodeId, position: f32) -> bool {
        self.with_motion(id, |m, s| m.scroll_to(s, position))
            .unwrap_or(false)
    }

    pub fn animate_to(
        &mut self,
        id: NodeId,
        position: f32,
        duration_ms: u64,
        curve: Curve,
        now_ms: u64,
    ) {
        self.with_motion(id, |m, s| {
            m.animate_to(s, position, duration_ms, curve, now_ms)
        });
    }

    /// Jumps a list node to `index`, stopping any motion first.
    pub fn jump_to_index(&mut self, id: NodeId, index: usize, align: ScrollAlign) {
        if let Some(m) = self.motion_mut(id) {
            m.abort_scroll_animator();
        }
        if let Some(list) = self.list_mut(id) {
            list.jump_to_index(index, align);
        }
        self.with_motion(id, |m, s| m.sync_from(s));
    }

    /// Nodes whose motion wants another frame.
    pub fn animating_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.motion.as_ref().is_some_and(|m| m.needs_frame()))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// Advances one node's motion by a frame. Fling deltas go through the nested protocol;
    /// spring back and animations move the node itself.
    pub fn tick_node(&mut self, id: NodeId, now_ms: u64) -> bool {
        let phase = self.motion(id).map(|m| m.phase());
        if phase == Some(ScrollPhase::Flinging) {
            let delta = self
                .motion_mut(id)
                .and_then(|m| m.advance_fling(now_ms));
            if let Some(delta) = delta {
                let result = self.handle_scroll(id, delta, ScrollSource::Fling);
                self.with_motion(id, |m, s| m.finish_fling_frame(s, result));
            }
        } else {
            self.with_motion(id, |m, s| m.tick(s, now_ms));
        }
        self.motion(id).is_some_and(|m| m.needs_frame())
    }

    /// Advances every animating node and syncs scroll bars. Returns whether any node still
    /// needs frames.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let mut any = false;
        for id in self.animating_nodes() {
            any |= self.tick_node(id, now_ms);
        }
        self.sync_scroll_bar_proxies();
        any
    }

    /// Links scrollable `scrollable` and scroll bar `bar` through a shared proxy, reusing
    /// the scrollable's existing one.
    pub fn attach_scroll_bar_proxy(&mut self, scrollable: NodeId, bar: NodeId) -> ScrollBarProxy {
        let proxy = self
            .motion(scrollable)
            .and_then(|m| m.scroll_bar_proxy().cloned())
            .unwrap_or_default();
        proxy.register_scrollable(scrollable);
        proxy.register_scroll_bar(bar);
        if let Some(m) = self.motion_mut(scrollable) {
            m.set_scroll_bar_proxy(Some(proxy.clone()));
            let state = m.offset_state();
            proxy.notify_scroll_bar_callback(state.current_offset, state.scrollable_distance);
        }
        if let Some(b) = self.scroll_bar_mut(bar) {
            b.set_proxy(Some(proxy.clone()));
        }
        ldebug!(scrollable = scrollable.0, bar = bar.0, "attach_scroll_bar_proxy");
        proxy
    }

    /// Removes `id` (scrollable or bar) from its proxy and drops its handle.
    pub fn detach_scroll_bar_proxy(&mut self, id: NodeId) {
        if let Some(m) = self.motion_mut(id) {
            if let Some(proxy) = m.scroll_bar_proxy() {
                proxy.unregister_scrollable(id);
            }
            m.set_scroll_bar_proxy(None);
        }
        if let Some(b) = self.scroll_bar_mut(id) {
            if let Some(proxy) = b.proxy() {
                proxy.unregister_scroll_bar(id);
            }
            b.set_proxy(None);
        }
    }

    fn proxies(&self) -> Vec<ScrollBarProxy> {
        let mut out: Vec<ScrollBarProxy> = Vec::new();
        for node in &self.nodes {
            let proxy = match &node.layoutable {
                Layoutable::ScrollBar(bar) => bar.proxy(),
                _ => node.motion.as_ref().and_then(|m| m.scroll_bar_proxy()),
            };
            if let Some(proxy) = proxy {
                if !out.iter().any(|p| p.ptr_eq(proxy)) {
                    out.push(proxy.clone());
                }
            }
        }
        out
    }

    /// Drains every proxy and applies the notifications: positions go to the registered
    /// scrollables, offset updates and animator changes to the registered bars.
    pub fn sync_scroll_bar_proxies(&mut self) {
        for proxy in self.proxies() {
            for event in proxy.take_pending() {
                ltrace!(?event, "sync_scroll_bar_proxies");
                match event {
                    ProxyEvent::ScrollPosition { offset, .. } => {
                        for id in proxy.scrollables() {
                            self.with_motion(id, |m, s| m.scroll_from_bar(s, offset));
                        }
                    }
                    ProxyEvent::ScrollBarUpdate {
                        offset,
                        control_distance,
                    } => {
                        for id in proxy.scroll_bars() {
                            self.update_scroll_bar(id, offset, control_distance);
                        }
                    }
                    ProxyEvent::AnimatorStarted | ProxyEvent::AnimatorStopped => {
                        let active = event == ProxyEvent::AnimatorStarted;
                        for id in proxy.scroll_bars() {
                            if let Some(bar) = self.scroll_bar_mut(id) {
                                bar.set_active(active);
                            }
                        }
                    }
                }
            }
        }
    }

    fn update_scroll_bar(&mut self, id: NodeId, offset: f32, control_distance: f32) {
        let Some(bar) = self.scroll_bar_mut(id) else {
            return;
        };
        bar.set_scroll_offset(offset);
        bar.set_control_distance(control_distance);
        let thumb = bar.layout();
        if let Some(&child) = self.children(id).first() {
            self.layout(child, thumb);
        }
    }
}
