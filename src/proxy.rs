use std::cell::RefCell;
use std::rc::Rc;

use crate::{NodeId, ScrollSource};

/// A notification queued on a [`ScrollBarProxy`], drained by the layout tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProxyEvent {
    /// A new content offset every registered scrollable should adopt.
    ScrollPosition { offset: f32, source: ScrollSource },
    /// A scrollable committed `offset` out of `control_distance`; scroll bars follow.
    ScrollBarUpdate { offset: f32, control_distance: f32 },
    AnimatorStarted,
    AnimatorStopped,
}

#[derive(Debug, Default)]
struct ProxyInner {
    scrollables: Vec<NodeId>,
    scroll_bars: Vec<NodeId>,
    position: Option<(f32, ScrollSource)>,
    animator_running: bool,
    pending: Vec<ProxyEvent>,
}

/// Shared state linking scrollables and the scroll bars that drive them.
///
/// Cloning the proxy shares it; it lives as long as the longest holder. Writes are plain
/// call-order: the last position set before a drain wins.
#[derive(Clone, Debug, Default)]
pub struct ScrollBarProxy {
    inner: Rc<RefCell<ProxyInner>>,
}

impl ScrollBarProxy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_scrollable(&self, id: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.scrollables.contains(&id) {
            inner.scrollables.push(id);
        }
    }

    pub fn unregister_scrollable(&self, id: NodeId) {
        self.inner.borrow_mut().scrollables.retain(|&s| s != id);
    }

    pub fn register_scroll_bar(&self, id: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.scroll_bars.contains(&id) {
            inner.scroll_bars.push(id);
        }
    }

    pub fn unregister_scroll_bar(&self, id: NodeId) {
        self.inner.borrow_mut().scroll_bars.retain(|&s| s != id);
    }

    pub fn scrollables(&self) -> Vec<NodeId> {
        self.inner.borrow().scrollables.clone()
    }

    pub fn scroll_bars(&self) -> Vec<NodeId> {
        self.inner.borrow().scroll_bars.clone()
    }

    /// Publishes a content offset for every registered scrollable.
    pub fn set_scroll_position(&self, offset: f32, source: ScrollSource) {
        ltrace!(offset, ?source, "ScrollBarProxy::set_scroll_position");
        let mut inner = self.inner.borrow_mut();
        inner.position = Some((offset, source));
        inner
            .pending
            .retain(|e| !matches!(e, ProxyEvent::ScrollPosition { .. }));
        inner
            .pending
            .push(ProxyEvent::ScrollPosition { offset, source });
    }

    /// The last position set through [`Self::set_scroll_position`].
    pub fn scroll_position(&self) -> Option<(f32, ScrollSource)> {
        self.inner.borrow().position
    }

    /// Tells every registered scroll bar that a scrollable moved.
    pub fn notify_scroll_bar_callback(&self, offset: f32, control_distance: f32) {
        let mut inner = self.inner.borrow_mut();
        inner
            .pending
            .retain(|e| !matches!(e, ProxyEvent::ScrollBarUpdate { .. }));
        inner.pending.push(ProxyEvent::ScrollBarUpdate {
            offset,
            control_distance,
        });
    }

    pub fn start_scroll_bar_animator(&self) {
        let mut inner = self.inner.borrow_mut();
        if !inner.animator_running {
            inner.animator_running = true;
            inner.pending.push(ProxyEvent::AnimatorStarted);
        }
    }

    pub fn stop_scroll_bar_animator(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.animator_running {
            inner.animator_running = false;
            inner.pending.push(ProxyEvent::AnimatorStopped);
        }
    }

    pub fn is_animator_running(&self) -> bool {
        self.inner.borrow().animator_running
    }

    /// Drains the queued notifications in the order they were raised.
    pub fn take_pending(&self) -> Vec<ProxyEvent> {
        std::mem::take(&mut self.inner.borrow_mut().pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    /// Number of live handles to this proxy.
    pub fn holder_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
