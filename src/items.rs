use std::sync::Arc;

use crate::{Axis, ItemKind, LayoutConstraint, SizeF};

/// The children a lane list lays out lazily.
///
/// This is the list's side of the measure contract: it asks for one child at a time and
/// never holds more than the visible window.
pub trait ItemSource {
    fn count(&self) -> usize;

    /// Returns `None` when no child exists at `index`, which layout treats as end of data.
    fn kind(&self, index: usize) -> Option<ItemKind> {
        (index < self.count()).then_some(ItemKind::Item)
    }

    /// Measures the child at `index` and returns its margin frame size.
    fn measure(&mut self, index: usize, constraint: &LayoutConstraint) -> SizeF;

    /// Called when a measured group has to be re-queued because it appeared mid-strip.
    fn remove_from_render_tree(&mut self, _index: usize) {}
}

/// An [`ItemSource`] backed by closures.
///
/// `main_size(i)` is the main-axis extent of item `i`; items fill the cross size they are
/// offered. Groups are flagged with `is_group`.
#[derive(Clone)]
pub struct ItemFns {
    pub count: usize,
    pub axis: Axis,
    pub main_size: Arc<dyn Fn(usize) -> f32 + Send + Sync>,
    pub is_group: Option<Arc<dyn Fn(usize) -> bool + Send + Sync>>,
}

impl ItemFns {
    pub fn new(count: usize, main_size: impl Fn(usize) -> f32 + Send + Sync + 'static) -> Self {
        Self {
            count,
            axis: Axis::Vertical,
            main_size: Arc::new(main_size),
            is_group: None,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_groups(mut self, is_group: impl Fn(usize) -> bool + Send + Sync + 'static) -> Self {
        self.is_group = Some(Arc::new(is_group));
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

impl ItemSource for ItemFns {
    fn count(&self) -> usize {
        self.count
    }

    fn kind(&self, index: usize) -> Option<ItemKind> {
        if index >= self.count {
            return None;
        }
        match &self.is_group {
            Some(f) if f(index) => Some(ItemKind::Group),
            _ => Some(ItemKind::Item),
        }
    }

    fn measure(&mut self, index: usize, constraint: &LayoutConstraint) -> SizeF {
        let axis = self.axis;
        let main = (self.main_size)(index).max(0.0);
        let max_cross = constraint.max_size.cross(axis);
        let cross = if max_cross.is_finite() {
            max_cross
        } else {
            constraint.min_size.cross(axis)
        };
        SizeF::from_main_cross(axis, main, cross)
    }
}

impl core::fmt::Debug for ItemFns {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemFns")
            .field("count", &self.count)
            .field("axis", &self.axis)
            .field("has_groups", &self.is_group.is_some())
            .finish_non_exhaustive()
    }
}
