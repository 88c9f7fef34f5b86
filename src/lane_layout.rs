use std::collections::BTreeMap;

use crate::lane_cache::LaneBoundaryCache;
use crate::lanes::{LaneConfig, calculate_lanes};
use crate::{
    Axis, ItemPositionInfo, ItemSource, LaneItemAlign, LayoutConstraint, OptionalSizeF, SizeF,
};

/// One strip produced by a forward or backward layout step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// First index of the strip.
    pub start_index: usize,
    /// Number of items placed; `0` means no item was available.
    pub count: usize,
    pub start_pos: f32,
    pub end_pos: f32,
    pub is_group: bool,
}

impl Line {
    fn empty(index: usize, pos: f32) -> Self {
        Self {
            start_index: index,
            count: 0,
            start_pos: pos,
            end_pos: pos,
            is_group: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// One past the last index of the strip.
    pub fn end_index(&self) -> usize {
        self.start_index + self.count
    }
}

/// Incremental multi-lane placement.
///
/// The engine decides the lane count for a cross size and places items strip by strip,
/// forward or backward, measuring each child through an [`ItemSource`]. Positions recorded
/// in one pass are relative to the viewport start and are rebuilt by the owning list on
/// every pass.
#[derive(Clone, Debug)]
pub struct LaneLayoutEngine {
    axis: Axis,
    user_lanes: usize,
    min_lane_length: Option<f32>,
    max_lane_length: Option<f32>,
    align: LaneItemAlign,

    config: LaneConfig,
    lanes_changed: bool,
    cache: LaneBoundaryCache,

    item_constraint: LayoutConstraint,
    group_constraint: LayoutConstraint,

    positions: BTreeMap<usize, ItemPositionInfo>,
    sizes: BTreeMap<usize, SizeF>,
}

impl LaneLayoutEngine {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            user_lanes: 1,
            min_lane_length: None,
            max_lane_length: None,
            align: LaneItemAlign::Start,
            config: LaneConfig::single(0.0),
            lanes_changed: false,
            cache: LaneBoundaryCache::new(),
            item_constraint: LayoutConstraint::default(),
            group_constraint: LayoutConstraint::default(),
            positions: BTreeMap::new(),
            sizes: BTreeMap::new(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_axis(&mut self, axis: Axis) {
        if self.axis != axis {
            self.axis = axis;
            self.reset();
        }
    }

    /// Updates the user-requested lane count and lane-length bounds.
    ///
    /// Takes effect on the next [`Self::calculate_lanes`].
    pub fn set_lane_constraints(
        &mut self,
        lanes: usize,
        min_lane_length: Option<f32>,
        max_lane_length: Option<f32>,
    ) {
        self.user_lanes = lanes.max(1);
        self.min_lane_length = min_lane_length;
        self.max_lane_length = max_lane_length;
    }

    pub fn set_lane_item_align(&mut self, align: LaneItemAlign) {
        self.align = align;
    }

    pub fn config(&self) -> LaneConfig {
        self.config
    }

    pub fn lanes(&self) -> usize {
        self.config.lanes.max(1)
    }

    pub fn cache(&self) -> &LaneBoundaryCache {
        &self.cache
    }

    /// Recomputes the lane configuration for `cross_size`.
    ///
    /// An unresolved cross size keeps the user's lane count. A lane-count change invalidates
    /// the boundary cache and makes the next forward line realign to a lane boundary.
    pub fn calculate_lanes(&mut self, cross_size: Option<f32>) -> LaneConfig {
        let config = match cross_size {
            Some(cross) => calculate_lanes(
                cross,
                self.min_lane_length,
                self.max_lane_length,
                self.user_lanes,
            ),
            None => {
                let mut config = self.config;
                config.lanes = self.user_lanes;
                config
            }
        };
        if config.lanes != self.config.lanes {
            ldebug!(
                from = self.config.lanes,
                to = config.lanes,
                "lane count changed"
            );
            self.lanes_changed = true;
            self.cache.clear();
        }
        self.config = config;
        config
    }

    /// Derives the child constraints from the list's content constraint.
    ///
    /// Groups get the full cross size; regular items get one lane bounded by the lane-length
    /// limits. Both are unbounded along the main axis.
    pub fn update_item_constraints(
        &mut self,
        self_ideal_size: OptionalSizeF,
        content_constraint: &LayoutConstraint,
    ) {
        let axis = self.axis;
        let mut item = *content_constraint;
        item.parent_ideal_size = self_ideal_size;
        item.max_size.set_main(axis, f32::INFINITY);
        item.min_size.set_main(axis, 0.0);
        let mut group = item;

        if let Some(cross) = self_ideal_size.cross(axis) {
            group.max_size.set_cross(axis, cross);
            let lane_cross = self.config.item_cross_size();
            item.percent_reference.set_cross(axis, lane_cross);
            item.parent_ideal_size.set_cross(axis, Some(lane_cross));
            item.max_size.set_cross(axis, lane_cross);
            let min_cross = self
                .min_lane_length
                .map_or(0.0, |_| self.config.min_lane_length.min(lane_cross));
            item.min_size.set_cross(axis, min_cross);
        }

        self.item_constraint = item;
        self.group_constraint = group;
    }

    pub fn item_constraint(&self) -> &LayoutConstraint {
        &self.item_constraint
    }

    pub fn group_constraint(&self) -> &LayoutConstraint {
        &self.group_constraint
    }

    /// Lays out one strip starting at `first`, anchored at `start_pos`.
    ///
    /// Places up to `lanes` consecutive items. The strip ends early at the end of data, or
    /// when a group shows up after a regular item (the group is re-queued for the next
    /// strip). A group always occupies a strip of its own. All members share the interval
    /// `[start_pos, start_pos + tallest member)`.
    pub fn layout_line_forward(
        &mut self,
        items: &mut dyn ItemSource,
        first: usize,
        start_pos: f32,
    ) -> Line {
        let mut first = first;
        if self.lanes_changed {
            self.lanes_changed = false;
            first = self.get_lanes_floor(&*items, first);
        }

        let lanes = self.lanes();
        let mut main_len = 0.0f32;
        let mut is_group = false;
        let mut count = 0usize;
        for _ in 0..lanes {
            let index = first + count;
            let Some(kind) = items.kind(index) else {
                ltrace!(index, "layout_line_forward: no item");
                break;
            };
            if kind.is_group() && count > 0 {
                items.remove_from_render_tree(index);
                break;
            }
            main_len = main_len.max(self.measure_item(items, index, kind.is_group()));
            count += 1;
            if kind.is_group() {
                is_group = true;
                break;
            }
        }

        if count == 0 {
            return Line::empty(first, start_pos);
        }
        let end_pos = start_pos + main_len;
        self.record_line(first, count, start_pos, end_pos, is_group);
        Line {
            start_index: first,
            count,
            start_pos,
            end_pos,
            is_group,
        }
    }

    /// Lays out one strip ending right before `end_index`, anchored at `end_pos`.
    ///
    /// Mirror of [`Self::layout_line_forward`]: walks indices downward and additionally stops
    /// once the strip reaches the first index of a lane group.
    pub fn layout_line_backward(
        &mut self,
        items: &mut dyn ItemSource,
        end_index: usize,
        end_pos: f32,
    ) -> Line {
        let lanes = self.lanes();
        let mut main_len = 0.0f32;
        let mut is_group = false;
        let mut count = 0usize;
        let mut index = end_index;
        for _ in 0..lanes {
            if index == 0 {
                break;
            }
            let candidate = index - 1;
            let Some(kind) = items.kind(candidate) else {
                ltrace!(index = candidate, "layout_line_backward: no item");
                break;
            };
            if kind.is_group() && count > 0 {
                items.remove_from_render_tree(candidate);
                break;
            }
            index = candidate;
            count += 1;
            main_len = main_len.max(self.measure_item(items, index, kind.is_group()));
            if kind.is_group() {
                is_group = true;
                break;
            }
            if lanes == 1 || (index - self.find_lanes_start_index(&*items, index)) % lanes == 0 {
                break;
            }
        }

        if count == 0 {
            return Line::empty(end_index, end_pos);
        }
        let start_pos = end_pos - main_len;
        self.record_line(index, count, start_pos, end_pos, is_group);
        Line {
            start_index: index,
            count,
            start_pos,
            end_pos,
            is_group,
        }
    }

    fn measure_item(&mut self, items: &mut dyn ItemSource, index: usize, group: bool) -> f32 {
        let constraint = if group {
            self.group_constraint
        } else {
            self.item_constraint
        };
        let size = items.measure(index, &constraint);
        self.sizes.insert(index, size);
        size.main(self.axis).max(0.0)
    }

    fn record_line(
        &mut self,
        first: usize,
        count: usize,
        start_pos: f32,
        end_pos: f32,
        is_group: bool,
    ) {
        let info = ItemPositionInfo {
            start_pos,
            end_pos,
            is_group,
        };
        for i in first..first + count {
            self.positions.insert(i, info);
        }
    }

    /// First index of the lane-run containing `index`.
    pub fn find_lanes_start_index(&mut self, items: &dyn ItemSource, index: usize) -> usize {
        self.cache.find_lanes_start_index(index, |i| items.kind(i))
    }

    /// Rounds `index` down to the first index of its lane group.
    pub fn get_lanes_floor(&mut self, items: &dyn ItemSource, index: usize) -> usize {
        let lanes = self.lanes();
        if lanes <= 1 {
            return index;
        }
        let start = self.find_lanes_start_index(items, index);
        index - (index - start) % lanes
    }

    /// Lane an item occupies; groups report lane 0.
    pub fn lane_of(&mut self, items: &dyn ItemSource, index: usize) -> usize {
        let lanes = self.lanes();
        if lanes <= 1 {
            return 0;
        }
        let start = self.find_lanes_start_index(items, index);
        (index - start) % lanes
    }

    /// Cross offset of a child inside its lane.
    pub fn lane_cross_offset(&self, child_cross: f32) -> f32 {
        calculate_lane_cross_offset(self.config.lane_length, child_cross, self.align)
    }

    pub fn positions(&self) -> &BTreeMap<usize, ItemPositionInfo> {
        &self.positions
    }

    pub fn item_position(&self, index: usize) -> Option<ItemPositionInfo> {
        self.positions.get(&index).copied()
    }

    pub fn item_size(&self, index: usize) -> Option<SizeF> {
        self.sizes.get(&index).copied()
    }

    pub fn start_index(&self) -> Option<usize> {
        self.positions.keys().next().copied()
    }

    pub fn end_index(&self) -> Option<usize> {
        self.positions.keys().next_back().copied()
    }

    pub(crate) fn take_positions(&mut self) -> BTreeMap<usize, ItemPositionInfo> {
        self.sizes.clear();
        core::mem::take(&mut self.positions)
    }

    pub(crate) fn remove_position(&mut self, index: usize) {
        self.positions.remove(&index);
        self.sizes.remove(&index);
    }

    pub(crate) fn shift_positions(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        for info in self.positions.values_mut() {
            info.start_pos += delta;
            info.end_pos += delta;
        }
    }

    /// Drops everything derived from the current data set.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.positions.clear();
        self.sizes.clear();
    }
}

/// Offset of a child of `child_cross` inside a lane of `lane_length`. Never negative.
pub fn calculate_lane_cross_offset(
    lane_length: f32,
    child_cross: f32,
    align: LaneItemAlign,
) -> f32 {
    let free = (lane_length - child_cross).max(0.0);
    match align {
        LaneItemAlign::Start => 0.0,
        LaneItemAlign::Center => free / 2.0,
        LaneItemAlign::End => free,
    }
}
