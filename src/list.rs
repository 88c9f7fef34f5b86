use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::EPSILON;
use crate::lane_layout::LaneLayoutEngine;
use crate::{
    Axis, ItemPlacement, ItemPositionInfo, ItemSource, LaneListOptions, LayoutConstraint,
    OffsetF, OptionalSizeF, ScrollAlign, ScrollSource, Scrollable, SizeF,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum PendingJump {
    Index { index: usize, align: ScrollAlign },
    /// Re-place `index` at `start_pos` (viewport relative), used after data changes.
    Anchor { index: usize, start_pos: f32 },
}

/// A lazily laid out multi-lane list.
///
/// Each measure pass fills the viewport strip by strip, starting from the first strip of the
/// previous pass shifted by the scroll delta accumulated since then. Only the visible window
/// (plus the partially visible strips at both edges) is kept. Positions are relative to the
/// viewport start; the absolute offset is tracked separately and is exact whenever index 0
/// is laid out.
pub struct LaneList {
    options: LaneListOptions,
    engine: LaneLayoutEngine,
    items: Box<dyn ItemSource>,

    constraint: Option<LayoutConstraint>,
    frame_size: SizeF,
    cross_size: f32,
    viewport_main: f32,

    pending_delta: f32,
    pending_jump: Option<PendingJump>,
    current_offset: f32,
    content_main: f32,

    placements: Vec<ItemPlacement>,
}

impl LaneList {
    pub fn new(options: LaneListOptions, items: impl ItemSource + 'static) -> Self {
        Self::from_boxed(options, Box::new(items))
    }

    pub fn from_boxed(options: LaneListOptions, items: Box<dyn ItemSource>) -> Self {
        let mut engine = LaneLayoutEngine::new(options.axis);
        engine.set_lane_constraints(
            options.lanes,
            options.min_lane_length,
            options.max_lane_length,
        );
        engine.set_lane_item_align(options.lane_item_align);
        ldebug!(
            count = items.count(),
            lanes = options.lanes,
            initial_index = options.initial_index,
            "LaneList::new"
        );
        Self {
            options,
            engine,
            items,
            constraint: None,
            frame_size: SizeF::ZERO,
            cross_size: 0.0,
            viewport_main: 0.0,
            pending_delta: 0.0,
            pending_jump: None,
            current_offset: 0.0,
            content_main: 0.0,
            placements: Vec::new(),
        }
    }

    pub fn options(&self) -> &LaneListOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LaneListOptions) {
        if self.options == options {
            return;
        }
        self.engine.set_axis(options.axis);
        self.engine.set_lane_constraints(
            options.lanes,
            options.min_lane_length,
            options.max_lane_length,
        );
        self.engine.set_lane_item_align(options.lane_item_align);
        self.options = options;
        self.relayout();
    }

    pub fn engine(&self) -> &LaneLayoutEngine {
        &self.engine
    }

    pub fn items(&self) -> &dyn ItemSource {
        self.items.as_ref()
    }

    /// Grants mutable access to the item source.
    ///
    /// Call [`Self::notify_data_changed`] afterwards if the count or any item kind changed.
    pub fn items_mut(&mut self) -> &mut dyn ItemSource {
        self.items.as_mut()
    }

    pub fn set_items(&mut self, items: impl ItemSource + 'static) {
        self.items = Box::new(items);
        self.notify_data_changed();
    }

    /// Rebuilds positions and the lane boundary cache for a new data set.
    ///
    /// The first laid out item keeps its position in the viewport when it still exists.
    pub fn notify_data_changed(&mut self) {
        let anchor = self
            .engine
            .positions()
            .iter()
            .next()
            .map(|(&index, info)| (index, info.start_pos));
        self.engine.reset();
        ldebug!(count = self.items.count(), ?anchor, "LaneList::notify_data_changed");
        if !matches!(self.pending_jump, Some(PendingJump::Index { .. })) {
            self.pending_jump = anchor.map(|(index, start_pos)| PendingJump::Anchor {
                index,
                start_pos: start_pos - self.pending_delta,
            });
            if self.pending_jump.is_some() {
                self.pending_delta = 0.0;
            }
        }
        self.relayout();
    }

    /// Makes the next pass lay out `index` aligned to the viewport.
    pub fn jump_to_index(&mut self, index: usize, align: ScrollAlign) {
        ldebug!(index, ?align, "LaneList::jump_to_index");
        self.pending_jump = Some(PendingJump::Index { index, align });
        self.relayout();
    }

    /// Places `index` so that its strip starts `offset_in_viewport` before the viewport
    /// start.
    pub fn restore_anchor(&mut self, index: usize, offset_in_viewport: f32) {
        self.pending_jump = Some(PendingJump::Anchor {
            index,
            start_pos: -offset_in_viewport,
        });
        self.pending_delta = 0.0;
        self.relayout();
    }

    fn relayout(&mut self) {
        if let Some(constraint) = self.constraint {
            self.measure(&constraint);
            self.layout();
        }
    }

    /// Resolves the list's own size and fills the viewport with strips.
    pub fn measure(&mut self, constraint: &LayoutConstraint) -> SizeF {
        let axis = self.options.axis;
        self.constraint = Some(*constraint);

        let ideal = constraint.parent_ideal_size;
        let mut cross = ideal
            .cross(axis)
            .unwrap_or_else(|| constraint.max_size.cross(axis));
        if !cross.is_finite() {
            cross = constraint.min_size.cross(axis);
        }
        let main = ideal
            .main(axis)
            .unwrap_or_else(|| constraint.max_size.main(axis))
            .max(constraint.min_size.main(axis));
        self.cross_size = cross.max(0.0);
        self.viewport_main = main.max(0.0);

        self.engine.calculate_lanes(Some(self.cross_size));
        let mut self_ideal = OptionalSizeF::default();
        self_ideal.set_cross(axis, Some(self.cross_size));
        self.engine.update_item_constraints(self_ideal, constraint);

        self.fill();

        if !self.viewport_main.is_finite() {
            // Unbounded main axis: the list wraps its content.
            self.viewport_main = self.content_main;
        }
        self.frame_size = SizeF::from_main_cross(axis, self.viewport_main, self.cross_size);
        ltrace!(
            start = ?self.engine.start_index(),
            end = ?self.engine.end_index(),
            lanes = self.engine.lanes(),
            offset = self.current_offset,
            content = self.content_main,
            "LaneList::measure"
        );
        self.frame_size
    }

    fn fill(&mut self) {
        let count = self.items.count();
        let previous = self.engine.take_positions();
        let delta = std::mem::take(&mut self.pending_delta);
        let jump = self.pending_jump.take();
        if count == 0 {
            self.current_offset = 0.0;
            self.content_main = 0.0;
            return;
        }

        let prev_offset = self.current_offset;
        let mut shifted = 0.0;
        let mut estimate_offset = false;

        let aligned = match jump {
            Some(PendingJump::Index { index, align }) => {
                let index = index.min(count - 1);
                self.resolve_align(index, align, &previous, delta)
                    .map(|align| (index, align))
            }
            Some(PendingJump::Anchor { index, start_pos }) => {
                self.fill_from_anchor(index.min(count - 1), start_pos);
                shifted += self.correct_gaps();
                estimate_offset = true;
                None
            }
            None => None,
        };

        if let Some((index, align)) = aligned {
            self.fill_aligned(index, align);
            shifted += self.correct_gaps();
            estimate_offset = true;
        } else if self.engine.positions().is_empty() {
            match previous.iter().next().filter(|(index, _)| **index < count) {
                Some((&index, info)) => self.fill_from_anchor(index, info.start_pos - delta),
                None => {
                    let index = self.options.initial_index.min(count - 1);
                    self.fill_aligned(index, ScrollAlign::Start);
                    shifted += self.correct_gaps();
                    estimate_offset = true;
                }
            }
        }

        self.trim_outside_viewport();
        self.update_extents(prev_offset + delta - shifted, estimate_offset);
    }

    fn resolve_align(
        &self,
        index: usize,
        align: ScrollAlign,
        previous: &BTreeMap<usize, ItemPositionInfo>,
        delta: f32,
    ) -> Option<ScrollAlign> {
        if align != ScrollAlign::Auto {
            return Some(align);
        }
        match previous.get(&index) {
            Some(info) => {
                let start = info.start_pos - delta;
                let end = info.end_pos - delta;
                if start >= -EPSILON && end <= self.viewport_main + EPSILON {
                    None
                } else if start < 0.0 {
                    Some(ScrollAlign::Start)
                } else {
                    Some(ScrollAlign::End)
                }
            }
            None => match previous.keys().next() {
                Some(&first) if index > first => Some(ScrollAlign::End),
                _ => Some(ScrollAlign::Start),
            },
        }
    }

    fn fill_from_anchor(&mut self, index: usize, start_pos: f32) {
        let first = self.engine.get_lanes_floor(self.items.as_ref(), index);
        let line = self
            .engine
            .layout_line_forward(self.items.as_mut(), first, start_pos);
        if line.is_empty() {
            return;
        }
        self.fill_forward();
        self.fill_backward();
    }

    fn fill_aligned(&mut self, index: usize, align: ScrollAlign) {
        let first = self.engine.get_lanes_floor(self.items.as_ref(), index);
        let line = self
            .engine
            .layout_line_forward(self.items.as_mut(), first, 0.0);
        if line.is_empty() {
            return;
        }
        let view = self.viewport_main;
        if view.is_finite() {
            let extent = line.end_pos - line.start_pos;
            let shift = match align {
                ScrollAlign::Start | ScrollAlign::Auto => 0.0,
                ScrollAlign::Center => (view - extent) / 2.0,
                ScrollAlign::End => view - extent,
            };
            self.engine.shift_positions(shift);
        }
        self.fill_forward();
        self.fill_backward();
    }

    /// Appends strips after the last laid out one until the viewport end is covered.
    fn fill_forward(&mut self) {
        let Some(last) = self.engine.end_index() else {
            return;
        };
        let Some(info) = self.engine.item_position(last) else {
            return;
        };
        let mut index = last + 1;
        let mut pos = info.end_pos;
        while pos < self.viewport_main {
            let line = self
                .engine
                .layout_line_forward(self.items.as_mut(), index, pos);
            if line.is_empty() {
                break;
            }
            index = line.end_index();
            pos = line.end_pos;
        }
    }

    /// Prepends strips before the first laid out one until the viewport start is covered.
    fn fill_backward(&mut self) {
        let Some(first) = self.engine.start_index() else {
            return;
        };
        let Some(info) = self.engine.item_position(first) else {
            return;
        };
        let mut index = first;
        let mut pos = info.start_pos;
        while pos > 0.0 && index > 0 {
            let line = self
                .engine
                .layout_line_backward(self.items.as_mut(), index, pos);
            if line.is_empty() {
                break;
            }
            index = line.start_index;
            pos = line.start_pos;
        }
    }

    /// Pulls the content back when a jump or data change left a gap at either end.
    ///
    /// Returns the total distance the content moved (positive = towards the end).
    fn correct_gaps(&mut self) -> f32 {
        let count = self.items.count();
        let view = self.viewport_main;
        let mut shifted = 0.0;

        if view.is_finite() {
            let last = self
                .engine
                .end_index()
                .filter(|&last| last + 1 == count)
                .and_then(|last| self.engine.item_position(last));
            if let Some(info) = last {
                if info.end_pos < view {
                    let shift = view - info.end_pos;
                    self.engine.shift_positions(shift);
                    shifted += shift;
                    self.fill_backward();
                }
            }
        }

        if let Some(info) = self.engine.item_position(0) {
            if info.start_pos > 0.0 {
                let shift = -info.start_pos;
                self.engine.shift_positions(shift);
                shifted += shift;
                self.fill_forward();
            }
        }
        shifted
    }

    /// Drops strips that ended before the viewport start or begin after its end. At least
    /// one strip always survives so the next pass has an anchor.
    fn trim_outside_viewport(&mut self) {
        let view = self.viewport_main;
        let outside: Vec<usize> = self
            .engine
            .positions()
            .iter()
            .filter(|(_, info)| info.end_pos <= 0.0 || info.start_pos >= view)
            .map(|(&index, _)| index)
            .collect();
        if outside.is_empty() {
            return;
        }

        let positions = self.engine.positions();
        let keep = if outside.len() == positions.len() {
            // Everything is off screen; keep the strip nearest to the viewport.
            positions
                .iter()
                .next_back()
                .filter(|(_, info)| info.end_pos <= 0.0)
                .or_else(|| positions.iter().next())
                .map(|(_, info)| *info)
        } else {
            None
        };

        for index in outside {
            let same_strip = keep.is_some_and(|strip| {
                self.engine
                    .item_position(index)
                    .is_some_and(|info| info == strip)
            });
            if !same_strip {
                self.engine.remove_position(index);
            }
        }
    }

    fn update_extents(&mut self, incremental_offset: f32, estimate_offset: bool) {
        let count = self.items.count();
        let positions = self.engine.positions();
        let (Some((&first, first_info)), Some((&last, last_info))) =
            (positions.iter().next(), positions.iter().next_back())
        else {
            self.current_offset = 0.0;
            self.content_main = 0.0;
            return;
        };

        let mut strips = 0usize;
        let mut previous: Option<(f32, f32)> = None;
        for info in positions.values() {
            let key = (info.start_pos, info.end_pos);
            if previous != Some(key) {
                strips += 1;
                previous = Some(key);
            }
        }
        let strips = strips.max(1) as f32;
        let average_extent = (last_info.end_pos - first_info.start_pos) / strips;
        let items_per_strip = (positions.len() as f32 / strips).max(1.0);

        // At least one strip precedes any strip that does not start at index 0.
        let strips_before = (first as f32 / items_per_strip).floor().max(1.0);
        let estimated = average_extent * strips_before - first_info.start_pos;
        self.current_offset = if first == 0 {
            -first_info.start_pos
        } else if estimate_offset {
            estimated
        } else if incremental_offset + first_info.start_pos <= EPSILON {
            // Items remain above but the running offset left no room for them.
            ldebug!(first, incremental_offset, estimated, "LaneList: offset re-anchored");
            estimated
        } else {
            incremental_offset
        };

        // With the last item laid out the extent is exact relative to the offset (and fully
        // exact when index 0 is laid out too). Otherwise at least the strips still missing
        // stay below the laid out ones.
        self.content_main = if last + 1 == count {
            self.current_offset + last_info.end_pos
        } else {
            let total_strips = (count as f32 / items_per_strip).ceil();
            let strips_after = ((count - 1 - last) as f32 / items_per_strip).ceil().max(1.0);
            (average_extent * total_strips)
                .max(self.current_offset + last_info.end_pos + average_extent * strips_after)
        };
    }

    /// Produces one placement per laid out item.
    ///
    /// Groups sit at cross offset 0; regular items at `lane * lane_length` plus their
    /// alignment inside the lane.
    pub fn layout(&mut self) -> &[ItemPlacement] {
        let axis = self.options.axis;
        let lane_length = self.engine.config().lane_length;
        let entries: Vec<(usize, ItemPositionInfo)> = self
            .engine
            .positions()
            .iter()
            .map(|(&index, &info)| (index, info))
            .collect();

        self.placements.clear();
        for (index, info) in entries {
            let size = self.engine.item_size(index).unwrap_or_default();
            let cross = if info.is_group {
                0.0
            } else {
                let lane = self.engine.lane_of(self.items.as_ref(), index);
                lane as f32 * lane_length + self.engine.lane_cross_offset(size.cross(axis))
            };
            self.placements.push(ItemPlacement {
                index,
                offset: OffsetF::from_main_cross(axis, info.start_pos, cross),
                size,
                is_group: info.is_group,
            });
        }
        &self.placements
    }

    pub fn placements(&self) -> &[ItemPlacement] {
        &self.placements
    }

    pub fn for_each_placement(&self, mut f: impl FnMut(&ItemPlacement)) {
        for placement in &self.placements {
            f(placement);
        }
    }

    pub fn frame_size(&self) -> SizeF {
        self.frame_size
    }

    pub fn lanes(&self) -> usize {
        self.engine.lanes()
    }

    pub fn item_position(&self, index: usize) -> Option<ItemPositionInfo> {
        self.engine.item_position(index)
    }

    /// Indices intersecting the viewport, as a half-open range.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        let view = self.viewport_main;
        let mut visible = self
            .engine
            .positions()
            .iter()
            .filter(|(_, info)| info.end_pos > 0.0 && info.start_pos < view)
            .map(|(&index, _)| index);
        let start = visible.next()?;
        let end = visible.next_back().unwrap_or(start);
        Some((start, end + 1))
    }

    /// First item intersecting the viewport, with its start position in the viewport.
    pub fn first_visible(&self) -> Option<(usize, f32)> {
        self.engine
            .positions()
            .iter()
            .find(|(_, info)| info.end_pos > 0.0)
            .map(|(&index, info)| (index, info.start_pos))
    }
}

impl Scrollable for LaneList {
    fn axis(&self) -> Axis {
        self.options.axis
    }

    fn is_at_top(&self) -> bool {
        if self.items.count() == 0 {
            return true;
        }
        self.engine
            .item_position(0)
            .is_some_and(|info| info.start_pos >= -EPSILON)
    }

    fn is_at_bottom(&self) -> bool {
        let count = self.items.count();
        if count == 0 {
            return true;
        }
        self.engine
            .item_position(count - 1)
            .is_some_and(|info| info.end_pos <= self.viewport_main + EPSILON)
    }

    fn update_current_offset(&mut self, delta: f32, source: ScrollSource) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        ltrace!(delta, ?source, "LaneList::update_current_offset");
        self.pending_delta += delta;
        self.relayout();
        true
    }

    fn current_offset(&self) -> f32 {
        self.current_offset + self.pending_delta
    }

    fn content_main_size(&self) -> f32 {
        self.content_main
    }

    fn viewport_main_size(&self) -> f32 {
        self.viewport_main
    }
}

impl fmt::Debug for LaneList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaneList")
            .field("options", &self.options)
            .field("count", &self.items.count())
            .field("lanes", &self.engine.lanes())
            .field("viewport_main", &self.viewport_main)
            .field("current_offset", &self.current_offset)
            .field("content_main", &self.content_main)
            .field("placements", &self.placements.len())
            .finish_non_exhaustive()
    }
}
