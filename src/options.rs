use crate::{Axis, EdgeEffect, LaneItemAlign, NestedScrollOptions};

/// Configuration for [`crate::LaneList`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneListOptions {
    pub axis: Axis,
    /// Requested lane count, used as-is when either lane-length bound is missing.
    pub lanes: usize,
    pub min_lane_length: Option<f32>,
    pub max_lane_length: Option<f32>,
    pub lane_item_align: LaneItemAlign,
    /// Index laid out at the viewport start on the first pass.
    pub initial_index: usize,
}

impl LaneListOptions {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            lanes: 1,
            min_lane_length: None,
            max_lane_length: None,
            lane_item_align: LaneItemAlign::Start,
            initial_index: 0,
        }
    }

    pub fn with_lanes(mut self, lanes: usize) -> Self {
        self.lanes = lanes.max(1);
        self
    }

    /// Sets both lane-length bounds; lanes are then derived from the cross size.
    pub fn with_lane_length(mut self, min: f32, max: f32) -> Self {
        self.min_lane_length = Some(min);
        self.max_lane_length = Some(max);
        self
    }

    pub fn with_lane_item_align(mut self, align: LaneItemAlign) -> Self {
        self.lane_item_align = align;
        self
    }

    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.initial_index = index;
        self
    }
}

impl Default for LaneListOptions {
    fn default() -> Self {
        Self::new(Axis::Vertical)
    }
}

/// Configuration for [`crate::ScrollableMotionController`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollableOptions {
    pub edge_effect: EdgeEffect,
    pub nested: NestedScrollOptions,
    /// Overrides the context friction when set.
    pub friction: Option<f32>,
    pub scroll_enabled: bool,
}

impl ScrollableOptions {
    pub fn new() -> Self {
        Self {
            edge_effect: EdgeEffect::None,
            nested: NestedScrollOptions::default(),
            friction: None,
            scroll_enabled: true,
        }
    }

    pub fn with_edge_effect(mut self, edge_effect: EdgeEffect) -> Self {
        self.edge_effect = edge_effect;
        self
    }

    pub fn with_nested(mut self, nested: NestedScrollOptions) -> Self {
        self.nested = nested;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = Some(friction);
        self
    }

    pub fn with_scroll_enabled(mut self, enabled: bool) -> Self {
        self.scroll_enabled = enabled;
        self
    }
}

impl Default for ScrollableOptions {
    fn default() -> Self {
        Self::new()
    }
}
