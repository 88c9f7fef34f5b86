//! A headless multi-lane list layout and scroll motion engine.
//!
//! For frame-driven controllers and scroll anchoring, see the `lanescroll-adapter` crate.
//!
//! This crate covers the parts of a scrolling container that are pure math and state:
//! - deciding how many parallel lanes fit a cross size, and placing items strip by strip as
//!   the viewport moves ([`LaneLayoutEngine`], [`LaneList`])
//! - turning drag and fling input into offset changes, with spring, fade or clamped edges
//!   and nested scroll handoff to ancestors ([`ScrollableMotionController`])
//! - mapping offsets to scroll bar thumbs and back ([`ScrollBarSynchronizer`],
//!   [`ScrollBarProxy`])
//!
//! It is UI-agnostic. A UI layer is expected to provide:
//! - layout constraints (viewport size)
//! - item measurements ([`ItemSource`])
//! - resolved gesture deltas and velocities, and frame timestamps
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod context;
mod curve;
mod edge_effect;
mod fling;
mod geometry;
mod items;
mod lane_cache;
mod lane_layout;
mod lanes;
mod list;
mod nested;
mod options;
mod proxy;
mod scroll_bar;
mod scroll_box;
mod scrollable;
mod state;
mod tree;
mod types;

#[cfg(test)]
mod tests;

pub use context::{FormFactor, ScrollContext};
pub use curve::{Curve, ScrollTween};
pub use edge_effect::{
    DEFAULT_FRICTION, EdgeEffect, SpringMotion, SpringSimulation, WEARABLE_FRICTION,
    drag_resistance,
};
pub use fling::{FlingDecay, MIN_FLING_VELOCITY};
pub use geometry::{Axis, LayoutConstraint, OffsetF, OptionalSizeF, SizeF};
pub use items::{ItemFns, ItemSource};
pub use lane_cache::{LaneBoundaryCache, scan_lanes_start};
pub use lane_layout::{LaneLayoutEngine, Line, calculate_lane_cross_offset};
pub use lanes::{LaneConfig, calculate_lanes, normalize_lane_lengths};
pub use list::LaneList;
pub use nested::{Handoff, NestedScrollMode, NestedScrollOptions, route_remainder};
pub use options::{LaneListOptions, ScrollableOptions};
pub use proxy::{ProxyEvent, ScrollBarProxy};
pub use scroll_bar::{ScrollBarRegion, ScrollBarSynchronizer};
pub use scroll_box::ScrollBox;
pub use scrollable::{Scrollable, ScrollableMotionController};
pub use state::{MotionSnapshot, ScrollOffsetState};
pub use tree::{Frame, GenericBox, LayoutTree, Layoutable, Node, NodeId};
pub use types::{
    ItemKind, ItemPlacement, ItemPositionInfo, LaneItemAlign, ScrollAlign, ScrollPhase,
    ScrollResult, ScrollSource,
};
