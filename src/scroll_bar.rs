use crate::geometry::near_zero;
use crate::{Axis, LayoutConstraint, OffsetF, ScrollBarProxy, ScrollSource, SizeF};

/// Maps a content offset to the position of a scroll bar's thumb child, and back.
///
/// The bar measures its single child (the thumb) with an unbounded main axis, so the child
/// picks its own length. The travel left for the thumb is the difference between the bar's
/// and the child's main extents.
#[derive(Clone, Debug)]
pub struct ScrollBarSynchronizer {
    axis: Axis,
    explicit_size: Option<SizeF>,

    frame_size: SizeF,
    child_size: SizeF,

    scroll_offset: f32,
    control_distance: f32,
    scrollable_distance: f32,
    current_offset: f32,
    active: bool,

    proxy: Option<ScrollBarProxy>,
}

impl ScrollBarSynchronizer {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            explicit_size: None,
            frame_size: SizeF::ZERO,
            child_size: SizeF::ZERO,
            scroll_offset: 0.0,
            control_distance: 0.0,
            scrollable_distance: 0.0,
            current_offset: 0.0,
            active: false,
            proxy: None,
        }
    }

    pub fn with_size(mut self, size: SizeF) -> Self {
        self.explicit_size = Some(size);
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_proxy(&mut self, proxy: Option<ScrollBarProxy>) {
        self.proxy = proxy;
    }

    pub fn proxy(&self) -> Option<&ScrollBarProxy> {
        self.proxy.as_ref()
    }

    /// Content offset being mirrored.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Logical travel distance of the content being scrolled.
    pub fn set_control_distance(&mut self, distance: f32) {
        self.control_distance = distance.max(0.0);
    }

    pub fn control_distance(&self) -> f32 {
        self.control_distance
    }

    /// Whether the bar is currently shown by a running animator.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Constraint for the thumb child: the bar's constraint with an unbounded main axis.
    pub fn child_constraint(&self, constraint: &LayoutConstraint) -> LayoutConstraint {
        let mut child = constraint.relaxed_main(self.axis);
        child.min_size = SizeF::ZERO;
        child
    }

    /// Sizes the bar from the measured child.
    ///
    /// The cross extent follows the child; the main extent is the explicit size or the
    /// largest main extent the parent allows (the child's own when that is unbounded).
    pub fn measure(&mut self, constraint: &LayoutConstraint, child_size: SizeF) -> SizeF {
        let axis = self.axis;
        self.child_size = child_size;
        let size = match self.explicit_size {
            Some(size) => size,
            None => {
                let max_main = constraint.max_size.main(axis);
                let main = if max_main.is_finite() {
                    max_main
                } else {
                    child_size.main(axis)
                };
                SizeF::from_main_cross(axis, main, child_size.cross(axis))
            }
        };
        self.frame_size = size.constrain(constraint.min_size, constraint.max_size);
        self.frame_size
    }

    /// Positions the thumb for the current scroll offset and returns its offset.
    pub fn layout(&mut self) -> OffsetF {
        let axis = self.axis;
        self.scrollable_distance =
            (self.frame_size.main(axis) - self.child_size.main(axis)).abs();
        if near_zero(self.control_distance) {
            lwarn!(
                scroll_offset = self.scroll_offset,
                "ScrollBarSynchronizer: control distance is zero, thumb stays at start"
            );
            self.current_offset = 0.0;
        } else {
            let ratio = self.scrollable_distance / self.control_distance;
            self.current_offset = (self.scroll_offset * ratio).clamp(0.0, self.scrollable_distance);
        }
        if !self.current_offset.is_finite() {
            self.current_offset = 0.0;
        }
        OffsetF::from_main_cross(axis, self.current_offset, 0.0)
    }

    /// Drags the thumb by `delta` and returns the content offset it maps to.
    ///
    /// The result is also published to the proxy with [`ScrollSource::Bar`]. Returns `None`
    /// when the thumb has no room to travel.
    pub fn on_thumb_drag(&mut self, delta: f32) -> Option<f32> {
        if near_zero(self.scrollable_distance) || !delta.is_finite() {
            lwarn!(delta, "ScrollBarSynchronizer: thumb has no travel, drag ignored");
            return None;
        }
        self.current_offset = (self.current_offset + delta).clamp(0.0, self.scrollable_distance);
        let offset = self.current_offset * self.control_distance / self.scrollable_distance;
        self.scroll_offset = offset;
        ltrace!(delta, offset, "ScrollBarSynchronizer::on_thumb_drag");
        if let Some(proxy) = &self.proxy {
            proxy.set_scroll_position(offset, ScrollSource::Bar);
        }
        Some(offset)
    }

    pub fn frame_size(&self) -> SizeF {
        self.frame_size
    }

    pub fn child_size(&self) -> SizeF {
        self.child_size
    }

    /// Thumb travel: `|bar main - thumb main|`.
    pub fn scrollable_distance(&self) -> f32 {
        self.scrollable_distance
    }

    /// Current thumb offset along the main axis.
    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }
}

/// Geometry of the bar a scrollable draws over itself.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollBarRegion {
    pub thumb_offset: f32,
    pub thumb_length: f32,
}

impl ScrollBarRegion {
    /// Thumb length is `viewport² / content`, no shorter than `min_thumb_length` and shrunk
    /// by any overscroll. Returns `None` when the content fits the viewport.
    pub fn compute(
        viewport: f32,
        content: f32,
        offset: f32,
        min_thumb_length: f32,
    ) -> Option<Self> {
        if viewport.is_nan() || viewport <= 0.0 || content.is_nan() || content <= viewport {
            return None;
        }
        if !offset.is_finite() || !content.is_finite() {
            return None;
        }
        let distance = content - viewport;
        let overscroll = if offset < 0.0 {
            -offset
        } else {
            (offset - distance).max(0.0)
        };
        let min_thumb_length = min_thumb_length.min(viewport);
        let thumb_length = (viewport * viewport / content - overscroll).max(min_thumb_length);
        let travel = (viewport - thumb_length).max(0.0);
        let thumb_offset = offset.clamp(0.0, distance) / distance * travel;
        Some(Self {
            thumb_offset,
            thumb_length,
        })
    }
}
