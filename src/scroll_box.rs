use crate::geometry::EPSILON;
use crate::{Axis, LayoutConstraint, ScrollSource, Scrollable, SizeF};

/// A plain scroll container: one block of content of a known main extent moving inside a
/// viewport.
///
/// In a [`crate::LayoutTree`] the content extent is the tallest child; standalone it can be
/// set directly.
#[derive(Clone, Debug)]
pub struct ScrollBox {
    axis: Axis,
    viewport_main: f32,
    content_main: f32,
    offset: f32,
    frame_size: SizeF,
}

impl ScrollBox {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            viewport_main: 0.0,
            content_main: 0.0,
            offset: 0.0,
            frame_size: SizeF::ZERO,
        }
    }

    /// A box with fixed extents, useful without a layout pass.
    pub fn with_extents(axis: Axis, viewport_main: f32, content_main: f32) -> Self {
        let mut b = Self::new(axis);
        b.viewport_main = viewport_main.max(0.0);
        b.content_main = content_main.max(0.0);
        b
    }

    pub fn set_content_main(&mut self, content_main: f32) {
        self.content_main = content_main.max(0.0);
    }

    /// Constraint for the content: the box's constraint with an unbounded main axis.
    pub fn child_constraint(&self, constraint: &LayoutConstraint) -> LayoutConstraint {
        let mut child = constraint.relaxed_main(self.axis);
        child.min_size.set_main(self.axis, 0.0);
        child
    }

    /// Sizes the viewport from `constraint` and records the content extent.
    pub fn measure(&mut self, constraint: &LayoutConstraint, content: SizeF) -> SizeF {
        let axis = self.axis;
        self.content_main = content.main(axis).max(0.0);
        let main = constraint
            .parent_ideal_size
            .main(axis)
            .unwrap_or_else(|| constraint.max_size.main(axis));
        let main = if main.is_finite() { main } else { self.content_main };
        let cross = constraint
            .parent_ideal_size
            .cross(axis)
            .unwrap_or_else(|| content.cross(axis));
        self.frame_size = SizeF::from_main_cross(axis, main, cross)
            .constrain(constraint.min_size, constraint.max_size);
        self.viewport_main = self.frame_size.main(axis);
        self.frame_size
    }

    pub fn frame_size(&self) -> SizeF {
        self.frame_size
    }
}

impl Scrollable for ScrollBox {
    fn axis(&self) -> Axis {
        self.axis
    }

    fn is_at_top(&self) -> bool {
        self.offset <= EPSILON
    }

    fn is_at_bottom(&self) -> bool {
        self.offset >= self.scrollable_distance() - EPSILON
    }

    fn update_current_offset(&mut self, delta: f32, source: ScrollSource) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        ltrace!(delta, ?source, "ScrollBox::update_current_offset");
        self.offset += delta;
        true
    }

    fn current_offset(&self) -> f32 {
        self.offset
    }

    fn content_main_size(&self) -> f32 {
        self.content_main
    }

    fn viewport_main_size(&self) -> f32 {
        self.viewport_main
    }
}
