use crate::ScrollPhase;

/// Offset bookkeeping of one scrollable.
///
/// Only [`crate::ScrollableMotionController`] writes this; everything else reads snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollOffsetState {
    pub current_offset: f32,
    /// Content extent minus viewport extent, never negative.
    pub scrollable_distance: f32,
    pub estimated_content_height: f32,
}

impl ScrollOffsetState {
    /// How far the offset currently sits outside `[0, scrollable_distance]` (signed: negative
    /// before the start, positive past the end).
    pub fn overscroll(&self) -> f32 {
        if self.current_offset < 0.0 {
            self.current_offset
        } else if self.current_offset > self.scrollable_distance {
            self.current_offset - self.scrollable_distance
        } else {
            0.0
        }
    }

    pub fn is_out_of_boundary(&self) -> bool {
        self.overscroll() != 0.0
    }

    /// The boundary nearest to the current offset.
    pub fn nearest_boundary(&self) -> f32 {
        if self.current_offset > self.scrollable_distance * 0.5 {
            self.scrollable_distance
        } else {
            0.0
        }
    }
}

/// A lightweight snapshot of a scrollable's motion.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionSnapshot {
    pub offset: ScrollOffsetState,
    pub phase: ScrollPhase,
    pub velocity: f32,
}
