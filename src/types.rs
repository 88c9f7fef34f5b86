/// Whether an index holds a regular item or a group spanning every lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Item,
    Group,
}

impl ItemKind {
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group)
    }
}

/// Main-axis extent of a laid out item, relative to the viewport start.
///
/// Every item of one strip carries the same interval.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPositionInfo {
    pub start_pos: f32,
    pub end_pos: f32,
    pub is_group: bool,
}

impl ItemPositionInfo {
    pub fn main_size(&self) -> f32 {
        self.end_pos - self.start_pos
    }
}

/// Cross-axis alignment of an item inside its lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneItemAlign {
    #[default]
    Start,
    Center,
    End,
}

/// Where a scroll offset change came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollSource {
    Drag,
    Fling,
    Bar,
    Axis,
    Animation,
}

/// Motion state of a scrollable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPhase {
    #[default]
    Idle,
    Dragging,
    Flinging,
    SpringBack,
    Animating,
}

impl ScrollPhase {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Alignment used when jumping to an index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollAlign {
    #[default]
    Start,
    Center,
    End,
    /// Keeps the current position when the target is fully visible, otherwise scrolls the
    /// least amount needed.
    Auto,
}

/// One laid out item: where its frame lands inside the list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPlacement {
    pub index: usize,
    pub offset: crate::OffsetF,
    pub size: crate::SizeF,
    pub is_group: bool,
}

/// Result of routing one scroll delta through the nested-scroll protocol.
///
/// `consumed + forwarded` always equals the input delta.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollResult {
    /// Delta the addressed scrollable kept instead of handing on. Besides what it moved this
    /// counts overscroll it absorbed and delta it refused: at a clamped edge, or while
    /// disabled with no scrollable parent. It is not the distance moved.
    pub consumed: f32,
    /// Delta handed to the parent scrollable.
    pub forwarded: f32,
}
