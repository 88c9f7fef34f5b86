/// Who takes the part of a scroll delta the addressed scrollable cannot use in range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NestedScrollMode {
    /// The scrollable keeps the rest and overscrolls (or clamps) itself.
    #[default]
    SelfOnly,
    /// The parent scrollable takes the rest.
    Parent,
    /// The scrollable keeps the rest if it can overscroll, otherwise the parent takes it.
    SelfFirst,
    /// The parent takes the rest if it can consume it, otherwise the scrollable keeps it.
    ParentFirst,
}

impl NestedScrollMode {
    pub const ALL: [Self; 4] = [Self::SelfOnly, Self::Parent, Self::SelfFirst, Self::ParentFirst];
}

/// Per-direction nested scroll policies.
///
/// `forward` applies to positive deltas (towards the end), `backward` to negative ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NestedScrollOptions {
    pub forward: NestedScrollMode,
    pub backward: NestedScrollMode,
}

impl NestedScrollOptions {
    pub fn new(forward: NestedScrollMode, backward: NestedScrollMode) -> Self {
        Self { forward, backward }
    }

    pub fn both(mode: NestedScrollMode) -> Self {
        Self::new(mode, mode)
    }

    pub fn mode_for(&self, delta: f32) -> NestedScrollMode {
        if delta >= 0.0 {
            self.forward
        } else {
            self.backward
        }
    }

    pub fn is_self_only(&self) -> bool {
        self.forward == NestedScrollMode::SelfOnly && self.backward == NestedScrollMode::SelfOnly
    }
}

/// Destination of a leftover delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handoff {
    Keep,
    Forward,
}

/// Decides where a leftover delta goes.
///
/// `self_can_overscroll` reports whether the scrollable would absorb it as overscroll;
/// `parent_can_consume` is `None` when there is no parent scrollable.
pub fn route_remainder(
    mode: NestedScrollMode,
    self_can_overscroll: bool,
    parent_can_consume: Option<bool>,
) -> Handoff {
    let Some(parent_can_consume) = parent_can_consume else {
        return Handoff::Keep;
    };
    match mode {
        NestedScrollMode::SelfOnly => Handoff::Keep,
        NestedScrollMode::Parent => Handoff::Forward,
        NestedScrollMode::SelfFirst if self_can_overscroll => Handoff::Keep,
        NestedScrollMode::SelfFirst => Handoff::Forward,
        NestedScrollMode::ParentFirst if parent_can_consume => Handoff::Forward,
        NestedScrollMode::ParentFirst => Handoff::Keep,
    }
}
