use core::fmt;

use lanescroll::LaneList;

/// A scroll anchor that keeps a lane list visually in place across data changes.
///
/// Typical use cases:
/// - chat/timeline "prepend" (load older messages above) without content jumping
/// - any reorder/replace where the viewport should stay on an item identity
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor<K> {
    pub key: K,
    /// How far the anchored item's strip starts above the viewport start.
    pub offset_in_viewport: f32,
}

impl<K: fmt::Debug> fmt::Debug for ScrollAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnchor")
            .field("key", &self.key)
            .field("offset_in_viewport", &self.offset_in_viewport)
            .finish()
    }
}

/// Captures an anchor for the first visible item, identified through `key_for(index)`.
///
/// Returns `None` when nothing is laid out.
pub fn capture_first_visible_anchor<K>(
    list: &LaneList,
    key_for: impl FnOnce(usize) -> K,
) -> Option<ScrollAnchor<K>> {
    let (index, start) = list.first_visible()?;
    Some(ScrollAnchor {
        key: key_for(index),
        offset_in_viewport: -start,
    })
}

/// Re-places the anchored item where it was captured.
///
/// `key_to_index` maps keys into the *current* data set. Returns `true` when the anchor
/// was applied.
pub fn apply_anchor<K>(
    list: &mut LaneList,
    anchor: &ScrollAnchor<K>,
    key_to_index: impl FnOnce(&K) -> Option<usize>,
) -> bool {
    let Some(index) = key_to_index(&anchor.key) else {
        return false;
    };
    if index >= list.items().count() {
        return false;
    }
    list.restore_anchor(index, anchor.offset_in_viewport);
    true
}
