use lanescroll::{
    ItemFns, LaneList, LaneListOptions, LayoutTree, Layoutable, ScrollContext,
    ScrollableMotionController, ScrollableOptions, SizeF,
};
use lanescroll_adapter::Controller;

fn main() {
    // Example: keep the visible message in place when older messages load above it
    // (chat/timeline "prepend").
    //
    // The adapter flow is typically:
    // 1) capture an anchor (key + offset_in_viewport) before data changes
    // 2) swap the item source
    // 3) apply the anchor so the same item stays at the same place in the viewport
    let mut tree = LayoutTree::new();
    let list = tree.add_node(Layoutable::List(LaneList::new(
        LaneListOptions::default().with_lane_length(120.0, 200.0),
        ItemFns::new(100, |i| 40.0 + (i % 3) as f32 * 10.0),
    )));
    tree.set_motion(
        list,
        ScrollableMotionController::new(ScrollableOptions::default(), ScrollContext::default()),
    );
    let mut c = Controller::new(tree, list);
    c.layout(SizeF::new(360.0, 480.0));
    c.scroll_to(list, 730.0);

    let key_for_old = |i: usize| 1000u64 + i as u64;
    let anchor = c
        .capture_first_visible_anchor(list, key_for_old)
        .expect("list has visible items");
    println!(
        "before prepend: lanes={} range={:?} anchor={anchor:?}",
        c.tree().list(list).map_or(0, |l| l.lanes()),
        c.tree().list(list).and_then(|l| l.visible_range()),
    );

    // Prepend 12 items; old items shift by +12 indexes. Keys are owned by the adapter.
    let ok = c.set_items_anchored(
        list,
        ItemFns::new(112, |i| 40.0 + (i % 3) as f32 * 10.0),
        key_for_old,
        |k| (1000..1100).contains(k).then(|| (*k - 1000) as usize + 12),
    );

    println!(
        "after prepend: ok={ok} range={:?} first={:?}",
        c.tree().list(list).and_then(|l| l.visible_range()),
        c.tree().list(list).and_then(|l| l.first_visible()),
    );
}
