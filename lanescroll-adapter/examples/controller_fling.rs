use lanescroll::{
    EdgeEffect, ItemFns, LaneList, LaneListOptions, LayoutTree, Layoutable, ScrollContext,
    ScrollableMotionController, ScrollableOptions, SizeF,
};
use lanescroll_adapter::Controller;

fn main() {
    // Example: a controller driving a fling into a spring edge without holding any UI
    // objects.
    //
    // An adapter would:
    // - forward drag deltas and the release velocity
    // - call tick(now_ms) from its frame loop while the controller is animating
    // - render from the list placements
    let mut tree = LayoutTree::new();
    let list = tree.add_node(Layoutable::List(LaneList::new(
        LaneListOptions::default().with_lanes(2),
        ItemFns::new(200, |_| 64.0),
    )));
    let context = ScrollContext::default();
    let options = ScrollableOptions::default().with_edge_effect(EdgeEffect::spring(&context));
    tree.set_motion(list, ScrollableMotionController::new(options, context));
    let mut c = Controller::new(tree, list);
    c.layout(SizeF::new(320.0, 640.0));

    c.on_drag_start(list);
    for _ in 0..5 {
        c.on_drag_update(list, 24.0);
    }
    c.on_drag_end(list, 4_000.0);

    let mut now_ms = 0u64;
    while c.tick(now_ms) {
        if now_ms % 160 == 0 {
            let motion = c.tree().motion(list).map(|m| m.snapshot());
            println!(
                "t={now_ms} motion={motion:?} range={:?}",
                c.tree().list(list).and_then(|l| l.visible_range())
            );
        }
        now_ms += 16;
    }

    println!(
        "done: t={now_ms} range={:?}",
        c.tree().list(list).and_then(|l| l.visible_range())
    );
}
