use crate::*;

use std::collections::HashMap;

use lanescroll::{
    Axis, Curve, EdgeEffect, GenericBox, ItemFns, LaneList, LaneListOptions, LayoutTree,
    Layoutable, OffsetF, ScrollAlign, ScrollBarSynchronizer, ScrollContext, ScrollPhase,
    Scrollable, ScrollableMotionController, ScrollableOptions, SizeF,
};

#[track_caller]
fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-2,
        "expected {expected}, got {actual}"
    );
}

fn motion() -> ScrollableMotionController {
    ScrollableMotionController::new(
        ScrollableOptions::default().with_edge_effect(EdgeEffect::None),
        ScrollContext::default(),
    )
}

/// A controller over a single list of `count` items, 50 long, in a 100x200 viewport.
fn list_controller(count: usize) -> (Controller, lanescroll::NodeId) {
    let mut tree = LayoutTree::new();
    let list = tree.add_node(Layoutable::List(LaneList::new(
        LaneListOptions::default(),
        ItemFns::new(count, |_| 50.0),
    )));
    tree.set_motion(list, motion());
    let mut c = Controller::new(tree, list);
    c.layout(SizeF::new(100.0, 200.0));
    (c, list)
}

fn offset_of(c: &Controller, id: lanescroll::NodeId) -> f32 {
    c.tree().scrollable(id).expect("scrollable").current_offset()
}

#[test]
fn anchor_can_preserve_scroll_across_prepend() {
    let mut list = LaneList::new(LaneListOptions::default(), ItemFns::new(100, |_| 50.0));
    list.measure(&lanescroll::LayoutConstraint::loose(SizeF::new(100.0, 200.0)));
    list.update_current_offset(1_010.0, lanescroll::ScrollSource::Drag);

    let anchor = capture_first_visible_anchor(&list, |i| 1000u64 + i as u64).expect("anchor");
    assert_eq!(anchor.key, 1020);
    assert_eq!(anchor.offset_in_viewport, 10.0);

    // Prepend 10 items: old items shift by +10 indexes.
    list.set_items(ItemFns::new(110, |_| 50.0));
    let mut map = HashMap::<u64, usize>::new();
    for i in 0..110usize {
        let key = if i < 10 {
            2000u64 + i as u64
        } else {
            1000u64 + (i - 10) as u64
        };
        map.insert(key, i);
    }

    assert!(apply_anchor(&mut list, &anchor, |k| map.get(k).copied()));
    assert_eq!(list.first_visible(), Some((30, -10.0)));
    assert_close(list.current_offset(), 1_510.0);
}

#[test]
fn anchor_with_unknown_key_is_not_applied() {
    let mut list = LaneList::new(LaneListOptions::default(), ItemFns::new(10, |_| 50.0));
    list.measure(&lanescroll::LayoutConstraint::loose(SizeF::new(100.0, 200.0)));
    let anchor = ScrollAnchor {
        key: 7u64,
        offset_in_viewport: 0.0,
    };
    assert!(!apply_anchor(&mut list, &anchor, |_| None));
    assert!(!apply_anchor(&mut list, &anchor, |_| Some(10)));
    assert_eq!(list.first_visible(), Some((0, 0.0)));

    let empty = LaneList::new(LaneListOptions::default(), ItemFns::new(0, |_| 50.0));
    assert!(capture_first_visible_anchor(&empty, |i| i).is_none());
}

#[test]
fn frame_scheduler_tracks_requests_and_elapsed_time() {
    let mut tree = LayoutTree::new();
    let a = tree.add_node(Layoutable::Generic(GenericBox::new(Axis::Vertical)));
    let b = tree.add_node(Layoutable::Generic(GenericBox::new(Axis::Vertical)));

    let mut frames = FrameScheduler::new();
    assert!(!frames.has_pending());
    assert!(frames.request_frame(a));
    assert!(!frames.request_frame(a));
    assert!(frames.request_frame(b));
    assert!(frames.cancel_frame(b));
    assert!(!frames.cancel_frame(b));
    assert!(frames.is_requested(a));

    let tick = frames.begin_frame(100);
    assert_eq!(tick.nodes, vec![a]);
    assert_eq!(tick.elapsed_ms, None);
    assert!(!frames.has_pending());

    frames.request_frame(a);
    let tick = frames.begin_frame(116);
    assert_eq!(tick.elapsed_ms, Some(16));

    // An idle frame resets the clock.
    let tick = frames.begin_frame(200);
    assert!(tick.nodes.is_empty());
    frames.request_frame(b);
    assert_eq!(frames.begin_frame(300).elapsed_ms, None);
}

#[test]
fn controller_animate_to_drives_scroll_offset() {
    let (mut c, list) = list_controller(100);
    assert!(!c.is_animating());

    c.animate_to(list, 500.0, 100, Curve::SmoothStep, 0);
    assert!(c.is_animating());
    assert!(c.frames().is_requested(list));

    let mut last = 0.0;
    let mut now = 0;
    while c.tick(now) {
        let offset = offset_of(&c, list);
        assert!(offset >= last - 1e-3, "offset went back: {last} -> {offset}");
        last = offset;
        now += 16;
        assert!(now <= 400);
    }
    assert!(!c.is_animating());
    assert_close(offset_of(&c, list), 500.0);
    let (first, _) = c.tree().list(list).expect("list").first_visible().expect("visible");
    assert_eq!(first, 10);
}

#[test]
fn controller_fling_settles() {
    let (mut c, list) = list_controller(100);
    c.on_drag_start(list);
    let result = c.on_drag_update(list, 30.0);
    assert_close(result.consumed, 30.0);
    c.on_drag_end(list, 2_000.0);
    assert!(c.is_animating());

    let mut now = 0;
    while c.tick(now) {
        now += 16;
        assert!(now < 10_000);
    }
    let offset = offset_of(&c, list);
    assert!(offset > 700.0, "offset {offset}");
    assert_eq!(
        c.tree().motion(list).expect("motion").phase(),
        ScrollPhase::Idle
    );
    assert!(!c.tick(now + 16));
}

#[test]
fn controller_stop_and_jump_cancel_frames() {
    let (mut c, list) = list_controller(100);
    c.animate_to(list, 2_000.0, 300, Curve::Ease, 0);
    c.tick(0);
    c.tick(16);
    c.stop();
    assert!(!c.is_animating());
    assert_eq!(
        c.tree().motion(list).expect("motion").phase(),
        ScrollPhase::Idle
    );

    c.animate_to(list, 2_000.0, 300, Curve::Ease, 32);
    c.jump_to_index(list, 40, ScrollAlign::Start);
    assert!(!c.is_animating());
    assert_close(offset_of(&c, list), 2_000.0);
}

#[test]
fn controller_keeps_anchor_across_item_swap() {
    let (mut c, list) = list_controller(100);
    assert!(c.scroll_to(list, 1_010.0));
    let anchor = c
        .capture_first_visible_anchor(list, |i| 1000u64 + i as u64)
        .expect("anchor");
    assert_eq!(anchor.key, 1020);

    let applied = c.set_items_anchored(
        list,
        ItemFns::new(110, |_| 50.0),
        |i| 1000u64 + i as u64,
        |k| Some((*k as usize - 1000) + 10),
    );
    assert!(applied);
    assert_eq!(
        c.tree().list(list).expect("list").first_visible(),
        Some((30, -10.0))
    );
    assert_close(offset_of(&c, list), 1_510.0);
    let m = c.tree().motion(list).expect("motion");
    assert_close(m.offset_state().current_offset, 1_510.0);
}

#[test]
fn controller_syncs_scroll_bar_through_proxy() {
    let mut tree = LayoutTree::new();
    let root = tree.add_node(Layoutable::Generic(GenericBox::new(Axis::Horizontal)));
    let bar = tree.add_child(
        root,
        Layoutable::ScrollBar(ScrollBarSynchronizer::new(Axis::Vertical)),
    );
    let thumb = tree.add_child(
        bar,
        Layoutable::Generic(GenericBox::fixed(SizeF::new(10.0, 40.0))),
    );
    let list = tree.add_child(
        root,
        Layoutable::List(LaneList::new(
            LaneListOptions::default(),
            ItemFns::new(100, |_| 50.0),
        )),
    );
    tree.set_motion(list, motion());
    tree.attach_scroll_bar_proxy(list, bar);

    let mut c = Controller::new(tree, root);
    let size = c.layout(SizeF::new(110.0, 200.0));
    assert_eq!(size, SizeF::new(110.0, 200.0));
    assert_eq!(c.tree().frame(list).expect("list").offset, OffsetF::new(10.0, 0.0));
    assert_eq!(c.tree().frame(thumb).expect("thumb").offset, OffsetF::new(0.0, 0.0));

    // 300 of 4800 content maps to 10 of 160 thumb travel.
    c.scroll_to(list, 300.0);
    assert_close(c.tree().frame(thumb).expect("thumb").offset.y, 10.0);

    let offset = c.on_thumb_drag(bar, 16.0).expect("thumb moves");
    assert_close(offset, 780.0);
    assert_close(offset_of(&c, list), 780.0);
}
