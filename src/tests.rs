use crate::*;

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_f32(&mut self, start: f32, end: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        start + (end - start) * unit
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

#[track_caller]
fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

/// Items whose kinds are listed up front; re-queued groups are logged.
struct KindItems {
    kinds: Vec<ItemKind>,
    item_main: f32,
    group_main: f32,
    removed: Rc<RefCell<Vec<usize>>>,
}

impl KindItems {
    fn new(kinds: Vec<ItemKind>, item_main: f32, group_main: f32) -> Self {
        Self {
            kinds,
            item_main,
            group_main,
            removed: Rc::default(),
        }
    }
}

impl ItemSource for KindItems {
    fn count(&self) -> usize {
        self.kinds.len()
    }

    fn kind(&self, index: usize) -> Option<ItemKind> {
        self.kinds.get(index).copied()
    }

    fn measure(&mut self, index: usize, constraint: &LayoutConstraint) -> SizeF {
        let main = if self.kinds[index].is_group() {
            self.group_main
        } else {
            self.item_main
        };
        SizeF::new(constraint.max_size.width, main)
    }

    fn remove_from_render_tree(&mut self, index: usize) {
        self.removed.borrow_mut().push(index);
    }
}

fn measured_list(
    options: LaneListOptions,
    items: impl ItemSource + 'static,
    size: SizeF,
) -> LaneList {
    let mut list = LaneList::new(options, items);
    list.measure(&LayoutConstraint::loose(size));
    list.layout();
    list
}

fn uniform_list(count: usize, extent: f32, viewport: f32) -> LaneList {
    measured_list(
        LaneListOptions::default(),
        ItemFns::new(count, move |_| extent),
        SizeF::new(100.0, viewport),
    )
}

fn controller(edge_effect: EdgeEffect) -> ScrollableMotionController {
    ScrollableMotionController::new(
        ScrollableOptions::default().with_edge_effect(edge_effect),
        ScrollContext::default(),
    )
}

fn run_frames(
    m: &mut ScrollableMotionController,
    s: &mut dyn Scrollable,
    max_frames: usize,
) -> usize {
    let mut now = 0u64;
    for frame in 0..max_frames {
        now += 16;
        if !m.tick(s, now) {
            return frame + 1;
        }
    }
    panic!("motion did not settle within {max_frames} frames");
}

/// Strips are contiguous along the main axis, hold at most `lanes` items, and groups
/// always sit alone.
#[track_caller]
fn assert_strips_consistent(list: &LaneList) {
    let lanes = list.lanes();
    let positions: Vec<(usize, ItemPositionInfo)> = list
        .engine()
        .positions()
        .iter()
        .map(|(&i, &info)| (i, info))
        .collect();
    let mut strip_len = 0usize;
    for pair in positions.windows(2) {
        let (a, a_info) = pair[0];
        let (b, b_info) = pair[1];
        assert_eq!(b, a + 1, "laid out indices must be contiguous");
        strip_len += 1;
        if a_info == b_info {
            assert!(!a_info.is_group, "group {a} shares a strip");
        } else {
            assert!(strip_len <= lanes, "strip ending at {a} holds {strip_len} items");
            strip_len = 0;
            assert!(
                (b_info.start_pos - a_info.end_pos).abs() < 1e-2,
                "gap or overlap between strips at {a}..{b}: {a_info:?} {b_info:?}"
            );
        }
    }
}

#[test]
fn lanes_follow_min_length_first() {
    let c = calculate_lanes(120.0, Some(40.0), Some(60.0), 1);
    assert_eq!(c.lanes, 3);
    assert_close(c.lane_length, 40.0);

    let c = calculate_lanes(80.0, Some(40.0), Some(60.0), 1);
    assert_eq!(c.lanes, 2);
    assert_close(c.lane_length, 40.0);

    let c = calculate_lanes(70.0, Some(40.0), Some(60.0), 1);
    assert_eq!(c.lanes, 1);
    assert_close(c.lane_length, 70.0);
}

#[test]
fn lanes_without_bounds_use_requested_count() {
    let c = calculate_lanes(100.0, None, None, 4);
    assert_eq!(c.lanes, 4);
    assert_close(c.lane_length, 25.0);

    let c = calculate_lanes(100.0, Some(30.0), None, 0);
    assert_eq!(c.lanes, 1);
    assert_close(c.lane_length, 100.0);
}

#[test]
fn lane_lengths_normalize() {
    assert_eq!(normalize_lane_lengths(100.0, 50.0, 30.0), (50.0, 50.0));
    assert_eq!(normalize_lane_lengths(100.0, 0.0, 0.0), (100.0, 100.0));
    assert_eq!(normalize_lane_lengths(100.0, -5.0, 40.0), (40.0, 40.0));
}

#[test]
fn narrow_cross_size_gets_a_single_lane() {
    let c = calculate_lanes(30.0, Some(40.0), Some(60.0), 1);
    assert_eq!(c.lanes, 1);
    assert_close(c.lane_length, 30.0);

    let c = calculate_lanes(0.0, Some(40.0), Some(60.0), 1);
    assert_eq!(c.lanes, 1);
}

#[test]
fn lane_count_never_overflows_cross_size() {
    let mut rng = Lcg::new(0x1a2b_3c4d);
    for _ in 0..2_000 {
        let cross = rng.gen_range_f32(1.0, 2_000.0);
        let min = rng.gen_range_f32(1.0, 500.0);
        let max = min + rng.gen_range_f32(0.0, 500.0);
        let c = calculate_lanes(cross, Some(min), Some(max), 1);
        assert!(c.lanes >= 1);
        assert!(c.lanes as f32 * c.lane_length <= cross + 1e-2);
        if c.lanes > 1 {
            assert!(c.lane_length >= min - 1e-3, "{cross} {min} {max} -> {c:?}");
        }
    }
}

#[test]
fn lane_cross_offset_aligns_inside_lane() {
    assert_eq!(calculate_lane_cross_offset(40.0, 30.0, LaneItemAlign::Start), 0.0);
    assert_eq!(calculate_lane_cross_offset(40.0, 30.0, LaneItemAlign::Center), 5.0);
    assert_eq!(calculate_lane_cross_offset(40.0, 30.0, LaneItemAlign::End), 10.0);
    assert_eq!(calculate_lane_cross_offset(40.0, 60.0, LaneItemAlign::End), 0.0);
}

#[test]
fn lane_cache_matches_linear_scan() {
    let mut rng = Lcg::new(7);
    for _ in 0..50 {
        let count = rng.gen_range_usize(1, 300);
        let kinds: Vec<ItemKind> = (0..count)
            .map(|_| {
                if rng.gen_range_u64(0, 5) == 0 {
                    ItemKind::Group
                } else {
                    ItemKind::Item
                }
            })
            .collect();
        let mut kind_of = |i: usize| kinds.get(i).copied();

        let mut cache = LaneBoundaryCache::new();
        for _ in 0..400 {
            let index = rng.gen_range_usize(0, count);
            let cached = cache.find_lanes_start_index(index, |i| kinds.get(i).copied());
            let scanned = scan_lanes_start(&mut kind_of, 0, index).unwrap_or(0);
            assert_eq!(cached, scanned, "index {index} in {kinds:?}");
        }
    }
}

#[test]
fn lane_cache_clears() {
    let kinds = [ItemKind::Item, ItemKind::Group, ItemKind::Item];
    let mut cache = LaneBoundaryCache::new();
    assert_eq!(cache.find_lanes_start_index(2, |i| kinds.get(i).copied()), 2);
    assert_eq!(cache.find_lanes_start_index(1, |i| kinds.get(i).copied()), 1);
    assert_eq!(cache.find_lanes_start_index(0, |i| kinds.get(i).copied()), 0);
    assert!(!cache.is_empty());
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn list_scrolls_to_bottom_of_uniform_items() {
    let mut list = uniform_list(10, 50.0, 200.0);
    assert_close(list.scrollable_distance(), 300.0);
    assert!(list.is_at_top());
    assert!(!list.is_at_bottom());

    let mut m = controller(EdgeEffect::None);
    assert!(m.scroll_to(&mut list, 300.0));
    assert_close(list.current_offset(), 300.0);
    assert!(list.is_at_bottom());
    assert!(!list.is_at_top());
    assert_eq!(list.visible_range(), Some((6, 10)));
}

#[test]
fn empty_list_is_at_both_ends() {
    let list = uniform_list(0, 50.0, 200.0);
    assert!(list.is_at_top());
    assert!(list.is_at_bottom());
    assert_eq!(list.scrollable_distance(), 0.0);
    assert!(list.placements().is_empty());
    assert_eq!(list.first_visible(), None);
}

#[test]
fn list_places_items_in_lanes_and_groups_across() {
    use ItemKind::{Group, Item};
    let kinds = vec![Group, Item, Item, Item, Item, Item, Group, Item, Item, Item];
    let items = KindItems::new(kinds, 50.0, 30.0);
    let removed = items.removed.clone();
    let options = LaneListOptions::default().with_lane_length(40.0, 60.0);
    let mut list = measured_list(options, items, SizeF::new(120.0, 1_000.0));
    assert_eq!(list.lanes(), 3);

    let placement = |list: &LaneList, index: usize| {
        *list
            .placements()
            .iter()
            .find(|p| p.index == index)
            .expect("item is laid out")
    };
    let header = placement(&list, 0);
    assert!(header.is_group);
    assert_eq!(header.offset, OffsetF::new(0.0, 0.0));
    assert_eq!(header.size, SizeF::new(120.0, 30.0));

    assert_eq!(placement(&list, 1).offset, OffsetF::new(0.0, 30.0));
    assert_eq!(placement(&list, 2).offset, OffsetF::new(40.0, 30.0));
    assert_eq!(placement(&list, 3).offset, OffsetF::new(80.0, 30.0));
    assert_eq!(placement(&list, 2).size, SizeF::new(40.0, 50.0));

    // Items 4 and 5 form a short strip: the group at 6 starts its own.
    assert_eq!(placement(&list, 4).offset, OffsetF::new(0.0, 80.0));
    assert_eq!(placement(&list, 5).offset, OffsetF::new(40.0, 80.0));
    assert_eq!(placement(&list, 6).offset, OffsetF::new(0.0, 130.0));
    assert_eq!(placement(&list, 8).offset, OffsetF::new(40.0, 160.0));
    assert!(removed.borrow().contains(&6));

    assert!(list.is_at_bottom());
    assert_close(list.content_main_size(), 210.0);
    assert_strips_consistent(&list);
    list.layout();
    assert_eq!(list.placements().len(), 10);
}

#[test]
fn backward_fill_rebuilds_the_same_strips() {
    use ItemKind::{Group, Item};
    let kinds = vec![Group, Item, Item, Item, Item, Item, Group, Item, Item, Item];
    let options = LaneListOptions::default().with_lane_length(40.0, 60.0);
    let mut list = measured_list(
        options,
        KindItems::new(kinds, 50.0, 30.0),
        SizeF::new(120.0, 100.0),
    );
    list.jump_to_index(9, ScrollAlign::End);

    let strip = |list: &LaneList, index: usize| list.item_position(index).expect("laid out");
    assert_close(strip(&list, 7).start_pos, 50.0);
    assert_eq!(strip(&list, 7), strip(&list, 9));
    let group = strip(&list, 6);
    assert!(group.is_group);
    assert_close(group.start_pos, 20.0);
    assert_close(strip(&list, 4).start_pos, -30.0);
    assert_eq!(strip(&list, 4), strip(&list, 5));
    assert!(list.item_position(3).is_none());
    assert!(list.is_at_bottom());
    assert_strips_consistent(&list);
}

#[test]
fn lane_count_change_realigns_strips() {
    let mut list = measured_list(
        LaneListOptions::default().with_lane_length(40.0, 60.0),
        ItemFns::new(100, |_| 50.0),
        SizeF::new(120.0, 200.0),
    );
    assert_eq!(list.lanes(), 3);
    list.update_current_offset(120.0, ScrollSource::Drag);
    assert_strips_consistent(&list);

    list.measure(&LayoutConstraint::loose(SizeF::new(80.0, 200.0)));
    list.layout();
    assert_eq!(list.lanes(), 2);
    let first = list.engine().start_index().expect("laid out");
    assert_eq!(first % 2, 0);
    assert_strips_consistent(&list);
}

#[test]
fn jump_to_index_aligns() {
    let mut list = uniform_list(100, 50.0, 200.0);

    list.jump_to_index(50, ScrollAlign::Start);
    assert_eq!(list.first_visible(), Some((50, 0.0)));
    assert_close(list.current_offset(), 2_500.0);

    list.jump_to_index(50, ScrollAlign::Center);
    assert_close(list.item_position(50).expect("laid out").start_pos, 75.0);
    assert_close(list.current_offset(), 2_425.0);

    list.jump_to_index(50, ScrollAlign::End);
    assert_close(list.item_position(50).expect("laid out").end_pos, 200.0);
    assert_close(list.current_offset(), 2_350.0);

    // Past the end of the window: scroll the least amount.
    list.jump_to_index(51, ScrollAlign::Auto);
    assert_close(list.item_position(51).expect("laid out").end_pos, 200.0);
    assert_close(list.current_offset(), 2_400.0);

    // Fully visible: stay.
    list.jump_to_index(49, ScrollAlign::Auto);
    assert_close(list.current_offset(), 2_400.0);
    assert_close(list.item_position(49).expect("laid out").start_pos, 50.0);
}

#[test]
fn jump_near_end_closes_bottom_gap() {
    let mut list = uniform_list(100, 50.0, 200.0);
    list.jump_to_index(99, ScrollAlign::Start);
    assert!(list.is_at_bottom());
    assert_eq!(list.first_visible(), Some((96, 0.0)));
    assert_close(list.current_offset(), 4_800.0);
    assert_close(list.content_main_size(), 5_000.0);
}

#[test]
fn initial_index_starts_there() {
    let list = measured_list(
        LaneListOptions::default().with_initial_index(20),
        ItemFns::new(100, |_| 50.0),
        SizeF::new(100.0, 200.0),
    );
    assert_eq!(list.first_visible(), Some((20, 0.0)));
    assert_close(list.current_offset(), 1_000.0);
}

#[test]
fn data_change_keeps_first_item_in_place() {
    let mut list = uniform_list(100, 50.0, 200.0);
    list.update_current_offset(1_010.0, ScrollSource::Drag);
    assert_eq!(list.first_visible(), Some((20, -10.0)));

    list.set_items(ItemFns::new(120, |_| 50.0));
    assert_eq!(list.first_visible(), Some((20, -10.0)));
    assert_close(list.current_offset(), 1_010.0);

    list.set_items(ItemFns::new(10, |_| 50.0));
    assert!(list.is_at_bottom());
    assert_close(list.current_offset(), 300.0);
}

#[test]
fn restore_anchor_places_item() {
    let mut list = uniform_list(100, 50.0, 200.0);
    list.restore_anchor(30, 20.0);
    assert_eq!(list.first_visible(), Some((30, -20.0)));
    assert_close(list.current_offset(), 1_520.0);
}

#[test]
fn unbounded_list_wraps_content() {
    let mut list = LaneList::new(LaneListOptions::default(), ItemFns::new(4, |_| 25.0));
    let size = list.measure(&LayoutConstraint::loose(SizeF::new(50.0, f32::INFINITY)));
    assert_eq!(size, SizeF::new(50.0, 100.0));
    assert!(!list.is_scrollable());
}

#[test]
fn strips_stay_contiguous_under_random_motion() {
    let mut rng = Lcg::new(0xdead_beef);
    for _ in 0..30 {
        let count = rng.gen_range_usize(1, 200);
        let groups: Vec<bool> = (0..count).map(|_| rng.gen_range_u64(0, 6) == 0).collect();
        let sizes: Vec<f32> = (0..count).map(|_| rng.gen_range_f32(10.0, 80.0)).collect();
        let items = ItemFns::new(count, move |i| sizes[i]).with_groups(move |i| groups[i]);
        let min = rng.gen_range_f32(30.0, 120.0);
        let options = LaneListOptions::default().with_lane_length(min, min * 2.0);
        let viewport = rng.gen_range_f32(50.0, 400.0);
        let mut list = measured_list(options, items, SizeF::new(300.0, viewport));
        assert_strips_consistent(&list);

        for _ in 0..100 {
            if rng.gen_range_u64(0, 8) == 0 {
                let align = [
                    ScrollAlign::Start,
                    ScrollAlign::Center,
                    ScrollAlign::End,
                    ScrollAlign::Auto,
                ][rng.gen_range_usize(0, 4)];
                list.jump_to_index(rng.gen_range_usize(0, count), align);
            } else {
                let delta = rng.gen_range_f32(-150.0, 150.0);
                list.update_current_offset(delta, ScrollSource::Drag);
            }
            list.layout();
            assert_strips_consistent(&list);
            assert!(!list.placements().is_empty());
        }
    }
}

/// Drags `list` by `step` until it reports the boundary in that direction. Every drag must
/// move the content the requested way and the offset must stay in range.
#[track_caller]
fn drag_to_edge(m: &mut ScrollableMotionController, list: &mut LaneList, step: f32) -> usize {
    let at_edge = |list: &LaneList| {
        if step > 0.0 {
            list.is_at_bottom()
        } else {
            list.is_at_top()
        }
    };
    for steps in 0..20_000 {
        if at_edge(list) {
            return steps;
        }
        let moved = m.on_drag_update(list, step);
        assert!(
            moved * step > 0.0,
            "drag {steps} by {step} moved {moved} at {:?}",
            list.first_visible()
        );
        assert!(
            m.offset_state().overscroll().abs() < 1e-2,
            "offset left the range: {:?}",
            m.offset_state()
        );
    }
    panic!("never reached the edge dragging by {step}: {:?}", list.first_visible());
}

#[test]
fn drag_up_after_jump_reaches_taller_items_above() {
    let items = ItemFns::new(1_000, |i| if i < 500 { 100.0 } else { 10.0 });
    let mut list = measured_list(LaneListOptions::default(), items, SizeF::new(100.0, 200.0));
    list.jump_to_index(600, ScrollAlign::Start);
    assert_eq!(list.first_visible(), Some((600, 0.0)));

    let mut m = controller(EdgeEffect::None);
    m.on_drag_start(&list);
    assert_eq!(drag_to_edge(&mut m, &mut list, -100.0), 510);
    assert_eq!(list.first_visible(), Some((0, 0.0)));
    assert_close(list.current_offset(), 0.0);

    assert_eq!(m.on_drag_update(&mut list, -100.0), 0.0);
    assert_eq!(list.first_visible(), Some((0, 0.0)));

    assert_eq!(drag_to_edge(&mut m, &mut list, 100.0), 548);
    assert_close(list.current_offset(), 54_800.0);
    assert_close(list.content_main_size(), 55_000.0);
}

#[test]
fn repeated_drags_reach_both_ends_of_random_lists() {
    let mut rng = Lcg::new(0x5eed_1e57);
    for _ in 0..24 {
        let count = rng.gen_range_usize(20, 300);
        let groups: Vec<bool> = (0..count).map(|_| rng.gen_range_u64(0, 8) == 0).collect();
        let sizes: Vec<f32> = (0..count).map(|_| rng.gen_range_f32(5.0, 300.0)).collect();
        let items = ItemFns::new(count, move |i| sizes[i]).with_groups(move |i| groups[i]);
        let min = rng.gen_range_f32(60.0, 300.0);
        let options = LaneListOptions::default().with_lane_length(min, min * 2.0);
        let mut list = measured_list(options, items, SizeF::new(300.0, 200.0));
        let mut m = controller(EdgeEffect::None);
        m.on_drag_start(&list);

        for round in 0..2 {
            if round == 1 {
                list.jump_to_index(rng.gen_range_usize(0, count), ScrollAlign::Start);
                m.on_drag_start(&list);
            }
            drag_to_edge(&mut m, &mut list, 37.0);
            assert!(list.is_at_bottom());
            assert_strips_consistent(&list);

            drag_to_edge(&mut m, &mut list, -37.0);
            assert!(list.is_at_top());
            assert_strips_consistent(&list);
            let (first, start) = list.first_visible().expect("visible");
            assert_eq!(first, 0);
            assert!(start.abs() < 1e-2, "item 0 starts at {start}");
            assert!(list.current_offset().abs() < 1e-2);
        }
    }
}

#[test]
fn nested_parent_first_forwards_once_child_is_at_boundary() {
    let mut tree = LayoutTree::new();
    let ctx = ScrollContext::default();
    let parent = tree.add_node(Layoutable::Scroll(ScrollBox::with_extents(
        Axis::Vertical,
        400.0,
        1_000.0,
    )));
    tree.set_motion(parent, ScrollableMotionController::new(ScrollableOptions::default(), ctx));
    let list = LaneList::new(LaneListOptions::default(), ItemFns::new(10, |_| 50.0));
    let child = tree.add_child(parent, Layoutable::List(list));
    let nested =
        NestedScrollOptions::new(NestedScrollMode::ParentFirst, NestedScrollMode::SelfOnly);
    tree.set_motion(
        child,
        ScrollableMotionController::new(ScrollableOptions::default().with_nested(nested), ctx),
    );
    tree.measure(child, &LayoutConstraint::loose(SizeF::new(100.0, 200.0)));
    assert_eq!(tree.parent_scrollable(child), Some(parent));

    tree.on_drag_start(child);
    let r = tree.on_drag_update(child, 100.0);
    assert_eq!(r, ScrollResult { consumed: 100.0, forwarded: 0.0 });
    assert_close(tree.scrollable(child).expect("list").current_offset(), 100.0);
    assert_eq!(tree.scrollable(parent).expect("box").current_offset(), 0.0);

    tree.on_drag_update(child, 200.0);
    assert!(tree.scrollable(child).expect("list").is_at_bottom());

    let r = tree.on_drag_update(child, 100.0);
    assert_close(r.consumed, 0.0);
    assert_close(r.forwarded, 100.0);
    assert_close(tree.scrollable(parent).expect("box").current_offset(), 100.0);
}

#[test]
fn nested_scroll_conserves_every_delta() {
    let mut rng = Lcg::new(42);
    let edges = [
        EdgeEffect::None,
        EdgeEffect::Fade,
        EdgeEffect::spring(&ScrollContext::default()),
    ];
    for forward in NestedScrollMode::ALL {
        for backward in NestedScrollMode::ALL {
            let mut tree = LayoutTree::new();
            let ctx = ScrollContext::default();
            let parent = tree.add_node(Layoutable::Scroll(ScrollBox::with_extents(
                Axis::Vertical,
                400.0,
                1_000.0,
            )));
            let parent_edge = edges[rng.gen_range_usize(0, edges.len())];
            tree.set_motion(parent, controller(parent_edge));
            let child = tree.add_child(
                parent,
                Layoutable::Scroll(ScrollBox::with_extents(Axis::Vertical, 200.0, 600.0)),
            );
            let child_edge = edges[rng.gen_range_usize(0, edges.len())];
            let options = ScrollableOptions::default()
                .with_edge_effect(child_edge)
                .with_nested(NestedScrollOptions::new(forward, backward));
            tree.set_motion(child, ScrollableMotionController::new(options, ctx));
            tree.on_drag_start(child);

            for _ in 0..200 {
                let delta = rng.gen_range_f32(-120.0, 120.0);
                let source = if rng.gen_bool() {
                    ScrollSource::Drag
                } else {
                    ScrollSource::Axis
                };
                let r = tree.handle_scroll(child, delta, source);
                assert!(
                    (r.consumed + r.forwarded - delta).abs() < 1e-3,
                    "{forward:?}/{backward:?}: {delta} -> {r:?}"
                );
                let mode = if delta >= 0.0 { forward } else { backward };
                if mode == NestedScrollMode::SelfOnly {
                    assert_eq!(r.forwarded, 0.0);
                }
            }
        }
    }
}

#[test]
fn disabled_scrollable_forwards_to_parent() {
    let mut tree = LayoutTree::new();
    let parent = tree.add_node(Layoutable::Scroll(ScrollBox::with_extents(
        Axis::Vertical,
        400.0,
        1_000.0,
    )));
    tree.set_motion(parent, controller(EdgeEffect::None));
    let child = tree.add_child(
        parent,
        Layoutable::Scroll(ScrollBox::with_extents(Axis::Vertical, 200.0, 600.0)),
    );
    tree.set_motion(
        child,
        ScrollableMotionController::new(
            ScrollableOptions::default().with_scroll_enabled(false),
            ScrollContext::default(),
        ),
    );
    let r = tree.handle_scroll(child, 50.0, ScrollSource::Drag);
    assert_eq!(r, ScrollResult { consumed: 0.0, forwarded: 50.0 });
    assert_close(tree.scrollable(parent).expect("box").current_offset(), 50.0);
    assert_eq!(tree.scrollable(child).expect("box").current_offset(), 0.0);

    // With no scrollable above, the delta is refused in place.
    let mut tree = LayoutTree::new();
    let root = tree.add_node(Layoutable::Scroll(ScrollBox::with_extents(
        Axis::Vertical,
        200.0,
        600.0,
    )));
    tree.set_motion(
        root,
        ScrollableMotionController::new(
            ScrollableOptions::default().with_scroll_enabled(false),
            ScrollContext::default(),
        ),
    );
    let r = tree.handle_scroll(root, 50.0, ScrollSource::Drag);
    assert_eq!(r, ScrollResult { consumed: 50.0, forwarded: 0.0 });
    assert_eq!(tree.scrollable(root).expect("box").current_offset(), 0.0);
}

#[test]
fn scrollable_options_default_to_an_enabled_clamped_edge() {
    let options = ScrollableOptions::new();
    assert_eq!(options, ScrollableOptions::default());
    assert_eq!(options.edge_effect, EdgeEffect::None);
    assert_eq!(options.friction, None);
    assert!(options.scroll_enabled);

    // The scroll axis belongs to the scrollable, not to its options.
    let mut b = ScrollBox::with_extents(Axis::Horizontal, 400.0, 1_000.0);
    let mut m = ScrollableMotionController::new(options, ScrollContext::default());
    assert_close(m.on_drag_update(&mut b, 150.0), 150.0);
    assert_eq!(b.axis(), Axis::Horizontal);
    assert_close(b.current_offset(), 150.0);
}

#[test]
fn route_remainder_table() {
    use NestedScrollMode::*;
    assert_eq!(route_remainder(Parent, true, None), Handoff::Keep);
    assert_eq!(route_remainder(SelfOnly, false, Some(true)), Handoff::Keep);
    assert_eq!(route_remainder(Parent, true, Some(false)), Handoff::Forward);
    assert_eq!(route_remainder(SelfFirst, true, Some(true)), Handoff::Keep);
    assert_eq!(route_remainder(SelfFirst, false, Some(true)), Handoff::Forward);
    assert_eq!(route_remainder(ParentFirst, true, Some(true)), Handoff::Forward);
    assert_eq!(route_remainder(ParentFirst, true, Some(false)), Handoff::Keep);
}

#[test]
fn nested_mode_follows_delta_direction() {
    let options = NestedScrollOptions::new(NestedScrollMode::Parent, NestedScrollMode::SelfFirst);
    assert_eq!(options.mode_for(10.0), NestedScrollMode::Parent);
    assert_eq!(options.mode_for(-10.0), NestedScrollMode::SelfFirst);
    assert!(!options.is_self_only());
    assert!(NestedScrollOptions::default().is_self_only());
}

#[test]
fn spring_drag_overscrolls_with_resistance() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 1_000.0);
    let mut m = controller(EdgeEffect::spring(&ScrollContext::default()));
    m.on_drag_start(&b);

    assert_close(m.on_drag_update(&mut b, -100.0), -60.0);
    assert_close(b.current_offset(), -60.0);
    assert!(m.is_out_of_boundary());
    assert!(b.out_boundary());

    // γ = 60 / 400: the second pull moves less.
    assert_close(m.on_drag_update(&mut b, -100.0), -43.35);

    // Pulling back towards the range is not resisted.
    let before = b.current_offset();
    assert_close(m.on_drag_update(&mut b, 30.0), 30.0);
    assert_close(b.current_offset(), before + 30.0);

    m.on_drag_end(&mut b, 0.0);
    assert_eq!(m.phase(), ScrollPhase::SpringBack);
    run_frames(&mut m, &mut b, 400);
    assert_eq!(m.phase(), ScrollPhase::Idle);
    assert_close(b.current_offset(), 0.0);
    assert!(!b.out_boundary());
}

#[test]
fn drag_resistance_shrinks_with_overscroll() {
    assert_close(drag_resistance(10.0, 0.0, 400.0, 0.6), 6.0);
    assert_close(drag_resistance(10.0, 200.0, 400.0, 0.6), 1.5);
    assert_close(drag_resistance(10.0, -400.0, 400.0, 0.6), 0.0);
    assert_eq!(drag_resistance(10.0, 0.0, 0.0, 0.6), 0.0);
}

#[test]
fn clamped_edges_never_overscroll() {
    for edge in [EdgeEffect::None, EdgeEffect::Fade] {
        let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 1_000.0);
        let mut m = controller(edge);
        m.on_drag_start(&b);
        assert_eq!(m.on_drag_update(&mut b, -50.0), 0.0);
        assert_eq!(b.current_offset(), 0.0);
        assert_close(m.on_drag_update(&mut b, 700.0), 600.0);
        assert_close(b.current_offset(), 600.0);
        assert!(!m.is_out_of_boundary());
    }
}

#[test]
fn fade_records_refused_delta() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 1_000.0);
    let mut m = controller(EdgeEffect::Fade);
    m.on_drag_start(&b);
    m.on_drag_update(&mut b, -50.0);
    assert_close(m.fade_extent(), -50.0);
    m.on_drag_update(&mut b, -1_000.0);
    assert_close(m.fade_extent(), -400.0);
    m.on_drag_end(&mut b, 0.0);
    assert_eq!(m.fade_extent(), 0.0);

    let mut m = controller(EdgeEffect::None);
    m.on_drag_start(&b);
    m.on_drag_update(&mut b, -50.0);
    assert_eq!(m.fade_extent(), 0.0);
}

#[test]
fn axis_and_bar_sources_never_overscroll_a_spring() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 1_000.0);
    let m = controller(EdgeEffect::spring(&ScrollContext::default()));
    assert!(!m.can_over_scroll(ScrollSource::Axis, &b));
    assert!(!m.can_over_scroll(ScrollSource::Bar, &b));
    assert!(!m.can_over_scroll(ScrollSource::Animation, &b));
    assert!(m.can_over_scroll(ScrollSource::Drag, &b));

    let mut m = m;
    assert_eq!(m.on_scroll_callback(&mut b, -30.0, ScrollSource::Axis), 0.0);
    assert_eq!(b.current_offset(), 0.0);

    let mut short = ScrollBox::with_extents(Axis::Vertical, 400.0, 300.0);
    assert!(!m.can_over_scroll(ScrollSource::Drag, &short));
    assert_eq!(m.on_scroll_callback(&mut short, -30.0, ScrollSource::Drag), 0.0);
}

#[test]
fn fling_decays_to_idle() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 10_000.0);
    let mut m = controller(EdgeEffect::None);
    m.on_drag_start(&b);
    m.on_drag_end(&mut b, 2_000.0);
    assert_eq!(m.phase(), ScrollPhase::Flinging);
    assert!(m.velocity() > 0.0);

    let frames = run_frames(&mut m, &mut b, 2_000);
    assert!(frames > 10);
    assert_eq!(m.phase(), ScrollPhase::Idle);
    // v0 / (4.2 * friction) with the default friction of 0.6.
    let offset = b.current_offset();
    assert!((780.0..800.0).contains(&offset), "offset {offset}");
}

#[test]
fn fling_without_friction_does_not_start() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 10_000.0);
    let mut m = ScrollableMotionController::new(
        ScrollableOptions::default().with_friction(0.0),
        ScrollContext::default(),
    );
    m.on_drag_start(&b);
    m.on_drag_end(&mut b, 2_000.0);
    assert_eq!(m.phase(), ScrollPhase::Idle);
    assert!(FlingDecay::new(2_000.0, 0.0).is_none());
    assert!(FlingDecay::new(0.5, 0.6).is_none());
}

#[test]
fn fling_stops_at_clamped_boundary() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 600.0);
    let mut m = controller(EdgeEffect::None);
    m.on_drag_start(&b);
    m.on_drag_end(&mut b, 5_000.0);
    run_frames(&mut m, &mut b, 100);
    assert_close(b.current_offset(), 200.0);
}

#[test]
fn fling_into_spring_edge_bounces_back() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 600.0);
    let mut m = controller(EdgeEffect::spring(&ScrollContext::default()));
    m.on_drag_start(&b);
    m.on_drag_end(&mut b, 3_000.0);

    let mut now = 0u64;
    let mut max_offset = 0.0f32;
    let mut saw_spring = false;
    for _ in 0..1_000 {
        now += 16;
        let more = m.tick(&mut b, now);
        saw_spring |= m.phase() == ScrollPhase::SpringBack;
        max_offset = max_offset.max(b.current_offset());
        if !more {
            break;
        }
    }
    assert!(saw_spring);
    assert!(max_offset > 201.0, "max offset {max_offset}");
    assert_eq!(m.phase(), ScrollPhase::Idle);
    assert_close(b.current_offset(), 200.0);
}

#[test]
fn spring_simulation_settles() {
    let mut rng = Lcg::new(99);
    for _ in 0..200 {
        let displacement = rng.gen_range_f32(-300.0, 300.0);
        let velocity = rng.gen_range_f32(-2_000.0, 2_000.0);
        let motion = if rng.gen_bool() {
            SpringMotion::DEFAULT
        } else {
            SpringMotion::new(1.0, rng.gen_range_f32(50.0, 500.0), rng.gen_range_f32(0.0, 40.0))
        };
        let mut sim = SpringSimulation::new(motion, displacement, velocity);
        let mut frames = 0;
        while !sim.is_settled() {
            sim.step(0.016);
            frames += 1;
            assert!(frames <= 320, "{motion:?} did not settle");
        }
        if motion == SpringMotion::DEFAULT {
            assert!(sim.displacement().abs() < 0.5);
        }
    }
}

#[test]
fn invalid_spring_snaps() {
    let sim = SpringSimulation::new(SpringMotion::new(0.0, 100.0, 10.0), 50.0, 0.0);
    assert!(sim.is_settled());
    assert_eq!(sim.displacement(), 0.0);

    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 1_000.0);
    let edge = EdgeEffect::Spring {
        friction: 0.6,
        motion: SpringMotion::new(1.0, -5.0, 10.0),
    };
    let mut m = controller(edge);
    m.on_drag_start(&b);
    m.on_drag_update(&mut b, -40.0);
    assert!(b.current_offset() < 0.0);
    m.on_drag_end(&mut b, 0.0);
    assert_eq!(m.phase(), ScrollPhase::Idle);
    assert_close(b.current_offset(), 0.0);
}

#[test]
fn animate_to_reaches_target() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 1_000.0);
    let mut m = controller(EdgeEffect::None);
    m.animate_to(&mut b, 300.0, 100, Curve::EaseInOut, 0);
    assert_eq!(m.phase(), ScrollPhase::Animating);

    let mut last = 0.0;
    let mut now = 0;
    while m.tick(&mut b, now) {
        let offset = b.current_offset();
        assert!(offset >= last - 1e-3);
        last = offset;
        now += 20;
        assert!(now <= 200);
    }
    assert_close(b.current_offset(), 300.0);

    // Targets are clamped to the scroll range.
    m.animate_to(&mut b, 5_000.0, 0, Curve::Linear, now);
    assert_close(b.current_offset(), 600.0);
}

#[test]
fn curves_start_and_end_in_place() {
    for curve in [
        Curve::Linear,
        Curve::Ease,
        Curve::EaseInOut,
        Curve::SmoothStep,
        Curve::EaseInOutCubic,
    ] {
        assert_close(curve.sample(0.0), 0.0);
        assert_close(curve.sample(1.0), 1.0);
        let mut last = 0.0;
        for step in 0..=20 {
            let v = curve.sample(step as f32 / 20.0);
            assert!(v >= last - 1e-4, "{curve:?} not monotonic");
            last = v;
        }
    }
}

#[test]
fn tween_retargets_from_current_value() {
    let mut tween = ScrollTween::new(0.0, 100.0, 0, 100, Curve::Linear);
    assert_close(tween.sample(50), 50.0);
    tween.retarget(50, 200.0, 100);
    assert_close(tween.sample(50), 50.0);
    assert!(tween.is_done(150));
    assert_close(tween.sample(150), 200.0);
}

#[test]
fn abort_and_stop_are_idempotent() {
    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 1_000.0);
    let mut m = controller(EdgeEffect::None);
    m.animate_to(&mut b, 300.0, 100, Curve::Linear, 0);
    m.abort_scroll_animator();
    assert_eq!(m.phase(), ScrollPhase::Idle);
    assert!(m.animator_aborted());
    let snapshot = m.snapshot();
    m.abort_scroll_animator();
    assert_eq!(m.snapshot(), snapshot);

    m.on_drag_start(&b);
    m.on_drag_end(&mut b, 2_000.0);
    assert!(m.needs_frame());
    m.stop_scrollable();
    assert_eq!(m.phase(), ScrollPhase::Idle);
    assert_eq!(m.velocity(), 0.0);
    m.stop_scrollable();
    assert_eq!(m.phase(), ScrollPhase::Idle);
    assert!(!m.tick(&mut b, 1_000));
}

#[test]
fn wearable_context_raises_friction() {
    let ctx = ScrollContext::new(3).with_form_factor(FormFactor::Wearable);
    let m = ScrollableMotionController::new(ScrollableOptions::default(), ctx);
    assert_close(m.friction(), WEARABLE_FRICTION);

    let m = ScrollableMotionController::new(
        ScrollableOptions::default()
            .with_edge_effect(EdgeEffect::spring(&ScrollContext::default())),
        ctx,
    );
    assert_close(m.friction(), DEFAULT_FRICTION);

    let m = ScrollableMotionController::new(ScrollableOptions::default().with_friction(0.3), ctx);
    assert_close(m.friction(), 0.3);
}

#[test]
fn scroll_bar_with_zero_control_distance_stays_at_start() {
    let mut bar = ScrollBarSynchronizer::new(Axis::Vertical);
    bar.measure(
        &LayoutConstraint::loose(SizeF::new(10.0, 200.0)),
        SizeF::new(10.0, 40.0),
    );
    bar.set_scroll_offset(50.0);
    bar.set_control_distance(0.0);
    let thumb = bar.layout();
    assert_eq!(thumb, OffsetF::new(0.0, 0.0));
    assert_eq!(bar.current_offset(), 0.0);

    assert_eq!(bar.on_thumb_drag(10.0), Some(0.0));
    assert!(bar.current_offset().is_finite());
}

#[test]
fn scroll_bar_maps_thumb_both_ways() {
    let mut bar = ScrollBarSynchronizer::new(Axis::Vertical);
    let size = bar.measure(
        &LayoutConstraint::loose(SizeF::new(10.0, 200.0)),
        SizeF::new(10.0, 40.0),
    );
    assert_eq!(size, SizeF::new(10.0, 200.0));
    bar.set_control_distance(300.0);
    bar.set_scroll_offset(150.0);
    let thumb = bar.layout();
    assert_eq!(thumb.x, 0.0);
    assert_close(thumb.y, 80.0);
    assert_close(bar.scrollable_distance(), 160.0);

    assert_close(bar.on_thumb_drag(16.0).expect("thumb moves"), 180.0);
    assert_close(bar.on_thumb_drag(1_000.0).expect("thumb moves"), 300.0);
    assert_close(bar.current_offset(), 160.0);

    let mut full = ScrollBarSynchronizer::new(Axis::Vertical);
    full.measure(
        &LayoutConstraint::loose(SizeF::new(10.0, 40.0)),
        SizeF::new(10.0, 40.0),
    );
    full.layout();
    assert_eq!(full.on_thumb_drag(5.0), None);
}

#[test]
fn scroll_bar_region_tracks_offset() {
    assert_eq!(ScrollBarRegion::compute(400.0, 300.0, 0.0, 16.0), None);
    assert_eq!(ScrollBarRegion::compute(0.0, 300.0, 0.0, 16.0), None);

    let r = ScrollBarRegion::compute(400.0, 1_600.0, 0.0, 16.0).expect("overflows");
    assert_close(r.thumb_length, 100.0);
    assert_eq!(r.thumb_offset, 0.0);

    let r = ScrollBarRegion::compute(400.0, 1_600.0, 1_200.0, 16.0).expect("overflows");
    assert_close(r.thumb_offset, 300.0);

    let r = ScrollBarRegion::compute(400.0, 1_600.0, -40.0, 16.0).expect("overflows");
    assert_close(r.thumb_length, 60.0);

    let r = ScrollBarRegion::compute(400.0, 100_000.0, 0.0, 16.0).expect("overflows");
    assert_close(r.thumb_length, 16.0);

    let mut b = ScrollBox::with_extents(Axis::Vertical, 400.0, 1_600.0);
    let mut m = controller(EdgeEffect::None);
    m.scroll_to(&mut b, 600.0);
    let r = m.scroll_bar_region().expect("overflows");
    assert_close(r.thumb_offset, 150.0);
}

#[test]
fn proxy_handles_share_state() {
    let proxy = ScrollBarProxy::new();
    assert_eq!(proxy.holder_count(), 1);
    let other = proxy.clone();
    assert_eq!(proxy.holder_count(), 2);
    assert!(proxy.ptr_eq(&other));
    drop(other);
    assert_eq!(proxy.holder_count(), 1);

    proxy.set_scroll_position(10.0, ScrollSource::Drag);
    proxy.set_scroll_position(20.0, ScrollSource::Bar);
    assert_eq!(proxy.scroll_position(), Some((20.0, ScrollSource::Bar)));

    proxy.start_scroll_bar_animator();
    proxy.start_scroll_bar_animator();
    proxy.notify_scroll_bar_callback(1.0, 10.0);
    proxy.notify_scroll_bar_callback(2.0, 10.0);
    assert!(proxy.has_pending());
    assert_eq!(
        proxy.take_pending(),
        vec![
            ProxyEvent::ScrollPosition {
                offset: 20.0,
                source: ScrollSource::Bar
            },
            ProxyEvent::AnimatorStarted,
            ProxyEvent::ScrollBarUpdate {
                offset: 2.0,
                control_distance: 10.0
            },
        ]
    );
    assert!(!proxy.has_pending());

    proxy.stop_scroll_bar_animator();
    proxy.stop_scroll_bar_animator();
    assert_eq!(proxy.take_pending(), vec![ProxyEvent::AnimatorStopped]);
}

#[test]
fn proxy_syncs_scrollable_and_bar() {
    let mut tree = LayoutTree::new();
    let root = tree.add_node(Layoutable::Generic(GenericBox::new(Axis::Horizontal)));
    let scroll = tree.add_child(
        root,
        Layoutable::Scroll(ScrollBox::with_extents(Axis::Vertical, 400.0, 1_000.0)),
    );
    tree.set_motion(scroll, controller(EdgeEffect::None));
    let bar = tree.add_child(
        root,
        Layoutable::ScrollBar(ScrollBarSynchronizer::new(Axis::Vertical)),
    );
    let thumb = tree.add_child(bar, Layoutable::Generic(GenericBox::fixed(SizeF::new(10.0, 40.0))));
    tree.measure(bar, &LayoutConstraint::loose(SizeF::new(10.0, 400.0)));
    tree.layout(bar, OffsetF::default());

    let proxy = tree.attach_scroll_bar_proxy(scroll, bar);
    assert_eq!(proxy.holder_count(), 3);
    tree.sync_scroll_bar_proxies();
    assert_eq!(tree.frame(thumb).expect("thumb").offset, OffsetF::new(0.0, 0.0));

    tree.scroll_to(scroll, 300.0);
    tree.sync_scroll_bar_proxies();
    assert_close(tree.frame(thumb).expect("thumb").offset.y, 180.0);

    let moved = tree.scroll_bar_mut(bar).expect("bar").on_thumb_drag(36.0);
    assert_close(moved.expect("thumb moves"), 360.0);
    tree.sync_scroll_bar_proxies();
    assert_close(tree.scrollable(scroll).expect("box").current_offset(), 360.0);

    tree.on_drag_start(scroll);
    tree.sync_scroll_bar_proxies();
    assert!(tree.scroll_bar(bar).expect("bar").is_active());
    tree.on_drag_end(scroll, 0.0);
    tree.sync_scroll_bar_proxies();
    assert!(!tree.scroll_bar(bar).expect("bar").is_active());

    tree.detach_scroll_bar_proxy(bar);
    assert!(proxy.scroll_bars().is_empty());
    assert_eq!(proxy.holder_count(), 2);
}

#[test]
fn tree_lays_out_scroll_content_at_offset() {
    let mut tree = LayoutTree::new();
    let scroll = tree.add_node(Layoutable::Scroll(ScrollBox::new(Axis::Vertical)));
    let column = tree.add_child(scroll, Layoutable::Generic(GenericBox::new(Axis::Vertical)));
    let fixed = |w, h| Layoutable::Generic(GenericBox::fixed(SizeF::new(w, h)));
    let a = tree.add_child(column, fixed(100.0, 300.0));
    let b = tree.add_child(column, fixed(80.0, 500.0));
    tree.set_motion(scroll, controller(EdgeEffect::None));

    let size = tree.measure(scroll, &LayoutConstraint::loose(SizeF::new(100.0, 400.0)));
    assert_eq!(size, SizeF::new(100.0, 400.0));
    assert_close(tree.scrollable(scroll).expect("box").scrollable_distance(), 400.0);
    assert_eq!(tree.frame(column).expect("column").size, SizeF::new(100.0, 800.0));

    tree.scroll_to(scroll, 150.0);
    tree.layout(scroll, OffsetF::default());
    assert_eq!(tree.frame(column).expect("column").offset, OffsetF::new(0.0, -150.0));
    assert_eq!(tree.frame(a).expect("a").offset, OffsetF::new(0.0, 0.0));
    assert_eq!(tree.frame(b).expect("b").offset, OffsetF::new(0.0, 300.0));

    tree.detach(b);
    assert_eq!(tree.children(column), &[a]);
    assert_eq!(tree.parent(b), None);
}

#[test]
fn tree_fling_hands_off_to_parent() {
    let mut tree = LayoutTree::new();
    let parent = tree.add_node(Layoutable::Scroll(ScrollBox::with_extents(
        Axis::Vertical,
        400.0,
        4_000.0,
    )));
    tree.set_motion(parent, controller(EdgeEffect::None));
    let child = tree.add_child(
        parent,
        Layoutable::Scroll(ScrollBox::with_extents(Axis::Vertical, 200.0, 300.0)),
    );
    let options = ScrollableOptions::default()
        .with_nested(NestedScrollOptions::both(NestedScrollMode::SelfFirst));
    tree.set_motion(child, ScrollableMotionController::new(options, ScrollContext::default()));

    tree.on_drag_start(child);
    tree.on_drag_end(child, 3_000.0);
    assert_eq!(tree.animating_nodes(), vec![child]);

    let mut now = 0;
    while tree.tick(now) {
        now += 16;
        assert!(now < 10_000);
    }
    assert_close(tree.scrollable(child).expect("box").current_offset(), 100.0);
    let parent_offset = tree.scrollable(parent).expect("box").current_offset();
    assert!(parent_offset > 500.0, "parent offset {parent_offset}");
    assert_eq!(tree.motion(child).expect("motion").phase(), ScrollPhase::Idle);
}

#[test]
fn tree_jump_to_index_stops_motion() {
    let mut tree = LayoutTree::new();
    let list = tree.add_node(Layoutable::List(LaneList::new(
        LaneListOptions::default(),
        ItemFns::new(100, |_| 50.0),
    )));
    tree.set_motion(list, controller(EdgeEffect::None));
    tree.measure(list, &LayoutConstraint::loose(SizeF::new(100.0, 200.0)));
    tree.layout(list, OffsetF::default());

    tree.animate_to(list, 1_000.0, 300, Curve::Ease, 0);
    assert!(tree.motion(list).expect("motion").needs_frame());
    tree.jump_to_index(list, 40, ScrollAlign::Start);
    let m = tree.motion(list).expect("motion");
    assert_eq!(m.phase(), ScrollPhase::Idle);
    assert_close(m.offset_state().current_offset, 2_000.0);
    assert_eq!(tree.list(list).expect("list").first_visible(), Some((40, 0.0)));
}
