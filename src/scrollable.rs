use crate::edge_effect::{SpringSimulation, drag_resistance};
use crate::fling::FlingDecay;
use crate::geometry::{EPSILON, near_zero};
use crate::{
    Axis, Curve, EdgeEffect, MotionSnapshot, NestedScrollMode, ScrollBarProxy, ScrollBarRegion,
    ScrollContext, ScrollOffsetState, ScrollPhase, ScrollResult, ScrollSource, ScrollTween,
    ScrollableOptions,
};

/// The boundary tests and offset sink a [`ScrollableMotionController`] drives.
///
/// Offsets grow towards the end of the content.
pub trait Scrollable {
    fn axis(&self) -> Axis;

    /// The content start is at (or below) the viewport start.
    fn is_at_top(&self) -> bool;

    /// The content end is at (or above) the viewport end.
    fn is_at_bottom(&self) -> bool;

    /// Moves the content by `delta`. Returns `false` when nothing moved.
    fn update_current_offset(&mut self, delta: f32, source: ScrollSource) -> bool;

    fn current_offset(&self) -> f32;

    fn content_main_size(&self) -> f32;

    fn viewport_main_size(&self) -> f32;

    fn scrollable_distance(&self) -> f32 {
        (self.content_main_size() - self.viewport_main_size()).max(0.0)
    }

    fn is_scrollable(&self) -> bool {
        self.scrollable_distance() > EPSILON
    }

    fn out_boundary(&self) -> bool {
        let offset = self.current_offset();
        offset < -EPSILON || offset > self.scrollable_distance() + EPSILON
    }
}

/// A frame budget used when a motion has no previous frame time yet.
const FIRST_FRAME_MS: u64 = 16;

/// Owns the motion of one scrollable: offset bookkeeping, edge effects, fling, spring back,
/// programmatic animations and the local half of the nested scroll protocol.
///
/// The controller never owns the scrollable it drives; every operation takes it as
/// `&mut dyn Scrollable`, so the same controller logic serves lists and plain boxes.
#[derive(Clone, Debug)]
pub struct ScrollableMotionController {
    options: ScrollableOptions,
    context: ScrollContext,
    phase: ScrollPhase,
    offset: ScrollOffsetState,
    viewport_main: f32,

    fling: Option<FlingDecay>,
    spring: Option<(SpringSimulation, f32)>,
    tween: Option<ScrollTween>,
    last_frame_ms: Option<u64>,

    animator_aborted: bool,
    boundary_hit: bool,
    fade_extent: f32,

    proxy: Option<ScrollBarProxy>,
}

impl ScrollableMotionController {
    pub fn new(options: ScrollableOptions, context: ScrollContext) -> Self {
        ldebug!(
            container = context.container_id,
            edge_effect = ?options.edge_effect,
            "ScrollableMotionController::new"
        );
        Self {
            options,
            context,
            phase: ScrollPhase::Idle,
            offset: ScrollOffsetState::default(),
            viewport_main: 0.0,
            fling: None,
            spring: None,
            tween: None,
            last_frame_ms: None,
            animator_aborted: false,
            boundary_hit: false,
            fade_extent: 0.0,
            proxy: None,
        }
    }

    pub fn options(&self) -> &ScrollableOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ScrollableOptions) {
        if !options.edge_effect.is_spring() && self.phase == ScrollPhase::SpringBack {
            self.spring = None;
            self.set_idle();
        }
        self.options = options;
    }

    pub fn context(&self) -> &ScrollContext {
        &self.context
    }

    pub fn edge_effect(&self) -> EdgeEffect {
        self.options.edge_effect
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn offset_state(&self) -> ScrollOffsetState {
        self.offset
    }

    pub fn velocity(&self) -> f32 {
        match self.phase {
            ScrollPhase::Flinging => self.fling.map_or(0.0, |f| f.velocity()),
            ScrollPhase::SpringBack => self.spring.map_or(0.0, |(s, _)| s.velocity()),
            _ => 0.0,
        }
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            offset: self.offset,
            phase: self.phase,
            velocity: self.velocity(),
        }
    }

    /// Fling friction: the explicit option, then the spring edge's, then the context's.
    pub fn friction(&self) -> f32 {
        self.options
            .friction
            .or(self.options.edge_effect.friction())
            .unwrap_or_else(|| self.context.friction())
    }

    pub fn nested_mode(&self, delta: f32) -> NestedScrollMode {
        self.options.nested.mode_for(delta)
    }

    /// True once [`Self::abort_scroll_animator`] ran and no new animation started since.
    pub fn animator_aborted(&self) -> bool {
        self.animator_aborted
    }

    /// Overscroll the fade decoration should show. The numeric offset stays clamped.
    pub fn fade_extent(&self) -> f32 {
        self.fade_extent
    }

    pub fn is_out_of_boundary(&self) -> bool {
        self.offset.is_out_of_boundary()
    }

    pub fn needs_frame(&self) -> bool {
        matches!(
            self.phase,
            ScrollPhase::Flinging | ScrollPhase::SpringBack | ScrollPhase::Animating
        )
    }

    pub fn set_scroll_bar_proxy(&mut self, proxy: Option<ScrollBarProxy>) {
        self.proxy = proxy;
    }

    pub fn scroll_bar_proxy(&self) -> Option<&ScrollBarProxy> {
        self.proxy.as_ref()
    }

    /// Geometry of the scrollable's own bar, if the content overflows.
    pub fn scroll_bar_region(&self) -> Option<ScrollBarRegion> {
        ScrollBarRegion::compute(
            self.viewport_main,
            self.offset.estimated_content_height,
            self.offset.current_offset,
            self.context.min_thumb_length,
        )
    }

    /// Refreshes the offset bookkeeping from the scrollable.
    pub fn sync_from(&mut self, s: &dyn Scrollable) {
        self.offset = ScrollOffsetState {
            current_offset: s.current_offset(),
            scrollable_distance: s.scrollable_distance(),
            estimated_content_height: s.content_main_size(),
        };
        self.viewport_main = s.viewport_main_size();
    }

    /// Whether a delta from `source` may push the offset past a boundary.
    ///
    /// Needs a spring edge, a gesture or animation source (never an axis device or the bar),
    /// scrollable content, and a motion in progress.
    pub fn can_over_scroll(&self, source: ScrollSource, s: &dyn Scrollable) -> bool {
        let in_motion = matches!(source, ScrollSource::Drag | ScrollSource::Fling)
            || !self.phase.is_idle();
        self.options.edge_effect.is_spring()
            && !matches!(source, ScrollSource::Axis | ScrollSource::Bar)
            && s.is_scrollable()
            && in_motion
    }

    /// Whether this scrollable would take at least part of `delta`.
    pub fn can_consume(&self, s: &dyn Scrollable, delta: f32, source: ScrollSource) -> bool {
        self.options.scroll_enabled
            && (!near_zero(self.in_range_delta(s, delta)) || self.can_over_scroll(source, s))
    }

    /// The part of `delta` that keeps the offset inside `[0, scrollable_distance]`.
    ///
    /// The boundary in the direction of `delta` only limits it once the scrollable reports
    /// standing on it; before that the offset may be an estimate and the whole delta counts
    /// as in range. Deltas that pull an overscrolled offset back count as in range.
    pub fn in_range_delta(&self, s: &dyn Scrollable, delta: f32) -> f32 {
        let offset = self.offset.current_offset;
        let distance = self.offset.scrollable_distance;
        if delta > 0.0 {
            if s.is_at_bottom() {
                delta.min((distance - offset).max(0.0))
            } else {
                delta
            }
        } else if s.is_at_top() {
            delta.max((-offset).min(0.0))
        } else {
            delta
        }
    }

    /// Applies the in-range part of `delta` and returns it.
    pub fn consume_in_range(
        &mut self,
        s: &mut dyn Scrollable,
        delta: f32,
        source: ScrollSource,
    ) -> f32 {
        self.sync_from(s);
        let part = self.in_range_delta(s, delta);
        if near_zero(part) {
            return 0.0;
        }
        self.apply(s, part, source);
        let overshoot = self.boundary_overshoot(s, delta);
        if !near_zero(overshoot) {
            self.apply(s, -overshoot, source);
        }
        part - overshoot
    }

    /// How far a move in the direction of `delta` went past a boundary the scrollable now
    /// reports standing on. Zero while that boundary is not reached.
    fn boundary_overshoot(&self, s: &dyn Scrollable, delta: f32) -> f32 {
        let over = self.offset.overscroll();
        if delta > 0.0 && s.is_at_bottom() {
            over.max(0.0)
        } else if delta < 0.0 && s.is_at_top() {
            over.min(0.0)
        } else {
            0.0
        }
    }

    /// Resolves a delta that lies entirely past a boundary through the edge effect.
    ///
    /// A spring edge lets drags through with resistance and animations through untouched;
    /// a fling stops at the boundary and hands its velocity to the spring on the next
    /// frame. Other edges clamp, and a fade edge records the refused amount. Returns the
    /// distance the offset actually moved.
    pub fn handle_edge_effect(
        &mut self,
        s: &mut dyn Scrollable,
        delta: f32,
        source: ScrollSource,
    ) -> f32 {
        if near_zero(delta) {
            return 0.0;
        }
        if source == ScrollSource::Fling {
            self.boundary_hit = true;
        }
        if !self.can_over_scroll(source, s) {
            if self.options.edge_effect.is_fade() && source != ScrollSource::Bar {
                let limit = self.viewport_main.max(0.0);
                self.fade_extent = (self.fade_extent + delta).clamp(-limit, limit);
            }
            ltrace!(delta, ?source, "handle_edge_effect: clamped");
            return 0.0;
        }

        let applied = match source {
            ScrollSource::Fling => 0.0,
            ScrollSource::Drag => drag_resistance(
                delta,
                self.offset.overscroll(),
                self.viewport_main,
                self.friction(),
            ),
            _ => delta,
        };
        if self.apply(s, applied, source) {
            applied
        } else {
            0.0
        }
    }

    /// The single entry point for offset changes on a scrollable that keeps every delta.
    ///
    /// Returns the distance the offset moved.
    pub fn on_scroll_callback(
        &mut self,
        s: &mut dyn Scrollable,
        delta: f32,
        source: ScrollSource,
    ) -> f32 {
        if !delta.is_finite() || delta == 0.0 {
            return 0.0;
        }
        if !self.options.scroll_enabled && source != ScrollSource::Animation {
            return 0.0;
        }
        let in_range = self.consume_in_range(s, delta, source);
        let rest = delta - in_range;
        let edge = if near_zero(rest) {
            0.0
        } else {
            self.handle_edge_effect(s, rest, source)
        };
        ltrace!(
            delta,
            ?source,
            in_range,
            edge,
            offset = self.offset.current_offset,
            phase = ?self.phase,
            "on_scroll_callback"
        );
        in_range + edge
    }

    fn apply(&mut self, s: &mut dyn Scrollable, delta: f32, source: ScrollSource) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        let moved = s.update_current_offset(delta, source);
        self.sync_from(s);
        if moved {
            self.publish();
        }
        moved
    }

    fn publish(&self) {
        if let Some(proxy) = &self.proxy {
            proxy.notify_scroll_bar_callback(
                self.offset.current_offset,
                self.offset.scrollable_distance,
            );
        }
    }

    fn set_phase(&mut self, phase: ScrollPhase) {
        if self.phase != phase {
            ldebug!(from = ?self.phase, to = ?phase, "scroll phase");
            self.phase = phase;
        }
    }

    fn set_idle(&mut self) {
        self.fling = None;
        self.spring = None;
        self.tween = None;
        self.last_frame_ms = None;
        self.boundary_hit = false;
        self.set_phase(ScrollPhase::Idle);
        if let Some(proxy) = &self.proxy {
            proxy.stop_scroll_bar_animator();
        }
    }

    /// Starts a drag gesture, interrupting any running animation.
    pub fn on_drag_start(&mut self, s: &dyn Scrollable) {
        self.abort_scroll_animator();
        self.sync_from(s);
        self.fade_extent = 0.0;
        self.set_phase(ScrollPhase::Dragging);
        if let Some(proxy) = &self.proxy {
            proxy.start_scroll_bar_animator();
        }
    }

    pub fn on_drag_update(&mut self, s: &mut dyn Scrollable, delta: f32) -> f32 {
        if self.phase != ScrollPhase::Dragging {
            self.on_drag_start(s);
        }
        self.on_scroll_callback(s, delta, ScrollSource::Drag)
    }

    /// Ends a drag with `velocity` (offset units per second, positive towards the end).
    ///
    /// An overscrolled offset springs back (or snaps without a spring edge); otherwise a
    /// fast enough release flings.
    pub fn on_drag_end(&mut self, s: &mut dyn Scrollable, velocity: f32) {
        self.fade_extent = 0.0;
        self.sync_from(s);
        if self.offset.is_out_of_boundary() {
            self.start_spring_back(s, velocity);
            return;
        }
        match FlingDecay::new(velocity, self.friction()) {
            Some(fling) if self.options.scroll_enabled => {
                ldebug!(velocity, friction = self.friction(), "fling start");
                self.fling = Some(fling);
                self.boundary_hit = false;
                self.last_frame_ms = None;
                self.set_phase(ScrollPhase::Flinging);
            }
            _ => self.set_idle(),
        }
    }

    /// Pulls an overscrolled offset back to the nearest boundary.
    pub fn start_spring_back(&mut self, s: &mut dyn Scrollable, velocity: f32) {
        self.sync_from(s);
        let target = self.offset.nearest_boundary();
        let motion = match self.options.edge_effect {
            EdgeEffect::Spring { motion, .. } => motion,
            _ => {
                // Nothing may animate past the edge: snap.
                let delta = target - self.offset.current_offset;
                self.apply(s, delta, ScrollSource::Animation);
                self.set_idle();
                return;
            }
        };
        let displacement = self.offset.current_offset - target;
        let sim = SpringSimulation::new(motion, displacement, velocity);
        ldebug!(displacement, velocity, target, "spring back start");
        self.fling = None;
        self.tween = None;
        self.spring = Some((sim, target));
        self.last_frame_ms = None;
        self.animator_aborted = false;
        self.set_phase(ScrollPhase::SpringBack);
        if sim.is_settled() {
            self.finish_spring(s, target);
        }
    }

    fn finish_spring(&mut self, s: &mut dyn Scrollable, target: f32) {
        let delta = target - self.offset.current_offset;
        self.apply(s, delta, ScrollSource::Animation);
        self.set_idle();
    }

    /// Animates the offset to `position` (clamped to the scroll range).
    ///
    /// A zero duration jumps like [`Self::scroll_to`].
    pub fn animate_to(
        &mut self,
        s: &mut dyn Scrollable,
        position: f32,
        duration_ms: u64,
        curve: Curve,
        now_ms: u64,
    ) {
        if duration_ms == 0 {
            self.scroll_to(s, position);
            return;
        }
        self.abort_scroll_animator();
        self.sync_from(s);
        let target = position.clamp(0.0, self.offset.scrollable_distance);
        ldebug!(target, duration_ms, ?curve, "animate_to");
        self.tween = Some(ScrollTween::new(
            self.offset.current_offset,
            target,
            now_ms,
            duration_ms,
            curve,
        ));
        self.last_frame_ms = Some(now_ms);
        self.animator_aborted = false;
        self.set_phase(ScrollPhase::Animating);
        if let Some(proxy) = &self.proxy {
            proxy.start_scroll_bar_animator();
        }
    }

    /// Jumps to `position` (clamped to the scroll range). Returns whether anything moved.
    pub fn scroll_to(&mut self, s: &mut dyn Scrollable, position: f32) -> bool {
        self.abort_scroll_animator();
        self.sync_from(s);
        let target = position.clamp(0.0, self.offset.scrollable_distance);
        let moved = self.apply(s, target - self.offset.current_offset, ScrollSource::Animation);
        self.set_idle();
        moved
    }

    /// Adopts an offset published by a scroll bar or a peer. Never overscrolls.
    pub fn scroll_from_bar(&mut self, s: &mut dyn Scrollable, position: f32) -> bool {
        self.sync_from(s);
        let delta = position - self.offset.current_offset;
        if near_zero(delta) {
            return false;
        }
        !near_zero(self.on_scroll_callback(s, delta, ScrollSource::Bar))
    }

    /// Stops any running fling, spring or animation. Idempotent.
    pub fn abort_scroll_animator(&mut self) {
        self.animator_aborted = true;
        if matches!(
            self.phase,
            ScrollPhase::Flinging | ScrollPhase::SpringBack | ScrollPhase::Animating
        ) {
            ldebug!(phase = ?self.phase, "abort_scroll_animator");
            self.set_idle();
        }
    }

    /// Forces the idle state immediately and discards any remaining velocity. Idempotent.
    pub fn stop_scrollable(&mut self) {
        self.fade_extent = 0.0;
        self.set_idle();
    }

    fn frame_dt_secs(&mut self, now_ms: u64) -> f32 {
        let dt_ms = match self.last_frame_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => FIRST_FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);
        dt_ms as f32 / 1000.0
    }

    /// Advances the fling by one frame and returns the delta it wants to apply.
    ///
    /// Returns `None` when no fling is running.
    pub fn advance_fling(&mut self, now_ms: u64) -> Option<f32> {
        if self.phase != ScrollPhase::Flinging {
            return None;
        }
        let dt = self.frame_dt_secs(now_ms);
        let fling = self.fling.as_mut()?;
        Some(fling.step(dt))
    }

    /// Settles the fling state after its frame delta was routed.
    ///
    /// Keeps flinging while a parent took part of the delta. A fling that hit a boundary
    /// turns into a spring back carrying its velocity on a spring edge, and stops
    /// otherwise.
    pub fn finish_fling_frame(&mut self, s: &mut dyn Scrollable, result: ScrollResult) {
        let velocity = self.fling.map_or(0.0, |f| f.velocity());
        let finished = self.fling.is_none_or(|f| f.is_finished());
        let boundary_hit = std::mem::take(&mut self.boundary_hit);
        self.sync_from(s);

        if !near_zero(result.forwarded) && !finished {
            return;
        }
        if boundary_hit {
            if self.options.edge_effect.is_spring() {
                self.start_spring_back(s, velocity);
            } else {
                self.set_idle();
            }
        } else if finished {
            if self.offset.is_out_of_boundary() {
                self.start_spring_back(s, 0.0);
            } else {
                self.set_idle();
            }
        }
    }

    /// Advances a spring back by one frame.
    pub fn step_spring(&mut self, s: &mut dyn Scrollable, now_ms: u64) {
        if self.phase != ScrollPhase::SpringBack {
            return;
        }
        let dt = self.frame_dt_secs(now_ms);
        let Some((sim, target)) = self.spring.as_mut() else {
            self.set_idle();
            return;
        };
        let displacement = sim.step(dt);
        let settled = sim.is_settled();
        let target = *target;

        self.sync_from(s);
        if settled {
            ldebug!(target, "spring back settled");
            self.finish_spring(s, target);
            return;
        }
        let delta = target + displacement - self.offset.current_offset;
        self.apply(s, delta, ScrollSource::Animation);
    }

    /// Advances an `animate_to` by one frame.
    pub fn step_animation(&mut self, s: &mut dyn Scrollable, now_ms: u64) {
        if self.phase != ScrollPhase::Animating {
            return;
        }
        let Some(tween) = self.tween else {
            self.set_idle();
            return;
        };
        self.last_frame_ms = Some(now_ms);
        self.sync_from(s);
        let delta = tween.sample(now_ms) - self.offset.current_offset;
        self.apply(s, delta, ScrollSource::Animation);
        if tween.is_done(now_ms) {
            self.set_idle();
        }
    }

    /// One frame for a scrollable without a nested parent. Returns whether another frame is
    /// needed.
    pub fn tick(&mut self, s: &mut dyn Scrollable, now_ms: u64) -> bool {
        match self.phase {
            ScrollPhase::Flinging => {
                if let Some(delta) = self.advance_fling(now_ms) {
                    let consumed = self.on_scroll_callback(s, delta, ScrollSource::Fling);
                    ltrace!(delta, consumed, "fling frame");
                    self.finish_fling_frame(
                        s,
                        ScrollResult {
                            consumed: delta,
                            forwarded: 0.0,
                        },
                    );
                }
            }
            ScrollPhase::SpringBack => self.step_spring(s, now_ms),
            ScrollPhase::Animating => self.step_animation(s, now_ms),
            ScrollPhase::Idle | ScrollPhase::Dragging => {}
        }
        self.needs_frame()
    }
}
