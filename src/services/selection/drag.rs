//! Drag and long-press range selection.
//!
//! One controller drives one gesture at a time over an abstract item kind.
//! Mouse and pen start dragging on pointer-down. Touch waits for a
//! long-press: holding still for `long_press` starts the drag, while moving
//! further than `move_tolerance_px` first is treated as a scroll and abandons
//! the gesture.
//!
//! Time is passed in by the caller. Every handler fires an expired
//! long-press timer before doing anything else, so `poll` only needs to run
//! when no other pointer event arrives.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::models::settings::EditorSettings;

/// The item kind a controller selects over.
pub trait SelectionSource {
    type Item: Clone;

    /// Stable key of an item within the current view.
    fn identify(&self, item: &Self::Item) -> String;

    /// Items covered by a drag from `anchor` to `current`, both included.
    fn range_between(&self, anchor: &Self::Item, current: &Self::Item) -> Vec<Self::Item>;

    /// Whether the item is currently on (selected date, enabled slot).
    fn is_selected(&self, item: &Self::Item) -> bool;
}

/// Hooks into the host platform. Every method defaults to doing nothing.
pub trait PlatformEffects {
    fn haptic_pulse(&mut self, _duration: Duration) {}

    /// Suppress or restore native scrolling of the page.
    fn set_scroll_locked(&mut self, _locked: bool) {}

    /// Attach or detach the page-level release listener that ends a gesture
    /// released outside the originating element.
    fn set_release_listener(&mut self, _attached: bool) {}
}

/// Effects for hosts without haptics or scroll control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEffects;

impl PlatformEffects for NoEffects {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: PointerPosition) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    pub long_press: Duration,
    pub move_tolerance_px: f32,
    pub haptic_pulse: Duration,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            long_press: Duration::from_millis(500),
            move_tolerance_px: 10.0,
            haptic_pulse: Duration::from_millis(50),
        }
    }
}

impl From<&EditorSettings> for DragConfig {
    fn from(settings: &EditorSettings) -> Self {
        Self {
            long_press: Duration::from_millis(settings.long_press_ms),
            move_tolerance_px: settings.move_tolerance_px,
            haptic_pulse: Duration::from_millis(settings.haptic_pulse_ms),
        }
    }
}

/// Observable phase of the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhaseKind {
    Idle,
    LongPressPending,
    Dragging,
}

#[derive(Debug, Clone)]
struct ActiveDrag<I> {
    anchor: I,
    anchor_key: String,
    anchor_was_selected: bool,
    selection: Vec<I>,
    selected_keys: BTreeSet<String>,
    has_moved: bool,
    long_press: bool,
}

#[derive(Debug, Clone)]
enum DragPhase<I> {
    Idle,
    LongPressPending {
        item: I,
        origin: PointerPosition,
        since: Instant,
    },
    Dragging(ActiveDrag<I>),
}

/// Result of a completed drag, produced at most once per gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCommit<I> {
    pub anchor: I,
    /// Items under the final range, in range order
    pub selection: Vec<I>,
    /// Anchor state captured when dragging began
    pub anchor_was_selected: bool,
}

impl<I: Clone> DragCommit<I> {
    /// Items that should flip: those whose current state still matches the
    /// anchor's state from before the drag. Items already flipped earlier in
    /// the same gesture are left alone.
    pub fn items_to_toggle<S>(&self, source: &S) -> Vec<I>
    where
        S: SelectionSource<Item = I>,
    {
        self.selection
            .iter()
            .filter(|item| source.is_selected(item) == self.anchor_was_selected)
            .cloned()
            .collect()
    }
}

/// Gesture state machine over items of type `I`. The item view is passed to
/// each handler, so the controller never borrows it between events.
pub struct DragSelectionController<I: Clone, E: PlatformEffects = NoEffects> {
    phase: DragPhase<I>,
    config: DragConfig,
    effects: E,
    scroll_locked: bool,
    listener_attached: bool,
}

impl<I: Clone> DragSelectionController<I, NoEffects> {
    pub fn without_effects(config: DragConfig) -> Self {
        Self::new(config, NoEffects)
    }
}

impl<I: Clone, E: PlatformEffects> DragSelectionController<I, E> {
    pub fn new(config: DragConfig, effects: E) -> Self {
        Self {
            phase: DragPhase::Idle,
            config,
            effects,
            scroll_locked: false,
            listener_attached: false,
        }
    }

    pub fn phase(&self) -> DragPhaseKind {
        match self.phase {
            DragPhase::Idle => DragPhaseKind::Idle,
            DragPhase::LongPressPending { .. } => DragPhaseKind::LongPressPending,
            DragPhase::Dragging(_) => DragPhaseKind::Dragging,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Keys of the items in the live selection; empty unless dragging.
    pub fn selected_keys(&self) -> Option<&BTreeSet<String>> {
        match self.phase {
            DragPhase::Dragging(ref drag) => Some(&drag.selected_keys),
            _ => None,
        }
    }

    /// Whether `item` is highlighted by the gesture in progress.
    pub fn highlights<S: SelectionSource<Item = I>>(&self, source: &S, item: &I) -> bool {
        self.selected_keys()
            .is_some_and(|keys| keys.contains(&source.identify(item)))
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn pointer_down<S: SelectionSource<Item = I>>(
        &mut self,
        source: &S,
        item: I,
        kind: PointerKind,
        position: PointerPosition,
        now: Instant,
    ) {
        if !matches!(self.phase, DragPhase::Idle) {
            log::debug!("Pointer down during an active gesture; restarting");
            self.cancel();
        }

        self.attach_listener();
        match kind {
            PointerKind::Mouse | PointerKind::Pen => self.start_drag(source, item, false),
            PointerKind::Touch => {
                self.phase = DragPhase::LongPressPending {
                    item,
                    origin: position,
                    since: now,
                };
            }
        }
    }

    /// Fire the long-press timer if it has expired. Returns true when this
    /// call started a drag.
    pub fn poll<S: SelectionSource<Item = I>>(&mut self, source: &S, now: Instant) -> bool {
        let expired = match self.phase {
            DragPhase::LongPressPending { since, .. } => {
                now.saturating_duration_since(since) >= self.config.long_press
            }
            _ => false,
        };
        if !expired {
            return false;
        }

        let DragPhase::LongPressPending { item, .. } =
            std::mem::replace(&mut self.phase, DragPhase::Idle)
        else {
            return false;
        };

        self.effects.haptic_pulse(self.config.haptic_pulse);
        self.lock_scroll();
        self.start_drag(source, item, true);
        true
    }

    /// Pointer moved. `item` is the item now under the pointer, if any.
    pub fn pointer_move<S: SelectionSource<Item = I>>(
        &mut self,
        source: &S,
        item: Option<I>,
        position: PointerPosition,
        now: Instant,
    ) {
        self.poll(source, now);

        match self.phase {
            DragPhase::Idle => {}
            DragPhase::LongPressPending { origin, .. } => {
                if origin.distance_to(position) > self.config.move_tolerance_px {
                    log::debug!("Touch moved before long-press; treating as scroll");
                    self.cancel();
                }
            }
            DragPhase::Dragging(ref mut drag) => {
                let Some(current) = item else {
                    return;
                };
                let selection = source.range_between(&drag.anchor, &current);
                drag.selected_keys = selection.iter().map(|item| source.identify(item)).collect();
                drag.selection = selection;
                if source.identify(&current) != drag.anchor_key {
                    drag.has_moved = true;
                }
            }
        }
    }

    /// Pointer released anywhere. Returns the commit for a real drag; a plain
    /// click or tap returns `None` so the element's own click handling runs.
    pub fn pointer_up<S: SelectionSource<Item = I>>(
        &mut self,
        source: &S,
        now: Instant,
    ) -> Option<DragCommit<I>> {
        self.poll(source, now);

        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        self.release();

        match phase {
            DragPhase::Dragging(drag) if drag.has_moved || drag.long_press => {
                log::debug!(
                    "Drag committed with {} item(s) from {}",
                    drag.selection.len(),
                    drag.anchor_key
                );
                Some(DragCommit {
                    anchor: drag.anchor,
                    selection: dedup_by_key(source, drag.selection),
                    anchor_was_selected: drag.anchor_was_selected,
                })
            }
            _ => None,
        }
    }

    /// Abandon the gesture without committing.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
        self.release();
    }

    /// Release every platform hook the controller may hold.
    pub fn teardown(&mut self) {
        self.cancel();
    }

    fn start_drag<S: SelectionSource<Item = I>>(&mut self, source: &S, anchor: I, long_press: bool) {
        let anchor_key = source.identify(&anchor);
        log::debug!("Drag started at {} (long press: {})", anchor_key, long_press);
        self.phase = DragPhase::Dragging(ActiveDrag {
            anchor_was_selected: source.is_selected(&anchor),
            selection: vec![anchor.clone()],
            selected_keys: BTreeSet::from([anchor_key.clone()]),
            anchor,
            anchor_key,
            has_moved: false,
            long_press,
        });
    }

    fn attach_listener(&mut self) {
        if !self.listener_attached {
            self.effects.set_release_listener(true);
            self.listener_attached = true;
        }
    }

    fn lock_scroll(&mut self) {
        if !self.scroll_locked {
            self.effects.set_scroll_locked(true);
            self.scroll_locked = true;
        }
    }

    fn release(&mut self) {
        if self.scroll_locked {
            self.effects.set_scroll_locked(false);
            self.scroll_locked = false;
        }
        if self.listener_attached {
            self.effects.set_release_listener(false);
            self.listener_attached = false;
        }
    }
}

impl<I: Clone, E: PlatformEffects> Drop for DragSelectionController<I, E> {
    fn drop(&mut self) {
        self.release();
    }
}

fn dedup_by_key<S: SelectionSource>(source: &S, items: Vec<S::Item>) -> Vec<S::Item> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(source.identify(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Cells on a number line; selected cells are listed in `on`.
    struct Line {
        on: Vec<i32>,
    }

    impl SelectionSource for Line {
        type Item = i32;

        fn identify(&self, item: &i32) -> String {
            item.to_string()
        }

        fn range_between(&self, anchor: &i32, current: &i32) -> Vec<i32> {
            (*anchor.min(current)..=*anchor.max(current)).collect()
        }

        fn is_selected(&self, item: &i32) -> bool {
            self.on.contains(item)
        }
    }

    #[derive(Debug, Default)]
    struct Recorded {
        pulses: Vec<Duration>,
        scroll: Vec<bool>,
        listener: Vec<bool>,
    }

    #[derive(Clone, Default)]
    struct RecordingEffects(Rc<RefCell<Recorded>>);

    impl PlatformEffects for RecordingEffects {
        fn haptic_pulse(&mut self, duration: Duration) {
            self.0.borrow_mut().pulses.push(duration);
        }

        fn set_scroll_locked(&mut self, locked: bool) {
            self.0.borrow_mut().scroll.push(locked);
        }

        fn set_release_listener(&mut self, attached: bool) {
            self.0.borrow_mut().listener.push(attached);
        }
    }

    fn at(x: f32, y: f32) -> PointerPosition {
        PointerPosition::new(x, y)
    }

    fn controller() -> DragSelectionController<i32> {
        DragSelectionController::without_effects(DragConfig::default())
    }

    #[test]
    fn test_click_without_movement_does_not_commit() {
        let line = Line { on: vec![] };
        let mut drag = controller();
        let t0 = Instant::now();

        drag.pointer_down(&line, 3, PointerKind::Mouse, at(0.0, 0.0), t0);
        drag.pointer_move(&line, Some(3), at(2.0, 0.0), t0);

        assert!(drag.pointer_up(&line, t0).is_none());
        assert_eq!(drag.phase(), DragPhaseKind::Idle);
    }

    #[test]
    fn test_mouse_drag_commits_range() {
        let line = Line { on: vec![] };
        let mut drag = controller();
        let t0 = Instant::now();

        drag.pointer_down(&line, 3, PointerKind::Mouse, at(0.0, 0.0), t0);
        assert!(drag.is_dragging());
        drag.pointer_move(&line, Some(6), at(90.0, 0.0), t0);
        drag.pointer_move(&line, Some(5), at(60.0, 0.0), t0);

        let commit = drag.pointer_up(&line, t0).unwrap();
        assert_eq!(commit.anchor, 3);
        assert_eq!(commit.selection, vec![3, 4, 5]);
        assert!(!commit.anchor_was_selected);
        assert!(drag.pointer_up(&line, t0).is_none());
    }

    #[test]
    fn test_live_selection_is_highlighted() {
        let line = Line { on: vec![] };
        let mut drag = controller();
        let t0 = Instant::now();

        drag.pointer_down(&line, 1, PointerKind::Pen, at(0.0, 0.0), t0);
        drag.pointer_move(&line, Some(2), at(30.0, 0.0), t0);

        assert!(drag.highlights(&line, &2));
        assert!(!drag.highlights(&line, &3));
    }

    #[test]
    fn test_touch_long_press_starts_drag_and_commits_alone() {
        let line = Line { on: vec![4] };
        let effects = RecordingEffects::default();
        let log = effects.0.clone();
        let mut drag = DragSelectionController::new(DragConfig::default(), effects);
        let t0 = Instant::now();

        drag.pointer_down(&line, 4, PointerKind::Touch, at(10.0, 10.0), t0);
        assert_eq!(drag.phase(), DragPhaseKind::LongPressPending);
        assert!(!drag.poll(&line, t0 + Duration::from_millis(499)));
        assert!(drag.poll(&line, t0 + Duration::from_millis(500)));
        assert!(drag.is_dragging());

        // A long-press commits even without moving
        let commit = drag.pointer_up(&line, t0 + Duration::from_millis(700)).unwrap();
        assert_eq!(commit.selection, vec![4]);
        assert!(commit.anchor_was_selected);

        let log = log.borrow();
        assert_eq!(log.pulses, vec![Duration::from_millis(50)]);
        assert_eq!(log.scroll, vec![true, false]);
        assert_eq!(log.listener, vec![true, false]);
    }

    #[test]
    fn test_touch_movement_before_timer_is_a_scroll() {
        let line = Line { on: vec![] };
        let mut drag = controller();
        let t0 = Instant::now();

        drag.pointer_down(&line, 4, PointerKind::Touch, at(10.0, 10.0), t0);
        drag.pointer_move(&line, Some(4), at(10.0, 25.0), t0 + Duration::from_millis(100));
        assert_eq!(drag.phase(), DragPhaseKind::Idle);

        assert!(!drag.poll(&line, t0 + Duration::from_millis(600)));
        assert!(drag.pointer_up(&line, t0 + Duration::from_millis(650)).is_none());
    }

    #[test]
    fn test_small_touch_jitter_keeps_long_press_pending() {
        let line = Line { on: vec![] };
        let mut drag = controller();
        let t0 = Instant::now();

        drag.pointer_down(&line, 4, PointerKind::Touch, at(10.0, 10.0), t0);
        drag.pointer_move(&line, Some(4), at(16.0, 18.0), t0 + Duration::from_millis(100));
        assert_eq!(drag.phase(), DragPhaseKind::LongPressPending);
    }

    #[test]
    fn test_expired_timer_fires_on_next_event() {
        let line = Line { on: vec![] };
        let mut drag = controller();
        let t0 = Instant::now();

        drag.pointer_down(&line, 2, PointerKind::Touch, at(0.0, 0.0), t0);
        drag.pointer_move(&line, Some(5), at(0.0, 0.0), t0 + Duration::from_millis(800));

        assert!(drag.is_dragging());
        let commit = drag.pointer_up(&line, t0 + Duration::from_millis(900)).unwrap();
        assert_eq!(commit.selection, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_tap_does_not_commit() {
        let line = Line { on: vec![] };
        let mut drag = controller();
        let t0 = Instant::now();

        drag.pointer_down(&line, 2, PointerKind::Touch, at(0.0, 0.0), t0);
        assert!(drag.pointer_up(&line, t0 + Duration::from_millis(120)).is_none());
    }

    #[test]
    fn test_second_pointer_down_restarts_gesture() {
        let line = Line { on: vec![] };
        let mut drag = controller();
        let t0 = Instant::now();

        drag.pointer_down(&line, 1, PointerKind::Mouse, at(0.0, 0.0), t0);
        drag.pointer_move(&line, Some(4), at(90.0, 0.0), t0);
        drag.pointer_down(&line, 8, PointerKind::Mouse, at(200.0, 0.0), t0);
        drag.pointer_move(&line, Some(9), at(230.0, 0.0), t0);

        let commit = drag.pointer_up(&line, t0).unwrap();
        assert_eq!(commit.anchor, 8);
        assert_eq!(commit.selection, vec![8, 9]);
    }

    #[test]
    fn test_items_to_toggle_follow_anchor_state() {
        let line = Line { on: vec![2, 3] };
        let commit = DragCommit {
            anchor: 1,
            selection: vec![1, 2, 3, 4],
            anchor_was_selected: false,
        };
        assert_eq!(commit.items_to_toggle(&line), vec![1, 4]);
    }

    #[test]
    fn test_teardown_releases_hooks_once() {
        let line = Line { on: vec![] };
        let effects = RecordingEffects::default();
        let log = effects.0.clone();
        let t0 = Instant::now();
        {
            let mut drag = DragSelectionController::new(DragConfig::default(), effects);
            drag.pointer_down(&line, 2, PointerKind::Touch, at(0.0, 0.0), t0);
            assert!(drag.poll(&line, t0 + Duration::from_millis(500)));

            drag.teardown();
            assert_eq!(drag.phase(), DragPhaseKind::Idle);
            assert!(drag.pointer_up(&line, t0 + Duration::from_millis(600)).is_none());
        }

        let log = log.borrow();
        assert_eq!(log.scroll, vec![true, false]);
        assert_eq!(log.listener, vec![true, false]);
    }

    #[test]
    fn test_drop_releases_platform_hooks() {
        let line = Line { on: vec![] };
        let effects = RecordingEffects::default();
        let log = effects.0.clone();
        let t0 = Instant::now();
        {
            let mut drag = DragSelectionController::new(DragConfig::default(), effects);
            drag.pointer_down(&line, 1, PointerKind::Touch, at(0.0, 0.0), t0);
            drag.poll(&line, t0 + Duration::from_secs(1));
        }

        let log = log.borrow();
        assert_eq!(log.scroll.last(), Some(&false));
        assert_eq!(log.listener.last(), Some(&false));
    }
}
