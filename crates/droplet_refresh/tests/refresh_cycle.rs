//! End-to-end refresh cycles against the headless scroll host

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use droplet_animation::{drive, Timing};
use droplet_core::{EdgeInsets, Point, Rect};
use droplet_refresh::{
    ActivityIndicator, DefaultSpinner, FastScrollPolicy, HeadlessScrollView, RecordingLayer,
    RefreshControl, RefreshControlBuilder, RefreshMetrics, RefreshPhase, ScrollHost, ShapeLayers,
    SpinnerAppearance,
};

struct Harness {
    host: Rc<HeadlessScrollView>,
    control: RefreshControl<HeadlessScrollView>,
    fired: Rc<Cell<usize>>,
    body: Rc<RefCell<RecordingLayer>>,
    arrow: Rc<RefCell<RecordingLayer>>,
    spinner: Rc<RefCell<DefaultSpinner>>,
}

impl Harness {
    fn new() -> Self {
        Self::with(EdgeInsets::ZERO, None, FastScrollPolicy::Disabled)
    }

    fn with(inset: EdgeInsets, headers: Option<Vec<f32>>, policy: FastScrollPolicy) -> Self {
        let host = HeadlessScrollView::shared(Rect::new(0.0, 0.0, 320.0, 480.0));
        host.set_content_inset(inset);
        host.set_section_headers(headers);

        let fired = Rc::new(Cell::new(0));
        let body = RecordingLayer::shared();
        let arrow = RecordingLayer::shared();
        let spinner = DefaultSpinner::shared();

        let fired_clone = fired.clone();
        let control = RefreshControlBuilder::new()
            .layers(ShapeLayers::new(body.clone(), arrow.clone(), RecordingLayer::new()))
            .spinner(spinner.clone())
            .fast_scroll(policy)
            .action(move || fired_clone.set(fired_clone.get() + 1))
            .attach(&host);

        Self {
            host,
            control,
            fired,
            body,
            arrow,
            spinner,
        }
    }

    /// Drag past the threshold and lift the finger
    fn pull_to_refresh(&self) {
        self.host.drag_to(-40.0);
        self.host.drag_to(-100.0);
        self.host.release();
    }

    fn finish_collapse(&self) {
        drive(&self.control.scheduler(), 400.0);
    }
}

#[test]
fn test_pull_past_threshold_triggers_once() {
    let h = Harness::new();

    h.host.drag_to(-40.0);
    assert_eq!(h.control.phase(), RefreshPhase::Pulling);
    assert_eq!(h.fired.get(), 0);

    h.host.drag_to(-100.0);
    h.host.drag_to(-105.0);
    h.host.drag_to(-110.0);

    assert_eq!(h.fired.get(), 1);
    assert!(h.control.is_refreshing());
    assert!(!h.control.can_refresh());
    assert!(!h.control.was_manually_started());
    assert_eq!(h.control.phase(), RefreshPhase::Refreshing);
}

#[test]
fn test_sixty_point_pull_does_not_trigger() {
    let h = Harness::new();
    h.host.drag_to(-60.0);

    assert_eq!(h.fired.get(), 0);
    assert!(!h.control.is_refreshing());
    assert!(h.control.can_refresh());
    assert!(h.body.borrow().path().is_some());
}

#[test]
fn test_trigger_collapses_drop_and_reveals_spinner() {
    let h = Harness::new();
    h.pull_to_refresh();

    assert_eq!(h.body.borrow().animations().count(), 3);
    h.body.borrow_mut().advance(200.0);
    h.arrow.borrow_mut().advance(100.0);
    assert_eq!(h.body.borrow().presented_opacity(), 0.0);
    assert_eq!(h.arrow.borrow().presented_opacity(), 0.0);

    let spinner = h.spinner.borrow();
    assert_eq!(spinner.appearance(), SpinnerAppearance::VISIBLE);
    let reveal = spinner.last_timing().unwrap();
    assert_eq!(reveal.delay_ms, 150.0);
    assert_eq!(reveal.duration_ms, 200.0);
}

#[test]
fn test_pinned_refresh_opens_inset_without_headers() {
    let h = Harness::new();
    h.pull_to_refresh();

    h.host.scroll_to(-10.0);

    assert_eq!(h.host.content_inset().top, 44.0);
    assert_eq!(h.control.original_inset().top, 0.0);
    assert_eq!(h.fired.get(), 1);
    assert_eq!(h.body.borrow().position(), Point::new(0.0, 87.0));
    assert_eq!(h.spinner.borrow().center(), Point::new(160.0, 378.0));
}

#[test]
fn test_pinned_refresh_caps_inset_with_section_headers() {
    let h = Harness::with(EdgeInsets::ZERO, Some(vec![0.0, 22.0]), FastScrollPolicy::Disabled);
    h.pull_to_refresh();

    h.host.scroll_to(-20.0);
    assert_eq!(h.host.content_inset().top, 20.0);

    // scrolled down past the top, headers get the original inset back
    h.host.scroll_to(15.0);
    assert_eq!(h.host.content_inset().top, 0.0);
}

#[test]
fn test_zero_height_headers_count_as_none() {
    let h = Harness::with(EdgeInsets::ZERO, Some(vec![0.0, 0.0]), FastScrollPolicy::Disabled);
    h.pull_to_refresh();

    h.host.scroll_to(-20.0);
    assert_eq!(h.host.content_inset().top, 44.0);
}

#[test]
fn test_begin_twice_acts_once() {
    let h = Harness::new();
    h.control.begin_refreshing();
    h.control.begin_refreshing();

    assert_eq!(h.fired.get(), 1);
    assert!(h.control.was_manually_started());
    assert!(!h.control.can_refresh());
    assert_eq!(h.host.inset_history().len(), 2);
    assert_eq!(h.host.content_inset().top, 44.0);
    assert_eq!(h.host.content_offset().y, -53.0);
}

#[test]
fn test_begin_hides_layers_and_shows_spinner() {
    let h = Harness::new();
    h.control.begin_refreshing();

    h.body.borrow_mut().advance(1.0);
    assert_eq!(h.body.borrow().presented_opacity(), 0.0);
    assert_eq!(h.spinner.borrow().appearance(), SpinnerAppearance::VISIBLE);
    assert_eq!(h.spinner.borrow().center(), Point::new(160.0, 378.0));
}

#[test]
fn test_end_while_idle_is_a_no_op() {
    let h = Harness::new();
    let writes = h.host.inset_history().len();

    h.control.end_refreshing();

    assert_eq!(h.control.phase(), RefreshPhase::Idle);
    assert!(h.control.scheduler().borrow().is_empty());
    assert_eq!(h.host.inset_history().len(), writes);
}

#[test]
fn test_begin_end_restores_original_inset() {
    let h = Harness::with(
        EdgeInsets::new(20.0, 0.0, 0.0, 0.0),
        None,
        FastScrollPolicy::Disabled,
    );

    h.control.begin_refreshing();
    assert_eq!(h.host.content_inset().top, 64.0);

    h.control.end_refreshing();
    assert!(!h.control.is_refreshing());
    assert_eq!(h.control.phase(), RefreshPhase::Completing);
    assert_eq!(h.host.content_inset().top, 20.0);
    assert_eq!(h.spinner.borrow().appearance(), SpinnerAppearance::COLLAPSED);
    assert_eq!(h.spinner.borrow().last_timing(), Some(Timing::new(400.0)));

    h.finish_collapse();
    assert_eq!(h.control.phase(), RefreshPhase::Idle);
    assert_eq!(h.host.content_inset().top, 20.0);
    assert!(!h.control.was_manually_started());
    assert!(!h.body.borrow().has_animations());
    assert!(h.body.borrow().path().is_none());
    assert_eq!(h.body.borrow().position(), Point::ZERO);
}

#[test]
fn test_external_inset_change_becomes_new_original() {
    let h = Harness::new();
    h.control.begin_refreshing();

    h.host.set_content_inset(EdgeInsets::new(30.0, 0.0, 0.0, 0.0));
    assert_eq!(h.control.original_inset().top, 30.0);
    assert_eq!(h.control.frame().y(), -430.0);

    h.control.end_refreshing();
    h.finish_collapse();
    assert_eq!(h.host.content_inset().top, 30.0);
}

#[test]
fn test_rearms_only_after_returning_to_rest() {
    let h = Harness::new();
    h.pull_to_refresh();
    h.control.end_refreshing();
    h.finish_collapse();
    assert!(!h.control.can_refresh());

    h.host.drag_to(-100.0);
    assert_eq!(h.fired.get(), 1);
    assert!(h.body.borrow().path().is_none());

    h.host.drag_to(0.0);
    assert!(h.control.can_refresh());

    h.host.drag_to(-100.0);
    assert_eq!(h.fired.get(), 2);
}

#[test]
fn test_new_trigger_during_collapse_survives_stale_completion() {
    let h = Harness::new();
    h.control.begin_refreshing();
    h.control.end_refreshing();
    h.control.begin_refreshing();
    assert_eq!(h.fired.get(), 2);

    h.finish_collapse();
    assert!(h.control.is_refreshing());
    assert_eq!(h.host.content_inset().top, 44.0);

    h.control.end_refreshing();
    h.finish_collapse();
    assert_eq!(h.control.phase(), RefreshPhase::Idle);
}

#[test]
fn test_detach_is_idempotent() {
    let h = Harness::new();
    assert_eq!(h.host.subscriber_count(), 2);

    h.control.detach();
    h.control.detach();
    assert!(!h.control.is_attached());
    assert_eq!(h.host.subscriber_count(), 0);

    h.host.drag_to(-100.0);
    assert_eq!(h.fired.get(), 0);

    h.control.begin_refreshing();
    assert!(!h.control.is_refreshing());
}

#[test]
fn test_ending_after_detach_restores_inset() {
    let h = Harness::new();
    h.control.begin_refreshing();
    assert_eq!(h.host.content_inset().top, 44.0);

    h.control.detach();
    h.control.end_refreshing();
    assert_eq!(h.host.content_inset(), EdgeInsets::ZERO);

    h.finish_collapse();
    assert_eq!(h.control.phase(), RefreshPhase::Idle);
    assert_eq!(h.host.content_inset(), EdgeInsets::ZERO);
    assert_eq!(h.host.subscriber_count(), 0);
}

#[test]
fn test_dropping_control_mid_collapse_keeps_external_inset() {
    let Harness { host, control, .. } = Harness::new();
    control.begin_refreshing();
    control.end_refreshing();
    let scheduler = control.scheduler();

    drop(control);
    host.drag_to(-100.0);
    assert_eq!(host.content_inset(), EdgeInsets::ZERO);

    host.set_content_inset(EdgeInsets::new(30.0, 0.0, 0.0, 0.0));
    assert_eq!(drive(&scheduler, 400.0), 1);
    assert_eq!(host.content_inset().top, 30.0);
    assert_eq!(host.subscriber_count(), 0);
}

#[test]
fn test_dropping_idle_control_unsubscribes() {
    let Harness { host, control, .. } = Harness::new();
    drop(control);
    assert_eq!(host.subscriber_count(), 0);
}

#[test]
fn test_host_kept_alive_until_collapse_finishes() {
    let Harness { host, control, .. } = Harness::new();
    control.begin_refreshing();
    control.end_refreshing();

    let weak_host = Rc::downgrade(&host);
    drop(host);
    assert!(weak_host.upgrade().is_some());

    drive(&control.scheduler(), 400.0);
    assert_eq!(control.phase(), RefreshPhase::Idle);
    assert!(weak_host.upgrade().is_none());
}

#[test]
fn test_disabled_control_ignores_pulls_but_not_calls() {
    let h = Harness::new();
    h.control.set_enabled(false);

    h.host.drag_to(-100.0);
    assert_eq!(h.fired.get(), 0);
    assert!(h.body.borrow().path().is_none());

    h.host.release();
    h.control.begin_refreshing();
    assert!(h.control.is_refreshing());
    h.control.end_refreshing();
    h.finish_collapse();
    assert_eq!(h.control.phase(), RefreshPhase::Idle);
}

#[test]
fn test_fast_scroll_policy_disarms_on_fling() {
    let guarded = Harness::with(EdgeInsets::ZERO, None, FastScrollPolicy::Suppress);
    guarded.host.scroll_to(40.0);
    guarded.host.scroll_to(20.0);
    assert!(!guarded.control.can_refresh());
    guarded.host.drag_to(-100.0);
    assert_eq!(guarded.fired.get(), 0);

    let unguarded = Harness::new();
    unguarded.host.scroll_to(40.0);
    unguarded.host.scroll_to(20.0);
    assert!(unguarded.control.can_refresh());
    unguarded.host.drag_to(-100.0);
    assert_eq!(unguarded.fired.get(), 1);
}

#[test]
fn test_completion_handle_from_worker_thread() {
    let h = Harness::new();
    h.pull_to_refresh();

    let handle = h.control.completion_handle();
    std::thread::spawn(move || handle.end_refreshing())
        .join()
        .unwrap();

    assert!(h.control.is_refreshing());
    assert_eq!(h.control.pump(), 1);
    assert_eq!(h.control.phase(), RefreshPhase::Completing);
    assert_eq!(h.control.pump(), 0);

    h.finish_collapse();
    assert_eq!(h.control.phase(), RefreshPhase::Idle);
}

#[test]
fn test_custom_metrics_open_wider() {
    let host = HeadlessScrollView::shared(Rect::new(0.0, 0.0, 320.0, 480.0));
    let control = RefreshControlBuilder::new()
        .metrics(RefreshMetrics {
            opened_height: 60.0,
            ..Default::default()
        })
        .attach(&host);

    control.begin_refreshing();
    assert_eq!(host.content_inset().top, 60.0);
}

#[test]
fn test_lifecycle_history_records_cycle() {
    let h = Harness::new();
    h.pull_to_refresh();
    h.control.end_refreshing();
    h.finish_collapse();

    let phases: Vec<_> = h.control.transitions().iter().map(|(_, _, to)| *to).collect();
    assert_eq!(
        phases,
        vec![
            RefreshPhase::Pulling,
            RefreshPhase::Triggered,
            RefreshPhase::Refreshing,
            RefreshPhase::Completing,
            RefreshPhase::Idle,
        ]
    );
}
