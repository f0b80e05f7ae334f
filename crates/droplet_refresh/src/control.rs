//! The refresh control
//!
//! [`RefreshControl`] decorates a [`ScrollHost`]: it observes the host's
//! content offset and inset, redraws the drop while the user pulls, triggers
//! the refresh action past the threshold, and keeps the host's inset open
//! until the refresh is ended.
//!
//! Everything runs on the host's single UI context. Host notifications are
//! delivered synchronously, including for the control's own writes, so the
//! control swallows its own inset and offset changes with two guard flags.
//! No internal borrow is held while the host, a layer backend, the spinner or
//! the user action runs.
//!
//! Refresh work usually finishes elsewhere; a [`CompletionHandle`] can be
//! sent to any thread and its requests are applied on the next
//! [`RefreshControl::pump`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::mpsc;

use droplet_animation::{AnimationScheduler, SharedScheduler};
use droplet_core::{EdgeInsets, HostEvent, HostEventKind, Point, Rect, Size, SubscriptionId};
use droplet_paint::Color;

use crate::config::{RefreshConfig, TimingConfig};
use crate::geometry::{sample_drop, DropSample};
use crate::host::ScrollHost;
use crate::layers::{body_style, fade_to, morph_to, LayerProperty, ShapeLayers};
use crate::lifecycle::{RefreshEvent, RefreshPhase, RefreshState};
use crate::metrics::RefreshMetrics;
use crate::observer::{
    gate_offset, needs_header_probe, pinned_inset, pinned_layer_position, pinned_spinner_center,
    FastScrollPolicy, PinnedInput,
};
use crate::spinner::{ActivityIndicator, DefaultSpinner, SpinnerAppearance, SpinnerStyle};

/// Callback invoked when a refresh starts
pub type RefreshAction = Rc<dyn Fn()>;

/// Request posted through a [`CompletionHandle`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    Begin,
    End,
}

/// Thread-safe handle for starting or ending a refresh from another context
#[derive(Clone, Debug)]
pub struct CompletionHandle {
    sender: mpsc::Sender<ControlCommand>,
}

impl CompletionHandle {
    /// Ask the control to end the running refresh. Returns false if the
    /// control no longer exists.
    pub fn end_refreshing(&self) -> bool {
        self.sender.send(ControlCommand::End).is_ok()
    }

    /// Ask the control to start a refresh
    pub fn begin_refreshing(&self) -> bool {
        self.sender.send(ControlCommand::Begin).is_ok()
    }
}

/// Run `f` with `flag` raised, restoring its previous value afterwards
fn suppressed<R>(flag: &Cell<bool>, f: impl FnOnce() -> R) -> R {
    let previous = flag.replace(true);
    let result = f();
    flag.set(previous);
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for a [`RefreshControl`]
pub struct RefreshControlBuilder {
    config: RefreshConfig,
    layers: Option<ShapeLayers>,
    spinner: Option<Box<dyn ActivityIndicator>>,
    scheduler: Option<SharedScheduler>,
    action: Option<RefreshAction>,
}

impl Default for RefreshControlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshControlBuilder {
    pub fn new() -> Self {
        Self {
            config: RefreshConfig::default(),
            layers: None,
            spinner: None,
            scheduler: None,
            action: None,
        }
    }

    /// Metrics, timings, appearance and fast-scroll policy in one go
    pub fn config(mut self, config: RefreshConfig) -> Self {
        self.config = config;
        self
    }

    pub fn metrics(mut self, metrics: RefreshMetrics) -> Self {
        self.config.metrics = metrics;
        self
    }

    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.config.timing = timing;
        self
    }

    pub fn fast_scroll(mut self, policy: FastScrollPolicy) -> Self {
        self.config.fast_scroll = policy;
        self
    }

    pub fn tint_color(mut self, tint: Color) -> Self {
        self.config.appearance.tint = tint;
        self
    }

    /// Render backend for the drop; defaults to in-memory recording layers
    pub fn layers(mut self, layers: ShapeLayers) -> Self {
        self.layers = Some(layers);
        self
    }

    /// Activity indicator; a [`DefaultSpinner`] is used when none is given
    pub fn spinner(mut self, spinner: impl ActivityIndicator + 'static) -> Self {
        self.spinner = Some(Box::new(spinner));
        self
    }

    /// Scheduler running the end animation; share it with the rest of the UI
    pub fn scheduler(mut self, scheduler: SharedScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn action<F: Fn() + 'static>(mut self, action: F) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// Attach to `host` and start observing it
    pub fn attach<H: ScrollHost + 'static>(self, host: &Rc<H>) -> RefreshControl<H> {
        let config = self.config;
        let original_inset = host.content_inset();
        let state = RefreshState::new(original_inset, host.frame().width(), &config.metrics);
        let bounds = state.frame.size;

        let mut layers = self.layers.unwrap_or_default();
        layers.configure(config.appearance.tint);

        // a supplied spinner keeps its own style unless the config names one
        let styled = self.spinner.is_none() || config.appearance.spinner_style != SpinnerStyle::default();
        let mut spinner = self
            .spinner
            .unwrap_or_else(|| Box::new(DefaultSpinner::new()));
        if styled {
            spinner.set_style(config.appearance.spinner_style);
        }
        if config.appearance.spinner_color.is_some() {
            spinner.set_color(config.appearance.spinner_color);
        }
        spinner.set_center(Point::new(
            (bounds.width / 2.0).floor(),
            (bounds.height / 2.0).floor(),
        ));
        spinner.set_appearance(SpinnerAppearance::new(0.0, 1.0), None);
        spinner.start_animating();

        let (sender, receiver) = mpsc::channel();
        let inner = Rc::new(Inner {
            host: Rc::downgrade(host),
            offset_subscription: Cell::new(None),
            inset_subscription: Cell::new(None),
            released: Cell::new(false),
            ignore_inset: Cell::new(false),
            ignore_offset: Cell::new(false),
            enabled: Cell::new(true),
            fast_scroll: Cell::new(config.fast_scroll),
            tint: Cell::new(config.appearance.tint),
            metrics: config.metrics,
            timing: config.timing,
            state: RefCell::new(state),
            layers: RefCell::new(layers),
            spinner: RefCell::new(spinner),
            scheduler: self.scheduler.unwrap_or_else(AnimationScheduler::shared),
            action: RefCell::new(self.action),
            sender,
            receiver,
        });

        let weak = Rc::downgrade(&inner);
        let offset_id = host.subscribe(
            HostEventKind::ContentOffset,
            Rc::new(move |event: &HostEvent| {
                if let (Some(inner), HostEvent::ContentOffsetChanged(offset)) = (weak.upgrade(), event) {
                    inner.handle_offset(*offset);
                }
            }),
        );
        let weak = Rc::downgrade(&inner);
        let inset_id = host.subscribe(
            HostEventKind::ContentInset,
            Rc::new(move |event: &HostEvent| {
                if let (Some(inner), HostEvent::ContentInsetChanged(inset)) = (weak.upgrade(), event) {
                    inner.handle_inset(*inset);
                }
            }),
        );
        inner.offset_subscription.set(Some(offset_id));
        inner.inset_subscription.set(Some(inset_id));

        tracing::debug!(
            width = bounds.width,
            inset_top = original_inset.top,
            "refresh control attached"
        );
        RefreshControl { inner }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Control
// ─────────────────────────────────────────────────────────────────────────────

/// Pull-to-refresh control attached above a scroll host
///
/// The control does not own its host. Dropping the control detaches it; a
/// control dropped during its end animation keeps tracking the host inset
/// until the animation completes, so the restore uses the latest external
/// value.
pub struct RefreshControl<H: ScrollHost + 'static> {
    inner: Rc<Inner<H>>,
}

impl<H: ScrollHost + 'static> RefreshControl<H> {
    /// Attach with the default look, spinner and layers
    pub fn attach(host: &Rc<H>) -> Self {
        RefreshControlBuilder::new().attach(host)
    }

    /// Stop observing the host. Safe to call any number of times.
    ///
    /// A refresh that is already running can still be ended; the end restores
    /// the host inset as usual.
    pub fn detach(&self) {
        self.inner.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.inner.offset_subscription.get().is_some()
    }

    /// Start a refresh as if the user had pulled past the threshold
    pub fn begin_refreshing(&self) {
        self.inner.begin_refreshing();
    }

    /// Close the control after the refresh work has finished
    pub fn end_refreshing(&self) {
        self.inner.end_refreshing();
    }

    /// Apply requests posted through [`CompletionHandle`]s, returning how
    /// many were applied
    pub fn pump(&self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.inner.receiver.try_recv() {
            match command {
                ControlCommand::Begin => self.inner.begin_refreshing(),
                ControlCommand::End => self.inner.end_refreshing(),
            }
            applied += 1;
        }
        applied
    }

    pub fn completion_handle(&self) -> CompletionHandle {
        CompletionHandle {
            sender: self.inner.sender.clone(),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.state.borrow().refreshing()
    }

    pub fn was_manually_started(&self) -> bool {
        self.inner.state.borrow().was_manually_started
    }

    /// Whether a pull may trigger a new refresh
    pub fn can_refresh(&self) -> bool {
        self.inner.state.borrow().can_refresh
    }

    pub fn phase(&self) -> RefreshPhase {
        self.inner.state.borrow().phase()
    }

    /// Recent lifecycle transitions, oldest first
    pub fn transitions(&self) -> Vec<(RefreshPhase, RefreshEvent, RefreshPhase)> {
        self.inner.state.borrow().history().to_vec()
    }

    /// Host inset as last set by anyone but the control
    pub fn original_inset(&self) -> EdgeInsets {
        self.inner.state.borrow().original_inset
    }

    /// Frame of the control view in host content coordinates
    pub fn frame(&self) -> Rect {
        self.inner.state.borrow().frame
    }

    pub fn metrics(&self) -> &RefreshMetrics {
        &self.inner.metrics
    }

    pub fn scheduler(&self) -> SharedScheduler {
        self.inner.scheduler.clone()
    }

    pub fn set_action<F: Fn() + 'static>(&self, action: F) {
        *self.inner.action.borrow_mut() = Some(Rc::new(action));
    }

    pub fn clear_action(&self) {
        self.inner.action.borrow_mut().take();
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// A disabled control ignores offset changes; begin and end still work
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.set(enabled);
    }

    pub fn fast_scroll_policy(&self) -> FastScrollPolicy {
        self.inner.fast_scroll.get()
    }

    pub fn set_fast_scroll_policy(&self, policy: FastScrollPolicy) {
        self.inner.fast_scroll.set(policy);
    }

    pub fn tint_color(&self) -> Color {
        self.inner.tint.get()
    }

    pub fn set_tint_color(&self, tint: Color) {
        self.inner.tint.set(tint);
        self.inner.layers.borrow_mut().body.set_style(body_style(tint));
    }

    pub fn spinner_color(&self) -> Option<Color> {
        self.inner.spinner.borrow().color()
    }

    pub fn set_spinner_color(&self, color: Option<Color>) {
        self.inner.spinner.borrow_mut().set_color(color);
    }

    pub fn spinner_style(&self) -> SpinnerStyle {
        self.inner.spinner.borrow().style()
    }

    pub fn set_spinner_style(&self, style: SpinnerStyle) {
        self.inner.spinner.borrow_mut().set_style(style);
    }
}

impl<H: ScrollHost + 'static> Drop for RefreshControl<H> {
    fn drop(&mut self) {
        self.inner.release();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internals
// ─────────────────────────────────────────────────────────────────────────────

struct Inner<H: ScrollHost + 'static> {
    host: Weak<H>,
    offset_subscription: Cell<Option<SubscriptionId>>,
    inset_subscription: Cell<Option<SubscriptionId>>,
    /// The owning control was dropped
    released: Cell<bool>,
    ignore_inset: Cell<bool>,
    ignore_offset: Cell<bool>,
    enabled: Cell<bool>,
    fast_scroll: Cell<FastScrollPolicy>,
    tint: Cell<Color>,
    metrics: RefreshMetrics,
    timing: TimingConfig,
    state: RefCell<RefreshState>,
    layers: RefCell<ShapeLayers>,
    spinner: RefCell<Box<dyn ActivityIndicator>>,
    scheduler: SharedScheduler,
    action: RefCell<Option<RefreshAction>>,
    sender: mpsc::Sender<ControlCommand>,
    receiver: mpsc::Receiver<ControlCommand>,
}

impl<H: ScrollHost + 'static> Inner<H> {
    fn host(&self) -> Option<Rc<H>> {
        self.host.upgrade()
    }

    fn bounds(&self) -> Size {
        self.state.borrow().frame.size
    }

    fn unsubscribe(&self, slot: &Cell<Option<SubscriptionId>>) -> bool {
        let Some(id) = slot.take() else {
            return false;
        };
        if let Some(host) = self.host() {
            host.unsubscribe(id);
        }
        true
    }

    /// Drop both subscriptions; the host stays reachable for a pending end
    fn detach(&self) {
        let offset = self.unsubscribe(&self.offset_subscription);
        let inset = self.unsubscribe(&self.inset_subscription);
        if offset || inset {
            tracing::debug!("refresh control detached");
        }
    }

    /// The owning control is gone. A pending collapse keeps the inset
    /// subscription until it has restored the host.
    fn release(&self) {
        self.released.set(true);
        if self.state.borrow().phase() == RefreshPhase::Completing {
            self.unsubscribe(&self.offset_subscription);
            tracing::debug!("refresh control released during collapse");
        } else {
            self.detach();
        }
    }

    fn dispatch_action(&self) {
        let action = self.action.borrow().clone();
        if let Some(action) = action {
            action();
        }
    }

    fn handle_inset(&self, inset: EdgeInsets) {
        if self.ignore_inset.get() {
            return;
        }
        let width = match self.host() {
            Some(host) => host.frame().width(),
            None => self.bounds().width,
        };
        self.state
            .borrow_mut()
            .adopt_inset(inset, width, &self.metrics);
        tracing::trace!(top = inset.top, "host inset changed");
    }

    fn handle_offset(&self, content_offset: Point) {
        if !self.enabled.get() || self.ignore_offset.get() {
            return;
        }
        let Some(host) = self.host() else {
            return;
        };

        let (offset, refreshing) = {
            let state = self.state.borrow();
            (content_offset.y + state.original_inset.top, state.refreshing())
        };

        if refreshing {
            self.track_pinned(&host, offset);
        } else {
            self.track_pull(&host, offset);
        }
    }

    /// Keep the collapsed drop, the spinner and the opened inset attached to
    /// the content while a refresh runs
    fn track_pinned(&self, host: &H, offset: f32) {
        if offset == 0.0 {
            return;
        }

        let bounds = self.bounds();
        self.layers
            .borrow_mut()
            .body
            .set_position(pinned_layer_position(offset, &self.metrics));
        self.spinner
            .borrow_mut()
            .set_center(pinned_spinner_center(offset, bounds, &self.metrics));

        suppressed(&self.ignore_inset, || {
            suppressed(&self.ignore_offset, || {
                let is_dragging = host.is_dragging();
                let mut input = {
                    let state = self.state.borrow();
                    PinnedInput {
                        offset,
                        is_dragging,
                        did_set_inset: state.did_set_inset,
                        has_section_headers: state.has_section_headers,
                        original_inset: state.original_inset,
                    }
                };

                if needs_header_probe(&input, &self.metrics) {
                    let has_headers = host
                        .section_header_heights()
                        .is_some_and(|heights| heights.iter().any(|&height| height != 0.0));
                    let mut state = self.state.borrow_mut();
                    state.did_set_inset = true;
                    state.has_section_headers = has_headers;
                    input.did_set_inset = true;
                    input.has_section_headers = has_headers;
                }

                if let Some(inset) = pinned_inset(&input, &self.metrics) {
                    tracing::trace!(offset, top = inset.top, "pinning refresh inset");
                    host.set_content_inset(inset);
                }
            })
        });
    }

    fn track_pull(&self, host: &H, offset: f32) {
        let is_tracking = host.is_tracking();
        let gate = {
            let mut state = self.state.borrow_mut();
            let gate = gate_offset(
                offset,
                state.last_offset,
                state.can_refresh,
                is_tracking,
                self.fast_scroll.get(),
            );
            state.can_refresh = gate.can_refresh;
            if gate.reset_inset_probe {
                state.did_set_inset = false;
            }
            state.last_offset = offset;
            gate
        };

        if !gate.draw {
            self.layers.borrow_mut().clear();
            self.state.borrow_mut().send(RefreshEvent::PullEnded);
            return;
        }

        let sample = sample_drop(offset, self.bounds(), &self.metrics);
        tracing::trace!(offset, percentage = sample.percentage, "drop sample");

        if sample.triggered {
            self.trigger(&sample);
        } else {
            self.draw(&sample);
            let event = if offset < 0.0 {
                RefreshEvent::PullMoved
            } else {
                RefreshEvent::PullEnded
            };
            self.state.borrow_mut().send(event);
        }
    }

    fn draw(&self, sample: &DropSample) {
        let body = sample.body_path();
        let mut layers = self.layers.borrow_mut();
        layers.body.set_shadow_path(Some(body.clone()));
        layers.body.set_path(Some(body));
        layers.arrow.set_path(Some(sample.arrow_path()));
        layers.highlight.set_path(Some(sample.highlight_path()));
    }

    /// Shrink the drop into the capsule, reveal the spinner and start the
    /// refresh
    fn trigger(&self, sample: &DropSample) {
        let timing = self.timing;
        let capsule = sample.capsule_path();
        {
            let mut layers = self.layers.borrow_mut();
            layers.body.add_animation(
                morph_to(LayerProperty::Path, capsule.clone())
                    .duration(timing.morph_ms)
                    .hold(),
            );
            layers.body.add_animation(
                morph_to(LayerProperty::ShadowPath, capsule)
                    .duration(timing.morph_ms)
                    .hold(),
            );
            layers.body.add_animation(
                fade_to(0.0)
                    .duration(timing.body_fade_ms)
                    .delay(timing.body_fade_delay_ms)
                    .hold(),
            );
            layers
                .arrow
                .add_animation(fade_to(0.0).duration(timing.glyph_fade_ms).hold());
            layers
                .highlight
                .add_animation(fade_to(0.0).duration(timing.glyph_fade_ms).hold());
        }
        {
            let mut spinner = self.spinner.borrow_mut();
            let alpha = spinner.appearance().alpha;
            spinner.set_appearance(SpinnerAppearance::new(alpha, 0.1), None);
            spinner.set_appearance(SpinnerAppearance::VISIBLE, Some(timing.spinner_reveal()));
        }
        {
            let mut state = self.state.borrow_mut();
            state.send(RefreshEvent::ThresholdReached);
            state.can_refresh = false;
            state.send(RefreshEvent::ActionDispatched);
            tracing::debug!(
                offset = sample.offset,
                generation = state.generation(),
                "pull triggered refresh"
            );
        }
        self.dispatch_action();
    }

    fn begin_refreshing(&self) {
        if self.state.borrow().refreshing() {
            return;
        }
        let host = match self.host() {
            Some(host) if self.offset_subscription.get().is_some() => host,
            _ => {
                tracing::warn!("begin_refreshing called on a detached refresh control");
                return;
            }
        };

        let fade_ms = self.timing.begin_fade_ms;
        for layer in self.layers.borrow_mut().each_mut() {
            layer.add_animation(fade_to(0.0).duration(fade_ms).hold());
        }
        {
            let mut spinner = self.spinner.borrow_mut();
            spinner.set_center(pinned_spinner_center(0.0, self.bounds(), &self.metrics));
            spinner.set_appearance(SpinnerAppearance::VISIBLE, None);
        }

        let original = self.state.borrow().original_inset;
        suppressed(&self.ignore_inset, || {
            host.set_content_inset(original.grow_top(self.metrics.opened_height));
        });
        let mut offset = host.content_offset();
        offset.y -= self.metrics.max_distance;
        suppressed(&self.ignore_offset, || host.set_content_offset(offset));

        {
            let mut state = self.state.borrow_mut();
            state.send(RefreshEvent::BeginRequested);
            state.can_refresh = false;
            state.was_manually_started = true;
            state.send(RefreshEvent::ActionDispatched);
            tracing::debug!(generation = state.generation(), "refresh started manually");
        }
        self.dispatch_action();
    }

    fn end_refreshing(self: &Rc<Self>) {
        let (generation, original) = {
            let mut state = self.state.borrow_mut();
            if !state.refreshing() {
                return;
            }
            state.send(RefreshEvent::EndRequested);
            (state.generation(), state.original_inset)
        };

        // held by the completion so the host outlives the collapse animation
        let host = self.host();
        match &host {
            Some(host) => suppressed(&self.ignore_inset, || host.set_content_inset(original)),
            None => tracing::warn!("ending refresh after the host was released"),
        }

        let collapse = self.timing.collapse();
        self.spinner
            .borrow_mut()
            .set_appearance(SpinnerAppearance::COLLAPSED, Some(collapse));

        // the completion owns the control state until it runs
        let control = Rc::clone(self);
        self.scheduler.borrow_mut().schedule(collapse, move || {
            control.finish_end(generation, host.as_deref());
            let settled = control.state.borrow().phase() != RefreshPhase::Completing;
            if control.released.get() && settled {
                control.detach();
            }
        });
        tracing::debug!(generation, "refresh ending");
    }

    /// Completion of the collapse animation
    fn finish_end(&self, generation: u64, host: Option<&H>) {
        {
            let state = self.state.borrow();
            if state.phase() != RefreshPhase::Completing || state.generation() != generation {
                tracing::trace!(generation, "stale refresh completion skipped");
                return;
            }
        }

        {
            let mut layers = self.layers.borrow_mut();
            for layer in layers.each_mut() {
                layer.remove_all_animations();
            }
            layers.clear();
            layers.body.set_position(Point::ZERO);
        }

        let original = self.state.borrow().original_inset;
        if let Some(host) = host {
            suppressed(&self.ignore_inset, || host.set_content_inset(original));
        }

        let mut state = self.state.borrow_mut();
        state.was_manually_started = false;
        state.send(RefreshEvent::Settled);
        tracing::debug!(generation, "refresh ended");
    }
}
