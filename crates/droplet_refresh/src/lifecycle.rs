//! Refresh lifecycle
//!
//! The control moves through five phases:
//!
//! ```text
//! Idle ──pull──▶ Pulling ──threshold──▶ Triggered ──action──▶ Refreshing
//!  ▲                │                       ▲                      │
//!  └────release─────┘                       │ begin                │ end
//!  ▲                                        │                      ▼
//!  └──────────────settled────────────── Completing ◀───────────────┘
//! ```
//!
//! `Triggered` and `Refreshing` both count as refreshing. `Completing` covers
//! the collapse animation after an end request; a new trigger may interrupt
//! it, which is why every entry into `Triggered` starts a new generation.

use droplet_core::{EdgeInsets, Rect, StateMachine, StateTransitions};

use crate::metrics::RefreshMetrics;

/// Phase of the refresh lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefreshPhase {
    #[default]
    Idle,
    /// Offset is below zero and the drop is being drawn
    Pulling,
    /// Pull threshold reached or refresh started programmatically
    Triggered,
    /// The action has been dispatched
    Refreshing,
    /// End requested, collapse animation running
    Completing,
}

impl RefreshPhase {
    pub fn is_refreshing(self) -> bool {
        matches!(self, RefreshPhase::Triggered | RefreshPhase::Refreshing)
    }
}

/// Inputs driving the lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshEvent {
    PullMoved,
    PullEnded,
    ThresholdReached,
    BeginRequested,
    ActionDispatched,
    EndRequested,
    Settled,
}

impl StateTransitions for RefreshPhase {
    type Event = RefreshEvent;

    fn on_event(&self, event: RefreshEvent) -> Option<Self> {
        use RefreshEvent::*;
        use RefreshPhase::*;

        match (self, event) {
            (Idle, PullMoved) => Some(Pulling),
            (Idle | Pulling | Completing, ThresholdReached | BeginRequested) => Some(Triggered),
            (Pulling, PullEnded) => Some(Idle),
            (Triggered, ActionDispatched) => Some(Refreshing),
            (Triggered | Refreshing, EndRequested) => Some(Completing),
            (Completing, Settled) => Some(Idle),
            _ => None,
        }
    }
}

fn lifecycle_machine() -> StateMachine<RefreshPhase> {
    StateMachine::builder(RefreshPhase::Idle)
        .on_enter(RefreshPhase::Triggered, || tracing::debug!("refresh triggered"))
        .on_enter(RefreshPhase::Completing, || tracing::debug!("refresh ending"))
        .on_enter(RefreshPhase::Idle, || tracing::trace!("refresh control idle"))
        .build()
}

/// Mutable per-control state
#[derive(Debug)]
pub struct RefreshState {
    machine: StateMachine<RefreshPhase>,
    /// A pull may trigger; cleared on trigger, re-armed once the offset
    /// returns to zero or above
    pub can_refresh: bool,
    /// The section header probe has run for the current pinned-inset session
    pub did_set_inset: bool,
    pub has_section_headers: bool,
    pub last_offset: f32,
    pub was_manually_started: bool,
    /// Host inset as last set by anyone but the control
    pub original_inset: EdgeInsets,
    /// Control view frame in host content coordinates
    pub frame: Rect,
    generation: u64,
}

impl RefreshState {
    pub fn new(original_inset: EdgeInsets, host_width: f32, metrics: &RefreshMetrics) -> Self {
        Self {
            machine: lifecycle_machine(),
            can_refresh: true,
            did_set_inset: false,
            has_section_headers: false,
            last_offset: 0.0,
            was_manually_started: false,
            original_inset,
            frame: control_frame(host_width, original_inset, metrics),
            generation: 0,
        }
    }

    pub fn phase(&self) -> RefreshPhase {
        self.machine.current_state()
    }

    pub fn refreshing(&self) -> bool {
        self.phase().is_refreshing()
    }

    /// Increments on every entry into `Triggered`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn history(&self) -> &[(RefreshPhase, RefreshEvent, RefreshPhase)] {
        self.machine.history()
    }

    /// Feed an event, returning the new phase if it caused a transition
    pub fn send(&mut self, event: RefreshEvent) -> Option<RefreshPhase> {
        let next = self.machine.send(event)?;
        if next == RefreshPhase::Triggered {
            self.generation += 1;
        }
        Some(next)
    }

    /// Record an inset set by someone other than the control
    pub fn adopt_inset(&mut self, inset: EdgeInsets, host_width: f32, metrics: &RefreshMetrics) {
        self.original_inset = inset;
        self.frame = control_frame(host_width, inset, metrics);
    }
}

/// Frame of the control view: full host width, `total_height` tall, bottom
/// edge on the top edge of the inset content
pub fn control_frame(host_width: f32, inset: EdgeInsets, metrics: &RefreshMetrics) -> Rect {
    Rect::new(
        0.0,
        -(metrics.total_height + inset.top),
        host_width,
        metrics.total_height,
    )
}
