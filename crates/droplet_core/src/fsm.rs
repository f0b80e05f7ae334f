//! State Machine Runtime
//!
//! Enum-driven state machines for widget lifecycles. The state type owns its
//! transition table through [`StateTransitions`]; the machine adds:
//! - Entry/exit actions
//! - A bounded transition history for diagnostics

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Maximum number of transitions kept in the history
pub const HISTORY_LIMIT: usize = 64;

/// An action executed when a state is entered or exited
pub type Action = Box<dyn FnMut() + Send>;

/// Trait for state enums that map events to transitions
///
/// Return `None` when the event does not apply to the current state.
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Event type accepted by this machine
    type Event: Clone + Copy + PartialEq + Debug;

    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: Self::Event) -> Option<Self>;
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S: StateTransitions> {
    initial_state: S,
    entry_callbacks: FxHashMap<S, SmallVec<[Action; 2]>>,
    exit_callbacks: FxHashMap<S, SmallVec<[Action; 2]>>,
}

impl<S: StateTransitions> StateMachineBuilder<S> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            entry_callbacks: FxHashMap::default(),
            exit_callbacks: FxHashMap::default(),
        }
    }

    /// Add an entry action for a state
    pub fn on_enter<F: FnMut() + Send + 'static>(mut self, state: S, action: F) -> Self {
        self.entry_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    /// Add an exit action for a state
    pub fn on_exit<F: FnMut() + Send + 'static>(mut self, state: S, action: F) -> Self {
        self.exit_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S> {
        StateMachine {
            current_state: self.initial_state,
            entry_callbacks: self.entry_callbacks,
            exit_callbacks: self.exit_callbacks,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
pub struct StateMachine<S: StateTransitions> {
    current_state: S,
    entry_callbacks: FxHashMap<S, SmallVec<[Action; 2]>>,
    exit_callbacks: FxHashMap<S, SmallVec<[Action; 2]>>,
    /// History of state transitions (for debugging)
    history: Vec<(S, S::Event, S)>,
}

impl<S: StateTransitions> Debug for StateMachine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current_state", &self.current_state)
            .field("transitions", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl<S: StateTransitions> StateMachine<S> {
    /// Create a new state machine in its initial state
    pub fn new(initial_state: S) -> Self {
        StateMachineBuilder::new(initial_state).build()
    }

    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Get transition history, oldest first
    pub fn history(&self) -> &[(S, S::Event, S)] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: S::Event) -> bool {
        self.current_state.on_event(event).is_some()
    }

    /// Send an event to the state machine, returning the new state if a
    /// transition happened
    pub fn send(&mut self, event: S::Event) -> Option<S> {
        let current = self.current_state;
        let to_state = current.on_event(event)?;

        if let Some(callbacks) = self.exit_callbacks.get_mut(&current) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        self.current_state = to_state;

        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((current, event, to_state));

        tracing::trace!(from = ?current, ?event, to = ?to_state, "state transition");

        if let Some(callbacks) = self.entry_callbacks.get_mut(&to_state) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        Some(to_state)
    }

    /// Register an entry callback for a state
    pub fn on_enter<F: FnMut() + Send + 'static>(&mut self, state: S, callback: F) {
        self.entry_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(callback));
    }

    /// Register an exit callback for a state
    pub fn on_exit<F: FnMut() + Send + 'static>(&mut self, state: S, callback: F) {
        self.exit_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(callback));
    }
}

impl<S: StateTransitions + Default> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
