//! Droplet Core
//!
//! Foundational primitives shared by the Droplet crates:
//!
//! - **Geometry**: points, sizes, rects and edge insets in view coordinates
//! - **State Machines**: enum-driven transitions with entry/exit callbacks
//! - **Host Events**: change notifications a scroll host fans out to observers
//!
//! # Example
//!
//! ```rust
//! use droplet_core::fsm::{StateMachine, StateTransitions};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Door {
//!     Open,
//!     Closed,
//! }
//!
//! impl StateTransitions for Door {
//!     type Event = bool;
//!
//!     fn on_event(&self, close: bool) -> Option<Self> {
//!         match (self, close) {
//!             (Door::Open, true) => Some(Door::Closed),
//!             (Door::Closed, false) => Some(Door::Open),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut door = StateMachine::new(Door::Open);
//! door.send(true);
//! assert!(door.is_in(Door::Closed));
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{HostEvent, HostEventKind, HostHandler, HostNotifier, SubscriptionId};
pub use fsm::{StateMachine, StateTransitions};
pub use geometry::{EdgeInsets, Point, Rect, Size};
