//! Droplet Refresh
//!
//! A pull-to-refresh control drawn as a stretching teardrop.
//!
//! - **Geometry**: pure mapping from pull offset to the drop, arrow and
//!   highlight outlines ([`geometry`])
//! - **Observer**: drawing gate, re-arm logic and pinned inset bookkeeping
//!   ([`observer`])
//! - **Lifecycle**: `Idle → Pulling → Triggered → Refreshing → Completing`
//!   ([`lifecycle`])
//! - **Control**: ties the three to a [`ScrollHost`] ([`control`])
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use droplet_core::Rect;
//! use droplet_refresh::{HeadlessScrollView, RefreshControlBuilder};
//!
//! let host = HeadlessScrollView::shared(Rect::new(0.0, 0.0, 320.0, 480.0));
//! let fired = Rc::new(Cell::new(0));
//! let fired_clone = fired.clone();
//!
//! let control = RefreshControlBuilder::new()
//!     .action(move || fired_clone.set(fired_clone.get() + 1))
//!     .attach(&host);
//!
//! host.drag_to(-40.0);
//! assert!(!control.is_refreshing());
//!
//! host.drag_to(-100.0);
//! assert!(control.is_refreshing());
//! assert_eq!(fired.get(), 1);
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod layers;
pub mod lifecycle;
pub mod metrics;
pub mod observer;
pub mod spinner;

pub use config::{AppearanceConfig, RefreshConfig, TimingConfig};
pub use control::{CompletionHandle, ControlCommand, RefreshControl, RefreshControlBuilder};
pub use error::{RefreshError, Result};
pub use geometry::{lerp, sample_drop, DropSample};
pub use headless::HeadlessScrollView;
pub use host::ScrollHost;
pub use layers::{LayerAnimation, LayerProperty, LayerValue, RecordingLayer, ShapeLayer, ShapeLayers};
pub use lifecycle::{RefreshEvent, RefreshPhase, RefreshState};
pub use metrics::RefreshMetrics;
pub use observer::FastScrollPolicy;
pub use spinner::{ActivityIndicator, DefaultSpinner, SpinnerAppearance, SpinnerStyle};
