//! Droplet Animation System
//!
//! Declarative animations in the style of retained-mode compositors.
//!
//! # Features
//!
//! - **Timing Curves**: the platform's linear / ease-in / ease-out / ease-in-out
//!   cubic-bezier curves
//! - **Basic Animations**: property key, target value, duration, begin delay
//!   and fill mode, interpreted by the rendering backend
//! - **Scheduler**: timed blocks that fire a completion callback when they end

pub mod basic;
pub mod easing;
pub mod scheduler;

pub use basic::{Animatable, BasicAnimation, FillMode};
pub use easing::Easing;
pub use scheduler::{drive, AnimationId, AnimationScheduler, Completion, SharedScheduler, Timing};
