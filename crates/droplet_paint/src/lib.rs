//! Droplet Paint
//!
//! Retained vector data handed to a rendering backend:
//!
//! - Path recording (lines, cubic curves, directed arcs)
//! - Path interpolation for morph animations
//! - Colors, fill rules, strokes and shadows for shape layers

pub mod color;
pub mod path;
pub mod style;

pub use color::Color;
pub use path::{Path, PathBuilder, PathCommand};
pub use style::{FillRule, Shadow, ShapeStyle, Stroke};
