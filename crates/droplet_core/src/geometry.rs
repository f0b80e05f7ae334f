//! Geometry primitives in view coordinates
//!
//! The y axis grows downward, matching the scroll hosts the refresh control
//! attaches to: a negative content offset means the content was pulled down
//! past its top edge.

// ─────────────────────────────────────────────────────────────────────────────
// Points and Sizes
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Return this point moved by a delta
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert to a Rect at the origin (0, 0)
    pub const fn to_rect(self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self,
        }
    }
}

impl From<Size> for Rect {
    fn from(size: Size) -> Self {
        size.to_rect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rects
// ─────────────────────────────────────────────────────────────────────────────

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// The rect's own coordinate space (origin at zero)
    pub fn bounds(&self) -> Rect {
        self.size.to_rect()
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Edge Insets
// ─────────────────────────────────────────────────────────────────────────────

/// Padding a scroll host reserves around its content
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Same insets with a replaced top edge
    pub fn with_top(mut self, top: f32) -> Self {
        self.top = top;
        self
    }

    /// Same insets with extra space added above the content
    pub fn grow_top(self, amount: f32) -> Self {
        self.with_top(self.top + amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_accessors() {
        let rect = Rect::new(0.0, -400.0, 320.0, 400.0);
        assert_eq!(rect.width(), 320.0);
        assert_eq!(rect.max_y(), 0.0);
        assert_eq!(rect.bounds(), Rect::new(0.0, 0.0, 320.0, 400.0));
        assert_eq!(rect.center(), Point::new(160.0, -200.0));
    }

    #[test]
    fn test_edge_insets_grow_top_keeps_other_edges() {
        let inset = EdgeInsets::new(20.0, 1.0, 2.0, 3.0).grow_top(44.0);
        assert_eq!(inset, EdgeInsets::new(64.0, 1.0, 2.0, 3.0));
    }
}
