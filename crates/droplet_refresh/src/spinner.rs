//! Activity indicator shown while refreshing

use std::cell::RefCell;
use std::rc::Rc;

use droplet_animation::Timing;
use droplet_core::Point;
use droplet_paint::Color;
use serde::{Deserialize, Serialize};

/// Built-in indicator looks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinnerStyle {
    #[default]
    Gray,
    White,
    WhiteLarge,
}

/// Alpha and uniform scale of the indicator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinnerAppearance {
    pub alpha: f32,
    pub scale: f32,
}

impl SpinnerAppearance {
    /// Fully shown at natural size
    pub const VISIBLE: SpinnerAppearance = SpinnerAppearance {
        alpha: 1.0,
        scale: 1.0,
    };

    /// Transparent and shrunk to a tenth
    pub const COLLAPSED: SpinnerAppearance = SpinnerAppearance {
        alpha: 0.0,
        scale: 0.1,
    };

    pub const fn new(alpha: f32, scale: f32) -> Self {
        Self { alpha, scale }
    }
}

/// Spinning activity indicator
pub trait ActivityIndicator {
    fn start_animating(&mut self);

    fn stop_animating(&mut self);

    fn is_animating(&self) -> bool;

    fn set_center(&mut self, center: Point);

    fn center(&self) -> Point;

    /// Change alpha and scale, immediately or animated with `timing`
    fn set_appearance(&mut self, appearance: SpinnerAppearance, timing: Option<Timing>);

    /// Target appearance (the end value of a running transition)
    fn appearance(&self) -> SpinnerAppearance;

    /// `None` uses the style's own color
    fn color(&self) -> Option<Color>;

    fn set_color(&mut self, color: Option<Color>);

    fn style(&self) -> SpinnerStyle;

    fn set_style(&mut self, style: SpinnerStyle);
}

impl<T: ActivityIndicator> ActivityIndicator for Rc<RefCell<T>> {
    fn start_animating(&mut self) {
        self.borrow_mut().start_animating();
    }

    fn stop_animating(&mut self) {
        self.borrow_mut().stop_animating();
    }

    fn is_animating(&self) -> bool {
        self.borrow().is_animating()
    }

    fn set_center(&mut self, center: Point) {
        self.borrow_mut().set_center(center);
    }

    fn center(&self) -> Point {
        self.borrow().center()
    }

    fn set_appearance(&mut self, appearance: SpinnerAppearance, timing: Option<Timing>) {
        self.borrow_mut().set_appearance(appearance, timing);
    }

    fn appearance(&self) -> SpinnerAppearance {
        self.borrow().appearance()
    }

    fn color(&self) -> Option<Color> {
        self.borrow().color()
    }

    fn set_color(&mut self, color: Option<Color>) {
        self.borrow_mut().set_color(color);
    }

    fn style(&self) -> SpinnerStyle {
        self.borrow().style()
    }

    fn set_style(&mut self, style: SpinnerStyle) {
        self.borrow_mut().set_style(style);
    }
}

/// Indicator that only records its state; a renderer reads it back
#[derive(Clone, Debug)]
pub struct DefaultSpinner {
    animating: bool,
    center: Point,
    appearance: SpinnerAppearance,
    last_timing: Option<Timing>,
    color: Option<Color>,
    style: SpinnerStyle,
}

impl Default for DefaultSpinner {
    fn default() -> Self {
        Self {
            animating: false,
            center: Point::ZERO,
            appearance: SpinnerAppearance::COLLAPSED,
            last_timing: None,
            color: None,
            style: SpinnerStyle::Gray,
        }
    }
}

impl DefaultSpinner {
    /// A collapsed, already spinning indicator, as the control expects it
    pub fn new() -> Self {
        let mut spinner = Self::default();
        spinner.start_animating();
        spinner
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Timing of the most recent appearance change, `None` if it snapped
    pub fn last_timing(&self) -> Option<Timing> {
        self.last_timing
    }
}

impl ActivityIndicator for DefaultSpinner {
    fn start_animating(&mut self) {
        self.animating = true;
    }

    fn stop_animating(&mut self) {
        self.animating = false;
    }

    fn is_animating(&self) -> bool {
        self.animating
    }

    fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    fn center(&self) -> Point {
        self.center
    }

    fn set_appearance(&mut self, appearance: SpinnerAppearance, timing: Option<Timing>) {
        self.appearance = appearance;
        self.last_timing = timing;
    }

    fn appearance(&self) -> SpinnerAppearance {
        self.appearance
    }

    fn color(&self) -> Option<Color> {
        self.color
    }

    fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    fn style(&self) -> SpinnerStyle {
        self.style
    }

    fn set_style(&mut self, style: SpinnerStyle) {
        self.style = style;
    }
}
