//! Shape layers the control draws into
//!
//! The control owns three retained layers: the drop body (with its shadow),
//! the arrow glyph and the highlight gloss. A layer only stores what it was
//! told; a rendering backend presents it and runs its animations.
//! [`RecordingLayer`] is the in-memory backend used headless and in tests.

use std::cell::RefCell;
use std::rc::Rc;

use droplet_animation::{Animatable, BasicAnimation};
use droplet_core::Point;
use droplet_paint::{Color, FillRule, Path, Shadow, ShapeStyle};

/// Animatable layer properties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerProperty {
    Path,
    ShadowPath,
    Opacity,
}

/// Target value of a layer animation
#[derive(Clone, Debug, PartialEq)]
pub enum LayerValue {
    Path(Path),
    Scalar(f32),
}

impl Animatable for LayerValue {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (LayerValue::Path(a), LayerValue::Path(b)) => LayerValue::Path(a.interpolate(b, t)),
            (LayerValue::Scalar(a), LayerValue::Scalar(b)) => LayerValue::Scalar(a.interpolate(b, t)),
            _ if t >= 1.0 => to.clone(),
            _ => self.clone(),
        }
    }
}

pub type LayerAnimation = BasicAnimation<LayerProperty, LayerValue>;

/// Build an opacity animation
pub fn fade_to(opacity: f32) -> LayerAnimation {
    BasicAnimation::new(LayerProperty::Opacity, LayerValue::Scalar(opacity))
}

/// Build a path morph animation
pub fn morph_to(property: LayerProperty, path: Path) -> LayerAnimation {
    BasicAnimation::new(property, LayerValue::Path(path))
}

/// A retained vector layer
pub trait ShapeLayer {
    /// Replace the outline; `None` draws nothing
    fn set_path(&mut self, path: Option<Path>);

    fn set_shadow_path(&mut self, path: Option<Path>);

    fn set_fill_rule(&mut self, rule: FillRule);

    fn set_style(&mut self, style: ShapeStyle);

    /// Offset of the layer inside the control view
    fn set_position(&mut self, position: Point);

    fn add_animation(&mut self, animation: LayerAnimation);

    fn remove_all_animations(&mut self);
}

impl<T: ShapeLayer> ShapeLayer for Rc<RefCell<T>> {
    fn set_path(&mut self, path: Option<Path>) {
        self.borrow_mut().set_path(path);
    }

    fn set_shadow_path(&mut self, path: Option<Path>) {
        self.borrow_mut().set_shadow_path(path);
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.borrow_mut().set_fill_rule(rule);
    }

    fn set_style(&mut self, style: ShapeStyle) {
        self.borrow_mut().set_style(style);
    }

    fn set_position(&mut self, position: Point) {
        self.borrow_mut().set_position(position);
    }

    fn add_animation(&mut self, animation: LayerAnimation) {
        self.borrow_mut().add_animation(animation);
    }

    fn remove_all_animations(&mut self) {
        self.borrow_mut().remove_all_animations();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Styles
// ─────────────────────────────────────────────────────────────────────────────

fn outline() -> (Color, f32) {
    (Color::DARK_GRAY.with_alpha(0.5), 0.5)
}

/// Drop body: tinted fill, thin dark outline, soft shadow below
pub fn body_style(tint: Color) -> ShapeStyle {
    let (stroke, width) = outline();
    ShapeStyle::filled(tint)
        .with_stroke(stroke, width)
        .with_shadow(Shadow::new(0.0, 1.0, 0.5, Color::BLACK).with_opacity(0.4))
}

pub fn arrow_style() -> ShapeStyle {
    let (stroke, width) = outline();
    ShapeStyle::filled(Color::WHITE).with_stroke(stroke, width)
}

pub fn highlight_style() -> ShapeStyle {
    ShapeStyle::filled(Color::WHITE.with_alpha(0.2))
}

// ─────────────────────────────────────────────────────────────────────────────
// Layer set
// ─────────────────────────────────────────────────────────────────────────────

/// The three layers of the drop
pub struct ShapeLayers {
    pub body: Box<dyn ShapeLayer>,
    pub arrow: Box<dyn ShapeLayer>,
    pub highlight: Box<dyn ShapeLayer>,
}

impl ShapeLayers {
    pub fn new(
        body: impl ShapeLayer + 'static,
        arrow: impl ShapeLayer + 'static,
        highlight: impl ShapeLayer + 'static,
    ) -> Self {
        Self {
            body: Box::new(body),
            arrow: Box::new(arrow),
            highlight: Box::new(highlight),
        }
    }

    /// Apply the fixed styles and fill rules
    pub fn configure(&mut self, tint: Color) {
        self.body.set_style(body_style(tint));
        self.arrow.set_style(arrow_style());
        self.arrow.set_fill_rule(FillRule::EvenOdd);
        self.highlight.set_style(highlight_style());
        self.highlight.set_fill_rule(FillRule::NonZero);
    }

    pub fn each_mut(&mut self) -> [&mut dyn ShapeLayer; 3] {
        [
            self.body.as_mut(),
            self.arrow.as_mut(),
            self.highlight.as_mut(),
        ]
    }

    /// Draw nothing on any layer
    pub fn clear(&mut self) {
        self.body.set_path(None);
        self.body.set_shadow_path(None);
        self.arrow.set_path(None);
        self.highlight.set_path(None);
    }
}

impl Default for ShapeLayers {
    fn default() -> Self {
        Self::new(
            RecordingLayer::new(),
            RecordingLayer::new(),
            RecordingLayer::new(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording backend
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct RunningAnimation {
    animation: LayerAnimation,
    started_ms: f32,
}

/// In-memory layer that keeps its model values and a local clock to present
/// its animations
#[derive(Clone, Debug)]
pub struct RecordingLayer {
    path: Option<Path>,
    shadow_path: Option<Path>,
    fill_rule: FillRule,
    style: ShapeStyle,
    position: Point,
    opacity: f32,
    animations: Vec<RunningAnimation>,
    clock_ms: f32,
    path_writes: usize,
}

impl Default for RecordingLayer {
    fn default() -> Self {
        Self {
            path: None,
            shadow_path: None,
            fill_rule: FillRule::NonZero,
            style: ShapeStyle::default(),
            position: Point::ZERO,
            opacity: 1.0,
            animations: Vec::new(),
            clock_ms: 0.0,
            path_writes: 0,
        }
    }
}

impl RecordingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shareable handle, so a caller can inspect a layer it handed to the
    /// control
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn shadow_path(&self) -> Option<&Path> {
        self.shadow_path.as_ref()
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn style(&self) -> ShapeStyle {
        self.style
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Number of `set_path` calls so far
    pub fn path_writes(&self) -> usize {
        self.path_writes
    }

    pub fn animations(&self) -> impl Iterator<Item = &LayerAnimation> {
        self.animations.iter().map(|running| &running.animation)
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Advance the presentation clock, dropping animations that finished and
    /// are removed on completion
    pub fn advance(&mut self, dt_ms: f32) {
        self.clock_ms += dt_ms;
        let now = self.clock_ms;
        self.animations.retain(|running| {
            !running.animation.removed_on_completion()
                || !running.animation.is_finished_at(now - running.started_ms)
        });
    }

    fn presented(&self, property: LayerProperty, model: LayerValue) -> LayerValue {
        self.animations
            .iter()
            .filter(|running| running.animation.key() == property)
            .fold(model, |value, running| {
                running
                    .animation
                    .value_at(&value, self.clock_ms - running.started_ms)
                    .unwrap_or(value)
            })
    }

    /// Opacity as currently presented
    pub fn presented_opacity(&self) -> f32 {
        match self.presented(LayerProperty::Opacity, LayerValue::Scalar(self.opacity)) {
            LayerValue::Scalar(opacity) => opacity,
            LayerValue::Path(_) => self.opacity,
        }
    }

    /// Outline as currently presented
    pub fn presented_path(&self) -> Option<Path> {
        let model = self.path.clone()?;
        match self.presented(LayerProperty::Path, LayerValue::Path(model)) {
            LayerValue::Path(path) => Some(path),
            LayerValue::Scalar(_) => self.path.clone(),
        }
    }
}

impl ShapeLayer for RecordingLayer {
    fn set_path(&mut self, path: Option<Path>) {
        self.path = path;
        self.path_writes += 1;
    }

    fn set_shadow_path(&mut self, path: Option<Path>) {
        self.shadow_path = path;
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.fill_rule = rule;
    }

    fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn add_animation(&mut self, animation: LayerAnimation) {
        self.animations.push(RunningAnimation {
            animation,
            started_ms: self.clock_ms,
        });
    }

    fn remove_all_animations(&mut self) {
        self.animations.clear();
    }
}
