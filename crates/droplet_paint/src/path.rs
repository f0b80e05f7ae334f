//! Path building and representation

use droplet_core::Point;
use smallvec::SmallVec;

/// Path command
///
/// Arcs follow the Core Graphics convention: angles in radians measured from
/// the positive x axis, swept clockwise or counter-clockwise, and connected to
/// the current point with an implicit line when one exists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    ArcTo {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    },
    Close,
}

impl PathCommand {
    /// True when both commands are the same verb (and arc direction), so
    /// their operands can be blended
    fn same_shape(&self, other: &PathCommand) -> bool {
        match (self, other) {
            (PathCommand::MoveTo(_), PathCommand::MoveTo(_))
            | (PathCommand::LineTo(_), PathCommand::LineTo(_))
            | (PathCommand::CubicTo { .. }, PathCommand::CubicTo { .. })
            | (PathCommand::Close, PathCommand::Close) => true,
            (
                PathCommand::ArcTo { clockwise: a, .. },
                PathCommand::ArcTo { clockwise: b, .. },
            ) => a == b,
            _ => false,
        }
    }

    fn lerp(&self, other: &PathCommand, t: f32) -> PathCommand {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        let mix_point = |a: Point, b: Point| Point::new(mix(a.x, b.x), mix(a.y, b.y));

        match (*self, *other) {
            (PathCommand::MoveTo(a), PathCommand::MoveTo(b)) => PathCommand::MoveTo(mix_point(a, b)),
            (PathCommand::LineTo(a), PathCommand::LineTo(b)) => PathCommand::LineTo(mix_point(a, b)),
            (
                PathCommand::CubicTo {
                    control1: a1,
                    control2: a2,
                    end: ae,
                },
                PathCommand::CubicTo {
                    control1: b1,
                    control2: b2,
                    end: be,
                },
            ) => PathCommand::CubicTo {
                control1: mix_point(a1, b1),
                control2: mix_point(a2, b2),
                end: mix_point(ae, be),
            },
            (
                PathCommand::ArcTo {
                    center: ac,
                    radius: ar,
                    start_angle: as_,
                    end_angle: ae,
                    clockwise,
                },
                PathCommand::ArcTo {
                    center: bc,
                    radius: br,
                    start_angle: bs,
                    end_angle: be,
                    ..
                },
            ) => PathCommand::ArcTo {
                center: mix_point(ac, bc),
                radius: mix(ar, br),
                start_angle: mix(as_, bs),
                end_angle: mix(ae, be),
                clockwise,
            },
            _ => *other,
        }
    }
}

/// A 2D path composed of commands
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 16]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// True when the last command closes the current subpath
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Arc commands in recording order
    pub fn arcs(&self) -> impl Iterator<Item = &PathCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, PathCommand::ArcTo { .. }))
    }

    /// Whether `other` records the same verbs in the same order
    pub fn is_morph_compatible(&self, other: &Path) -> bool {
        self.commands.len() == other.commands.len()
            && self
                .commands
                .iter()
                .zip(other.commands.iter())
                .all(|(a, b)| a.same_shape(b))
    }

    /// Blend toward `other` by `t` (0.0 = self, 1.0 = other)
    ///
    /// Paths with different command layouts cannot be blended; they switch to
    /// `other` once `t` reaches 1.0.
    pub fn interpolate(&self, other: &Path, t: f32) -> Path {
        if t >= 1.0 {
            return other.clone();
        }
        if t <= 0.0 || !self.is_morph_compatible(other) {
            return self.clone();
        }
        Path {
            commands: self
                .commands
                .iter()
                .zip(other.commands.iter())
                .map(|(a, b)| a.lerp(b, t))
                .collect(),
        }
    }
}

/// Builder for constructing paths
pub struct PathBuilder {
    path: Path,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self { path: Path::new() }
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.path.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.path.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn cubic_to(mut self, control1: Point, control2: Point, end: Point) -> Self {
        self.path.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            end,
        });
        self
    }

    /// Append an arc around `center`, sweeping from `start` to `end` radians
    pub fn arc(mut self, center: Point, radius: f32, start: f32, end: f32, clockwise: bool) -> Self {
        self.path.commands.push(PathCommand::ArcTo {
            center,
            radius,
            start_angle: start,
            end_angle: end,
            clockwise,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.path.commands.push(PathCommand::Close);
        self
    }

    pub fn build(self) -> Path {
        self.path
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}
