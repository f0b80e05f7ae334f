//! Drop geometry
//!
//! Maps a pull offset to the teardrop the control draws. Everything here is
//! pure: the same offset, bounds and metrics always produce the same shapes.
//!
//! Coordinates are local to the control view, whose bottom edge sits on the
//! host's top content edge. At rest the drop is a circle resting on that edge;
//! pulling stretches the top circle downward with the content while the
//! bottom circle shrinks, until the stretch reaches `max_distance` and the
//! sample triggers.

use std::f32::consts::PI;

use droplet_core::{Point, Size};
use droplet_paint::Path;

use crate::metrics::RefreshMetrics;

/// Horizontal blend of the side curve control points near each circle
const CURVE_NEAR: f32 = 0.1;
const CURVE_FAR: f32 = 0.9;
/// Vertical blend of both side curve control points
const CURVE_DROP: f32 = 0.2;

/// Linear interpolation, exact at both endpoints
pub fn lerp(a: f32, b: f32, p: f32) -> f32 {
    if p >= 1.0 {
        b
    } else {
        a + (b - a) * p
    }
}

/// Geometry of the drop for one offset sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropSample {
    /// Pull offset the sample was computed for
    pub offset: f32,
    /// How far the pull has gone past the resting drop
    pub vertical_shift: f32,
    /// Stretch distance, capped at `max_distance`
    pub distance: f32,
    /// 1.0 at rest, 0.0 when fully stretched
    pub percentage: f32,
    pub top_padding: f32,
    pub top_radius: f32,
    pub bottom_radius: f32,
    pub bottom_padding: f32,
    pub arrow_size: f32,
    pub arrow_radius: f32,
    pub top_origin: Point,
    pub bottom_origin: Point,
    /// Radius of the capsule the drop shrinks into after triggering
    pub capsule_radius: f32,
    pub highlight_offset: f32,
    /// The stretch reached `max_distance`
    pub triggered: bool,
}

/// Compute the drop for a pull `offset` inside a control of size `bounds`
pub fn sample_drop(offset: f32, bounds: Size, metrics: &RefreshMetrics) -> DropSample {
    let vertical_shift = (-(metrics.rest_extent() + offset)).max(0.0);
    let distance = vertical_shift.abs().min(metrics.max_distance);
    let percentage = 1.0 - distance / metrics.max_distance;

    let top_padding = lerp(metrics.min_top_padding, metrics.max_top_padding, percentage);
    let top_radius = lerp(metrics.min_top_radius, metrics.max_top_radius, percentage);
    let bottom_radius = lerp(metrics.min_bottom_radius, metrics.max_bottom_radius, percentage);
    let bottom_padding = lerp(metrics.min_bottom_padding, metrics.max_bottom_padding, percentage);

    let center_x = (bounds.width / 2.0).floor();
    let mut bottom_origin = Point::new(center_x, bounds.height - bottom_padding - bottom_radius);
    let mut triggered = false;

    let top_origin = if distance == 0.0 {
        Point::new(center_x, bottom_origin.y)
    } else {
        if percentage == 0.0 {
            bottom_origin.y -= vertical_shift.abs() - metrics.max_distance;
            triggered = true;
        }
        Point::new(center_x, bounds.height + offset + top_padding + top_radius)
    };

    DropSample {
        offset,
        vertical_shift,
        distance,
        percentage,
        top_padding,
        top_radius,
        bottom_radius,
        bottom_padding,
        arrow_size: lerp(metrics.min_arrow_size, metrics.max_arrow_size, percentage),
        arrow_radius: lerp(metrics.min_arrow_radius, metrics.max_arrow_radius, percentage),
        top_origin,
        bottom_origin,
        capsule_radius: lerp(
            metrics.min_bottom_radius,
            metrics.max_bottom_radius,
            metrics.capsule_blend,
        ),
        highlight_offset: metrics.highlight_offset,
        triggered,
    }
}

impl DropSample {
    /// Teardrop outline: top semicircle, left curve, bottom semicircle,
    /// right curve
    pub fn body_path(&self) -> Path {
        let top = self.top_origin;
        let bottom = self.bottom_origin;
        let (top_r, bottom_r) = (self.top_radius, self.bottom_radius);
        let curve_y = lerp(top.y, bottom.y, CURVE_DROP);

        let left_cp1 = Point::new(lerp(top.x - top_r, bottom.x - bottom_r, CURVE_NEAR), curve_y);
        let left_cp2 = Point::new(lerp(top.x - top_r, bottom.x - bottom_r, CURVE_FAR), curve_y);
        let left_end = Point::new(bottom.x - bottom_r, bottom.y);

        let right_cp1 = Point::new(lerp(top.x + top_r, bottom.x + bottom_r, CURVE_FAR), curve_y);
        let right_cp2 = Point::new(lerp(top.x + top_r, bottom.x + bottom_r, CURVE_NEAR), curve_y);
        let right_end = Point::new(top.x + top_r, top.y);

        Path::builder()
            .arc(top, top_r, 0.0, PI, true)
            .cubic_to(left_cp1, left_cp2, left_end)
            .arc(bottom, bottom_r, PI, 0.0, true)
            .cubic_to(right_cp1, right_cp2, right_end)
            .close()
            .build()
    }

    /// Circular arrow glyph inside the top circle; fill it even-odd
    pub fn arrow_path(&self) -> Path {
        let top = self.top_origin;
        let size = self.arrow_size;
        let big = self.arrow_radius + size / 2.0;
        let small = self.arrow_radius - size / 2.0;

        Path::builder()
            .arc(top, big, 0.0, 3.0 * PI / 2.0, false)
            .line_to(top.x, top.y - big - size)
            .line_to(top.x + 2.0 * size, top.y - big + size / 2.0)
            .line_to(top.x, top.y - big + 2.0 * size)
            .line_to(top.x, top.y - big + size)
            .arc(top, small, 3.0 * PI / 2.0, 0.0, true)
            .close()
            .build()
    }

    /// Lens-shaped gloss over the top circle; fill it non-zero
    pub fn highlight_path(&self) -> Path {
        let top = self.top_origin;
        let lower = top.offset(0.0, self.highlight_offset);

        Path::builder()
            .arc(top, self.top_radius, 0.0, PI, true)
            .arc(lower, self.top_radius, PI, 0.0, false)
            .close()
            .build()
    }

    /// Small capsule at the top circle, recorded with the same verbs as
    /// [`DropSample::body_path`] so the body can morph into it
    pub fn capsule_path(&self) -> Path {
        let top = self.top_origin;
        let r = self.capsule_radius;
        let left = Point::new(top.x - r, top.y);
        let right = Point::new(top.x + r, top.y);

        Path::builder()
            .arc(top, r, 0.0, PI, true)
            .cubic_to(left, left, left)
            .arc(top, r, PI, 0.0, true)
            .cubic_to(right, right, right)
            .close()
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droplet_paint::PathCommand;
    use proptest::prelude::*;

    const BOUNDS: Size = Size::new(320.0, 400.0);

    fn sample(offset: f32) -> DropSample {
        sample_drop(offset, BOUNDS, &RefreshMetrics::default())
    }

    fn arc_center(command: &PathCommand) -> Point {
        match command {
            PathCommand::ArcTo { center, .. } => *center,
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(12.5, 16.0, 0.0), 12.5);
        assert_eq!(lerp(12.5, 16.0, 1.0), 16.0);
        assert!((lerp(3.0, 16.0, 0.2) - 5.6).abs() < 1e-5);
    }

    #[test]
    fn test_rest_sample_collapses_top_onto_bottom() {
        let rest = sample(0.0);
        assert_eq!(rest.distance, 0.0);
        assert_eq!(rest.percentage, 1.0);
        assert_eq!(rest.top_origin, rest.bottom_origin);
        assert_eq!(rest.bottom_origin, Point::new(160.0, 400.0 - 6.0 - 16.0));
        assert!(!rest.triggered);
    }

    #[test]
    fn test_pull_within_resting_extent_does_not_stretch() {
        let shallow = sample(-40.0);
        assert_eq!(shallow.vertical_shift, 0.0);
        assert_eq!(shallow.percentage, 1.0);
    }

    #[test]
    fn test_partial_pull_interpolates() {
        // 43 + (-69.5) = -26.5, half of the 53 trigger distance
        let half = sample(-69.5);
        assert_eq!(half.distance, 26.5);
        assert_eq!(half.percentage, 0.5);
        assert_eq!(half.top_radius, 14.25);
        assert_eq!(half.bottom_radius, 9.5);
        assert_eq!(half.top_origin.y, 400.0 - 69.5 + 7.0 + 14.25);
        assert!(!half.triggered);
    }

    #[test]
    fn test_trigger_at_threshold() {
        let metrics = RefreshMetrics::default();
        assert!(!sample(metrics.trigger_offset() + 0.5).triggered);

        let at = sample(metrics.trigger_offset());
        assert!(at.triggered);
        assert_eq!(at.percentage, 0.0);
        assert_eq!(at.top_radius, metrics.min_top_radius);

        let beyond = sample(-110.0);
        assert!(beyond.triggered);
        // excess pull past the threshold lifts the bottom circle
        assert_eq!(beyond.bottom_origin.y, 400.0 - 4.0 - 3.0 - 14.0);
    }

    #[test]
    fn test_sixty_point_pull_is_still_a_pull() {
        let pull = sample(-60.0);
        assert!(!pull.triggered);
        assert!(pull.percentage > 0.0 && pull.percentage < 1.0);
        assert!(!pull.body_path().is_empty());
    }

    #[test]
    fn test_body_path_layout() {
        let body = sample(-80.0).body_path();
        let commands = body.commands();
        assert_eq!(commands.len(), 5);
        assert!(matches!(commands[0], PathCommand::ArcTo { clockwise: true, .. }));
        assert!(matches!(commands[1], PathCommand::CubicTo { .. }));
        assert!(matches!(commands[2], PathCommand::ArcTo { clockwise: true, .. }));
        assert!(matches!(commands[3], PathCommand::CubicTo { .. }));
        assert!(body.is_closed());
    }

    #[test]
    fn test_body_curves_are_mirrored() {
        let s = sample(-80.0);
        let body = s.body_path();
        let (left, right) = match (body.commands()[1], body.commands()[3]) {
            (
                PathCommand::CubicTo { control1: l1, control2: l2, .. },
                PathCommand::CubicTo { control1: r1, control2: r2, .. },
            ) => ((l1, l2), (r1, r2)),
            other => panic!("unexpected commands {other:?}"),
        };
        let cx = s.top_origin.x;
        assert!((cx - left.0.x - (right.1.x - cx)).abs() < 1e-4);
        assert!((cx - left.1.x - (right.0.x - cx)).abs() < 1e-4);
    }

    #[test]
    fn test_arrow_path_outline() {
        let s = sample(0.0);
        let arrow = s.arrow_path();
        assert_eq!(arrow.len(), 7);
        assert_eq!(arrow.arcs().count(), 2);
        match arrow.commands()[1] {
            PathCommand::LineTo(tip) => assert_eq!(tip.y, s.top_origin.y - 8.5 - 3.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_highlight_lens_offset() {
        let s = sample(-70.0);
        let highlight = s.highlight_path();
        let arcs: Vec<_> = highlight.arcs().collect();
        assert_eq!(arcs.len(), 2);
        assert_eq!(arc_center(arcs[0]), s.top_origin);
        assert_eq!(arc_center(arcs[1]).y, s.top_origin.y + 1.25);
    }

    #[test]
    fn test_capsule_morphs_from_body() {
        let s = sample(-100.0);
        let capsule = s.capsule_path();
        assert!(s.body_path().is_morph_compatible(&capsule));
        assert!((s.capsule_radius - 5.6).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_lerp_stays_between_endpoints(a in -100.0f32..100.0, b in -100.0f32..100.0, p in 0.0f32..=1.0) {
            let value = lerp(a, b, p);
            prop_assert!(value >= a.min(b) - 1e-3 && value <= a.max(b) + 1e-3);
        }

        #[test]
        fn prop_lerp_is_monotonic(a in -100.0f32..100.0, b in -100.0f32..100.0, p in 0.0f32..=1.0, q in 0.0f32..=1.0) {
            let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
            let (v_lo, v_hi) = (lerp(a, b, lo), lerp(a, b, hi));
            if a <= b {
                prop_assert!(v_lo <= v_hi + 1e-3);
            } else {
                prop_assert!(v_lo + 1e-3 >= v_hi);
            }
        }

        #[test]
        fn prop_percentage_in_unit_range(offset in -500.0f32..500.0) {
            let s = sample(offset);
            prop_assert!((0.0..=1.0).contains(&s.percentage));
            prop_assert!(s.distance <= 53.0);
        }

        #[test]
        fn prop_shallow_pulls_never_trigger(offset in -95.9f32..0.0) {
            let s = sample(offset);
            prop_assert!(!s.triggered);
            prop_assert!(!s.body_path().is_empty());
        }
    }
}
