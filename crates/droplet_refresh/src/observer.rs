//! Offset observation decisions
//!
//! The control reacts to every content offset change. These functions hold
//! the decisions it makes, free of host access, so they can be tested alone:
//!
//! - while idle, [`gate_offset`] decides whether the drop is drawn at all and
//!   when a finished refresh re-arms;
//! - while refreshing, the `pinned_*` functions keep the spinner and the
//!   opened inset attached to the top of the content.

use droplet_core::{EdgeInsets, Point, Size};
use serde::{Deserialize, Serialize};

use crate::metrics::RefreshMetrics;

/// How a fast upward fling with the finger lifted is treated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastScrollPolicy {
    /// Draw and trigger as usual
    #[default]
    Disabled,
    /// Stop drawing and disarm until the offset returns to rest
    Suppress,
}

/// Result of gating an offset sample while not refreshing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetGate {
    /// New value of the re-arm flag
    pub can_refresh: bool,
    /// The header probe must run again on the next pinned session
    pub reset_inset_probe: bool,
    /// Draw the drop for this sample; when false all paths are cleared
    pub draw: bool,
}

/// Decide whether to draw and whether a pull may trigger again
pub fn gate_offset(
    offset: f32,
    last_offset: f32,
    can_refresh: bool,
    is_tracking: bool,
    policy: FastScrollPolicy,
) -> OffsetGate {
    let mut gate = OffsetGate {
        can_refresh,
        reset_inset_probe: false,
        draw: true,
    };

    if !can_refresh {
        if offset >= 0.0 {
            // scrolled out of view: re-arm
            gate.can_refresh = true;
            gate.reset_inset_probe = true;
        } else {
            gate.draw = false;
        }
    } else if offset >= 0.0 {
        gate.draw = false;
    }

    let flinging = offset > 0.0 && last_offset > offset && !is_tracking;
    if flinging && policy == FastScrollPolicy::Suppress {
        gate.can_refresh = false;
        gate.draw = false;
    }

    gate
}

/// Host state read while pinning a running refresh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinnedInput {
    pub offset: f32,
    pub is_dragging: bool,
    pub did_set_inset: bool,
    pub has_section_headers: bool,
    pub original_inset: EdgeInsets,
}

/// The section header probe runs once per pinned session, the first time
/// the content settles inside the opened area without a finger on it
pub fn needs_header_probe(input: &PinnedInput, metrics: &RefreshMetrics) -> bool {
    in_opened_area(input.offset, metrics) && !input.is_dragging && !input.did_set_inset
}

fn in_opened_area(offset: f32, metrics: &RefreshMetrics) -> bool {
    offset < 0.0 && offset >= -metrics.opened_height
}

/// Inset to write while refreshing, or `None` to leave the host alone
///
/// Hosts with pinned section headers get an inset that follows the content
/// so the headers do not float over the spinner; other hosts get the full
/// opened height.
pub fn pinned_inset(input: &PinnedInput, metrics: &RefreshMetrics) -> Option<EdgeInsets> {
    let original = input.original_inset;

    if in_opened_area(input.offset, metrics) {
        if !input.is_dragging {
            let extra = if input.has_section_headers {
                (-input.offset).min(metrics.opened_height)
            } else {
                metrics.opened_height
            };
            Some(original.with_top(extra + original.top))
        } else if input.did_set_inset && input.has_section_headers {
            Some(original.with_top(-input.offset + original.top))
        } else {
            None
        }
    } else if input.offset > 0.0 && input.has_section_headers {
        Some(original)
    } else {
        None
    }
}

/// Body layer position that keeps the collapsed drop at the content's top
pub fn pinned_layer_position(offset: f32, metrics: &RefreshMetrics) -> Point {
    Point::new(0.0, metrics.max_distance + offset + metrics.opened_height)
}

/// Spinner center for a refresh pinned at `offset`; follows the content
/// down a deep pull but never sits lower than the middle of the opened area
pub fn pinned_spinner_center(offset: f32, bounds: Size, metrics: &RefreshMetrics) -> Point {
    let opened = metrics.opened_height;
    Point::new(
        (bounds.width / 2.0).floor(),
        (offset + bounds.height + (opened / 2.0).floor()).min(bounds.height - opened / 2.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned(offset: f32) -> PinnedInput {
        PinnedInput {
            offset,
            is_dragging: false,
            did_set_inset: false,
            has_section_headers: false,
            original_inset: EdgeInsets::ZERO,
        }
    }

    #[test]
    fn test_gate_draws_only_below_rest() {
        let gate = gate_offset(-30.0, 0.0, true, true, FastScrollPolicy::Disabled);
        assert!(gate.draw);
        assert!(gate.can_refresh);

        let gate = gate_offset(10.0, 0.0, true, true, FastScrollPolicy::Disabled);
        assert!(!gate.draw);
    }

    #[test]
    fn test_gate_rearms_at_rest() {
        let gate = gate_offset(-30.0, -40.0, false, true, FastScrollPolicy::Disabled);
        assert_eq!(
            gate,
            OffsetGate {
                can_refresh: false,
                reset_inset_probe: false,
                draw: false
            }
        );

        let gate = gate_offset(0.0, -30.0, false, false, FastScrollPolicy::Disabled);
        assert!(gate.can_refresh);
        assert!(gate.reset_inset_probe);
        assert!(gate.draw);
    }

    #[test]
    fn test_fast_scroll_only_suppresses_when_enabled() {
        let off = gate_offset(20.0, 40.0, false, false, FastScrollPolicy::Disabled);
        assert!(off.can_refresh);

        let on = gate_offset(20.0, 40.0, false, false, FastScrollPolicy::Suppress);
        assert!(!on.can_refresh);
        assert!(!on.draw);

        let tracking = gate_offset(20.0, 40.0, false, true, FastScrollPolicy::Suppress);
        assert!(tracking.can_refresh);
    }

    #[test]
    fn test_pinned_inset_without_headers_opens_fully() {
        let metrics = RefreshMetrics::default();
        let input = pinned(-10.0);
        assert!(needs_header_probe(&input, &metrics));
        assert_eq!(
            pinned_inset(&input, &metrics),
            Some(EdgeInsets::new(44.0, 0.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_pinned_inset_with_headers_follows_content() {
        let metrics = RefreshMetrics::default();
        let input = PinnedInput {
            has_section_headers: true,
            did_set_inset: true,
            original_inset: EdgeInsets::new(20.0, 0.0, 0.0, 0.0),
            ..pinned(-20.0)
        };
        assert!(!needs_header_probe(&input, &metrics));
        assert_eq!(
            pinned_inset(&input, &metrics),
            Some(EdgeInsets::new(40.0, 0.0, 0.0, 0.0))
        );

        let dragging = PinnedInput {
            is_dragging: true,
            ..input
        };
        assert_eq!(
            pinned_inset(&dragging, &metrics),
            Some(EdgeInsets::new(40.0, 0.0, 0.0, 0.0))
        );

        let scrolled_away = PinnedInput {
            offset: 30.0,
            ..input
        };
        assert_eq!(pinned_inset(&scrolled_away, &metrics), Some(input.original_inset));
    }

    #[test]
    fn test_pinned_inset_ignores_deep_pulls() {
        let metrics = RefreshMetrics::default();
        assert_eq!(pinned_inset(&pinned(-80.0), &metrics), None);
        assert_eq!(pinned_inset(&pinned(30.0), &metrics), None);
        let dragging = PinnedInput {
            is_dragging: true,
            ..pinned(-10.0)
        };
        assert_eq!(pinned_inset(&dragging, &metrics), None);
    }

    #[test]
    fn test_spinner_center_is_capped() {
        let metrics = RefreshMetrics::default();
        let bounds = Size::new(321.0, 400.0);
        assert_eq!(
            pinned_spinner_center(0.0, bounds, &metrics),
            Point::new(160.0, 378.0)
        );
        assert_eq!(
            pinned_spinner_center(30.0, bounds, &metrics),
            Point::new(160.0, 378.0)
        );
        // pulled past the opened area, the spinner rides with the content
        assert_eq!(
            pinned_spinner_center(-60.0, bounds, &metrics),
            Point::new(160.0, 362.0)
        );
    }
}
