//! Geometric constants of the drop
//!
//! Each `min_*`/`max_*` pair is interpolated by the pull percentage: the
//! `max_*` value applies at rest (percentage 1.0) and the `min_*` value when
//! the pull reaches the trigger distance (percentage 0.0).

use serde::{Deserialize, Serialize};

use crate::error::{RefreshError, Result};

/// Named geometry parameters of the refresh control
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshMetrics {
    /// Height of the control view sitting above the host content
    pub total_height: f32,
    /// Inset reserved above the content while refreshing
    pub opened_height: f32,
    pub min_top_padding: f32,
    pub max_top_padding: f32,
    pub min_top_radius: f32,
    pub max_top_radius: f32,
    pub min_bottom_radius: f32,
    pub max_bottom_radius: f32,
    pub min_bottom_padding: f32,
    pub max_bottom_padding: f32,
    pub min_arrow_size: f32,
    pub max_arrow_size: f32,
    pub min_arrow_radius: f32,
    pub max_arrow_radius: f32,
    /// Stretch distance at which a pull triggers
    pub max_distance: f32,
    /// Vertical shift between the two arcs of the highlight lens
    pub highlight_offset: f32,
    /// Blend between min and max bottom radius used for the capsule
    pub capsule_blend: f32,
}

impl Default for RefreshMetrics {
    fn default() -> Self {
        Self {
            total_height: 400.0,
            opened_height: 44.0,
            min_top_padding: 9.0,
            max_top_padding: 5.0,
            min_top_radius: 12.5,
            max_top_radius: 16.0,
            min_bottom_radius: 3.0,
            max_bottom_radius: 16.0,
            min_bottom_padding: 4.0,
            max_bottom_padding: 6.0,
            min_arrow_size: 2.0,
            max_arrow_size: 3.0,
            min_arrow_radius: 5.0,
            max_arrow_radius: 7.0,
            max_distance: 53.0,
            highlight_offset: 1.25,
            capsule_blend: 0.2,
        }
    }
}

impl RefreshMetrics {
    /// Height the resting drop occupies: both max radii plus both max paddings
    pub fn rest_extent(&self) -> f32 {
        self.max_top_radius + self.max_bottom_radius + self.max_top_padding + self.max_bottom_padding
    }

    /// Pull offset at (or beyond) which a sample triggers a refresh
    pub fn trigger_offset(&self) -> f32 {
        -(self.rest_extent() + self.max_distance)
    }

    /// Reject values the geometry cannot work with
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("total_height", self.total_height),
            ("opened_height", self.opened_height),
            ("min_top_padding", self.min_top_padding),
            ("max_top_padding", self.max_top_padding),
            ("min_top_radius", self.min_top_radius),
            ("max_top_radius", self.max_top_radius),
            ("min_bottom_radius", self.min_bottom_radius),
            ("max_bottom_radius", self.max_bottom_radius),
            ("min_bottom_padding", self.min_bottom_padding),
            ("max_bottom_padding", self.max_bottom_padding),
            ("min_arrow_size", self.min_arrow_size),
            ("max_arrow_size", self.max_arrow_size),
            ("min_arrow_radius", self.min_arrow_radius),
            ("max_arrow_radius", self.max_arrow_radius),
            ("max_distance", self.max_distance),
            ("highlight_offset", self.highlight_offset),
            ("capsule_blend", self.capsule_blend),
        ];

        if let Some((name, value)) = fields
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(RefreshError::InvalidMetrics(format!(
                "{name} must be a finite, non-negative number (got {value})"
            )));
        }
        if self.max_distance == 0.0 {
            return Err(RefreshError::InvalidMetrics(
                "max_distance must be greater than zero".into(),
            ));
        }
        if self.opened_height > self.total_height {
            return Err(RefreshError::InvalidMetrics(format!(
                "opened_height ({}) exceeds total_height ({})",
                self.opened_height, self.total_height
            )));
        }
        if self.capsule_blend > 1.0 {
            return Err(RefreshError::InvalidMetrics(format!(
                "capsule_blend must lie in 0..=1 (got {})",
                self.capsule_blend
            )));
        }
        Ok(())
    }
}
