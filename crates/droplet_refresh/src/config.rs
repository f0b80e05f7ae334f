//! Refresh control configuration (droplet.toml)
//!
//! Every section is optional; missing keys fall back to the built-in look.
//!
//! ```toml
//! fast_scroll = "suppress"
//!
//! [metrics]
//! opened_height = 50.0
//!
//! [timing]
//! collapse_ms = 300.0
//!
//! [appearance]
//! tint = "#FF8000"
//! spinner_style = "white_large"
//! ```

use std::fs;
use std::path::Path;

use droplet_animation::{Easing, Timing};
use droplet_paint::Color;
use serde::{Deserialize, Serialize};

use crate::error::{RefreshError, Result};
use crate::metrics::RefreshMetrics;
use crate::observer::FastScrollPolicy;
use crate::spinner::SpinnerStyle;

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub fast_scroll: FastScrollPolicy,
    pub metrics: RefreshMetrics,
    pub timing: TimingConfig,
    pub appearance: AppearanceConfig,
}

/// Durations of the trigger and end animations, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Body morph into the capsule
    pub morph_ms: f32,
    pub body_fade_delay_ms: f32,
    pub body_fade_ms: f32,
    /// Arrow and highlight fade
    pub glyph_fade_ms: f32,
    pub spinner_delay_ms: f32,
    pub spinner_reveal_ms: f32,
    /// Layer fade when a refresh is started programmatically
    pub begin_fade_ms: f32,
    /// Inset restore and spinner collapse after an end request
    pub collapse_ms: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            morph_ms: 150.0,
            body_fade_delay_ms: 100.0,
            body_fade_ms: 100.0,
            glyph_fade_ms: 100.0,
            spinner_delay_ms: 150.0,
            spinner_reveal_ms: 200.0,
            begin_fade_ms: 0.1,
            collapse_ms: 400.0,
        }
    }
}

impl TimingConfig {
    /// Spinner fade-in after a trigger
    pub fn spinner_reveal(&self) -> Timing {
        Timing::new(self.spinner_reveal_ms)
            .with_delay(self.spinner_delay_ms)
            .with_easing(Easing::Linear)
    }

    /// Collapse block after an end request
    pub fn collapse(&self) -> Timing {
        Timing::new(self.collapse_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("morph_ms", self.morph_ms),
            ("body_fade_delay_ms", self.body_fade_delay_ms),
            ("body_fade_ms", self.body_fade_ms),
            ("glyph_fade_ms", self.glyph_fade_ms),
            ("spinner_delay_ms", self.spinner_delay_ms),
            ("spinner_reveal_ms", self.spinner_reveal_ms),
            ("begin_fade_ms", self.begin_fade_ms),
            ("collapse_ms", self.collapse_ms),
        ];
        match fields
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            Some((name, value)) => Err(RefreshError::InvalidTiming(format!(
                "{name} must be a finite, non-negative duration (got {value})"
            ))),
            None => Ok(()),
        }
    }
}

/// Default drop tint, a cool light gray
pub fn default_tint() -> Color {
    Color::from_rgba8(155, 162, 172, 255)
}

/// Colors and spinner look
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub tint: Color,
    /// Overrides the spinner style's own color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spinner_color: Option<Color>,
    pub spinner_style: SpinnerStyle,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            tint: default_tint(),
            spinner_color: None,
            spinner_style: SpinnerStyle::Gray,
        }
    }
}

impl RefreshConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| RefreshError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded refresh config");
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.metrics.validate()?;
        self.timing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RefreshConfig::from_toml_str("").unwrap();
        assert_eq!(config, RefreshConfig::default());
        assert_eq!(config.fast_scroll, FastScrollPolicy::Disabled);
        assert_eq!(config.appearance.tint.to_rgba8(), [155, 162, 172, 255]);
    }

    #[test]
    fn test_partial_overrides() {
        let config = RefreshConfig::from_toml_str(
            r##"
            fast_scroll = "suppress"

            [metrics]
            opened_height = 50.0

            [timing]
            collapse_ms = 300.0

            [appearance]
            tint = "#FF8000"
            spinner_color = "#FFFFFF"
            spinner_style = "white_large"
            "##,
        )
        .unwrap();

        assert_eq!(config.fast_scroll, FastScrollPolicy::Suppress);
        assert_eq!(config.metrics.opened_height, 50.0);
        assert_eq!(config.metrics.max_distance, 53.0);
        assert_eq!(config.timing.collapse_ms, 300.0);
        assert_eq!(config.timing.morph_ms, 150.0);
        assert_eq!(config.appearance.tint.to_rgba8(), [255, 128, 0, 255]);
        assert_eq!(config.appearance.spinner_color, Some(Color::WHITE));
        assert_eq!(config.appearance.spinner_style, SpinnerStyle::WhiteLarge);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = RefreshConfig::from_toml_str("[timing]\ncollapse_ms = -1.0").unwrap_err();
        assert!(matches!(err, RefreshError::InvalidTiming(_)));

        let err = RefreshConfig::from_toml_str("[metrics]\nmax_distance = 0.0").unwrap_err();
        assert!(matches!(err, RefreshError::InvalidMetrics(_)));

        let err = RefreshConfig::from_toml_str("[appearance]\ntint = \"teal\"").unwrap_err();
        assert!(matches!(err, RefreshError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = RefreshConfig::load(Path::new("/nonexistent/droplet.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/droplet.toml"));
    }

    #[test]
    fn test_written_config_reads_back() {
        let mut config = RefreshConfig::default();
        config.appearance.tint = Color::ORANGE;
        config.timing.collapse_ms = 250.0;

        let text = config.to_toml().unwrap();
        let parsed = RefreshConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.timing, config.timing);
        assert_eq!(parsed.appearance.tint.to_rgba8(), Color::ORANGE.to_rgba8());
    }
}
