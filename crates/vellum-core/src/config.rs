#![forbid(unsafe_code)]

//! Timing configuration.
//!
//! Every duration Vellum uses lives in [`TimingConfig`]. Defaults reproduce
//! the stock behavior; hosts may override individual values, and with the
//! `config` feature load them from TOML:
//!
//! ```toml
//! resize_quiet_ms = 500
//! height_tween_ms = 120
//! ```
//!
//! Missing keys keep their defaults. A zero duration is rejected.

use std::fmt;

use web_time::Duration;

/// Errors produced while building a [`TimingConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration field was zero.
    ZeroDuration(&'static str),
    /// The TOML source could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDuration(field) => write!(f, "{field} must be greater than zero"),
            Self::Parse(msg) => write!(f, "invalid timing config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct TimingConfig {
    /// Quiet period after the last resize before the resize flag clears.
    pub resize_quiet_ms: u64,
    /// How long a link click keeps the navigating flag set.
    pub navigation_window_ms: u64,
    /// Modal backdrop fade duration.
    pub backdrop_fade_ms: u64,
    /// Modal panel slide duration.
    pub panel_slide_ms: u64,
    /// Modal height tween duration.
    pub height_tween_ms: u64,
    /// Close button hover rotation duration.
    pub close_rotate_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            resize_quiet_ms: 1000,
            navigation_window_ms: 5000,
            backdrop_fade_ms: 100,
            panel_slide_ms: 200,
            height_tween_ms: 150,
            close_rotate_ms: 200,
        }
    }
}

impl TimingConfig {
    /// Reject zero durations.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let fields = [
            ("resize_quiet_ms", self.resize_quiet_ms),
            ("navigation_window_ms", self.navigation_window_ms),
            ("backdrop_fade_ms", self.backdrop_fade_ms),
            ("panel_slide_ms", self.panel_slide_ms),
            ("height_tween_ms", self.height_tween_ms),
            ("close_rotate_ms", self.close_rotate_ms),
        ];
        match fields.iter().find(|(_, ms)| *ms == 0) {
            Some((name, _)) => Err(ConfigError::ZeroDuration(*name)),
            None => Ok(self),
        }
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "config")]
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    #[must_use]
    pub fn resize_quiet(&self) -> Duration {
        Duration::from_millis(self.resize_quiet_ms)
    }

    #[must_use]
    pub fn navigation_window(&self) -> Duration {
        Duration::from_millis(self.navigation_window_ms)
    }

    #[must_use]
    pub fn backdrop_fade(&self) -> Duration {
        Duration::from_millis(self.backdrop_fade_ms)
    }

    #[must_use]
    pub fn panel_slide(&self) -> Duration {
        Duration::from_millis(self.panel_slide_ms)
    }

    #[must_use]
    pub fn height_tween(&self) -> Duration {
        Duration::from_millis(self.height_tween_ms)
    }

    #[must_use]
    pub fn close_rotate(&self) -> Duration {
        Duration::from_millis(self.close_rotate_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_timings() {
        let config = TimingConfig::default();
        assert_eq!(config.resize_quiet(), Duration::from_secs(1));
        assert_eq!(config.navigation_window(), Duration::from_secs(5));
        assert_eq!(config.height_tween(), Duration::from_millis(150));
        assert_eq!(config.validate(), Ok(config));
    }

    #[test]
    fn zero_duration_rejected() {
        let config = TimingConfig {
            panel_slide_ms: 0,
            ..TimingConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDuration("panel_slide_ms"))
        );
        assert_eq!(
            ConfigError::ZeroDuration("panel_slide_ms").to_string(),
            "panel_slide_ms must be greater than zero"
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_overrides_keep_defaults() {
        let config = TimingConfig::from_toml_str("resize_quiet_ms = 250\n").unwrap();
        assert_eq!(config.resize_quiet_ms, 250);
        assert_eq!(config.navigation_window_ms, 5000);
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_errors_are_reported() {
        assert!(matches!(
            TimingConfig::from_toml_str("resize_quiet_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            TimingConfig::from_toml_str("bogus = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            TimingConfig::from_toml_str("height_tween_ms = 0"),
            Err(ConfigError::ZeroDuration("height_tween_ms"))
        );
    }
}
