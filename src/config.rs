// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Runtime interaction configuration loaded from TOML.
//!
//! Every field is optional in the file; missing fields take the defaults
//! from `settings`.

use crate::error::ConfigError;
use crate::settings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunable thresholds shared by every grid in a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Degenerate pinch threshold (screen pixels)
    pub min_pinch_size: f64,
    /// Keep the first frame's dominant axis for a whole pinch
    pub lock_axis_per_gesture: bool,
    /// Ratio for one wheel-up notch
    pub scroll_zoom_in: f64,
    /// Ratio for one wheel-down notch
    pub scroll_zoom_out: f64,
    /// Smallest committed zoom box, as a fraction of the frame area
    pub min_zoom_box_fraction: f64,
    /// Minimum marker touch target (screen pixels)
    pub min_touch_size: f64,
    /// Grab strip depth for edge markers (screen pixels)
    pub edge_depth: f64,
    /// Stuck-claim timeout in milliseconds
    pub watchdog_timeout_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_pinch_size: settings::pinch::MIN_PINCH_SIZE,
            lock_axis_per_gesture: settings::pinch::LOCK_AXIS_PER_GESTURE,
            scroll_zoom_in: settings::scroll::ZOOM_IN,
            scroll_zoom_out: settings::scroll::ZOOM_OUT,
            min_zoom_box_fraction: settings::zoom_box::MIN_FRACTION,
            min_touch_size: settings::marker::MIN_TOUCH_SIZE,
            edge_depth: settings::marker::EDGE_DEPTH,
            watchdog_timeout_ms: settings::watchdog::TIMEOUT_MS,
        }
    }
}

impl ViewportConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(?path, ?config, "loaded viewport config");
        Ok(config)
    }

    /// Watchdog timeout as a `Duration`
    pub fn watchdog_timeout(&self) -> Duration {
        Duration::from_millis(self.watchdog_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_pinch_size", self.min_pinch_size),
            ("scroll_zoom_in", self.scroll_zoom_in),
            ("scroll_zoom_out", self.scroll_zoom_out),
            ("min_touch_size", self.min_touch_size),
            ("edge_depth", self.edge_depth),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        if !(0.0..1.0).contains(&self.min_zoom_box_fraction) {
            return Err(ConfigError::Invalid {
                field: "min_zoom_box_fraction",
                value: self.min_zoom_box_fraction,
            });
        }
        Ok(())
    }
}
