// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Logical axis divisions: normalized position <-> physical quantity.
//!
//! A `Division` describes what one axis of a grid shows: the physical span
//! across the whole frame (`full_scale`) and the value at local coordinate 0
//! (`offset`). For a centered frame that is the value at the center line,
//! for a top-left frame the value at the left/top edge.
//!
//! The gesture interpreters never touch divisions. `Division::apply` is the
//! reference way a grid callback turns a `ViewportChange` into a new
//! time/div or volts/div setting.

use crate::model::Axis;
use crate::settings;
use crate::tools::ViewportChange;
use serde::{Deserialize, Serialize};

/// Physical unit shown on an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    Seconds,
    Volts,
    Hertz,
    Decibels,
    Samples,
    #[default]
    None,
}

impl Unit {
    fn symbol(self) -> &'static str {
        match self {
            Unit::Seconds => "s",
            Unit::Volts => "V",
            Unit::Hertz => "Hz",
            Unit::Decibels => "dB",
            Unit::Samples => "S",
            Unit::None => "",
        }
    }
}

/// Full-scale range and offset of one grid axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Division {
    pub unit: Unit,
    /// Physical span across the whole frame
    pub full_scale: f64,
    /// Physical value at local coordinate 0
    pub offset: f64,
    /// Number of grid divisions drawn across the frame
    pub divisions: u32,
    min_full_scale: f64,
    max_full_scale: f64,
}

impl Division {
    /// Create a division. Zoom limits are derived from the initial range.
    pub fn new(unit: Unit, full_scale: f64, offset: f64, divisions: u32) -> Self {
        let span = full_scale.abs().max(f64::MIN_POSITIVE);
        Self {
            unit,
            full_scale,
            offset,
            divisions: divisions.max(1),
            min_full_scale: span * settings::division::MIN_RANGE_FACTOR,
            max_full_scale: span * settings::division::MAX_RANGE_FACTOR,
        }
    }

    /// Physical value of one grid division
    pub fn per_division(&self) -> f64 {
        self.full_scale / self.divisions as f64
    }

    /// Convert a normalized local coordinate to a physical value
    pub fn to_physical(&self, local: f64) -> f64 {
        self.offset + local * self.full_scale
    }

    /// Convert a physical value to a normalized local coordinate
    pub fn to_local(&self, value: f64) -> f64 {
        if self.full_scale == 0.0 {
            return 0.0;
        }
        (value - self.offset) / self.full_scale
    }

    /// Translate the visible range so content follows a local drag delta
    pub fn pan(&mut self, local_delta: f64) {
        self.offset -= local_delta * self.full_scale;
    }

    /// Scale the visible range about a local pivot.
    ///
    /// The physical value under the pivot is unchanged. The resulting range
    /// is clamped to the division's limits; the applied ratio is returned.
    pub fn zoom(&mut self, ratio: f64, pivot: f64) -> f64 {
        if !ratio.is_finite() || ratio <= 0.0 {
            tracing::debug!(ratio, "ignoring non-positive zoom ratio");
            return 1.0;
        }
        let sign = self.full_scale.signum();
        let span = self.full_scale.abs();
        let new_span = (span * ratio).clamp(self.min_full_scale, self.max_full_scale);
        let new_full = sign * new_span;
        self.offset += pivot * (self.full_scale - new_full);
        let applied = new_span / span;
        self.full_scale = new_full;
        applied
    }

    /// Apply one axis of a viewport change: pan first, then zoom about the
    /// pivot
    pub fn apply(&mut self, change: &ViewportChange, axis: Axis) {
        self.pan(axis.of(change.pan_offset));
        let ratio = axis.of(change.ratio);
        if ratio != 1.0 {
            self.zoom(ratio, axis.of_point(change.pivot));
        }
    }

    /// Format a physical value with an SI prefix, e.g. `1.50 ms`
    pub fn format(&self, value: f64) -> String {
        format_si(value, self.unit)
    }
}

/// The horizontal and vertical division of one grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDivisions {
    pub horizontal: Division,
    pub vertical: Division,
}

impl AxisDivisions {
    pub fn new(horizontal: Division, vertical: Division) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn get(&self, axis: Axis) -> &Division {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut Division {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    /// Physical value of a local coordinate along `axis`
    pub fn to_physical(&self, axis: Axis, local: f64) -> f64 {
        self.get(axis).to_physical(local)
    }

    /// Apply both axes of a change
    pub fn apply(&mut self, change: &ViewportChange) {
        self.horizontal.apply(change, Axis::Horizontal);
        self.vertical.apply(change, Axis::Vertical);
    }
}

/// Format a value with an SI prefix and unit symbol
pub fn format_si(value: f64, unit: Unit) -> String {
    const PREFIXES: [(f64, &str); 8] = [
        (1e9, "G"),
        (1e6, "M"),
        (1e3, "k"),
        (1.0, ""),
        (1e-3, "m"),
        (1e-6, "µ"),
        (1e-9, "n"),
        (1e-12, "p"),
    ];
    let magnitude = value.abs();
    let (scale, prefix) = if magnitude == 0.0 || !magnitude.is_finite() {
        (1.0, "")
    } else {
        PREFIXES
            .iter()
            .copied()
            .find(|(scale, _)| magnitude >= *scale)
            .unwrap_or(PREFIXES[PREFIXES.len() - 1])
    };
    format!("{:.2} {}{}", value / scale, prefix, unit.symbol())
        .trim_end()
        .to_string()
}
