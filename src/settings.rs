// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Interaction settings and tuning constants.
//!
//! These are the compile-time defaults. Every value that a deployment may
//! want to tune is mirrored in `config::ViewportConfig`, which falls back to
//! the constants below for any field missing from the config file.

// ============================================================================
// PINCH SETTINGS
// ============================================================================
/// Finger distance (screen pixels, per axis) below which a pinch axis is
/// treated as degenerate and produces a neutral ratio
const MIN_PINCH_SIZE: f64 = 20.0;

/// Keep the dominant axis of the first pinch frame for the whole gesture
/// instead of re-evaluating it on every frame
const LOCK_AXIS_PER_GESTURE: bool = false;

// ============================================================================
// WHEEL SETTINGS
// ============================================================================
/// Range ratio applied for one wheel-up notch (range halves: zoom in)
const SCROLL_ZOOM_IN: f64 = 0.5;

/// Range ratio applied for one wheel-down notch (range doubles: zoom out)
const SCROLL_ZOOM_OUT: f64 = 2.0;

// ============================================================================
// ZOOM BOX SETTINGS
// ============================================================================
/// Smallest zoom rectangle, as a fraction of the frame area, that is still
/// committed on release. Anything smaller is an accidental tap-drag.
const MIN_ZOOM_BOX_FRACTION: f64 = 0.0025; // 5% x 5%

// ============================================================================
// MARKER SETTINGS
// ============================================================================
/// Minimum touch target edge for markers (screen pixels)
const MIN_TOUCH_SIZE: f64 = 44.0;

/// Depth of the strip along a grid edge where edge markers can be grabbed
const EDGE_DEPTH: f64 = 40.0;

// ============================================================================
// WATCHDOG SETTINGS
// ============================================================================
/// A claim held this long without a new gesture frame is force-released
const WATCHDOG_TIMEOUT_MS: u64 = 3_000;

// ============================================================================
// DIVISION SETTINGS
// ============================================================================
/// Smallest allowed full-scale range as a fraction of the initial range
const MIN_RANGE_FACTOR: f64 = 1e-6;

/// Largest allowed full-scale range as a multiple of the initial range
const MAX_RANGE_FACTOR: f64 = 1e6;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Pinch interpretation
pub mod pinch {
    /// Degenerate finger distance threshold (screen pixels)
    pub const MIN_PINCH_SIZE: f64 = super::MIN_PINCH_SIZE;

    /// Keep the first frame's axis for the whole gesture
    pub const LOCK_AXIS_PER_GESTURE: bool = super::LOCK_AXIS_PER_GESTURE;
}

/// Mouse wheel zoom ratios
pub mod scroll {
    /// Wheel up
    pub const ZOOM_IN: f64 = super::SCROLL_ZOOM_IN;

    /// Wheel down
    pub const ZOOM_OUT: f64 = super::SCROLL_ZOOM_OUT;
}

/// Rectangular zoom gesture
pub mod zoom_box {
    pub const MIN_FRACTION: f64 = super::MIN_ZOOM_BOX_FRACTION;
}

/// Marker touch targets
pub mod marker {
    /// Minimum touch target edge (screen pixels)
    pub const MIN_TOUCH_SIZE: f64 = super::MIN_TOUCH_SIZE;

    /// Grab strip depth along grid edges (screen pixels)
    pub const EDGE_DEPTH: f64 = super::EDGE_DEPTH;
}

/// Stuck-claim recovery
pub mod watchdog {
    pub const TIMEOUT_MS: u64 = super::WATCHDOG_TIMEOUT_MS;
}

/// Limits applied when zooming a division
pub mod division {
    pub const MIN_RANGE_FACTOR: f64 = super::MIN_RANGE_FACTOR;
    pub const MAX_RANGE_FACTOR: f64 = super::MAX_RANGE_FACTOR;
}
