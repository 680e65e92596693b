// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Grid frame kinds and the interaction flags they select

use crate::editing::viewport::LocalOrigin;
use crate::model::AxisMask;
use serde::{Deserialize, Serialize};

/// What a grid displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameKind {
    /// Analog channels: time on X, voltage on Y
    Analog,
    /// Logic channels: time on X, fixed lanes on Y
    Digital,
    /// Spectrum: frequency on X, magnitude on Y
    Frequency,
    /// Channel A against channel B
    Xy,
    /// Scrolling history of a measurement
    Measurement,
}

/// Interaction flags selected once from a `FrameKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBehavior {
    pub origin: LocalOrigin,
    /// Axes a pinch or zoom box may scale
    pub zoom_axes: AxisMask,
    /// Axes a drag may pan
    pub pan_axes: AxisMask,
    /// Axes the mouse wheel scales
    pub scroll_axes: AxisMask,
    /// Whether a modifier-drag draws a zoom rectangle
    pub zoom_box: bool,
}

impl FrameKind {
    /// Resolve the interaction flags for this kind
    pub fn behavior(self) -> FrameBehavior {
        match self {
            FrameKind::Analog => FrameBehavior {
                origin: LocalOrigin::Centered,
                zoom_axes: AxisMask::BOTH,
                pan_axes: AxisMask::BOTH,
                scroll_axes: AxisMask::HORIZONTAL,
                zoom_box: true,
            },
            FrameKind::Digital => FrameBehavior {
                origin: LocalOrigin::Centered,
                zoom_axes: AxisMask::HORIZONTAL,
                pan_axes: AxisMask::HORIZONTAL,
                scroll_axes: AxisMask::HORIZONTAL,
                zoom_box: true,
            },
            FrameKind::Frequency => FrameBehavior {
                origin: LocalOrigin::Centered,
                zoom_axes: AxisMask::BOTH,
                pan_axes: AxisMask::BOTH,
                scroll_axes: AxisMask::HORIZONTAL,
                zoom_box: true,
            },
            FrameKind::Xy => FrameBehavior {
                origin: LocalOrigin::Centered,
                zoom_axes: AxisMask::BOTH,
                pan_axes: AxisMask::BOTH,
                scroll_axes: AxisMask::BOTH,
                zoom_box: true,
            },
            FrameKind::Measurement => FrameBehavior {
                origin: LocalOrigin::TopLeft,
                zoom_axes: AxisMask::empty(),
                pan_axes: AxisMask::HORIZONTAL,
                scroll_axes: AxisMask::empty(),
                zoom_box: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digital_frames_never_scale_vertically() {
        let behavior = FrameKind::Digital.behavior();
        assert!(!behavior.zoom_axes.contains(AxisMask::VERTICAL));
        assert!(!behavior.pan_axes.contains(AxisMask::VERTICAL));
    }

    #[test]
    fn measurement_frames_only_scroll_history() {
        let behavior = FrameKind::Measurement.behavior();
        assert!(behavior.zoom_axes.is_empty());
        assert_eq!(behavior.pan_axes, AxisMask::HORIZONTAL);
        assert!(!behavior.zoom_box);
        assert_eq!(behavior.origin, LocalOrigin::TopLeft);
    }
}
