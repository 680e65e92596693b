// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Screen axes and axis masks

use bitflags::bitflags;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// One of the two screen axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis
    pub fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Component of a vector along this axis
    pub fn of(self, v: Vec2) -> f64 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    /// Coordinate of a point along this axis
    pub fn of_point(self, p: Point) -> f64 {
        match self {
            Axis::Horizontal => p.x,
            Axis::Vertical => p.y,
        }
    }

    /// Copy of `p` with its coordinate along this axis replaced
    pub fn with_point(self, p: Point, value: f64) -> Point {
        match self {
            Axis::Horizontal => Point::new(value, p.y),
            Axis::Vertical => Point::new(p.x, value),
        }
    }

    /// Copy of `v` with its component along this axis replaced
    pub fn with_vec(self, v: Vec2, value: f64) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(value, v.y),
            Axis::Vertical => Vec2::new(v.x, value),
        }
    }

    /// The single-axis mask for this axis
    pub fn mask(self) -> AxisMask {
        match self {
            Axis::Horizontal => AxisMask::HORIZONTAL,
            Axis::Vertical => AxisMask::VERTICAL,
        }
    }
}

bitflags! {
    /// Set of axes an operation is allowed on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AxisMask: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
        const BOTH = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl AxisMask {
    /// Zero out the components of `v` on axes outside the mask
    pub fn mask_vec(self, v: Vec2, neutral: f64) -> Vec2 {
        Vec2::new(
            if self.contains(AxisMask::HORIZONTAL) { v.x } else { neutral },
            if self.contains(AxisMask::VERTICAL) { v.y } else { neutral },
        )
    }
}
