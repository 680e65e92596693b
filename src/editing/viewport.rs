// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Screen <-> normalized local coordinate frame of a node.
//!
//! A `CoordinateFrame` is rebuilt from the node's screen rectangle on every
//! resize. Local space is resolution independent:
//!
//! - `TopLeft`: `[0,1] x [0,1]`, y grows downwards like the screen
//! - `Centered`: `[-0.5,0.5] x [-0.5,0.5]`, y grows upwards like a scope
//!   trace
//!
//! Rebuilding is idempotent and depends only on the rectangle.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Screen sizes below this are treated as unit size so the inverse stays
/// finite
const DEGENERATE_EXTENT: f64 = 1e-9;

/// Where local coordinate (0, 0) sits and which way y points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalOrigin {
    TopLeft,
    Centered,
}

impl LocalOrigin {
    /// Extent of local space
    pub fn bounds(self) -> Rect {
        match self {
            LocalOrigin::TopLeft => Rect::new(0.0, 0.0, 1.0, 1.0),
            LocalOrigin::Centered => Rect::new(-0.5, -0.5, 0.5, 0.5),
        }
    }
}

/// Affine mapping between a screen rectangle and normalized local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    screen: Rect,
    origin: LocalOrigin,
    to_screen: Affine,
    to_local: Affine,
}

impl CoordinateFrame {
    /// Build a frame for a screen rectangle
    pub fn new(screen: Rect, origin: LocalOrigin) -> Self {
        let mut frame = Self {
            screen,
            origin,
            to_screen: Affine::IDENTITY,
            to_local: Affine::IDENTITY,
        };
        frame.rebuild(screen);
        frame
    }

    /// Recompute both transforms from a new screen rectangle
    pub fn rebuild(&mut self, screen: Rect) {
        let screen = screen.abs();
        let mut width = screen.width();
        let mut height = screen.height();
        if width < DEGENERATE_EXTENT || height < DEGENERATE_EXTENT {
            tracing::trace!(?screen, "degenerate frame rectangle, using unit scale");
            width = width.max(1.0);
            height = height.max(1.0);
        }

        self.to_screen = match self.origin {
            LocalOrigin::TopLeft => Affine::new([width, 0.0, 0.0, height, screen.x0, screen.y0]),
            LocalOrigin::Centered => {
                let center = screen.center();
                Affine::new([width, 0.0, 0.0, -height, center.x, center.y])
            }
        };
        self.to_local = self.to_screen.inverse();
        self.screen = screen;
    }

    pub fn screen_rect(&self) -> Rect {
        self.screen
    }

    pub fn origin(&self) -> LocalOrigin {
        self.origin
    }

    /// Extent of local space
    pub fn local_bounds(&self) -> Rect {
        self.origin.bounds()
    }

    /// Local coordinate of the frame center
    pub fn local_center(&self) -> Point {
        self.local_bounds().center()
    }

    /// Whether a screen point lies inside the frame
    pub fn contains(&self, screen: Point) -> bool {
        self.screen.contains(screen)
    }

    pub fn screen_to_local(&self, screen: Point) -> Point {
        self.to_local * screen
    }

    pub fn local_to_screen(&self, local: Point) -> Point {
        self.to_screen * local
    }

    /// Map a screen displacement into local units
    pub fn screen_delta_to_local(&self, delta: Vec2) -> Vec2 {
        linear(self.to_local, delta)
    }

    /// Map a local displacement into screen pixels
    pub fn local_delta_to_screen(&self, delta: Vec2) -> Vec2 {
        linear(self.to_screen, delta)
    }

    pub fn screen_rect_to_local(&self, rect: Rect) -> Rect {
        self.to_local.transform_rect_bbox(rect)
    }

    pub fn local_rect_to_screen(&self, rect: Rect) -> Rect {
        self.to_screen.transform_rect_bbox(rect)
    }

    /// Transform for drawing geometry authored in local space
    pub fn to_screen_affine(&self) -> Affine {
        self.to_screen
    }

    /// Clamp a local point into local bounds
    pub fn clamp_local(&self, local: Point) -> Point {
        let bounds = self.local_bounds();
        Point::new(
            local.x.clamp(bounds.x0, bounds.x1),
            local.y.clamp(bounds.y0, bounds.y1),
        )
    }
}

fn linear(affine: Affine, v: Vec2) -> Vec2 {
    let [a, b, c, d, _, _] = affine.as_coeffs();
    Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
}
