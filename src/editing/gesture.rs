// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Gesture events as delivered by the input backend.
//!
//! One `GestureEvent` is produced per raw input event. Positions are
//! absolute screen pixels with the origin at the top-left corner.

use bitflags::bitflags;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Kind of gesture event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    Tap,
    DoubleTap,
    Hold,
    /// One frame of a single-finger drag
    FreeDrag,
    /// Finger lifted after a drag
    DragComplete,
    /// One frame of a two-finger pinch
    Pinch,
    /// Fingers lifted after a pinch
    PinchComplete,
    /// Mouse wheel notch
    Scroll,
}

impl GestureKind {
    /// The mask bit for this kind
    pub fn mask(self) -> GestureMask {
        match self {
            GestureKind::Tap => GestureMask::TAP,
            GestureKind::DoubleTap => GestureMask::DOUBLE_TAP,
            GestureKind::Hold => GestureMask::HOLD,
            GestureKind::FreeDrag => GestureMask::FREE_DRAG,
            GestureKind::DragComplete => GestureMask::DRAG_COMPLETE,
            GestureKind::Pinch => GestureMask::PINCH,
            GestureKind::PinchComplete => GestureMask::PINCH_COMPLETE,
            GestureKind::Scroll => GestureMask::SCROLL,
        }
    }

    /// Completion events end a continuous sequence and can never start one
    pub fn is_completion(self) -> bool {
        matches!(self, GestureKind::DragComplete | GestureKind::PinchComplete)
    }

    /// Events that are a whole gesture on their own
    pub fn is_single_shot(self) -> bool {
        matches!(
            self,
            GestureKind::Tap | GestureKind::DoubleTap | GestureKind::Hold | GestureKind::Scroll
        )
    }

    /// Events after which the claim must be given up
    pub fn is_terminal(self) -> bool {
        self.is_completion() || self.is_single_shot()
    }
}

bitflags! {
    /// Set of gesture kinds a node accepts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GestureMask: u16 {
        const TAP = 1 << 0;
        const DOUBLE_TAP = 1 << 1;
        const HOLD = 1 << 2;
        const FREE_DRAG = 1 << 3;
        const DRAG_COMPLETE = 1 << 4;
        const PINCH = 1 << 5;
        const PINCH_COMPLETE = 1 << 6;
        const SCROLL = 1 << 7;

        const TAPS = Self::TAP.bits() | Self::DOUBLE_TAP.bits() | Self::HOLD.bits();
        const DRAG = Self::FREE_DRAG.bits() | Self::DRAG_COMPLETE.bits();
        const PINCHES = Self::PINCH.bits() | Self::PINCH_COMPLETE.bits();
        const ALL = Self::TAPS.bits() | Self::DRAG.bits() | Self::PINCHES.bits() | Self::SCROLL.bits();
    }
}

impl GestureMask {
    /// Whether the mask accepts `kind`
    pub fn accepts(self, kind: GestureKind) -> bool {
        self.contains(kind.mask())
    }
}

/// Keyboard modifier state at the time of the event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Modifier combination that turns a drag into a zoom rectangle
    pub fn zoom_box(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// A single gesture event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,
    /// Primary finger or pointer, screen space
    pub position: Point,
    /// Second finger, two-finger gestures only
    #[serde(default)]
    pub position2: Option<Point>,
    /// Frame-to-frame displacement; for `Scroll`, negative `y` is wheel up
    #[serde(default)]
    pub delta: Vec2,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl GestureEvent {
    /// Create an event with no delta, second finger, or modifiers
    pub fn new(kind: GestureKind, position: Point) -> Self {
        Self {
            kind,
            position,
            position2: None,
            delta: Vec2::ZERO,
            modifiers: Modifiers::default(),
        }
    }

    pub fn tap(position: Point) -> Self {
        Self::new(GestureKind::Tap, position)
    }

    pub fn double_tap(position: Point) -> Self {
        Self::new(GestureKind::DoubleTap, position)
    }

    pub fn hold(position: Point) -> Self {
        Self::new(GestureKind::Hold, position)
    }

    pub fn drag(position: Point, delta: Vec2) -> Self {
        Self {
            delta,
            ..Self::new(GestureKind::FreeDrag, position)
        }
    }

    pub fn drag_complete(position: Point) -> Self {
        Self::new(GestureKind::DragComplete, position)
    }

    pub fn pinch(first: Point, second: Point) -> Self {
        Self {
            position2: Some(second),
            ..Self::new(GestureKind::Pinch, first)
        }
    }

    pub fn pinch_complete(position: Point) -> Self {
        Self::new(GestureKind::PinchComplete, position)
    }

    /// Wheel notch at `position`; negative `amount` is wheel up
    pub fn scroll(position: Point, amount: f64) -> Self {
        Self {
            delta: Vec2::new(0.0, amount),
            ..Self::new(GestureKind::Scroll, position)
        }
    }

    /// Same event with modifiers attached
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Point used for hit testing: the finger midpoint for two-finger
    /// gestures, the primary position otherwise
    pub fn hit_point(&self) -> Point {
        match self.position2 {
            Some(second) => self.position.midpoint(second),
            None => self.position,
        }
    }
}
