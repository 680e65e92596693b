// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Gesture interpreters for grid viewports.
//!
//! Each tool turns one family of raw gestures (two-finger pinch,
//! single-finger drag, mouse wheel) into viewport deltas expressed in the
//! grid's normalized local space. Tools never touch divisions or markers;
//! the grid forwards their output to its callback.

use crate::config::ViewportConfig;
use crate::editing::gesture::{GestureEvent, GestureKind};
use crate::editing::viewport::CoordinateFrame;
use crate::model::{AxisMask, FrameBehavior};
use kurbo::{Point, Rect, Vec2};
use serde::Serialize;

pub mod drag;
pub mod pinch;
pub mod scroll;

pub use drag::DragTool;
pub use pinch::PinchTool;
pub use scroll::ScrollTool;

// ===== Viewport Deltas =====

/// One zoom/pan step in local coordinates.
///
/// A consumer applies the pan first and then scales about `pivot`; see
/// `Division::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportChange {
    /// Range scale per axis; below 1 zooms in, exactly 1 leaves the axis
    pub ratio: Vec2,
    /// Fixed point of the zoom, local space
    pub pivot: Point,
    /// Content displacement, local space
    pub pan_offset: Vec2,
    /// First change of a gesture sequence
    pub is_start: bool,
}

impl ViewportChange {
    /// A change that does nothing
    pub fn neutral(pivot: Point, is_start: bool) -> Self {
        Self {
            ratio: Vec2::new(1.0, 1.0),
            pivot,
            pan_offset: Vec2::ZERO,
            is_start,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.ratio == Vec2::new(1.0, 1.0) && self.pan_offset == Vec2::ZERO
    }

    /// Restrict zoom and pan to the allowed axes
    pub fn masked(self, zoom_axes: AxisMask, pan_axes: AxisMask) -> Self {
        Self {
            ratio: zoom_axes.mask_vec(self.ratio, 1.0),
            pan_offset: pan_axes.mask_vec(self.pan_offset, 0.0),
            ..self
        }
    }
}

/// Output of a gesture tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ViewportEvent {
    /// A continuous gesture started
    Begin,
    Change(ViewportChange),
    /// Current zoom rectangle, screen space
    ZoomBoxPreview(Rect),
    /// A continuous gesture ended
    End,
}

// ===== Tool Identifier =====

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    Pinch,
    Drag,
    Scroll,
}

impl ToolId {
    /// The tool responsible for a gesture kind, if any
    pub fn for_gesture(kind: GestureKind) -> Option<Self> {
        match kind {
            GestureKind::Pinch | GestureKind::PinchComplete => Some(ToolId::Pinch),
            GestureKind::FreeDrag | GestureKind::DragComplete => Some(ToolId::Drag),
            GestureKind::Scroll => Some(ToolId::Scroll),
            GestureKind::Tap | GestureKind::DoubleTap | GestureKind::Hold => None,
        }
    }
}

// ===== Tool Trait =====

/// What a tool needs to know about the grid it works on
#[derive(Debug, Clone, Copy)]
pub struct ToolCtx<'a> {
    pub frame: &'a CoordinateFrame,
    pub behavior: FrameBehavior,
    pub config: &'a ViewportConfig,
}

/// A gesture interpreter
pub trait GestureTool {
    fn id(&self) -> ToolId;

    /// Interpret one event, returning zero or more viewport events
    fn handle(&mut self, event: &GestureEvent, ctx: &ToolCtx<'_>) -> Vec<ViewportEvent>;

    /// Whether a continuous gesture is in progress
    fn is_active(&self) -> bool {
        false
    }

    /// Abandon the gesture in progress without emitting anything
    fn cancel(&mut self) {}
}

// ===== Tool Set =====

/// The tools owned by one grid
#[derive(Debug, Clone, Default)]
pub struct ViewportTools {
    pinch: PinchTool,
    drag: DragTool,
    scroll: ScrollTool,
}

impl ViewportTools {
    pub fn new() -> Self {
        Self::default()
    }

    fn tool_mut(&mut self, id: ToolId) -> &mut dyn GestureTool {
        match id {
            ToolId::Pinch => &mut self.pinch,
            ToolId::Drag => &mut self.drag,
            ToolId::Scroll => &mut self.scroll,
        }
    }

    /// Route an event to its tool and mask the resulting changes with the
    /// frame's allowed axes. Changes that masking leaves neutral are
    /// dropped; a tool's own neutral start frame passes through.
    pub fn handle(&mut self, event: &GestureEvent, ctx: &ToolCtx<'_>) -> Vec<ViewportEvent> {
        let Some(id) = ToolId::for_gesture(event.kind) else {
            return Vec::new();
        };
        let behavior = ctx.behavior;
        let mut out = self.hand_over(id, event.kind);
        let produced = self
            .tool_mut(id)
            .handle(event, ctx)
            .into_iter()
            .filter_map(|out| match out {
                ViewportEvent::Change(change) => {
                    let masked = change.masked(behavior.zoom_axes, behavior.pan_axes);
                    let start_marker = change.is_start && change.is_neutral();
                    if masked.is_neutral() && !start_marker {
                        tracing::trace!(?change, "suppressing neutral viewport change");
                        None
                    } else {
                        Some(ViewportEvent::Change(masked))
                    }
                }
                other => Some(other),
            });
        out.extend(produced);
        out
    }

    /// A second finger landing during a drag, or one lifting during a pinch,
    /// switches tools mid-claim. The gesture in progress is closed first so
    /// every `Begin` gets its `End`.
    fn hand_over(&mut self, to: ToolId, kind: GestureKind) -> Vec<ViewportEvent> {
        if !matches!(kind, GestureKind::Pinch | GestureKind::FreeDrag) {
            return Vec::new();
        }
        let mut out = Vec::new();
        for from in [ToolId::Pinch, ToolId::Drag] {
            let tool = self.tool_mut(from);
            if from != to && tool.is_active() {
                tool.cancel();
                tracing::debug!(?from, ?to, "gesture handed over");
                out.push(ViewportEvent::End);
            }
        }
        out
    }

    /// Whether any continuous gesture is in progress
    pub fn is_active(&self) -> bool {
        self.pinch.is_active() || self.drag.is_active()
    }

    /// Abandon every gesture in progress. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        for id in [ToolId::Pinch, ToolId::Drag, ToolId::Scroll] {
            self.tool_mut(id).cancel();
        }
        was_active
    }
}
