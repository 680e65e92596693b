// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Two-finger pinch interpreter.
//!
//! A pinch zooms one axis at a time. On every frame the axis whose finger
//! distance changed the most wins, and the range ratio on that axis is the
//! previous finger distance over the current one: spreading the fingers
//! shrinks the visible range.
//!
//! Two guards keep the output sane:
//! - fingers closer than `min_pinch_size` on the zoom axis give a ratio of
//!   exactly 1, both on the frame where they get too close and on the first
//!   frame after they separate again
//! - fingers that cross over produce a negative ratio; that frame and the
//!   rest of the sequence are dropped

use crate::editing::gesture::{GestureEvent, GestureKind};
use crate::model::Axis;
use crate::tools::{GestureTool, ToolCtx, ToolId, ViewportChange, ViewportEvent};
use kurbo::{Point, Vec2};

#[derive(Debug, Clone, Copy, Default)]
enum PinchState {
    #[default]
    Idle,
    Active {
        first: Point,
        second: Point,
        /// Zoom axis chosen on the previous frame
        axis: Option<Axis>,
    },
    /// Fingers crossed; ignore everything until the sequence completes
    Mirrored,
}

/// Pinch-to-zoom interpreter
#[derive(Debug, Clone, Default)]
pub struct PinchTool {
    state: PinchState,
}

impl GestureTool for PinchTool {
    fn id(&self) -> ToolId {
        ToolId::Pinch
    }

    fn handle(&mut self, event: &GestureEvent, ctx: &ToolCtx<'_>) -> Vec<ViewportEvent> {
        match event.kind {
            GestureKind::Pinch => self.pinch_frame(event, ctx),
            GestureKind::PinchComplete => self.complete(),
            _ => Vec::new(),
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.state, PinchState::Idle)
    }

    fn cancel(&mut self) {
        self.state = PinchState::Idle;
    }
}

impl PinchTool {
    fn pinch_frame(&mut self, event: &GestureEvent, ctx: &ToolCtx<'_>) -> Vec<ViewportEvent> {
        let Some(second) = event.position2 else {
            tracing::debug!(position = ?event.position, "pinch frame without second finger");
            return Vec::new();
        };
        let first = event.position;
        let midpoint = first.midpoint(second);
        let pivot = ctx.frame.screen_to_local(midpoint);

        match self.state {
            PinchState::Idle => {
                self.state = PinchState::Active {
                    first,
                    second,
                    axis: None,
                };
                vec![
                    ViewportEvent::Begin,
                    ViewportEvent::Change(ViewportChange::neutral(pivot, true)),
                ]
            }
            PinchState::Mirrored => {
                tracing::trace!("dropping pinch frame after mirror");
                Vec::new()
            }
            PinchState::Active {
                first: prev_first,
                second: prev_second,
                axis: prev_axis,
            } => {
                let previous = prev_second - prev_first;
                let current = second - first;
                let axis = if ctx.config.lock_axis_per_gesture && let Some(locked) = prev_axis {
                    locked
                } else {
                    dominant_axis(previous, current, prev_axis)
                };

                let ratio = pinch_ratio(
                    axis.of(previous),
                    axis.of(current),
                    ctx.config.min_pinch_size,
                );
                if ratio < 0.0 {
                    tracing::debug!(?axis, ratio, "fingers crossed, dropping rest of pinch");
                    self.state = PinchState::Mirrored;
                    return Vec::new();
                }

                let screen_pan = midpoint - prev_first.midpoint(prev_second);
                let pan_offset = axis
                    .mask()
                    .mask_vec(ctx.frame.screen_delta_to_local(screen_pan), 0.0);

                self.state = PinchState::Active {
                    first,
                    second,
                    axis: Some(axis),
                };
                vec![ViewportEvent::Change(ViewportChange {
                    ratio: axis.with_vec(Vec2::new(1.0, 1.0), ratio),
                    pivot,
                    pan_offset,
                    is_start: false,
                })]
            }
        }
    }

    fn complete(&mut self) -> Vec<ViewportEvent> {
        match std::mem::take(&mut self.state) {
            PinchState::Idle => Vec::new(),
            PinchState::Active { .. } | PinchState::Mirrored => vec![ViewportEvent::End],
        }
    }
}

/// Axis whose absolute finger distance changed the most; ties keep the
/// previous axis
fn dominant_axis(previous: Vec2, current: Vec2, prev_axis: Option<Axis>) -> Axis {
    let dx = (current.x.abs() - previous.x.abs()).abs();
    let dy = (current.y.abs() - previous.y.abs()).abs();
    if dx > dy {
        Axis::Horizontal
    } else if dy > dx {
        Axis::Vertical
    } else {
        prev_axis.unwrap_or(Axis::Horizontal)
    }
}

/// Signed ratio of finger distances along one axis, neutral when either
/// distance is degenerate
fn pinch_ratio(previous: f64, current: f64, min_size: f64) -> f64 {
    if current.abs() < min_size || previous.abs() < min_size {
        return 1.0;
    }
    previous / current
}
