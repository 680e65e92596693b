// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Single-finger drag: pan, or a zoom rectangle when a modifier is held

use crate::editing::gesture::{GestureEvent, GestureKind};
use crate::tools::{GestureTool, ToolCtx, ToolId, ViewportChange, ViewportEvent};
use kurbo::{Point, Rect, Vec2};

#[derive(Debug, Clone, Copy, Default)]
enum DragState {
    #[default]
    Idle,
    Panning,
    /// Screen-space corners of the zoom rectangle
    ZoomBox { start: Point, current: Point },
}

/// Drag-to-pan and drag-to-zoom-box interpreter
#[derive(Debug, Clone, Default)]
pub struct DragTool {
    state: DragState,
}

impl GestureTool for DragTool {
    fn id(&self) -> ToolId {
        ToolId::Drag
    }

    fn handle(&mut self, event: &GestureEvent, ctx: &ToolCtx<'_>) -> Vec<ViewportEvent> {
        match event.kind {
            GestureKind::FreeDrag => self.drag_changed(event, ctx),
            GestureKind::DragComplete => self.drag_ended(event, ctx),
            _ => Vec::new(),
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

impl DragTool {
    fn drag_changed(&mut self, event: &GestureEvent, ctx: &ToolCtx<'_>) -> Vec<ViewportEvent> {
        match self.state {
            DragState::Idle => {
                if event.modifiers.zoom_box() && ctx.behavior.zoom_box {
                    // The first frame already carries the displacement from
                    // touch-down
                    let start = event.position - event.delta;
                    self.state = DragState::ZoomBox {
                        start,
                        current: event.position,
                    };
                    tracing::debug!(?start, "zoom box started");
                    vec![
                        ViewportEvent::Begin,
                        ViewportEvent::ZoomBoxPreview(Rect::from_points(start, event.position)),
                    ]
                } else {
                    self.state = DragState::Panning;
                    vec![
                        ViewportEvent::Begin,
                        ViewportEvent::Change(pan_change(event, ctx, true)),
                    ]
                }
            }
            DragState::Panning => vec![ViewportEvent::Change(pan_change(event, ctx, false))],
            DragState::ZoomBox { start, .. } => {
                self.state = DragState::ZoomBox {
                    start,
                    current: event.position,
                };
                vec![ViewportEvent::ZoomBoxPreview(Rect::from_points(
                    start,
                    event.position,
                ))]
            }
        }
    }

    fn drag_ended(&mut self, event: &GestureEvent, ctx: &ToolCtx<'_>) -> Vec<ViewportEvent> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => Vec::new(),
            DragState::Panning => vec![ViewportEvent::End],
            DragState::ZoomBox { start, .. } => {
                let screen = Rect::from_points(start, event.position);
                match zoom_box_change(screen, ctx) {
                    Some(change) => vec![ViewportEvent::Change(change), ViewportEvent::End],
                    None => vec![ViewportEvent::End],
                }
            }
        }
    }
}

fn pan_change(event: &GestureEvent, ctx: &ToolCtx<'_>, is_start: bool) -> ViewportChange {
    ViewportChange {
        ratio: Vec2::new(1.0, 1.0),
        pivot: ctx.frame.screen_to_local(event.position),
        pan_offset: ctx.frame.screen_delta_to_local(event.delta),
        is_start,
    }
}

/// Change that fills the frame with the local content under `screen`, or
/// `None` if the rectangle is too small to be intentional
fn zoom_box_change(screen: Rect, ctx: &ToolCtx<'_>) -> Option<ViewportChange> {
    let bounds = ctx.frame.local_bounds();
    let local = ctx.frame.screen_rect_to_local(screen);
    let fraction = local.area() / bounds.area();
    if fraction < ctx.config.min_zoom_box_fraction {
        tracing::debug!(fraction, "zoom box too small, dropping");
        return None;
    }
    let center = ctx.frame.local_center();
    Some(ViewportChange {
        ratio: Vec2::new(
            local.width() / bounds.width(),
            local.height() / bounds.height(),
        ),
        pivot: center,
        pan_offset: center - local.center(),
        is_start: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;
    use crate::editing::gesture::Modifiers;
    use crate::editing::viewport::{CoordinateFrame, LocalOrigin};
    use crate::model::FrameKind;

    fn run(tool: &mut DragTool, kind: FrameKind, event: GestureEvent) -> Vec<ViewportEvent> {
        let frame = CoordinateFrame::new(Rect::new(0.0, 0.0, 400.0, 400.0), LocalOrigin::Centered);
        let config = ViewportConfig::default();
        let ctx = ToolCtx {
            frame: &frame,
            behavior: kind.behavior(),
            config: &config,
        };
        tool.handle(&event, &ctx)
    }

    fn shift() -> Modifiers {
        Modifiers {
            shift: true,
            ..Modifiers::default()
        }
    }

    #[test]
    fn plain_drag_pans_in_local_units() {
        let mut tool = DragTool::default();
        let first = run(
            &mut tool,
            FrameKind::Analog,
            GestureEvent::drag(Point::new(240.0, 200.0), Vec2::new(40.0, 0.0)),
        );
        assert_eq!(first[0], ViewportEvent::Begin);
        let ViewportEvent::Change(change) = first[1] else {
            panic!("expected a change, got {first:?}");
        };
        assert!(change.is_start);
        assert!((change.pan_offset.x - 0.1).abs() < 1e-12);

        let next = run(
            &mut tool,
            FrameKind::Analog,
            GestureEvent::drag(Point::new(240.0, 220.0), Vec2::new(0.0, 20.0)),
        );
        let ViewportEvent::Change(change) = next[0] else {
            panic!("expected a change, got {next:?}");
        };
        assert!(!change.is_start);
        // Screen down is local down in a centered frame
        assert!((change.pan_offset.y + 0.05).abs() < 1e-12);

        let done = run(
            &mut tool,
            FrameKind::Analog,
            GestureEvent::drag_complete(Point::new(240.0, 220.0)),
        );
        assert_eq!(done, vec![ViewportEvent::End]);
        assert!(!tool.is_active());
    }

    #[test]
    fn modifier_drag_commits_zoom_box() {
        let mut tool = DragTool::default();
        let first = run(
            &mut tool,
            FrameKind::Analog,
            GestureEvent::drag(Point::new(220.0, 150.0), Vec2::new(20.0, 0.0)).with_modifiers(shift()),
        );
        assert_eq!(
            first,
            vec![
                ViewportEvent::Begin,
                ViewportEvent::ZoomBoxPreview(Rect::new(200.0, 150.0, 220.0, 150.0)),
            ]
        );
        run(
            &mut tool,
            FrameKind::Analog,
            GestureEvent::drag(Point::new(300.0, 250.0), Vec2::new(80.0, 100.0)),
        );

        let done = run(
            &mut tool,
            FrameKind::Analog,
            GestureEvent::drag_complete(Point::new(300.0, 250.0)),
        );
        let ViewportEvent::Change(change) = done[0] else {
            panic!("expected a change, got {done:?}");
        };
        assert!((change.ratio.x - 0.25).abs() < 1e-12);
        assert!((change.ratio.y - 0.25).abs() < 1e-12);
        assert_eq!(change.pivot, Point::ZERO);
        // Box center is screen (250, 200), local (0.125, 0)
        assert!((change.pan_offset.x + 0.125).abs() < 1e-12);
        assert!(change.pan_offset.y.abs() < 1e-12);
        assert_eq!(done[1], ViewportEvent::End);
    }

    #[test]
    fn tiny_zoom_box_is_dropped() {
        let mut tool = DragTool::default();
        run(
            &mut tool,
            FrameKind::Analog,
            GestureEvent::drag(Point::new(205.0, 205.0), Vec2::new(5.0, 5.0)).with_modifiers(shift()),
        );
        let done = run(
            &mut tool,
            FrameKind::Analog,
            GestureEvent::drag_complete(Point::new(205.0, 205.0)),
        );
        assert_eq!(done, vec![ViewportEvent::End]);
    }

    #[test]
    fn zoom_box_needs_frame_support() {
        let mut tool = DragTool::default();
        let first = run(
            &mut tool,
            FrameKind::Measurement,
            GestureEvent::drag(Point::new(220.0, 150.0), Vec2::new(20.0, 0.0)).with_modifiers(shift()),
        );
        assert!(matches!(first[1], ViewportEvent::Change(_)));
    }
}
