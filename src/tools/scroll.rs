// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Mouse wheel zoom

use crate::editing::gesture::{GestureEvent, GestureKind};
use crate::tools::{GestureTool, ToolCtx, ToolId, ViewportChange, ViewportEvent};
use kurbo::Vec2;

/// Zooms by a fixed ratio per wheel notch, about the pointer
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollTool;

impl GestureTool for ScrollTool {
    fn id(&self) -> ToolId {
        ToolId::Scroll
    }

    fn handle(&mut self, event: &GestureEvent, ctx: &ToolCtx<'_>) -> Vec<ViewportEvent> {
        if event.kind != GestureKind::Scroll {
            return Vec::new();
        }
        let ratio = if event.delta.y < 0.0 {
            ctx.config.scroll_zoom_in
        } else if event.delta.y > 0.0 {
            ctx.config.scroll_zoom_out
        } else {
            return Vec::new();
        };

        let ratio = ctx
            .behavior
            .scroll_axes
            .mask_vec(Vec2::new(ratio, ratio), 1.0);
        if ratio == Vec2::new(1.0, 1.0) {
            return Vec::new();
        }
        vec![ViewportEvent::Change(ViewportChange {
            ratio,
            pivot: ctx.frame.screen_to_local(event.position),
            pan_offset: Vec2::ZERO,
            is_start: true,
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;
    use crate::editing::viewport::{CoordinateFrame, LocalOrigin};
    use crate::model::FrameKind;
    use kurbo::{Point, Rect};

    fn scroll(kind: FrameKind, amount: f64) -> Vec<ViewportEvent> {
        let frame = CoordinateFrame::new(Rect::new(0.0, 0.0, 400.0, 400.0), LocalOrigin::Centered);
        let config = ViewportConfig::default();
        let ctx = ToolCtx {
            frame: &frame,
            behavior: kind.behavior(),
            config: &config,
        };
        ScrollTool.handle(&GestureEvent::scroll(Point::new(300.0, 200.0), amount), &ctx)
    }

    #[test]
    fn wheel_up_zooms_in_about_pointer() {
        let out = scroll(FrameKind::Analog, -1.0);
        let [ViewportEvent::Change(change)] = out.as_slice() else {
            panic!("expected one change, got {out:?}");
        };
        assert_eq!(change.ratio, Vec2::new(0.5, 1.0));
        assert!((change.pivot - Point::new(0.25, 0.0)).hypot() < 1e-12);
    }

    #[test]
    fn wheel_down_zooms_out_on_scroll_axes() {
        let out = scroll(FrameKind::Xy, 1.0);
        let [ViewportEvent::Change(change)] = out.as_slice() else {
            panic!("expected one change, got {out:?}");
        };
        assert_eq!(change.ratio, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn no_scroll_axes_means_no_output() {
        assert!(scroll(FrameKind::Measurement, -1.0).is_empty());
        assert!(scroll(FrameKind::Analog, 0.0).is_empty());
    }
}
