// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene node wrapping a single marker.
//!
//! The node covers the whole grid but only accepts touches inside the
//! marker's touch rectangle, which is recomputed on every relayout.

use crate::components::context::{DetachCtx, GestureCtx};
use crate::components::grid::{GridEvent, GridShared, MarkerEvent, flush};
use crate::components::node::NodeBehavior;
use crate::editing::gesture::{GestureEvent, GestureKind, GestureMask};
use crate::markers::Indicator;
use crate::model::MarkerId;
use kurbo::Rect;
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) struct MarkerNode {
    shared: Rc<RefCell<GridShared>>,
    id: MarkerId,
}

impl MarkerNode {
    pub(crate) fn new(shared: Rc<RefCell<GridShared>>, id: MarkerId) -> Self {
        Self { shared, id }
    }

    fn drag(&mut self, ctx: &mut GestureCtx<'_>, event: &GestureEvent) {
        let mut state = self.shared.borrow_mut();
        state.watchdog.touch(ctx.now());
        let Some(position) = state.markers.get(self.id).map(Indicator::position) else {
            return;
        };
        let delta = state.frame.screen_delta_to_local(event.delta);
        let convert = state.converter();
        let is_delta = state
            .markers
            .get(self.id)
            .is_some_and(|marker| marker.as_delta().is_some());
        let moved = if is_delta {
            state.markers.translate_parents(self.id, delta, &convert)
        } else {
            state.markers.move_marker(self.id, position + delta, &convert)
        };
        match moved {
            Ok(moves) => {
                let local = state
                    .markers
                    .get(self.id)
                    .map_or(position, Indicator::position);
                state.emit(GridEvent::Marker(MarkerEvent::Dragged { id: self.id, local }));
                state.emit_moves(moves);
                ctx.request_layout();
            }
            Err(err) => tracing::warn!(id = ?self.id, "marker drag failed: {err}"),
        }
    }
}

impl NodeBehavior for MarkerNode {
    fn supported_gestures(&self) -> GestureMask {
        GestureMask::TAP | GestureMask::DRAG
    }

    fn interactive_rects(&self, _boundaries: Rect) -> Vec<Rect> {
        let state = self.shared.borrow();
        state
            .markers
            .touch_rect(
                self.id,
                &state.frame,
                state.config.min_touch_size,
                state.config.edge_depth,
            )
            .into_iter()
            .collect()
    }

    fn on_gesture(&mut self, ctx: &mut GestureCtx<'_>, event: &GestureEvent) {
        match event.kind {
            GestureKind::Tap => {
                let mut state = self.shared.borrow_mut();
                let local = state.frame.screen_to_local(event.position);
                state.emit(GridEvent::Marker(MarkerEvent::Touched { id: self.id, local }));
            }
            GestureKind::FreeDrag => self.drag(ctx, event),
            GestureKind::DragComplete => {
                let mut state = self.shared.borrow_mut();
                state.watchdog.disarm();
                let convert = state.converter();
                if let Some(value) = state.markers.value(self.id, &convert) {
                    state.emit(GridEvent::Marker(MarkerEvent::ValueConfirmed {
                        id: self.id,
                        value,
                    }));
                }
            }
            _ => {}
        }
        flush(&self.shared);
    }

    fn on_detach(&mut self, ctx: &mut DetachCtx) {
        let mut state = self.shared.borrow_mut();
        state.marker_nodes.remove(&self.id);
        if !state.markers.contains(self.id) {
            return;
        }
        // Node removed directly from the tree; drop the marker and the
        // nodes of everything derived from it
        match state.markers.remove(self.id) {
            Ok(removed) => {
                for id in removed {
                    if let Some(node) = state.marker_nodes.remove(&id) {
                        ctx.remove_node(node);
                    }
                }
            }
            Err(err) => tracing::warn!(id = ?self.id, "marker cleanup failed: {err}"),
        }
    }
}
