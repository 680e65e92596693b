// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene nodes and the behavior hooks they expose

use crate::components::context::{DetachCtx, GestureCtx, TickCtx};
use crate::editing::gesture::{GestureEvent, GestureMask};
use kurbo::Rect;
use std::time::Instant;

slotmap::new_key_type! {
    /// Stable identifier of a node in a `SceneTree`
    pub struct NodeId;
}

/// What a node does. Everything has a default so plain containers need no
/// behavior at all.
pub trait NodeBehavior {
    /// Gesture kinds this node can claim
    fn supported_gestures(&self) -> GestureMask {
        GestureMask::empty()
    }

    /// The node's screen rectangle changed
    fn on_resize(&mut self, _boundaries: Rect) {}

    /// Screen rectangles that accept touches, derived from the boundaries
    fn interactive_rects(&self, boundaries: Rect) -> Vec<Rect> {
        vec![boundaries]
    }

    /// Handle a gesture the arbiter routed to this node
    fn on_gesture(&mut self, _ctx: &mut GestureCtx<'_>, _event: &GestureEvent) {}

    /// Called once per frame after input dispatch
    fn tick(&mut self, _ctx: &mut TickCtx<'_>, _now: Instant) {}

    /// The node is being removed from the tree. Nodes whose existence
    /// depends on this one can be queued for removal through `ctx`.
    fn on_detach(&mut self, _ctx: &mut DetachCtx) {}
}

/// A rectangular node in the scene tree
pub struct Node {
    pub(crate) boundaries: Rect,
    pub(crate) visible: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) interactive: Vec<Rect>,
    pub(crate) supported: GestureMask,
    pub(crate) redraw_requested: bool,
    pub(crate) draw_on_top: bool,
    pub(crate) behavior: Option<Box<dyn NodeBehavior>>,
}

impl Node {
    pub(crate) fn new(
        parent: Option<NodeId>,
        boundaries: Rect,
        behavior: Option<Box<dyn NodeBehavior>>,
    ) -> Self {
        let mut node = Self {
            boundaries,
            visible: true,
            parent,
            children: Vec::new(),
            interactive: Vec::new(),
            supported: GestureMask::empty(),
            redraw_requested: true,
            draw_on_top: false,
            behavior,
        };
        node.refresh_interactive();
        node
    }

    /// Screen rectangle
    pub fn boundaries(&self) -> Rect {
        self.boundaries
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Touch-accepting rectangles, screen space
    pub fn interactive(&self) -> &[Rect] {
        &self.interactive
    }

    pub fn supported(&self) -> GestureMask {
        self.supported
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Drawn after (and hit-tested before) regular siblings
    pub fn draw_on_top(&self) -> bool {
        self.draw_on_top
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// Re-derive interactive rectangles and supported gestures
    pub(crate) fn refresh_interactive(&mut self) {
        match &self.behavior {
            Some(behavior) => {
                self.interactive = behavior.interactive_rects(self.boundaries);
                self.supported = behavior.supported_gestures();
            }
            None => {
                self.interactive = vec![self.boundaries];
                self.supported = GestureMask::empty();
            }
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("boundaries", &self.boundaries)
            .field("visible", &self.visible)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("supported", &self.supported)
            .field("draw_on_top", &self.draw_on_top)
            .finish_non_exhaustive()
    }
}
