// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Per-frame driver tying the tree, the arbiter, and the input queue
//! together.
//!
//! Input arrives between frames through `push_event`. `frame` drains the
//! queue in order, runs the tick hooks (watchdogs live there), refreshes
//! layout once and hands back what must be drawn.

use crate::components::grid::{GridCallback, GridHandle, GridNode};
use crate::components::node::NodeId;
use crate::components::tree::{DrawItem, SceneTree};
use crate::config::ViewportConfig;
use crate::editing::arbiter::GestureArbiter;
use crate::editing::gesture::GestureEvent;
use crate::error::SceneError;
use crate::model::{AxisDivisions, FrameKind, MarkerId};
use kurbo::Rect;
use std::collections::VecDeque;
use std::time::Instant;

/// What one frame did
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Events dispatched this frame, paired with the node that took them
    pub handled: Vec<(GestureEvent, Option<NodeId>)>,
    /// Nodes to draw, back to front
    pub draw: Vec<DrawItem>,
}

pub struct Scene {
    tree: SceneTree,
    arbiter: GestureArbiter,
    queue: VecDeque<GestureEvent>,
    config: ViewportConfig,
}

impl Scene {
    pub fn new(screen: Rect, config: ViewportConfig) -> Self {
        Self {
            tree: SceneTree::new(screen),
            arbiter: GestureArbiter::new(),
            queue: VecDeque::new(),
            config,
        }
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    pub fn arbiter(&self) -> &GestureArbiter {
        &self.arbiter
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Node currently holding the gesture claim
    pub fn claimant(&self) -> Option<NodeId> {
        self.arbiter.claimant()
    }

    /// Queue an event for the next frame
    pub fn push_event(&mut self, event: GestureEvent) {
        self.queue.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch a single event immediately, bypassing the queue
    pub fn dispatch_now(&mut self, event: &GestureEvent, now: Instant) -> Option<NodeId> {
        self.tree.dispatch(&mut self.arbiter, event, now)
    }

    /// Run one frame
    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let mut handled = Vec::with_capacity(self.queue.len());
        while let Some(event) = self.queue.pop_front() {
            let node = self.tree.dispatch(&mut self.arbiter, &event, now);
            handled.push((event, node));
        }
        self.tree.tick(&mut self.arbiter, now);
        self.tree.relayout_if_needed();
        let draw = self.tree.draw_list();
        self.tree.clear_redraw();
        FrameReport { handled, draw }
    }

    /// Remove a node and its subtree
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        self.tree.remove(id, &mut self.arbiter)
    }

    /// Add a grid under `parent` using the scene's configuration
    pub fn attach_grid(
        &mut self,
        parent: NodeId,
        rect: Rect,
        kind: FrameKind,
        divisions: AxisDivisions,
        callback: GridCallback,
    ) -> Result<GridHandle, SceneError> {
        GridNode::attach(
            &mut self.tree,
            parent,
            rect,
            kind,
            divisions,
            self.config,
            callback,
        )
    }

    /// Remove a marker from a grid, including its node
    pub fn remove_marker(
        &mut self,
        grid: &GridHandle,
        id: MarkerId,
    ) -> Result<Vec<MarkerId>, SceneError> {
        grid.remove_marker(&mut self.tree, &mut self.arbiter, id)
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("tree", &self.tree)
            .field("claimant", &self.arbiter.claimant())
            .field("queued", &self.queue.len())
            .finish()
    }
}
