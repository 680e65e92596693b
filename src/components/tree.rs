// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! The scene tree: node arena, gesture dispatch, and draw order.
//!
//! Nodes live in a slotmap; parents own their children through the id
//! lists and children point back with a plain id. Dispatch offers each
//! event depth-first, children before their parent and the top-most child
//! first, so the visually front-most node that accepts a gesture wins it.

use crate::components::context::{DetachCtx, GestureCtx, TickCtx};
use crate::components::node::{Node, NodeBehavior, NodeId};
use crate::editing::arbiter::{ClaimCandidate, GestureArbiter};
use crate::editing::gesture::GestureEvent;
use crate::error::SceneError;
use kurbo::Rect;
use slotmap::SlotMap;
use std::time::Instant;

/// One entry of the draw list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub boundaries: Rect,
    /// Distance from the root
    pub depth: usize,
    pub redraw: bool,
}

/// Arena of nodes rooted at a single container
pub struct SceneTree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    layout_dirty: bool,
}

impl SceneTree {
    /// Create a tree whose root container covers `boundaries`
    pub fn new(boundaries: Rect) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(None, boundaries, None));
        Self {
            nodes,
            root,
            layout_dirty: false,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    // ===== Structure =====

    /// Add a node with behavior as the last child of `parent`
    pub fn insert(
        &mut self,
        parent: NodeId,
        boundaries: Rect,
        behavior: Box<dyn NodeBehavior>,
    ) -> Result<NodeId, SceneError> {
        self.insert_node(parent, boundaries, Some(behavior))
    }

    /// Add a plain container as the last child of `parent`
    pub fn insert_container(
        &mut self,
        parent: NodeId,
        boundaries: Rect,
    ) -> Result<NodeId, SceneError> {
        self.insert_node(parent, boundaries, None)
    }

    fn insert_node(
        &mut self,
        parent: NodeId,
        boundaries: Rect,
        mut behavior: Option<Box<dyn NodeBehavior>>,
    ) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if let Some(behavior) = behavior.as_mut() {
            behavior.on_resize(boundaries);
        }
        let id = self.nodes.insert(Node::new(Some(parent), boundaries, behavior));
        self.node_mut(parent)?.children.push(id);
        tracing::trace!(?id, ?parent, "node inserted");
        Ok(id)
    }

    /// Remove a node and its whole subtree.
    ///
    /// Every removed behavior gets `on_detach`, children before parents.
    /// Nodes a behavior queues through `DetachCtx::remove_node` are removed
    /// in the same call. If any removed node held the gesture claim, the
    /// claim is dropped.
    pub fn remove(
        &mut self,
        id: NodeId,
        arbiter: &mut GestureArbiter,
    ) -> Result<Vec<NodeId>, SceneError> {
        if id == self.root {
            return Err(SceneError::RemoveRoot);
        }
        if !self.nodes.contains_key(id) {
            return Err(SceneError::UnknownNode(id));
        }

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if next == self.root {
                continue;
            }
            let Some(parent) = self.nodes.get(next).map(|node| node.parent) else {
                continue;
            };
            if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(parent)) {
                parent.children.retain(|child| *child != next);
            }

            let mut subtree = self.subtree(next);
            subtree.reverse();
            for node_id in subtree {
                if arbiter.is_claimed_by(node_id) {
                    arbiter.force_release();
                }
                let Some(mut node) = self.nodes.remove(node_id) else {
                    continue;
                };
                removed.push(node_id);
                if let Some(behavior) = node.behavior.as_mut() {
                    let mut ctx = DetachCtx::new(node_id);
                    behavior.on_detach(&mut ctx);
                    pending.extend(ctx.also_remove);
                }
            }
        }
        // Surviving siblings may own a different share of the frame now
        self.layout_dirty = true;
        tracing::debug!(?id, count = removed.len(), "subtree removed");
        Ok(removed)
    }

    /// `id` and all its descendants, parents before children
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(next) else {
                continue;
            };
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Whether `node` lies strictly below `ancestor`
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    // ===== Properties =====

    /// Move or resize a node. The behavior is told first, then the
    /// interactive rectangles of the node and its subtree are rebuilt.
    pub fn set_boundaries(&mut self, id: NodeId, boundaries: Rect) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        node.boundaries = boundaries;
        node.redraw_requested = true;
        if let Some(behavior) = node.behavior.as_mut() {
            behavior.on_resize(boundaries);
        }
        for node_id in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.refresh_interactive();
            }
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        let node = self.node_mut(id)?;
        if node.visible != visible {
            node.visible = visible;
            node.redraw_requested = true;
        }
        Ok(())
    }

    pub fn set_draw_on_top(&mut self, id: NodeId, on_top: bool) -> Result<(), SceneError> {
        self.node_mut(id)?.draw_on_top = on_top;
        Ok(())
    }

    pub fn request_redraw(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.node_mut(id)?.redraw_requested = true;
        Ok(())
    }

    /// Ask for interactive rectangles to be rebuilt on the next `relayout`
    pub fn mark_layout_dirty(&mut self) {
        self.layout_dirty = true;
    }

    /// Rebuild every node's interactive rectangles
    pub fn relayout(&mut self) {
        for node in self.nodes.values_mut() {
            node.refresh_interactive();
        }
        self.layout_dirty = false;
    }

    /// Rebuild interactive rectangles if something asked for it
    pub fn relayout_if_needed(&mut self) {
        if self.layout_dirty {
            self.relayout();
        }
    }

    // ===== Ordering =====

    /// Children in draw order: regular children, then `draw_on_top` ones
    pub fn draw_order(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let on_top = |child: NodeId| self.nodes.get(child).is_some_and(|c| c.draw_on_top);
        let mut order: Vec<NodeId> = node
            .children
            .iter()
            .copied()
            .filter(|child| !on_top(*child))
            .collect();
        order.extend(node.children.iter().copied().filter(|child| on_top(*child)));
        order
    }

    /// Visible nodes back to front
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut out = Vec::new();
        self.collect_draw(self.root, 0, &mut out);
        out
    }

    fn collect_draw(&self, id: NodeId, depth: usize, out: &mut Vec<DrawItem>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        out.push(DrawItem {
            node: id,
            boundaries: node.boundaries,
            depth,
            redraw: node.redraw_requested,
        });
        for child in self.draw_order(id) {
            self.collect_draw(child, depth + 1, out);
        }
    }

    /// Clear every redraw flag after the frame has been drawn
    pub fn clear_redraw(&mut self) {
        for node in self.nodes.values_mut() {
            node.redraw_requested = false;
        }
    }

    // ===== Dispatch =====

    /// Route one gesture event. Returns the node that handled it, or `None`
    /// if nobody claimed it.
    pub fn dispatch(
        &mut self,
        arbiter: &mut GestureArbiter,
        event: &GestureEvent,
        now: Instant,
    ) -> Option<NodeId> {
        let handled = match arbiter.claimant() {
            Some(claimant) if self.nodes.contains_key(claimant) => {
                self.offer(claimant, arbiter, event, now, false)
            }
            Some(stale) => {
                tracing::debug!(?stale, "claimant no longer in tree, releasing");
                arbiter.force_release();
                self.visit(self.root, arbiter, event, now)
            }
            None => self.visit(self.root, arbiter, event, now),
        };
        if handled.is_none() {
            tracing::trace!(kind = ?event.kind, position = ?event.position, "gesture unclaimed");
        }
        self.relayout_if_needed();
        handled
    }

    fn visit(
        &mut self,
        id: NodeId,
        arbiter: &mut GestureArbiter,
        event: &GestureEvent,
        now: Instant,
    ) -> Option<NodeId> {
        if !self.nodes.get(id)?.visible {
            return None;
        }
        let mut children = self.draw_order(id);
        children.reverse();
        for child in children {
            if let Some(handled) = self.visit(child, arbiter, event, now) {
                return Some(handled);
            }
        }
        self.offer(id, arbiter, event, now, false)
    }

    fn offer(
        &mut self,
        id: NodeId,
        arbiter: &mut GestureArbiter,
        event: &GestureEvent,
        now: Instant,
        passing: bool,
    ) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        let candidate = ClaimCandidate {
            node: id,
            visible: node.visible,
            interactive: &node.interactive,
            supported: node.supported,
        };
        let decision = arbiter.should_handle(&candidate, event, passing);
        if !decision.accepted() {
            return None;
        }
        Some(self.deliver(id, arbiter, event, now))
    }

    fn deliver(
        &mut self,
        id: NodeId,
        arbiter: &mut GestureArbiter,
        event: &GestureEvent,
        now: Instant,
    ) -> NodeId {
        let Some(node) = self.nodes.get_mut(id) else {
            arbiter.finish_event();
            return id;
        };
        node.redraw_requested = true;
        let Some(mut behavior) = node.behavior.take() else {
            arbiter.finish_event();
            return id;
        };

        let mut ctx = GestureCtx::new(arbiter, id, now);
        behavior.on_gesture(&mut ctx, event);
        let pass_to = ctx.pass_to;
        if ctx.layout_requested {
            self.layout_dirty = true;
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }

        if let Some(target) = pass_to {
            if self.is_descendant(target, id) {
                if let Some(handled) = self.offer(target, arbiter, event, now, true) {
                    return handled;
                }
                tracing::debug!(from = ?id, to = ?target, "pass refused");
            } else {
                tracing::debug!(from = ?id, to = ?target, "can only pass to descendants");
            }
        }
        arbiter.finish_event();
        id
    }

    /// Run every behavior's per-frame hook
    pub fn tick(&mut self, arbiter: &mut GestureArbiter, now: Instant) {
        let ids: Vec<NodeId> = self.subtree(self.root);
        for id in ids {
            let Some(mut behavior) = self.nodes.get_mut(id).and_then(|n| n.behavior.take()) else {
                continue;
            };
            let mut ctx = TickCtx::new(arbiter, id);
            behavior.tick(&mut ctx, now);
            let (layout, redraw) = (ctx.layout_requested, ctx.redraw_requested);
            if let Some(node) = self.nodes.get_mut(id) {
                node.behavior = Some(behavior);
                node.redraw_requested |= redraw;
            }
            self.layout_dirty |= layout;
        }
    }
}

impl std::fmt::Debug for SceneTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneTree")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}
