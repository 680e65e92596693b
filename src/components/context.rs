// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Contexts handed to node behaviors.
//!
//! Behaviors never see the tree or the arbiter directly. Whatever they may
//! change while the dispatcher is walking the tree goes through these.

use crate::components::node::NodeId;
use crate::editing::arbiter::GestureArbiter;
use std::time::Instant;

/// Context for `NodeBehavior::on_gesture`
pub struct GestureCtx<'a> {
    arbiter: &'a mut GestureArbiter,
    node: NodeId,
    now: Instant,
    pub(crate) pass_to: Option<NodeId>,
    pub(crate) layout_requested: bool,
}

impl<'a> GestureCtx<'a> {
    pub(crate) fn new(arbiter: &'a mut GestureArbiter, node: NodeId, now: Instant) -> Self {
        Self {
            arbiter,
            node,
            now,
            pass_to: None,
            layout_requested: false,
        }
    }

    /// The node handling the event
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Time of the current frame
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Whether this node holds the claim
    pub fn has_claim(&self) -> bool {
        self.arbiter.is_claimed_by(self.node)
    }

    /// Whether the claim ends after this event
    pub fn is_final(&self) -> bool {
        self.arbiter.must_release()
    }

    /// Give up the claim now
    pub fn release(&mut self) -> bool {
        self.arbiter.release(self.node)
    }

    /// Forward this event to a descendant. The target is re-checked by the
    /// arbiter and takes over the claim if it accepts.
    pub fn pass_to(&mut self, target: NodeId) {
        self.pass_to = Some(target);
    }

    /// Interactive rectangles changed; refresh them once dispatch finishes
    pub fn request_layout(&mut self) {
        self.layout_requested = true;
    }
}

/// Context for `NodeBehavior::tick`
pub struct TickCtx<'a> {
    arbiter: &'a mut GestureArbiter,
    node: NodeId,
    pub(crate) layout_requested: bool,
    pub(crate) redraw_requested: bool,
}

impl<'a> TickCtx<'a> {
    pub(crate) fn new(arbiter: &'a mut GestureArbiter, node: NodeId) -> Self {
        Self {
            arbiter,
            node,
            layout_requested: false,
            redraw_requested: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Current claim holder, if any
    pub fn claimant(&self) -> Option<NodeId> {
        self.arbiter.claimant()
    }

    /// Drop whatever claim is held. Returns the previous holder.
    pub fn force_release(&mut self) -> Option<NodeId> {
        self.arbiter.force_release()
    }

    pub fn request_layout(&mut self) {
        self.layout_requested = true;
    }

    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}

/// Context for `NodeBehavior::on_detach`
pub struct DetachCtx {
    node: NodeId,
    pub(crate) also_remove: Vec<NodeId>,
}

impl DetachCtx {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node,
            also_remove: Vec::new(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Remove another node (with its subtree) as part of this removal
    pub fn remove_node(&mut self, id: NodeId) {
        self.also_remove.push(id);
    }
}
