// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Gesture claim arbitration.
//!
//! The `GestureArbiter` is the single slot recording which node owns the
//! gesture in progress. It is owned by the caller and handed to
//! `SceneTree::dispatch` by reference; nodes only reach it through the
//! contexts the dispatcher gives them.
//!
//! A claim lasts for one gesture sequence. Terminal events (completions and
//! single-shot gestures) set `must_release`, and the dispatcher drops the
//! claim once the handler for that event has run.

use crate::components::NodeId;
use crate::editing::gesture::{GestureEvent, GestureMask};
use crate::editing::hit_test;
use kurbo::Rect;

/// What the arbiter needs to know about a node to decide a claim
#[derive(Debug, Clone, Copy)]
pub struct ClaimCandidate<'a> {
    pub node: NodeId,
    pub visible: bool,
    pub interactive: &'a [Rect],
    pub supported: GestureMask,
}

/// Why a candidate was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    ClaimedElsewhere,
    Hidden,
    NotInteractive,
    Unsupported,
    CompletionWithoutClaim,
    Missed,
}

/// Outcome of `GestureArbiter::should_handle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
    /// The candidate already owned the claim and keeps it
    Continue,
    /// The candidate just became the claimant
    Claimed,
    Rejected(Rejection),
}

impl ClaimDecision {
    pub fn accepted(self) -> bool {
        matches!(self, ClaimDecision::Continue | ClaimDecision::Claimed)
    }
}

/// The process-wide claim slot, made explicit
#[derive(Debug, Default)]
pub struct GestureArbiter {
    claimant: Option<NodeId>,
    must_release: bool,
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node currently owning the gesture, if any
    pub fn claimant(&self) -> Option<NodeId> {
        self.claimant
    }

    pub fn is_claimed_by(&self, node: NodeId) -> bool {
        self.claimant == Some(node)
    }

    /// Whether the current claim ends after the event being handled
    pub fn must_release(&self) -> bool {
        self.must_release
    }

    /// Decide whether `candidate` may handle `event`.
    ///
    /// With `passing` set (a container forwarding a gesture it just
    /// received), an existing claim elsewhere and completion events do not
    /// disqualify the candidate.
    pub fn should_handle(
        &mut self,
        candidate: &ClaimCandidate<'_>,
        event: &GestureEvent,
        passing: bool,
    ) -> ClaimDecision {
        let decision = self.decide(candidate, event, passing);
        match decision {
            ClaimDecision::Continue => {
                self.must_release = event.kind.is_terminal();
            }
            ClaimDecision::Claimed => {
                if let Some(previous) = self.claimant
                    && previous != candidate.node
                {
                    tracing::debug!(?previous, to = ?candidate.node, "gesture claim passed");
                } else {
                    tracing::debug!(node = ?candidate.node, kind = ?event.kind, "gesture claimed");
                }
                self.claimant = Some(candidate.node);
                self.must_release = event.kind.is_terminal();
            }
            ClaimDecision::Rejected(_) => {}
        }
        decision
    }

    fn decide(
        &self,
        candidate: &ClaimCandidate<'_>,
        event: &GestureEvent,
        passing: bool,
    ) -> ClaimDecision {
        if !passing && self.claimant == Some(candidate.node) {
            return ClaimDecision::Continue;
        }
        if !passing && self.claimant.is_some() {
            return ClaimDecision::Rejected(Rejection::ClaimedElsewhere);
        }
        if !candidate.visible {
            return ClaimDecision::Rejected(Rejection::Hidden);
        }
        if candidate.interactive.is_empty() {
            return ClaimDecision::Rejected(Rejection::NotInteractive);
        }
        if !candidate.supported.accepts(event.kind) {
            return ClaimDecision::Rejected(Rejection::Unsupported);
        }
        if !passing && event.kind.is_completion() {
            return ClaimDecision::Rejected(Rejection::CompletionWithoutClaim);
        }
        if !hit_test::contains_any(candidate.interactive, event.hit_point()) {
            return ClaimDecision::Rejected(Rejection::Missed);
        }
        ClaimDecision::Claimed
    }

    /// Give up the claim. Only the claimant can release; returns whether
    /// anything changed.
    pub fn release(&mut self, node: NodeId) -> bool {
        if self.claimant != Some(node) {
            tracing::trace!(?node, claimant = ?self.claimant, "release ignored, not the claimant");
            return false;
        }
        tracing::debug!(?node, "gesture claim released");
        self.claimant = None;
        self.must_release = false;
        true
    }

    /// Drop whatever claim is held (node removal, watchdog)
    pub(crate) fn force_release(&mut self) -> Option<NodeId> {
        self.must_release = false;
        let previous = self.claimant.take();
        if let Some(node) = previous {
            tracing::debug!(?node, "gesture claim force-released");
        }
        previous
    }

    /// Apply a pending terminal release after a handler ran
    pub(crate) fn finish_event(&mut self) -> Option<NodeId> {
        if self.must_release {
            self.force_release()
        } else {
            None
        }
    }
}
