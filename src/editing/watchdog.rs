// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Stuck-claim watchdog.
//!
//! Touch backends occasionally lose the completion event of a drag or
//! pinch. The watchdog remembers when a grid last processed a gesture frame;
//! once a claim has been silent longer than the timeout it trips exactly
//! once, and the owner synthesizes the missing end-of-gesture.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ClaimWatchdog {
    timeout: Duration,
    last_activity: Option<Instant>,
}

impl ClaimWatchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_activity: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Record a processed gesture frame and arm the watchdog
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = Some(now);
    }

    /// Disarm after a normal completion
    pub fn disarm(&mut self) {
        self.last_activity = None;
    }

    pub fn is_armed(&self) -> bool {
        self.last_activity.is_some()
    }

    /// Returns true once when the silence since the last frame exceeds the
    /// timeout, then disarms until the next `touch`
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_activity else {
            return false;
        };
        if now.saturating_duration_since(last) <= self.timeout {
            return false;
        }
        tracing::debug!(
            silent_ms = now.saturating_duration_since(last).as_millis() as u64,
            "claim watchdog tripped"
        );
        self.last_activity = None;
        true
    }
}
