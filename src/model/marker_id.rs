// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for markers.
//!
//! Each `MarkerId` is a monotonically increasing `u64` drawn from an atomic
//! counter. Ids are never reused within a process, so a derived marker
//! that outlives its parent can never be confused with a newer marker.
//! Ordering follows creation order, which the boundary negotiator uses to
//! break ties between markers at the same position.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a marker (cursor, edge indicator, delta readout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarkerId(u64);

static MARKER_COUNTER: AtomicU64 = AtomicU64::new(1);

impl MarkerId {
    /// Allocate a fresh marker id
    pub fn next() -> Self {
        Self(MARKER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging
    pub fn raw(self) -> u64 {
        self.0
    }
}
