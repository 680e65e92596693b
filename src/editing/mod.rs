// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Gesture input, claim arbitration, and coordinate frames

pub mod arbiter;
pub mod gesture;
pub mod hit_test;
pub mod viewport;
pub mod watchdog;

pub use arbiter::{ClaimCandidate, ClaimDecision, GestureArbiter, Rejection};
pub use gesture::{GestureEvent, GestureKind, GestureMask, Modifiers};
pub use viewport::{CoordinateFrame, LocalOrigin};
pub use watchdog::ClaimWatchdog;
