// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Cursors and edge indicators placed on grids

pub mod boundary;
pub mod indicator;
pub mod linkage;
pub mod set;

pub use boundary::{BoundaryNegotiator, Interval};
pub use indicator::{
    DeltaMarker, DerivedValue, Edge, EdgeMarker, Indicator, MarkerBox, MarkerKind, SimpleMarker,
};
pub use linkage::{LinkTable, Subscription};
pub use set::{MarkerMoved, MarkerSet, ValueFn};
