// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene tree, node behaviors, and the oscilloscope grid

pub mod context;
pub mod grid;
mod marker_node;
pub mod node;
pub mod scene;
pub mod tree;

pub use context::{DetachCtx, GestureCtx, TickCtx};
pub use grid::{GridCallback, GridEvent, GridHandle, GridNode, MarkerEvent};
pub use node::{Node, NodeBehavior, NodeId};
pub use scene::{FrameReport, Scene};
pub use tree::{DrawItem, SceneTree};
