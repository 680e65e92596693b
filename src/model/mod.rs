// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Value types shared by the viewport engine

pub mod axis;
pub mod division;
pub mod frame_kind;
pub mod marker_id;

pub use axis::{Axis, AxisMask};
pub use division::{AxisDivisions, Division, Unit};
pub use frame_kind::{FrameBehavior, FrameKind};
pub use marker_id::MarkerId;
