// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Everything here signals misuse by the composing application (a marker
//! moved before it was registered, a node id that was already removed).
//! Noisy touch input never produces an error; it is clamped or dropped where
//! it is interpreted.

use crate::components::NodeId;
use crate::model::MarkerId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the boundary negotiator and marker registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("marker {0:?} is not registered")]
    NotRegistered(MarkerId),

    #[error("marker {0:?} is already registered")]
    AlreadyRegistered(MarkerId),

    #[error("marker {0:?} cannot be linked to itself")]
    SelfLink(MarkerId),
}

/// Errors from scene tree operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    #[error("the root node cannot be removed")]
    RemoveRoot,

    #[error(transparent)]
    Marker(#[from] MarkerError),
}

/// Errors from loading `ViewportConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value} for `{field}`")]
    Invalid { field: &'static str, value: f64 },
}

/// Errors from loading or running a replay script
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("invalid replay script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("marker #{index} refers to marker #{parent}, which is not defined before it")]
    UnknownParent { index: usize, parent: usize },

    #[error(transparent)]
    Scene(#[from] SceneError),
}
