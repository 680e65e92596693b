// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Scopeview: gesture arbitration and viewport transforms for a
//! touch-driven oscilloscope display

pub mod components;
pub mod config;
pub mod editing;
pub mod error;
pub mod markers;
pub mod model;
pub mod replay;
pub mod settings;
pub mod tools;

pub use components::{GridEvent, GridHandle, MarkerEvent, Scene, SceneTree};
pub use config::ViewportConfig;
pub use editing::{GestureEvent, GestureKind};
pub use tools::ViewportChange;

/// Install the global tracing subscriber.
///
/// Controlled through `RUST_LOG`; defaults to `scopeview=info`. Calling it
/// again is harmless.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scopeview=info"));
    if let Err(err) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        tracing::debug!("tracing subscriber already installed: {err}");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_tracing_twice_is_harmless() {
        super::init_tracing();
        super::init_tracing();
        tracing::debug!("still logging");
    }
}
