// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Scripted gesture replay.
//!
//! A script describes one grid, the markers placed on it, and a timeline of
//! gesture events. Each event is dispatched in its own frame at its
//! timestamp, so watchdog timeouts behave as they would live.

use crate::components::{GridEvent, Scene};
use crate::config::ViewportConfig;
use crate::editing::gesture::GestureEvent;
use crate::error::ReplayError;
use crate::markers::{DerivedValue, Edge};
use crate::model::{Axis, AxisDivisions, Division, FrameKind, MarkerId, Unit};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// One axis of the script's grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DivisionSpec {
    #[serde(default)]
    pub unit: Unit,
    pub full_scale: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default = "default_divisions")]
    pub divisions: u32,
}

fn default_divisions() -> u32 {
    10
}

impl DivisionSpec {
    fn build(self) -> Division {
        Division::new(self.unit, self.full_scale, self.offset, self.divisions)
    }
}

/// A marker to place before the timeline starts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerSpec {
    Simple { axis: Axis, position: Point },
    Edge { edge: Edge, along: f64 },
    /// Parents are indices into the script's marker list
    Delta { parents: [usize; 2], derived: DerivedValue },
}

/// A gesture event and its offset from the start of the replay
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: GestureEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub screen: Rect,
    /// Grid rectangle; the whole screen if omitted
    #[serde(default)]
    pub grid: Option<Rect>,
    pub kind: FrameKind,
    pub horizontal: DivisionSpec,
    pub vertical: DivisionSpec,
    #[serde(default)]
    pub markers: Vec<MarkerSpec>,
    pub events: Vec<TimedEvent>,
    /// Run one more frame at this offset after the last event
    #[serde(default)]
    pub idle_until_ms: Option<u64>,
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// What a replay produced
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub events: Vec<GridEvent>,
    pub markers: Vec<MarkerId>,
    pub divisions: AxisDivisions,
    /// Number of scripted events nobody claimed
    pub unclaimed: usize,
}

/// Replay a script against a fresh scene
pub fn run(script: &Script, config: ViewportConfig) -> Result<ReplayOutcome, ReplayError> {
    let mut scene = Scene::new(script.screen, config);
    let emitted: Rc<RefCell<Vec<GridEvent>>> = Rc::default();
    let sink = emitted.clone();
    let root = scene.tree().root();
    let grid = scene.attach_grid(
        root,
        script.grid.unwrap_or(script.screen),
        script.kind,
        AxisDivisions::new(script.horizontal.build(), script.vertical.build()),
        Box::new(move |event: &GridEvent| {
            tracing::info!(?event, "grid event");
            sink.borrow_mut().push(*event);
        }),
    )?;

    let mut markers = Vec::with_capacity(script.markers.len());
    for (index, marker) in script.markers.iter().enumerate() {
        let id = match *marker {
            MarkerSpec::Simple { axis, position } => {
                grid.add_simple_marker(scene.tree_mut(), axis, position)?
            }
            MarkerSpec::Edge { edge, along } => {
                grid.add_edge_marker(scene.tree_mut(), edge, along)?
            }
            MarkerSpec::Delta { parents, derived } => {
                let lookup = |parent: usize| {
                    markers
                        .get(parent)
                        .copied()
                        .ok_or(ReplayError::UnknownParent { index, parent })
                };
                let parents = [lookup(parents[0])?, lookup(parents[1])?];
                grid.add_delta_marker(scene.tree_mut(), parents, derived)?
            }
        };
        tracing::debug!(index, ?id, "marker placed");
        markers.push(id);
    }

    let start = Instant::now();
    let mut timeline: Vec<TimedEvent> = script.events.clone();
    timeline.sort_by_key(|timed| timed.at_ms);
    let mut unclaimed = 0;
    for timed in &timeline {
        scene.push_event(timed.event);
        let report = scene.frame(start + Duration::from_millis(timed.at_ms));
        unclaimed += report
            .handled
            .iter()
            .filter(|(_, node)| node.is_none())
            .count();
    }
    if let Some(idle) = script.idle_until_ms {
        scene.frame(start + Duration::from_millis(idle));
    }

    let events = emitted.borrow().clone();
    Ok(ReplayOutcome {
        events,
        markers,
        divisions: grid.divisions(),
        unclaimed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PINCH_SCRIPT: &str = r#"{
        "screen": { "x0": 0.0, "y0": 0.0, "x1": 400.0, "y1": 400.0 },
        "kind": "Analog",
        "horizontal": { "unit": "Seconds", "full_scale": 0.001 },
        "vertical": { "unit": "Volts", "full_scale": 8.0, "divisions": 8 },
        "events": [
            { "at_ms": 0, "kind": "Pinch",
              "position": { "x": 100.0, "y": 100.0 },
              "position2": { "x": 300.0, "y": 100.0 } },
            { "at_ms": 16, "kind": "Pinch",
              "position": { "x": 50.0, "y": 100.0 },
              "position2": { "x": 350.0, "y": 100.0 } },
            { "at_ms": 32, "kind": "PinchComplete",
              "position": { "x": 200.0, "y": 100.0 } }
        ]
    }"#;

    #[test]
    fn pinch_script_zooms_time_axis() {
        let script = Script::from_json(PINCH_SCRIPT).expect("script parses");
        let outcome = run(&script, ViewportConfig::default()).expect("replay runs");
        assert_eq!(outcome.unclaimed, 0);
        assert_eq!(outcome.events.first(), Some(&GridEvent::GestureBegin));
        assert_eq!(outcome.events.last(), Some(&GridEvent::GestureEnd));
        let time = outcome.divisions.horizontal;
        assert!((time.full_scale - 0.001 * 200.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn delta_marker_needs_earlier_parents() {
        let script = Script::from_json(
            r#"{
                "screen": { "x0": 0.0, "y0": 0.0, "x1": 400.0, "y1": 400.0 },
                "kind": "Analog",
                "horizontal": { "full_scale": 1.0 },
                "vertical": { "full_scale": 1.0 },
                "markers": [
                    { "type": "simple", "axis": "Horizontal", "position": { "x": 0.0, "y": 0.0 } },
                    { "type": "delta", "parents": [0, 2], "derived": "Difference" }
                ],
                "events": []
            }"#,
        )
        .expect("script parses");
        let err = run(&script, ViewportConfig::default()).expect_err("parent 2 is undefined");
        assert!(matches!(
            err,
            ReplayError::UnknownParent {
                index: 1,
                parent: 2
            }
        ));
    }

    #[test]
    fn stray_completion_is_unclaimed() {
        let script = Script::from_json(
            r#"{
                "screen": { "x0": 0.0, "y0": 0.0, "x1": 400.0, "y1": 400.0 },
                "kind": "Digital",
                "horizontal": { "full_scale": 1.0 },
                "vertical": { "full_scale": 1.0 },
                "events": [
                    { "at_ms": 0, "kind": "DragComplete", "position": { "x": 10.0, "y": 10.0 } }
                ]
            }"#,
        )
        .expect("script parses");
        let outcome = run(&script, ViewportConfig::default()).expect("replay runs");
        assert_eq!(outcome.unclaimed, 1);
        assert!(outcome.events.is_empty());
    }
}
