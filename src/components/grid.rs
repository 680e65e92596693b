// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Oscilloscope grid node.
//!
//! A grid owns a coordinate frame, the horizontal and vertical divisions it
//! displays, and a set of markers. Gestures on the grid background become
//! viewport changes that are applied to the divisions and reported through
//! the callback bound at construction. Each marker lives in its own child
//! node so the arbiter can route touches to it before the grid sees them.

use crate::components::context::{DetachCtx, GestureCtx, TickCtx};
use crate::components::marker_node::MarkerNode;
use crate::components::node::{NodeBehavior, NodeId};
use crate::components::tree::SceneTree;
use crate::config::ViewportConfig;
use crate::editing::arbiter::GestureArbiter;
use crate::editing::gesture::{GestureEvent, GestureKind, GestureMask};
use crate::editing::viewport::CoordinateFrame;
use crate::editing::watchdog::ClaimWatchdog;
use crate::error::SceneError;
use crate::markers::{DerivedValue, Edge, Indicator, MarkerMoved, MarkerSet};
use crate::model::{Axis, AxisDivisions, FrameBehavior, FrameKind, MarkerId};
use crate::tools::{ToolCtx, ViewportChange, ViewportEvent, ViewportTools};
use kurbo::{Point, Rect};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

// ===== Events =====

/// Marker notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerEvent {
    /// Marker tapped, local position of the tap
    Touched { id: MarkerId, local: Point },
    /// Marker dragged to a new local position
    Dragged { id: MarkerId, local: Point },
    /// Position or value changed, directly or through a parent
    Moved(MarkerMoved),
    /// Drag finished; the value the marker settled on
    ValueConfirmed { id: MarkerId, value: f64 },
}

/// Everything a grid reports to its owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    Viewport(ViewportChange),
    /// Zoom rectangle being drawn, screen space
    ZoomBoxPreview(Rect),
    GestureBegin,
    GestureEnd,
    Tap { local: Point },
    DoubleTap { local: Point },
    Hold { local: Point },
    Marker(MarkerEvent),
}

/// Receives grid events
pub type GridCallback = Box<dyn FnMut(&GridEvent)>;

// ===== Shared State =====

/// State shared between a grid node and its marker nodes
pub(crate) struct GridShared {
    pub(crate) frame: CoordinateFrame,
    pub(crate) kind: FrameKind,
    pub(crate) behavior: FrameBehavior,
    pub(crate) config: ViewportConfig,
    pub(crate) divisions: AxisDivisions,
    pub(crate) markers: MarkerSet,
    pub(crate) marker_nodes: HashMap<MarkerId, NodeId>,
    pub(crate) watchdog: ClaimWatchdog,
    pending: Vec<GridEvent>,
    /// Taken out while events are delivered
    callback: Option<GridCallback>,
}

impl GridShared {
    pub(crate) fn emit(&mut self, event: GridEvent) {
        self.pending.push(event);
    }

    /// Physical value of a local coordinate, with the current divisions
    pub(crate) fn converter(&self) -> impl Fn(Axis, f64) -> f64 + use<> {
        let divisions = self.divisions;
        move |axis, local| divisions.to_physical(axis, local)
    }

    /// Replace the divisions. Markers keep their local positions, so every
    /// marker whose value changed is reported as moved.
    pub(crate) fn set_divisions(&mut self, divisions: AxisDivisions) {
        if divisions == self.divisions {
            return;
        }
        let old = self.converter();
        let before = self.markers.readings(&old);
        self.divisions = divisions;
        let convert = self.converter();
        let changed: Vec<MarkerMoved> = self
            .markers
            .readings(&convert)
            .into_iter()
            .filter(|reading| !before.contains(reading))
            .collect();
        tracing::trace!(markers = changed.len(), "divisions changed");
        self.emit_moves(changed);
    }

    /// Record marker moves and report them
    pub(crate) fn emit_moves(&mut self, moves: Vec<MarkerMoved>) {
        for moved in moves {
            self.emit(GridEvent::Marker(MarkerEvent::Moved(moved)));
        }
    }
}

/// Deliver pending events to the callback.
///
/// The callback may call back into the grid through its handle; anything it
/// emits is delivered by the same loop.
pub(crate) fn flush(shared: &Rc<RefCell<GridShared>>) {
    loop {
        let (mut callback, events) = {
            let mut state = shared.borrow_mut();
            if state.pending.is_empty() {
                return;
            }
            // Already delivering further up the stack
            let Some(callback) = state.callback.take() else {
                return;
            };
            (callback, std::mem::take(&mut state.pending))
        };
        for event in &events {
            callback(event);
        }
        shared.borrow_mut().callback = Some(callback);
    }
}

// ===== Grid Node =====

/// Node behavior for a grid
pub struct GridNode {
    shared: Rc<RefCell<GridShared>>,
    tools: ViewportTools,
}

impl GridNode {
    /// Create a grid under `parent` and return a handle to it
    pub fn attach(
        tree: &mut SceneTree,
        parent: NodeId,
        rect: Rect,
        kind: FrameKind,
        divisions: AxisDivisions,
        config: ViewportConfig,
        callback: GridCallback,
    ) -> Result<GridHandle, SceneError> {
        let behavior = kind.behavior();
        let shared = Rc::new(RefCell::new(GridShared {
            frame: CoordinateFrame::new(rect, behavior.origin),
            kind,
            behavior,
            config,
            divisions,
            markers: MarkerSet::new(behavior.origin.bounds()),
            marker_nodes: HashMap::new(),
            watchdog: ClaimWatchdog::new(config.watchdog_timeout()),
            pending: Vec::new(),
            callback: Some(callback),
        }));
        let node = tree.insert(
            parent,
            rect,
            Box::new(GridNode {
                shared: shared.clone(),
                tools: ViewportTools::new(),
            }),
        )?;
        tracing::debug!(?node, ?kind, ?rect, "grid attached");
        Ok(GridHandle { node, shared })
    }

    fn handle_viewport(&mut self, event: &GestureEvent) {
        let mut guard = self.shared.borrow_mut();
        let state = &mut *guard;
        let ctx = ToolCtx {
            frame: &state.frame,
            behavior: state.behavior,
            config: &state.config,
        };
        for out in self.tools.handle(event, &ctx) {
            let event = match out {
                ViewportEvent::Begin => GridEvent::GestureBegin,
                ViewportEvent::Change(change) => {
                    let mut divisions = state.divisions;
                    divisions.apply(&change);
                    state.pending.push(GridEvent::Viewport(change));
                    state.set_divisions(divisions);
                    continue;
                }
                ViewportEvent::ZoomBoxPreview(rect) => GridEvent::ZoomBoxPreview(rect),
                ViewportEvent::End => GridEvent::GestureEnd,
            };
            state.pending.push(event);
        }
    }
}

impl NodeBehavior for GridNode {
    fn supported_gestures(&self) -> GestureMask {
        GestureMask::ALL
    }

    fn on_resize(&mut self, boundaries: Rect) {
        self.shared.borrow_mut().frame.rebuild(boundaries);
    }

    fn on_gesture(&mut self, ctx: &mut GestureCtx<'_>, event: &GestureEvent) {
        {
            let mut state = self.shared.borrow_mut();
            if event.kind.is_terminal() {
                state.watchdog.disarm();
            } else {
                state.watchdog.touch(ctx.now());
            }
            let local = state.frame.screen_to_local(event.position);
            match event.kind {
                GestureKind::Tap => state.emit(GridEvent::Tap { local }),
                GestureKind::DoubleTap => state.emit(GridEvent::DoubleTap { local }),
                GestureKind::Hold => state.emit(GridEvent::Hold { local }),
                _ => {}
            }
        }
        if !matches!(
            event.kind,
            GestureKind::Tap | GestureKind::DoubleTap | GestureKind::Hold
        ) {
            self.handle_viewport(event);
        }
        flush(&self.shared);
    }

    fn tick(&mut self, ctx: &mut TickCtx<'_>, now: Instant) {
        let owns_claim = {
            let mut state = self.shared.borrow_mut();
            if !state.watchdog.poll(now) {
                return;
            }
            ctx.claimant().is_some_and(|claimant| {
                claimant == ctx.node() || state.marker_nodes.values().any(|n| *n == claimant)
            })
        };
        if !owns_claim {
            return;
        }
        let released = ctx.force_release();
        self.tools.cancel();
        tracing::debug!(?released, grid = ?ctx.node(), "stuck claim released by watchdog");
        self.shared.borrow_mut().emit(GridEvent::GestureEnd);
        ctx.request_redraw();
        flush(&self.shared);
    }

    fn on_detach(&mut self, _ctx: &mut DetachCtx) {
        self.tools.cancel();
        tracing::debug!("grid detached");
    }
}

// ===== Handle =====

/// Owner-side handle to a grid in a scene tree
#[derive(Clone)]
pub struct GridHandle {
    node: NodeId,
    shared: Rc<RefCell<GridShared>>,
}

impl GridHandle {
    /// The grid's node id
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind(&self) -> FrameKind {
        self.shared.borrow().kind
    }

    pub fn frame(&self) -> CoordinateFrame {
        self.shared.borrow().frame
    }

    pub fn divisions(&self) -> AxisDivisions {
        self.shared.borrow().divisions
    }

    /// Replace the divisions, e.g. after the acquisition settings changed
    pub fn set_divisions(&self, divisions: AxisDivisions) {
        self.shared.borrow_mut().set_divisions(divisions);
        flush(&self.shared);
    }

    /// Move or resize the grid together with its marker nodes
    pub fn resize(&self, tree: &mut SceneTree, rect: Rect) -> Result<(), SceneError> {
        tree.set_boundaries(self.node, rect)?;
        let nodes: Vec<NodeId> = self.shared.borrow().marker_nodes.values().copied().collect();
        for node in nodes {
            tree.set_boundaries(node, rect)?;
        }
        tree.relayout();
        Ok(())
    }

    pub fn marker_ids(&self) -> Vec<MarkerId> {
        self.shared.borrow().markers.ids().collect()
    }

    pub fn marker_node(&self, id: MarkerId) -> Option<NodeId> {
        self.shared.borrow().marker_nodes.get(&id).copied()
    }

    /// Local position of a marker
    pub fn marker_position(&self, id: MarkerId) -> Option<Point> {
        self.shared.borrow().markers.get(id).map(Indicator::position)
    }

    /// Physical value of a marker
    pub fn marker_value(&self, id: MarkerId) -> Option<f64> {
        let state = self.shared.borrow();
        let convert = state.converter();
        state.markers.value(id, &convert)
    }

    pub fn add_simple_marker(
        &self,
        tree: &mut SceneTree,
        axis: Axis,
        local: Point,
    ) -> Result<MarkerId, SceneError> {
        let id = self.shared.borrow_mut().markers.add_simple(axis, local);
        self.attach_marker(tree, id)
    }

    pub fn add_edge_marker(
        &self,
        tree: &mut SceneTree,
        edge: Edge,
        along: f64,
    ) -> Result<MarkerId, SceneError> {
        let id = self.shared.borrow_mut().markers.add_edge(edge, along)?;
        self.attach_marker(tree, id)
    }

    /// Add a marker derived from two existing ones
    pub fn add_delta_marker(
        &self,
        tree: &mut SceneTree,
        parents: [MarkerId; 2],
        derived: DerivedValue,
    ) -> Result<MarkerId, SceneError> {
        let id = self.shared.borrow_mut().markers.add_delta(parents, derived)?;
        self.attach_marker(tree, id)
    }

    fn attach_marker(&self, tree: &mut SceneTree, id: MarkerId) -> Result<MarkerId, SceneError> {
        let rect = self.shared.borrow().frame.screen_rect();
        let node = tree.insert(
            self.node,
            rect,
            Box::new(MarkerNode::new(self.shared.clone(), id)),
        )?;
        tree.set_draw_on_top(node, true)?;
        self.shared.borrow_mut().marker_nodes.insert(id, node);
        // Neighbors' touch rectangles changed too
        tree.relayout();
        Ok(id)
    }

    /// Move a marker programmatically
    pub fn move_marker(
        &self,
        tree: &mut SceneTree,
        id: MarkerId,
        local: Point,
    ) -> Result<(), SceneError> {
        {
            let mut state = self.shared.borrow_mut();
            let convert = state.converter();
            let moves = state.markers.move_marker(id, local, &convert)?;
            state.emit_moves(moves);
        }
        tree.relayout();
        flush(&self.shared);
        Ok(())
    }

    /// Remove a marker together with every marker derived from it
    pub fn remove_marker(
        &self,
        tree: &mut SceneTree,
        arbiter: &mut GestureArbiter,
        id: MarkerId,
    ) -> Result<Vec<MarkerId>, SceneError> {
        let (removed, nodes) = {
            let mut state = self.shared.borrow_mut();
            let removed = state.markers.remove(id)?;
            let nodes: Vec<NodeId> = removed
                .iter()
                .filter_map(|marker| state.marker_nodes.remove(marker))
                .collect();
            (removed, nodes)
        };
        for node in nodes {
            tree.remove(node, arbiter)?;
        }
        tree.relayout();
        Ok(removed)
    }

    /// Stop a delta marker from following its parents
    pub fn unlink_marker(&self, id: MarkerId) -> Result<(), SceneError> {
        self.shared.borrow_mut().markers.unlink(id)?;
        Ok(())
    }
}

impl std::fmt::Debug for GridHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridHandle")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::scene::Scene;
    use crate::model::{Division, Unit};
    use kurbo::Vec2;
    use std::time::Duration;

    type Events = Rc<RefCell<Vec<GridEvent>>>;

    fn screen() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 400.0)
    }

    fn divisions() -> AxisDivisions {
        AxisDivisions::new(
            Division::new(Unit::Seconds, 1e-3, 0.0, 10),
            Division::new(Unit::Volts, 8.0, 0.0, 8),
        )
    }

    fn analog_scene() -> (Scene, GridHandle, Events) {
        let mut scene = Scene::new(screen(), ViewportConfig::default());
        let events = Events::default();
        let sink = events.clone();
        let root = scene.tree().root();
        let grid = scene
            .attach_grid(
                root,
                screen(),
                FrameKind::Analog,
                divisions(),
                Box::new(move |event: &GridEvent| sink.borrow_mut().push(*event)),
            )
            .expect("root exists");
        (scene, grid, events)
    }

    fn viewport_changes(events: &Events) -> Vec<ViewportChange> {
        events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                GridEvent::Viewport(change) => Some(*change),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn horizontal_pinch_zooms_time_division() {
        let (mut scene, grid, events) = analog_scene();
        let now = Instant::now();

        let start = GestureEvent::pinch(Point::new(100.0, 100.0), Point::new(300.0, 100.0));
        assert_eq!(scene.dispatch_now(&start, now), Some(grid.node()));
        let spread = GestureEvent::pinch(Point::new(50.0, 100.0), Point::new(350.0, 100.0));
        assert_eq!(scene.dispatch_now(&spread, now), Some(grid.node()));

        let changes = viewport_changes(&events);
        assert_eq!(changes.len(), 2);
        assert!(changes[0].is_start);
        assert!(changes[0].is_neutral());
        assert!(!changes[1].is_start);
        assert!((changes[1].ratio.x - 200.0 / 300.0).abs() < 1e-9);
        assert_eq!(changes[1].ratio.y, 1.0);
        assert!((changes[1].pivot - Point::new(0.0, 0.25)).hypot() < 1e-9);
        assert_eq!(events.borrow()[0], GridEvent::GestureBegin);

        let time = grid.divisions().horizontal;
        assert!((time.full_scale - 1e-3 * 200.0 / 300.0).abs() < 1e-12);
        assert_eq!(grid.divisions().vertical.full_scale, 8.0);

        let done = GestureEvent::pinch_complete(Point::new(200.0, 100.0));
        scene.dispatch_now(&done, now);
        assert_eq!(events.borrow().last(), Some(&GridEvent::GestureEnd));
        assert_eq!(scene.claimant(), None);
    }

    #[test]
    fn tap_on_background_reports_local_position() {
        let (mut scene, _grid, events) = analog_scene();
        scene.dispatch_now(&GestureEvent::tap(Point::new(300.0, 100.0)), Instant::now());
        assert_eq!(
            events.borrow().as_slice(),
            &[GridEvent::Tap {
                local: Point::new(0.25, 0.25)
            }]
        );
        assert_eq!(scene.claimant(), None);
    }

    #[test]
    fn marker_wins_drag_over_grid() {
        let (mut scene, grid, events) = analog_scene();
        let marker = grid
            .add_simple_marker(scene.tree_mut(), Axis::Horizontal, Point::ZERO)
            .expect("grid exists");
        let marker_node = grid.marker_node(marker).expect("marker has a node");
        let now = Instant::now();

        let drag = GestureEvent::drag(Point::new(200.0, 200.0), Vec2::new(40.0, 0.0));
        assert_eq!(scene.dispatch_now(&drag, now), Some(marker_node));
        let position = grid.marker_position(marker).expect("marker exists");
        assert!((position.x - 0.1).abs() < 1e-9);
        assert_eq!(grid.divisions(), divisions());

        let done = GestureEvent::drag_complete(Point::new(240.0, 200.0));
        assert_eq!(scene.dispatch_now(&done, now), Some(marker_node));
        let events = events.borrow();
        assert!(matches!(
            events[0],
            GridEvent::Marker(MarkerEvent::Dragged { id, .. }) if id == marker
        ));
        assert!(matches!(
            events[1],
            GridEvent::Marker(MarkerEvent::Moved(moved)) if moved.id == marker
        ));
        let Some(GridEvent::Marker(MarkerEvent::ValueConfirmed { value, .. })) = events.last()
        else {
            panic!("drag should end with a confirmed value");
        };
        assert!((value - 1e-4).abs() < 1e-12);
        assert_eq!(scene.claimant(), None);
    }

    #[test]
    fn watchdog_releases_stuck_marker_claim_once() {
        let (mut scene, grid, events) = analog_scene();
        let marker = grid
            .add_simple_marker(scene.tree_mut(), Axis::Horizontal, Point::ZERO)
            .expect("grid exists");
        let now = Instant::now();
        scene.push_event(GestureEvent::drag(Point::new(200.0, 200.0), Vec2::new(4.0, 0.0)));
        scene.frame(now);
        assert_eq!(scene.claimant(), grid.marker_node(marker));

        // Still within the timeout
        scene.frame(now + Duration::from_secs(1));
        assert!(scene.claimant().is_some());

        scene.frame(now + Duration::from_secs(4));
        assert_eq!(scene.claimant(), None);
        scene.frame(now + Duration::from_secs(8));
        let ends = events
            .borrow()
            .iter()
            .filter(|event| **event == GridEvent::GestureEnd)
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn watchdog_ends_stuck_pinch_and_next_pinch_starts_fresh() {
        let (mut scene, grid, events) = analog_scene();
        let now = Instant::now();
        scene.push_event(GestureEvent::pinch(
            Point::new(100.0, 100.0),
            Point::new(300.0, 100.0),
        ));
        scene.frame(now);
        scene.frame(now + Duration::from_secs(5));
        assert_eq!(scene.claimant(), None);

        events.borrow_mut().clear();
        let later = now + Duration::from_secs(6);
        let start = GestureEvent::pinch(Point::new(100.0, 100.0), Point::new(300.0, 100.0));
        assert_eq!(scene.dispatch_now(&start, later), Some(grid.node()));
        assert_eq!(events.borrow()[0], GridEvent::GestureBegin);
    }

    #[test]
    fn removing_parent_marker_removes_derived_node() {
        let (mut scene, grid, _events) = analog_scene();
        let a = grid
            .add_simple_marker(scene.tree_mut(), Axis::Horizontal, Point::new(-0.2, 0.0))
            .expect("grid exists");
        let b = grid
            .add_simple_marker(scene.tree_mut(), Axis::Horizontal, Point::new(0.2, 0.0))
            .expect("grid exists");
        let delta = grid
            .add_delta_marker(scene.tree_mut(), [a, b], DerivedValue::Difference)
            .expect("parents exist");
        let delta_node = grid.marker_node(delta).expect("delta has a node");

        let value = grid.marker_value(delta).expect("delta exists");
        assert!((value - 0.4e-3).abs() < 1e-12);

        let removed = scene.remove_marker(&grid, a).expect("marker exists");
        assert!(removed.contains(&a));
        assert!(removed.contains(&delta));
        assert!(!scene.tree().contains(delta_node));
        assert_eq!(grid.marker_node(delta), None);
        assert_eq!(grid.marker_ids(), vec![b]);
    }

    #[test]
    fn removing_parent_node_directly_drops_derived_node() {
        let (mut scene, grid, events) = analog_scene();
        let a = grid
            .add_simple_marker(scene.tree_mut(), Axis::Horizontal, Point::new(-0.2, 0.0))
            .expect("grid exists");
        let b = grid
            .add_simple_marker(scene.tree_mut(), Axis::Horizontal, Point::new(0.2, 0.0))
            .expect("grid exists");
        let delta = grid
            .add_delta_marker(scene.tree_mut(), [a, b], DerivedValue::Difference)
            .expect("parents exist");
        let a_node = grid.marker_node(a).expect("a has a node");
        let delta_node = grid.marker_node(delta).expect("delta has a node");

        let removed = scene.remove(a_node).expect("node exists");
        assert_eq!(removed, vec![a_node, delta_node]);
        assert!(!scene.tree().contains(delta_node));
        assert_eq!(grid.marker_node(delta), None);
        assert_eq!(grid.marker_ids(), vec![b]);

        // Nothing left where the delta marker sat
        scene.dispatch_now(&GestureEvent::tap(Point::new(200.0, 200.0)), Instant::now());
        assert!(
            events
                .borrow()
                .iter()
                .all(|event| !matches!(event, GridEvent::Marker(MarkerEvent::Touched { .. })))
        );
    }

    #[test]
    fn pinch_after_drag_ends_pan_and_next_drag_starts_fresh() {
        let (mut scene, grid, events) = analog_scene();
        let now = Instant::now();
        let drag = GestureEvent::drag(Point::new(200.0, 200.0), Vec2::new(20.0, 0.0));
        scene.dispatch_now(&drag, now);
        let pinch = GestureEvent::pinch(Point::new(100.0, 200.0), Point::new(300.0, 200.0));
        assert_eq!(scene.dispatch_now(&pinch, now), Some(grid.node()));
        assert_eq!(
            &events.borrow()[2..4],
            &[GridEvent::GestureEnd, GridEvent::GestureBegin]
        );
        let spread = GestureEvent::pinch(Point::new(50.0, 200.0), Point::new(350.0, 200.0));
        scene.dispatch_now(&spread, now);
        scene.dispatch_now(&GestureEvent::pinch_complete(Point::new(200.0, 200.0)), now);

        // The drag's own completion arrives after the pinch released the claim
        let late = GestureEvent::drag_complete(Point::new(220.0, 200.0));
        assert_eq!(scene.dispatch_now(&late, now), None);

        events.borrow_mut().clear();
        assert_eq!(scene.dispatch_now(&drag, now), Some(grid.node()));
        assert_eq!(events.borrow()[0], GridEvent::GestureBegin);
        assert!(viewport_changes(&events)[0].is_start);
    }

    #[test]
    fn zoom_reports_new_marker_values() {
        let (mut scene, grid, events) = analog_scene();
        let time = grid
            .add_simple_marker(scene.tree_mut(), Axis::Horizontal, Point::new(0.25, 0.0))
            .expect("grid exists");
        grid.add_simple_marker(scene.tree_mut(), Axis::Vertical, Point::new(0.0, 0.25))
            .expect("grid exists");
        let now = Instant::now();
        let start = GestureEvent::pinch(Point::new(100.0, 380.0), Point::new(300.0, 380.0));
        scene.dispatch_now(&start, now);
        let spread = GestureEvent::pinch(Point::new(50.0, 380.0), Point::new(350.0, 380.0));
        scene.dispatch_now(&spread, now);

        let moved: Vec<MarkerMoved> = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                GridEvent::Marker(MarkerEvent::Moved(moved)) => Some(*moved),
                _ => None,
            })
            .collect();
        // Only the time marker's value changed
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].id, time);
        assert_eq!(moved[0].position, Point::new(0.25, 0.0));
        assert!((moved[0].value - 0.25 * 1e-3 * 200.0 / 300.0).abs() < 1e-12);
        assert_eq!(grid.marker_value(time), Some(moved[0].value));

        events.borrow_mut().clear();
        let mut divisions = grid.divisions();
        divisions.vertical.offset = 1.0;
        grid.set_divisions(divisions);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn resize_rebuilds_frame_and_marker_nodes() {
        let (mut scene, grid, _events) = analog_scene();
        let marker = grid
            .add_simple_marker(scene.tree_mut(), Axis::Horizontal, Point::ZERO)
            .expect("grid exists");
        let smaller = Rect::new(0.0, 0.0, 200.0, 200.0);
        grid.resize(scene.tree_mut(), smaller).expect("nodes exist");

        assert_eq!(grid.frame().screen_rect(), smaller);
        let node = grid.marker_node(marker).expect("marker has a node");
        let touch = scene.tree().get(node).expect("node exists").interactive()[0];
        assert!(touch.contains(Point::new(100.0, 100.0)));
    }

    #[test]
    fn removing_grid_detaches_markers() {
        let (mut scene, grid, _events) = analog_scene();
        grid.add_simple_marker(scene.tree_mut(), Axis::Vertical, Point::ZERO)
            .expect("grid exists");
        let removed = scene.remove(grid.node()).expect("grid exists");
        assert_eq!(removed.len(), 2);
        assert_eq!(scene.tree().len(), 1);
    }
}
