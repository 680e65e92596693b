// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Movable markers drawn on a grid.
//!
//! Positions are in the owning grid's normalized local space. A marker's
//! physical value comes from converting its position along its axis through
//! the grid's divisions; a delta marker instead combines the values of its
//! two parents.

use crate::markers::linkage::Subscription;
use crate::model::{Axis, MarkerId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

// ===== Edges =====

/// Grid edge an edge marker is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Axis the marker slides along
    pub fn axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Horizontal,
            Edge::Left | Edge::Right => Axis::Vertical,
        }
    }

    /// Screen strip along this edge of `grid` where the marker can be
    /// grabbed
    pub fn strip(self, grid: Rect, depth: f64) -> Rect {
        let grid = grid.abs();
        let depth = depth.min(grid.width()).min(grid.height()).max(0.0);
        match self {
            Edge::Top => Rect::new(grid.x0, grid.y0, grid.x1, grid.y0 + depth),
            Edge::Bottom => Rect::new(grid.x0, grid.y1 - depth, grid.x1, grid.y1),
            Edge::Left => Rect::new(grid.x0, grid.y0, grid.x0 + depth, grid.y1),
            Edge::Right => Rect::new(grid.x1 - depth, grid.y0, grid.x1, grid.y1),
        }
    }

    /// Minimum touch target for a marker on this edge
    pub fn touch_size(self, min_touch: f64, depth: f64) -> Size {
        match self.axis() {
            Axis::Horizontal => Size::new(min_touch, depth),
            Axis::Vertical => Size::new(depth, min_touch),
        }
    }
}

// ===== Derived Values =====

/// How a delta marker combines its parents' values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivedValue {
    /// `|a - b|`, e.g. a time difference
    Difference,
    /// `(a + b) / 2`
    Midpoint,
    /// `1 / |a - b|`, e.g. the frequency of a period; infinite when the
    /// parents coincide
    InverseDifference,
}

impl DerivedValue {
    pub fn compute(self, a: f64, b: f64) -> f64 {
        match self {
            DerivedValue::Difference => (a - b).abs(),
            DerivedValue::Midpoint => (a + b) / 2.0,
            DerivedValue::InverseDifference => {
                let diff = (a - b).abs();
                if diff == 0.0 { f64::INFINITY } else { 1.0 / diff }
            }
        }
    }
}

// ===== Indicator Trait =====

/// Marker variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Simple,
    Edge(Edge),
    Delta(DerivedValue),
}

/// Common marker behavior
pub trait Indicator {
    fn id(&self) -> MarkerId;

    /// Axis the marker's value is read along
    fn axis(&self) -> Axis;

    fn kind(&self) -> MarkerKind;

    /// Current position, local space
    fn position(&self) -> Point;

    /// Move towards `local`, staying inside `bounds`. Returns the position
    /// actually taken.
    fn set_position(&mut self, local: Point, bounds: Rect) -> Point;

    /// Markers this one is derived from
    fn parents(&self) -> Option<[MarkerId; 2]> {
        None
    }

    /// A parent reported a new position
    fn on_moved(&mut self, _parent: MarkerId, _position: Point) {}

    /// Re-derive the position from the parents. Returns whether it changed.
    fn recompute(&mut self) -> bool {
        false
    }
}

// ===== Simple Marker =====

/// Free marker, movable in both directions
#[derive(Debug, Clone)]
pub struct SimpleMarker {
    id: MarkerId,
    axis: Axis,
    position: Point,
}

impl SimpleMarker {
    pub fn new(axis: Axis, position: Point) -> Self {
        Self {
            id: MarkerId::next(),
            axis,
            position,
        }
    }
}

impl Indicator for SimpleMarker {
    fn id(&self) -> MarkerId {
        self.id
    }

    fn axis(&self) -> Axis {
        self.axis
    }

    fn kind(&self) -> MarkerKind {
        MarkerKind::Simple
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, local: Point, bounds: Rect) -> Point {
        self.position = clamp_point(local, bounds);
        self.position
    }
}

// ===== Edge Marker =====

/// Marker sliding along one grid edge, sharing the edge with its neighbors
#[derive(Debug, Clone)]
pub struct EdgeMarker {
    id: MarkerId,
    edge: Edge,
    /// Cross-axis coordinate, fixed at the frame center
    cross: f64,
    along: f64,
}

impl EdgeMarker {
    pub fn new(edge: Edge, along: f64, bounds: Rect) -> Self {
        let axis = edge.axis();
        let center = bounds.center();
        let (lo, hi) = axis_range(bounds, axis);
        Self {
            id: MarkerId::next(),
            edge,
            cross: axis.other().of_point(center),
            along: along.clamp(lo, hi),
        }
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Coordinate along the edge
    pub fn along(&self) -> f64 {
        self.along
    }
}

impl Indicator for EdgeMarker {
    fn id(&self) -> MarkerId {
        self.id
    }

    fn axis(&self) -> Axis {
        self.edge.axis()
    }

    fn kind(&self) -> MarkerKind {
        MarkerKind::Edge(self.edge)
    }

    fn position(&self) -> Point {
        let axis = self.edge.axis();
        axis.with_point(axis.other().with_point(Point::ZERO, self.cross), self.along)
    }

    fn set_position(&mut self, local: Point, bounds: Rect) -> Point {
        let axis = self.edge.axis();
        let (lo, hi) = axis_range(bounds, axis);
        self.along = axis.of_point(local).clamp(lo, hi);
        self.position()
    }
}

// ===== Delta Marker =====

/// Marker derived from two parents. It sits at a fraction of the way from
/// the first parent to the second and reports a value computed from both.
#[derive(Debug)]
pub struct DeltaMarker {
    id: MarkerId,
    axis: Axis,
    derived: DerivedValue,
    parents: [MarkerId; 2],
    parent_positions: [Point; 2],
    fraction: f64,
    position: Point,
    subscriptions: Vec<Subscription>,
}

impl DeltaMarker {
    pub fn new(
        axis: Axis,
        derived: DerivedValue,
        parents: [MarkerId; 2],
        parent_positions: [Point; 2],
    ) -> Self {
        let mut marker = Self {
            id: MarkerId::next(),
            axis,
            derived,
            parents,
            parent_positions,
            fraction: 0.5,
            position: Point::ZERO,
            subscriptions: Vec::new(),
        };
        marker.recompute();
        marker
    }

    pub fn derived(&self) -> DerivedValue {
        self.derived
    }

    /// Position along the parent span, 0 at the first parent
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Keep link handles; they are released with the marker
    pub fn hold(&mut self, subscriptions: impl IntoIterator<Item = Subscription>) {
        self.subscriptions.extend(subscriptions);
    }

    /// Release the parent links now
    pub fn unlink(&mut self) {
        if !self.subscriptions.is_empty() {
            tracing::debug!(id = ?self.id, "delta marker unlinked");
        }
        self.subscriptions.clear();
    }

    pub fn is_linked(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Value from the parents' values
    pub fn value(&self, first: f64, second: f64) -> f64 {
        self.derived.compute(first, second)
    }
}

impl Indicator for DeltaMarker {
    fn id(&self) -> MarkerId {
        self.id
    }

    fn axis(&self) -> Axis {
        self.axis
    }

    fn kind(&self) -> MarkerKind {
        MarkerKind::Delta(self.derived)
    }

    fn position(&self) -> Point {
        self.position
    }

    /// Projects `local` onto the span between the parents
    fn set_position(&mut self, local: Point, _bounds: Rect) -> Point {
        let [a, b] = self.parent_positions;
        let span = b - a;
        let length_sq = span.hypot2();
        self.fraction = if length_sq > 0.0 {
            ((local - a).dot(span) / length_sq).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.recompute();
        self.position
    }

    fn parents(&self) -> Option<[MarkerId; 2]> {
        Some(self.parents)
    }

    fn on_moved(&mut self, parent: MarkerId, position: Point) {
        for (id, slot) in self.parents.iter().zip(self.parent_positions.iter_mut()) {
            if *id == parent {
                *slot = position;
            }
        }
    }

    fn recompute(&mut self) -> bool {
        let [a, b] = self.parent_positions;
        let position = a.lerp(b, self.fraction);
        let changed = position != self.position;
        self.position = position;
        changed
    }
}

// ===== MarkerBox Enum =====

/// Enum wrapping all marker types
#[derive(Debug)]
pub enum MarkerBox {
    Simple(SimpleMarker),
    Edge(EdgeMarker),
    Delta(DeltaMarker),
}

impl MarkerBox {
    fn inner(&self) -> &dyn Indicator {
        match self {
            MarkerBox::Simple(marker) => marker,
            MarkerBox::Edge(marker) => marker,
            MarkerBox::Delta(marker) => marker,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Indicator {
        match self {
            MarkerBox::Simple(marker) => marker,
            MarkerBox::Edge(marker) => marker,
            MarkerBox::Delta(marker) => marker,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeMarker> {
        match self {
            MarkerBox::Edge(marker) => Some(marker),
            _ => None,
        }
    }

    pub fn as_delta(&self) -> Option<&DeltaMarker> {
        match self {
            MarkerBox::Delta(marker) => Some(marker),
            _ => None,
        }
    }

    pub fn as_delta_mut(&mut self) -> Option<&mut DeltaMarker> {
        match self {
            MarkerBox::Delta(marker) => Some(marker),
            _ => None,
        }
    }
}

impl Indicator for MarkerBox {
    fn id(&self) -> MarkerId {
        self.inner().id()
    }

    fn axis(&self) -> Axis {
        self.inner().axis()
    }

    fn kind(&self) -> MarkerKind {
        self.inner().kind()
    }

    fn position(&self) -> Point {
        self.inner().position()
    }

    fn set_position(&mut self, local: Point, bounds: Rect) -> Point {
        self.inner_mut().set_position(local, bounds)
    }

    fn parents(&self) -> Option<[MarkerId; 2]> {
        self.inner().parents()
    }

    fn on_moved(&mut self, parent: MarkerId, position: Point) {
        self.inner_mut().on_moved(parent, position);
    }

    fn recompute(&mut self) -> bool {
        self.inner_mut().recompute()
    }
}

fn axis_range(bounds: Rect, axis: Axis) -> (f64, f64) {
    match axis {
        Axis::Horizontal => (bounds.x0, bounds.x1),
        Axis::Vertical => (bounds.y0, bounds.y1),
    }
}

fn clamp_point(p: Point, bounds: Rect) -> Point {
    Point::new(p.x.clamp(bounds.x0, bounds.x1), p.y.clamp(bounds.y0, bounds.y1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered() -> Rect {
        Rect::new(-0.5, -0.5, 0.5, 0.5)
    }

    #[test]
    fn edge_marker_slides_along_its_axis_only() {
        let mut marker = EdgeMarker::new(Edge::Bottom, 0.2, centered());
        assert_eq!(marker.position(), Point::new(0.2, 0.0));

        let moved = marker.set_position(Point::new(0.9, 0.3), centered());
        assert_eq!(moved, Point::new(0.5, 0.0));
        assert_eq!(marker.kind(), MarkerKind::Edge(Edge::Bottom));
    }

    #[test]
    fn edge_strips_hug_the_grid() {
        let grid = Rect::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(Edge::Top.strip(grid, 40.0), Rect::new(0.0, 0.0, 400.0, 40.0));
        assert_eq!(Edge::Right.strip(grid, 40.0), Rect::new(360.0, 0.0, 400.0, 300.0));
        assert_eq!(Edge::Left.touch_size(44.0, 40.0), Size::new(40.0, 44.0));
    }

    #[test]
    fn derived_values() {
        assert_eq!(DerivedValue::Difference.compute(1.0, 4.0), 3.0);
        assert_eq!(DerivedValue::Midpoint.compute(1.0, 4.0), 2.5);
        assert_eq!(DerivedValue::InverseDifference.compute(0.25, 0.75), 2.0);
        assert!(DerivedValue::InverseDifference.compute(1.0, 1.0).is_infinite());
    }

    #[test]
    fn delta_marker_stays_between_parents() {
        let a = MarkerId::next();
        let b = MarkerId::next();
        let mut delta = DeltaMarker::new(
            Axis::Horizontal,
            DerivedValue::Difference,
            [a, b],
            [Point::new(-0.2, 0.0), Point::new(0.2, 0.0)],
        );
        assert_eq!(delta.position(), Point::ZERO);

        let clamped = delta.set_position(Point::new(0.4, 0.1), centered());
        assert_eq!(clamped, Point::new(0.2, 0.0));
        assert_eq!(delta.fraction(), 1.0);

        delta.set_position(Point::new(-0.1, 0.0), centered());
        assert!((delta.fraction() - 0.25).abs() < 1e-12);

        // Parent moves keep the fraction
        delta.on_moved(b, Point::new(0.6, 0.0));
        assert!(delta.recompute());
        assert!((delta.position().x - 0.0).abs() < 1e-12);
        assert!(!delta.recompute());
    }

    #[test]
    fn coincident_parents_center_the_fraction() {
        let p = Point::new(0.1, 0.1);
        let mut delta = DeltaMarker::new(
            Axis::Vertical,
            DerivedValue::Midpoint,
            [MarkerId::next(), MarkerId::next()],
            [p, p],
        );
        delta.set_position(Point::new(0.4, 0.4), centered());
        assert_eq!(delta.fraction(), 0.5);
        assert_eq!(delta.position(), p);
    }

    #[test]
    fn marker_box_delegates() {
        let mut boxed = MarkerBox::Simple(SimpleMarker::new(Axis::Vertical, Point::ZERO));
        boxed.set_position(Point::new(2.0, -2.0), centered());
        assert_eq!(boxed.position(), Point::new(0.5, -0.5));
        assert_eq!(boxed.axis(), Axis::Vertical);
        assert!(boxed.parents().is_none());
        assert!(boxed.as_delta().is_none());
    }
}
