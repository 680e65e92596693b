// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! The markers of one grid, with their edge partitions and links

use crate::editing::hit_test;
use crate::editing::viewport::CoordinateFrame;
use crate::error::MarkerError;
use crate::markers::boundary::{BoundaryNegotiator, Interval};
use crate::markers::indicator::{
    DeltaMarker, DerivedValue, Edge, EdgeMarker, Indicator, MarkerBox, SimpleMarker,
};
use crate::markers::linkage::LinkTable;
use crate::model::{Axis, MarkerId};
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Converts a local coordinate along an axis into a physical value
pub type ValueFn<'a> = &'a dyn Fn(Axis, f64) -> f64;

/// A marker's new position and value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerMoved {
    pub id: MarkerId,
    /// Local space
    pub position: Point,
    pub value: f64,
}

/// All markers of one grid
#[derive(Debug)]
pub struct MarkerSet {
    /// Local bounds of the owning grid
    bounds: Rect,
    markers: BTreeMap<MarkerId, MarkerBox>,
    edges: HashMap<Edge, BoundaryNegotiator>,
    links: LinkTable,
}

impl MarkerSet {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            markers: BTreeMap::new(),
            edges: HashMap::new(),
            links: LinkTable::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn contains(&self, id: MarkerId) -> bool {
        self.markers.contains_key(&id)
    }

    pub fn get(&self, id: MarkerId) -> Option<&MarkerBox> {
        self.markers.get(&id)
    }

    /// Marker ids in creation order
    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.markers.keys().copied()
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    // ===== Registration =====

    pub fn add_simple(&mut self, axis: Axis, position: Point) -> MarkerId {
        let mut marker = SimpleMarker::new(axis, position);
        marker.set_position(position, self.bounds);
        let id = marker.id();
        self.markers.insert(id, MarkerBox::Simple(marker));
        tracing::debug!(?id, "simple marker added");
        id
    }

    pub fn add_edge(&mut self, edge: Edge, along: f64) -> Result<MarkerId, MarkerError> {
        let marker = EdgeMarker::new(edge, along, self.bounds);
        let id = marker.id();
        self.negotiator_mut(edge).add_element(id, marker.along())?;
        self.markers.insert(id, MarkerBox::Edge(marker));
        tracing::debug!(?id, ?edge, "edge marker added");
        Ok(id)
    }

    pub fn add_delta(
        &mut self,
        parents: [MarkerId; 2],
        derived: DerivedValue,
    ) -> Result<MarkerId, MarkerError> {
        let [first, second] = parents;
        if first == second {
            return Err(MarkerError::SelfLink(first));
        }
        let a = self
            .markers
            .get(&first)
            .ok_or(MarkerError::NotRegistered(first))?;
        let b = self
            .markers
            .get(&second)
            .ok_or(MarkerError::NotRegistered(second))?;

        let mut marker = DeltaMarker::new(a.axis(), derived, parents, [a.position(), b.position()]);
        let id = marker.id();
        marker.hold([
            self.links.subscribe(first, id),
            self.links.subscribe(second, id),
        ]);
        self.markers.insert(id, MarkerBox::Delta(marker));
        tracing::debug!(?id, ?parents, ?derived, "delta marker added");
        Ok(id)
    }

    /// Remove a marker and, transitively, every marker derived from it.
    /// Returns the removed ids.
    pub fn remove(&mut self, id: MarkerId) -> Result<Vec<MarkerId>, MarkerError> {
        if !self.markers.contains_key(&id) {
            return Err(MarkerError::NotRegistered(id));
        }
        let mut removed = self.dependents_of(id);
        removed.insert(0, id);
        for marker_id in &removed {
            if let Some(marker) = self.markers.remove(marker_id)
                && let Some(edge) = marker.as_edge()
                && let Some(negotiator) = self.edges.get_mut(&edge.edge())
            {
                negotiator.remove_element(*marker_id)?;
            }
        }
        tracing::debug!(?id, count = removed.len(), "markers removed");
        Ok(removed)
    }

    /// Stop a delta marker from following its parents
    pub fn unlink(&mut self, id: MarkerId) -> Result<(), MarkerError> {
        let delta = self
            .markers
            .get_mut(&id)
            .and_then(MarkerBox::as_delta_mut)
            .ok_or(MarkerError::NotRegistered(id))?;
        delta.unlink();
        Ok(())
    }

    /// Every marker derived from `id`, directly or through a chain
    pub fn dependents_of(&self, id: MarkerId) -> Vec<MarkerId> {
        let mut out = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);
        while let Some(parent) = queue.pop_front() {
            for dependent in self.links.dependents(parent) {
                if visited.insert(dependent) {
                    out.push(dependent);
                    queue.push_back(dependent);
                }
            }
        }
        out
    }

    // ===== Values & Partitions =====

    /// Physical value of a marker
    pub fn value(&self, id: MarkerId, convert: ValueFn<'_>) -> Option<f64> {
        let marker = self.markers.get(&id)?;
        match marker {
            MarkerBox::Delta(delta) => {
                let [a, b] = delta.parents()?;
                Some(delta.value(self.value(a, convert)?, self.value(b, convert)?))
            }
            _ => {
                let axis = marker.axis();
                Some(convert(axis, axis.of_point(marker.position())))
            }
        }
    }

    /// Position and value of every marker, in creation order. Used when the
    /// divisions change under markers that stay put.
    pub fn readings(&self, convert: ValueFn<'_>) -> Vec<MarkerMoved> {
        self.markers
            .iter()
            .filter_map(|(&id, marker)| {
                Some(MarkerMoved {
                    id,
                    position: marker.position(),
                    value: self.value(id, convert)?,
                })
            })
            .collect()
    }

    pub fn negotiator(&self, edge: Edge) -> Option<&BoundaryNegotiator> {
        self.edges.get(&edge)
    }

    /// Stretch of its edge owned by an edge marker, local units
    pub fn interval(&self, id: MarkerId) -> Option<Interval> {
        let edge = self.markers.get(&id)?.as_edge()?.edge();
        self.edges.get(&edge)?.interval(id)
    }

    /// Screen rectangle where a marker can be grabbed.
    ///
    /// Edge markers own their negotiated stretch of the edge strip; other
    /// markers get a square around their position. Both are grown to
    /// `min_touch` and kept inside the grid.
    pub fn touch_rect(
        &self,
        id: MarkerId,
        frame: &CoordinateFrame,
        min_touch: f64,
        edge_depth: f64,
    ) -> Option<Rect> {
        let marker = self.markers.get(&id)?;
        let grid = frame.screen_rect();
        let anchor = frame.local_to_screen(marker.position());

        let Some(edge_marker) = marker.as_edge() else {
            let square = Rect::from_center_size(anchor, Size::new(min_touch, min_touch));
            return Some(hit_test::clamp_into(square, grid));
        };

        let edge = edge_marker.edge();
        let axis = edge.axis();
        let strip = edge.strip(grid, edge_depth);
        let interval = self.edges.get(&edge)?.interval(id)?;
        let to_screen = |local: f64| {
            axis.of_point(frame.local_to_screen(axis.with_point(marker.position(), local)))
        };
        let (lower, upper) = (to_screen(interval.lower), to_screen(interval.upper));
        let (start, end) = (lower.min(upper), lower.max(upper));
        let owned = match axis {
            Axis::Horizontal => Rect::new(start, strip.y0, end, strip.y1),
            Axis::Vertical => Rect::new(strip.x0, start, strip.x1, end),
        };
        let anchor = axis.other().with_point(anchor, axis.other().of_point(strip.center()));
        Some(hit_test::enlarge_to_min(
            owned,
            anchor,
            edge.touch_size(min_touch, edge_depth),
            strip,
        ))
    }

    // ===== Movement =====

    /// Move a marker and propagate to everything derived from it
    pub fn move_marker(
        &mut self,
        id: MarkerId,
        local: Point,
        convert: ValueFn<'_>,
    ) -> Result<Vec<MarkerMoved>, MarkerError> {
        self.place(id, local)?;
        Ok(self.propagate(&[id], convert))
    }

    /// Drag a delta marker: both parents move by the same local delta, as
    /// far as both can stay inside the frame
    pub fn translate_parents(
        &mut self,
        id: MarkerId,
        delta: Vec2,
        convert: ValueFn<'_>,
    ) -> Result<Vec<MarkerMoved>, MarkerError> {
        let marker = self.markers.get(&id).ok_or(MarkerError::NotRegistered(id))?;
        let Some(parents) = marker.parents() else {
            let target = marker.position() + delta;
            return self.move_marker(id, target, convert);
        };

        let mut allowed = delta;
        for parent in parents {
            let position = self
                .markers
                .get(&parent)
                .ok_or(MarkerError::NotRegistered(parent))?
                .position();
            allowed = limit_delta(allowed, position, self.bounds);
        }
        for parent in parents {
            let position = self
                .markers
                .get(&parent)
                .map(Indicator::position)
                .ok_or(MarkerError::NotRegistered(parent))?;
            self.place(parent, position + allowed)?;
        }
        Ok(self.propagate(&parents, convert))
    }

    fn place(&mut self, id: MarkerId, local: Point) -> Result<Point, MarkerError> {
        let bounds = self.bounds;
        let marker = self
            .markers
            .get_mut(&id)
            .ok_or(MarkerError::NotRegistered(id))?;
        let position = marker.set_position(local, bounds);
        if let Some(edge) = marker.as_edge() {
            let (edge, along) = (edge.edge(), edge.along());
            self.negotiator_mut(edge).update_element(id, along)?;
        }
        Ok(position)
    }

    /// Breadth-first recompute of everything derived from `roots`. Each
    /// parent -> dependent link is followed at most once, which cuts cycles.
    fn propagate(&mut self, roots: &[MarkerId], convert: ValueFn<'_>) -> Vec<MarkerMoved> {
        let mut order: Vec<MarkerId> = roots.to_vec();
        let mut followed = HashSet::new();
        let mut queue: VecDeque<MarkerId> = roots.iter().copied().collect();

        while let Some(parent) = queue.pop_front() {
            let Some(position) = self.markers.get(&parent).map(Indicator::position) else {
                continue;
            };
            for dependent in self.links.dependents(parent) {
                if !followed.insert((parent, dependent)) {
                    continue;
                }
                let Some(marker) = self.markers.get_mut(&dependent) else {
                    continue;
                };
                marker.on_moved(parent, position);
                marker.recompute();
                if !order.contains(&dependent) {
                    order.push(dependent);
                }
                queue.push_back(dependent);
            }
        }

        order
            .into_iter()
            .filter_map(|id| {
                let marker = self.markers.get(&id)?;
                Some(MarkerMoved {
                    id,
                    position: marker.position(),
                    value: self.value(id, convert)?,
                })
            })
            .collect()
    }

    fn negotiator_mut(&mut self, edge: Edge) -> &mut BoundaryNegotiator {
        let bounds = self.bounds;
        self.edges.entry(edge).or_insert_with(|| {
            let (min, max) = match edge.axis() {
                Axis::Horizontal => (bounds.x0, bounds.x1),
                Axis::Vertical => (bounds.y0, bounds.y1),
            };
            BoundaryNegotiator::new(min, max)
        })
    }
}

/// Shrink `delta` so that `position + delta` stays inside `bounds`
fn limit_delta(delta: Vec2, position: Point, bounds: Rect) -> Vec2 {
    Vec2::new(
        delta.x.clamp(bounds.x0 - position.x, bounds.x1 - position.x),
        delta.y.clamp(bounds.y0 - position.y, bounds.y1 - position.y),
    )
}
