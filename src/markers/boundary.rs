// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Boundary negotiation between markers sharing one axis.
//!
//! Markers on the same grid edge split the edge between them: each owns the
//! stretch from the midpoint with its lower neighbor to the midpoint with its
//! upper neighbor. The outermost markers extend to the ends of the range.
//! Together the intervals cover `[min, max]` without gaps or overlap, so
//! every touch on the edge belongs to exactly one marker.

use crate::error::MarkerError;
use crate::model::MarkerId;
use std::collections::HashMap;

/// The stretch of an axis owned by one marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Partitions `[min, max]` among registered markers
#[derive(Debug, Clone)]
pub struct BoundaryNegotiator {
    min: f64,
    max: f64,
    values: HashMap<MarkerId, f64>,
    /// Markers in ascending (value, id) order with their intervals
    intervals: Vec<(MarkerId, Interval)>,
}

impl BoundaryNegotiator {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
            values: HashMap::new(),
            intervals: Vec::new(),
        }
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, id: MarkerId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn value(&self, id: MarkerId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    pub fn add_element(&mut self, id: MarkerId, value: f64) -> Result<(), MarkerError> {
        if self.values.contains_key(&id) {
            return Err(MarkerError::AlreadyRegistered(id));
        }
        self.values.insert(id, self.clamp(value));
        self.recompute();
        Ok(())
    }

    pub fn update_element(&mut self, id: MarkerId, value: f64) -> Result<(), MarkerError> {
        let clamped = self.clamp(value);
        let slot = self
            .values
            .get_mut(&id)
            .ok_or(MarkerError::NotRegistered(id))?;
        *slot = clamped;
        self.recompute();
        Ok(())
    }

    pub fn remove_element(&mut self, id: MarkerId) -> Result<(), MarkerError> {
        self.values
            .remove(&id)
            .ok_or(MarkerError::NotRegistered(id))?;
        self.recompute();
        Ok(())
    }

    /// Change the partitioned range, keeping every marker
    pub fn set_range(&mut self, min: f64, max: f64) {
        self.min = min.min(max);
        self.max = max.max(min);
        let (lo, hi) = (self.min, self.max);
        for value in self.values.values_mut() {
            *value = value.clamp(lo, hi);
        }
        self.recompute();
    }

    pub fn interval(&self, id: MarkerId) -> Option<Interval> {
        self.intervals
            .iter()
            .find(|(marker, _)| *marker == id)
            .map(|(_, interval)| *interval)
    }

    /// All intervals in ascending order
    pub fn intervals(&self) -> &[(MarkerId, Interval)] {
        &self.intervals
    }

    /// Marker whose interval contains `value`; on a shared boundary the
    /// lower marker wins
    pub fn owner_of(&self, value: f64) -> Option<MarkerId> {
        self.intervals
            .iter()
            .find(|(_, interval)| interval.contains(value))
            .map(|(id, _)| *id)
    }

    fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    fn recompute(&mut self) {
        let mut sorted: Vec<(MarkerId, f64)> =
            self.values.iter().map(|(id, value)| (*id, *value)).collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        self.intervals.clear();
        for (index, (id, value)) in sorted.iter().enumerate() {
            let lower = match index {
                0 => self.min,
                _ => (sorted[index - 1].1 + value) / 2.0,
            };
            let upper = match sorted.get(index + 1) {
                Some((_, next)) => (value + next) / 2.0,
                None => self.max,
            };
            self.intervals.push((*id, Interval { lower, upper }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_marker_owns_the_whole_range() {
        let mut negotiator = BoundaryNegotiator::new(-0.5, 0.5);
        let a = MarkerId::next();
        negotiator.add_element(a, 0.1).expect("fresh marker");

        assert_eq!(
            negotiator.interval(a),
            Some(Interval {
                lower: -0.5,
                upper: 0.5
            })
        );
    }

    #[test]
    fn neighbors_split_at_midpoints() {
        let mut negotiator = BoundaryNegotiator::new(0.0, 1.0);
        let a = MarkerId::next();
        let b = MarkerId::next();
        let c = MarkerId::next();
        negotiator.add_element(a, 0.2).expect("fresh marker");
        negotiator.add_element(b, 0.6).expect("fresh marker");
        negotiator.add_element(c, 0.8).expect("fresh marker");

        let ids: Vec<_> = negotiator.intervals().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert!((negotiator.interval(a).map_or(0.0, |i| i.upper) - 0.4).abs() < 1e-12);
        let b_interval = negotiator.interval(b).expect("b is registered");
        assert!((b_interval.lower - 0.4).abs() < 1e-12);
        assert!((b_interval.upper - 0.7).abs() < 1e-12);
        assert_eq!(negotiator.interval(c).map(|i| i.upper), Some(1.0));
        assert_eq!(negotiator.owner_of(0.65), Some(b));
    }

    #[test]
    fn update_and_remove_recompute_everything() {
        let mut negotiator = BoundaryNegotiator::new(0.0, 1.0);
        let a = MarkerId::next();
        let b = MarkerId::next();
        negotiator.add_element(a, 0.2).expect("fresh marker");
        negotiator.add_element(b, 0.6).expect("fresh marker");

        negotiator.update_element(a, 0.9).expect("a is registered");
        assert_eq!(negotiator.intervals()[0].0, b);
        assert!((negotiator.interval(b).map_or(0.0, |i| i.upper) - 0.75).abs() < 1e-12);

        negotiator.remove_element(b).expect("b is registered");
        assert_eq!(
            negotiator.interval(a),
            Some(Interval {
                lower: 0.0,
                upper: 1.0
            })
        );
    }

    #[test]
    fn ties_are_ordered_by_id() {
        let mut negotiator = BoundaryNegotiator::new(0.0, 1.0);
        let a = MarkerId::next();
        let b = MarkerId::next();
        negotiator.add_element(b, 0.5).expect("fresh marker");
        negotiator.add_element(a, 0.5).expect("fresh marker");

        let ids: Vec<_> = negotiator.intervals().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(negotiator.interval(a).map(|i| i.length()), Some(0.5));
    }

    #[test]
    fn misuse_is_reported() {
        let mut negotiator = BoundaryNegotiator::new(0.0, 1.0);
        let a = MarkerId::next();
        assert_eq!(
            negotiator.update_element(a, 0.5),
            Err(MarkerError::NotRegistered(a))
        );
        assert_eq!(negotiator.remove_element(a), Err(MarkerError::NotRegistered(a)));
        negotiator.add_element(a, 0.5).expect("fresh marker");
        assert_eq!(
            negotiator.add_element(a, 0.1),
            Err(MarkerError::AlreadyRegistered(a))
        );
    }

    #[test]
    fn values_are_clamped_into_range() {
        let mut negotiator = BoundaryNegotiator::new(0.0, 1.0);
        let a = MarkerId::next();
        negotiator.add_element(a, 3.0).expect("fresh marker");
        assert_eq!(negotiator.value(a), Some(1.0));
        negotiator.set_range(0.0, 0.5);
        assert_eq!(negotiator.value(a), Some(0.5));
    }

    proptest! {
        #[test]
        fn partition_covers_range_without_gaps(
            values in proptest::collection::vec(-1.0f64..2.0, 1..20)
        ) {
            let mut negotiator = BoundaryNegotiator::new(0.0, 1.0);
            for value in &values {
                negotiator.add_element(MarkerId::next(), *value).expect("fresh marker");
            }

            let intervals = negotiator.intervals();
            prop_assert_eq!(intervals.len(), values.len());
            prop_assert_eq!(intervals[0].1.lower, 0.0);
            prop_assert_eq!(intervals[intervals.len() - 1].1.upper, 1.0);
            for pair in intervals.windows(2) {
                prop_assert_eq!(pair[0].1.upper, pair[1].1.lower);
            }
            for (id, interval) in intervals {
                let value = negotiator.value(*id).expect("registered");
                prop_assert!(interval.lower <= value && value <= interval.upper);
            }
        }
    }
}
