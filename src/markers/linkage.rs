// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Parent -> dependent links between markers.
//!
//! A derived marker subscribes to each of its parents and keeps the returned
//! `Subscription`. The link lives exactly as long as the handle: dropping it
//! (or the marker holding it) unsubscribes.

use crate::model::MarkerId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
struct Links {
    next_key: u64,
    /// parent -> (subscription key, dependent)
    by_parent: HashMap<MarkerId, Vec<(u64, MarkerId)>>,
}

impl Links {
    fn remove(&mut self, parent: MarkerId, key: u64) {
        if let Some(list) = self.by_parent.get_mut(&parent) {
            list.retain(|(k, _)| *k != key);
            if list.is_empty() {
                self.by_parent.remove(&parent);
            }
        }
    }
}

/// Registry of marker links, shared with the subscriptions it hands out
#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    inner: Rc<RefCell<Links>>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `dependent` follow `parent`
    pub fn subscribe(&self, parent: MarkerId, dependent: MarkerId) -> Subscription {
        let mut links = self.inner.borrow_mut();
        let key = links.next_key;
        links.next_key += 1;
        links
            .by_parent
            .entry(parent)
            .or_default()
            .push((key, dependent));
        tracing::trace!(?parent, ?dependent, "marker linked");
        Subscription {
            table: Rc::downgrade(&self.inner),
            parent,
            dependent,
            key,
        }
    }

    /// Direct dependents of `parent`, in subscription order
    pub fn dependents(&self, parent: MarkerId) -> Vec<MarkerId> {
        let links = self.inner.borrow();
        let mut out: Vec<MarkerId> = Vec::new();
        for (_, dependent) in links.by_parent.get(&parent).into_iter().flatten() {
            if !out.contains(dependent) {
                out.push(*dependent);
            }
        }
        out
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.inner.borrow().by_parent.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for one link. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    table: Weak<RefCell<Links>>,
    parent: MarkerId,
    dependent: MarkerId,
    key: u64,
}

impl Subscription {
    pub fn parent(&self) -> MarkerId {
        self.parent
    }

    pub fn dependent(&self) -> MarkerId {
        self.dependent
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        let Ok(mut links) = table.try_borrow_mut() else {
            tracing::warn!(
                parent = ?self.parent,
                dependent = ?self.dependent,
                "link table busy, stale link left behind"
            );
            return;
        };
        links.remove(self.parent, self.key);
        tracing::trace!(parent = ?self.parent, dependent = ?self.dependent, "marker unlinked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_the_handle_unlinks() {
        let table = LinkTable::new();
        let parent = MarkerId::next();
        let child = MarkerId::next();

        let sub = table.subscribe(parent, child);
        assert_eq!(table.dependents(parent), vec![child]);
        assert_eq!(sub.parent(), parent);

        drop(sub);
        assert!(table.dependents(parent).is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn duplicate_links_report_dependent_once() {
        let table = LinkTable::new();
        let parent = MarkerId::next();
        let child = MarkerId::next();
        let first = table.subscribe(parent, child);
        let _second = table.subscribe(parent, child);

        assert_eq!(table.dependents(parent), vec![child]);
        drop(first);
        assert_eq!(table.dependents(parent), vec![child]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn drop_while_table_is_borrowed_does_not_panic() {
        let table = LinkTable::new();
        let parent = MarkerId::next();
        let sub = table.subscribe(parent, MarkerId::next());
        {
            let _busy = table.inner.borrow();
            drop(sub);
        }
        // The link could not be removed and is still listed
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn handles_outliving_the_table_are_harmless() {
        let table = LinkTable::new();
        let sub = table.subscribe(MarkerId::next(), MarkerId::next());
        drop(table);
        drop(sub);
    }
}
