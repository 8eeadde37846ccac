//! Shared record store.
//!
//! `Store` is the single access point to the process-wide point index. The
//! index lives behind a `parking_lot::RwLock`: `insert`, `delete` and
//! `clear` hold the write lock for the whole mutation, including the
//! counter updates, and `nearest` and the other readers hold the read lock.
//! A query or [`Store::stats`] never observes a half applied insert or
//! delete.
//!
//! Share one `Store` between tasks with `Arc<Store>`.

use crate::compute::spatial::{Neighbor, PointIndex};
use kdtreed_types::{Payload, Point, Record};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters and current size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub records: usize,
    pub inserts: u64,
    pub deletes: u64,
    /// Records removed by deletes and clears.
    pub removed: u64,
    pub queries: u64,
}

/// Concurrent multiset of `(point, payload)` records.
#[derive(Debug, Default)]
pub struct Store {
    index: RwLock<PointIndex>,
    inserts: AtomicU64,
    deletes: AtomicU64,
    removed: AtomicU64,
    queries: AtomicU64,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        Self {
            index: RwLock::new(PointIndex::bulk_load(records)),
            ..Self::default()
        }
    }

    /// Add a record. Always succeeds; duplicates are allowed.
    pub fn insert(&self, point: Point, payload: Payload) {
        let mut index = self.index.write();
        index.insert(Record::new(point, payload));
        self.inserts.fetch_add(1, Ordering::Relaxed);
        drop(index);
        log::trace!("inserted {} {}", point, payload);
    }

    /// Remove every record at exactly `point`.
    ///
    /// Returns the number of records removed; zero means nothing matched,
    /// which is not an error.
    pub fn delete(&self, point: &Point) -> usize {
        let mut index = self.index.write();
        let removed = index.remove_at(point);
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.removed.fetch_add(removed as u64, Ordering::Relaxed);
        drop(index);
        log::debug!("delete {} removed {} record(s)", point, removed);
        removed
    }

    /// Up to `k` records ordered by ascending Euclidean distance to `point`.
    ///
    /// Returns every record when the store holds fewer than `k`, and nothing
    /// when `k` is zero.
    pub fn nearest(&self, point: &Point, k: usize) -> Vec<Neighbor> {
        let results = self.index.read().nearest(point, k);
        self.queries.fetch_add(1, Ordering::Relaxed);
        results
    }

    /// Number of records at exactly `point`.
    pub fn count_at(&self, point: &Point) -> usize {
        self.index.read().count_at(point)
    }

    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every record, in unspecified order.
    pub fn records(&self) -> Vec<Record> {
        self.index.read().iter().copied().collect()
    }

    /// Drop every record, returning how many were held.
    pub fn clear(&self) -> usize {
        let mut index = self.index.write();
        let removed = index.clear();
        self.removed.fetch_add(removed as u64, Ordering::Relaxed);
        drop(index);
        log::debug!("cleared {} record(s)", removed);
        removed
    }

    /// Consistent snapshot of the size and mutation counters.
    ///
    /// Mutation counters only move under the write lock, so reading them
    /// under the read lock always gives `inserts - removed == records`.
    /// `queries` is bumped by readers and may run slightly ahead.
    pub fn stats(&self) -> StoreStats {
        let index = self.index.read();
        StoreStats {
            records: index.len(),
            inserts: self.inserts.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_two_nearest_of_three() {
        let store = Store::new();
        store.insert(Point::new(1, 1), 10);
        store.insert(Point::new(2, 2), 20);
        store.insert(Point::new(10, 10), 30);

        let records: Vec<_> = store
            .nearest(&Point::new(0, 0), 2)
            .into_iter()
            .map(|n| n.record)
            .collect();
        assert_eq!(
            records,
            vec![
                Record::new(Point::new(1, 1), 10),
                Record::new(Point::new(2, 2), 20)
            ]
        );
    }

    #[test]
    fn test_insert_then_query_same_point() {
        let store = Store::new();
        store.insert(Point::new(3, 4), 7);

        let results = store.nearest(&Point::new(3, 4), 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record, Record::new(Point::new(3, 4), 7));
        assert_eq!(results[0].distance, 0.0);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = Store::new();
        store.insert(Point::new(5, 5), 1);
        store.insert(Point::new(5, 5), 2);

        assert_eq!(store.delete(&Point::new(5, 5)), 2);
        assert_eq!(store.delete(&Point::new(5, 5)), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_k_and_empty_store() {
        let store = Store::new();
        assert!(store.nearest(&Point::new(1, 1), 5).is_empty());

        store.insert(Point::new(0, 0), 1);
        assert!(store.nearest(&Point::new(0, 0), 0).is_empty());
    }

    #[test]
    fn test_with_records_and_clear() {
        let store = Store::with_records((0..10).map(|i| Record::new(Point::new(i, 0), 0)));
        assert_eq!(store.len(), 10);
        assert_eq!(store.count_at(&Point::new(3, 0)), 1);
        assert_eq!(store.clear(), 10);
        assert!(store.is_empty());
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_stats_track_operations() {
        let store = Store::new();
        store.insert(Point::new(1, 1), 1);
        store.insert(Point::new(1, 1), 2);
        store.insert(Point::new(2, 2), 3);
        store.delete(&Point::new(1, 1));
        store.delete(&Point::new(9, 9));
        store.nearest(&Point::new(0, 0), 1);

        assert_eq!(
            store.stats(),
            StoreStats {
                records: 1,
                inserts: 3,
                deletes: 2,
                removed: 2,
                queries: 1,
            }
        );
    }
}
