//! R*-tree backed point index.
//!
//! Records are stored as `GeomWithData<[i128; 2], Record>` so the tree sees a
//! plain 2D point while each entry keeps its original coordinates and
//! payload. The tree orders neighbours by squared distance, which for `u32`
//! coordinates reaches 2^65; `i128` holds that exactly where `f64` would
//! round distinct distances together.
//!
//! `PointIndex` is not synchronised; [`crate::db::Store`] owns it behind a
//! lock.

use kdtreed_types::{Point, Record};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use std::fmt;

pub(crate) type IndexedRecord = GeomWithData<[i128; 2], Record>;

/// A record returned from a nearest-neighbour query with its distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub record: Record,
    /// Euclidean distance from the query point.
    pub distance: f64,
}

/// Mutable multiset of records indexed by location.
#[derive(Default)]
pub struct PointIndex {
    tree: RTree<IndexedRecord>,
}

impl fmt::Debug for PointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointIndex")
            .field("len", &self.len())
            .finish()
    }
}

impl PointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from many records at once using R*-tree bulk loading.
    pub fn bulk_load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let entries = records
            .into_iter()
            .map(|record| GeomWithData::new(record.point.to_array(), record))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Insert a record. Duplicate points and payloads are kept.
    pub fn insert(&mut self, record: Record) {
        self.tree
            .insert(GeomWithData::new(record.point.to_array(), record));
    }

    /// Remove every record located exactly at `point`, returning how many
    /// were removed.
    pub fn remove_at(&mut self, point: &Point) -> usize {
        let key = point.to_array();
        let mut removed = 0;
        while self.tree.remove_at_point(&key).is_some() {
            removed += 1;
        }
        removed
    }

    /// Up to `k` records ordered by ascending distance to `center`.
    ///
    /// Equal distances come back in the tree's traversal order, which is
    /// deterministic for a given tree state.
    pub fn nearest(&self, center: &Point, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }

        self.tree
            .nearest_neighbor_iter(&center.to_array())
            .take(k)
            .map(|entry| Neighbor {
                record: entry.data,
                distance: entry.data.point.distance(center),
            })
            .collect()
    }

    /// Number of records at exactly `point`.
    pub fn count_at(&self, point: &Point) -> usize {
        self.tree.locate_all_at_point(&point.to_array()).count()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all records, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.len();
        self.tree = RTree::new();
        removed
    }

    /// Iterate over every record in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.tree.iter().map(|entry| &entry.data)
    }
}
