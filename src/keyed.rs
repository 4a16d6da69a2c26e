//! One named secondary index: an ordered map from projected key to the set
//! of entities sharing that key.

use std::{
    borrow::Borrow,
    collections::BTreeMap,
    fmt::Debug,
    ops::{Bound, RangeBounds},
};

use itertools::Itertools;

use crate::bucket::{Bucket, BucketSet};
use crate::handle::Handle;

/// Anything a [`MultiIndex`](crate::MultiIndex) slot can be keyed by.
///
/// `Send + Sync` lets the owning `MultiIndex` sit behind a lock shared
/// between threads. A standalone `KeyedIndex` only needs `K: Ord`, and its
/// entities need no bounds at all.
pub trait IndexKey: Ord + Debug + Send + Sync + 'static {}
impl<K: Ord + Debug + Send + Sync + 'static> IndexKey for K {}

pub type Projection<T, K> = Box<dyn Fn(&T) -> K + Send + Sync>;

pub struct KeyedIndex<T, K> {
    name: String,
    project: Projection<T, K>,
    buckets: BTreeMap<K, BucketSet<T>>,
    // total entities across all buckets
    len: usize,
}

impl<T, K: Ord> KeyedIndex<T, K> {
    pub fn new(
        name: impl Into<String>,
        project: impl Fn(&T) -> K + Send + Sync + 'static,
    ) -> Self {
        KeyedIndex {
            name: name.into(),
            project: Box::new(project),
            buckets: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key `entity` is (or would be) filed under.
    pub fn key_of(&self, entity: &T) -> K {
        (self.project)(entity)
    }

    /// Files `entity` under its projected key.
    /// Returns false if that exact handle was already there.
    pub fn add(&mut self, entity: &Handle<T>) -> bool {
        let key = self.key_of(entity);
        let inserted = self.buckets.entry(key).or_default().insert(entity.clone());
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Drops `entity` from its projected key's bucket, pruning the bucket once empty.
    /// Returns false if it was not filed there.
    pub fn remove(&mut self, entity: &Handle<T>) -> bool {
        let key = self.key_of(entity);
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return false;
        };
        if !bucket.remove(entity) {
            return false;
        }
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        self.len -= 1;
        true
    }

    pub fn lookup_exact<Q>(&self, key: &Q) -> Bucket<'_, T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Bucket::new(self.buckets.get(key))
    }

    /// Entities whose key falls in `range`, in ascending key order.
    /// An inverted range is simply empty.
    pub fn lookup_range<R: RangeBounds<K>>(&self, range: R) -> impl Iterator<Item = &Handle<T>> {
        let range = if is_inverted(&range) {
            None
        } else {
            Some(self.buckets.range(range))
        };
        range.into_iter().flatten().flat_map(|(_, bucket)| bucket.iter())
    }

    /// Every entity, grouped by ascending key.
    pub fn enumerate_ordered(&self) -> impl Iterator<Item = &Handle<T>> {
        self.buckets.values().flat_map(|bucket| bucket.iter())
    }

    /// Every entity, grouped by descending key.
    pub fn enumerate_ordered_rev(&self) -> impl Iterator<Item = &Handle<T>> {
        self.buckets.values().rev().flat_map(|bucket| bucket.iter())
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.buckets.keys()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct keys currently holding entities.
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }
}

impl<T, K: Ord + Debug> KeyedIndex<T, K> {
    /// One `key: count` line per bucket. Not meant to be parsed.
    pub fn to_debug_string(&self) -> String {
        self.buckets
            .iter()
            .map(|(key, bucket)| format!("{:?}: {}", key, bucket.len()))
            .join("\n")
    }
}

impl<T: Debug, K: Ord + Debug> KeyedIndex<T, K> {
    /// One `key: {entities}` line per bucket. Not meant to be parsed.
    pub fn dump(&self) -> String {
        self.buckets
            .iter()
            .map(|(key, bucket)| format!("{:?}: {:?}", key, Bucket::new(Some(bucket))))
            .join("\n")
    }
}

impl<T: Debug, K: Debug> Debug for KeyedIndex<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedIndex")
            .field("name", &self.name)
            .field("buckets", &self.buckets)
            .finish()
    }
}

// BTreeMap::range panics on these
fn is_inverted<K: Ord>(range: &impl RangeBounds<K>) -> bool {
    match (range.start_bound(), range.end_bound()) {
        (Bound::Excluded(start), Bound::Excluded(end)) => start >= end,
        (Bound::Included(start), Bound::Included(end))
        | (Bound::Included(start), Bound::Excluded(end))
        | (Bound::Excluded(start), Bound::Included(end)) => start > end,
        _ => false,
    }
}
