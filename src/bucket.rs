use std::fmt::Debug;

use ahash::HashSet;

use crate::handle::Handle;

pub type BucketSet<T> = HashSet<Handle<T>>;

/// Read-only view of the entities sharing one key in one index.
///
/// A lookup on an absent key yields an empty view without allocating.
/// Order within a bucket is arbitrary but stable while the index is unchanged.
pub struct Bucket<'a, T> {
    set: Option<&'a BucketSet<T>>,
}

impl<'a, T> Bucket<'a, T> {
    pub(crate) fn new(set: Option<&'a BucketSet<T>>) -> Self {
        Bucket { set }
    }

    pub fn empty() -> Self {
        Bucket { set: None }
    }

    pub fn len(&self) -> usize {
        self.set.map_or(0, |set| set.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the bucket holds anything at all.
    pub fn any(&self) -> bool {
        !self.is_empty()
    }

    pub fn contains(&self, entity: &Handle<T>) -> bool {
        self.set.map_or(false, |set| set.contains(entity))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Handle<T>> + 'a {
        self.set.into_iter().flatten()
    }

    /// Copies the handles out, detaching the result from the index borrow.
    pub fn to_vec(&self) -> Vec<Handle<T>> {
        self.iter().cloned().collect()
    }
}

impl<'a, T> Clone for Bucket<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, T> Copy for Bucket<'a, T> {}

impl<'a, T> IntoIterator for Bucket<'a, T> {
    type Item = &'a Handle<T>;

    type IntoIter = std::iter::Flatten<std::option::IntoIter<&'a BucketSet<T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.set.into_iter().flatten()
    }
}

impl<'a, T: Debug> Debug for Bucket<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
