//! Several named [`KeyedIndex`]es over one entity set, kept in step by fanning
//! every mutation out to all of them.
//!
//! Fan-out is not atomic across indexes: between the first and last index
//! being updated, a concurrent reader could see the entity in some indexes
//! and not others. Callers sharing a `MultiIndex` between threads must wrap
//! the whole structure in one lock and hold it across `add`/`remove` and
//! across lookups or enumerations.

use std::{
    any::{type_name, Any},
    fmt::{self, Debug, Display},
};

use ahash::HashMap;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::bucket::Bucket;
use crate::error::IndexError;
use crate::handle::Handle;
use crate::keyed::{IndexKey, KeyedIndex};

/// Read-only capability of one named index with its key type erased.
pub trait Index<T>: Send + Sync {
    fn name(&self) -> &str;

    fn key_type_name(&self) -> &'static str;

    /// Number of entities filed in this index.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up `key`, which must be of the index's owned key type: a
    /// `String`-keyed index needs `&String`, not `&str`. Anything else is
    /// [`IndexError::KeyTypeMismatch`]. Borrowed lookups go through
    /// [`MultiIndex::typed_index`].
    fn lookup_exact(&self, key: &dyn Any) -> Result<Bucket<'_, T>, IndexError>;

    fn enumerate_ordered(&self) -> Box<dyn Iterator<Item = &Handle<T>> + '_>;

    fn enumerate_ordered_rev(&self) -> Box<dyn Iterator<Item = &Handle<T>> + '_>;

    fn to_debug_string(&self) -> String;
}

/// An index a [`MultiIndex`] can own: the read capability plus mutation.
pub trait ErasedIndex<T>: Index<T> {
    fn add(&mut self, entity: &Handle<T>) -> bool;

    fn remove(&mut self, entity: &Handle<T>) -> bool;

    fn as_index(&self) -> &dyn Index<T>;

    fn as_any(&self) -> &dyn Any;
}

impl<T: Send + Sync + 'static, K: IndexKey> Index<T> for KeyedIndex<T, K> {
    fn name(&self) -> &str {
        KeyedIndex::name(self)
    }

    fn key_type_name(&self) -> &'static str {
        type_name::<K>()
    }

    fn len(&self) -> usize {
        KeyedIndex::len(self)
    }

    fn lookup_exact(&self, key: &dyn Any) -> Result<Bucket<'_, T>, IndexError> {
        match key.downcast_ref::<K>() {
            Some(key) => Ok(KeyedIndex::lookup_exact(self, key)),
            None => {
                debug!(
                    index = KeyedIndex::name(self),
                    expected = type_name::<K>(),
                    "key type mismatch"
                );
                Err(IndexError::KeyTypeMismatch {
                    index: KeyedIndex::name(self).to_string(),
                    expected: type_name::<K>(),
                })
            }
        }
    }

    fn enumerate_ordered(&self) -> Box<dyn Iterator<Item = &Handle<T>> + '_> {
        Box::new(KeyedIndex::enumerate_ordered(self))
    }

    fn enumerate_ordered_rev(&self) -> Box<dyn Iterator<Item = &Handle<T>> + '_> {
        Box::new(KeyedIndex::enumerate_ordered_rev(self))
    }

    fn to_debug_string(&self) -> String {
        KeyedIndex::to_debug_string(self)
    }
}

impl<T: Send + Sync + 'static, K: IndexKey> ErasedIndex<T> for KeyedIndex<T, K> {
    fn add(&mut self, entity: &Handle<T>) -> bool {
        KeyedIndex::add(self, entity)
    }

    fn remove(&mut self, entity: &Handle<T>) -> bool {
        KeyedIndex::remove(self, entity)
    }

    fn as_index(&self) -> &dyn Index<T> {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: Send + Sync + 'static, K: IndexKey> KeyedIndex<T, K> {
    pub fn boxed(self) -> Box<dyn ErasedIndex<T>> {
        Box::new(self)
    }
}

/// A fixed set of named indexes over the same entities.
///
/// Entities must be `Send + Sync + 'static`, and projections `Send + Sync`,
/// so the whole structure can be shared behind one lock. Entities holding
/// `Rc` or `Cell` can still be indexed by a standalone [`KeyedIndex`].
pub struct MultiIndex<T> {
    indexes: Vec<Box<dyn ErasedIndex<T>>>,
    positions: HashMap<String, usize>,
}

impl<T: Send + Sync + 'static> MultiIndex<T> {
    /// Takes ownership of `indexes`, kept in the given order.
    /// Fails if two share a name.
    pub fn new(
        indexes: impl IntoIterator<Item = Box<dyn ErasedIndex<T>>>,
    ) -> Result<Self, IndexError> {
        let indexes: Vec<_> = indexes.into_iter().collect();
        let mut positions = HashMap::default();
        for (position, index) in indexes.iter().enumerate() {
            if positions.insert(index.name().to_string(), position).is_some() {
                return Err(IndexError::DuplicateName {
                    name: index.name().to_string(),
                });
            }
        }
        debug!(
            indexes = %indexes.iter().map(|index| index.name()).join(", "),
            "built multi-index"
        );
        Ok(MultiIndex { indexes, positions })
    }

    pub fn builder() -> MultiIndexBuilder<T> {
        MultiIndexBuilder::default()
    }

    /// Files `entity` in every index, in construction order.
    /// Returns true if any index had not seen it before.
    pub fn add(&mut self, entity: &Handle<T>) -> bool {
        let mut added = false;
        for index in &mut self.indexes {
            added |= index.add(entity);
        }
        trace!(entity = entity.id(), added, "fan-out add");
        added
    }

    /// Wraps `value` in a fresh handle, files it, and hands the handle back.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        let entity = Handle::new(value);
        self.add(&entity);
        entity
    }

    /// Drops `entity` from every index.
    /// Returns true if any index actually held it.
    pub fn remove(&mut self, entity: &Handle<T>) -> bool {
        let mut removed = false;
        for index in &mut self.indexes {
            removed |= index.remove(entity);
        }
        trace!(entity = entity.id(), removed, "fan-out remove");
        removed
    }

    fn slot(&self, name: &str) -> Result<&dyn ErasedIndex<T>, IndexError> {
        match self.positions.get(name) {
            Some(&position) => Ok(&*self.indexes[position]),
            None => {
                debug!(index = name, "unknown index");
                Err(IndexError::unknown_index(name))
            }
        }
    }

    /// The named index with its key type erased.
    pub fn index(&self, name: &str) -> Result<&dyn Index<T>, IndexError> {
        self.slot(name).map(|slot| slot.as_index())
    }

    /// The named index as its concrete type, checked against `K`.
    pub fn typed_index<K: IndexKey>(&self, name: &str) -> Result<&KeyedIndex<T, K>, IndexError> {
        let slot = self.slot(name)?;
        slot.as_any()
            .downcast_ref::<KeyedIndex<T, K>>()
            .ok_or_else(|| IndexError::KeyTypeMismatch {
                index: name.to_string(),
                expected: slot.key_type_name(),
            })
    }

    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.iter().map(|index| index.name())
    }

    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    /// Every index's dump, in construction order. Not meant to be parsed.
    pub fn to_debug_string(&self) -> String {
        self.indexes
            .iter()
            .map(|index| format!("----- {} -----\n{}", index.name(), index.to_debug_string()))
            .join("\n")
    }
}

impl<T: Send + Sync + 'static> Display for MultiIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_debug_string())
    }
}

impl<T: Send + Sync + 'static> Debug for MultiIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.indexes
                    .iter()
                    .map(|index| (index.name(), index.key_type_name(), index.len())),
            )
            .finish()
    }
}

/// Collects named projections, then validates them into a [`MultiIndex`].
pub struct MultiIndexBuilder<T> {
    indexes: Vec<Box<dyn ErasedIndex<T>>>,
}

impl<T> Default for MultiIndexBuilder<T> {
    fn default() -> Self {
        MultiIndexBuilder { indexes: vec![] }
    }
}

impl<T: Send + Sync + 'static> MultiIndexBuilder<T> {
    pub fn index<K: IndexKey>(
        self,
        name: impl Into<String>,
        project: impl Fn(&T) -> K + Send + Sync + 'static,
    ) -> Self {
        self.with(KeyedIndex::new(name, project))
    }

    pub fn with<K: IndexKey>(mut self, index: KeyedIndex<T, K>) -> Self {
        self.indexes.push(index.boxed());
        self
    }

    pub fn build(self) -> Result<MultiIndex<T>, IndexError> {
        MultiIndex::new(self.indexes)
    }
}
