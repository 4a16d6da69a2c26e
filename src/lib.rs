//! In-memory collections indexed by everything: one entity set, many named
//! secondary indexes, each an ordered map from a projected key to the
//! entities sharing it.
//!
//! General shape:
//! - entities are shared [`Handle`]s compared by identity, never by value
//! - every index is a [`KeyedIndex`] with its own key type; a [`MultiIndex`]
//!   owns a fixed set of them and fans every add/remove out to all
//! - named lookup goes through the erased [`Index`] capability, typed lookup
//!   through [`MultiIndex::typed_index`]
//!
//! Single owner, synchronous. Share between threads only behind one lock
//! around the whole [`MultiIndex`].

pub mod bucket;
pub mod error;
pub mod handle;
pub mod keyed;
pub mod multi;
pub mod people;

pub use bucket::Bucket;
pub use error::IndexError;
pub use handle::Handle;
pub use keyed::{IndexKey, KeyedIndex, Projection};
pub use multi::{ErasedIndex, Index, MultiIndex, MultiIndexBuilder};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, RwLock};
    use std::thread;

    #[test]
    fn shared_behind_one_lock() {
        let shared = Arc::new(RwLock::new(people::standard_index().unwrap()));

        let writers: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        let person = people::Person::new("P", "Q", 19000101 + t * 10000 + i % 28);
                        shared.write().unwrap().insert(person);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let persons = shared.read().unwrap();
        for name in persons.index_names() {
            assert_eq!(persons.index(name).unwrap().len(), 100, "index {name}");
        }
        let year = persons.typed_index::<i32>(people::YEAR).unwrap();
        assert_eq!(year.key_count(), 4);
    }
}
