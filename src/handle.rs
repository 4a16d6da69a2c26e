use std::ops::Deref;
use std::sync::Arc;
use std::{fmt::Debug, hash::Hash};

/// A shared handle to an indexed entity.
///
/// Handles compare by identity: two handles are equal iff they point at the
/// same allocation, regardless of what `T`'s own `PartialEq` says.
/// Indexes keep clones of the handle, so dropping an entity from every index
/// never frees it while the caller still holds one.
pub struct Handle<T> {
    inner: Arc<T>,
}
impl<T> Handle<T> {
    pub fn new(value: T) -> Self {
        Handle {
            inner: Arc::new(value),
        }
    }

    /// Address used for identity; stable for the lifetime of the allocation.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn into_arc(self) -> Arc<T> {
        self.inner
    }
}
impl<T> From<Arc<T>> for Handle<T> {
    fn from(inner: Arc<T>) -> Self {
        Handle { inner }
    }
}
impl<T> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}
impl<T> AsRef<T> for Handle<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
impl<T: Debug> Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}", self.inner))
    }
}
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
impl<T> Eq for Handle<T> {}
impl<T> Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_are_distinct_handles() {
        let a = Handle::new(7);
        let b = Handle::new(7);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(*a, *b);
    }

    #[test]
    fn wraps_existing_arc() {
        let arc = Arc::new("x".to_string());
        let handle = Handle::from(arc.clone());
        assert!(Arc::ptr_eq(&arc, &handle.clone().into_arc()));
        assert_eq!(handle.len(), 1);
    }
}
