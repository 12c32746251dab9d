//! Identity-compared shared handles.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A shared reference to a loaded resource.
///
/// Two handles are equal only if they point at the same allocation; two
/// separately loaded textures with identical contents are different
/// resources.
pub struct Handle<T>(Arc<T>);

impl<T> Handle<T> {
    /// Wrap a freshly loaded resource.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns `true` if both handles refer to the same resource.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Handle<T> {}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:?} @ {:p})", self.0, Arc::as_ptr(&self.0))
    }
}

impl<T> From<T> for Handle<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
