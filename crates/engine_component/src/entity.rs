//! Entity type and identifier allocation.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data
//! besides the transform the world stores for it.

use std::marker::PhantomData;

/// A unique entity identifier.
///
/// Entities are pure identifiers; components are attached to entities to
/// give them meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// An identifier type backed by a raw `u64`.
pub trait RawId: Copy {
    fn from_raw_id(raw: u64) -> Self;
}

impl RawId for Entity {
    fn from_raw_id(raw: u64) -> Self {
        Self(raw)
    }
}

/// Allocates monotonically increasing identifiers.
///
/// IDs start at 1; 0 is reserved as the invalid sentinel.
#[derive(Debug)]
pub struct IdAllocator<I> {
    next_id: u64,
    _marker: PhantomData<fn() -> I>,
}

impl<I: RawId> IdAllocator<I> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            _marker: PhantomData,
        }
    }

    /// Allocates a fresh identifier.
    pub fn allocate(&mut self) -> I {
        let id = self.next_id;
        self.next_id += 1;
        I::from_raw_id(id)
    }

    /// Returns the number of identifiers allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}

impl<I: RawId> Default for IdAllocator<I> {
    fn default() -> Self {
        Self::new()
    }
}

pub type EntityAllocator = IdAllocator<Entity>;
