//! # engine_component
//!
//! The "C" in ECS. Defines what a component is, how it identifies itself,
//! and how its state is exposed as a set of named, dynamically typed
//! properties.
//!
//! This crate provides:
//!
//! - [`Component`] / [`ComponentType`]: the contract all ECS data must satisfy.
//! - [`Entity`], [`ComponentId`]: lightweight `u64` identifiers and their allocator.
//! - [`Value`] / [`Leaf`]: the closed value model properties are expressed in.
//! - [`Properties`] and [`ComponentDescriptor`]: rebuilding a component from
//!   a name → value map without reflection.

pub mod component;
pub mod entity;
pub mod error;
pub mod properties;
pub mod value;

pub use component::{Component, ComponentDescriptor, ComponentId, ComponentType};
pub use entity::{Entity, EntityAllocator, IdAllocator, RawId};
pub use error::ComponentError;
pub use properties::Properties;
pub use value::{FromValue, Leaf, LeafKind, Value};
