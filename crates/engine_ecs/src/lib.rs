//! # engine_ecs
//!
//! Runtime entity-component storage. Every entity owns a
//! [`Transform`](engine_math::Transform) and any number of boxed
//! [`Component`](engine_component::Component)s; components are grouped by
//! their concrete type so systems and serialisers can walk one type at a
//! time.

pub mod world;

pub use world::{ComponentGroup, ComponentSlot, EntityBlueprint, EntityData, World, WorldError};
