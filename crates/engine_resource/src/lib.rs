//! # engine_resource
//!
//! Shared resources referenced by components. Resources are loaded elsewhere
//! and registered under a name; components hold [`Handle`]s to them, and
//! anything that needs to persist a component refers to the resource by the
//! name it was registered under.
//!
//! This crate provides:
//!
//! - [`Handle`]: shared pointer whose equality is identity.
//! - [`Texture`], [`Mesh`], [`ShaderProgram`], [`Font`], [`AudioClip`]:
//!   resource descriptors.
//! - [`Material`] and [`AudioSource`]: plain data used by render and audio
//!   components.
//! - [`Registry`] and [`ResourceKit`]: name-keyed lookup tables, one per
//!   resource category.

pub mod asset;
pub mod handle;
pub mod material;
pub mod registry;

pub use asset::{AudioClip, AudioSource, Font, Mesh, ShaderProgram, Texture};
pub use handle::Handle;
pub use material::Material;
pub use registry::{Registry, Resource, ResourceKit, find_in_kits, name_in_kits};
