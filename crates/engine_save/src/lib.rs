//! # engine_save
//!
//! Self-describing text save files for [`engine_ecs::World`]s.
//!
//! A save file lists every component with its fields written as structural
//! value text, every entity with its transform and component ids, and two
//! type tables that make the file readable by a process whose codecs and
//! component types were registered in a different order.
//!
//! This crate provides:
//!
//! - [`escape`]: reversible escaping of the delimiters used in value text.
//! - [`TypeCode`] / [`TypeRegistry`]: short sequential type codes.
//! - [`CodecTable`]: one payload codec per leaf type, including resource
//!   handles that are written by name through [`ResourceKit`]s.
//! - [`Serializer`] / [`Deserializer`]: the structural text form of
//!   [`Value`]s.
//! - [`SaveFile`]: the line-oriented file layout.
//! - [`SceneStore`]: saving and loading whole worlds.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = Registry::with_default_codecs()
//!     .with_component::<Health>()
//!     .with_component::<Model>();
//! let store = SceneStore::new(&registry, SaveConfig::default());
//!
//! store.save("level1", &world, &[&kit])?;
//!
//! let mut restored = World::new();
//! store.load("level1", &mut restored, &[&kit])?;
//! ```
//!
//! [`ResourceKit`]: engine_resource::ResourceKit
//! [`Value`]: engine_component::Value

pub mod codec;
pub mod config;
pub mod error;
pub mod escape;
pub mod format;
pub mod graph;
pub mod registry;
pub mod text;
pub mod type_code;

pub use codec::{CodecEntry, CodecTable, LeafCodec, Translation};
pub use config::SaveConfig;
pub use error::SaveError;
pub use format::{ComponentRecord, EntityRecord, LoadState, SaveFile};
pub use graph::{LoadReport, SaveReport, SceneStore, load, save};
pub use registry::{ComponentTable, Registry};
pub use text::{Deserializer, Serializer};
pub use type_code::{TypeCode, TypeRegistry};
