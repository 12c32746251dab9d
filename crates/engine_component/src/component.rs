//! Core [`Component`] trait and associated metadata.
//!
//! Every piece of data attached to an entity implements [`Component`]. The
//! trait is object safe so a world can hold components of many concrete
//! types side by side; it exposes the component's state as a list of named
//! [`Value`]s.
//!
//! ## Rebuilding components
//!
//! Going the other way, from a set of named values back to a concrete
//! component, is the job of [`ComponentType::from_properties`]. Each type
//! supplies it explicitly, and [`ComponentType::descriptor`] packages it as a
//! plain function pointer that registries can store without knowing the
//! concrete type.

use std::any::Any;
use std::fmt;

use crate::entity::RawId;
use crate::error::ComponentError;
use crate::properties::Properties;
use crate::value::Value;

/// A unique identifier for a component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl ComponentId {
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl RawId for ComponentId {
    fn from_raw_id(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.0)
    }
}

/// The object-safe component contract.
///
/// # Examples
///
/// ```rust
/// use std::any::Any;
/// use engine_component::{Component, ComponentError, ComponentType, Properties, Value};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name(&self) -> &'static str { Self::TYPE_NAME }
///     fn properties(&self) -> Vec<(&'static str, Value)> {
///         vec![("current", self.current.into()), ("max", self.max.into())]
///     }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// impl ComponentType for Health {
///     const TYPE_NAME: &'static str = "game::Health";
///     fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
///         Ok(Self { current: p.required("current")?, max: p.or_default("max")? })
///     }
/// }
/// ```
pub trait Component: Any + Send + Sync + fmt::Debug {
    /// Fully qualified name of the concrete type.
    fn type_name(&self) -> &'static str;

    /// The component's persistable state as `(field name, value)` pairs.
    ///
    /// Identity, owning entity and transform are never part of this list.
    fn properties(&self) -> Vec<(&'static str, Value)>;

    fn as_any(&self) -> &dyn Any;
}

/// A concrete component type that can be rebuilt from its properties.
pub trait ComponentType: Component + Sized {
    /// Fully qualified type name. Must be unique among registered types.
    const TYPE_NAME: &'static str;

    /// Rebuild a component from parsed properties.
    ///
    /// Fields without a default use [`Properties::required`]; fields with a
    /// default use [`Properties::optional`] or [`Properties::or_default`].
    fn from_properties(properties: &mut Properties) -> Result<Self, ComponentError>;

    /// The type-erased builder for this type.
    #[must_use]
    fn descriptor() -> ComponentDescriptor {
        ComponentDescriptor {
            type_name: Self::TYPE_NAME,
            build: |properties| {
                Self::from_properties(properties).map(|c| Box::new(c) as Box<dyn Component>)
            },
        }
    }
}

/// Builder function signature stored in a [`ComponentDescriptor`].
pub type BuildFn = fn(&mut Properties) -> Result<Box<dyn Component>, ComponentError>;

/// Type-erased description of a component type.
#[derive(Clone, Copy)]
pub struct ComponentDescriptor {
    /// The fully qualified type name.
    pub type_name: &'static str,
    /// Rebuilds a boxed component from parsed properties.
    pub build: BuildFn,
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl ComponentDescriptor {
    /// Build a component from `properties`.
    ///
    /// # Errors
    ///
    /// Propagates the builder's [`ComponentError`].
    pub fn build(&self, properties: &mut Properties) -> Result<Box<dyn Component>, ComponentError> {
        (self.build)(properties)
    }
}
