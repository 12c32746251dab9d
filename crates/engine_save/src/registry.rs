//! The start-up registration context threaded through save and load.

use std::collections::HashMap;

use engine_component::{ComponentDescriptor, ComponentType};

use crate::codec::{CodecEntry, CodecTable};
use crate::type_code::{TypeCode, TypeRegistry};

/// Component types known to this process, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct ComponentTable {
    codes: TypeRegistry<&'static str>,
    descriptors: HashMap<&'static str, ComponentDescriptor>,
}

impl ComponentTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Registering the same type name again keeps the
    /// first descriptor and returns its code.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> TypeCode {
        self.descriptors
            .entry(descriptor.type_name)
            .or_insert(descriptor);
        self.codes.register(descriptor.type_name)
    }

    #[must_use]
    pub fn descriptor(&self, type_name: &str) -> Option<&ComponentDescriptor> {
        self.descriptors.get(type_name)
    }

    #[must_use]
    pub fn code_of(&self, type_name: &'static str) -> Option<&TypeCode> {
        self.codes.code_of(&type_name)
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.descriptors.contains_key(type_name)
    }

    /// Registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.codes.iter().map(|(name, _)| *name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Leaf codecs and component types, registered once at start-up and passed
/// to every save and load.
///
/// # Examples
///
/// ```rust,ignore
/// let mut registry = Registry::with_default_codecs();
/// registry.register_component::<Health>();
/// registry.register_component::<BoxCollider>();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    codecs: CodecTable,
    components: ComponentTable,
}

impl Registry {
    /// A registry with the given codecs and no component types.
    #[must_use]
    pub fn new(codecs: CodecTable) -> Self {
        Self {
            codecs,
            components: ComponentTable::new(),
        }
    }

    /// A registry with every built-in codec.
    #[must_use]
    pub fn with_default_codecs() -> Self {
        Self::new(CodecTable::with_defaults())
    }

    pub fn register_codec(&mut self, entry: CodecEntry) -> TypeCode {
        self.codecs.register(entry)
    }

    pub fn register_component<T: ComponentType>(&mut self) -> TypeCode {
        self.components.register(T::descriptor())
    }

    /// Builder-style [`Registry::register_component`].
    #[must_use]
    pub fn with_component<T: ComponentType>(mut self) -> Self {
        self.register_component::<T>();
        self
    }

    #[must_use]
    pub fn codecs(&self) -> &CodecTable {
        &self.codecs
    }

    #[must_use]
    pub fn components(&self) -> &ComponentTable {
        &self.components
    }
}
