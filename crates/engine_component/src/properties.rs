//! Named property maps used to rebuild components.

use std::collections::HashMap;

use crate::error::ComponentError;
use crate::value::{FromValue, Value};

/// The parsed properties of one component, keyed by field name.
///
/// Builders take fields out of the map one by one; each field can be taken
/// at most once.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    component: String,
    values: HashMap<String, Value>,
}

impl Properties {
    /// Create an empty map for a component of the given type.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            values: HashMap::new(),
        }
    }

    /// Name of the component type these properties belong to.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Set a property, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of the properties not yet taken, sorted.
    #[must_use]
    pub fn remaining(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Take a field that has no default.
    ///
    /// # Errors
    ///
    /// [`ComponentError::MissingField`] if the field is absent,
    /// [`ComponentError::TypeMismatch`] if it cannot be converted to `T`.
    pub fn required<T: FromValue>(&mut self, name: &str) -> Result<T, ComponentError> {
        match self.values.remove(name) {
            Some(value) => self.convert(name, value),
            None => Err(ComponentError::MissingField {
                component: self.component.clone(),
                field: name.to_owned(),
            }),
        }
    }

    /// Take a field if present.
    ///
    /// # Errors
    ///
    /// [`ComponentError::TypeMismatch`] if the field is present but cannot be
    /// converted to `T`.
    pub fn optional<T: FromValue>(&mut self, name: &str) -> Result<Option<T>, ComponentError> {
        match self.values.remove(name) {
            Some(value) => self.convert(name, value).map(Some),
            None => Ok(None),
        }
    }

    /// Take a field, falling back to `T::default()` when absent.
    ///
    /// # Errors
    ///
    /// [`ComponentError::TypeMismatch`] if the field is present but cannot be
    /// converted to `T`.
    pub fn or_default<T: FromValue + Default>(&mut self, name: &str) -> Result<T, ComponentError> {
        Ok(self.optional(name)?.unwrap_or_default())
    }

    fn convert<T: FromValue>(&self, name: &str, value: Value) -> Result<T, ComponentError> {
        let found = value.describe();
        T::from_value(value).ok_or_else(|| ComponentError::TypeMismatch {
            component: self.component.clone(),
            field: name.to_owned(),
            expected: std::any::type_name::<T>(),
            found,
        })
    }
}
