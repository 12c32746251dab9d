//! Component reconstruction errors.

/// Errors raised while rebuilding a component from its properties.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// A field without a default was absent.
    #[error("no value for required field '{field}' of component '{component}'")]
    MissingField { component: String, field: String },

    /// A field was present but held a value of the wrong shape.
    #[error("field '{field}' of component '{component}' expected {expected}, found {found}")]
    TypeMismatch {
        component: String,
        field: String,
        expected: &'static str,
        found: String,
    },
}
