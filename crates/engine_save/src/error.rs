//! Save/load error types.

use std::path::PathBuf;

use engine_component::ComponentError;

/// Errors that abort a save or load.
///
/// A failed load never touches the target world: entities are only inserted
/// once the whole file has been parsed and every component rebuilt.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Reading or writing a save file failed.
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// There is no save file with the requested name.
    #[error("no saved world named '{name}' (expected at '{}')", path.display())]
    SaveNotFound { name: String, path: PathBuf },

    /// Loading into a world that already has entities is unsupported.
    #[error("cannot load into a non-empty world ({entities} entities present)")]
    WorldNotEmpty { entities: usize },

    /// A leaf value names a type code with no codec behind it.
    #[error("there is no codec for type code '{code}'")]
    MissingCodec { code: String },

    /// A container's opening bracket has no matching close.
    #[error("text must contain a closing '{close}' for its opening '{open}': '{text}'")]
    UnbalancedBrackets { open: char, close: char, text: String },

    /// A mapping entry is missing its `=`.
    #[error("mapping body does not contain an unescaped '=': '{body}'")]
    MissingMapSeparator { body: String },

    /// Value text that does not follow the grammar.
    #[error("malformed value text '{text}': {reason}")]
    MalformedValue { text: String, reason: &'static str },

    /// A leaf payload that the codec for its type cannot decode.
    #[error("invalid {type_name} payload: '{payload}'")]
    InvalidPayload {
        type_name: &'static str,
        payload: String,
    },

    /// A save file line that does not follow its section's layout.
    #[error("line {line}: {reason}: '{text}'")]
    MalformedLine {
        line: usize,
        text: String,
        reason: String,
    },

    /// The file ended before every section was closed.
    #[error("malformed save file: {reason}")]
    MalformedFile { reason: String },

    /// A component line uses a component type code missing from the file's table.
    #[error("line {line}: component type code '{code}' is not in the component type table")]
    UnknownComponentType { line: usize, code: String },

    /// A component type named in the file is not registered in this process.
    #[error("component type '{type_name}' is not registered")]
    UnregisteredComponent { type_name: String },

    /// A component could not be rebuilt from its parsed properties.
    #[error("line {line}: {source}")]
    Component {
        line: usize,
        #[source]
        source: ComponentError,
    },

    /// Two component lines share an id.
    #[error("line {line}: duplicate component id {id}")]
    DuplicateComponentId { line: usize, id: u64 },

    /// An entity line references a component id that was never defined.
    #[error("line {line}: entity references unknown component id {id}")]
    UnknownComponentId { line: usize, id: u64 },

    /// A configuration file could not be parsed.
    #[error("invalid save configuration: {0}")]
    Config(#[from] serde_json::Error),
}
