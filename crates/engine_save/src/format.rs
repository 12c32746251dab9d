//! The line-oriented save file layout.
//!
//! ```text
//! # Storage Handler Type Encodings
//! <code>=<leaf type name>
//! -
//!
//! # Component Type Encodings
//! <code>=<component type name>
//! -
//!
//! # Components
//! <id>|<code>|<field>=<value>|...
//! -
//!
//! # Entities
//! <id>;<px>,<py>,<pz>,<sx>,<sy>,<sz>,<qx>,<qy>,<qz>,<qw>;<component id>,...
//! -
//! ```
//!
//! Empty lines and lines starting with `#` are ignored. Field values are kept
//! as raw value text here; decoding them needs the type tables, which is the
//! graph codec's job.

use engine_math::transform::FLAT_LEN;
use tracing::debug;

use crate::error::SaveError;
use crate::escape;
use crate::type_code::TypeCode;

/// Line that closes a section.
pub const SENTINEL: &str = "-";

const HEADERS: [&str; 4] = [
    "# Storage Handler Type Encodings",
    "# Component Type Encodings",
    "# Components",
    "# Entities",
];

/// One component line.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRecord {
    /// 1-based line number in the parsed file, `0` for records built in memory.
    pub line: usize,
    pub id: u64,
    pub type_code: TypeCode,
    /// `(field name, value text)` in file order.
    pub fields: Vec<(String, String)>,
}

/// One entity line.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// 1-based line number in the parsed file, `0` for records built in memory.
    pub line: usize,
    pub id: u64,
    /// Flattened transform, see [`engine_math::Transform::to_array`].
    pub transform: [f32; FLAT_LEN],
    pub components: Vec<u64>,
}

/// A whole save file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveFile {
    /// Leaf codec code → leaf type name, as registered when saving.
    pub leaf_types: Vec<(TypeCode, String)>,
    /// Per-save component type code → component type name.
    pub component_types: Vec<(TypeCode, String)>,
    pub components: Vec<ComponentRecord>,
    pub entities: Vec<EntityRecord>,
}

/// Where the parser is in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    LoadStorageHandlerCodes,
    LoadComponentCodes,
    LoadComponents,
    LoadEntities,
    Done,
}

impl LoadState {
    /// The state after the current section's sentinel.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            LoadState::LoadStorageHandlerCodes => LoadState::LoadComponentCodes,
            LoadState::LoadComponentCodes => LoadState::LoadComponents,
            LoadState::LoadComponents => LoadState::LoadEntities,
            LoadState::LoadEntities | LoadState::Done => LoadState::Done,
        }
    }
}

impl SaveFile {
    /// Render the file text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        write_type_table(&mut out, HEADERS[0], &self.leaf_types);
        out.push('\n');
        write_type_table(&mut out, HEADERS[1], &self.component_types);
        out.push('\n');

        out.push_str(HEADERS[2]);
        out.push('\n');
        for record in &self.components {
            out.push_str(&format!("{}|{}", record.id, record.type_code));
            for (name, value) in &record.fields {
                out.push('|');
                out.push_str(name);
                out.push('=');
                out.push_str(value);
            }
            out.push('\n');
        }
        out.push_str(SENTINEL);
        out.push_str("\n\n");

        out.push_str(HEADERS[3]);
        out.push('\n');
        for record in &self.entities {
            let transform = join(&record.transform);
            let components = join(&record.components);
            out.push_str(&format!("{};{transform};{components}\n", record.id));
        }
        out.push_str(SENTINEL);
        out.push('\n');
        out
    }

    /// Parse file text.
    ///
    /// # Errors
    ///
    /// - [`SaveError::MalformedLine`] for a line that does not fit its section.
    /// - [`SaveError::MalformedFile`] if the text ends before the entity
    ///   section is closed.
    pub fn parse(text: &str) -> Result<Self, SaveError> {
        let mut file = SaveFile::default();
        let mut state = LoadState::LoadStorageHandlerCodes;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            if line.trim_end() == SENTINEL {
                state = state.next();
                debug!(line = line_no, ?state, "entering save file section");
                continue;
            }
            match state {
                LoadState::LoadStorageHandlerCodes => {
                    file.leaf_types.push(parse_type_line(line_no, line)?);
                }
                LoadState::LoadComponentCodes => {
                    file.component_types.push(parse_type_line(line_no, line)?);
                }
                LoadState::LoadComponents => {
                    file.components.push(parse_component_line(line_no, line)?);
                }
                LoadState::LoadEntities => {
                    file.entities.push(parse_entity_line(line_no, line)?);
                }
                LoadState::Done => break,
            }
        }

        if state != LoadState::Done {
            return Err(SaveError::MalformedFile {
                reason: format!("file ended in state {state:?} before the entity section was closed"),
            });
        }
        Ok(file)
    }
}

fn write_type_table(out: &mut String, header: &str, table: &[(TypeCode, String)]) {
    out.push_str(header);
    out.push('\n');
    for (code, name) in table {
        out.push_str(&format!("{code}={name}\n"));
    }
    out.push_str(SENTINEL);
    out.push('\n');
}

fn join<T: ToString>(parts: &[T]) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn malformed(line: usize, text: &str, reason: impl Into<String>) -> SaveError {
    SaveError::MalformedLine {
        line,
        text: text.to_owned(),
        reason: reason.into(),
    }
}

fn is_type_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b':' | b'$'))
}

fn parse_type_line(line_no: usize, line: &str) -> Result<(TypeCode, String), SaveError> {
    let (code, name) = line
        .split_once('=')
        .ok_or_else(|| malformed(line_no, line, "expected '<code>=<type name>'"))?;
    let code = TypeCode::parse(code)
        .ok_or_else(|| malformed(line_no, line, "type code must be alphanumeric"))?;
    if !is_type_name(name) {
        return Err(malformed(line_no, line, "invalid type name"));
    }
    Ok((code, name.to_owned()))
}

fn parse_id(line_no: usize, line: &str, text: &str, what: &str) -> Result<u64, SaveError> {
    text.trim()
        .parse()
        .map_err(|_| malformed(line_no, line, format!("invalid {what} '{text}'")))
}

fn parse_component_line(line_no: usize, line: &str) -> Result<ComponentRecord, SaveError> {
    let parts = escape::split_unescaped(line, b'|');
    let [id, code, fields @ ..] = parts.as_slice() else {
        return Err(malformed(line_no, line, "expected '<id>|<type code>|...'"));
    };
    let id = parse_id(line_no, line, id, "component id")?;
    let type_code = TypeCode::parse(code)
        .ok_or_else(|| malformed(line_no, line, "component type code must be alphanumeric"))?;
    let fields = fields
        .iter()
        .map(|field| {
            let eq = escape::find_unescaped(field, b'=')
                .ok_or_else(|| malformed(line_no, line, format!("field '{field}' has no '='")))?;
            Ok((field[..eq].to_owned(), field[eq + 1..].to_owned()))
        })
        .collect::<Result<_, SaveError>>()?;
    Ok(ComponentRecord {
        line: line_no,
        id,
        type_code,
        fields,
    })
}

fn parse_entity_line(line_no: usize, line: &str) -> Result<EntityRecord, SaveError> {
    let parts = escape::split_unescaped(line, b';');
    let &[id, transform, components] = parts.as_slice() else {
        return Err(malformed(
            line_no,
            line,
            "expected '<id>;<transform>;<component ids>'",
        ));
    };
    let id = parse_id(line_no, line, id, "entity id")?;

    let values: Vec<f32> = transform
        .split(',')
        .map(|v| v.trim().parse())
        .collect::<Result<_, _>>()
        .map_err(|_| malformed(line_no, line, "invalid transform component"))?;
    let transform: [f32; FLAT_LEN] = values.try_into().map_err(|_| {
        malformed(
            line_no,
            line,
            format!("transform must have {} components", FLAT_LEN),
        )
    })?;

    let components = if components.trim().is_empty() {
        Vec::new()
    } else {
        components
            .split(',')
            .map(|c| parse_id(line_no, line, c, "component id"))
            .collect::<Result<_, _>>()?
    };

    Ok(EntityRecord {
        line: line_no,
        id,
        transform,
        components,
    })
}

#[cfg(test)]
mod tests {
    use engine_math::Transform;

    use super::*;

    fn sample() -> SaveFile {
        SaveFile {
            leaf_types: vec![
                (TypeCode::from_index(0), "f32".to_owned()),
                (TypeCode::from_index(1), "alloc::string::String".to_owned()),
            ],
            component_types: vec![(TypeCode::from_index(0), "game::Health".to_owned())],
            components: vec![ComponentRecord {
                line: 0,
                id: 7,
                type_code: TypeCode::from_index(0),
                fields: vec![
                    ("current".to_owned(), "0:80".to_owned()),
                    ("label".to_owned(), r"1:a\|b\=c".to_owned()),
                ],
            }],
            entities: vec![
                EntityRecord {
                    line: 0,
                    id: 1,
                    transform: Transform::IDENTITY.to_array(),
                    components: vec![7],
                },
                EntityRecord {
                    line: 0,
                    id: 2,
                    transform: [1.5, 0.0, -2.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0],
                    components: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_render_layout() {
        let text = sample().render();
        let expected = "\
# Storage Handler Type Encodings
0=f32
1=alloc::string::String
-

# Component Type Encodings
0=game::Health
-

# Components
7|0|current=0:80|label=1:a\\|b\\=c
-

# Entities
1;0,0,0,1,1,1,0,0,0,1;7
2;1.5,0,-2,1,1,1,0,0,0,1;
-
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_parse_rendered() {
        let file = sample();
        let parsed = SaveFile::parse(&file.render()).unwrap();
        assert_eq!(parsed.leaf_types, file.leaf_types);
        assert_eq!(parsed.component_types, file.component_types);
        assert_eq!(parsed.components[0].fields, file.components[0].fields);
        assert_eq!(parsed.components[0].line, 11);
        assert_eq!(parsed.entities[1].transform, file.entities[1].transform);
        assert!(parsed.entities[1].components.is_empty());
    }

    #[test]
    fn test_comments_blank_lines_and_crlf() {
        let text = "# leaf\r\n0=i32\r\n-\r\n\r\n-\r\n# none\r\n-\r\n# ents\r\n1;0,0,0,1,1,1,0,0,0,1;\r\n-\r\n";
        let file = SaveFile::parse(text).unwrap();
        assert_eq!(file.leaf_types.len(), 1);
        assert_eq!(file.entities.len(), 1);
    }

    #[test]
    fn test_trailing_whitespace_in_last_field_is_kept() {
        let text = "-\n-\n7|0|text=1:a  |sep=2: \r\n-\n-\n";
        let file = SaveFile::parse(text).unwrap();
        assert_eq!(
            file.components[0].fields,
            vec![
                ("text".to_owned(), "1:a  ".to_owned()),
                ("sep".to_owned(), "2: ".to_owned()),
            ]
        );
    }

    #[test]
    fn test_truncated_file() {
        let text = "0=i32\n-\n-\n";
        assert!(matches!(
            SaveFile::parse(text),
            Err(SaveError::MalformedFile { .. })
        ));
    }

    #[test]
    fn test_lines_after_done_are_ignored() {
        let text = "-\n-\n-\n-\nanything at all\n";
        assert!(SaveFile::parse(text).is_ok());
    }

    #[test]
    fn test_malformed_type_lines() {
        for line in ["nocode", "0-1=i32", "=i32", "0=", "0=has space", "0=a/b"] {
            let text = format!("{line}\n-\n-\n-\n-\n");
            assert!(
                matches!(SaveFile::parse(&text), Err(SaveError::MalformedLine { line: 1, .. })),
                "{line:?}"
            );
        }
    }

    #[test]
    fn test_malformed_component_lines() {
        for line in ["7", "x|0", "7|0|field", "7|0-|a=b"] {
            let text = format!("-\n-\n{line}\n-\n-\n");
            assert!(
                matches!(SaveFile::parse(&text), Err(SaveError::MalformedLine { line: 3, .. })),
                "{line:?}"
            );
        }
    }

    #[test]
    fn test_malformed_entity_lines() {
        for line in [
            "1;0,0,0",
            "1;0,0,0,1,1,1,0,0,0,1",
            "x;0,0,0,1,1,1,0,0,0,1;",
            "1;0,0,0,1,1,1,0,0,0,q;",
            "1;0,0,0,1,1,1,0,0,0,1;a",
        ] {
            let text = format!("-\n-\n-\n{line}\n-\n");
            assert!(
                matches!(SaveFile::parse(&text), Err(SaveError::MalformedLine { line: 4, .. })),
                "{line:?}"
            );
        }
    }

    #[test]
    fn test_load_state_order() {
        let mut state = LoadState::LoadStorageHandlerCodes;
        let mut seen = vec![state];
        while state != LoadState::Done {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(seen.len(), 5);
    }
}
