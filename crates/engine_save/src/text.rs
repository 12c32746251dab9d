//! Structural text form of [`Value`]s.
//!
//! ```text
//! value := "null" | leaf | list | map
//! leaf  := code ":" escaped-payload
//! list  := "[" (value (";" value)*)? "]"
//! map   := "{" (value "=" value (";" value "=" value)*)? "}"
//! ```
//!
//! Sets are written as lists. A leaf payload runs up to the first unescaped
//! `;` or `=`, or to the end of the enclosing container body.

use engine_component::{LeafKind, Value};
use engine_resource::ResourceKit;
use tracing::warn;

use crate::codec::{CodecTable, Translation};
use crate::error::SaveError;
use crate::escape::{self, ESCAPE};

/// Text of [`Value::Null`].
pub const NULL: &str = "null";

/// Writes values as structural text.
///
/// Leaves of a kind without a registered codec are written as `null`. The
/// serializer keeps count of them so callers can report the loss.
#[derive(Debug)]
pub struct Serializer<'a> {
    codecs: &'a CodecTable,
    kits: &'a [&'a ResourceKit],
    unregistered: usize,
}

impl<'a> Serializer<'a> {
    #[must_use]
    pub fn new(codecs: &'a CodecTable, kits: &'a [&'a ResourceKit]) -> Self {
        Self {
            codecs,
            kits,
            unregistered: 0,
        }
    }

    pub fn serialize(&mut self, value: &Value) -> String {
        let mut out = String::new();
        self.write(value, &mut out);
        out
    }

    /// Number of leaves written as `null` because their kind has no codec.
    #[must_use]
    pub fn unregistered_count(&self) -> usize {
        self.unregistered
    }

    fn write(&mut self, value: &Value, out: &mut String) {
        match value {
            Value::Null => out.push_str(NULL),
            Value::Leaf(leaf) => match self.codecs.encode(leaf, self.kits) {
                Some((code, payload)) => {
                    out.push_str(code.as_str());
                    out.push(':');
                    out.push_str(&escape::encode(&payload));
                }
                None => {
                    self.unregistered += 1;
                    warn!(
                        type_name = leaf.kind().type_name(),
                        "no codec registered for leaf type; writing null"
                    );
                    out.push_str(NULL);
                }
            },
            Value::List(items) | Value::Set(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(';');
                    }
                    self.write(item, out);
                }
                out.push(']');
            }
            Value::Map(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(';');
                    }
                    self.write(key, out);
                    out.push('=');
                    self.write(value, out);
                }
                out.push('}');
            }
        }
    }
}

/// Recursive-descent parser for structural text.
///
/// With a [`Translation`], leaf codes are read as codes of the file that
/// produced the text and mapped to live codes first.
#[derive(Debug, Clone, Copy)]
pub struct Deserializer<'a> {
    codecs: &'a CodecTable,
    translation: Option<&'a Translation>,
    kits: &'a [&'a ResourceKit],
}

impl<'a> Deserializer<'a> {
    #[must_use]
    pub fn new(codecs: &'a CodecTable, kits: &'a [&'a ResourceKit]) -> Self {
        Self {
            codecs,
            translation: None,
            kits,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, translation: &'a Translation) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Parse the whole of `text` as one value.
    ///
    /// # Errors
    ///
    /// See [`Deserializer::parse_first`]. Text left over after the first
    /// value is a [`SaveError::MalformedValue`].
    pub fn deserialize(&self, text: &str) -> Result<Value, SaveError> {
        let (value, rest) = self.parse_item(text)?;
        if !rest.is_empty() {
            return Err(SaveError::MalformedValue {
                text: text.to_owned(),
                reason: "unexpected text after value",
            });
        }
        Ok(value)
    }

    /// Parse one value from the front of `text`.
    ///
    /// Returns the value and the text after it, with one leading `;`
    /// consumed if present.
    ///
    /// # Errors
    ///
    /// - [`SaveError::UnbalancedBrackets`] if a container is not closed.
    /// - [`SaveError::MissingMapSeparator`] if a map entry has no `=`.
    /// - [`SaveError::MissingCodec`] if a leaf code has no codec.
    /// - [`SaveError::MalformedValue`] for any other grammar violation.
    /// - Codec errors for leaf payloads that do not decode.
    pub fn parse_first<'t>(&self, text: &'t str) -> Result<(Value, &'t str), SaveError> {
        let (value, rest) = self.parse_item(text)?;
        Ok((value, rest.strip_prefix(';').unwrap_or(rest)))
    }

    /// Parse one value, returning the text that follows it untouched.
    fn parse_item<'t>(&self, text: &'t str) -> Result<(Value, &'t str), SaveError> {
        if text.starts_with('[') {
            let (body, rest) = extract_balanced(text, '[', ']')?;
            Ok((Value::List(self.parse_list_body(body)?), rest))
        } else if text.starts_with('{') {
            let (body, rest) = extract_balanced(text, '{', '}')?;
            Ok((Value::Map(self.parse_map_body(body)?), rest))
        } else if let Some(rest) = text.strip_prefix(NULL) {
            Ok((Value::Null, rest))
        } else {
            self.parse_leaf(text)
        }
    }

    fn parse_leaf<'t>(&self, text: &'t str) -> Result<(Value, &'t str), SaveError> {
        let colon = escape::find_unescaped(text, b':').ok_or_else(|| SaveError::MalformedValue {
            text: text.to_owned(),
            reason: "expected a type code followed by ':'",
        })?;
        let code = &text[..colon];
        let rest = &text[colon + 1..];
        let end = escape::find_unescaped_any(rest, b";=").unwrap_or(rest.len());
        let (payload, remainder) = rest.split_at(end);

        let kind = self.resolve(code)?;
        let value = self
            .codecs
            .decode(kind, &escape::decode(payload), self.kits)?;
        Ok((value, remainder))
    }

    fn resolve(&self, code: &str) -> Result<LeafKind, SaveError> {
        let live = match self.translation {
            Some(translation) => translation.resolve(code).map(|c| c.as_str()),
            None => Some(code),
        };
        live.and_then(|c| self.codecs.kind_of(c))
            .ok_or_else(|| SaveError::MissingCodec {
                code: code.to_owned(),
            })
    }

    fn parse_list_body(&self, mut body: &str) -> Result<Vec<Value>, SaveError> {
        let mut items = Vec::new();
        if body.is_empty() {
            return Ok(items);
        }
        loop {
            let (item, rest) = self.parse_item(body)?;
            items.push(item);
            match next_entry(rest)? {
                Some(next) => body = next,
                None => return Ok(items),
            }
        }
    }

    fn parse_map_body(&self, mut body: &str) -> Result<Vec<(Value, Value)>, SaveError> {
        let mut entries = Vec::new();
        if body.is_empty() {
            return Ok(entries);
        }
        loop {
            let (key, rest) = self.parse_item(body)?;
            let rest = rest
                .strip_prefix('=')
                .ok_or_else(|| SaveError::MissingMapSeparator {
                    body: body.to_owned(),
                })?;
            let (value, rest) = self.parse_item(rest)?;
            entries.push((key, value));
            match next_entry(rest)? {
                Some(next) => body = next,
                None => return Ok(entries),
            }
        }
    }
}

/// After an item inside a container body: `None` at the end of the body,
/// otherwise the text after the `;` separating it from the next item.
fn next_entry(rest: &str) -> Result<Option<&str>, SaveError> {
    if rest.is_empty() {
        return Ok(None);
    }
    match rest.strip_prefix(';') {
        Some(next) => Ok(Some(next)),
        None => Err(SaveError::MalformedValue {
            text: rest.to_owned(),
            reason: "expected ';' between container items",
        }),
    }
}

/// Split `text`, which starts with `open`, into the body of the container and
/// the text after its matching `close`.
///
/// Only `open`/`close` are counted; escaped occurrences are skipped.
///
/// # Errors
///
/// [`SaveError::UnbalancedBrackets`] if the container is never closed.
pub fn extract_balanced(text: &str, open: char, close: char) -> Result<(&str, &str), SaveError> {
    let (open_b, close_b) = (open as u8, close as u8);
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, &b) in text.as_bytes().iter().enumerate() {
        if escaped {
            escaped = false;
        } else if b == ESCAPE {
            escaped = true;
        } else if b == open_b {
            depth += 1;
        } else if b == close_b {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Ok((&text[1..i], &text[i + 1..]));
            }
        }
    }
    Err(SaveError::UnbalancedBrackets {
        open,
        close,
        text: text.to_owned(),
    })
}
