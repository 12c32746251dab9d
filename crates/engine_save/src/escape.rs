//! Reversible escaping of structural delimiters in leaf payload text.
//!
//! Every structural character, and the escape character itself, is prefixed
//! with a backslash on encode. Line breaks become `\n` and `\r` so encoded
//! text always fits on one line of a save file. Decoding reverses both. A
//! backslash in front of any other character only appears in text that was
//! not produced by [`encode`] and is kept verbatim.
//!
//! The scanning helpers in this module treat a delimiter as escaped when it
//! is preceded by an odd number of backslashes.

/// Characters with structural meaning in the value grammar and save file.
pub const STRUCTURAL: &[u8] = b";:{}[]=|";

/// The escape character.
pub const ESCAPE: u8 = b'\\';

fn needs_escape(b: u8) -> bool {
    b == ESCAPE || STRUCTURAL.contains(&b)
}

/// Escape `text` for embedding as a leaf payload.
#[must_use]
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii() && needs_escape(c as u8) => {
                out.push(ESCAPE as char);
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Inverse of [`encode`].
#[must_use]
pub fn decode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESCAPE as char
            && let Some(&next) = chars.peek()
        {
            let unescaped = match next {
                'n' => Some('\n'),
                'r' => Some('\r'),
                next if next.is_ascii() && needs_escape(next as u8) => Some(next),
                _ => None,
            };
            if let Some(unescaped) = unescaped {
                out.push(unescaped);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Byte offset of the first unescaped occurrence of any byte in `targets`.
///
/// `targets` must be ASCII; UTF-8 continuation bytes never collide with it.
#[must_use]
pub fn find_unescaped_any(text: &str, targets: &[u8]) -> Option<usize> {
    let mut escaped = false;
    for (i, &b) in text.as_bytes().iter().enumerate() {
        if escaped {
            escaped = false;
        } else if b == ESCAPE {
            escaped = true;
        } else if targets.contains(&b) {
            return Some(i);
        }
    }
    None
}

/// Byte offset of the first unescaped `target`.
#[must_use]
pub fn find_unescaped(text: &str, target: u8) -> Option<usize> {
    find_unescaped_any(text, &[target])
}

/// Split `text` on every unescaped `delimiter`.
///
/// Like [`str::split`], this always yields at least one piece.
#[must_use]
pub fn split_unescaped(text: &str, delimiter: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(i) = find_unescaped(rest, delimiter) {
        parts.push(&rest[..i]);
        rest = &rest[i + 1..];
    }
    parts.push(rest);
    parts
}

/// Returns `true` if the byte at `index` is preceded by an odd number of
/// backslashes.
#[must_use]
pub fn is_escaped(text: &str, index: usize) -> bool {
    let preceding = text.as_bytes()[..index]
        .iter()
        .rev()
        .take_while(|&&b| b == ESCAPE)
        .count();
    preceding % 2 == 1
}
