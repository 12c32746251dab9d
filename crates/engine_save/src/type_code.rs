//! Short alphanumeric type codes and the bidirectional registry that hands
//! them out.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Digits used for type codes, in order of value.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// A short, non-empty, alphanumeric identifier standing in for a type name
/// inside a save file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeCode(String);

impl TypeCode {
    /// The base-62 rendering of `index`: `0`..`z`, then `10`, `11`, ...
    #[must_use]
    pub fn from_index(mut index: usize) -> Self {
        let base = ALPHABET.len();
        let mut digits = Vec::new();
        loop {
            digits.push(ALPHABET[index % base]);
            index /= base;
            if index == 0 {
                break;
            }
        }
        digits.reverse();
        Self(digits.into_iter().map(char::from).collect())
    }

    /// Parse a code read from a file. Returns `None` unless `text` is a
    /// non-empty run of ASCII letters and digits.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some(Self(text.to_owned()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bidirectional map between keys and type codes.
///
/// Codes are assigned in registration order starting at `0`; registering an
/// existing key returns the code it already has.
#[derive(Debug, Clone)]
pub struct TypeRegistry<K> {
    codes: HashMap<K, TypeCode>,
    keys: HashMap<TypeCode, K>,
    order: Vec<K>,
}

impl<K: Clone + Eq + Hash> TypeRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            codes: HashMap::new(),
            keys: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Assign the next code to `key`, or return the one it already has.
    pub fn register(&mut self, key: K) -> TypeCode {
        if let Some(code) = self.codes.get(&key) {
            return code.clone();
        }
        let code = TypeCode::from_index(self.order.len());
        self.codes.insert(key.clone(), code.clone());
        self.keys.insert(code.clone(), key.clone());
        self.order.push(key);
        code
    }

    #[must_use]
    pub fn code_of(&self, key: &K) -> Option<&TypeCode> {
        self.codes.get(key)
    }

    /// The code of a key that must already be registered.
    ///
    /// # Panics
    ///
    /// If `key` was never registered. Every type has to be registered before
    /// it is used, so this is a programming error rather than bad input.
    #[must_use]
    pub fn expect_code(&self, key: &K) -> &TypeCode
    where
        K: fmt::Debug,
    {
        match self.codes.get(key) {
            Some(code) => code,
            None => panic!("type {key:?} used before registration"),
        }
    }

    #[must_use]
    pub fn key_of(&self, code: &str) -> Option<&K> {
        self.keys.get(code)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.codes.contains_key(key)
    }

    /// `(key, code)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &TypeCode)> {
        self.order.iter().map(|key| (key, &self.codes[key]))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K: Clone + Eq + Hash> Default for TypeRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
