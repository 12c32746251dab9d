//! Per-leaf-type payload codecs and the table that assigns them type codes.
//!
//! Each leaf type has exactly one codec: a pair of plain functions turning a
//! [`Leaf`] into payload text and back. Payloads produced here are *not*
//! escaped; the structural serializer escapes them when embedding them in
//! value text.
//!
//! Resource leaves (textures, meshes, shader programs, fonts, audio clips) are
//! written as the name the resource is registered under in one of the active
//! [`ResourceKit`]s. A resource that no kit knows is written as an empty
//! name and reads back as `Null`.

use std::collections::HashMap;
use std::fmt;

use engine_component::{Leaf, LeafKind, Value};
use engine_math::{BVec2, BVec3, BVec4, Mat2, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
use engine_resource::{
    AudioClip, AudioSource, Font, Handle, Material, Mesh, Resource, ResourceKit, ShaderProgram,
    Texture, find_in_kits, name_in_kits,
};
use tracing::{debug, warn};

use crate::error::SaveError;
use crate::escape;
use crate::type_code::{TypeCode, TypeRegistry};

/// Turns a leaf into payload text.
pub type SerializeFn = fn(&Leaf, &[&ResourceKit]) -> String;

/// Turns payload text back into a value. Resource lookups that miss yield
/// [`Value::Null`].
pub type DeserializeFn = fn(&str, &[&ResourceKit]) -> Result<Value, SaveError>;

/// A Rust type that is stored as one [`Leaf`] variant.
pub trait LeafCodec: Sized {
    const KIND: LeafKind;

    /// Borrow `Self` out of a leaf of the matching variant.
    fn from_leaf(leaf: &Leaf) -> Option<&Self>;

    fn encode(&self, kits: &[&ResourceKit]) -> String;

    /// # Errors
    ///
    /// [`SaveError::InvalidPayload`] if `payload` is not a valid encoding.
    fn decode(payload: &str, kits: &[&ResourceKit]) -> Result<Value, SaveError>;
}

fn invalid(kind: LeafKind, payload: &str) -> SaveError {
    SaveError::InvalidPayload {
        type_name: kind.type_name(),
        payload: payload.to_owned(),
    }
}

fn serialize_with<T: LeafCodec>(leaf: &Leaf, kits: &[&ResourceKit]) -> String {
    T::from_leaf(leaf).map(|v| v.encode(kits)).unwrap_or_default()
}

fn deserialize_with<T: LeafCodec>(payload: &str, kits: &[&ResourceKit]) -> Result<Value, SaveError> {
    T::decode(payload, kits)
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

macro_rules! scalar_codec {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl LeafCodec for $ty {
                const KIND: LeafKind = LeafKind::$variant;

                fn from_leaf(leaf: &Leaf) -> Option<&Self> {
                    match leaf {
                        Leaf::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn encode(&self, _kits: &[&ResourceKit]) -> String {
                    self.to_string()
                }

                fn decode(payload: &str, _kits: &[&ResourceKit]) -> Result<Value, SaveError> {
                    payload
                        .parse::<$ty>()
                        .map(Value::from)
                        .map_err(|_| invalid(Self::KIND, payload))
                }
            }
        )*
    };
}

scalar_codec! {
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
}

fn parse_bool(text: &str) -> bool {
    text.eq_ignore_ascii_case("true")
}

impl LeafCodec for bool {
    const KIND: LeafKind = LeafKind::Bool;

    fn from_leaf(leaf: &Leaf) -> Option<&Self> {
        match leaf {
            Leaf::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn encode(&self, _kits: &[&ResourceKit]) -> String {
        self.to_string()
    }

    fn decode(payload: &str, _kits: &[&ResourceKit]) -> Result<Value, SaveError> {
        Ok(parse_bool(payload).into())
    }
}

impl LeafCodec for char {
    const KIND: LeafKind = LeafKind::Char;

    fn from_leaf(leaf: &Leaf) -> Option<&Self> {
        match leaf {
            Leaf::Char(v) => Some(v),
            _ => None,
        }
    }

    fn encode(&self, _kits: &[&ResourceKit]) -> String {
        self.to_string()
    }

    fn decode(payload: &str, _kits: &[&ResourceKit]) -> Result<Value, SaveError> {
        let mut chars = payload.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c.into()),
            _ => Err(invalid(Self::KIND, payload)),
        }
    }
}

impl LeafCodec for String {
    const KIND: LeafKind = LeafKind::String;

    fn from_leaf(leaf: &Leaf) -> Option<&Self> {
        match leaf {
            Leaf::String(v) => Some(v),
            _ => None,
        }
    }

    fn encode(&self, _kits: &[&ResourceKit]) -> String {
        self.clone()
    }

    fn decode(payload: &str, _kits: &[&ResourceKit]) -> Result<Value, SaveError> {
        Ok(payload.into())
    }
}

// ---------------------------------------------------------------------------
// Vectors, matrices, quaternions
// ---------------------------------------------------------------------------

fn join<T: ToString>(parts: &[T]) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_floats<const N: usize>(kind: LeafKind, payload: &str) -> Result<[f32; N], SaveError> {
    let mut out = [0.0; N];
    let mut parts = payload.split(',');
    for slot in &mut out {
        *slot = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(|| invalid(kind, payload))?;
    }
    if parts.next().is_some() {
        return Err(invalid(kind, payload));
    }
    Ok(out)
}

fn parse_bools<const N: usize>(kind: LeafKind, payload: &str) -> Result<[bool; N], SaveError> {
    let parts: Vec<&str> = payload.split(',').collect();
    if parts.len() != N {
        return Err(invalid(kind, payload));
    }
    let mut out = [false; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_bool(part.trim());
    }
    Ok(out)
}

macro_rules! float_array_codec {
    ($($variant:ident => $ty:ty, $n:literal, $to:ident, $from:ident);* $(;)?) => {
        $(
            impl LeafCodec for $ty {
                const KIND: LeafKind = LeafKind::$variant;

                fn from_leaf(leaf: &Leaf) -> Option<&Self> {
                    match leaf {
                        Leaf::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn encode(&self, _kits: &[&ResourceKit]) -> String {
                    join(&self.$to())
                }

                fn decode(payload: &str, _kits: &[&ResourceKit]) -> Result<Value, SaveError> {
                    let floats = parse_floats::<$n>(Self::KIND, payload)?;
                    Ok(<$ty>::$from(&floats).into())
                }
            }
        )*
    };
}

float_array_codec! {
    Vec2 => Vec2, 2, to_array, from_slice;
    Vec3 => Vec3, 3, to_array, from_slice;
    Vec4 => Vec4, 4, to_array, from_slice;
    Mat2 => Mat2, 4, to_cols_array, from_cols_slice;
    Mat3 => Mat3, 9, to_cols_array, from_cols_slice;
    Mat4 => Mat4, 16, to_cols_array, from_cols_slice;
    Quat => Quat, 4, to_array, from_slice;
}

macro_rules! bool_vector_codec {
    ($($variant:ident => $ty:ty, $n:literal);* $(;)?) => {
        $(
            impl LeafCodec for $ty {
                const KIND: LeafKind = LeafKind::$variant;

                fn from_leaf(leaf: &Leaf) -> Option<&Self> {
                    match leaf {
                        Leaf::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn encode(&self, _kits: &[&ResourceKit]) -> String {
                    let bools: [bool; $n] = (*self).into();
                    join(&bools)
                }

                fn decode(payload: &str, _kits: &[&ResourceKit]) -> Result<Value, SaveError> {
                    let bools = parse_bools::<$n>(Self::KIND, payload)?;
                    Ok(<$ty>::from(bools).into())
                }
            }
        )*
    };
}

bool_vector_codec! {
    BVec2 => BVec2, 2;
    BVec3 => BVec3, 3;
    BVec4 => BVec4, 4;
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

fn encode_resource<T: Resource>(resource: &Handle<T>, kits: &[&ResourceKit]) -> String {
    match name_in_kits(kits, resource) {
        Some(name) => name.to_owned(),
        None => {
            warn!(
                category = T::CATEGORY,
                "resource is not registered in any active kit; it will be saved without a name"
            );
            String::new()
        }
    }
}

fn decode_resource<T: Resource>(name: &str, kits: &[&ResourceKit]) -> Option<Handle<T>> {
    if name.is_empty() {
        return None;
    }
    let found = find_in_kits(kits, name);
    if found.is_none() {
        warn!(category = T::CATEGORY, name, "no active kit has a resource with this name");
    }
    found
}

macro_rules! resource_codec {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl LeafCodec for Handle<$ty> {
                const KIND: LeafKind = LeafKind::$variant;

                fn from_leaf(leaf: &Leaf) -> Option<&Self> {
                    match leaf {
                        Leaf::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn encode(&self, kits: &[&ResourceKit]) -> String {
                    encode_resource(self, kits)
                }

                fn decode(payload: &str, kits: &[&ResourceKit]) -> Result<Value, SaveError> {
                    Ok(decode_resource::<$ty>(payload, kits).map_or(Value::Null, Value::from))
                }
            }
        )*
    };
}

resource_codec! {
    ShaderProgram => ShaderProgram,
    Texture => Texture,
    Mesh => Mesh,
    Font => Font,
    AudioClip => AudioClip,
}

// ---------------------------------------------------------------------------
// Composites
// ---------------------------------------------------------------------------

/// `kd;ks;alpha;r;g;b;a;texture`, with the texture field holding the escaped
/// texture payload (empty when there is no texture).
impl LeafCodec for Material {
    const KIND: LeafKind = LeafKind::Material;

    fn from_leaf(leaf: &Leaf) -> Option<&Self> {
        match leaf {
            Leaf::Material(v) => Some(v),
            _ => None,
        }
    }

    fn encode(&self, kits: &[&ResourceKit]) -> String {
        let texture = self
            .texture
            .as_ref()
            .map(|t| t.encode(kits))
            .unwrap_or_default();
        format!(
            "{};{};{};{};{};{};{};{}",
            self.kd,
            self.ks,
            self.alpha,
            self.r(),
            self.g(),
            self.b(),
            self.a(),
            escape::encode(&texture)
        )
    }

    fn decode(payload: &str, kits: &[&ResourceKit]) -> Result<Value, SaveError> {
        let fields = escape::split_unescaped(payload, b';');
        let &[kd, ks, alpha, r, g, b, a, texture] = fields.as_slice() else {
            return Err(invalid(Self::KIND, payload));
        };
        let scalar = |text: &str| -> Result<f32, SaveError> {
            text.parse().map_err(|_| invalid(Self::KIND, payload))
        };
        let texture = match Handle::<Texture>::decode(&escape::decode(texture), kits)? {
            Value::Leaf(Leaf::Texture(handle)) => Some(handle),
            _ => None,
        };
        Ok(Material {
            kd: scalar(kd)?,
            ks: scalar(ks)?,
            alpha: scalar(alpha)?,
            color: Vec4::new(scalar(r)?, scalar(g)?, scalar(b)?, scalar(a)?),
            texture,
        }
        .into())
    }
}

/// Audio sources carry no persisted state; they always load as the default.
impl LeafCodec for AudioSource {
    const KIND: LeafKind = LeafKind::AudioSource;

    fn from_leaf(leaf: &Leaf) -> Option<&Self> {
        match leaf {
            Leaf::AudioSource(v) => Some(v),
            _ => None,
        }
    }

    fn encode(&self, _kits: &[&ResourceKit]) -> String {
        String::new()
    }

    fn decode(_payload: &str, _kits: &[&ResourceKit]) -> Result<Value, SaveError> {
        Ok(AudioSource::default().into())
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// The serialize/deserialize pair for one leaf kind.
#[derive(Clone, Copy)]
pub struct CodecEntry {
    pub kind: LeafKind,
    pub serialize: SerializeFn,
    pub deserialize: DeserializeFn,
}

impl CodecEntry {
    #[must_use]
    pub fn new(kind: LeafKind, serialize: SerializeFn, deserialize: DeserializeFn) -> Self {
        Self {
            kind,
            serialize,
            deserialize,
        }
    }

    /// The entry backed by `T`'s [`LeafCodec`] impl.
    #[must_use]
    pub fn of<T: LeafCodec>() -> Self {
        Self::new(T::KIND, serialize_with::<T>, deserialize_with::<T>)
    }

    /// The built-in codec for `kind`.
    #[must_use]
    pub fn builtin(kind: LeafKind) -> Self {
        match kind {
            LeafKind::I8 => Self::of::<i8>(),
            LeafKind::I16 => Self::of::<i16>(),
            LeafKind::I32 => Self::of::<i32>(),
            LeafKind::I64 => Self::of::<i64>(),
            LeafKind::U8 => Self::of::<u8>(),
            LeafKind::U16 => Self::of::<u16>(),
            LeafKind::U32 => Self::of::<u32>(),
            LeafKind::U64 => Self::of::<u64>(),
            LeafKind::F32 => Self::of::<f32>(),
            LeafKind::F64 => Self::of::<f64>(),
            LeafKind::Bool => Self::of::<bool>(),
            LeafKind::Char => Self::of::<char>(),
            LeafKind::String => Self::of::<String>(),
            LeafKind::Vec2 => Self::of::<Vec2>(),
            LeafKind::Vec3 => Self::of::<Vec3>(),
            LeafKind::Vec4 => Self::of::<Vec4>(),
            LeafKind::BVec2 => Self::of::<BVec2>(),
            LeafKind::BVec3 => Self::of::<BVec3>(),
            LeafKind::BVec4 => Self::of::<BVec4>(),
            LeafKind::Mat2 => Self::of::<Mat2>(),
            LeafKind::Mat3 => Self::of::<Mat3>(),
            LeafKind::Mat4 => Self::of::<Mat4>(),
            LeafKind::Quat => Self::of::<Quat>(),
            LeafKind::Material => Self::of::<Material>(),
            LeafKind::ShaderProgram => Self::of::<Handle<ShaderProgram>>(),
            LeafKind::Texture => Self::of::<Handle<Texture>>(),
            LeafKind::Mesh => Self::of::<Handle<Mesh>>(),
            LeafKind::Font => Self::of::<Handle<Font>>(),
            LeafKind::AudioClip => Self::of::<Handle<AudioClip>>(),
            LeafKind::AudioSource => Self::of::<AudioSource>(),
        }
    }
}

impl fmt::Debug for CodecEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecEntry")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Registered leaf codecs and the live type code of each.
///
/// Codes follow registration order, so two processes that register the same
/// kinds in a different order disagree on codes. Save files therefore carry
/// a code → type name table, and loads go through a [`Translation`].
#[derive(Debug, Clone, Default)]
pub struct CodecTable {
    codes: TypeRegistry<LeafKind>,
    entries: HashMap<LeafKind, CodecEntry>,
}

impl CodecTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in codec, registered in [`LeafKind::ALL`] order.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::with_order(LeafKind::ALL)
    }

    /// The built-in codecs for `kinds`, registered in the given order.
    #[must_use]
    pub fn with_order(kinds: impl IntoIterator<Item = LeafKind>) -> Self {
        let mut table = Self::new();
        for kind in kinds {
            table.register(CodecEntry::builtin(kind));
        }
        table
    }

    /// Register `entry`, returning the code of its kind. Registering a kind
    /// twice keeps the first entry and its code.
    pub fn register(&mut self, entry: CodecEntry) -> TypeCode {
        if let Some(code) = self.codes.code_of(&entry.kind) {
            return code.clone();
        }
        self.entries.insert(entry.kind, entry);
        self.codes.register(entry.kind)
    }

    #[must_use]
    pub fn code_of(&self, kind: LeafKind) -> Option<&TypeCode> {
        self.codes.code_of(&kind)
    }

    #[must_use]
    pub fn kind_of(&self, code: &str) -> Option<LeafKind> {
        self.codes.key_of(code).copied()
    }

    #[must_use]
    pub fn entry(&self, kind: LeafKind) -> Option<&CodecEntry> {
        self.entries.get(&kind)
    }

    /// Encode `leaf` with its codec. `None` if its kind is not registered.
    #[must_use]
    pub fn encode(&self, leaf: &Leaf, kits: &[&ResourceKit]) -> Option<(&TypeCode, String)> {
        let kind = leaf.kind();
        let code = self.codes.code_of(&kind)?;
        let entry = self.entries.get(&kind)?;
        Some((code, (entry.serialize)(leaf, kits)))
    }

    /// Decode an unescaped payload of the given kind.
    ///
    /// # Errors
    ///
    /// [`SaveError::MissingCodec`] if `kind` has no codec, otherwise whatever
    /// the codec reports.
    pub fn decode(
        &self,
        kind: LeafKind,
        payload: &str,
        kits: &[&ResourceKit],
    ) -> Result<Value, SaveError> {
        let entry = self.entries.get(&kind).ok_or_else(|| SaveError::MissingCodec {
            code: kind.type_name().to_owned(),
        })?;
        (entry.deserialize)(payload, kits)
    }

    /// `(code, type name)` for every registered codec, in registration order.
    pub fn type_table(&self) -> impl Iterator<Item = (&TypeCode, &'static str)> {
        self.codes.iter().map(|(kind, code)| (code, kind.type_name()))
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

/// Maps the leaf type codes used in a save file to this process's codes.
#[derive(Debug, Clone, Default)]
pub struct Translation {
    codes: HashMap<TypeCode, TypeCode>,
}

impl Translation {
    /// Build from a file's `(code, type name)` table.
    ///
    /// Names with no live codec are left out, so a value that actually uses
    /// one fails with [`SaveError::MissingCodec`] when it is decoded.
    #[must_use]
    pub fn build<'a, 'n>(
        file_table: impl IntoIterator<Item = (&'a TypeCode, &'n str)>,
        codecs: &CodecTable,
    ) -> Self {
        let mut codes = HashMap::new();
        for (file_code, type_name) in file_table {
            let live = LeafKind::from_type_name(type_name).and_then(|kind| codecs.code_of(kind));
            match live {
                Some(live) => {
                    codes.insert(file_code.clone(), live.clone());
                }
                None => warn!(
                    code = %file_code,
                    type_name,
                    "saved leaf type has no codec in this process"
                ),
            }
        }
        debug!(entries = codes.len(), "built type code translation");
        Self { codes }
    }

    /// The live code for a file code.
    #[must_use]
    pub fn resolve(&self, file_code: &str) -> Option<&TypeCode> {
        self.codes.get(file_code)
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
