//! Dynamic property values.
//!
//! Components expose their state as named [`Value`]s. A value is either
//! `Null`, a [`Leaf`] of one of a fixed set of types, or a container of
//! further values. The set of leaf types is closed: every leaf has a
//! [`LeafKind`], and the kind is what codecs are registered against.

use std::collections::HashMap;
use std::hash::Hash;

use engine_math::{BVec2, BVec3, BVec4, Mat2, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
use engine_resource::{
    AudioClip, AudioSource, Font, Handle, Material, Mesh, ShaderProgram, Texture,
};

/// The runtime identity of a leaf type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeafKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Char,
    String,
    Vec2,
    Vec3,
    Vec4,
    BVec2,
    BVec3,
    BVec4,
    Mat2,
    Mat3,
    Mat4,
    Quat,
    Material,
    ShaderProgram,
    Texture,
    Mesh,
    Font,
    AudioClip,
    AudioSource,
}

impl LeafKind {
    /// Every leaf kind, in default registration order.
    pub const ALL: [LeafKind; 30] = [
        LeafKind::I8,
        LeafKind::I16,
        LeafKind::I32,
        LeafKind::I64,
        LeafKind::U8,
        LeafKind::U16,
        LeafKind::U32,
        LeafKind::U64,
        LeafKind::F32,
        LeafKind::F64,
        LeafKind::Bool,
        LeafKind::Char,
        LeafKind::String,
        LeafKind::Vec2,
        LeafKind::Vec3,
        LeafKind::Vec4,
        LeafKind::BVec2,
        LeafKind::BVec3,
        LeafKind::BVec4,
        LeafKind::Mat2,
        LeafKind::Mat3,
        LeafKind::Mat4,
        LeafKind::Quat,
        LeafKind::Material,
        LeafKind::ShaderProgram,
        LeafKind::Texture,
        LeafKind::Mesh,
        LeafKind::Font,
        LeafKind::AudioClip,
        LeafKind::AudioSource,
    ];

    /// Fully qualified type name, stable across processes and builds.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            LeafKind::I8 => "i8",
            LeafKind::I16 => "i16",
            LeafKind::I32 => "i32",
            LeafKind::I64 => "i64",
            LeafKind::U8 => "u8",
            LeafKind::U16 => "u16",
            LeafKind::U32 => "u32",
            LeafKind::U64 => "u64",
            LeafKind::F32 => "f32",
            LeafKind::F64 => "f64",
            LeafKind::Bool => "bool",
            LeafKind::Char => "char",
            LeafKind::String => "alloc::string::String",
            LeafKind::Vec2 => "glam::Vec2",
            LeafKind::Vec3 => "glam::Vec3",
            LeafKind::Vec4 => "glam::Vec4",
            LeafKind::BVec2 => "glam::BVec2",
            LeafKind::BVec3 => "glam::BVec3",
            LeafKind::BVec4 => "glam::BVec4",
            LeafKind::Mat2 => "glam::Mat2",
            LeafKind::Mat3 => "glam::Mat3",
            LeafKind::Mat4 => "glam::Mat4",
            LeafKind::Quat => "glam::Quat",
            LeafKind::Material => "engine_resource::Material",
            LeafKind::ShaderProgram => "engine_resource::ShaderProgram",
            LeafKind::Texture => "engine_resource::Texture",
            LeafKind::Mesh => "engine_resource::Mesh",
            LeafKind::Font => "engine_resource::Font",
            LeafKind::AudioClip => "engine_resource::AudioClip",
            LeafKind::AudioSource => "engine_resource::AudioSource",
        }
    }

    /// Inverse of [`LeafKind::type_name`].
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }
}

/// A value of one of the leaf types.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
    String(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    BVec2(BVec2),
    BVec3(BVec3),
    BVec4(BVec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
    Quat(Quat),
    Material(Material),
    ShaderProgram(Handle<ShaderProgram>),
    Texture(Handle<Texture>),
    Mesh(Handle<Mesh>),
    Font(Handle<Font>),
    AudioClip(Handle<AudioClip>),
    AudioSource(AudioSource),
}

impl Leaf {
    #[must_use]
    pub fn kind(&self) -> LeafKind {
        match self {
            Leaf::I8(_) => LeafKind::I8,
            Leaf::I16(_) => LeafKind::I16,
            Leaf::I32(_) => LeafKind::I32,
            Leaf::I64(_) => LeafKind::I64,
            Leaf::U8(_) => LeafKind::U8,
            Leaf::U16(_) => LeafKind::U16,
            Leaf::U32(_) => LeafKind::U32,
            Leaf::U64(_) => LeafKind::U64,
            Leaf::F32(_) => LeafKind::F32,
            Leaf::F64(_) => LeafKind::F64,
            Leaf::Bool(_) => LeafKind::Bool,
            Leaf::Char(_) => LeafKind::Char,
            Leaf::String(_) => LeafKind::String,
            Leaf::Vec2(_) => LeafKind::Vec2,
            Leaf::Vec3(_) => LeafKind::Vec3,
            Leaf::Vec4(_) => LeafKind::Vec4,
            Leaf::BVec2(_) => LeafKind::BVec2,
            Leaf::BVec3(_) => LeafKind::BVec3,
            Leaf::BVec4(_) => LeafKind::BVec4,
            Leaf::Mat2(_) => LeafKind::Mat2,
            Leaf::Mat3(_) => LeafKind::Mat3,
            Leaf::Mat4(_) => LeafKind::Mat4,
            Leaf::Quat(_) => LeafKind::Quat,
            Leaf::Material(_) => LeafKind::Material,
            Leaf::ShaderProgram(_) => LeafKind::ShaderProgram,
            Leaf::Texture(_) => LeafKind::Texture,
            Leaf::Mesh(_) => LeafKind::Mesh,
            Leaf::Font(_) => LeafKind::Font,
            Leaf::AudioClip(_) => LeafKind::AudioClip,
            Leaf::AudioSource(_) => LeafKind::AudioSource,
        }
    }
}

/// A dynamically typed property value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Leaf(Leaf),
    List(Vec<Value>),
    /// Written exactly like a list; decodes back as [`Value::List`].
    Set(Vec<Value>),
    /// Key/value pairs. Order is kept but carries no meaning.
    Map(Vec<(Value, Value)>),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Value::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Build a mapping from any iterator of pairs.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short description of the shape of this value, for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Leaf(leaf) => leaf.kind().type_name().to_owned(),
            Value::List(items) => format!("list of {}", items.len()),
            Value::Set(items) => format!("set of {}", items.len()),
            Value::Map(entries) => format!("map of {}", entries.len()),
        }
    }
}

impl From<Leaf> for Value {
    fn from(leaf: Leaf) -> Self {
        Value::Leaf(leaf)
    }
}

/// Conversion out of a [`Value`].
///
/// Returns `None` if the value does not have the expected shape.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

macro_rules! leaf_conversions {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Leaf {
                fn from(v: $ty) -> Self {
                    Leaf::$variant(v)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Leaf(Leaf::$variant(v))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Leaf(Leaf::$variant(v)) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

leaf_conversions! {
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
    Bool => bool,
    Char => char,
    String => String,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    BVec2 => BVec2,
    BVec3 => BVec3,
    BVec4 => BVec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
    Quat => Quat,
    Material => Material,
    ShaderProgram => Handle<ShaderProgram>,
    Texture => Handle<Texture>,
    Mesh => Handle<Mesh>,
    Font => Handle<Font>,
    AudioClip => Handle<AudioClip>,
    AudioSource => AudioSource,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Leaf(Leaf::String(v.to_owned()))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) | Value::Set(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            _ => None,
        }
    }
}

impl<K: Into<Value>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(v: HashMap<K, V>) -> Self {
        Value::map(v)
    }
}

impl<K, V> FromValue for HashMap<K, V>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
{
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}
