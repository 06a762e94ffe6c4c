//! Primitive kinds and the values that travel between records and the codec table.
//!
//! Every field of a [crate::Record] has one [Kind]. A field's value crosses the boundary
//! between the record and the [crate::Buffer] as a [Value] of the same kind.
//!
//! Only types implementing [Primitive] can be registered as fields, so a field of any
//! other type (for example `u32` or a nested struct) is rejected at compile time.

use crate::Error;
use std::fmt;

/// The closed set of primitive kinds understood by the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit IEEE 754 float.
    Float,
    /// Boolean (one byte on the wire).
    Bool,
    /// A raw run of bytes.
    ///
    /// A byte run carries no length on the wire, so it can be read from a [crate::Buffer]
    /// with an explicit length but has no entry in the codec table.
    Bytes,
    /// Length-prefixed ASCII text.
    String,
}

impl Kind {
    /// Returns the wire name of the kind, as used in error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Kind::Byte => "byte",
            Kind::Short => "short",
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Bytes => "byte[]",
            Kind::String => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single primitive value tagged with its [Kind].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
}

impl Value {
    /// Returns the [Kind] of the value.
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Byte(_) => Kind::Byte,
            Value::Short(_) => Kind::Short,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Bytes(_) => Kind::Bytes,
            Value::String(_) => Kind::String,
        }
    }

    /// Returns the number of bytes the value occupies on the wire.
    ///
    /// Strings include their 4-byte length prefix. Byte runs are written without one.
    pub fn encode_size(&self) -> usize {
        match self {
            Value::Byte(_) | Value::Bool(_) => 1,
            Value::Short(_) => 2,
            Value::Int(_) | Value::Float(_) => 4,
            Value::Long(_) => 8,
            Value::Bytes(bytes) => bytes.len(),
            Value::String(text) => 4 + text.len(),
        }
    }
}

/// A Rust type that maps one-to-one onto a primitive [Kind].
pub trait Primitive: Sized {
    /// The kind this type is encoded as.
    const KIND: Kind;

    /// Wraps a copy of `self` in a [Value].
    fn to_value(&self) -> Value;

    /// Unwraps a [Value], failing if it holds a different kind.
    fn from_value(value: Value) -> Result<Self, Error>;
}

macro_rules! impl_primitive {
    ($type:ty, $variant:ident, $to:expr) => {
        impl Primitive for $type {
            const KIND: Kind = Kind::$variant;

            #[inline]
            fn to_value(&self) -> Value {
                let to: fn(&$type) -> Value = $to;
                to(self)
            }

            #[inline]
            fn from_value(value: Value) -> Result<Self, Error> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(Error::Mismatch {
                        expected: Kind::$variant,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_primitive!(u8, Byte, |v| Value::Byte(*v));
impl_primitive!(i16, Short, |v| Value::Short(*v));
impl_primitive!(i32, Int, |v| Value::Int(*v));
impl_primitive!(i64, Long, |v| Value::Long(*v));
impl_primitive!(f32, Float, |v| Value::Float(*v));
impl_primitive!(bool, Bool, |v| Value::Bool(*v));
impl_primitive!(Vec<u8>, Bytes, |v| Value::Bytes(v.clone()));
impl_primitive!(String, String, |v| Value::String(v.clone()));
