//! Encode and decode records by walking their declared fields.
//!
//! A [Mapper] projects a [Record] onto its ordered list of [Field] descriptors and hands
//! each field to the [crate::table] entry for its [Kind]. Fields are written and read in
//! declaration order. Nothing else ties the bytes to the record.
//!
//! # Field order is the schema
//!
//! The wire format carries no field names, type tags or lengths for the record as a whole.
//! A reader must use descriptors whose order and kinds match the writer's exactly. If they
//! differ, decoding may fail with [Error::EndOfBuffer], or it may succeed and return
//! silently wrong values (for example, two `i32` fields declared in swapped order decode
//! into each other).
//!
//! # Registration
//!
//! The [crate::record!] macro declares a struct and its [Record] implementation from the
//! same field list, so registration order always equals declaration order:
//!
//! ```
//! use commonware_record::{record, Mapper, Serializer};
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Person {
//!         pub name: String,
//!         pub age: i32,
//!     }
//! }
//!
//! let mapper = Mapper::<Person>::new().unwrap();
//! let person = Person { name: "Test".into(), age: 25 };
//! let bytes = mapper.serialize(&person).unwrap();
//! assert_eq!(&bytes[..], &[4, 0, 0, 0, b'T', b'e', b's', b't', 25, 0, 0, 0]);
//! assert_eq!(mapper.deserialize(&bytes).unwrap(), person);
//! ```

use crate::{
    table::{self, Codec},
    Buffer, Config, Error, Kind, Serializer, Value,
};
use bytes::Bytes;
use std::{any::type_name, fmt};
use tracing::{debug, trace};

/// Describes one serializable field of `R`.
pub struct Field<R> {
    name: &'static str,
    kind: Kind,
    get: fn(&R) -> Value,
    set: fn(&mut R, Value) -> Result<(), Error>,
}

impl<R> Field<R> {
    /// Creates a descriptor from its name, kind and accessors.
    ///
    /// `get` must return, and `set` must accept, values of `kind`.
    pub const fn new(
        name: &'static str,
        kind: Kind,
        get: fn(&R) -> Value,
        set: fn(&mut R, Value) -> Result<(), Error>,
    ) -> Self {
        Self {
            name,
            kind,
            get,
            set,
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared kind of the field.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Reads the field's current value from `record`.
    pub fn get(&self, record: &R) -> Value {
        (self.get)(record)
    }

    /// Assigns `value` to the field on `record`.
    pub fn set(&self, record: &mut R, value: Value) -> Result<(), Error> {
        (self.set)(record, value)
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A type that can be encoded field by field.
///
/// Decoding starts from [Default::default] and assigns every field in turn.
pub trait Record: Default {
    /// Returns the serializable fields in wire order.
    ///
    /// Called once per [Mapper].
    fn fields() -> Vec<Field<Self>>;
}

/// Declares a struct and implements [Record] for it.
///
/// Every field must be a [crate::Primitive] type. Fields are registered in the order
/// they are declared. Attributes on the struct and on fields are passed through.
///
/// ```
/// use commonware_record::{record, Kind, Record};
///
/// record! {
///     #[derive(Default)]
///     struct Reading {
///         sensor: u8,
///         celsius: f32,
///     }
/// }
///
/// let kinds: Vec<Kind> = Reading::fields().iter().map(|f| f.kind()).collect();
/// assert_eq!(kinds, [Kind::Byte, Kind::Float]);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $type:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $type,
            )*
        }

        impl $crate::Record for $name {
            fn fields() -> ::std::vec::Vec<$crate::Field<Self>> {
                ::std::vec![
                    $(
                        $crate::Field::new(
                            ::core::stringify!($field),
                            <$type as $crate::Primitive>::KIND,
                            |record: &Self| $crate::Primitive::to_value(&record.$field),
                            |record: &mut Self, value: $crate::Value| {
                                record.$field = <$type as $crate::Primitive>::from_value(value)?;
                                ::core::result::Result::Ok(())
                            },
                        ),
                    )*
                ]
            }
        }
    };
}

/// Encodes and decodes a [Record] through its field descriptors.
///
/// Descriptors are discovered and their codecs resolved once, in [Mapper::new]. A mapper
/// holds no mutable state and can be shared across threads.
pub struct Mapper<R: Record> {
    fields: Vec<(Field<R>, &'static Codec)>,
    cfg: Config,
}

impl<R: Record> Mapper<R> {
    /// Creates a mapper with the default [Config].
    ///
    /// Fails with [Error::UnsupportedType] if any field's kind has no codec.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(Config::default())
    }

    /// Creates a mapper that decodes with `cfg`.
    pub fn with_config(cfg: Config) -> Result<Self, Error> {
        let fields = R::fields()
            .into_iter()
            .map(|field| match table::lookup(field.kind) {
                Some(codec) => Ok((field, codec)),
                None => Err(Error::UnsupportedType {
                    field: field.name,
                    kind: field.kind,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(record = type_name::<R>(), fields = fields.len(), "mapped record");
        Ok(Self { fields, cfg })
    }

    /// Returns the field descriptors in wire order.
    pub fn fields(&self) -> impl Iterator<Item = &Field<R>> {
        self.fields.iter().map(|(field, _)| field)
    }

    /// Returns the configuration used when decoding.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the exact number of bytes `record` encodes to.
    pub fn encode_size(&self, record: &R) -> usize {
        self.fields
            .iter()
            .map(|(field, _)| field.get(record).encode_size())
            .sum()
    }
}

impl<R: Record> Serializer<R> for Mapper<R> {
    fn write(&self, value: &R, buf: &mut Buffer) -> Result<(), Error> {
        for (field, codec) in &self.fields {
            (codec.write)(&field.get(value), buf)?;
        }
        Ok(())
    }

    fn read(&self, buf: &mut Buffer) -> Result<R, Error> {
        let mut record = R::default();
        for (field, codec) in &self.fields {
            trace!(
                field = field.name,
                kind = %field.kind,
                cursor = buf.cursor(),
                "reading field"
            );
            let value = (codec.read)(buf, &self.cfg)?;
            field.set(&mut record, value)?;
        }
        Ok(record)
    }

    fn serialize(&self, value: &R) -> Result<Bytes, Error> {
        let len = self.encode_size(value);
        let mut buf = Buffer::with_capacity(len);
        self.write(value, &mut buf)?;
        let bytes = buf.into_bytes();
        debug_assert_eq!(bytes.len(), len, "write() did not write expected bytes");
        Ok(bytes)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<R, Error> {
        let mut buf = Buffer::from(bytes);
        let record = self.read(&mut buf)?;
        if self.cfg.reject_trailing && buf.remaining() > 0 {
            return Err(Error::ExtraData(buf.remaining()));
        }
        Ok(record)
    }
}

impl<R: Record> fmt::Debug for Mapper<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("record", &type_name::<R>())
            .field("fields", &self.fields().collect::<Vec<_>>())
            .field("cfg", &self.cfg)
            .finish()
    }
}
