//! The codec table: per-[Kind] write and read functions.
//!
//! The table is a fixed set of `static` entries selected by an exhaustive `match`. It is
//! shared by every [crate::Mapper] in the process and cannot be extended at runtime.
//!
//! [Kind::Bytes] has no entry. A byte run is written without a length, so a reader cannot
//! tell where a byte-run field ends.

use crate::{Buffer, Config, Error, Kind, Value};
use std::fmt;

/// Writes a [Value] to a [Buffer].
pub type WriteFn = fn(&Value, &mut Buffer) -> Result<(), Error>;

/// Reads a [Value] from a [Buffer].
pub type ReadFn = fn(&mut Buffer, &Config) -> Result<Value, Error>;

/// The write and read functions for one [Kind].
pub struct Codec {
    pub kind: Kind,
    pub write: WriteFn,
    pub read: ReadFn,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn mismatch(expected: Kind, found: &Value) -> Error {
    Error::Mismatch {
        expected,
        found: found.kind(),
    }
}

macro_rules! fixed_codec {
    ($name:ident, $variant:ident, $put:ident, $read:ident) => {
        static $name: Codec = Codec {
            kind: Kind::$variant,
            write: |value, buf| match value {
                Value::$variant(inner) => {
                    buf.$put(*inner);
                    Ok(())
                }
                other => Err(mismatch(Kind::$variant, other)),
            },
            read: |buf, _| buf.$read().map(Value::$variant),
        };
    };
}

fixed_codec!(BYTE, Byte, put_u8, read_u8);
fixed_codec!(SHORT, Short, put_i16, read_i16);
fixed_codec!(INT, Int, put_i32, read_i32);
fixed_codec!(LONG, Long, put_i64, read_i64);
fixed_codec!(FLOAT, Float, put_f32, read_f32);
fixed_codec!(BOOL, Bool, put_bool, read_bool);

static STRING: Codec = Codec {
    kind: Kind::String,
    write: |value, buf| match value {
        Value::String(text) => buf.put_str(text),
        other => Err(mismatch(Kind::String, other)),
    },
    read: |buf, cfg| buf.read_string_bounded(&cfg.string_length).map(Value::String),
};

/// Returns the codec for `kind`, or `None` if the kind cannot be used as a field.
pub fn lookup(kind: Kind) -> Option<&'static Codec> {
    match kind {
        Kind::Byte => Some(&BYTE),
        Kind::Short => Some(&SHORT),
        Kind::Int => Some(&INT),
        Kind::Long => Some(&LONG),
        Kind::Float => Some(&FLOAT),
        Kind::Bool => Some(&BOOL),
        Kind::String => Some(&STRING),
        Kind::Bytes => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: Value) {
        let codec = lookup(value.kind()).unwrap();
        assert_eq!(codec.kind, value.kind());

        let mut buf = Buffer::new();
        (codec.write)(&value, &mut buf).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(bytes.len(), value.encode_size());

        let mut reader = Buffer::from(bytes);
        let decoded = (codec.read)(&mut reader, &Config::default()).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(reader.cursor(), value.encode_size());
    }

    #[test]
    fn test_entries() {
        round_trip(Value::Byte(0xFE));
        round_trip(Value::Short(-12345));
        round_trip(Value::Int(25));
        round_trip(Value::Long(i64::MIN));
        round_trip(Value::Float(-0.5));
        round_trip(Value::Bool(true));
        round_trip(Value::String("Test".into()));
        round_trip(Value::String(String::new()));
    }

    #[test]
    fn test_bytes_has_no_entry() {
        assert!(lookup(Kind::Bytes).is_none());
    }

    #[test]
    fn test_write_mismatch() {
        let codec = lookup(Kind::Int).unwrap();
        let mut buf = Buffer::new();
        assert_eq!(
            (codec.write)(&Value::Bool(true), &mut buf),
            Err(Error::Mismatch {
                expected: Kind::Int,
                found: Kind::Bool,
            })
        );
        assert!(buf.into_bytes().is_empty());
    }

    #[test]
    fn test_string_respects_config() {
        let mut buf = Buffer::new();
        buf.put_str("toolong").unwrap();
        let mut reader = Buffer::from(buf.into_bytes());
        let cfg = Config::default().with_string_length(..=4);
        assert_eq!(
            (lookup(Kind::String).unwrap().read)(&mut reader, &cfg),
            Err(Error::InvalidLength(7))
        );
    }
}
