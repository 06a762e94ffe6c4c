//! Byte-level entry points shared by every record serializer.

use crate::{Buffer, Error};
use bytes::Bytes;

/// Turns a record-specific [Serializer::write]/[Serializer::read] pair into
/// bytes-in/bytes-out operations.
///
/// [crate::Mapper] implements this trait for any [crate::Record]. A hand-written
/// serializer only needs `write` and `read`:
///
/// ```
/// use commonware_record::{Buffer, Error, Serializer};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i16,
///     y: i16,
/// }
///
/// struct PointSerializer;
///
/// impl Serializer<Point> for PointSerializer {
///     fn write(&self, value: &Point, buf: &mut Buffer) -> Result<(), Error> {
///         buf.put_i16(value.x);
///         buf.put_i16(value.y);
///         Ok(())
///     }
///
///     fn read(&self, buf: &mut Buffer) -> Result<Point, Error> {
///         let x = buf.read_i16()?;
///         let y = buf.read_i16()?;
///         Ok(Point { x, y })
///     }
/// }
///
/// let bytes = PointSerializer.serialize(&Point { x: 1, y: -1 }).unwrap();
/// assert_eq!(&bytes[..], &[0x01, 0x00, 0xFF, 0xFF]);
/// assert_eq!(PointSerializer.deserialize(&bytes).unwrap(), Point { x: 1, y: -1 });
/// ```
pub trait Serializer<R> {
    /// Writes `value` to `buf`.
    fn write(&self, value: &R, buf: &mut Buffer) -> Result<(), Error>;

    /// Reads a value from `buf`, starting at its cursor.
    fn read(&self, buf: &mut Buffer) -> Result<R, Error>;

    /// Encodes `value` into a fresh buffer and returns its bytes.
    ///
    /// (Provided method).
    fn serialize(&self, value: &R) -> Result<Bytes, Error> {
        let mut buf = Buffer::new();
        self.write(value, &mut buf)?;
        Ok(buf.into_bytes())
    }

    /// Decodes a value from `bytes`.
    ///
    /// Bytes after the value are ignored.
    ///
    /// (Provided method).
    fn deserialize(&self, bytes: &[u8]) -> Result<R, Error> {
        let mut buf = Buffer::from(bytes);
        self.read(&mut buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    struct Pair;

    impl Serializer<(i64, String)> for Pair {
        fn write(&self, value: &(i64, String), buf: &mut Buffer) -> Result<(), Error> {
            buf.put_i64(value.0);
            buf.put_str(&value.1)
        }

        fn read(&self, buf: &mut Buffer) -> Result<(i64, String), Error> {
            Ok((buf.read_i64()?, buf.read_string()?))
        }
    }

    #[test]
    fn test_provided_methods() {
        let value = (-7i64, "seven".to_string());
        let bytes = Pair.serialize(&value).unwrap();
        assert_eq!(bytes.len(), 8 + 4 + 5);
        assert_eq!(Pair.deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn test_write_error_propagates() {
        assert_eq!(
            Pair.serialize(&(1, "ünicode".to_string())),
            Err(Error::NonAscii)
        );
    }

    #[test]
    fn test_truncated_input() {
        let bytes = Pair.serialize(&(1, "abc".to_string())).unwrap();
        for len in 0..bytes.len() {
            let expected = if len < 8 { Kind::Long } else { Kind::String };
            assert_eq!(
                Pair.deserialize(&bytes[..len]),
                Err(Error::EndOfBuffer(expected))
            );
        }
    }
}
