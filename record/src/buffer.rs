//! Byte buffer for encoding and decoding primitives.
//!
//! A [Buffer] pairs an append-only write accumulator with an immutable read snapshot and a
//! cursor into that snapshot. The snapshot is fixed at construction: it is empty for
//! [Buffer::new] and a copy of the caller's bytes for [Buffer::from]. Writing never changes
//! what can be read.
//!
//! # Wire layout
//!
//! * Integers and floats are little-endian, independent of the host.
//! * Booleans are one byte: `0x00` or `0x01`.
//! * Strings are an `i32` byte count followed by that many ASCII bytes.
//!
//! # Reads
//!
//! Each kind has an advancing `read_*` method and a non-advancing `peek_*` method. Both
//! check that the whole value is present before decoding anything and fail with
//! [Error::EndOfBuffer] naming the kind otherwise.

use crate::{config::RangeCfg, Error, Kind};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use paste::paste;

/// Width of the length prefix in front of every string.
const STRING_PREFIX: usize = 4;

/// Per-call byte accumulator and reader.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    write: BytesMut,
    snapshot: Bytes,
    cursor: usize,
}

// Fixed-width primitive implementation
macro_rules! impl_fixed {
    ($type:ty, $kind:ident, $get:ident, $put:ident) => {
        paste! {
            #[doc = concat!("Appends a `", stringify!($type), "`.")]
            #[inline]
            pub fn [<put_ $type>](&mut self, value: $type) {
                self.write.$put(value);
            }

            #[doc = concat!("Reads a `", stringify!($type), "` without moving the cursor.")]
            #[inline]
            pub fn [<peek_ $type>](&self) -> Result<$type, Error> {
                let mut src = self.window(Kind::$kind, 0, std::mem::size_of::<$type>())?;
                Ok(src.$get())
            }

            #[doc = concat!("Reads a `", stringify!($type), "` and advances the cursor past it.")]
            #[inline]
            pub fn [<read_ $type>](&mut self) -> Result<$type, Error> {
                let value = self.[<peek_ $type>]()?;
                self.cursor += std::mem::size_of::<$type>();
                Ok(value)
            }
        }
    };
}

impl Buffer {
    /// Creates an empty buffer for writing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` written bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            write: BytesMut::with_capacity(capacity),
            ..Self::default()
        }
    }

    impl_fixed!(u8, Byte, get_u8, put_u8);
    impl_fixed!(i16, Short, get_i16_le, put_i16_le);
    impl_fixed!(i32, Int, get_i32_le, put_i32_le);
    impl_fixed!(i64, Long, get_i64_le, put_i64_le);
    impl_fixed!(f32, Float, get_f32_le, put_f32_le);

    /// Appends a byte sequence as-is (no length prefix).
    #[inline]
    pub fn put_slice(&mut self, value: &[u8]) {
        self.write.put_slice(value);
    }

    /// Appends a boolean as a single byte.
    #[inline]
    pub fn put_bool(&mut self, value: bool) {
        self.write.put_u8(u8::from(value));
    }

    /// Appends an ASCII string as an `i32` byte count followed by its bytes.
    ///
    /// Nothing is written if the string is rejected.
    pub fn put_str(&mut self, value: &str) -> Result<(), Error> {
        if !value.is_ascii() {
            return Err(Error::NonAscii);
        }
        let len = i32::try_from(value.len())
            .map_err(|_| Error::LengthExceeded(value.len(), i32::MAX as usize))?;
        self.put_i32(len);
        self.write.put_slice(value.as_bytes());
        Ok(())
    }

    /// Reads a boolean without moving the cursor.
    pub fn peek_bool(&self) -> Result<bool, Error> {
        match self.window(Kind::Bool, 0, 1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool),
        }
    }

    /// Reads a boolean and advances the cursor past it.
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        let value = self.peek_bool()?;
        self.cursor += 1;
        Ok(value)
    }

    /// Returns the next `len` bytes without moving the cursor.
    pub fn peek_bytes(&self, len: usize) -> Result<Bytes, Error> {
        self.window(Kind::Bytes, 0, len)?;
        Ok(self.snapshot.slice(self.cursor..self.cursor + len))
    }

    /// Returns the next `len` bytes and advances the cursor past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes, Error> {
        let value = self.peek_bytes(len)?;
        self.cursor += len;
        Ok(value)
    }

    /// Reads a string without moving the cursor.
    ///
    /// The length prefix is decoded at the cursor and the text is taken from the bytes that
    /// follow it, so the prefix is skipped but not consumed.
    pub fn peek_string(&self) -> Result<String, Error> {
        let len = self.string_len()?;
        self.string_at(len)
    }

    /// Reads a string and advances the cursor past its prefix and text.
    ///
    /// An empty string consumes exactly its 4-byte prefix.
    pub fn read_string(&mut self) -> Result<String, Error> {
        let len = self.string_len()?;
        self.take_string(len)
    }

    /// Reads a string whose byte length must fall within `range`.
    ///
    /// The length is checked before any text is copied.
    pub fn read_string_bounded(&mut self, range: &RangeCfg) -> Result<String, Error> {
        let len = self.string_len()?;
        if !range.contains(len) {
            return Err(Error::InvalidLength(len));
        }
        self.take_string(len)
    }

    /// Returns the read position within the snapshot.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of unread bytes in the snapshot.
    pub fn remaining(&self) -> usize {
        self.snapshot.len() - self.cursor
    }

    /// Returns the length of the read snapshot.
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Returns true if the read snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Returns a copy of everything written so far.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.write)
    }

    /// Consumes the buffer, returning everything written.
    pub fn into_bytes(self) -> Bytes {
        self.write.freeze()
    }

    /// Returns `width` snapshot bytes starting `offset` bytes past the cursor.
    fn window(&self, kind: Kind, offset: usize, width: usize) -> Result<&[u8], Error> {
        let start = self
            .cursor
            .checked_add(offset)
            .ok_or(Error::EndOfBuffer(kind))?;
        let end = start.checked_add(width).ok_or(Error::EndOfBuffer(kind))?;
        self.snapshot
            .get(start..end)
            .ok_or(Error::EndOfBuffer(kind))
    }

    /// Decodes the length prefix of the string at the cursor.
    fn string_len(&self) -> Result<usize, Error> {
        let mut src = self.window(Kind::String, 0, STRING_PREFIX)?;
        usize::try_from(src.get_i32_le()).map_err(|_| Error::EndOfBuffer(Kind::String))
    }

    /// Decodes `len` bytes of text following the prefix at the cursor.
    fn string_at(&self, len: usize) -> Result<String, Error> {
        let text = self.window(Kind::String, STRING_PREFIX, len)?;
        if !text.is_ascii() {
            return Err(Error::NonAscii);
        }
        String::from_utf8(text.to_vec()).map_err(|_| Error::NonAscii)
    }

    fn take_string(&mut self, len: usize) -> Result<String, Error> {
        let value = self.string_at(len)?;
        self.cursor += STRING_PREFIX + len;
        Ok(value)
    }
}

impl From<Bytes> for Buffer {
    /// Imports `bytes` as both the read snapshot and the initial accumulator.
    fn from(bytes: Bytes) -> Self {
        Self {
            write: BytesMut::from(&bytes[..]),
            snapshot: bytes,
            cursor: 0,
        }
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from(Bytes::copy_from_slice(bytes))
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paste::paste;
    use test_case::test_case;

    // Fixed-width round trips through a single buffer
    macro_rules! impl_fixed_test {
        ($type:ty) => {
            paste! {
                #[test]
                fn [<test_ $type>]() {
                    let values = [0 as $type, 1 as $type, 42 as $type, <$type>::MAX, <$type>::MIN];
                    let mut writer = Buffer::new();
                    for value in values {
                        writer.[<put_ $type>](value);
                    }
                    let width = std::mem::size_of::<$type>();
                    assert_eq!(writer.to_bytes().len(), values.len() * width);

                    let mut reader = Buffer::from(writer.into_bytes());
                    for (i, value) in values.iter().enumerate() {
                        assert_eq!(reader.[<peek_ $type>]().unwrap(), *value);
                        assert_eq!(reader.cursor(), i * width);
                        assert_eq!(reader.[<read_ $type>]().unwrap(), *value);
                        assert_eq!(reader.cursor(), (i + 1) * width);
                    }
                    assert_eq!(reader.remaining(), 0);
                }
            }
        };
    }
    impl_fixed_test!(u8);
    impl_fixed_test!(i16);
    impl_fixed_test!(i32);
    impl_fixed_test!(i64);
    impl_fixed_test!(f32);

    #[test]
    fn test_little_endian() {
        let mut buf = Buffer::new();
        buf.put_i16(0x0102);
        buf.put_i32(0x01020304);
        buf.put_i64(-2);
        buf.put_f32(1.0);
        assert_eq!(
            buf.to_bytes(),
            &[
                0x02, 0x01, // i16
                0x04, 0x03, 0x02, 0x01, // i32
                0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // i64
                0x00, 0x00, 0x80, 0x3F, // f32
            ][..]
        );
    }

    #[test]
    fn test_bool() {
        let mut buf = Buffer::new();
        buf.put_bool(true);
        buf.put_bool(false);
        assert_eq!(buf.to_bytes(), &[0x01, 0x00][..]);

        let mut reader = Buffer::from(buf.into_bytes());
        assert!(reader.read_bool().unwrap());
        assert!(!reader.read_bool().unwrap());
        assert_eq!(reader.cursor(), 2);
    }

    #[test]
    fn test_invalid_bool() {
        let reader = Buffer::from(vec![0x02]);
        assert_eq!(reader.peek_bool(), Err(Error::InvalidBool));
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_string() {
        let mut buf = Buffer::new();
        buf.put_str("Test").unwrap();
        assert_eq!(
            buf.to_bytes(),
            &[0x04, 0x00, 0x00, 0x00, b'T', b'e', b's', b't'][..]
        );

        let mut reader = Buffer::from(buf.into_bytes());
        assert_eq!(reader.read_string().unwrap(), "Test");
        assert_eq!(reader.cursor(), 8);
    }

    #[test]
    fn test_peek_string_skips_prefix() {
        let mut buf = Buffer::new();
        buf.put_str("abc").unwrap();
        buf.put_i32(9);

        let mut reader = Buffer::from(buf.into_bytes());
        assert_eq!(reader.peek_string().unwrap(), "abc");
        assert_eq!(reader.cursor(), 0);
        assert_eq!(reader.peek_string().unwrap(), "abc");
        assert_eq!(reader.read_string().unwrap(), "abc");
        assert_eq!(reader.read_i32().unwrap(), 9);
    }

    #[test]
    fn test_empty_string_keeps_alignment() {
        let mut buf = Buffer::new();
        buf.put_str("").unwrap();
        buf.put_i32(25);
        buf.put_str("").unwrap();
        assert_eq!(buf.to_bytes().len(), 12);

        let mut reader = Buffer::from(buf.into_bytes());
        assert_eq!(reader.read_string().unwrap(), "");
        assert_eq!(reader.cursor(), 4);
        assert_eq!(reader.read_i32().unwrap(), 25);
        assert_eq!(reader.read_string().unwrap(), "");
        assert_eq!(reader.cursor(), 12);
    }

    #[test]
    fn test_string_rejects_non_ascii() {
        let mut buf = Buffer::new();
        assert_eq!(buf.put_str("grüße"), Err(Error::NonAscii));
        assert!(buf.to_bytes().is_empty());

        let mut reader = Buffer::from(vec![0x01, 0x00, 0x00, 0x00, 0xC3]);
        assert_eq!(reader.read_string(), Err(Error::NonAscii));
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_string_negative_length() {
        let mut reader = Buffer::from(vec![0xFF, 0xFF, 0xFF, 0xFF, b'a']);
        assert_eq!(reader.read_string(), Err(Error::EndOfBuffer(Kind::String)));
    }

    #[test]
    fn test_string_length_beyond_snapshot() {
        let mut reader = Buffer::from(vec![0x05, 0x00, 0x00, 0x00, b'a', b'b']);
        assert_eq!(reader.read_string(), Err(Error::EndOfBuffer(Kind::String)));
        assert_eq!(reader.peek_string(), Err(Error::EndOfBuffer(Kind::String)));
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_string_bounded() {
        let mut buf = Buffer::new();
        buf.put_str("hello").unwrap();
        let bytes = buf.into_bytes();

        let mut reader = Buffer::from(bytes.clone());
        assert_eq!(
            reader.read_string_bounded(&RangeCfg::from(..5)),
            Err(Error::InvalidLength(5))
        );
        assert_eq!(reader.cursor(), 0);

        let mut reader = Buffer::from(bytes);
        assert_eq!(
            reader.read_string_bounded(&RangeCfg::from(..=5)).unwrap(),
            "hello"
        );
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_bytes() {
        let mut buf = Buffer::new();
        buf.put_u8(0xAA);
        buf.put_slice(&[1, 2, 3]);

        let mut reader = Buffer::from(buf.into_bytes());
        assert_eq!(reader.read_u8().unwrap(), 0xAA);
        assert_eq!(reader.peek_bytes(3).unwrap(), &[1, 2, 3][..]);
        assert_eq!(reader.cursor(), 1);
        assert_eq!(reader.read_bytes(3).unwrap(), &[1, 2, 3][..]);
        assert!(reader.read_bytes(0).unwrap().is_empty());
        assert_eq!(reader.read_bytes(1), Err(Error::EndOfBuffer(Kind::Bytes)));
    }

    #[test_case(Kind::Byte, &[]; "byte")]
    #[test_case(Kind::Short, &[0x01]; "short")]
    #[test_case(Kind::Int, &[0x01, 0x02, 0x03]; "int")]
    #[test_case(Kind::Long, &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]; "long")]
    #[test_case(Kind::Float, &[0x00, 0x00]; "float")]
    #[test_case(Kind::Bool, &[]; "bool")]
    #[test_case(Kind::String, &[0x04, 0x00]; "string prefix")]
    #[test_case(Kind::String, &[0x04, 0x00, 0x00, 0x00, b'T']; "string text")]
    fn test_underflow(kind: Kind, input: &[u8]) {
        let mut reader = Buffer::from(input);
        let result = match kind {
            Kind::Byte => reader.read_u8().map(drop),
            Kind::Short => reader.read_i16().map(drop),
            Kind::Int => reader.read_i32().map(drop),
            Kind::Long => reader.read_i64().map(drop),
            Kind::Float => reader.read_f32().map(drop),
            Kind::Bool => reader.read_bool().map(drop),
            Kind::Bytes => reader.read_bytes(input.len() + 1).map(drop),
            Kind::String => reader.read_string().map(drop),
        };
        assert_eq!(result, Err(Error::EndOfBuffer(kind)));
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_underflow_after_partial_read() {
        let mut reader = Buffer::from(vec![0x01, 0x00, 0x00, 0x00, 0x02, 0x00]);
        assert_eq!(reader.read_i32().unwrap(), 1);
        assert_eq!(reader.read_i32(), Err(Error::EndOfBuffer(Kind::Int)));
        assert_eq!(reader.cursor(), 4);
        assert_eq!(reader.read_i16().unwrap(), 2);
    }

    #[test]
    fn test_snapshot_is_fixed() {
        let mut buf = Buffer::from(vec![0x07]);
        buf.put_u8(0x08);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.to_bytes(), &[0x07, 0x08][..]);
        assert_eq!(buf.read_u8().unwrap(), 0x07);
        assert_eq!(buf.read_u8(), Err(Error::EndOfBuffer(Kind::Byte)));
    }

    #[test]
    fn test_fresh_buffer_reads_nothing() {
        let mut buf = Buffer::with_capacity(16);
        buf.put_i32(1);
        assert!(buf.is_empty());
        assert_eq!(buf.read_i32(), Err(Error::EndOfBuffer(Kind::Int)));
    }
}
