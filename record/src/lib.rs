//! Serialize flat records positionally.
//!
//! # Overview
//!
//! A binary serialization library for records made only of primitive fields. It needs no
//! schema file, code generation step or IDL:
//! - [Buffer] appends and reads primitives with a single read cursor
//! - [Mapper] walks a record's declared fields in order and encodes each one with the
//!   codec for its [Kind]
//! - [Serializer] turns any such write/read pair into bytes-in/bytes-out operations
//!
//! # Supported Types
//!
//! Record fields may be `u8`, `i16`, `i32`, `i64`, `f32`, `bool` or `String` (ASCII only).
//! [Buffer] can additionally read and write raw byte runs of a caller-supplied length.
//!
//! # Wire Format
//!
//! A record is the concatenation of its fields' encodings in declared order. There is no
//! header, version, delimiter or type tag:
//! - Integers and floats are little-endian
//! - Booleans are a single `0x00`/`0x01` byte
//! - Strings are an `i32` byte count followed by that many ASCII bytes
//!
//! **The field order is the schema.** A reader must declare exactly the same fields, in
//! exactly the same order, as the writer. A mismatch either fails to decode or, worse,
//! decodes successfully into the wrong fields.
//!
//! # Example
//!
//! ```
//! use commonware_record::{record, Error, Kind, Mapper, Serializer};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Person {
//!         pub name: String,
//!         pub age: i32,
//!         pub is_old: bool,
//!     }
//! }
//!
//! let mapper = Mapper::<Person>::new().unwrap();
//! let person = Person { name: "Test".into(), age: 25, is_old: true };
//!
//! let bytes = mapper.serialize(&person).unwrap();
//! assert_eq!(bytes.len(), 4 + 4 + 4 + 1);
//! assert_eq!(mapper.deserialize(&bytes).unwrap(), person);
//!
//! // Truncated input never yields a partially filled record.
//! assert_eq!(
//!     mapper.deserialize(&bytes[..10]),
//!     Err(Error::EndOfBuffer(Kind::Int))
//! );
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod mapper;
pub mod serializer;
pub mod table;
pub mod value;

// Re-export main types and traits
pub use buffer::Buffer;
pub use config::{Config, RangeCfg};
pub use error::Error;
pub use mapper::{Field, Mapper, Record};
pub use serializer::Serializer;
pub use value::{Kind, Primitive, Value};
