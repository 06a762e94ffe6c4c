//! Error types for record codec operations

use crate::Kind;
use thiserror::Error;

/// Error type for record codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("could not read value of type '{0}'")]
    EndOfBuffer(Kind),
    #[error("unsupported type '{kind}' for field '{field}'")]
    UnsupportedType { field: &'static str, kind: Kind },
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: Kind, found: Kind },
    #[error("string is not ascii")]
    NonAscii,
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(usize, usize), // found, max
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("invalid bool")]
    InvalidBool,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
}
