//! Encoding and decoding errors
use core::fmt;
use core::str::Utf8Error;

use msgpack_write::WriteError;

/// Encoding error
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum EncodeError {
    /// A text value does not hold valid UTF-8
    InvalidUtf8,
    /// An integer is outside of `-2^63..=2^64-1`
    IntegerOutOfRange,
    /// A string, binary, array or map is longer than `u32::MAX`
    LengthOverflow,
    /// The output sink has no room for the message
    BufferFull,
}

/// Decoding error
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum DecodeError {
    /// Input ended before a header, length or payload was complete
    Truncated,
    /// A `float 32`, `fixext` or `ext` code was found
    UnsupportedType(u8),
    /// A reserved code was found
    Malformed(u8),
    /// A string payload is not valid UTF-8
    InvalidUtf8,
    /// Arrays and maps are nested deeper than the decoder allows
    DepthLimitExceeded,
    /// A header is wider than needed for its value (strict mode only)
    NonMinimal(u8),
    /// Bytes remain after a complete message
    TrailingBytes(usize),
}

impl serde::de::StdError for EncodeError {}

impl serde::de::StdError for DecodeError {}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EncodeError::InvalidUtf8 => "Text value is not valid UTF-8",
            EncodeError::IntegerOutOfRange => "Integer out of MessagePack range",
            EncodeError::LengthOverflow => "Length does not fit a MessagePack 32-bit length field",
            EncodeError::BufferFull => "Output buffer is full",
        })
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated => f.write_str("Unexpected end of MessagePack input"),
            DecodeError::UnsupportedType(code) => write!(f, "Unsupported MessagePack type code 0x{:02x} in input", code),
            DecodeError::Malformed(code) => write!(f, "Reserved MessagePack code 0x{:02x} in input", code),
            DecodeError::InvalidUtf8 => f.write_str("Invalid UTF-8 in MessagePack string"),
            DecodeError::DepthLimitExceeded => f.write_str("MessagePack nesting depth limit exceeded"),
            DecodeError::NonMinimal(code) => write!(f, "Non-minimal MessagePack header 0x{:02x} in input", code),
            DecodeError::TrailingBytes(len) => write!(f, "{} trailing bytes after MessagePack message", len),
        }
    }
}

impl From<Utf8Error> for EncodeError {
    fn from(_err: Utf8Error) -> Self {
        EncodeError::InvalidUtf8
    }
}

impl From<WriteError> for EncodeError {
    fn from(_err: WriteError) -> Self {
        EncodeError::BufferFull
    }
}

impl From<Utf8Error> for DecodeError {
    fn from(_err: Utf8Error) -> Self {
        DecodeError::InvalidUtf8
    }
}
