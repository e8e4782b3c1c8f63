//! MessagePack value tree
#[cfg(feature = "std")]
use std::{vec::Vec, string::String};

#[cfg(all(feature = "alloc",not(feature = "std")))]
use alloc::{vec::Vec, string::String};

use core::fmt;
use core::str::Utf8Error;

use crate::error::EncodeError;

/// A decoded or to-be-encoded MessagePack value.
///
/// Maps keep their entries in insertion order, which is also the order they
/// are written in. Key uniqueness is not checked.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Integer(Integer),
    Float64(f64),
    Text(Utf8Text),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

/// An integer in the MessagePack range `-2^63..=2^64-1`.
///
/// Values that cannot be represented are rejected when an `Integer` is built
/// from a wider type with [`TryFrom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Integer {
    n: IntRepr,
}

// NegInt sorts before PosInt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum IntRepr {
    /// always less than zero
    NegInt(i64),
    PosInt(u64),
}

impl Integer {
    /// The smallest representable integer, `-2^63`
    pub const MIN: Integer = Integer { n: IntRepr::NegInt(i64::MIN) };
    /// The largest representable integer, `2^64-1`
    pub const MAX: Integer = Integer { n: IntRepr::PosInt(u64::MAX) };

    #[inline]
    pub fn is_negative(&self) -> bool {
        matches!(self.n, IntRepr::NegInt(_))
    }

    /// Return the value if it fits in `u64`
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            IntRepr::PosInt(n) => Some(n),
            IntRepr::NegInt(_) => None,
        }
    }

    /// Return the value if it fits in `i64`
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            IntRepr::PosInt(n) => i64::try_from(n).ok(),
            IntRepr::NegInt(n) => Some(n),
        }
    }

    #[inline]
    pub fn as_i128(&self) -> i128 {
        match self.n {
            IntRepr::PosInt(n) => n.into(),
            IntRepr::NegInt(n) => n.into(),
        }
    }

    /// The 64-bit pattern written on the wire: the magnitude for non-negative
    /// values, two's complement for negative ones.
    #[inline]
    pub(crate) fn to_wire_bits(self) -> u64 {
        match self.n {
            IntRepr::PosInt(n) => n,
            IntRepr::NegInt(n) => n as u64,
        }
    }
}

impl From<u64> for Integer {
    #[inline]
    fn from(n: u64) -> Self {
        Integer { n: IntRepr::PosInt(n) }
    }
}

impl From<i64> for Integer {
    #[inline]
    fn from(n: i64) -> Self {
        if n < 0 {
            Integer { n: IntRepr::NegInt(n) }
        }
        else {
            Integer { n: IntRepr::PosInt(n as u64) }
        }
    }
}

macro_rules! impl_integer_from {
    ($wide:ty; $($ty:ty),*) => {$(
        impl From<$ty> for Integer {
            #[inline]
            fn from(n: $ty) -> Self {
                Integer::from(<$wide>::from(n))
            }
        }
    )*};
}

impl_integer_from!(u64; u8, u16, u32);
impl_integer_from!(i64; i8, i16, i32);

impl TryFrom<i128> for Integer {
    type Error = EncodeError;

    fn try_from(n: i128) -> Result<Self, Self::Error> {
        if let Ok(n) = u64::try_from(n) {
            Ok(n.into())
        }
        else if let Ok(n) = i64::try_from(n) {
            Ok(n.into())
        }
        else {
            Err(EncodeError::IntegerOutOfRange)
        }
    }
}

impl TryFrom<u128> for Integer {
    type Error = EncodeError;

    fn try_from(n: u128) -> Result<Self, Self::Error> {
        u64::try_from(n).map(Integer::from).map_err(|_| EncodeError::IntegerOutOfRange)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            IntRepr::PosInt(n) => fmt::Display::fmt(&n, f),
            IntRepr::NegInt(n) => fmt::Display::fmt(&n, f),
        }
    }
}

/// Text payload.
///
/// Built from Rust strings it is always valid. Built from raw bytes with
/// [`Utf8Text::from_bytes`] it keeps invalid input as is, and encoding such a
/// value fails with [`EncodeError::InvalidUtf8`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utf8Text {
    s: Result<String, (Vec<u8>, Utf8Error)>,
}

impl Utf8Text {
    /// Wrap raw bytes that are supposed to be UTF-8 without coercing them.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let s = String::from_utf8(bytes).map_err(|err| {
            let utf8_error = err.utf8_error();
            (err.into_bytes(), utf8_error)
        });
        Utf8Text { s }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.s.is_ok()
    }

    /// Return the text or the validation error of the original bytes.
    #[inline]
    pub fn validate(&self) -> Result<&str, Utf8Error> {
        match &self.s {
            Ok(s) => Ok(s),
            Err((_, err)) => Err(*err),
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        self.validate().ok()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.s {
            Ok(s) => s.as_bytes(),
            Err((bytes, _)) => bytes,
        }
    }

    /// Length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_string(self) -> Result<String, Vec<u8>> {
        self.s.map_err(|(bytes, _)| bytes)
    }
}

impl From<String> for Utf8Text {
    fn from(s: String) -> Self {
        Utf8Text { s: Ok(s) }
    }
}

impl From<&str> for Utf8Text {
    fn from(s: &str) -> Self {
        Utf8Text { s: Ok(s.into()) }
    }
}

impl Value {
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None
        }
    }

    pub fn as_integer(&self) -> Option<Integer> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_integer().and_then(|n| n.as_u64())
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|n| n.as_i64())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None
        }
    }

    /// Return the text if this is a valid `Text` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => s.as_str(),
            _ => None
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Integer> for Value {
    fn from(v: Integer) -> Self {
        Value::Integer(v)
    }
}

macro_rules! impl_value_from_int {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(v: $ty) -> Self {
                Value::Integer(v.into())
            }
        }
    )*};
}

impl_value_from_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<Utf8Text> for Value {
    fn from(v: Utf8Text) -> Self {
        Value::Text(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.into())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(v: Vec<(Value, Value)>) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
