//! MessagePack decoder
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(feature = "alloc",not(feature = "std")))]
use alloc::vec::Vec;

use core::str;

use crate::error::DecodeError;
use crate::magick::*;
use crate::size_class::SizeClass;
use crate::value::{Integer, Value};

/// Default limit of array and map nesting, see [`Decoder::with_max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Decoding result
pub type Result<T> = core::result::Result<T, DecodeError>;

/// Decode one MessagePack message from the beginning of `input`.
///
/// Bytes following the message are ignored. Use [`decode_exact`] to reject
/// them or [`decode_split_tail`] to get them back.
pub fn decode(input: &[u8]) -> Result<Value> {
    Decoder::from_slice(input).decode_value()
}

/// Decode a MessagePack message that must span the whole `input`.
///
/// Fails with [`DecodeError::TrailingBytes`] if anything is left after the message.
pub fn decode_exact(input: &[u8]) -> Result<Value> {
    let mut de = Decoder::from_slice(input);
    let value = de.decode_value()?;
    de.end()?;
    Ok(value)
}

/// Decode one MessagePack message from the beginning of `input`.
///
/// Return a tuple with `(value, tail)`, where `tail` is the tail of the input beginning
/// at the byte following the last byte of the message.
pub fn decode_split_tail(input: &[u8]) -> Result<(Value, &[u8])> {
    let mut de = Decoder::from_slice(input);
    let value = de.decode_value()?;
    Ok((value, de.input_ref()))
}

/// Return the size in bytes of the first complete MessagePack message in `input`.
///
/// The message is fully validated, but not materialized.
pub fn message_len(input: &[u8]) -> Result<usize> {
    let mut de = Decoder::from_slice(input);
    de.skip_value()?;
    Ok(de.position())
}

/// MessagePack decoder.
///
/// * decodes data from a slice,
/// * checks every header, length and payload against the remaining input,
/// * keeps nesting on the heap and limits its depth ([`Decoder::with_max_depth`]),
/// * optionally rejects headers that are wider than needed ([`Decoder::strict`]).
///
/// ```
/// use msgpack_value::{Decoder, DecodeError, Value};
///
/// let mut de = Decoder::from_slice(b"\x91\x91\xc0\xcd\x00\x01").with_max_depth(2);
/// assert_eq!(de.decode_value(), Ok(Value::Array(vec![Value::Array(vec![Value::Nil])])));
/// assert_eq!(de.remaining_len(), 3);
/// let mut de = Decoder::from_slice(de.input_ref()).strict(true);
/// assert_eq!(de.decode_value(), Err(DecodeError::NonMinimal(0xcd)));
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<'de> {
    input: &'de[u8],
    index: usize,
    max_depth: usize,
    strict: bool,
}

impl<'de> Decoder<'de> {
    /// Create a new decoder instance by providing a slice from which to
    /// decode messages.
    pub fn from_slice(input: &'de[u8]) -> Self {
        Decoder { input, index: 0, max_depth: DEFAULT_MAX_DEPTH, strict: false }
    }
    /// Set how deep arrays and maps may be nested.
    ///
    /// A scalar message has depth 0, `[]` has depth 1, `[[]]` has depth 2
    /// and so on. Deeper input fails with [`DecodeError::DepthLimitExceeded`].
    ///
    /// Decoding keeps open containers on the heap, so the limit bounds memory,
    /// not call stack use. Dropping a decoded [`Value`] still recurses once per
    /// nesting level.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
    /// When `strict` is `true`, reject any header that is not the smallest
    /// one for its value or length with [`DecodeError::NonMinimal`].
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
    /// Return the number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }
    /// Return the remaining number of unparsed bytes in the input slice.
    #[inline]
    pub fn remaining_len(&self) -> usize {
        self.input.len() - self.index
    }
    /// Return the unparsed portion of the input slice with the lifetime of
    /// the original slice.
    #[inline]
    pub fn input_ref(&self) -> &'de[u8] {
        &self.input[self.index..]
    }
    /// Peek at the next byte code and return it on success, otherwise return
    /// `Err(DecodeError::Truncated)` if there are no more unparsed bytes
    /// remaining in the input slice.
    #[inline]
    pub fn peek(&self) -> Result<u8> {
        self.input.get(self.index).copied()
        .ok_or(DecodeError::Truncated)
    }
    /// Consume the decoder and check that the whole input was parsed.
    pub fn end(self) -> Result<()> {
        let res = match self.remaining_len() {
            0 => Ok(()),
            len => Err(DecodeError::TrailingBytes(len))
        };
        self.traced(res)
    }
    /// Decode the next message.
    pub fn decode_value(&mut self) -> Result<Value> {
        let res = self.parse_value();
        self.traced(res)
    }
    /// Validate and skip over the next message without building a [`Value`].
    ///
    /// Fails exactly when [`Decoder::decode_value`] would fail.
    pub fn skip_value(&mut self) -> Result<()> {
        let res = self.eat_value();
        self.traced(res)
    }
    /// Turn the decoder into an iterator over the consecutive messages in
    /// the rest of the input.
    pub fn values(self) -> Values<'de> {
        Values { de: self, failed: false }
    }

    fn traced<T>(&self, res: Result<T>) -> Result<T> {
        if let Err(_err) = &res {
            debug_event!(error = %_err, offset = self.index, "MessagePack input rejected");
        }
        res
    }

    fn fetch(&mut self) -> Result<u8> {
        let c = self.peek()?;
        self.index += 1;
        Ok(c)
    }

    fn take(&mut self, len: usize) -> Result<&'de[u8]> {
        let end = self.index.checked_add(len).ok_or(DecodeError::Truncated)?;
        let res = self.input.get(self.index..end).ok_or(DecodeError::Truncated)?;
        self.index = end;
        Ok(res)
    }

    fn fetch_array<const N: usize>(&mut self) -> Result<[u8;N]> {
        let mut res = [0u8;N];
        res.copy_from_slice(self.take(N)?);
        Ok(res)
    }

    fn fetch_u8(&mut self) -> Result<u8> {
        Ok(u8::from_be_bytes(self.fetch_array()?))
    }

    fn fetch_i8(&mut self) -> Result<i8> {
        Ok(i8::from_be_bytes(self.fetch_array()?))
    }

    fn fetch_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.fetch_array()?))
    }

    fn fetch_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.fetch_array()?))
    }

    fn fetch_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.fetch_array()?))
    }

    fn fetch_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.fetch_array()?))
    }

    fn fetch_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.fetch_array()?))
    }

    fn fetch_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.fetch_array()?))
    }

    fn fetch_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.fetch_array()?))
    }

    #[inline]
    fn check_minimal(&self, marker: u8, minimal: Option<SizeClass>) -> Result<()> {
        match minimal {
            Some(class) if class.marker == marker => Ok(()),
            _ => Err(DecodeError::NonMinimal(marker))
        }
    }

    /// Check that a container opened inside `depth` others is allowed.
    #[inline]
    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth < self.max_depth {
            Ok(())
        }
        else {
            Err(DecodeError::DepthLimitExceeded)
        }
    }

    fn parse_integer(&mut self, marker: u8) -> Result<Integer> {
        let n: Integer = match marker {
            n@(MIN_POSFIXINT..=MAX_POSFIXINT|NEGFIXINT..=0xff) => {
                (n as i8).into()
            }
            UINT_8  => self.fetch_u8()?.into(),
            UINT_16 => self.fetch_u16()?.into(),
            UINT_32 => self.fetch_u32()?.into(),
            UINT_64 => self.fetch_u64()?.into(),
            INT_8   => self.fetch_i8()?.into(),
            INT_16  => self.fetch_i16()?.into(),
            INT_32  => self.fetch_i32()?.into(),
            INT_64  => self.fetch_i64()?.into(),
            _ => return Err(DecodeError::Malformed(marker))
        };
        if self.strict {
            self.check_minimal(marker, Some(SizeClass::of_int(n)))?;
        }
        Ok(n)
    }

    /// Read the length of a `str` or `bin` or the element count of an `array` or `map`.
    fn fetch_len(&mut self, marker: u8) -> Result<usize> {
        let len: usize = match marker {
            FIXMAP..=FIXMAP_MAX => (marker as usize) & MAX_FIXMAP_SIZE,
            FIXARRAY..=FIXARRAY_MAX => (marker as usize) & MAX_FIXARRAY_SIZE,
            FIXSTR..=FIXSTR_MAX => (marker as usize) & MAX_FIXSTR_SIZE,
            BIN_8|STR_8 => self.fetch_u8()?.into(),
            BIN_16|STR_16|ARRAY_16|MAP_16 => self.fetch_u16()?.into(),
            // a length wider than the address space can't be backed by the input
            BIN_32|STR_32|ARRAY_32|MAP_32 => usize::try_from(self.fetch_u32()?)
                                             .map_err(|_| DecodeError::Truncated)?,
            _ => return Err(DecodeError::Malformed(marker))
        };
        if self.strict {
            let minimal = match marker {
                FIXMAP..=FIXMAP_MAX|MAP_16|MAP_32 => SizeClass::of_map(len),
                FIXARRAY..=FIXARRAY_MAX|ARRAY_16|ARRAY_32 => SizeClass::of_array(len),
                FIXSTR..=FIXSTR_MAX|STR_8|STR_16|STR_32 => SizeClass::of_str(len),
                _ => SizeClass::of_bin(len)
            };
            self.check_minimal(marker, minimal)?;
        }
        Ok(len)
    }

    fn parse_str(&mut self, marker: u8) -> Result<&'de str> {
        let len = self.fetch_len(marker)?;
        Ok(str::from_utf8(self.take(len)?)?)
    }

    fn parse_bytes(&mut self, marker: u8) -> Result<&'de[u8]> {
        let len = self.fetch_len(marker)?;
        self.take(len)
    }

    fn parse_value(&mut self) -> Result<Value> {
        // containers still waiting for elements, innermost last
        let mut open: Vec<Frame> = Vec::new();
        'nodes: loop {
            let marker = self.fetch()?;
            let mut value = match marker {
                NIL => Value::Nil,
                FALSE => Value::Bool(false),
                TRUE => Value::Bool(true),
                MIN_POSFIXINT..=MAX_POSFIXINT|
                NEGFIXINT..=0xff|
                UINT_8..=INT_64 => Value::Integer(self.parse_integer(marker)?),
                FLOAT_64 => Value::Float64(self.fetch_f64()?),
                FIXSTR..=FIXSTR_MAX|
                STR_8|
                STR_16|
                STR_32 => Value::Text(self.parse_str(marker)?.into()),
                BIN_8|
                BIN_16|
                BIN_32 => Value::Bytes(self.parse_bytes(marker)?.into()),
                FIXARRAY..=FIXARRAY_MAX|
                ARRAY_16|
                ARRAY_32 => {
                    self.check_depth(open.len())?;
                    let len = self.fetch_len(marker)?;
                    if len == 0 {
                        Value::Array(Vec::new())
                    }
                    else {
                        // every element takes at least one byte
                        let items = Vec::with_capacity(len.min(self.remaining_len()));
                        open.push(Frame::Array { items, len });
                        continue 'nodes
                    }
                }
                FIXMAP..=FIXMAP_MAX|
                MAP_16|
                MAP_32 => {
                    self.check_depth(open.len())?;
                    let len = self.fetch_len(marker)?;
                    if len == 0 {
                        Value::Map(Vec::new())
                    }
                    else {
                        let entries = Vec::with_capacity(len.min(self.remaining_len() / 2));
                        open.push(Frame::Map { entries, key: None, len });
                        continue 'nodes
                    }
                }
                FLOAT_32|
                EXT_8|
                EXT_16|
                EXT_32|
                FIXEXT_1..=FIXEXT_16 => return Err(DecodeError::UnsupportedType(marker)),
                RESERVED => return Err(DecodeError::Malformed(marker)),
            };
            while let Some(mut frame) = open.pop() {
                if !frame.push(value) {
                    open.push(frame);
                    continue 'nodes
                }
                value = frame.into_value();
            }
            return Ok(value)
        }
    }

    fn eat_value(&mut self) -> Result<()> {
        // values still expected by each open container, innermost last
        let mut open: Vec<u64> = Vec::new();
        'nodes: loop {
            let marker = self.fetch()?;
            let count: u64 = match marker {
                NIL|
                FALSE|
                TRUE => 0,
                MIN_POSFIXINT..=MAX_POSFIXINT|
                NEGFIXINT..=0xff|
                UINT_8..=INT_64 => {
                    self.parse_integer(marker)?;
                    0
                }
                FLOAT_64 => {
                    self.take(8)?;
                    0
                }
                FIXSTR..=FIXSTR_MAX|
                STR_8|
                STR_16|
                STR_32 => {
                    self.parse_str(marker)?;
                    0
                }
                BIN_8|
                BIN_16|
                BIN_32 => {
                    self.parse_bytes(marker)?;
                    0
                }
                FIXARRAY..=FIXARRAY_MAX|
                ARRAY_16|
                ARRAY_32 => {
                    self.check_depth(open.len())?;
                    self.fetch_len(marker)? as u64
                }
                FIXMAP..=FIXMAP_MAX|
                MAP_16|
                MAP_32 => {
                    self.check_depth(open.len())?;
                    2 * self.fetch_len(marker)? as u64
                }
                FLOAT_32|
                EXT_8|
                EXT_16|
                EXT_32|
                FIXEXT_1..=FIXEXT_16 => return Err(DecodeError::UnsupportedType(marker)),
                RESERVED => return Err(DecodeError::Malformed(marker)),
            };
            if count != 0 {
                open.push(count);
                continue 'nodes
            }
            while let Some(count) = open.last_mut() {
                *count -= 1;
                if *count != 0 {
                    continue 'nodes
                }
                open.pop();
            }
            return Ok(())
        }
    }
}

/// A container being decoded.
enum Frame {
    Array { items: Vec<Value>, len: usize },
    /// `key` holds a decoded key until its value arrives
    Map { entries: Vec<(Value, Value)>, key: Option<Value>, len: usize },
}

impl Frame {
    /// Add the next element, return `true` once the container is complete.
    fn push(&mut self, value: Value) -> bool {
        match self {
            Frame::Array { items, len } => {
                items.push(value);
                items.len() == *len
            }
            Frame::Map { entries, key, len } => match key.take() {
                None => {
                    *key = Some(value);
                    false
                }
                Some(k) => {
                    entries.push((k, value));
                    entries.len() == *len
                }
            }
        }
    }

    fn into_value(self) -> Value {
        match self {
            Frame::Array { items, .. } => Value::Array(items),
            Frame::Map { entries, .. } => Value::Map(entries),
        }
    }
}

/// An iterator over consecutive MessagePack messages in a slice.
///
/// Yields each decoded message until the input is exhausted. After the
/// first error the iterator is done.
#[derive(Debug, Clone)]
pub struct Values<'de> {
    de: Decoder<'de>,
    failed: bool,
}

impl<'de> Values<'de> {
    /// Iterate over messages in `input` with the default decoder settings.
    pub fn new(input: &'de[u8]) -> Self {
        Decoder::from_slice(input).values()
    }
    /// Return the not yet decoded portion of the input.
    pub fn input_ref(&self) -> &'de[u8] {
        self.de.input_ref()
    }
}

impl<'de> Iterator for Values<'de> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.de.remaining_len() == 0 {
            return None
        }
        let res = self.de.decode_value();
        self.failed = res.is_err();
        Some(res)
    }
}

impl core::iter::FusedIterator for Values<'_> {}
