//! MessagePack encoder
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(feature = "alloc",not(feature = "std")))]
use alloc::vec::Vec;

use core::slice;

use msgpack_write::{PackWrite, WriteResult};

use crate::error::EncodeError;
use crate::magick::*;
use crate::size_class::SizeClass;
use crate::value::Value;

/// Encoding result
pub type Result<T> = core::result::Result<T, EncodeError>;

/// Encode a value as a MessagePack message into a new vector of bytes.
///
/// On error no bytes are produced.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut vec = Vec::new();
    encode_to(&mut vec, value)?;
    Ok(vec)
}

/// Encode a value as a MessagePack message into a [`PackWrite`] implementation.
///
/// Return the number of bytes written. The message is validated and sized
/// before the first byte is written, so a failure leaves the writer untouched,
/// unless the writer itself gives out in the middle of a message.
pub fn encode_to<W>(writer: W, value: &Value) -> Result<usize>
    where W: PackWrite
{
    Encoder::new(writer).encode(value)
}

/// Return the exact number of bytes [`encode`] would produce for a value.
///
/// Fails with the same errors as [`encode`] for values that can't be encoded.
pub fn encoded_len(value: &Value) -> Result<usize> {
    let mut len = 0usize;
    walk(value, |node| {
        let header = Header::of(node)?;
        len = len.checked_add(header.class.header_len() + header.payload.len())
                 .ok_or(EncodeError::LengthOverflow)?;
        Ok(())
    })?;
    Ok(len)
}

/// MessagePack encoder writing messages to a [`PackWrite`] implementation
pub struct Encoder<W> {
    output: W
}

impl<W> Encoder<W> {
    #[inline(always)]
    pub fn new(output: W) -> Self {
        Encoder { output }
    }

    #[inline(always)]
    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: PackWrite> Encoder<W> {
    /// Encode one message and return the number of bytes written.
    ///
    /// Every string, binary, array and map picks the smallest header for its
    /// length and every integer the smallest form for its value.
    pub fn encode(&mut self, value: &Value) -> Result<usize> {
        let len = encoded_len(value)
            .and_then(|len| {
                self.output.try_reserve(len)?;
                Ok(len)
            })
            .inspect_err(|_err| {
                debug_event!(error = %_err, "MessagePack value not encoded");
            })?;
        let output = &mut self.output;
        walk(value, |node| Ok(Header::of(node)?.write_to(output)?))?;
        Ok(len)
    }
}

/// A node's header and, for `str` and `bin`, its payload.
///
/// `float 64` is treated as a header with an 8 byte field holding the bits.
struct Header<'a> {
    class: SizeClass,
    field: u64,
    payload: &'a [u8],
}

impl<'a> Header<'a> {
    fn of(value: &'a Value) -> Result<Self> {
        let (class, field, payload) = match value {
            Value::Nil => (SizeClass::inline(NIL), 0, &[][..]),
            Value::Bool(v) => (SizeClass::inline(if *v { TRUE } else { FALSE }), 0, &[][..]),
            Value::Integer(n) => (SizeClass::of_int(*n), n.to_wire_bits(), &[][..]),
            Value::Float64(f) => (SizeClass::field(FLOAT_64, 8), f.to_bits(), &[][..]),
            Value::Text(s) => {
                let s = s.validate()?;
                (length_class(SizeClass::of_str(s.len()))?, s.len() as u64, s.as_bytes())
            }
            Value::Bytes(b) => (length_class(SizeClass::of_bin(b.len()))?, b.len() as u64, &b[..]),
            Value::Array(items) => (length_class(SizeClass::of_array(items.len()))?, items.len() as u64, &[][..]),
            Value::Map(entries) => (length_class(SizeClass::of_map(entries.len()))?, entries.len() as u64, &[][..]),
        };
        Ok(Header { class, field, payload })
    }

    fn write_to<W: PackWrite>(&self, output: &mut W) -> WriteResult<()> {
        output.write_byte(self.class.marker)?;
        let field = self.field.to_be_bytes();
        output.write(&field[field.len() - self.class.field_len as usize..])?;
        output.write(self.payload)
    }
}

#[inline]
fn length_class(class: Option<SizeClass>) -> Result<SizeClass> {
    class.ok_or(EncodeError::LengthOverflow)
}

enum Pending<'a> {
    Items(slice::Iter<'a, Value>),
    /// remaining entries and the value of the entry whose key was just visited
    Entries(slice::Iter<'a, (Value, Value)>, Option<&'a Value>),
}

/// Visit every node in wire order: a container first, then its elements,
/// map keys before their values.
///
/// Nesting is tracked on the heap, not on the call stack.
fn walk<'a, F>(root: &'a Value, mut visit: F) -> Result<()>
    where F: FnMut(&'a Value) -> Result<()>
{
    let mut stack: Vec<Pending<'a>> = Vec::new();
    let mut next = Some(root);
    loop {
        if let Some(node) = next.take() {
            visit(node)?;
            match node {
                Value::Array(items) => stack.push(Pending::Items(items.iter())),
                Value::Map(entries) => stack.push(Pending::Entries(entries.iter(), None)),
                _ => {}
            }
        }
        let Some(top) = stack.last_mut() else {
            return Ok(())
        };
        next = match top {
            Pending::Items(items) => items.next(),
            Pending::Entries(entries, pending) => match pending.take() {
                Some(value) => Some(value),
                None => entries.next().map(|(key, value)| {
                    *pending = Some(value);
                    key
                })
            }
        };
        if next.is_none() {
            stack.pop();
        }
    }
}
