//! Byte sinks for the [`msgpack-value`] encoder.
//!
//! The encoder sizes a whole message before emitting it and asks the sink to
//! [`PackWrite::try_reserve`] that many bytes. Bounded sinks refuse at that
//! point, so a message either fits completely or nothing is written.
//!
//! [`msgpack-value`]: https://docs.rs/msgpack-value
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(feature = "alloc",not(feature = "std")))]
extern crate alloc;

use core::fmt;

mod foreign;

pub type WriteResult<T> = Result<T, WriteError>;

/// An error returned by [`PackWrite`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum WriteError {
    /// Buffer is full
    BufferFull,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::BufferFull => f.write_str("buffer is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for WriteError {}

/// The encoder writes MessagePack bytes to implementations of this trait.
pub trait PackWrite {
    /// Write all bytes from `buf` to the internal buffer.
    ///
    /// When over capacity return `Err(WriteError::BufferFull)`.
    fn write(&mut self, buf: &[u8]) -> WriteResult<()>;
    /// Write a single `byte` to the internal buffer.
    ///
    /// When over capacity return `Err(WriteError::BufferFull)`.
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        self.write(core::slice::from_ref(&byte))
    }
    /// Write a string to the internal buffer.
    ///
    /// When over capacity return `Err(WriteError::BufferFull)`.
    #[inline]
    fn write_str(&mut self, s: &str) -> WriteResult<()> {
        self.write(s.as_bytes())
    }
    /// Announce that `additional` bytes are about to be written.
    ///
    /// Bounded sinks return `Err(WriteError::BufferFull)` when the bytes would
    /// not fit, before anything is written. Growable sinks may pre-allocate.
    /// The default implementation accepts any size.
    #[inline]
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        let _ = additional;
        Ok(())
    }
}

impl<T: PackWrite> PackWrite for &'_ mut T {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        (*self).write(buf)
    }
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        (*self).write_byte(byte)
    }
    #[inline]
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        (*self).try_reserve(additional)
    }
}

/// A writer over a fixed, caller provided slice
#[derive(Debug, PartialEq)]
pub struct SliceWriter<'a> {
    pub buf: &'a mut [u8],
    pub len: usize
}

impl<'a> AsRef<[u8]> for SliceWriter<'a> {
    /// Returns a populated portion of the slice
    fn as_ref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl<'a> AsMut<[u8]> for SliceWriter<'a> {
    /// Returns a populated portion of the slice
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }
}

impl<'a> SliceWriter<'a> {
    /// Create new instance
    pub fn new(buf: &'a mut [u8]) -> Self {
        SliceWriter { buf, len: 0 }
    }
    /// Return populated length
    pub fn len(&self) -> usize {
        self.len
    }
    /// Return `true` if nothing was written yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Return total capacity
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
    /// Return remaining capacity
    pub fn rem_capacity(&self) -> usize {
        self.buf.len() - self.len
    }
    /// Forget the populated portion, the whole buffer becomes available again
    pub fn clear(&mut self) {
        self.len = 0;
    }
    /// Split the underlying buffer and return the portion of the populated buffer
    /// with an underlying buffer's borrowed lifetime.
    ///
    /// Use it to keep one encoded message while encoding the next one into the
    /// rest of the buffer.
    pub fn split(self) -> (&'a mut[u8], Self) {
        let (res, buf) = self.buf.split_at_mut(self.len);
        (res, Self { buf, len: 0 })
    }
    /// Destruct into an underlying buffer
    pub fn into_buf(self) -> &'a mut [u8] {
        self.buf
    }
}

impl PackWrite for SliceWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        let end = self.len + buf.len();
        match self.buf.get_mut(self.len..end) {
            Some(chunk) => {
                chunk.copy_from_slice(buf);
                self.len = end;
                Ok(())
            }
            None => Err(WriteError::BufferFull)
        }
    }

    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        if additional <= self.rem_capacity() {
            Ok(())
        }
        else {
            Err(WriteError::BufferFull)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_writer() {
        let mut buf = [0u8;8];
        let mut writer = SliceWriter::new(&mut buf[..]);
        assert!(writer.is_empty());
        writer.write_byte(0x93).unwrap();
        writer.write(&[0x01, 0xcc, 0x80]).unwrap();
        writer.write_byte(0xa1).unwrap();
        writer.write_str("a").unwrap();
        let expected = b"\x93\x01\xcc\x80\xa1a";
        assert_eq!(writer.as_ref(), expected);
        assert_eq!(writer.rem_capacity(), 2);
        assert_eq!(writer.try_reserve(2), Ok(()));
        assert_eq!(writer.try_reserve(3), Err(WriteError::BufferFull));
        assert_eq!(writer.write(&[0xcd, 0x01, 0x00]), Err(WriteError::BufferFull));
        assert_eq!(writer.len(), 6);
        let (head, mut writer) = writer.split();
        assert_eq!(head, expected);
        assert_eq!(writer.capacity(), 2);
        writer.write(b"\xc2\xc3").unwrap();
        assert_eq!(writer.write_byte(0xc0).unwrap_err(), WriteError::BufferFull);
        writer.clear();
        assert_eq!(writer.rem_capacity(), 2);
        assert_eq!(writer.into_buf(), b"\xc2\xc3");
    }

    #[test]
    fn test_mut_ref_forwards_reserve() {
        fn reserve_and_write<W: PackWrite>(mut output: W, additional: usize) -> WriteResult<()> {
            output.try_reserve(additional)?;
            output.write_byte(0xc0)
        }
        let mut buf = [0u8;2];
        let mut writer = SliceWriter::new(&mut buf[..]);
        assert_eq!(reserve_and_write(&mut writer, 3), Err(WriteError::BufferFull));
        assert!(writer.is_empty());
        assert_eq!(reserve_and_write(&mut writer, 1), Ok(()));
        assert_eq!(writer.as_ref(), b"\xc0");
    }
}
