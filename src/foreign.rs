/// Implementation for foreign types
#[cfg(feature = "std")]
use std::{vec::Vec, collections::VecDeque, io::Cursor};
#[cfg(all(feature = "alloc",not(feature = "std")))]
use alloc::{vec::Vec, collections::VecDeque};

#[allow(unused_imports)]
use super::*;

#[cfg(any(feature = "arrayvec", feature = "heapless", feature = "tinyvec"))]
#[inline]
fn fits(remaining: usize, additional: usize) -> WriteResult<()> {
    (additional <= remaining).then_some(()).ok_or(WriteError::BufferFull)
}

#[cfg(any(feature = "std", feature = "alloc"))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "std", feature = "alloc"))))]
impl PackWrite for Vec<u8> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        self.push(byte);
        Ok(())
    }
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        Vec::try_reserve(self, additional).map_err(|_| WriteError::BufferFull)
    }
}

#[cfg(any(feature = "std", feature = "alloc"))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "std", feature = "alloc"))))]
impl PackWrite for VecDeque<u8> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        self.extend(buf.iter().copied());
        Ok(())
    }
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        self.push_back(byte);
        Ok(())
    }
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        VecDeque::try_reserve(self, additional).map_err(|_| WriteError::BufferFull)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
/// Partial output is possible: the cursor cannot tell its remaining capacity
/// up front for every backing storage.
impl<T> PackWrite for Cursor<T>
    where Cursor<T>: std::io::Write
{
    #[inline]
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        std::io::Write::write_all(self, buf).map_err(|_| WriteError::BufferFull)
    }
}

#[cfg(feature = "arrayvec")]
#[cfg_attr(docsrs, doc(cfg(feature = "arrayvec")))]
impl<const CAP: usize> PackWrite for arrayvec::ArrayVec<u8, CAP> {
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        self.try_extend_from_slice(buf).map_err(|_| WriteError::BufferFull)
    }
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        self.try_push(byte).map_err(|_| WriteError::BufferFull)
    }
    #[inline]
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        fits(self.remaining_capacity(), additional)
    }
}

#[cfg(feature = "heapless")]
#[cfg_attr(docsrs, doc(cfg(feature = "heapless")))]
impl<const CAP: usize> PackWrite for heapless::Vec<u8, CAP> {
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        self.extend_from_slice(buf).map_err(|_| WriteError::BufferFull)
    }
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        self.push(byte).map_err(|_| WriteError::BufferFull)
    }
    #[inline]
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        fits(self.capacity() - self.len(), additional)
    }
}

#[cfg(feature = "smallvec")]
#[cfg_attr(docsrs, doc(cfg(feature = "smallvec")))]
impl<const CAP: usize> PackWrite for smallvec::SmallVec<[u8; CAP]> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        self.push(byte);
        Ok(())
    }
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        smallvec::SmallVec::try_reserve(self, additional).map_err(|_| WriteError::BufferFull)
    }
}

#[cfg(feature = "tinyvec")]
#[cfg_attr(docsrs, doc(cfg(feature = "tinyvec")))]
impl<const CAP: usize> PackWrite for tinyvec::ArrayVec<[u8; CAP]> {
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        fits(self.capacity() - self.len(), buf.len())?;
        self.extend_from_slice(buf);
        Ok(())
    }
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        match self.try_push(byte) {
            None => Ok(()),
            Some(_) => Err(WriteError::BufferFull)
        }
    }
    #[inline]
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        fits(self.capacity() - self.len(), additional)
    }
}

#[cfg(all(feature = "tinyvec", any(feature = "std", feature = "alloc")))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "tinyvec", any(feature = "std", feature = "alloc")))))]
impl<const CAP: usize> PackWrite for tinyvec::TinyVec<[u8; CAP]> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> WriteResult<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
    #[inline]
    fn write_byte(&mut self, byte: u8) -> WriteResult<()> {
        self.push(byte);
        Ok(())
    }
    fn try_reserve(&mut self, additional: usize) -> WriteResult<()> {
        self.reserve(additional);
        Ok(())
    }
}
