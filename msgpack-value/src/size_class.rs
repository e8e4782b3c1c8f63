//! Selection of the smallest MessagePack header for a value, length or count.
use crate::magick::*;
use crate::value::Integer;

/// A MessagePack header: the marker byte and the width of the big-endian
/// field that follows it.
///
/// For integers the field holds the value, for `str`, `bin`, `array` and `map`
/// it holds the length or element count. Inline forms (`fixint`, `fixstr`,
/// `fixarray`, `fixmap`) carry everything in the marker and have no field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeClass {
    pub marker: u8,
    pub field_len: u8,
}

impl SizeClass {
    #[inline(always)]
    pub(crate) const fn inline(marker: u8) -> Self {
        SizeClass { marker, field_len: 0 }
    }

    #[inline(always)]
    pub(crate) const fn field(marker: u8, field_len: u8) -> Self {
        SizeClass { marker, field_len }
    }

    /// Encoded size of the marker and the field.
    #[inline]
    pub fn header_len(&self) -> usize {
        1 + self.field_len as usize
    }

    /// The smallest integer form.
    ///
    /// Non-negative values always use `fixint` or `uint`, negative values
    /// `fixint` or `int`.
    pub fn of_int(n: Integer) -> Self {
        if let Some(v) = n.as_u64() {
            if v <= MAX_POSFIXINT as u64 {
                Self::inline(v as u8)
            }
            else if v <= u8::MAX as u64 {
                Self::field(UINT_8, 1)
            }
            else if v <= u16::MAX as u64 {
                Self::field(UINT_16, 2)
            }
            else if v <= u32::MAX as u64 {
                Self::field(UINT_32, 4)
            }
            else {
                Self::field(UINT_64, 8)
            }
        }
        else {
            let v = n.to_wire_bits() as i64;
            if v >= MIN_NEGFIXINT {
                Self::inline(v as u8)
            }
            else if v >= i8::MIN as i64 {
                Self::field(INT_8, 1)
            }
            else if v >= i16::MIN as i64 {
                Self::field(INT_16, 2)
            }
            else if v >= i32::MIN as i64 {
                Self::field(INT_32, 4)
            }
            else {
                Self::field(INT_64, 8)
            }
        }
    }

    /// The smallest `str` header for `len` bytes of UTF-8.
    ///
    /// Return `None` when `len` exceeds `u32::MAX`.
    pub fn of_str(len: usize) -> Option<Self> {
        if len <= MAX_FIXSTR_SIZE {
            Some(Self::inline(FIXSTR | len as u8))
        }
        else {
            Self::of_len(len, Some(STR_8), STR_16, STR_32)
        }
    }

    /// The smallest `bin` header for `len` bytes.
    ///
    /// Return `None` when `len` exceeds `u32::MAX`.
    pub fn of_bin(len: usize) -> Option<Self> {
        Self::of_len(len, Some(BIN_8), BIN_16, BIN_32)
    }

    /// The smallest `array` header for `len` elements.
    ///
    /// Return `None` when `len` exceeds `u32::MAX`.
    pub fn of_array(len: usize) -> Option<Self> {
        if len <= MAX_FIXARRAY_SIZE {
            Some(Self::inline(FIXARRAY | len as u8))
        }
        else {
            Self::of_len(len, None, ARRAY_16, ARRAY_32)
        }
    }

    /// The smallest `map` header for `len` key-value pairs.
    ///
    /// Return `None` when `len` exceeds `u32::MAX`.
    pub fn of_map(len: usize) -> Option<Self> {
        if len <= MAX_FIXMAP_SIZE {
            Some(Self::inline(FIXMAP | len as u8))
        }
        else {
            Self::of_len(len, None, MAP_16, MAP_32)
        }
    }

    #[inline]
    fn of_len(len: usize, marker8: Option<u8>, marker16: u8, marker32: u8) -> Option<Self> {
        match marker8 {
            Some(marker) if len <= u8::MAX as usize => Some(Self::field(marker, 1)),
            _ if len <= u16::MAX as usize => Some(Self::field(marker16, 2)),
            _ if u32::try_from(len).is_ok() => Some(Self::field(marker32, 4)),
            _ => None
        }
    }
}
