//! A MessagePack [`Value`] tree with a minimal-form encoder and a bounds-checked decoder.
/*!

Encoding, [`Value`] -> MessagePack:

| Value              | MessagePack type (always the smallest that fits)
|--------------------|--------------------------------------------------
| `Nil`              | `nil`
| `Bool`             | `false`, `true`
| `Integer` >= 0     | `positive fixint`, `uint 8/16/32/64`
| `Integer` < 0      | `negative fixint`, `int 8/16/32/64`
| `Float64`          | `float 64`
| `Text`             | `fixstr`, `str 8/16/32`
| `Bytes`            | `bin 8/16/32`
| `Array`            | `fixarray`, `array 16/32`
| `Map`              | `fixmap`, `map 16/32`

Decoding accepts every well-formed header of the types above, minimal or not,
unless the [`Decoder`] is put in [strict](Decoder::strict) mode.
`float 32`, `fixext` and `ext` are recognized and rejected with
[`DecodeError::UnsupportedType`]. The reserved `0xc1` code is rejected with
[`DecodeError::Malformed`].

```
use msgpack_value::{Value, encode, decode};

let value = Value::Map(vec![
    (Value::from("compact"), Value::from(true)),
    (Value::from("schema"), Value::from(0)),
]);
let bytes = encode(&value).unwrap();
assert_eq!(bytes, b"\x82\xa7compact\xc3\xa6schema\x00");
assert_eq!(decode(&bytes).unwrap(), value);
```

[`Value`] also implements [`serde::Serialize`] and [`serde::Deserialize`], so a
tree can be converted to and from any other self-describing serde format.
*/
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(feature = "alloc",not(feature = "std")))]
extern crate alloc;

#[cfg(not(any(feature = "std", feature = "alloc")))]
compile_error!("msgpack-value requires either the \"std\" or the \"alloc\" feature");

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

pub mod value;
pub mod size_class;
pub mod encode;
pub mod decode;
pub mod error;
mod serde_impl;

pub use msgpack_write;
pub use msgpack_write::{PackWrite, SliceWriter};

pub use value::{Value, Integer, Utf8Text};
pub use size_class::SizeClass;
pub use error::{EncodeError, DecodeError};

pub use encode::{
    Encoder,
    encode,
    encode_to,
    encoded_len
};

pub use decode::{
    Decoder,
    Values,
    DEFAULT_MAX_DEPTH,
    decode,
    decode_exact,
    decode_split_tail,
    message_len
};

mod magick {
    /* MessagePack MAGICK */
    pub const MIN_POSFIXINT: u8 = 0x00;
    pub const MAX_POSFIXINT: u8 = 0x7f;
    pub const NEGFIXINT: u8 = 0b11100000;
    pub const MIN_NEGFIXINT: i64 = NEGFIXINT as i8 as i64; //-32
    pub const NIL: u8      = 0xc0;
    pub const RESERVED: u8 = 0xc1;
    pub const FALSE: u8    = 0xc2;
    pub const TRUE: u8     = 0xc3;

    pub const FIXMAP: u8   = 0x80; /* 1000xxxx */
    pub const MAX_FIXMAP_SIZE: usize = 0b1111;
    pub const FIXMAP_MAX: u8 = FIXMAP + MAX_FIXMAP_SIZE as u8; /* 10001111 */

    pub const FIXARRAY: u8 = 0x90; /* 1001xxxx */
    pub const MAX_FIXARRAY_SIZE: usize = 0b1111;
    pub const FIXARRAY_MAX: u8 = FIXARRAY + MAX_FIXARRAY_SIZE as u8; /* 10011111 */

    pub const FIXSTR: u8   = 0xa0; /* 101xxxxx */
    pub const MAX_FIXSTR_SIZE: usize = 0b11111;
    pub const FIXSTR_MAX: u8 = FIXSTR + MAX_FIXSTR_SIZE as u8; /* 10111111 */

    pub const BIN_8: u8     = 0xc4;
    pub const BIN_16: u8    = 0xc5;
    pub const BIN_32: u8    = 0xc6;

    pub const EXT_8: u8     = 0xc7;
    pub const EXT_16: u8    = 0xc8;
    pub const EXT_32: u8    = 0xc9;

    pub const FLOAT_32: u8  = 0xca;
    pub const FLOAT_64: u8  = 0xcb;

    pub const UINT_8: u8    = 0xcc;
    pub const UINT_16: u8   = 0xcd;
    pub const UINT_32: u8   = 0xce;
    pub const UINT_64: u8   = 0xcf;

    pub const INT_8: u8     = 0xd0;
    pub const INT_16: u8    = 0xd1;
    pub const INT_32: u8    = 0xd2;
    pub const INT_64: u8    = 0xd3;

    pub const FIXEXT_1: u8  = 0xd4;
    pub const FIXEXT_16: u8 = 0xd8;

    pub const STR_8: u8     = 0xd9;
    pub const STR_16: u8    = 0xda;
    pub const STR_32: u8    = 0xdb;

    pub const ARRAY_16: u8  = 0xdc;
    pub const ARRAY_32: u8  = 0xdd;

    pub const MAP_16: u8    = 0xde;
    pub const MAP_32: u8    = 0xdf;
}
