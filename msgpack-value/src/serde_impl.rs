//! Conversion of [`Value`] trees to and from other serde data formats.
#[cfg(feature = "std")]
use std::{vec::Vec, string::String};

#[cfg(all(feature = "alloc",not(feature = "std")))]
use alloc::{vec::Vec, string::String};

use core::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::EncodeError;
use crate::value::{Integer, Value};

// upper bound of elements reserved up front from an untrusted size hint
const MAX_PREALLOC: usize = 4096;

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        match self.as_u64() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_i64(self.to_wire_bits() as i64)
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Integer(n) => n.serialize(serializer),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Text(text) => match text.validate() {
                Ok(s) => serializer.serialize_str(s),
                Err(err) => Err(ser::Error::custom(EncodeError::from(err)))
            }
            Value::Bytes(v) => serializer.serialize_bytes(v),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a value representable in MessagePack")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Value, E> {
        Integer::try_from(v).map(Value::Integer)
        .map_err(|_| E::invalid_value(Unexpected::Other("128-bit integer"), &self))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
        Integer::try_from(v).map(Value::Integer)
        .map_err(|_| E::invalid_value(Unexpected::Other("128-bit integer"), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(v.into())
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Bytes(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
        where D: Deserializer<'de>
    {
        Value::deserialize(deserializer)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Value, D::Error>
        where D: Deserializer<'de>
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
        where A: SeqAccess<'de>
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
        where A: MapAccess<'de>
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0).min(MAX_PREALLOC));
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(Value::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use std::{vec, string::ToString};
    use serde::de::IntoDeserializer;
    use serde::de::value::{Error as ValueError, I128Deserializer, U128Deserializer};
    use crate::value::Utf8Text;
    use super::*;

    #[test]
    fn test_value_to_json() {
        let value = Value::Map(vec![
            (Value::from("list"), Value::Array(vec![
                Value::Nil,
                Value::from(true),
                Value::from(-1),
                Value::from(u64::MAX),
                Value::from(1.5),
            ])),
            (Value::from("bytes"), Value::from(&b"\x01\x02"[..])),
            (Value::from("empty"), Value::Map(vec![])),
        ]);
        assert_eq!(serde_json::to_string(&value).unwrap(),
                   r#"{"list":[null,true,-1,18446744073709551615,1.5],"bytes":[1,2],"empty":{}}"#);
        assert_eq!(serde_json::to_string(&Integer::MIN).unwrap(), "-9223372036854775808");
    }

    #[test]
    fn test_invalid_text_to_json() {
        let value = Value::Array(vec![Value::Text(Utf8Text::from_bytes(vec![0xc3]))]);
        let err = serde_json::to_string(&value).unwrap_err();
        assert_eq!(err.to_string(), EncodeError::InvalidUtf8.to_string());
    }

    #[test]
    fn test_value_from_json() {
        let value: Value = serde_json::from_str(r#"{"k":[1,-2,2.5,"s",null,false],"k":{}}"#).unwrap();
        assert_eq!(value, Value::Map(vec![
            (Value::from("k"), Value::Array(vec![
                Value::from(1),
                Value::from(-2),
                Value::from(2.5),
                Value::from("s"),
                Value::Nil,
                Value::from(false),
            ])),
            (Value::from("k"), Value::Map(vec![])),
        ]));
        let value: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(value.as_u64(), Some(u64::MAX));
    }

    #[test]
    fn test_value_from_wide_int() {
        let de: I128Deserializer<ValueError> = (-5i128).into_deserializer();
        assert_eq!(Value::deserialize(de), Ok(Value::from(-5)));
        let de: I128Deserializer<ValueError> = (1i128 << 64).into_deserializer();
        assert!(Value::deserialize(de).is_err());
        let de: U128Deserializer<ValueError> = (u64::MAX as u128).into_deserializer();
        assert_eq!(Value::deserialize(de), Ok(Value::from(u64::MAX)));
        let de: U128Deserializer<ValueError> = u128::MAX.into_deserializer();
        assert!(Value::deserialize(de).is_err());
    }

    #[test]
    fn test_value_through_json_and_msgpack() {
        let json = r#"[{"name":"ser","tags":["a","b"],"size":-70000}]"#;
        let value: Value = serde_json::from_str(json).unwrap();
        let bytes = crate::encode(&value).unwrap();
        let decoded = crate::decode_exact(&bytes).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(serde_json::to_string(&decoded).unwrap(), json);
    }
}
