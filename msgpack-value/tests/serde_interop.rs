#![cfg(feature = "std")]
use serde::{Serialize, Deserialize};
use serde_json::json;
use msgpack_value::*;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Test {
    name: String,
    age: u8,
    score: i32,
    height: f64,
    phones: Vec<String>,
    human: bool,
    nick: Option<String>,
}

fn john() -> Test {
    Test {
        name: "John Doe".into(),
        age: 43,
        score: -999,
        height: 5.75,
        phones: vec!["+44 1234567".into(), "+44 2345678".into()],
        human: true,
        nick: None,
    }
}

#[test]
fn struct_through_value() {
    let json = serde_json::to_string(&john()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let bytes = encode(&value).unwrap();
    assert_eq!(&bytes[..10], b"\x87\xa4name\xa8Joh");
    assert_eq!(message_len(&bytes), Ok(bytes.len()));

    let decoded = decode_exact(&bytes).unwrap();
    assert_eq!(decoded, value);
    let entries = decoded.as_map().unwrap();
    assert_eq!(entries[1], (Value::from("age"), Value::from(43)));
    assert_eq!(entries[2].1.as_i64(), Some(-999));
    assert_eq!(entries[6], (Value::from("nick"), Value::Nil));

    let back: Test = serde_json::from_str(&serde_json::to_string(&decoded).unwrap()).unwrap();
    assert_eq!(back, john());
}

#[test]
fn json_value_through_msgpack() {
    let json_val = json!({
        "name": "John Doe",
        "age": 43,
        "balance": -1.5e300,
        "big": u64::MAX,
        "phones": ["+44 1234567", "+44 2345678"],
        "human": true,
        "pet": null
    });
    let value: Value = serde_json::from_value(json_val.clone()).unwrap();
    let bytes = encode(&value).unwrap();
    let decoded = decode(&bytes).unwrap();
    let back = serde_json::to_value(&decoded).unwrap();
    assert_eq!(back, json_val);
}

#[test]
fn bytes_to_json() {
    let value = Value::Array(vec![Value::Bytes(vec![0, 255]), Value::from("\u{0}")]);
    let bytes = encode(&value).unwrap();
    assert_eq!(bytes, b"\x92\xc4\x02\x00\xff\xa1\x00");
    let decoded = decode(&bytes).unwrap();
    assert_eq!(serde_json::to_string(&decoded).unwrap(), r#"[[0,255],"\u0000"]"#);
}

#[test]
fn non_utf8_text_to_json() {
    let value = Value::Text(Utf8Text::from_bytes(b"\xff\xfe".to_vec()));
    assert!(serde_json::to_string(&value).is_err());
    assert_eq!(encode(&value), Err(EncodeError::InvalidUtf8));
}
