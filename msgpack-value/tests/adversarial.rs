#![cfg(any(feature = "std", feature = "alloc"))]
use msgpack_value::*;

fn sample() -> Vec<u8> {
    let value = Value::Map(vec![
        (Value::from("ints"), Value::Array(vec![
            Value::from(0), Value::from(-33), Value::from(300), Value::from(-70000),
            Value::from(u64::MAX), Value::from(i64::MIN),
        ])),
        (Value::from("float"), Value::from(0.5)),
        (Value::from("text"), Value::from("x".repeat(40))),
        (Value::from("bin"), Value::Bytes(vec![7; 300])),
        (Value::from("deep"), Value::Array(vec![Value::Array(vec![Value::Map(vec![])]); 20])),
    ]);
    encode(&value).unwrap()
}

#[test]
fn every_prefix_is_truncated() {
    let bytes = sample();
    assert!(decode_exact(&bytes).is_ok());
    for end in 0..bytes.len() {
        assert_eq!(decode(&bytes[..end]), Err(DecodeError::Truncated), "prefix of {} bytes", end);
        assert_eq!(message_len(&bytes[..end]), Err(DecodeError::Truncated), "prefix of {} bytes", end);
    }
}

#[test]
fn reserved_and_unsupported_codes() {
    assert_eq!(decode(b"\xc1"), Err(DecodeError::Malformed(0xc1)));
    assert_eq!(decode(b"\x93\x01\x02\xc1"), Err(DecodeError::Malformed(0xc1)));
    assert_eq!(decode(b"\x81\xc1\x00"), Err(DecodeError::Malformed(0xc1)));
    assert_eq!(decode(b"\x81\x00\xc7\x00\x00"), Err(DecodeError::UnsupportedType(0xc7)));
    // bin payloads are opaque
    assert_eq!(decode(b"\xc4\x01\xc1"), Ok(Value::Bytes(vec![0xc1])));
}

#[test]
fn every_code_is_classified() {
    for code in 0..=u8::MAX {
        let mut input = vec![code];
        input.extend_from_slice(&[0; 32]);
        match decode(&input) {
            Ok(_) => {}
            Err(DecodeError::UnsupportedType(c)) => {
                assert_eq!(c, code);
                assert!(matches!(code, 0xc7..=0xca | 0xd4..=0xd8), "code {:#04x}", code);
            }
            Err(DecodeError::Malformed(c)) => {
                assert_eq!((c, code), (0xc1, 0xc1));
            }
            Err(err) => panic!("code {:#04x}: {:?}", code, err)
        }
    }
}

#[test]
fn nesting_bomb() {
    let mut bomb = vec![0x91u8; 1_000_000];
    bomb.push(0xc0);
    assert_eq!(decode(&bomb), Err(DecodeError::DepthLimitExceeded));
    let mut bomb = vec![0x81u8, 0xc0].repeat(500_000);
    bomb.extend_from_slice(&[0xc0, 0xc0]);
    assert_eq!(decode(&bomb), Err(DecodeError::DepthLimitExceeded));
    assert_eq!(message_len(&bomb), Err(DecodeError::DepthLimitExceeded));

    let mut deep = vec![0x91u8; 400];
    deep.push(0xc0);
    assert_eq!(Decoder::from_slice(&deep).with_max_depth(399).decode_value(),
               Err(DecodeError::DepthLimitExceeded));
    let value = Decoder::from_slice(&deep).with_max_depth(400).decode_value().unwrap();
    let mut levels = 0;
    let mut node = &value;
    while let Some([inner]) = node.as_array() {
        levels += 1;
        node = inner;
    }
    assert_eq!(levels, 400);
    assert!(node.is_nil());
}

#[test]
fn huge_counts() {
    assert_eq!(decode(b"\xdd\xff\xff\xff\xff"), Err(DecodeError::Truncated));
    assert_eq!(decode(b"\xdf\xff\xff\xff\xff\x00\x00"), Err(DecodeError::Truncated));
    assert_eq!(decode(b"\xdb\xff\xff\xff\xffabc"), Err(DecodeError::Truncated));
    assert_eq!(decode(b"\xc6\xff\xff\xff\xff\x00"), Err(DecodeError::Truncated));
    let mut input = b"\xdd\x7f\xff\xff\xff".to_vec();
    input.extend(vec![0xc0; 1000]);
    assert_eq!(decode(&input), Err(DecodeError::Truncated));
}

#[test]
fn invalid_utf8_text() {
    assert_eq!(decode(b"\xa3a\xffb"), Err(DecodeError::InvalidUtf8));
    assert_eq!(decode(b"\xa1\xc3"), Err(DecodeError::InvalidUtf8));
    assert_eq!(decode(b"\xa3\xed\xa0\x80"), Err(DecodeError::InvalidUtf8));
    assert_eq!(message_len(b"\x91\xa1\x80"), Err(DecodeError::InvalidUtf8));
}

#[test]
fn concatenated_messages() {
    let mut stream = sample();
    let first = stream.len();
    stream.extend(encode(&Value::from("next")).unwrap());
    stream.push(0xc3);
    assert_eq!(message_len(&stream), Ok(first));
    assert_eq!(decode_exact(&stream), Err(DecodeError::TrailingBytes(6)));
    let (_, tail) = decode_split_tail(&stream).unwrap();
    assert_eq!(tail, b"\xa4next\xc3");
    let values: Vec<_> = Values::new(&stream).collect::<Result<_, _>>().unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[2], Value::Bool(true));
}

fn on_small_stack<F: FnOnce() + Send + 'static>(stack_size: usize, f: F) {
    std::thread::Builder::new()
        .stack_size(stack_size)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn default_depth_on_small_stack() {
    let mut arrays = vec![0x91u8; DEFAULT_MAX_DEPTH - 1];
    arrays.push(0x90);
    let mut maps = vec![0x81u8, 0xc0].repeat(DEFAULT_MAX_DEPTH - 1);
    maps.push(0x80);
    on_small_stack(512 * 1024, move || {
        for input in [arrays, maps] {
            assert_eq!(message_len(&input), Ok(input.len()));
            let value = decode_exact(&input).unwrap();
            let mut levels = 1;
            let mut node = &value;
            loop {
                node = match node {
                    Value::Array(items) if items.len() == 1 => &items[0],
                    Value::Map(entries) if entries.len() == 1 => &entries[0].1,
                    _ => break
                };
                levels += 1;
            }
            assert_eq!(levels, DEFAULT_MAX_DEPTH);
            assert_eq!(encode(&value).unwrap(), input);
        }
    });
}

#[test]
fn unlimited_depth_on_small_stack() {
    on_small_stack(64 * 1024, || {
        let bomb = vec![0x91u8; 100_000];
        let de = Decoder::from_slice(&bomb).with_max_depth(usize::MAX);
        assert_eq!(de.clone().decode_value(), Err(DecodeError::Truncated));
        assert_eq!(de.clone().skip_value(), Err(DecodeError::Truncated));

        let mut maps = vec![0x81u8, 0xc0].repeat(100_000);
        assert_eq!(Decoder::from_slice(&maps).with_max_depth(usize::MAX).skip_value(),
                   Err(DecodeError::Truncated));
        maps.push(0xc0);
        let mut de = Decoder::from_slice(&maps).with_max_depth(usize::MAX);
        assert_eq!(de.skip_value(), Ok(()));
        assert_eq!(de.position(), maps.len());
    });
}
