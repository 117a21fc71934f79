//! Codec Tests
//!
//! These tests verify:
//! - Byte-exact encoding of every value kind
//! - Decode of encoded values recovers the original
//! - Binary-safe bulk strings (embedded CRLF)
//! - Truncation, terminator, count and integer validation
//! - Resumable framing of replies that arrive in pieces

use atlasresp::protocol::{decode, decode_frame, encode, FrameScanner, MAX_DEPTH};
use atlasresp::{RespError, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn bulk(s: &str) -> Value {
    Value::BulkString(s.to_string())
}

fn sample_values() -> Vec<Value> {
    vec![
        Value::Integer(0),
        Value::Integer(-42),
        Value::Integer(i64::MAX),
        Value::Integer(i64::MIN),
        Value::SimpleString("OK".into()),
        Value::SimpleString(String::new()),
        bulk("hello"),
        bulk(""),
        bulk("héllo wörld ✓"),
        Value::Null,
        Value::Error("ERR unknown command 'FOO'".into()),
        Value::Array(vec![]),
        Value::Array(vec![bulk("a"), Value::Integer(1), Value::Null]),
        // Depth 4
        Value::Array(vec![Value::Array(vec![Value::Array(vec![Value::Array(vec![
            bulk("deep"),
            Value::Error("WRONGTYPE".into()),
            Value::SimpleString("PONG".into()),
        ])])])]),
    ]
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_integer() {
    assert_eq!(&encode(&Value::Integer(1000))[..], b":1000\r\n");
    assert_eq!(&encode(&Value::Integer(-7))[..], b":-7\r\n");
}

#[test]
fn test_encode_strings_and_error() {
    assert_eq!(&encode(&Value::SimpleString("OK".into()))[..], b"+OK\r\n");
    assert_eq!(&encode(&bulk("foobar"))[..], b"$6\r\nfoobar\r\n");
    assert_eq!(&encode(&bulk(""))[..], b"$0\r\n\r\n");
    assert_eq!(&encode(&Value::Error("ERR bad".into()))[..], b"-ERR bad\r\n");
    assert_eq!(&encode(&Value::Null)[..], b"$-1\r\n");
}

#[test]
fn test_encode_bulk_length_counts_utf8_bytes() {
    // "é" is two bytes
    assert_eq!(&encode(&bulk("é"))[..], "$2\r\né\r\n".as_bytes());
}

#[test]
fn test_encode_nested_array() {
    let value = Value::Array(vec![
        bulk("GET"),
        Value::Array(vec![Value::Integer(1), Value::Null]),
    ]);
    assert_eq!(
        &encode(&value)[..],
        b"*2\r\n$3\r\nGET\r\n*2\r\n:1\r\n$-1\r\n"
    );
}

#[test]
fn test_value_to_bytes_matches_encode() {
    let value = Value::Array(vec![bulk("PING")]);
    assert_eq!(value.to_bytes(), encode(&value));
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_recovers_encoded_values() {
    for value in sample_values() {
        let bytes = encode(&value);
        assert_eq!(decode(&bytes).unwrap(), value, "bytes: {:?}", bytes);
    }
}

#[test]
fn test_decode_binary_safe_bulk_string() {
    let content = "line one\r\nline two\r\n\r\n";
    let bytes = encode(&bulk(content));
    assert!(bytes.starts_with(format!("${}\r\n", content.len()).as_bytes()));
    assert_eq!(decode(&bytes).unwrap(), bulk(content));
}

#[test]
fn test_decode_null_forms() {
    assert_eq!(decode(b"$-1\r\n").unwrap(), Value::Null);
    assert_eq!(decode(b"*-1\r\n").unwrap(), Value::Null);
    assert_eq!(decode(b"*0\r\n").unwrap(), Value::Array(vec![]));
}

#[test]
fn test_decode_error_is_a_value() {
    let value = decode(b"-ERR wrong number of arguments\r\n").unwrap();
    assert_eq!(value, Value::Error("ERR wrong number of arguments".into()));
}

#[test]
fn test_decode_frame_reports_consumed() {
    let (value, consumed) = decode_frame(b"+OK\r\n:1\r\n").unwrap();
    assert_eq!(value, Value::SimpleString("OK".into()));
    assert_eq!(consumed, 5);
}

// =============================================================================
// Malformed Frame Tests
// =============================================================================

#[test]
fn test_truncated_frames_fail() {
    for value in sample_values() {
        let bytes = encode(&value);
        let cut = &bytes[..bytes.len() - 1];
        let err = decode(cut).unwrap_err();
        assert!(
            matches!(err, RespError::Truncated { .. }),
            "{:?} decoded from {:?}",
            err,
            cut
        );
        assert!(err.is_malformed());
    }
}

#[test]
fn test_array_count_enforced() {
    let err = decode(b"*3\r\n:1\r\n:2\r\n").unwrap_err();
    assert!(err.is_malformed());
    assert!(matches!(err, RespError::Truncated { .. }));
}

#[test]
fn test_bulk_declared_longer_than_body() {
    let err = decode(b"$10\r\nabc\r\n").unwrap_err();
    assert!(matches!(
        err,
        RespError::Truncated {
            needed: 17,
            available: 10
        }
    ));
}

#[test]
fn test_truncated_reports_buffer_lengths() {
    // Missing final LF after a bulk body
    assert!(matches!(
        decode(b"$3\r\nabc\r"),
        Err(RespError::Truncated {
            needed: 9,
            available: 8
        })
    ));

    // Array ends before its second element's tag
    assert!(matches!(
        decode(b"*2\r\n:1\r\n"),
        Err(RespError::Truncated {
            needed: 9,
            available: 8
        })
    ));

    // Line without any terminator yet
    assert!(matches!(
        decode(b"+OK"),
        Err(RespError::Truncated {
            needed: 5,
            available: 3
        })
    ));
}

#[test]
fn test_bulk_declared_shorter_than_body() {
    let err = decode(b"$2\r\nabc\r\n").unwrap_err();
    assert!(matches!(err, RespError::MissingTerminator { offset: 6 }));
}

#[test]
fn test_empty_buffer() {
    assert!(matches!(decode(b""), Err(RespError::EmptyFrame)));
}

#[test]
fn test_unknown_type_byte() {
    assert!(matches!(decode(b"!5\r\nhello\r\n"), Err(RespError::UnknownType(b'!'))));
    assert!(matches!(decode(b"hello"), Err(RespError::UnknownType(b'h'))));
}

#[test]
fn test_invalid_integers() {
    for input in [&b":12a\r\n"[..], b":\r\n", b":-\r\n", b":+5\r\n", b"$x\r\n", b"*1.5\r\n"] {
        let err = decode(input).unwrap_err();
        assert!(
            matches!(err, RespError::InvalidInteger(_)),
            "{:?} for {:?}",
            err,
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_integer_overflow_rejected() {
    let err = decode(b":99999999999999999999\r\n").unwrap_err();
    assert!(matches!(err, RespError::InvalidInteger(_)));
}

#[test]
fn test_missing_terminator() {
    assert!(matches!(
        decode(b":12\n"),
        Err(RespError::MissingTerminator { offset: 3 })
    ));
    assert!(matches!(
        decode(b"+OK\rX"),
        Err(RespError::MissingTerminator { offset: 3 })
    ));
}

#[test]
fn test_invalid_utf8() {
    assert!(matches!(decode(b"$2\r\n\xff\xfe\r\n"), Err(RespError::InvalidUtf8)));
    assert!(matches!(decode(b"+\xc3\r\n"), Err(RespError::InvalidUtf8)));
}

#[test]
fn test_trailing_bytes() {
    assert!(matches!(
        decode(b"+OK\r\n+OK\r\n"),
        Err(RespError::TrailingBytes(5))
    ));
}

#[test]
fn test_oversized_bulk_length() {
    let err = decode(b"$9999999999\r\n").unwrap_err();
    assert!(matches!(err, RespError::InvalidInteger(_)));
}

#[test]
fn test_nesting_limit() {
    let mut input = b"*1\r\n".repeat(MAX_DEPTH + 1);
    input.extend_from_slice(b":1\r\n");
    assert!(matches!(decode(&input), Err(RespError::NestingTooDeep(_))));

    let mut input = b"*1\r\n".repeat(MAX_DEPTH);
    input.extend_from_slice(b":1\r\n");
    assert!(decode(&input).is_ok());
}

// =============================================================================
// Framing Tests
// =============================================================================

/// `*count` followed by `count` bulk strings of 12 bytes each
fn key_listing(count: usize) -> (Vec<u8>, usize) {
    let mut bytes = format!("*{}\r\n", count).into_bytes();
    for i in 0..count {
        bytes.extend_from_slice(format!("$12\r\nkey:{:08}\r\n", i).as_bytes());
    }
    // Widest single item: `$12\r\n` + body + CRLF
    (bytes, 5 + 12 + 2)
}

#[test]
fn test_scanner_matches_decoder() {
    for value in sample_values() {
        let bytes = encode(&value);
        let mut scanner = FrameScanner::new();
        let (_, consumed) = decode_frame(&bytes).unwrap();
        assert_eq!(scanner.scan(&bytes).unwrap(), Some(consumed), "{:?}", value);
    }
}

#[test]
fn test_scanner_resumes_across_chunks() {
    let (bytes, widest) = key_listing(20_000);
    let mut scanner = FrameScanner::new();

    let mut end = 0;
    let mut last_position = 0;
    let mut passes = 0;
    let found = loop {
        end = (end + 4096).min(bytes.len());
        passes += 1;
        match scanner.scan(&bytes[..end]).unwrap() {
            Some(len) => break len,
            None => {
                // Only the item cut by the chunk boundary is left to revisit
                assert!(scanner.position() >= last_position);
                assert!(end - scanner.position() < widest);
                last_position = scanner.position();
            }
        }
    };

    assert_eq!(found, bytes.len());
    assert_eq!(passes, bytes.len().div_ceil(4096));
    assert_eq!(scanner.position(), 0);

    match decode(&bytes[..found]).unwrap() {
        Value::Array(items) => {
            assert_eq!(items.len(), 20_000);
            assert_eq!(items[19_999], bulk("key:00019999"));
        }
        other => panic!("expected array, got {:?}", other),
    }
}

#[test]
fn test_scanner_byte_at_a_time() {
    let bytes = encode(&Value::Array(vec![
        Value::Integer(7),
        Value::Array(vec![bulk("a\r\nb"), Value::Null, Value::Array(vec![])]),
        Value::Error("ERR no".into()),
    ]));

    let mut scanner = FrameScanner::new();
    for end in 0..bytes.len() {
        assert_eq!(scanner.scan(&bytes[..end]).unwrap(), None, "at {}", end);
    }
    assert_eq!(scanner.scan(&bytes).unwrap(), Some(bytes.len()));
}

#[test]
fn test_scanner_back_to_back_frames() {
    let input = b"+OK\r\n*2\r\n:1\r\n:2\r\n$-1\r\n";
    let mut scanner = FrameScanner::new();

    assert_eq!(scanner.scan(input).unwrap(), Some(5));
    let rest = &input[5..];
    assert_eq!(scanner.scan(rest).unwrap(), Some(12));
    let rest = &rest[12..];
    assert_eq!(scanner.scan(rest).unwrap(), Some(5));
}

#[test]
fn test_scanner_reports_errors_before_frame_ends() {
    let mut scanner = FrameScanner::new();
    assert!(matches!(
        scanner.scan(b"*3\r\n:1\r\n?"),
        Err(RespError::UnknownType(b'?'))
    ));

    let mut scanner = FrameScanner::new();
    assert!(matches!(
        scanner.scan(b"*2\r\n+OK\n"),
        Err(RespError::MissingTerminator { offset: 7 })
    ));

    let mut scanner = FrameScanner::new();
    assert!(matches!(
        scanner.scan(b"$3\r\nabcd"),
        Err(RespError::MissingTerminator { offset: 7 })
    ));
}

#[test]
fn test_scanner_nesting_limit() {
    let open = b"*1\r\n".repeat(MAX_DEPTH);

    let mut scanner = FrameScanner::new();
    assert_eq!(scanner.scan(&open).unwrap(), None);

    let mut deeper = open.clone();
    deeper.extend_from_slice(b"*1\r\n");
    assert!(matches!(
        scanner.scan(&deeper),
        Err(RespError::NestingTooDeep(_))
    ));

    let mut complete = open;
    complete.extend_from_slice(b":1\r\n");
    let mut scanner = FrameScanner::new();
    assert_eq!(scanner.scan(&complete).unwrap(), Some(complete.len()));
}
