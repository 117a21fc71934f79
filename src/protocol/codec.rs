//! Protocol codec
//!
//! Encoding and decoding functions for RESP frames.
//!
//! ## Wire Format
//!
//! ```text
//! :<i64>\r\n                      integer
//! +<text>\r\n                     simple string
//! -<text>\r\n                     error
//! $<len>\r\n<len bytes>\r\n       bulk string   ($-1\r\n = null)
//! *<count>\r\n<count frames>      array         (*-1\r\n = null)
//! ```
//!
//! The decoder walks a borrowed buffer with an explicit cursor. It never
//! reads past a declared length or count and never backtracks. A buffer that
//! simply ends too early yields [`RespError::Truncated`], which is kept
//! distinct from a frame whose terminator is wrong
//! ([`RespError::MissingTerminator`]) so a streaming reader can tell "wait
//! for more bytes" apart from "this frame is broken".

use bytes::{BufMut, Bytes, BytesMut};

use super::Value;
use crate::error::{RespError, Result};

/// Line terminator after every scalar and every length/count prefix
pub const CRLF: &[u8] = b"\r\n";

/// Maximum array nesting accepted by the decoder
pub const MAX_DEPTH: usize = 512;

/// Maximum bulk string length (512 MB, matching Redis' proto-max-bulk-len)
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

// =============================================================================
// Type Tags
// =============================================================================

const TAG_INTEGER: u8 = b':';
const TAG_SIMPLE: u8 = b'+';
const TAG_ERROR: u8 = b'-';
const TAG_BULK: u8 = b'$';
const TAG_ARRAY: u8 = b'*';

// =============================================================================
// Encoding
// =============================================================================

/// Encode a value to bytes
pub fn encode(value: &Value) -> Bytes {
    let mut buf = BytesMut::new();
    encode_into(value, &mut buf);
    buf.freeze()
}

/// Encode a value into an existing buffer
///
/// Length and count prefixes are always taken from the payload being
/// written, so they cannot drift from it.
pub fn encode_into(value: &Value, buf: &mut BytesMut) {
    match value {
        Value::Integer(n) => {
            buf.put_u8(TAG_INTEGER);
            buf.extend_from_slice(n.to_string().as_bytes());
            buf.extend_from_slice(CRLF);
        }
        Value::SimpleString(s) => {
            buf.put_u8(TAG_SIMPLE);
            buf.extend_from_slice(s.as_bytes());
            buf.extend_from_slice(CRLF);
        }
        Value::Error(s) => {
            buf.put_u8(TAG_ERROR);
            buf.extend_from_slice(s.as_bytes());
            buf.extend_from_slice(CRLF);
        }
        Value::BulkString(s) => {
            let payload = s.as_bytes();
            buf.reserve(payload.len() + 16);
            buf.put_u8(TAG_BULK);
            buf.extend_from_slice(payload.len().to_string().as_bytes());
            buf.extend_from_slice(CRLF);
            buf.extend_from_slice(payload);
            buf.extend_from_slice(CRLF);
        }
        Value::Array(items) => {
            buf.put_u8(TAG_ARRAY);
            buf.extend_from_slice(items.len().to_string().as_bytes());
            buf.extend_from_slice(CRLF);
            for item in items {
                encode_into(item, buf);
            }
        }
        Value::Null => {
            buf.extend_from_slice(b"$-1\r\n");
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a buffer holding exactly one complete frame
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let (value, consumed) = decode_frame(bytes)?;
    if consumed != bytes.len() {
        return Err(RespError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(value)
}

/// Decode the first frame in a buffer
///
/// Returns the value and the number of bytes it occupied. Bytes after the
/// frame are left untouched.
pub fn decode_frame(bytes: &[u8]) -> Result<(Value, usize)> {
    let mut decoder = Decoder::new(bytes);
    let value = decoder.parse_value(0)?;
    Ok((value, decoder.pos))
}

/// Read cursor over a single response buffer
struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Parse one value at the cursor, recursing into arrays
    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        let tag = self.next_tag()?;

        match tag {
            TAG_INTEGER => Ok(Value::Integer(self.read_integer()?)),
            TAG_SIMPLE => {
                let line = self.read_line()?;
                Ok(Value::SimpleString(std::str::from_utf8(line)?.to_string()))
            }
            TAG_ERROR => {
                // Surfaced as a value; the command layer decides whether to raise it
                let line = self.read_line()?;
                Ok(Value::Error(std::str::from_utf8(line)?.to_string()))
            }
            TAG_BULK => self.read_bulk(),
            TAG_ARRAY => self.read_array(depth),
            other => Err(RespError::UnknownType(other)),
        }
    }

    fn next_tag(&mut self) -> Result<u8> {
        if self.input.is_empty() {
            return Err(RespError::EmptyFrame);
        }
        match self.input.get(self.pos) {
            Some(&tag) => {
                self.pos += 1;
                Ok(tag)
            }
            None => Err(RespError::Truncated {
                needed: self.pos + 1,
                available: self.input.len(),
            }),
        }
    }

    /// Consume bytes up to and including the next CRLF
    ///
    /// A bare `\n`, or a `\r` followed by anything but `\n`, is a missing
    /// terminator. Running out of input first is a truncation.
    fn read_line(&mut self) -> Result<&'a [u8]> {
        let input = self.input;
        let start = self.pos;

        let end = input[start..]
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
            .map(|i| start + i)
            .ok_or(RespError::Truncated {
                needed: input.len() + CRLF.len(),
                available: input.len(),
            })?;

        if input[end] == b'\n' {
            return Err(RespError::MissingTerminator { offset: end });
        }
        match input.get(end + 1) {
            Some(b'\n') => {}
            Some(_) => return Err(RespError::MissingTerminator { offset: end }),
            None => {
                return Err(RespError::Truncated {
                    needed: end + CRLF.len(),
                    available: input.len(),
                })
            }
        }

        self.pos = end + CRLF.len();
        Ok(&input[start..end])
    }

    /// Integer line shared by `:`, `$` and `*`
    fn read_integer(&mut self) -> Result<i64> {
        let line = self.read_line()?;
        parse_integer(line)
    }

    fn read_bulk(&mut self) -> Result<Value> {
        match self.bulk_body()? {
            Some(body) => Ok(Value::BulkString(std::str::from_utf8(body)?.to_string())),
            None => Ok(Value::Null),
        }
    }

    /// Length line, body and trailing CRLF of a bulk string; `None` for null
    fn bulk_body(&mut self) -> Result<Option<&'a [u8]>> {
        let length = self.read_integer()?;
        if length < 0 {
            return Ok(None);
        }
        if length > MAX_BULK_LEN {
            return Err(RespError::InvalidInteger(format!(
                "bulk length {} exceeds {}",
                length, MAX_BULK_LEN
            )));
        }

        let length = length as usize;
        if self.remaining() < length {
            return Err(RespError::Truncated {
                needed: self.pos + length + CRLF.len(),
                available: self.input.len(),
            });
        }

        let body = &self.input[self.pos..self.pos + length];
        self.pos += length;
        self.expect_crlf()?;

        Ok(Some(body))
    }

    /// Validate the framing of one item without building it
    ///
    /// Returns the child count when the item opens a non-null array; the
    /// children themselves are left at the cursor.
    fn skip_item(&mut self) -> Result<Option<usize>> {
        match self.next_tag()? {
            TAG_INTEGER => {
                self.read_integer()?;
                Ok(None)
            }
            TAG_SIMPLE | TAG_ERROR => {
                self.read_line()?;
                Ok(None)
            }
            TAG_BULK => {
                self.bulk_body()?;
                Ok(None)
            }
            TAG_ARRAY => {
                let count = self.read_integer()?;
                if count < 0 {
                    return Ok(None);
                }
                usize::try_from(count)
                    .map(Some)
                    .map_err(|_| RespError::InvalidInteger(count.to_string()))
            }
            other => Err(RespError::UnknownType(other)),
        }
    }

    fn read_array(&mut self, depth: usize) -> Result<Value> {
        let count = self.read_integer()?;
        if count < 0 {
            return Ok(Value::Null);
        }
        if depth >= MAX_DEPTH {
            return Err(RespError::NestingTooDeep(MAX_DEPTH));
        }

        // Every frame is at least 3 bytes, which bounds a hostile count
        let count = usize::try_from(count)
            .map_err(|_| RespError::InvalidInteger(count.to_string()))?;
        let mut items = Vec::with_capacity(count.min(self.remaining() / 3));

        for _ in 0..count {
            items.push(self.parse_value(depth + 1)?);
        }

        Ok(Value::Array(items))
    }

    /// Require CRLF exactly at the cursor (after a bulk body)
    fn expect_crlf(&mut self) -> Result<()> {
        let rest = &self.input[self.pos..];

        if rest.first().is_some_and(|&b| b != b'\r') {
            return Err(RespError::MissingTerminator { offset: self.pos });
        }
        if rest.len() < CRLF.len() {
            return Err(RespError::Truncated {
                needed: self.pos + CRLF.len(),
                available: self.input.len(),
            });
        }
        if rest[1] != b'\n' {
            return Err(RespError::MissingTerminator { offset: self.pos + 1 });
        }

        self.pos += CRLF.len();
        Ok(())
    }
}

// =============================================================================
// Framing
// =============================================================================

/// Finds where the first frame in a growing buffer ends
///
/// Checks tags, integer lines, bulk lengths, terminators, array counts and
/// nesting depth, but builds no values and does not look at string
/// contents. Progress is kept between calls: each call resumes at the first
/// item not yet confirmed complete, so bytes already walked are not walked
/// again as the buffer grows.
///
/// The buffer passed to successive calls must keep its already-scanned
/// prefix unchanged.
#[derive(Debug, Default)]
pub struct FrameScanner {
    /// Start of the first unconfirmed item
    pos: usize,

    /// Children still expected by each open array, outermost first
    pending: Vec<usize>,
}

impl FrameScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes confirmed as complete items so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Forget all progress
    pub fn reset(&mut self) {
        self.pos = 0;
        self.pending.clear();
    }

    /// Scan `buf` for the end of its first frame
    ///
    /// Returns `Ok(Some(len))` once `buf[..len]` is one complete frame, and
    /// resets for the next frame. Returns `Ok(None)` while more bytes are
    /// needed. Framing errors are returned as soon as they are visible.
    pub fn scan(&mut self, buf: &[u8]) -> Result<Option<usize>> {
        let mut decoder = Decoder {
            input: buf,
            pos: self.pos,
        };

        loop {
            if decoder.pos >= buf.len() {
                return Ok(None);
            }

            let start = decoder.pos;
            match decoder.skip_item() {
                Ok(Some(count)) => {
                    if self.pending.len() >= MAX_DEPTH {
                        return Err(RespError::NestingTooDeep(MAX_DEPTH));
                    }
                    self.pos = decoder.pos;
                    if count > 0 {
                        self.pending.push(count);
                        continue;
                    }
                }
                Ok(None) => self.pos = decoder.pos,
                Err(e) if e.is_incomplete() => {
                    self.pos = start;
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }

            // One item finished; close every array it completes
            loop {
                match self.pending.last_mut() {
                    None => {
                        let len = self.pos;
                        self.reset();
                        return Ok(Some(len));
                    }
                    Some(remaining) => {
                        *remaining -= 1;
                        if *remaining > 0 {
                            break;
                        }
                        self.pending.pop();
                    }
                }
            }
        }
    }
}

/// Parse an ASCII decimal with an optional leading minus
///
/// Accumulates `value * 10 + digit` per byte, with overflow checks. Negative
/// numbers accumulate downwards so `i64::MIN` is representable.
fn parse_integer(text: &[u8]) -> Result<i64> {
    let invalid = || RespError::InvalidInteger(String::from_utf8_lossy(text).into_owned());

    let (negative, digits) = match text.split_first() {
        Some((&b'-', rest)) => (true, rest),
        _ => (false, text),
    };
    if digits.is_empty() {
        return Err(invalid());
    }

    let mut value: i64 = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return Err(invalid());
        }
        let digit = i64::from(byte - b'0');
        value = value.checked_mul(10).ok_or_else(invalid)?;
        value = if negative {
            value.checked_sub(digit)
        } else {
            value.checked_add(digit)
        }
        .ok_or_else(invalid)?;
    }

    Ok(value)
}
