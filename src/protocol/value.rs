//! Value definitions
//!
//! The closed set of RESP values exchanged with Redis. Requests are built
//! from these, responses are decoded into them.

use std::fmt;

use bytes::Bytes;

/// A single RESP value
///
/// Values form a tree: arrays own their children and nothing points back up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 64-bit integer (`:`)
    Integer(i64),

    /// Length-prefixed, binary-safe string (`$`)
    BulkString(String),

    /// CRLF-free status line such as `OK` (`+`)
    SimpleString(String),

    /// Ordered sequence of nested values (`*`)
    Array(Vec<Value>),

    /// Server-reported error line (`-`)
    Error(String),

    /// Redis nil (`$-1` / `*-1`)
    Null,
}

impl Value {
    /// Short, static name of the variant for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::BulkString(_) => "bulk string",
            Value::SimpleString(_) => "simple string",
            Value::Array(_) => "array",
            Value::Error(_) => "error",
            Value::Null => "null",
        }
    }

    /// Text of a bulk or simple string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::BulkString(s) | Value::SimpleString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Encode this value into RESP wire bytes
    pub fn to_bytes(&self) -> Bytes {
        super::codec::encode(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::BulkString(s) | Value::SimpleString(s) | Value::Error(s) => f.write_str(s),
            Value::Null => f.write_str("(nil)"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::BulkString(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::BulkString(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
