//! Client Module
//!
//! Typed Redis commands over a [`Transport`].
//!
//! ## Request Flow
//! ```text
//!   typed call ──► Command ──► encode ──► Transport::send
//!                                              │
//!   typed result ◄── shape check ◄── decode ◄── Transport::receive
//! ```
//!
//! ## Error Classification
//! - `-ERR ...` replies become [`RespError::Server`] with the message verbatim
//! - Replies of the wrong shape become [`RespError::UnexpectedResponse`]
//! - Frame and transport failures pass through unchanged

mod expiry;

pub use expiry::Expiry;

use std::fmt;

use crate::config::Config;
use crate::error::{RespError, Result};
use crate::network::{TcpTransport, Transport};
use crate::protocol::{decode, encode, Command, Value};

/// A synchronous Redis client
///
/// Holds no cache: every call is one request/response round trip.
pub struct Client<T: Transport = TcpTransport> {
    transport: T,
}

impl Client<TcpTransport> {
    /// Open a TCP connection using `config`
    pub fn connect(config: &Config) -> Result<Self> {
        let transport = TcpTransport::connect(config)?;
        Ok(Self::new(transport))
    }

    /// Close the connection gracefully
    ///
    /// Sends `QUIT`, waits for the acknowledgement and shuts the socket
    /// down. Dropping the client without calling this closes the socket
    /// without telling the server.
    pub fn quit(mut self) -> Result<()> {
        let reply = self.call(Command::new("QUIT"))?;
        expect_ok("QUIT", reply)?;
        self.transport.shutdown()
    }
}

impl<T: Transport> Client<T> {
    /// Wrap an existing transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Give back the underlying transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    // =========================================================================
    // Raw Access
    // =========================================================================

    /// Send an arbitrary request and return the decoded reply as-is
    ///
    /// Error replies are returned as [`Value::Error`], not raised.
    pub fn send(&mut self, request: &Value) -> Result<Value> {
        let bytes = encode(request);
        self.transport.send(&bytes)?;
        let reply = self.transport.receive()?;
        let value = decode(&reply)?;
        tracing::trace!("Reply: {}", value.kind());
        Ok(value)
    }

    /// Send a command, raising error replies
    fn call(&mut self, command: Command) -> Result<Value> {
        tracing::debug!("{} ({} args)", command.name(), command.arg_count());
        match self.send(&command.into_value())? {
            Value::Error(message) => Err(RespError::Server(message)),
            value => Ok(value),
        }
    }

    // =========================================================================
    // Key-Value Commands
    // =========================================================================

    /// `SET key value`
    ///
    /// The value is stored as its display text.
    pub fn set(&mut self, key: &str, value: impl fmt::Display) -> Result<()> {
        let reply = self.call(Command::new("SET").arg(key).arg(value))?;
        expect_ok("SET", reply)
    }

    /// `GET key`; a missing key yields [`Value::Null`]
    pub fn get(&mut self, key: &str) -> Result<Value> {
        match self.call(Command::new("GET").arg(key))? {
            array @ Value::Array(_) => Err(unexpected("GET", "string or null", &array)),
            value => Ok(value),
        }
    }

    /// `MGET key [key ...]`; one value per key, in order
    pub fn get_many<I, S>(&mut self, keys: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = S>,
        S: fmt::Display,
    {
        match self.call(Command::new("MGET").args(keys))? {
            Value::Array(items) => Ok(items),
            other => Err(unexpected("MGET", "array", &other)),
        }
    }

    /// `DEL key [key ...]`; returns how many keys were removed
    pub fn delete<I, S>(&mut self, keys: I) -> Result<i64>
    where
        I: IntoIterator<Item = S>,
        S: fmt::Display,
    {
        expect_integer("DEL", self.call(Command::new("DEL").args(keys))?)
    }

    /// `KEYS pattern`
    ///
    /// `*` matches any run of characters, `?` exactly one. Elements that
    /// are not strings are dropped.
    pub fn list_keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        match self.call(Command::new("KEYS").arg(pattern))? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    Value::BulkString(s) | Value::SimpleString(s) => Some(s),
                    _ => None,
                })
                .collect()),
            other => Err(unexpected("KEYS", "array", &other)),
        }
    }

    // =========================================================================
    // TTL Commands
    // =========================================================================

    /// Expire `key` at an absolute Unix-epoch time
    ///
    /// Returns true iff the server applied the deadline.
    pub fn expire_at(&mut self, key: &str, at: Expiry) -> Result<bool> {
        let name = at.absolute_command();
        let reply = self.call(Command::new(name).arg(key).arg(at.wire_amount()))?;
        expect_flag(name, reply)
    }

    /// Expire `key` once `after` has elapsed
    ///
    /// Returns true iff the server applied the timeout.
    pub fn expire_after(&mut self, key: &str, after: Expiry) -> Result<bool> {
        let name = after.relative_command();
        let reply = self.call(Command::new(name).arg(key).arg(after.wire_amount()))?;
        expect_flag(name, reply)
    }

    /// Remaining time to live in seconds
    ///
    /// `-1` means the key has no expiry, `-2` means the key does not exist.
    pub fn ttl(&mut self, key: &str) -> Result<i64> {
        expect_integer("TTL", self.call(Command::new("TTL").arg(key))?)
    }

    /// Remaining time to live in milliseconds, with the same sentinels as [`Client::ttl`]
    pub fn pttl(&mut self, key: &str) -> Result<i64> {
        expect_integer("PTTL", self.call(Command::new("PTTL").arg(key))?)
    }

    /// `PERSIST key`: remove the expiry from `key`
    ///
    /// Returns true iff the reply is `:1`, meaning an expiry was removed.
    /// `:0` (the key does not exist or had no expiry) gives false. Nothing
    /// else is sent; the key's TTL is not read first.
    pub fn persist(&mut self, key: &str) -> Result<bool> {
        expect_flag("PERSIST", self.call(Command::new("PERSIST").arg(key))?)
    }

    // =========================================================================
    // Server Commands
    // =========================================================================

    /// Round-trip health check
    pub fn ping(&mut self) -> Result<()> {
        match self.call(Command::new("PING"))? {
            Value::SimpleString(s) if s == "PONG" => Ok(()),
            other => Err(unexpected("PING", "PONG", &other)),
        }
    }

    /// Remove every key from every database
    pub fn flush_all(&mut self) -> Result<()> {
        let reply = self.call(Command::new("FLUSHALL"))?;
        expect_ok("FLUSHALL", reply)
    }
}

// =============================================================================
// Reply Shape Checks
// =============================================================================

fn unexpected(command: &str, expected: &'static str, found: &Value) -> RespError {
    RespError::UnexpectedResponse {
        command: command.to_string(),
        expected,
        found: found.kind().to_string(),
    }
}

fn expect_ok(command: &str, reply: Value) -> Result<()> {
    match reply {
        Value::SimpleString(s) if s == "OK" => Ok(()),
        Value::SimpleString(s) => Err(RespError::UnexpectedResponse {
            command: command.to_string(),
            expected: "OK",
            found: s,
        }),
        other => Err(unexpected(command, "OK", &other)),
    }
}

fn expect_integer(command: &str, reply: Value) -> Result<i64> {
    match reply {
        Value::Integer(n) => Ok(n),
        other => Err(unexpected(command, "integer", &other)),
    }
}

/// `:1` is success, any other integer is a refusal
fn expect_flag(command: &str, reply: Value) -> Result<bool> {
    expect_integer(command, reply).map(|n| n == 1)
}
