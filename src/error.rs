//! Error types for atlasresp
//!
//! Provides a unified error type for all operations, grouped by where the
//! failure was detected: the frame decoder, the command layer's shape checks,
//! the server itself, or the transport underneath.

use thiserror::Error;

/// Result type alias using RespError
pub type Result<T> = std::result::Result<T, RespError>;

/// Unified error type for atlasresp operations
#[derive(Debug, Error)]
pub enum RespError {
    // -------------------------------------------------------------------------
    // Malformed Frame Errors
    // -------------------------------------------------------------------------
    #[error("Malformed frame: no type byte available")]
    EmptyFrame,

    #[error("Malformed frame: unknown type byte 0x{0:02x}")]
    UnknownType(u8),

    #[error("Malformed frame: missing CRLF terminator at offset {offset}")]
    MissingTerminator { offset: usize },

    /// The buffer ended inside a frame. Both fields are absolute buffer
    /// lengths: `needed` is the smallest length that could get past the
    /// current item, `available` is the length actually held.
    #[error("Malformed frame: truncated (needed {needed} bytes, {available} available)")]
    Truncated { needed: usize, available: usize },

    #[error("Malformed frame: invalid integer {0:?}")]
    InvalidInteger(String),

    #[error("Malformed frame: invalid UTF-8 in string body")]
    InvalidUtf8,

    #[error("Malformed frame: {0} trailing bytes after complete frame")]
    TrailingBytes(usize),

    #[error("Malformed frame: arrays nested deeper than {0} levels")]
    NestingTooDeep(usize),

    // -------------------------------------------------------------------------
    // Protocol / Driver Errors
    // -------------------------------------------------------------------------
    #[error("Unexpected response to {command}: expected {expected}, got {found}")]
    UnexpectedResponse {
        command: String,
        expected: &'static str,
        found: String,
    },

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed by server")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RespError {
    /// True for every error raised while parsing a frame
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            RespError::EmptyFrame
                | RespError::UnknownType(_)
                | RespError::MissingTerminator { .. }
                | RespError::Truncated { .. }
                | RespError::InvalidInteger(_)
                | RespError::InvalidUtf8
                | RespError::TrailingBytes(_)
                | RespError::NestingTooDeep(_)
        )
    }

    /// True when the buffer ended before the frame did.
    ///
    /// An empty buffer counts too: a reader that has nothing yet is simply
    /// waiting for more bytes.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, RespError::Truncated { .. } | RespError::EmptyFrame)
    }

    /// True when Redis itself rejected the command
    pub fn is_server(&self) -> bool {
        matches!(self, RespError::Server(_))
    }
}

impl From<std::str::Utf8Error> for RespError {
    fn from(_err: std::str::Utf8Error) -> Self {
        RespError::InvalidUtf8
    }
}
