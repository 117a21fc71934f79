//! Protocol Module
//!
//! Implements RESP (REdis Serialization Protocol) framing for requests and
//! responses.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬──────────────────────────┬──────────┐
//! │ Tag (1)  │  Line / length / count   │ CRLF (2) │  [+ body / children]
//! └──────────┴──────────────────────────┴──────────┘
//! ```
//!
//! ### Type Tags
//! - `:` integer
//! - `+` simple string
//! - `-` error
//! - `$` bulk string, `$-1\r\n` is null
//! - `*` array, `*-1\r\n` is null
//!
//! ### Requests
//! Always an array of bulk strings: `*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n`

mod codec;
mod command;
mod value;

pub use codec::{
    decode, decode_frame, encode, encode_into, FrameScanner, CRLF, MAX_BULK_LEN, MAX_DEPTH,
};
pub use command::Command;
pub use value::Value;
