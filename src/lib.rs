//! # atlasresp
//!
//! A synchronous Redis client built on a strict RESP codec:
//! - Closed `Value` model for every RESP2 frame kind
//! - Length-checked, terminator-checked recursive decoder
//! - Typed key-value and TTL commands with distinct server/driver errors
//! - Pluggable byte transport, blocking TCP by default
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │        (set / get / del / keys / expire / ttl / ...)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command → Value
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Protocol Codec                           │
//! │              (encode / decode RESP frames)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Transport                              │
//! │             (TcpTransport or any byte pipe)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use atlasresp::{Client, Config, Expiry};
//!
//! # fn main() -> atlasresp::Result<()> {
//! let config = Config::builder().server_addr("127.0.0.1:6379").build()?;
//! let mut client = Client::connect(&config)?;
//!
//! client.set("session", "tok3n")?;
//! client.expire_after("session", Expiry::Minutes(30))?;
//! println!("{}", client.get("session")?);
//!
//! client.quit()
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RespError, Result};
pub use config::Config;
pub use client::{Client, Expiry};
pub use protocol::{Command, Value};
pub use network::{TcpTransport, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of atlasresp
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
