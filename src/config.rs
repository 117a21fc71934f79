//! Configuration for atlasresp
//!
//! Centralized client configuration with sensible defaults.

use crate::error::{RespError, Result};

/// Main configuration for a client connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Redis server address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Buffer Configuration
    // -------------------------------------------------------------------------
    /// Bytes requested from the socket per read while assembling a response
    pub read_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:6379".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            nodelay: true,
            read_chunk_size: 4096,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.config.nodelay = enabled;
        self
    }

    /// Set the per-read chunk size (in bytes)
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size;
        self
    }

    pub fn build(self) -> Result<Config> {
        if self.config.server_addr.trim().is_empty() {
            return Err(RespError::Config("server address is empty".to_string()));
        }
        if self.config.read_chunk_size == 0 {
            return Err(RespError::Config(
                "read chunk size must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}
