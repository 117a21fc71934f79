//! Transport
//!
//! The byte boundary underneath the command layer, plus a TCP implementation.

use std::io::{BufWriter, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::{Bytes, BytesMut};

use crate::config::Config;
use crate::error::{RespError, Result};
use crate::protocol::FrameScanner;

/// Moves raw request and response bytes
///
/// One exchange at a time: `send` a whole request, then `receive` the
/// whole response to it. Implementations own any reassembly of partial
/// reads; the bytes returned by `receive` must hold one complete frame.
pub trait Transport {
    /// Write a complete request
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read one complete response
    fn receive(&mut self) -> Result<Bytes>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).send(bytes)
    }

    fn receive(&mut self) -> Result<Bytes> {
        (**self).receive()
    }
}

/// Blocking TCP transport to a Redis server
pub struct TcpTransport {
    /// Read half, drained in chunks into `buffer`
    reader: TcpStream,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Bytes received but not yet returned as a frame
    buffer: BytesMut,

    /// Framing progress through `buffer`, kept across reads
    scanner: FrameScanner,

    /// Bytes requested per socket read
    chunk_size: usize,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpTransport {
    /// Connect to `config.server_addr`
    ///
    /// Tries every resolved address in order and returns the last
    /// connection error if none succeed.
    pub fn connect(config: &Config) -> Result<Self> {
        let addrs = config.server_addr.to_socket_addrs()?;

        let mut last_err = None;
        let mut connected = None;
        for addr in addrs {
            let attempt = if config.connect_timeout_ms > 0 {
                TcpStream::connect_timeout(&addr, Duration::from_millis(config.connect_timeout_ms))
            } else {
                TcpStream::connect(addr)
            };
            match attempt {
                Ok(stream) => {
                    connected = Some(stream);
                    break;
                }
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        let stream = match (connected, last_err) {
            (Some(stream), _) => stream,
            (None, Some(e)) => return Err(e.into()),
            (None, None) => {
                return Err(RespError::Config(format!(
                    "address {} did not resolve",
                    config.server_addr
                )))
            }
        };

        Self::from_stream(stream, config)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(config.nodelay)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: read_stream,
            writer: BufWriter::new(write_stream),
            buffer: BytesMut::with_capacity(config.read_chunk_size),
            scanner: FrameScanner::new(),
            chunk_size: config.read_chunk_size,
            peer_addr,
        })
    }

    /// Close both directions of the socket
    pub fn shutdown(&mut self) -> Result<()> {
        self.writer.flush()?;
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Pull one chunk from the socket into the buffer
    fn fill(&mut self) -> Result<()> {
        let start = self.buffer.len();
        self.buffer.resize(start + self.chunk_size, 0);

        let read = loop {
            match self.reader.read(&mut self.buffer[start..]) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match read {
            Ok(0) => {
                self.buffer.truncate(start);
                Err(RespError::ConnectionClosed)
            }
            Ok(n) => {
                self.buffer.truncate(start + n);
                Ok(())
            }
            Err(e) => {
                self.buffer.truncate(start);
                Err(e.into())
            }
        }
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Returns the raw bytes of one frame without building a `Value`.
    ///
    /// Each new chunk is scanned from where the previous scan stopped, so a
    /// reply spread over many reads is walked once in total.
    fn receive(&mut self) -> Result<Bytes> {
        loop {
            match self.scanner.scan(&self.buffer) {
                Ok(Some(len)) => {
                    tracing::trace!("Received {} byte frame from {}", len, self.peer_addr);
                    return Ok(self.buffer.split_to(len).freeze());
                }
                Ok(None) => self.fill()?,
                Err(e) => {
                    // The stream is unusable past a broken frame
                    self.buffer.clear();
                    self.scanner.reset();
                    return Err(e);
                }
            }
        }
    }
}
