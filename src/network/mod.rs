//! Network Module
//!
//! Byte transports between the client and a Redis server.
//!
//! ## Model
//! - One connection, one outstanding request
//! - The transport reassembles partial reads into whole frames
//! - No retry, reconnect or pooling; callers own those policies

mod transport;

pub use transport::{TcpTransport, Transport};
