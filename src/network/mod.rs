//! A network abstraction layer for embedded systems
//!
//! The traits in this module describe the byte-stream transport the MQTT
//! session runs over. Any socket implementation can be plugged in: an
//! embedded TCP stack, a TLS stream, or (with the `std` feature)
//! [`tcp::TcpConnector`].
//!
//! A [`Connect`] implementation opens [`Connection`]s, and a connection is
//! anything that can [`Read`], [`Write`] and [`Close`].

#![deny(unsafe_code)]

use core::time::Duration;

/// Common error types for network operations
pub mod error;

/// Application layer protocol codecs
pub mod application;

/// Polled client session built on the transport traits
pub mod client;

/// TCP transport for hosted targets
#[cfg(feature = "std")]
pub mod tcp;

pub use error::TransportError;

/// Re-exports of common traits
pub mod prelude {
    pub use super::error::TransportError;
    pub use super::{Close, Connect, Connection, Read, Write};
}

/// Receiving half of a connection.
pub trait Read {
    /// Associated error type
    type Error: TransportError;

    /// Read data from the connection, waiting at most `timeout` for it.
    ///
    /// Returns the number of bytes placed in `buf`. When nothing arrives in
    /// time the error must classify as
    /// [`Error::Timeout`](error::Error::Timeout); a peer that closed the
    /// stream should be reported as
    /// [`Error::ConnectionClosed`](error::Error::ConnectionClosed).
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error>;
}

/// Sending half of a connection.
pub trait Write {
    /// Associated error type
    type Error: TransportError;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Orderly shutdown of a connection.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    ///
    /// Unresolvable hosts should classify as
    /// [`Error::InvalidAddress`](error::Error::InvalidAddress), failed
    /// handshakes as [`Error::ConnectionRefused`](error::Error::ConnectionRefused).
    type Error: TransportError;
    /// Resolve `host` and open a connection to it on `port`.
    fn connect(&mut self, host: &str, port: u16) -> Result<Self::Connection, Self::Error>;
}
