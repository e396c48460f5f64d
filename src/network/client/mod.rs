//! Polled MQTT client session.
//!
//! A [`Session`] owns one connection to a broker and moves it through a small
//! state machine every time [`Session::poll`] is called:
//!
//! ```text
//!              first poll               cooldown elapsed, connect ok
//!  Created ───────────────▶ Disconnected ──────────────────────────▶ Connected
//!                               ▲  │  connect failed                     │
//!                               │  └──────────┐                          │
//!                               │             ▼                          │
//!                               └──── on_disconnect ◀── read/send error ─┘
//! ```
//!
//! While connected, each poll performs one bounded receive and hands the
//! bytes to the session's [`Handler`]. Nothing is parsed automatically; the
//! handler (or the code driving the session) uses the
//! [`mqtt`](crate::network::application::mqtt) codec for that.
//!
//! # Example
//!
//! ```rust
//! use core::time::Duration;
//! use libmqtt::network::client::{Clock, ConnectionState, Session};
//! use libmqtt::network::error::Error;
//! use libmqtt::network::{Close, Connect, Connection, Read, Write};
//!
//! struct Loopback;
//!
//! impl Read for Loopback {
//!     type Error = Error;
//!     fn read(&mut self, _buf: &mut [u8], _timeout: Duration) -> Result<usize, Error> {
//!         Err(Error::Timeout)
//!     }
//! }
//!
//! impl Write for Loopback {
//!     type Error = Error;
//!     fn write(&mut self, buf: &[u8]) -> Result<usize, Error> { Ok(buf.len()) }
//!     fn flush(&mut self) -> Result<(), Error> { Ok(()) }
//! }
//!
//! impl Close for Loopback {
//!     type Error = Error;
//!     fn close(self) -> Result<(), Error> { Ok(()) }
//! }
//!
//! impl Connection for Loopback {}
//!
//! struct Network;
//!
//! impl Connect for Network {
//!     type Connection = Loopback;
//!     type Error = Error;
//!     fn connect(&mut self, _host: &str, _port: u16) -> Result<Loopback, Error> {
//!         Ok(Loopback)
//!     }
//! }
//!
//! struct Uptime(core::cell::Cell<Duration>);
//!
//! impl Clock for Uptime {
//!     fn now(&self) -> Duration {
//!         let now = self.0.get() + Duration::from_secs(1);
//!         self.0.set(now);
//!         now
//!     }
//! }
//!
//! let clock = Uptime(core::cell::Cell::new(Duration::ZERO));
//! let mut session = Session::new(Network, clock, "broker.local", 1883).unwrap();
//! assert_eq!(session.state(), ConnectionState::Created);
//!
//! session.poll(Duration::from_millis(10));
//! assert_eq!(session.state(), ConnectionState::Disconnected);
//!
//! session.poll(Duration::from_millis(10));
//! assert_eq!(session.state(), ConnectionState::Connected);
//! ```

use core::time::Duration;
use heapless::String;

use crate::network::error::Error;

mod clock;
mod handler;
mod session;

#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use clock::Clock;
pub use handler::{Callback, Callbacks, Handler, OnConnectFn, OnDataFn, OnDisconnectFn};
pub use session::Session;

/// Longest host name a session accepts, in bytes.
pub const MAX_HOST_LEN: usize = 32;

/// Receive buffer capacity of a session created with [`Session::new`].
pub const DEFAULT_RX_BUFFER_SIZE: usize = 1024;

/// Connection state of a [`Session`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConnectionState {
    /// Freshly initialised; left on the first poll.
    Created,
    /// A connection is open.
    Connected,
    /// No connection; the next poll after the cooldown reconnects.
    Disconnected,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConnectionState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConnectionState::Created => defmt::write!(f, "Created"),
            ConnectionState::Connected => defmt::write!(f, "Connected"),
            ConnectionState::Disconnected => defmt::write!(f, "Disconnected"),
        }
    }
}

/// Address of the broker a session connects to.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Peer {
    host: String<MAX_HOST_LEN>,
    port: u16,
}

impl Peer {
    /// Creates a peer address.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if `host` is empty or longer than
    /// [`MAX_HOST_LEN`] bytes.
    pub fn new(host: &str, port: u16) -> Result<Self, Error> {
        if host.is_empty() {
            return Err(Error::InvalidAddress);
        }
        let host = String::try_from(host).map_err(|_| Error::InvalidAddress)?;
        Ok(Self { host, port })
    }

    /// Host name or address literal, passed through to the connector as is.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Timing configuration of a [`Session`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config {
    /// Minimum time between the last activity and a reconnect attempt.
    pub reconnect_cooldown: Duration,
    /// Receive timeouts shorter than this are raised to it, so a zero
    /// timeout never turns the poll loop into a busy loop.
    pub min_receive_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reconnect_cooldown: Duration::from_secs(1),
            min_receive_timeout: Duration::from_micros(10),
        }
    }
}
