use core::time::Duration;

use super::{
    Callback, Callbacks, Clock, Config, ConnectionState, DEFAULT_RX_BUFFER_SIZE, Handler, Peer,
};
use crate::network::error::{Error, TransportError};
use crate::network::{Close, Connect, Read, Write};

/// A single client session driven by [`poll`](Session::poll).
///
/// # Type Parameters
///
/// * `N` - the [`Connect`] implementation used to open connections
/// * `K` - the [`Clock`] used for `last_active` and the reconnect cooldown
/// * `H` - the [`Handler`] receiving events, [`Callbacks`] by default
/// * `RX` - receive buffer capacity in bytes
///
/// The session owns all of its state, including the receive buffer. To keep
/// a handler outside the session, pass `&mut handler` as `H`.
pub struct Session<N, K, H = Callbacks, const RX: usize = DEFAULT_RX_BUFFER_SIZE>
where
    N: Connect,
{
    connector: N,
    connection: Option<N::Connection>,
    clock: K,
    handler: H,
    config: Config,
    peer: Peer,
    state: ConnectionState,
    last_active: Duration,
    rx_buf: [u8; RX],
    rx_len: usize,
}

impl<N: Connect, K: Clock> Session<N, K> {
    /// Initialises a session for `host:port` with a
    /// [`DEFAULT_RX_BUFFER_SIZE`] byte receive buffer and empty callbacks.
    ///
    /// No connection is opened until the session is polled.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if the host name is empty or too long.
    pub fn new(connector: N, clock: K, host: &str, port: u16) -> Result<Self, Error> {
        Self::with_buffer(connector, clock, host, port)
    }
}

impl<N: Connect, K: Clock, const RX: usize> Session<N, K, Callbacks, RX> {
    /// Like [`Session::new`], with an `RX` byte receive buffer.
    ///
    /// ```rust,ignore
    /// let session = Session::<_, _, Callbacks, 256>::with_buffer(net, clock, "broker", 1883)?;
    /// ```
    pub fn with_buffer(connector: N, clock: K, host: &str, port: u16) -> Result<Self, Error> {
        let peer = Peer::new(host, port)?;
        let last_active = clock.now();
        Ok(Self {
            connector,
            connection: None,
            clock,
            handler: Callbacks::new(),
            config: Config::default(),
            peer,
            state: ConnectionState::Created,
            last_active,
            rx_buf: [0; RX],
            rx_len: 0,
        })
    }

    /// Registers a callback in its slot, replacing the previous one.
    pub fn set_callback(&mut self, callback: Callback) {
        self.handler.set(callback);
    }
}

impl<N, K, H, const RX: usize> Session<N, K, H, RX>
where
    N: Connect,
    K: Clock,
    H: Handler,
{
    /// Replaces the handler, keeping all other state.
    pub fn with_handler<G: Handler>(self, handler: G) -> Session<N, K, G, RX> {
        Session {
            connector: self.connector,
            connection: self.connection,
            clock: self.clock,
            handler,
            config: self.config,
            peer: self.peer,
            state: self.state,
            last_active: self.last_active,
            rx_buf: self.rx_buf,
            rx_len: self.rx_len,
        }
    }

    /// Replaces the timing configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The broker this session connects to.
    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    /// Timestamp of the last send, successful receive or state change.
    pub fn last_active(&self) -> Duration {
        self.last_active
    }

    /// Timing configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The event handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The event handler, mutably.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Bytes delivered by the most recent successful receive.
    pub fn received(&self) -> &[u8] {
        &self.rx_buf[..self.rx_len]
    }

    /// Receive buffer capacity in bytes.
    pub const fn capacity(&self) -> usize {
        RX
    }

    /// Advances the state machine by one step.
    ///
    /// * `Created`: moves to `Disconnected`.
    /// * `Disconnected`: reconnects once [`Config::reconnect_cooldown`] has
    ///   passed since [`last_active`](Self::last_active).
    /// * `Connected`: receives for at most `timeout`, see
    ///   [`receive`](Self::receive).
    ///
    /// Failures are handled inside: they end in the disconnected state and a
    /// later poll reconnects.
    pub fn poll(&mut self, timeout: Duration) {
        match self.state {
            ConnectionState::Created => self.change_state(ConnectionState::Disconnected),
            ConnectionState::Connected => {
                let _ = self.receive(timeout);
            }
            ConnectionState::Disconnected => {
                let idle = self.clock.now().saturating_sub(self.last_active);
                if idle >= self.config.reconnect_cooldown {
                    let _ = self.connect();
                }
            }
        }
    }

    /// Opens a new connection to the peer.
    ///
    /// An existing connection is closed first, without a disconnect event.
    /// On success the session is `Connected` and `on_connect` fires. On
    /// failure the session goes through [`disconnect`](Self::disconnect), so
    /// `on_disconnect` fires even though no connection existed.
    pub fn connect(&mut self) -> Result<(), Error> {
        if let Some(previous) = self.connection.take() {
            close(previous);
        }

        debug!("connecting to {}:{}", self.peer.host(), self.peer.port());
        match self.connector.connect(self.peer.host(), self.peer.port()) {
            Ok(connection) => {
                self.connection = Some(connection);
                self.change_state(ConnectionState::Connected);
                self.handler.on_connect(&self.peer);
                Ok(())
            }
            Err(err) => {
                let kind = err.kind();
                warn!(
                    "connect to {}:{} failed: {:?}",
                    self.peer.host(),
                    self.peer.port(),
                    kind
                );
                self.disconnect();
                Err(kind)
            }
        }
    }

    /// Closes the connection, if any, and enters `Disconnected`.
    ///
    /// Safe to call in any state and any number of times; `on_disconnect`
    /// fires on every call.
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            close(connection);
        }
        self.change_state(ConnectionState::Disconnected);
        self.handler.on_disconnect(&self.peer);
    }

    /// Writes `bytes` to the connection and flushes it.
    ///
    /// Allowed in any state. Without an open connection this fails with
    /// [`Error::NotOpen`]. Any failure disconnects the session.
    ///
    /// The returned count comes from a single write; a short write is not
    /// retried.
    pub fn send(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.last_active = self.clock.now();
        trace!("sending {} bytes", bytes.len());

        let result = match self.connection.as_mut() {
            Some(connection) => transmit(connection, bytes),
            None => Err(Error::NotOpen),
        };
        if let Err(kind) = result {
            warn!("send failed: {:?}", kind);
            self.disconnect();
        }
        result
    }

    /// Receives once, waiting at most `timeout`.
    ///
    /// The timeout is raised to [`Config::min_receive_timeout`] if shorter.
    /// On success the bytes go to `on_data` and are available from
    /// [`received`](Self::received).
    ///
    /// # Errors
    ///
    /// * [`Error::Timeout`] - nothing arrived; the session stays connected
    /// * [`Error::NotOpen`] - there is no connection; nothing changes
    /// * anything else - the connection failed and the session disconnected
    pub fn receive(&mut self, timeout: Duration) -> Result<usize, Error> {
        let timeout = timeout.max(self.config.min_receive_timeout);
        let connection = self.connection.as_mut().ok_or(Error::NotOpen)?;

        match connection.read(&mut self.rx_buf, timeout) {
            Ok(len) => {
                let len = len.min(RX);
                trace!("received {} bytes", len);
                self.rx_len = len;
                self.handler.on_data(&self.peer, &self.rx_buf[..len]);
                self.last_active = self.clock.now();
                Ok(len)
            }
            Err(err) => match err.kind() {
                Error::Timeout => Err(Error::Timeout),
                kind => {
                    warn!("receive failed: {:?}", kind);
                    self.disconnect();
                    Err(kind)
                }
            },
        }
    }

    fn change_state(&mut self, state: ConnectionState) {
        debug!("state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.last_active = self.clock.now();
    }
}

impl<N, K, H, const RX: usize> core::fmt::Debug for Session<N, K, H, RX>
where
    N: Connect,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("peer", &self.peer)
            .field("state", &self.state)
            .field("last_active", &self.last_active)
            .field("connected", &self.connection.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn transmit<C: Write>(connection: &mut C, bytes: &[u8]) -> Result<usize, Error> {
    let written = connection.write(bytes).map_err(|err| err.kind())?;
    connection.flush().map_err(|err| err.kind())?;
    Ok(written)
}

fn close<C: Close>(connection: C) {
    if connection.close().is_err() {
        debug!("close failed");
    }
}
