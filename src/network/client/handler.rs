use super::Peer;

/// Receives session events.
///
/// Every method has an empty default, so implementors only write the
/// callbacks they care about. The session calls them synchronously from
/// [`poll`](super::Session::poll), [`connect`](super::Session::connect),
/// [`disconnect`](super::Session::disconnect) and the I/O methods.
///
/// Received bytes are passed through untouched; decoding them with
/// [`mqtt`](crate::network::application::mqtt) is up to the handler.
///
/// # Examples
///
/// ```rust
/// use libmqtt::network::application::mqtt::decode_connack;
/// use libmqtt::network::client::{Handler, Peer};
///
/// #[derive(Default)]
/// struct Broker {
///     accepted: bool,
/// }
///
/// impl Handler for Broker {
///     fn on_data(&mut self, _peer: &Peer, data: &[u8]) {
///         if decode_connack(data).is_ok() {
///             self.accepted = true;
///         }
///     }
/// }
/// ```
pub trait Handler {
    /// A connection to `peer` was established.
    fn on_connect(&mut self, peer: &Peer) {
        let _ = peer;
    }

    /// The session entered the disconnected state.
    ///
    /// Fired on every disconnect, including failed connection attempts and
    /// repeated calls to [`disconnect`](super::Session::disconnect).
    fn on_disconnect(&mut self, peer: &Peer) {
        let _ = peer;
    }

    /// `data` was received from `peer`.
    fn on_data(&mut self, peer: &Peer, data: &[u8]) {
        let _ = (peer, data);
    }
}

impl Handler for () {}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_connect(&mut self, peer: &Peer) {
        (**self).on_connect(peer)
    }

    fn on_disconnect(&mut self, peer: &Peer) {
        (**self).on_disconnect(peer)
    }

    fn on_data(&mut self, peer: &Peer, data: &[u8]) {
        (**self).on_data(peer, data)
    }
}

/// Function signature for connect callbacks.
pub type OnConnectFn = fn(&Peer);

/// Function signature for disconnect callbacks.
pub type OnDisconnectFn = fn(&Peer);

/// Function signature for data callbacks.
pub type OnDataFn = fn(&Peer, &[u8]);

/// A callback together with the event it is registered for.
#[derive(Debug, Clone, Copy)]
pub enum Callback {
    /// See [`Handler::on_connect`].
    OnConnect(OnConnectFn),
    /// See [`Handler::on_disconnect`].
    OnDisconnect(OnDisconnectFn),
    /// See [`Handler::on_data`].
    OnData(OnDataFn),
}

/// A [`Handler`] made of three independently settable function slots.
///
/// Empty slots do nothing. This is the handler a new
/// [`Session`](super::Session) starts with.
///
/// ```rust
/// use libmqtt::network::client::{Callback, Callbacks, Handler, Peer};
///
/// let mut callbacks = Callbacks::new();
/// callbacks.set(Callback::OnData(|peer, data| {
///     assert_eq!(peer.port(), 1883);
///     assert_eq!(data, b"hi");
/// }));
///
/// let peer = Peer::new("localhost", 1883).unwrap();
/// callbacks.on_data(&peer, b"hi");
/// callbacks.on_connect(&peer);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Callbacks {
    on_connect: Option<OnConnectFn>,
    on_disconnect: Option<OnDisconnectFn>,
    on_data: Option<OnDataFn>,
}

impl Callbacks {
    /// Creates a set of empty slots.
    pub const fn new() -> Self {
        Self {
            on_connect: None,
            on_disconnect: None,
            on_data: None,
        }
    }

    /// Stores `callback` in its slot, replacing any previous one.
    pub fn set(&mut self, callback: Callback) {
        match callback {
            Callback::OnConnect(f) => self.on_connect = Some(f),
            Callback::OnDisconnect(f) => self.on_disconnect = Some(f),
            Callback::OnData(f) => self.on_data = Some(f),
        }
    }
}

impl Handler for Callbacks {
    fn on_connect(&mut self, peer: &Peer) {
        if let Some(f) = self.on_connect {
            f(peer);
        }
    }

    fn on_disconnect(&mut self, peer: &Peer) {
        if let Some(f) = self.on_disconnect {
            f(peer);
        }
    }

    fn on_data(&mut self, peer: &Peer, data: &[u8]) {
        if let Some(f) = self.on_data {
            f(peer, data);
        }
    }
}
