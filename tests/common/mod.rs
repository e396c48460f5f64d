#![allow(dead_code)]

use libmqtt::network::client::{Clock, Handler, Peer};
use libmqtt::network::error::Error;
use libmqtt::network::*;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// What a scripted read returns.
#[derive(Debug, Clone)]
pub enum Reply {
    Data(Vec<u8>),
    Fail(Error),
}

/// State shared between a test and the connections it hands to a session.
#[derive(Debug, Default)]
pub struct Wire {
    pub replies: VecDeque<Reply>,
    pub written: Vec<u8>,
    pub write_error: Option<Error>,
    pub last_timeout: Option<Duration>,
    pub opened: usize,
    pub closed: usize,
    pub refuse: Option<Error>,
}

pub type SharedWire = Rc<RefCell<Wire>>;

#[derive(Debug)]
pub struct MockConnection {
    wire: SharedWire,
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error> {
        let mut wire = self.wire.borrow_mut();
        wire.last_timeout = Some(timeout);
        match wire.replies.pop_front() {
            Some(Reply::Data(data)) => {
                let len = buf.len().min(data.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            Some(Reply::Fail(err)) => Err(err),
            // Nothing scripted behaves like an idle socket.
            None => Err(Error::Timeout),
        }
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut wire = self.wire.borrow_mut();
        if let Some(err) = wire.write_error {
            return Err(err);
        }
        wire.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        self.wire.borrow_mut().closed += 1;
        Ok(())
    }
}

impl Connection for MockConnection {}

/// Hands out connections sharing one [`Wire`], or refuses when told to.
#[derive(Debug, Clone, Default)]
pub struct MockNetwork {
    pub wire: SharedWire,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refuse(&self, err: Error) {
        self.wire.borrow_mut().refuse = Some(err);
    }

    pub fn accept(&self) {
        self.wire.borrow_mut().refuse = None;
    }

    pub fn push(&self, reply: Reply) {
        self.wire.borrow_mut().replies.push_back(reply);
    }

    pub fn written(&self) -> Vec<u8> {
        self.wire.borrow().written.clone()
    }

    pub fn opened(&self) -> usize {
        self.wire.borrow().opened
    }

    pub fn closed(&self) -> usize {
        self.wire.borrow().closed
    }
}

impl Connect for MockNetwork {
    type Connection = MockConnection;
    type Error = Error;

    fn connect(&mut self, _host: &str, _port: u16) -> Result<Self::Connection, Self::Error> {
        let mut wire = self.wire.borrow_mut();
        if let Some(err) = wire.refuse {
            return Err(err);
        }
        wire.opened += 1;
        Ok(MockConnection {
            wire: self.wire.clone(),
        })
    }
}

/// A clock that only moves when the test advances it.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Rc<Cell<Duration>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Records every event it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    pub connects: usize,
    pub disconnects: usize,
    pub data: Vec<Vec<u8>>,
    pub last_peer: Option<Peer>,
}

impl Handler for Recorder {
    fn on_connect(&mut self, peer: &Peer) {
        self.connects += 1;
        self.last_peer = Some(peer.clone());
    }

    fn on_disconnect(&mut self, peer: &Peer) {
        self.disconnects += 1;
        self.last_peer = Some(peer.clone());
    }

    fn on_data(&mut self, _peer: &Peer, data: &[u8]) {
        self.data.push(data.to_vec());
    }
}
