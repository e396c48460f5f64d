//! [`Connect`] and [`Connection`] over [`std::net::TcpStream`].

use core::time::Duration;
use std::io::{ErrorKind, Read as _, Write as _};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use super::error::Error;
use super::{Close, Connect, Connection, Read, Write};

/// Opens plain TCP connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector {
    connect_timeout: Option<Duration>,
}

impl TcpConnector {
    /// Creates a connector that waits for the operating system's connect
    /// timeout.
    pub const fn new() -> Self {
        Self {
            connect_timeout: None,
        }
    }

    /// Limits every connection attempt to `timeout` per resolved address.
    pub const fn with_connect_timeout(timeout: Duration) -> Self {
        Self {
            connect_timeout: Some(timeout),
        }
    }
}

impl Connect for TcpConnector {
    type Connection = TcpConnection;
    type Error = Error;

    fn connect(&mut self, host: &str, port: u16) -> Result<Self::Connection, Self::Error> {
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|_| Error::InvalidAddress)?;

        let mut resolved = false;
        for addr in addrs {
            resolved = true;
            let stream = match self.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match stream {
                Ok(stream) => {
                    let _ = stream.set_nodelay(true);
                    return Ok(TcpConnection { stream });
                }
                Err(_) => {
                    debug!("connect to {}:{} failed on one address", host, port);
                }
            }
        }

        if resolved {
            Err(Error::ConnectionRefused)
        } else {
            Err(Error::InvalidAddress)
        }
    }
}

/// An open TCP stream.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl TcpConnection {
    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl Read for TcpConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error> {
        // A zero read timeout means "block forever" to the socket API.
        let timeout = timeout.max(Duration::from_micros(1));
        self.stream
            .set_read_timeout(Some(timeout))
            .map_err(|_| Error::ReadError)?;

        match self.stream.read(buf) {
            Ok(0) if !buf.is_empty() => Err(Error::ConnectionClosed),
            Ok(len) => Ok(len),
            Err(err) => Err(match err.kind() {
                ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
                    Error::Timeout
                }
                ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
                    Error::ConnectionClosed
                }
                _ => Error::ReadError,
            }),
        }
    }
}

impl Write for TcpConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream.write(buf).map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush().map_err(|_| Error::WriteError)
    }
}

impl Close for TcpConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotConnected => Ok(()),
            Err(_) => Err(Error::ConnectionClosed),
        }
    }
}

impl Connection for TcpConnection {}
