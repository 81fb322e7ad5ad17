//! Socket abstractions used by the transports.
//!
//! Transports never touch `TcpStream` or TLS types directly. They ask a
//! [`SocketFactory`] for a connected [`StreamSocket`], which lets tests
//! script reads, would-blocks and failures without a network.

use std::io::{self, Read, Write};
use std::time::Duration;

use crate::error::NetworkError;

/// A connected, encrypted byte stream.
pub trait StreamSocket: Read + Write + Send {
    /// Switch between blocking and non-blocking reads.
    ///
    /// In non-blocking mode a read with no data ready fails with
    /// `io::ErrorKind::WouldBlock`.
    fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()>;

    /// Wait up to `timeout` for the socket to become readable.
    ///
    /// Returns `Ok(true)` when a read would make progress (data or EOF),
    /// `Ok(false)` when the timeout elapsed first.
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Shut the connection down in both directions.
    fn shutdown(&mut self) -> io::Result<()>;
}

/// Opens connected sockets: resolve, connect over TCP, then wrap in TLS.
pub trait SocketFactory: Send + Sync {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn StreamSocket>, NetworkError>;
}
