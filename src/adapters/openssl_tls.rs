//! OpenSSL socket factory.
//!
//! The production [`SocketFactory`]: resolves the stream host, opens a TCP
//! connection and completes a TLS client handshake with certificate and
//! hostname verification.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use openssl::ssl::{SslConnector, SslMethod, SslStream};
use tracing::{debug, warn};

use crate::error::NetworkError;
use crate::traits::{SocketFactory, StreamSocket};

/// Opens TLS sockets with OpenSSL over std `TcpStream`.
pub struct OpenSslSocketFactory {
    connector: SslConnector,
    connect_timeout: Option<Duration>,
}

impl OpenSslSocketFactory {
    /// Create a factory using the system trust store.
    pub fn new() -> Result<Self, NetworkError> {
        let builder = SslConnector::builder(SslMethod::tls_client()).map_err(|e| {
            NetworkError::TlsError {
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            connector: builder.build(),
            connect_timeout: None,
        })
    }

    /// Bound the TCP connect step.
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for OpenSslSocketFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSslSocketFactory")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl SocketFactory for OpenSslSocketFactory {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn StreamSocket>, NetworkError> {
        let addr = resolve(host, port)?;
        debug!(%addr, host, "Opening TCP connection");

        let tcp = match self.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        }
        .map_err(|e| NetworkError::ConnectionFailed {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;

        let stream = self
            .connector
            .connect(host, tcp)
            .map_err(|e| NetworkError::TlsError {
                message: e.to_string(),
            })?;
        debug!(host, "TLS handshake complete");

        Ok(Box::new(TlsSocket {
            stream,
            nonblocking: false,
        }))
    }
}

/// Resolve a host to its first address.
fn resolve(host: &str, port: u16) -> Result<SocketAddr, NetworkError> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| NetworkError::DnsResolutionFailed {
            host: host.to_string(),
            message: e.to_string(),
        })?
        .next()
        .ok_or_else(|| NetworkError::DnsResolutionFailed {
            host: host.to_string(),
            message: "no addresses returned".to_string(),
        })
}

/// A TLS stream over TCP.
pub struct TlsSocket {
    stream: SslStream<TcpStream>,
    nonblocking: bool,
}

impl Read for TlsSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TlsSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl StreamSocket for TlsSocket {
    fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        self.stream.get_ref().set_nonblocking(nonblocking)?;
        self.nonblocking = nonblocking;
        Ok(())
    }

    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        // Decrypted bytes already buffered inside OpenSSL.
        if self.stream.ssl().pending() > 0 {
            return Ok(true);
        }

        // Block on a one-byte peek of the raw socket, bounded by a read timeout.
        let tcp = self.stream.get_ref();
        tcp.set_nonblocking(false)?;
        tcp.set_read_timeout(Some(timeout.max(Duration::from_millis(1))))?;
        let readable = match tcp.peek(&mut [0u8; 1]) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(false)
            }
            Err(e) => Err(e),
        };
        tcp.set_read_timeout(None)?;
        tcp.set_nonblocking(self.nonblocking)?;
        readable
    }

    fn shutdown(&mut self) -> io::Result<()> {
        if let Err(e) = self.stream.shutdown() {
            warn!("TLS close_notify failed: {}", e);
        }
        self.stream.get_ref().shutdown(Shutdown::Both)
    }
}
