//! Non-blocking transport: the connection outlives a single call.

use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{NetworkError, StreamingResult};
use crate::traits::{
    ConnectionRequest, ResponseSink, SocketFactory, StreamSocket, StreamStatus, Transport,
};

use super::{send_request, CHUNK_SIZE};

/// Longest single wait for the socket to become readable.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long a `stream` call waits for data before handing control back.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Keeps one socket open across `stream` calls.
///
/// The first call connects and sends the request. Every call then reads
/// whatever is available, waiting in [`POLL_INTERVAL`] steps, and returns
/// [`StreamStatus::Idle`] once `timeout` passes without the peer closing.
/// The request passed to later calls is ignored while the socket is open.
///
/// A `timeout` of `None` keeps reading until the peer closes or an error
/// occurs.
pub struct NonblockingTransport {
    factory: Arc<dyn SocketFactory>,
    socket: Option<Box<dyn StreamSocket>>,
    timeout: Option<Duration>,
    poll_interval: Duration,
}

impl NonblockingTransport {
    pub fn new(factory: Arc<dyn SocketFactory>) -> Self {
        Self {
            factory,
            socket: None,
            timeout: Some(DEFAULT_TIMEOUT),
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn connect(&mut self, request: &dyn ConnectionRequest) -> StreamingResult<()> {
        let host = request.socket_host();
        let port = request.socket_port();
        let mut socket = self.factory.connect(host, port)?;

        if let Err(e) = send_request(socket.as_mut(), request) {
            let _ = socket.shutdown();
            return Err(e);
        }
        if let Err(e) = socket.set_nonblocking(true) {
            let _ = socket.shutdown();
            return Err(NetworkError::ConnectionFailed {
                addr: format!("{}:{}", host, port),
                message: e.to_string(),
            }
            .into());
        }

        info!("Connected to {}:{} (non-blocking)", host, port);
        self.socket = Some(socket);
        Ok(())
    }

    /// Read until the peer closes, the sink fails, or the deadline passes.
    fn pump(&mut self, sink: &mut dyn ResponseSink) -> StreamingResult<StreamStatus> {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut buf = [0u8; CHUNK_SIZE];

        loop {
            let Some(socket) = self.socket.as_mut() else {
                return Ok(StreamStatus::Closed);
            };

            match socket.read(&mut buf) {
                Ok(0) => {
                    debug!("Peer closed the stream");
                    self.close();
                    return Ok(StreamStatus::Closed);
                }
                Ok(n) => {
                    if let Err(e) = sink.receive(&buf[..n]) {
                        self.close();
                        return Err(e);
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    let wait = match deadline {
                        Some(deadline) => {
                            let remaining = deadline.saturating_duration_since(Instant::now());
                            if remaining.is_zero() {
                                return Ok(StreamStatus::Idle);
                            }
                            remaining.min(self.poll_interval)
                        }
                        None => self.poll_interval,
                    };
                    if let Err(e) = socket.wait_readable(wait) {
                        let err = NetworkError::read(&e);
                        self.close();
                        return Err(err.into());
                    }
                }
                Err(e) => {
                    let err = NetworkError::read(&e);
                    self.close();
                    return Err(err.into());
                }
            }
        }
    }
}

impl std::fmt::Debug for NonblockingTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonblockingTransport")
            .field("connected", &self.socket.is_some())
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl Transport for NonblockingTransport {
    fn stream(
        &mut self,
        request: &dyn ConnectionRequest,
        sink: &mut dyn ResponseSink,
    ) -> StreamingResult<StreamStatus> {
        if self.socket.is_none() {
            self.connect(request)?;
        }
        self.pump(sink)
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            match socket.shutdown() {
                Ok(()) => info!("Stream connection closed"),
                Err(e) => warn!("Error shutting down stream socket: {}", e),
            }
        }
    }
}

impl Drop for NonblockingTransport {
    fn drop(&mut self) {
        self.close();
    }
}
