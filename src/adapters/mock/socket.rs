//! Mock socket and socket factory for testing.
//!
//! A [`MockSocket`] replays a script of read steps and records everything
//! written to it. Clones share state, so a test can keep a handle while the
//! transport owns the boxed socket.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::NetworkError;
use crate::traits::{SocketFactory, StreamSocket};

/// One scripted outcome of a read.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadStep {
    /// Bytes returned by reads, split across reads if larger than the buffer.
    Data(Vec<u8>),
    /// A read with no data ready.
    WouldBlock,
    /// The peer closed the connection.
    Eof,
    /// A read failure.
    Error(io::ErrorKind),
}

impl ReadStep {
    pub fn data(bytes: impl AsRef<[u8]>) -> Self {
        ReadStep::Data(bytes.as_ref().to_vec())
    }
}

#[derive(Debug, Default)]
struct MockSocketState {
    script: VecDeque<ReadStep>,
    written: Vec<u8>,
    nonblocking: bool,
    shutdown: bool,
    waits: usize,
}

/// Scripted socket.
///
/// When the script runs out, reads report would-block in non-blocking mode
/// and end-of-stream in blocking mode.
///
/// # Example
///
/// ```ignore
/// use twitter_streaming::adapters::mock::{MockSocket, ReadStep};
///
/// let socket = MockSocket::new()
///     .with_step(ReadStep::data("HTTP/1.1 200 OK\r\n\r\n"))
///     .with_step(ReadStep::WouldBlock);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockSocket {
    state: Arc<Mutex<MockSocketState>>,
    wait_delay: Duration,
}

impl MockSocket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the read script.
    pub fn with_step(self, step: ReadStep) -> Self {
        self.push_step(step);
        self
    }

    /// How long `wait_readable` sleeps when nothing is scripted to be readable.
    pub fn with_wait_delay(mut self, delay: Duration) -> Self {
        self.wait_delay = delay;
        self
    }

    pub fn push_step(&self, step: ReadStep) {
        self.state.lock().unwrap().script.push_back(step);
    }

    /// Everything written to the socket so far.
    pub fn written(&self) -> Vec<u8> {
        self.state.lock().unwrap().written.clone()
    }

    pub fn written_string(&self) -> String {
        String::from_utf8_lossy(&self.written()).into_owned()
    }

    pub fn is_nonblocking(&self) -> bool {
        self.state.lock().unwrap().nonblocking
    }

    pub fn is_shutdown(&self) -> bool {
        self.state.lock().unwrap().shutdown
    }

    pub fn wait_count(&self) -> usize {
        self.state.lock().unwrap().waits
    }

    /// Steps not yet consumed.
    pub fn remaining_steps(&self) -> usize {
        self.state.lock().unwrap().script.len()
    }
}

impl Read for MockSocket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.shutdown {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket shut down"));
        }

        match state.script.pop_front() {
            Some(ReadStep::Data(mut bytes)) => {
                if bytes.len() > buf.len() {
                    let rest = bytes.split_off(buf.len());
                    state.script.push_front(ReadStep::Data(rest));
                }
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Some(ReadStep::WouldBlock) => Err(io::ErrorKind::WouldBlock.into()),
            Some(ReadStep::Eof) => Ok(0),
            Some(ReadStep::Error(kind)) => Err(io::Error::new(kind, "scripted read failure")),
            None if state.nonblocking => Err(io::ErrorKind::WouldBlock.into()),
            None => Ok(0),
        }
    }
}

impl Write for MockSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.shutdown {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket shut down"));
        }
        state.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StreamSocket for MockSocket {
    fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        self.state.lock().unwrap().nonblocking = nonblocking;
        Ok(())
    }

    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        let readable = {
            let mut state = self.state.lock().unwrap();
            state.waits += 1;
            !matches!(state.script.front(), None | Some(ReadStep::WouldBlock))
        };
        if !readable {
            std::thread::sleep(self.wait_delay.min(timeout));
        }
        Ok(readable)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.state.lock().unwrap().shutdown = true;
        Ok(())
    }
}

/// Hands out pre-scripted sockets in order and records connect attempts.
#[derive(Debug, Clone, Default)]
pub struct MockSocketFactory {
    sockets: Arc<Mutex<VecDeque<MockSocket>>>,
    connects: Arc<Mutex<Vec<(String, u16)>>>,
    failure: Arc<Mutex<Option<NetworkError>>>,
}

impl MockSocketFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a socket for the next connect.
    pub fn with_socket(self, socket: MockSocket) -> Self {
        self.sockets.lock().unwrap().push_back(socket);
        self
    }

    /// Make every connect fail with `err`.
    pub fn with_failure(self, err: NetworkError) -> Self {
        *self.failure.lock().unwrap() = Some(err);
        self
    }

    /// Host/port pairs passed to `connect`, in order.
    pub fn connects(&self) -> Vec<(String, u16)> {
        self.connects.lock().unwrap().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.lock().unwrap().len()
    }
}

impl SocketFactory for MockSocketFactory {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn StreamSocket>, NetworkError> {
        self.connects
            .lock()
            .unwrap()
            .push((host.to_string(), port));

        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }

        self.sockets
            .lock()
            .unwrap()
            .pop_front()
            .map(|socket| Box::new(socket) as Box<dyn StreamSocket>)
            .ok_or_else(|| NetworkError::ConnectionFailed {
                addr: format!("{}:{}", host, port),
                message: "no scripted socket".to_string(),
            })
    }
}
