//! Stream transports.
//!
//! - [`BlockingTransport`] - Connects, streams and disconnects inside one call
//! - [`NonblockingTransport`] - Keeps the connection between calls and
//!   returns to the caller when the poll timeout elapses

mod blocking;
mod nonblocking;

pub use blocking::BlockingTransport;
pub use nonblocking::{NonblockingTransport, DEFAULT_TIMEOUT, POLL_INTERVAL};

use crate::error::{NetworkError, StreamingResult};
use crate::traits::{ConnectionRequest, StreamSocket};

/// Bytes requested per socket read.
pub const CHUNK_SIZE: usize = 1024;

/// Serialize `request` and write it in full onto a freshly connected socket.
fn send_request(
    socket: &mut dyn StreamSocket,
    request: &dyn ConnectionRequest,
) -> StreamingResult<()> {
    let mut bytes = Vec::with_capacity(256);
    request
        .write_to(&mut bytes)
        .map_err(|e| NetworkError::write(&e))?;
    socket
        .write_all(&bytes)
        .and_then(|_| socket.flush())
        .map_err(|e| NetworkError::write(&e))?;
    Ok(())
}
