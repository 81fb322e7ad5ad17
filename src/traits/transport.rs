//! Transport trait abstraction.
//!
//! A transport owns the connection to the stream endpoint and pushes every
//! chunk it reads into a [`ResponseSink`]. The client picks one
//! implementation at construction and never mixes them.

use crate::error::StreamingResult;

use super::request::ConnectionRequest;

/// Receives raw bytes read from the stream socket.
pub trait ResponseSink {
    /// Handle one chunk. An error ends the stream attempt.
    fn receive(&mut self, chunk: &[u8]) -> StreamingResult<()>;
}

/// How a successful stream attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// The connection is gone: the peer closed it or the transport only
    /// holds connections for the duration of a call.
    Closed,
    /// No data arrived before the poll timeout. The connection is still open
    /// and the next call resumes reading it.
    Idle,
}

/// Strategy for driving the stream connection.
///
/// # Example
///
/// ```ignore
/// use twitter_streaming::traits::{StreamStatus, Transport};
///
/// fn poll<T: Transport>(transport: &mut T, request: &StreamRequest, sink: &mut dyn ResponseSink) {
///     match transport.stream(request, sink) {
///         Ok(StreamStatus::Idle) => { /* come back later */ }
///         Ok(StreamStatus::Closed) => { /* reconnect or stop */ }
///         Err(e) => eprintln!("stream failed: {}", e),
///     }
/// }
/// ```
pub trait Transport: Send {
    /// Stream the response to `request` into `sink`.
    fn stream(
        &mut self,
        request: &dyn ConnectionRequest,
        sink: &mut dyn ResponseSink,
    ) -> StreamingResult<StreamStatus>;

    /// Whether a connection persists between calls.
    fn is_connected(&self) -> bool;

    /// Drop any persistent connection.
    fn close(&mut self);
}
