//! Common test utilities for integration tests.
//!
//! Canned stream bodies and helpers for building clients over mock
//! transports and sockets.
//!
//! # Example
//!
//! ```ignore
//! use common::{collect_events, mock_client, track_streaming_response};
//!
//! let (transport, mut client) = mock_client(track_streaming_response());
//! let events = collect_events(|cb| client.sample(&[], cb));
//! ```

pub mod fixtures;

pub use fixtures::*;

use std::sync::Arc;
use std::time::Duration;

use twitter_streaming::adapters::mock::{MockSocket, MockSocketFactory, MockTransport};
use twitter_streaming::traits::StreamStatus;
use twitter_streaming::{ClientConfig, StreamEvent, StreamingClient, StreamingResult};

/// Status line and headers of a successful stream response.
pub const OK_HEAD: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: identity\r\n\r\n";

/// A client over a mock transport that delivers `chunks` on its first call.
pub fn mock_client(chunks: Vec<String>) -> (MockTransport, StreamingClient) {
    let transport = MockTransport::new().with_batch(chunks);
    let client = StreamingClient::with_transport(Box::new(transport.clone()));
    (transport, client)
}

/// A non-blocking client over `socket` with short test timings.
pub fn nonblocking_client(
    socket: &MockSocket,
    timeout: Duration,
) -> (MockSocketFactory, StreamingClient) {
    let factory = MockSocketFactory::new().with_socket(socket.clone());
    let config = ClientConfig::default()
        .with_nonblocking(true)
        .with_timeout(Some(timeout))
        .with_poll_interval(Duration::from_millis(5))
        .with_socket_factory(Arc::new(factory.clone()));
    let client = StreamingClient::new(config).expect("mock client");
    (factory, client)
}

/// A blocking client over `socket`.
pub fn blocking_client(socket: &MockSocket) -> (MockSocketFactory, StreamingClient) {
    let factory = MockSocketFactory::new().with_socket(socket.clone());
    let config = ClientConfig::default().with_socket_factory(Arc::new(factory.clone()));
    let client = StreamingClient::new(config).expect("mock client");
    (factory, client)
}

/// Run one stream call and collect what the callback saw.
pub fn collect_events<F>(call: F) -> (Vec<StreamEvent>, StreamingResult<StreamStatus>)
where
    F: FnOnce(&mut dyn FnMut(StreamEvent)) -> StreamingResult<StreamStatus>,
{
    let mut events = Vec::new();
    let result = call(&mut |event| events.push(event));
    (events, result)
}
