//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`Transport`] - Blocking or non-blocking stream connection strategy
//! - [`ResponseSink`] - Consumer of raw bytes read by a transport
//! - [`ConnectionRequest`] - Serializable request with a target host and port
//! - [`StreamSocket`] - Connected TLS byte stream
//! - [`SocketFactory`] - Opens `StreamSocket`s

pub mod request;
pub mod socket;
pub mod transport;

pub use request::ConnectionRequest;
pub use socket::{SocketFactory, StreamSocket};
pub use transport::{ResponseSink, StreamStatus, Transport};
